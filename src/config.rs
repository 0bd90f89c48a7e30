//! Configuration types.
//!
//! Everything here is read from the process environment once at startup and
//! then shared read-only.

use std::str::FromStr;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Destination used when `CONTACT_EMAIL` is unset.
pub const DEFAULT_CONTACT_EMAIL: &str = "ops@hotfix-doo.com";
/// Sender used when `SENDGRID_FROM_EMAIL` is unset.
pub const DEFAULT_FROM_EMAIL: &str = "noreply@hotfix-doo.com";
/// Public SendGrid endpoint.
pub const DEFAULT_SENDGRID_API_URL: &str = "https://api.sendgrid.com";

/// Which transport delivers contact notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailBackend {
    SendGrid,
    Smtp,
}

impl FromStr for MailBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sendgrid" => Ok(Self::SendGrid),
            "smtp" => Ok(Self::Smtp),
            other => Err(ConfigError::InvalidValue {
                key: "MAIL_BACKEND".into(),
                message: format!("expected 'sendgrid' or 'smtp', got '{other}'"),
            }),
        }
    }
}

/// SMTP relay settings for the `smtp` backend.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Option<SecretString>,
}

/// Mail delivery configuration.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub backend: MailBackend,
    /// SendGrid API key. `None` means the service is not configured.
    pub api_key: Option<SecretString>,
    pub api_url: String,
    /// Where contact notifications are delivered.
    pub to_address: String,
    /// The no-reply sender address.
    pub from_address: String,
    pub smtp: Option<SmtpConfig>,
}

impl MailConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match get("MAIL_BACKEND") {
            Some(raw) => raw.parse()?,
            None => MailBackend::SendGrid,
        };

        let smtp = match get("SMTP_HOST") {
            Some(host) => Some(SmtpConfig {
                host,
                port: parse_port(get("SMTP_PORT"), "SMTP_PORT", 587)?,
                username: get("SMTP_USERNAME").unwrap_or_default(),
                password: get("SMTP_PASSWORD").map(SecretString::from),
            }),
            None => None,
        };

        Ok(Self {
            backend,
            api_key: get("SENDGRID_API_KEY").map(SecretString::from),
            api_url: get("SENDGRID_API_URL").unwrap_or_else(|| DEFAULT_SENDGRID_API_URL.to_string()),
            to_address: get("CONTACT_EMAIL").unwrap_or_else(|| DEFAULT_CONTACT_EMAIL.to_string()),
            from_address: get("SENDGRID_FROM_EMAIL")
                .unwrap_or_else(|| DEFAULT_FROM_EMAIL.to_string()),
            smtp,
        })
    }

    /// A config for the SendGrid backend with the default addresses.
    pub fn sendgrid(api_key: Option<SecretString>) -> Self {
        Self {
            backend: MailBackend::SendGrid,
            api_key,
            api_url: DEFAULT_SENDGRID_API_URL.to_string(),
            to_address: DEFAULT_CONTACT_EMAIL.to_string(),
            from_address: DEFAULT_FROM_EMAIL.to_string(),
            smtp: None,
        }
    }

    /// The credential the selected backend needs before any send attempt.
    pub fn credential(&self) -> Option<&SecretString> {
        match self.backend {
            MailBackend::SendGrid => self.api_key.as_ref(),
            MailBackend::Smtp => self.smtp.as_ref().and_then(|s| s.password.as_ref()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credential().is_some()
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    /// CORS origins. `*` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 3000,
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let allowed_origins = match get("SITE_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.allowed_origins,
        };

        Ok(Self {
            bind_addr: get("SITE_BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse_port(get("SITE_PORT"), "SITE_PORT", defaults.port)?,
            allowed_origins,
        })
    }

    /// `host:port` string for the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_port(raw: Option<String>, key: &str, default: u16) -> Result<u16, ConfigError> {
    match raw {
        Some(raw) => raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{raw}' is not a valid port: {e}"),
        }),
        None => Ok(default),
    }
}
