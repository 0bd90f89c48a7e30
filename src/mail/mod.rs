//! Outbound transactional mail.
//!
//! Supports:
//! - **SendGrid**: v3 `mail/send` over HTTPS via reqwest
//! - **SMTP**: any authenticated relay via lettre
//!
//! Both sit behind the `MailProvider` trait so the contact dispatcher never
//! knows which one is in use.

pub mod sendgrid;
pub mod smtp;

pub use sendgrid::SendGridProvider;
pub use smtp::SmtpProvider;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{MailBackend, MailConfig};
use crate::error::DeliveryError;

/// A fully rendered message ready for a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub from: String,
    pub reply_to: String,
    pub subject: String,
    /// Plain-text rendering.
    pub text: String,
    /// HTML rendering.
    pub html: String,
}

/// A transactional mail provider. One call, one attempt, no retries.
#[async_trait]
pub trait MailProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Hand the message to the provider and report whether it was accepted.
    async fn send(&self, email: &OutboundEmail) -> Result<(), DeliveryError>;
}

/// Create the provider selected by configuration.
///
/// Returns `None` when the selected backend has no credential; the
/// dispatcher then reports the service as not configured.
pub fn create_provider(config: &MailConfig) -> Option<Arc<dyn MailProvider>> {
    let credential = config.credential()?.clone();
    match config.backend {
        MailBackend::SendGrid => {
            tracing::info!(api_url = %config.api_url, "Using SendGrid mail provider");
            Some(Arc::new(SendGridProvider::new(&config.api_url, credential)))
        }
        MailBackend::Smtp => {
            let smtp = config.smtp.as_ref()?;
            tracing::info!(host = %smtp.host, port = smtp.port, "Using SMTP mail provider");
            Some(Arc::new(SmtpProvider::new(
                &smtp.host,
                smtp.port,
                &smtp.username,
                credential,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmtpConfig;

    #[test]
    fn no_credential_means_no_provider() {
        assert!(create_provider(&MailConfig::sendgrid(None)).is_none());
    }

    #[test]
    fn sendgrid_backend_creates_sendgrid_provider() {
        let config = MailConfig::sendgrid(Some("SG.test".to_string().into()));
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "sendgrid");
    }

    #[test]
    fn smtp_backend_creates_smtp_provider() {
        let mut config = MailConfig::sendgrid(None);
        config.backend = MailBackend::Smtp;
        config.smtp = Some(SmtpConfig {
            host: "smtp.example.com".into(),
            port: 587,
            username: "relay".into(),
            password: Some("hunter2".to_string().into()),
        });
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "smtp");
    }
}
