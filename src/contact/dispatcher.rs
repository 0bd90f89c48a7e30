//! Delivery dispatcher: formats a valid submission and hands it to the
//! configured mail provider exactly once.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::model::{ContactSubmission, DeliveryOutcome};
use super::notification;
use crate::config::MailConfig;
use crate::error::DeliveryError;
use crate::mail::{self, MailProvider};

/// Reason reported when no credential is configured.
pub const NOT_CONFIGURED_REASON: &str = "service not configured";

/// Sends contact notifications. Holds read-only configuration established at
/// startup; safe to share across concurrent requests.
pub struct Dispatcher {
    config: Arc<MailConfig>,
    provider: Option<Arc<dyn MailProvider>>,
}

impl Dispatcher {
    /// Build a dispatcher with the provider selected by `config`.
    pub fn new(config: MailConfig) -> Self {
        let provider = mail::create_provider(&config);
        Self {
            config: Arc::new(config),
            provider,
        }
    }

    /// Build a dispatcher around an explicit provider.
    pub fn with_provider(config: MailConfig, provider: Arc<dyn MailProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider: Some(provider),
        }
    }

    /// Whether a dispatch attempt is allowed at all.
    pub fn is_configured(&self) -> bool {
        self.config.is_configured() && self.provider.is_some()
    }

    /// Format and send one notification. No retry.
    ///
    /// Callers must only pass submissions classified as valid.
    pub async fn dispatch(&self, submission: &ContactSubmission) -> DeliveryOutcome {
        let provider = match &self.provider {
            Some(provider) if self.config.is_configured() => provider,
            _ => {
                error!("Contact dispatch refused: mail credential is not configured");
                return DeliveryOutcome::ProviderError(NOT_CONFIGURED_REASON.to_string());
            }
        };

        let email = notification::compose(submission, &self.config);
        match provider.send(&email).await {
            Ok(()) => {
                info!(provider = provider.name(), to = %email.to, "Contact notification delivered");
                DeliveryOutcome::Delivered
            }
            Err(e) => {
                error!(provider = provider.name(), error = %e, "Contact notification failed");
                outcome_for(e)
            }
        }
    }
}

/// Fold a provider error into the outcome the entry point reports on.
pub fn outcome_for(err: DeliveryError) -> DeliveryOutcome {
    match err {
        DeliveryError::NotConfigured => {
            DeliveryOutcome::ProviderError(NOT_CONFIGURED_REASON.to_string())
        }
        DeliveryError::Rejected { .. } | DeliveryError::InvalidAddress { .. } => {
            warn!("Provider refused the message itself; resubmitting will not help");
            DeliveryOutcome::Rejected(err.to_string())
        }
        DeliveryError::RequestFailed { .. } => DeliveryOutcome::ProviderError(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::mail::OutboundEmail;

    /// Records every call and returns a scripted result.
    struct StubProvider {
        calls: Mutex<Vec<OutboundEmail>>,
        fail_with: Option<fn() -> DeliveryError>,
    }

    impl StubProvider {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail_with: None,
            })
        }

        fn failing(f: fn() -> DeliveryError) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail_with: Some(f),
            })
        }

        fn calls(&self) -> Vec<OutboundEmail> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MailProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn send(&self, email: &OutboundEmail) -> Result<(), DeliveryError> {
            self.calls.lock().unwrap().push(email.clone());
            match self.fail_with {
                Some(f) => Err(f()),
                None => Ok(()),
            }
        }
    }

    fn configured() -> MailConfig {
        MailConfig::sendgrid(Some("SG.test".to_string().into()))
    }

    fn ana() -> ContactSubmission {
        ContactSubmission::new("Ana", "ana@example.com", "We need a new website built.")
            .with_company("Acme")
    }

    #[tokio::test]
    async fn delivered_when_provider_accepts() {
        let stub = StubProvider::ok();
        let dispatcher = Dispatcher::with_provider(configured(), stub.clone());

        assert_eq!(dispatcher.dispatch(&ana()).await, DeliveryOutcome::Delivered);

        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].reply_to, "ana@example.com");
        assert_eq!(calls[0].to, crate::config::DEFAULT_CONTACT_EMAIL);
        assert_eq!(calls[0].from, crate::config::DEFAULT_FROM_EMAIL);
        assert!(calls[0].text.contains("Acme"));
    }

    #[tokio::test]
    async fn missing_credential_never_calls_provider() {
        let stub = StubProvider::ok();
        let dispatcher = Dispatcher::with_provider(MailConfig::sendgrid(None), stub.clone());

        assert!(!dispatcher.is_configured());
        assert_eq!(
            dispatcher.dispatch(&ana()).await,
            DeliveryOutcome::ProviderError(NOT_CONFIGURED_REASON.to_string())
        );
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn network_failure_is_provider_error() {
        let stub = StubProvider::failing(|| DeliveryError::RequestFailed {
            provider: "stub".into(),
            reason: "connection reset".into(),
        });
        let dispatcher = Dispatcher::with_provider(configured(), stub.clone());

        let outcome = dispatcher.dispatch(&ana()).await;
        assert!(matches!(outcome, DeliveryOutcome::ProviderError(ref r) if r.contains("connection reset")));
        assert_eq!(stub.calls().len(), 1);
    }

    #[tokio::test]
    async fn provider_rejection_is_rejected() {
        let stub = StubProvider::failing(|| DeliveryError::Rejected {
            provider: "stub".into(),
            status: 403,
            body: "sender not verified".into(),
        });
        let dispatcher = Dispatcher::with_provider(configured(), stub.clone());

        let outcome = dispatcher.dispatch(&ana()).await;
        assert!(matches!(outcome, DeliveryOutcome::Rejected(ref r) if r.contains("403")));
        assert!(!outcome.is_delivered());
    }

    #[test]
    fn new_without_credential_has_no_provider() {
        let dispatcher = Dispatcher::new(MailConfig::sendgrid(None));
        assert!(!dispatcher.is_configured());
    }
}
