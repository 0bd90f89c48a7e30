//! `POST /api/contact`: the contact form entry point.
//!
//! One request walks a linear state machine and stops at the first terminal
//! state: receive, spam check, validate, precondition check, dispatch,
//! report. Nothing is retried.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

use super::dispatcher::Dispatcher;
use super::model::{
    Classification, ContactResponse, ContactSubmission, DeliveryOutcome, MSG_INVALID_BODY,
    MSG_NOT_CONFIGURED, MSG_SEND_FAILED,
};
use super::validation;

/// Shared state for contact routes.
#[derive(Clone)]
pub struct ContactState {
    pub dispatcher: Arc<Dispatcher>,
}

impl IntoResponse for ContactResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}

/// Run one submission through the pipeline and decide the response.
pub async fn process_submission(
    dispatcher: &Dispatcher,
    submission: &ContactSubmission,
) -> ContactResponse {
    match validation::classify(submission) {
        Classification::Automated => {
            // Looks like success so the bot learns nothing.
            info!("Honeypot filled; discarding submission");
            return ContactResponse::sent();
        }
        Classification::Invalid(failure) => {
            debug!(?failure, "Contact submission failed validation");
            return ContactResponse::bad_request(failure.response_message());
        }
        Classification::Valid => {}
    }

    if !dispatcher.is_configured() {
        error!("Mail credential is not configured; cannot deliver contact submission");
        return ContactResponse::server_error(MSG_NOT_CONFIGURED);
    }

    match dispatcher.dispatch(submission).await {
        DeliveryOutcome::Delivered => ContactResponse::sent(),
        DeliveryOutcome::Rejected(_) | DeliveryOutcome::ProviderError(_) => {
            ContactResponse::server_error(MSG_SEND_FAILED)
        }
    }
}

/// How far a raw request body got before it had to be typed.
#[derive(Debug)]
pub enum Intake {
    Submission(ContactSubmission),
    /// Honeypot filled. Decided on the untyped body so field types do not matter.
    Automated,
    /// Not JSON, or JSON that does not fit the form's shape.
    Unreadable(String),
}

/// Parse a request body leniently: any JSON is accepted up to the honeypot
/// check, and only then is it held to the submission's field types.
pub fn read_body(bytes: &[u8]) -> Intake {
    let value: Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(e) => return Intake::Unreadable(e.to_string()),
    };

    if validation::honeypot_filled(&value) {
        return Intake::Automated;
    }

    match serde_json::from_value(value) {
        Ok(submission) => Intake::Submission(submission),
        Err(e) => Intake::Unreadable(e.to_string()),
    }
}

/// POST /api/contact
///
/// Body: `{ name, email, company?, message, website }`, read as JSON whatever
/// the `Content-Type`. Always answers with `{ "message": ... }`.
async fn submit_contact(State(state): State<ContactState>, body: Bytes) -> ContactResponse {
    let submission_id = Uuid::new_v4();
    let span = info_span!("contact", %submission_id);

    let submission = match read_body(&body) {
        Intake::Submission(submission) => submission,
        Intake::Automated => {
            info!(parent: &span, "Honeypot filled; discarding submission");
            return ContactResponse::sent();
        }
        Intake::Unreadable(reason) => {
            debug!(parent: &span, error = %reason, "Unreadable contact body");
            return ContactResponse::bad_request(MSG_INVALID_BODY);
        }
    };

    process_submission(&state.dispatcher, &submission)
        .instrument(span)
        .await
}

/// Build the contact routes.
pub fn contact_routes(state: ContactState) -> Router {
    Router::new()
        .route("/api/contact", post(submit_contact))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::http::StatusCode;

    use super::*;
    use crate::config::MailConfig;
    use crate::contact::model::{
        MSG_INVALID_EMAIL, MSG_MISSING_FIELDS, MSG_SENT, MSG_SHORT_MESSAGE, MSG_SHORT_NAME,
    };
    use crate::error::DeliveryError;
    use crate::mail::{MailProvider, OutboundEmail};

    struct StubProvider {
        calls: Mutex<Vec<OutboundEmail>>,
        succeed: bool,
    }

    impl StubProvider {
        fn new(succeed: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                succeed,
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl MailProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn send(&self, email: &OutboundEmail) -> Result<(), DeliveryError> {
            self.calls.lock().unwrap().push(email.clone());
            if self.succeed {
                Ok(())
            } else {
                Err(DeliveryError::RequestFailed {
                    provider: "stub".into(),
                    reason: "upstream 503".into(),
                })
            }
        }
    }

    fn dispatcher(stub: Arc<StubProvider>, configured: bool) -> Dispatcher {
        let key = configured.then(|| "SG.test".to_string().into());
        Dispatcher::with_provider(MailConfig::sendgrid(key), stub)
    }

    fn ana() -> ContactSubmission {
        ContactSubmission::new("Ana", "ana@example.com", "We need a new website built.")
    }

    // ── Spam ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn honeypot_gets_deceptive_success() {
        let stub = StubProvider::new(true);
        let d = dispatcher(stub.clone(), true);

        for sub in [
            ana().with_honeypot("http://spam.example"),
            ContactSubmission::default().with_honeypot("x"),
        ] {
            let resp = process_submission(&d, &sub).await;
            assert_eq!(resp.status, StatusCode::OK);
            assert_eq!(resp.message, MSG_SENT);
        }
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn honeypot_beats_missing_configuration() {
        let stub = StubProvider::new(true);
        let d = dispatcher(stub.clone(), false);
        let resp = process_submission(&d, &ana().with_honeypot("x")).await;
        assert_eq!(resp, ContactResponse::sent());
    }

    // ── Validation ──────────────────────────────────────────────────

    #[tokio::test]
    async fn invalid_fields_are_400_without_dispatch() {
        let stub = StubProvider::new(true);
        let d = dispatcher(stub.clone(), true);

        let body = "We need a new website built.";
        let cases = [
            (ContactSubmission::new("", "ana@example.com", body), MSG_MISSING_FIELDS),
            (ContactSubmission::new("A", "ana@example.com", body), MSG_SHORT_NAME),
            (ContactSubmission::new("Ana", "ana-at-example.com", body), MSG_INVALID_EMAIL),
            (ContactSubmission::new("Ana", "ana@example.com", "Too short"), MSG_SHORT_MESSAGE),
        ];
        for (sub, expected) in cases {
            let resp = process_submission(&d, &sub).await;
            assert_eq!(resp.status, StatusCode::BAD_REQUEST);
            assert_eq!(resp.message, expected);
        }
        assert_eq!(stub.call_count(), 0);
    }

    // ── Body intake ─────────────────────────────────────────────────

    #[test]
    fn honeypot_is_read_before_field_types() {
        for raw in [
            r#"{"name":12345,"email":"x","message":"y","website":"http://spam.example"}"#,
            r#"{"name":null,"website":"x"}"#,
            r#"{"message":["a"],"website":true}"#,
        ] {
            assert!(matches!(read_body(raw.as_bytes()), Intake::Automated), "{raw}");
        }
    }

    #[test]
    fn mistyped_body_without_honeypot_is_unreadable() {
        for raw in [
            r#"{"name":12345,"email":"ana@example.com","message":"We need a new website built."}"#,
            r#"{"name":null,"website":""}"#,
            r#"["not","an","object"]"#,
            "{ not json",
            "",
        ] {
            assert!(matches!(read_body(raw.as_bytes()), Intake::Unreadable(_)), "{raw}");
        }
    }

    #[test]
    fn well_formed_body_becomes_a_submission() {
        let raw = r#"{"name":"Ana","email":"ana@example.com","message":"We need a new website built."}"#;
        match read_body(raw.as_bytes()) {
            Intake::Submission(sub) => {
                assert_eq!(sub.name, "Ana");
                assert!(sub.honeypot.is_empty());
            }
            other => panic!("expected a submission, got {other:?}"),
        }
    }

    // ── Configuration ───────────────────────────────────────────────

    #[tokio::test]
    async fn unconfigured_is_500_without_dispatch() {
        let stub = StubProvider::new(true);
        let d = dispatcher(stub.clone(), false);

        let resp = process_submission(&d, &ana()).await;
        assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.message, "Email service is not configured");
        assert_eq!(stub.call_count(), 0);
    }

    // ── Delivery ────────────────────────────────────────────────────

    #[tokio::test]
    async fn provider_failure_is_generic_500_after_one_call() {
        let stub = StubProvider::new(false);
        let d = dispatcher(stub.clone(), true);

        let resp = process_submission(&d, &ana()).await;
        assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.message, MSG_SEND_FAILED);
        assert!(!resp.message.contains("503"));

        let calls = stub.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].reply_to, "ana@example.com");
    }

    #[tokio::test]
    async fn provider_success_is_200() {
        let stub = StubProvider::new(true);
        let d = dispatcher(stub.clone(), true);

        let resp = process_submission(&d, &ana()).await;
        assert_eq!(resp, ContactResponse::sent());
        assert_eq!(stub.call_count(), 1);
    }
}
