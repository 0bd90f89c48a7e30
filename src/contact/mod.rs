//! Contact form pipeline.
//!
//! A submission is validated (honeypot first), then handed to the
//! `Dispatcher`, which formats a notification and makes one delivery
//! attempt through the configured `MailProvider`. The caller only ever sees
//! a status and a fixed message.

pub mod dispatcher;
pub mod model;
pub mod notification;
pub mod routes;
pub mod validation;

pub use dispatcher::Dispatcher;
pub use model::{
    Classification, ContactResponse, ContactSubmission, DeliveryOutcome, ValidationFailure,
};
pub use routes::{ContactState, Intake, contact_routes, process_submission, read_body};
pub use validation::{classify, validate_form};
