//! Payment requests and the validation rule set.
//!
//! A [`PaymentRequest`] is what the user asked for. [`validate`] checks it
//! against a [`PaymentContext`] read from the chain and, if every rule passes,
//! returns a [`ValidatedPayment`]: the only input the instruction builder
//! accepts.

mod error;
mod request;
mod validate;

pub use error::PaymentError;
pub use request::PaymentRequest;
pub use validate::{PaymentContext, ValidatedPayment, ValidationOutcome, validate, validate_amount};
