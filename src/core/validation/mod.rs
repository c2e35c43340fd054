//! Validation of untyped form input
//!
//! Form fields are checked by small reusable validators and assembled into a
//! declarative schema. Validation never fails hard: it always produces either
//! the typed record or a field-error map the caller can render inline.

pub mod schema;
pub mod validators;

pub use schema::{FieldErrors, InvoiceSchema};
