//! Declarative shape of the invoice form

use super::validators::{one_of, positive_cents, required_string};
use crate::core::form::FormData;
use crate::core::invoice::{InvoiceInput, InvoiceStatus};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field-error map: form field name to its validation messages
///
/// Serializes as a plain object in field declaration order, e.g.
/// `{"customerId": ["Please select a customer."]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(IndexMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Messages recorded for `field`, if any
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Form field names as submitted by the client
pub mod fields {
    pub const CUSTOMER_ID: &str = "customerId";
    pub const AMOUNT: &str = "amount";
    pub const STATUS: &str = "status";
}

pub const CUSTOMER_ID_MESSAGE: &str = "Please select a customer.";
pub const AMOUNT_MESSAGE: &str = "Please enter an amount greater than $0.";
pub const STATUS_MESSAGE: &str = "Please select an invoice status.";

/// Validator for the invoice create/update form
///
/// Only `customerId`, `amount` and `status` are read; `id` comes from the
/// path and `date` is assigned by the server, so both are ignored if a
/// client submits them. Every field is checked so that all failures are
/// reported together.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoiceSchema;

impl InvoiceSchema {
    pub fn parse(&self, form: &FormData) -> Result<InvoiceInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let customer_id = required_string(CUSTOMER_ID_MESSAGE)(form.get(fields::CUSTOMER_ID))
            .map_err(|msg| errors.add(fields::CUSTOMER_ID, msg))
            .ok();
        let amount = positive_cents(AMOUNT_MESSAGE)(form.get(fields::AMOUNT))
            .map_err(|msg| errors.add(fields::AMOUNT, msg))
            .ok();
        let status = one_of::<InvoiceStatus>(STATUS_MESSAGE)(form.get(fields::STATUS))
            .map_err(|msg| errors.add(fields::STATUS, msg))
            .ok();

        match (customer_id, amount, status) {
            (Some(customer_id), Some(amount), Some(status)) => Ok(InvoiceInput {
                customer_id,
                amount,
                status,
            }),
            _ => Err(errors),
        }
    }
}
