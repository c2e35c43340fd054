//! The invoice record and its value types

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Payment status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    /// Every accepted wire value, in display order
    pub const ALL: [InvoiceStatus; 2] = [InvoiceStatus::Pending, InvoiceStatus::Paid];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    /// Exact match only: no trimming, no case folding
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(format!("unknown invoice status '{}'", other)),
        }
    }
}

/// Convert a currency amount to integer minor units (cents)
///
/// Rounds to the nearest cent so that values like `0.29`, which are not
/// exactly representable, still land on the intended integer. Returns `None`
/// when the cent value is not finite or does not fit in an `i64`.
pub fn to_minor_units(amount: f64) -> Option<i64> {
    let cents = (amount * 100.0).round();
    // `i64::MAX as f64` is 2^63, one past the largest i64
    if cents.is_finite() && cents >= i64::MIN as f64 && cents < i64::MAX as f64 {
        Some(cents as i64)
    } else {
        None
    }
}

/// The current calendar date, used as the creation date of new invoices
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// A persisted invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub customer_id: String,
    /// Amount in cents
    pub amount: i64,
    pub status: InvoiceStatus,
    /// Creation date, `YYYY-MM-DD` on the wire
    pub date: NaiveDate,
}

/// Validated form input for create and update
///
/// `amount` is already in cents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceInput {
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
}

/// Column values of an INSERT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

impl NewInvoice {
    /// Build the row for a validated input, dated `date`
    pub fn from_input(input: InvoiceInput, date: NaiveDate) -> Self {
        Self {
            amount: input.amount,
            customer_id: input.customer_id,
            status: input.status,
            date,
        }
    }
}

/// Column values of an UPDATE; `id` and `date` are never part of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceChanges {
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
}

impl From<InvoiceInput> for InvoiceChanges {
    fn from(input: InvoiceInput) -> Self {
        Self {
            amount: input.amount,
            customer_id: input.customer_id,
            status: input.status,
        }
    }
}

impl Invoice {
    /// Materialize an inserted row under the id the store assigned
    pub fn from_new(id: Uuid, row: NewInvoice) -> Self {
        Self {
            id,
            customer_id: row.customer_id,
            amount: row.amount,
            status: row.status,
            date: row.date,
        }
    }

    /// Apply an update in place, leaving `id` and `date` untouched
    pub fn apply(&mut self, changes: InvoiceChanges) {
        self.customer_id = changes.customer_id;
        self.amount = changes.amount;
        self.status = changes.status;
    }
}
