//! Validated invoice mutations
//!
//! Each action validates its input, issues exactly one statement through the
//! injected [`InvoiceService`] and reports a tagged [`ActionOutcome`]. The
//! actions never navigate on their own: a successful outcome names the view
//! to invalidate and, where applicable, the route to redirect to, and the
//! caller decides what to do with them.

use crate::core::form::FormData;
use crate::core::invoice::{InvoiceChanges, NewInvoice, today};
use crate::core::service::InvoiceService;
use crate::core::validation::{FieldErrors, InvoiceSchema};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default route of the invoice list view
pub const INVOICES_PATH: &str = "/dashboard/invoices";

pub const CREATE_VALIDATION_MESSAGE: &str = "Missing Fields. Failed to Create Invoice.";
pub const UPDATE_VALIDATION_MESSAGE: &str = "Missing Fields. Failed to Update Invoice.";
pub const CREATE_DATABASE_MESSAGE: &str = "Database Error: Failed to Create Invoice.";
pub const UPDATE_DATABASE_MESSAGE: &str = "Database Error: Failed to Update Invoice.";
pub const DELETE_DATABASE_MESSAGE: &str = "Database Error: Failed to Delete Invoice.";

/// Form state handed back to the client
///
/// Wire shape: `{ "errors"?: { field: [messages] }, "message"?: string | null }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Host-side effects requested by a successful mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AfterMutation {
    /// Cached view that must be recomputed
    pub revalidate: String,
    /// Route the client should be sent to, if any
    pub redirect: Option<String>,
}

/// Result of a mutation action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Success(AfterMutation),
    ValidationFailure { errors: FieldErrors, message: String },
    PersistenceFailure { message: String },
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Success(_))
    }

    /// The form state to render; empty on success
    pub fn state(&self) -> ActionState {
        match self {
            ActionOutcome::Success(_) => ActionState::default(),
            ActionOutcome::ValidationFailure { errors, message } => ActionState {
                errors: Some(errors.clone()),
                message: Some(message.clone()),
            },
            ActionOutcome::PersistenceFailure { message } => ActionState {
                errors: None,
                message: Some(message.clone()),
            },
        }
    }
}

/// The create/update/delete actions over an injected invoice service
#[derive(Clone)]
pub struct InvoiceActions<S> {
    service: S,
    schema: InvoiceSchema,
    list_path: String,
    clock: fn() -> NaiveDate,
}

impl<S: InvoiceService> InvoiceActions<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            schema: InvoiceSchema,
            list_path: INVOICES_PATH.to_string(),
            clock: today,
        }
    }

    /// Route of the list view to revalidate and redirect to
    pub fn with_list_path(mut self, path: impl Into<String>) -> Self {
        self.list_path = path.into();
        self
    }

    /// Source of the creation date, the current UTC date by default
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn list_path(&self) -> &str {
        &self.list_path
    }

    /// Create an invoice from a submitted form
    ///
    /// `_prev` is the state previously rendered for this form; it is accepted
    /// so form handlers can thread it through but it never affects the result.
    pub async fn create_invoice(&self, _prev: &ActionState, form: &FormData) -> ActionOutcome {
        let input = match self.schema.parse(form) {
            Ok(input) => input,
            Err(errors) => {
                return ActionOutcome::ValidationFailure {
                    errors,
                    message: CREATE_VALIDATION_MESSAGE.to_string(),
                };
            }
        };

        let row = NewInvoice::from_input(input, (self.clock)());
        match self.service.insert(row).await {
            Ok(id) => {
                tracing::info!(invoice_id = %id, "Invoice created");
                self.redirect_to_list()
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create invoice");
                ActionOutcome::PersistenceFailure {
                    message: CREATE_DATABASE_MESSAGE.to_string(),
                }
            }
        }
    }

    /// Update customer, amount and status of an invoice
    pub async fn update_invoice(
        &self,
        id: &Uuid,
        _prev: &ActionState,
        form: &FormData,
    ) -> ActionOutcome {
        let input = match self.schema.parse(form) {
            Ok(input) => input,
            Err(errors) => {
                return ActionOutcome::ValidationFailure {
                    errors,
                    message: UPDATE_VALIDATION_MESSAGE.to_string(),
                };
            }
        };

        match self.service.update(id, InvoiceChanges::from(input)).await {
            Ok(()) => {
                tracing::info!(invoice_id = %id, "Invoice updated");
                self.redirect_to_list()
            }
            Err(e) => {
                tracing::error!(invoice_id = %id, error = %e, "Failed to update invoice");
                ActionOutcome::PersistenceFailure {
                    message: UPDATE_DATABASE_MESSAGE.to_string(),
                }
            }
        }
    }

    /// Delete an invoice; the id is trusted and a missing one is not an error
    pub async fn delete_invoice(&self, id: &Uuid) -> ActionOutcome {
        match self.service.delete(id).await {
            Ok(()) => {
                tracing::info!(invoice_id = %id, "Invoice deleted");
                ActionOutcome::Success(AfterMutation {
                    revalidate: self.list_path.clone(),
                    redirect: None,
                })
            }
            Err(e) => {
                tracing::error!(invoice_id = %id, error = %e, "Failed to delete invoice");
                ActionOutcome::PersistenceFailure {
                    message: DELETE_DATABASE_MESSAGE.to_string(),
                }
            }
        }
    }

    fn redirect_to_list(&self) -> ActionOutcome {
        ActionOutcome::Success(AfterMutation {
            revalidate: self.list_path.clone(),
            redirect: Some(self.list_path.clone()),
        })
    }
}
