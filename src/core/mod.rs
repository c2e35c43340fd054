//! Core module containing the invoice model, validation and actions

pub mod actions;
pub mod auth;
pub mod credentials;
pub mod error;
pub mod form;
pub mod invoice;
pub mod service;
pub mod validation;

pub use actions::{ActionOutcome, ActionState, AfterMutation, InvoiceActions};
pub use auth::{AuthActions, AuthError, AuthenticatedUser, CredentialsProvider};
pub use credentials::{User, UserStore, UserStoreCredentialsProvider};
pub use form::FormData;
pub use invoice::{Invoice, InvoiceChanges, InvoiceInput, InvoiceStatus, NewInvoice};
pub use service::InvoiceService;
pub use validation::{FieldErrors, InvoiceSchema};
