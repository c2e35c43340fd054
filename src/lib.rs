//! # Invoice Actions
//!
//! Server-side actions for a dashboard's invoice forms and credential sign-in.
//!
//! ## Features
//!
//! - **Form Validation**: Field-level errors keyed by form field, in declaration order
//! - **Tagged Outcomes**: Every action reports success, validation failure or persistence failure
//! - **Pluggable Storage**: In-memory and PostgreSQL implementations of `InvoiceService`
//! - **Credential Sign-In**: Argon2 password verification with user-facing error messages
//! - **HTTP Exposure**: Axum routes with cache invalidation and `303` redirects
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoices::prelude::*;
//!
//! let actions = InvoiceActions::new(InMemoryInvoiceService::new());
//!
//! let form = FormData::new()
//!     .with("customerId", "cust-1")
//!     .with("amount", "12.34")
//!     .with("status", "pending");
//!
//! match actions.create_invoice(&ActionState::default(), &form).await {
//!     ActionOutcome::Success(after) => println!("redirect to {:?}", after.redirect),
//!     failure => println!("{:?}", failure.state()),
//! }
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ActionOutcome, ActionState, AfterMutation, AuthActions, AuthError, AuthenticatedUser,
        CredentialsProvider, FieldErrors, FormData, Invoice, InvoiceActions, InvoiceChanges,
        InvoiceInput, InvoiceSchema, InvoiceService, InvoiceStatus, NewInvoice, User, UserStore,
        UserStoreCredentialsProvider,
        error::{InvoicesError, InvoicesResult},
    };

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::{InMemoryInvoiceService, InMemoryUserStore};
    #[cfg(feature = "postgres")]
    pub use crate::storage::{PostgresInvoiceService, PostgresUserStore};

    // === Config ===
    pub use crate::config::{AppConfig, DatabaseConfig, RoutesConfig, ServerConfig, SslMode};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder, ViewCache};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;

    // === Axum ===
    pub use axum::Router;
}
