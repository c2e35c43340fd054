//! Typed error handling for the invoice service
//!
//! Action outcomes carry their own user-facing messages (see
//! [`crate::core::actions`]); the types here cover everything around them:
//! request parsing, lookups, storage and configuration.
//!
//! # Error Categories
//!
//! - [`InvoiceError`]: Errors related to invoice lookups
//! - [`ValidationError`]: Errors related to request input
//! - [`StorageError`]: Errors related to storage backends
//! - [`ConfigError`]: Errors related to configuration loading
//! - [`RequestError`]: Errors related to HTTP requests
//!
//! # Example
//!
//! ```rust,ignore
//! use invoices::core::error::{InvoicesError, InvoiceError};
//!
//! async fn fetch(service: &impl InvoiceService, id: Uuid) -> Result<Invoice, InvoicesError> {
//!     service
//!         .get(&id)
//!         .await?
//!         .ok_or(InvoicesError::Invoice(InvoiceError::NotFound { id }))
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The main error type of the crate
#[derive(Debug)]
pub enum InvoicesError {
    /// Invoice lookup errors
    Invoice(InvoiceError),

    /// Input validation errors
    Validation(ValidationError),

    /// Storage backend errors
    Storage(StorageError),

    /// Configuration errors
    Config(ConfigError),

    /// HTTP/Request errors
    Request(RequestError),
}

impl fmt::Display for InvoicesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoicesError::Invoice(e) => write!(f, "{}", e),
            InvoicesError::Validation(e) => write!(f, "{}", e),
            InvoicesError::Storage(e) => write!(f, "{}", e),
            InvoicesError::Config(e) => write!(f, "{}", e),
            InvoicesError::Request(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for InvoicesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InvoicesError::Invoice(e) => Some(e),
            InvoicesError::Validation(e) => Some(e),
            InvoicesError::Storage(e) => Some(e),
            InvoicesError::Config(e) => Some(e),
            InvoicesError::Request(e) => Some(e),
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl InvoicesError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            InvoicesError::Invoice(e) => e.status_code(),
            InvoicesError::Validation(_) => StatusCode::BAD_REQUEST,
            InvoicesError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            InvoicesError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            InvoicesError::Request(e) => e.status_code(),
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            InvoicesError::Invoice(e) => e.error_code(),
            InvoicesError::Validation(_) => "VALIDATION_ERROR",
            InvoicesError::Storage(_) => "STORAGE_ERROR",
            InvoicesError::Config(_) => "CONFIG_ERROR",
            InvoicesError::Request(e) => e.error_code(),
        }
    }

    /// Convert to an error response
    ///
    /// Storage and configuration failures are reported generically; their
    /// details only go to the log.
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            InvoicesError::Storage(_) | InvoicesError::Config(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        ErrorResponse {
            code: self.error_code().to_string(),
            message,
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            InvoicesError::Invoice(InvoiceError::NotFound { id }) => {
                Some(serde_json::json!({ "id": id.to_string() }))
            }
            InvoicesError::Validation(ValidationError::InvalidId { value }) => {
                Some(serde_json::json!({ "value": value }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for InvoicesError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Invoice Errors
// =============================================================================

/// Errors related to invoice lookups
#[derive(Debug)]
pub enum InvoiceError {
    /// Invoice was not found
    NotFound { id: Uuid },
}

impl fmt::Display for InvoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceError::NotFound { id } => write!(f, "Invoice with id '{}' not found", id),
        }
    }
}

impl std::error::Error for InvoiceError {}

impl InvoiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            InvoiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            InvoiceError::NotFound { .. } => "INVOICE_NOT_FOUND",
        }
    }
}

impl From<InvoiceError> for InvoicesError {
    fn from(err: InvoiceError) -> Self {
        InvoicesError::Invoice(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to request input
#[derive(Debug)]
pub enum ValidationError {
    /// Identifier is not a valid UUID
    InvalidId { value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidId { value } => {
                write!(f, "Invalid invoice id: '{}'", value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for InvoicesError {
    fn from(err: ValidationError) -> Self {
        InvoicesError::Validation(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug)]
pub enum StorageError {
    /// Connection error
    ConnectionError { backend: String, message: String },

    /// Query execution error
    QueryError { backend: String, message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionError { backend, message } => {
                write!(f, "Failed to connect to {}: {}", backend, message)
            }
            StorageError::QueryError { backend, message } => {
                write!(f, "{} query error: {}", backend, message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for InvoicesError {
    fn from(err: StorageError) -> Self {
        InvoicesError::Storage(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Missing required field in configuration
    MissingField { field: String, context: String },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::MissingField { field, context } => {
                write!(f, "Missing required field '{}' in {}", field, context)
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for InvoicesError {
    fn from(err: ConfigError) -> Self {
        InvoicesError::Config(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug)]
pub enum RequestError {
    /// Form body could not be decoded
    InvalidBody { message: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidBody { message } => {
                write!(f, "Invalid request body: {}", message)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidBody { .. } => "INVALID_BODY",
        }
    }
}

impl From<RequestError> for InvoicesError {
    fn from(err: RequestError) -> Self {
        InvoicesError::Request(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

/// Storage traits report `anyhow::Error`; anything reaching a handler that
/// way is a backend failure
impl From<anyhow::Error> for InvoicesError {
    fn from(err: anyhow::Error) -> Self {
        InvoicesError::Storage(StorageError::QueryError {
            backend: "invoices".to_string(),
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for invoice operations
pub type InvoicesResult<T> = Result<T, InvoicesError>;

// =============================================================================
// Tests
// =============================================================================
