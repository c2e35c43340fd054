//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresInvoiceService` and `PostgresUserStore` backed by a
//! PostgreSQL database via `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! invoice-actions = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! Invoices live in an `invoices` table (`id, customer_id, amount, status,
//! date`) and accounts in a `users` table. Both are created by the
//! migrations under `migrations/`, applied with [`ensure_schema`].
//!
//! Every mutation is a single parameterized autocommit statement; there are
//! no explicit transactions.

use crate::config::{DatabaseConfig, SslMode};
use crate::core::credentials::{User, UserStore};
use crate::core::error::{ConfigError, InvoicesResult, StorageError};
use crate::core::invoice::{Invoice, InvoiceChanges, InvoiceStatus, NewInvoice};
use crate::core::service::InvoiceService;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

pub const INSERT_INVOICE: &str = "INSERT INTO invoices (customer_id, amount, status, date) \
     VALUES ($1, $2, $3, $4) RETURNING id";
pub const UPDATE_INVOICE: &str =
    "UPDATE invoices SET customer_id = $1, amount = $2, status = $3 WHERE id = $4";
pub const DELETE_INVOICE: &str = "DELETE FROM invoices WHERE id = $1";

const SELECT_INVOICE: &str = "SELECT id, customer_id, amount, status, date FROM invoices";

type InvoiceRow = (Uuid, String, i64, String, NaiveDate);

// ---------------------------------------------------------------------------
// Connection and schema management
// ---------------------------------------------------------------------------

/// Open a connection pool as described by `config`
///
/// The transport security follows `config.ssl_mode`, `require` unless
/// configured otherwise. A missing or malformed URL is a configuration error;
/// an unreachable server is a storage connection error.
pub async fn connect(config: &DatabaseConfig) -> InvoicesResult<PgPool> {
    let url = config.require_url()?;

    let ssl_mode = match config.ssl_mode {
        SslMode::Disable => PgSslMode::Disable,
        SslMode::Prefer => PgSslMode::Prefer,
        SslMode::Require => PgSslMode::Require,
    };

    let options = PgConnectOptions::from_str(url)
        .map_err(|e| ConfigError::ParseError {
            file: None,
            message: format!("invalid database URL: {}", e),
        })?
        .ssl_mode(ssl_mode);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await
        .map_err(|e| StorageError::ConnectionError {
            backend: "PostgreSQL".to_string(),
            message: e.to_string(),
        })?;

    tracing::info!(
        max_connections = config.max_connections,
        ssl_mode = ?config.ssl_mode,
        "Connected to PostgreSQL"
    );

    Ok(pool)
}

/// Apply the bundled migrations (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| anyhow!("Failed to run migrations: {}", e))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// PostgresInvoiceService
// ---------------------------------------------------------------------------

/// Invoice storage service backed by PostgreSQL.
///
/// # Example
///
/// ```rust,ignore
/// use invoices::storage::PostgresInvoiceService;
///
/// let pool = invoices::storage::postgres::connect(&config.database).await?;
/// let service = PostgresInvoiceService::new(pool);
/// let actions = InvoiceActions::new(service);
/// ```
#[derive(Clone, Debug)]
pub struct PostgresInvoiceService {
    pool: PgPool,
}

impl PostgresInvoiceService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn reconstruct_invoice(row: InvoiceRow) -> Result<Invoice> {
        let (id, customer_id, amount, status, date) = row;
        let status = InvoiceStatus::from_str(&status)
            .map_err(|e| anyhow!("Invalid invoice row {}: {}", id, e))?;

        Ok(Invoice {
            id,
            customer_id,
            amount,
            status,
            date,
        })
    }
}

#[async_trait]
impl InvoiceService for PostgresInvoiceService {
    async fn insert(&self, invoice: NewInvoice) -> Result<Uuid> {
        let (id,): (Uuid,) = sqlx::query_as(INSERT_INVOICE)
            .bind(&invoice.customer_id)
            .bind(invoice.amount)
            .bind(invoice.status.as_str())
            .bind(invoice.date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to insert invoice: {}", e))?;

        Ok(id)
    }

    async fn update(&self, id: &Uuid, changes: InvoiceChanges) -> Result<()> {
        sqlx::query(UPDATE_INVOICE)
            .bind(&changes.customer_id)
            .bind(changes.amount)
            .bind(changes.status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to update invoice: {}", e))?;

        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        sqlx::query(DELETE_INVOICE)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to delete invoice: {}", e))?;

        Ok(())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Invoice>> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!("{} WHERE id = $1", SELECT_INVOICE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to get invoice: {}", e))?;

        row.map(Self::reconstruct_invoice).transpose()
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
            "{} ORDER BY date DESC, id ASC",
            SELECT_INVOICE
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to list invoices: {}", e))?;

        rows.into_iter().map(Self::reconstruct_invoice).collect()
    }
}

// ---------------------------------------------------------------------------
// PostgresUserStore
// ---------------------------------------------------------------------------

/// User lookup backed by the `users` table
#[derive(Clone, Debug)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user, replacing name and hash when the email already exists
    pub async fn upsert(&self, user: &User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (email) DO UPDATE SET name = EXCLUDED.name, password = EXCLUDED.password",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to upsert user: {}", e))?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, (Uuid, String, String, String)>(
            "SELECT id, name, email, password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to fetch user: {}", e))?;

        Ok(row.map(|(id, name, email, password_hash)| User {
            id,
            name,
            email,
            password_hash,
        }))
    }
}
