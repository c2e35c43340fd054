//! Service trait for invoice persistence

use crate::core::invoice::{Invoice, InvoiceChanges, NewInvoice};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence operations backing the invoice actions
///
/// Every write is a single autocommit statement. Implementations provide no
/// retries and no transaction composition; whatever atomicity the backend
/// gives a single statement is all the actions rely on.
#[async_trait]
pub trait InvoiceService: Send + Sync {
    /// Insert a new invoice and return the id the store assigned
    async fn insert(&self, invoice: NewInvoice) -> Result<Uuid>;

    /// Overwrite customer, amount and status of an invoice
    ///
    /// Updating an id that does not exist affects no rows and is not an error.
    async fn update(&self, id: &Uuid, changes: InvoiceChanges) -> Result<()>;

    /// Remove an invoice; removing a missing id is a no-op
    async fn delete(&self, id: &Uuid) -> Result<()>;

    /// Get an invoice by ID
    async fn get(&self, id: &Uuid) -> Result<Option<Invoice>>;

    /// List all invoices, newest date first
    async fn list(&self) -> Result<Vec<Invoice>>;
}

#[async_trait]
impl<T: InvoiceService + ?Sized> InvoiceService for std::sync::Arc<T> {
    async fn insert(&self, invoice: NewInvoice) -> Result<Uuid> {
        (**self).insert(invoice).await
    }

    async fn update(&self, id: &Uuid, changes: InvoiceChanges) -> Result<()> {
        (**self).update(id, changes).await
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        (**self).delete(id).await
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Invoice>> {
        (**self).get(id).await
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        (**self).list().await
    }
}
