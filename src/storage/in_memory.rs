//! In-memory invoice and user storage for testing and development

use crate::core::credentials::{User, UserStore};
use crate::core::invoice::{Invoice, InvoiceChanges, NewInvoice};
use crate::core::service::InvoiceService;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory invoice service implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// clones share the same table.
#[derive(Clone)]
pub struct InMemoryInvoiceService {
    invoices: Arc<RwLock<HashMap<Uuid, Invoice>>>,
}

impl InMemoryInvoiceService {
    /// Create a new, empty in-memory invoice service
    pub fn new() -> Self {
        Self {
            invoices: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryInvoiceService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InvoiceService for InMemoryInvoiceService {
    async fn insert(&self, invoice: NewInvoice) -> Result<Uuid> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let id = Uuid::new_v4();
        invoices.insert(id, Invoice::from_new(id, invoice));

        Ok(id)
    }

    async fn update(&self, id: &Uuid, changes: InvoiceChanges) -> Result<()> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if let Some(invoice) = invoices.get_mut(id) {
            invoice.apply(changes);
        }

        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        invoices.remove(id);

        Ok(())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Invoice>> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(invoices.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut all: Vec<Invoice> = invoices.values().cloned().collect();
        all.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

        Ok(all)
    }
}

/// In-memory user store keyed by email
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the user registered under `user.email`
    pub fn add(&self, user: User) -> Result<()> {
        let mut users = self
            .users
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        users.insert(user.email.clone(), user);

        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(users.get(email).cloned())
    }
}
