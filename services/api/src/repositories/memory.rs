//! In-memory invoice repository

use async_trait::async_trait;
use chrono::{Duration, Utc};
use common::error::DatabaseResult;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::InvoiceRepository;
use crate::models::{Invoice, InvoiceChanges, NewInvoice};

/// Invoice repository kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryInvoiceRepository {
    invoices: RwLock<HashMap<Uuid, Invoice>>,
}

impl InMemoryInvoiceRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn list(&self, owner: Uuid) -> DatabaseResult<Vec<Invoice>> {
        let invoices = self.invoices.read().await;

        let mut owned: Vec<Invoice> = invoices
            .values()
            .filter(|invoice| invoice.user_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        Ok(owned)
    }

    async fn create(&self, owner: Uuid, invoice: &NewInvoice) -> DatabaseResult<Invoice> {
        let now = Utc::now();
        let invoice = Invoice {
            id: Uuid::new_v4(),
            invoice_number: invoice.invoice_number.clone(),
            client_name: invoice.client_name.clone(),
            date: invoice.date,
            amount: invoice.amount,
            status: invoice.status,
            user_id: owner,
            created_at: now,
            updated_at: now,
        };

        self.invoices
            .write()
            .await
            .insert(invoice.id, invoice.clone());

        Ok(invoice)
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: &InvoiceChanges,
    ) -> DatabaseResult<Option<Invoice>> {
        let mut invoices = self.invoices.write().await;

        let Some(invoice) = invoices
            .get_mut(&id)
            .filter(|invoice| invoice.user_id == owner)
        else {
            return Ok(None);
        };

        changes.apply_to(invoice);
        invoice.updated_at = Utc::now().max(invoice.updated_at + Duration::microseconds(1));

        Ok(Some(invoice.clone()))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> DatabaseResult<Option<Invoice>> {
        let mut invoices = self.invoices.write().await;

        match invoices.get(&id) {
            Some(invoice) if invoice.user_id == owner => Ok(invoices.remove(&id)),
            _ => Ok(None),
        }
    }

    async fn health_check(&self) -> bool {
        true
    }
}
