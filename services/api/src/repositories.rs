//! Repositories for invoice persistence
//!
//! Every operation takes the caller's user ID and uses it as part of the
//! lookup key, so a record owned by someone else is indistinguishable from
//! a missing one.

use async_trait::async_trait;
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{Invoice, InvoiceChanges, NewInvoice};

pub mod invoice;
pub mod memory;

pub use invoice::PgInvoiceRepository;
pub use memory::InMemoryInvoiceRepository;

/// Port for ownership-scoped invoice persistence
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// All invoices owned by `owner`
    async fn list(&self, owner: Uuid) -> DatabaseResult<Vec<Invoice>>;

    /// Store a new invoice owned by `owner`, stamping ID and timestamps
    async fn create(&self, owner: Uuid, invoice: &NewInvoice) -> DatabaseResult<Invoice>;

    /// Apply `changes` to the invoice matching `(id, owner)`, if any
    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: &InvoiceChanges,
    ) -> DatabaseResult<Option<Invoice>>;

    /// Remove the invoice matching `(id, owner)` and return it, if any
    async fn delete(&self, owner: Uuid, id: Uuid) -> DatabaseResult<Option<Invoice>>;

    /// Whether the backing store is reachable
    async fn health_check(&self) -> bool;
}
