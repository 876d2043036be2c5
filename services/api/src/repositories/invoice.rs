//! PostgreSQL invoice repository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use super::InvoiceRepository;
use crate::models::{Invoice, InvoiceChanges, InvoiceStatus, NewInvoice};

const INVOICE_COLUMNS: &str = "id, invoice_number, client_name, date, amount, status, user_id, created_at, updated_at";

/// Raw invoice row; status is stored as text
#[derive(FromRow)]
struct InvoiceRow {
    id: Uuid,
    invoice_number: String,
    client_name: String,
    date: NaiveDate,
    amount: f64,
    status: String,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = DatabaseError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<InvoiceStatus>()
            .map_err(|e| DatabaseError::CorruptRow(format!("invoice {}: {}", row.id, e)))?;

        Ok(Invoice {
            id: row.id,
            invoice_number: row.invoice_number,
            client_name: row.client_name,
            date: row.date,
            amount: row.amount,
            status,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Invoice repository backed by PostgreSQL
#[derive(Clone)]
pub struct PgInvoiceRepository {
    pool: PgPool,
}

impl PgInvoiceRepository {
    /// Create a new invoice repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceRepository for PgInvoiceRepository {
    async fn list(&self, owner: Uuid) -> DatabaseResult<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
            r#"
            SELECT {INVOICE_COLUMNS}
            FROM invoices
            WHERE user_id = $1
            ORDER BY date DESC, created_at DESC
            "#
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        rows.into_iter().map(Invoice::try_from).collect()
    }

    async fn create(&self, owner: Uuid, invoice: &NewInvoice) -> DatabaseResult<Invoice> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            r#"
            INSERT INTO invoices (id, user_id, invoice_number, client_name, date, amount, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&invoice.invoice_number)
        .bind(&invoice.client_name)
        .bind(invoice.date)
        .bind(invoice.amount)
        .bind(invoice.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        info!("Created invoice {} for user {}", row.id, owner);
        row.try_into()
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: &InvoiceChanges,
    ) -> DatabaseResult<Option<Invoice>> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            r#"
            UPDATE invoices
            SET invoice_number = COALESCE($3, invoice_number),
                client_name = COALESCE($4, client_name),
                date = COALESCE($5, date),
                amount = COALESCE($6, amount),
                status = COALESCE($7, status),
                updated_at = GREATEST(now(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1 AND user_id = $2
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner)
        .bind(changes.invoice_number.as_deref())
        .bind(changes.client_name.as_deref())
        .bind(changes.date)
        .bind(changes.amount)
        .bind(changes.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        row.map(Invoice::try_from).transpose()
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> DatabaseResult<Option<Invoice>> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            r#"
            DELETE FROM invoices
            WHERE id = $1 AND user_id = $2
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        if row.is_some() {
            info!("Deleted invoice {} for user {}", id, owner);
        }
        row.map(Invoice::try_from).transpose()
    }

    async fn health_check(&self) -> bool {
        common::database::health_check(&self.pool).await
    }
}
