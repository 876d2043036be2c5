//! Invoice models for the API service

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Longest accepted invoice number or client name
const MAX_TEXT_LEN: usize = 200;

/// Payment status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Paid,
    Unpaid,
    #[default]
    Pending,
}

impl InvoiceStatus {
    /// Stored and serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Unpaid => "Unpaid",
            InvoiceStatus::Pending => "Pending",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Paid" => Ok(InvoiceStatus::Paid),
            "Unpaid" => Ok(InvoiceStatus::Unpaid),
            "Pending" => Ok(InvoiceStatus::Pending),
            other => Err(format!(
                "Invalid status '{}': expected Paid, Unpaid or Pending",
                other
            )),
        }
    }
}

/// Invoice entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub invoice_number: String,
    pub client_name: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub status: InvoiceStatus,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a new invoice
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub client_name: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub status: InvoiceStatus,
}

/// Validated partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceChanges {
    pub invoice_number: Option<String>,
    pub client_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub status: Option<InvoiceStatus>,
}

impl InvoiceChanges {
    /// Apply the changes onto an invoice in place
    pub fn apply_to(&self, invoice: &mut Invoice) {
        if let Some(invoice_number) = &self.invoice_number {
            invoice.invoice_number = invoice_number.clone();
        }
        if let Some(client_name) = &self.client_name {
            invoice.client_name = client_name.clone();
        }
        if let Some(date) = self.date {
            invoice.date = date;
        }
        if let Some(amount) = self.amount {
            invoice.amount = amount;
        }
        if let Some(status) = self.status {
            invoice.status = status;
        }
    }
}

/// Invoice fields as sent by the client
///
/// Server-owned fields (`_id`, `userId`, `createdAt`, `updatedAt`) are not
/// part of the payload and are ignored if present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayload {
    pub invoice_number: Option<String>,
    pub client_name: Option<String>,
    pub date: Option<String>,
    pub amount: Option<f64>,
    pub status: Option<String>,
}

impl InvoicePayload {
    /// Validate a create request
    ///
    /// Number, client and amount are required. A missing date means today
    /// (UTC) and a missing status means `Pending`.
    pub fn into_new_invoice(self) -> Result<NewInvoice, String> {
        let invoice_number = self
            .invoice_number
            .ok_or_else(|| "Invoice number is required".to_string())?;
        let client_name = self
            .client_name
            .ok_or_else(|| "Client name is required".to_string())?;
        let amount = self.amount.ok_or_else(|| "Amount is required".to_string())?;

        Ok(NewInvoice {
            invoice_number: validate_text("Invoice number", invoice_number)?,
            client_name: validate_text("Client name", client_name)?,
            date: match self.date.as_deref() {
                Some(date) => parse_date(date)?,
                None => Utc::now().date_naive(),
            },
            amount: validate_amount(amount)?,
            status: self
                .status
                .as_deref()
                .map(str::parse::<InvoiceStatus>)
                .transpose()?
                .unwrap_or_default(),
        })
    }

    /// Validate an update request; every field is optional
    pub fn into_changes(self) -> Result<InvoiceChanges, String> {
        Ok(InvoiceChanges {
            invoice_number: self
                .invoice_number
                .map(|v| validate_text("Invoice number", v))
                .transpose()?,
            client_name: self
                .client_name
                .map(|v| validate_text("Client name", v))
                .transpose()?,
            date: self.date.as_deref().map(parse_date).transpose()?,
            amount: self.amount.map(validate_amount).transpose()?,
            status: self
                .status
                .as_deref()
                .map(str::parse::<InvoiceStatus>)
                .transpose()?,
        })
    }
}

/// Reject blank or oversized text; the value itself is kept verbatim
fn validate_text(field: &str, value: String) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(format!(
            "{} must be at most {} characters long",
            field, MAX_TEXT_LEN
        ));
    }

    Ok(value)
}

fn validate_amount(amount: f64) -> Result<f64, String> {
    if !amount.is_finite() || amount < 0.0 {
        return Err("Amount must be a non-negative number".to_string());
    }

    Ok(amount)
}

/// Accept `YYYY-MM-DD` or an RFC 3339 timestamp (date taken in UTC)
fn parse_date(value: &str) -> Result<NaiveDate, String> {
    let value = value.trim();

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| {
            DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc).date_naive())
        })
        .map_err(|_| format!("Invalid date '{}': expected an ISO-8601 date", value))
}
