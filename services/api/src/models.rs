//! API models for request and response payloads

pub mod invoice;

pub use invoice::{Invoice, InvoiceChanges, InvoicePayload, InvoiceStatus, NewInvoice};
