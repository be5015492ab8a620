//! JSON export / import of the invoice collection.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use invoicer_core::DomainError;
use invoicer_invoicing::InvoiceRecord;
use invoicer_invoicing::reconcile::records_from_value;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("import file is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("invalid import: {0}")]
    Invalid(#[from] DomainError),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode export: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Suggested name for an export taken on `today`.
pub fn export_filename(today: NaiveDate) -> String {
    format!("invoices_{}.json", today.format("%Y-%m-%d"))
}

/// Pretty-printed JSON array of the whole collection.
pub fn export_json(records: &[InvoiceRecord]) -> Result<String, TransferError> {
    serde_json::to_string_pretty(records).map_err(TransferError::Serialize)
}

/// Parse an import payload.
///
/// Rejects anything that is not a JSON array of objects; nothing is merged
/// unless the whole payload reads.
pub fn parse_import(raw: &str) -> Result<Vec<InvoiceRecord>, TransferError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(TransferError::Parse)?;
    Ok(records_from_value(value)?)
}

pub fn read_import(path: &Path) -> Result<Vec<InvoiceRecord>, TransferError> {
    let raw = fs::read_to_string(path).map_err(|source| TransferError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_import(&raw)
}

pub fn write_export(path: &Path, records: &[InvoiceRecord]) -> Result<(), TransferError> {
    let json = export_json(records)?;
    fs::write(path, json).map_err(|source| TransferError::Io {
        path: path.to_path_buf(),
        source,
    })
}
