//! Strongly-typed invoice identifier.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of an invoice record.
///
/// Freshly saved invoices get a UUIDv7 string. Imported records keep whatever
/// identifier they were exported with, so this wraps an opaque string rather
/// than a `Uuid`. The default value is the empty identifier, which is what a
/// record imported without an `id` field ends up with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(String);

impl InvoiceId {
    /// Create a new, process-unique identifier.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
    /// for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Uuid> for InvoiceId {
    fn from(value: Uuid) -> Self {
        Self::from_uuid(value)
    }
}

impl From<String> for InvoiceId {
    /// Wrap an identifier exactly as stored (no validation).
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl FromStr for InvoiceId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("InvoiceId: must not be blank"));
        }
        Ok(Self(trimmed.to_string()))
    }
}
