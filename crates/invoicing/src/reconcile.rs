//! Collection-level rules: search, import merge, deletion, lookup.

use std::cmp::Reverse;
use std::collections::HashMap;

use serde_json::Value;

use invoicer_core::{DomainError, DomainResult, InvoiceId};

use crate::record::InvoiceRecord;

/// Does `record` match an already lower-cased, trimmed `needle`?
///
/// Searched fields: number, client name, client address, date, due date and
/// the total in its plain decimal form (`137.5`, not `137.50`). A zero total
/// counts as empty and is not searched.
pub fn matches(record: &InvoiceRecord, needle: &str) -> bool {
    let total = if record.total == 0.0 {
        String::new()
    } else {
        record.total.to_string()
    };
    [
        record.number.as_str(),
        record.client_name.as_str(),
        record.client_address.as_str(),
        record.date.as_str(),
        record.due_date.as_str(),
        total.as_str(),
    ]
    .into_iter()
    .filter(|field| !field.is_empty())
    .any(|field| field.to_lowercase().contains(needle))
}

/// Case-insensitive substring search.
///
/// A blank query returns every record; order is always preserved.
pub fn filter<'a>(records: &'a [InvoiceRecord], query: &str) -> Vec<&'a InvoiceRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records.iter().filter(|r| matches(r, &needle)).collect()
}

/// Merge imported records into the existing collection.
///
/// Records are keyed by `id`. On a collision the incoming record replaces the
/// existing one outright, whatever either timestamp says. The result is
/// sorted newest first by `createdAt`; unreadable timestamps count as the
/// epoch and sink to the end. Ties keep their first-seen order.
pub fn merge(existing: Vec<InvoiceRecord>, incoming: Vec<InvoiceRecord>) -> Vec<InvoiceRecord> {
    let mut merged: Vec<InvoiceRecord> = Vec::with_capacity(existing.len() + incoming.len());
    let mut positions: HashMap<InvoiceId, usize> = HashMap::new();

    for record in existing.into_iter().chain(incoming) {
        match positions.get(&record.id) {
            Some(&pos) => merged[pos] = record,
            None => {
                positions.insert(record.id.clone(), merged.len());
                merged.push(record);
            }
        }
    }

    merged.sort_by_cached_key(|r| Reverse(r.created_at_millis()));
    merged
}

/// Remove the record with `id`, returning it.
pub fn remove(records: &mut Vec<InvoiceRecord>, id: &InvoiceId) -> Option<InvoiceRecord> {
    let pos = records.iter().position(|r| &r.id == id)?;
    Some(records.remove(pos))
}

/// Look a record up by exact id, falling back to a case-insensitive number.
pub fn find<'a>(records: &'a [InvoiceRecord], key: &str) -> Option<&'a InvoiceRecord> {
    let key = key.trim();
    records
        .iter()
        .find(|r| r.id.as_str() == key)
        .or_else(|| records.iter().find(|r| r.number.eq_ignore_ascii_case(key)))
}

/// Validate an import payload and read it as records.
///
/// The payload must be a JSON array whose elements are objects. Fields inside
/// each object are not checked (see [`InvoiceRecord`]).
pub fn records_from_value(value: Value) -> DomainResult<Vec<InvoiceRecord>> {
    let Value::Array(items) = value else {
        return Err(DomainError::validation(
            "import must be a JSON array of invoices",
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(DomainError::validation(format!(
                    "import entry {index} is not an invoice object"
                )));
            }
            serde_json::from_value(item).map_err(|e| {
                DomainError::validation(format!("import entry {index}: {e}"))
            })
        })
        .collect()
}
