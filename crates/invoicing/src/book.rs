//! Application state and the operations that change it.
//!
//! [`InvoiceBook`] holds the long-lived state (invoice collection newest
//! first, sequence counter, settings) and is mutated only through the
//! methods here. It does no IO; persisting after a
//! mutation is the caller's job.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use invoicer_core::{DomainError, DomainResult, InvoiceId};

use crate::draft::InvoiceDraft;
use crate::reconcile;
use crate::record::{InvoiceRecord, ListRow};
use crate::sequence::SequenceCounter;
use crate::settings::{Settings, SettingsUpdate};

/// Command: save a draft as a new invoice.
///
/// Identity and time are supplied by the caller so saving stays
/// deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveInvoice {
    pub draft: InvoiceDraft,
    pub invoice_id: InvoiceId,
    pub occurred_at: DateTime<Utc>,
}

/// What an import did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records whose id was not present before.
    pub added: usize,
    /// Existing records replaced by an imported one.
    pub replaced: usize,
    /// Collection size after the merge.
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InvoiceBook {
    invoices: Vec<InvoiceRecord>,
    counter: SequenceCounter,
    settings: Settings,
}

impl InvoiceBook {
    pub fn new(invoices: Vec<InvoiceRecord>, counter: SequenceCounter, settings: Settings) -> Self {
        Self {
            invoices,
            counter,
            settings,
        }
    }

    /// All invoices, newest first.
    pub fn invoices(&self) -> &[InvoiceRecord] {
        &self.invoices
    }

    pub fn counter(&self) -> SequenceCounter {
        self.counter
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Number the next saved invoice will get.
    pub fn next_number(&self) -> String {
        self.settings.number_for(self.counter.value())
    }

    /// Save a draft.
    ///
    /// On success the record is prepended to the collection and the counter
    /// has advanced by exactly one. A validation failure changes nothing.
    pub fn save(&mut self, cmd: SaveInvoice) -> DomainResult<&InvoiceRecord> {
        cmd.draft.validate()?;

        let number = self.next_number();
        let record = InvoiceRecord::freeze(
            cmd.draft,
            &self.settings,
            number,
            cmd.invoice_id,
            cmd.occurred_at,
        );

        self.invoices.insert(0, record);
        self.counter.advance();
        Ok(&self.invoices[0])
    }

    /// Delete an invoice by id. The counter is left alone.
    pub fn delete(&mut self, id: &InvoiceId) -> DomainResult<InvoiceRecord> {
        reconcile::remove(&mut self.invoices, id).ok_or_else(|| DomainError::not_found(id.as_str()))
    }

    /// Merge imported records (see [`reconcile::merge`]).
    pub fn import(&mut self, incoming: Vec<InvoiceRecord>) -> ImportSummary {
        let (added, replaced) = {
            let existing_ids: HashSet<&InvoiceId> = self.invoices.iter().map(|r| &r.id).collect();
            let incoming_ids: HashSet<&InvoiceId> = incoming.iter().map(|r| &r.id).collect();
            let replaced = incoming_ids
                .iter()
                .filter(|id| existing_ids.contains(*id))
                .count();
            (incoming_ids.len() - replaced, replaced)
        };

        let existing = std::mem::take(&mut self.invoices);
        self.invoices = reconcile::merge(existing, incoming);

        ImportSummary {
            added,
            replaced,
            total: self.invoices.len(),
        }
    }

    /// Search the collection (see [`reconcile::filter`]).
    pub fn search(&self, query: &str) -> Vec<&InvoiceRecord> {
        reconcile::filter(&self.invoices, query)
    }

    /// List rows for a search, formatted with the current settings.
    pub fn list(&self, query: &str) -> Vec<ListRow> {
        self.search(query)
            .into_iter()
            .map(|r| ListRow::new(r, &self.settings))
            .collect()
    }

    /// Look up by id or invoice number.
    pub fn find(&self, key: &str) -> DomainResult<&InvoiceRecord> {
        reconcile::find(&self.invoices, key).ok_or_else(|| DomainError::not_found(key))
    }

    /// Apply a settings patch. An invalid patch changes nothing.
    pub fn update_settings(&mut self, update: SettingsUpdate) -> DomainResult<()> {
        update.validate()?;
        self.settings.apply(update);
        Ok(())
    }

    /// Restart numbering at 1. Saved invoices keep their numbers.
    pub fn reset_counter(&mut self) {
        self.counter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::LineItem;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0).unwrap()
    }

    fn save_cmd(client: &str, day: u32) -> SaveInvoice {
        let mut draft = InvoiceDraft::new(at(day).date_naive());
        draft.client_name = client.to_string();
        draft.items = vec![LineItem::new("work", 1.0, 100.0)];
        SaveInvoice {
            draft,
            invoice_id: InvoiceId::new(),
            occurred_at: at(day),
        }
    }

    #[test]
    fn consecutive_saves_get_consecutive_numbers() {
        let mut book = InvoiceBook::default();
        let first = book.save(save_cmd("A", 1)).unwrap().number.clone();
        let second = book.save(save_cmd("B", 2)).unwrap().number.clone();

        assert_eq!(first, "INV-0001");
        assert_eq!(second, "INV-0002");
        assert_eq!(book.counter().value(), 3);
        // Newest first.
        assert_eq!(book.invoices()[0].number, "INV-0002");
    }

    #[test]
    fn delete_does_not_give_numbers_back() {
        let mut book = InvoiceBook::default();
        let id = book.save(save_cmd("A", 1)).unwrap().id.clone();
        book.delete(&id).unwrap();

        assert!(book.invoices().is_empty());
        assert_eq!(book.counter().value(), 2);
        assert_eq!(book.save(save_cmd("B", 2)).unwrap().number, "INV-0002");
    }

    #[test]
    fn failed_validation_changes_nothing() {
        let mut book = InvoiceBook::default();
        let before = book.clone();

        let err = book.save(save_cmd("  ", 1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(book, before);
    }

    #[test]
    fn delete_unknown_is_not_found() {
        let mut book = InvoiceBook::default();
        let err = book.delete(&InvoiceId::new()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn settings_changes_only_affect_future_invoices() {
        let mut book = InvoiceBook::default();
        book.save(save_cmd("A", 1)).unwrap();
        book.update_settings(SettingsUpdate {
            prefix: Some("ACME/".to_string()),
            currency: Some("EUR".to_string()),
            ..SettingsUpdate::default()
        })
        .unwrap();
        book.save(save_cmd("B", 2)).unwrap();

        assert_eq!(book.invoices()[0].number, "ACME/0002");
        assert_eq!(book.invoices()[0].currency, "EUR");
        assert_eq!(book.invoices()[1].number, "INV-0001");
        assert_eq!(book.invoices()[1].currency, "$");
    }

    #[test]
    fn invalid_settings_patch_changes_nothing() {
        let mut book = InvoiceBook::default();
        let before = book.clone();
        let err = book
            .update_settings(SettingsUpdate {
                prefix: Some("X-".to_string()),
                padding: Some(70_000),
                ..SettingsUpdate::default()
            })
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(book, before);
    }

    #[test]
    fn reset_counter_restarts_at_one() {
        let mut book = InvoiceBook::default();
        book.save(save_cmd("A", 1)).unwrap();
        book.save(save_cmd("B", 2)).unwrap();
        book.reset_counter();

        assert_eq!(book.next_number(), "INV-0001");
        assert_eq!(book.invoices().len(), 2);
        assert_eq!(book.invoices()[1].number, "INV-0001");
    }

    #[test]
    fn import_reports_added_and_replaced() {
        let mut book = InvoiceBook::default();
        let kept = book.save(save_cmd("A", 1)).unwrap().clone();

        let mut replacement = kept.clone();
        replacement.client_name = "A (imported)".to_string();
        let mut fresh = kept.clone();
        fresh.id = InvoiceId::new();
        fresh.created_at = "2025-02-01T00:00:00.000Z".to_string();

        let summary = book.import(vec![replacement, fresh.clone()]);
        assert_eq!(
            summary,
            ImportSummary {
                added: 1,
                replaced: 1,
                total: 2
            }
        );
        assert_eq!(book.invoices()[0].id, fresh.id);
        assert_eq!(book.invoices()[1].client_name, "A (imported)");
        assert_eq!(book.counter().value(), 2);
    }

    #[test]
    fn list_and_find() {
        let mut book = InvoiceBook::default();
        book.save(save_cmd("Acme", 1)).unwrap();
        book.save(save_cmd("Globex", 2)).unwrap();

        let rows = book.list("acme");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].number, "INV-0001");
        assert_eq!(rows[0].total, "$ 100.00");

        assert_eq!(book.find("inv-0002").unwrap().client_name, "Globex");
        assert!(matches!(book.find("missing"), Err(DomainError::NotFound(_))));
    }
}
