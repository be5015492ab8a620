//! A running invoicer: the in-memory [`InvoiceBook`] bound to a store.
//!
//! Every mutation updates memory first and then persists the affected keys.
//! If the write fails the in-memory state is kept and the error is returned,
//! so the caller can warn that the change may not survive a restart.

use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;

use invoicer_core::{DomainError, InvoiceId};
use invoicer_invoicing::{
    ImportSummary, InvoiceBook, InvoiceDraft, InvoiceRecord, ListRow, SaveInvoice, SettingsUpdate,
    Totals,
};

use crate::persist;
use crate::store::{KeyValueStore, StoreError};
use crate::transfer::{self, TransferError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("change applied but not saved: {0}")]
    Store(#[from] StoreError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Preview of a draft against the current settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftPreview {
    pub number: String,
    pub totals: Totals,
}

pub struct InvoicerSession<S: KeyValueStore> {
    store: S,
    book: InvoiceBook,
}

impl<S: KeyValueStore> InvoicerSession<S> {
    /// Load state from `store`. Unreadable blobs load as defaults.
    pub fn open(store: S) -> Self {
        let book = persist::load_book(&store);
        tracing::info!(
            invoices = book.invoices().len(),
            next_number = %book.next_number(),
            "invoicer session opened"
        );
        Self { store, book }
    }

    pub fn book(&self) -> &InvoiceBook {
        &self.book
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number and totals the draft would get if saved now. Nothing changes.
    pub fn preview(&self, draft: &InvoiceDraft) -> DraftPreview {
        DraftPreview {
            number: self.book.next_number(),
            totals: draft.totals(),
        }
    }

    /// Save a draft with a fresh id and the current time.
    pub fn save_invoice(&mut self, draft: InvoiceDraft) -> SessionResult<InvoiceRecord> {
        self.save(SaveInvoice {
            draft,
            invoice_id: InvoiceId::new(),
            occurred_at: Utc::now(),
        })
    }

    pub fn save(&mut self, cmd: SaveInvoice) -> SessionResult<InvoiceRecord> {
        let record = self.book.save(cmd)?.clone();
        tracing::info!(
            invoice_id = %record.id,
            number = %record.number,
            total = record.total,
            "invoice saved"
        );

        // Counter first: a failed invoices write then leaves a gap in the
        // numbering instead of a number that is handed out twice.
        persist::save_counter(&self.store, &self.book)?;
        persist::save_invoices(&self.store, &self.book)?;
        Ok(record)
    }

    pub fn delete(&mut self, id: &InvoiceId) -> SessionResult<InvoiceRecord> {
        let removed = self.book.delete(id)?;
        tracing::info!(invoice_id = %removed.id, number = %removed.number, "invoice deleted");

        persist::save_invoices(&self.store, &self.book)?;
        Ok(removed)
    }

    /// Delete by id or invoice number.
    pub fn delete_by_key(&mut self, key: &str) -> SessionResult<InvoiceRecord> {
        let id = self.book.find(key)?.id.clone();
        self.delete(&id)
    }

    /// Merge a JSON export into the collection.
    ///
    /// A payload that fails to parse or validate leaves the collection
    /// untouched.
    pub fn import_json(&mut self, raw: &str) -> SessionResult<ImportSummary> {
        let incoming = transfer::parse_import(raw)?;
        self.merge(incoming)
    }

    pub fn import_file(&mut self, path: &Path) -> SessionResult<ImportSummary> {
        let incoming = transfer::read_import(path)?;
        self.merge(incoming)
    }

    fn merge(&mut self, incoming: Vec<InvoiceRecord>) -> SessionResult<ImportSummary> {
        let summary = self.book.import(incoming);
        tracing::info!(
            added = summary.added,
            replaced = summary.replaced,
            total = summary.total,
            "invoices imported"
        );

        persist::save_invoices(&self.store, &self.book)?;
        Ok(summary)
    }

    pub fn export_json(&self) -> SessionResult<String> {
        Ok(transfer::export_json(self.book.invoices())?)
    }

    /// Write the whole collection to `path`.
    pub fn export_to(&self, path: &Path) -> SessionResult<usize> {
        transfer::write_export(path, self.book.invoices())?;
        let count = self.book.invoices().len();
        tracing::info!(path = %path.display(), invoices = count, "invoices exported");
        Ok(count)
    }

    /// Suggested export file name for the moment `now`.
    pub fn export_filename(now: DateTime<Utc>) -> String {
        transfer::export_filename(now.date_naive())
    }

    pub fn update_settings(&mut self, update: SettingsUpdate) -> SessionResult<()> {
        if update.is_empty() {
            return Ok(());
        }
        self.book.update_settings(update)?;
        tracing::info!(next_number = %self.book.next_number(), "settings updated");

        persist::save_settings(&self.store, &self.book)?;
        Ok(())
    }

    /// Restart numbering at 1. Callers confirm with the user first.
    pub fn reset_counter(&mut self) -> SessionResult<()> {
        self.book.reset_counter();
        tracing::warn!("invoice counter reset to 1");

        persist::save_counter(&self.store, &self.book)?;
        Ok(())
    }

    pub fn list(&self, query: &str) -> Vec<ListRow> {
        self.book.list(query)
    }

    pub fn find(&self, key: &str) -> SessionResult<&InvoiceRecord> {
        Ok(self.book.find(key)?)
    }
}
