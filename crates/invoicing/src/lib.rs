//! Invoicing domain module.
//!
//! Business rules for invoices: numbering, totals, record freezing and
//! collection reconciliation. Pure domain logic with no IO and no clock
//! reads.

pub mod book;
pub mod draft;
pub mod line_item;
pub mod print;
pub mod reconcile;
pub mod record;
pub mod sequence;
pub mod settings;
pub mod totals;

pub use book::{ImportSummary, InvoiceBook, SaveInvoice};
pub use draft::InvoiceDraft;
pub use line_item::{LineItem, LineItemField};
pub use record::{InvoiceRecord, ListRow};
pub use sequence::{DEFAULT_PREFIX, MAX_PADDING, SequenceCounter, next_number};
pub use settings::{Settings, SettingsUpdate};
pub use totals::{Totals, compute};
