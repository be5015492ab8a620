//! Load-on-start / save-on-mutation adapter between [`InvoiceBook`] and a
//! [`KeyValueStore`].
//!
//! Loading never fails: a missing, unreadable or undecodable blob falls back
//! to its default and the problem is logged at `warn`. Saving reports errors
//! to the caller.

use serde::Serialize;
use serde::de::DeserializeOwned;

use invoicer_invoicing::{InvoiceBook, InvoiceRecord, SequenceCounter, Settings};

use crate::store::{KeyValueStore, StoreError, StoreResult};

/// Store key of the invoice collection (JSON array, newest first).
pub const INVOICES_KEY: &str = "invoicer_invoices_v1";
/// Store key of the sequence counter (JSON integer).
pub const COUNTER_KEY: &str = "invoicer_counter_v1";
/// Store key of the settings (JSON object).
pub const SETTINGS_KEY: &str = "invoicer_settings_v1";

fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "stored value is not readable; using default");
                T::default()
            }
        },
        Ok(None) => {
            tracing::debug!(key, "nothing stored; using default");
            T::default()
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "store read failed; using default");
            T::default()
        }
    }
}

fn save_json<T, S>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

/// Load the whole application state.
pub fn load_book<S: KeyValueStore + ?Sized>(store: &S) -> InvoiceBook {
    let invoices: Vec<InvoiceRecord> = load_or_default(store, INVOICES_KEY);
    let counter: SequenceCounter = load_or_default(store, COUNTER_KEY);
    let settings: Settings = load_or_default(store, SETTINGS_KEY);

    tracing::debug!(
        invoices = invoices.len(),
        counter = counter.value(),
        "loaded invoice book"
    );
    InvoiceBook::new(invoices, counter, settings)
}

pub fn save_invoices<S: KeyValueStore + ?Sized>(store: &S, book: &InvoiceBook) -> StoreResult<()> {
    save_json(store, INVOICES_KEY, book.invoices())
}

pub fn save_counter<S: KeyValueStore + ?Sized>(store: &S, book: &InvoiceBook) -> StoreResult<()> {
    save_json(store, COUNTER_KEY, &book.counter())
}

pub fn save_settings<S: KeyValueStore + ?Sized>(store: &S, book: &InvoiceBook) -> StoreResult<()> {
    save_json(store, SETTINGS_KEY, book.settings())
}
