//! Key-value persistence boundary.
//!
//! The application keeps three independent JSON blobs (invoices, counter,
//! settings) under fixed keys. This module abstracts where those blobs live
//! without making any assumption about their contents.

pub mod file;
pub mod in_memory;
pub mod r#trait;

pub use file::FileStore;
pub use in_memory::InMemoryStore;
pub use r#trait::{KeyValueStore, StoreError, StoreResult};
