//! Infrastructure layer: key-value storage, state persistence, JSON
//! import/export and the session that ties them to the invoicing domain.

pub mod persist;
pub mod session;
pub mod store;
pub mod transfer;


pub use session::{DraftPreview, InvoicerSession, SessionError, SessionResult};
pub use store::{FileStore, InMemoryStore, KeyValueStore, StoreError, StoreResult};
pub use transfer::TransferError;
