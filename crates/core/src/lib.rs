//! `invoicer-core`: shared primitives for the invoicer workspace.
//!
//! This crate contains **pure** building blocks (no IO): the domain error
//! model, identifiers, and the numeric coercion rules every amount goes
//! through.

pub mod error;
pub mod id;
pub mod lenient;
pub mod numeric;

pub use error::{DomainError, DomainResult};
pub use id::InvoiceId;
pub use numeric::{coerce_json, coerce_number, money, round2};
