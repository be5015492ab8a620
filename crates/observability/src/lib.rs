//! Logging setup shared by the invoicer binaries.

/// Initialize process-wide logging with the format taken from the
/// environment (see [`tracing::LogFormat::from_env`]).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Tracing configuration (filters, formats).
pub mod tracing;
