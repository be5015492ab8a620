//! Invoice numbering.
//!
//! A number is `prefix + zero-padded counter`. Formatting is pure; the
//! counter itself is advanced by [`crate::InvoiceBook::save`] exactly once per
//! saved invoice, and deleting an invoice never gives its number back.

use serde::{Deserialize, Serialize};

/// Prefix used when the configured one is empty.
pub const DEFAULT_PREFIX: &str = "INV-";

/// Widest zero-padding honoured; larger widths are clamped to this.
pub const MAX_PADDING: usize = 32;

/// Format the invoice number for `counter`.
///
/// The counter is left-padded with `'0'` to at least `padding` digits and is
/// never truncated when it is already wider. `padding` is capped at
/// [`MAX_PADDING`].
pub fn next_number(counter: u64, prefix: &str, padding: usize) -> String {
    let prefix = if prefix.is_empty() {
        DEFAULT_PREFIX
    } else {
        prefix
    };
    let padding = padding.min(MAX_PADDING);
    format!("{prefix}{counter:0>padding$}")
}

/// Process-wide invoice sequence counter.
///
/// Holds the value the *next* saved invoice will be numbered with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceCounter(u64);

impl SequenceCounter {
    pub const START: u64 = 1;

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Consume the current value and move to the next one.
    pub fn advance(&mut self) -> u64 {
        let current = self.0;
        self.0 = self.0.saturating_add(1);
        current
    }

    /// Restart numbering at [`Self::START`]. Existing records keep their
    /// numbers.
    pub fn reset(&mut self) {
        self.0 = Self::START;
    }
}

impl Default for SequenceCounter {
    fn default() -> Self {
        Self(Self::START)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_width() {
        assert_eq!(next_number(7, "INV-", 4), "INV-0007");
    }

    #[test]
    fn never_truncates() {
        assert_eq!(next_number(12345, "INV-", 4), "INV-12345");
    }

    #[test]
    fn empty_prefix_uses_default() {
        assert_eq!(next_number(3, "", 2), "INV-03");
    }

    #[test]
    fn zero_padding_is_bare_number() {
        assert_eq!(next_number(42, "A/", 0), "A/42");
    }

    #[test]
    fn oversized_padding_is_capped() {
        let number = next_number(5, "INV-", 1_000_000_000_000);
        assert_eq!(number.len(), "INV-".len() + MAX_PADDING);
        assert!(number.ends_with("05"));
        assert_eq!(next_number(5, "INV-", usize::MAX), number);
    }

    #[test]
    fn advance_consumes_one_value() {
        let mut counter = SequenceCounter::default();
        assert_eq!(counter.advance(), 1);
        assert_eq!(counter.advance(), 2);
        assert_eq!(counter.value(), 3);

        counter.reset();
        assert_eq!(counter.value(), 1);
    }

    #[test]
    fn counter_serializes_as_integer() {
        let counter = SequenceCounter::new(9);
        assert_eq!(serde_json::to_string(&counter).unwrap(), "9");
        let back: SequenceCounter = serde_json::from_str("9").unwrap();
        assert_eq!(back, counter);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the numeric suffix parses back to the counter and is
            /// at least `padding` wide.
            #[test]
            fn suffix_round_trips(counter in 0u64..10_000_000, padding in 0usize..12) {
                let number = next_number(counter, "P-", padding);
                let suffix = number.strip_prefix("P-").unwrap();
                prop_assert!(suffix.len() >= padding);
                prop_assert_eq!(suffix.parse::<u64>().unwrap(), counter);
            }
        }
    }
}
