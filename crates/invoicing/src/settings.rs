use serde::{Deserialize, Deserializer, Serialize};

use invoicer_core::{DomainError, DomainResult, lenient, money};

use crate::sequence::{DEFAULT_PREFIX, MAX_PADDING, next_number};

/// Global business and formatting configuration.
///
/// Changes only affect invoices saved afterwards (records snapshot what they
/// need) and how the list view formats amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    #[serde(deserialize_with = "lenient::text")]
    pub business_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub business_address: String,
    #[serde(deserialize_with = "lenient::text")]
    pub prefix: String,
    /// Minimum digit count of the numeric part of invoice numbers.
    #[serde(alias = "nextNumberPadding", deserialize_with = "padding_width")]
    pub padding: usize,
    /// Currency symbol or code shown before amounts (no conversion).
    #[serde(deserialize_with = "lenient::text")]
    pub currency: String,
    #[serde(deserialize_with = "lenient::text")]
    pub footer_note: String,
}

/// Stored padding, clamped to [`MAX_PADDING`] so a hand-edited file cannot
/// produce an unusable width.
fn padding_width<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    lenient::width(deserializer).map(|width| width.min(MAX_PADDING))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            business_name: "My Business".to_string(),
            business_address: String::new(),
            prefix: DEFAULT_PREFIX.to_string(),
            padding: 4,
            currency: "$".to_string(),
            footer_note: "Thank you for your business!".to_string(),
        }
    }
}

impl Settings {
    /// Invoice number the given counter value would receive.
    pub fn number_for(&self, counter: u64) -> String {
        next_number(counter, &self.prefix, self.padding)
    }

    /// `"<currency> <amount>"` with two decimals.
    pub fn format_money(&self, amount: f64) -> String {
        format_money(&self.currency, amount)
    }

    pub fn apply(&mut self, update: SettingsUpdate) {
        let SettingsUpdate {
            business_name,
            business_address,
            prefix,
            padding,
            currency,
            footer_note,
        } = update;

        if let Some(v) = business_name {
            self.business_name = v;
        }
        if let Some(v) = business_address {
            self.business_address = v;
        }
        if let Some(v) = prefix {
            self.prefix = v;
        }
        if let Some(v) = padding {
            self.padding = v;
        }
        if let Some(v) = currency {
            self.currency = v;
        }
        if let Some(v) = footer_note {
            self.footer_note = v;
        }
    }
}

/// Partial settings change; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub business_name: Option<String>,
    pub business_address: Option<String>,
    pub prefix: Option<String>,
    pub padding: Option<usize>,
    pub currency: Option<String>,
    pub footer_note: Option<String>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> DomainResult<()> {
        match self.padding {
            Some(padding) if padding > MAX_PADDING => Err(DomainError::validation(format!(
                "padding must be at most {MAX_PADDING}, got {padding}"
            ))),
            _ => Ok(()),
        }
    }
}

pub(crate) fn format_money(currency: &str, amount: f64) -> String {
    format!("{currency} {}", money(amount))
}
