use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use invoicer_core::{InvoiceId, lenient};

use crate::draft::InvoiceDraft;
use crate::line_item::LineItem;
use crate::settings::{Settings, format_money};

/// A saved invoice.
///
/// Everything needed to display or print the invoice is copied in at save
/// time (business details, currency, rounded totals), so later edits to the
/// draft or to [`Settings`] never change a saved record. Records are only ever
/// created or deleted.
///
/// Imported files are not schema-checked: missing or mistyped fields load as
/// empty/zero, and fields this type does not know about are kept in `extra`
/// so they survive a later export.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvoiceRecord {
    #[serde(deserialize_with = "lenient_id")]
    pub id: InvoiceId,
    #[serde(deserialize_with = "lenient::text")]
    pub number: String,
    #[serde(deserialize_with = "lenient::text")]
    pub client_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub client_address: String,
    #[serde(deserialize_with = "lenient::text")]
    pub date: String,
    #[serde(deserialize_with = "lenient::text")]
    pub due_date: String,
    #[serde(deserialize_with = "lenient::text")]
    pub notes: String,
    #[serde(deserialize_with = "lenient::list")]
    pub items: Vec<LineItem>,
    #[serde(deserialize_with = "lenient::number")]
    pub tax_rate: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub sub_total: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub tax_amount: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub total: f64,
    #[serde(deserialize_with = "lenient::text")]
    pub business_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub business_address: String,
    #[serde(deserialize_with = "lenient::text")]
    pub currency: String,
    #[serde(deserialize_with = "lenient::text")]
    pub footer_note: String,
    /// ISO-8601 creation timestamp; the sort key for imports.
    #[serde(deserialize_with = "lenient::text")]
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<InvoiceId, D::Error>
where
    D: Deserializer<'de>,
{
    lenient::text(deserializer).map(InvoiceId::from)
}

impl InvoiceRecord {
    /// Freeze `draft` into a record numbered `number`.
    ///
    /// Totals are computed from the draft's raw inputs and rounded to two
    /// decimals here, once. The caller validates the draft and allocates the
    /// number.
    pub fn freeze(
        draft: InvoiceDraft,
        settings: &Settings,
        number: String,
        id: InvoiceId,
        created_at: DateTime<Utc>,
    ) -> Self {
        let totals = draft.totals().rounded();
        let InvoiceDraft {
            client_name,
            client_address,
            date,
            due_date,
            items,
            tax_rate,
            notes,
        } = draft;

        Self {
            id,
            number,
            client_name,
            client_address,
            date,
            due_date,
            notes,
            items,
            tax_rate,
            sub_total: totals.subtotal,
            tax_amount: totals.tax,
            total: totals.total,
            business_name: settings.business_name.clone(),
            business_address: settings.business_address.clone(),
            currency: settings.currency.clone(),
            footer_note: settings.footer_note.clone(),
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            extra: Map::new(),
        }
    }

    /// `createdAt` as Unix milliseconds; unreadable or missing is `0`.
    pub fn created_at_millis(&self) -> i64 {
        parse_timestamp(&self.created_at).unwrap_or(0)
    }

    /// Format an amount in this record's own currency.
    pub fn format_money(&self, amount: f64) -> String {
        format_money(&self.currency, amount)
    }
}

/// Parse the timestamp shapes found in saved and imported records.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC), a bare
/// `YYYY-MM-DD` (midnight UTC) and integer Unix milliseconds.
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis());
    }
    raw.parse::<i64>().ok()
}

/// One row of the invoice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRow {
    pub id: String,
    pub number: String,
    pub client_name: String,
    pub date: String,
    /// Due date, or `-` when there is none.
    pub due_date: String,
    /// Total with currency.
    pub total: String,
}

impl ListRow {
    /// Build the row for `record`.
    ///
    /// Amounts use the record's own currency; records without one (typically
    /// hand-made imports) fall back to the current settings.
    pub fn new(record: &InvoiceRecord, settings: &Settings) -> Self {
        let currency = if record.currency.is_empty() {
            settings.currency.as_str()
        } else {
            record.currency.as_str()
        };
        let due_date = if record.due_date.is_empty() {
            "-".to_string()
        } else {
            record.due_date.clone()
        };

        Self {
            id: record.id.to_string(),
            number: record.number.clone(),
            client_name: record.client_name.clone(),
            date: record.date.clone(),
            due_date,
            total: format_money(currency, record.total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
    }

    fn draft() -> InvoiceDraft {
        let mut draft = InvoiceDraft::new(created().date_naive());
        draft.client_name = "Acme".to_string();
        draft.items = vec![LineItem::new("a", 2.0, 50.0), LineItem::new("b", 1.0, 25.0)];
        draft.tax_rate = 10.0;
        draft
    }

    #[test]
    fn freeze_snapshots_settings_and_rounds_totals() {
        let mut settings = Settings::default();
        settings.currency = "USD".to_string();
        let id: InvoiceId = "rec-1".parse().unwrap();

        let record = InvoiceRecord::freeze(
            draft(),
            &settings,
            "INV-0001".to_string(),
            id.clone(),
            created(),
        );

        assert_eq!(record.id, id);
        assert_eq!(record.number, "INV-0001");
        assert_eq!(record.sub_total, 125.0);
        assert_eq!(record.tax_amount, 12.5);
        assert_eq!(record.total, 137.5);
        assert_eq!(record.currency, "USD");
        assert_eq!(record.created_at, "2025-03-14T09:30:00.000Z");
        assert_eq!(record.format_money(record.total), "USD 137.50");

        // Later settings edits do not reach the saved record.
        settings.currency = "EUR".to_string();
        assert_eq!(record.currency, "USD");
    }

    #[test]
    fn serializes_with_wire_names() {
        let record = InvoiceRecord::freeze(
            draft(),
            &Settings::default(),
            "INV-0001".to_string(),
            "rec-1".parse().unwrap(),
            created(),
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["subTotal"], 125.0);
        assert_eq!(value["taxAmount"], 12.5);
        assert_eq!(value["createdAt"], "2025-03-14T09:30:00.000Z");
        assert_eq!(value["items"][0]["unitPrice"], 50.0);
    }

    #[test]
    fn malformed_records_still_load() {
        let record: InvoiceRecord = serde_json::from_value(json!({
            "id": 17,
            "number": "X-1",
            "total": "oops",
            "items": [{"description": "a", "qty": "2", "price": "3"}],
            "status": "paid",
        }))
        .unwrap();

        assert_eq!(record.id.as_str(), "17");
        assert_eq!(record.total, 0.0);
        assert_eq!(record.items[0].amount(), 6.0);
        assert_eq!(record.created_at_millis(), 0);
        assert_eq!(record.extra.get("status"), Some(&json!("paid")));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["status"], "paid");
    }

    #[test]
    fn timestamps_in_several_shapes() {
        let midnight = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().timestamp_millis();
        assert_eq!(parse_timestamp("2024-01-01"), Some(midnight));
        assert_eq!(parse_timestamp("2024-01-01T00:00:00Z"), Some(midnight));
        assert_eq!(parse_timestamp("2024-01-01T00:00:00.000Z"), Some(midnight));
        assert_eq!(parse_timestamp("2024-01-01T00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp("1704067200000"), Some(midnight));
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn list_row_formats_due_date_and_currency() {
        let mut record = InvoiceRecord::freeze(
            draft(),
            &Settings::default(),
            "INV-0001".to_string(),
            "rec-1".parse().unwrap(),
            created(),
        );
        let mut settings = Settings::default();
        settings.currency = "EUR".to_string();

        let row = ListRow::new(&record, &settings);
        assert_eq!(row.due_date, "-");
        assert_eq!(row.total, "$ 137.50");

        record.currency.clear();
        record.due_date = "2025-04-01".to_string();
        let row = ListRow::new(&record, &settings);
        assert_eq!(row.due_date, "2025-04-01");
        assert_eq!(row.total, "EUR 137.50");
    }
}
