//! Printable rendering of a saved invoice.
//!
//! Both renderers read only the record's own snapshot fields, never the
//! current settings, so a reprint always matches what was issued.

use std::fmt::Write as _;

use invoicer_core::money;

use crate::record::InvoiceRecord;

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "—" } else { value }
}

/// HTML fragment for the host's print facility.
pub fn render_html(inv: &InvoiceRecord) -> String {
    let cur = escape_html(&inv.currency);
    let mut rows = String::new();
    for item in &inv.items {
        let _ = write!(
            rows,
            "\n      <tr><td>{}</td><td>{}</td><td>{cur} {}</td><td>{cur} {}</td></tr>",
            escape_html(&item.description),
            item.quantity,
            money(item.unit_price),
            money(item.amount()),
        );
    }

    let notes = if inv.notes.is_empty() {
        String::new()
    } else {
        format!(
            "<div><strong>Notes</strong></div><div>{}</div>",
            escape_html(&inv.notes)
        )
    };
    let footer = if inv.footer_note.is_empty() {
        String::new()
    } else {
        format!(
            "\n  <div class=\"footnote\">{}</div>",
            escape_html(&inv.footer_note)
        )
    };

    format!(
        r#"<div class="invoice">
  <div class="inv-head">
    <div>
      <div class="inv-title">{business}</div>
      <div class="muted">{business_address}</div>
    </div>
    <div class="inv-meta">
      <div><strong>INVOICE</strong></div>
      <div>No: {number}</div>
      <div>Date: {date}</div>
      <div>Due: {due}</div>
    </div>
  </div>
  <div class="inv-bill">
    <div><strong>Bill To</strong></div>
    <div>{client}</div>
    <div class="muted">{client_address}</div>
  </div>
  <table class="inv-table">
    <thead><tr><th>Description</th><th>Qty</th><th>Unit Price</th><th>Amount</th></tr></thead>
    <tbody>{rows}
    </tbody>
  </table>
  <div class="inv-totals">
    <div class="inv-note">{notes}</div>
    <div class="inv-sum">
      <div class="totline"><span>Subtotal</span><span>{cur} {sub}</span></div>
      <div class="totline"><span>Tax</span><span>{cur} {tax}</span></div>
      <div class="totline grand"><span>Total</span><span>{cur} {total}</span></div>
    </div>
  </div>{footer}
</div>
"#,
        business = escape_html(&inv.business_name),
        business_address = escape_html(&inv.business_address),
        number = escape_html(&inv.number),
        date = escape_html(&inv.date),
        due = escape_html(or_dash(&inv.due_date)),
        client = escape_html(&inv.client_name),
        client_address = escape_html(&inv.client_address),
        sub = money(inv.sub_total),
        tax = money(inv.tax_amount),
        total = money(inv.total),
    )
}

/// Plain-text rendering for terminals.
pub fn render_text(inv: &InvoiceRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", inv.business_name);
    if !inv.business_address.is_empty() {
        let _ = writeln!(out, "{}", inv.business_address);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "INVOICE {}", inv.number);
    let _ = writeln!(out, "Date: {}", inv.date);
    let _ = writeln!(out, "Due:  {}", or_dash(&inv.due_date));
    let _ = writeln!(out);
    let _ = writeln!(out, "Bill To: {}", inv.client_name);
    if !inv.client_address.is_empty() {
        let _ = writeln!(out, "         {}", inv.client_address);
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<32} {:>8} {:>14} {:>14}",
        "Description", "Qty", "Unit Price", "Amount"
    );
    for item in &inv.items {
        let _ = writeln!(
            out,
            "{:<32} {:>8} {:>14} {:>14}",
            item.description,
            item.quantity,
            inv.format_money(item.unit_price),
            inv.format_money(item.amount()),
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{:>56} {:>14}", "Subtotal", inv.format_money(inv.sub_total));
    let _ = writeln!(out, "{:>56} {:>14}", format!("Tax ({}%)", inv.tax_rate), inv.format_money(inv.tax_amount));
    let _ = writeln!(out, "{:>56} {:>14}", "Total", inv.format_money(inv.total));
    if !inv.notes.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Notes: {}", inv.notes);
    }
    if !inv.footer_note.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", inv.footer_note);
    }
    out
}
