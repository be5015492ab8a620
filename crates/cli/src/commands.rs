//! Subcommand execution against an open session.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::{DateTime, NaiveDate, Utc};

use invoicer_core::money;
use invoicer_infra::{InvoicerSession, KeyValueStore, SessionError};
use invoicer_invoicing::print::{render_html, render_text};
use invoicer_invoicing::{InvoiceDraft, LineItemField, SettingsUpdate};

use crate::args::{Command, DraftArgs};

/// Build a draft from command-line input the way the form would: start
/// blank, then add and fill one line per item.
pub fn build_draft(today: NaiveDate, args: &DraftArgs) -> InvoiceDraft {
    let mut draft = InvoiceDraft::new(today);
    for (index, item) in args.items.iter().enumerate() {
        if index > 0 {
            draft.add_item();
        }
        draft.update_item(index, LineItemField::Description, &item.description);
        draft.update_item(index, LineItemField::Quantity, &item.quantity);
        draft.update_item(index, LineItemField::UnitPrice, &item.unit_price);
    }
    draft.set_tax_rate(&args.tax);
    draft
}

fn write_settings<S: KeyValueStore>(
    session: &InvoicerSession<S>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let settings = session.book().settings();
    writeln!(out, "business name:    {}", settings.business_name)?;
    writeln!(out, "business address: {}", settings.business_address)?;
    writeln!(out, "prefix:           {}", settings.prefix)?;
    writeln!(out, "padding:          {}", settings.padding)?;
    writeln!(out, "currency:         {}", settings.currency)?;
    writeln!(out, "footer:           {}", settings.footer_note)?;
    writeln!(out, "next number:      {}", session.book().next_number())?;
    Ok(())
}

/// Persist failures after a successful in-memory change are reported but do
/// not abort the command.
fn warn_unsaved<T>(result: Result<T, SessionError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(SessionError::Store(err)) => {
            tracing::warn!(error = %err, "change may not survive a restart");
            eprintln!("warning: {err}");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

/// Run one subcommand. `now` is the wall-clock time used for new invoices'
/// default date and export file names.
pub fn run<S: KeyValueStore>(
    session: &mut InvoicerSession<S>,
    command: Command,
    now: DateTime<Utc>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::New {
            client,
            address,
            date,
            due,
            notes,
            draft: draft_args,
        } => {
            let mut draft = build_draft(date.unwrap_or(now.date_naive()), &draft_args);
            draft.client_name = client;
            draft.client_address = address;
            draft.notes = notes;
            if let Some(due) = due {
                draft.due_date = due.format("%Y-%m-%d").to_string();
            }

            let number = session.book().next_number();
            match warn_unsaved(session.save_invoice(draft))? {
                Some(record) => writeln!(
                    out,
                    "saved {} ({}) total {}",
                    record.number,
                    record.id,
                    record.format_money(record.total)
                )?,
                None => writeln!(out, "saved {number} (not persisted)")?,
            }
        }
        Command::Preview { draft: draft_args } => {
            let draft = build_draft(now.date_naive(), &draft_args);
            let preview = session.preview(&draft);
            let currency = &session.book().settings().currency;
            writeln!(out, "number:   {}", preview.number)?;
            for item in &draft.items {
                writeln!(
                    out,
                    "  {} x {} @ {currency} {} = {currency} {}",
                    item.description,
                    item.quantity,
                    money(item.unit_price),
                    money(item.amount())
                )?;
            }
            writeln!(out, "subtotal: {currency} {}", money(preview.totals.subtotal))?;
            writeln!(out, "tax:      {currency} {}", money(preview.totals.tax))?;
            writeln!(out, "total:    {currency} {}", money(preview.totals.total))?;
        }
        Command::List { search } => {
            let rows = session.list(&search);
            if rows.is_empty() {
                writeln!(out, "no invoices")?;
            }
            for row in rows {
                writeln!(
                    out,
                    "{:<14} {:<28} {:<10} {:<10} {:>16}",
                    row.number, row.client_name, row.date, row.due_date, row.total
                )?;
            }
        }
        Command::Show { key, html } => {
            let record = session.find(&key)?;
            let rendered = if html {
                render_html(record)
            } else {
                render_text(record)
            };
            write!(out, "{rendered}")?;
        }
        Command::Delete { key } => match warn_unsaved(session.delete_by_key(&key))? {
            Some(record) => writeln!(out, "deleted {}", record.number)?,
            None => writeln!(out, "deleted {key} (not persisted)")?,
        },
        Command::Export { out: target } => {
            let target =
                target.unwrap_or_else(|| PathBuf::from(InvoicerSession::<S>::export_filename(now)));
            if target.as_os_str() == "-" {
                writeln!(out, "{}", session.export_json()?)?;
            } else {
                let count = session
                    .export_to(&target)
                    .with_context(|| format!("failed to export to {}", target.display()))?;
                writeln!(out, "exported {count} invoices to {}", target.display())?;
            }
        }
        Command::Import { path } => match warn_unsaved(session.import_file(&path)) {
            Ok(Some(summary)) => writeln!(
                out,
                "imported: {} added, {} replaced, {} total",
                summary.added, summary.replaced, summary.total
            )?,
            Ok(None) => writeln!(out, "imported (not persisted)")?,
            Err(err) => return Err(err.context(format!("failed to import {}", path.display()))),
        },
        Command::Settings {
            business_name,
            business_address,
            prefix,
            padding,
            currency,
            footer,
        } => {
            let update = SettingsUpdate {
                business_name,
                business_address,
                prefix,
                padding,
                currency,
                footer_note: footer,
            };
            warn_unsaved(session.update_settings(update))?;
            write_settings(session, out)?;
        }
        Command::ResetCounter { yes } => {
            if !yes {
                bail!("resetting the counter may reuse invoice numbers; pass --yes to confirm");
            }
            warn_unsaved(session.reset_counter())?;
            writeln!(out, "next number: {}", session.book().next_number())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{Cli, ItemArg};
    use chrono::TimeZone;
    use clap::Parser;
    use invoicer_infra::InMemoryStore;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
    }

    fn exec(session: &mut InvoicerSession<InMemoryStore>, argv: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("invoicer").chain(argv.iter().copied()))?;
        let mut out = Vec::new();
        run(session, cli.command, now(), &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn build_draft_fills_lines_in_order() {
        let args = DraftArgs {
            items: vec![
                ItemArg {
                    description: "A".to_string(),
                    quantity: "2".to_string(),
                    unit_price: "50".to_string(),
                },
                ItemArg {
                    description: "B".to_string(),
                    quantity: "x".to_string(),
                    unit_price: "25".to_string(),
                },
            ],
            tax: "10".to_string(),
        };
        let draft = build_draft(now().date_naive(), &args);
        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.items[1].quantity, 0.0);
        assert_eq!(draft.totals().total, 110.0);
        assert_eq!(draft.date, "2025-06-01");
    }

    #[test]
    fn new_list_show_delete() {
        let mut session = InvoicerSession::open(InMemoryStore::new());

        let saved = exec(
            &mut session,
            &["new", "--client", "Acme", "--item", "Design:2:50", "--item", "Hosting:1:25", "--tax", "10"],
        )
        .unwrap();
        assert!(saved.starts_with("saved INV-0001"));
        assert!(saved.contains("$ 137.50"));

        let listed = exec(&mut session, &["list", "--search", "acme"]).unwrap();
        assert!(listed.contains("INV-0001"));
        assert!(listed.contains("$ 137.50"));

        let shown = exec(&mut session, &["show", "inv-0001", "--html"]).unwrap();
        assert!(shown.contains("<div>Acme</div>"));

        let deleted = exec(&mut session, &["delete", "INV-0001"]).unwrap();
        assert_eq!(deleted, "deleted INV-0001\n");
        assert_eq!(exec(&mut session, &["list"]).unwrap(), "no invoices\n");
        assert!(exec(&mut session, &["show", "INV-0001"]).is_err());
    }

    #[test]
    fn preview_does_not_consume_a_number() {
        let mut session = InvoicerSession::open(InMemoryStore::new());
        let preview = exec(&mut session, &["preview", "--item", "X:3:1.5"]).unwrap();
        assert!(preview.contains("number:   INV-0001"));
        assert!(preview.contains("total:    $ 4.50"));
        assert_eq!(session.book().counter().value(), 1);
    }

    #[test]
    fn settings_and_reset_counter() {
        let mut session = InvoicerSession::open(InMemoryStore::new());
        let shown = exec(&mut session, &["settings", "--prefix", "Q-", "--padding", "2"]).unwrap();
        assert!(shown.contains("next number:      Q-01"));

        exec(&mut session, &["new", "--client", "A", "--item", "x:1:1"]).unwrap();
        assert!(exec(&mut session, &["reset-counter"]).is_err());
        let reset = exec(&mut session, &["reset-counter", "--yes"]).unwrap();
        assert_eq!(reset, "next number: Q-01\n");
    }

    #[test]
    fn settings_rejects_oversized_padding() {
        let mut session = InvoicerSession::open(InMemoryStore::new());
        let err = exec(&mut session, &["settings", "--padding", "70000"]).unwrap_err();
        assert!(err.to_string().contains("padding"));

        let shown = exec(&mut session, &["settings"]).unwrap();
        assert!(shown.contains("next number:      INV-0001"));
    }

    #[test]
    fn export_to_stdout_is_json_array() {
        let mut session = InvoicerSession::open(InMemoryStore::new());
        exec(&mut session, &["new", "--client", "A", "--item", "x:1:1"]).unwrap();
        let json = exec(&mut session, &["export", "--out", "-"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(1));
    }
}
