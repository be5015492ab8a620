use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Line item given on the command line as `description:quantity:price`.
///
/// The description may itself contain colons; the last two fields are the
/// numbers. Numbers are kept as raw text and coerced the same way form input
/// is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemArg {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
}

pub fn parse_item(raw: &str) -> Result<ItemArg, String> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(unit_price), Some(quantity), Some(description)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected DESCRIPTION:QTY:PRICE, got {raw:?}"));
    };
    Ok(ItemArg {
        description: description.trim().to_string(),
        quantity: quantity.trim().to_string(),
        unit_price: unit_price.trim().to_string(),
    })
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got {raw:?}: {e}"))
}

#[derive(Parser, Debug)]
#[command(name = "invoicer")]
#[command(about = "Create, number, search and export invoices", version)]
pub struct Cli {
    /// Directory holding the invoice, counter and settings files.
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

/// Draft fields shared by `new` and `preview`.
#[derive(Args, Debug, Clone)]
pub struct DraftArgs {
    #[arg(long = "item", value_name = "DESC:QTY:PRICE", value_parser = parse_item, required = true)]
    pub items: Vec<ItemArg>,
    /// Tax rate in percent.
    #[arg(long, default_value = "0")]
    pub tax: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Save a new invoice with the next number.
    New {
        #[arg(long)]
        client: String,
        #[arg(long, default_value = "")]
        address: String,
        /// Issue date; defaults to today (UTC).
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date)]
        due: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        notes: String,
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Show the number and totals a draft would get, without saving.
    Preview {
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// List invoices, newest first.
    List {
        /// Case-insensitive search over number, client, address, dates and total.
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Print one invoice.
    Show {
        /// Invoice id or number.
        key: String,
        #[arg(long)]
        html: bool,
    },
    /// Delete an invoice. Its number is not reused.
    Delete {
        /// Invoice id or number.
        key: String,
    },
    /// Write all invoices as JSON.
    Export {
        /// Output file; defaults to `invoices_<date>.json` in the current directory.
        /// Use `-` for stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Merge invoices from a JSON export.
    Import { path: PathBuf },
    /// Show or change settings.
    Settings {
        #[arg(long)]
        business_name: Option<String>,
        #[arg(long)]
        business_address: Option<String>,
        #[arg(long)]
        prefix: Option<String>,
        #[arg(long)]
        padding: Option<usize>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        footer: Option<String>,
    },
    /// Restart invoice numbering at 1.
    ResetCounter {
        /// Confirm the reset; numbers already issued may be handed out again.
        #[arg(long)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn item_keeps_colons_in_description() {
        let item = parse_item("Consulting: March:10:95.5").unwrap();
        assert_eq!(item.description, "Consulting: March");
        assert_eq!(item.quantity, "10");
        assert_eq!(item.unit_price, "95.5");
        assert!(parse_item("just text").is_err());
        assert!(parse_item("a:1").is_err());
    }

    #[test]
    fn parses_new_with_items() {
        let cli = Cli::try_parse_from([
            "invoicer",
            "--data-dir",
            "/tmp/x",
            "new",
            "--client",
            "Acme",
            "--due",
            "2025-02-01",
            "--item",
            "Design:2:50",
            "--item",
            "Hosting:1:25",
            "--tax",
            "10",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        let Command::New { client, due, draft, .. } = cli.command else {
            panic!("expected new");
        };
        assert_eq!(client, "Acme");
        assert_eq!(due, NaiveDate::from_ymd_opt(2025, 2, 1));
        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.tax, "10");
    }

    #[test]
    fn new_requires_an_item() {
        assert!(Cli::try_parse_from(["invoicer", "new", "--client", "Acme"]).is_err());
        assert!(Cli::try_parse_from(["invoicer", "new", "--client", "A", "--item", "x:1:1", "--due", "soon"]).is_err());
    }
}
