//! Command-line front end over the expense ledger.

pub mod commands;
pub mod output;
pub mod table;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::ledger::{
    record::parse_date, ExpenseFilter, DEFAULT_HISTOGRAM_BINS, MAX_HISTOGRAM_BINS,
};

#[derive(Parser, Debug)]
#[command(name = "expense_cli")]
#[command(about = "Log expenses, filter transactions and summarise spending")]
pub struct Cli {
    /// Ledger CSV file. Defaults to the configured location.
    #[arg(long, global = true, env = "EXPENSE_LEDGER")]
    pub ledger: Option<PathBuf>,

    /// Directory holding `config.json`. Defaults to `$EXPENSE_CORE_HOME` or `~/.expense_core`.
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Disable coloured output.
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a new expense.
    Add(AddArgs),
    /// Show expenses matching the given filters, oldest first.
    List(ListArgs),
    /// Totals, average, median and the per-category breakdown.
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// Write the per-category report CSV.
    Report {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Spending per calendar month.
    Monthly,
    /// Distribution of expense amounts.
    Histogram {
        #[arg(
            long,
            default_value_t = DEFAULT_HISTOGRAM_BINS as u16,
            value_parser = clap::value_parser!(u16).range(1..=MAX_HISTOGRAM_BINS as i64)
        )]
        bins: u16,
    },
    /// Each category's share of total spending.
    Shares,
    /// Categories in use plus the suggested defaults.
    Categories,
    /// Copy the whole ledger to another CSV file.
    Export {
        #[arg(long)]
        out: PathBuf,
    },
    /// Delete the ledger file and start over.
    Reset {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Inspect or change persisted settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Expense date; today when omitted.
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<String>,
    #[arg(long, default_value = "Other")]
    pub category: String,
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Category to keep; `All` keeps every category.
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long, value_parser = parse_date_arg)]
    pub from: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date_arg)]
    pub to: Option<NaiveDate>,
    #[arg(long)]
    pub min: Option<f64>,
    #[arg(long)]
    pub max: Option<f64>,
    /// Show newest first.
    #[arg(long)]
    pub desc: bool,
    /// Also write the matching rows to this CSV file.
    #[arg(long)]
    pub out: Option<PathBuf>,
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn to_filter(&self) -> ExpenseFilter {
        ExpenseFilter {
            category: self.category.clone(),
            start: self.from,
            end: self.to,
            min_amount: self.min,
            max_amount: self.max,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    Show,
    /// Persist a new default ledger location.
    SetLedger { path: PathBuf },
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("`{raw}` is not a date (expected YYYY-MM-DD)"))
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
    fn list_flags_become_filter() {
        let cli = Cli::parse_from([
            "expense_cli",
            "list",
            "--category",
            "Food",
            "--from",
            "2024-01-02",
            "--max",
            "60",
        ]);
        let Command::List(args) = cli.command else {
            panic!("expected list command");
        };
        let filter = args.to_filter();
        assert_eq!(filter.category.as_deref(), Some("Food"));
        assert_eq!(filter.start, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(filter.max_amount, Some(60.0));
        assert_eq!(filter.min_amount, None);
    }

    #[test]
    fn histogram_bins_are_range_checked() {
        let cli = Cli::parse_from(["expense_cli", "histogram"]);
        assert!(matches!(cli.command, Command::Histogram { bins: 20 }));
        assert!(Cli::try_parse_from(["expense_cli", "histogram", "--bins", "0"]).is_err());
        assert!(Cli::try_parse_from(["expense_cli", "histogram", "--bins", "1001"]).is_err());
        assert!(
            Cli::try_parse_from(["expense_cli", "histogram", "--bins", "18446744073709551615"])
                .is_err()
        );
    }

    #[test]
    fn negative_amount_reaches_validation() {
        let cli = Cli::parse_from(["expense_cli", "add", "--amount", "-5"]);
        let Command::Add(args) = cli.command else {
            panic!("expected add command");
        };
        assert_eq!(args.amount.as_deref(), Some("-5"));
    }
}
