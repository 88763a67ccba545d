use std::path::{Path, PathBuf};

use chrono::Local;

use crate::{
    config::{Config, ConfigManager},
    errors::Result,
    ledger::{AmountInput, ExpenseRecord, Ledger},
    storage::{CsvStore, ExpenseStore},
};

use super::{
    output::{self, money},
    table::{Table, TableColumn},
    AddArgs, Cli, Command, ConfigCommand, ListArgs,
};

const DESCRIPTION_WIDTH: usize = 40;

/// Runs one parsed invocation against the configured ledger.
pub fn run(cli: Cli) -> Result<()> {
    output::set_plain(cli.plain);
    let manager = match &cli.config_dir {
        Some(dir) => ConfigManager::with_base_dir(dir),
        None => ConfigManager::new(),
    };
    let config = manager.load()?;

    if let Command::Config { command } = &cli.command {
        return run_config(&manager, config, command);
    }

    let ledger_path = cli.ledger.clone().unwrap_or_else(|| config.ledger_file.clone());

    // Reset must work even when the stored file can no longer be opened as a ledger.
    if let Command::Reset { yes } = cli.command {
        return reset(&ledger_path, yes);
    }

    let mut ledger = Ledger::open(CsvStore::new(&ledger_path))?;
    if ledger.dropped_rows() > 0 {
        output::warning(format!(
            "{} row(s) in {} could not be read and were skipped",
            ledger.dropped_rows(),
            ledger_path.display()
        ));
    }

    match cli.command {
        Command::Add(args) => add(&mut ledger, args),
        Command::List(args) => list(&ledger, &args),
        Command::Summary { json } => summary(&ledger, json),
        Command::Report { out } => report(&ledger, out.unwrap_or(config.report_file)),
        Command::Monthly => {
            monthly(&ledger);
            Ok(())
        }
        Command::Histogram { bins } => {
            histogram(&ledger, usize::from(bins));
            Ok(())
        }
        Command::Shares => {
            shares(&ledger);
            Ok(())
        }
        Command::Categories => {
            for category in ledger.category_suggestions(&config.default_categories) {
                println!("{category}");
            }
            Ok(())
        }
        Command::Export { out } => {
            ledger.export_records(ledger.records_by_date(false), &out)?;
            output::success(format!(
                "Exported {} expense(s) to {}",
                ledger.len(),
                out.display()
            ));
            Ok(())
        }
        Command::Reset { .. } | Command::Config { .. } => Ok(()),
    }
}

fn reset(ledger_path: &Path, yes: bool) -> Result<()> {
    if !yes {
        output::warning("Reset deletes every recorded expense; pass --yes to confirm.");
        return Ok(());
    }
    CsvStore::new(ledger_path).clear()?;
    tracing::info!(path = %ledger_path.display(), "ledger reset");
    output::success("All data cleared.");
    Ok(())
}

fn add(ledger: &mut Ledger, args: AddArgs) -> Result<()> {
    let amount = AmountInput::from(args.amount);
    let added = match args.date {
        Some(raw) => ledger.add(raw, amount, &args.category, &args.description)?,
        None => ledger.add(
            Local::now().date_naive(),
            amount,
            &args.category,
            &args.description,
        )?,
    };
    output::success(format!(
        "Expense added: {} {} {}",
        added.date,
        money(added.amount),
        added.category
    ));
    Ok(())
}

fn list(ledger: &Ledger, args: &ListArgs) -> Result<()> {
    let mut matched = ledger.filter(&args.to_filter());
    if let Some(out) = &args.out {
        ledger.export_records(matched.iter().copied(), out)?;
        output::success(format!(
            "Wrote {} expense(s) to {}",
            matched.len(),
            out.display()
        ));
    }
    if args.desc {
        matched.reverse();
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&matched)?);
        return Ok(());
    }
    if matched.is_empty() {
        output::info("No expenses match the given filters.");
        return Ok(());
    }
    println!("{}", records_table(&matched).render());
    Ok(())
}

fn records_table(records: &[&ExpenseRecord]) -> Table {
    let mut table = Table::new(vec![
        TableColumn::left("Date"),
        TableColumn::right("Amount"),
        TableColumn::left("Category"),
        TableColumn::left("Description").max_width(DESCRIPTION_WIDTH),
    ]);
    for record in records {
        table.push_row(vec![
            record.date.to_string(),
            money(record.amount),
            record.category.clone(),
            record.description.clone(),
        ]);
    }
    table
}

fn summary(ledger: &Ledger, json: bool) -> Result<()> {
    let summary = ledger.summarize();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    output::section("Summary");
    println!("Total Spent      {}", money(summary.total));
    println!("Average Expense  {}", money(summary.average));
    println!("Median Expense   {}", money(summary.median));
    println!("Transactions     {}", summary.count);
    if summary.by_category.is_empty() {
        return Ok(());
    }
    output::section("By Category");
    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("Total"),
        TableColumn::right("Average"),
        TableColumn::right("Count"),
    ]);
    for row in &summary.by_category {
        table.push_row(vec![
            row.category.clone(),
            money(row.total),
            money(row.average),
            row.count.to_string(),
        ]);
    }
    println!("{}", table.render());
    Ok(())
}

fn report(ledger: &Ledger, out: PathBuf) -> Result<()> {
    let breakdown = ledger.export_category_report(&out)?;
    output::success(format!(
        "Report with {} categories saved to {}",
        breakdown.len(),
        out.display()
    ));
    Ok(())
}

fn monthly(ledger: &Ledger) {
    let mut table = Table::new(vec![TableColumn::left("Month"), TableColumn::right("Total")]);
    for row in ledger.monthly_totals() {
        table.push_row(vec![row.label(), money(row.total)]);
    }
    println!("{}", table.render());
}

fn histogram(ledger: &Ledger, bins: usize) {
    let mut table = Table::new(vec![
        TableColumn::right("From"),
        TableColumn::right("To"),
        TableColumn::right("Count"),
    ]);
    for bin in ledger.amount_histogram(bins) {
        table.push_row(vec![
            money(bin.lower),
            money(bin.upper),
            bin.count.to_string(),
        ]);
    }
    println!("{}", table.render());
}

fn shares(ledger: &Ledger) {
    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("Total"),
        TableColumn::right("Share"),
    ]);
    for share in ledger.category_shares() {
        table.push_row(vec![
            share.category,
            money(share.total),
            format!("{:.1}%", share.percent),
        ]);
    }
    println!("{}", table.render());
}

fn run_config(manager: &ConfigManager, mut config: Config, command: &ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommand::SetLedger { path } => {
            config.ledger_file = path.clone();
            manager.save(&config)?;
            output::success(format!("Ledger location set to {}", path.display()));
        }
    }
    Ok(())
}
