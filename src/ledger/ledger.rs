use std::{collections::BTreeSet, fmt, path::Path};

use crate::{
    errors::Result,
    storage::{self, ExpenseStore},
};

use super::{
    filter::ExpenseFilter,
    record::{AmountInput, ExpenseRecord, IntoExpenseDate},
    summary::{self, CategoryShare, CategorySummary, HistogramBin, MonthlyTotal, Summary},
};

/// Suggested categories offered by front ends. Not enforced by the ledger.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Food",
    "Transport",
    "Utilities",
    "Shopping",
    "Entertainment",
    "Other",
];

pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// The owned expense collection. Every mutation is written through to the store.
pub struct Ledger {
    records: Vec<ExpenseRecord>,
    store: Box<dyn ExpenseStore>,
    dropped_rows: usize,
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("records", &self.records.len())
            .field("location", &self.store.location())
            .field("dropped_rows", &self.dropped_rows)
            .finish()
    }
}

impl Ledger {
    /// Loads whatever the store holds; a store with nothing persisted yields an empty ledger.
    pub fn open(store: impl ExpenseStore + 'static) -> Result<Self> {
        let mut ledger = Self {
            records: Vec::new(),
            store: Box::new(store),
            dropped_rows: 0,
        };
        ledger.reload()?;
        Ok(ledger)
    }

    /// Replaces the in-memory collection with the store's current contents.
    pub fn reload(&mut self) -> Result<()> {
        let outcome = self.store.load()?;
        if outcome.dropped > 0 {
            tracing::warn!(
                dropped = outcome.dropped,
                "skipped rows with unreadable date or amount"
            );
        }
        tracing::info!(records = outcome.records.len(), "ledger loaded");
        self.records = outcome.records;
        self.dropped_rows = outcome.dropped;
        Ok(())
    }

    /// Validates and appends an expense, then rewrites the store.
    ///
    /// On a storage failure the record is withdrawn again and the error is returned.
    pub fn add(
        &mut self,
        date: impl IntoExpenseDate,
        amount: impl Into<AmountInput>,
        category: impl AsRef<str>,
        description: impl AsRef<str>,
    ) -> Result<&ExpenseRecord> {
        let record = ExpenseRecord::new(date, amount, category, description)?;
        self.records.push(record);
        if let Err(err) = self.store.save(&self.records) {
            self.records.pop();
            tracing::error!(error = %err, "failed to persist new expense");
            return Err(err);
        }
        let idx = self.records.len() - 1;
        let added = &self.records[idx];
        tracing::debug!(
            date = %added.date,
            amount = added.amount,
            category = %added.category,
            "expense added"
        );
        Ok(added)
    }

    pub fn summarize(&self) -> Summary {
        summary::summarize(&self.records)
    }

    pub fn filter(&self, filter: &ExpenseFilter) -> Vec<&ExpenseRecord> {
        filter.apply(&self.records)
    }

    /// Writes the category breakdown to `destination` and returns it.
    pub fn export_category_report(&self, destination: impl AsRef<Path>) -> Result<Vec<CategorySummary>> {
        let destination = destination.as_ref();
        let breakdown = summary::by_category(&self.records);
        storage::write_category_report(destination, &breakdown)?;
        tracing::info!(
            path = %destination.display(),
            categories = breakdown.len(),
            "category report exported"
        );
        Ok(breakdown)
    }

    /// Writes an arbitrary set of records, e.g. a filter result, in the ledger file format.
    pub fn export_records<'a, I>(&self, records: I, destination: impl AsRef<Path>) -> Result<()>
    where
        I: IntoIterator<Item = &'a ExpenseRecord>,
    {
        let destination = destination.as_ref();
        storage::write_records(destination, records)?;
        tracing::info!(path = %destination.display(), "records exported");
        Ok(())
    }

    /// Deletes persisted storage and empties the ledger. Irreversible.
    pub fn reset(&mut self) -> Result<()> {
        self.store.clear()?;
        self.records.clear();
        self.dropped_rows = 0;
        tracing::info!("ledger reset");
        Ok(())
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    /// All records ordered by date; `descending` puts the newest first.
    pub fn records_by_date(&self, descending: bool) -> Vec<&ExpenseRecord> {
        let mut sorted: Vec<&ExpenseRecord> = self.records.iter().collect();
        if descending {
            sorted.sort_by(|a, b| b.date.cmp(&a.date));
        } else {
            sorted.sort_by_key(|record| record.date);
        }
        sorted
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows skipped by the most recent load because their date or amount was unreadable.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn location(&self) -> Option<&Path> {
        self.store.location()
    }

    pub fn monthly_totals(&self) -> Vec<MonthlyTotal> {
        summary::monthly_totals(&self.records)
    }

    pub fn category_shares(&self) -> Vec<CategoryShare> {
        summary::category_shares(&self.records)
    }

    pub fn amount_histogram(&self, bins: usize) -> Vec<HistogramBin> {
        summary::amount_histogram(&self.records, bins)
    }

    /// Categories already used, sorted, followed by any `defaults` not yet present.
    pub fn category_suggestions<S: AsRef<str>>(&self, defaults: &[S]) -> Vec<String> {
        let existing: BTreeSet<&str> = self
            .records
            .iter()
            .map(|record| record.category.as_str())
            .filter(|category| !category.is_empty())
            .collect();
        let mut suggestions: Vec<String> = existing.iter().map(|c| c.to_string()).collect();
        for default in defaults {
            let default = default.as_ref();
            if !existing.contains(default) {
                suggestions.push(default.to_string());
            }
        }
        suggestions
    }
}
