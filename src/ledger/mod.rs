//! Expense records, the owning ledger, and the views derived from it.

pub mod filter;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod record;
pub mod summary;

pub use filter::{ExpenseFilter, ALL_CATEGORIES};
pub use ledger::{Ledger, DEFAULT_CATEGORIES, DEFAULT_HISTOGRAM_BINS};
pub use record::{AmountInput, ExpenseRecord, IntoExpenseDate};
pub use summary::{
    CategoryShare, CategorySummary, HistogramBin, MonthlyTotal, Summary, MAX_HISTOGRAM_BINS,
};
