#![doc(test(attr(deny(warnings))))]

//! Expense Core records personal expenses in a flat CSV ledger and derives the
//! summaries, filtered views and reports a front end needs to display them.

pub mod cli;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use errors::{LedgerError, ValidationError};
pub use ledger::{ExpenseFilter, ExpenseRecord, Ledger, Summary};
pub use storage::{CsvStore, ExpenseStore, MemoryStore};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Expense Core tracing initialized.");
    });
}
