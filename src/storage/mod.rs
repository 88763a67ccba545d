pub mod csv_backend;
pub mod memory;

use std::path::Path;

use crate::{errors::Result, ledger::ExpenseRecord};

/// Records recovered from storage plus the number of rows that could not be parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOutcome {
    pub records: Vec<ExpenseRecord>,
    pub dropped: usize,
}

/// Abstraction over persistence backends holding the full expense collection.
///
/// `save` always receives the complete collection; backends decide how to lay it down.
pub trait ExpenseStore: Send {
    fn load(&self) -> Result<LoadOutcome>;
    fn save(&mut self, records: &[ExpenseRecord]) -> Result<()>;
    /// Removes any persisted artifact. Succeeds when nothing exists.
    fn clear(&mut self) -> Result<()>;
    fn location(&self) -> Option<&Path> {
        None
    }
}

pub use csv_backend::{write_category_report, write_records, CsvStore};
pub use memory::MemoryStore;
