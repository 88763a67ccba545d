use crate::{
    errors::{LedgerError, Result},
    ledger::ExpenseRecord,
};

use super::{ExpenseStore, LoadOutcome};

/// Keeps the collection in memory. `read_only` stores reject writes, which lets callers
/// exercise the storage failure path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<ExpenseRecord>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ExpenseRecord>) -> Self {
        Self {
            records,
            read_only: false,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }
}

impl ExpenseStore for MemoryStore {
    fn load(&self) -> Result<LoadOutcome> {
        Ok(LoadOutcome {
            records: self.records.clone(),
            dropped: 0,
        })
    }

    fn save(&mut self, records: &[ExpenseRecord]) -> Result<()> {
        if self.read_only {
            return Err(LedgerError::Storage("memory store is read-only".into()));
        }
        self.records = records.to_vec();
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if self.read_only {
            return Err(LedgerError::Storage("memory store is read-only".into()));
        }
        self.records.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(amount: f64) -> ExpenseRecord {
        ExpenseRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            amount,
            category: "Food".into(),
            description: String::new(),
        }
    }

    #[test]
    fn save_replaces_whole_collection() {
        let mut store = MemoryStore::with_records(vec![record(1.0), record(2.0)]);
        assert_eq!(store.load().unwrap().records.len(), 2);
        store.save(&[record(3.0)]).unwrap();
        assert_eq!(store.records(), &[record(3.0)]);
        assert_eq!(store.location(), None);
    }

    #[test]
    fn read_only_rejects_writes_and_keeps_rows() {
        let mut store = MemoryStore::with_records(vec![record(1.0)]).read_only();
        assert!(store.save(&[]).is_err());
        assert!(store.clear().is_err());
        assert_eq!(store.records().len(), 1);
    }
}
