use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Serialize;

use crate::{
    errors::{LedgerError, Result},
    ledger::{record::parse_date, CategorySummary, ExpenseRecord},
    utils::paths::{ensure_dir, staging_path},
};

use super::{ExpenseStore, LoadOutcome};

pub const LEDGER_HEADER: [&str; 4] = ["Date", "Amount", "Category", "Description"];
pub const REPORT_HEADER: [&str; 4] = ["Category", "Total", "Average", "Count"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Ledger persisted as a single CSV file, rewritten in full on every save.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExpenseStore for CsvStore {
    fn load(&self) -> Result<LoadOutcome> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no ledger file, starting empty");
            return Ok(LoadOutcome::default());
        }
        let file = File::open(&self.path)?;
        read_records(file)
    }

    fn save(&mut self, records: &[ExpenseRecord]) -> Result<()> {
        write_records(&self.path, records)?;
        tracing::debug!(path = %self.path.display(), count = records.len(), "ledger written");
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

#[derive(Serialize)]
struct LedgerRow<'a> {
    date: String,
    amount: f64,
    category: &'a str,
    description: &'a str,
}

impl<'a> From<&'a ExpenseRecord> for LedgerRow<'a> {
    fn from(record: &'a ExpenseRecord) -> Self {
        Self {
            date: record.date.format(DATE_FORMAT).to_string(),
            amount: record.amount,
            category: &record.category,
            description: &record.description,
        }
    }
}

struct Columns {
    date: usize,
    amount: usize,
    category: Option<usize>,
    description: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|header| header.trim() == name);
        let date = find("Date")
            .ok_or_else(|| LedgerError::Storage("ledger file has no `Date` column".into()))?;
        let amount = find("Amount")
            .ok_or_else(|| LedgerError::Storage("ledger file has no `Amount` column".into()))?;
        Ok(Self {
            date,
            amount,
            category: find("Category"),
            description: find("Description"),
        })
    }

    fn parse(&self, row: &StringRecord) -> Option<ExpenseRecord> {
        let date = parse_date(row.get(self.date)?)?;
        let amount = row.get(self.amount)?.trim().parse::<f64>().ok()?;
        if !amount.is_finite() {
            return None;
        }
        let text = |idx: Option<usize>| {
            idx.and_then(|idx| row.get(idx))
                .unwrap_or("")
                .trim()
                .to_string()
        };
        Some(ExpenseRecord {
            date,
            amount,
            category: text(self.category),
            description: text(self.description),
        })
    }
}

/// Parses ledger rows, skipping any whose date or amount cannot be read.
pub fn read_records<R: io::Read>(source: R) -> Result<LoadOutcome> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);
    let headers = reader.headers()?.clone();
    if headers.iter().all(|header| header.trim().is_empty()) {
        return Ok(LoadOutcome::default());
    }
    let columns = Columns::locate(&headers)?;
    let mut outcome = LoadOutcome::default();
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(_) => {
                outcome.dropped += 1;
                continue;
            }
        };
        match columns.parse(&row) {
            Some(record) => outcome.records.push(record),
            None => outcome.dropped += 1,
        }
    }
    Ok(outcome)
}

/// Writes records in the ledger format. Also used for filtered and full-data exports.
pub fn write_records<'a, I>(path: &Path, records: I) -> Result<()>
where
    I: IntoIterator<Item = &'a ExpenseRecord>,
{
    write_table(path, &LEDGER_HEADER, records.into_iter().map(LedgerRow::from))
}

pub fn write_category_report(path: &Path, rows: &[CategorySummary]) -> Result<()> {
    write_table(path, &REPORT_HEADER, rows.iter())
}

fn write_table<T, I>(path: &Path, header: &[&str], rows: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    let staging = staging_path(path);
    let written = write_rows(&staging, header, rows).and_then(|()| {
        fs::rename(&staging, path).map_err(|err| {
            LedgerError::Storage(format!("cannot replace `{}`: {err}", path.display()))
        })
    });
    if written.is_err() {
        let _ = fs::remove_file(&staging);
    }
    written
}

fn write_rows<T, I>(target: &Path, header: &[&str], rows: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(target)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample() -> Vec<ExpenseRecord> {
        vec![
            ExpenseRecord {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                amount: 100.0,
                category: "Food".into(),
                description: "groceries, weekly".into(),
            },
            ExpenseRecord {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                amount: 12.5,
                category: "Transport".into(),
                description: String::new(),
            },
        ]
    }

    #[test]
    fn writes_expected_layout() {
        let temp = TempDir::new().expect("temp dir");
        let mut store = CsvStore::new(temp.path().join("expenses.csv"));
        store.save(&sample()).expect("save");
        let raw = fs::read_to_string(store.path()).expect("read");
        assert_eq!(
            raw,
            "Date,Amount,Category,Description\n\
             2024-01-01,100.0,Food,\"groceries, weekly\"\n\
             2024-01-02,12.5,Transport,\n"
        );
    }

    #[test]
    fn empty_collection_still_writes_header() {
        let temp = TempDir::new().expect("temp dir");
        let mut store = CsvStore::new(temp.path().join("nested/expenses.csv"));
        store.save(&[]).expect("save");
        let raw = fs::read_to_string(store.path()).expect("read");
        assert_eq!(raw, "Date,Amount,Category,Description\n");
        assert_eq!(store.load().expect("load"), LoadOutcome::default());
    }

    #[test]
    fn malformed_rows_are_counted_not_fatal() {
        let data = "Date,Amount,Category,Description\n\
                    2024-01-01,10,Food,ok\n\
                    garbage,10,Food,bad date\n\
                    2024-01-03,ten,Food,bad amount\n\
                    2024-01-04,,Food,missing amount\n\
                    2024-01-05 10:00:00,7.5,Food\n";
        let outcome = read_records(data.as_bytes()).expect("read");
        assert_eq!(outcome.dropped, 3);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[1].description, "");
        assert_eq!(
            outcome.records[1].date,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
    }

    #[test]
    fn missing_amount_column_is_a_storage_error() {
        let err = read_records("Date,Category\n2024-01-01,Food\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
    }

    #[test]
    fn zero_byte_file_loads_empty() {
        let outcome = read_records("".as_bytes()).expect("read");
        assert!(outcome.records.is_empty());
    }

    struct Unwritable;

    impl Serialize for Unwritable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("row cannot be encoded"))
        }
    }

    #[test]
    fn failed_write_leaves_no_staging_file() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("expenses.csv");
        let mut store = CsvStore::new(&path);
        store.save(&sample()).expect("initial save");
        let original = fs::read_to_string(&path).expect("read");

        let result = write_table(&path, &LEDGER_HEADER, [Unwritable]);
        assert!(result.is_err());
        assert!(!staging_path(&path).exists());
        assert_eq!(fs::read_to_string(&path).expect("read"), original);
    }

    #[test]
    fn clear_is_idempotent() {
        let temp = TempDir::new().expect("temp dir");
        let mut store = CsvStore::new(temp.path().join("expenses.csv"));
        store.save(&sample()).expect("save");
        store.clear().expect("first clear");
        store.clear().expect("second clear");
        assert!(!store.path().exists());
    }
}
