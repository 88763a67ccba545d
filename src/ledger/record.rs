use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// A single logged expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: String,
    pub description: String,
}

impl ExpenseRecord {
    /// Validates and normalises raw input into a record.
    pub fn new(
        date: impl IntoExpenseDate,
        amount: impl Into<AmountInput>,
        category: impl AsRef<str>,
        description: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        let amount = amount.into().into_positive()?;
        let date = date.into_expense_date()?;
        Ok(Self {
            date,
            amount,
            category: category.as_ref().trim().to_string(),
            description: description.as_ref().trim().to_string(),
        })
    }
}

/// Raw amount as supplied by a front end, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum AmountInput {
    Missing,
    Number(f64),
    Text(String),
}

impl AmountInput {
    /// Coerces the input to a positive, finite quantity.
    pub fn into_positive(self) -> Result<f64, ValidationError> {
        let value = match self {
            AmountInput::Missing => return Err(ValidationError::MissingAmount),
            AmountInput::Number(value) => value,
            AmountInput::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::MissingAmount);
                }
                trimmed
                    .parse::<f64>()
                    .map_err(|_| ValidationError::NonNumericAmount(trimmed.to_string()))?
            }
        };
        if !value.is_finite() {
            return Err(ValidationError::NonNumericAmount(value.to_string()));
        }
        if value <= 0.0 {
            return Err(ValidationError::NonPositiveAmount(value));
        }
        Ok(value)
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

impl From<f32> for AmountInput {
    fn from(value: f32) -> Self {
        AmountInput::Number(f64::from(value))
    }
}

impl From<i32> for AmountInput {
    fn from(value: i32) -> Self {
        AmountInput::Number(f64::from(value))
    }
}

impl From<i64> for AmountInput {
    fn from(value: i64) -> Self {
        AmountInput::Number(value as f64)
    }
}

impl From<u32> for AmountInput {
    fn from(value: u32) -> Self {
        AmountInput::Number(f64::from(value))
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

impl From<String> for AmountInput {
    fn from(value: String) -> Self {
        AmountInput::Text(value)
    }
}

impl<T: Into<AmountInput>> From<Option<T>> for AmountInput {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AmountInput::Missing)
    }
}

/// Anything that can be reduced to a calendar date.
pub trait IntoExpenseDate {
    fn into_expense_date(self) -> Result<NaiveDate, ValidationError>;
}

impl IntoExpenseDate for NaiveDate {
    fn into_expense_date(self) -> Result<NaiveDate, ValidationError> {
        Ok(self)
    }
}

impl IntoExpenseDate for NaiveDateTime {
    fn into_expense_date(self) -> Result<NaiveDate, ValidationError> {
        Ok(self.date())
    }
}

impl<Tz: TimeZone> IntoExpenseDate for DateTime<Tz> {
    fn into_expense_date(self) -> Result<NaiveDate, ValidationError> {
        Ok(self.date_naive())
    }
}

impl IntoExpenseDate for &str {
    fn into_expense_date(self) -> Result<NaiveDate, ValidationError> {
        parse_date(self).ok_or_else(|| ValidationError::InvalidDate(self.trim().to_string()))
    }
}

impl IntoExpenseDate for String {
    fn into_expense_date(self) -> Result<NaiveDate, ValidationError> {
        self.as_str().into_expense_date()
    }
}

impl IntoExpenseDate for &String {
    fn into_expense_date(self) -> Result<NaiveDate, ValidationError> {
        self.as_str().into_expense_date()
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parses the date shapes accepted in forms and stored files, dropping any time of day.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|stamp| stamp.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn trims_text_fields() {
        let record = ExpenseRecord::new(date(2024, 1, 1), 12.5, "  Food ", " lunch  ").unwrap();
        assert_eq!(record.category, "Food");
        assert_eq!(record.description, "lunch");
    }

    #[test]
    fn accepts_numeric_text() {
        let record = ExpenseRecord::new("2024-03-04", " 19.99 ", "Shopping", "").unwrap();
        assert_eq!(record.amount, 19.99);
        assert_eq!(record.date, date(2024, 3, 4));
    }

    #[test]
    fn rejects_bad_amounts() {
        assert_eq!(
            AmountInput::from(None::<f64>).into_positive(),
            Err(ValidationError::MissingAmount)
        );
        assert_eq!(
            AmountInput::from("abc").into_positive(),
            Err(ValidationError::NonNumericAmount("abc".into()))
        );
        assert_eq!(
            AmountInput::from(0.0).into_positive(),
            Err(ValidationError::NonPositiveAmount(0.0))
        );
        assert_eq!(
            AmountInput::from(-5).into_positive(),
            Err(ValidationError::NonPositiveAmount(-5.0))
        );
        assert!(matches!(
            AmountInput::from(f64::NAN).into_positive(),
            Err(ValidationError::NonNumericAmount(_))
        ));
    }

    #[test]
    fn truncates_time_of_day() {
        let stamp = Utc.with_ymd_and_hms(2024, 5, 6, 23, 59, 1).unwrap();
        assert_eq!(stamp.into_expense_date().unwrap(), date(2024, 5, 6));
        assert_eq!(parse_date("2024-05-06 08:30:00"), Some(date(2024, 5, 6)));
        assert_eq!(parse_date("2024-05-06T08:30:00+02:00"), Some(date(2024, 5, 6)));
        assert_eq!(parse_date("06/05/2024"), None);
    }

    #[test]
    fn invalid_date_is_a_validation_error() {
        let err = ExpenseRecord::new("not a date", 10.0, "Food", "").unwrap_err();
        assert_eq!(err, ValidationError::InvalidDate("not a date".into()));
    }
}
