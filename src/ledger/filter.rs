use chrono::NaiveDate;

use super::record::ExpenseRecord;

/// Category value meaning "every category".
pub const ALL_CATEGORIES: &str = "All";

/// Conjunctive predicate set over expense records. Every bound is inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    pub fn min_amount(mut self, min: f64) -> Self {
        self.min_amount = Some(min);
        self
    }

    pub fn max_amount(mut self, max: f64) -> Self {
        self.max_amount = Some(max);
        self
    }

    /// The category to match, or `None` when the filter is absent, empty or the `All` sentinel.
    fn effective_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|category| !category.is_empty() && *category != ALL_CATEGORIES)
    }

    pub fn matches(&self, record: &ExpenseRecord) -> bool {
        if let Some(category) = self.effective_category() {
            if record.category != category {
                return false;
            }
        }
        if self.start.is_some_and(|start| record.date < start) {
            return false;
        }
        if self.end.is_some_and(|end| record.date > end) {
            return false;
        }
        if self.min_amount.is_some_and(|min| record.amount < min) {
            return false;
        }
        if self.max_amount.is_some_and(|max| record.amount > max) {
            return false;
        }
        true
    }

    /// Returns matching records ordered by ascending date; equal dates keep their input order.
    pub fn apply<'a, I>(&self, records: I) -> Vec<&'a ExpenseRecord>
    where
        I: IntoIterator<Item = &'a ExpenseRecord>,
    {
        let mut matched: Vec<&ExpenseRecord> =
            records.into_iter().filter(|record| self.matches(record)).collect();
        matched.sort_by_key(|record| record.date);
        matched
    }
}
