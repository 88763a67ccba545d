//! Aggregates derived from the expense collection. Nothing here is persisted as source of truth.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::record::ExpenseRecord;

/// Per-category totals. Field names double as the report CSV header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Total")]
    pub total: f64,
    #[serde(rename = "Average")]
    pub average: f64,
    #[serde(rename = "Count")]
    pub count: usize,
}

/// Whole-ledger statistics plus the category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: f64,
    pub average: f64,
    pub median: f64,
    pub count: usize,
    pub by_category: Vec<CategorySummary>,
}

impl Summary {
    pub fn empty() -> Self {
        Self {
            total: 0.0,
            average: 0.0,
            median: 0.0,
            count: 0,
            by_category: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// First day of the month.
    pub month: NaiveDate,
    pub total: f64,
}

impl MonthlyTotal {
    pub fn label(&self) -> String {
        self.month.format("%Y-%m").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: f64,
    /// Share of the overall total, in percent.
    pub percent: f64,
}

/// Half-open `[lower, upper)` bin, except the last which also includes `upper`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

pub fn summarize(records: &[ExpenseRecord]) -> Summary {
    if records.is_empty() {
        return Summary::empty();
    }
    let amounts: Vec<f64> = records.iter().map(|record| record.amount).collect();
    let total: f64 = amounts.iter().sum();
    let count = amounts.len();
    Summary {
        total,
        average: total / count as f64,
        median: median(&amounts),
        count,
        by_category: by_category(records),
    }
}

/// Category breakdown ordered by descending total, ties by category name.
pub fn by_category(records: &[ExpenseRecord]) -> Vec<CategorySummary> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(record.category.as_str()).or_insert((0.0, 0));
        entry.0 += record.amount;
        entry.1 += 1;
    }
    let mut rows: Vec<CategorySummary> = groups
        .into_iter()
        .map(|(category, (total, count))| CategorySummary {
            category: category.to_string(),
            total,
            average: total / count as f64,
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.total.total_cmp(&a.total));
    rows
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

pub fn monthly_totals(records: &[ExpenseRecord]) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        let month = record.date.with_day(1).unwrap_or(record.date);
        *months.entry(month).or_insert(0.0) += record.amount;
    }
    months
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect()
}

pub fn category_shares(records: &[ExpenseRecord]) -> Vec<CategoryShare> {
    let breakdown = by_category(records);
    let grand_total: f64 = breakdown.iter().map(|row| row.total).sum();
    breakdown
        .into_iter()
        .map(|row| CategoryShare {
            percent: if grand_total > 0.0 {
                row.total / grand_total * 100.0
            } else {
                0.0
            },
            category: row.category,
            total: row.total,
        })
        .collect()
}

/// Upper bound on histogram bins; larger requests are clamped to it.
pub const MAX_HISTOGRAM_BINS: usize = 1000;

pub fn amount_histogram(records: &[ExpenseRecord], bins: usize) -> Vec<HistogramBin> {
    if bins == 0 || records.is_empty() {
        return Vec::new();
    }
    let bins = bins.min(MAX_HISTOGRAM_BINS);
    let (min, max) = records.iter().fold((f64::MAX, f64::MIN), |(lo, hi), record| {
        (lo.min(record.amount), hi.max(record.amount))
    });
    if max <= min {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: records.len(),
        }];
    }
    let width = (max - min) / bins as f64;
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|idx| HistogramBin {
            lower: min + width * idx as f64,
            upper: if idx + 1 == bins {
                max
            } else {
                min + width * (idx + 1) as f64
            },
            count: 0,
        })
        .collect();
    for record in records {
        let idx = (((record.amount - min) / width) as usize).min(bins - 1);
        histogram[idx].count += 1;
    }
    histogram
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(y: i32, m: u32, d: u32, amount: f64, category: &str) -> ExpenseRecord {
        ExpenseRecord {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            amount,
            category: category.into(),
            description: String::new(),
        }
    }

    fn sample() -> Vec<ExpenseRecord> {
        vec![
            record(2024, 1, 1, 100.0, "Food"),
            record(2024, 1, 2, 50.0, "Food"),
            record(2024, 1, 3, 30.0, "Transport"),
        ]
    }

    #[test]
    fn empty_summary_is_zeroed() {
        assert_eq!(summarize(&[]), Summary::empty());
    }

    #[test]
    fn summary_matches_hand_computed_values() {
        let summary = summarize(&sample());
        assert_eq!(summary.total, 180.0);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average, 60.0);
        assert_eq!(summary.median, 50.0);
        assert_eq!(
            summary.by_category,
            vec![
                CategorySummary {
                    category: "Food".into(),
                    total: 150.0,
                    average: 75.0,
                    count: 2,
                },
                CategorySummary {
                    category: "Transport".into(),
                    total: 30.0,
                    average: 30.0,
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn median_of_even_count_averages_middle_pair() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn category_ties_break_on_name() {
        let records = vec![
            record(2024, 1, 1, 10.0, "Zoo"),
            record(2024, 1, 1, 10.0, "Art"),
        ];
        let names: Vec<String> = by_category(&records).into_iter().map(|row| row.category).collect();
        assert_eq!(names, vec!["Art", "Zoo"]);
    }

    #[test]
    fn monthly_totals_group_by_calendar_month() {
        let mut records = sample();
        records.push(record(2024, 2, 14, 20.0, "Gifts"));
        records.push(record(2023, 12, 31, 5.0, "Food"));
        let months: Vec<(String, f64)> = monthly_totals(&records)
            .iter()
            .map(|row| (row.label(), row.total))
            .collect();
        assert_eq!(
            months,
            vec![
                ("2023-12".to_string(), 5.0),
                ("2024-01".to_string(), 180.0),
                ("2024-02".to_string(), 20.0),
            ]
        );
    }

    #[test]
    fn shares_sum_to_one_hundred() {
        let shares = category_shares(&sample());
        let sum: f64 = shares.iter().map(|share| share.percent).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert!((shares[0].percent - 83.333_333).abs() < 1e-3);
    }

    #[test]
    fn histogram_places_max_in_last_bin() {
        let bins = amount_histogram(&sample(), 7);
        assert_eq!(bins.len(), 7);
        assert_eq!(bins.iter().map(|bin| bin.count).sum::<usize>(), 3);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[6].count, 1);
        assert_eq!(bins[6].upper, 100.0);
    }

    #[test]
    fn histogram_bin_count_is_clamped() {
        let bins = amount_histogram(&sample(), usize::MAX);
        assert_eq!(bins.len(), MAX_HISTOGRAM_BINS);
        assert_eq!(bins.iter().map(|bin| bin.count).sum::<usize>(), 3);
        assert_eq!(bins[MAX_HISTOGRAM_BINS - 1].upper, 100.0);
    }

    #[test]
    fn histogram_degenerate_inputs() {
        assert!(amount_histogram(&sample(), 0).is_empty());
        assert!(amount_histogram(&[], 20).is_empty());
        let same = vec![record(2024, 1, 1, 5.0, "A"), record(2024, 1, 2, 5.0, "B")];
        let bins = amount_histogram(&same, 20);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
    }
}
