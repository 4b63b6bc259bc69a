//! Expense aggregation: summary statistics and category breakdowns.
//!
//! Everything here is pure and deterministic. Amounts are summed as
//! `BigDecimal`, so repeated runs over the same records produce identical
//! totals regardless of input order.

use std::collections::HashMap;

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use serde::Serialize;

use super::expense::{ExpenseRecord, ExpenseStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateStats {
    /// Sum over every record, whatever its status.
    pub total_amount: BigDecimal,
    pub pending_count: usize,
    pub approved_count: usize,
    pub rejected_count: usize,
}

impl AggregateStats {
    pub fn empty() -> Self {
        Self {
            total_amount: BigDecimal::zero(),
            pending_count: 0,
            approved_count: 0,
            rejected_count: 0,
        }
    }

    pub fn record_count(&self) -> usize {
        self.pending_count + self.approved_count + self.rejected_count
    }

    pub fn count_for(&self, status: ExpenseStatus) -> usize {
        match status {
            ExpenseStatus::Pending => self.pending_count,
            ExpenseStatus::Approved => self.approved_count,
            ExpenseStatus::Rejected => self.rejected_count,
        }
    }
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: BigDecimal,
}

/// One entry per distinct category label, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryBreakdown(Vec<CategoryTotal>);

impl CategoryBreakdown {
    pub fn entries(&self) -> &[CategoryTotal] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, category: &str) -> Option<&BigDecimal> {
        self.0
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| &entry.amount)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(|entry| entry.category.as_str())
    }
}

impl IntoIterator for CategoryBreakdown {
    type Item = CategoryTotal;
    type IntoIter = std::vec::IntoIter<CategoryTotal>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpenseReport {
    pub stats: AggregateStats,
    pub breakdown: CategoryBreakdown,
}

/// Aggregates expense records into summary statistics and a category breakdown.
///
/// Categories are matched exactly (case-sensitive, no normalization).
pub fn aggregate<'a, I>(records: I) -> ExpenseReport
where
    I: IntoIterator<Item = &'a ExpenseRecord>,
{
    let mut stats = AggregateStats::empty();
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for record in records {
        let amount = record.amount.as_decimal();
        stats.total_amount += amount;

        match record.status {
            ExpenseStatus::Pending => stats.pending_count += 1,
            ExpenseStatus::Approved => stats.approved_count += 1,
            ExpenseStatus::Rejected => stats.rejected_count += 1,
        }

        match index.get(record.category.as_str()) {
            Some(&slot) => totals[slot].amount += amount,
            None => {
                index.insert(record.category.as_str(), totals.len());
                totals.push(CategoryTotal {
                    category: record.category.clone(),
                    amount: amount.clone(),
                });
            }
        }
    }

    ExpenseReport {
        stats,
        breakdown: CategoryBreakdown(totals),
    }
}

/// Renders an amount with exactly two fraction digits, rounding half-up.
pub fn format_amount(amount: &BigDecimal) -> String {
    amount.with_scale_round(2, RoundingMode::HalfUp).to_string()
}
