use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::date_utils::YearMonth;
use crate::models::Transaction;

/// The category multi-select: everything, or an explicit list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Vec<String>),
}

impl CategoryFilter {
    pub const ALL: &'static str = "All";

    /// An empty selection or one containing "All" means no restriction.
    pub fn from_selection(selection: Vec<String>) -> Self {
        if selection.is_empty() || selection.iter().any(|s| s == Self::ALL) {
            Self::All
        } else {
            Self::Only(selection)
        }
    }

    pub fn accepts(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.iter().any(|n| n == category),
        }
    }

    pub fn apply(&self, rows: &[Transaction]) -> Vec<Transaction> {
        rows.iter()
            .filter(|t| self.accepts(&t.category))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostBar {
    pub year_month: YearMonth,
    pub category: String,
    pub subcategory: String,
    pub amount_cents: i64,
}

/// Monthly costs stacked by subcategory.
pub fn cost_bars(costs: &[Transaction], filter: &CategoryFilter) -> Vec<CostBar> {
    let mut totals: BTreeMap<(&str, &str, YearMonth), i64> = BTreeMap::new();
    for t in costs.iter().filter(|t| filter.accepts(&t.category)) {
        *totals
            .entry((t.category.as_str(), t.subcategory.as_str(), t.year_month()))
            .or_insert(0) += t.amount_cents;
    }

    totals
        .into_iter()
        .map(|((category, subcategory, year_month), amount_cents)| CostBar {
            year_month,
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            amount_cents,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsKind {
    Acquired,
    Spent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavingsBar {
    pub year_month: YearMonth,
    pub amount_cents: i64,
    pub kind: SavingsKind,
}

/// Net savings per month. A negative month means savings were drawn down.
pub fn savings_bars(savings: &[Transaction]) -> Vec<SavingsBar> {
    let mut totals: BTreeMap<YearMonth, i64> = BTreeMap::new();
    for t in savings {
        *totals.entry(t.year_month()).or_insert(0) += t.amount_cents;
    }

    totals
        .into_iter()
        .map(|(year_month, amount_cents)| SavingsBar {
            year_month,
            amount_cents,
            kind: if amount_cents < 0 {
                SavingsKind::Spent
            } else {
                SavingsKind::Acquired
            },
        })
        .collect()
}

/// Five-number summary for a box plot, in cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxStats {
    pub fn from_sorted(sorted: &[i64]) -> Option<Self> {
        if sorted.is_empty() {
            return None;
        }
        Some(Self {
            min: sorted[0] as f64,
            q1: quantile(sorted, 0.25),
            median: quantile(sorted, 0.5),
            q3: quantile(sorted, 0.75),
            max: sorted[sorted.len() - 1] as f64,
        })
    }
}

/// Linear interpolation between closest ranks.
fn quantile(sorted: &[i64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] as f64 + (sorted[upper] - sorted[lower]) as f64 * frac
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategoryDistribution {
    pub subcategory: String,
    pub amounts_cents: Vec<i64>,
    pub stats: BoxStats,
}

/// Spread of individual amounts per subcategory for one drill-down category.
pub fn distribution(rows: &[Transaction], category: &str) -> Vec<SubcategoryDistribution> {
    let mut groups: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
    for t in rows.iter().filter(|t| t.category == category) {
        groups
            .entry(t.subcategory.as_str())
            .or_default()
            .push(t.amount_cents);
    }

    groups
        .into_iter()
        .filter_map(|(subcategory, mut amounts)| {
            amounts.sort_unstable();
            let stats = BoxStats::from_sorted(&amounts)?;
            Some(SubcategoryDistribution {
                subcategory: subcategory.to_string(),
                amounts_cents: amounts,
                stats,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub income_cents: i64,
    pub cost_cents: i64,
    pub savings_cents: i64,
    /// Income left after costs and savings.
    pub balance_cents: i64,
    pub transaction_count: usize,
}

impl PeriodSummary {
    pub fn from_views(income: &[Transaction], costs: &[Transaction], savings: &[Transaction]) -> Self {
        let total = |rows: &[Transaction]| rows.iter().map(|t| t.amount_cents).sum::<i64>();
        let (income_cents, cost_cents, savings_cents) = (total(income), total(costs), total(savings));
        Self {
            income_cents,
            cost_cents,
            savings_cents,
            balance_cents: income_cents - cost_cents - savings_cents,
            transaction_count: income.len() + costs.len() + savings.len(),
        }
    }
}

/// Distinct categories, sorted, for the filter dropdowns.
pub fn category_options(rows: &[Transaction]) -> Vec<String> {
    rows.iter()
        .map(|t| t.category.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
