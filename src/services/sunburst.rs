use std::collections::BTreeMap;

use serde::Serialize;

use crate::date_utils::YearMonth;
use crate::models::{Transaction, NO_SUBCATEGORY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SunburstRow {
    pub year_month: YearMonth,
    pub category: String,
    pub subcategory: String,
    pub amount_cents: i64,
}

/// A node of the category → subcategory hierarchy. Leaves have no children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SunburstNode {
    pub name: String,
    pub value_cents: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SunburstNode>,
}

/// Savings summed per (month, category) under a synthetic subcategory,
/// followed by the cost rows as they are.
pub fn sunburst_rows(savings: &[Transaction], costs: &[Transaction]) -> Vec<SunburstRow> {
    let mut savings_totals: BTreeMap<(YearMonth, &str), i64> = BTreeMap::new();
    for t in savings {
        *savings_totals
            .entry((t.year_month(), t.category.as_str()))
            .or_insert(0) += t.amount_cents;
    }

    let savings_rows = savings_totals
        .into_iter()
        .map(|((year_month, category), amount_cents)| SunburstRow {
            year_month,
            category: category.to_string(),
            subcategory: NO_SUBCATEGORY.to_string(),
            amount_cents,
        });

    let cost_rows = costs.iter().map(|t| SunburstRow {
        year_month: t.year_month(),
        category: t.category.clone(),
        subcategory: t.subcategory.clone(),
        amount_cents: t.amount_cents,
    });

    savings_rows.chain(cost_rows).collect()
}

/// Fold rows into category roots with subcategory leaves, both sorted by name.
pub fn sunburst_tree(rows: &[SunburstRow]) -> Vec<SunburstNode> {
    let mut tree: BTreeMap<&str, BTreeMap<&str, i64>> = BTreeMap::new();
    for row in rows {
        *tree
            .entry(row.category.as_str())
            .or_default()
            .entry(row.subcategory.as_str())
            .or_insert(0) += row.amount_cents;
    }

    tree.into_iter()
        .map(|(category, leaves)| {
            let children: Vec<SunburstNode> = leaves
                .into_iter()
                .map(|(subcategory, value_cents)| SunburstNode {
                    name: subcategory.to_string(),
                    value_cents,
                    children: Vec::new(),
                })
                .collect();
            SunburstNode {
                name: category.to_string(),
                value_cents: children.iter().map(|c| c.value_cents).sum(),
                children,
            }
        })
        .collect()
}
