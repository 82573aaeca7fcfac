use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::date_utils::YearMonth;
use crate::models::Transaction;

/// A cost whose amount was also charged in each of the two preceding months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecurringExpense {
    pub year_month: YearMonth,
    pub label: String,
    pub category: String,
    pub subcategory: String,
    pub amount_cents: i64,
}

/// Cost rows of one month indexed by amount.
struct MonthBucket<'a> {
    by_amount: HashMap<i64, Vec<&'a Transaction>>,
}

impl<'a> MonthBucket<'a> {
    fn contains(&self, amount_cents: i64) -> bool {
        self.by_amount.contains_key(&amount_cents)
    }
}

fn bucket_by_month(costs: &[Transaction]) -> BTreeMap<YearMonth, MonthBucket<'_>> {
    let mut months: BTreeMap<YearMonth, MonthBucket<'_>> = BTreeMap::new();
    for cost in costs {
        months
            .entry(cost.year_month())
            .or_insert_with(|| MonthBucket {
                by_amount: HashMap::new(),
            })
            .by_amount
            .entry(cost.amount_cents)
            .or_default()
            .push(cost);
    }
    months
}

/// Detect recurring charges in the cost view.
///
/// Distinct months are taken in ascending order and walked three at a time.
/// Every row of the newest month whose amount also occurs in the middle and
/// in the oldest month is reported; labels play no part in the match. Rows
/// sharing month, label, category and subcategory are merged by summing.
/// Months do not have to be calendar-adjacent, only adjacent among the
/// months present in the data.
pub fn detect_recurring(costs: &[Transaction]) -> Vec<RecurringExpense> {
    let months = bucket_by_month(costs);
    let buckets: Vec<&MonthBucket<'_>> = months.values().collect();

    let mut grouped: BTreeMap<(YearMonth, String, String, String), i64> = BTreeMap::new();

    for window in buckets.windows(3) {
        let (oldest, middle, newest) = (window[0], window[1], window[2]);

        for (amount, rows) in &newest.by_amount {
            if !(middle.contains(*amount) && oldest.contains(*amount)) {
                continue;
            }
            for row in rows {
                let key = (
                    row.year_month(),
                    row.label.clone(),
                    row.category.clone(),
                    row.subcategory.clone(),
                );
                *grouped.entry(key).or_insert(0) += row.amount_cents;
            }
        }
    }

    let results: Vec<RecurringExpense> = grouped
        .into_iter()
        .map(
            |((year_month, label, category, subcategory), amount_cents)| RecurringExpense {
                year_month,
                label,
                category,
                subcategory,
                amount_cents,
            },
        )
        .collect();

    debug!(
        month_count = months.len(),
        recurring_count = results.len(),
        "Recurring expense detection completed"
    );

    results
}
