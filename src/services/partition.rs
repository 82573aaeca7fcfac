use crate::models::Transaction;

/// The four derived views of a normalized export.
///
/// Savings and cost amounts are sign-inverted so contributions and spending
/// read as positive values; income keeps the bank's sign.
#[derive(Debug, Clone, Default)]
pub struct Views {
    pub savings: Vec<Transaction>,
    pub costs: Vec<Transaction>,
    pub income: Vec<Transaction>,
    /// Savings followed by costs.
    pub combined: Vec<Transaction>,
}

pub fn partition(transactions: &[Transaction]) -> Views {
    let (savings_rows, others): (Vec<&Transaction>, Vec<&Transaction>) =
        transactions.iter().partition(|t| t.is_savings());

    let savings: Vec<Transaction> = savings_rows.into_iter().map(Transaction::negated).collect();

    let costs: Vec<Transaction> = others
        .iter()
        .filter(|t| t.amount_cents < 0 && !t.is_internal_transfer())
        .map(|t| t.negated())
        .collect();

    let income: Vec<Transaction> = others
        .iter()
        .filter(|t| t.amount_cents >= 0)
        .map(|t| (*t).clone())
        .collect();

    let combined = savings.iter().chain(costs.iter()).cloned().collect();

    Views {
        savings,
        costs,
        income,
        combined,
    }
}
