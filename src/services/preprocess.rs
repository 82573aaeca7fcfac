use chrono::NaiveDate;
use regex::RegexSet;
use tracing::{debug, trace};

use crate::date_utils::window_start;
use crate::error::{AppError, AppResult};
use crate::models::{RawTransaction, Transaction, SAVINGS_CATEGORY};

pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Largest accepted magnitude for a single amount, in cents (10 billion euros).
/// Keeps every per-file total far from `i64` overflow.
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000_000;

/// Label fragments identifying transfers into the holder's savings accounts.
pub const SAVINGS_ACCOUNT_PATTERNS: &[&str] = &[
    "VIR LIVRET JEUNE",
    "VIR LIVRET BLEU",
    "VIR LIVRET D'EPARGNE POPULAIRE",
];

/// Rewrites the category of internal transfers to [`SAVINGS_CATEGORY`].
#[derive(Debug, Clone)]
pub struct SavingsRules {
    patterns: RegexSet,
}

impl SavingsRules {
    /// The own-name transfer pattern plus the three savings account patterns.
    pub fn for_holder(account_holder: &str) -> AppResult<Self> {
        let own_transfer = format!("VIR DE M {}", account_holder);
        let fragments = std::iter::once(own_transfer.as_str())
            .chain(SAVINGS_ACCOUNT_PATTERNS.iter().copied())
            .map(regex::escape);

        let patterns = RegexSet::new(fragments)
            .map_err(|e| AppError::Internal(format!("Invalid savings pattern: {}", e)))?;

        Ok(Self { patterns })
    }

    pub fn matches(&self, label: &str) -> bool {
        self.patterns.is_match(label)
    }

    /// Returns the transaction with its category set to Savings when the
    /// label matches. Applying it twice gives the same result as once.
    pub fn reclassify(&self, transaction: Transaction) -> Transaction {
        if self.matches(&transaction.label) {
            Transaction {
                category: SAVINGS_CATEGORY.to_string(),
                ..transaction
            }
        } else {
            transaction
        }
    }
}

/// Parse a decimal-comma amount (`-1 234,56`) into cents.
pub fn parse_amount_cents(raw: &str) -> AppResult<i64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let invalid = || AppError::Format(format!("invalid amount '{}'", raw));

    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(cleaned.as_str())),
    };

    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
        || fraction.len() > 2
    {
        return Err(invalid());
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse().map_err(|_| invalid())?,
    };

    let cents = whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(invalid)?;

    if cents > MAX_AMOUNT_CENTS {
        return Err(AppError::Format(format!(
            "amount '{}' is out of range",
            raw.trim()
        )));
    }

    Ok(if negative { -cents } else { cents })
}

pub fn parse_operation_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| AppError::Format(format!("invalid date '{}', expected dd/mm/yyyy", raw)))
}

fn normalize(raw: RawTransaction) -> AppResult<Transaction> {
    let line = raw.line;
    let with_line = |e: AppError| match e {
        AppError::Format(msg) => AppError::Format(format!("line {}: {}", line, msg)),
        other => other,
    };

    Ok(Transaction {
        operation_date: parse_operation_date(&raw.operation_date).map_err(with_line)?,
        amount_cents: parse_amount_cents(&raw.amount).map_err(with_line)?,
        label: raw.label,
        category: raw.category,
        subcategory: raw.subcategory,
        reconciled: raw.reconciled,
    })
}

/// Normalize raw rows, reclassify savings transfers, then keep the rows
/// dated within `[today - window_months, today]`.
pub fn preprocess(
    rows: Vec<RawTransaction>,
    window_months: u32,
    rules: &SavingsRules,
    today: NaiveDate,
) -> AppResult<Vec<Transaction>> {
    let total = rows.len();
    let start = window_start(today, window_months);

    let normalized = rows
        .into_iter()
        .map(|raw| normalize(raw).map(|t| rules.reclassify(t)))
        .collect::<AppResult<Vec<_>>>()?;

    let savings_rows = normalized
        .iter()
        .filter(|t| t.category == SAVINGS_CATEGORY)
        .count();
    trace!(savings_rows, "Savings reclassification applied");

    let kept: Vec<Transaction> = normalized
        .into_iter()
        .filter(|t| t.operation_date >= start && t.operation_date <= today)
        .collect();

    debug!(
        total,
        kept = kept.len(),
        window_start = %start,
        today = %today,
        "Preprocessing completed"
    );

    Ok(kept)
}
