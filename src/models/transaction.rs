use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_utils::YearMonth;
use crate::filters;

/// Category assigned to transfers towards savings accounts.
pub const SAVINGS_CATEGORY: &str = "Savings";

/// Category labels treated as savings. The bank itself files some rows under
/// "Epargne".
pub const SAVINGS_CATEGORIES: &[&str] = &[SAVINGS_CATEGORY, "Epargne"];

/// Subcategory labels for transfers between the holder's own accounts.
pub const INTERNAL_TRANSFER_SUBCATEGORIES: &[&str] = &["Internal transfers", "Virements internes"];

/// Subcategory given to aggregated savings in the sunburst hierarchy.
pub const NO_SUBCATEGORY: &str = "No subcategory";

/// One record of the bank export, fields still in their textual form.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransaction {
    #[serde(rename = "Opération pointée", default)]
    pub reconciled: String,
    #[serde(rename = "Date opération")]
    pub operation_date: String,
    #[serde(rename = "Libellé opération")]
    pub label: String,
    #[serde(rename = "Catégorie")]
    pub category: String,
    #[serde(rename = "Sous-catégorie", default)]
    pub subcategory: String,
    #[serde(rename = "Montant")]
    pub amount: String,
    /// 1-based line in the uploaded file, header included.
    #[serde(skip)]
    pub line: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub operation_date: NaiveDate,
    pub label: String,
    pub category: String,
    pub subcategory: String,
    pub amount_cents: i64,
    pub reconciled: String,
}

impl Transaction {
    /// Always derived from the operation date.
    pub fn year_month(&self) -> YearMonth {
        YearMonth::from_date(self.operation_date)
    }

    pub fn is_savings(&self) -> bool {
        SAVINGS_CATEGORIES.contains(&self.category.as_str())
    }

    pub fn is_internal_transfer(&self) -> bool {
        INTERNAL_TRANSFER_SUBCATEGORIES.contains(&self.subcategory.as_str())
    }

    /// Copy with the amount sign flipped.
    pub fn negated(&self) -> Self {
        Self {
            amount_cents: -self.amount_cents,
            ..self.clone()
        }
    }

    pub fn date_display(&self) -> String {
        self.operation_date.format("%d/%m/%Y").to_string()
    }

    pub fn amount_formatted(&self) -> String {
        filters::format_money(self.amount_cents)
    }

    pub fn amount_class(&self) -> &'static str {
        filters::amount_class(self.amount_cents)
    }
}
