use std::cmp::Ordering;

use crate::models::Transaction;

/// Sort direction for table columns.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Desc,
    Asc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "asc" => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Trait for column enums. Each sortable table defines its own column enum
/// implementing this trait.
pub trait SortableColumn: Sized + Default + Clone + PartialEq {
    type Row;

    /// Parse column name from a form value.
    fn from_str(s: &str) -> Option<Self>;

    fn as_str(&self) -> &'static str;

    /// Ascending order of two rows on this column.
    fn compare(&self, a: &Self::Row, b: &Self::Row) -> Ordering;
}

/// Columns of the transaction table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TransactionColumn {
    Reconciled,
    #[default]
    Date,
    Label,
    Category,
    Subcategory,
    Amount,
}

impl TransactionColumn {
    pub fn all() -> &'static [TransactionColumn] {
        &[
            Self::Reconciled,
            Self::Date,
            Self::Label,
            Self::Category,
            Self::Subcategory,
            Self::Amount,
        ]
    }

    /// Header text, as the bank export names the column.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Reconciled => "Opération pointée",
            Self::Date => "Date opération",
            Self::Label => "Libellé opération",
            Self::Category => "Catégorie",
            Self::Subcategory => "Sous-catégorie",
            Self::Amount => "Montant",
        }
    }
}

impl SortableColumn for TransactionColumn {
    type Row = Transaction;

    fn from_str(s: &str) -> Option<Self> {
        match s {
            "reconciled" => Some(Self::Reconciled),
            "date" => Some(Self::Date),
            "label" => Some(Self::Label),
            "category" => Some(Self::Category),
            "subcategory" => Some(Self::Subcategory),
            "amount" => Some(Self::Amount),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Reconciled => "reconciled",
            Self::Date => "date",
            Self::Label => "label",
            Self::Category => "category",
            Self::Subcategory => "subcategory",
            Self::Amount => "amount",
        }
    }

    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            Self::Reconciled => a.reconciled.cmp(&b.reconciled),
            Self::Date => a.operation_date.cmp(&b.operation_date),
            Self::Label => a.label.cmp(&b.label),
            Self::Category => a.category.cmp(&b.category),
            Self::Subcategory => a.subcategory.cmp(&b.subcategory),
            Self::Amount => a.amount_cents.cmp(&b.amount_cents),
        }
    }
}

/// Sort configuration passed to templates.
#[derive(Debug, Clone)]
pub struct TableSort<C: SortableColumn> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C: SortableColumn> TableSort<C> {
    /// Build from form values, falling back to the defaults on unknown input.
    pub fn parse(column: Option<&str>, direction: Option<&str>) -> Self {
        Self {
            column: column.and_then(C::from_str).unwrap_or_default(),
            direction: direction.map(SortDirection::from_str).unwrap_or_default(),
        }
    }

    /// Stable sort; rows equal on the column keep their input order.
    pub fn sort(&self, rows: &mut [C::Row]) {
        rows.sort_by(|a, b| {
            let ord = self.column.compare(a, b);
            match self.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }

    /// Check if this column is currently being sorted.
    pub fn is_active(&self, col: &C) -> bool {
        &self.column == col
    }

    /// Get the direction to use when clicking a column header.
    /// If already sorted by this column, toggle direction; otherwise use default (Desc).
    pub fn next_direction_for(&self, col: &C) -> SortDirection {
        if self.is_active(col) {
            self.direction.toggle()
        } else {
            SortDirection::Desc
        }
    }

    /// Get sort indicator for a column header ("▲", "▼", or "").
    pub fn indicator(&self, col: &C) -> &'static str {
        if self.is_active(col) {
            match self.direction {
                SortDirection::Asc => "▲",
                SortDirection::Desc => "▼",
            }
        } else {
            ""
        }
    }
}

impl<C: SortableColumn> Default for TableSort<C> {
    fn default() -> Self {
        Self {
            column: C::default(),
            direction: SortDirection::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(day: u32, label: &str, amount_cents: i64) -> Transaction {
        Transaction {
            operation_date: NaiveDate::from_ymd_opt(2025, 4, day).unwrap(),
            label: label.into(),
            category: "C".into(),
            subcategory: "S".into(),
            amount_cents,
            reconciled: "0".into(),
        }
    }

    #[test]
    fn test_default_sort_is_date_desc() {
        let mut rows = vec![tx(1, "a", 1), tx(3, "b", 2), tx(2, "c", 3)];
        TableSort::<TransactionColumn>::default().sort(&mut rows);
        let days: Vec<String> = rows.iter().map(|t| t.date_display()).collect();
        assert_eq!(days, vec!["03/04/2025", "02/04/2025", "01/04/2025"]);
    }

    #[test]
    fn test_parse_sort_amount_asc() {
        let sort = TableSort::<TransactionColumn>::parse(Some("amount"), Some("asc"));
        let mut rows = vec![tx(1, "a", 300), tx(2, "b", -50), tx(3, "c", 120)];
        sort.sort(&mut rows);
        let amounts: Vec<i64> = rows.iter().map(|t| t.amount_cents).collect();
        assert_eq!(amounts, vec![-50, 120, 300]);
    }

    #[test]
    fn test_parse_unknown_falls_back() {
        let sort = TableSort::<TransactionColumn>::parse(Some("bogus"), Some("sideways"));
        assert_eq!(sort.column, TransactionColumn::Date);
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn test_next_direction_and_indicator() {
        let sort = TableSort::<TransactionColumn>::parse(Some("label"), Some("asc"));
        assert_eq!(
            sort.next_direction_for(&TransactionColumn::Label),
            SortDirection::Desc
        );
        assert_eq!(
            sort.next_direction_for(&TransactionColumn::Amount),
            SortDirection::Desc
        );
        assert_eq!(sort.indicator(&TransactionColumn::Label), "▲");
        assert_eq!(sort.indicator(&TransactionColumn::Amount), "");
    }

    #[test]
    fn test_column_names_round_trip() {
        for col in TransactionColumn::all() {
            assert_eq!(TransactionColumn::from_str(col.as_str()), Some(*col));
        }
    }
}
