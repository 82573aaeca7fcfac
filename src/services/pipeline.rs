use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::date_utils::YearMonth;
use crate::error::AppResult;
use crate::models::Transaction;
use crate::services::analytics::{
    category_options, cost_bars, distribution, savings_bars, CategoryFilter, CostBar,
    PeriodSummary, SavingsBar, SubcategoryDistribution,
};
use crate::services::csv_parser::parse_upload;
use crate::services::date_range::MonthRange;
use crate::services::partition::partition;
use crate::services::preprocess::preprocess;
use crate::services::recurring::{detect_recurring, RecurringExpense};
use crate::services::sunburst::{sunburst_rows, sunburst_tree, SunburstNode};
use crate::sort_utils::{TableSort, TransactionColumn};
use crate::state::AppState;

/// The uploaded export, re-sent with every interaction.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Everything the user can change on the dashboard.
#[derive(Debug, Clone, Default)]
pub struct DashboardQuery {
    pub categories: CategoryFilter,
    pub from_index: Option<usize>,
    pub to_index: Option<usize>,
    pub drill_down: Option<String>,
    pub sort: TableSort<TransactionColumn>,
    pub search: Option<String>,
}

impl DashboardQuery {
    pub fn month_range(&self, state: &AppState) -> AppResult<MonthRange> {
        let calendar = &state.calendar;
        MonthRange::from_indices(
            calendar,
            self.from_index.unwrap_or(0),
            self.to_index.unwrap_or_else(|| calendar.last_index()),
        )
    }

    fn matches_search(&self, t: &Transaction) -> bool {
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => t
                .label
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub reconciled: String,
    pub operation_date: String,
    pub year_month: YearMonth,
    pub label: String,
    pub category: String,
    pub subcategory: String,
    pub amount_cents: i64,
    pub amount_formatted: String,
    pub amount_class: &'static str,
}

impl From<&Transaction> for TableRow {
    fn from(t: &Transaction) -> Self {
        Self {
            reconciled: t.reconciled.clone(),
            operation_date: t.date_display(),
            year_month: t.year_month(),
            label: t.label.clone(),
            category: t.category.clone(),
            subcategory: t.subcategory.clone(),
            amount_cents: t.amount_cents,
            amount_formatted: t.amount_formatted(),
            amount_class: t.amount_class(),
        }
    }
}

/// Every dataset the dashboard shows for one request.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub file_name: String,
    pub from: YearMonth,
    pub to: YearMonth,
    pub categories: Vec<String>,
    pub drill_down: Option<String>,
    pub summary: PeriodSummary,
    pub table: Vec<TableRow>,
    pub cost_bars: Vec<CostBar>,
    pub sunburst: Vec<SunburstNode>,
    pub distribution: Vec<SubcategoryDistribution>,
    pub recurring: Vec<RecurringExpense>,
    pub savings_bars: Vec<SavingsBar>,
}

/// Run the whole pipeline from the raw upload. Nothing is cached between
/// calls; `today` anchors the retention window.
pub fn build_dashboard(
    state: &AppState,
    upload: &Upload,
    query: &DashboardQuery,
    today: NaiveDate,
) -> AppResult<Dashboard> {
    let range = query.month_range(state)?;

    let raw = parse_upload(&upload.content, &upload.file_name)?;
    let transactions = preprocess(raw, state.config.retention_months, &state.rules, today)?;
    let views = partition(&transactions);

    // Detection runs on the whole retention window so that the first months
    // of the selected range still see their predecessors.
    let recurring = range.filter_recurring(&detect_recurring(&views.costs));
    let windowed = range.filter_views(&views);

    let categories = category_options(&windowed.combined);
    let drill_down = query
        .drill_down
        .clone()
        .filter(|c| categories.contains(c))
        .or_else(|| categories.first().cloned());

    let mut table_rows: Vec<Transaction> = query
        .categories
        .apply(&windowed.combined)
        .into_iter()
        .filter(|t| query.matches_search(t))
        .collect();
    query.sort.sort(&mut table_rows);

    let dashboard = Dashboard {
        file_name: upload.file_name.clone(),
        from: range.from,
        to: range.to,
        summary: PeriodSummary::from_views(&windowed.income, &windowed.costs, &windowed.savings),
        table: table_rows.iter().map(TableRow::from).collect(),
        cost_bars: cost_bars(&windowed.costs, &query.categories),
        sunburst: sunburst_tree(&sunburst_rows(&windowed.savings, &windowed.costs)),
        distribution: drill_down
            .as_deref()
            .map(|c| distribution(&windowed.combined, c))
            .unwrap_or_default(),
        savings_bars: savings_bars(&windowed.savings),
        recurring,
        categories,
        drill_down,
    };

    debug!(
        from = %dashboard.from,
        to = %dashboard.to,
        table_rows = dashboard.table.len(),
        recurring = dashboard.recurring.len(),
        "Dashboard datasets built"
    );
    info!(
        file_name = %upload.file_name,
        transactions = transactions.len(),
        "Dashboard computed"
    );

    Ok(dashboard)
}
