use crate::date_utils::{MonthCalendar, YearMonth};
use crate::error::{AppError, AppResult};
use crate::models::Transaction;
use crate::services::recurring::RecurringExpense;
use crate::services::partition::Views;

/// Inclusive span of months selected on the slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub from: YearMonth,
    pub to: YearMonth,
}

impl MonthRange {
    /// Resolve slider indices through the calendar.
    pub fn from_indices(calendar: &MonthCalendar, lo: usize, hi: usize) -> AppResult<Self> {
        if lo > hi {
            return Err(AppError::Range(format!(
                "start index {} is after end index {}",
                lo, hi
            )));
        }

        let lookup = |index: usize| {
            calendar.get(index).ok_or_else(|| {
                AppError::Range(format!(
                    "index {} is outside the calendar (0..={})",
                    index,
                    calendar.last_index()
                ))
            })
        };

        Ok(Self {
            from: lookup(lo)?,
            to: lookup(hi)?,
        })
    }

    /// The whole calendar.
    pub fn full(calendar: &MonthCalendar) -> AppResult<Self> {
        Self::from_indices(calendar, 0, calendar.last_index())
    }

    pub fn contains(&self, year_month: YearMonth) -> bool {
        self.from <= year_month && year_month <= self.to
    }

    pub fn filter_view(&self, rows: &[Transaction]) -> Vec<Transaction> {
        rows.iter()
            .filter(|t| self.contains(t.year_month()))
            .cloned()
            .collect()
    }

    pub fn filter_recurring(&self, rows: &[RecurringExpense]) -> Vec<RecurringExpense> {
        rows.iter()
            .filter(|r| self.contains(r.year_month))
            .cloned()
            .collect()
    }

    pub fn filter_views(&self, views: &Views) -> Views {
        Views {
            savings: self.filter_view(&views.savings),
            costs: self.filter_view(&views.costs),
            income: self.filter_view(&views.income),
            combined: self.filter_view(&views.combined),
        }
    }
}
