use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::Config;
use crate::date_utils::MonthCalendar;
use crate::error::AppResult;
use crate::services::preprocess::SavingsRules;

/// Read-only state shared by every request. Uploaded data is never stored
/// here; each request recomputes from the file it carries.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub calendar: Arc<MonthCalendar>,
    pub rules: Arc<SavingsRules>,
}

impl AppState {
    /// The calendar is fixed to the months ending at `today`.
    pub fn new(config: Config, today: NaiveDate) -> AppResult<Self> {
        let rules = SavingsRules::for_holder(&config.account_holder)?;
        let calendar = MonthCalendar::ending_at(today, config.retention_months as usize);

        tracing::debug!(
            months = calendar.month_count(),
            account_holder = %config.account_holder,
            "Application state built"
        );

        Ok(Self {
            config: Arc::new(config),
            calendar: Arc::new(calendar),
            rules: Arc::new(rules),
        })
    }
}
