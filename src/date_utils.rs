use std::fmt;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Serialize, Serializer};

/// A calendar month, the grouping and filtering unit of every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Shift by a signed number of months.
    pub fn shift(&self, months: i32) -> Self {
        let total = self.year * 12 + self.month as i32 - 1 + months;
        Self {
            year: total.div_euclid(12),
            month: (total.rem_euclid(12) + 1) as u32,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// First day of the retention window: `today` minus `months`, day clamped to
/// the end of the target month when it does not exist there.
pub fn window_start(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// Slider index to year-month table, built once at startup.
///
/// Slot 0 is the oldest month, the last slot is the month containing the
/// build date. The table does not move while the process runs, so a server
/// left running across a month boundary keeps showing the old calendar.
#[derive(Debug, Clone)]
pub struct MonthCalendar {
    slots: Vec<YearMonth>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthSlot {
    pub index: usize,
    pub year_month: YearMonth,
    pub label: String,
}

impl MonthCalendar {
    pub fn ending_at(today: NaiveDate, len: usize) -> Self {
        let current = YearMonth::from_date(today);
        let len = len.max(1);
        let slots = (0..len)
            .map(|i| current.shift(i as i32 - (len as i32 - 1)))
            .collect();
        Self { slots }
    }

    pub fn month_count(&self) -> usize {
        self.slots.len()
    }

    pub fn last_index(&self) -> usize {
        self.slots.len().saturating_sub(1)
    }

    pub fn get(&self, index: usize) -> Option<YearMonth> {
        self.slots.get(index).copied()
    }

    pub fn slots(&self) -> Vec<MonthSlot> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, ym)| MonthSlot {
                index,
                year_month: *ym,
                label: ym.to_string(),
            })
            .collect()
    }
}
