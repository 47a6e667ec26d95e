//! Month grid for the tracker calendar.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::completion::CompletionState;

pub const GRID_COLUMNS: usize = 7;
pub const GRID_ROWS: usize = 6;
pub const GRID_CELLS: usize = GRID_COLUMNS * GRID_ROWS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day() - Duration::days(1)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

/// What to do after the last day of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingPolicy {
    /// Always fill the grid to six full weeks.
    #[default]
    PadToFull,
    /// Add no trailing days when the month ends on a Saturday, as the legacy
    /// web calendar did.
    StopAfterSaturday,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub day_number: u32,
    pub is_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub completion_state: CompletionState,
    pub has_session: bool,
}

/// Everything the grid builder reads besides the month itself.
#[derive(Debug, Clone, Default)]
pub struct GridAnnotations<'a> {
    pub today: Option<NaiveDate>,
    pub selected: Option<NaiveDate>,
    pub completion: Option<&'a BTreeMap<NaiveDate, CompletionState>>,
    pub sessions: Option<&'a BTreeSet<NaiveDate>>,
}

fn leading_days(month: YearMonth) -> u32 {
    month.first_day().weekday().num_days_from_sunday()
}

fn trailing_days(month: YearMonth, policy: TrailingPolicy) -> u32 {
    if policy == TrailingPolicy::StopAfterSaturday && month.last_day().weekday() == Weekday::Sat {
        return 0;
    }
    GRID_CELLS as u32 - leading_days(month) - month.days_in_month()
}

/// First and last date shown for a month, for range queries.
pub fn grid_bounds(month: YearMonth, policy: TrailingPolicy) -> (NaiveDate, NaiveDate) {
    let start = month.first_day() - Duration::days(i64::from(leading_days(month)));
    let end = month.last_day() + Duration::days(i64::from(trailing_days(month, policy)));
    (start, end)
}

/// Sunday-first month grid including the spill-over days of adjacent months.
pub fn build_month_grid(
    month: YearMonth,
    policy: TrailingPolicy,
    annotations: &GridAnnotations<'_>,
) -> Vec<CalendarCell> {
    let (start, end) = grid_bounds(month, policy);

    start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| CalendarCell {
            date,
            day_number: date.day(),
            is_current_month: YearMonth::containing(date) == month,
            is_today: annotations.today == Some(date),
            is_selected: annotations.selected == Some(date),
            completion_state: annotations
                .completion
                .and_then(|states| states.get(&date).copied())
                .unwrap_or_default(),
            has_session: annotations
                .sessions
                .is_some_and(|sessions| sessions.contains(&date)),
        })
        .collect()
}

/// Split a grid into calendar rows.
pub fn weeks(cells: &[CalendarCell]) -> Vec<Vec<CalendarCell>> {
    cells.chunks(GRID_COLUMNS).map(<[CalendarCell]>::to_vec).collect()
}

/// Month being shown and the highlighted day, owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarView {
    pub current_month: YearMonth,
    pub selected_date: Option<NaiveDate>,
}

impl CalendarView {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            current_month: YearMonth::containing(today),
            selected_date: Some(today),
        }
    }

    /// Selection is kept across navigation.
    pub fn next_month(&mut self) {
        self.current_month = self.current_month.next();
    }

    pub fn prev_month(&mut self) {
        self.current_month = self.current_month.prev();
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = Some(date);
    }
}
