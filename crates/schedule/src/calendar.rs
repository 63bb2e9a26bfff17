//! Month grid for calendar views.
//!
//! A grid is always six weeks of seven days starting on the Sunday on or
//! before the first of the month, so every month renders as the same
//! rectangle whatever its length or starting weekday.
//!
//! ```text
//!      January 2024
//! Su Mo Tu We Th Fr Sa
//! 31  1  2  3  4  5  6   <- one leading December cell
//!  7  8  9 10 11 12 13
//! 14 15 16 17 18 19 20
//! 21 22 23 24 25 26 27
//! 28 29 30 31  1  2  3
//!  4  5  6  7  8  9 10   <- trailing February cells
//! ```

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::slot::ScheduledWashSlot;

/// Cells in a month grid (6 weeks x 7 days).
pub const GRID_CELLS: usize = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
}

/// 42 consecutive days covering one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGrid {
    year: i32,
    month: u32,
    days: Vec<CalendarDay>,
}

impl MonthGrid {
    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based month of the reference date.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    pub fn into_days(self) -> Vec<CalendarDay> {
        self.days
    }

    /// Six rows of seven, Sunday first.
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay]> {
        self.days.chunks(7)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.days[0].date
    }

    pub fn last_day(&self) -> NaiveDate {
        self.days[GRID_CELLS - 1].date
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay> {
        if !self.contains(date) {
            return None;
        }
        let index = (date - self.first_day()).num_days() as usize;
        self.days.get(index)
    }

    pub fn today(&self) -> Option<&CalendarDay> {
        self.days.iter().find(|d| d.is_today)
    }
}

/// Build the grid for the month containing `reference_date`.
///
/// `today` is supplied by the caller so the result depends only on the
/// arguments. `None` when the six weeks would run past the limits of
/// [`NaiveDate`] (months touching `NaiveDate::MIN` or `NaiveDate::MAX`).
pub fn build_month_grid(reference_date: NaiveDate, today: NaiveDate) -> Option<MonthGrid> {
    let first_of_month = reference_date.with_day(1)?;
    let lead = u64::from(first_of_month.weekday().num_days_from_sunday());
    let grid_start = first_of_month.checked_sub_days(Days::new(lead))?;

    let days = grid_start
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| CalendarDay {
            date,
            is_current_month: date.year() == reference_date.year()
                && date.month() == reference_date.month(),
            is_today: date == today,
        })
        .collect::<Vec<_>>();
    if days.len() != GRID_CELLS {
        return None;
    }

    Some(MonthGrid {
        year: reference_date.year(),
        month: reference_date.month(),
        days,
    })
}

/// First day of the month `delta` months away from `reference_date`.
/// Negative deltas go backwards. `None` outside the calendar range.
pub fn shift_month(reference_date: NaiveDate, delta: i32) -> Option<NaiveDate> {
    let first = reference_date.with_day(1)?;
    let months = Months::new(delta.unsigned_abs());
    if delta >= 0 {
        first.checked_add_months(months)
    } else {
        first.checked_sub_months(months)
    }
}

/// Bucket slots by scheduled date for the assignment calendar.
pub fn group_by_day(slots: &[ScheduledWashSlot]) -> BTreeMap<NaiveDate, Vec<&ScheduledWashSlot>> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&ScheduledWashSlot>> = BTreeMap::new();
    for slot in slots {
        by_day.entry(slot.scheduled_date).or_default().push(slot);
    }
    by_day
}
