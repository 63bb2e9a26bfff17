//! Schedule error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Rejected generation input. Checked before any date arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("totalWashes must be greater than zero")]
    NonPositiveWashCount,

    #[error("intervalDays must be greater than zero")]
    NonPositiveInterval,

    #[error("interiorWashCount ({interior}) exceeds totalWashes ({total})")]
    InteriorCountExceedsTotal { interior: u32, total: u32 },

    #[error("date arithmetic from {0} leaves the supported calendar range")]
    DateOutOfRange(NaiveDate),
}

impl ValidationError {
    /// Name of the request field that failed, as shown next to a form input.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NonPositiveWashCount => "totalWashes",
            ValidationError::NonPositiveInterval => "intervalDays",
            ValidationError::InteriorCountExceedsTotal { .. } => "interiorWashCount",
            ValidationError::DateOutOfRange(_) => "startDate",
        }
    }
}

/// Rejected edit to an already generated schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no wash number {0} in this schedule")]
    UnknownWashNumber(u32),

    #[error("{date} is outside the schedule window {start}..={end}")]
    OutsideWindow {
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },
}
