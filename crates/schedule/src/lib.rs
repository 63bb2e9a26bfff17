//! Scheduling utilities shared by the wash-entry, washer-assignment and
//! schedule-wash calendars.
//!
//! Everything here is pure calendar-date arithmetic over [`chrono::NaiveDate`]:
//! no clock reads, no I/O, no shared state. Callers supply "today" and the
//! start date explicitly.

pub mod calendar;
pub mod draft;
pub mod error;
pub mod generator;
pub mod interior;
pub mod slot;

pub use calendar::{
    build_month_grid, group_by_day, shift_month, CalendarDay, MonthGrid, GRID_CELLS,
};
pub use draft::WashSchedule;
pub use error::{EditError, ValidationError};
pub use generator::{
    generate_schedule, generate_schedule_default, CompressionPolicy, WashScheduleRequest,
    DEFAULT_MAX_SPAN_DAYS, STANDARD_INTERVALS,
};
pub use interior::{interior_positions, interior_stride, service_type_for};
pub use slot::{ScheduledWashSlot, ServiceType, SlotContext};
