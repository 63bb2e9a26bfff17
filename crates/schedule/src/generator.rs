//! Recurring wash-date generation.
//!
//! A monthly subscription is `total_washes` washes, `interval_days` apart,
//! starting on `start_date`. No wash may fall after
//! `start_date + max_span_days`; washes that would are compressed back into
//! the window according to a [`CompressionPolicy`].

use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;
use crate::interior::service_type_for;
use crate::slot::{ScheduledWashSlot, SlotContext};

/// Default ceiling on a schedule's length.
pub const DEFAULT_MAX_SPAN_DAYS: u32 = 30;

/// Interval presets offered by the wash-entry form. Any positive interval is accepted.
pub const STANDARD_INTERVALS: [u32; 5] = [3, 5, 7, 10, 15];

fn default_max_span_days() -> u32 {
    DEFAULT_MAX_SPAN_DAYS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WashScheduleRequest {
    pub start_date: NaiveDate,
    pub total_washes: u32,
    pub interval_days: u32,
    #[serde(default)]
    pub interior_wash_count: u32,
    #[serde(default = "default_max_span_days")]
    pub max_span_days: u32,
}

impl WashScheduleRequest {
    pub fn new(start_date: NaiveDate, total_washes: u32, interval_days: u32) -> Self {
        Self {
            start_date,
            total_washes,
            interval_days,
            interior_wash_count: 0,
            max_span_days: DEFAULT_MAX_SPAN_DAYS,
        }
    }

    pub fn with_interior(mut self, interior_wash_count: u32) -> Self {
        self.interior_wash_count = interior_wash_count;
        self
    }

    pub fn with_max_span(mut self, max_span_days: u32) -> Self {
        self.max_span_days = max_span_days;
        self
    }

    /// Reject bad counts. Never clamps.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.total_washes == 0 {
            return Err(ValidationError::NonPositiveWashCount);
        }
        if self.interval_days == 0 {
            return Err(ValidationError::NonPositiveInterval);
        }
        if self.interior_wash_count > self.total_washes {
            return Err(ValidationError::InteriorCountExceedsTotal {
                interior: self.interior_wash_count,
                total: self.total_washes,
            });
        }
        Ok(())
    }

    /// Last date a wash may be scheduled on.
    pub fn end_date(&self) -> Result<NaiveDate, ValidationError> {
        add_days(self.start_date, u64::from(self.max_span_days))
    }

    /// True when the naive `start + i * interval` dates run past the window.
    pub fn overflows(&self) -> bool {
        let last_offset =
            u64::from(self.total_washes.saturating_sub(1)) * u64::from(self.interval_days);
        last_offset > u64::from(self.max_span_days)
    }
}

/// How washes past the window are pulled back into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionPolicy {
    /// Re-space the whole schedule evenly across the window: wash `i` lands
    /// on `start + floor(i * max_span / (total - 1))`. Non-decreasing, first
    /// wash on the start date, last wash on the end date, and spacing never
    /// wider than the requested interval.
    #[default]
    Spread,
    /// Overflow wash `i` lands on `end - i` days. Matches the dashboard's
    /// historical output; dates can go backwards or repeat. Once `i` exceeds
    /// `max_span_days` the date falls before `start_date`, outside the
    /// window every other wash respects.
    Reference,
}

impl std::fmt::Display for CompressionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompressionPolicy::Spread => write!(f, "spread"),
            CompressionPolicy::Reference => write!(f, "reference"),
        }
    }
}

impl FromStr for CompressionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spread" => Ok(CompressionPolicy::Spread),
            "reference" => Ok(CompressionPolicy::Reference),
            other => Err(format!(
                "unknown compression policy '{other}' (expected 'spread' or 'reference')"
            )),
        }
    }
}

/// Generate one slot per wash, in wash-number order.
pub fn generate_schedule(
    request: &WashScheduleRequest,
    context: &SlotContext,
    policy: CompressionPolicy,
) -> Result<Vec<ScheduledWashSlot>, ValidationError> {
    request.validate()?;
    let end = request.end_date()?;
    let overflows = request.overflows();

    if overflows {
        debug!(
            total = request.total_washes,
            interval = request.interval_days,
            max_span = request.max_span_days,
            %policy,
            "Schedule exceeds window, compressing"
        );
    }

    let mut slots = Vec::with_capacity(request.total_washes as usize);
    for i in 0..request.total_washes {
        let date = wash_date(request, i, end, overflows, policy)?;
        let service_type =
            service_type_for(i, request.total_washes, request.interior_wash_count);
        slots.push(ScheduledWashSlot::new(i + 1, date, service_type, context));
    }

    debug!(
        washes = slots.len(),
        start = %request.start_date,
        end = %end,
        "Generated wash schedule"
    );
    Ok(slots)
}

/// [`generate_schedule`] with [`CompressionPolicy::default`].
pub fn generate_schedule_default(
    request: &WashScheduleRequest,
    context: &SlotContext,
) -> Result<Vec<ScheduledWashSlot>, ValidationError> {
    generate_schedule(request, context, CompressionPolicy::default())
}

fn wash_date(
    request: &WashScheduleRequest,
    index: u32,
    end: NaiveDate,
    overflows: bool,
    policy: CompressionPolicy,
) -> Result<NaiveDate, ValidationError> {
    let start = request.start_date;
    let span = u64::from(request.max_span_days);
    let naive_offset = u64::from(index) * u64::from(request.interval_days);

    match policy {
        CompressionPolicy::Reference => {
            if naive_offset <= span {
                add_days(start, naive_offset)
            } else {
                end.checked_sub_days(Days::new(u64::from(index)))
                    .ok_or(ValidationError::DateOutOfRange(start))
            }
        }
        CompressionPolicy::Spread => {
            if !overflows {
                return add_days(start, naive_offset);
            }
            // overflow implies total_washes >= 2
            let gaps = u64::from(request.total_washes - 1);
            add_days(start, u64::from(index) * span / gaps)
        }
    }
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate, ValidationError> {
    date.checked_add_days(Days::new(days))
        .ok_or(ValidationError::DateOutOfRange(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::ServiceType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dates(slots: &[ScheduledWashSlot]) -> Vec<NaiveDate> {
        slots.iter().map(|s| s.scheduled_date).collect()
    }

    #[test]
    fn test_weekly_schedule_within_window() {
        let req = WashScheduleRequest::new(date(2024, 1, 1), 3, 7).with_interior(1);
        let slots = generate_schedule_default(&req, &SlotContext::default()).unwrap();

        assert_eq!(dates(&slots), vec![date(2024, 1, 1), date(2024, 1, 8), date(2024, 1, 15)]);
        let types: Vec<_> = slots.iter().map(|s| s.service_type).collect();
        assert_eq!(
            types,
            vec![ServiceType::Exterior, ServiceType::Exterior, ServiceType::Interior]
        );
        let numbers: Vec<_> = slots.iter().map(|s| s.wash_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_reference_policy_packs_backwards_from_end() {
        let req = WashScheduleRequest::new(date(2024, 1, 1), 5, 10);
        let slots =
            generate_schedule(&req, &SlotContext::default(), CompressionPolicy::Reference).unwrap();
        assert_eq!(
            dates(&slots),
            vec![
                date(2024, 1, 1),
                date(2024, 1, 11),
                date(2024, 1, 21),
                date(2024, 1, 31),
                // end (Jan 31) minus index 4
                date(2024, 1, 27),
            ]
        );
    }

    #[test]
    fn test_spread_policy_respaces_evenly() {
        let req = WashScheduleRequest::new(date(2024, 1, 1), 5, 10);
        let slots =
            generate_schedule(&req, &SlotContext::default(), CompressionPolicy::Spread).unwrap();
        // floor(i * 30 / 4) = 0, 7, 15, 22, 30
        assert_eq!(
            dates(&slots),
            vec![
                date(2024, 1, 1),
                date(2024, 1, 8),
                date(2024, 1, 16),
                date(2024, 1, 23),
                date(2024, 1, 31),
            ]
        );
    }

    #[test]
    fn test_spread_leaves_fitting_schedule_alone() {
        let req = WashScheduleRequest::new(date(2024, 3, 10), 4, 10);
        // 0, 10, 20, 30 all fit in a 30 day window
        assert!(!req.overflows());
        let spread =
            generate_schedule(&req, &SlotContext::default(), CompressionPolicy::Spread).unwrap();
        let reference =
            generate_schedule(&req, &SlotContext::default(), CompressionPolicy::Reference).unwrap();
        assert_eq!(spread, reference);
        assert_eq!(spread[3].scheduled_date, date(2024, 4, 9));
    }

    #[test]
    fn test_single_wash() {
        let req = WashScheduleRequest::new(date(2024, 2, 29), 1, 15).with_interior(1);
        let slots = generate_schedule_default(&req, &SlotContext::default()).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].scheduled_date, date(2024, 2, 29));
        assert_eq!(slots[0].service_type, ServiceType::Interior);
    }

    #[test]
    fn test_zero_span_collapses_onto_start() {
        let req = WashScheduleRequest::new(date(2024, 1, 1), 3, 3).with_max_span(0);
        let slots = generate_schedule_default(&req, &SlotContext::default()).unwrap();
        assert!(slots.iter().all(|s| s.scheduled_date == date(2024, 1, 1)));
    }

    #[test]
    fn test_context_copied_to_every_slot() {
        let ctx = SlotContext {
            car_name: Some("Creta".into()),
            car_number: Some("MH12AB1234".into()),
            assigned_washer: Some("w-7".into()),
        };
        let req = WashScheduleRequest::new(date(2024, 1, 1), 4, 7);
        let slots = generate_schedule_default(&req, &ctx).unwrap();
        for slot in &slots {
            assert_eq!(slot.car_name.as_deref(), Some("Creta"));
            assert_eq!(slot.car_number.as_deref(), Some("MH12AB1234"));
            assert_eq!(slot.assigned_washer.as_deref(), Some("w-7"));
        }
    }

    #[test]
    fn test_validation_order_and_fields() {
        let start = date(2024, 1, 1);

        let err = WashScheduleRequest::new(start, 0, 0).validate().unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveWashCount);
        assert_eq!(err.field(), "totalWashes");

        let err = WashScheduleRequest::new(start, 4, 0).validate().unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveInterval);
        assert_eq!(err.field(), "intervalDays");

        let err = WashScheduleRequest::new(start, 4, 7)
            .with_interior(5)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InteriorCountExceedsTotal { interior: 5, total: 4 }
        );
        assert_eq!(err.field(), "interiorWashCount");
    }

    #[test]
    fn test_start_at_calendar_limit_is_out_of_range() {
        let req = WashScheduleRequest::new(NaiveDate::MAX, 2, 7);
        assert!(matches!(
            generate_schedule_default(&req, &SlotContext::default()),
            Err(ValidationError::DateOutOfRange(_))
        ));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("Spread".parse::<CompressionPolicy>().unwrap(), CompressionPolicy::Spread);
        assert_eq!(
            " reference ".parse::<CompressionPolicy>().unwrap(),
            CompressionPolicy::Reference
        );
        assert!("squash".parse::<CompressionPolicy>().is_err());
    }

    #[test]
    fn test_request_wire_format_defaults_span() {
        let json = r#"{"startDate":"2024-01-01","totalWashes":4,"intervalDays":7}"#;
        let req: WashScheduleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.max_span_days, DEFAULT_MAX_SPAN_DAYS);
        assert_eq!(req.interior_wash_count, 0);
    }
}
