//! Generated schedule held as editable state before submission.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{EditError, ValidationError};
use crate::generator::{generate_schedule, CompressionPolicy, WashScheduleRequest};
use crate::slot::{ScheduledWashSlot, ServiceType, SlotContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WashSchedule {
    request: WashScheduleRequest,
    policy: CompressionPolicy,
    end_date: NaiveDate,
    slots: Vec<ScheduledWashSlot>,
}

impl WashSchedule {
    pub fn generate(
        request: WashScheduleRequest,
        context: &SlotContext,
        policy: CompressionPolicy,
    ) -> Result<Self, ValidationError> {
        let slots = generate_schedule(&request, context, policy)?;
        let end_date = request.end_date()?;
        Ok(Self {
            request,
            policy,
            end_date,
            slots,
        })
    }

    pub fn request(&self) -> &WashScheduleRequest {
        &self.request
    }

    pub fn policy(&self) -> CompressionPolicy {
        self.policy
    }

    pub fn slots(&self) -> &[ScheduledWashSlot] {
        &self.slots
    }

    pub fn into_slots(self) -> Vec<ScheduledWashSlot> {
        self.slots
    }

    /// Inclusive `(start, end)` range a wash may be moved within.
    pub fn window(&self) -> (NaiveDate, NaiveDate) {
        (self.request.start_date, self.end_date)
    }

    pub fn interior_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.service_type == ServiceType::Interior)
            .count()
    }

    /// True when dates never go backwards in wash-number order.
    pub fn is_chronological(&self) -> bool {
        self.slots
            .windows(2)
            .all(|pair| pair[0].scheduled_date <= pair[1].scheduled_date)
    }

    pub fn reschedule(&mut self, wash_number: u32, date: NaiveDate) -> Result<(), EditError> {
        let (start, end) = self.window();
        if date < start || date > end {
            return Err(EditError::OutsideWindow { date, start, end });
        }
        self.slot_mut(wash_number)?.scheduled_date = date;
        Ok(())
    }

    pub fn set_service_type(
        &mut self,
        wash_number: u32,
        service_type: ServiceType,
    ) -> Result<(), EditError> {
        self.slot_mut(wash_number)?.service_type = service_type;
        Ok(())
    }

    pub fn assign_washer(
        &mut self,
        wash_number: u32,
        washer: Option<String>,
    ) -> Result<(), EditError> {
        self.slot_mut(wash_number)?.assigned_washer = washer;
        Ok(())
    }

    pub fn assign_washer_to_all(&mut self, washer: &str) {
        for slot in &mut self.slots {
            slot.assigned_washer = Some(washer.to_string());
        }
    }

    fn slot_mut(&mut self, wash_number: u32) -> Result<&mut ScheduledWashSlot, EditError> {
        // wash numbers are contiguous from 1
        wash_number
            .checked_sub(1)
            .and_then(|i| self.slots.get_mut(i as usize))
            .ok_or(EditError::UnknownWashNumber(wash_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly() -> WashSchedule {
        let req = WashScheduleRequest::new(date(2024, 1, 1), 4, 7).with_interior(2);
        WashSchedule::generate(req, &SlotContext::default(), CompressionPolicy::Spread).unwrap()
    }

    #[test]
    fn test_generate_exposes_window_and_counts() {
        let schedule = weekly();
        assert_eq!(schedule.window(), (date(2024, 1, 1), date(2024, 1, 31)));
        assert_eq!(schedule.slots().len(), 4);
        assert_eq!(schedule.interior_count(), 2);
        assert!(schedule.is_chronological());
    }

    #[test]
    fn test_reschedule_within_window() {
        let mut schedule = weekly();
        schedule.reschedule(2, date(2024, 1, 10)).unwrap();
        assert_eq!(schedule.slots()[1].scheduled_date, date(2024, 1, 10));
    }

    #[test]
    fn test_reschedule_outside_window_rejected() {
        let mut schedule = weekly();
        let err = schedule.reschedule(2, date(2024, 2, 1)).unwrap_err();
        assert!(matches!(err, EditError::OutsideWindow { .. }));
        assert_eq!(schedule.slots()[1].scheduled_date, date(2024, 1, 8));
    }

    #[test]
    fn test_unknown_wash_number() {
        let mut schedule = weekly();
        assert_eq!(
            schedule.set_service_type(0, ServiceType::FullService),
            Err(EditError::UnknownWashNumber(0))
        );
        assert_eq!(
            schedule.assign_washer(5, Some("w-1".into())),
            Err(EditError::UnknownWashNumber(5))
        );
    }

    #[test]
    fn test_edits_apply_to_the_right_slot() {
        let mut schedule = weekly();
        schedule.set_service_type(1, ServiceType::FullService).unwrap();
        schedule.assign_washer(3, Some("w-9".into())).unwrap();
        assert_eq!(schedule.slots()[0].service_type, ServiceType::FullService);
        assert_eq!(schedule.slots()[2].assigned_washer.as_deref(), Some("w-9"));
        assert_eq!(schedule.slots()[1].assigned_washer, None);
    }

    #[test]
    fn test_assign_washer_to_all() {
        let mut schedule = weekly();
        schedule.assign_washer_to_all("w-2");
        assert!(schedule
            .slots()
            .iter()
            .all(|s| s.assigned_washer.as_deref() == Some("w-2")));
    }

    #[test]
    fn test_reference_policy_can_land_before_start() {
        // 35 washes every 2 days: wash 35 is index 34, so Jan 31 - 34 days
        let req = WashScheduleRequest::new(date(2024, 1, 1), 35, 2);
        let mut schedule =
            WashSchedule::generate(req, &SlotContext::default(), CompressionPolicy::Reference)
                .unwrap();
        let last = schedule.slots()[34].scheduled_date;
        assert_eq!(last, date(2023, 12, 28));
        assert!(last < schedule.window().0);

        // the generated date is not a valid edit target
        assert!(matches!(
            schedule.reschedule(35, last),
            Err(EditError::OutsideWindow { .. })
        ));
    }

    #[test]
    fn test_reference_policy_can_be_non_chronological() {
        let req = WashScheduleRequest::new(date(2024, 1, 1), 5, 10);
        let schedule =
            WashSchedule::generate(req, &SlotContext::default(), CompressionPolicy::Reference)
                .unwrap();
        assert!(!schedule.is_chronological());
    }
}
