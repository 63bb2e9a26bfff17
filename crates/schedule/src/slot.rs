use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Service classification of one wash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    Exterior,
    Interior,
    FullService,
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceType::Exterior => write!(f, "Exterior"),
            ServiceType::Interior => write!(f, "Interior"),
            ServiceType::FullService => write!(f, "Full Service"),
        }
    }
}

/// Fields copied unchanged onto every generated slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotContext {
    pub car_name: Option<String>,
    pub car_number: Option<String>,
    pub assigned_washer: Option<String>,
}

/// One wash of a generated schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledWashSlot {
    /// 1-indexed position in the schedule.
    pub wash_number: u32,
    pub scheduled_date: NaiveDate,
    pub service_type: ServiceType,
    pub car_name: Option<String>,
    pub car_number: Option<String>,
    pub assigned_washer: Option<String>,
}

impl ScheduledWashSlot {
    pub(crate) fn new(
        wash_number: u32,
        scheduled_date: NaiveDate,
        service_type: ServiceType,
        context: &SlotContext,
    ) -> Self {
        Self {
            wash_number,
            scheduled_date,
            service_type,
            car_name: context.car_name.clone(),
            car_number: context.car_number.clone(),
            assigned_washer: context.assigned_washer.clone(),
        }
    }
}
