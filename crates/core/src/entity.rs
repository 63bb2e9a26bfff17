use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type LeadId = String;
pub type WasherId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Converted,
    Lost,
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadStatus::New => write!(f, "new"),
            LeadStatus::Contacted => write!(f, "contacted"),
            LeadStatus::Converted => write!(f, "converted"),
            LeadStatus::Lost => write!(f, "lost"),
        }
    }
}

/// Whether a lead bought a single wash or a monthly subscription package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WashKind {
    OneTime,
    Monthly,
}

impl std::fmt::Display for WashKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WashKind::OneTime => write!(f, "one-time"),
            WashKind::Monthly => write!(f, "monthly"),
        }
    }
}

/// A prospective or active customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(alias = "_id")]
    pub id: LeadId,
    pub customer_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub car_name: Option<String>,
    #[serde(default)]
    pub car_number: Option<String>,
    pub status: LeadStatus,
    pub wash_kind: WashKind,
}

/// Payload for creating a lead; the backend assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_number: Option<String>,
    pub wash_kind: WashKind,
}

/// A staff member who performs washes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Washer {
    #[serde(alias = "_id")]
    pub id: WasherId,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    HalfDay,
    Leave,
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "present"),
            AttendanceStatus::Absent => write!(f, "absent"),
            AttendanceStatus::HalfDay => write!(f, "half day"),
            AttendanceStatus::Leave => write!(f, "leave"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub washer_id: WasherId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// Backend-computed revenue and expense totals over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_revenue: f64,
    pub total_expenses: f64,
    #[serde(default)]
    pub wash_count: u32,
}

impl RevenueSummary {
    pub fn net(&self) -> f64 {
        self.total_revenue - self.total_expenses
    }
}
