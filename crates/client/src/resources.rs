//! Typed calls for the dashboard's screens.
//!
//! Each call checks the session's role against the client's
//! [`AccessPolicy`](washdesk_core::AccessPolicy) before sending anything.

use chrono::NaiveDate;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use washdesk_core::{
    AttendanceRecord, Capability, Lead, LeadStatus, NewLead, RevenueSummary, Role, Washer,
};
use washdesk_schedule::ScheduledWashSlot;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::session::{Session, SessionContext};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleBody<'a> {
    lead_id: &'a str,
    washes: &'a [ScheduledWashSlot],
}

#[derive(Serialize)]
struct StatusBody {
    status: LeadStatus,
}

/// Backend acknowledgement of a submitted schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleReceipt {
    pub created: u32,
    #[serde(default)]
    pub schedule_id: Option<String>,
}

fn to_body<T: Serialize>(value: &T) -> Result<serde_json::Value, ClientError> {
    serde_json::to_value(value).map_err(|e| ClientError::Decode(format!("request body: {e}")))
}

impl ApiClient {
    // ── Auth ──────────────────────────────────────────────────

    /// Authenticate and start a session in `ctx`.
    pub async fn login(
        &self,
        ctx: &mut SessionContext,
        username: &str,
        password: &str,
    ) -> Result<Session, ClientError> {
        let body = to_body(&LoginBody { username, password })?;
        let resp: LoginResponse = self
            .send_anonymous(Method::POST, "/auth/login", Some(body))
            .await?;
        let session = Session::new(
            resp.token,
            resp.username.unwrap_or_else(|| username.to_string()),
            resp.role,
        );
        info!(username = %session.username, role = %session.role, "Logged in");
        ctx.begin(session.clone());
        Ok(session)
    }

    /// End the session. The local session is cleared even if the backend call fails.
    pub async fn logout(&self, ctx: &mut SessionContext) {
        if !ctx.is_authenticated() {
            return;
        }
        let mut call_ctx = ctx.clone();
        ctx.end();
        if let Err(e) = self
            .send_unit(&mut call_ctx, Method::POST, "/auth/logout", None)
            .await
        {
            warn!(error = %e, "Backend logout failed; local session cleared anyway");
        }
    }

    // ── Leads ─────────────────────────────────────────────────

    pub async fn list_leads(&self, ctx: &mut SessionContext) -> Result<Vec<Lead>, ClientError> {
        ctx.require_capability(self.policy(), Capability::ManageLeads)?;
        self.send(ctx, Method::GET, "/leads", &[], None).await
    }

    pub async fn create_lead(
        &self,
        ctx: &mut SessionContext,
        lead: &NewLead,
    ) -> Result<Lead, ClientError> {
        ctx.require_capability(self.policy(), Capability::ManageLeads)?;
        let body = to_body(lead)?;
        self.send(ctx, Method::POST, "/leads", &[], Some(body)).await
    }

    pub async fn update_lead_status(
        &self,
        ctx: &mut SessionContext,
        lead_id: &str,
        status: LeadStatus,
    ) -> Result<Lead, ClientError> {
        ctx.require_capability(self.policy(), Capability::ManageLeads)?;
        let body = to_body(&StatusBody { status })?;
        let path = format!("/leads/{lead_id}/status");
        self.send(ctx, Method::PATCH, &path, &[], Some(body)).await
    }

    // ── Washers & schedules ───────────────────────────────────

    pub async fn list_washers(&self, ctx: &mut SessionContext) -> Result<Vec<Washer>, ClientError> {
        ctx.require_capability(self.policy(), Capability::AssignWashers)?;
        self.send(ctx, Method::GET, "/washers", &[], None).await
    }

    /// Persist generated (and possibly edited) slots for a lead.
    pub async fn submit_schedule(
        &self,
        ctx: &mut SessionContext,
        lead_id: &str,
        slots: &[ScheduledWashSlot],
    ) -> Result<ScheduleReceipt, ClientError> {
        ctx.require_capability(self.policy(), Capability::ManageSchedules)?;
        let body = to_body(&ScheduleBody {
            lead_id,
            washes: slots,
        })?;
        let receipt: ScheduleReceipt = self
            .send(ctx, Method::POST, "/schedules", &[], Some(body))
            .await?;
        info!(lead_id, created = receipt.created, "Schedule submitted");
        Ok(receipt)
    }

    /// Washes assigned to the logged-in washer.
    pub async fn my_jobs(
        &self,
        ctx: &mut SessionContext,
    ) -> Result<Vec<ScheduledWashSlot>, ClientError> {
        ctx.require_capability(self.policy(), Capability::ViewOwnJobs)?;
        self.send(ctx, Method::GET, "/washers/me/jobs", &[], None).await
    }

    // ── Attendance ────────────────────────────────────────────

    pub async fn list_attendance(
        &self,
        ctx: &mut SessionContext,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, ClientError> {
        ctx.require_capability(self.policy(), Capability::ViewAttendance)?;
        let query = [("date", date.to_string())];
        self.send(ctx, Method::GET, "/attendance", &query, None).await
    }

    pub async fn mark_attendance(
        &self,
        ctx: &mut SessionContext,
        record: &AttendanceRecord,
    ) -> Result<(), ClientError> {
        ctx.require_capability(self.policy(), Capability::ManageAttendance)?;
        let body = to_body(record)?;
        self.send_unit(ctx, Method::POST, "/attendance", Some(body)).await
    }

    // ── Revenue ───────────────────────────────────────────────

    pub async fn revenue_summary(
        &self,
        ctx: &mut SessionContext,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<RevenueSummary, ClientError> {
        ctx.require_capability(self.policy(), Capability::ViewRevenue)?;
        let query = [("from", from.to_string()), ("to", to.to_string())];
        self.send(ctx, Method::GET, "/revenue/summary", &query, None).await
    }
}
