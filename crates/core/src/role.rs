//! Typed roles and the capability table used for view gating.
//!
//! The backend hands out one of four role strings at login. Each role maps
//! to a fixed capability set; [`AccessPolicy`] layers per-deployment grants
//! and revocations on top of that table.

use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WashdeskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(rename = "superadmin")]
    SuperAdmin,
    Admin,
    LimitedAdmin,
    Washer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::SuperAdmin, Role::Admin, Role::LimitedAdmin, Role::Washer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "superadmin",
            Role::Admin => "admin",
            Role::LimitedAdmin => "limited_admin",
            Role::Washer => "washer",
        }
    }

    /// Built-in capability table.
    pub fn capabilities(&self) -> &'static [Capability] {
        use Capability::*;
        match self {
            Role::SuperAdmin => &Capability::ALL,
            Role::Admin => &[
                ViewDashboard,
                ManageLeads,
                ManageSchedules,
                AssignWashers,
                ViewAttendance,
                ManageAttendance,
                ViewRevenue,
                ManageExpenses,
                ManageWashers,
            ],
            Role::LimitedAdmin => &[
                ViewDashboard,
                ManageLeads,
                ManageSchedules,
                AssignWashers,
                ViewAttendance,
            ],
            Role::Washer => &[ViewOwnJobs],
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = WashdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "superadmin" | "super_admin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "limited_admin" | "limitedadmin" => Ok(Role::LimitedAdmin),
            "washer" => Ok(Role::Washer),
            _ => Err(WashdeskError::UnknownRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ViewDashboard,
    ManageLeads,
    ManageSchedules,
    AssignWashers,
    ViewAttendance,
    ManageAttendance,
    ViewRevenue,
    ManageExpenses,
    ManageWashers,
    ManageAdmins,
    ViewOwnJobs,
}

impl Capability {
    pub const ALL: [Capability; 11] = [
        Capability::ViewDashboard,
        Capability::ManageLeads,
        Capability::ManageSchedules,
        Capability::AssignWashers,
        Capability::ViewAttendance,
        Capability::ManageAttendance,
        Capability::ViewRevenue,
        Capability::ManageExpenses,
        Capability::ManageWashers,
        Capability::ManageAdmins,
        Capability::ViewOwnJobs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ViewDashboard => "view_dashboard",
            Capability::ManageLeads => "manage_leads",
            Capability::ManageSchedules => "manage_schedules",
            Capability::AssignWashers => "assign_washers",
            Capability::ViewAttendance => "view_attendance",
            Capability::ManageAttendance => "manage_attendance",
            Capability::ViewRevenue => "view_revenue",
            Capability::ManageExpenses => "manage_expenses",
            Capability::ManageWashers => "manage_washers",
            Capability::ManageAdmins => "manage_admins",
            Capability::ViewOwnJobs => "view_own_jobs",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = WashdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Capability::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| WashdeskError::UnknownCapability(s.to_string()))
    }
}

/// Whether an override adds or removes a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Access {
    Grant,
    Revoke,
}

/// Role table plus explicit per-role overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessPolicy {
    pub overrides: HashMap<Role, HashMap<Capability, Access>>,
}

impl AccessPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a policy from string maps as they appear in a config file:
    /// `role -> capability -> "grant" | "revoke"`.
    ///
    /// Unknown roles and capabilities are errors. Unknown access levels are
    /// logged and skipped.
    pub fn from_overrides(
        raw: &HashMap<String, HashMap<String, String>>,
    ) -> Result<Self, WashdeskError> {
        let mut policy = Self::new();
        for (role_str, caps) in raw {
            let role: Role = role_str.parse()?;
            for (cap_str, level) in caps {
                let capability: Capability = cap_str.parse()?;
                let access = match level.to_lowercase().as_str() {
                    "grant" | "allow" => Access::Grant,
                    "revoke" | "deny" => Access::Revoke,
                    _ => {
                        tracing::warn!(
                            role = %role,
                            capability = %capability,
                            level = %level,
                            "Unknown access level, ignoring override"
                        );
                        continue;
                    }
                };
                policy.set(role, capability, access);
            }
        }
        Ok(policy)
    }

    pub fn set(&mut self, role: Role, capability: Capability, access: Access) {
        self.overrides.entry(role).or_default().insert(capability, access);
    }

    /// Override first, then the built-in table.
    pub fn allows(&self, role: Role, capability: Capability) -> bool {
        match self.overrides.get(&role).and_then(|m| m.get(&capability)) {
            Some(Access::Grant) => true,
            Some(Access::Revoke) => false,
            None => role.can(capability),
        }
    }

    pub fn capabilities_for(&self, role: Role) -> BTreeSet<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.allows(role, *c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superadmin_has_everything() {
        for cap in Capability::ALL {
            assert!(Role::SuperAdmin.can(cap), "superadmin missing {cap}");
        }
    }

    #[test]
    fn test_washer_only_sees_own_jobs() {
        assert!(Role::Washer.can(Capability::ViewOwnJobs));
        assert!(!Role::Washer.can(Capability::ManageSchedules));
        assert!(!Role::Washer.can(Capability::ViewRevenue));
    }

    #[test]
    fn test_limited_admin_cannot_see_money() {
        assert!(Role::LimitedAdmin.can(Capability::ManageSchedules));
        assert!(!Role::LimitedAdmin.can(Capability::ViewRevenue));
        assert!(!Role::LimitedAdmin.can(Capability::ManageExpenses));
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::SuperAdmin).unwrap(), "\"superadmin\"");
        assert_eq!(serde_json::to_string(&Role::LimitedAdmin).unwrap(), "\"limited_admin\"");
        let role: Role = serde_json::from_str("\"washer\"").unwrap();
        assert_eq!(role, Role::Washer);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("SuperAdmin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert_eq!("limited_admin".parse::<Role>().unwrap(), Role::LimitedAdmin);
        assert!(matches!(
            "manager".parse::<Role>(),
            Err(WashdeskError::UnknownRole(_))
        ));
    }

    #[test]
    fn test_capability_parse_round_trips_names() {
        for cap in Capability::ALL {
            assert_eq!(cap.as_str().parse::<Capability>().unwrap(), cap);
        }
    }

    #[test]
    fn test_policy_overrides() {
        let mut raw = HashMap::new();
        raw.insert(
            "limited_admin".to_string(),
            HashMap::from([
                ("view_revenue".to_string(), "grant".to_string()),
                ("manage_leads".to_string(), "revoke".to_string()),
                ("assign_washers".to_string(), "maybe".to_string()),
            ]),
        );
        let policy = AccessPolicy::from_overrides(&raw).unwrap();

        assert!(policy.allows(Role::LimitedAdmin, Capability::ViewRevenue));
        assert!(!policy.allows(Role::LimitedAdmin, Capability::ManageLeads));
        // unknown level leaves the table value in place
        assert!(policy.allows(Role::LimitedAdmin, Capability::AssignWashers));
        // other roles untouched
        assert!(!policy.allows(Role::Washer, Capability::ViewRevenue));
    }

    #[test]
    fn test_policy_rejects_unknown_capability() {
        let raw = HashMap::from([(
            "admin".to_string(),
            HashMap::from([("launch_rockets".to_string(), "grant".to_string())]),
        )]);
        assert!(AccessPolicy::from_overrides(&raw).is_err());
    }

    #[test]
    fn test_capabilities_for_default_policy_matches_table() {
        let policy = AccessPolicy::new();
        let caps = policy.capabilities_for(Role::Admin);
        assert_eq!(caps.len(), Role::Admin.capabilities().len());
        assert!(!caps.contains(&Capability::ManageAdmins));
    }
}
