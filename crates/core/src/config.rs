use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub api: ApiConfig,
    pub schedule: ScheduleConfig,
}

/// Well-known env keys that identify a profile when prefixed.
const PROFILE_MARKER_KEYS: &[&str] = &["API_URL", "API_TIMEOUT_SECS"];

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `WASHDESK_PROFILE`. When set (e.g. `STAGING`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("WASHDESK_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            api: ApiConfig::from_env_profiled(p),
            schedule: ScheduleConfig::from_env_profiled(p),
        }
    }

    /// Discover available profiles by scanning env vars for `{PREFIX}_{MARKER_KEY}` patterns.
    /// Always includes "default" (the unprefixed config).
    pub fn available_profiles() -> Vec<String> {
        let mut profiles = std::collections::BTreeSet::new();
        profiles.insert("default".to_string());

        for (key, _) in env::vars() {
            for marker in PROFILE_MARKER_KEYS {
                if let Some(prefix) = key.strip_suffix(&format!("_{}", marker)) {
                    if !prefix.is_empty()
                        && prefix.chars().all(|c| c.is_ascii_uppercase() || c == '_')
                    {
                        profiles.insert(prefix.to_string());
                    }
                }
            }
        }

        profiles.into_iter().collect()
    }

    /// Raw env value for `key` under this config's profile, if set.
    /// Lets callers tell an explicit setting apart from a built-in default.
    pub fn lookup(&self, key: &str) -> Option<String> {
        profiled_env_opt(&self.profile, key)
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  api:       url={}, timeout={}s", self.api.url, self.api.timeout_secs);
        tracing::info!(
            "  schedule:  max_span_days={}, policy={}",
            self.schedule.max_span_days,
            self.schedule.policy
        );
    }

    /// Return a view safe for printing (the API url is the only endpoint detail).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "api": { "url": self.api.url, "timeout_secs": self.api.timeout_secs },
            "schedule": {
                "max_span_days": self.schedule.max_span_days,
                "policy": self.schedule.policy,
            },
        })
    }
}

// ── Backend API ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the car-wash backend, without trailing slash.
    pub url: String,
    pub timeout_secs: u64,
}

impl ApiConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "API_URL", "http://localhost:5000/api")
                .trim_end_matches('/')
                .to_string(),
            timeout_secs: profiled_env_u64(p, "API_TIMEOUT_SECS", 15),
        }
    }
}

// ── Scheduling defaults ───────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Hard ceiling on a generated schedule's length, in days.
    pub max_span_days: u32,
    /// "spread" or "reference"
    pub policy: String,
}

impl ScheduleConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            max_span_days: profiled_env_u32(p, "SCHEDULE_MAX_SPAN_DAYS", 30),
            policy: profiled_env_or(p, "SCHEDULE_POLICY", "spread").to_lowercase(),
        }
    }
}
