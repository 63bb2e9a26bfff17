use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;
use washdesk_core::{AccessPolicy, Config};
use washdesk_schedule::{CompressionPolicy, DEFAULT_MAX_SPAN_DAYS};

/// CLI configuration loaded from TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Backend base URL (e.g. https://wash.example.com/api)
    #[serde(default)]
    pub api_url: Option<String>,

    /// Overflow compression policy: "spread" or "reference"
    #[serde(default = "default_policy")]
    pub default_policy: String,

    /// Maximum schedule span in days
    #[serde(default = "default_max_span")]
    pub max_span_days: u32,

    /// Per-role capability overrides (role -> capability -> "grant" | "revoke")
    #[serde(default)]
    pub role_overrides: HashMap<String, HashMap<String, String>>,
}

fn default_policy() -> String {
    "spread".to_string()
}

fn default_max_span() -> u32 {
    DEFAULT_MAX_SPAN_DAYS
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            default_policy: default_policy(),
            max_span_days: default_max_span(),
            role_overrides: HashMap::new(),
        }
    }
}

impl CliConfig {
    /// Return the default config directory path: ~/.config/washdesk/
    pub fn default_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("could not determine user config directory")?
            .join("washdesk");
        Ok(config_dir)
    }

    /// Return the default config file path.
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("config.toml"))
    }

    /// Load config from the given path, or the default path.
    /// Returns default config if the file does not exist.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            debug!(?config_path, "Loading config");
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read config: {}", config_path.display()))?;
            let config: Self = toml::from_str(&content)
                .with_context(|| format!("failed to parse config: {}", config_path.display()))?;
            Ok(config)
        } else {
            debug!(?config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Resolve the backend URL.
    /// Priority: cli_override > env var > config file > built-in default.
    pub fn resolve_api_url(&self, env: &Config, cli_override: Option<&str>) -> String {
        if let Some(url) = cli_override {
            return url.trim_end_matches('/').to_string();
        }
        if env.lookup("API_URL").is_some() {
            return env.api.url.clone();
        }
        if let Some(ref url) = self.api_url {
            return url.trim_end_matches('/').to_string();
        }
        env.api.url.clone()
    }

    /// Resolve the compression policy.
    /// Priority: cli_override > env var > config file.
    pub fn resolve_policy(
        &self,
        env: &Config,
        cli_override: Option<CompressionPolicy>,
    ) -> Result<CompressionPolicy> {
        if let Some(policy) = cli_override {
            return Ok(policy);
        }
        let raw = if env.lookup("SCHEDULE_POLICY").is_some() {
            env.schedule.policy.clone()
        } else {
            self.default_policy.clone()
        };
        raw.parse::<CompressionPolicy>()
            .map_err(anyhow::Error::msg)
            .context("invalid compression policy")
    }

    /// Resolve the maximum span.
    /// Priority: cli_override > env var > config file.
    pub fn resolve_max_span(&self, env: &Config, cli_override: Option<u32>) -> u32 {
        if let Some(span) = cli_override {
            return span;
        }
        if env.lookup("SCHEDULE_MAX_SPAN_DAYS").is_some() {
            return env.schedule.max_span_days;
        }
        self.max_span_days
    }

    pub fn access_policy(&self) -> Result<AccessPolicy> {
        AccessPolicy::from_overrides(&self.role_overrides).context("invalid role_overrides")
    }

    /// Return the session file path.
    pub fn session_path() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("session.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use washdesk_core::{Capability, Role};

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.default_policy, "spread");
        assert_eq!(config.max_span_days, 30);
        assert!(config.api_url.is_none());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            api_url = "https://wash.example.com/api/"
            default_policy = "reference"
            max_span_days = 45

            [role_overrides.limited_admin]
            view_revenue = "grant"
        "#;
        let config: CliConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.max_span_days, 45);
        let policy = config.access_policy().unwrap();
        assert!(policy.allows(Role::LimitedAdmin, Capability::ViewRevenue));
    }

    #[test]
    fn test_cli_override_wins() {
        let config = CliConfig {
            api_url: Some("https://file.example.com/api".into()),
            ..CliConfig::default()
        };
        let env = Config::for_profile("CLICFGTEST_NONE");
        assert_eq!(
            config.resolve_api_url(&env, Some("https://flag.example.com/api/")),
            "https://flag.example.com/api"
        );
        assert_eq!(
            config.resolve_policy(&env, Some(CompressionPolicy::Reference)).unwrap(),
            CompressionPolicy::Reference
        );
        assert_eq!(config.resolve_max_span(&env, Some(10)), 10);
    }

    #[test]
    fn test_profiled_env_beats_file() {
        std::env::set_var("CLICFGTESTA_API_URL", "https://env.example.com/api");
        let env = Config::for_profile("CLICFGTESTA");
        let config = CliConfig {
            api_url: Some("https://file.example.com/api".into()),
            ..CliConfig::default()
        };
        assert_eq!(config.resolve_api_url(&env, None), "https://env.example.com/api");
        std::env::remove_var("CLICFGTESTA_API_URL");
    }

    #[test]
    fn test_bad_policy_in_file_is_an_error() {
        let config = CliConfig {
            default_policy: "squash".into(),
            ..CliConfig::default()
        };
        let env = Config::for_profile("CLICFGTEST_NONE");
        assert!(config.resolve_policy(&env, None).is_err());
    }
}
