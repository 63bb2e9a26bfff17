//! Client error types.

use washdesk_core::{Capability, Role};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("not logged in")]
    NotAuthenticated,

    #[error("session expired or was rejected by the server; log in again")]
    Unauthorized,

    #[error("role '{role}' does not have '{capability}'")]
    Forbidden { role: Role, capability: Capability },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
