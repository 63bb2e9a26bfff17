use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use washdesk_core::{AccessPolicy, Capability, Role};

use crate::error::ClientError;

/// An authenticated backend session.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token issued at login.
    pub token: String,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: impl Into<String>, username: impl Into<String>, role: Role) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
            role,
            created_at: Utc::now(),
        }
    }
}

// Token stays out of logs.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Holder for the current session, owned by the caller and passed to every call.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    current: Option<Session>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            current: Some(session),
        }
    }

    /// Start a session (login). Replaces any previous one.
    pub fn begin(&mut self, session: Session) {
        debug!(username = %session.username, role = %session.role, "Session started");
        self.current = Some(session);
    }

    /// Drop the session (logout or 401), returning it if there was one.
    pub fn end(&mut self) -> Option<Session> {
        let ended = self.current.take();
        if let Some(ref s) = ended {
            debug!(username = %s.username, "Session cleared");
        }
        ended
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn require(&self) -> Result<&Session, ClientError> {
        self.current.as_ref().ok_or(ClientError::NotAuthenticated)
    }

    /// Current session, provided its role holds `capability` under `policy`.
    pub fn require_capability(
        &self,
        policy: &AccessPolicy,
        capability: Capability,
    ) -> Result<&Session, ClientError> {
        let session = self.require()?;
        if policy.allows(session.role, capability) {
            Ok(session)
        } else {
            Err(ClientError::Forbidden {
                role: session.role,
                capability,
            })
        }
    }
}
