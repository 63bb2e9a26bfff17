use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use washdesk_client::{Session, SessionContext};

/// On-disk home of the login session between CLI invocations.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session. A missing file is an empty context.
    pub fn load(&self) -> Result<SessionContext> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No stored session");
            return Ok(SessionContext::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read session: {}", self.path.display()))?;
        let session: Session = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse session: {}", self.path.display()))?;
        debug!(username = %session.username, "Session loaded");
        Ok(SessionContext::with_session(session))
    }

    /// Write the context back. An empty context removes the file.
    pub fn save(&self, ctx: &SessionContext) -> Result<()> {
        let Some(session) = ctx.current() else {
            if self.path.exists() {
                std::fs::remove_file(&self.path).with_context(|| {
                    format!("failed to remove session: {}", self.path.display())
                })?;
                debug!(path = %self.path.display(), "Session removed");
            }
            return Ok(());
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(session).context("failed to serialize session")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write session: {}", self.path.display()))?;
        restrict_permissions(&self.path)?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }
}

// The file holds a bearer token.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .with_context(|| format!("failed to restrict {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use washdesk_core::Role;

    #[test]
    fn test_missing_file_is_empty_context() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert!(!store.load().unwrap().is_authenticated());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested/session.json"));
        let ctx = SessionContext::with_session(Session::new("tok", "asha", Role::Admin));

        store.save(&ctx).unwrap();
        let loaded = store.load().unwrap();
        let session = loaded.current().unwrap();
        assert_eq!(session.token, "tok");
        assert_eq!(session.role, Role::Admin);
    }

    #[test]
    fn test_saving_empty_context_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store
            .save(&SessionContext::with_session(Session::new("tok", "asha", Role::Washer)))
            .unwrap();
        assert!(store.path().exists());

        store.save(&SessionContext::new()).unwrap();
        assert!(!store.path().exists());
        // removing twice is fine
        store.save(&SessionContext::new()).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store
            .save(&SessionContext::with_session(Session::new("tok", "asha", Role::Admin)))
            .unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(SessionStore::new(path).load().is_err());
    }
}
