//! Session context
//!
//! Holds the auth token, user identity, role and permission list. The
//! session is created once at boot, hydrated from its persisted file, shared
//! through an `Arc`, and cleared on logout. Nothing else is persisted.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use shared::models::{CurrentUser, LoginResponse, SessionUser};
use shared::permissions;

use crate::error::{ClientError, ClientResult};

/// Snapshot of the signed-in user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<SessionUser>,
    pub role: Option<String>,
    #[serde(default)]
    pub permission: Vec<String>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn has_permission(&self, name: &str) -> bool {
        permissions::has_permission(self.role.as_deref(), &self.permission, name)
    }
}

/// On-disk envelope, same shape as the browser's persisted store
#[derive(Debug, Serialize, Deserialize)]
struct Persisted {
    state: SessionState,
    #[serde(default)]
    version: u32,
}

/// Shared session context
#[derive(Debug)]
pub struct Session {
    state: RwLock<SessionState>,
    storage: Option<PathBuf>,
}

impl Session {
    /// Session that lives only in memory
    pub fn in_memory() -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
            storage: None,
        }
    }

    /// Session persisted at `path`; call [`Session::hydrate`] to load it
    pub fn persisted(path: impl Into<PathBuf>) -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
            storage: Some(path.into()),
        }
    }

    /// Load the persisted session, if any. A missing file is an empty
    /// session; an unreadable one is discarded.
    pub fn hydrate(&self) -> ClientResult<()> {
        let Some(path) = &self.storage else {
            return Ok(());
        };
        let loaded = match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<Persisted>(&raw) {
                Ok(p) => p.state,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "discarding corrupt session file");
                    SessionState::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionState::default(),
            Err(e) => return Err(ClientError::Session(e.to_string())),
        };
        tracing::debug!(authenticated = loaded.is_authenticated(), "session hydrated");
        self.replace(loaded);
        Ok(())
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.read().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().ok().and_then(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .map(|s| s.is_authenticated())
            .unwrap_or(false)
    }

    pub fn has_permission(&self, name: &str) -> bool {
        self.state
            .read()
            .map(|s| s.has_permission(name))
            .unwrap_or(false)
    }

    /// Store a fresh login
    pub fn set_auth(&self, login: LoginResponse) -> ClientResult<()> {
        self.replace(SessionState {
            token: Some(login.token),
            user: Some(login.user),
            role: login.role,
            permission: login.permission,
        });
        self.persist()
    }

    /// Refresh identity from `auth/user`, keeping the token
    pub fn set_user(&self, current: CurrentUser) -> ClientResult<()> {
        if let Ok(mut state) = self.state.write() {
            state.user = Some(current.user);
            state.role = current.role;
            state.permission = current.permission;
        }
        self.persist()
    }

    /// Clear memory and storage
    pub fn logout(&self) -> ClientResult<()> {
        self.replace(SessionState::default());
        match &self.storage {
            Some(path) => remove_if_exists(path),
            None => Ok(()),
        }
    }

    fn replace(&self, next: SessionState) {
        if let Ok(mut state) = self.state.write() {
            *state = next;
        }
    }

    fn persist(&self) -> ClientResult<()> {
        let Some(path) = &self.storage else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ClientError::Session(e.to_string()))?;
        }
        let body = serde_json::to_string_pretty(&Persisted {
            state: self.snapshot(),
            version: 0,
        })?;
        std::fs::write(path, body).map_err(|e| ClientError::Session(e.to_string()))
    }
}

fn remove_if_exists(path: &Path) -> ClientResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ClientError::Session(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(role: &str, permission: &[&str]) -> LoginResponse {
        LoginResponse {
            user: SessionUser {
                id: 1,
                name: "Store Keeper".into(),
                email: "keeper@ims.test".into(),
            },
            token: "7|token".into(),
            role: Some(role.into()),
            permission: permission.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_persist_and_hydrate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/auth.json");

        let session = Session::persisted(&path);
        session.set_auth(login("clerk", &["roles.index"])).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["state"]["token"], "7|token");

        let restored = Session::persisted(&path);
        restored.hydrate().unwrap();
        assert!(restored.is_authenticated());
        assert!(restored.has_permission("roles.index"));
        assert!(!restored.has_permission("roles.store"));
    }

    #[test]
    fn test_logout_clears_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");
        let session = Session::persisted(&path);
        session.set_auth(login("clerk", &[])).unwrap();

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert!(!path.exists());
        // Logging out twice is harmless
        session.logout().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");
        std::fs::write(&path, "{not json").unwrap();
        let session = Session::persisted(&path);
        session.hydrate().unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_set_user_keeps_token() {
        let session = Session::in_memory();
        session.set_auth(login("clerk", &[])).unwrap();
        session
            .set_user(CurrentUser {
                user: SessionUser {
                    id: 1,
                    name: "Renamed".into(),
                    email: "keeper@ims.test".into(),
                },
                role: Some("super-admin".into()),
                permission: vec![],
            })
            .unwrap();
        let state = session.snapshot();
        assert_eq!(state.token.as_deref(), Some("7|token"));
        assert!(state.has_permission("anything.at.all"));
    }
}
