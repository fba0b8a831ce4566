//! Explicit session context
//!
//! The signed-in user, their display name and the radius they last searched
//! with live in a [`Session`] value that callers pass around, rather than in
//! ambient global storage. A [`SessionStore`] owns the on-disk copy: it loads
//! once, hands out snapshots and writes back only when asked to.
//!
//! The map provider credential belongs to the session but is memory-only:
//! it is skipped by serde and redacted in `Debug` output.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// File name used inside the user config directory.
const SESSION_FILE: &str = "session.json";

/// A map provider access token or API key.
#[derive(Clone, PartialEq, Eq)]
pub struct MapCredential(String);

impl MapCredential {
    /// Wrap a user-supplied token, trimming surrounding whitespace.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_string())
    }

    /// The raw token, for handing to a map provider.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True when nothing was entered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for MapCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MapCredential(<{} chars redacted>)", self.0.len())
    }
}

/// Per-user session state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    /// Backend user id, when signed in
    #[serde(default)]
    pub user_id: Option<String>,

    /// Name shown in greetings
    #[serde(default)]
    pub display_name: Option<String>,

    /// When the current sign-in happened
    #[serde(default)]
    pub signed_in_at: Option<DateTime<Utc>>,

    /// Radius of the last explicit search, in kilometres
    #[serde(default)]
    pub radius_km: Option<f64>,

    /// Map credential for this run only
    #[serde(skip)]
    pub map_credential: Option<MapCredential>,
}

impl Session {
    /// True when a user is signed in.
    pub fn is_signed_in(&self) -> bool {
        self.user_id.is_some()
    }

    /// Record a sign-in.
    pub fn sign_in(&mut self, user_id: impl Into<String>, display_name: Option<String>) {
        self.user_id = Some(user_id.into());
        self.display_name = display_name;
        self.signed_in_at = Some(Utc::now());
    }

    /// Forget the user and the credential. The remembered radius stays.
    pub fn sign_out(&mut self) {
        *self = Session {
            radius_km: self.radius_km,
            ..Session::default()
        };
    }

    /// Remember the radius of a search so the next one starts from it.
    pub fn remember_radius(&mut self, km: f64) {
        self.radius_km = km.is_finite().then_some(km);
    }

    /// Greeting name, falling back to a generic one.
    pub fn greeting_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Student")
    }
}

/// Session persisted as JSON, cached in memory.
pub struct SessionStore {
    session: RwLock<Session>,
    file_path: PathBuf,
}

impl SessionStore {
    /// Open the session file in the user config directory.
    pub fn open_default() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::session("Could not determine config directory"))?
            .join("bookshare");
        Self::open(config_dir.join(SESSION_FILE))
    }

    /// Open a session file at an explicit path.
    ///
    /// A missing file yields an empty session. A corrupt file is logged and
    /// replaced by an empty session on the next save.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();

        let session = if file_path.exists() {
            let content = fs::read_to_string(&file_path).map_err(|e| Error::session_load(&file_path, e))?;

            serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %file_path.display(), error = %e, "Corrupt session file, starting fresh");
                Session::default()
            })
        } else {
            tracing::debug!(path = %file_path.display(), "No session file, starting fresh");
            Session::default()
        };

        Ok(Self {
            session: RwLock::new(session),
            file_path,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Snapshot of the current session.
    pub fn get(&self) -> Session {
        self.session
            .read()
            .map(|s| s.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Apply a change in memory. Call [`SessionStore::save`] to persist it.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Session),
    {
        let mut guard = self
            .session
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut guard);
    }

    /// Write the session to disk. The map credential is never written.
    pub fn save(&self) -> Result<()> {
        let session = self.get();
        let path = self.file_path.as_path();
        let content = serde_json::to_string_pretty(&session).map_err(|e| Error::session_save(path, e))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::session_save(path, e))?;
        }
        fs::write(path, content).map_err(|e| Error::session_save(path, e))?;

        tracing::debug!(path = %self.file_path.display(), "Session saved");
        Ok(())
    }
}
