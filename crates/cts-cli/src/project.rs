//! Project discovery and on-disk persistence.
//!
//! A cts project is a directory containing `.cts/`:
//!
//! ```text
//! .cts/
//!   state.json    (engine snapshot: tickets, audit log, id counters)
//!   staff.yaml    (the staff roster)
//!   user.json     (cached login session, optional)
//! ```
//!
//! Discovery walks up from the current directory, so commands work from
//! anywhere inside the project.

use anyhow::{Context as _, Result};
use cts_core::{Engine, EngineState, Role, Roster, User};
use std::fs;
use std::path::{Path, PathBuf};

pub const CTS_DIR: &str = ".cts";
const STATE_FILE: &str = "state.json";
const STAFF_FILE: &str = "staff.yaml";
const SESSION_FILE: &str = "user.json";

/// A discovered project rooted at the directory holding `.cts/`.
#[derive(Debug)]
pub struct Project {
    root: PathBuf,
    roster: Roster,
}

impl Project {
    /// Walk up from `start` looking for a `.cts/` directory.
    ///
    /// # Errors
    ///
    /// Fails when no ancestor contains `.cts/`, or when the staff roster
    /// cannot be read.
    pub fn discover(start: &Path) -> Result<Self> {
        let mut dir = Some(start);
        while let Some(candidate) = dir {
            if candidate.join(CTS_DIR).is_dir() {
                return Self::open(candidate);
            }
            dir = candidate.parent();
        }
        anyhow::bail!(
            "no .cts/ project found in {} or any parent. Run `cts init` first.",
            start.display()
        );
    }

    /// Open the project rooted at `root` (which must contain `.cts/`).
    ///
    /// # Errors
    ///
    /// Fails when the staff roster is missing or malformed.
    pub fn open(root: &Path) -> Result<Self> {
        let staff_path = root.join(CTS_DIR).join(STAFF_FILE);
        let raw = fs::read_to_string(&staff_path)
            .with_context(|| format!("failed to read roster: {}", staff_path.display()))?;
        let roster: Roster = serde_yaml::from_str(&raw)
            .with_context(|| format!("malformed roster: {}", staff_path.display()))?;
        Ok(Self {
            root: root.to_path_buf(),
            roster,
        })
    }

    /// The staff roster loaded from `staff.yaml`.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    fn cts_dir(&self) -> PathBuf {
        self.root.join(CTS_DIR)
    }

    /// Load the engine from the state snapshot.
    ///
    /// # Errors
    ///
    /// Fails when `state.json` is missing or malformed.
    pub fn load_engine(&self) -> Result<Engine> {
        let path = self.cts_dir().join(STATE_FILE);
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read state: {}", path.display()))?;
        let state: EngineState = serde_json::from_str(&raw)
            .with_context(|| format!("malformed state: {}", path.display()))?;
        Ok(Engine::from_state(state, self.roster.clone()))
    }

    /// Persist the engine's snapshot back to `state.json`.
    ///
    /// The snapshot is written to a temporary file and renamed into
    /// place, so a crash mid-write never corrupts the previous state.
    ///
    /// # Errors
    ///
    /// Fails on serialization or filesystem errors.
    pub fn save_engine(&self, engine: &Engine) -> Result<()> {
        let path = self.cts_dir().join(STATE_FILE);
        let tmp = self.cts_dir().join(format!("{STATE_FILE}.tmp"));
        let raw = serde_json::to_string_pretty(&engine.snapshot())
            .context("failed to serialize state")?;
        fs::write(&tmp, raw)
            .with_context(|| format!("failed to write state: {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("failed to replace state: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "state saved");
        Ok(())
    }

    /// The cached login session, if any.
    ///
    /// # Errors
    ///
    /// Fails only when an existing session file is malformed.
    pub fn session(&self) -> Result<Option<User>> {
        let path = self.cts_dir().join(SESSION_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read session: {}", path.display()))?;
        let user = serde_json::from_str(&raw)
            .with_context(|| format!("malformed session: {}", path.display()))?;
        Ok(Some(user))
    }

    /// Cache a login session.
    ///
    /// # Errors
    ///
    /// Fails on serialization or filesystem errors.
    pub fn save_session(&self, user: &User) -> Result<()> {
        let path = self.cts_dir().join(SESSION_FILE);
        let raw = serde_json::to_string_pretty(user).context("failed to serialize session")?;
        fs::write(&path, raw)
            .with_context(|| format!("failed to write session: {}", path.display()))?;
        Ok(())
    }

    /// Drop the cached session, if present.
    ///
    /// # Errors
    ///
    /// Fails on filesystem errors other than the file being absent.
    pub fn clear_session(&self) -> Result<()> {
        let path = self.cts_dir().join(SESSION_FILE);
        if path.is_file() {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove session: {}", path.display()))?;
        }
        Ok(())
    }

    /// Resolve the acting user: the `--as` flag (a roster id) wins over
    /// the cached session.
    ///
    /// # Errors
    ///
    /// Fails when the flag names an unknown staff id, or when neither a
    /// flag nor a session is available.
    pub fn resolve_actor(&self, flag: Option<&str>) -> Result<User> {
        if let Some(id) = flag {
            return self.roster.find(id).cloned().ok_or_else(|| {
                anyhow::anyhow!("unknown staff id {id}. See `cts staff` for the roster.")
            });
        }
        self.session()?
            .ok_or_else(|| anyhow::anyhow!("not logged in. Run `cts login` or pass --as <staff-id>."))
    }
}

/// Build a client identity for login. Clients are not roster members, so
/// the identity is synthesized from the login arguments.
pub fn client_user(id: &str, name: &str, email: &str, phone: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        role: Role::Client,
        department: None,
        branch: None,
    }
}
