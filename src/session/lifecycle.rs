//! Lifecycle marker read by the assistant's stop hook
//!
//! While a session is active, `<session_dir>/.lifecycle-active.json` records
//! what it was started for. A stop hook that finds the marker can warn about
//! an unclean exit. Deactivating removes the marker and is idempotent.

use super::paths::SessionPaths;
use crate::error::{AtlasError, AtlasResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Contents of the lifecycle marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleState {
    pub soul_purpose: String,
    pub project_dir: PathBuf,
    pub activated_at: DateTime<Utc>,
}

impl LifecycleState {
    /// Read the marker at `path`; `None` when absent or unreadable as JSON
    pub fn load(path: &Path) -> AtlasResult<Option<Self>> {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AtlasError::io(
                    format!("reading lifecycle state {}", path.display()),
                    e,
                ))
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!("Lifecycle state {} is corrupt: {}", path.display(), e);
                Ok(None)
            }
        }
    }
}

/// Result of activating the lifecycle marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivateReport {
    pub state_file: PathBuf,
    pub state: LifecycleState,
    /// A marker from an earlier session was overwritten
    pub replaced: bool,
}

/// Result of removing the lifecycle marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeactivateReport {
    pub state_file: PathBuf,
    pub removed: bool,
    /// Marker contents before removal, when they were readable
    pub previous: Option<LifecycleState>,
}

/// Mark the session active for `soul_purpose`
pub fn hook_activate(paths: &SessionPaths, soul_purpose: &str) -> AtlasResult<ActivateReport> {
    if !paths.project_root.is_dir() {
        return Err(AtlasError::PathNotFound(paths.project_root.clone()));
    }

    let state_file = &paths.lifecycle_state;
    let replaced = state_file.exists();
    let state = LifecycleState {
        soul_purpose: soul_purpose.to_string(),
        project_dir: paths.project_root.clone(),
        activated_at: Utc::now(),
    };

    fs::create_dir_all(&paths.session_dir).map_err(|e| {
        AtlasError::io(format!("creating directory {}", paths.session_dir.display()), e)
    })?;
    fs::write(state_file, serde_json::to_string_pretty(&state)?).map_err(|e| {
        AtlasError::io(format!("writing lifecycle state {}", state_file.display()), e)
    })?;

    info!("Session marked active at {}", state_file.display());
    Ok(ActivateReport {
        state_file: state_file.clone(),
        state,
        replaced,
    })
}

/// Remove the lifecycle marker if present
pub fn hook_deactivate(paths: &SessionPaths) -> AtlasResult<DeactivateReport> {
    let state_file = &paths.lifecycle_state;
    let previous = LifecycleState::load(state_file)?;

    let removed = match fs::remove_file(state_file) {
        Ok(()) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            return Err(AtlasError::io(
                format!("removing lifecycle state {}", state_file.display()),
                e,
            ))
        }
    };

    if removed {
        info!("Session marked inactive");
    }
    Ok(DeactivateReport {
        state_file: state_file.clone(),
        removed,
        previous,
    })
}
