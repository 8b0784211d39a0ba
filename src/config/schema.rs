//! Configuration schema for atlas-session
//!
//! Global configuration is stored at `~/.config/atlas-session/config.toml`;
//! a project may override it with `.atlas-session.toml`.

use crate::error::{AtlasError, AtlasResult};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Session-state directory layout
    pub session: SessionConfig,

    /// Governance section cache
    pub governance: GovernanceConfig,

    /// Git probe settings
    pub git: GitConfig,
}

impl Config {
    /// Reject settings that would make the cache files unusable
    ///
    /// `source` names the file the settings came from, for error reporting.
    pub fn validate(&self, source: &Path) -> AtlasResult<()> {
        let invalid = |reason: String| AtlasError::ConfigInvalid {
            path: source.to_path_buf(),
            reason,
        };

        let session = &self.session;
        let checks = [
            ("session.dir", session.dir.as_str()),
            ("session.capability_cache_file", session.capability_cache_file.as_str()),
            ("session.inventory_file", session.inventory_file.as_str()),
            ("session.claude_md", session.claude_md.as_str()),
            ("session.lifecycle_file", session.lifecycle_file.as_str()),
        ];

        for (key, value) in checks {
            if value.trim().is_empty() {
                return Err(invalid(format!("{key} must not be empty")));
            }
        }

        // Each project owns exactly one record, so the session dir must stay under its root
        for (key, value) in [("session.dir", &session.dir), ("session.claude_md", &session.claude_md)] {
            if !is_contained(Path::new(value)) {
                return Err(invalid(format!(
                    "{key} must be a relative path inside the project, got '{value}'"
                )));
            }
        }

        for (key, value) in [
            ("session.capability_cache_file", &session.capability_cache_file),
            ("session.inventory_file", &session.inventory_file),
            ("session.lifecycle_file", &session.lifecycle_file),
        ] {
            if value.contains(['/', '\\']) || value == ".." || value == "." {
                return Err(invalid(format!("{key} must be a file name, got '{value}'")));
            }
        }

        if session.capability_cache_file == session.inventory_file {
            return Err(invalid(
                "capability cache and inventory artifact share a file name".to_string(),
            ));
        }

        if session.lifecycle_file == session.capability_cache_file {
            return Err(invalid(
                "capability cache and lifecycle marker share a file name".to_string(),
            ));
        }

        Ok(())
    }

    /// Governance cache location, falling back to the system temp dir
    pub fn governance_cache_path(&self) -> PathBuf {
        self.governance
            .cache_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_GOVERNANCE_CACHE))
    }
}

const DEFAULT_GOVERNANCE_CACHE: &str = "claude-governance-cache.json";

/// Relative, with no root, prefix, or `..` component
fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Session-state directory layout, relative to the project root
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session-state directory name
    pub dir: String,

    /// Capability cache file name inside the session dir
    pub capability_cache_file: String,

    /// Capability inventory artifact name inside the session dir
    pub inventory_file: String,

    /// Project guidance file at the project root
    pub claude_md: String,

    /// Active-session marker inside the session dir
    pub lifecycle_file: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dir: "session-context".to_string(),
            capability_cache_file: ".capability-cache.json".to_string(),
            inventory_file: "CLAUDE-capability-inventory.md".to_string(),
            claude_md: "CLAUDE.md".to_string(),
            lifecycle_file: ".lifecycle-active.json".to_string(),
        }
    }
}

/// Governance cache settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    /// Where cached governance sections are written (default: temp dir)
    pub cache_path: Option<PathBuf>,
}

/// Git probe settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Git executable to invoke
    pub binary: String,

    /// Commits listed by the git summary
    pub recent_commits: usize,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary: "git".to_string(),
            recent_commits: 10,
        }
    }
}
