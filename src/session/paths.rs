//! Resolved file locations for one project

use crate::config::Config;
use crate::error::{AtlasError, AtlasResult};
use std::path::{Path, PathBuf};

/// Session files that a reconciled project is expected to carry
pub const SESSION_FILES: [&str; 5] = [
    "CLAUDE-activeContext.md",
    "CLAUDE-decisions.md",
    "CLAUDE-patterns.md",
    "CLAUDE-soul-purpose.md",
    "CLAUDE-troubleshooting.md",
];

/// Every path the session components touch for a single project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPaths {
    /// Project root directory
    pub project_root: PathBuf,
    /// Session-state directory, always under the project root
    pub session_dir: PathBuf,
    /// Capability cache record
    pub capability_cache: PathBuf,
    /// Inventory artifact path as reported to callers, relative to the root
    pub inventory_file: String,
    /// Project guidance file
    pub claude_md: PathBuf,
    /// Governance section cache, shared across projects
    pub governance_cache: PathBuf,
    /// Active-session marker
    pub lifecycle_state: PathBuf,
}

impl SessionPaths {
    /// Resolve paths for `project_root` under `config`
    pub fn resolve(project_root: &Path, config: &Config) -> AtlasResult<Self> {
        let session = &config.session;
        let session_dir = project_root.join(&session.dir);
        let paths = Self {
            project_root: project_root.to_path_buf(),
            capability_cache: session_dir.join(&session.capability_cache_file),
            lifecycle_state: session_dir.join(&session.lifecycle_file),
            inventory_file: format!(
                "{}/{}",
                session.dir.trim_end_matches(['/', '\\']),
                session.inventory_file
            ),
            claude_md: project_root.join(&session.claude_md),
            governance_cache: config.governance_cache_path(),
            session_dir,
        };

        if paths.governance_cache == paths.capability_cache {
            return Err(AtlasError::ConfigConflict(format!(
                "governance cache and capability cache both resolve to {}",
                paths.capability_cache.display()
            )));
        }

        Ok(paths)
    }
}
