//! Environment detection before a session starts

use super::paths::{SessionPaths, SESSION_FILES};
use super::signals::{detect_signals, ProjectSignals};
use crate::config::Config;
use crate::error::{AtlasError, AtlasResult};
use crate::git::GitProbe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Whether the project still needs bootstrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// No session-state directory yet
    Init,
    /// Session-state directory exists
    Reconcile,
}

/// Health of one session file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHealth {
    pub exists: bool,
    pub has_content: bool,
}

/// Snapshot of a project's session environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreflightReport {
    pub mode: SessionMode,
    pub is_git: bool,
    pub git_head: Option<String>,
    pub has_claude_md: bool,
    /// Regular files at the root, excluding `CLAUDE*`
    pub root_file_count: usize,
    /// Populated in reconcile mode only
    pub session_files: BTreeMap<String, FileHealth>,
    pub project_signals: ProjectSignals,
}

/// Inspect `project_root` without modifying anything
pub fn preflight<P: GitProbe>(
    project_root: &Path,
    config: &Config,
    probe: &P,
) -> AtlasResult<PreflightReport> {
    if !project_root.is_dir() {
        return Err(AtlasError::PathNotFound(project_root.to_path_buf()));
    }

    let paths = SessionPaths::resolve(project_root, config)?;
    let status = probe.status(project_root)?;

    let mode = if paths.session_dir.is_dir() {
        SessionMode::Reconcile
    } else {
        SessionMode::Init
    };

    let mut session_files = BTreeMap::new();
    if mode == SessionMode::Reconcile {
        for name in SESSION_FILES {
            let health = match fs::metadata(paths.session_dir.join(name)) {
                Ok(meta) if meta.is_file() => FileHealth {
                    exists: true,
                    has_content: meta.len() > 0,
                },
                _ => FileHealth {
                    exists: false,
                    has_content: false,
                },
            };
            session_files.insert(name.to_string(), health);
        }
    }

    let root_file_count = count_root_files(project_root)?;
    let report = PreflightReport {
        mode,
        is_git: status.is_git(),
        git_head: status.head().map(str::to_string),
        has_claude_md: paths.claude_md.is_file(),
        root_file_count,
        session_files,
        project_signals: detect_signals(project_root, root_file_count),
    };

    debug!("Preflight for {}: {:?}", project_root.display(), report.mode);
    Ok(report)
}

fn count_root_files(root: &Path) -> AtlasResult<usize> {
    let entries = fs::read_dir(root)
        .map_err(|e| AtlasError::io(format!("reading directory {}", root.display()), e))?;

    let mut count = 0;
    for entry in entries {
        let entry = entry.map_err(|e| AtlasError::io("reading directory entry", e))?;
        let is_file = entry.file_type().is_ok_and(|t| t.is_file());
        if is_file && !entry.file_name().to_string_lossy().starts_with("CLAUDE") {
            count += 1;
        }
    }
    Ok(count)
}
