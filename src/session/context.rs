//! Read-side summary of the session-state files

use super::markdown::{find_section, parse_sections};
use super::paths::SessionPaths;
use crate::error::{AtlasError, AtlasResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

pub const SOUL_PURPOSE_FILE: &str = "CLAUDE-soul-purpose.md";
pub const ACTIVE_CONTEXT_FILE: &str = "CLAUDE-activeContext.md";

const CLOSED_MARKER: &str = "[CLOSED]";
const NO_PURPOSE_MARKER: &str = "(No active soul purpose)";
const SUMMARY_LINES: usize = 60;

/// Coarse state of the session for the caller to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusHint {
    /// Nothing conclusive could be read
    Unknown,
    /// The soul purpose file exists but names no active purpose
    NoPurpose,
}

/// Current soul purpose, open work, and Ralph loop settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub soul_purpose: String,
    pub has_archived_purposes: bool,
    /// Leading lines of the active context file
    pub active_context_summary: String,
    pub open_tasks: Vec<String>,
    pub recent_progress: Vec<String>,
    pub status_hint: StatusHint,
    pub ralph_mode: String,
    pub ralph_intensity: String,
}

/// Summarise the session-state files of a project
///
/// Missing files leave their fields empty; only unreadable ones are errors.
pub fn read_context(paths: &SessionPaths) -> AtlasResult<SessionContext> {
    if !paths.project_root.is_dir() {
        return Err(AtlasError::PathNotFound(paths.project_root.clone()));
    }

    let mut context = SessionContext {
        soul_purpose: String::new(),
        has_archived_purposes: false,
        active_context_summary: String::new(),
        open_tasks: Vec::new(),
        recent_progress: Vec::new(),
        status_hint: StatusHint::Unknown,
        ralph_mode: String::new(),
        ralph_intensity: String::new(),
    };

    if let Some(content) = read_optional(&paths.session_dir.join(SOUL_PURPOSE_FILE))? {
        let (purpose, archived) = parse_soul_purpose(&content);
        context.has_archived_purposes = archived;
        if purpose.is_empty() || content.contains(NO_PURPOSE_MARKER) {
            context.status_hint = StatusHint::NoPurpose;
        } else {
            context.soul_purpose = purpose;
        }
    }

    if let Some(content) = read_optional(&paths.session_dir.join(ACTIVE_CONTEXT_FILE))? {
        context.active_context_summary = content
            .split('\n')
            .take(SUMMARY_LINES)
            .collect::<Vec<_>>()
            .join("\n");

        for line in content.lines().map(str::trim) {
            if line.contains("[ ]") {
                context.open_tasks.push(task_text(line));
            } else if line.to_lowercase().contains("[x]") {
                context.recent_progress.push(task_text(line));
            }
        }
    }

    if let Some(content) = read_optional(&paths.claude_md)? {
        let sections = parse_sections(&content);
        if let Some(ralph) = find_section(&sections, "Ralph Loop") {
            for line in ralph.text.lines().map(str::trim) {
                if let Some(mode) = line.strip_prefix("**Mode**:") {
                    context.ralph_mode = mode.trim().to_lowercase();
                } else if let Some(intensity) = line.strip_prefix("**Intensity**:") {
                    context.ralph_intensity = intensity.trim().to_string();
                }
            }
        }
    }

    debug!(
        "Context for {}: {} open task(s)",
        paths.project_root.display(),
        context.open_tasks.len()
    );
    Ok(context)
}

/// Active purpose text up to the first closed entry, and whether one exists
fn parse_soul_purpose(content: &str) -> (String, bool) {
    let mut lines = Vec::new();
    for line in content.split('\n') {
        if line.contains(CLOSED_MARKER) {
            return (lines.join(" "), true);
        }
        let trimmed = line.trim();
        if !trimmed.is_empty()
            && !line.starts_with('#')
            && trimmed != "---"
            && !trimmed.starts_with("<!--")
        {
            lines.push(trimmed);
        }
    }
    (lines.join(" "), false)
}

fn task_text(line: &str) -> String {
    line.trim_start_matches(['-', ' ']).to_string()
}

fn read_optional(path: &Path) -> AtlasResult<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AtlasError::io(format!("reading {}", path.display()), e)),
    }
}
