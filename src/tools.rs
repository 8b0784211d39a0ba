//! Tool-layer entry points
//!
//! Each function runs one operation against a project directory and folds
//! the outcome into a [`Response`], so callers never handle an error value.

use crate::config::Config;
use crate::error::AtlasError;
use crate::git::GitCli;
use crate::inventory::InventoryCache;
use crate::report::Response;
use crate::session::{self, SessionPaths};
use std::path::Path;

/// Whether the capability inventory must be regenerated
pub fn capability_inventory(project_root: &Path, force_refresh: bool, config: &Config) -> Response {
    let cache = InventoryCache::new(config.clone());
    Response::from_result(cache.check(project_root, force_refresh))
}

/// Detect the session environment of a project
pub fn preflight(project_root: &Path, config: &Config) -> Response {
    let probe = GitCli::new(config.git.binary.clone());
    Response::from_result(session::preflight(project_root, config, &probe))
}

/// Snapshot governance sections of CLAUDE.md
pub fn cache_governance(project_root: &Path, config: &Config) -> Response {
    Response::from_result(
        SessionPaths::resolve(project_root, config).and_then(|p| session::cache_governance(&p)),
    )
}

/// Restore governance sections lost from CLAUDE.md
pub fn restore_governance(project_root: &Path, config: &Config) -> Response {
    Response::from_result(
        SessionPaths::resolve(project_root, config).and_then(|p| session::restore_governance(&p)),
    )
}

/// Summarise soul purpose, open tasks, and Ralph settings
pub fn read_context(project_root: &Path, config: &Config) -> Response {
    Response::from_result(
        SessionPaths::resolve(project_root, config).and_then(|p| session::read_context(&p)),
    )
}

/// Raw git data: branch, recent commits, changes, upstream divergence
pub fn git_summary(project_root: &Path, config: &Config) -> Response {
    if !project_root.is_dir() {
        return Response::from_error(&AtlasError::PathNotFound(project_root.to_path_buf()));
    }
    let git = GitCli::new(config.git.binary.clone());
    Response::from_result(git.summary(project_root, config.git.recent_commits))
}

/// Mark the session active for the stop hook
pub fn hook_activate(project_root: &Path, soul_purpose: &str, config: &Config) -> Response {
    Response::from_result(
        SessionPaths::resolve(project_root, config)
            .and_then(|p| session::hook_activate(&p, soul_purpose)),
    )
}

/// Clear the active-session marker
pub fn hook_deactivate(project_root: &Path, config: &Config) -> Response {
    Response::from_result(
        SessionPaths::resolve(project_root, config).and_then(|p| session::hook_deactivate(&p)),
    )
}
