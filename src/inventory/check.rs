//! Hit/miss decision for the capability inventory

use super::record::{CacheLoad, CacheRecord};
use crate::config::Config;
use crate::error::{AtlasError, AtlasResult};
use crate::git::{GitCli, GitProbe, GitStatus};
use crate::session::SessionPaths;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Whether the capability inventory must be (re)generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDecision {
    /// Project is a git working tree
    pub is_git: bool,
    /// Current HEAD commit id
    pub git_head: Option<String>,
    /// A valid record matched HEAD and no refresh was forced
    pub cache_hit: bool,
    /// A readable prior record names a different HEAD
    pub git_changed: bool,
    /// Always `!cache_hit`
    pub needs_generation: bool,
    /// Where the generated inventory is expected, relative to the project root
    pub inventory_file: String,
}

impl InventoryDecision {
    fn miss(status: &GitStatus, git_changed: bool, inventory_file: String) -> Self {
        Self {
            is_git: status.is_git(),
            git_head: status.head().map(str::to_string),
            cache_hit: false,
            git_changed,
            needs_generation: true,
            inventory_file,
        }
    }
}

/// Capability inventory cache keyed on git HEAD
pub struct InventoryCache<P = GitCli> {
    config: Config,
    probe: P,
}

impl InventoryCache<GitCli> {
    /// Create a cache that probes with the configured git binary
    pub fn new(config: Config) -> Self {
        let probe = GitCli::new(config.git.binary.clone());
        Self { config, probe }
    }
}

impl<P: GitProbe> InventoryCache<P> {
    /// Create a cache with a custom git probe
    pub fn with_probe(config: Config, probe: P) -> Self {
        Self { config, probe }
    }

    /// Decide whether the inventory for `project_root` must be regenerated
    ///
    /// Writes a fresh cache record whenever the answer is a miss on a project
    /// with a HEAD commit. Projects without one never touch the cache file.
    pub fn check(&self, project_root: &Path, force_refresh: bool) -> AtlasResult<InventoryDecision> {
        if !project_root.is_dir() {
            return Err(AtlasError::PathNotFound(project_root.to_path_buf()));
        }

        let paths = SessionPaths::resolve(project_root, &self.config)?;
        let status = self.probe.status(project_root)?;

        let Some(head) = status.head() else {
            debug!(
                "No HEAD for {}, inventory always regenerates",
                project_root.display()
            );
            return Ok(InventoryDecision::miss(&status, false, paths.inventory_file));
        };

        let prior = CacheRecord::load(&paths.capability_cache)?;
        let git_changed = prior.record().is_some_and(|r| r.git_head != head);
        let matches_head = prior.record().is_some_and(|r| r.git_head == head);

        if matches_head && !force_refresh {
            debug!("Capability cache hit for {}", head);
            return Ok(InventoryDecision {
                is_git: true,
                git_head: Some(head.to_string()),
                cache_hit: true,
                git_changed: false,
                needs_generation: false,
                inventory_file: paths.inventory_file,
            });
        }

        match &prior {
            CacheLoad::Missing => debug!("No capability cache yet"),
            CacheLoad::Corrupt(reason) => debug!("Replacing corrupt capability cache: {}", reason),
            CacheLoad::Valid(record) if force_refresh && !git_changed => {
                debug!("Forced refresh at unchanged HEAD {}", record.git_head)
            }
            CacheLoad::Valid(record) => debug!("HEAD moved from {} to {}", record.git_head, head),
        }

        CacheRecord::new(head).save(&paths.capability_cache)?;
        Ok(InventoryDecision::miss(&status, git_changed, paths.inventory_file))
    }
}
