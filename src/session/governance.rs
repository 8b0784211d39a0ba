//! Governance section caching around tools that rewrite CLAUDE.md
//!
//! `cache_governance` snapshots the governance sections of CLAUDE.md into a
//! JSON file; `restore_governance` re-appends whichever of them went missing
//! and removes the snapshot. The snapshot never shares a file with the
//! capability cache.

use super::markdown::{find_section, parse_sections};
use super::paths::SessionPaths;
use crate::error::{AtlasError, AtlasResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info};

/// Section keys preserved across CLAUDE.md rewrites, in document order
pub const GOVERNANCE_KEYS: [&str; 4] = [
    "Structure Maintenance Rules",
    "Session Context Files",
    "IMMUTABLE TEMPLATE RULES",
    "Ralph Loop",
];

/// Result of caching governance sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheReport {
    pub cached_sections: Vec<String>,
    pub missing_sections: Vec<String>,
    pub cache_file: PathBuf,
}

/// Result of restoring governance sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreReport {
    pub restored: Vec<String>,
    pub already_present: Vec<String>,
}

/// Snapshot governance sections of CLAUDE.md
pub fn cache_governance(paths: &SessionPaths) -> AtlasResult<CacheReport> {
    let content = read_claude_md(paths)?;
    let sections = parse_sections(&content);

    let mut cached = BTreeMap::new();
    let mut cached_sections = Vec::new();
    let mut missing_sections = Vec::new();

    for key in GOVERNANCE_KEYS {
        match find_section(&sections, key) {
            Some(section) => {
                cached.insert(key.to_string(), section.text.clone());
                cached_sections.push(key.to_string());
            }
            None => missing_sections.push(key.to_string()),
        }
    }

    let cache_file = &paths.governance_cache;
    if let Some(parent) = cache_file.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AtlasError::io(format!("creating directory {}", parent.display()), e))?;
    }
    fs::write(cache_file, serde_json::to_string_pretty(&cached)?).map_err(|e| {
        AtlasError::io(format!("writing governance cache {}", cache_file.display()), e)
    })?;

    info!(
        "Cached {} governance section(s) to {}",
        cached_sections.len(),
        cache_file.display()
    );

    Ok(CacheReport {
        cached_sections,
        missing_sections,
        cache_file: cache_file.clone(),
    })
}

/// Re-append cached sections that CLAUDE.md no longer has
pub fn restore_governance(paths: &SessionPaths) -> AtlasResult<RestoreReport> {
    let mut content = read_claude_md(paths)?;
    let cache_file = &paths.governance_cache;

    let raw = match fs::read_to_string(cache_file) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(AtlasError::GovernanceCacheMissing(cache_file.clone()))
        }
        Err(e) => {
            return Err(AtlasError::io(
                format!("reading governance cache {}", cache_file.display()),
                e,
            ))
        }
    };

    let cached: BTreeMap<String, String> =
        serde_json::from_str(&raw).map_err(|e| AtlasError::GovernanceCacheInvalid {
            path: cache_file.clone(),
            reason: e.to_string(),
        })?;

    let sections = parse_sections(&content);
    let mut restored = Vec::new();
    let mut already_present = Vec::new();

    // Restore in document order, then any keys this version does not know
    let known = GOVERNANCE_KEYS.iter().map(|k| k.to_string());
    let extra = cached
        .keys()
        .filter(|k| !GOVERNANCE_KEYS.contains(&k.as_str()))
        .cloned();

    for key in known.chain(extra) {
        let Some(text) = cached.get(&key) else {
            continue;
        };
        if find_section(&sections, &key).is_some() {
            already_present.push(key);
        } else {
            content = format!("{}\n\n---\n\n{}\n", content.trim_end(), text);
            restored.push(key);
        }
    }

    if !restored.is_empty() {
        fs::write(&paths.claude_md, &content).map_err(|e| {
            AtlasError::io(format!("writing {}", paths.claude_md.display()), e)
        })?;
        info!("Restored {} governance section(s)", restored.len());
    }

    match fs::remove_file(cache_file) {
        Ok(()) => debug!("Removed governance cache {}", cache_file.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(AtlasError::io(
                format!("removing governance cache {}", cache_file.display()),
                e,
            ))
        }
    }

    Ok(RestoreReport {
        restored,
        already_present,
    })
}

fn read_claude_md(paths: &SessionPaths) -> AtlasResult<String> {
    match fs::read_to_string(&paths.claude_md) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(AtlasError::ClaudeMdNotFound(paths.claude_md.clone()))
        }
        Err(e) => Err(AtlasError::io(
            format!("reading {}", paths.claude_md.display()),
            e,
        )),
    }
}
