//! Capability cache record persistence

use crate::error::{AtlasError, AtlasResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

/// Validity token for a generated capability inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Full HEAD commit id observed when the record was written
    pub git_head: String,

    /// When the record was written
    pub cached_at: DateTime<Utc>,
}

impl CacheRecord {
    /// Create a record for `git_head` stamped now
    pub fn new(git_head: impl Into<String>) -> Self {
        Self {
            git_head: git_head.into(),
            cached_at: Utc::now(),
        }
    }

    /// Read the record at `path`
    ///
    /// Missing and unparsable files are ordinary outcomes; only I/O failures
    /// such as permission errors are returned as `Err`.
    pub fn load(path: &Path) -> AtlasResult<CacheLoad> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CacheLoad::Missing),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Capability cache {} is not UTF-8", path.display());
                return Ok(CacheLoad::Corrupt(e.to_string()));
            }
            Err(e) => {
                return Err(AtlasError::io(
                    format!("reading capability cache {}", path.display()),
                    e,
                ))
            }
        };

        match serde_json::from_str::<CacheRecord>(&content) {
            Ok(record) => Ok(CacheLoad::Valid(record)),
            Err(e) => {
                warn!("Capability cache {} is corrupt: {}", path.display(), e);
                Ok(CacheLoad::Corrupt(e.to_string()))
            }
        }
    }

    /// Write the record to `path`, replacing whatever is there
    pub fn save(&self, path: &Path) -> AtlasResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AtlasError::io(format!("creating session directory {}", parent.display()), e)
            })?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| {
            AtlasError::io(format!("writing capability cache {}", path.display()), e)
        })?;

        info!("Cached capability inventory for HEAD {}", self.git_head);
        Ok(())
    }
}

/// Outcome of reading the cache file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLoad {
    /// No cache file
    Missing,
    /// A file exists but is not a valid record
    Corrupt(String),
    /// A well-formed record
    Valid(CacheRecord),
}

impl CacheLoad {
    /// The prior record, if one was readable
    pub fn record(&self) -> Option<&CacheRecord> {
        match self {
            Self::Valid(record) => Some(record),
            _ => None,
        }
    }
}
