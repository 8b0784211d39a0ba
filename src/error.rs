//! Error types for atlas-session
//!
//! All modules use `AtlasResult<T>` as their return type. Expected
//! variability (no git, no cache, stale or corrupt cache) never becomes an
//! error; only environment failures do.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for atlas-session operations
pub type AtlasResult<T> = Result<T, AtlasError>;

/// All errors that can occur in atlas-session
#[derive(Error, Debug)]
pub enum AtlasError {
    // Git errors
    #[error("git command failed: {command}: {stderr}")]
    GitProbe { command: String, stderr: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Conflicting configuration: {0}")]
    ConfigConflict(String),

    // Governance errors
    #[error("CLAUDE.md not found at {0}")]
    ClaudeMdNotFound(PathBuf),

    #[error("No governance cache found at {0}")]
    GovernanceCacheMissing(PathBuf),

    #[error("Governance cache {path} is unreadable: {reason}")]
    GovernanceCacheInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Process errors
    #[error("Command failed: {command}: {source}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl AtlasError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a git probe error from a failed invocation
    pub fn git(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::GitProbe {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ClaudeMdNotFound(_) => Some("Create CLAUDE.md at the project root first"),
            Self::GovernanceCacheMissing(_) => Some("Run: atlas-session governance cache"),
            Self::ConfigConflict(_) => {
                Some("Point governance.cache_path and session.capability_cache_file at different files")
            }
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied => {
                Some("Check permissions on the session-context directory")
            }
            _ => None,
        }
    }
}
