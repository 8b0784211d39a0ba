//! atlas-session - session-state bookkeeping for AI coding assistants
//!
//! Keeps a project's capability inventory keyed on git HEAD, detects the
//! session environment, and protects CLAUDE.md governance sections across
//! rewrites.

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod inventory;
pub mod report;
pub mod session;
pub mod tools;
pub mod ui;

pub use error::{AtlasError, AtlasResult};
pub use inventory::{InventoryCache, InventoryDecision};
pub use report::Response;
