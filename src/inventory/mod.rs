//! Capability inventory cache
//!
//! Decides whether a project's capability inventory must be regenerated,
//! using the git HEAD commit id as the validity key. The inventory content
//! itself is produced elsewhere; this module only records which HEAD it was
//! last generated for.
//!
//! # Decision table
//!
//! | Prior record | HEAD | force | cache_hit | git_changed | writes |
//! |--------------|------|-------|-----------|-------------|--------|
//! | none / corrupt | any | any | false | false | yes |
//! | same HEAD | same | no | true | false | no |
//! | same HEAD | same | yes | false | false | yes |
//! | other HEAD | new | any | false | true | yes |
//!
//! Projects without a HEAD commit (not a repository, or no commits yet)
//! always miss and never read or write the record.

pub mod check;
pub mod record;

pub use check::{InventoryCache, InventoryDecision};
pub use record::{CacheLoad, CacheRecord};
