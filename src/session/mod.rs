//! Session-state directory: paths, preflight, context, lifecycle, and
//! governance caching

pub mod context;
pub mod governance;
pub mod lifecycle;
pub mod markdown;
pub mod paths;
pub mod preflight;
pub mod signals;

pub use context::{read_context, SessionContext, StatusHint};
pub use governance::{cache_governance, restore_governance, CacheReport, RestoreReport};
pub use lifecycle::{hook_activate, hook_deactivate, ActivateReport, DeactivateReport, LifecycleState};
pub use paths::{SessionPaths, SESSION_FILES};
pub use preflight::{preflight, FileHealth, PreflightReport, SessionMode};
pub use signals::{detect_signals, ProjectSignals, Stack};
