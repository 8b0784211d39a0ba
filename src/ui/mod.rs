//! Human-readable rendering for interactive terminals
//!
//! Uses `cliclack` framing when stdout is a TTY outside CI, and plain
//! prefixed lines otherwise. JSON output bypasses this module entirely.

mod context;
mod output;
mod theme;

pub use context::UiContext;
pub use output::{
    intro, key_value, key_value_status, outro_success, outro_warn, remark, step_error_detail,
};
pub use theme::{init_theme, AtlasTheme};
