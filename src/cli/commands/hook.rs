//! Hook command - maintain the active-session marker

use super::{emit, project_dir};
use crate::cli::args::{HookAction, HookArgs, OutputFormat};
use crate::config::Config;
use crate::error::AtlasResult;
use crate::tools;

/// Execute the hook command
pub fn execute(args: HookArgs, config: &Config) -> AtlasResult<bool> {
    let response = match args.action {
        HookAction::Activate {
            project,
            soul_purpose,
        } => tools::hook_activate(&project_dir(project)?, &soul_purpose, config),
        HookAction::Deactivate { project } => {
            tools::hook_deactivate(&project_dir(project)?, config)
        }
    };

    emit(&response, OutputFormat::Json, "Session Lifecycle")
}
