//! Preflight command - detect the session environment

use super::{emit, project_dir};
use crate::cli::args::PreflightArgs;
use crate::config::Config;
use crate::error::AtlasResult;
use crate::tools;

/// Execute the preflight command
pub fn execute(args: PreflightArgs, config: &Config) -> AtlasResult<bool> {
    let project = project_dir(args.project)?;
    let response = tools::preflight(&project, config);
    emit(&response, args.format, "Session Preflight")
}
