//! Context command - summarise the session-state files

use super::{emit, project_dir};
use crate::cli::args::ContextArgs;
use crate::config::Config;
use crate::error::AtlasResult;
use crate::tools;

/// Execute the context command
pub fn execute(args: ContextArgs, config: &Config) -> AtlasResult<bool> {
    let project = project_dir(args.project)?;
    let response = tools::read_context(&project, config);
    emit(&response, args.format, "Session Context")
}
