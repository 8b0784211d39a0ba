//! Git summary command

use super::{emit, project_dir};
use crate::cli::args::GitSummaryArgs;
use crate::config::Config;
use crate::error::AtlasResult;
use crate::tools;

/// Execute the git-summary command
pub fn execute(args: GitSummaryArgs, config: &Config) -> AtlasResult<bool> {
    let project = project_dir(args.project)?;
    let response = tools::git_summary(&project, config);
    emit(&response, args.format, "Git Summary")
}
