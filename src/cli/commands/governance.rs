//! Governance command - cache and restore CLAUDE.md governance sections

use super::{emit, project_dir};
use crate::cli::args::{GovernanceAction, GovernanceArgs, OutputFormat};
use crate::config::Config;
use crate::error::AtlasResult;
use crate::tools;

/// Execute the governance command
pub fn execute(args: GovernanceArgs, config: &Config) -> AtlasResult<bool> {
    let response = match args.action {
        GovernanceAction::Cache { project } => {
            tools::cache_governance(&project_dir(project)?, config)
        }
        GovernanceAction::Restore { project } => {
            tools::restore_governance(&project_dir(project)?, config)
        }
    };

    emit(&response, OutputFormat::Json, "Governance")
}
