//! Inventory command - decide whether the capability inventory is stale

use super::{emit, project_dir};
use crate::cli::args::InventoryArgs;
use crate::config::Config;
use crate::error::AtlasResult;
use crate::tools;
use tracing::debug;

/// Execute the inventory command
pub fn execute(args: InventoryArgs, config: &Config) -> AtlasResult<bool> {
    let project = project_dir(args.project)?;
    debug!(
        "Checking capability inventory for {} (force_refresh={})",
        project.display(),
        args.force_refresh
    );

    let response = tools::capability_inventory(&project, args.force_refresh, config);
    emit(&response, args.format, "Capability Inventory")
}
