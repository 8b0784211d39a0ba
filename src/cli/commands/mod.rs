//! CLI command implementations
//!
//! Each command prints its structured result and returns whether the
//! result status was `ok`.

pub mod config;
pub mod context;
pub mod git_summary;
pub mod governance;
pub mod hook;
pub mod inventory;
pub mod preflight;

pub use config::execute as config;
pub use context::execute as context;
pub use git_summary::execute as git_summary;
pub use governance::execute as governance;
pub use hook::execute as hook;
pub use inventory::execute as inventory;
pub use preflight::execute as preflight;

use crate::cli::args::OutputFormat;
use crate::error::{AtlasError, AtlasResult};
use crate::report::Response;
use crate::ui::{self, UiContext};
use serde_json::Value;
use std::path::PathBuf;

/// Project directory from `--project`, or the working directory
pub(crate) fn project_dir(project: Option<PathBuf>) -> AtlasResult<PathBuf> {
    match project {
        Some(p) => Ok(p.canonicalize().unwrap_or(p)),
        None => std::env::current_dir().map_err(|e| AtlasError::io("getting current directory", e)),
    }
}

/// Print a response in the requested format
pub(crate) fn emit(response: &Response, format: OutputFormat, title: &str) -> AtlasResult<bool> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(response)?);
        }
        OutputFormat::Text => render_text(&UiContext::detect(), response, title),
    }
    Ok(response.is_ok())
}

fn render_text(ctx: &UiContext, response: &Response, title: &str) {
    ui::intro(ctx, title);

    match response {
        Response::Ok(fields) => {
            for (key, value) in fields {
                match value {
                    Value::Bool(flag) => {
                        ui::key_value_status(ctx, key, &flag.to_string(), *flag)
                    }
                    Value::Null => ui::key_value(ctx, key, "-"),
                    Value::String(s) => ui::key_value(ctx, key, s),
                    other => ui::key_value(ctx, key, &other.to_string()),
                }
            }
            ui::outro_success(ctx, "Done");
        }
        Response::Error { error, hint } => {
            ui::step_error_detail(ctx, "Failed", error);
            if let Some(hint) = hint {
                ui::remark(ctx, hint);
            }
            ui::outro_warn(ctx, "Operation did not complete");
        }
    }
}
