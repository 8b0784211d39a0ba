//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// atlas-session - session-state bookkeeping for AI coding assistants
///
/// Tracks whether a project's capability inventory is still valid for the
/// current git HEAD, and keeps CLAUDE.md governance sections safe across
/// rewrites.
#[derive(Parser, Debug)]
#[command(name = "atlas-session")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "ATLAS_SESSION_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local .atlas-session.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether the capability inventory needs regenerating
    Inventory(InventoryArgs),

    /// Detect the session environment of a project
    Preflight(PreflightArgs),

    /// Cache or restore CLAUDE.md governance sections
    Governance(GovernanceArgs),

    /// Summarise soul purpose, open tasks, and Ralph settings
    Context(ContextArgs),

    /// Print raw git data: branch, recent commits, changes, divergence
    GitSummary(GitSummaryArgs),

    /// Set or clear the active-session marker used by the stop hook
    Hook(HookArgs),

    /// Show configuration
    Config(ConfigArgs),
}

impl Commands {
    /// The `--project` directory a command targets, if one was given
    pub fn project(&self) -> Option<&Path> {
        match self {
            Self::Inventory(args) => args.project.as_deref(),
            Self::Preflight(args) => args.project.as_deref(),
            Self::Governance(args) => match &args.action {
                GovernanceAction::Cache { project } | GovernanceAction::Restore { project } => {
                    project.as_deref()
                }
            },
            Self::Context(args) => args.project.as_deref(),
            Self::GitSummary(args) => args.project.as_deref(),
            Self::Hook(args) => match &args.action {
                HookAction::Activate { project, .. } | HookAction::Deactivate { project } => {
                    project.as_deref()
                }
            },
            Self::Config(_) => None,
        }
    }
}

/// Arguments for the inventory command
#[derive(Parser, Debug)]
pub struct InventoryArgs {
    /// Project directory (defaults to current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Ignore a matching cache and record a fresh one
    #[arg(long)]
    pub force_refresh: bool,

    /// Output format
    #[arg(short, long, default_value = "json")]
    pub format: OutputFormat,
}

/// Arguments for the preflight command
#[derive(Parser, Debug)]
pub struct PreflightArgs {
    /// Project directory (defaults to current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "json")]
    pub format: OutputFormat,
}

/// Arguments for the governance command
#[derive(Parser, Debug)]
pub struct GovernanceArgs {
    /// Subcommand for governance
    #[command(subcommand)]
    pub action: GovernanceAction,
}

/// Governance subcommands
#[derive(Subcommand, Debug)]
pub enum GovernanceAction {
    /// Save governance sections before CLAUDE.md is rewritten
    Cache {
        /// Project directory (defaults to current directory)
        #[arg(short, long)]
        project: Option<PathBuf>,
    },

    /// Re-append governance sections missing from CLAUDE.md
    Restore {
        /// Project directory (defaults to current directory)
        #[arg(short, long)]
        project: Option<PathBuf>,
    },
}

/// Arguments for the context command
#[derive(Parser, Debug)]
pub struct ContextArgs {
    /// Project directory (defaults to current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "json")]
    pub format: OutputFormat,
}

/// Arguments for the git-summary command
#[derive(Parser, Debug)]
pub struct GitSummaryArgs {
    /// Project directory (defaults to current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "json")]
    pub format: OutputFormat,
}

/// Arguments for the hook command
#[derive(Parser, Debug)]
pub struct HookArgs {
    /// Subcommand for hook
    #[command(subcommand)]
    pub action: HookAction,
}

/// Hook subcommands
#[derive(Subcommand, Debug)]
pub enum HookAction {
    /// Record that a session is active
    Activate {
        /// Project directory (defaults to current directory)
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Soul purpose the session works toward
        #[arg(short, long)]
        soul_purpose: String,
    },

    /// Remove the active-session marker (idempotent)
    Deactivate {
        /// Project directory (defaults to current directory)
        #[arg(short, long)]
        project: Option<PathBuf>,
    },
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show effective configuration
    Show,

    /// Show configuration file path
    Path,
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Structured JSON result
    Json,
    /// Human-readable summary
    Text,
}
