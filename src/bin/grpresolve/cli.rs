//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use grpresolve::Gid;

/// grpresolve - resolve supplementary groups over nsswitch-style services
#[derive(Parser)]
#[command(name = "grpresolve")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file (overrides ~/.grpresolve/config.toml)
    #[arg(long, global = true, env = "GRPRESOLVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// nsswitch.conf to read
    #[arg(long, global = true)]
    pub nsswitch: Option<PathBuf>,

    /// Group file used by the `files` and `compat` services
    #[arg(long, global = true)]
    pub group_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the groups a user belongs to
    Groups(GroupsArgs),

    /// Install a user's groups as this process's supplementary groups
    Init(InitArgs),

    /// Show the service chain used for group lists
    Chain,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct GroupsArgs {
    /// User name
    pub user: String,

    /// Primary group id, always listed first
    pub group: Gid,

    /// Resolve into a buffer of this many slots
    #[arg(short = 'n', long)]
    pub capacity: Option<usize>,

    /// Emit the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct InitArgs {
    /// User name
    pub user: String,

    /// Primary group id
    pub group: Gid,

    /// Print what would be installed instead of calling setgroups
    #[arg(long)]
    pub dry_run: bool,

    /// Largest group list the dry run accepts
    #[arg(long, requires = "dry_run")]
    pub ceiling: Option<usize>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
