//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// pinplan - reproducible build and dev-shell descriptors from one declaration
#[derive(Parser)]
#[command(name = "pinplan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Emit the build descriptor for one or more systems
    Build(BuildArgs),

    /// Emit the development environment
    Develop(DevelopArgs),

    /// Show how a host token is classified
    Platform(PlatformArgs),

    /// Show the pinned toolchains
    Toolchain(ToolchainArgs),

    /// Summarize the lock graph
    Lock(LockArgs),

    /// Create a Pinplan.toml in an existing directory
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Locating and adjusting the project declaration.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Path to Pinplan.toml (searched upward from the current directory by default)
    #[arg(long, value_name = "PATH")]
    pub project: Option<PathBuf>,

    /// Allow fetching git-pinned lock entries
    #[arg(long, conflicts_with = "no_git_fetch")]
    pub allow_git_fetch: bool,

    /// Forbid fetching git-pinned lock entries
    #[arg(long)]
    pub no_git_fetch: bool,
}

impl ProjectArgs {
    /// The fetch policy requested on the command line, if any.
    pub fn git_fetch_override(&self) -> Option<bool> {
        match (self.allow_git_fetch, self.no_git_fetch) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Host token to resolve for (repeatable; defaults to config, then this host)
    #[arg(long = "system", env = "PINPLAN_SYSTEM", value_delimiter = ',')]
    pub systems: Vec<String>,

    /// Additional feature tables to enable
    #[arg(long, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Write JSON to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args, Debug)]
pub struct DevelopArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Host token to resolve for
    #[arg(long, env = "PINPLAN_SYSTEM")]
    pub system: Option<String>,

    /// Additional feature tables to enable
    #[arg(long, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Write JSON to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args, Debug)]
pub struct PlatformArgs {
    /// Host token to classify (defaults to this host)
    pub token: Option<String>,
}

#[derive(Args, Debug)]
pub struct ToolchainArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args, Debug)]
pub struct LockArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Package whose dependency closure to report (defaults to the manifest package)
    #[arg(long)]
    pub root: Option<String>,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Fallback program name when there is no Cargo.toml (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Primary executable name
    #[arg(long)]
    pub main_program: Option<String>,

    /// Directory to initialize (defaults to current directory)
    pub path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
