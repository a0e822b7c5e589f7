//! CLI definitions using clap.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// projgen - Visual Studio solution generator for modular C++ codebases
#[derive(Parser)]
#[command(name = "projgen")]
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
    /// Generate projects, filters, module lists and the solution
    Generate(GenerateArgs),

    /// Show the modules each executable registers
    Modules(ModulesArgs),

    /// Print every resolved decision as JSON
    Resolve(ResolveArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

impl Commands {
    /// The definitions directory this command reads, if any.
    pub fn defs_dir(&self) -> Option<&Path> {
        match self {
            Commands::Generate(args) => Some(&args.defs_dir),
            Commands::Modules(args) => Some(&args.defs_dir),
            Commands::Resolve(args) => Some(&args.defs_dir),
            Commands::Completions(_) => None,
        }
    }
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Root directory of the projects; artifacts are written here
    pub root: PathBuf,

    /// Directory containing ProjectDefs.json (and optionally Generator.toml)
    #[arg(long = "def", value_name = "DIR")]
    pub defs_dir: PathBuf,

    /// Solution name, without the .sln extension
    #[arg(long = "sln", value_name = "NAME")]
    pub solution_name: String,

    /// Render everything but write nothing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ModulesArgs {
    /// Directory containing ProjectDefs.json
    #[arg(long = "def", value_name = "DIR")]
    pub defs_dir: PathBuf,

    /// Only show this executable
    pub executable: Option<String>,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Directory containing ProjectDefs.json (and optionally Generator.toml)
    #[arg(long = "def", value_name = "DIR")]
    pub defs_dir: PathBuf,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

/// Accept the single-dash `-def` and `-sln` spellings of `--def` and `--sln`.
pub fn normalize_legacy_flags(args: impl IntoIterator<Item = String>) -> Vec<String> {
    args.into_iter()
        .map(|arg| match arg.as_str() {
            "-def" => "--def".to_string(),
            "-sln" => "--sln".to_string(),
            _ => arg,
        })
        .collect()
}
