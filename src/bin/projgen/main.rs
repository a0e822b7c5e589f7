//! projgen CLI - Visual Studio solution generator

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{normalize_legacy_flags, Cli, Commands};
use projgen::resolver::ResolveError;
use projgen::util::diagnostic::emit;

fn main() {
    let args = normalize_legacy_flags(std::env::args());
    let cli = Cli::parse_from(args);
    let color = !cli.no_color;
    let defs_dir = cli.command.defs_dir().map(Path::to_path_buf);

    if let Err(e) = run(cli, color) {
        if let Some(resolve_error) = e.downcast_ref::<ResolveError>() {
            let diagnostic = match &defs_dir {
                Some(dir) => resolve_error.to_diagnostic_in(dir),
                None => resolve_error.to_diagnostic(),
            };
            emit(&diagnostic, color);
        } else {
            eprintln!("error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("projgen=debug")
    } else {
        EnvFilter::new("projgen=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, color),
        Commands::Modules(args) => commands::modules::execute(args),
        Commands::Resolve(args) => commands::resolve::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
