//! pinplan CLI - resolve a project declaration into build and dev-shell descriptors

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use pinplan::util::diagnostic::{emit, suggestions};
use pinplan::util::GlobalContext;
use pinplan::ResolveError;

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        match e.downcast_ref::<ResolveError>() {
            Some(err) => {
                let mut diag = err.to_diagnostic();
                if !verbose {
                    diag = diag.with_suggestion(suggestions::VERBOSE);
                }
                emit(&diag, color);
            }
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("pinplan=debug")
    } else {
        EnvFilter::new("pinplan=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(cli.verbose);
    ctx.set_color(!cli.no_color);

    // Execute command
    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &ctx),
        Commands::Develop(args) => commands::develop::execute(args, &ctx),
        Commands::Platform(args) => commands::platform::execute(args, &ctx),
        Commands::Toolchain(args) => commands::toolchain::execute(args, &ctx),
        Commands::Lock(args) => commands::lock::execute(args, &ctx),
        Commands::Init(args) => commands::init::execute(args, &ctx),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
