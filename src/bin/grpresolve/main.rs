//! grpresolve CLI - resolve supplementary groups over nsswitch-style services

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::Session;
use grpresolve::nsswitch::NsswitchParseError;
use grpresolve::util::config::{global_config_path, load_config};
use grpresolve::util::diagnostic::emit;
use grpresolve::{ResolveError, Resolver};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli, color) {
        report(e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("grpresolve=debug")
    } else {
        EnvFilter::new("grpresolve=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let mut config = load_config(global_config_path().as_deref(), cli.config.as_deref())?;
    if cli.nsswitch.is_some() {
        config.nss.nsswitch = cli.nsswitch;
    }
    if cli.group_file.is_some() {
        config.nss.group_file = cli.group_file;
    }

    let resolver = Resolver::from_config(&config)?;
    let session = Session {
        config,
        resolver,
        color,
    };

    // Execute command
    match cli.command {
        Commands::Groups(args) => commands::groups::execute(args, &session),
        Commands::Init(args) => commands::init::execute(args, &session),
        Commands::Chain => commands::chain::execute(&session),
        Commands::Completions(_) => unreachable!("handled above"),
    }
}

fn report(e: anyhow::Error, color: bool) {
    if let Some(resolve) = e.downcast_ref::<ResolveError>() {
        emit(&resolve.to_diagnostic(), color);
        return;
    }

    match e.downcast::<NsswitchParseError>() {
        Ok(parse) => eprintln!("{:?}", miette::Report::new(parse)),
        Err(e) => eprintln!("error: {:#}", e),
    }
}
