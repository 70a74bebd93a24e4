//! mctx-demo - builds a service context from configuration and runs
//! computations declared against it.

mod config;
mod services;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::DemoConfig;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Run context-requiring computations against a configured context
#[derive(Parser, Debug)]
#[command(name = "mctx-demo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The command to execute
    #[command(subcommand)]
    command: Option<Commands>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the URL scheme
    #[arg(long)]
    scheme: Option<String>,

    /// Override the host
    #[arg(long)]
    host: Option<String>,

    /// Override the port
    #[arg(short, long)]
    port: Option<u16>,

    /// Leave a service out of the context
    #[arg(long, value_name = "ID")]
    skip: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the full URL (default)
    Url,
    /// Print the URL without its path
    Base,
    /// List the services in the context
    Services,
    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { Level::TRACE } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&cli)?;
    tracing::debug!(?config, "configuration loaded");
    let ctx = services::build_context(&config, &cli.skip);

    match cli.command.unwrap_or(Commands::Url) {
        Commands::Url => println!("{}", ctx.run(&services::full_url())?),
        Commands::Base => println!("{}", ctx.run(&services::base_url())?),
        Commands::Services => {
            for id in ctx.ids() {
                println!("{id}");
            }
            if let Ok(true) = ctx.run(&services::privileged_port()) {
                tracing::warn!("configured port is privileged");
            }
        }
        Commands::Config => print!("{}", config.to_toml_string()?),
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<DemoConfig> {
    let mut config = match &cli.config {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    if let Some(scheme) = &cli.scheme {
        config.scheme = scheme.clone();
    }
    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    Ok(config)
}
