mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{apply, init, inspect, preview, ApplyArgs, InitArgs, InspectArgs, PreviewArgs};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Page builder CLI - edit and inspect page builder documents
#[derive(Parser, Debug)]
#[command(name = "pagebuilder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a config, a starter document and a sample catalog
    Init(InitArgs),

    /// Print the page outline and connections of a document
    Inspect(InspectArgs),

    /// Run a script of edits, undo/redo steps and bus events on a document
    Apply(ApplyArgs),

    /// Show the catalog data an element would render
    Preview(PreviewArgs),
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level; logs go to stderr so stdout stays clean
    let default_filter = format!("pagebuilder={0},pagebuilder_editor={0},pagebuilder_connections={0},pagebuilder_catalog={0},pagebuilder_document={0}", cli.log_level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Inspect(args) => inspect(args, &cwd),
            Command::Apply(args) => apply(args, &cwd),
            Command::Preview(args) => preview(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
