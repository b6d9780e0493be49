mod commands;
mod config;

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use commands::{
    apply, clean, design, fmt, from_json, ids, new, to_json, ApplyArgs, CleanArgs, DesignArgs,
    FmtArgs, FromJsonArgs, IdsArgs, NewArgs, ToJsonArgs,
};
use tracing::Level;

/// Dashgrid CLI - edit dashboard grid layouts from the command line
#[derive(Parser, Debug)]
#[command(name = "dashgrid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty main grid
    New(NewArgs),

    /// Reformat a grid file
    Fmt(FmtArgs),

    /// Print the object form of a grid
    ToJson(ToJsonArgs),

    /// Build a grid file from its object form
    FromJson(FromJsonArgs),

    /// Normalize a grid to its minimal shape
    Clean(CleanArgs),

    /// Give every node without an id a fresh one
    Ids(IdsArgs),

    /// Toggle or refresh the placeholder overlay
    Design(DesignArgs),

    /// Apply a JSON list of mutations to a grid file
    Apply(ApplyArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::New(args) => new(args, &cwd),
                Command::Fmt(args) => fmt(args, &cwd),
                Command::ToJson(args) => to_json(args, &cwd),
                Command::FromJson(args) => from_json(args, &cwd),
                Command::Clean(args) => clean(args, &cwd),
                Command::Ids(args) => ids(args, &cwd),
                Command::Design(args) => design(args, &cwd),
                Command::Apply(args) => apply(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
