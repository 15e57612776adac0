use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use patchmerge::commands;
use patchmerge::commands::resolve::ResolveOptions;
use patchmerge::config::Side;

#[derive(Parser)]
#[command(name = "patchmerge", about = "Resolve merge conflicts inside patch files")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the conflicting hunks of patch files
    Resolve {
        /// Patch files or directories to search (default: current directory)
        paths: Vec<PathBuf>,
        /// Keep the same hunk of every conflict instead of prompting (A = the
        /// hunk starting first in the source, B = the other)
        #[arg(long, value_enum)]
        prefer: Option<Side>,
        /// Do not `git add` resolved files
        #[arg(long = "no-stage")]
        no_stage: bool,
        /// Print merged patches instead of writing them
        #[arg(long = "dry-run")]
        dry_run: bool,
    },

    /// List patch files that still contain conflict markers
    Status {
        /// Patch files or directories to search (default: current directory)
        paths: Vec<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env("PATCHMERGE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Resolve {
            paths,
            prefer,
            no_stage,
            dry_run,
        }) => commands::resolve::run(ResolveOptions {
            paths,
            prefer,
            no_stage,
            dry_run,
        }),
        Some(Commands::Status { paths }) => commands::status::run(&paths),
        None => commands::status::run(&[]),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
