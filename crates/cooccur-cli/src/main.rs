//! cooccur CLI
//!
//! Opens (or creates) a co-occurrence graph snapshot, reads any text files
//! given on the command line, then either runs scripted shell commands or
//! drops into the interactive shell.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use cooccur_graph::{Graph, GraphConfig};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod repl;

#[derive(Parser)]
#[command(name = "cooccur")]
#[command(author, version, about = "Word co-occurrence graph builder and explorer")]
struct Cli {
    /// Snapshot file the graph is loaded from and saved to
    snapshot: PathBuf,

    /// Text files to read into the graph at startup
    texts: Vec<PathBuf>,

    /// JSON configuration (delimiters, edge trim, snapshot format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a shell command instead of the interactive shell (repeatable)
    #[arg(short = 'e', long = "command")]
    commands: Vec<String>,

    /// Run shell commands from a file (`-` reads stdin)
    #[arg(long)]
    script: Option<PathBuf>,

    /// Keep running scripted commands after one fails
    #[arg(long)]
    continue_on_error: bool,

    /// Do not echo scripted commands
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            GraphConfig::from_json_file(path)?
        }
        None => GraphConfig::default(),
    };

    let graph = Graph::open_with_config(&cli.snapshot, config)
        .with_context(|| format!("failed to open graph {}", cli.snapshot.display()))?;
    info!(
        snapshot = %cli.snapshot.display(),
        entities = graph.len(),
        "graph opened"
    );
    let mut state = repl::ReplState::new(graph);

    for text in &cli.texts {
        debug!(path = %text.display(), "reading startup text");
        if let Err(e) = repl::cmd_read(&mut state, text, &mut std::io::stdout()) {
            eprintln!("{} {e:#}", "error:".red().bold());
        }
    }

    if cli.script.is_some() || !cli.commands.is_empty() {
        repl::cmd_repl_script(
            &mut state,
            cli.script.as_ref(),
            &cli.commands,
            cli.continue_on_error,
            cli.quiet,
        )
    } else {
        repl::cmd_repl(&mut state)
    }
}
