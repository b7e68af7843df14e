use std::path::{Path, PathBuf};

/// Reset SIGPIPE to default behavior so piping (e.g. `modgraph graph | dot`) exits cleanly
/// instead of panicking on broken pipe.
#[cfg(unix)]
fn reset_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use modgraph::config::{loader, AppConfig, ErrorPolicy};
use modgraph::dag::DotOptions;
use modgraph::output::formatter;
use modgraph::pipeline::{self, Analysis};

/// modgraph - Oberon module import graph
#[derive(Parser)]
#[command(name = "modgraph", version, about, long_about = None)]
struct Cli {
    /// Path to config.yaml (default: ./config.yaml, then ../config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan sources and write the text report and DOT graph (default)
    Run,

    /// Print the module listing to stdout
    List,

    /// Print the dependency graph as DOT to stdout
    Graph,

    /// Show the rank of every module
    Ranks {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Scan every file and report problems without writing outputs
    Validate,
}

fn main() -> Result<()> {
    #[cfg(unix)]
    reset_sigpipe();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => cmd_run(&config),
        Commands::List => cmd_list(&config),
        Commands::Graph => cmd_graph(&config),
        Commands::Ranks { json } => cmd_ranks(&config, json),
        Commands::Validate => cmd_validate(&config),
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let cwd = std::env::current_dir().context("Cannot determine current directory")?;
    loader::load_config(explicit, &cwd).context("Error reading config file")
}

fn analyze(config: &AppConfig) -> Result<Analysis> {
    let analysis = pipeline::analyze(config)?;
    formatter::print_scan_failures(&analysis.failures);
    Ok(analysis)
}

// ─── Commands ────────────────────────────────────────────────────────────────

fn cmd_run(config: &AppConfig) -> Result<()> {
    let analysis = analyze(config)?;
    pipeline::write_outputs(&analysis, config)?;

    formatter::print_info(&format!(
        "{} module(s), {} edge(s), max rank {}",
        analysis.registry.len(),
        analysis.graph.edge_count(),
        analysis.ranks.max_rank()
    ));
    formatter::print_cycles(&analysis.cycles);
    formatter::print_success(&format!(
        "Wrote {} and {}.",
        config.output_txt.display(),
        config.output_dot.display()
    ));
    Ok(())
}

fn cmd_list(config: &AppConfig) -> Result<()> {
    let analysis = pipeline::analyze(config)?;
    print!("{}", analysis.report());
    Ok(())
}

fn cmd_graph(config: &AppConfig) -> Result<()> {
    let analysis = pipeline::analyze(config)?;
    print!("{}", analysis.dot(&DotOptions::from(config)));
    Ok(())
}

fn cmd_ranks(config: &AppConfig, json: bool) -> Result<()> {
    if json {
        let analysis = pipeline::analyze(config)?;
        println!("{}", formatter::ranks_json(&analysis.ranks, &analysis.cycles)?);
        return Ok(());
    }

    let analysis = analyze(config)?;
    formatter::print_ranks(&analysis.ranks);
    formatter::print_cycles(&analysis.cycles);
    Ok(())
}

fn cmd_validate(config: &AppConfig) -> Result<()> {
    let analysis = pipeline::analyze_with(config, ErrorPolicy::Collect)?;

    formatter::print_info(&format!("Scanned {}", config.test_dir.display()));
    formatter::print_info(&format!(
        "{} module(s), unresolved imports: {}",
        analysis.registry.len(),
        config.unresolved
    ));
    formatter::print_unresolved(analysis.registry.unresolved_imports());
    formatter::print_cycles(&analysis.cycles);
    formatter::print_scan_failures(&analysis.failures);

    if !analysis.failures.is_empty() {
        formatter::print_error(&format!(
            "{} file(s) could not be parsed.",
            analysis.failures.len()
        ));
        bail!("validation failed");
    }

    formatter::print_success("All module files parsed.");
    Ok(())
}
