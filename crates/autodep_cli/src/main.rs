//! autodep CLI: dry-run build planning with header-driven dependency discovery.
//!
//! `autodep plan` runs the scheduler over the project's targets without
//! invoking a compiler and reports which units were compiled, what every
//! link step consumes and which library tags were inferred. `autodep graph`
//! prints the discovered unit graph in Graphviz DOT format.

#![warn(missing_docs)]

mod graph;
mod pipeline;
mod plan;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// autodep: discover compiled units from `#include`s while the build runs.
#[derive(Parser, Debug)]
#[command(name = "autodep", version, about = "Header-driven build planning")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `autodep.toml` configuration file or its directory.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a dry build and report compile units and link inputs.
    Plan(PlanArgs),
    /// Print the discovered unit graph in DOT format.
    Graph(GraphArgs),
}

/// Arguments for the `autodep plan` subcommand.
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Target name to select from `autodep.toml`. All targets if omitted.
    #[arg(short, long)]
    pub target: Option<String>,

    /// Output format for the report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `autodep graph` subcommand.
#[derive(Parser, Debug)]
pub struct GraphArgs {
    /// Target name to select from `autodep.toml`. All targets if omitted.
    #[arg(short, long)]
    pub target: Option<String>,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Plan(ref args) => plan::run(args, &global),
        Command::Graph(ref args) => graph::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the log subscriber. `RUST_LOG` wins over the verbosity flags.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_plan_default() {
        let cli = Cli::parse_from(["autodep", "plan"]);
        match cli.command {
            Command::Plan(ref args) => {
                assert!(args.target.is_none());
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Plan command"),
        }
    }

    #[test]
    fn parse_plan_with_args() {
        let cli = Cli::parse_from(["autodep", "plan", "--target", "wm", "--format", "json"]);
        match cli.command {
            Command::Plan(ref args) => {
                assert_eq!(args.target.as_deref(), Some("wm"));
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Plan command"),
        }
    }

    #[test]
    fn parse_graph() {
        let cli = Cli::parse_from(["autodep", "graph", "-t", "menu"]);
        match cli.command {
            Command::Graph(ref args) => assert_eq!(args.target.as_deref(), Some("menu")),
            _ => panic!("expected Graph command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["autodep", "--quiet", "--config", "/tmp/autodep.toml", "plan"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config.as_deref(), Some("/tmp/autodep.toml"));
    }

    #[test]
    fn parse_verbose_after_subcommand() {
        let cli = Cli::parse_from(["autodep", "graph", "--verbose"]);
        assert!(cli.verbose);
    }
}
