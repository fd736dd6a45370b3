use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use config::Config;
use error::{print_error_and_exit, CliError};

#[derive(Parser)]
#[command(name = "aligntree")]
#[command(about = "AlignTree - every optimal alignment of two sequences, as a tree")]
#[command(version)]
#[command(long_about = "
AlignTree fills a global alignment grid with a backward-scan affine gap cost
and prints every tied-optimal alignment as an indented tree.

Examples:
  aligntree align pair.fa
  aligntree align pair.fa --matrix blosum62.txt --gap-open=-10 --gap-extend=-1
  aligntree align pair.fa --linear --show-grids
  aligntree align pair.fa --format json > report.json
  aligntree config --example > aligntree.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Align the first two sequences of a FASTA/FASTQ file
    Align {
        /// Input sequence file (FASTA/FASTQ, optionally .gz)
        input: PathBuf,

        /// Substitution table file (dictionary literal or NCBI matrix)
        #[arg(short, long)]
        matrix: Option<PathBuf>,

        /// Gap opening penalty (affine model)
        #[arg(long, allow_negative_numbers = true)]
        gap_open: Option<i32>,

        /// Gap extension penalty (affine model)
        #[arg(long, allow_negative_numbers = true)]
        gap_extend: Option<i32>,

        /// Use one flat penalty per gap position instead of the affine scan
        #[arg(long)]
        linear: bool,

        /// Linear gap penalty (implies --linear)
        #[arg(long, allow_negative_numbers = true)]
        gap_penalty: Option<i32>,

        /// Behaviour at row 0 / column 0 of the path grid
        #[arg(long)]
        boundary: Option<BoundaryArg>,

        /// Maximum number of path-tree nodes
        #[arg(long)]
        max_nodes: Option<usize>,

        /// Print the score and path grids before the tree
        #[arg(long)]
        show_grids: bool,

        /// Output format
        #[arg(short, long, default_value = "tree")]
        format: OutputFormat,
    },

    /// Show or write the configuration file
    Config {
        /// Print an example aligntree.toml with every default
        #[arg(long)]
        example: bool,

        /// Write the default configuration to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented tree of every optimal alignment
    Tree,
    /// Each optimal alignment as two gapped lines
    Alignments,
    /// Machine-readable report
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryArg {
    Exhaust,
    SingleStep,
}

fn setup_logging(verbose: u8, quiet: bool) {
    let log_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())
        .map_err(|e| CliError::config(format!("{:#}", e)))?;

    match cli.command {
        Commands::Align {
            input,
            matrix,
            gap_open,
            gap_extend,
            linear,
            gap_penalty,
            boundary,
            max_nodes,
            show_grids,
            format,
        } => {
            let options = commands::align::AlignOptions {
                input,
                matrix,
                gap_open,
                gap_extend,
                linear: linear || gap_penalty.is_some(),
                gap_penalty,
                boundary,
                max_nodes,
                show_grids,
                format,
            };
            commands::align::execute(&config, options)?;
        }

        Commands::Config { example, output } => {
            commands::config::execute(&config, example, output)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        match err.downcast_ref::<CliError>() {
            Some(cli_err) => print_error_and_exit(cli_err),
            None => {
                eprintln!("Error: {:#}", err);
                std::process::exit(1);
            }
        }
    }
}
