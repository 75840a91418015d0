use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use circprimer::engine::{Primer3Config, Primer3Core, DEFAULT_EXECUTABLE};
use circprimer::handler::HandleOptions;
use circprimer::mode::DesignMode;
use circprimer::report::{self, OutputFormat};
use circprimer::seqio;

/// circprimer CLI
#[derive(Parser)]
#[command(name = "circprimer")]
#[command(version)]
#[command(about = "Primer3-driven primer design for circRNA junctions and linear templates", long_about = None)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the design modes
    Modes,

    /// Design primer pairs for a pasted sequence, or for every record of a FASTA/FASTQ file
    Design {
        /// Design mode: 1 (circRNA qPCR), 2 (circRNA Sanger) or 3 (linear)
        #[arg(short, long, default_value = "1")]
        mode: DesignMode,
        /// Sequence text (spaces and line breaks are ignored)
        #[arg(short, long, conflicts_with = "input")]
        sequence: Option<String>,
        /// Input file (raw text, FASTA or FASTQ); `-` or absent reads stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output format: text, table, csv or json
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
        /// Reject characters outside the IUPAC DNA alphabet
        #[arg(long)]
        strict: bool,
        /// Threads for multi-record input (0/None = all)
        #[arg(long)]
        threads: Option<usize>,
        /// primer3_core executable
        #[arg(long = "primer3", env = "PRIMER3_CORE", default_value = DEFAULT_EXECUTABLE)]
        primer3: PathBuf,
        /// Extra argument passed to primer3_core (repeatable)
        #[arg(long = "primer3-arg", allow_hyphen_values = true)]
        primer3_args: Vec<String>,
        /// Directory with Primer3 thermodynamic parameters
        #[arg(long, env = "PRIMER3_CONFIG")]
        thermo_params: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Modes => {
            let df = report::modes_frame()?;
            report::write_frame(&mut std::io::stdout().lock(), &df)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Design { mode, sequence, input, format, strict, threads, primer3, primer3_args, thermo_params } => {
            let text = match sequence {
                Some(s) => s,
                None => seqio::read_source(input.as_deref())?,
            };
            let requests = seqio::parse_requests(&text, mode)?;
            let engine = Primer3Core::new(Primer3Config {
                executable: primer3,
                args: primer3_args.into_iter().map(Into::into).collect(),
                thermo_params,
            });
            info!(mode = mode.number(), requests = requests.len(), "designing primers");

            let reports = seqio::handle_all(&requests, threads, &HandleOptions { strict }, &engine)?;
            report::write_reports(&mut std::io::stdout().lock(), &reports, format)?;

            if report::exit_failed(&reports) {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}
