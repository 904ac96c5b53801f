use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod convert;
mod info;
mod prompt;
mod run;

use run::RunArgs;

/// mqprep - MaxQuant peptide table cleaning and protein-level reports
#[derive(Parser)]
#[command(name = "mqprep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a peptides table and write protein-level results
    Run(RunArgs),

    /// Convert a tab-delimited table to comma-delimited
    Convert {
        /// Input tab-delimited file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output CSV path (defaults to the input with a .csv extension)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Display the shape and detected conditions of a peptides table
    Info {
        /// Input table (.csv is read comma-delimited, anything else as TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run::run(args),
        Commands::Convert { input, output } => convert::run(input, output),
        Commands::Info { file } => info::run(file),
    }
}

/// Field delimiter implied by a file extension
pub(crate) fn delimiter_for(path: &std::path::Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => b',',
        _ => b'\t',
    }
}
