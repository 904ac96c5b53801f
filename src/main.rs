//! # mqprep
//!
//! A command-line tool that turns a MaxQuant `peptides.txt` export into
//! protein-level tables.
//!
//! ## Usage
//!
//! ```bash
//! # Paired conditions, everything on the command line
//! mqprep run peptides.txt --pair Drug:DMSO --pair KO:WT --pep-max 0.05 --msms-min 2 --ratio 1/2
//!
//! # Settings from a config file
//! mqprep run peptides.txt --config mqprep.toml
//!
//! # Interactive: prompts for whatever is missing
//! mqprep run peptides.txt
//!
//! # Inspect a table
//! mqprep info peptides.txt
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{dispatch, init_logging, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());
    dispatch(cli)
}
