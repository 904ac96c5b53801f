use anyhow::{bail, Context, Result};
use clap::Args;
use log::{info, warn};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use mqprep::columns::ColumnPolicy;
use mqprep::condition::{Conditions, RatioSelection};
use mqprep::output::{ResultWriter, DEFAULT_RESULTS_DIR};
use mqprep::pipeline::{self, PipelineParams, Thresholds};
use mqprep::table::{convert_delimited, MissingKeyPolicy, Table};

use super::config::Config;
use super::delimiter_for;
use super::prompt::Prompter;

/// Default location of the comma-delimited copy of the input
const DEFAULT_CONVERTED_CSV: &str = "experimental_data/peptides.csv";

/// Arguments of `mqprep run`
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// MaxQuant peptides table (tab-delimited, or comma-delimited if .csv)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Experiment with its control, as EXPERIMENT:CONTROL (repeatable)
    #[arg(long = "pair", value_name = "EXP:CTRL", value_parser = parse_pair)]
    pub pairs: Vec<(String, String)>,

    /// Experiment without a control (repeatable)
    #[arg(long = "experiment", value_name = "NAME")]
    pub experiments: Vec<String>,

    /// Keep peptides with PEP at or below this value
    #[arg(long, value_name = "P")]
    pub pep_max: Option<f64>,

    /// Keep peptides with at least this many MS/MS spectra
    #[arg(long, value_name = "N")]
    pub msms_min: Option<f64>,

    /// Fold change as one-based condition indices, e.g. 1/2
    #[arg(long, value_name = "I/J")]
    pub ratio: Option<RatioSelection>,

    /// Directory for the result files [default: results]
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Group peptides without a protein name under this label instead of
    /// dropping them
    #[arg(long, value_name = "LABEL")]
    pub missing_protein_label: Option<String>,

    /// Fail instead of prompting for missing settings
    #[arg(long)]
    pub no_interactive: bool,

    /// Read the input directly instead of writing a CSV copy first
    #[arg(long)]
    pub no_convert: bool,
}

fn parse_pair(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once(':') {
        Some((experiment, control)) if !experiment.trim().is_empty() && !control.trim().is_empty() => {
            Ok((experiment.trim().to_string(), control.trim().to_string()))
        }
        _ => Err(format!("expected EXPERIMENT:CONTROL, got '{}'", s)),
    }
}

/// Clean a peptides table and write protein-level results
pub fn run(args: RunArgs) -> Result<()> {
    if !args.input.exists() {
        bail!("Input file does not exist: {}", args.input.display());
    }

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let params = if args.no_interactive {
        resolve_params::<std::io::StdinLock<'static>, std::io::Stdout>(&args, &config, None)?
    } else {
        let mut prompter = Prompter::new(std::io::stdin().lock(), std::io::stdout());
        resolve_params(&args, &config, Some(&mut prompter))?
    };

    let raw = load_input(&args, &config)?;
    info!("Loaded {} peptides with {} columns", raw.n_rows(), raw.n_cols());

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.output.directory.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_DIR));
    let writer = ResultWriter::new(&output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let (aggregated, mut report) =
        pipeline::prepare(raw, &params).context("Failed to prepare peptide table")?;
    writer.write_aggregated(&aggregated, &mut report)?;

    let analyses = pipeline::analyze(&aggregated, &params, &mut report)
        .context("Failed to compute protein reports")?;
    writer.write_analyses(&analyses, &mut report)?;
    writer.write_summary(&mut report)?;

    println!("{}", report.format_colored());
    println!("Results written to {}", writer.dir().display());
    Ok(())
}

/// Read the input, going through a comma-delimited copy unless disabled
fn load_input(args: &RunArgs, config: &Config) -> Result<Table> {
    let delimiter = delimiter_for(&args.input);
    if args.no_convert || delimiter == b',' {
        return Table::from_path(&args.input, delimiter)
            .with_context(|| format!("Failed to read table: {}", args.input.display()));
    }

    let converted = config
        .output
        .converted_csv
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONVERTED_CSV));
    create_parent(&converted)?;
    convert_delimited(&args.input, &converted, delimiter, b',')
        .with_context(|| format!("Failed to convert {} to CSV", args.input.display()))?;
    info!("Converted {} to {}", args.input.display(), converted.display());

    Table::from_path(&converted, b',')
        .with_context(|| format!("Failed to read table: {}", converted.display()))
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Merge command-line flags, the config file and, when allowed, answers to
/// prompts. Flags win over the config file.
fn resolve_params<R: BufRead, W: Write>(
    args: &RunArgs,
    config: &Config,
    mut prompter: Option<&mut Prompter<R, W>>,
) -> Result<PipelineParams> {
    let conditions = match (args.pairs.is_empty(), args.experiments.is_empty()) {
        (false, false) => bail!("Use either --pair or --experiment, not both"),
        (false, true) => Conditions::paired(args.pairs.iter().cloned())?,
        (true, false) => Conditions::unpaired(args.experiments.iter().cloned())?,
        (true, true) => match config.conditions.resolve()? {
            Some(conditions) => conditions,
            None => match prompter.as_deref_mut() {
                Some(p) => {
                    let mode = p.mode()?;
                    p.conditions(mode)?
                }
                None => bail!("No conditions given; use --pair, --experiment or a config file"),
            },
        },
    };

    let pep_max = args.pep_max.or(config.filter.pep_max);
    let msms_min = args.msms_min.or(config.filter.msms_min);
    let thresholds = match (pep_max, msms_min, prompter.as_deref_mut()) {
        (Some(pep), Some(msms), _) => Thresholds::new(pep, msms)?,
        (pep, msms, Some(p)) => p.thresholds(pep, msms)?,
        (_, _, None) => bail!("Thresholds missing; use --pep-max and --msms-min or a config file"),
    };

    let ratio = match (args.ratio, &config.differential.ratio) {
        (Some(ratio), _) => Some(ratio),
        (None, Some(text)) => Some(text.parse::<RatioSelection>()?),
        (None, None) if conditions.len() >= 2 => match prompter.as_deref_mut() {
            Some(p) => Some(p.ratio(&conditions)?),
            None => None,
        },
        (None, None) => None,
    };
    match ratio {
        Some(ratio) if conditions.len() >= 2 => ratio.validate(conditions.len())?,
        Some(ratio) => warn!(
            "Ratio {} given for a single condition; differential expression will be skipped",
            ratio
        ),
        None => {}
    }

    let missing = match args
        .missing_protein_label
        .clone()
        .or_else(|| config.aggregation.missing_protein_label.clone())
    {
        Some(label) => MissingKeyPolicy::Sentinel(label),
        None => MissingKeyPolicy::Drop,
    };

    let mut params = PipelineParams::new(conditions, thresholds)
        .missing_protein_names(missing)
        .column_policy(ColumnPolicy::new(config.pruning.extra_drop_columns.iter().cloned()));
    if let Some(ratio) = ratio {
        params = params.ratio(ratio);
    }
    Ok(params)
}
