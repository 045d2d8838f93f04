//! CLI front door for `variant-linker` (spec.md §6). Parses arguments,
//! wires them into a [`variant_linker::pipeline::PipelineInput`], runs
//! the pipeline, and writes the rendered output to stdout or
//! `--save-to-file`. Exits 0 on success, 1 with a single stderr line on
//! any fatal error (spec.md §7).

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use variant_linker::inheritance::SampleRoles;
use variant_linker::output::OutputFormat;
use variant_linker::pipeline::PipelineInput;
use variant_linker::PipelineConfig;

const GRCH37_BASE_URL: &str = "https://grch37.rest.ensembl.org";

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Assembly {
    Grch37,
    Grch38,
}

#[derive(Debug, Parser)]
#[command(name = "variant-linker", about = "Annotate genetic variants via Ensembl Recoder + VEP and derive inheritance patterns")]
struct Cli {
    /// A single variant (VCF key, HGVS, or rsID).
    #[arg(long)]
    variant: Option<String>,

    /// Path to a newline-delimited file of variants.
    #[arg(long = "variants-file")]
    variants_file: Option<PathBuf>,

    /// Path to a VCF file to annotate.
    #[arg(long = "vcf-input")]
    vcf_input: Option<PathBuf>,

    /// Path to a PED pedigree file.
    #[arg(long = "ped-file")]
    ped_file: Option<PathBuf>,

    /// Explicit trio role: the index/proband sample ID.
    #[arg(long = "sample-index")]
    sample_index: Option<String>,

    /// Explicit trio role: the mother sample ID.
    #[arg(long = "sample-mother")]
    sample_mother: Option<String>,

    /// Explicit trio role: the father sample ID.
    #[arg(long = "sample-father")]
    sample_father: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    output: CliOutputFormat,

    /// Write the rendered output here instead of stdout.
    #[arg(long = "save-to-file")]
    save_to_file: Option<PathBuf>,

    /// Path to a scoring-formula config. Accepted and recorded but not
    /// evaluated (external collaborator, spec.md §1).
    #[arg(long = "scoring-config")]
    scoring_config: Option<PathBuf>,

    /// JSON-API-style filter criteria.
    #[arg(long)]
    filter: Option<String>,

    /// Restrict transcript consequences to `pick==1` before filtering.
    #[arg(long = "pick-output")]
    pick_output: bool,

    /// Disable the HTTP response cache.
    #[arg(long = "no-cache")]
    no_cache: bool,

    /// Reference assembly; selects the Ensembl REST host.
    #[arg(long, value_enum, default_value = "grch38")]
    assembly: Assembly,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all logging below error level.
    #[arg(short = 'q', long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Csv,
    Tsv,
    Vcf,
    Schema,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(value: CliOutputFormat) -> Self {
        match value {
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Csv => OutputFormat::Csv,
            CliOutputFormat::Tsv => OutputFormat::Tsv,
            CliOutputFormat::Vcf => OutputFormat::Vcf,
            CliOutputFormat::Schema => OutputFormat::Schema,
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::Builder::new().filter_level(level).init();
}

fn build_config(cli: &Cli) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    if matches!(cli.assembly, Assembly::Grch37) {
        config.ensembl_base_url = GRCH37_BASE_URL.to_string();
    }
    if let Ok(base_url) = std::env::var("ENSEMBL_BASE_URL") {
        if !base_url.is_empty() {
            config.ensembl_base_url = base_url;
        }
    }
    if cli.no_cache {
        config.cache_enabled = false;
    }
    config
}

fn read_variants_file(path: &PathBuf) -> Result<Vec<String>, std::io::Error> {
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn build_input(cli: &Cli) -> Result<PipelineInput, std::io::Error> {
    let variants = match &cli.variants_file {
        Some(path) => read_variants_file(path)?,
        None => Vec::new(),
    };

    let sample_roles = if cli.sample_index.is_some() || cli.sample_mother.is_some() || cli.sample_father.is_some() {
        Some(SampleRoles {
            index: cli.sample_index.clone(),
            mother: cli.sample_mother.clone(),
            father: cli.sample_father.clone(),
        })
    } else {
        None
    };

    let filter = cli
        .filter
        .as_ref()
        .map(|raw| serde_json::from_str(raw).unwrap_or(serde_json::Value::Null));

    Ok(PipelineInput {
        variant: cli.variant.clone(),
        variants,
        vcf_path: cli.vcf_input.clone(),
        ped_path: cli.ped_file.clone(),
        sample_roles,
        filter,
        pick_output: cli.pick_output,
        output_format: Some(cli.output.into()),
        scoring_config_path: cli.scoring_config.clone(),
    })
}

fn run(cli: Cli) -> Result<(), String> {
    let config = build_config(&cli);
    let input = build_input(&cli).map_err(|err| err.to_string())?;

    let output = variant_linker::run_pipeline(input, &config).map_err(|err| err.to_string())?;

    match &cli.save_to_file {
        Some(path) => fs::write(path, &output.rendered).map_err(|err| err.to_string())?,
        None => println!("{}", output.rendered),
    }

    log::info!(
        "batch_size={} batch_processing={} variant_type={} inheritance_calculated={}",
        output.meta.batch_size,
        output.meta.batch_processing,
        output.meta.variant_type,
        output.meta.inheritance_calculated
    );

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("variant-linker: {message}");
            ExitCode::FAILURE
        }
    }
}
