use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "novelpan - Detect novel MHC-II epitopes created by single amino-acid variants and classify their cross-reactivity with the human proteome.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to evaluate (variant, allele) pairs.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run elimination, proteome matching and novelty classification for a set of variants.
    Analyze(AnalyzeArgs),
    /// Inspect or manage the on-disk prediction cache.
    Cache(CacheArgs),
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    // --- Inputs ---
    /// FASTA file holding the protein the variants apply to.
    #[arg(short, long, value_name = "PATH")]
    pub sequence: Option<PathBuf>,

    /// Identifier of the record to use when the FASTA file holds several proteins.
    #[arg(long, value_name = "ID")]
    pub sequence_id: Option<String>,

    /// Variant in `<from>-<position>-<to>` form (e.g. L-7-R). Can be used multiple times.
    #[arg(short = 'm', long = "variant", value_name = "VARIANT")]
    pub variants: Vec<String>,

    /// Allele list, one allele per line.
    #[arg(short, long, value_name = "PATH")]
    pub alleles: Option<PathBuf>,

    /// Reference proteome in FASTA format (UniProt or Ensembl peptide headers).
    #[arg(short, long, value_name = "PATH")]
    pub proteome: Option<PathBuf>,

    /// Write the CSV report here instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Analysis Overrides ---
    /// Override the window (peptide) length submitted to the predictor.
    #[arg(short, long, value_name = "INT")]
    pub window_size: Option<usize>,

    /// Override the score code used to key cached predictions.
    #[arg(long, value_name = "CODE")]
    pub score_code: Option<String>,

    // --- Predictor Overrides ---
    /// Override the predictor executable.
    #[arg(long, value_name = "PATH")]
    pub predictor: Option<PathBuf>,

    /// Extra argument appended to every predictor invocation. Can be used multiple times.
    #[arg(long = "predictor-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub predictor_args: Vec<String>,

    /// Override the prediction cache directory.
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S analysis.window-size=13
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `cache` subcommand.
#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

/// Available commands for cache management.
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show the absolute path to the prediction cache.
    Path,
    /// Delete every cached predictor input and score file.
    Clear,
    /// Set a custom absolute path for the prediction cache.
    SetPath {
        /// The new directory to use for cached predictions.
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Reset the cache path to its default, OS-specific location.
    ResetPath,
}
