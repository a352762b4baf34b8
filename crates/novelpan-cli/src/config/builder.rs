use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileScoreColumns};
use super::models::AppConfig;
use crate::cache::CacheManager;
use crate::cli::AnalyzeArgs;
use crate::error::{CliError, Result};
use crate::utils::parser::{self, ParseError};
use novelpan::core::io::scores::ScoreLayout;
use novelpan::core::models::variant::VariantDescriptor;
use novelpan::engine::config::{AnalysisConfigBuilder, PredictionType};
use novelpan::engine::predictor::CommandPredictor;
use std::path::PathBuf;

pub fn build_config(args: &AnalyzeArgs, cache_manager: &CacheManager) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let inputs = file_config.inputs.take().unwrap_or_default();
    let sequence_path = required(args.sequence.clone().or(inputs.sequence), "sequence")?;
    let alleles_path = required(args.alleles.clone().or(inputs.alleles), "alleles")?;
    let proteome_path = required(args.proteome.clone().or(inputs.proteome), "proteome")?;
    let sequence_id = args.sequence_id.clone().or(inputs.sequence_id);
    let output_path = args.output.clone().or(inputs.output);

    let variant_strings = if args.variants.is_empty() {
        inputs.variants.unwrap_or_default()
    } else {
        args.variants.clone()
    };
    let variants = parse_variants(&variant_strings)?;

    let analysis = file_config.analysis.take().unwrap_or_default();
    let window_size = args
        .window_size
        .or(analysis.window_size)
        .unwrap_or(defaults.window_size);
    let score_code = args
        .score_code
        .clone()
        .or(analysis.score_code)
        .unwrap_or(defaults.score_code);
    let prediction_type: PredictionType = analysis
        .prediction_type
        .unwrap_or(defaults.prediction_type)
        .parse()
        .map_err(|e: novelpan::engine::config::ConfigError| CliError::Config(e.to_string()))?;
    let cache_dir = args
        .cache_dir
        .clone()
        .or(analysis.cache_dir)
        .unwrap_or_else(|| cache_manager.cache_path().to_path_buf());

    let predictor_file = file_config.predictor.take().unwrap_or_default();
    let executable = args
        .predictor
        .clone()
        .or(predictor_file.executable)
        .unwrap_or_else(|| PathBuf::from(defaults.predictor));
    let extra_args = if args.predictor_args.is_empty() {
        predictor_file.extra_args.unwrap_or_default()
    } else {
        args.predictor_args.clone()
    };

    let score_layout = merge_score_layout(file_config.score_columns.take());

    let core_config = AnalysisConfigBuilder::new()
        .window_size(window_size)
        .prediction_type(prediction_type)
        .score_code(score_code)
        .cache_dir(cache_dir)
        .score_layout(score_layout)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        sequence_path,
        sequence_id,
        variants,
        alleles_path,
        proteome_path,
        output_path,
        predictor: CommandPredictor::new(executable).with_extra_args(extra_args),
        core_config,
    })
}

fn required(value: Option<PathBuf>, key: &str) -> Result<PathBuf> {
    value.ok_or_else(|| {
        CliError::Config(format!(
            "No {key} file given. Pass --{key} or set `inputs.{key}` in the config file."
        ))
    })
}

fn parse_variants(values: &[String]) -> Result<Vec<VariantDescriptor>> {
    if values.is_empty() {
        return Err(CliError::Config(
            "No variants given. Pass --variant or set `inputs.variants` in the config file."
                .to_string(),
        ));
    }
    values
        .iter()
        .map(|v| {
            v.parse::<VariantDescriptor>()
                .map_err(|e| CliError::Argument(e.to_string()))
        })
        .collect()
}

fn merge_score_layout(columns: Option<FileScoreColumns>) -> ScoreLayout {
    let defaults = ScoreLayout::default();
    let Some(columns) = columns else {
        return defaults;
    };
    ScoreLayout {
        start: columns.start.unwrap_or(defaults.start),
        allele: columns.allele.unwrap_or(defaults.allele),
        peptide: columns.peptide.unwrap_or(defaults.peptide),
        core_start: columns.core_start.unwrap_or(defaults.core_start),
        core: columns.core.unwrap_or(defaults.core),
        ic50: columns.ic50.unwrap_or(defaults.ic50),
    }
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    let config_error = |e: ParseError| CliError::Config(e.to_string());

    for kv_pair in set_values {
        let (key, value) = parser::parse_key_value(kv_pair).map_err(config_error)?;

        match key.split_once('.') {
            Some(("inputs", field)) => {
                let inputs = config.inputs.get_or_insert_with(Default::default);
                match field {
                    "sequence" => inputs.sequence = Some(PathBuf::from(value)),
                    "sequence-id" => inputs.sequence_id = Some(value.to_string()),
                    "alleles" => inputs.alleles = Some(PathBuf::from(value)),
                    "proteome" => inputs.proteome = Some(PathBuf::from(value)),
                    "output" => inputs.output = Some(PathBuf::from(value)),
                    _ => return Err(unsupported_key(key)),
                }
            }
            Some(("analysis", field)) => {
                let analysis = config.analysis.get_or_insert_with(Default::default);
                match field {
                    "window-size" => {
                        analysis.window_size =
                            Some(parser::parse_usize(key, value).map_err(config_error)?)
                    }
                    "score-code" => analysis.score_code = Some(value.to_string()),
                    "prediction-type" => analysis.prediction_type = Some(value.to_string()),
                    "cache-dir" => analysis.cache_dir = Some(PathBuf::from(value)),
                    _ => return Err(unsupported_key(key)),
                }
            }
            Some(("predictor", "executable")) => {
                config
                    .predictor
                    .get_or_insert_with(Default::default)
                    .executable = Some(PathBuf::from(value));
            }
            Some(("score-columns", field)) => {
                let columns = config.score_columns.get_or_insert_with(Default::default);
                let slot = match field {
                    "start" => &mut columns.start,
                    "allele" => &mut columns.allele,
                    "peptide" => &mut columns.peptide,
                    "core-start" => &mut columns.core_start,
                    "core" => &mut columns.core,
                    "ic50" => &mut columns.ic50,
                    _ => return Err(unsupported_key(key)),
                };
                *slot = Some(parser::parse_usize(key, value).map_err(config_error)?);
            }
            _ => return Err(unsupported_key(key)),
        }
    }
    Ok(config)
}

fn unsupported_key(key: &str) -> CliError {
    CliError::Config(format!(
        "Unsupported configuration key for --set: '{}'",
        key
    ))
}
