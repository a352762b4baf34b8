use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub inputs: Option<FileInputsConfig>,
    pub analysis: Option<FileAnalysisConfig>,
    pub predictor: Option<FilePredictorConfig>,
    pub score_columns: Option<FileScoreColumns>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileInputsConfig {
    pub sequence: Option<PathBuf>,
    pub sequence_id: Option<String>,
    pub variants: Option<Vec<String>>,
    pub alleles: Option<PathBuf>,
    pub proteome: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileAnalysisConfig {
    pub window_size: Option<usize>,
    pub score_code: Option<String>,
    pub prediction_type: Option<String>,
    pub cache_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FilePredictorConfig {
    pub executable: Option<PathBuf>,
    pub extra_args: Option<Vec<String>>,
}

/// Zero-based column indices; unset columns keep the NetMHCIIpan layout.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileScoreColumns {
    pub start: Option<usize>,
    pub allele: Option<usize>,
    pub peptide: Option<usize>,
    pub core_start: Option<usize>,
    pub core: Option<usize>,
    pub ic50: Option<usize>,
}

impl FileConfig {
    /// Parses the file and makes its relative paths relative to the file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration file {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        if let Some(base) = path.parent() {
            config.rebase_paths(base);
        }
        Ok(config)
    }

    fn rebase_paths(&mut self, base: &Path) {
        let rebase = |p: &mut Option<PathBuf>| {
            if let Some(path) = p.as_mut() {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        };
        if let Some(inputs) = self.inputs.as_mut() {
            rebase(&mut inputs.sequence);
            rebase(&mut inputs.alleles);
            rebase(&mut inputs.proteome);
            rebase(&mut inputs.output);
        }
        if let Some(analysis) = self.analysis.as_mut() {
            rebase(&mut analysis.cache_dir);
        }
    }
}
