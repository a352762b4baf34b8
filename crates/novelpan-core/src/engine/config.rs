use crate::core::io::scores::ScoreLayout;
use crate::core::models::record::CORE_LENGTH;
use crate::core::window::DEFAULT_WINDOW_SIZE;
use crate::engine::predictor::PredictionRequest;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {parameter}: {reason}")]
    Invalid {
        parameter: &'static str,
        reason: String,
    },
}

/// The predictor family whose output the pipeline consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PredictionType {
    #[default]
    MhcIIPan,
}

impl PredictionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MhcIIPan => "netMHCIIpan",
        }
    }
}

impl fmt::Display for PredictionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PredictionType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "netmhciipan" | "mhciipan" | "mhc-ii-pan" => Ok(Self::MhcIIPan),
            other => Err(ConfigError::Invalid {
                parameter: "prediction_type",
                reason: format!("unknown prediction type '{}'", other),
            }),
        }
    }
}

/// Parameters shared by every (variant, allele) unit of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Peptide length submitted to the predictor and size of the panning window.
    pub window_size: usize,
    pub prediction_type: PredictionType,
    /// Not sent to the predictor; only distinguishes cache entries.
    pub score_code: String,
    pub cache_dir: PathBuf,
    pub score_layout: ScoreLayout,
}

impl AnalysisConfig {
    /// The predictor request for one allele under this configuration.
    pub fn request<'a>(&'a self, allele: &'a str) -> PredictionRequest<'a> {
        PredictionRequest {
            prediction_type: self.prediction_type,
            score_code: &self.score_code,
            window_size: self.window_size,
            allele,
        }
    }
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    window_size: Option<usize>,
    prediction_type: Option<PredictionType>,
    score_code: Option<String>,
    cache_dir: Option<PathBuf>,
    score_layout: Option<ScoreLayout>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window_size(mut self, size: usize) -> Self {
        self.window_size = Some(size);
        self
    }
    pub fn prediction_type(mut self, prediction_type: PredictionType) -> Self {
        self.prediction_type = Some(prediction_type);
        self
    }
    pub fn score_code(mut self, code: impl Into<String>) -> Self {
        self.score_code = Some(code.into());
        self
    }
    pub fn cache_dir(mut self, dir: PathBuf) -> Self {
        self.cache_dir = Some(dir);
        self
    }
    pub fn score_layout(mut self, layout: ScoreLayout) -> Self {
        self.score_layout = Some(layout);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let window_size = self.window_size.unwrap_or(DEFAULT_WINDOW_SIZE);
        if window_size < CORE_LENGTH {
            return Err(ConfigError::Invalid {
                parameter: "window_size",
                reason: format!(
                    "{} is shorter than the {}-residue binding core",
                    window_size, CORE_LENGTH
                ),
            });
        }

        Ok(AnalysisConfig {
            window_size,
            prediction_type: self.prediction_type.unwrap_or_default(),
            score_code: self.score_code.unwrap_or_else(|| "0".to_string()),
            cache_dir: self
                .cache_dir
                .ok_or(ConfigError::MissingParameter("cache_dir"))?,
            score_layout: self.score_layout.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_applies_defaults() {
        let config = AnalysisConfigBuilder::new()
            .cache_dir(PathBuf::from("/tmp/cache"))
            .build()
            .unwrap();
        assert_eq!(config.window_size, 15);
        assert_eq!(config.prediction_type, PredictionType::MhcIIPan);
        assert_eq!(config.score_code, "0");
        assert_eq!(config.score_layout, ScoreLayout::default());
    }

    #[test]
    fn request_carries_run_parameters() {
        let config = AnalysisConfigBuilder::new()
            .cache_dir(PathBuf::from("/tmp/cache"))
            .window_size(13)
            .score_code("2")
            .build()
            .unwrap();
        let request = config.request("DRB1_1501");
        assert_eq!(request.window_size, 13);
        assert_eq!(request.score_code, "2");
        assert_eq!(request.allele, "DRB1_1501");
    }

    #[test]
    fn build_requires_cache_dir() {
        let result = AnalysisConfigBuilder::new().window_size(15).build();
        assert_eq!(result, Err(ConfigError::MissingParameter("cache_dir")));
    }

    #[test]
    fn build_rejects_window_shorter_than_core() {
        let result = AnalysisConfigBuilder::new()
            .cache_dir(PathBuf::from("/tmp/cache"))
            .window_size(8)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                parameter: "window_size",
                ..
            })
        ));
    }

    #[test]
    fn prediction_type_parses_case_insensitively() {
        assert_eq!(
            "netMHCIIpan".parse::<PredictionType>(),
            Ok(PredictionType::MhcIIPan)
        );
        assert!("netMHCpan".parse::<PredictionType>().is_err());
        assert_eq!(PredictionType::MhcIIPan.to_string(), "netMHCIIpan");
    }
}
