use super::cache::CacheError;
use super::config::ConfigError;
use super::predictor::PredictorError;
use crate::core::io::fasta::FastaError;
use crate::core::io::scores::ScoreFileError;
use crate::core::window::WindowError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Windowing failed: {0}")]
    Window(#[from] WindowError),

    #[error("Failed to read score file '{}': {source}", path.display())]
    Scores {
        path: PathBuf,
        source: ScoreFileError,
    },

    #[error("Prediction failed: {0}")]
    Prediction(#[from] PredictorError),

    #[error("Prediction cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Failed to load proteome '{}': {source}", path.display())]
    Proteome { path: PathBuf, source: FastaError },

    #[error("Sequence '{0}' not found")]
    SequenceNotFound(String),
}

impl EngineError {
    /// Failures that only invalidate one (variant, allele) unit of a run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Prediction(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_prediction_failures_are_recoverable() {
        let prediction = EngineError::Prediction(PredictorError::Failed {
            allele: "DRB1_0101".into(),
            input: PathBuf::from("in.fasta"),
            status: "exit status: 1".into(),
            stderr: String::new(),
        });
        assert!(prediction.is_recoverable());

        let missing = EngineError::Scores {
            path: PathBuf::from("scores.txt"),
            source: ScoreFileError::Missing {
                path: PathBuf::from("scores.txt"),
            },
        };
        assert!(!missing.is_recoverable());
        assert!(!EngineError::Window(WindowError::WindowTooSmall(4)).is_recoverable());
    }
}
