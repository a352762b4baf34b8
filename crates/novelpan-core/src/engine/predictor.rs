use super::config::PredictionType;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("Failed to launch predictor '{program}': {source}")]
    Spawn {
        program: String,
        source: io::Error,
    },
    #[error(
        "Predictor failed for allele {allele} on '{}' ({status}): {stderr}",
        input.display()
    )]
    Failed {
        allele: String,
        input: PathBuf,
        status: String,
        stderr: String,
    },
    #[error("Predictor I/O error for '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// Everything about a prediction except its input sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionRequest<'a> {
    pub prediction_type: PredictionType,
    pub score_code: &'a str,
    pub window_size: usize,
    pub allele: &'a str,
}

/// An external binding predictor.
///
/// Implementations read the FASTA file at `input` and write a score table to
/// `output`. Callers own idempotence and atomic publication of `output`.
pub trait Predictor: Send + Sync {
    fn predict(
        &self,
        request: &PredictionRequest<'_>,
        input: &Path,
        output: &Path,
    ) -> Result<(), PredictorError>;
}

/// Runs a NetMHCIIpan-compatible executable and captures its stdout as the score table.
///
/// The invocation is `<executable> -a <allele> -length <window> -f <input> [extra args]`.
/// The score code only distinguishes cache entries for this prediction type.
#[derive(Debug, Clone)]
pub struct CommandPredictor {
    executable: PathBuf,
    extra_args: Vec<String>,
}

impl CommandPredictor {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            extra_args: Vec::new(),
        }
    }

    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    fn arguments(&self, request: &PredictionRequest<'_>, input: &Path) -> Vec<String> {
        let mut args = vec![
            "-a".to_string(),
            request.allele.to_string(),
            "-length".to_string(),
            request.window_size.to_string(),
            "-f".to_string(),
            input.to_string_lossy().into_owned(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

impl Predictor for CommandPredictor {
    #[instrument(skip_all, fields(allele = request.allele, input = %input.display()))]
    fn predict(
        &self,
        request: &PredictionRequest<'_>,
        input: &Path,
        output: &Path,
    ) -> Result<(), PredictorError> {
        let stdout = File::create(output).map_err(|e| PredictorError::Io {
            path: output.to_path_buf(),
            source: e,
        })?;
        let args = self.arguments(request, input);
        debug!(program = %self.executable.display(), ?args, "Launching predictor.");

        let result = Command::new(&self.executable)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| PredictorError::Spawn {
                program: self.executable.display().to_string(),
                source: e,
            })?;

        if !result.status.success() {
            return Err(PredictorError::Failed {
                allele: request.allele.to_string(),
                input: input.to_path_buf(),
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
