use super::error::EngineError;
use super::predictor::{PredictionRequest, Predictor};
use crate::core::io::fasta::{FastaError, FastaFile};
use crate::core::io::traits::TextFormat;
use crate::core::models::record::BindingRecord;
use crate::core::models::sequence::ProteinSequence;
use parking_lot::{Mutex, RwLock};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

const INPUT_DIR: &str = "inputs";
const SCORE_DIR: &str = "scores";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error for '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Failed to write predictor input: {0}")]
    Input(#[from] FastaError),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> CacheError + '_ {
    move |source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Content address of one prediction: SHA-256 over everything that influences the scores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(request: &PredictionRequest<'_>, residues: &str) -> Self {
        let mut hasher = Sha256::new();
        for part in [
            request.prediction_type.as_str(),
            request.score_code,
            &request.window_size.to_string(),
            request.allele,
            residues,
        ] {
            hasher.update(part.as_bytes());
            hasher.update([0u8]);
        }
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// On-disk, content-addressed store of predictor outputs.
///
/// Layout: `<root>/inputs/<key>.fasta` and `<root>/scores/<key>.txt`. A score
/// file is only ever published complete, by a no-clobber rename of a finished
/// temporary file, so its presence is a valid cache hit.
///
/// Within a process, at most one predictor run per key is in flight; clones
/// share the same per-key locks.
#[derive(Debug, Clone)]
pub struct PredictionCache {
    root: PathBuf,
    in_flight: Arc<Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>>,
}

impl PredictionCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            in_flight: Arc::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn input_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(INPUT_DIR).join(format!("{}.fasta", key.as_str()))
    }

    pub fn output_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(SCORE_DIR).join(format!("{}.txt", key.as_str()))
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.output_path(key).is_file()
    }

    /// Returns the score file for `sequence`, invoking `predictor` only if it is not cached yet.
    pub fn ensure<P: Predictor + ?Sized>(
        &self,
        predictor: &P,
        request: &PredictionRequest<'_>,
        sequence: &ProteinSequence,
    ) -> Result<PathBuf, EngineError> {
        let key = CacheKey::new(request, sequence.residues());
        let output = self.output_path(&key);
        if output.is_file() {
            debug!(allele = request.allele, sequence_id = %sequence.id, "Prediction cache hit.");
            return Ok(output);
        }

        let slot = Arc::clone(self.in_flight.lock().entry(key.clone()).or_default());
        let _running = slot.lock();
        if output.is_file() {
            debug!(allele = request.allele, sequence_id = %sequence.id, "Prediction finished by a concurrent unit.");
            return Ok(output);
        }

        let input = self.write_input(&key, sequence)?;
        let score_dir = self.root.join(SCORE_DIR);
        fs::create_dir_all(&score_dir).map_err(io_error(&score_dir))?;

        let pending = tempfile::Builder::new()
            .prefix(".pending-")
            .tempfile_in(&score_dir)
            .map_err(io_error(&score_dir))?
            .into_temp_path();

        info!(
            allele = request.allele,
            sequence_id = %sequence.id,
            "Running predictor."
        );
        predictor.predict(request, &input, &pending)?;

        if let Err(e) = pending.persist_noclobber(&output) {
            if !output.is_file() {
                return Err(CacheError::Io {
                    path: output,
                    source: e.error,
                }
                .into());
            }
            debug!(path = %output.display(), "Score file was published concurrently.");
        }
        Ok(output)
    }

    fn write_input(&self, key: &CacheKey, sequence: &ProteinSequence) -> Result<PathBuf, CacheError> {
        let path = self.input_path(key);
        if path.is_file() {
            return Ok(path);
        }
        let input_dir = self.root.join(INPUT_DIR);
        fs::create_dir_all(&input_dir).map_err(io_error(&input_dir))?;

        let pending = tempfile::Builder::new()
            .prefix(".pending-")
            .tempfile_in(&input_dir)
            .map_err(io_error(&input_dir))?
            .into_temp_path();
        FastaFile::write_to_path(&vec![sequence.clone()], &pending)?;

        if let Err(e) = pending.persist_noclobber(&path) {
            if !path.is_file() {
                return Err(CacheError::Io {
                    path,
                    source: e.error,
                });
            }
        }
        Ok(path)
    }

    /// Removes every cached input and score file.
    pub fn clear(&self) -> Result<(), CacheError> {
        if self.root.exists() {
            info!(root = %self.root.display(), "Clearing prediction cache.");
            fs::remove_dir_all(&self.root).map_err(io_error(&self.root))?;
        }
        Ok(())
    }
}

/// Run-scoped memo of proteome matches, keyed by allele and core peptide.
#[derive(Debug, Default)]
pub struct MatchMemo {
    data: RwLock<HashMap<(String, String), Option<BindingRecord>>>,
}

impl MatchMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` if the core was never searched; `Some(None)` if it was and nothing matched.
    pub fn get(&self, allele: &str, core: &str) -> Option<Option<BindingRecord>> {
        self.data
            .read()
            .get(&(allele.to_string(), core.to_string()))
            .cloned()
    }

    pub fn insert(&self, allele: &str, core: &str, best_match: Option<BindingRecord>) {
        self.data
            .write()
            .insert((allele.to_string(), core.to_string()), best_match);
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}
