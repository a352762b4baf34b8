//! Cross-reactivity of novelty candidates with the reference proteome.

use super::cache::{MatchMemo, PredictionCache};
use super::config::AnalysisConfig;
use super::error::EngineError;
use super::predictor::Predictor;
use crate::core::anchors::AnchorMask;
use crate::core::io::fasta::FastaFile;
use crate::core::io::traits::TextFormat;
use crate::core::models::record::{BindingRecord, strongest_binder};
use crate::core::models::sequence::ProteinSequence;
use crate::core::store::ScoreRecordStore;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Gene whose products are never considered as proteome matches.
pub const EXCLUDED_GENE_SYMBOL: &str = "F8";

/// A searchable reference proteome.
pub trait ProteomeSource: Send + Sync {
    /// Proteins containing at least one window that masked-matches `core`, in a stable order.
    fn find_masked(&self, core: &str, mask: &AnchorMask) -> Vec<&ProteinSequence>;
}

/// In-memory proteome indexed by the anchor residues of every core-length window.
#[derive(Debug, Default)]
pub struct ReferenceProteome {
    sequences: Vec<ProteinSequence>,
    mask: AnchorMask,
    index: HashMap<Vec<u8>, Vec<usize>>,
}

impl ReferenceProteome {
    pub fn new(sequences: Vec<ProteinSequence>) -> Self {
        Self::with_mask(sequences, AnchorMask::mhc_ii())
    }

    pub fn with_mask(sequences: Vec<ProteinSequence>, mask: AnchorMask) -> Self {
        let mut index: HashMap<Vec<u8>, Vec<usize>> = HashMap::new();
        for (protein_idx, sequence) in sequences.iter().enumerate() {
            for window in sequence.residues().as_bytes().windows(mask.core_length()) {
                let key: Vec<u8> = mask.anchor_indices().iter().map(|&i| window[i]).collect();
                let proteins = index.entry(key).or_default();
                if proteins.last() != Some(&protein_idx) {
                    proteins.push(protein_idx);
                }
            }
        }
        debug!(
            proteins = sequences.len(),
            anchor_keys = index.len(),
            "Indexed reference proteome."
        );
        Self {
            sequences,
            mask,
            index,
        }
    }

    pub fn from_fasta(path: &Path) -> Result<Self, EngineError> {
        let sequences =
            FastaFile::read_from_path(path).map_err(|source| EngineError::Proteome {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), proteins = sequences.len(), "Loaded reference proteome.");
        Ok(Self::new(sequences))
    }

    pub fn sequences(&self) -> &[ProteinSequence] {
        &self.sequences
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

impl ProteomeSource for ReferenceProteome {
    fn find_masked(&self, core: &str, mask: &AnchorMask) -> Vec<&ProteinSequence> {
        if *mask != self.mask {
            return self
                .sequences
                .iter()
                .filter(|s| mask.occurs_in(core, s.residues()))
                .collect();
        }
        self.mask
            .anchor_key(core)
            .and_then(|key| self.index.get(&key))
            .map(|indices| indices.iter().map(|&i| &self.sequences[i]).collect())
            .unwrap_or_default()
    }
}

/// A novelty candidate paired with its strongest masked-core homolog in the proteome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProteomeMatch {
    pub candidate: BindingRecord,
    pub best_match: Option<BindingRecord>,
}

/// Finds proteome homologs of candidate cores, predicting binding on matched proteins as needed.
pub struct ProteomeMatcher<'a> {
    pub config: &'a AnalysisConfig,
    pub predictor: &'a dyn Predictor,
    pub cache: &'a PredictionCache,
    pub proteome: &'a dyn ProteomeSource,
    pub memo: &'a MatchMemo,
    pub mask: AnchorMask,
}

impl<'a> ProteomeMatcher<'a> {
    pub fn new(
        config: &'a AnalysisConfig,
        predictor: &'a dyn Predictor,
        cache: &'a PredictionCache,
        proteome: &'a dyn ProteomeSource,
        memo: &'a MatchMemo,
    ) -> Self {
        Self {
            config,
            predictor,
            cache,
            proteome,
            memo,
            mask: AnchorMask::mhc_ii(),
        }
    }

    /// One entry per candidate, in candidate order.
    #[instrument(skip_all, fields(allele = allele, candidates = remaining.len()))]
    pub fn match_all(
        &self,
        allele: &str,
        remaining: &[BindingRecord],
    ) -> Result<Vec<ProteomeMatch>, EngineError> {
        remaining
            .iter()
            .map(|candidate| {
                Ok(ProteomeMatch {
                    candidate: candidate.clone(),
                    best_match: self.best_match(allele, &candidate.core_peptide)?,
                })
            })
            .collect()
    }

    /// The strongest proteome record whose core masked-matches `core`, or `None` if there is none.
    #[instrument(skip(self))]
    pub fn best_match(
        &self,
        allele: &str,
        core: &str,
    ) -> Result<Option<BindingRecord>, EngineError> {
        if let Some(memoized) = self.memo.get(allele, core) {
            debug!("Reusing memoized proteome match.");
            return Ok(memoized);
        }

        let request = self.config.request(allele);
        let mut pool: Vec<BindingRecord> = Vec::new();
        for protein in self.proteome.find_masked(core, &self.mask) {
            if protein.gene_symbol.as_deref() == Some(EXCLUDED_GENE_SYMBOL) {
                debug!(protein = %protein.id, "Skipping excluded gene.");
                continue;
            }
            let score_path = self.cache.ensure(self.predictor, &request, protein)?;
            let store = ScoreRecordStore::from_path(&score_path, &self.config.score_layout)
                .map_err(|source| EngineError::Scores {
                    path: score_path.clone(),
                    source,
                })?;
            let before = pool.len();
            pool.extend(store.find_by_masked_core(core, &self.mask).cloned());
            debug!(
                protein = %protein.id,
                matching_records = pool.len() - before,
                "Collected masked-core records."
            );
        }

        let best = strongest_binder(&pool).cloned();
        match &best {
            Some(record) => debug!(best_core = %record.core_peptide, ic50 = record.ic50_score, "Found proteome match."),
            None => debug!("No proteome match."),
        }
        self.memo.insert(allele, core, best.clone());
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::record::test_support::record;
    use crate::engine::cache::test_support::SpyPredictor;
    use crate::engine::config::AnalysisConfigBuilder;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    struct CountingProteome {
        inner: ReferenceProteome,
        lookups: AtomicUsize,
    }

    impl CountingProteome {
        fn new(sequences: Vec<ProteinSequence>) -> Self {
            Self {
                inner: ReferenceProteome::new(sequences),
                lookups: AtomicUsize::new(0),
            }
        }
    }

    impl ProteomeSource for CountingProteome {
        fn find_masked(&self, core: &str, mask: &AnchorMask) -> Vec<&ProteinSequence> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_masked(core, mask)
        }
    }

    fn proteome() -> Vec<ProteinSequence> {
        vec![
            ProteinSequence::new("ENSP01", "MMMLQQYQEQQSMMM").with_gene_symbol("ALB"),
            ProteinSequence::new("ENSP02", "GGGGGGGGGGGG").with_gene_symbol("GCG"),
            ProteinSequence::new("ENSP03", "LAAYAEAASPPP").with_gene_symbol("F8"),
            ProteinSequence::new("ENSP04", "PPLKRYGEWTS"),
        ]
    }

    #[test]
    fn index_lookup_finds_every_masked_occurrence() {
        let proteome = ReferenceProteome::new(proteome());
        let mask = AnchorMask::mhc_ii();
        let ids: Vec<_> = proteome
            .find_masked("LKRYGEWAS", &mask)
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["ENSP01", "ENSP03", "ENSP04"]);
        assert!(proteome.find_masked("WWWWWWWWW", &mask).is_empty());
        assert!(proteome.find_masked("SHORT", &mask).is_empty());
    }

    #[test]
    fn custom_mask_falls_back_to_scan() {
        let proteome = ReferenceProteome::new(proteome());
        let exact = AnchorMask::new(9, &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let ids: Vec<_> = proteome
            .find_masked("LAAYAEAAS", &exact)
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["ENSP03"]);
    }

    fn fixture(
        records: Vec<BindingRecord>,
    ) -> (tempfile::TempDir, AnalysisConfig, SpyPredictor, CountingProteome) {
        let dir = tempdir().unwrap();
        let config = AnalysisConfigBuilder::new()
            .cache_dir(dir.path().to_path_buf())
            .build()
            .unwrap();
        (
            dir,
            config,
            SpyPredictor::with_records(records),
            CountingProteome::new(proteome()),
        )
    }

    #[test]
    fn best_match_pools_masked_records_and_excludes_f8() {
        let (_dir, config, spy, proteome) = fixture(vec![
            record("LQQYQEQQS", 0, 3, 1500.0),
            record("LAAYAEAAS", 1, 0, 900.0),
            record("GGGGGGGGG", 2, 0, 5.0),
        ]);
        let cache = PredictionCache::new(&config.cache_dir);
        let memo = MatchMemo::new();
        let matcher = ProteomeMatcher::new(&config, &spy, &cache, &proteome, &memo);

        let best = matcher.best_match("DRB1_0101", "LKRYGEWAS").unwrap().unwrap();
        assert_eq!(best.core_peptide, "LAAYAEAAS");
        assert_eq!(best.ic50_score, 900.0);
        // ENSP01 and ENSP04 are predicted; ENSP03 is F8.
        assert_eq!(spy.calls(), 2);
    }

    #[test]
    fn no_homolog_yields_explicit_absence() {
        let (_dir, config, spy, proteome) = fixture(vec![]);
        let cache = PredictionCache::new(&config.cache_dir);
        let memo = MatchMemo::new();
        let matcher = ProteomeMatcher::new(&config, &spy, &cache, &proteome, &memo);

        assert_eq!(matcher.best_match("DRB1_0101", "WWWWWWWWW").unwrap(), None);
        assert_eq!(spy.calls(), 0);
        assert_eq!(memo.get("DRB1_0101", "WWWWWWWWW"), Some(None));
    }

    #[test]
    fn repeated_cores_are_searched_once_per_allele() {
        let (_dir, config, spy, proteome) = fixture(vec![record("LQQYQEQQS", 0, 3, 40.0)]);
        let cache = PredictionCache::new(&config.cache_dir);
        let memo = MatchMemo::new();
        let matcher = ProteomeMatcher::new(&config, &spy, &cache, &proteome, &memo);

        let remaining = vec![
            record("LKRYGEWAS", 0, 2, 50.0),
            record("LKRYGEWAS", 1, 1, 70.0),
        ];
        let matches = matcher.match_all("DRB1_0101", &remaining).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].best_match, matches[1].best_match);
        assert_eq!(matches[1].candidate.ic50_score, 70.0);
        assert_eq!(proteome.lookups.load(Ordering::SeqCst), 1);

        matcher.best_match("DRB1_1501", "LKRYGEWAS").unwrap();
        assert_eq!(proteome.lookups.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn predictor_failure_propagates() {
        let (_dir, config, _, proteome) = fixture(vec![]);
        let spy = SpyPredictor {
            fail: true,
            ..SpyPredictor::default()
        };
        let cache = PredictionCache::new(&config.cache_dir);
        let memo = MatchMemo::new();
        let matcher = ProteomeMatcher::new(&config, &spy, &cache, &proteome, &memo);

        let err = matcher.best_match("DRB1_0101", "LKRYGEWAS").unwrap_err();
        assert!(err.is_recoverable());
        assert!(memo.is_empty());
    }
}
