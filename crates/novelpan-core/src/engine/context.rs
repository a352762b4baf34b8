use super::cache::{MatchMemo, PredictionCache};
use super::config::AnalysisConfig;
use super::predictor::Predictor;
use super::progress::ProgressReporter;
use super::proteome::{ProteomeMatcher, ProteomeSource};

/// Everything a run shares across its (variant, allele) units.
#[derive(Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub config: &'a AnalysisConfig,
    pub predictor: &'a dyn Predictor,
    pub cache: &'a PredictionCache,
    pub proteome: &'a dyn ProteomeSource,
    pub memo: &'a MatchMemo,
    pub reporter: &'a ProgressReporter<'a>,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        config: &'a AnalysisConfig,
        predictor: &'a dyn Predictor,
        cache: &'a PredictionCache,
        proteome: &'a dyn ProteomeSource,
        memo: &'a MatchMemo,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            config,
            predictor,
            cache,
            proteome,
            memo,
            reporter,
        }
    }

    pub fn matcher(&self) -> ProteomeMatcher<'a> {
        ProteomeMatcher::new(
            self.config,
            self.predictor,
            self.cache,
            self.proteome,
            self.memo,
        )
    }
}
