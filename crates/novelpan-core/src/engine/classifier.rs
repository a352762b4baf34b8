use super::proteome::ProteomeMatch;
use crate::core::models::record::{BINDING_THRESHOLD_NM, BindingRecord, strongest_binder};
use crate::core::models::variant::VariantDescriptor;
use serde::Serialize;
use std::fmt;

/// How a variant's surviving epitopes relate to the reference proteome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    /// No binder survived elimination.
    Eliminated,
    /// Survivors exist, none has a proteome homolog.
    NovelIsolated,
    /// Survivors have proteome homologs, all of which bind.
    NovelAmbiguous,
    /// At least one survivor's closest proteome homolog is a non-binder.
    NovelDual,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eliminated => "eliminated",
            Self::NovelIsolated => "novel-isolated",
            Self::NovelAmbiguous => "novel-ambiguous",
            Self::NovelDual => "novel-dual",
        }
    }

    /// Two-tone display code: primary colour over secondary colour.
    pub fn colour(&self) -> &'static str {
        match self {
            Self::Eliminated => "black",
            Self::NovelIsolated => "pep1/pep1",
            Self::NovelAmbiguous => "pep1/grey",
            Self::NovelDual => "pep1/pep2",
        }
    }

    pub fn is_novel(&self) -> bool {
        !matches!(self, Self::Eliminated)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one (variant, allele) evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoveltyResult {
    pub allele: String,
    pub variant: VariantDescriptor,
    pub primary_peptide: Option<BindingRecord>,
    pub secondary_peptide: Option<BindingRecord>,
    pub classification: Classification,
    pub matches: Vec<ProteomeMatch>,
}

pub fn classify(
    allele: &str,
    variant: VariantDescriptor,
    matches: Vec<ProteomeMatch>,
) -> NoveltyResult {
    let primary_peptide = strongest_binder(matches.iter().map(|m| &m.candidate)).cloned();
    let match_exists = matches.iter().any(|m| m.best_match.is_some());
    let secondary_peptide = strongest_binder(
        matches
            .iter()
            .filter(|m| {
                m.best_match
                    .as_ref()
                    .is_some_and(|best| is_weak_homolog(best.ic50_score))
            })
            .map(|m| &m.candidate),
    )
    .cloned();

    let classification = match (&primary_peptide, &secondary_peptide) {
        (None, _) => Classification::Eliminated,
        (Some(_), Some(_)) => Classification::NovelDual,
        (Some(_), None) if match_exists => Classification::NovelAmbiguous,
        (Some(_), None) => Classification::NovelIsolated,
    };

    NoveltyResult {
        allele: allele.to_string(),
        variant,
        primary_peptide,
        secondary_peptide,
        classification,
        matches,
    }
}

/// Strictly above the threshold; a homolog at exactly 1000 nM does not qualify.
fn is_weak_homolog(ic50_score: f64) -> bool {
    ic50_score > BINDING_THRESHOLD_NM
}
