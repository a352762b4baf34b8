use serde::Serialize;
use std::fmt;

/// IC50 (nM) below which a peptide is considered an MHC-II binder.
pub const BINDING_THRESHOLD_NM: f64 = 1000.0;

/// Length of the MHC-II binding core.
pub const CORE_LENGTH: usize = 9;

/// One row of binding-predictor output.
///
/// Offsets are 0-based and relative to the sequence that was submitted to the
/// predictor, so the absolute offset of the core within that sequence is
/// [`core_offset`](Self::core_offset).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindingRecord {
    pub allele: String,
    pub peptide: String,
    pub core_peptide: String,
    pub start_position: usize,
    pub core_start_position: usize,
    pub ic50_score: f64,
}

impl BindingRecord {
    pub fn core_offset(&self) -> usize {
        self.start_position + self.core_start_position
    }

    pub fn is_binder(&self) -> bool {
        is_binding_score(self.ic50_score)
    }
}

impl fmt::Display for BindingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} core={} start={} core_start={} ic50={:.2}nM",
            self.peptide, self.core_peptide, self.start_position, self.core_start_position, self.ic50_score
        )
    }
}

pub fn is_binding_score(ic50_score: f64) -> bool {
    ic50_score < BINDING_THRESHOLD_NM
}

/// Returns the record with the lowest IC50, keeping the first one on ties.
pub fn strongest_binder<'a, I>(records: I) -> Option<&'a BindingRecord>
where
    I: IntoIterator<Item = &'a BindingRecord>,
{
    records.into_iter().fold(None, |best, candidate| match best {
        Some(current) if current.ic50_score <= candidate.ic50_score => Some(current),
        _ => Some(candidate),
    })
}
