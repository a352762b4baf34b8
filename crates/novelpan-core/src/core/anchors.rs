//! Masked comparison of MHC-II binding cores.
//!
//! Two cores "masked-match" when they have the same length and agree on every
//! anchor position; residues between anchors are wildcards.

use crate::core::models::record::CORE_LENGTH;

/// 1-based anchor positions of the MHC-II binding core (P1, P4, P6, P9).
pub const MHC_II_ANCHOR_POSITIONS: [usize; 4] = [1, 4, 6, 9];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorMask {
    core_length: usize,
    anchor_indices: Vec<usize>,
}

impl Default for AnchorMask {
    fn default() -> Self {
        Self::mhc_ii()
    }
}

impl AnchorMask {
    /// Builds a mask from 1-based anchor positions. Positions outside the core are dropped.
    pub fn new(core_length: usize, anchor_positions: &[usize]) -> Self {
        let mut anchor_indices: Vec<usize> = anchor_positions
            .iter()
            .filter(|&&p| p >= 1 && p <= core_length)
            .map(|&p| p - 1)
            .collect();
        anchor_indices.sort_unstable();
        anchor_indices.dedup();
        Self {
            core_length,
            anchor_indices,
        }
    }

    pub fn mhc_ii() -> Self {
        Self::new(CORE_LENGTH, &MHC_II_ANCHOR_POSITIONS)
    }

    pub fn core_length(&self) -> usize {
        self.core_length
    }

    pub fn anchor_indices(&self) -> &[usize] {
        &self.anchor_indices
    }

    pub fn matches(&self, reference: &str, candidate: &str) -> bool {
        self.matches_bytes(reference.as_bytes(), candidate.as_bytes())
    }

    fn matches_bytes(&self, reference: &[u8], candidate: &[u8]) -> bool {
        reference.len() == self.core_length
            && candidate.len() == self.core_length
            && self
                .anchor_indices
                .iter()
                .all(|&i| reference[i] == candidate[i])
    }

    /// The anchor residues of `core`, or `None` if `core` has the wrong length.
    pub fn anchor_key(&self, core: &str) -> Option<Vec<u8>> {
        let bytes = core.as_bytes();
        (bytes.len() == self.core_length)
            .then(|| self.anchor_indices.iter().map(|&i| bytes[i]).collect())
    }

    /// True if any window of `sequence` masked-matches `core`.
    pub fn occurs_in(&self, core: &str, sequence: &str) -> bool {
        let core = core.as_bytes();
        core.len() == self.core_length
            && sequence
                .as_bytes()
                .windows(self.core_length)
                .any(|window| self.matches_bytes(core, window))
    }
}
