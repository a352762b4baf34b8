//! Window arithmetic around a variant position.
//!
//! A variant at 1-based `position` is analysed through a "panning" window that
//! contains every `window_size`-mer overlapping it. Windows near the protein
//! start cannot be fully left-padded, so the variant does not always sit at the
//! same offset; [`VariantWindow::substitution_index`] gives that offset and
//! [`VariantWindow::local_position_to_check`] its 1-based counterpart.

use crate::core::models::record::CORE_LENGTH;
use crate::core::models::sequence::ProteinSequence;
use crate::core::models::variant::VariantDescriptor;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_WINDOW_SIZE: usize = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("Variant {variant} lies outside sequence '{sequence_id}' of length {length}")]
    PositionOutOfRange {
        variant: String,
        sequence_id: String,
        length: usize,
    },
    #[error("Window size {0} is smaller than the binding core length")]
    WindowTooSmall(usize),
    #[error("Variant position must be 1-based, got 0")]
    ZeroPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantWindow {
    window_size: usize,
    position: usize,
}

impl VariantWindow {
    pub fn new(window_size: usize, position: usize) -> Result<Self, WindowError> {
        if window_size < CORE_LENGTH {
            return Err(WindowError::WindowTooSmall(window_size));
        }
        if position == 0 {
            return Err(WindowError::ZeroPosition);
        }
        Ok(Self {
            window_size,
            position,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// 0-based offset of the variant residue inside the extracted window.
    pub fn substitution_index(&self) -> usize {
        if self.position <= self.window_size {
            self.position - 1
        } else {
            self.window_size - 1
        }
    }

    /// 1-based position of the variant inside the extracted window.
    pub fn local_position_to_check(&self) -> usize {
        self.position.min(self.window_size)
    }

    /// Core offsets at which a mutated residue would fall on anchor P9, P6, P4 or P1.
    pub fn protected_anchor_offsets(&self) -> [usize; 4] {
        let ws = self.window_size;
        [ws - 9, ws - 6, ws - 4, ws - 1]
    }

    pub fn is_protected_offset(&self, core_offset: usize) -> bool {
        self.protected_anchor_offsets().contains(&core_offset)
    }

    /// Extracts the panning window around the variant from the full protein.
    pub fn extract(
        &self,
        sequence: &ProteinSequence,
        variant: &VariantDescriptor,
    ) -> Result<String, WindowError> {
        if self.position > sequence.len() {
            return Err(WindowError::PositionOutOfRange {
                variant: variant.to_string(),
                sequence_id: sequence.id.clone(),
                length: sequence.len(),
            });
        }

        if let Some(found) = sequence.residue_at(self.position) {
            if found != variant.from_residue {
                warn!(
                    variant = %variant,
                    sequence_id = %sequence.id,
                    found = %found,
                    "Residue at variant position does not match the expected wild-type residue."
                );
            }
        }

        let start = self.position.saturating_sub(self.window_size - 1).max(1);
        let end = (self.position + self.window_size - 1).min(sequence.len());
        Ok(sequence.residues()[start - 1..end].to_string())
    }

    /// The window with the variant residue replaced by `to_residue`.
    pub fn endogenous_window(&self, window: &str, to_residue: char) -> String {
        substitute_residue(window, self.substitution_index(), to_residue)
    }
}

/// Copy of `sequence` with the residue at `index` replaced. Out-of-range indices leave it unchanged.
pub fn substitute_residue(sequence: &str, index: usize, residue: char) -> String {
    sequence
        .chars()
        .enumerate()
        .map(|(i, c)| if i == index { residue } else { c })
        .collect()
}
