//! Elimination of variant-window binders that the immune system already tolerates.
//!
//! A binder whose core covers the variant survives as a novelty candidate unless
//! the same core, carrying the endogenous residue, also binds from the
//! endogenous window with the variant on a protected anchor offset.

use crate::core::models::record::{BindingRecord, CORE_LENGTH};
use crate::core::models::variant::VariantDescriptor;
use crate::core::store::ScoreRecordStore;
use crate::core::window::{VariantWindow, substitute_residue};
use tracing::{debug, instrument};

/// Why a record was kept. Only used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    NoEndogenousCore,
    UnprotectedEndogenousBinder,
    AllEndogenousWeak,
    Protected,
}

/// Returns the surviving records of `variant_store`, in stored order.
#[instrument(skip_all, fields(variant = %variant, window_size = window.window_size()))]
pub fn eliminate(
    variant_store: &ScoreRecordStore,
    endogenous_store: &ScoreRecordStore,
    variant: &VariantDescriptor,
    window: &VariantWindow,
) -> Vec<BindingRecord> {
    let local_position = window.local_position_to_check();

    let remaining: Vec<BindingRecord> = variant_store
        .records()
        .iter()
        .filter(|record| covers_variant(record, local_position))
        .filter(|record| {
            let verdict = judge(record, endogenous_store, variant, window);
            debug!(core = %record.core_peptide, ic50 = record.ic50_score, ?verdict, "Judged candidate core.");
            verdict != Verdict::Protected
        })
        .cloned()
        .collect();

    debug!(
        candidates = variant_store.len(),
        remaining = remaining.len(),
        "Elimination finished."
    );
    remaining
}

/// The core starts strictly inside the nine residues before the variant and the record binds.
fn covers_variant(record: &BindingRecord, local_position: usize) -> bool {
    let start = record.core_offset();
    start + CORE_LENGTH + 1 > local_position && start < local_position && record.is_binder()
}

fn judge(
    record: &BindingRecord,
    endogenous_store: &ScoreRecordStore,
    variant: &VariantDescriptor,
    window: &VariantWindow,
) -> Verdict {
    let variant_index_at_core = window.local_position_to_check() - record.core_offset() - 1;
    let endogenous_core =
        substitute_residue(&record.core_peptide, variant_index_at_core, variant.to_residue);

    let mut matches = endogenous_store.find_by_core(&endogenous_core).peekable();
    if matches.peek().is_none() {
        return Verdict::NoEndogenousCore;
    }

    let mut all_weak = true;
    for endogenous in matches.filter(|m| m.is_binder()) {
        all_weak = false;
        if !window.is_protected_offset(endogenous.core_offset()) {
            return Verdict::UnprotectedEndogenousBinder;
        }
    }

    if all_weak {
        Verdict::AllEndogenousWeak
    } else {
        Verdict::Protected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::record::test_support::record;

    fn variant() -> VariantDescriptor {
        "L-7-R".parse().unwrap()
    }

    fn window(position: usize) -> VariantWindow {
        VariantWindow::new(15, position).unwrap()
    }

    // Core offset 2 puts the variant at core index 7 - 2 - 1 = 4 ('G' -> 'R').
    fn candidate() -> BindingRecord {
        record("LKRYGEWAS", 0, 2, 50.0)
    }

    const ENDOGENOUS_CORE: &str = "LKRYREWAS";

    #[test]
    fn gate_uses_open_interval_below_local_position() {
        assert!(!covers_variant(&record("AAAAAAAAA", 7, 0, 10.0), 7));
        assert!(covers_variant(&record("AAAAAAAAA", 6, 0, 10.0), 7));
        assert!(covers_variant(&record("AAAAAAAAA", 0, 0, 10.0), 7));
        assert!(!covers_variant(&record("AAAAAAAAA", 5, 0, 10.0), 15));
        assert!(covers_variant(&record("AAAAAAAAA", 6, 0, 10.0), 15));
        assert!(covers_variant(&record("AAAAAAAAA", 14, 0, 10.0), 15));
        assert!(!covers_variant(&record("AAAAAAAAA", 15, 0, 10.0), 15));
    }

    #[test]
    fn gate_requires_binder() {
        assert!(!covers_variant(&record("AAAAAAAAA", 3, 0, 1000.0), 7));
        assert!(covers_variant(&record("AAAAAAAAA", 3, 0, 999.9), 7));
    }

    #[test]
    fn candidate_without_endogenous_core_survives() {
        let variant_store = ScoreRecordStore::new(vec![candidate()]);
        let endogenous = ScoreRecordStore::new(vec![record("LKRYGEWAS", 0, 2, 5.0)]);
        let remaining = eliminate(&variant_store, &endogenous, &variant(), &window(7));
        assert_eq!(remaining, vec![candidate()]);
    }

    #[test]
    fn endogenous_binder_on_protected_offset_eliminates() {
        let variant_store = ScoreRecordStore::new(vec![candidate()]);
        let endogenous = ScoreRecordStore::new(vec![record(ENDOGENOUS_CORE, 4, 2, 30.0)]);
        let remaining = eliminate(&variant_store, &endogenous, &variant(), &window(7));
        assert!(remaining.is_empty());
    }

    #[test]
    fn endogenous_binder_on_unprotected_offset_keeps_candidate() {
        let variant_store = ScoreRecordStore::new(vec![candidate()]);
        let endogenous = ScoreRecordStore::new(vec![record(ENDOGENOUS_CORE, 3, 2, 30.0)]);
        let remaining = eliminate(&variant_store, &endogenous, &variant(), &window(7));
        assert_eq!(remaining.len(), 1);
    }

    #[test]
    fn weak_endogenous_matches_keep_candidate() {
        let variant_store = ScoreRecordStore::new(vec![candidate()]);
        let endogenous = ScoreRecordStore::new(vec![
            record(ENDOGENOUS_CORE, 4, 2, 1000.0),
            record(ENDOGENOUS_CORE, 9, 0, 4200.0),
        ]);
        let remaining = eliminate(&variant_store, &endogenous, &variant(), &window(7));
        assert_eq!(remaining.len(), 1);
    }

    #[test]
    fn first_unprotected_binder_decides_regardless_of_later_matches() {
        let variant_store = ScoreRecordStore::new(vec![candidate()]);
        let endogenous = ScoreRecordStore::new(vec![
            record(ENDOGENOUS_CORE, 0, 6, 30.0),
            record(ENDOGENOUS_CORE, 1, 2, 30.0),
            record(ENDOGENOUS_CORE, 10, 4, 30.0),
        ]);
        assert_eq!(
            judge(&candidate(), &endogenous, &variant(), &window(7)),
            Verdict::UnprotectedEndogenousBinder
        );
    }

    #[test]
    fn every_binder_protected_eliminates() {
        let endogenous = ScoreRecordStore::new(vec![
            record(ENDOGENOUS_CORE, 0, 6, 30.0),
            record(ENDOGENOUS_CORE, 5, 4, 2000.0),
            record(ENDOGENOUS_CORE, 10, 4, 30.0),
        ]);
        assert_eq!(
            judge(&candidate(), &endogenous, &variant(), &window(7)),
            Verdict::Protected
        );
    }

    #[test]
    fn survivors_keep_stored_order_and_skip_gated_records() {
        let first = record("AKRYGEWAS", 1, 1, 10.0);
        let outside = record("CKRYGEWAS", 7, 0, 10.0);
        let weak = record("DKRYGEWAS", 2, 0, 1500.0);
        let last = record("EKRYGEWAS", 3, 0, 900.0);
        let variant_store =
            ScoreRecordStore::new(vec![first.clone(), outside, weak, last.clone()]);
        let remaining = eliminate(
            &variant_store,
            &ScoreRecordStore::default(),
            &variant(),
            &window(7),
        );
        assert_eq!(remaining, vec![first, last]);
    }

    #[test]
    fn variant_deep_in_protein_uses_clamped_local_position() {
        // Position 20 with window 15: L = 15, core offset 10 puts the variant at index 4.
        let variant: VariantDescriptor = "G-20-R".parse().unwrap();
        let candidate = record("LKRYGEWAS", 8, 2, 50.0);
        let variant_store = ScoreRecordStore::new(vec![candidate]);
        let protected = ScoreRecordStore::new(vec![record(ENDOGENOUS_CORE, 9, 2, 30.0)]);
        assert!(eliminate(&variant_store, &protected, &variant, &window(20)).is_empty());
        let unprotected = ScoreRecordStore::new(vec![record(ENDOGENOUS_CORE, 8, 2, 30.0)]);
        assert_eq!(
            eliminate(&variant_store, &unprotected, &variant, &window(20)).len(),
            1
        );
    }
}
