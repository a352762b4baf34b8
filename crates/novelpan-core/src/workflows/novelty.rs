use crate::core::models::allele::AlleleSet;
use crate::core::models::sequence::ProteinSequence;
use crate::core::models::variant::VariantDescriptor;
use crate::core::store::ScoreRecordStore;
use crate::core::window::VariantWindow;
use crate::engine::classifier::{NoveltyResult, classify};
use crate::engine::context::AnalysisContext;
use crate::engine::elimination::eliminate;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, UnitOutcome};
use std::path::Path;
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The two predictor inputs derived from one variant.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedVariant {
    pub variant: VariantDescriptor,
    pub window: VariantWindow,
    /// Panning window cut from the input protein.
    pub variant_sequence: ProteinSequence,
    /// The same window carrying the substituted residue.
    pub endogenous_sequence: ProteinSequence,
}

/// A unit that failed for a recoverable reason; the rest of the batch still ran.
#[derive(Debug)]
pub struct UnitFailure {
    pub variant: VariantDescriptor,
    pub allele: String,
    pub error: EngineError,
}

#[derive(Debug, Default)]
pub struct NoveltyReport {
    /// Variant-major, alleles in set order.
    pub results: Vec<NoveltyResult>,
    pub failures: Vec<UnitFailure>,
}

impl NoveltyReport {
    pub fn novel_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.classification.is_novel())
            .count()
    }
}

/// Cuts the variant and endogenous windows for `variant` out of `sequence`.
#[instrument(skip(sequence), fields(sequence_id = %sequence.id, variant = %variant))]
pub fn prepare(
    sequence: &ProteinSequence,
    variant: VariantDescriptor,
    window_size: usize,
) -> Result<PreparedVariant, EngineError> {
    let window = VariantWindow::new(window_size, variant.position)?;
    let residues = window.extract(sequence, &variant)?;
    let endogenous = window.endogenous_window(&residues, variant.to_residue);

    Ok(PreparedVariant {
        variant,
        window,
        variant_sequence: ProteinSequence::new(
            format!("{}|{}", sequence.id, variant.position),
            residues,
        )
        .with_description(format!("{} window", variant.long_form())),
        endogenous_sequence: ProteinSequence::new(
            format!(
                "{}|{}{}{}",
                sequence.id, variant.position, variant.from_residue, variant.to_residue
            ),
            endogenous,
        )
        .with_description(format!("{} endogenous window", variant.long_form())),
    })
}

/// Evaluates one (variant, allele) unit end to end.
#[instrument(skip(context, prepared), fields(variant = %prepared.variant))]
pub fn evaluate(
    context: &AnalysisContext<'_>,
    prepared: &PreparedVariant,
    allele: &str,
) -> Result<NoveltyResult, EngineError> {
    let request = context.config.request(allele);
    let variant_path = context
        .cache
        .ensure(context.predictor, &request, &prepared.variant_sequence)?;
    let endogenous_path =
        context
            .cache
            .ensure(context.predictor, &request, &prepared.endogenous_sequence)?;

    let variant_store = load_store(context, &variant_path)?;
    let endogenous_store = load_store(context, &endogenous_path)?;

    let remaining = eliminate(
        &variant_store,
        &endogenous_store,
        &prepared.variant,
        &prepared.window,
    );
    let matches = context.matcher().match_all(allele, &remaining)?;
    let result = classify(allele, prepared.variant, matches);

    info!(
        remaining = remaining.len(),
        classification = %result.classification,
        "Unit classified."
    );
    Ok(result)
}

fn load_store(context: &AnalysisContext<'_>, path: &Path) -> Result<ScoreRecordStore, EngineError> {
    ScoreRecordStore::from_path(path, &context.config.score_layout).map_err(|source| {
        EngineError::Scores {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Runs every variant against every allele.
///
/// Windowing errors abort before any prediction is made. Predictor failures are
/// collected per unit in [`NoveltyReport::failures`]; any other error aborts the batch.
#[instrument(skip_all, name = "novelty_workflow", fields(sequence_id = %sequence.id))]
pub fn run(
    context: &AnalysisContext<'_>,
    sequence: &ProteinSequence,
    variants: &[VariantDescriptor],
    alleles: &AlleleSet,
) -> Result<NoveltyReport, EngineError> {
    let reporter = context.reporter;

    // === Phase 1: Windows ===
    reporter.report(Progress::PhaseStart {
        name: "Preparing Windows",
    });
    let prepared = variants
        .iter()
        .map(|&variant| prepare(sequence, variant, context.config.window_size))
        .collect::<Result<Vec<_>, _>>()?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Units ===
    reporter.report(Progress::PhaseStart {
        name: "Evaluating Novelty",
    });
    let work_list: Vec<(&PreparedVariant, &str)> = prepared
        .iter()
        .flat_map(|p| alleles.iter().map(move |allele| (p, allele)))
        .collect();
    info!(
        variants = prepared.len(),
        alleles = alleles.len(),
        units = work_list.len(),
        "Starting novelty evaluation."
    );
    reporter.report(Progress::TaskStart {
        total_steps: work_list.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = work_list.iter();

    #[cfg(feature = "parallel")]
    let iterator = work_list.par_iter();

    let outcomes: Vec<_> = iterator
        .map(|&(prepared, allele)| {
            let outcome = evaluate(context, prepared, allele);
            reporter.report(Progress::UnitFinished {
                outcome: match &outcome {
                    Ok(result) => UnitOutcome::Classified(result.classification),
                    Err(_) => UnitOutcome::Failed,
                },
            });
            (prepared.variant, allele, outcome)
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    let mut report = NoveltyReport::default();
    for (variant, allele, outcome) in outcomes {
        match outcome {
            Ok(result) => report.results.push(result),
            Err(error) if error.is_recoverable() => {
                warn!(variant = %variant, allele, error = %error, "Unit failed; continuing.");
                report.failures.push(UnitFailure {
                    variant,
                    allele: allele.to_string(),
                    error,
                });
            }
            Err(error) => return Err(error),
        }
    }

    info!(
        classified = report.results.len(),
        novel = report.novel_count(),
        failed = report.failures.len(),
        "Novelty evaluation finished."
    );
    reporter.report(Progress::PhaseFinish);
    Ok(report)
}
