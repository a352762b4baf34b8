use crate::cache::CacheManager;
use crate::cli::AnalyzeArgs;
use crate::config::{AppConfig, build_config};
use crate::error::{CliError, Result};
use crate::report;
use crate::utils::progress::CliProgressHandler;
use novelpan::{
    core::{
        io::{alleles::AlleleFile, fasta::FastaFile, traits::TextFormat},
        models::sequence::ProteinSequence,
    },
    engine::{
        cache::{MatchMemo, PredictionCache},
        context::AnalysisContext,
        error::EngineError,
        progress::ProgressReporter,
        proteome::ReferenceProteome,
    },
    workflows,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: AnalyzeArgs, quiet: bool) -> Result<()> {
    info!("Initializing cache manager...");
    let cache_manager = CacheManager::new()?;

    info!("Merging configuration from file and CLI arguments...");
    let config = build_config(&args, &cache_manager)?;

    let sequence = load_sequence(&config.sequence_path, config.sequence_id.as_deref())?;
    info!(
        "Loaded sequence '{}' ({} residues) from {:?}",
        sequence.id,
        sequence.len(),
        &config.sequence_path
    );

    let alleles =
        AlleleFile::read_from_path(&config.alleles_path).map_err(|e| CliError::FileParsing {
            path: config.alleles_path.clone(),
            source: e.into(),
        })?;
    info!("Loaded {} allele(s).", alleles.len());

    info!("Indexing reference proteome from {:?}", &config.proteome_path);
    let proteome = ReferenceProteome::from_fasta(&config.proteome_path)?;
    info!("Indexed {} protein(s).", proteome.len());

    let cache = PredictionCache::new(&config.core_config.cache_dir);
    let memo = MatchMemo::new();
    let progress_handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let context = AnalysisContext::new(
        &config.core_config,
        &config.predictor,
        &cache,
        &proteome,
        &memo,
        &reporter,
    );

    println!(
        "Analyzing {} variant(s) against {} allele(s)...",
        config.variants.len(),
        alleles.len()
    );
    info!("Invoking the core novelty workflow...");
    let novelty_report = workflows::novelty::run(&context, &sequence, &config.variants, &alleles)?;
    info!(
        "Workflow finished: {} result(s), {} novel, {} failure(s).",
        novelty_report.results.len(),
        novelty_report.novel_count(),
        novelty_report.failures.len()
    );

    write_output(&config, &novelty_report)?;

    if !novelty_report.failures.is_empty() {
        warn!(
            "{} unit(s) failed during prediction.",
            novelty_report.failures.len()
        );
        eprintln!("Warning: {} unit(s) could not be evaluated:", novelty_report.failures.len());
        for failure in &novelty_report.failures {
            eprintln!("  {} / {}: {}", failure.variant, failure.allele, failure.error);
        }
    }

    Ok(())
}

fn load_sequence(path: &Path, id: Option<&str>) -> Result<ProteinSequence> {
    let sequences = FastaFile::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    select_sequence(sequences, id)
}

/// Picks the record named `id`, or the first record when no id is given.
fn select_sequence(sequences: Vec<ProteinSequence>, id: Option<&str>) -> Result<ProteinSequence> {
    let found = match id {
        Some(id) => sequences.into_iter().find(|s| s.id == id),
        None => sequences.into_iter().next(),
    };
    found.ok_or_else(|| {
        EngineError::SequenceNotFound(id.unwrap_or("<first record>").to_string()).into()
    })
}

fn write_output(config: &AppConfig, novelty_report: &workflows::novelty::NoveltyReport) -> Result<()> {
    match &config.output_path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            report::write_report(novelty_report, &mut writer)?;
            writer.flush()?;
            println!(
                "✓ {} result(s) ({} novel) written to: {}",
                novelty_report.results.len(),
                novelty_report.novel_count(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            report::write_report(novelty_report, stdout.lock())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sequences() -> Vec<ProteinSequence> {
        vec![
            ProteinSequence::new("P00451", "MQIELSTCFFLCLLRF"),
            ProteinSequence::new("P12259", "MFPGCPRLWVLVVLGT"),
        ]
    }

    #[test]
    fn select_sequence_defaults_to_first_record() {
        let selected = select_sequence(sequences(), None).unwrap();
        assert_eq!(selected.id, "P00451");
    }

    #[test]
    fn select_sequence_finds_record_by_id() {
        let selected = select_sequence(sequences(), Some("P12259")).unwrap();
        assert_eq!(selected.residues(), "MFPGCPRLWVLVVLGT");
    }

    #[test]
    fn select_sequence_reports_missing_id() {
        let result = select_sequence(sequences(), Some("Q99999"));
        assert!(matches!(
            result,
            Err(CliError::Novelpan(EngineError::SequenceNotFound(id))) if id == "Q99999"
        ));
    }

    #[test]
    fn select_sequence_rejects_empty_input() {
        assert!(select_sequence(Vec::new(), None).is_err());
    }

    #[test]
    fn load_sequence_wraps_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.fasta");
        fs::write(&path, "MQIELSTCFFLCLLRF\n").unwrap();

        let result = load_sequence(&path, None);
        assert!(matches!(result, Err(CliError::FileParsing { path: p, .. }) if p == path));
    }
}
