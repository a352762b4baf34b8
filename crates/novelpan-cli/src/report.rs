use crate::error::Result;
use novelpan::core::models::record::BindingRecord;
use novelpan::engine::classifier::NoveltyResult;
use novelpan::workflows::novelty::NoveltyReport;
use serde::Serialize;
use std::io::Write;

/// One CSV line per (variant, allele) result.
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    variant: String,
    allele: &'a str,
    classification: &'static str,
    colour: &'static str,
    primary_peptide: Option<&'a str>,
    primary_core: Option<&'a str>,
    primary_ic50: Option<f64>,
    secondary_peptide: Option<&'a str>,
    secondary_core: Option<&'a str>,
    secondary_ic50: Option<f64>,
    /// Proteome homolog of the secondary peptide.
    homolog_core: Option<&'a str>,
    homolog_ic50: Option<f64>,
    candidates: usize,
    matched: usize,
}

impl<'a> From<&'a NoveltyResult> for ReportRow<'a> {
    fn from(result: &'a NoveltyResult) -> Self {
        let primary = result.primary_peptide.as_ref();
        let secondary = result.secondary_peptide.as_ref();
        let homolog = secondary.and_then(|peptide| {
            result
                .matches
                .iter()
                .find(|m| &m.candidate == peptide)
                .and_then(|m| m.best_match.as_ref())
        });
        Self {
            variant: result.variant.to_string(),
            allele: &result.allele,
            classification: result.classification.as_str(),
            colour: result.classification.colour(),
            primary_peptide: primary.map(|r| r.peptide.as_str()),
            primary_core: primary.map(|r| r.core_peptide.as_str()),
            primary_ic50: primary.map(ic50),
            secondary_peptide: secondary.map(|r| r.peptide.as_str()),
            secondary_core: secondary.map(|r| r.core_peptide.as_str()),
            secondary_ic50: secondary.map(ic50),
            homolog_core: homolog.map(|r| r.core_peptide.as_str()),
            homolog_ic50: homolog.map(ic50),
            candidates: result.matches.len(),
            matched: result
                .matches
                .iter()
                .filter(|m| m.best_match.is_some())
                .count(),
        }
    }
}

fn ic50(record: &BindingRecord) -> f64 {
    record.ic50_score
}

pub fn write_report<W: Write>(report: &NoveltyReport, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for result in &report.results {
        csv_writer.serialize(ReportRow::from(result))?;
    }
    csv_writer.flush()?;
    Ok(())
}
