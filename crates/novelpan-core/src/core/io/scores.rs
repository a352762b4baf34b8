use crate::core::io::traits::TextFormat;
use crate::core::models::record::{BindingRecord, CORE_LENGTH};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Column indices of the fields read from a whitespace-separated score table.
///
/// The defaults follow the NetMHCIIpan table:
/// `Seq Allele Peptide Identity Pos Core Core_Rel 1-log50k(aff) Affinity(nM) ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreLayout {
    pub start: usize,
    pub allele: usize,
    pub peptide: usize,
    pub core_start: usize,
    pub core: usize,
    pub ic50: usize,
}

impl Default for ScoreLayout {
    fn default() -> Self {
        Self {
            start: 0,
            allele: 1,
            peptide: 2,
            core_start: 4,
            core: 5,
            ic50: 8,
        }
    }
}

impl ScoreLayout {
    fn min_columns(&self) -> usize {
        [
            self.start,
            self.allele,
            self.peptide,
            self.core_start,
            self.core,
            self.ic50,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}

#[derive(Debug, Error)]
pub enum ScoreFileError {
    #[error("Score file '{}' does not exist; run the prediction step first", path.display())]
    Missing { path: PathBuf },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: ScoreParseErrorKind,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreParseErrorKind {
    #[error("Expected at least {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },
    #[error("Invalid integer in column {column} (value: '{value}')")]
    InvalidInt { column: usize, value: String },
    #[error("Invalid IC50 in column {column} (value: '{value}')")]
    InvalidScore { column: usize, value: String },
    #[error("Core '{0}' does not have the binding-core length")]
    InvalidCoreLength(String),
    #[error("Core '{core}' at offset {offset} is not contained in peptide '{peptide}'")]
    CoreOutsidePeptide {
        core: String,
        offset: usize,
        peptide: String,
    },
}

/// Reads a score table with an explicit column layout.
pub fn read_records(
    reader: &mut impl BufRead,
    layout: &ScoreLayout,
) -> Result<Vec<BindingRecord>, ScoreFileError> {
    let mut records = Vec::new();
    let min_columns = layout.min_columns();

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;

        let columns: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = columns.first() else {
            continue;
        };
        if first.parse::<usize>().is_err() {
            continue;
        }
        if columns.len() < min_columns {
            return Err(ScoreFileError::Parse {
                line: line_num,
                kind: ScoreParseErrorKind::ColumnCount {
                    expected: min_columns,
                    found: columns.len(),
                },
            });
        }

        let parse_int = |column: usize| -> Result<usize, ScoreFileError> {
            columns[column].parse().map_err(|_| ScoreFileError::Parse {
                line: line_num,
                kind: ScoreParseErrorKind::InvalidInt {
                    column,
                    value: columns[column].to_string(),
                },
            })
        };

        let start_position = parse_int(layout.start)?;
        let core_start_position = parse_int(layout.core_start)?;
        let ic50_score: f64 = columns[layout.ic50]
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| ScoreFileError::Parse {
                line: line_num,
                kind: ScoreParseErrorKind::InvalidScore {
                    column: layout.ic50,
                    value: columns[layout.ic50].to_string(),
                },
            })?;

        let peptide = columns[layout.peptide].to_string();
        let core_peptide = columns[layout.core].to_string();
        if core_peptide.len() != CORE_LENGTH {
            return Err(ScoreFileError::Parse {
                line: line_num,
                kind: ScoreParseErrorKind::InvalidCoreLength(core_peptide),
            });
        }
        if core_start_position + CORE_LENGTH > peptide.len() {
            return Err(ScoreFileError::Parse {
                line: line_num,
                kind: ScoreParseErrorKind::CoreOutsidePeptide {
                    core: core_peptide,
                    offset: core_start_position,
                    peptide,
                },
            });
        }

        records.push(BindingRecord {
            allele: columns[layout.allele].to_string(),
            peptide,
            core_peptide,
            start_position,
            core_start_position,
            ic50_score,
        });
    }

    Ok(records)
}

/// A NetMHCIIpan-style score table.
pub struct ScoreFile;

impl TextFormat for ScoreFile {
    type Content = Vec<BindingRecord>;
    type Error = ScoreFileError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Content, Self::Error> {
        read_records(reader, &ScoreLayout::default())
    }

    fn write_to(content: &Self::Content, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(
            writer,
            "{:>6} {:>12} {:>20} {:>10} {:>4} {:>10} {:>8} {:>13} {:>12}",
            "Seq",
            "Allele",
            "Peptide",
            "Identity",
            "Pos",
            "Core",
            "Core_Rel",
            "1-log50k(aff)",
            "Affinity(nM)"
        )?;
        writeln!(writer, "{}", "-".repeat(103))?;
        for record in content {
            let log_affinity = 1.0 - (record.ic50_score.max(1.0)).ln() / 50_000f64.ln();
            writeln!(
                writer,
                "{:>6} {:>12} {:>20} {:>10} {:>4} {:>10} {:>8.3} {:>13.3} {:>12.2}",
                record.start_position,
                record.allele,
                record.peptide,
                "Sequence",
                record.core_start_position,
                record.core_peptide,
                1.0,
                log_affinity,
                record.ic50_score
            )?;
        }
        writeln!(writer, "{}", "-".repeat(103))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
# NetMHCIIpan version 3.1
# Threshold for Strong binding peptides (IC50)\t50.000 nM
----------------------------------------------------------------------------------------------
   Seq          Allele              Peptide    Identity  Pos         Core  Core_Rel 1-log50k(aff) Affinity(nM)    %Rank Exp_Bind  BindingLevel
----------------------------------------------------------------------------------------------
     0       DRB1_0101      QLRAHCLYTFLSRGT    Sequence    3    AHCLYTFLS    0.680        0.713        22.43      2.00   9.999 <=SB
     1       DRB1_0101      LRAHCLYTFLSRGTP    Sequence    2    AHCLYTFLS    0.560        0.413      1052.89     45.00   9.999
----------------------------------------------------------------------------------------------
Number of strong binders: 1 Number of weak binders: 0
";

    #[test]
    fn reads_data_rows_and_skips_headers_and_footers() {
        let records = ScoreFile::read_from(&mut Cursor::new(SAMPLE)).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.allele, "DRB1_0101");
        assert_eq!(first.peptide, "QLRAHCLYTFLSRGT");
        assert_eq!(first.core_peptide, "AHCLYTFLS");
        assert_eq!(first.start_position, 0);
        assert_eq!(first.core_start_position, 3);
        assert!((first.ic50_score - 22.43).abs() < 1e-9);
        assert_eq!(first.core_offset(), 3);

        assert_eq!(records[1].start_position, 1);
        assert_eq!(records[1].core_offset(), 3);
        assert!(!records[1].is_binder());
    }

    #[test]
    fn short_data_row_is_a_column_count_error() {
        let err = ScoreFile::read_from(&mut Cursor::new("0 DRB1_0101 PEPTIDE\n")).unwrap_err();
        assert!(matches!(
            err,
            ScoreFileError::Parse {
                line: 1,
                kind: ScoreParseErrorKind::ColumnCount { expected: 9, found: 3 }
            }
        ));
    }

    #[test]
    fn negative_or_non_numeric_ic50_is_rejected() {
        let line = "0 DRB1_0101 QLRAHCLYTFLSRGT Sequence 3 AHCLYTFLS 0.6 0.7 -5.0\n";
        let err = ScoreFile::read_from(&mut Cursor::new(line)).unwrap_err();
        assert!(matches!(
            err,
            ScoreFileError::Parse {
                kind: ScoreParseErrorKind::InvalidScore { column: 8, .. },
                ..
            }
        ));

        let line = "0 DRB1_0101 QLRAHCLYTFLSRGT Sequence 3 AHCLYTFLS 0.6 0.7 strong\n";
        assert!(ScoreFile::read_from(&mut Cursor::new(line)).is_err());
    }

    #[test]
    fn core_with_wrong_length_is_rejected() {
        let line = "0 DRB1_0101 QLRAHCLYTFLSRGT Sequence 3 AHCLYTF 0.6 0.7 50.0\n";
        let err = ScoreFile::read_from(&mut Cursor::new(line)).unwrap_err();
        assert!(matches!(
            err,
            ScoreFileError::Parse {
                kind: ScoreParseErrorKind::InvalidCoreLength(_),
                ..
            }
        ));
    }

    #[test]
    fn core_offset_past_peptide_end_is_rejected() {
        let line = "0 DRB1_0101 QLRAHCLYTFLSRGT Sequence 7 AHCLYTFLS 0.6 0.7 50.0\n";
        let err = ScoreFile::read_from(&mut Cursor::new(line)).unwrap_err();
        assert!(matches!(
            err,
            ScoreFileError::Parse {
                kind: ScoreParseErrorKind::CoreOutsidePeptide { offset: 7, .. },
                ..
            }
        ));
    }

    #[test]
    fn custom_layout_reads_reordered_columns() {
        let layout = ScoreLayout {
            start: 0,
            allele: 5,
            peptide: 1,
            core_start: 2,
            core: 3,
            ic50: 4,
        };
        let line = "4 QLRAHCLYTFLSRGT 3 AHCLYTFLS 812.5 DRB1_1501 extra columns\n";
        let records = read_records(&mut Cursor::new(line), &layout).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].allele, "DRB1_1501");
        assert_eq!(records[0].core_offset(), 7);
        assert!((records[0].ic50_score - 812.5).abs() < 1e-9);
    }

    #[test]
    fn written_table_is_readable() {
        let records = ScoreFile::read_from(&mut Cursor::new(SAMPLE)).unwrap();
        let mut buffer = Vec::new();
        ScoreFile::write_to(&records, &mut buffer).unwrap();
        let reread = ScoreFile::read_from(&mut Cursor::new(buffer)).unwrap();
        assert_eq!(reread.len(), records.len());
        assert_eq!(reread[0].core_peptide, records[0].core_peptide);
        assert!((reread[1].ic50_score - records[1].ic50_score).abs() < 0.01);
    }
}
