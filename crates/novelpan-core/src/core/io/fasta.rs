use crate::core::io::traits::TextFormat;
use crate::core::models::sequence::ProteinSequence;
use std::io::{self, BufRead, Write};
use thiserror::Error;

const LINE_WIDTH: usize = 60;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: FastaParseErrorKind },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FastaParseErrorKind {
    #[error("Sequence data found before the first '>' header")]
    MissingHeader,
    #[error("Header has no identifier")]
    EmptyIdentifier,
}

/// The header conventions recognised when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFlavor {
    /// `>sp|P00451|FA8_HUMAN Coagulation factor VIII OS=Homo sapiens ... GN=F8 ...`
    UniProt,
    /// `>ENSP00000360372.4 pep ... gene_symbol:F8 ... description:coagulation factor VIII ...`
    Ensembl,
    /// `>identifier free text`
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaHeader {
    pub flavor: HeaderFlavor,
    pub id: String,
    pub description: String,
    pub gene_symbol: Option<String>,
}

impl FastaHeader {
    pub fn parse(header: &str) -> Option<Self> {
        let header = header.trim().trim_start_matches('>').trim();
        let (first, rest) = match header.split_once(char::is_whitespace) {
            Some((first, rest)) => (first, rest.trim()),
            None => (header, ""),
        };
        if first.is_empty() {
            return None;
        }

        if first.starts_with("sp|") || first.starts_with("tr|") {
            let accession = first.split('|').nth(1).filter(|a| !a.is_empty())?;
            let description = rest.split(" OS=").next().unwrap_or("").trim().to_string();
            let gene_symbol = rest
                .split_whitespace()
                .find_map(|token| token.strip_prefix("GN="))
                .map(str::to_string);
            return Some(Self {
                flavor: HeaderFlavor::UniProt,
                id: accession.to_string(),
                description,
                gene_symbol,
            });
        }

        let gene_symbol = rest
            .split_whitespace()
            .find_map(|token| token.strip_prefix("gene_symbol:"))
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let description = rest
            .split_once("description:")
            .map(|(_, d)| d.trim().to_string());

        let flavor = if gene_symbol.is_some() || description.is_some() {
            HeaderFlavor::Ensembl
        } else {
            HeaderFlavor::Plain
        };

        Some(Self {
            flavor,
            id: first.to_string(),
            description: description.unwrap_or_else(|| rest.to_string()),
            gene_symbol,
        })
    }
}

pub struct FastaFile;

impl FastaFile {
    fn finish(header: FastaHeader, residues: String) -> ProteinSequence {
        let mut sequence =
            ProteinSequence::new(header.id, residues).with_description(header.description);
        if let Some(symbol) = header.gene_symbol {
            sequence = sequence.with_gene_symbol(symbol);
        }
        sequence
    }
}

impl TextFormat for FastaFile {
    type Content = Vec<ProteinSequence>;
    type Error = FastaError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Content, Self::Error> {
        let mut sequences = Vec::new();
        let mut current: Option<(FastaHeader, String)> = None;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with(';') {
                continue;
            }

            if trimmed.starts_with('>') {
                if let Some((header, residues)) = current.take() {
                    sequences.push(Self::finish(header, residues));
                }
                let header = FastaHeader::parse(trimmed).ok_or(FastaError::Parse {
                    line: line_num,
                    kind: FastaParseErrorKind::EmptyIdentifier,
                })?;
                current = Some((header, String::new()));
                continue;
            }

            let Some((_, residues)) = current.as_mut() else {
                return Err(FastaError::Parse {
                    line: line_num,
                    kind: FastaParseErrorKind::MissingHeader,
                });
            };
            residues.extend(
                trimmed
                    .chars()
                    .filter(|c| !c.is_whitespace() && *c != '*')
                    .map(|c| c.to_ascii_uppercase()),
            );
        }

        if let Some((header, residues)) = current.take() {
            sequences.push(Self::finish(header, residues));
        }
        Ok(sequences)
    }

    fn write_to(content: &Self::Content, writer: &mut impl Write) -> Result<(), Self::Error> {
        for sequence in content {
            write!(writer, ">{}", sequence.id)?;
            if let Some(symbol) = &sequence.gene_symbol {
                write!(writer, " gene_symbol:{}", symbol)?;
            }
            if !sequence.description.is_empty() {
                write!(writer, " description:{}", sequence.description)?;
            }
            writeln!(writer)?;

            for chunk in sequence.residues().as_bytes().chunks(LINE_WIDTH) {
                writer.write_all(chunk)?;
                writeln!(writer)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_uniprot_header() {
        let header = FastaHeader::parse(
            ">sp|P00451|FA8_HUMAN Coagulation factor VIII OS=Homo sapiens OX=9606 GN=F8 PE=1 SV=2",
        )
        .unwrap();
        assert_eq!(header.flavor, HeaderFlavor::UniProt);
        assert_eq!(header.id, "P00451");
        assert_eq!(header.description, "Coagulation factor VIII");
        assert_eq!(header.gene_symbol.as_deref(), Some("F8"));
    }

    #[test]
    fn parses_ensembl_peptide_header() {
        let header = FastaHeader::parse(
            ">ENSP00000360372.4 pep chromosome:GRCh38:X:154835788:155026940:-1 gene:ENSG00000185010.15 \
             transcript:ENST00000360256.9 gene_biotype:protein_coding transcript_biotype:protein_coding \
             gene_symbol:F8 description:coagulation factor VIII [Source:HGNC Symbol;Acc:HGNC:3546]",
        )
        .unwrap();
        assert_eq!(header.flavor, HeaderFlavor::Ensembl);
        assert_eq!(header.id, "ENSP00000360372.4");
        assert_eq!(header.gene_symbol.as_deref(), Some("F8"));
        assert_eq!(
            header.description,
            "coagulation factor VIII [Source:HGNC Symbol;Acc:HGNC:3546]"
        );
    }

    #[test]
    fn parses_plain_header() {
        let header = FastaHeader::parse(">seq1 some free text").unwrap();
        assert_eq!(header.flavor, HeaderFlavor::Plain);
        assert_eq!(header.id, "seq1");
        assert_eq!(header.description, "some free text");
        assert!(header.gene_symbol.is_none());
    }

    #[test]
    fn empty_header_is_rejected() {
        assert!(FastaHeader::parse(">").is_none());
        assert!(FastaHeader::parse(">sp||X").is_none());
    }

    #[test]
    fn reads_multi_record_multi_line_file() {
        let data = ">sp|P1|A_HUMAN First GN=AAA\nMKL\nvw\n\n>ENSP2 pep gene_symbol:F8 description:factor\nQRS*\n";
        let seqs = FastaFile::read_from(&mut Cursor::new(data)).unwrap();
        assert_eq!(seqs.len(), 2);
        assert_eq!(seqs[0].id, "P1");
        assert_eq!(seqs[0].residues(), "MKLVW");
        assert_eq!(seqs[1].id, "ENSP2");
        assert_eq!(seqs[1].residues(), "QRS");
        assert!(seqs[1].has_gene_symbol("F8"));
    }

    #[test]
    fn sequence_before_header_is_a_parse_error() {
        let err = FastaFile::read_from(&mut Cursor::new("MKLV\n>P1\nMK\n")).unwrap_err();
        assert!(matches!(
            err,
            FastaError::Parse {
                line: 1,
                kind: FastaParseErrorKind::MissingHeader
            }
        ));
    }

    #[test]
    fn written_file_reads_back_with_metadata() {
        let original = vec![
            ProteinSequence::new("ENSP9", "M".repeat(130))
                .with_gene_symbol("F9")
                .with_description("coagulation factor IX"),
        ];
        let mut buffer = Vec::new();
        FastaFile::write_to(&original, &mut buffer).unwrap();

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert_eq!(text.lines().count(), 4);

        let read_back = FastaFile::read_from(&mut Cursor::new(buffer)).unwrap();
        assert_eq!(read_back, original);
    }
}
