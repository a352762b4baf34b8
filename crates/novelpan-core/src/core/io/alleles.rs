use crate::core::io::traits::TextFormat;
use crate::core::models::allele::AlleleSet;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlleleFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Allele file contains no alleles")]
    Empty,
}

/// One allele per line. Blank lines and `#` comments are skipped, and only the
/// first whitespace-separated token is used, so group or frequency columns may
/// follow the allele name.
pub struct AlleleFile;

impl TextFormat for AlleleFile {
    type Content = AlleleSet;
    type Error = AlleleFileError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Content, Self::Error> {
        let mut alleles = AlleleSet::new();
        for line in reader.lines() {
            let line = line?;
            let content = line.split('#').next().unwrap_or("");
            if let Some(allele) = content.split_whitespace().next() {
                alleles.insert(allele);
            }
        }
        if alleles.is_empty() {
            return Err(AlleleFileError::Empty);
        }
        Ok(alleles)
    }

    fn write_to(content: &Self::Content, writer: &mut impl Write) -> Result<(), Self::Error> {
        for allele in content.iter() {
            writeln!(writer, "{}", allele)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn reads_first_column_and_skips_comments() {
        let data = "# EUR group\nDRB1_0101 0.09\n\nDRB1_1501\tEUR\nDRB1_0101 # duplicate\n";
        let alleles = AlleleFile::read_from(&mut Cursor::new(data)).unwrap();
        let list: Vec<_> = alleles.iter().collect();
        assert_eq!(list, vec!["DRB1_0101", "DRB1_1501"]);
    }

    #[test]
    fn file_with_only_comments_is_empty_error() {
        let err = AlleleFile::read_from(&mut Cursor::new("# nothing\n\n")).unwrap_err();
        assert!(matches!(err, AlleleFileError::Empty));
    }

    #[test]
    fn round_trips_through_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alleles.txt");
        let alleles: AlleleSet = ["DRB1_0401", "DRB1_0301"].into_iter().collect();
        AlleleFile::write_to_path(&alleles, &path).unwrap();
        assert_eq!(AlleleFile::read_from_path(&path).unwrap(), alleles);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = AlleleFile::read_from_path(dir.path().join("missing.txt"));
        assert!(matches!(result, Err(AlleleFileError::Io(_))));
    }
}
