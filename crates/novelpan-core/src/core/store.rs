use crate::core::anchors::AnchorMask;
use crate::core::io::scores::{ScoreFileError, ScoreLayout, read_records};
use crate::core::models::record::{BindingRecord, strongest_binder};
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;
use tracing::debug;

/// The binding predictions of one predictor output file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreRecordStore {
    records: Vec<BindingRecord>,
}

impl ScoreRecordStore {
    pub fn new(records: Vec<BindingRecord>) -> Self {
        Self { records }
    }

    /// Loads a score file. A missing file is a [`ScoreFileError::Missing`] precondition failure.
    pub fn from_path(path: &Path, layout: &ScoreLayout) -> Result<Self, ScoreFileError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ScoreFileError::Missing {
                path: path.to_path_buf(),
            },
            _ => ScoreFileError::Io(e),
        })?;
        let records = read_records(&mut BufReader::new(file), layout)?;
        debug!(path = %path.display(), records = records.len(), "Loaded score file.");
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[BindingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose core equals `core` exactly, in stored order.
    pub fn find_by_core<'a>(&'a self, core: &'a str) -> impl Iterator<Item = &'a BindingRecord> {
        self.records.iter().filter(move |r| r.core_peptide == core)
    }

    /// Records whose core masked-matches `core`, in stored order.
    pub fn find_by_masked_core<'a>(
        &'a self,
        core: &'a str,
        mask: &'a AnchorMask,
    ) -> impl Iterator<Item = &'a BindingRecord> {
        self.records
            .iter()
            .filter(move |r| mask.matches(core, &r.core_peptide))
    }

    pub fn strongest_binder(&self) -> Option<&BindingRecord> {
        strongest_binder(&self.records)
    }
}

impl From<Vec<BindingRecord>> for ScoreRecordStore {
    fn from(records: Vec<BindingRecord>) -> Self {
        Self::new(records)
    }
}
