use fmm_spine::{read_records, LogRecord, RecordError};
use std::path::{Path, PathBuf};

/// Expected output of a correct run, loaded once and never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDataset {
    name: String,
    path: PathBuf,
    records: Vec<LogRecord>,
}

impl ReferenceDataset {
    /// Load `<dir>/<name>`.
    pub fn load(dir: &Path, name: &str) -> Result<Self, RecordError> {
        let path = dir.join(name);
        let records = read_records(&path)?;
        Ok(Self {
            name: name.to_string(),
            path,
            records,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }
}
