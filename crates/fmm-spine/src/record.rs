use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One simulated second of a run: `second,pressure,current`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub second: u32,
    pub pressure: i32,
    pub current: i32,
}

impl LogRecord {
    pub fn new(second: u32, pressure: i32, current: i32) -> Self {
        Self {
            second,
            pressure,
            current,
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.second, self.pressure, self.current)
    }
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed record in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

/// Read every record of a run log or reference file, in file order.
pub fn read_records(path: &Path) -> Result<Vec<LogRecord>, RecordError> {
    let file = std::fs::File::open(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(file).map_err(|source| RecordError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse header-less `second,pressure,current` lines.
pub fn parse_records<R: Read>(input: R) -> Result<Vec<LogRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(input);
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lines_without_trailing_newline() {
        let records = parse_records("0,10,10\n1,20,20".as_bytes()).unwrap();
        assert_eq!(
            records,
            vec![LogRecord::new(0, 10, 10), LogRecord::new(1, 20, 20)]
        );
    }

    #[test]
    fn empty_input_has_no_records() {
        assert!(parse_records("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn tolerates_padding() {
        let records = parse_records(" 3 , 30 , 120 ".as_bytes()).unwrap();
        assert_eq!(records, vec![LogRecord::new(3, 30, 120)]);
    }

    #[test]
    fn rejects_non_numeric_fields() {
        assert!(parse_records("0,ten,10".as_bytes()).is_err());
    }

    #[test]
    fn displays_as_log_line() {
        assert_eq!(LogRecord::new(4, 120, 8).to_string(), "4,120,8");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_records(Path::new("/nonexistent/fmm/run.log")).unwrap_err();
        assert!(matches!(err, RecordError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/fmm/run.log"));
    }
}
