//! Append-only log of a single device run.
//!
//! Each run writes one file with one `second,pressure,current` line per
//! simulated second. Lines are separated by newlines and the file never ends
//! with one, so a run that performed no work leaves an empty file.

use crate::record::LogRecord;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Attempts made to find an unused log file name.
pub const LOG_NAME_ATTEMPTS: u32 = 3;

/// Produces candidate file names for run logs.
pub trait LogNamer: Send {
    fn next_name(&mut self) -> String;
}

/// `run_<local timestamp>_<random suffix>.log`
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampNamer;

impl LogNamer for TimestampNamer {
    fn next_name(&mut self) -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect();
        format!(
            "run_{}_{}.log",
            chrono::Local::now().format("%Y%m%d_%H%M%S%3f"),
            suffix
        )
    }
}

pub struct RunLog {
    path: PathBuf,
    writer: BufWriter<File>,
    records: u64,
}

impl RunLog {
    /// Create a fresh log in `dir`. Existing files are never reused; a name
    /// collision moves on to the next candidate, up to [`LOG_NAME_ATTEMPTS`].
    /// Returns `Ok(None)` when every candidate collided.
    pub fn create(dir: &Path, namer: &mut dyn LogNamer) -> io::Result<Option<Self>> {
        std::fs::create_dir_all(dir)?;

        for attempt in 1..=LOG_NAME_ATTEMPTS {
            let path = dir.join(namer.next_name());
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    return Ok(Some(Self {
                        path,
                        writer: BufWriter::new(file),
                        records: 0,
                    }))
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    warn!(attempt, path = %path.display(), "Run log name already taken");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> u64 {
        self.records
    }

    /// Append one record and flush it to disk.
    pub fn append(&mut self, record: &LogRecord) -> io::Result<()> {
        if self.records > 0 {
            self.writer.write_all(b"\n")?;
        }
        write!(self.writer, "{record}")?;
        self.writer.flush()?;
        self.records += 1;
        Ok(())
    }

    /// Flush and close the log, returning its path.
    pub fn close(mut self) -> io::Result<PathBuf> {
        self.writer.flush()?;
        Ok(self.path)
    }
}
