//! Comparison of a produced run log against its reference dataset.
//!
//! Records are compared by position, not by their `second` field. Sequences
//! of different length never validate.

use fmm_spine::{BadPartReason, LogRecord};
use serde::{Deserialize, Serialize};

/// When a pair of records counts as mismatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Mismatched only when second, pressure and current all differ.
    /// Matches the behaviour reference datasets were accepted under.
    #[default]
    AllFieldsDiffer,
    /// Mismatched when any field differs.
    AnyFieldDiffers,
}

impl MatchPolicy {
    pub fn mismatched(&self, expected: &LogRecord, actual: &LogRecord) -> bool {
        let second = expected.second != actual.second;
        let pressure = expected.pressure != actual.pressure;
        let current = expected.current != actual.current;
        match self {
            Self::AllFieldsDiffer => second && pressure && current,
            Self::AnyFieldDiffers => second || pressure || current,
        }
    }
}

/// `Ok(())` for a good part, otherwise the first reason it is bad.
pub fn validate(
    reference: &[LogRecord],
    produced: &[LogRecord],
    policy: MatchPolicy,
) -> Result<(), BadPartReason> {
    if reference.len() != produced.len() {
        return Err(BadPartReason::LengthMismatch {
            expected: reference.len(),
            actual: produced.len(),
        });
    }

    match reference
        .iter()
        .zip(produced)
        .position(|(expected, actual)| policy.mismatched(expected, actual))
    {
        Some(index) => Err(BadPartReason::RecordMismatch {
            index,
            expected: reference[index],
            actual: produced[index],
        }),
        None => Ok(()),
    }
}
