use crate::control::{ControlSnapshot, ControlValues, RunTooLong};
use crate::hal::{DeviceError, StationIO};
use crate::recipe::RecipeKind;
use crate::record::LogRecord;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("hardware failed to start: {0}")]
    StartFailed(#[source] DeviceError),

    #[error("part size {part_size} below minimum {minimum} for {kind}")]
    PartSizeBelowMinimum {
        kind: RecipeKind,
        part_size: i32,
        minimum: i32,
    },

    #[error("run aborted at second {second} (log {}): {source}", .log.display())]
    RunAborted {
        second: u32,
        log: PathBuf,
        #[source]
        source: DeviceError,
    },

    #[error("hardware failed to stop: {0}")]
    StopFailed(#[source] DeviceError),

    #[error("run of {seconds}s exceeds the {max}s limit")]
    RunTooLong { seconds: u32, max: u32 },
}

impl From<RunTooLong> for ControlError {
    fn from(e: RunTooLong) -> Self {
        Self::RunTooLong {
            seconds: e.seconds,
            max: e.max,
        }
    }
}

/// Why a part was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum BadPartReason {
    RunAborted {
        second: u32,
        cause: String,
    },
    LengthMismatch {
        expected: usize,
        actual: usize,
    },
    RecordMismatch {
        index: usize,
        expected: LogRecord,
        actual: LogRecord,
    },
}

impl fmt::Display for BadPartReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RunAborted { second, cause } => {
                write!(f, "run aborted at second {second}: {cause}")
            }
            Self::LengthMismatch { expected, actual } => {
                write!(f, "expected {expected} records, produced {actual}")
            }
            Self::RecordMismatch {
                index,
                expected,
                actual,
            } => write!(f, "record {index}: expected {expected}, produced {actual}"),
        }
    }
}

/// Result of producing one part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PartOutcome {
    Good { log: PathBuf },
    Bad { log: PathBuf, reason: BadPartReason },
}

impl PartOutcome {
    pub fn is_good(&self) -> bool {
        matches!(self, Self::Good { .. })
    }

    pub fn log(&self) -> &Path {
        match self {
            Self::Good { log } | Self::Bad { log, .. } => log,
        }
    }
}

#[derive(Clone, Default, Debug, Serialize)]
pub struct ExecutionStats {
    pub runs_started: u64,
    pub runs_completed: u64,
    pub runs_aborted: u64,
    pub seconds_executed: u64,
}

/// Drives one station, either with manually set values or through a recipe
/// schedule. Exactly one run is active at a time.
pub struct Controller<IO: StationIO> {
    io: IO,
    stats: ExecutionStats,
}

impl<IO: StationIO> Controller<IO> {
    pub fn new(io: IO) -> Self {
        Self {
            io,
            stats: ExecutionStats::default(),
        }
    }

    pub fn control_values(&self) -> ControlSnapshot {
        ControlSnapshot {
            pressure: self.io.pressure(),
            current: self.io.current(),
        }
    }

    pub fn set_control_values(&mut self, pressure: i64, current: i64) {
        self.io.set_pressure(pressure);
        self.io.set_current(current);
    }

    /// Apply `values`, then run for their duration.
    pub fn run_manual(&mut self, values: &ControlValues) -> Result<PartOutcome, ControlError> {
        self.set_control_values(values.pressure().into(), values.current().into());
        self.run_for_seconds(values.seconds())
    }

    /// Hold the current control values for `seconds` units of work. Nothing
    /// is validated against reference data; a failing second yields a bad
    /// part.
    pub fn run_for_seconds(&mut self, seconds: u32) -> Result<PartOutcome, ControlError> {
        self.start()?;
        let pressure = i64::from(self.io.pressure());
        let current = i64::from(self.io.current());
        info!(seconds, pressure, current, "Manual run started");

        for second in 0..seconds {
            if let Err(source) = self.io.perform_unit_of_work(pressure, current, second) {
                let log = self.abort(second, &source)?;
                return Ok(PartOutcome::Bad {
                    log,
                    reason: BadPartReason::RunAborted {
                        second,
                        cause: source.to_string(),
                    },
                });
            }
            self.stats.seconds_executed += 1;
        }

        let log = self.finish()?;
        info!(log = %log.display(), "Manual run complete");
        Ok(PartOutcome::Good { log })
    }

    pub fn run_constant_pressure(
        &mut self,
        duration_s: u32,
        part_size: i32,
    ) -> Result<PathBuf, ControlError> {
        self.run_recipe(RecipeKind::ConstantPressure, duration_s, part_size)
    }

    pub fn run_constant_current(
        &mut self,
        duration_s: u32,
        part_size: i32,
    ) -> Result<PathBuf, ControlError> {
        self.run_recipe(RecipeKind::ConstantCurrent, duration_s, part_size)
    }

    pub fn run_ramp(&mut self, duration_s: u32, part_size: i32) -> Result<PathBuf, ControlError> {
        self.run_recipe(RecipeKind::Ramp, duration_s, part_size)
    }

    /// Execute `kind` for seconds `0..=duration_s` and return the run log.
    pub fn run_recipe(
        &mut self,
        kind: RecipeKind,
        duration_s: u32,
        part_size: i32,
    ) -> Result<PathBuf, ControlError> {
        if let Some(minimum) = kind.min_part_size() {
            if part_size < minimum {
                return Err(ControlError::PartSizeBelowMinimum {
                    kind,
                    part_size,
                    minimum,
                });
            }
        }

        self.start()?;
        info!(recipe = %kind, duration_s, part_size, "Recipe started");

        for second in 0..=duration_s {
            let (pressure, current) = kind.setpoint(part_size, second);
            if let Err(source) = self.io.perform_unit_of_work(pressure, current, second) {
                let log = self.abort(second, &source)?;
                return Err(ControlError::RunAborted {
                    second,
                    log,
                    source,
                });
            }
            self.stats.seconds_executed += 1;
        }

        let log = self.finish()?;
        info!(recipe = %kind, log = %log.display(), "Recipe complete");
        Ok(log)
    }

    pub fn station(&self) -> &IO {
        &self.io
    }

    pub fn stats(&self) -> &ExecutionStats {
        &self.stats
    }

    fn start(&mut self) -> Result<(), ControlError> {
        self.io.start().map_err(ControlError::StartFailed)?;
        self.stats.runs_started += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<PathBuf, ControlError> {
        let log = self.io.stop().map_err(ControlError::StopFailed)?;
        self.stats.runs_completed += 1;
        Ok(log)
    }

    fn abort(&mut self, second: u32, cause: &DeviceError) -> Result<PathBuf, ControlError> {
        self.stats.runs_aborted += 1;
        warn!(second, error = %cause, log = ?self.io.log_path(), "Run aborted");
        self.io.stop().map_err(|e| {
            warn!(second, error = %e, "Station failed to stop after aborted run");
            ControlError::StopFailed(e)
        })
    }
}
