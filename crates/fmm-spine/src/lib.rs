pub mod control;
pub mod controller;
pub mod hal;
#[cfg(feature = "simulation")]
pub mod hal_sim;
mod clamp_proptest;
pub mod recipe;
pub mod record;
pub mod run_log;
pub mod timebase;

pub use control::{ControlSnapshot, ControlValues, RunTooLong, MAX_RUN_SECONDS};
pub use controller::{BadPartReason, ControlError, Controller, ExecutionStats, PartOutcome};
pub use hal::{clamp_control, DeviceError, StationIO, CONTROL_MAX, CONTROL_MIN};
#[cfg(feature = "simulation")]
pub use hal_sim::{SimulatedStation, StationConfig};
pub use recipe::{RecipeKind, RAMP_MIN_PART_SIZE};
pub use record::{parse_records, read_records, LogRecord, RecordError};
pub use run_log::{LogNamer, RunLog, TimestampNamer, LOG_NAME_ATTEMPTS};
pub use timebase::{Clock, Interrupted, SystemClock, TimeBase, VirtualClock};
