use std::path::{Path, PathBuf};
use thiserror::Error;

/// Lowest value either control channel accepts.
pub const CONTROL_MIN: i32 = 0;
/// Highest value either control channel accepts.
pub const CONTROL_MAX: i32 = 200;

/// Clamp a requested control value into the hardware range.
pub fn clamp_control(value: i64) -> i32 {
    value.clamp(CONTROL_MIN as i64, CONTROL_MAX as i64) as i32
}

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device is offline")]
    Offline,

    #[error("device is already online")]
    AlreadyOnline,

    #[error("no unique run log could be created after {attempts} attempts")]
    LogUnavailable { attempts: u32 },

    #[error("run log I/O error: {0}")]
    LogIo(#[from] std::io::Error),

    #[error("simulated second was interrupted")]
    Interrupted,
}

/// Hardware seam the controller drives. One implementation is the simulated
/// station; anything else that can hold two control values and log a run
/// plugs in here.
pub trait StationIO {
    /// Bring the hardware online and open a fresh run log.
    fn start(&mut self) -> Result<(), DeviceError>;
    /// Take the hardware offline, reset both control values and hand back the
    /// closed run log.
    fn stop(&mut self) -> Result<PathBuf, DeviceError>;
    /// Apply the values for one simulated second and append its log record.
    fn perform_unit_of_work(
        &mut self,
        pressure: i64,
        current: i64,
        second: u32,
    ) -> Result<(), DeviceError>;
    fn set_pressure(&mut self, value: i64);
    fn set_current(&mut self, value: i64);
    fn pressure(&self) -> i32;
    fn current(&self) -> i32;
    fn is_online(&self) -> bool;
    fn log_path(&self) -> Option<&Path>;
}
