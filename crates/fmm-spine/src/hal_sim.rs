use crate::hal::{clamp_control, DeviceError, StationIO, CONTROL_MIN};
use crate::record::LogRecord;
use crate::run_log::{LogNamer, RunLog, TimestampNamer, LOG_NAME_ATTEMPTS};
use crate::timebase::{Clock, SystemClock};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Clone, Debug)]
pub struct StationConfig {
    /// Directory that receives one log file per run.
    pub log_dir: PathBuf,
    /// Real time that stands in for one simulated second.
    pub second: Duration,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            second: Duration::from_secs(1),
        }
    }
}

/// Simulated pressure/current station with a per-run log.
pub struct SimulatedStation {
    pressure: i32,
    current: i32,
    log: Option<RunLog>,

    config: StationConfig,
    clock: Box<dyn Clock>,
    namer: Box<dyn LogNamer>,
}

impl SimulatedStation {
    pub fn new(config: StationConfig) -> Self {
        Self {
            pressure: CONTROL_MIN,
            current: CONTROL_MIN,
            log: None,
            config,
            clock: Box::new(SystemClock),
            namer: Box::new(TimestampNamer),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_namer(mut self, namer: impl LogNamer + 'static) -> Self {
        self.namer = Box::new(namer);
        self
    }

    pub fn config(&self) -> &StationConfig {
        &self.config
    }
}

impl StationIO for SimulatedStation {
    fn start(&mut self) -> Result<(), DeviceError> {
        if self.log.is_some() {
            return Err(DeviceError::AlreadyOnline);
        }

        match RunLog::create(&self.config.log_dir, self.namer.as_mut())? {
            Some(log) => {
                info!(log = %log.path().display(), "Station online");
                self.log = Some(log);
                Ok(())
            }
            None => {
                warn!(attempts = LOG_NAME_ATTEMPTS, "Station stays offline: no run log");
                Err(DeviceError::LogUnavailable {
                    attempts: LOG_NAME_ATTEMPTS,
                })
            }
        }
    }

    fn stop(&mut self) -> Result<PathBuf, DeviceError> {
        let log = self.log.take().ok_or(DeviceError::Offline)?;
        self.pressure = CONTROL_MIN;
        self.current = CONTROL_MIN;

        let records = log.records();
        let path = log.close()?;
        info!(log = %path.display(), records, "Station offline");
        Ok(path)
    }

    fn perform_unit_of_work(
        &mut self,
        pressure: i64,
        current: i64,
        second: u32,
    ) -> Result<(), DeviceError> {
        if self.log.is_none() {
            return Err(DeviceError::Offline);
        }
        self.set_pressure(pressure);
        self.set_current(current);

        self.clock
            .wait(self.config.second)
            .map_err(|_| DeviceError::Interrupted)?;

        let record = LogRecord::new(second, self.pressure, self.current);
        let log = self.log.as_mut().ok_or(DeviceError::Offline)?;
        log.append(&record)?;
        debug!(%record, "Unit of work");
        Ok(())
    }

    fn set_pressure(&mut self, value: i64) {
        self.pressure = clamp_control(value);
    }

    fn set_current(&mut self, value: i64) {
        self.current = clamp_control(value);
    }

    fn pressure(&self) -> i32 {
        self.pressure
    }

    fn current(&self) -> i32 {
        self.current
    }

    fn is_online(&self) -> bool {
        self.log.is_some()
    }

    fn log_path(&self) -> Option<&Path> {
        self.log.as_ref().map(RunLog::path)
    }
}
