use crate::hal::clamp_control;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest manual run accepted, in simulated seconds.
pub const MAX_RUN_SECONDS: u32 = 86_400;

/// Manual run parameters. Values are clamped into the hardware range on
/// construction; only the duration can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlValues {
    pressure: i32,
    current: i32,
    seconds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTooLong {
    pub seconds: u32,
    pub max: u32,
}

impl ControlValues {
    pub fn new(pressure: i64, current: i64, seconds: u32) -> Result<Self, RunTooLong> {
        if seconds > MAX_RUN_SECONDS {
            return Err(RunTooLong {
                seconds,
                max: MAX_RUN_SECONDS,
            });
        }
        Ok(Self {
            pressure: clamp_control(pressure),
            current: clamp_control(current),
            seconds,
        })
    }

    pub fn pressure(&self) -> i32 {
        self.pressure
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }
}

/// Point-in-time view of the station's control values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlSnapshot {
    pub pressure: i32,
    pub current: i32,
}

impl fmt::Display for ControlSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pressure={} current={}", self.pressure, self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_values_on_construction() {
        let values = ControlValues::new(500, -20, 10).unwrap();
        assert_eq!(values.pressure(), 200);
        assert_eq!(values.current(), 0);
        assert_eq!(values.seconds(), 10);
    }

    #[test]
    fn rejects_overlong_runs() {
        let err = ControlValues::new(100, 100, MAX_RUN_SECONDS + 1).unwrap_err();
        assert_eq!(err.max, MAX_RUN_SECONDS);
    }

    #[test]
    fn snapshot_is_human_readable() {
        let snapshot = ControlSnapshot {
            pressure: 100,
            current: 42,
        };
        assert_eq!(snapshot.to_string(), "pressure=100 current=42");
    }
}
