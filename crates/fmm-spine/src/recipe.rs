//! Recipe schedules: the control values each recipe applies at a given
//! simulated second.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ramp recipes need a part size strictly above this.
pub const RAMP_MIN_PART_SIZE: i32 = 50;

const CONSTANT_PRESSURE_FLOOR: i64 = 100;
const CONSTANT_CURRENT_OFFSET: i64 = 50;
const CURRENT_MODE_PRESSURE_CEILING: i64 = 50;
const CURRENT_MODE_PRESSURE_FLOOR: i64 = 10;
const RAMP_PRESSURE_CAP: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecipeKind {
    ConstantPressure,
    ConstantCurrent,
    Ramp,
}

impl RecipeKind {
    pub const ALL: [RecipeKind; 3] = [
        RecipeKind::ConstantPressure,
        RecipeKind::ConstantCurrent,
        RecipeKind::Ramp,
    ];

    /// Name used in recipe files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConstantPressure => "ConstantPressure",
            Self::ConstantCurrent => "ConstantCurrent",
            Self::Ramp => "Ramp",
        }
    }

    /// Exact, case-sensitive lookup by recipe file name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Run length, in simulated seconds, when executed from a recipe file.
    pub fn duration_s(&self) -> u32 {
        match self {
            Self::ConstantPressure => 10,
            Self::ConstantCurrent => 20,
            Self::Ramp => 12,
        }
    }

    /// Smallest accepted part size, if the recipe has one.
    pub fn min_part_size(&self) -> Option<i32> {
        match self {
            Self::Ramp => Some(RAMP_MIN_PART_SIZE + 1),
            _ => None,
        }
    }

    /// `(pressure, current)` requested at `second`. The device clamps these.
    pub fn setpoint(&self, part_size: i32, second: u32) -> (i64, i64) {
        let part = i64::from(part_size);
        let i = i64::from(second);
        match self {
            Self::ConstantPressure => (part + CONSTANT_PRESSURE_FLOOR, 2 * i),
            Self::ConstantCurrent => (
                (CURRENT_MODE_PRESSURE_CEILING - 2 * i).max(CURRENT_MODE_PRESSURE_FLOOR),
                part + CONSTANT_CURRENT_OFFSET,
            ),
            Self::Ramp => ((10 * i).min(RAMP_PRESSURE_CAP), part + 20 * i),
        }
    }
}

impl fmt::Display for RecipeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
