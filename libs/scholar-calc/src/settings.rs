//! Calculator settings and the settings port
//!
//! Settings are owned by the caller. The engine reads them once per event
//! through [`SettingsPort`] and passes the resulting [`Settings`] value
//! explicitly into the formatter and the function library.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CalcError;

/// Default number of fractional digits shown
pub const DEFAULT_PRECISION: usize = 10;

/// Upper bound for precision; larger values are clamped
pub const MAX_PRECISION: usize = 20;

/// Angle unit used by the trigonometric functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    #[serde(alias = "deg")]
    Degrees,
    #[serde(alias = "rad")]
    Radians,
}

impl AngleUnit {
    /// Convert an angle in this unit to radians
    pub fn to_radians(self, x: f64) -> f64 {
        match self {
            Self::Degrees => x.to_radians(),
            Self::Radians => x,
        }
    }

    /// The other unit
    pub fn toggled(self) -> Self {
        match self {
            Self::Degrees => Self::Radians,
            Self::Radians => Self::Degrees,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Degrees => "DEG",
            Self::Radians => "RAD",
        }
    }
}

impl fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AngleUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deg" | "degree" | "degrees" => Ok(Self::Degrees),
            "rad" | "radian" | "radians" => Ok(Self::Radians),
            other => Err(CalcError::invalid_input(format!(
                "unknown angle unit '{}'",
                other
            ))),
        }
    }
}

/// Read access to the caller-owned settings
pub trait SettingsPort {
    fn angle_unit(&self) -> AngleUnit;

    fn precision(&self) -> usize;

    fn use_scientific_notation(&self) -> bool;

    /// Capture the current values, clamping precision to [`MAX_PRECISION`]
    fn snapshot(&self) -> Settings {
        Settings {
            angle_unit: self.angle_unit(),
            precision: self.precision().min(MAX_PRECISION),
            use_scientific_notation: self.use_scientific_notation(),
        }
    }
}

/// Display and angle settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub angle_unit: AngleUnit,
    /// Fractional digits (fixed notation) or significant digits (exponential)
    pub precision: usize,
    pub use_scientific_notation: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            angle_unit: AngleUnit::Degrees,
            precision: DEFAULT_PRECISION,
            use_scientific_notation: false,
        }
    }
}

impl Settings {
    pub fn with_angle_unit(mut self, unit: AngleUnit) -> Self {
        self.angle_unit = unit;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision.min(MAX_PRECISION);
        self
    }

    pub fn with_scientific_notation(mut self, enabled: bool) -> Self {
        self.use_scientific_notation = enabled;
        self
    }
}

impl SettingsPort for Settings {
    fn angle_unit(&self) -> AngleUnit {
        self.angle_unit
    }

    fn precision(&self) -> usize {
        self.precision
    }

    fn use_scientific_notation(&self) -> bool {
        self.use_scientific_notation
    }
}
