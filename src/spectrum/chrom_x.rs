use std::fmt;

use serde::{Deserialize, Serialize};

/// Chromatographic dimension a chromatogram is built over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum ChromXType {
    /// Retention time
    #[default]
    RT,
    /// Retention index
    RI,
    /// Ion-mobility drift time
    Drift,
    /// Mass-to-charge ratio
    Mz,
}

/// Unit of a chromatographic axis value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChromXUnit {
    /// Minutes
    #[default]
    Min,
    /// Seconds
    Sec,
    /// Milliseconds (drift time)
    Msec,
    /// m/z units
    Mz,
    /// Unitless (retention index)
    None,
}

impl fmt::Display for ChromXType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChromXType::RT => "RT",
            ChromXType::RI => "RI",
            ChromXType::Drift => "Drift",
            ChromXType::Mz => "Mz",
        };
        f.write_str(label)
    }
}

impl fmt::Display for ChromXUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChromXUnit::Min => "min",
            ChromXUnit::Sec => "sec",
            ChromXUnit::Msec => "msec",
            ChromXUnit::Mz => "m/z",
            ChromXUnit::None => "",
        };
        f.write_str(label)
    }
}

/// A single value on a chromatographic axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ChromX {
    /// Axis value
    pub value: f64,
    /// Axis type
    pub axis: ChromXType,
    /// Axis unit
    pub unit: ChromXUnit,
}

impl ChromX {
    /// Create a new axis value
    pub fn new(value: f64, axis: ChromXType, unit: ChromXUnit) -> Self {
        Self { value, axis, unit }
    }

    /// Retention time in minutes
    pub fn rt(value: f64) -> Self {
        Self::new(value, ChromXType::RT, ChromXUnit::Min)
    }

    /// Drift time in milliseconds
    pub fn drift(value: f64) -> Self {
        Self::new(value, ChromXType::Drift, ChromXUnit::Msec)
    }
}
