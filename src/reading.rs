//! Sensor readings
//!
//! The buffering layers only ever look at a reading's timestamp through
//! [`Timestamped`]. The concrete types here are the two kinds of reading a
//! glucose monitor reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Timestamped;

/// mg/dL per mmol/L of glucose
pub const MG_PER_DL_PER_MMOL: f32 = 18.0;

/// Unit a glucose value is expressed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlucoseUnit {
    #[default]
    MgPerDl,
    MmolPerL,
}

/// A single glucose measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlucoseRead {
    pub time: DateTime<Utc>,
    pub unit: GlucoseUnit,
    pub value: f32,
}

impl GlucoseRead {
    pub fn new(time: DateTime<Utc>, unit: GlucoseUnit, value: f32) -> Self {
        Self { time, unit, value }
    }

    /// Value normalized to mg/dL
    pub fn to_mg_per_dl(&self) -> f32 {
        match self.unit {
            GlucoseUnit::MgPerDl => self.value,
            GlucoseUnit::MmolPerL => self.value * MG_PER_DL_PER_MMOL,
        }
    }
}

impl Timestamped for GlucoseRead {
    fn timestamp(&self) -> DateTime<Utc> {
        self.time
    }
}

/// A fingerstick calibration entered on the device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRead {
    pub time: DateTime<Utc>,
    pub value: f32,
}

impl CalibrationRead {
    pub fn new(time: DateTime<Utc>, value: f32) -> Self {
        Self { time, value }
    }
}

impl Timestamped for CalibrationRead {
    fn timestamp(&self) -> DateTime<Utc> {
        self.time
    }
}
