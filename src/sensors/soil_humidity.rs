//! Resistive/capacitive soil moisture probe.
//!
//! The probe reads high in dry soil and low in wet soil.  Two calibration
//! anchors map the averaged raw window onto a percentage by clamped linear
//! interpolation: 100 % at or below `wet`, 0 % at or above `dry`.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::acquisition::{ADC_MAX, ChannelSource};
use crate::error::AdcError;

use super::{Sensor, SensorBase};

/// Raw-average anchors.  `dry` must be strictly above `wet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoilCalibration {
    pub dry: u16,
    pub wet: u16,
}

impl Default for SoilCalibration {
    fn default() -> Self {
        Self {
            dry: ADC_MAX,
            wet: 0,
        }
    }
}

/// Humidity percentage for an averaged raw reading.
pub fn humidity_from_average(average: f32, cal: &SoilCalibration) -> f32 {
    let wet = f32::from(cal.wet);
    let dry = f32::from(cal.dry);
    if average <= wet {
        100.0
    } else if average >= dry {
        0.0
    } else {
        100.0 - (average - wet) / (dry - wet) * 100.0
    }
}

pub struct SoilHumiditySensor<'a> {
    base: SensorBase<'a>,
    calibration: SoilCalibration,
    percent: f32,
}

impl<'a> SoilHumiditySensor<'a> {
    pub fn new(source: &'a dyn ChannelSource, channel: u8) -> Self {
        Self {
            base: SensorBase::new(source, channel),
            calibration: SoilCalibration::default(),
            percent: 0.0,
        }
    }

    /// Set the dry/wet anchors.
    ///
    /// Anchors with `dry <= wet` are ignored and the previous calibration is
    /// kept; the caller gets no signal.
    pub fn calibrate(&mut self, dry: u16, wet: u16) {
        if dry <= wet {
            warn!(
                "soil ch{}: calibration dry={} wet={} ignored (dry must exceed wet)",
                self.base.channel(),
                dry,
                wet
            );
            return;
        }
        self.calibration = SoilCalibration { dry, wet };
    }

    pub fn calibration(&self) -> SoilCalibration {
        self.calibration
    }

    pub fn humidity_percent(&self) -> f32 {
        self.percent
    }

    pub fn is_humidity_valid(&self) -> bool {
        self.base.is_valid()
    }

    pub fn base(&self) -> &SensorBase<'a> {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut SensorBase<'a> {
        &mut self.base
    }
}

impl Sensor for SoilHumiditySensor<'_> {
    fn read_data(&mut self) -> Result<(), AdcError> {
        self.base.read_data()
    }

    fn process_data(&mut self) {
        self.base.process_data();
        self.percent = humidity_from_average(self.base.average(), &self.calibration);
        self.base.set_valid(true);
    }

    fn is_valid(&self) -> bool {
        self.base.is_valid()
    }
}
