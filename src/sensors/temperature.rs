//! Linear analog temperature sensor (TMP36-style: 500 mV at 0 °C,
//! 10 mV/°C).
//!
//! The averaged raw window is converted to volts against the converter
//! reference, then to Celsius through a linear slope/offset.  The reading
//! is valid while it stays inside the configured threshold pair.

use serde::{Deserialize, Serialize};

use crate::acquisition::{ADC_MAX, ChannelSource, V_REF};
use crate::error::AdcError;

use super::{Sensor, SensorBase};

pub const KELVIN_OFFSET: f32 = 273.15;

/// Linear volts-to-Celsius transfer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureCalibration {
    /// °C per volt.
    pub slope_c_per_v: f32,
    /// Output voltage at 0 °C.
    pub offset_v: f32,
}

impl Default for TemperatureCalibration {
    fn default() -> Self {
        Self {
            slope_c_per_v: 100.0,
            offset_v: 0.5,
        }
    }
}

/// Inclusive valid range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureThresholds {
    pub min_c: f32,
    pub max_c: f32,
}

impl TemperatureThresholds {
    pub fn contains(&self, celsius: f32) -> bool {
        celsius >= self.min_c && celsius <= self.max_c
    }
}

impl Default for TemperatureThresholds {
    fn default() -> Self {
        Self {
            min_c: -40.0,
            max_c: 85.0,
        }
    }
}

/// Celsius for an averaged raw reading.
pub fn celsius_from_average(average: f32, cal: &TemperatureCalibration) -> f32 {
    let volts = V_REF * average / f32::from(ADC_MAX);
    (volts - cal.offset_v) * cal.slope_c_per_v
}

pub fn fahrenheit_from_celsius(celsius: f32) -> f32 {
    celsius * (9.0 / 5.0) + 32.0
}

pub fn kelvin_from_celsius(celsius: f32) -> f32 {
    celsius + KELVIN_OFFSET
}

pub struct TemperatureSensor<'a> {
    base: SensorBase<'a>,
    calibration: TemperatureCalibration,
    thresholds: TemperatureThresholds,
    celsius: f32,
}

impl<'a> TemperatureSensor<'a> {
    pub fn new(source: &'a dyn ChannelSource, channel: u8) -> Self {
        Self {
            base: SensorBase::new(source, channel),
            calibration: TemperatureCalibration::default(),
            thresholds: TemperatureThresholds::default(),
            celsius: 0.0,
        }
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: TemperatureThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    #[must_use]
    pub fn with_calibration(mut self, calibration: TemperatureCalibration) -> Self {
        self.calibration = calibration;
        self
    }

    /// Replace the valid range.  Takes effect on the next `process_data`.
    pub fn set_threshold(&mut self, min_c: f32, max_c: f32) {
        self.thresholds = TemperatureThresholds { min_c, max_c };
    }

    pub fn thresholds(&self) -> TemperatureThresholds {
        self.thresholds
    }

    pub fn temperature_celsius(&self) -> f32 {
        self.celsius
    }

    pub fn temperature_fahrenheit(&self) -> f32 {
        fahrenheit_from_celsius(self.celsius)
    }

    pub fn temperature_kelvin(&self) -> f32 {
        kelvin_from_celsius(self.celsius)
    }

    pub fn is_temperature_valid(&self) -> bool {
        self.base.is_valid()
    }

    pub fn base(&self) -> &SensorBase<'a> {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut SensorBase<'a> {
        &mut self.base
    }
}

impl Sensor for TemperatureSensor<'_> {
    fn read_data(&mut self) -> Result<(), AdcError> {
        self.base.read_data()
    }

    fn process_data(&mut self) {
        self.base.process_data();
        self.celsius = celsius_from_average(self.base.average(), &self.calibration);
        let valid = self.thresholds.contains(self.celsius);
        self.base.set_valid(valid);
    }

    fn is_valid(&self) -> bool {
        self.base.is_valid()
    }
}
