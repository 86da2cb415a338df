//! System configuration parameters
//!
//! All tunable parameters for the greenhouse controller: channel wiring,
//! sensor calibration, actuation thresholds and loop timing.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::acquisition::{ADC_MAX, CHANNELS};
use crate::error::{Error, Result};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Wiring ---
    /// Converter channel of the temperature sensor
    pub temperature_channel: u8,
    /// Converter channel of the soil moisture probe
    pub soil_channel: u8,

    // --- Temperature ---
    /// Lowest valid reading (Celsius)
    pub temperature_min_c: f32,
    /// Highest valid reading (Celsius)
    pub temperature_max_c: f32,

    // --- Soil calibration ---
    /// Raw average in dry soil (0 % humidity)
    pub soil_dry_raw: u16,
    /// Raw average in saturated soil (100 % humidity)
    pub soil_wet_raw: u16,

    // --- Actuation ---
    /// Fan runs at or above this temperature (Celsius)
    pub fan_on_threshold_c: f32,
    /// Pump runs below this soil humidity (0-100%)
    pub pump_on_below_percent: f32,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Legacy polled-read conversion timeout (milliseconds)
    pub poll_timeout_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Wiring
            temperature_channel: 1,
            soil_channel: 0,

            // Temperature
            temperature_min_c: -40.0,
            temperature_max_c: 85.0,

            // Soil
            soil_dry_raw: ADC_MAX,
            soil_wet_raw: 0,

            // Actuation
            fan_on_threshold_c: 20.0,
            pump_on_below_percent: 40.0,

            // Timing
            control_loop_interval_ms: 1000, // 1 Hz
            poll_timeout_ms: 100,
        }
    }
}

impl SystemConfig {
    pub fn validate(&self) -> Result<()> {
        if usize::from(self.temperature_channel) >= CHANNELS {
            return Err(Error::Config("temperature channel out of range"));
        }
        if usize::from(self.soil_channel) >= CHANNELS {
            return Err(Error::Config("soil channel out of range"));
        }
        // NaN bounds fail too.
        if self.temperature_min_c.partial_cmp(&self.temperature_max_c) != Some(Ordering::Less) {
            return Err(Error::Config("temperature min must be below max"));
        }
        if self.soil_dry_raw <= self.soil_wet_raw {
            return Err(Error::Config("soil dry reading must exceed wet reading"));
        }
        if self.soil_dry_raw > ADC_MAX {
            return Err(Error::Config("soil dry reading above converter range"));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(Error::Config("control loop interval must be non-zero"));
        }
        if !(0.0..=100.0).contains(&self.pump_on_below_percent) {
            return Err(Error::Config("pump threshold outside 0-100%"));
        }
        Ok(())
    }
}
