//! Climate actuation policy.
//!
//! Fan and pump duty follow the reading directly:
//!
//! | Output | Duty ratio      | Enabled when                        |
//! |--------|-----------------|-------------------------------------|
//! | fan    | `°C / 100`      | `°C >= fan_on_threshold_c`          |
//! | pump   | `% / 100`       | `% < pump_on_below_percent`         |
//!
//! A missing (no valid sensor) reading turns its output off.

use crate::config::SystemConfig;
use crate::sensors::manager::ClimateSnapshot;

/// Setting for one duty-cycle output.  `duty` is always in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OutputCommand {
    pub duty: f32,
    pub enabled: bool,
}

impl OutputCommand {
    pub const OFF: Self = Self {
        duty: 0.0,
        enabled: false,
    };

    pub fn new(duty: f32, enabled: bool) -> Self {
        Self {
            duty: clamp_ratio(duty),
            enabled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActuatorCommands {
    pub fan: OutputCommand,
    pub pump: OutputCommand,
}

/// Clamp to `[0.0, 1.0]`; NaN maps to 0.
pub fn clamp_ratio(ratio: f32) -> f32 {
    if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimatePolicy {
    fan_on_threshold_c: f32,
    pump_on_below_percent: f32,
}

impl ClimatePolicy {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            fan_on_threshold_c: config.fan_on_threshold_c,
            pump_on_below_percent: config.pump_on_below_percent,
        }
    }

    pub fn evaluate(&self, snapshot: &ClimateSnapshot) -> ActuatorCommands {
        let fan = snapshot.temperature_c.map_or(OutputCommand::OFF, |c| {
            OutputCommand::new(c / 100.0, c >= self.fan_on_threshold_c)
        });
        let pump = snapshot.humidity_percent.map_or(OutputCommand::OFF, |h| {
            OutputCommand::new(h / 100.0, h < self.pump_on_below_percent)
        });
        ActuatorCommands { fan, pump }
    }
}

impl Default for ClimatePolicy {
    fn default() -> Self {
        Self::new(&SystemConfig::default())
    }
}
