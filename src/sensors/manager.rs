//! Per-kind sensor registries and the once-per-cycle broadcasts.

use log::{debug, info};

use crate::acquisition::ChannelSource;
use crate::config::SystemConfig;
use crate::error::{RegistryError, Result};

use super::registry::{Operation, SensorHandle, SensorRegistry, Target};
use super::soil_humidity::SoilHumiditySensor;
use super::temperature::{TemperatureSensor, TemperatureThresholds};
use super::Sensor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Temperature,
    SoilHumidity,
}

/// Fused view of every valid reading after one cycle.
///
/// `None` means no sensor of that kind produced a valid value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClimateSnapshot {
    pub temperature_c: Option<f32>,
    pub humidity_percent: Option<f32>,
}

pub struct SensorManager<'a> {
    temperature: SensorRegistry<TemperatureSensor<'a>>,
    soil: SensorRegistry<SoilHumiditySensor<'a>>,
}

impl<'a> SensorManager<'a> {
    pub const fn new() -> Self {
        Self {
            temperature: SensorRegistry::new(),
            soil: SensorRegistry::new(),
        }
    }

    /// One temperature and one soil sensor wired as `config` describes.
    pub fn from_config(source: &'a dyn ChannelSource, config: &SystemConfig) -> Result<Self> {
        config.validate()?;
        let mut manager = Self::new();

        let temperature = TemperatureSensor::new(source, config.temperature_channel)
            .with_thresholds(TemperatureThresholds {
                min_c: config.temperature_min_c,
                max_c: config.temperature_max_c,
            });
        manager.subscribe_temperature(temperature)?;

        let mut soil = SoilHumiditySensor::new(source, config.soil_channel);
        soil.calibrate(config.soil_dry_raw, config.soil_wet_raw);
        manager.subscribe_soil_humidity(soil)?;

        info!(
            "sensors: temperature on ch{}, soil on ch{}",
            config.temperature_channel, config.soil_channel
        );
        Ok(manager)
    }

    pub fn subscribe_temperature(
        &mut self,
        sensor: TemperatureSensor<'a>,
    ) -> core::result::Result<SensorHandle, RegistryError> {
        self.temperature.subscribe(sensor)
    }

    pub fn subscribe_soil_humidity(
        &mut self,
        sensor: SoilHumiditySensor<'a>,
    ) -> core::result::Result<SensorHandle, RegistryError> {
        self.soil.subscribe(sensor)
    }

    /// Apply `op` to `target` within the `kind` registry.
    pub fn dispatch(&mut self, kind: SensorKind, op: Operation, target: Target) -> usize {
        match kind {
            SensorKind::Temperature => self.temperature.dispatch(op, target),
            SensorKind::SoilHumidity => self.soil.dispatch(op, target),
        }
    }

    fn broadcast(&mut self, op: Operation) -> usize {
        self.dispatch(SensorKind::Temperature, op, Target::All)
            + self.dispatch(SensorKind::SoilHumidity, op, Target::All)
    }

    pub fn read_all(&mut self) -> usize {
        self.broadcast(Operation::Read)
    }

    pub fn process_all(&mut self) -> usize {
        self.broadcast(Operation::Process)
    }

    /// Read every sensor, then process every sensor.
    pub fn update_all(&mut self) -> usize {
        let read = self.read_all();
        self.process_all();
        debug!("sensors: updated {}", read);
        read
    }

    pub fn temperature(&self, handle: SensorHandle) -> Option<&TemperatureSensor<'a>> {
        self.temperature.get(handle)
    }

    pub fn temperature_mut(&mut self, handle: SensorHandle) -> Option<&mut TemperatureSensor<'a>> {
        self.temperature.get_mut(handle)
    }

    pub fn soil_humidity(&self, handle: SensorHandle) -> Option<&SoilHumiditySensor<'a>> {
        self.soil.get(handle)
    }

    pub fn soil_humidity_mut(
        &mut self,
        handle: SensorHandle,
    ) -> Option<&mut SoilHumiditySensor<'a>> {
        self.soil.get_mut(handle)
    }

    pub fn temperature_sensors(&self) -> impl Iterator<Item = &TemperatureSensor<'a>> {
        self.temperature.iter()
    }

    pub fn soil_sensors(&self) -> impl Iterator<Item = &SoilHumiditySensor<'a>> {
        self.soil.iter()
    }

    pub fn len(&self, kind: SensorKind) -> usize {
        match kind {
            SensorKind::Temperature => self.temperature.len(),
            SensorKind::SoilHumidity => self.soil.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty() && self.soil.is_empty()
    }

    /// Mean of the valid readings of each kind.
    pub fn snapshot(&self) -> ClimateSnapshot {
        ClimateSnapshot {
            temperature_c: mean(
                self.temperature
                    .iter()
                    .filter(|s| s.is_valid())
                    .map(TemperatureSensor::temperature_celsius),
            ),
            humidity_percent: mean(
                self.soil
                    .iter()
                    .filter(|s| s.is_valid())
                    .map(SoilHumiditySensor::humidity_percent),
            ),
        }
    }
}

impl Default for SensorManager<'_> {
    fn default() -> Self {
        Self::new()
    }
}

fn mean(values: impl Iterator<Item = f32>) -> Option<f32> {
    let (sum, count) = values.fold((0.0f32, 0u32), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f32)
}
