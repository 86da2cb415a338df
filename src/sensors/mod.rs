//! Sensor subsystem: shared rolling-window sampling, the derived sensors,
//! and the [`SensorManager`](manager::SensorManager) that fans one
//! acquisition cycle out to every registered sensor.
//!
//! Every analog sensor shares the same shape: pull one raw sample for its
//! channel, push it into a 10-sample window, average the window.  What
//! differs per kind is only the transform from that average to an
//! engineering value and the validity rule, so [`SensorBase`] is composed
//! into each derived sensor rather than inherited.
//!
//! ## Sampling phases
//!
//! ```text
//!   Idle ──read──▶ Accumulating ──(10th read)──▶ Steady
//!                   (partial window)              (sliding window of last 10)
//! ```
//!
//! There is no reset; a sensor never returns to `Idle`.

pub mod manager;
pub mod registry;
pub mod soil_humidity;
pub mod temperature;

use embedded_hal::delay::DelayNs;
use log::warn;

use crate::acquisition::{ChannelSource, RawSample, SAMPLE_MASK};
use crate::app::ports::OneShotConverter;
use crate::error::AdcError;
use crate::ring_buffer::RingBuffer;

/// Samples kept in each sensor's rolling window.
pub const WINDOW_LEN: usize = 10;

/// Read/process seam used by the registry dispatcher.
pub trait Sensor {
    /// Pull one new raw sample into the rolling window.
    fn read_data(&mut self) -> Result<(), AdcError>;

    /// Recompute the average, the engineering value and the validity flag.
    fn process_data(&mut self);

    /// Whether the last processed value is usable.
    fn is_valid(&self) -> bool;
}

/// Where a sensor is in filling its rolling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingPhase {
    /// No sample yet; the average is zero.
    Idle,
    /// Fewer than [`WINDOW_LEN`] samples; average over the partial window.
    Accumulating,
    /// Window saturated; average over the last [`WINDOW_LEN`] samples.
    Steady,
}

/// Rolling raw window plus averaged value for one converter channel.
pub struct SensorBase<'a> {
    source: &'a dyn ChannelSource,
    channel: u8,
    window: RingBuffer<RawSample, WINDOW_LEN>,
    /// Saturates at `WINDOW_LEN`.
    samples: usize,
    average: f32,
    valid: bool,
}

impl<'a> SensorBase<'a> {
    pub fn new(source: &'a dyn ChannelSource, channel: u8) -> Self {
        Self {
            source,
            channel,
            window: RingBuffer::new(),
            samples: 0,
            average: 0.0,
            valid: false,
        }
    }

    /// Pull the latest scan value for this channel into the window.
    ///
    /// Always succeeds: the scan engine has already filled the buffer by
    /// the time the completion flag is seen.
    pub fn read_data(&mut self) -> Result<(), AdcError> {
        let raw = self.source.channel_value(self.channel);
        self.record(raw);
        Ok(())
    }

    /// Legacy polling read: drive a single conversion on `adc` and wait up
    /// to `timeout_ms` for it to settle.
    ///
    /// On timeout the converter is halted, nothing is recorded and
    /// [`AdcError::Timeout`] is returned.  There is no retry; the caller
    /// tries again on its next tick.
    pub fn read_polled<A, D>(
        &mut self,
        adc: &mut A,
        delay: &mut D,
        timeout_ms: u32,
    ) -> Result<(), AdcError>
    where
        A: OneShotConverter,
        D: DelayNs,
    {
        adc.select_channel(self.channel)?;
        adc.start()?;

        let mut waited_ms = 0u32;
        while !adc.is_complete() {
            if waited_ms >= timeout_ms {
                adc.stop();
                warn!(
                    "sensor ch{}: conversion timed out after {} ms",
                    self.channel, timeout_ms
                );
                return Err(AdcError::Timeout);
            }
            delay.delay_ms(1);
            waited_ms += 1;
        }

        let raw = adc.value() & SAMPLE_MASK;
        adc.stop();
        self.record(raw);
        Ok(())
    }

    /// Average every sample in the window.  An empty window averages to 0.
    pub fn process_data(&mut self) {
        let count = self.samples.max(1);
        let sum: u32 = self.window.iter().take(count).map(u32::from).sum();
        self.average = sum as f32 / count as f32;
    }

    fn record(&mut self, raw: RawSample) {
        self.window.push(raw);
        if self.samples < WINDOW_LEN {
            self.samples += 1;
        }
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn sample_count(&self) -> usize {
        self.samples
    }

    /// Last processed (averaged) raw value.
    pub fn average(&self) -> f32 {
        self.average
    }

    /// Most recent raw sample, if any.
    pub fn latest(&self) -> Option<RawSample> {
        self.window.iter().last()
    }

    pub fn phase(&self) -> SamplingPhase {
        match self.samples {
            0 => SamplingPhase::Idle,
            n if n < WINDOW_LEN => SamplingPhase::Accumulating,
            _ => SamplingPhase::Steady,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub(crate) fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }
}
