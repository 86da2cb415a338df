//! Mock hardware adapters for integration tests.
//!
//! Records every output and event so tests can assert on the full history
//! without touching real PWM registers.

use greenhouse::app::events::ClimateEvent;
use greenhouse::app::ports::{DutyCycleOutput, EventSink};
use greenhouse::error::AdcError;
use greenhouse::sensors::Sensor;

// ── Output call record ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum OutputCall {
    Duty(f32),
    Enable(bool),
}

#[derive(Default)]
pub struct RecordingOutput {
    pub calls: Vec<OutputCall>,
    duty: f32,
    enabled: bool,
}

#[allow(dead_code)]
impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enabled flag of the last `Enable` call.
    pub fn was_enabled(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                OutputCall::Enable(on) => Some(*on),
                OutputCall::Duty(_) => None,
            })
            .unwrap_or(false)
    }
}

impl DutyCycleOutput for RecordingOutput {
    fn set_duty_cycle(&mut self, ratio: f32) {
        self.duty = ratio.clamp(0.0, 1.0);
        self.calls.push(OutputCall::Duty(ratio));
    }

    fn enable(&mut self, on: bool) {
        self.enabled = on;
        self.calls.push(OutputCall::Enable(on));
    }

    fn duty_cycle(&self) -> f32 {
        self.duty
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

// ── Event recorder ────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<ClimateEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&ClimateEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &ClimateEvent) {
        self.events.push(event.clone());
    }
}

// ── Counting sensor ───────────────────────────────────────────

/// Sensor that only counts how often the registry drives it.
#[derive(Default)]
pub struct CountingSensor {
    pub reads: u32,
    pub processes: u32,
    pub fail_reads: bool,
}

impl Sensor for CountingSensor {
    fn read_data(&mut self) -> Result<(), AdcError> {
        self.reads += 1;
        if self.fail_reads {
            Err(AdcError::Timeout)
        } else {
            Ok(())
        }
    }

    fn process_data(&mut self) {
        self.processes += 1;
    }

    fn is_valid(&self) -> bool {
        self.processes > 0
    }
}
