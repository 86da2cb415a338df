//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured climate events through
//! the `log` facade (serial console on target, stderr in the simulator).

use log::{info, warn};

use crate::app::events::ClimateEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`ClimateEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// Optional reading, `--` when absent.
struct Reading(Option<f32>);

impl core::fmt::Display for Reading {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v:.1}"),
            None => f.write_str("--"),
        }
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ClimateEvent) {
        match event {
            ClimateEvent::Started => info!("START | acquisition armed"),
            ClimateEvent::CycleCompleted { cycle, snapshot } => {
                info!(
                    "CYCLE | #{} | T={}\u{00b0}C | soil={}%",
                    cycle,
                    Reading(snapshot.temperature_c),
                    Reading(snapshot.humidity_percent),
                );
            }
            ClimateEvent::AcquisitionFault(e) => warn!("FAULT | {}", e),
            ClimateEvent::OutputsChanged(cmds) => {
                info!(
                    "OUTPUT | fan={} {:.0}% | pump={} {:.0}%",
                    if cmds.fan.enabled { "ON" } else { "OFF" },
                    cmds.fan.duty * 100.0,
                    if cmds.pump.enabled { "ON" } else { "OFF" },
                    cmds.pump.duty * 100.0,
                );
            }
        }
    }
}
