//! Outbound climate events.
//!
//! The [`ClimateService`](super::service::ClimateService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them (serial log, display, telemetry).

use crate::control::climate::ActuatorCommands;
use crate::error::AdcError;
use crate::sensors::manager::ClimateSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub enum ClimateEvent {
    /// The first conversion scan was armed.
    Started,

    /// A scan was drained into every sensor.
    CycleCompleted {
        cycle: u64,
        snapshot: ClimateSnapshot,
    },

    /// Arming or halting the conversion engine failed.
    AcquisitionFault(AdcError),

    /// Fan or pump command differs from the previous cycle.
    OutputsChanged(ActuatorCommands),
}
