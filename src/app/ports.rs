//! Port traits: the hexagonal boundary between the acquisition core and
//! the platform.
//!
//! ```text
//!   Platform adapter ──▶ Port trait ──▶ AcquisitionManager / sensors / ClimateService
//! ```
//!
//! Driven adapters (the scan engine, the legacy one-shot converter, PWM
//! outputs, event sinks) implement these traits.  The core consumes them via
//! generics, so it never touches peripheral registers directly and the whole
//! pipeline runs on the host against the simulation adapters.

use core::sync::atomic::AtomicU16;

use crate::error::AdcError;

use super::events::ClimateEvent;

// ───────────────────────────────────────────────────────────────
// Conversion engine (driven adapter: ADC + DMA → core)
// ───────────────────────────────────────────────────────────────

/// Multi-channel conversion engine streaming results by direct memory
/// transfer.
///
/// The engine owns both hardware handles (converter and transfer channel).
/// The platform invokes the core's completion handler
/// ([`AcquisitionManager::on_conversion_complete`](crate::acquisition::AcquisitionManager::on_conversion_complete))
/// from its interrupt vector when a scan finishes.
pub trait ConversionEngine {
    /// Arm one scan of every configured channel.
    ///
    /// Results land in `slots[i]` for channel `i`, right-aligned in a
    /// half-word.  Fails with [`AdcError::StartFailed`] if the transfer
    /// cannot be armed.
    fn start(&mut self, slots: &[AtomicU16]) -> Result<(), AdcError>;

    /// Abort any in-flight scan.  Must be idempotent.
    fn stop(&mut self) -> Result<(), AdcError>;
}

// ───────────────────────────────────────────────────────────────
// One-shot converter (legacy polling acquisition)
// ───────────────────────────────────────────────────────────────

/// Single-channel, software-triggered converter used by the legacy polling
/// read path.
pub trait OneShotConverter {
    /// Route `channel` to the converter input.
    fn select_channel(&mut self, channel: u8) -> Result<(), AdcError>;

    /// Trigger a single conversion.
    fn start(&mut self) -> Result<(), AdcError>;

    /// True once the triggered conversion has settled.
    fn is_complete(&mut self) -> bool;

    /// Result of the last settled conversion.
    fn value(&mut self) -> u16;

    /// Halt the converter.
    fn stop(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Duty-cycle output (driven adapter: core → pump / fan)
// ───────────────────────────────────────────────────────────────

/// Actuation collaborator: one PWM-driven output.
pub trait DutyCycleOutput {
    /// Set the duty ratio.  Values outside `[0.0, 1.0]` are clamped.
    fn set_duty_cycle(&mut self, ratio: f32);

    /// Enable or disable the output stage.
    fn enable(&mut self, on: bool);

    fn disable(&mut self) {
        self.enable(false);
    }

    /// Currently configured (clamped) duty ratio.
    fn duty_cycle(&self) -> f32;

    fn is_enabled(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: core → logging / display)
// ───────────────────────────────────────────────────────────────

/// The service emits structured [`ClimateEvent`]s through this port.
/// Adapters decide where they go (serial log, display, telemetry).
pub trait EventSink {
    fn emit(&mut self, event: &ClimateEvent);
}
