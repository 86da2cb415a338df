//! Climate control service: the hexagonal core.
//!
//! [`ClimateService`] owns the actuation policy and the loop bookkeeping.
//! Everything it touches is injected per call: the acquisition manager,
//! the sensor manager, the two outputs and the event sink.
//!
//! ```text
//!  AcquisitionManager ──flag──▶ ┌───────────────────┐ ──▶ EventSink
//!                               │  ClimateService   │
//!  SensorManager ──snapshot───▶ │  ClimatePolicy    │ ──▶ fan / pump
//!                               └───────────────────┘
//! ```
//!
//! One tick:
//!
//! 1. No completion pending: nothing to do.
//! 2. `update_all` pulls every channel into the sensor windows.
//! 3. Clear the completion flag, fuse a snapshot, evaluate the policy.
//! 4. Apply fan and pump commands.
//! 5. Re-arm the next scan.  A failed re-arm is reported and retried on the
//!    following tick.

use log::{info, warn};

use crate::acquisition::AcquisitionManager;
use crate::config::SystemConfig;
use crate::control::climate::{ActuatorCommands, ClimatePolicy, OutputCommand};
use crate::error::AdcError;
use crate::sensors::manager::{ClimateSnapshot, SensorManager};

use super::events::ClimateEvent;
use super::ports::{ConversionEngine, DutyCycleOutput, EventSink};

/// The two driven outputs.
pub struct ClimateOutputs<F, P> {
    pub fan: F,
    pub pump: P,
}

impl<F: DutyCycleOutput, P: DutyCycleOutput> ClimateOutputs<F, P> {
    pub fn new(fan: F, pump: P) -> Self {
        Self { fan, pump }
    }

    pub fn apply(&mut self, cmds: &ActuatorCommands) {
        apply_output(&mut self.fan, cmds.fan);
        apply_output(&mut self.pump, cmds.pump);
    }

    pub fn all_off(&mut self) {
        self.fan.disable();
        self.pump.disable();
    }
}

fn apply_output(out: &mut impl DutyCycleOutput, cmd: OutputCommand) {
    out.set_duty_cycle(cmd.duty);
    out.enable(cmd.enabled);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No completed scan to drain.
    Waiting,
    /// A scan was drained; carries the fused readings.
    Cycle(ClimateSnapshot),
}

pub struct ClimateService {
    policy: ClimatePolicy,
    cycle: u64,
    running: bool,
    armed: bool,
    last_commands: Option<ActuatorCommands>,
}

impl ClimateService {
    /// Does **not** arm acquisition; call [`start`](Self::start) next.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            policy: ClimatePolicy::new(config),
            cycle: 0,
            running: false,
            armed: false,
            last_commands: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Arm the first conversion scan.
    pub fn start<E: ConversionEngine, const N: usize>(
        &mut self,
        acq: &AcquisitionManager<E, N>,
        sink: &mut impl EventSink,
    ) -> Result<(), AdcError> {
        self.arm(acq, sink)?;
        self.running = true;
        sink.emit(&ClimateEvent::Started);
        info!("climate service started");
        Ok(())
    }

    /// Halt acquisition and switch both outputs off.  Later ticks are
    /// no-ops until the next [`start`](Self::start).
    pub fn shutdown<E, F, P, const N: usize>(
        &mut self,
        acq: &AcquisitionManager<E, N>,
        outputs: &mut ClimateOutputs<F, P>,
        sink: &mut impl EventSink,
    ) where
        E: ConversionEngine,
        F: DutyCycleOutput,
        P: DutyCycleOutput,
    {
        outputs.all_off();
        self.running = false;
        self.armed = false;
        if let Err(e) = acq.stop() {
            warn!("climate: stop failed: {}", e);
            sink.emit(&ClimateEvent::AcquisitionFault(e));
        }
        info!("climate service stopped after {} cycles", self.cycle);
    }

    // ── Per-tick orchestration ────────────────────────────────

    pub fn tick<E, F, P, const N: usize>(
        &mut self,
        acq: &AcquisitionManager<E, N>,
        sensors: &mut SensorManager<'_>,
        outputs: &mut ClimateOutputs<F, P>,
        sink: &mut impl EventSink,
    ) -> TickOutcome
    where
        E: ConversionEngine,
        F: DutyCycleOutput,
        P: DutyCycleOutput,
    {
        if !self.running {
            return TickOutcome::Waiting;
        }
        if !self.armed {
            // Previous re-arm failed; no scan is in flight.
            let _ = self.arm(acq, sink);
            return TickOutcome::Waiting;
        }
        if !acq.completion_flag() {
            return TickOutcome::Waiting;
        }

        sensors.update_all();
        acq.set_completion_flag(false);
        self.cycle += 1;

        let snapshot = sensors.snapshot();
        let cmds = self.policy.evaluate(&snapshot);
        outputs.apply(&cmds);
        if self.last_commands != Some(cmds) {
            self.last_commands = Some(cmds);
            sink.emit(&ClimateEvent::OutputsChanged(cmds));
        }
        sink.emit(&ClimateEvent::CycleCompleted {
            cycle: self.cycle,
            snapshot,
        });

        let _ = self.arm(acq, sink);
        TickOutcome::Cycle(snapshot)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Completed cycles since start.
    pub fn cycle_count(&self) -> u64 {
        self.cycle
    }

    /// Between a successful `start` and `shutdown`.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a scan is currently in flight.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn last_commands(&self) -> Option<ActuatorCommands> {
        self.last_commands
    }

    // ── Internal ──────────────────────────────────────────────

    fn arm<E: ConversionEngine, const N: usize>(
        &mut self,
        acq: &AcquisitionManager<E, N>,
        sink: &mut impl EventSink,
    ) -> Result<(), AdcError> {
        match acq.start() {
            Ok(()) => {
                self.armed = true;
                Ok(())
            }
            Err(e) => {
                self.armed = false;
                warn!("climate: arming scan failed: {}", e);
                sink.emit(&ClimateEvent::AcquisitionFault(e));
                Err(e)
            }
        }
    }
}
