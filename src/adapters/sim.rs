//! Host simulation adapters.
//!
//! In-memory stand-ins for the conversion engine, the one-shot converter,
//! a PWM channel and a delay provider.  They track state only, so the
//! whole acquisition and control pipeline runs on the host.

use core::convert::Infallible;
use core::sync::atomic::{AtomicU16, Ordering};

use embedded_hal::delay::DelayNs;
use embedded_hal::pwm::{ErrorType, SetDutyCycle};

use crate::acquisition::{ADC_MAX, CHANNELS};
use crate::app::ports::{ConversionEngine, OneShotConverter};
use crate::error::AdcError;

// ── Conversion engine ─────────────────────────────────────────

/// Scan engine that copies preset per-channel values into the transfer
/// slots when armed.
///
/// The completion interrupt is not simulated here; callers invoke the
/// manager's completion handler themselves.
pub struct SimConversionEngine<const N: usize = CHANNELS> {
    values: [u16; N],
    running: bool,
    fail_next_start: bool,
    starts: u32,
    stops: u32,
}

impl<const N: usize> SimConversionEngine<N> {
    pub const fn new(values: [u16; N]) -> Self {
        Self {
            values,
            running: false,
            fail_next_start: false,
            starts: 0,
            stops: 0,
        }
    }

    /// Value streamed for `channel` by the next scan, saturated at
    /// [`ADC_MAX`].  Unknown channels are ignored.
    pub fn set_channel(&mut self, channel: usize, raw: u16) {
        if let Some(v) = self.values.get_mut(channel) {
            *v = raw.min(ADC_MAX);
        }
    }

    /// Make the next `start` fail with [`AdcError::StartFailed`].
    pub fn fail_next_start(&mut self) {
        self.fail_next_start = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Successful starts so far.
    pub fn start_count(&self) -> u32 {
        self.starts
    }

    pub fn stop_count(&self) -> u32 {
        self.stops
    }
}

impl<const N: usize> ConversionEngine for SimConversionEngine<N> {
    fn start(&mut self, slots: &[AtomicU16]) -> Result<(), AdcError> {
        if core::mem::take(&mut self.fail_next_start) {
            return Err(AdcError::StartFailed);
        }
        for (slot, raw) in slots.iter().zip(self.values.iter()) {
            slot.store(*raw, Ordering::Relaxed);
        }
        self.running = true;
        self.starts += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AdcError> {
        self.running = false;
        self.stops += 1;
        Ok(())
    }
}

// ── One-shot converter ────────────────────────────────────────

/// Single-conversion converter that settles after a fixed number of
/// completion polls.
pub struct SimOneShot<const N: usize = CHANNELS> {
    values: [u16; N],
    selected: usize,
    settle_after: u32,
    polls: u32,
    running: bool,
}

impl<const N: usize> SimOneShot<N> {
    /// Settles on the first poll.
    pub const fn new(values: [u16; N]) -> Self {
        Self {
            values,
            selected: 0,
            settle_after: 0,
            polls: 0,
            running: false,
        }
    }

    /// Report "not complete" for the first `polls` completion checks.
    #[must_use]
    pub const fn settle_after(mut self, polls: u32) -> Self {
        self.settle_after = polls;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl<const N: usize> OneShotConverter for SimOneShot<N> {
    fn select_channel(&mut self, channel: u8) -> Result<(), AdcError> {
        let channel = usize::from(channel);
        if channel >= N {
            return Err(AdcError::ChannelConfigFailed);
        }
        self.selected = channel;
        Ok(())
    }

    fn start(&mut self) -> Result<(), AdcError> {
        self.polls = 0;
        self.running = true;
        Ok(())
    }

    fn is_complete(&mut self) -> bool {
        if !self.running {
            return false;
        }
        if self.polls >= self.settle_after {
            return true;
        }
        self.polls += 1;
        false
    }

    fn value(&mut self) -> u16 {
        self.values.get(self.selected).copied().unwrap_or(0)
    }

    fn stop(&mut self) {
        self.running = false;
    }
}

// ── Delay ─────────────────────────────────────────────────────

/// Delay provider that only accumulates the requested time.
#[derive(Debug, Default)]
pub struct SimDelay {
    elapsed_ns: u64,
}

impl SimDelay {
    pub const fn new() -> Self {
        Self { elapsed_ns: 0 }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}

// ── PWM ───────────────────────────────────────────────────────

/// PWM channel that records the last duty written.
#[derive(Debug)]
pub struct SimPwm {
    max_duty: u16,
    duty: u16,
}

impl SimPwm {
    pub const fn new(max_duty: u16) -> Self {
        Self { max_duty, duty: 0 }
    }

    /// Raw duty last written.
    pub fn duty(&self) -> u16 {
        self.duty
    }
}

impl ErrorType for SimPwm {
    type Error = Infallible;
}

impl SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max_duty
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty;
        Ok(())
    }
}
