//! PWM-driven output stage (pump or fan).
//!
//! Wraps any `embedded_hal::pwm::SetDutyCycle` channel.  The duty ratio is
//! cached so it survives a disable/enable cycle; the hardware sees
//! `ratio × max_duty` while enabled and 0 while disabled.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::DutyCycleOutput;
use crate::control::climate::clamp_ratio;

pub struct PwmOutput<P> {
    pwm: P,
    name: &'static str,
    ratio: f32,
    enabled: bool,
}

impl<P: SetDutyCycle> PwmOutput<P> {
    /// Starts disabled at 0 % duty.
    pub fn new(name: &'static str, pwm: P) -> Self {
        let mut output = Self {
            pwm,
            name,
            ratio: 0.0,
            enabled: false,
        };
        output.write_hw();
        output
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn inner(&self) -> &P {
        &self.pwm
    }

    fn write_hw(&mut self) {
        let duty = if self.enabled {
            let max = f32::from(self.pwm.max_duty_cycle());
            // Ratio is in [0, 1], so the product fits in u16.
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let raw = (self.ratio * max + 0.5) as u16;
            raw.min(self.pwm.max_duty_cycle())
        } else {
            0
        };
        if let Err(e) = self.pwm.set_duty_cycle(duty) {
            warn!("{}: PWM write failed: {:?}", self.name, e);
        }
    }
}

impl<P: SetDutyCycle> DutyCycleOutput for PwmOutput<P> {
    fn set_duty_cycle(&mut self, ratio: f32) {
        self.ratio = clamp_ratio(ratio);
        self.write_hw();
    }

    fn enable(&mut self, on: bool) {
        self.enabled = on;
        self.write_hw();
    }

    fn duty_cycle(&self) -> f32 {
        self.ratio
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
