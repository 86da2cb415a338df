//! Output-stage drivers.

pub mod pwm;
