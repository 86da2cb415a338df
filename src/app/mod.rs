//! Application core.
//!
//! The per-tick control loop: drain a completed scan into the sensors,
//! fuse the readings, drive the outputs, re-arm the scan.  Hardware is
//! reached only through the [`ports`] traits.

pub mod events;
pub mod ports;
pub mod service;
