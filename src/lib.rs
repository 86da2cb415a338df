//! Greenhouse controller core.
//!
//! DMA-driven multi-channel ADC acquisition, rolling-window analog sensors,
//! a fixed-capacity sensor registry and the climate control loop.  Every
//! hardware touchpoint sits behind a port trait in [`app::ports`], so the
//! library is `no_std` on target and fully testable on the host.

#![cfg_attr(not(test), no_std)]
#![deny(unused_must_use)]

pub mod acquisition;
pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod ring_buffer;
pub mod sensors;
