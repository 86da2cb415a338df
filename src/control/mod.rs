//! Actuation rules mapping fused readings to output commands.

pub mod climate;
