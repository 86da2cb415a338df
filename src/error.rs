//! Unified error types for the greenhouse controller.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level control loop's error handling uniform.  All variants are `Copy`
//! so they can be passed through the control service and event sink without
//! allocation.
//!
//! Hardware-layer failures stay as [`AdcError`] status codes at the point of
//! the hardware call.  Sensors never wrap them: whether a sensor produced
//! usable data is reported through its own validity flag instead.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The analog front end (scan engine or one-shot converter) failed.
    Adc(AdcError),
    /// A sensor registry rejected an operation.
    Registry(RegistryError),
    /// Process-wide state was initialised twice or used before init.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adc(e) => write!(f, "adc: {e}"),
            Self::Registry(e) => write!(f, "registry: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// ADC status codes
// ---------------------------------------------------------------------------

/// Status of a conversion-engine or one-shot converter call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcError {
    /// The conversion (or its transfer) could not be armed.
    StartFailed,
    /// The in-flight conversion could not be halted.
    StopFailed,
    /// The converter refused the channel selection.
    ChannelConfigFailed,
    /// The one-shot conversion did not settle before the timeout.
    Timeout,
}

impl fmt::Display for AdcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartFailed => write!(f, "conversion start failed"),
            Self::StopFailed => write!(f, "conversion stop failed"),
            Self::ChannelConfigFailed => write!(f, "channel configuration failed"),
            Self::Timeout => write!(f, "conversion timed out"),
        }
    }
}

impl core::error::Error for AdcError {}

impl From<AdcError> for Error {
    fn from(e: AdcError) -> Self {
        Self::Adc(e)
    }
}

// ---------------------------------------------------------------------------
// Registry errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// Every slot of the registry is already populated.
    Full,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "no free sensor slot"),
        }
    }
}

impl core::error::Error for RegistryError {}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
