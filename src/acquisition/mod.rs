//! Shared multi-channel ADC acquisition.
//!
//! The [`AcquisitionManager`] owns the conversion engine (converter + DMA
//! transfer) and the per-channel result slots the engine streams into.  A
//! scan completes in interrupt context, where the platform calls
//! [`AcquisitionManager::on_conversion_complete`]: it halts the engine and
//! raises the completion flag, nothing else.  The main loop polls the flag,
//! lets every sensor pull its channel, clears the flag and re-arms the scan.
//!
//! ```text
//! ┌──────────┐  DMA   ┌───────────────┐  channel_value  ┌──────────┐
//! │ ADC scan │──────▶ │ ChannelBuffer │ ──────────────▶ │ sensors  │
//! └──────────┘        └───────────────┘                 └──────────┘
//!      │ IRQ: stop + flag = true                 ▲
//!      └────────────▶ completion flag ───────────┘ main loop drains
//! ```
//!
//! ## Completion signalling
//!
//! The flag is a single-writer (IRQ) / single-reader (main loop) boolean.
//! It is level-triggered: several completions between two drains collapse
//! into one.  Only plain atomic loads and stores are used so the same code
//! runs on cores without compare-and-swap (Cortex-M0+).
//!
//! ## Lifecycle
//!
//! An `AcquisitionManager` only exists once its engine is bound, so the
//! "used before initialise" case cannot be expressed through it.  Firmware
//! that needs a process-wide instance reachable from the interrupt vector
//! keeps it in a `static` [`AcquisitionSlot`].

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::once_lock::OnceLock;
use log::debug;

use crate::app::ports::ConversionEngine;
use crate::error::{AdcError, Error, Result};

/// Number of regular channels in one scan.
pub const CHANNELS: usize = 2;

/// Converter resolution.
pub const SAMPLE_BITS: u32 = 12;

/// Mask applied to every value read back from the transfer buffer.
pub const SAMPLE_MASK: u16 = (1 << SAMPLE_BITS) - 1;

/// Full-scale raw reading.
pub const ADC_MAX: u16 = SAMPLE_MASK;

/// Converter reference voltage (V).
pub const V_REF: f32 = 3.3;

/// Unconverted converter reading, `0..=ADC_MAX`.
pub type RawSample = u16;

/// Anything a sensor can pull its latest raw sample from.
pub trait ChannelSource {
    /// Latest raw value for `channel`; `0` when the channel does not exist.
    fn channel_value(&self, channel: u8) -> RawSample;
}

// ── Transfer buffer ───────────────────────────────────────────

/// Per-channel result slots written by the transfer engine.
pub struct ChannelBuffer<const N: usize> {
    slots: [AtomicU16; N],
}

impl<const N: usize> ChannelBuffer<N> {
    pub const fn new() -> Self {
        Self {
            slots: [const { AtomicU16::new(0) }; N],
        }
    }

    /// Slots handed to the engine when a scan is armed.
    pub fn slots(&self) -> &[AtomicU16] {
        &self.slots
    }

    /// Unmasked content of slot `index`, if it exists.
    pub fn load(&self, index: usize) -> Option<u16> {
        self.slots.get(index).map(|s| s.load(Ordering::Relaxed))
    }
}

impl<const N: usize> Default for ChannelBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

// ── AcquisitionManager ────────────────────────────────────────

/// Owner of the shared conversion engine and its completion state.
pub struct AcquisitionManager<E, const N: usize = CHANNELS> {
    engine: Mutex<CriticalSectionRawMutex, RefCell<E>>,
    buffer: ChannelBuffer<N>,
    complete: AtomicBool,
}

impl<E: ConversionEngine, const N: usize> AcquisitionManager<E, N> {
    /// Bind the conversion engine.
    pub const fn new(engine: E) -> Self {
        Self {
            engine: Mutex::new(RefCell::new(engine)),
            buffer: ChannelBuffer::new(),
            complete: AtomicBool::new(false),
        }
    }

    /// Arm one multi-channel scan into the channel buffer.
    pub fn start(&self) -> core::result::Result<(), AdcError> {
        self.with_engine(|engine| engine.start(self.buffer.slots()))
    }

    /// Halt the in-flight scan.  Idempotent.
    pub fn stop(&self) -> core::result::Result<(), AdcError> {
        self.with_engine(ConversionEngine::stop)
    }

    /// Hardware-completion handler body.
    ///
    /// Called by the platform from the conversion-complete interrupt.  Halts
    /// the engine and raises the completion flag; no sensor work happens
    /// here.  A failing stop cannot be reported from interrupt context; the
    /// next `start` re-arms the engine regardless.
    pub fn on_conversion_complete(&self) {
        let _ = self.stop();
        self.set_completion_flag(true);
    }

    /// Run `f` with exclusive access to the engine (inside a critical
    /// section).
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut E) -> R) -> R {
        self.engine.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

impl<E, const N: usize> AcquisitionManager<E, N> {
    /// Latest buffered value for `channel`, masked to the sample width.
    ///
    /// Returns `0` for a channel outside the scan.  Callers cannot tell that
    /// apart from a genuine zero reading.
    pub fn channel_value(&self, channel: u8) -> RawSample {
        self.buffer
            .load(usize::from(channel))
            .map_or(0, |raw| raw & SAMPLE_MASK)
    }

    pub fn completion_flag(&self) -> bool {
        self.complete.load(Ordering::Acquire)
    }

    pub fn set_completion_flag(&self, flag: bool) {
        self.complete.store(flag, Ordering::Release);
    }

    /// Read and clear the completion flag.
    ///
    /// Load and store are separate single-word accesses.  The engine stays
    /// halted until the consumer re-arms it, so the interrupt cannot raise
    /// the flag again in between.
    pub fn take_completion(&self) -> bool {
        let complete = self.completion_flag();
        if complete {
            self.set_completion_flag(false);
        }
        complete
    }

    pub const fn channel_count(&self) -> usize {
        N
    }
}

impl<E, const N: usize> ChannelSource for AcquisitionManager<E, N> {
    fn channel_value(&self, channel: u8) -> RawSample {
        AcquisitionManager::channel_value(self, channel)
    }
}

// ── Process-wide slot ─────────────────────────────────────────

/// Lazily-initialised, never-destroyed home for the process-wide
/// [`AcquisitionManager`].
///
/// ```ignore
/// static ACQUISITION: AcquisitionSlot<Stm32Scan> = AcquisitionSlot::new();
///
/// #[interrupt]
/// fn DMA1_CHANNEL1() {
///     ACQUISITION.on_conversion_complete();
/// }
/// ```
pub struct AcquisitionSlot<E, const N: usize = CHANNELS> {
    cell: OnceLock<AcquisitionManager<E, N>>,
}

impl<E: ConversionEngine, const N: usize> AcquisitionSlot<E, N> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Bind the engine.  Must run exactly once, before any sensor is built.
    pub fn initialize(&self, engine: E) -> Result<&AcquisitionManager<E, N>> {
        self.cell
            .init(AcquisitionManager::new(engine))
            .map_err(|_| Error::Init("acquisition manager already initialized"))?;
        debug!("acquisition: engine bound ({} channels)", N);
        self.cell
            .try_get()
            .ok_or(Error::Init("acquisition manager not initialized"))
    }

    /// The bound manager.
    ///
    /// # Panics
    ///
    /// Using the acquisition hardware before [`initialize`](Self::initialize)
    /// is unrecoverable: there is no engine to drive.
    pub fn instance(&self) -> &AcquisitionManager<E, N> {
        match self.cell.try_get() {
            Some(manager) => manager,
            None => panic!("acquisition manager used before initialize"),
        }
    }

    pub fn try_instance(&self) -> Option<&AcquisitionManager<E, N>> {
        self.cell.try_get()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.try_get().is_some()
    }

    /// Interrupt entry point.  A completion that fires before the engine is
    /// bound is ignored.
    pub fn on_conversion_complete(&self) {
        if let Some(manager) = self.cell.try_get() {
            manager.on_conversion_complete();
        }
    }
}

impl<E: ConversionEngine, const N: usize> Default for AcquisitionSlot<E, N> {
    fn default() -> Self {
        Self::new()
    }
}
