//! Fixed-capacity sensor arena with index-stable handles.
//!
//! Sensors are appended to the first free slot and never removed, so a
//! [`SensorHandle`] stays valid for the life of the registry.  A full
//! registry rejects the subscription with [`RegistryError::Full`].
//!
//! Dispatch applies one [`Operation`] to a [`Target`]:
//!
//! | Target                 | Effect                                       |
//! |------------------------|----------------------------------------------|
//! | `All`                  | every occupied slot, in subscription order   |
//! | `Slot(i)`, `i < N`     | slot `i` if occupied, otherwise nothing      |
//! | `Slot(i)`, `i >= N`    | treated as `All`                             |

use heapless::Vec;
use log::{debug, warn};

use crate::error::RegistryError;

use super::Sensor;

/// Slots per sensor kind.
pub const MAX_SENSORS: usize = 5;

/// Index of a subscribed sensor within its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SensorHandle(usize);

impl SensorHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which slots a dispatch touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    All,
    Slot(usize),
}

impl From<SensorHandle> for Target {
    fn from(handle: SensorHandle) -> Self {
        Target::Slot(handle.0)
    }
}

/// Operation applied by [`SensorRegistry::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Pull one raw sample.
    Read,
    /// Recompute average, engineering value and validity.
    Process,
    /// `Read` then `Process`.
    Update,
}

pub struct SensorRegistry<S, const N: usize = MAX_SENSORS> {
    slots: Vec<S, N>,
}

impl<S: Sensor, const N: usize> SensorRegistry<S, N> {
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Place `sensor` in the first free slot.
    pub fn subscribe(&mut self, sensor: S) -> Result<SensorHandle, RegistryError> {
        let index = self.slots.len();
        if self.slots.push(sensor).is_err() {
            warn!("registry: full ({} slots), subscription rejected", N);
            return Err(RegistryError::Full);
        }
        debug!("registry: sensor subscribed in slot {}", index);
        Ok(SensorHandle(index))
    }

    /// Apply `op` to `target`.  Returns how many sensors were touched.
    ///
    /// Read failures are logged and do not stop the broadcast; the sensor's
    /// validity flag is left to carry the outcome.
    pub fn dispatch(&mut self, op: Operation, target: Target) -> usize {
        match target {
            Target::Slot(index) if index < N => match self.slots.get_mut(index) {
                Some(sensor) => {
                    apply(sensor, op, index);
                    1
                }
                None => 0,
            },
            // Out-of-range slot ids broadcast.
            Target::Slot(_) | Target::All => {
                for (index, sensor) in self.slots.iter_mut().enumerate() {
                    apply(sensor, op, index);
                }
                self.slots.len()
            }
        }
    }

    pub fn get(&self, handle: SensorHandle) -> Option<&S> {
        self.slots.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: SensorHandle) -> Option<&mut S> {
        self.slots.get_mut(handle.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<S: Sensor, const N: usize> Default for SensorRegistry<S, N> {
    fn default() -> Self {
        Self::new()
    }
}

fn apply<S: Sensor>(sensor: &mut S, op: Operation, index: usize) {
    match op {
        Operation::Read => read(sensor, index),
        Operation::Process => sensor.process_data(),
        Operation::Update => {
            read(sensor, index);
            sensor.process_data();
        }
    }
}

fn read<S: Sensor>(sensor: &mut S, index: usize) {
    if let Err(e) = sensor.read_data() {
        warn!("registry: slot {} read failed: {}", index, e);
    }
}
