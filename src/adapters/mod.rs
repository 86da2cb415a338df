//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                                 | Connects to         |
//! |------------|--------------------------------------------|---------------------|
//! | `log_sink` | EventSink                                  | `log` facade        |
//! | `sim`      | ConversionEngine, OneShotConverter,        | in-memory state     |
//! |            | `SetDutyCycle`, `DelayNs`                  |                     |

pub mod log_sink;
pub mod sim;
