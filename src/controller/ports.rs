//! Seams between the poll loop and the platform
//!
//! The loop never talks to hardware or synthesizes input itself. It asks a
//! [`DeviceStateSource`] for the current report and hands bound actions to an
//! [`ActionSink`].

use crate::controller::device_state::DeviceState;
use crate::mapping::OutputAction;

/// Failure of the platform query itself
///
/// A missing device is not an error, it is `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum DeviceQueryError {
    #[error("Failed to initialize device backend: {0}")]
    InitializationError(String),

    #[error("Invalid device slot {0}")]
    InvalidSlot(usize),

    #[error("Unexpected device status: {0}")]
    UnexpectedStatus(String),
}

/// Reads the current report of one device slot
pub trait DeviceStateSource: Send {
    /// `Ok(None)` when nothing is connected in `slot`
    fn query(&mut self, slot: usize) -> Result<Option<DeviceState>, DeviceQueryError>;
}

/// Receives bound actions and connection notifications
pub trait ActionSink: Send {
    /// Fire-and-forget
    fn synthesize(&mut self, action: &OutputAction);

    /// Called once when `slot` goes from disconnected to connected
    fn on_connect(&mut self, _slot: usize) {}

    /// Called once when `slot` goes from connected to disconnected
    fn on_disconnect(&mut self, _slot: usize) {}

    /// Called on every connected tick, changed or not
    fn on_poll(&mut self, _slot: usize, _state: &DeviceState) {}
}
