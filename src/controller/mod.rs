//! Device side of the remapper
//!
//! Turns device reports into output actions:
//!
//! 1. [`normalize`] - Raw trigger and thumbstick magnitudes to calibrated values
//! 2. [`device_state`] - One report and the per-signal values derived from it
//! 3. [`poller`] - Poll/dispatch loop and its task handle
//!
//! # Architecture
//!
//! ```text
//! DeviceStateSource ──► PollLoop ──► ActionSink
//!   (report/tick)      (normalize,    (key, mouse,
//!                       compare,       scroll)
//!                       dispatch)
//! ```
//!
//! [`ports`] defines the two platform seams; [`sink::TracingSink`] and, with the
//! `gilrs-backend` feature, `gilrs_source::GilrsSource` are the bundled adapters.

pub mod device_state;
#[cfg(feature = "gilrs-backend")]
pub mod gilrs_source;
pub mod normalize;
pub mod poller;
pub mod ports;
pub mod sink;

pub use device_state::DeviceState;
#[cfg(feature = "gilrs-backend")]
pub use gilrs_source::GilrsSource;
pub use normalize::Normalizer;
pub use poller::{ConnectionState, PollError, PollLoop, PollSettings, PollStats, PollerHandle, TickOutcome};
pub use ports::{ActionSink, DeviceQueryError, DeviceStateSource};
pub use sink::TracingSink;
