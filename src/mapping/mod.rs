//! Binding file model and compiler
//!
//! The compiler reads the user's binding file into a table from gamepad signals
//! ([`GamepadInputSpec`]) to desktop actions ([`OutputAction`]) plus the global
//! calibration values used by the normalization code.

pub mod compiler;
pub mod error;
pub mod names;
pub mod types;

pub use compiler::{compile, BindingTable, CalibrationSettings, ParsedConfig, ScalingMode};
pub use error::{ConfigError, ConfigErrorKind};
pub use types::{
    GamepadButton, GamepadInputSpec, KeyCode, MouseButton, OutputAction, Side, StickAxis,
    WHEEL_DELTA,
};
