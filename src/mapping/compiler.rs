//! Binding compiler
//!
//! Turns the line-oriented binding file into a [`ParsedConfig`]. Each significant
//! line is `LHS = RHS` and is read either as a binding (gamepad signal on the left,
//! keyboard or mouse action on the right) or as a constant assignment.
//!
//! ```text
//! # comment
//! a            = space
//! left_trigger = lmb
//! rthumb_y     = scroll_up
//! deadzone     = 0.3
//! ```

use crate::mapping::error::{BindingError, ConfigError, ConfigErrorKind, ConstantError};
use crate::mapping::names;
use crate::mapping::types::{GamepadInputSpec, OutputAction, WHEEL_DELTA};
use serde::{Deserialize, Serialize};
use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};

pub const DEFAULT_THUMBSTICK_DEAD_ZONE: f64 = 0.25;
pub const DEFAULT_TRIGGER_THRESHOLD: f64 = 0.1;
pub const DEFAULT_MOUSE_SENSITIVITY: f64 = 1.0;

/// Response curve for thumbstick values
///
/// Parsed and stored, not applied by the normalization code yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScalingMode {
    Constant,
    #[default]
    Linear,
    Squared,
    Cubed,
}

impl fmt::Display for ScalingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalingMode::Constant => write!(f, "Constant"),
            ScalingMode::Linear => write!(f, "Linear"),
            ScalingMode::Squared => write!(f, "Squared"),
            ScalingMode::Cubed => write!(f, "Cubed"),
        }
    }
}

/// Global calibration values assigned by constant lines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSettings {
    pub thumbstick_scaling: ScalingMode,
    /// Always > 0
    pub mouse_sensitivity: f64,
    /// Fraction of full deflection, in [0, 1]
    pub thumbstick_dead_zone: f64,
    /// Fraction of full travel, in [0, 1]
    pub trigger_threshold: f64,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            thumbstick_scaling: ScalingMode::Linear,
            mouse_sensitivity: DEFAULT_MOUSE_SENSITIVITY,
            thumbstick_dead_zone: DEFAULT_THUMBSTICK_DEAD_ZONE,
            trigger_threshold: DEFAULT_TRIGGER_THRESHOLD,
        }
    }
}

/// Gamepad signal to output action, one action per signal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingTable {
    entries: HashMap<GamepadInputSpec, OutputAction>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `input` to `action` and returns the action it replaced, if any
    pub fn insert(&mut self, input: GamepadInputSpec, action: OutputAction) -> Option<OutputAction> {
        self.entries.insert(input, action)
    }

    pub fn get(&self, input: &GamepadInputSpec) -> Option<&OutputAction> {
        self.entries.get(input)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, GamepadInputSpec, OutputAction> {
        self.entries.iter()
    }

    fn apply_sensitivity(&mut self, sensitivity: f64) {
        for action in self.entries.values_mut() {
            *action = action.scaled(sensitivity);
        }
    }
}

impl<'a> IntoIterator for &'a BindingTable {
    type Item = (&'a GamepadInputSpec, &'a OutputAction);
    type IntoIter = hash_map::Iter<'a, GamepadInputSpec, OutputAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Output of a successful compile. Read-only for the rest of the process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedConfig {
    pub bindings: BindingTable,
    pub calibration: CalibrationSettings,
}

/// Compiles binding file contents, stopping at the first bad line
pub fn compile(contents: &str) -> Result<ParsedConfig, ConfigError> {
    let mut config = ParsedConfig::default();
    let contents = contents.replace("\r\n", "\n");

    for (index, raw_line) in contents.split('\n').enumerate() {
        let line_number = index + 1;
        compile_line(&mut config, raw_line)
            .map_err(|kind| ConfigError::new(line_number, kind))?;
    }

    let sensitivity = config.calibration.mouse_sensitivity;
    config.bindings.apply_sensitivity(sensitivity);

    info!(
        "Compiled {} bindings (dead zone {}, threshold {}, sensitivity {}, scaling {})",
        config.bindings.len(),
        config.calibration.thumbstick_dead_zone,
        config.calibration.trigger_threshold,
        config.calibration.mouse_sensitivity,
        config.calibration.thumbstick_scaling
    );
    Ok(config)
}

fn compile_line(config: &mut ParsedConfig, raw_line: &str) -> Result<(), ConfigErrorKind> {
    let line = match raw_line.split_once('#') {
        Some((before, _comment)) => before,
        None => raw_line,
    };
    let line = line.trim();
    if line.is_empty() {
        return Ok(());
    }
    let line = line.to_uppercase().replace('_', "");

    let mut sides = line.split('=');
    let (lhs, rhs) = match (sides.next(), sides.next(), sides.next()) {
        (Some(lhs), Some(rhs), None) => (lhs.trim(), rhs.trim()),
        _ => return Err(ConfigErrorKind::EqualsCount),
    };
    if lhs.is_empty() {
        return Err(ConfigErrorKind::EmptyLeftSide);
    }
    if rhs.is_empty() {
        return Err(ConfigErrorKind::EmptyRightSide);
    }

    let binding_err = match parse_binding(lhs, rhs) {
        Ok((input, action)) => {
            debug!("Binding {} -> {}", input, action);
            if let Some(previous) = config.bindings.insert(input, action) {
                warn!("{} was bound to {}, now bound to {}", input, previous, action);
            }
            return Ok(());
        }
        Err(BindingError::Unsupported(name)) => {
            return Err(ConfigErrorKind::Unsupported(name));
        }
        Err(e) => e,
    };

    match apply_constant(&mut config.calibration, lhs, rhs) {
        Ok(()) => Ok(()),
        Err(constant_err) => {
            // Without knowing what the user meant, neither message is better than the other
            debug!(
                "Line rejected: as binding: {}, as constant: {}",
                binding_err, constant_err
            );
            Err(ConfigErrorKind::Unrecognized)
        }
    }
}

fn parse_binding(lhs: &str, rhs: &str) -> Result<(GamepadInputSpec, OutputAction), BindingError> {
    let input = names::gamepad_signal(lhs).ok_or(BindingError::NotAGamepadInput)?;
    let action = parse_action(rhs)?;
    Ok((input, action))
}

fn parse_action(rhs: &str) -> Result<OutputAction, BindingError> {
    if let Some(key) = names::keyboard_key(rhs) {
        return Ok(OutputAction::KeyPress(key));
    }
    if let Some(button) = names::mouse_button(rhs) {
        return Ok(OutputAction::MouseButtonPress(button));
    }

    let action = match rhs {
        "SCROLLUP" => OutputAction::Scroll(WHEEL_DELTA),
        "SCROLLDOWN" => OutputAction::Scroll(-WHEEL_DELTA),
        "MOUSEUP" => OutputAction::mouse_step(0, -1),
        "MOUSEDOWN" => OutputAction::mouse_step(0, 1),
        "MOUSELEFT" => OutputAction::mouse_step(-1, 0),
        "MOUSERIGHT" => OutputAction::mouse_step(1, 0),
        "MOUSEX" | "MOUSEY" => return Err(BindingError::Unsupported(rhs.to_string())),
        _ => {
            return names::raw_key_code(rhs)
                .map(OutputAction::KeyPress)
                .ok_or(BindingError::NotAnOutput)
        }
    };
    Ok(action)
}

fn apply_constant(
    calibration: &mut CalibrationSettings,
    lhs: &str,
    rhs: &str,
) -> Result<(), ConstantError> {
    match lhs {
        "DEADZONE" => {
            calibration.thumbstick_dead_zone = parse_fraction("DEADZONE", rhs)?;
            info!("Thumbstick dead zone set to {}", calibration.thumbstick_dead_zone);
        }
        "THRESHOLD" => {
            calibration.trigger_threshold = parse_fraction("THRESHOLD", rhs)?;
            info!("Trigger threshold set to {}", calibration.trigger_threshold);
        }
        "MOUSESENSITIVITY" => {
            let value = parse_number(rhs)?;
            if !(value.is_finite() && value > 0.0) {
                return Err(ConstantError::OutOfRange {
                    name: "MOUSESENSITIVITY",
                    expected: "a positive number",
                    value,
                });
            }
            calibration.mouse_sensitivity = value;
            info!("Mouse sensitivity set to {}", value);
        }
        "STICKSCALING" => {
            calibration.thumbstick_scaling = match rhs {
                "CONSTANT" => ScalingMode::Constant,
                "LINEAR" => ScalingMode::Linear,
                "SQUARED" => ScalingMode::Squared,
                "CUBED" => ScalingMode::Cubed,
                _ => return Err(ConstantError::UnknownScalingMode),
            };
            if calibration.thumbstick_scaling != ScalingMode::Linear {
                warn!(
                    "Stick scaling {} is stored but not applied to thumbstick values",
                    calibration.thumbstick_scaling
                );
            }
        }
        _ => return Err(ConstantError::UnknownConstant),
    }
    Ok(())
}

fn parse_number(rhs: &str) -> Result<f64, ConstantError> {
    rhs.parse::<f64>().map_err(|_| ConstantError::NotANumber)
}

fn parse_fraction(name: &'static str, rhs: &str) -> Result<f64, ConstantError> {
    let value = parse_number(rhs)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ConstantError::OutOfRange {
            name,
            expected: "between 0 and 1",
            value,
        });
    }
    Ok(value)
}
