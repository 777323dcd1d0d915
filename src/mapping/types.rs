//! Input and output model for the binding table
//!
//! A [`GamepadInputSpec`] names one scalar signal on the pad, an [`OutputAction`]
//! names one effect to synthesize on the desktop. Both are plain value types so the
//! binding table can key on content instead of identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upward scroll distance of one wheel notch
pub const WHEEL_DELTA: i32 = 120;

// Digital buttons with their bit in the report's button mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamepadButton {
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    Start,
    Back,
    LeftThumb,
    RightThumb,
    LeftShoulder,
    RightShoulder,
    A,
    B,
    X,
    Y,
}

impl GamepadButton {
    pub const ALL: [GamepadButton; 14] = [
        GamepadButton::DPadUp,
        GamepadButton::DPadDown,
        GamepadButton::DPadLeft,
        GamepadButton::DPadRight,
        GamepadButton::Start,
        GamepadButton::Back,
        GamepadButton::LeftThumb,
        GamepadButton::RightThumb,
        GamepadButton::LeftShoulder,
        GamepadButton::RightShoulder,
        GamepadButton::A,
        GamepadButton::B,
        GamepadButton::X,
        GamepadButton::Y,
    ];

    /// Bit of this button inside [`DeviceState::buttons`](crate::controller::DeviceState)
    pub const fn mask(self) -> u16 {
        match self {
            GamepadButton::DPadUp => 0x0001,
            GamepadButton::DPadDown => 0x0002,
            GamepadButton::DPadLeft => 0x0004,
            GamepadButton::DPadRight => 0x0008,
            GamepadButton::Start => 0x0010,
            GamepadButton::Back => 0x0020,
            GamepadButton::LeftThumb => 0x0040,
            GamepadButton::RightThumb => 0x0080,
            GamepadButton::LeftShoulder => 0x0100,
            GamepadButton::RightShoulder => 0x0200,
            GamepadButton::A => 0x1000,
            GamepadButton::B => 0x2000,
            GamepadButton::X => 0x4000,
            GamepadButton::Y => 0x8000,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GamepadButton::DPadUp => "DPadUp",
            GamepadButton::DPadDown => "DPadDown",
            GamepadButton::DPadLeft => "DPadLeft",
            GamepadButton::DPadRight => "DPadRight",
            GamepadButton::Start => "Start",
            GamepadButton::Back => "Back",
            GamepadButton::LeftThumb => "LeftThumb",
            GamepadButton::RightThumb => "RightThumb",
            GamepadButton::LeftShoulder => "LeftShoulder",
            GamepadButton::RightShoulder => "RightShoulder",
            GamepadButton::A => "A",
            GamepadButton::B => "B",
            GamepadButton::X => "X",
            GamepadButton::Y => "Y",
        }
    }

    /// All buttons whose bit is set in `mask`, in table order
    pub fn pressed_in(mask: u16) -> impl Iterator<Item = GamepadButton> {
        Self::ALL
            .into_iter()
            .filter(move |button| mask & button.mask() != 0)
    }
}

// Which trigger or thumbstick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

// Thumbstick axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StickAxis {
    X,
    Y,
}

/// One physical signal on the gamepad
///
/// Equality and hashing are structural: two specs parsed from different lines
/// that name the same signal are the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamepadInputSpec {
    Button(GamepadButton),
    Trigger(Side),
    Thumbstick(Side, StickAxis),
}

impl fmt::Display for GamepadInputSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamepadInputSpec::Button(button) => write!(f, "button {}", button.name()),
            GamepadInputSpec::Trigger(side) => write!(f, "{:?} trigger", side),
            GamepadInputSpec::Thumbstick(side, axis) => {
                write!(f, "{:?} thumbstick {:?}", side, axis)
            }
        }
    }
}

/// Windows virtual-key code of a keyboard key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub u16);

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    X1,
    X2,
}

/// One effect the output sink knows how to synthesize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputAction {
    KeyPress(KeyCode),
    MouseButtonPress(MouseButton),
    /// Relative cursor movement; `scalable` moves are multiplied by the mouse sensitivity
    MouseMove { dx: i32, dy: i32, scalable: bool },
    /// Wheel movement, positive is away from the user
    Scroll(i32),
}

impl OutputAction {
    /// Unit cursor step that the sensitivity post-pass will scale
    pub const fn mouse_step(dx: i32, dy: i32) -> Self {
        OutputAction::MouseMove {
            dx,
            dy,
            scalable: true,
        }
    }

    /// Multiplies a scalable move by `sensitivity`, truncating toward zero.
    /// Every other action is returned unchanged.
    pub fn scaled(self, sensitivity: f64) -> Self {
        match self {
            OutputAction::MouseMove {
                dx,
                dy,
                scalable: true,
            } => OutputAction::MouseMove {
                dx: (f64::from(dx) * sensitivity) as i32,
                dy: (f64::from(dy) * sensitivity) as i32,
                scalable: true,
            },
            other => other,
        }
    }
}

impl fmt::Display for OutputAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputAction::KeyPress(code) => write!(f, "key {}", code),
            OutputAction::MouseButtonPress(button) => write!(f, "mouse button {:?}", button),
            OutputAction::MouseMove { dx, dy, .. } => write!(f, "mouse move ({}, {})", dx, dy),
            OutputAction::Scroll(amount) => write!(f, "scroll {}", amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equal_specs_hash_once() {
        let mut seen = HashSet::new();
        seen.insert(GamepadInputSpec::Thumbstick(Side::Left, StickAxis::X));
        seen.insert(GamepadInputSpec::Thumbstick(Side::Left, StickAxis::X));
        seen.insert(GamepadInputSpec::Thumbstick(Side::Left, StickAxis::Y));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_button_masks_are_distinct_bits() {
        let mut combined = 0u16;
        for button in GamepadButton::ALL {
            assert_eq!(button.mask().count_ones(), 1);
            assert_eq!(combined & button.mask(), 0);
            combined |= button.mask();
        }
    }

    #[test]
    fn test_pressed_in_lists_set_bits() {
        let mask = GamepadButton::A.mask() | GamepadButton::DPadLeft.mask();
        let pressed: Vec<_> = GamepadButton::pressed_in(mask).collect();
        assert_eq!(pressed, vec![GamepadButton::DPadLeft, GamepadButton::A]);
    }

    #[test]
    fn test_scaled_only_touches_scalable_moves() {
        let up = OutputAction::mouse_step(0, -1).scaled(2.0);
        assert_eq!(
            up,
            OutputAction::MouseMove {
                dx: 0,
                dy: -2,
                scalable: true
            }
        );

        let fixed = OutputAction::MouseMove {
            dx: 3,
            dy: 0,
            scalable: false,
        };
        assert_eq!(fixed.scaled(10.0), fixed);
        assert_eq!(
            OutputAction::Scroll(WHEEL_DELTA).scaled(3.0),
            OutputAction::Scroll(WHEEL_DELTA)
        );
    }

    #[test]
    fn test_scaled_truncates_toward_zero() {
        let left = OutputAction::mouse_step(-1, 0).scaled(1.5);
        assert_eq!(
            left,
            OutputAction::MouseMove {
                dx: -1,
                dy: 0,
                scalable: true
            }
        );
    }
}
