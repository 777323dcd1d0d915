//! Name tables for the binding file
//!
//! Every lookup expects a name that has already been uppercased and stripped of
//! underscores, so `left_trigger` arrives here as `LEFTTRIGGER`.

use crate::mapping::types::{GamepadButton, GamepadInputSpec, KeyCode, MouseButton, Side, StickAxis};

/// Resolves the left hand side of a binding line to a gamepad signal
pub fn gamepad_signal(name: &str) -> Option<GamepadInputSpec> {
    if let Some(button) = gamepad_button(name) {
        return Some(GamepadInputSpec::Button(button));
    }

    let spec = match name {
        "LTRIGGER" | "LEFTTRIGGER" => GamepadInputSpec::Trigger(Side::Left),
        "RTRIGGER" | "RIGHTTRIGGER" => GamepadInputSpec::Trigger(Side::Right),

        "LTHUMBX" | "LEFTTHUMBX" | "LEFTTHUMBSTICKX" | "LEFTSTICKX" | "LSTICKX"
        | "LTHUMBSTICKX" => GamepadInputSpec::Thumbstick(Side::Left, StickAxis::X),
        "LTHUMBY" | "LEFTTHUMBY" | "LEFTTHUMBSTICKY" | "LEFTSTICKY" | "LSTICKY"
        | "LTHUMBSTICKY" => GamepadInputSpec::Thumbstick(Side::Left, StickAxis::Y),
        "RTHUMBX" | "RIGHTTHUMBX" | "RIGHTTHUMBSTICKX" | "RIGHTSTICKX" | "RSTICKX"
        | "RTHUMBSTICKX" => GamepadInputSpec::Thumbstick(Side::Right, StickAxis::X),
        "RTHUMBY" | "RIGHTTHUMBY" | "RIGHTTHUMBSTICKY" | "RIGHTSTICKY" | "RSTICKY"
        | "RTHUMBSTICKY" => GamepadInputSpec::Thumbstick(Side::Right, StickAxis::Y),

        _ => return None,
    };
    Some(spec)
}

fn gamepad_button(name: &str) -> Option<GamepadButton> {
    let button = match name {
        "UP" | "DPADUP" => GamepadButton::DPadUp,
        "DOWN" | "DPADDOWN" => GamepadButton::DPadDown,
        "LEFT" | "DPADLEFT" => GamepadButton::DPadLeft,
        "RIGHT" | "DPADRIGHT" => GamepadButton::DPadRight,

        "LTHUMBCLICK" | "LSTICKCLICK" | "LEFTTHUMBCLICK" | "LEFTSTICKCLICK"
        | "LEFTTHUMBSTICKCLICK" => GamepadButton::LeftThumb,
        "RTHUMBCLICK" | "RSTICKCLICK" | "RIGHTTHUMBCLICK" | "RIGHTSTICKCLICK"
        | "RIGHTTHUMBSTICKCLICK" => GamepadButton::RightThumb,

        "LBUMPER" | "LEFTBUMPER" | "LSHOULDER" | "LEFTSHOULDER" => GamepadButton::LeftShoulder,
        "RBUMPER" | "RIGHTBUMPER" | "RSHOULDER" | "RIGHTSHOULDER" => GamepadButton::RightShoulder,

        "A" => GamepadButton::A,
        "B" => GamepadButton::B,
        "X" => GamepadButton::X,
        "Y" => GamepadButton::Y,
        "START" => GamepadButton::Start,
        "BACK" => GamepadButton::Back,
        _ => return None,
    };
    Some(button)
}

/// Resolves a keyboard key name to its virtual-key code
pub fn keyboard_key(name: &str) -> Option<KeyCode> {
    let code: u16 = match name {
        "BACKSPACE" => 0x08,
        "TAB" => 0x09,
        "CLEAR" => 0x0C,
        "ENTER" | "RETURN" => 0x0D,
        "SHIFT" => 0x10,
        "CTRL" | "CONTROL" => 0x11,
        "ALT" => 0x12,
        "PAUSE" => 0x13,
        "CAPSLOCK" | "CAPITAL" => 0x14,
        "ESC" | "ESCAPE" => 0x1B,
        "SPACE" | "SPACEBAR" => 0x20,
        "PAGEUP" | "PGUP" | "PRIOR" => 0x21,
        "PAGEDOWN" | "PGDN" | "NEXT" => 0x22,
        "END" => 0x23,
        "HOME" => 0x24,
        "LEFT" | "LEFTARROW" | "ARROWLEFT" => 0x25,
        "UP" | "UPARROW" | "ARROWUP" => 0x26,
        "RIGHT" | "RIGHTARROW" | "ARROWRIGHT" => 0x27,
        "DOWN" | "DOWNARROW" | "ARROWDOWN" => 0x28,
        "PRINTSCREEN" | "PRTSC" | "SNAPSHOT" => 0x2C,
        "INSERT" | "INS" => 0x2D,
        "DELETE" | "DEL" => 0x2E,
        "LWIN" | "LEFTWINDOWS" => 0x5B,
        "RWIN" | "RIGHTWINDOWS" => 0x5C,
        "APPS" | "CONTEXTMENU" => 0x5D,
        "MULTIPLY" => 0x6A,
        "ADD" => 0x6B,
        "SEPARATOR" => 0x6C,
        "SUBTRACT" => 0x6D,
        "DECIMAL" => 0x6E,
        "DIVIDE" => 0x6F,
        "NUMLOCK" => 0x90,
        "SCROLLLOCK" => 0x91,
        "LSHIFT" | "LEFTSHIFT" => 0xA0,
        "RSHIFT" | "RIGHTSHIFT" => 0xA1,
        "LCTRL" | "LCONTROL" | "LEFTCTRL" | "LEFTCONTROL" => 0xA2,
        "RCTRL" | "RCONTROL" | "RIGHTCTRL" | "RIGHTCONTROL" => 0xA3,
        "LALT" | "LEFTALT" => 0xA4,
        "RALT" | "RIGHTALT" => 0xA5,
        "MUTE" | "VOLUMEMUTE" => 0xAD,
        "VOLUMEDOWN" => 0xAE,
        "VOLUMEUP" => 0xAF,
        "MEDIANEXT" | "NEXTTRACK" => 0xB0,
        "MEDIAPREV" | "PREVTRACK" => 0xB1,
        "MEDIASTOP" => 0xB2,
        "PLAYPAUSE" | "MEDIAPLAYPAUSE" => 0xB3,
        "SEMICOLON" => 0xBA,
        "PLUS" => 0xBB,
        "COMMA" => 0xBC,
        "MINUS" => 0xBD,
        "PERIOD" => 0xBE,
        "SLASH" => 0xBF,
        "GRAVE" | "BACKTICK" | "TILDE" => 0xC0,
        "LBRACKET" | "LEFTBRACKET" => 0xDB,
        "BACKSLASH" => 0xDC,
        "RBRACKET" | "RIGHTBRACKET" => 0xDD,
        "QUOTE" | "APOSTROPHE" => 0xDE,
        _ => return indexed_key(name),
    };
    Some(KeyCode(code))
}

// Letters, digits, function keys and the numpad digits follow a contiguous code range
fn indexed_key(name: &str) -> Option<KeyCode> {
    let bytes = name.as_bytes();
    if bytes.len() == 1 {
        let c = bytes[0];
        if c.is_ascii_uppercase() || c.is_ascii_digit() {
            // Letter and digit keys share their ASCII codes
            return Some(KeyCode(u16::from(c)));
        }
        return None;
    }

    if let Some(digit) = name.strip_prefix("NUMPAD") {
        let n: u16 = digit.parse().ok()?;
        return (n <= 9).then_some(KeyCode(0x60 + n));
    }

    if let Some(number) = name.strip_prefix('F') {
        // F1..F24 only, no leading zeros
        if number.starts_with('0') {
            return None;
        }
        let n: u16 = number.parse().ok()?;
        return (1..=24).contains(&n).then_some(KeyCode(0x70 + n - 1));
    }

    None
}

/// Parses a raw virtual-key code written as `0x..`
pub fn raw_key_code(name: &str) -> Option<KeyCode> {
    let hex = name.strip_prefix("0X")?;
    let code = u16::from_str_radix(hex, 16).ok()?;
    (1..=0xFE).contains(&code).then_some(KeyCode(code))
}

pub fn mouse_button(name: &str) -> Option<MouseButton> {
    let button = match name {
        "LMB" | "LEFTCLICK" | "LEFTMOUSEBUTTON" | "MOUSE1" => MouseButton::Left,
        "RMB" | "RIGHTCLICK" | "RIGHTMOUSEBUTTON" | "MOUSE2" => MouseButton::Right,
        "MMB" | "MIDDLECLICK" | "MIDDLEMOUSEBUTTON" | "MOUSE3" => MouseButton::Middle,
        "XBUTTON1" | "MOUSE4" => MouseButton::X1,
        "XBUTTON2" | "MOUSE5" => MouseButton::X2,
        _ => return None,
    };
    Some(button)
}
