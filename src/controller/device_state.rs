use crate::controller::normalize::Normalizer;
use crate::mapping::{GamepadButton, GamepadInputSpec, Side, StickAxis};
use std::fmt::Write;

// One report from the device, XInput layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceState {
    // Changes whenever the device has new input to report
    pub packet: u32,
    pub buttons: u16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub left_stick: (i16, i16),
    pub right_stick: (i16, i16),
}

impl DeviceState {
    pub fn is_button_down(&self, button: GamepadButton) -> bool {
        self.buttons & button.mask() != 0
    }

    /// Normalized value of one signal
    ///
    /// Buttons read 0 or 1, triggers [0, 1], thumbstick axes [-1, 1].
    pub fn input_value(&self, input: GamepadInputSpec, normalizer: &Normalizer) -> f32 {
        match input {
            GamepadInputSpec::Button(button) => {
                if self.is_button_down(button) {
                    1.0
                } else {
                    0.0
                }
            }
            GamepadInputSpec::Trigger(Side::Left) => normalizer.trigger(self.left_trigger),
            GamepadInputSpec::Trigger(Side::Right) => normalizer.trigger(self.right_trigger),
            GamepadInputSpec::Thumbstick(side, axis) => {
                let (x, y) = match side {
                    Side::Left => self.left_stick,
                    Side::Right => self.right_stick,
                };
                normalizer.thumbstick(x, y, axis == StickAxis::X)
            }
        }
    }

    /// True when the signal is pressed or deflected at all
    pub fn is_active(&self, input: GamepadInputSpec, normalizer: &Normalizer) -> bool {
        self.input_value(input, normalizer) != 0.0
    }

    /// Human readable dump for trace logging
    pub fn describe(&self, normalizer: &Normalizer) -> String {
        let mut out = String::new();
        let _ = write!(out, "packet {} buttons [", self.packet);
        let pressed: Vec<&str> = GamepadButton::pressed_in(self.buttons)
            .map(GamepadButton::name)
            .collect();
        out.push_str(&pressed.join(" "));
        let _ = write!(
            out,
            "] triggers {:.3} {:.3} left stick {:.3} {:.3} right stick {:.3} {:.3}",
            normalizer.trigger(self.left_trigger),
            normalizer.trigger(self.right_trigger),
            normalizer.thumbstick(self.left_stick.0, self.left_stick.1, true),
            normalizer.thumbstick(self.left_stick.0, self.left_stick.1, false),
            normalizer.thumbstick(self.right_stick.0, self.right_stick.1, true),
            normalizer.thumbstick(self.right_stick.0, self.right_stick.1, false),
        );
        out
    }
}
