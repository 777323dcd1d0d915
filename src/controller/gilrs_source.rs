//! gilrs-backed device state source
//!
//! gilrs is event driven, so this adapter drains its event queue on every query,
//! counts the events per gamepad as the report's packet number and reads the
//! cached gamepad state into the XInput-style [`DeviceState`] layout.

use crate::controller::device_state::DeviceState;
use crate::controller::normalize::{THUMBSTICK_MAX, TRIGGER_MAX};
use crate::controller::ports::{DeviceQueryError, DeviceStateSource};
use crate::mapping::GamepadButton;
use chrono::Local;
use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

pub struct GilrsSource {
    gilrs: Gilrs,

    // Events seen per gamepad, used as packet number
    packets: HashMap<GamepadId, u32>,
}

impl GilrsSource {
    pub fn new() -> Result<Self, DeviceQueryError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(DeviceQueryError::InitializationError(e.to_string()));
            }
        };

        for (id, gamepad) in gilrs.gamepads() {
            info!("Found gamepad {}: {} ({:?})", id, gamepad.name(), gamepad.uuid());
        }

        Ok(Self {
            gilrs,
            packets: HashMap::new(),
        })
    }

    fn drain_events(&mut self) {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => {
                    info!(
                        "Gamepad {} connected at {}",
                        id,
                        Local::now().format("%H:%M:%S.%3f")
                    );
                }
                EventType::Disconnected => {
                    warn!(
                        "Gamepad {} disconnected at {}",
                        id,
                        Local::now().format("%H:%M:%S.%3f")
                    );
                    self.packets.remove(&id);
                    continue;
                }
                _ => {}
            }
            let packet = self.packets.entry(id).or_insert(0);
            *packet = packet.wrapping_add(1);
        }
    }
}

impl DeviceStateSource for GilrsSource {
    fn query(&mut self, slot: usize) -> Result<Option<DeviceState>, DeviceQueryError> {
        self.drain_events();

        let Some((id, gamepad)) = self.gilrs.gamepads().nth(slot) else {
            return Ok(None);
        };
        let packet = self.packets.get(&id).copied().unwrap_or(0);
        Ok(Some(read_state(packet, &gamepad)))
    }
}

fn read_state(packet: u32, gamepad: &Gamepad<'_>) -> DeviceState {
    let mut buttons = 0u16;
    for (gilrs_button, button) in BUTTONS {
        if gamepad.is_pressed(gilrs_button) {
            buttons |= button.mask();
        }
    }

    let state = DeviceState {
        packet,
        buttons,
        left_trigger: trigger(gamepad, Button::LeftTrigger2),
        right_trigger: trigger(gamepad, Button::RightTrigger2),
        left_stick: (
            stick(gamepad.value(Axis::LeftStickX)),
            stick(gamepad.value(Axis::LeftStickY)),
        ),
        right_stick: (
            stick(gamepad.value(Axis::RightStickX)),
            stick(gamepad.value(Axis::RightStickY)),
        ),
    };
    debug!("Read gamepad state: {:?}", state);
    state
}

const BUTTONS: [(Button, GamepadButton); 14] = [
    (Button::South, GamepadButton::A),
    (Button::East, GamepadButton::B),
    (Button::West, GamepadButton::X),
    (Button::North, GamepadButton::Y),
    (Button::Start, GamepadButton::Start),
    (Button::Select, GamepadButton::Back),
    (Button::LeftTrigger, GamepadButton::LeftShoulder),
    (Button::RightTrigger, GamepadButton::RightShoulder),
    (Button::LeftThumb, GamepadButton::LeftThumb),
    (Button::RightThumb, GamepadButton::RightThumb),
    (Button::DPadUp, GamepadButton::DPadUp),
    (Button::DPadDown, GamepadButton::DPadDown),
    (Button::DPadLeft, GamepadButton::DPadLeft),
    (Button::DPadRight, GamepadButton::DPadRight),
];

// Analog triggers report through button data in [0, 1]
fn trigger(gamepad: &Gamepad<'_>, button: Button) -> u8 {
    let value = gamepad
        .button_data(button)
        .map(|data| data.value())
        .unwrap_or(0.0);
    (f64::from(value.clamp(0.0, 1.0)) * TRIGGER_MAX).round() as u8
}

fn stick(value: f32) -> i16 {
    (f64::from(value.clamp(-1.0, 1.0)) * THUMBSTICK_MAX).round() as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stick_scale() {
        assert_eq!(stick(1.0), 32767);
        assert_eq!(stick(-1.0), -32767);
        assert_eq!(stick(0.0), 0);
        assert_eq!(stick(2.0), 32767);
    }

    #[test]
    fn test_button_table_covers_every_bit() {
        let combined = BUTTONS.iter().fold(0u16, |acc, (_, b)| acc | b.mask());
        let expected = GamepadButton::ALL.iter().fold(0u16, |acc, b| acc | b.mask());
        assert_eq!(combined, expected);
    }
}
