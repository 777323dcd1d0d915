use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use yaypad::controller::{
    ActionSink, ConnectionState, DeviceQueryError, DeviceState, DeviceStateSource, PollLoop,
    PollSettings, TickOutcome,
};
use yaypad::mapping::{compile, GamepadButton, KeyCode, MouseButton, OutputAction, WHEEL_DELTA};

const BINDINGS: &str = "\
# mouse and wheel on the right hand
MOUSE_SENSITIVITY = 3
DEADZONE = 0.25
THRESHOLD = 0.1

right_trigger = left_click
r_bumper = rmb
up = mouse_up
right = mouse_right
r_thumb_y = scroll_up
a = space  # jump
start = 0x1B
";

struct Scripted(VecDeque<Option<DeviceState>>);

impl DeviceStateSource for Scripted {
    fn query(&mut self, _slot: usize) -> Result<Option<DeviceState>, DeviceQueryError> {
        Ok(self.0.pop_front().flatten())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Seen {
    Action(OutputAction),
    Connect,
    Disconnect,
    Poll(u32),
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Seen>>>);

impl Recorder {
    fn take(&self) -> Vec<Seen> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl ActionSink for Recorder {
    fn synthesize(&mut self, action: &OutputAction) {
        self.0.lock().unwrap().push(Seen::Action(*action));
    }

    fn on_connect(&mut self, _slot: usize) {
        self.0.lock().unwrap().push(Seen::Connect);
    }

    fn on_disconnect(&mut self, _slot: usize) {
        self.0.lock().unwrap().push(Seen::Disconnect);
    }

    fn on_poll(&mut self, _slot: usize, state: &DeviceState) {
        self.0.lock().unwrap().push(Seen::Poll(state.packet));
    }
}

fn report(packet: u32) -> DeviceState {
    DeviceState {
        packet,
        ..Default::default()
    }
}

fn actions(seen: &[Seen]) -> Vec<OutputAction> {
    let mut actions: Vec<OutputAction> = seen
        .iter()
        .filter_map(|s| match s {
            Seen::Action(action) => Some(*action),
            _ => None,
        })
        .collect();
    actions.sort_by_key(|a| a.to_string());
    actions
}

#[test]
fn test_binding_file_drives_dispatch() {
    let config = Arc::new(compile(BINDINGS).unwrap());
    assert_eq!(config.bindings.len(), 7);

    let script = vec![
        None,
        // d-pad up and right with the right trigger fully pulled
        Some(DeviceState {
            buttons: GamepadButton::DPadUp.mask() | GamepadButton::DPadRight.mask(),
            right_trigger: 255,
            ..report(1)
        }),
        // same packet, nothing new
        Some(DeviceState {
            buttons: GamepadButton::DPadUp.mask(),
            ..report(1)
        }),
        // stick inside the dead zone, trigger under threshold, start pressed
        Some(DeviceState {
            buttons: GamepadButton::Start.mask(),
            right_trigger: 20,
            right_stick: (0, 8000),
            ..report(2)
        }),
        // stick pushed up, bumper held
        Some(DeviceState {
            buttons: GamepadButton::RightShoulder.mask(),
            right_stick: (0, 32767),
            ..report(3)
        }),
        None,
        None,
        Some(DeviceState {
            buttons: GamepadButton::A.mask(),
            ..report(3)
        }),
    ];

    let sink = Recorder::default();
    let mut poller = PollLoop::create(
        config,
        PollSettings::default(),
        Box::new(Scripted(script.into())),
        Box::new(sink.clone()),
    )
    .start();

    assert_eq!(poller.tick().unwrap(), TickOutcome::Absent);
    assert_eq!(sink.take(), vec![]);

    assert_eq!(poller.tick().unwrap(), TickOutcome::Dispatched(3));
    let seen = sink.take();
    assert_eq!(&seen[..2], &[Seen::Connect, Seen::Poll(1)]);
    let mut expected = vec![
        OutputAction::MouseMove {
            dx: 0,
            dy: -3,
            scalable: true,
        },
        OutputAction::MouseMove {
            dx: 3,
            dy: 0,
            scalable: true,
        },
        OutputAction::MouseButtonPress(MouseButton::Left),
    ];
    expected.sort_by_key(|a| a.to_string());
    assert_eq!(actions(&seen), expected);

    assert_eq!(poller.tick().unwrap(), TickOutcome::Unchanged);
    assert_eq!(sink.take(), vec![Seen::Poll(1)]);

    assert_eq!(poller.tick().unwrap(), TickOutcome::Dispatched(1));
    assert_eq!(
        actions(&sink.take()),
        vec![OutputAction::KeyPress(KeyCode(0x1B))]
    );

    assert_eq!(poller.tick().unwrap(), TickOutcome::Dispatched(2));
    let mut expected = vec![
        OutputAction::Scroll(WHEEL_DELTA),
        OutputAction::MouseButtonPress(MouseButton::Right),
    ];
    expected.sort_by_key(|a| a.to_string());
    assert_eq!(actions(&sink.take()), expected);

    assert_eq!(poller.tick().unwrap(), TickOutcome::Absent);
    assert_eq!(poller.tick().unwrap(), TickOutcome::Absent);
    assert_eq!(sink.take(), vec![Seen::Disconnect]);
    assert_eq!(poller.connection(), ConnectionState::Disconnected);

    // Same packet number as before the disconnect still counts as new
    assert_eq!(poller.tick().unwrap(), TickOutcome::Dispatched(1));
    assert_eq!(
        sink.take(),
        vec![
            Seen::Connect,
            Seen::Poll(3),
            Seen::Action(OutputAction::KeyPress(KeyCode(0x20))),
        ]
    );

    let stats = poller.stats();
    assert_eq!(stats.ticks, 8);
    assert_eq!(stats.dispatched, 7);
    assert_eq!(stats.connects, 2);
    assert_eq!(stats.disconnects, 1);
}

#[test]
fn test_bad_line_reports_its_number() {
    let err = compile("a = space\n\nb == enter").unwrap_err();
    assert_eq!(err.line, 3);
    assert_eq!(
        err.to_string(),
        "Error on line 3: expected exactly one equals sign."
    );
}
