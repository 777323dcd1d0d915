//! Output sink that reports actions through tracing
//!
//! Synthesizing real keyboard and mouse input is platform code that lives outside
//! this crate; this sink lets the binary run end to end and shows what would fire.

use crate::controller::ports::ActionSink;
use crate::mapping::OutputAction;
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct TracingSink {
    fired: u64,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }
}

impl ActionSink for TracingSink {
    fn synthesize(&mut self, action: &OutputAction) {
        self.fired += 1;
        info!("Action: {}", action);
    }

    fn on_connect(&mut self, slot: usize) {
        info!("gamepad connected (slot {})", slot);
    }

    fn on_disconnect(&mut self, slot: usize) {
        warn!("gamepad disconnected (slot {})", slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::WHEEL_DELTA;

    #[test]
    fn test_counts_actions() {
        let mut sink = TracingSink::new();
        sink.synthesize(&OutputAction::Scroll(WHEEL_DELTA));
        sink.synthesize(&OutputAction::mouse_step(1, 0));
        sink.on_connect(0);
        assert_eq!(sink.fired(), 2);
    }
}
