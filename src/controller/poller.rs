//! Poll/dispatch loop with statum lifecycle
//!
//! Queries one device slot per tick, tracks connect/disconnect transitions and fires
//! the bound output actions whenever the report's packet number changes.
//!
//! # Lifecycle
//!
//! ```text
//! Configured ──► Running ──► Stopped
//!                   │
//!          (tick, sleep, repeat until cancelled)
//! ```
//!
//! # Slot state
//!
//! ```text
//!               device present
//! Disconnected ───────────────► Connected
//!      ▲                            │
//!      └────────────────────────────┘
//!               device absent
//! ```
//!
//! Each arrow fires its notification exactly once. The loop sleeps for the connected
//! poll interval while a device is present and for the longer disconnected interval
//! otherwise; cancellation is observed at every tick and sleep boundary.

use crate::controller::device_state::DeviceState;
use crate::controller::normalize::Normalizer;
use crate::controller::ports::{ActionSink, DeviceQueryError, DeviceStateSource};
use crate::mapping::ParsedConfig;
use chrono::{DateTime, Local};
use statum::{machine, state};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

/// Timing and slot selection for the poll loop
#[derive(Clone, Debug)]
pub struct PollSettings {
    /// Device slot to watch
    pub slot: usize,

    /// Sleep between ticks while a device is connected
    pub connected_interval: Duration,

    /// Sleep between ticks while the slot is empty
    pub disconnected_interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            slot: 0,
            connected_interval: Duration::from_millis(1),
            disconnected_interval: Duration::from_secs(1),
        }
    }
}

// Whether the watched slot currently holds a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No device in the slot
    Absent,
    /// Device present, packet number unchanged since the last tick
    Unchanged,
    /// New packet; the number of actions handed to the sink
    Dispatched(usize),
}

/// Counters collected over the lifetime of one loop
#[derive(Clone, Debug, Default)]
pub struct PollStats {
    pub ticks: u64,
    pub dispatched: u64,
    pub connects: u64,
    pub disconnects: u64,
    pub last_dispatch_at: Option<DateTime<Local>>,
}

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("Device query failed: {0}")]
    DeviceQuery(#[from] DeviceQueryError),

    #[error("Poll task panicked: {0}")]
    TaskPanicked(String),

    #[error("Poll loop for slot {0} was already joined")]
    AlreadyJoined(usize),
}

#[state]
#[derive(Debug, Clone)]
pub enum PollLoopState {
    Configured, // Config and ports attached, not ticking yet
    Running,    // Ticking until cancelled or the device query fails
    Stopped,    // Loop left, stats final
}

/// Poll loop with compile-time lifecycle via statum
///
/// Owns both ports and a shared, read-only [`ParsedConfig`].
#[machine]
pub struct PollLoop<S: PollLoopState> {
    config: Arc<ParsedConfig>,
    normalizer: Normalizer,
    settings: PollSettings,
    source: Box<dyn DeviceStateSource>,
    sink: Box<dyn ActionSink>,
    connection: ConnectionState,
    last_packet: Option<u32>,
    stats: PollStats,
}

impl<S: PollLoopState> PollLoop<S> {
    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn stats(&self) -> &PollStats {
        &self.stats
    }

    pub fn slot(&self) -> usize {
        self.settings.slot
    }
}

impl PollLoop<Configured> {
    pub fn create(
        config: Arc<ParsedConfig>,
        settings: PollSettings,
        source: Box<dyn DeviceStateSource>,
        sink: Box<dyn ActionSink>,
    ) -> Self {
        info!(
            "Creating poll loop for slot {} with {} bindings",
            settings.slot,
            config.bindings.len()
        );
        let normalizer = Normalizer::new(config.calibration);

        Self::new(
            config,
            normalizer,
            settings,
            source,
            sink,
            ConnectionState::Disconnected,
            None,                // last_packet
            PollStats::default(), // stats
        )
    }

    pub fn start(self) -> PollLoop<Running> {
        debug!("Poll loop settings: {:?}", self.settings);
        self.transition()
    }
}

impl PollLoop<Running> {
    /// Runs one query/compare/dispatch step without sleeping
    ///
    /// Returns an error only when the device query itself fails.
    pub fn tick(&mut self) -> Result<TickOutcome, PollError> {
        self.stats.ticks += 1;
        let slot = self.settings.slot;

        let state = match self.source.query(slot)? {
            Some(state) => state,
            None => {
                if self.connection == ConnectionState::Connected {
                    warn!("Gamepad disconnected from slot {}", slot);
                    self.connection = ConnectionState::Disconnected;
                    self.last_packet = None;
                    self.stats.disconnects += 1;
                    self.sink.on_disconnect(slot);
                }
                return Ok(TickOutcome::Absent);
            }
        };

        if self.connection == ConnectionState::Disconnected {
            info!("Gamepad connected in slot {}", slot);
            self.connection = ConnectionState::Connected;
            self.stats.connects += 1;
            self.sink.on_connect(slot);
        }

        self.sink.on_poll(slot, &state);

        if self.last_packet == Some(state.packet) {
            return Ok(TickOutcome::Unchanged);
        }
        self.last_packet = Some(state.packet);

        let fired = self.dispatch(&state);
        Ok(TickOutcome::Dispatched(fired))
    }

    // Fires every binding whose input is active in `state`
    fn dispatch(&mut self, state: &DeviceState) -> usize {
        trace!("{}", state.describe(&self.normalizer));

        let mut fired = 0;
        for (input, action) in self.config.bindings.iter() {
            if state.is_active(*input, &self.normalizer) {
                debug!("{} active, firing {}", input, action);
                self.sink.synthesize(action);
                fired += 1;
            }
        }

        if fired > 0 {
            self.stats.dispatched += fired as u64;
            self.stats.last_dispatch_at = Some(Local::now());
        }
        fired
    }

    /// Sleep before the next tick, based on the current slot state
    pub fn next_interval(&self) -> Duration {
        match self.connection {
            ConnectionState::Connected => self.settings.connected_interval,
            ConnectionState::Disconnected => self.settings.disconnected_interval,
        }
    }

    /// Ticks until `token` is cancelled
    ///
    /// A failed device query ends the loop with the error instead of being retried.
    pub async fn run_until_cancelled(
        mut self,
        token: CancellationToken,
    ) -> Result<PollLoop<Stopped>, PollError> {
        info!("Starting poll loop for slot {}", self.settings.slot);

        loop {
            if token.is_cancelled() {
                info!("Shutdown signal received for slot {}", self.settings.slot);
                break;
            }

            match self.tick() {
                Ok(outcome) => trace!("Tick {}: {:?}", self.stats.ticks, outcome),
                Err(e) => {
                    error!("Poll loop for slot {} failed: {}", self.settings.slot, e);
                    return Err(e);
                }
            }

            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    info!("Shutdown signal received for slot {}", self.settings.slot);
                    break;
                }
                _ = tokio::time::sleep(self.next_interval()) => {}
            }
        }

        Ok(self.transition())
    }
}

impl PollLoop<Stopped> {
    pub fn into_stats(self) -> PollStats {
        info!(
            "Poll loop stopped after {} ticks: {} actions, {} connects, {} disconnects",
            self.stats.ticks, self.stats.dispatched, self.stats.connects, self.stats.disconnects
        );
        self.stats
    }
}

/// Handle for a poll loop running in a tokio task
///
/// The loop runs until [`shutdown`](Self::shutdown) is called, the token returned by
/// [`cancellation_token`](Self::cancellation_token) is cancelled, or the device query
/// fails.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use yaypad::controller::{ActionSink, DeviceQueryError, DeviceState, DeviceStateSource};
/// use yaypad::controller::{PollSettings, PollerHandle};
/// use yaypad::mapping::{compile, OutputAction};
///
/// struct Nothing;
/// impl DeviceStateSource for Nothing {
///     fn query(&mut self, _slot: usize) -> Result<Option<DeviceState>, DeviceQueryError> {
///         Ok(None)
///     }
/// }
///
/// struct Print;
/// impl ActionSink for Print {
///     fn synthesize(&mut self, action: &OutputAction) {
///         println!("{}", action);
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(compile("a = space")?);
/// let handle = PollerHandle::spawn(config, PollSettings::default(), Box::new(Nothing), Box::new(Print));
/// let stats = handle.shutdown().await?;
/// println!("{} ticks", stats.ticks);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PollerHandle {
    pub slot: usize,

    token: CancellationToken,

    task_handle: Option<JoinHandle<Result<PollStats, PollError>>>,
}

impl PollerHandle {
    /// Builds the loop, starts it and spawns it on the current tokio runtime
    pub fn spawn(
        config: Arc<ParsedConfig>,
        settings: PollSettings,
        source: Box<dyn DeviceStateSource>,
        sink: Box<dyn ActionSink>,
    ) -> Self {
        let slot = settings.slot;
        let running = PollLoop::create(config, settings, source, sink).start();

        let token = CancellationToken::new();
        let task_token = token.clone();
        let task_handle = tokio::spawn(async move {
            let stopped = running.run_until_cancelled(task_token).await?;
            Ok(stopped.into_stats())
        });

        info!("Poll loop spawned for slot {}", slot);
        Self {
            slot,
            token,
            task_handle: Some(task_handle),
        }
    }

    /// Token that stops the loop when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Waits for the loop to end on its own or through the token
    ///
    /// The stats are handed out once; later calls return [`PollError::AlreadyJoined`].
    pub async fn wait(&mut self) -> Result<PollStats, PollError> {
        match self.task_handle.take() {
            Some(handle) => match handle.await {
                Ok(result) => result,
                Err(e) => {
                    error!("Poll task panicked for slot {}: {}", self.slot, e);
                    Err(PollError::TaskPanicked(e.to_string()))
                }
            },
            None => {
                warn!("Poll loop for slot {} already joined", self.slot);
                Err(PollError::AlreadyJoined(self.slot))
            }
        }
    }

    /// Cancels the loop and waits for it to stop
    pub async fn shutdown(mut self) -> Result<PollStats, PollError> {
        debug!("Sending shutdown signal to poll loop for slot {}", self.slot);
        self.token.cancel();
        self.wait().await
    }
}
