pub mod clock;
pub mod engine;
pub mod game;
mod sse;

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, broadcast, watch};

use crate::{
    config::ScoreboardConfig,
    dao::live_store::LiveScoreStore,
    dto::scoreboard::ScoreboardSnapshot,
    error::ServiceError,
    services::sse_events,
    state::{
        engine::{ScoreboardEngine, SessionRules},
        game::BuzzerEvent,
    },
};

pub use self::sse::SseHub;
use self::sse::SseState;

pub type SharedState = Arc<AppState>;

const PUBLIC_SSE_CAPACITY: usize = 64;
const ADMIN_SSE_CAPACITY: usize = 16;
const BUZZER_CAPACITY: usize = 16;

/// What a single pass of the timing loop produced.
#[derive(Debug, Default)]
pub struct TickOutcome {
    /// Buzzers fired during this pass, in firing order.
    pub fired: Vec<BuzzerEvent>,
    /// Whether a clock is still counting down afterwards.
    pub running: bool,
}

/// Central application state: the scoreboard engine, its notification channels
/// and the optional live-score store.
pub struct AppState {
    config: ScoreboardConfig,
    engine: RwLock<ScoreboardEngine>,
    sse: SseState,
    buzzers: broadcast::Sender<BuzzerEvent>,
    version: watch::Sender<u64>,
    live_store: RwLock<Option<Arc<dyn LiveScoreStore>>>,
    offline: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts offline until a live-score store is installed.
    pub fn new(config: ScoreboardConfig) -> SharedState {
        let engine = ScoreboardEngine::new(SessionRules::from(&config));
        let (version_tx, _rx) = watch::channel(engine.version());
        let (offline_tx, _rx) = watch::channel(true);
        let (buzzer_tx, _rx) = broadcast::channel(BUZZER_CAPACITY);

        Arc::new(Self {
            config,
            engine: RwLock::new(engine),
            sse: SseState::new(PUBLIC_SSE_CAPACITY, ADMIN_SSE_CAPACITY),
            buzzers: buzzer_tx,
            version: version_tx,
            live_store: RwLock::new(None),
            offline: offline_tx,
        })
    }

    /// Configuration the session was started with.
    pub fn config(&self) -> &ScoreboardConfig {
        &self.config
    }

    /// Apply an operator mutation and publish the resulting snapshot.
    ///
    /// The write lock is held until the snapshot has been handed to the SSE
    /// hubs, so subscribers observe mutations in the order they were applied.
    pub async fn apply<F, T>(&self, op: F) -> (T, ScoreboardSnapshot)
    where
        F: FnOnce(&mut ScoreboardEngine) -> T,
    {
        let mut engine = self.engine.write().await;
        let output = op(&mut engine);
        let snapshot = engine.snapshot();
        sse_events::broadcast_scoreboard(self, &snapshot);
        self.version.send_replace(snapshot.version);
        drop(engine);
        (output, snapshot)
    }

    /// Read from the engine without mutating it.
    pub async fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&ScoreboardEngine) -> T,
    {
        let engine = self.engine.read().await;
        f(&engine)
    }

    /// Current snapshot of the scoreboard.
    pub async fn snapshot(&self) -> ScoreboardSnapshot {
        self.read(ScoreboardEngine::snapshot).await
    }

    /// Advance both clocks by `dt` seconds.
    ///
    /// Buzzers are sent to the in-process buzzer channel and the public stream
    /// in firing order. A full snapshot follows any buzzer; otherwise a clock
    /// update is published only when `publish_clock` is set.
    pub async fn tick(&self, dt: f64, publish_clock: bool) -> TickOutcome {
        let mut engine = self.engine.write().await;
        let before = engine.version();
        let fired = engine.tick(dt);
        let running = engine.any_clock_running();

        for event in &fired {
            let _ = self.buzzers.send(event.clone());
            sse_events::broadcast_buzzer(self, event);
        }

        if engine.version() != before {
            if !fired.is_empty() {
                sse_events::broadcast_scoreboard(self, &engine.snapshot());
            } else if publish_clock && self.public_sse().has_subscribers() {
                sse_events::broadcast_clock(self, &engine.snapshot());
            }
            self.version.send_replace(engine.version());
        }
        drop(engine);

        TickOutcome { fired, running }
    }

    /// Subscribe to buzzer events fired by the timing loop.
    pub fn subscribe_buzzers(&self) -> broadcast::Receiver<BuzzerEvent> {
        self.buzzers.subscribe()
    }

    /// Watch the engine version; changes whenever the scoreboard changed.
    pub fn version_watcher(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Obtain a handle to the current live-score store, if one is installed.
    pub async fn live_store(&self) -> Option<Arc<dyn LiveScoreStore>> {
        let guard = self.live_store.read().await;
        guard.as_ref().cloned()
    }

    /// Live-score store or [`ServiceError::Offline`].
    pub async fn require_live_store(&self) -> Result<Arc<dyn LiveScoreStore>, ServiceError> {
        self.live_store().await.ok_or(ServiceError::Offline)
    }

    /// Install a live-score store and leave offline mode.
    pub async fn install_live_store(&self, store: Arc<dyn LiveScoreStore>) {
        {
            let mut guard = self.live_store.write().await;
            *guard = Some(store);
        }
        self.update_offline(false);
    }

    /// Remove the current live-score store and enter offline mode.
    pub async fn clear_live_store(&self) {
        {
            let mut guard = self.live_store.write().await;
            guard.take();
        }
        self.update_offline(true);
    }

    /// Current offline flag.
    pub fn is_offline(&self) -> bool {
        *self.offline.borrow()
    }

    /// Subscribe to offline mode updates.
    pub fn offline_watcher(&self) -> watch::Receiver<bool> {
        self.offline.subscribe()
    }

    /// Update and broadcast the offline flag when the value changes.
    pub fn update_offline(&self, value: bool) {
        let changed = self.offline.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });

        if changed {
            sse_events::broadcast_system_status(self, value);
        }
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        self.sse.public()
    }

    /// Broadcast hub used for the admin SSE stream.
    pub fn admin_sse(&self) -> &SseHub {
        self.sse.admin().hub()
    }

    /// Token guard that ensures a single admin SSE subscriber at a time.
    pub fn admin_token(&self) -> &Mutex<Option<String>> {
        self.sse.admin().token()
    }

    /// Configuration to persist at shutdown: the start-up values with the
    /// current team names and swap flag.
    pub async fn session_config(&self) -> ScoreboardConfig {
        let engine = self.engine.read().await;
        let state = engine.state();
        ScoreboardConfig {
            team_a: state.team_a.name.clone(),
            team_b: state.team_b.name.clone(),
            team_swapped: state.swapped,
            ..self.config.clone()
        }
    }
}
