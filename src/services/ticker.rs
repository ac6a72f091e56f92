//! The timing loop: advances the engine at a fixed cadence using the
//! monotonic clock.

use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval},
};
use tracing::{debug, info};

use crate::state::SharedState;

/// Cadence and publication throttle of the timing loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickerSettings {
    /// Time between two engine ticks.
    pub period: Duration,
    /// Minimum spacing of clock updates on the public stream.
    pub publish_every: Duration,
}

impl TickerSettings {
    /// Settings for `tick_hz` ticks per second and a publication throttle in milliseconds.
    pub fn new(tick_hz: u32, snapshot_interval_ms: u64) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / f64::from(tick_hz.max(1))),
            publish_every: Duration::from_millis(snapshot_interval_ms.max(1)),
        }
    }
}

/// Spawn the timing loop. Abort the returned handle to stop it.
pub fn spawn(state: SharedState, settings: TickerSettings) -> JoinHandle<()> {
    tokio::spawn(run(state, settings))
}

/// Tick the engine forever.
pub async fn run(state: SharedState, settings: TickerSettings) {
    let mut ticks = interval(settings.period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        period_ms = settings.period.as_secs_f64() * 1_000.0,
        "clock ticker started"
    );

    let mut last = Instant::now();
    let mut last_publish = last;
    loop {
        ticks.tick().await;
        let now = Instant::now();
        let dt = now.saturating_duration_since(last).as_secs_f64();
        last = now;

        let publish_clock = now.saturating_duration_since(last_publish) >= settings.publish_every;
        let outcome = state.tick(dt, publish_clock).await;
        if publish_clock && outcome.running {
            last_publish = now;
        }

        for event in &outcome.fired {
            info!(
                clock = ?event.clock,
                period = event.period,
                sequence = event.sequence,
                "buzzer"
            );
        }

        if dt > settings.period.as_secs_f64() * 4.0 {
            debug!(dt, "ticker fell behind");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ScoreboardConfig, state::AppState};

    #[test]
    fn settings_follow_configuration() {
        let settings = TickerSettings::new(50, 100);
        assert_eq!(settings.period, Duration::from_millis(20));
        assert_eq!(settings.publish_every, Duration::from_millis(100));

        let settings = TickerSettings::new(0, 0);
        assert_eq!(settings.period, Duration::from_secs(1));
        assert_eq!(settings.publish_every, Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn running_clock_counts_down_and_buzzes() {
        let state = AppState::new(ScoreboardConfig::default());
        let mut buzzers = state.subscribe_buzzers();
        state.apply(|engine| engine.toggle_shot_clock()).await;

        let handle = spawn(state.clone(), TickerSettings::new(60, 100));
        let event = tokio::time::timeout(Duration::from_secs(30), buzzers.recv())
            .await
            .expect("shot clock should expire")
            .unwrap();
        handle.abort();

        assert_eq!(event.sequence, 1);
        let snapshot = state.snapshot().await;
        assert_eq!(snapshot.shot_clock.seconds, 0.0);
        assert!(!snapshot.shot_clock.running);
        assert_eq!(snapshot.game_clock.seconds, 600.0);
    }
}
