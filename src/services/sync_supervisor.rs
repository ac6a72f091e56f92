//! Mirrors the scoreboard into the live-score store and keeps the shared state
//! offline whenever the store is unreachable.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    time::{Instant, MissedTickBehavior, interval_at, sleep},
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dao::{
        live_store::LiveScoreStore,
        models::{GAME_TYPE_LIVE, LiveScoreUpdateEntity},
        storage::StorageError,
    },
    state::{SharedState, game::Team},
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_RECONNECT_ATTEMPTS: u32 = 3;

/// Pending push: remote row and the scores in the row's team order.
type LiveScore = (Uuid, LiveScoreUpdateEntity);

/// Connect to the live-score store, then push score changes for the loaded
/// game, at most once per `debounce`. The engine never waits on the store.
pub async fn run<F, Fut>(state: SharedState, debounce: Duration, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn LiveScoreStore>, StorageError>> + Send,
{
    let mut delay = INITIAL_DELAY;
    let mut versions = state.version_watcher();

    loop {
        match connect().await {
            Ok(store) => {
                state.install_live_store(store.clone()).await;
                info!("live-score store connected; leaving offline mode");
                delay = INITIAL_DELAY;

                mirror(&state, store.as_ref(), &mut versions, debounce).await;

                state.clear_live_store().await;
                warn!("exhausted live-score reconnect attempts; staying offline");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
            Err(err) => {
                warn!(error = %err, "live-score store connection attempt failed");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
        }
    }
}

/// Push changes until the store is lost for good.
async fn mirror(
    state: &SharedState,
    store: &dyn LiveScoreStore,
    versions: &mut watch::Receiver<u64>,
    debounce: Duration,
) {
    let mut last_pushed: Option<LiveScore> = None;
    // Running clocks bump the version every tick, so the poll keeps its own schedule.
    let mut health = interval_at(Instant::now() + HEALTH_POLL_INTERVAL, HEALTH_POLL_INTERVAL);
    health.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if !push_pending(state, store, &mut last_pushed).await {
            return;
        }

        tokio::select! {
            biased;

            _ = health.tick() => {
                if let Err(err) = store.health_check().await {
                    warn!(error = %err, "live-score health check failed");
                    if !recover(state, store).await {
                        return;
                    }
                }
            }
            changed = versions.changed() => {
                if changed.is_err() {
                    return;
                }
                // Let a burst of operator input settle into a single push.
                sleep(debounce).await;
                versions.borrow_and_update();
            }
        }
    }
}

/// Push the loaded game's scores when they differ from the last push.
/// Returns `false` once the store is considered lost.
async fn push_pending(
    state: &SharedState,
    store: &dyn LiveScoreStore,
    last_pushed: &mut Option<LiveScore>,
) -> bool {
    let Some(pending) = pending_update(state).await else {
        return true;
    };
    if last_pushed.as_ref() == Some(&pending) {
        return true;
    }

    let (id, update) = pending.clone();
    match store.push_live_score(id, update).await {
        Ok(()) => {
            debug!(%id, "live score pushed");
            *last_pushed = Some(pending);
            true
        }
        Err(err) if !err.is_connectivity() => {
            // Retrying would be refused the same way.
            warn!(%id, error = %err, "live score rejected by store");
            *last_pushed = Some(pending);
            true
        }
        Err(err) => {
            warn!(%id, error = %err, "live score push failed");
            recover(state, store).await
        }
    }
}

/// Try to reach the store again, going offline after the first failed attempt.
async fn recover(state: &SharedState, store: &dyn LiveScoreStore) -> bool {
    let mut reconnect_delay = INITIAL_DELAY;

    for attempt in 0..MAX_RECONNECT_ATTEMPTS {
        match store.try_reconnect().await {
            Ok(()) => {
                info!(attempt, "live-score store reachable again");
                state.update_offline(false);
                return true;
            }
            Err(err) => {
                if attempt == 0 {
                    warn!(attempt, error = %err, "live-score reconnect failed; entering offline mode");
                    state.update_offline(true);
                } else {
                    warn!(attempt, error = %err, "live-score reconnect attempt failed");
                }
                sleep(reconnect_delay).await;
                reconnect_delay = (reconnect_delay * 2).min(MAX_DELAY);
            }
        }
    }

    false
}

/// Scores of the loaded game in the remote row's team order.
async fn pending_update(state: &SharedState) -> Option<LiveScore> {
    state
        .read(|engine| {
            let game = engine.state();
            let id = game.game_id?;
            let (team1, team2) = if game.swapped {
                (Team::B, Team::A)
            } else {
                (Team::A, Team::B)
            };
            Some((
                id,
                LiveScoreUpdateEntity {
                    team1_score: game.team(team1).score,
                    team2_score: game.team(team2).score,
                    game_type: GAME_TYPE_LIVE.to_string(),
                },
            ))
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ScoreboardConfig,
        dao::live_store::memory::MemoryStore,
        services::ticker::{self, TickerSettings},
        state::{AppState, game::GameRecord},
    };

    fn record(id: Uuid) -> GameRecord {
        GameRecord {
            id,
            team_a: "Hawks".into(),
            team_b: "Owls".into(),
            team_a_color: None,
            team_b_color: None,
            score_a: 0,
            score_b: 0,
        }
    }

    fn spawn_supervisor(state: &SharedState, store: &MemoryStore) -> tokio::task::JoinHandle<()> {
        let store = store.clone();
        tokio::spawn(run(
            state.clone(),
            Duration::from_millis(1_000),
            move || {
                let store = store.clone();
                async move { Ok::<_, StorageError>(Arc::new(store) as Arc<dyn LiveScoreStore>) }
            },
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn pushes_scores_of_loaded_game_in_record_order() {
        let state = AppState::new(ScoreboardConfig::default());
        let store = MemoryStore::default();
        let handle = spawn_supervisor(&state, &store);

        let id = Uuid::new_v4();
        state.apply(|engine| engine.load_game(record(id))).await;
        state.apply(|engine| engine.adjust_score(Team::A, 2)).await;
        state.apply(|engine| engine.swap_teams()).await;
        state.apply(|engine| engine.adjust_score(Team::A, 3)).await;
        sleep(Duration::from_secs(2)).await;
        handle.abort();

        assert!(!state.is_offline());
        let pushes = store.pushes();
        let (pushed_id, update) = pushes.last().unwrap();
        assert_eq!(*pushed_id, id);
        assert_eq!(update.team1_score, 2);
        assert_eq!(update.team2_score, 3);
        assert_eq!(update.game_type, "live");
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_is_pushed_without_a_loaded_game() {
        let state = AppState::new(ScoreboardConfig::default());
        let store = MemoryStore::default();
        let handle = spawn_supervisor(&state, &store);

        state.apply(|engine| engine.adjust_score(Team::B, 2)).await;
        sleep(Duration::from_secs(2)).await;
        handle.abort();

        assert!(store.pushes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn outage_flips_offline_without_touching_the_engine() {
        let state = AppState::new(ScoreboardConfig::default());
        let store = MemoryStore::default();
        let handle = spawn_supervisor(&state, &store);
        sleep(Duration::from_millis(10)).await;
        assert!(!state.is_offline());

        store.set_down(true);
        sleep(HEALTH_POLL_INTERVAL + Duration::from_secs(2)).await;
        assert!(state.is_offline());

        state.apply(|engine| engine.adjust_score(Team::A, 1)).await;
        assert_eq!(state.snapshot().await.team_a.score, 1);

        store.set_down(false);
        sleep(Duration::from_secs(30)).await;
        handle.abort();
        assert!(!state.is_offline());
    }

    #[tokio::test(start_paused = true)]
    async fn outage_is_noticed_while_the_game_clock_runs() {
        let state = AppState::new(ScoreboardConfig::default());
        let store = MemoryStore::default();
        let handle = spawn_supervisor(&state, &store);
        state.apply(|engine| engine.toggle_game_clock()).await;
        let ticker = ticker::spawn(state.clone(), TickerSettings::new(60, 100));
        sleep(Duration::from_millis(10)).await;
        assert!(!state.is_offline());

        store.set_down(true);
        sleep(HEALTH_POLL_INTERVAL + Duration::from_secs(2)).await;
        let offline = state.is_offline();
        let running = state.snapshot().await.game_clock.running;
        ticker.abort();
        handle.abort();

        assert!(running);
        assert!(offline);
    }
}
