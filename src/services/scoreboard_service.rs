//! Operator commands. Each function applies one engine operation through
//! [`AppState::apply`](crate::state::AppState::apply) and returns the
//! resulting snapshot.

use tracing::debug;

use crate::{
    dto::{admin::ToggleResponse, scoreboard::ScoreboardSnapshot},
    error::ServiceError,
    state::{SharedState, clock::ClockKind, game::Team},
};

/// Current scoreboard.
pub async fn snapshot(state: &SharedState) -> ScoreboardSnapshot {
    state.snapshot().await
}

/// Add or remove points.
pub async fn adjust_score(state: &SharedState, team: Team, delta: i32) -> ScoreboardSnapshot {
    let ((), snapshot) = state
        .apply(|engine| engine.adjust_score(team, delta))
        .await;
    debug!(?team, delta, "score adjusted");
    snapshot
}

/// Add or remove team fouls.
pub async fn adjust_fouls(state: &SharedState, team: Team, delta: i32) -> ScoreboardSnapshot {
    let ((), snapshot) = state.apply(|engine| engine.adjust_foul(team, delta)).await;
    debug!(?team, delta, "fouls adjusted");
    snapshot
}

/// Add or remove timeouts.
pub async fn adjust_timeouts(state: &SharedState, team: Team, delta: i32) -> ScoreboardSnapshot {
    let ((), snapshot) = state
        .apply(|engine| engine.adjust_timeout(team, delta))
        .await;
    debug!(?team, delta, "timeouts adjusted");
    snapshot
}

/// Move the period indicator.
pub async fn adjust_period(state: &SharedState, delta: i32) -> ScoreboardSnapshot {
    let ((), snapshot) = state.apply(|engine| engine.adjust_period(delta)).await;
    debug!(delta, period = snapshot.period, "period adjusted");
    snapshot
}

/// Move one of the clocks by a signed number of seconds.
pub async fn adjust_clock(
    state: &SharedState,
    kind: ClockKind,
    seconds: f64,
) -> Result<ScoreboardSnapshot, ServiceError> {
    if !seconds.is_finite() {
        return Err(ServiceError::InvalidInput(
            "clock adjustment must be a finite number of seconds".into(),
        ));
    }

    let ((), snapshot) = state
        .apply(|engine| match kind {
            ClockKind::Game => engine.adjust_game_clock(seconds),
            ClockKind::Shot => engine.adjust_shot_clock(seconds),
        })
        .await;
    debug!(?kind, seconds, "clock adjusted");
    Ok(snapshot)
}

/// Start or stop one of the clocks.
pub async fn toggle_clock(state: &SharedState, kind: ClockKind) -> ToggleResponse {
    let (phase, snapshot) = state
        .apply(|engine| match kind {
            ClockKind::Game => engine.toggle_game_clock(),
            ClockKind::Shot => engine.toggle_shot_clock(),
        })
        .await;
    debug!(?kind, ?phase, "clock toggled");
    ToggleResponse { phase, snapshot }
}

/// Put the game clock back to the period length.
pub async fn reset_game_clock(state: &SharedState) -> ScoreboardSnapshot {
    let ((), snapshot) = state.apply(|engine| engine.reset_game_clock()).await;
    debug!("game clock reset");
    snapshot
}

/// Load the overtime duration onto the game clock.
pub async fn start_overtime(state: &SharedState) -> ScoreboardSnapshot {
    let ((), snapshot) = state.apply(|engine| engine.start_overtime()).await;
    debug!(period = snapshot.period, "overtime loaded");
    snapshot
}

/// Put the shot clock back to `seconds`, to the short reset duration when
/// `short` is set, or to the full shot duration otherwise.
pub async fn reset_shot_clock(
    state: &SharedState,
    seconds: Option<f64>,
    short: bool,
) -> Result<ScoreboardSnapshot, ServiceError> {
    let config = state.config();
    let seconds = match (seconds, short) {
        (Some(_), true) => {
            return Err(ServiceError::InvalidInput(
                "give either `seconds` or `short`, not both".into(),
            ));
        }
        (Some(seconds), false) => seconds,
        (None, true) => f64::from(config.shot_reset_short_seconds),
        (None, false) => f64::from(config.shot_seconds),
    };
    let cap = state
        .read(|engine| engine.state().clock(ClockKind::Shot).cap())
        .await;
    if !seconds.is_finite() || !(0.0..=cap).contains(&seconds) {
        return Err(ServiceError::InvalidInput(format!(
            "shot clock reset must be between 0 and {cap} seconds"
        )));
    }

    let ((), snapshot) = state.apply(|engine| engine.reset_shot_clock(seconds)).await;
    debug!(seconds, "shot clock reset");
    Ok(snapshot)
}

/// Start a fresh game with the configured values, keeping team names.
pub async fn reset_all(state: &SharedState) -> ScoreboardSnapshot {
    let ((), snapshot) = state.apply(|engine| engine.reset_all()).await;
    debug!("scoreboard reset");
    snapshot
}

/// Exchange the two team slots.
pub async fn swap_teams(state: &SharedState) -> ScoreboardSnapshot {
    let ((), snapshot) = state.apply(|engine| engine.swap_teams()).await;
    debug!(swapped = snapshot.teams_swapped, "teams swapped");
    snapshot
}

/// Give a team slot a new display name.
pub async fn rename_team(
    state: &SharedState,
    team: Team,
    name: &str,
) -> Result<ScoreboardSnapshot, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput("team name must not be blank".into()));
    }

    let ((), snapshot) = state.apply(|engine| engine.rename_team(team, name)).await;
    debug!(?team, name, "team renamed");
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ScoreboardConfig,
        state::{AppState, clock::ClockPhase},
    };

    fn state() -> SharedState {
        AppState::new(ScoreboardConfig::default())
    }

    #[tokio::test]
    async fn shot_reset_defaults_to_configured_duration() {
        let state = state();
        toggle_clock(&state, ClockKind::Shot).await;
        state.tick(5.0, false).await;

        let snapshot = reset_shot_clock(&state, None, false).await.unwrap();
        assert_eq!(snapshot.shot_clock.seconds, 24.0);
        assert!(!snapshot.shot_clock.running);

        let snapshot = reset_shot_clock(&state, Some(14.0), false).await.unwrap();
        assert_eq!(snapshot.shot_clock.seconds, 14.0);
    }

    #[tokio::test]
    async fn shot_reset_rejects_out_of_range_values() {
        let state = state();
        assert!(matches!(
            reset_shot_clock(&state, Some(150.0), false).await,
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            reset_shot_clock(&state, Some(-1.0), false).await,
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn short_shot_reset_uses_configured_value() {
        let config = ScoreboardConfig {
            shot_reset_short_seconds: 12,
            ..ScoreboardConfig::default()
        };
        let state = AppState::new(config);
        toggle_clock(&state, ClockKind::Shot).await;
        state.tick(20.0, false).await;

        let snapshot = reset_shot_clock(&state, None, true).await.unwrap();
        assert_eq!(snapshot.shot_clock.seconds, 12.0);
        assert!(!snapshot.shot_clock.buzzer_latched);

        assert!(matches!(
            reset_shot_clock(&state, Some(10.0), true).await,
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn rename_rejects_blank_names() {
        let state = state();
        assert!(rename_team(&state, Team::A, "  ").await.is_err());

        let snapshot = rename_team(&state, Team::B, " Owls ").await.unwrap();
        assert_eq!(snapshot.team_b.name, "Owls");
    }

    #[tokio::test]
    async fn toggle_reports_phase() {
        let state = state();
        let response = toggle_clock(&state, ClockKind::Game).await;
        assert_eq!(response.phase, ClockPhase::Running);
        assert!(response.snapshot.game_clock.running);

        let response = toggle_clock(&state, ClockKind::Game).await;
        assert_eq!(response.phase, ClockPhase::StoppedPositive);
    }

    #[tokio::test]
    async fn non_finite_adjustments_are_rejected() {
        let state = state();
        assert!(adjust_clock(&state, ClockKind::Game, f64::NAN).await.is_err());
        let snapshot = adjust_clock(&state, ClockKind::Game, -60.0).await.unwrap();
        assert_eq!(snapshot.game_clock.seconds, 540.0);
    }
}
