//! Serialisable views of the engine state pushed to displays and operators.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::{
    clock::{Clock, ClockPhase},
    engine::ScoreboardEngine,
    game::{GameStatus, TeamState},
};

/// Public projection of one team slot.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TeamSnapshot {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub score: u32,
    pub fouls: u32,
    pub timeouts: u32,
}

impl From<&TeamState> for TeamSnapshot {
    fn from(team: &TeamState) -> Self {
        Self {
            name: team.name.clone(),
            color: team.color.clone(),
            score: team.score,
            fouls: team.fouls,
            timeouts: team.timeouts,
        }
    }
}

/// Public projection of a clock, including its rendered text.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ClockSnapshot {
    /// Remaining time in seconds.
    pub seconds: f64,
    /// Text as shown on the board.
    pub display: String,
    pub running: bool,
    pub buzzer_latched: bool,
    pub phase: ClockPhase,
}

impl ClockSnapshot {
    fn from_clock(clock: &Clock, display: String) -> Self {
        Self {
            seconds: clock.remaining(),
            display,
            running: clock.is_running(),
            buzzer_latched: clock.is_latched(),
            phase: clock.phase(),
        }
    }
}

/// Owned copy of the whole scoreboard at a given engine version.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ScoreboardSnapshot {
    pub team_a: TeamSnapshot,
    pub team_b: TeamSnapshot,
    pub period: u32,
    pub period_max: u32,
    pub game_clock: ClockSnapshot,
    pub shot_clock: ClockSnapshot,
    pub status: GameStatus,
    /// Engine mutation counter this snapshot was taken at.
    pub version: u64,
    /// Remote game record the session was loaded from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<Uuid>,
    /// `true` when team A currently shows the record's second team.
    pub teams_swapped: bool,
}

impl ScoreboardSnapshot {
    /// Capture the engine state.
    pub fn from_engine(engine: &ScoreboardEngine) -> Self {
        let state = engine.state();
        Self {
            team_a: TeamSnapshot::from(&state.team_a),
            team_b: TeamSnapshot::from(&state.team_b),
            period: state.period,
            period_max: engine.rules().period_max,
            game_clock: ClockSnapshot::from_clock(
                &state.game_clock,
                format_game_clock(state.game_clock.remaining()),
            ),
            shot_clock: ClockSnapshot::from_clock(
                &state.shot_clock,
                format_shot_clock(state.shot_clock.remaining()),
            ),
            status: state.status(),
            version: engine.version(),
            game_id: state.game_id,
            teams_swapped: state.swapped,
        }
    }
}

/// `MM:SS.cc`, truncated towards zero.
pub fn format_game_clock(seconds: f64) -> String {
    let centis = (seconds.max(0.0) * 100.0 + 1e-6).floor() as u64;
    let whole = centis / 100;
    format!("{:02}:{:02}.{:02}", whole / 60, whole % 60, centis % 100)
}

/// Whole seconds, rounded up. Reads `0` only once the clock has snapped to zero.
pub fn format_shot_clock(seconds: f64) -> String {
    let whole = (seconds.max(0.0) - 1e-6).ceil().max(0.0) as u64;
    whole.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ScoreboardConfig,
        state::{engine::SessionRules, game::Team},
    };

    #[test]
    fn game_clock_text_truncates() {
        assert_eq!(format_game_clock(600.0), "10:00.00");
        assert_eq!(format_game_clock(59.999), "00:59.99");
        assert_eq!(format_game_clock(0.0), "00:00.00");
        assert_eq!(format_game_clock(83.5), "01:23.50");
    }

    #[test]
    fn shot_clock_text_rounds_up() {
        assert_eq!(format_shot_clock(24.0), "24");
        assert_eq!(format_shot_clock(13.7), "14");
        assert_eq!(format_shot_clock(0.4), "1");
        assert_eq!(format_shot_clock(0.01), "1");
        assert_eq!(format_shot_clock(0.0), "0");
    }

    #[test]
    fn running_shot_clock_shows_zero_only_with_its_buzzer() {
        let mut engine = ScoreboardEngine::new(SessionRules::from(&ScoreboardConfig::default()));
        engine.toggle_shot_clock();

        let fired = engine.tick(23.5);
        assert!(fired.is_empty());
        let snapshot = engine.snapshot();
        assert!(snapshot.shot_clock.running);
        assert_eq!(snapshot.shot_clock.display, "1");

        let mut buzzed = false;
        while engine.state().shot_clock.is_running() {
            buzzed |= !engine.tick(1.0 / 60.0).is_empty();
            let snapshot = engine.snapshot();
            if snapshot.shot_clock.display == "0" {
                assert!(buzzed);
                assert!(!snapshot.shot_clock.running);
            }
        }
        assert!(buzzed);
        assert_eq!(engine.snapshot().shot_clock.display, "0");
    }

    #[test]
    fn snapshot_mirrors_engine() {
        let mut engine = ScoreboardEngine::new(SessionRules::from(&ScoreboardConfig::default()));
        engine.adjust_score(Team::B, 2);
        engine.toggle_shot_clock();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.team_b.score, 2);
        assert_eq!(snapshot.period_max, 4);
        assert!(snapshot.shot_clock.running);
        assert_eq!(snapshot.shot_clock.phase, ClockPhase::Running);
        assert_eq!(snapshot.game_clock.display, "10:00.00");
        assert_eq!(snapshot.status, GameStatus::Scheduled);
        assert_eq!(snapshot.version, engine.version());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["shot_clock"]["phase"], "running");
        assert!(json.get("game_id").is_none());
    }
}
