use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dao::models::GameRecordEntity,
    state::clock::{Clock, ClockKind},
};

/// Name shown for a remote record without a `team1` value.
pub const DEFAULT_TEAM1_NAME: &str = "TEAM 1";
/// Name shown for a remote record without a `team2` value.
pub const DEFAULT_TEAM2_NAME: &str = "TEAM 2";

/// One of the two team slots on the scoreboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    /// Left slot.
    A,
    /// Right slot.
    B,
}

/// Name, color and counters tracked for a team slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamState {
    /// Display name.
    pub name: String,
    /// Optional display color (as supplied by the game record, e.g. `#ff0000`).
    pub color: Option<String>,
    /// Points scored.
    pub score: u32,
    /// Team fouls.
    pub fouls: u32,
    /// Timeouts remaining.
    pub timeouts: u32,
}

impl TeamState {
    /// Fresh team with zeroed score/fouls and the configured timeouts.
    pub fn new(name: impl Into<String>, color: Option<String>, timeouts: u32) -> Self {
        Self {
            name: name.into(),
            color,
            score: 0,
            fouls: 0,
            timeouts,
        }
    }
}

/// Informational game status mirrored to the live-score store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Game clock never started since the last full reset.
    Scheduled,
    /// Game clock is running.
    Live,
    /// Game clock was started before and is now stopped.
    Paused,
}

/// Notification fired when a running clock reaches zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BuzzerEvent {
    /// Which clock reached zero.
    pub clock: ClockKind,
    /// Period in which the buzzer sounded.
    pub period: u32,
    /// Strictly increasing counter assigned by the engine.
    pub sequence: u64,
}

/// Externally supplied game record used to seed a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    /// Remote identifier of the game.
    pub id: Uuid,
    /// Home/left team name.
    pub team_a: String,
    /// Away/right team name.
    pub team_b: String,
    /// Color of the left team, if any.
    pub team_a_color: Option<String>,
    /// Color of the right team, if any.
    pub team_b_color: Option<String>,
    /// Score already recorded for the left team.
    pub score_a: u32,
    /// Score already recorded for the right team.
    pub score_b: u32,
}

/// The mutable aggregate owned by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Left team slot.
    pub team_a: TeamState,
    /// Right team slot.
    pub team_b: TeamState,
    /// Current period, within `[1, period_max]`.
    pub period: u32,
    /// Main game clock.
    pub game_clock: Clock,
    /// Shot clock.
    pub shot_clock: Clock,
    /// Whether the game clock has been started since the last full reset.
    pub started: bool,
    /// Whether the slots are swapped relative to the loaded record (team A holds `team2`).
    pub swapped: bool,
    /// Remote record this session was loaded from.
    pub game_id: Option<Uuid>,
}

impl GameState {
    /// Borrow the state of a team slot.
    pub fn team(&self, team: Team) -> &TeamState {
        match team {
            Team::A => &self.team_a,
            Team::B => &self.team_b,
        }
    }

    /// Mutably borrow the state of a team slot.
    pub fn team_mut(&mut self, team: Team) -> &mut TeamState {
        match team {
            Team::A => &mut self.team_a,
            Team::B => &mut self.team_b,
        }
    }

    /// Borrow one of the clocks.
    pub fn clock(&self, kind: ClockKind) -> &Clock {
        match kind {
            ClockKind::Game => &self.game_clock,
            ClockKind::Shot => &self.shot_clock,
        }
    }

    /// Derived status: live while the game clock runs.
    pub fn status(&self) -> GameStatus {
        if self.game_clock.is_running() {
            GameStatus::Live
        } else if self.started {
            GameStatus::Paused
        } else {
            GameStatus::Scheduled
        }
    }
}

impl From<GameRecordEntity> for GameRecord {
    fn from(value: GameRecordEntity) -> Self {
        Self {
            id: value.id,
            team_a: value.team1.unwrap_or_else(|| DEFAULT_TEAM1_NAME.to_string()),
            team_b: value.team2.unwrap_or_else(|| DEFAULT_TEAM2_NAME.to_string()),
            team_a_color: value.team1_color,
            team_b_color: value.team2_color,
            score_a: value.team1_score.unwrap_or_default().max(0) as u32,
            score_b: value.team2_score.unwrap_or_default().max(0) as u32,
        }
    }
}
