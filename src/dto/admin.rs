//! Request bodies accepted by the operator control routes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::{scoreboard::ScoreboardSnapshot, validation::validate_team_name},
    state::{clock::ClockPhase, game::Team},
};

/// Add or remove points, fouls or timeouts for a team.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct TeamDeltaRequest {
    pub team: Team,
    #[validate(range(min = -100, max = 100))]
    pub delta: i32,
}

/// Move the period indicator.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PeriodDeltaRequest {
    #[validate(range(min = -20, max = 20))]
    pub delta: i32,
}

/// Move a clock by a signed amount of seconds.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ClockAdjustRequest {
    #[validate(range(min = -6000.0, max = 6000.0))]
    pub seconds: f64,
}

/// Put the shot clock back to a value; the configured duration when omitted.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct ShotResetRequest {
    /// Explicit value, checked against the configured shot clock cap.
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub seconds: Option<f64>,
    /// Use the configured short reset (14 s by default).
    #[serde(default)]
    pub short: bool,
}

/// Rename a team slot.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RenameTeamRequest {
    #[validate(length(min = 1, max = 64), custom(function = "validate_team_name"))]
    pub name: String,
}

/// Result of a clock toggle.
#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleResponse {
    pub phase: ClockPhase,
    pub snapshot: ScoreboardSnapshot,
}
