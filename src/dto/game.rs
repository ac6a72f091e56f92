//! Remote game list projections shown to the operator.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dao::models::{GAME_TYPE_LIVE, GAME_TYPE_RESULT};

/// Status of a listed game as recorded remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ListedGameStatus {
    Final,
    Live,
    Scheduled,
}

impl ListedGameStatus {
    /// Classify the remote `game_type` column. A missing value counts as a result.
    pub fn from_game_type(game_type: Option<&str>) -> Self {
        match game_type {
            None | Some(GAME_TYPE_RESULT) => Self::Final,
            Some(GAME_TYPE_LIVE) => Self::Live,
            _ => Self::Scheduled,
        }
    }

    /// Word used in the list text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Final => "final",
            Self::Live => "live",
            Self::Scheduled => "scheduled",
        }
    }
}

/// One selectable entry of the remote game list.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GameListItem {
    pub id: Uuid,
    /// Calendar date of the game (`YYYY-MM-DD`).
    pub date: String,
    /// Ready-to-render line, e.g. `03/14 Hawks vs Owls (live) [U18]`.
    pub text: String,
    pub team1: String,
    pub team2: String,
    pub status: ListedGameStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
}
