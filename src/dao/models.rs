use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row of the remote `game_league` table describing a scheduled or played game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameRecordEntity {
    /// Stable identifier of the game.
    pub id: Uuid,
    /// Game date, `YYYY-MM-DD` or `YYYY-MM-DD HH:MM`.
    #[serde(default)]
    pub game_date: Option<String>,
    /// Home team name.
    #[serde(default)]
    pub team1: Option<String>,
    /// Away team name.
    #[serde(default)]
    pub team2: Option<String>,
    /// `result`, `live` or anything else for a scheduled game.
    #[serde(default)]
    pub game_type: Option<String>,
    /// League division label.
    #[serde(default)]
    pub division: Option<String>,
    /// Recorded score of the home team.
    #[serde(default)]
    pub team1_score: Option<i32>,
    /// Recorded score of the away team.
    #[serde(default)]
    pub team2_score: Option<i32>,
    /// Display color of the home team.
    #[serde(default)]
    pub team1_color: Option<String>,
    /// Display color of the away team.
    #[serde(default)]
    pub team2_color: Option<String>,
    /// Competition stage (group, final, ...).
    #[serde(default)]
    pub game_stage: Option<String>,
}

/// Partial update written to a `game_league` row while a game is in progress.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LiveScoreUpdateEntity {
    /// Current score of the home team.
    pub team1_score: u32,
    /// Current score of the away team.
    pub team2_score: u32,
    /// Always `live` while the scoreboard mirrors a game.
    pub game_type: String,
}

/// `game_type` value marking a game in progress.
pub const GAME_TYPE_LIVE: &str = "live";
/// `game_type` value marking a finished game.
pub const GAME_TYPE_RESULT: &str = "result";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_with_null_columns_deserialize() {
        let row: GameRecordEntity = serde_json::from_str(
            r#"{
                "id": "6f1c2b1e-4a57-4c1e-9a43-1f8c8f0e2d11",
                "game_date": "2026-03-14 19:30",
                "team1": "Hawks",
                "team2": null,
                "game_type": "live",
                "team1_score": 12,
                "team2_score": null
            }"#,
        )
        .unwrap();

        assert_eq!(row.team1.as_deref(), Some("Hawks"));
        assert!(row.team2.is_none());
        assert_eq!(row.team1_score, Some(12));
        assert!(row.division.is_none());
    }

    #[test]
    fn live_update_serializes_column_names() {
        let update = LiveScoreUpdateEntity {
            team1_score: 40,
            team2_score: 38,
            game_type: GAME_TYPE_LIVE.to_string(),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"team1_score": 40, "team2_score": 38, "game_type": "live"})
        );
    }
}
