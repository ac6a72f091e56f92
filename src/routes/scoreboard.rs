use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::scoreboard::ScoreboardSnapshot, services::scoreboard_service, state::SharedState,
};

#[utoipa::path(
    get,
    path = "/scoreboard",
    tag = "scoreboard",
    responses((status = 200, description = "Current scoreboard", body = ScoreboardSnapshot))
)]
/// Return the current scoreboard snapshot.
pub async fn current(State(state): State<SharedState>) -> Json<ScoreboardSnapshot> {
    Json(scoreboard_service::snapshot(&state).await)
}

/// Configure the read-only scoreboard routes.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/scoreboard", get(current))
}
