use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        admin::{
            ClockAdjustRequest, PeriodDeltaRequest, RenameTeamRequest, ShotResetRequest,
            TeamDeltaRequest, ToggleResponse,
        },
        game::GameListItem,
        scoreboard::ScoreboardSnapshot,
    },
    error::AppError,
    services::{game_service, scoreboard_service},
    state::{SharedState, clock::ClockKind, game::Team},
};

const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Operator control endpoints driving the scoreboard.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/admin/score", post(adjust_score))
        .route("/admin/fouls", post(adjust_fouls))
        .route("/admin/timeouts", post(adjust_timeouts))
        .route("/admin/period", post(adjust_period))
        .route("/admin/clock/game/adjust", post(adjust_game_clock))
        .route("/admin/clock/game/toggle", post(toggle_game_clock))
        .route("/admin/clock/game/reset", post(reset_game_clock))
        .route("/admin/clock/game/overtime", post(start_overtime))
        .route("/admin/clock/shot/adjust", post(adjust_shot_clock))
        .route("/admin/clock/shot/toggle", post(toggle_shot_clock))
        .route("/admin/clock/shot/reset", post(reset_shot_clock))
        .route("/admin/reset", post(reset_all))
        .route("/admin/teams/swap", post(swap_teams))
        .route("/admin/teams/{team}", put(rename_team))
        .route("/admin/games", get(list_games))
        .route("/admin/games/{id}/load", post(load_game))
        .route_layer(middleware::from_fn_with_state(state, require_admin_token))
}

/// Add or remove points for a team.
#[utoipa::path(
    post,
    path = "/admin/score",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = TeamDeltaRequest,
    responses((status = 200, description = "Score adjusted", body = ScoreboardSnapshot))
)]
pub async fn adjust_score(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<TeamDeltaRequest>>,
) -> Json<ScoreboardSnapshot> {
    Json(scoreboard_service::adjust_score(&state, payload.team, payload.delta).await)
}

/// Add or remove team fouls.
#[utoipa::path(
    post,
    path = "/admin/fouls",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = TeamDeltaRequest,
    responses((status = 200, description = "Fouls adjusted", body = ScoreboardSnapshot))
)]
pub async fn adjust_fouls(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<TeamDeltaRequest>>,
) -> Json<ScoreboardSnapshot> {
    Json(scoreboard_service::adjust_fouls(&state, payload.team, payload.delta).await)
}

/// Add or remove timeouts.
#[utoipa::path(
    post,
    path = "/admin/timeouts",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = TeamDeltaRequest,
    responses((status = 200, description = "Timeouts adjusted", body = ScoreboardSnapshot))
)]
pub async fn adjust_timeouts(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<TeamDeltaRequest>>,
) -> Json<ScoreboardSnapshot> {
    Json(scoreboard_service::adjust_timeouts(&state, payload.team, payload.delta).await)
}

/// Move the period indicator, clamped to the configured range.
#[utoipa::path(
    post,
    path = "/admin/period",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = PeriodDeltaRequest,
    responses((status = 200, description = "Period adjusted", body = ScoreboardSnapshot))
)]
pub async fn adjust_period(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<PeriodDeltaRequest>>,
) -> Json<ScoreboardSnapshot> {
    Json(scoreboard_service::adjust_period(&state, payload.delta).await)
}

/// Move the game clock by a signed number of seconds.
#[utoipa::path(
    post,
    path = "/admin/clock/game/adjust",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = ClockAdjustRequest,
    responses((status = 200, description = "Game clock adjusted", body = ScoreboardSnapshot))
)]
pub async fn adjust_game_clock(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<ClockAdjustRequest>>,
) -> Result<Json<ScoreboardSnapshot>, AppError> {
    Ok(Json(
        scoreboard_service::adjust_clock(&state, ClockKind::Game, payload.seconds).await?,
    ))
}

/// Move the shot clock by a signed number of seconds.
#[utoipa::path(
    post,
    path = "/admin/clock/shot/adjust",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = ClockAdjustRequest,
    responses((status = 200, description = "Shot clock adjusted", body = ScoreboardSnapshot))
)]
pub async fn adjust_shot_clock(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<ClockAdjustRequest>>,
) -> Result<Json<ScoreboardSnapshot>, AppError> {
    Ok(Json(
        scoreboard_service::adjust_clock(&state, ClockKind::Shot, payload.seconds).await?,
    ))
}

/// Start or stop the game clock. At zero it is refilled and left stopped.
#[utoipa::path(
    post,
    path = "/admin/clock/game/toggle",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Game clock toggled", body = ToggleResponse))
)]
pub async fn toggle_game_clock(State(state): State<SharedState>) -> Json<ToggleResponse> {
    Json(scoreboard_service::toggle_clock(&state, ClockKind::Game).await)
}

/// Start or stop the shot clock. At zero it is refilled and left stopped.
#[utoipa::path(
    post,
    path = "/admin/clock/shot/toggle",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Shot clock toggled", body = ToggleResponse))
)]
pub async fn toggle_shot_clock(State(state): State<SharedState>) -> Json<ToggleResponse> {
    Json(scoreboard_service::toggle_clock(&state, ClockKind::Shot).await)
}

/// Put the game clock back to the period length.
#[utoipa::path(
    post,
    path = "/admin/clock/game/reset",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Game clock reset", body = ScoreboardSnapshot))
)]
pub async fn reset_game_clock(State(state): State<SharedState>) -> Json<ScoreboardSnapshot> {
    Json(scoreboard_service::reset_game_clock(&state).await)
}

/// Load the overtime duration onto the game clock.
#[utoipa::path(
    post,
    path = "/admin/clock/game/overtime",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Overtime loaded", body = ScoreboardSnapshot))
)]
pub async fn start_overtime(State(state): State<SharedState>) -> Json<ScoreboardSnapshot> {
    Json(scoreboard_service::start_overtime(&state).await)
}

/// Put the shot clock back to the given value, the short reset or the full duration.
#[utoipa::path(
    post,
    path = "/admin/clock/shot/reset",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = ShotResetRequest,
    responses((status = 200, description = "Shot clock reset", body = ScoreboardSnapshot))
)]
pub async fn reset_shot_clock(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<ShotResetRequest>>,
) -> Result<Json<ScoreboardSnapshot>, AppError> {
    Ok(Json(
        scoreboard_service::reset_shot_clock(&state, payload.seconds, payload.short).await?,
    ))
}

/// Start over: scores, fouls, timeouts, period and both clocks.
#[utoipa::path(
    post,
    path = "/admin/reset",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Scoreboard reset", body = ScoreboardSnapshot))
)]
pub async fn reset_all(State(state): State<SharedState>) -> Json<ScoreboardSnapshot> {
    Json(scoreboard_service::reset_all(&state).await)
}

/// Exchange the left and right team slots.
#[utoipa::path(
    post,
    path = "/admin/teams/swap",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Teams swapped", body = ScoreboardSnapshot))
)]
pub async fn swap_teams(State(state): State<SharedState>) -> Json<ScoreboardSnapshot> {
    Json(scoreboard_service::swap_teams(&state).await)
}

/// Rename a team slot.
#[utoipa::path(
    put,
    path = "/admin/teams/{team}",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream"),
    ("team" = Team, Path, description = "Team slot (`a` or `b`)")),
    request_body = RenameTeamRequest,
    responses((status = 200, description = "Team renamed", body = ScoreboardSnapshot))
)]
pub async fn rename_team(
    State(state): State<SharedState>,
    Path(team): Path<Team>,
    Valid(Json(payload)): Valid<Json<RenameTeamRequest>>,
) -> Result<Json<ScoreboardSnapshot>, AppError> {
    Ok(Json(
        scoreboard_service::rename_team(&state, team, &payload.name).await?,
    ))
}

/// List remote games around the current month.
#[utoipa::path(
    get,
    path = "/admin/games",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses(
        (status = 200, description = "Remote games", body = [GameListItem]),
        (status = 503, description = "Live-score store unavailable")
    )
)]
pub async fn list_games(
    State(state): State<SharedState>,
) -> Result<Json<Vec<GameListItem>>, AppError> {
    Ok(Json(game_service::list_games(&state).await?))
}

/// Seed the scoreboard from a remote game.
#[utoipa::path(
    post,
    path = "/admin/games/{id}/load",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream"),
    ("id" = String, Path, description = "Identifier of the remote game")),
    responses(
        (status = 200, description = "Game loaded", body = ScoreboardSnapshot),
        (status = 404, description = "Unknown game"),
        (status = 409, description = "Game clock is running")
    )
)]
pub async fn load_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScoreboardSnapshot>, AppError> {
    Ok(Json(game_service::load_game(&state, id).await?))
}

async fn require_admin_token(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned())
        .ok_or_else(|| {
            AppError::Unauthorized("missing admin token header `X-Admin-Token`".into())
        })?;

    let expected = {
        let guard = state.admin_token().lock().await;
        guard.clone()
    };

    match expected {
        Some(token) if token == provided => Ok(next.run(req).await),
        Some(_) => Err(AppError::Unauthorized("invalid admin token".into())),
        None => Err(AppError::Unauthorized(
            "no operator console connected to /sse/admin".into(),
        )),
    }
}
