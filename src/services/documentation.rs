use utoipa::OpenApi;

/// Where the generated document is served.
pub const OPENAPI_JSON_PATH: &str = "/api-doc/openapi.json";
/// Where the Swagger UI is mounted.
pub const SWAGGER_UI_PATH: &str = "/docs";

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the scoreboard backend.
#[openapi(
    info(title = "scoreboard-back", description = "Basketball scoreboard clock engine"),
    paths(
        crate::routes::health::healthcheck,
        crate::routes::scoreboard::current,
        crate::routes::sse::public_stream,
        crate::routes::sse::admin_stream,
        crate::routes::admin::adjust_score,
        crate::routes::admin::adjust_fouls,
        crate::routes::admin::adjust_timeouts,
        crate::routes::admin::adjust_period,
        crate::routes::admin::adjust_game_clock,
        crate::routes::admin::adjust_shot_clock,
        crate::routes::admin::toggle_game_clock,
        crate::routes::admin::toggle_shot_clock,
        crate::routes::admin::reset_game_clock,
        crate::routes::admin::start_overtime,
        crate::routes::admin::reset_shot_clock,
        crate::routes::admin::reset_all,
        crate::routes::admin::swap_teams,
        crate::routes::admin::rename_team,
        crate::routes::admin::list_games,
        crate::routes::admin::load_game,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::scoreboard::ScoreboardSnapshot,
            crate::dto::scoreboard::TeamSnapshot,
            crate::dto::scoreboard::ClockSnapshot,
            crate::dto::admin::TeamDeltaRequest,
            crate::dto::admin::PeriodDeltaRequest,
            crate::dto::admin::ClockAdjustRequest,
            crate::dto::admin::ShotResetRequest,
            crate::dto::admin::RenameTeamRequest,
            crate::dto::admin::ToggleResponse,
            crate::dto::game::GameListItem,
            crate::dto::game::ListedGameStatus,
            crate::dto::sse::AdminHandshake,
            crate::dto::sse::SystemStatus,
            crate::state::game::BuzzerEvent,
            crate::state::game::GameStatus,
            crate::state::game::Team,
            crate::state::clock::ClockKind,
            crate::state::clock::ClockPhase,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "scoreboard", description = "Read-only scoreboard state"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "admin", description = "Operator controls (require X-Admin-Token)"),
    )
)]
pub struct ApiDoc;
