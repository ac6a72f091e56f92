use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{
    error::AppError,
    services::sse_service::{self, StreamKind},
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/sse/public",
    tag = "sse",
    responses((status = 200, description = "Scoreboard SSE stream (scoreboard, clock, buzzer, info, system.status)", content_type = "text/event-stream", body = String))
)]
/// Stream scoreboard updates to connected displays.
pub async fn public_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe_public(&state);
    info!("New public SSE connection");
    sse_service::broadcast_public_info(state.public_sse(), "display connected");
    let initial = sse_service::initial_scoreboard_event(&state)
        .await
        .into_iter()
        .collect();
    sse_service::to_sse_stream(receiver, initial, StreamKind::Public)
}

#[utoipa::path(
    get,
    path = "/sse/admin",
    tag = "sse",
    responses(
        (status = 200, description = "Operator SSE stream; the first event carries the admin token", content_type = "text/event-stream", body = String),
        (status = 401, description = "Another operator console is connected")
    )
)]
/// Stream operator events, issuing the token required by the control routes.
pub async fn admin_stream(
    State(state): State<SharedState>,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>>, AppError> {
    let (receiver, token) = sse_service::subscribe_admin(&state).await?;
    info!("New admin SSE connection");
    let initial = sse_service::admin_handshake_event(&token)
        .into_iter()
        .chain(sse_service::initial_scoreboard_event(&state).await)
        .collect();
    Ok(sse_service::to_sse_stream(
        receiver,
        initial,
        StreamKind::Admin(state),
    ))
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/sse/public", get(public_stream))
        .route("/sse/admin", get(admin_stream))
}
