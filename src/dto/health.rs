use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "offline").
    pub status: String,
}

impl HealthResponse {
    /// Create a health response indicating the live-score store is reachable.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }

    /// Create a health response indicating the scoreboard runs without a remote store.
    pub fn offline() -> Self {
        Self {
            status: "offline".to_string(),
        }
    }
}
