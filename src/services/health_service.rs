use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether the live-score store is reachable. The scoreboard itself
/// keeps working either way.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_live_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "live-score health check failed");
                return HealthResponse::offline();
            }
        }
        Err(_) => return HealthResponse::offline(),
    }

    if state.is_offline() {
        HealthResponse::offline()
    } else {
        HealthResponse::ok()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{config::ScoreboardConfig, dao::live_store::memory::MemoryStore, state::AppState};

    #[tokio::test]
    async fn reports_offline_without_store() {
        let state = AppState::new(ScoreboardConfig::default());
        assert_eq!(health_status(&state).await.status, "offline");
    }

    #[tokio::test]
    async fn reports_ok_with_reachable_store() {
        let state = AppState::new(ScoreboardConfig::default());
        let store = MemoryStore::default();
        state.install_live_store(Arc::new(store.clone())).await;
        assert_eq!(health_status(&state).await.status, "ok");

        store.set_down(true);
        assert_eq!(health_status(&state).await.status, "offline");
    }
}
