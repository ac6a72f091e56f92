/// OpenAPI documentation generation.
pub mod documentation;
/// Remote game listing and loading.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Operator commands applied to the scoreboard engine.
pub mod scoreboard_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Live-score mirroring with reconnection and offline mode.
pub mod sync_supervisor;
/// Fixed-cadence clock loop.
pub mod ticker;
