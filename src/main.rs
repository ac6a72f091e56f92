//! Scoreboard backend entrypoint wiring the clock ticker, REST, SSE and live-score sync.

use std::{env, net::SocketAddr};

use anyhow::Context;
use axum::Router;
use clap::Parser;
use tokio::{net::TcpListener, task::JoinHandle};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scoreboard_back::{
    cli::Cli,
    config::ScoreboardConfig,
    routes,
    services::ticker::{self, TickerSettings},
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = ScoreboardConfig::load().apply_cli(&cli);
    if let Err(err) = config.save() {
        warn!(error = %err, "failed to persist scoreboard config");
    }
    info!(
        team_a = %config.team_a,
        team_b = %config.team_b,
        game_seconds = config.game_seconds,
        shot_seconds = config.shot_seconds,
        periods = config.period_max,
        "scoreboard configured"
    );

    let app_state = AppState::new(config.clone());

    let ticker = ticker::spawn(
        app_state.clone(),
        TickerSettings::new(config.tick_hz, config.snapshot_interval_ms),
    );
    let sync = spawn_live_sync(&app_state, cli.offline);

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state.clone());

    let port = cli
        .port
        .or_else(|| {
            env::var("PORT")
                .or_else(|_| env::var("SERVER_PORT"))
                .ok()
                .and_then(|value| value.parse::<u16>().ok())
        })
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    let served = axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum");

    ticker.abort();
    if let Some(sync) = sync {
        sync.abort();
    }

    let session = app_state.session_config().await;
    match session.save() {
        Ok(()) => info!("scoreboard config saved"),
        Err(err) => warn!(error = %err, "failed to save scoreboard config on shutdown"),
    }

    served
}

/// Start mirroring scores to Supabase unless running offline.
#[cfg(feature = "supabase-store")]
fn spawn_live_sync(state: &SharedState, offline: bool) -> Option<JoinHandle<()>> {
    use std::{sync::Arc, time::Duration};

    use scoreboard_back::{
        dao::{
            live_store::{
                LiveScoreStore,
                supabase::{SupabaseConfig, SupabaseStore},
            },
            storage::StorageError,
        },
        services::sync_supervisor,
    };

    if offline {
        info!("offline mode requested; live-score sync disabled");
        return None;
    }

    let supabase = match SupabaseConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "live-score sync disabled; running offline");
            return None;
        }
    };

    let debounce = Duration::from_millis(state.config().sync_interval_ms);
    Some(tokio::spawn(sync_supervisor::run(
        state.clone(),
        debounce,
        move || {
            let supabase = supabase.clone();
            async move {
                SupabaseStore::connect(supabase)
                    .await
                    .map(|store| Arc::new(store) as Arc<dyn LiveScoreStore>)
                    .map_err(StorageError::from)
            }
        },
    )))
}

#[cfg(not(feature = "supabase-store"))]
fn spawn_live_sync(_state: &SharedState, _offline: bool) -> Option<JoinHandle<()>> {
    info!("built without a live-score backend; running offline");
    None
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("shutdown signal received");
}
