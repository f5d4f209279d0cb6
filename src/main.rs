use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware;
use tokio::net::TcpListener;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commutex_inventory::{
    db, middleware::rate_limit::log_request, routes, utils::password, AppError, AppResult,
    AppState, Config,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "commutex_inventory=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server stopped");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let config = Config::from_env()?;
    tracing::info!("Starting server at {}", config.server_addr());

    let db = db::connect(&config).await?;
    tracing::info!("Connected to database");

    db::migrate(&db).await?;
    tracing::info!("Migrations complete");

    if let Some(seed) = &config.admin_seed {
        db::seed_admin(&db, seed).await?;
    }
    password::warm_up();

    let state = AppState::new(db, config.clone());

    // 100 request burst per IP, one token replenished per 60ms
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(60)
            .burst_size(100)
            .finish()
            .ok_or_else(|| AppError::Config("Invalid rate limit settings".to_string()))?,
    );

    let app = routes::create_router(state)
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(GovernorLayer::new(governor_config));

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid server address: {}", e)))?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::Internal(format!("Server error: {}", e)))
}
