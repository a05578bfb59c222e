use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::MySqlPool;

mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod repositories;
mod response;
mod routes;
mod services;

use auth::rate_limit::RateLimitState;
use config::Config;
use db::Tables;
use services::moms_week::{renderer::ChromiumRenderer, ReportPipeline};

#[derive(Clone)]
pub struct AppState {
    pub db: MySqlPool,
    pub config: Arc<Config>,
    pub tables: Arc<Tables>,
    pub reports: Arc<ReportPipeline>,
    pub rate_limiter: RateLimitState,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crianza_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    let db = db::create_pool(&config.database_url, config.db_max_connections).await;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations applied");

    let renderer = Arc::new(ChromiumRenderer::new(&config.chromium_path));
    let reports = ReportPipeline::new(
        renderer,
        config.pdf_output_dir.clone(),
        config.pdf_retention_per_user,
    );
    tracing::info!(
        dir = %config.pdf_output_dir.display(),
        keep = config.pdf_retention_per_user,
        "Weekly report pipeline ready"
    );

    let rate_limiter = RateLimitState::new(
        config.auth_rate_limit_max,
        config.auth_rate_limit_window_secs,
    );
    rate_limiter.spawn_cleanup_worker();

    let state = AppState {
        db,
        config: config.clone(),
        tables: Arc::new(Tables::default()),
        reports: Arc::new(reports),
        rate_limiter,
    };

    let app = routes::build_router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");
    // Connect info feeds the per-IP auth rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
