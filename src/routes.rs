use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::handlers;
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    // Register/login sit behind the per-IP limiter
    let auth_routes = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::rate_limit_auth,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/support-resources", get(handlers::support::list_resources))
        .route("/support-resources/:id", get(handlers::support::get_resource))
        .route("/books/:catalog", get(handlers::books::list_books))
        .route("/books/:catalog/:id", get(handlers::books::get_book))
        .merge(auth_routes);

    let protected_routes = Router::new()
        .route(
            "/auth/me",
            get(handlers::auth::me).put(handlers::auth::update_me),
        )
        // Calendar
        .route(
            "/calendar/events",
            get(handlers::calendar::list_events).post(handlers::calendar::create_event),
        )
        .route("/calendar/events/stats", get(handlers::calendar::event_stats))
        .route(
            "/calendar/events/:id",
            get(handlers::calendar::get_event)
                .put(handlers::calendar::update_event)
                .delete(handlers::calendar::delete_event),
        )
        // Diary
        .route(
            "/diary/entries",
            get(handlers::diary::list_entries).post(handlers::diary::create_entry),
        )
        .route(
            "/diary/entries/:id",
            get(handlers::diary::get_entry)
                .put(handlers::diary::update_entry)
                .delete(handlers::diary::delete_entry),
        )
        // Weekly journal
        .route(
            "/moms-week/:user_id/entries",
            get(handlers::moms_week::list_entries).post(handlers::moms_week::create_entry),
        )
        .route(
            "/moms-week/:user_id/entries/:entry_id",
            axum::routing::delete(handlers::moms_week::delete_entry),
        )
        .route(
            "/moms-week/:user_id/weekly-report",
            get(handlers::moms_week::weekly_report),
        )
        .route(
            "/moms-week/:user_id/weekly-stats",
            get(handlers::moms_week::weekly_stats),
        )
        .route(
            "/moms-week/:user_id/generate-pdf",
            post(handlers::moms_week::generate_pdf),
        )
        .route(
            "/moms-week/:user_id/pdf-preview",
            get(handlers::moms_week::pdf_preview),
        )
        .route(
            "/moms-week/:user_id/pdfs",
            get(handlers::moms_week::list_pdfs).delete(handlers::moms_week::delete_pdfs),
        )
        .route(
            "/moms-week/:user_id/pdfs/:file_name",
            get(handlers::moms_week::download_pdf),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    let admin_routes = Router::new()
        .route("/admin/stats", get(handlers::admin::stats))
        .route(
            "/admin/support-resources",
            post(handlers::support::create_resource),
        )
        .route(
            "/admin/support-resources/:id",
            axum::routing::put(handlers::support::update_resource)
                .delete(handlers::support::delete_resource),
        )
        .route("/admin/books/:catalog", post(handlers::books::create_book))
        .route(
            "/admin/books/:catalog/:id",
            axum::routing::put(handlers::books::update_book).delete(handlers::books::delete_book),
        )
        .route_layer(middleware::from_fn(auth::middleware::require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    let cors = cors_layer(&state.config.allowed_origins());

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[&str]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
