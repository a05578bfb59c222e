use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "service": "crianza-api",
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}

pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let db_ok = sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .is_ok();
    let pdf_dir_ok = tokio::fs::create_dir_all(state.reports.output_dir())
        .await
        .is_ok();

    let checks = json!({
        "database": if db_ok { "ok" } else { "failed" },
        "pdfOutputDir": if pdf_dir_ok { "ok" } else { "failed" },
    });

    if db_ok && pdf_dir_ok {
        (
            StatusCode::OK,
            Json(json!({ "success": true, "data": { "status": "ready", "checks": checks } })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "message": "Service not ready",
                "data": { "status": "not_ready", "checks": checks },
            })),
        )
    }
}
