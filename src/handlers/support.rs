use axum::extract::State;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::support::{
    CreateSupportResourceRequest, SupportQuery, SupportResource, UpdateSupportResourceRequest,
};
use crate::repositories::support::SupportRepository;
use crate::response::{ApiPath, ApiQuery, ApiResponse, ValidatedJson};
use crate::AppState;

// ── Public directory ────────────────────────────────────────────────────────

pub async fn list_resources(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SupportQuery>,
) -> AppResult<ApiResponse<Vec<SupportResource>>> {
    let resources = SupportRepository::new(&state.db, &state.tables)
        .list(&query)
        .await?;
    Ok(ApiResponse::ok(resources))
}

pub async fn get_resource(
    State(state): State<AppState>,
    ApiPath(resource_id): ApiPath<i64>,
) -> AppResult<ApiResponse<SupportResource>> {
    let resource = SupportRepository::new(&state.db, &state.tables)
        .find(resource_id)
        .await?
        .ok_or(AppError::NotFound("Support resource not found".into()))?;
    Ok(ApiResponse::ok(resource))
}

// ── Admin maintenance ───────────────────────────────────────────────────────

pub async fn create_resource(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateSupportResourceRequest>,
) -> AppResult<ApiResponse<SupportResource>> {
    let resource = SupportRepository::new(&state.db, &state.tables)
        .create(&body)
        .await?;
    tracing::info!(resource_id = resource.id, "Support resource created");
    Ok(ApiResponse::created(resource).with_message("Recurso creado"))
}

pub async fn update_resource(
    State(state): State<AppState>,
    ApiPath(resource_id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<UpdateSupportResourceRequest>,
) -> AppResult<ApiResponse<SupportResource>> {
    let resource = SupportRepository::new(&state.db, &state.tables)
        .update(resource_id, &body)
        .await?
        .ok_or(AppError::NotFound("Support resource not found".into()))?;
    Ok(ApiResponse::ok(resource).with_message("Recurso actualizado"))
}

pub async fn delete_resource(
    State(state): State<AppState>,
    ApiPath(resource_id): ApiPath<i64>,
) -> AppResult<ApiResponse<Value>> {
    let deleted = SupportRepository::new(&state.db, &state.tables)
        .soft_delete(resource_id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound("Support resource not found".into()));
    }
    tracing::info!(resource_id, "Support resource deactivated");
    Ok(ApiResponse::ok(json!({ "id": resource_id })).with_message("Recurso eliminado"))
}
