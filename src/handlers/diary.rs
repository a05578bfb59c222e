use axum::{extract::State, Extension};
use chrono::Utc;
use serde_json::{json, Value};

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::diary::{
    CreateDiaryEntryRequest, DiaryEntry, DiaryQuery, UpdateDiaryEntryRequest,
};
use crate::repositories::diary::DiaryRepository;
use crate::response::{ApiPath, ApiQuery, ApiResponse, ValidatedJson};
use crate::AppState;

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiQuery(query): ApiQuery<DiaryQuery>,
) -> AppResult<ApiResponse<Vec<DiaryEntry>>> {
    let entries = DiaryRepository::new(&state.db, &state.tables)
        .list(auth_user.id, &query)
        .await?;
    Ok(ApiResponse::ok(entries))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath(entry_id): ApiPath<i64>,
) -> AppResult<ApiResponse<DiaryEntry>> {
    let entry = DiaryRepository::new(&state.db, &state.tables)
        .find(auth_user.id, entry_id)
        .await?
        .ok_or(AppError::NotFound("Diary entry not found".into()))?;
    Ok(ApiResponse::ok(entry))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<CreateDiaryEntryRequest>,
) -> AppResult<ApiResponse<DiaryEntry>> {
    let entry = DiaryRepository::new(&state.db, &state.tables)
        .create(
            auth_user.id,
            body.entry_date.unwrap_or_else(|| Utc::now().date_naive()),
            body.title.as_deref(),
            &body.content,
            body.mood.as_deref(),
        )
        .await?;

    Ok(ApiResponse::created(entry).with_message("Entrada creada"))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath(entry_id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<UpdateDiaryEntryRequest>,
) -> AppResult<ApiResponse<DiaryEntry>> {
    let entry = DiaryRepository::new(&state.db, &state.tables)
        .update(
            auth_user.id,
            entry_id,
            body.entry_date,
            body.title.as_deref(),
            body.content.as_deref(),
            body.mood.as_deref(),
        )
        .await?
        .ok_or(AppError::NotFound("Diary entry not found".into()))?;

    Ok(ApiResponse::ok(entry).with_message("Entrada actualizada"))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath(entry_id): ApiPath<i64>,
) -> AppResult<ApiResponse<Value>> {
    let deleted = DiaryRepository::new(&state.db, &state.tables)
        .soft_delete(auth_user.id, entry_id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound("Diary entry not found".into()));
    }
    Ok(ApiResponse::ok(json!({ "id": entry_id })).with_message("Entrada eliminada"))
}
