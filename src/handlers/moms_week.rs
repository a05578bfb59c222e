use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    Extension,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::moms_week::{
    CreateWeeklyEntryRequest, DeleteReportsQuery, DeleteReportsResponse, GeneratedPdf,
    StoredReport, WeekQuery, WeeklyEntryResponse,
};
use crate::repositories::moms_week::{NewWeeklyEntry, WeeklyEntryRepository};
use crate::response::{ApiPath, ApiQuery, ApiResponse, ValidatedJson};
use crate::services::moms_week::{
    aggregate::{WeeklyReport, WeeklyStats},
    load_report, owner_name, report, resolve_week,
    tags::encode_tags,
    week::WeekRange,
};
use crate::AppState;

fn week_for(query: &WeekQuery) -> AppResult<WeekRange> {
    resolve_week(query, Utc::now().date_naive())
}

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath(user_id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<CreateWeeklyEntryRequest>,
) -> AppResult<ApiResponse<WeeklyEntryResponse>> {
    auth_user.ensure_can_access(user_id)?;

    let entry = WeeklyEntryRepository::new(&state.db, &state.tables)
        .insert(NewWeeklyEntry {
            user_id,
            entry_date: body.entry_date.unwrap_or_else(|| Utc::now().date_naive()),
            photo_count: body.photo_count,
            word_count: body.word_count,
            happy_moments: body.happy_moments,
            emotion: body.emotion(),
            tags: encode_tags(&body.tags),
            note: body.note.as_deref(),
        })
        .await?;

    tracing::debug!(user_id, entry_id = entry.id, date = %entry.entry_date, "Weekly entry stored");
    Ok(ApiResponse::created(entry.into()).with_message("Entrada guardada"))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath(user_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<WeekQuery>,
) -> AppResult<ApiResponse<Vec<WeeklyEntryResponse>>> {
    auth_user.ensure_can_access(user_id)?;
    let range = week_for(&query)?;

    let entries = WeeklyEntryRepository::new(&state.db, &state.tables)
        .list_active_between(user_id, range.start, range.end)
        .await?;

    Ok(ApiResponse::ok(entries.into_iter().map(Into::into).collect()))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath((user_id, entry_id)): ApiPath<(i64, i64)>,
) -> AppResult<ApiResponse<Value>> {
    auth_user.ensure_can_access(user_id)?;

    let deleted = WeeklyEntryRepository::new(&state.db, &state.tables)
        .soft_delete(user_id, entry_id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound("Entry not found".into()));
    }

    Ok(ApiResponse::ok(json!({ "id": entry_id })).with_message("Entrada eliminada"))
}

pub async fn weekly_report(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath(user_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<WeekQuery>,
) -> AppResult<ApiResponse<WeeklyReport>> {
    auth_user.ensure_can_access(user_id)?;
    let range = week_for(&query)?;
    Ok(ApiResponse::ok(load_report(&state, user_id, &range).await?))
}

pub async fn weekly_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath(user_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<WeekQuery>,
) -> AppResult<ApiResponse<WeeklyStats>> {
    auth_user.ensure_can_access(user_id)?;
    let range = week_for(&query)?;
    let weekly = load_report(&state, user_id, &range).await?;
    Ok(ApiResponse::ok(WeeklyStats::from(&weekly)))
}

pub async fn generate_pdf(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath(user_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<WeekQuery>,
) -> AppResult<ApiResponse<GeneratedPdf>> {
    auth_user.ensure_can_access(user_id)?;
    let range = week_for(&query)?;

    let owner = owner_name(&state, user_id).await?;
    let weekly = load_report(&state, user_id, &range).await?;
    let pdf = state.reports.publish(user_id, &weekly, &owner).await?;

    Ok(ApiResponse::created(pdf).with_message("PDF generado"))
}

pub async fn pdf_preview(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath(user_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<WeekQuery>,
) -> AppResult<Html<String>> {
    auth_user.ensure_can_access(user_id)?;
    let range = week_for(&query)?;

    let owner = owner_name(&state, user_id).await?;
    let weekly = load_report(&state, user_id, &range).await?;
    Ok(Html(report::render_html(&weekly, &owner)))
}

pub async fn list_pdfs(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath(user_id): ApiPath<i64>,
) -> AppResult<ApiResponse<Vec<StoredReport>>> {
    auth_user.ensure_can_access(user_id)?;
    Ok(ApiResponse::ok(state.reports.stored_reports(user_id).await?))
}

pub async fn download_pdf(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath((user_id, file_name)): ApiPath<(i64, String)>,
) -> AppResult<impl IntoResponse> {
    auth_user.ensure_can_access(user_id)?;

    let path = state.reports.locate(user_id, &file_name).await?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("reading {}: {}", path.display(), e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    ))
}

pub async fn delete_pdfs(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath(user_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<DeleteReportsQuery>,
) -> AppResult<ApiResponse<DeleteReportsResponse>> {
    auth_user.ensure_can_access(user_id)?;
    let range = week_for(&WeekQuery {
        date: None,
        week: Some(query.week),
        year: query.year,
    })?;

    let files_deleted = state.reports.delete_week(user_id, &range).await?;
    let entries_deleted = if query.db {
        WeeklyEntryRepository::new(&state.db, &state.tables)
            .soft_delete_between(user_id, range.start, range.end)
            .await?
    } else {
        0
    };

    tracing::info!(user_id, week = range.week, files_deleted, entries_deleted, "Weekly reports deleted");
    Ok(ApiResponse::ok(DeleteReportsResponse {
        week_number: range.week,
        files_deleted,
        entries_deleted,
    }))
}
