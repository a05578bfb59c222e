use std::collections::BTreeMap;

use axum::{extract::State, Extension};
use serde_json::{json, Value};

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::calendar::{
    check_event_span, CalendarEvent, CreateEventRequest, EventQuery, UpdateEventRequest,
};
use crate::repositories::calendar::{CalendarRepository, EventFields};
use crate::response::{ApiPath, ApiQuery, ApiResponse, ValidatedJson};
use crate::AppState;

pub async fn list_events(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiQuery(query): ApiQuery<EventQuery>,
) -> AppResult<ApiResponse<Vec<CalendarEvent>>> {
    let events = CalendarRepository::new(&state.db, &state.tables)
        .list(auth_user.id, &query)
        .await?;
    Ok(ApiResponse::ok(events))
}

pub async fn get_event(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath(event_id): ApiPath<i64>,
) -> AppResult<ApiResponse<CalendarEvent>> {
    let event = CalendarRepository::new(&state.db, &state.tables)
        .find(auth_user.id, event_id)
        .await?
        .ok_or(AppError::NotFound("Event not found".into()))?;
    Ok(ApiResponse::ok(event))
}

pub async fn create_event(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<CreateEventRequest>,
) -> AppResult<ApiResponse<CalendarEvent>> {
    check_event_span(body.starts_at, body.ends_at).map_err(AppError::Validation)?;

    let event = CalendarRepository::new(&state.db, &state.tables)
        .create(
            auth_user.id,
            body.title.trim(),
            body.starts_at,
            EventFields {
                title: None,
                description: body.description.as_deref(),
                event_type: Some(body.event_type),
                starts_at: None,
                ends_at: body.ends_at,
                all_day: Some(body.all_day),
                location: body.location.as_deref(),
            },
        )
        .await?;

    tracing::debug!(user_id = auth_user.id, event_id = event.id, "Calendar event created");
    Ok(ApiResponse::created(event).with_message("Evento creado"))
}

pub async fn update_event(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath(event_id): ApiPath<i64>,
    ValidatedJson(body): ValidatedJson<UpdateEventRequest>,
) -> AppResult<ApiResponse<CalendarEvent>> {
    let repo = CalendarRepository::new(&state.db, &state.tables);

    let existing = repo
        .find(auth_user.id, event_id)
        .await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    // The span is checked against the merged result, not the patch alone.
    check_event_span(
        body.starts_at.unwrap_or(existing.starts_at),
        body.ends_at.or(existing.ends_at),
    )
    .map_err(AppError::Validation)?;

    let event = repo
        .update(
            auth_user.id,
            event_id,
            EventFields {
                title: body.title.as_deref().map(str::trim),
                description: body.description.as_deref(),
                event_type: body.event_type,
                starts_at: body.starts_at,
                ends_at: body.ends_at,
                all_day: body.all_day,
                location: body.location.as_deref(),
            },
        )
        .await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    Ok(ApiResponse::ok(event).with_message("Evento actualizado"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath(event_id): ApiPath<i64>,
) -> AppResult<ApiResponse<Value>> {
    let deleted = CalendarRepository::new(&state.db, &state.tables)
        .soft_delete(auth_user.id, event_id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound("Event not found".into()));
    }
    Ok(ApiResponse::ok(json!({ "id": event_id })).with_message("Evento eliminado"))
}

/// Active event counts per type, plus the overall total.
pub async fn event_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<ApiResponse<Value>> {
    let counts = CalendarRepository::new(&state.db, &state.tables)
        .count_by_type(auth_user.id)
        .await?;

    let total: i64 = counts.iter().map(|c| c.total).sum();
    let by_type: BTreeMap<String, i64> = counts
        .into_iter()
        .map(|c| (c.event_type, c.total))
        .collect();

    Ok(ApiResponse::ok(json!({ "total": total, "byType": by_type })))
}
