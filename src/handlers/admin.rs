use axum::extract::State;

use crate::db::BookCatalog;
use crate::error::AppResult;
use crate::models::stats::{AdminStats, UserStats};
use crate::models::user::UserRole;
use crate::repositories::stats::StatsRepository;
use crate::response::ApiResponse;
use crate::AppState;

const RECENT_SIGNUP_DAYS: i64 = 30;

pub async fn stats(State(state): State<AppState>) -> AppResult<ApiResponse<AdminStats>> {
    let tables = &state.tables;
    let repo = StatsRepository::new(&state.db, tables);

    let users = UserStats {
        total: repo.count_active(&tables.users).await?,
        admins: repo.count_users_by_role(UserRole::Admin.as_str()).await?,
        registered_last_30_days: repo.count_users_since_days(RECENT_SIGNUP_DAYS).await?,
    };

    let mut books = std::collections::BTreeMap::new();
    for catalog in BookCatalog::ALL {
        books.insert(catalog.as_str(), repo.count_active(tables.books(catalog)).await?);
    }

    let stats = AdminStats {
        users,
        calendar_events: repo.count_active(&tables.calendar_events).await?,
        events_by_type: repo
            .grouped_counts(&tables.calendar_events, "event_type")
            .await?,
        diary_entries: repo.count_active(&tables.diary_entries).await?,
        weekly_entries: repo.count_active(&tables.weekly_entries).await?,
        support_resources: repo.count_active(&tables.support_resources).await?,
        support_by_category: repo
            .grouped_counts(&tables.support_resources, "category")
            .await?,
        books,
        stored_reports: state.reports.count_all().await?,
    };

    Ok(ApiResponse::ok(stats))
}
