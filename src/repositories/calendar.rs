use chrono::NaiveDateTime;
use sqlx::{MySql, MySqlPool, QueryBuilder};

use super::like_pattern;
use crate::db::Tables;
use crate::models::calendar::{CalendarEvent, EventQuery, EventType, EventTypeCount};

const COLUMNS: &str = "id, user_id, title, description, event_type, starts_at, ends_at, \
                       all_day, location, created_at, updated_at";

pub struct EventFields<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub event_type: Option<EventType>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub all_day: Option<bool>,
    pub location: Option<&'a str>,
}

pub struct CalendarRepository<'a> {
    pool: &'a MySqlPool,
    table: &'a str,
}

impl<'a> CalendarRepository<'a> {
    pub fn new(pool: &'a MySqlPool, tables: &'a Tables) -> Self {
        Self {
            pool,
            table: &tables.calendar_events,
        }
    }

    pub async fn list(
        &self,
        user_id: i64,
        filter: &EventQuery,
    ) -> Result<Vec<CalendarEvent>, sqlx::Error> {
        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM {} WHERE is_active = TRUE AND user_id = ",
            COLUMNS, self.table
        ));
        qb.push_bind(user_id);

        if let Some(event_type) = filter.event_type {
            qb.push(" AND event_type = ").push_bind(event_type.as_str());
        }
        if let Some(from) = filter.from {
            qb.push(" AND DATE(starts_at) >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            qb.push(" AND DATE(starts_at) <= ").push_bind(to);
        }
        if let Some(pattern) = like_pattern(filter.q.as_deref()) {
            qb.push(" AND (title LIKE ")
                .push_bind(pattern.clone())
                .push(" OR description LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY starts_at ASC, id ASC");

        qb.build_query_as::<CalendarEvent>()
            .fetch_all(self.pool)
            .await
    }

    pub async fn find(&self, user_id: i64, id: i64) -> Result<Option<CalendarEvent>, sqlx::Error> {
        sqlx::query_as::<_, CalendarEvent>(&format!(
            "SELECT {} FROM {} WHERE id = ? AND user_id = ? AND is_active = TRUE",
            COLUMNS, self.table
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await
    }

    pub async fn create(
        &self,
        user_id: i64,
        title: &str,
        starts_at: NaiveDateTime,
        fields: EventFields<'_>,
    ) -> Result<CalendarEvent, sqlx::Error> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} (user_id, title, description, event_type, starts_at, ends_at, all_day, location) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            self.table
        ))
        .bind(user_id)
        .bind(title)
        .bind(fields.description)
        .bind(fields.event_type.unwrap_or_default().as_str())
        .bind(starts_at)
        .bind(fields.ends_at)
        .bind(fields.all_day.unwrap_or(false))
        .bind(fields.location)
        .execute(self.pool)
        .await?;

        self.find(user_id, result.last_insert_id() as i64)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        fields: EventFields<'_>,
    ) -> Result<Option<CalendarEvent>, sqlx::Error> {
        sqlx::query(&format!(
            "UPDATE {} SET \
                title = COALESCE(?, title), \
                description = COALESCE(?, description), \
                event_type = COALESCE(?, event_type), \
                starts_at = COALESCE(?, starts_at), \
                ends_at = COALESCE(?, ends_at), \
                all_day = COALESCE(?, all_day), \
                location = COALESCE(?, location) \
             WHERE id = ? AND user_id = ? AND is_active = TRUE",
            self.table
        ))
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.event_type.map(|t| t.as_str()))
        .bind(fields.starts_at)
        .bind(fields.ends_at)
        .bind(fields.all_day)
        .bind(fields.location)
        .bind(id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        self.find(user_id, id).await
    }

    pub async fn soft_delete(&self, user_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET is_active = FALSE WHERE id = ? AND user_id = ? AND is_active = TRUE",
            self.table
        ))
        .bind(id)
        .bind(user_id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_type(&self, user_id: i64) -> Result<Vec<EventTypeCount>, sqlx::Error> {
        sqlx::query_as::<_, EventTypeCount>(&format!(
            "SELECT event_type, COUNT(*) AS total FROM {} \
             WHERE user_id = ? AND is_active = TRUE \
             GROUP BY event_type ORDER BY total DESC, event_type ASC",
            self.table
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await
    }
}
