use chrono::NaiveDate;
use sqlx::{MySql, MySqlPool, QueryBuilder};

use super::like_pattern;
use crate::db::Tables;
use crate::models::diary::{DiaryEntry, DiaryQuery};

const COLUMNS: &str =
    "id, user_id, entry_date, title, content, mood, created_at, updated_at";

pub struct DiaryRepository<'a> {
    pool: &'a MySqlPool,
    table: &'a str,
}

impl<'a> DiaryRepository<'a> {
    pub fn new(pool: &'a MySqlPool, tables: &'a Tables) -> Self {
        Self {
            pool,
            table: &tables.diary_entries,
        }
    }

    pub async fn list(&self, user_id: i64, filter: &DiaryQuery) -> Result<Vec<DiaryEntry>, sqlx::Error> {
        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM {} WHERE is_active = TRUE AND user_id = ",
            COLUMNS, self.table
        ));
        qb.push_bind(user_id);

        if let Some(from) = filter.from {
            qb.push(" AND entry_date >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            qb.push(" AND entry_date <= ").push_bind(to);
        }
        if let Some(mood) = filter.mood.as_deref().filter(|m| !m.is_empty()) {
            qb.push(" AND mood = ").push_bind(mood.to_string());
        }
        if let Some(pattern) = like_pattern(filter.q.as_deref()) {
            qb.push(" AND (title LIKE ")
                .push_bind(pattern.clone())
                .push(" OR content LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY entry_date DESC, id DESC");

        qb.build_query_as::<DiaryEntry>().fetch_all(self.pool).await
    }

    pub async fn find(&self, user_id: i64, id: i64) -> Result<Option<DiaryEntry>, sqlx::Error> {
        sqlx::query_as::<_, DiaryEntry>(&format!(
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
        entry_date: NaiveDate,
        title: Option<&str>,
        content: &str,
        mood: Option<&str>,
    ) -> Result<DiaryEntry, sqlx::Error> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} (user_id, entry_date, title, content, mood) VALUES (?, ?, ?, ?, ?)",
            self.table
        ))
        .bind(user_id)
        .bind(entry_date)
        .bind(title)
        .bind(content)
        .bind(mood)
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
        entry_date: Option<NaiveDate>,
        title: Option<&str>,
        content: Option<&str>,
        mood: Option<&str>,
    ) -> Result<Option<DiaryEntry>, sqlx::Error> {
        sqlx::query(&format!(
            "UPDATE {} SET \
                entry_date = COALESCE(?, entry_date), \
                title = COALESCE(?, title), \
                content = COALESCE(?, content), \
                mood = COALESCE(?, mood) \
             WHERE id = ? AND user_id = ? AND is_active = TRUE",
            self.table
        ))
        .bind(entry_date)
        .bind(title)
        .bind(content)
        .bind(mood)
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
}
