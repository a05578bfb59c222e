use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::db::Tables;
use crate::models::moms_week::WeeklyEntry;

const COLUMNS: &str = "id, user_id, entry_date, photo_count, word_count, happy_moments, \
                       emotion, tags, note, is_active, created_at";

pub struct NewWeeklyEntry<'a> {
    pub user_id: i64,
    pub entry_date: NaiveDate,
    pub photo_count: i32,
    pub word_count: i32,
    pub happy_moments: i32,
    pub emotion: Option<&'a str>,
    pub tags: Option<String>,
    pub note: Option<&'a str>,
}

pub struct WeeklyEntryRepository<'a> {
    pool: &'a MySqlPool,
    table: &'a str,
}

impl<'a> WeeklyEntryRepository<'a> {
    pub fn new(pool: &'a MySqlPool, tables: &'a Tables) -> Self {
        Self {
            pool,
            table: &tables.weekly_entries,
        }
    }

    pub async fn insert(&self, entry: NewWeeklyEntry<'_>) -> Result<WeeklyEntry, sqlx::Error> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} (user_id, entry_date, photo_count, word_count, happy_moments, emotion, tags, note) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            self.table
        ))
        .bind(entry.user_id)
        .bind(entry.entry_date)
        .bind(entry.photo_count)
        .bind(entry.word_count)
        .bind(entry.happy_moments)
        .bind(entry.emotion)
        .bind(&entry.tags)
        .bind(entry.note)
        .execute(self.pool)
        .await?;

        let id = result.last_insert_id() as i64;
        sqlx::query_as::<_, WeeklyEntry>(&format!(
            "SELECT {} FROM {} WHERE id = ?",
            COLUMNS, self.table
        ))
        .bind(id)
        .fetch_one(self.pool)
        .await
    }

    /// Active entries of a user with `start <= entry_date <= end`.
    pub async fn list_active_between(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WeeklyEntry>, sqlx::Error> {
        sqlx::query_as::<_, WeeklyEntry>(&format!(
            "SELECT {} FROM {} \
             WHERE user_id = ? AND is_active = TRUE AND entry_date BETWEEN ? AND ? \
             ORDER BY entry_date ASC, id ASC",
            COLUMNS, self.table
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.pool)
        .await
    }

    /// Returns false when no active entry matched.
    pub async fn soft_delete(&self, user_id: i64, entry_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET is_active = FALSE WHERE id = ? AND user_id = ? AND is_active = TRUE",
            self.table
        ))
        .bind(entry_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn soft_delete_between(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET is_active = FALSE \
             WHERE user_id = ? AND is_active = TRUE AND entry_date BETWEEN ? AND ?",
            self.table
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
