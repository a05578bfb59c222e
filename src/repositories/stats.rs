use std::collections::BTreeMap;

use sqlx::MySqlPool;

use crate::db::Tables;

/// Read-only aggregate counts for the admin dashboard.
pub struct StatsRepository<'a> {
    pool: &'a MySqlPool,
    tables: &'a Tables,
}

impl<'a> StatsRepository<'a> {
    pub fn new(pool: &'a MySqlPool, tables: &'a Tables) -> Self {
        Self { pool, tables }
    }

    /// Rows with `is_active = TRUE` in `table`, which must come from [`Tables`].
    pub async fn count_active(&self, table: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE is_active = TRUE",
            table
        ))
        .fetch_one(self.pool)
        .await
    }

    pub async fn count_users_by_role(&self, role: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE is_active = TRUE AND role = ?",
            self.tables.users
        ))
        .bind(role)
        .fetch_one(self.pool)
        .await
    }

    pub async fn count_users_since_days(&self, days: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} \
             WHERE is_active = TRUE AND created_at >= NOW() - INTERVAL ? DAY",
            self.tables.users
        ))
        .bind(days)
        .fetch_one(self.pool)
        .await
    }

    /// Active rows of `table` grouped by `column`. Both identifiers are
    /// trusted values supplied by the caller, never request input.
    pub async fn grouped_counts(
        &self,
        table: &str,
        column: &str,
    ) -> Result<BTreeMap<String, i64>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (String, i64)>(&format!(
            "SELECT {col}, COUNT(*) FROM {table} WHERE is_active = TRUE GROUP BY {col}",
            col = column,
            table = table
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }
}
