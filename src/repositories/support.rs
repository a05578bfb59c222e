use sqlx::{MySql, MySqlPool, QueryBuilder};

use super::like_pattern;
use crate::db::Tables;
use crate::models::support::{
    CreateSupportResourceRequest, SupportQuery, SupportResource, UpdateSupportResourceRequest,
};

const COLUMNS: &str = "id, name, category, description, phone, email, website, address, city, \
                       created_at, updated_at";

pub struct SupportRepository<'a> {
    pool: &'a MySqlPool,
    table: &'a str,
}

impl<'a> SupportRepository<'a> {
    pub fn new(pool: &'a MySqlPool, tables: &'a Tables) -> Self {
        Self {
            pool,
            table: &tables.support_resources,
        }
    }

    pub async fn list(&self, filter: &SupportQuery) -> Result<Vec<SupportResource>, sqlx::Error> {
        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM {} WHERE is_active = TRUE",
            COLUMNS, self.table
        ));

        if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
            qb.push(" AND category = ").push_bind(category.to_string());
        }
        if let Some(city) = filter.city.as_deref().filter(|c| !c.is_empty()) {
            qb.push(" AND city = ").push_bind(city.to_string());
        }
        if let Some(pattern) = like_pattern(filter.q.as_deref()) {
            qb.push(" AND (name LIKE ")
                .push_bind(pattern.clone())
                .push(" OR description LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY category ASC, name ASC");

        qb.build_query_as::<SupportResource>()
            .fetch_all(self.pool)
            .await
    }

    pub async fn find(&self, id: i64) -> Result<Option<SupportResource>, sqlx::Error> {
        sqlx::query_as::<_, SupportResource>(&format!(
            "SELECT {} FROM {} WHERE id = ? AND is_active = TRUE",
            COLUMNS, self.table
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
    }

    pub async fn create(
        &self,
        req: &CreateSupportResourceRequest,
    ) -> Result<SupportResource, sqlx::Error> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} (name, category, description, phone, email, website, address, city) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            self.table
        ))
        .bind(&req.name)
        .bind(&req.category)
        .bind(&req.description)
        .bind(&req.phone)
        .bind(&req.email)
        .bind(&req.website)
        .bind(&req.address)
        .bind(&req.city)
        .execute(self.pool)
        .await?;

        self.find(result.last_insert_id() as i64)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn update(
        &self,
        id: i64,
        req: &UpdateSupportResourceRequest,
    ) -> Result<Option<SupportResource>, sqlx::Error> {
        sqlx::query(&format!(
            "UPDATE {} SET \
                name = COALESCE(?, name), \
                category = COALESCE(?, category), \
                description = COALESCE(?, description), \
                phone = COALESCE(?, phone), \
                email = COALESCE(?, email), \
                website = COALESCE(?, website), \
                address = COALESCE(?, address), \
                city = COALESCE(?, city) \
             WHERE id = ? AND is_active = TRUE",
            self.table
        ))
        .bind(&req.name)
        .bind(&req.category)
        .bind(&req.description)
        .bind(&req.phone)
        .bind(&req.email)
        .bind(&req.website)
        .bind(&req.address)
        .bind(&req.city)
        .bind(id)
        .execute(self.pool)
        .await?;

        self.find(id).await
    }

    pub async fn soft_delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET is_active = FALSE WHERE id = ? AND is_active = TRUE",
            self.table
        ))
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
