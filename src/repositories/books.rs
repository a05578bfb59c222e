use sqlx::{MySql, MySqlPool, QueryBuilder};

use super::like_pattern;
use crate::db::{BookCatalog, Tables};
use crate::models::book::{Book, BookQuery, CreateBookRequest, UpdateBookRequest};

const COLUMNS: &str = "id, title, author, category, age_min, age_max, description, cover_url, \
                       purchase_url, created_at, updated_at";

/// One repository type serves both catalogs; the catalog picks the table.
pub struct BookRepository<'a> {
    pool: &'a MySqlPool,
    table: &'a str,
}

impl<'a> BookRepository<'a> {
    pub fn new(pool: &'a MySqlPool, tables: &'a Tables, catalog: BookCatalog) -> Self {
        Self {
            pool,
            table: tables.books(catalog),
        }
    }

    pub async fn list(&self, filter: &BookQuery) -> Result<Vec<Book>, sqlx::Error> {
        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM {} WHERE is_active = TRUE",
            COLUMNS, self.table
        ));

        if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
            qb.push(" AND category = ").push_bind(category.to_string());
        }
        if let Some(age) = filter.age {
            qb.push(" AND (age_min IS NULL OR age_min <= ")
                .push_bind(age)
                .push(") AND (age_max IS NULL OR age_max >= ")
                .push_bind(age)
                .push(")");
        }
        if let Some(pattern) = like_pattern(filter.q.as_deref()) {
            qb.push(" AND (title LIKE ")
                .push_bind(pattern.clone())
                .push(" OR author LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY title ASC");

        qb.build_query_as::<Book>().fetch_all(self.pool).await
    }

    pub async fn find(&self, id: i64) -> Result<Option<Book>, sqlx::Error> {
        sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM {} WHERE id = ? AND is_active = TRUE",
            COLUMNS, self.table
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
    }

    pub async fn create(&self, req: &CreateBookRequest) -> Result<Book, sqlx::Error> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} (title, author, category, age_min, age_max, description, cover_url, purchase_url) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            self.table
        ))
        .bind(&req.title)
        .bind(&req.author)
        .bind(&req.category)
        .bind(req.age_min)
        .bind(req.age_max)
        .bind(&req.description)
        .bind(&req.cover_url)
        .bind(&req.purchase_url)
        .execute(self.pool)
        .await?;

        self.find(result.last_insert_id() as i64)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn update(&self, id: i64, req: &UpdateBookRequest) -> Result<Option<Book>, sqlx::Error> {
        sqlx::query(&format!(
            "UPDATE {} SET \
                title = COALESCE(?, title), \
                author = COALESCE(?, author), \
                category = COALESCE(?, category), \
                age_min = COALESCE(?, age_min), \
                age_max = COALESCE(?, age_max), \
                description = COALESCE(?, description), \
                cover_url = COALESCE(?, cover_url), \
                purchase_url = COALESCE(?, purchase_url) \
             WHERE id = ? AND is_active = TRUE",
            self.table
        ))
        .bind(&req.title)
        .bind(&req.author)
        .bind(&req.category)
        .bind(req.age_min)
        .bind(req.age_max)
        .bind(&req.description)
        .bind(&req.cover_url)
        .bind(&req.purchase_url)
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
