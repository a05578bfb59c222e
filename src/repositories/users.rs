use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::db::Tables;
use crate::models::user::{User, UserRole};

const COLUMNS: &str = "id, email, password_hash, name, phone, baby_name, baby_birth_date, \
                       role, is_active, created_at, updated_at";

pub struct ProfileChanges<'a> {
    pub name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub baby_name: Option<&'a str>,
    pub baby_birth_date: Option<NaiveDate>,
}

pub struct UserRepository<'a> {
    pool: &'a MySqlPool,
    table: &'a str,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a MySqlPool, tables: &'a Tables) -> Self {
        Self {
            pool,
            table: &tables.users,
        }
    }

    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
        role: UserRole,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} (email, password_hash, name, role) VALUES (?, ?, ?, ?)",
            self.table
        ))
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(role.as_str())
        .execute(self.pool)
        .await?;
        Ok(result.last_insert_id() as i64)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE email = ?",
            self.table
        ))
        .bind(email)
        .fetch_one(self.pool)
        .await?;
        Ok(count > 0)
    }

    pub async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM {} WHERE email = ? AND is_active = TRUE",
            COLUMNS, self.table
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await
    }

    pub async fn find_active_by_id(&self, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM {} WHERE id = ? AND is_active = TRUE",
            COLUMNS, self.table
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
    }

    pub async fn update_profile(
        &self,
        id: i64,
        changes: ProfileChanges<'_>,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query(&format!(
            "UPDATE {} SET \
                name = COALESCE(?, name), \
                phone = COALESCE(?, phone), \
                baby_name = COALESCE(?, baby_name), \
                baby_birth_date = COALESCE(?, baby_birth_date) \
             WHERE id = ? AND is_active = TRUE",
            self.table
        ))
        .bind(changes.name)
        .bind(changes.phone)
        .bind(changes.baby_name)
        .bind(changes.baby_birth_date)
        .bind(id)
        .execute(self.pool)
        .await?;

        self.find_active_by_id(id).await
    }
}
