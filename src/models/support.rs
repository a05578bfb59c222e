use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SupportResource {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupportResourceRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    pub category: String,

    pub description: Option<String>,

    #[validate(length(max = 30, message = "Phone too long"))]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(url(message = "Invalid website URL"))]
    pub website: Option<String>,

    #[validate(length(max = 255, message = "Address too long"))]
    pub address: Option<String>,

    #[validate(length(max = 100, message = "City too long"))]
    pub city: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSupportResourceRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    pub category: Option<String>,

    pub description: Option<String>,

    #[validate(length(max = 30, message = "Phone too long"))]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(url(message = "Invalid website URL"))]
    pub website: Option<String>,

    #[validate(length(max = 255, message = "Address too long"))]
    pub address: Option<String>,

    #[validate(length(max = 100, message = "City too long"))]
    pub city: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SupportQuery {
    pub category: Option<String>,
    pub city: Option<String>,
    pub q: Option<String>,
}
