use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub purchase_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_create_age_range"))]
pub struct CreateBookRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 150, message = "Author too long"))]
    pub author: Option<String>,

    #[validate(length(max = 50, message = "Category too long"))]
    pub category: Option<String>,

    #[validate(range(min = 0, max = 18, message = "age_min must be 0-18"))]
    pub age_min: Option<i32>,

    #[validate(range(min = 0, max = 18, message = "age_max must be 0-18"))]
    pub age_max: Option<i32>,

    pub description: Option<String>,

    #[validate(url(message = "Invalid cover URL"))]
    pub cover_url: Option<String>,

    #[validate(url(message = "Invalid purchase URL"))]
    pub purchase_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_update_age_range"))]
pub struct UpdateBookRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 150, message = "Author too long"))]
    pub author: Option<String>,

    #[validate(length(max = 50, message = "Category too long"))]
    pub category: Option<String>,

    #[validate(range(min = 0, max = 18, message = "age_min must be 0-18"))]
    pub age_min: Option<i32>,

    #[validate(range(min = 0, max = 18, message = "age_max must be 0-18"))]
    pub age_max: Option<i32>,

    pub description: Option<String>,

    #[validate(url(message = "Invalid cover URL"))]
    pub cover_url: Option<String>,

    #[validate(url(message = "Invalid purchase URL"))]
    pub purchase_url: Option<String>,
}

fn check_age_range(min: Option<i32>, max: Option<i32>) -> Result<(), ValidationError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => {
            let mut err = ValidationError::new("age_range");
            err.message = Some("age_min must not exceed age_max".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

fn validate_create_age_range(req: &CreateBookRequest) -> Result<(), ValidationError> {
    check_age_range(req.age_min, req.age_max)
}

fn validate_update_age_range(req: &UpdateBookRequest) -> Result<(), ValidationError> {
    check_age_range(req.age_min, req.age_max)
}

#[derive(Debug, Default, Deserialize)]
pub struct BookQuery {
    pub category: Option<String>,
    /// Child age in years; matches books whose range includes it.
    pub age: Option<i32>,
    pub q: Option<String>,
}
