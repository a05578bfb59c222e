use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DiaryEntry {
    pub id: i64,
    pub user_id: i64,
    pub entry_date: NaiveDate,
    pub title: Option<String>,
    pub content: String,
    pub mood: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDiaryEntryRequest {
    /// Default: today (UTC)
    pub entry_date: Option<NaiveDate>,

    #[validate(length(max = 200, message = "Title must be under 200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 20000, message = "Content must be 1-20000 characters"))]
    pub content: String,

    #[validate(length(min = 1, max = 50, message = "Mood must be 1-50 characters"))]
    pub mood: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDiaryEntryRequest {
    pub entry_date: Option<NaiveDate>,

    #[validate(length(max = 200, message = "Title must be under 200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 20000, message = "Content must be 1-20000 characters"))]
    pub content: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Mood must be 1-50 characters"))]
    pub mood: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DiaryQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub mood: Option<String>,
    pub q: Option<String>,
}
