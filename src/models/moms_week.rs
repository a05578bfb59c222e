use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::services::moms_week::tags::parse_tags;

/// One journal contribution for a user/day. Rows are never updated except
/// for the soft-delete flag.
#[derive(Debug, Clone, FromRow)]
pub struct WeeklyEntry {
    pub id: i64,
    pub user_id: i64,
    pub entry_date: NaiveDate,
    pub photo_count: i32,
    pub word_count: i32,
    pub happy_moments: i32,
    pub emotion: Option<String>,
    /// Stored as JSON-array text; legacy rows hold comma-separated text.
    pub tags: Option<String>,
    pub note: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct WeeklyEntryResponse {
    pub id: i64,
    pub user_id: i64,
    pub entry_date: NaiveDate,
    pub photo_count: i32,
    pub word_count: i32,
    pub happy_moments: i32,
    pub emotion: Option<String>,
    pub tags: Vec<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<WeeklyEntry> for WeeklyEntryResponse {
    fn from(e: WeeklyEntry) -> Self {
        Self {
            tags: parse_tags(e.tags.as_deref()),
            id: e.id,
            user_id: e.user_id,
            entry_date: e.entry_date,
            photo_count: e.photo_count,
            word_count: e.word_count,
            happy_moments: e.happy_moments,
            emotion: e.emotion,
            note: e.note,
            created_at: e.created_at,
        }
    }
}

/// POST /moms-week/:userId/entries
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWeeklyEntryRequest {
    /// Default: today (UTC)
    pub entry_date: Option<NaiveDate>,

    #[validate(range(min = 0, max = 10000, message = "photoCount must be 0-10000"))]
    #[serde(default)]
    pub photo_count: i32,

    #[validate(range(min = 0, max = 1000000, message = "wordCount must be 0-1000000"))]
    #[serde(default)]
    pub word_count: i32,

    #[validate(range(min = 0, max = 1000, message = "happyMoments must be 0-1000"))]
    #[serde(default)]
    pub happy_moments: i32,

    #[validate(length(min = 1, max = 50, message = "emotion must be 1-50 characters"))]
    pub emotion: Option<String>,

    #[validate(length(max = 30, message = "At most 30 tags"))]
    #[serde(default)]
    pub tags: Vec<String>,

    #[validate(length(max = 5000, message = "note must be under 5000 characters"))]
    pub note: Option<String>,
}

impl CreateWeeklyEntryRequest {
    /// Trimmed emotion; blank input counts as no emotion.
    pub fn emotion(&self) -> Option<&str> {
        self.emotion
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

/// Week selector shared by the moms-week read endpoints: either a reference
/// `date` or an ISO `week` (with optional `year`).
#[derive(Debug, Default, Deserialize)]
pub struct WeekQuery {
    pub date: Option<NaiveDate>,
    pub week: Option<u32>,
    pub year: Option<i32>,
}

/// DELETE /moms-week/:userId/pdfs
#[derive(Debug, Deserialize)]
pub struct DeleteReportsQuery {
    pub week: u32,
    pub year: Option<i32>,
    #[serde(default)]
    pub db: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReportsResponse {
    pub week_number: u32,
    pub files_deleted: usize,
    pub entries_deleted: u64,
}

/// Metadata returned by POST /moms-week/:userId/generate-pdf
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPdf {
    pub pdf_url: String,
    pub pdf_path: String,
    #[serde(skip)]
    pub file_name: String,
    pub week_number: u32,
    pub date_range: String,
    pub generated_at: DateTime<Utc>,
    pub file_size: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReport {
    pub file_name: String,
    pub pdf_url: String,
    pub file_size: u64,
    pub modified_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(emotion: Option<&str>) -> CreateWeeklyEntryRequest {
        let mut body = serde_json::json!({ "photoCount": 1 });
        if let Some(e) = emotion {
            body["emotion"] = e.into();
        }
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_emotion_is_trimmed() {
        assert_eq!(request(Some("  feliz ")).emotion(), Some("feliz"));
        assert_eq!(request(None).emotion(), None);
    }

    #[test]
    fn test_blank_emotion_is_dropped() {
        let body = request(Some("   "));
        assert!(body.validate().is_ok());
        assert_eq!(body.emotion(), None);
    }
}
