use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::tags::parse_tags;
use super::week::{weekday_name, WeekRange};
use crate::models::moms_week::WeeklyEntry;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub day_name: &'static str,
    pub photos: i64,
    pub words: i64,
    pub happy_moments: i64,
    pub entries: u32,
    pub emotions: Vec<String>,
    pub tags: Vec<String>,
    pub notes: Vec<String>,
}

impl DaySummary {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            day_name: weekday_name(date.weekday()),
            photos: 0,
            words: 0,
            happy_moments: 0,
            entries: 0,
            emotions: Vec::new(),
            tags: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub total_photos: i64,
    pub total_words: i64,
    pub total_happy_moments: i64,
    pub total_entries: u32,
    pub emotions: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub range: WeekRange,
    pub date_range: String,
    pub days: Vec<DaySummary>,
    pub summary: WeekSummary,
}

/// Shape of GET /moms-week/:userId/weekly-stats.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyStats {
    pub fotos: i64,
    pub palabras: i64,
    #[serde(rename = "momentosFelices")]
    pub momentos_felices: i64,
    pub entradas: u32,
    pub emociones: BTreeMap<String, u32>,
}

impl From<&WeeklyReport> for WeeklyStats {
    fn from(report: &WeeklyReport) -> Self {
        let s = &report.summary;
        Self {
            fotos: s.total_photos,
            palabras: s.total_words,
            momentos_felices: s.total_happy_moments,
            entradas: s.total_entries,
            emociones: s.emotions.clone(),
        }
    }
}

/// Folds a week's entries into seven per-day buckets plus totals.
///
/// Inactive entries and entries outside `range` are ignored. A week with no
/// entries yields seven empty days and zero totals.
pub fn aggregate_week(range: &WeekRange, entries: &[WeeklyEntry]) -> WeeklyReport {
    let mut days: Vec<DaySummary> = range.days().map(DaySummary::empty).collect();

    for entry in entries
        .iter()
        .filter(|e| e.is_active && range.contains(e.entry_date))
    {
        let idx = (entry.entry_date - range.start).num_days() as usize;
        let day = &mut days[idx];

        day.photos += entry.photo_count.max(0) as i64;
        day.words += entry.word_count.max(0) as i64;
        day.happy_moments += entry.happy_moments.max(0) as i64;
        day.entries += 1;

        if let Some(emotion) = entry.emotion.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            day.emotions.push(emotion.to_string());
        }
        for tag in parse_tags(entry.tags.as_deref()) {
            if !day.tags.contains(&tag) {
                day.tags.push(tag);
            }
        }
        if let Some(note) = entry.note.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            day.notes.push(note.to_string());
        }
    }

    let mut summary = WeekSummary::default();
    for day in &days {
        summary.total_photos += day.photos;
        summary.total_words += day.words;
        summary.total_happy_moments += day.happy_moments;
        summary.total_entries += day.entries;
        for emotion in &day.emotions {
            *summary.emotions.entry(emotion.clone()).or_insert(0) += 1;
        }
    }

    WeeklyReport {
        range: *range,
        date_range: range.label(),
        days,
        summary,
    }
}
