//! Weekly journal ("moms week") report pipeline: week resolution, aggregation
//! of daily entries, HTML rendering, PDF rasterization through a pluggable
//! [`PdfRenderer`], and per-user file retention.

pub mod aggregate;
pub mod renderer;
pub mod report;
pub mod retention;
pub mod tags;
pub mod week;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::error::{AppError, AppResult};
use crate::models::moms_week::{GeneratedPdf, StoredReport, WeekQuery};
use crate::repositories::moms_week::WeeklyEntryRepository;
use crate::repositories::users::UserRepository;
use crate::AppState;

use aggregate::{aggregate_week, WeeklyReport};
use renderer::PdfRenderer;
use week::WeekRange;

pub struct ReportPipeline {
    renderer: Arc<dyn PdfRenderer>,
    output_dir: PathBuf,
    keep: usize,
}

impl ReportPipeline {
    pub fn new(renderer: Arc<dyn PdfRenderer>, output_dir: impl Into<PathBuf>, keep: usize) -> Self {
        Self {
            renderer,
            output_dir: output_dir.into(),
            keep,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Renders `report` to a new PDF file, then trims the user's older files.
    /// Cleanup problems are logged inside retention and never fail the call.
    pub async fn publish(
        &self,
        user_id: i64,
        report: &WeeklyReport,
        owner_name: &str,
    ) -> AppResult<GeneratedPdf> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("creating {}", self.output_dir.display()))?;

        let generated_at = Utc::now();
        let file_name = retention::report_file_name(
            user_id,
            report.range.iso_year,
            report.range.week,
            generated_at,
        );
        let path = self.output_dir.join(&file_name);

        let html = report::render_html(report, owner_name);
        self.renderer
            .render(&html, &path)
            .await
            .with_context(|| format!("rendering weekly report {}", file_name))?;

        let file_size = tokio::fs::metadata(&path)
            .await
            .with_context(|| format!("reading size of {}", path.display()))?
            .len();

        let removed = retention::enforce_retention(&self.output_dir, user_id, self.keep).await;

        tracing::info!(
            user_id,
            week = report.range.week,
            file = %file_name,
            file_size,
            old_reports_removed = removed,
            "Weekly report generated"
        );

        Ok(GeneratedPdf {
            pdf_url: report_url(user_id, &file_name),
            pdf_path: path.display().to_string(),
            file_name,
            week_number: report.range.week,
            date_range: report.date_range.clone(),
            generated_at,
            file_size,
        })
    }

    pub async fn stored_reports(&self, user_id: i64) -> AppResult<Vec<StoredReport>> {
        let files = retention::list_user_reports(&self.output_dir, user_id)
            .await
            .context("listing stored reports")?;
        Ok(files
            .into_iter()
            .map(|f| StoredReport {
                pdf_url: report_url(user_id, &f.name),
                modified_at: DateTime::<Utc>::from(f.modified),
                file_size: f.size,
                file_name: f.name,
            })
            .collect())
    }

    /// Removes the user's reports of `range`, matching both ISO week and year.
    pub async fn delete_week(&self, user_id: i64, range: &WeekRange) -> AppResult<usize> {
        let removed =
            retention::delete_week_reports(&self.output_dir, user_id, range.iso_year, range.week)
                .await
                .with_context(|| {
                    format!("deleting reports of week {}-W{:02}", range.iso_year, range.week)
                })?;
        Ok(removed)
    }

    pub async fn count_all(&self) -> AppResult<usize> {
        let count = retention::count_all_reports(&self.output_dir)
            .await
            .context("counting stored reports")?;
        Ok(count)
    }

    /// Path of one of the user's stored reports.
    pub async fn locate(&self, user_id: i64, file_name: &str) -> AppResult<PathBuf> {
        if !retention::is_user_report(file_name, user_id) {
            return Err(AppError::NotFound("Report not found".into()));
        }
        let path = self.output_dir.join(file_name);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(AppError::NotFound("Report not found".into()));
        }
        Ok(path)
    }
}

pub fn report_url(user_id: i64, file_name: &str) -> String {
    format!("/moms-week/{}/pdfs/{}", user_id, file_name)
}

/// `week` (with `year`, default: the ISO year of `today`) wins over `date`;
/// with neither, the current week is used.
pub fn resolve_week(query: &WeekQuery, today: NaiveDate) -> AppResult<WeekRange> {
    match query.week {
        Some(week) => {
            let year = query.year.unwrap_or_else(|| today.iso_week().year());
            WeekRange::from_iso(year, week).ok_or_else(|| {
                AppError::Validation(format!("Week {} does not exist in {}", week, year))
            })
        }
        None => Ok(WeekRange::containing(query.date.unwrap_or(today))),
    }
}

pub async fn load_report(state: &AppState, user_id: i64, range: &WeekRange) -> AppResult<WeeklyReport> {
    let entries = WeeklyEntryRepository::new(&state.db, &state.tables)
        .list_active_between(user_id, range.start, range.end)
        .await?;
    Ok(aggregate_week(range, &entries))
}

pub async fn owner_name(state: &AppState, user_id: i64) -> AppResult<String> {
    UserRepository::new(&state.db, &state.tables)
        .find_active_by_id(user_id)
        .await?
        .map(|u| u.name)
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

#[cfg(test)]
mod tests {
    use super::aggregate::tests::entry;
    use super::renderer::tests::{FailingRenderer, FakeRenderer};
    use super::*;
    use chrono::Duration;
    use std::sync::atomic::Ordering;

    fn range() -> WeekRange {
        WeekRange::containing(NaiveDate::from_ymd_opt(2026, 2, 11).unwrap())
    }

    #[tokio::test]
    async fn test_publish_empty_week_produces_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Arc::new(FakeRenderer::default());
        let pipeline = ReportPipeline::new(renderer.clone(), dir.path(), 5);

        let report = aggregate_week(&range(), &[]);
        let pdf = pipeline.publish(9, &report, "Ana").await.unwrap();

        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(pdf.week_number, 7);
        assert_eq!(pdf.date_range, "09/02/2026 - 15/02/2026");
        assert!(pdf.file_name.starts_with("diario-semanal-9-semana-7-2026-"));
        assert_eq!(pdf.pdf_url, format!("/moms-week/9/pdfs/{}", pdf.file_name));

        let wire = serde_json::to_value(&pdf).unwrap();
        let mut keys: Vec<&str> = wire.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["dateRange", "fileSize", "generatedAt", "pdfPath", "pdfUrl", "weekNumber"]
        );
        assert_eq!(wire["pdfUrl"], pdf.pdf_url.as_str());
        assert_eq!(wire["weekNumber"], 7);
        assert_eq!(wire["dateRange"], "09/02/2026 - 15/02/2026");
        assert_eq!(wire["fileSize"], pdf.file_size);
        assert!(wire["generatedAt"].as_str().unwrap().starts_with("20"));

        let bytes = std::fs::read(&pdf.pdf_path).unwrap();
        assert_eq!(bytes.len() as u64, pdf.file_size);
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.matches("Sin entradas este día").count(), 7);
    }

    #[tokio::test]
    async fn test_publish_never_leaves_more_than_five_files() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ReportPipeline::new(Arc::new(FakeRenderer::default()), dir.path(), 5);
        let r = range();
        let report = aggregate_week(&r, &[entry(r.start, 1, 1, 1)]);

        for _ in 0..8 {
            pipeline.publish(4, &report, "Ana").await.unwrap();
            // distinct millisecond timestamps in file names
            tokio::time::sleep(std::time::Duration::from_millis(3)).await;
            let stored = pipeline.stored_reports(4).await.unwrap();
            assert!(stored.len() <= 5);
        }
        assert_eq!(pipeline.stored_reports(4).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_renderer_failure_is_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ReportPipeline::new(Arc::new(FailingRenderer), dir.path(), 5);
        let report = aggregate_week(&range(), &[]);
        let err = pipeline.publish(1, &report, "Ana").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_locate_rejects_foreign_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ReportPipeline::new(Arc::new(FakeRenderer::default()), dir.path(), 5);
        let pdf = pipeline
            .publish(2, &aggregate_week(&range(), &[]), "Ana")
            .await
            .unwrap();

        assert!(pipeline.locate(2, &pdf.file_name).await.is_ok());
        assert!(matches!(
            pipeline.locate(3, &pdf.file_name).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            pipeline.locate(2, "diario-semanal-2-semana-1-0.pdf").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_week_removes_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ReportPipeline::new(Arc::new(FakeRenderer::default()), dir.path(), 5);
        let this_week = aggregate_week(&range(), &[]);
        let next_week = aggregate_week(&WeekRange::containing(range().end + Duration::days(1)), &[]);

        pipeline.publish(2, &this_week, "Ana").await.unwrap();
        pipeline.publish(2, &next_week, "Ana").await.unwrap();

        assert_eq!(pipeline.delete_week(2, &range()).await.unwrap(), 1);
        let left = pipeline.stored_reports(2).await.unwrap();
        assert_eq!(left.len(), 1);
        assert!(left[0].file_name.contains("-semana-8-"));
    }

    #[tokio::test]
    async fn test_delete_week_keeps_same_week_of_other_year() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ReportPipeline::new(Arc::new(FakeRenderer::default()), dir.path(), 5);
        let last_year = WeekRange::containing(NaiveDate::from_ymd_opt(2025, 2, 12).unwrap());
        assert_eq!((last_year.iso_year, last_year.week), (2025, 7));

        pipeline.publish(2, &aggregate_week(&last_year, &[]), "Ana").await.unwrap();
        pipeline.publish(2, &aggregate_week(&range(), &[]), "Ana").await.unwrap();

        assert_eq!(pipeline.delete_week(2, &range()).await.unwrap(), 1);
        let left = pipeline.stored_reports(2).await.unwrap();
        assert_eq!(left.len(), 1);
        assert!(left[0].file_name.starts_with("diario-semanal-2-semana-7-2025-"));
    }

    #[test]
    fn test_resolve_week() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 11).unwrap();

        let current = resolve_week(&WeekQuery::default(), today).unwrap();
        assert_eq!(current.week, 7);

        let by_date = resolve_week(
            &WeekQuery {
                date: NaiveDate::from_ymd_opt(2026, 1, 1),
                ..Default::default()
            },
            today,
        )
        .unwrap();
        assert_eq!(by_date.week, 1);

        let by_week = resolve_week(
            &WeekQuery {
                week: Some(10),
                year: Some(2025),
                ..Default::default()
            },
            today,
        )
        .unwrap();
        assert_eq!(by_week.start, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());

        for bad in [0, 54, 60] {
            let q = WeekQuery {
                week: Some(bad),
                ..Default::default()
            };
            assert!(matches!(resolve_week(&q, today), Err(AppError::Validation(_))));
        }
    }
}
