use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Datelike, Utc};

pub const DEFAULT_KEEP_PER_USER: usize = 5;

const REPORT_PREFIX: &str = "diario-semanal-";

fn user_prefix(user_id: i64) -> String {
    format!("{}{}-semana-", REPORT_PREFIX, user_id)
}

/// `diario-semanal-<userId>-semana-<week>-<isoYear>-<millis>.pdf`
pub fn report_file_name(
    user_id: i64,
    iso_year: i32,
    week: u32,
    generated_at: DateTime<Utc>,
) -> String {
    format!(
        "{}{}-{}-{}.pdf",
        user_prefix(user_id),
        week,
        iso_year,
        generated_at.timestamp_millis()
    )
}

/// True when `file_name` is a plain report name owned by `user_id`.
pub fn is_user_report(file_name: &str, user_id: i64) -> bool {
    !file_name.contains(['/', '\\'])
        && !file_name.contains("..")
        && file_name.starts_with(&user_prefix(user_id))
        && file_name.ends_with(".pdf")
}

/// Week, ISO year and generation time encoded in a report name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportName {
    pub week: u32,
    pub iso_year: i32,
    pub generated_millis: i64,
}

/// Reads a report name of `user_id`. Names without the year segment
/// (`...-semana-<week>-<millis>.pdf`) take the ISO year of their timestamp.
pub fn parse_report_name(file_name: &str, user_id: i64) -> Option<ReportName> {
    if !is_user_report(file_name, user_id) {
        return None;
    }
    let rest = file_name
        .strip_prefix(&user_prefix(user_id))?
        .strip_suffix(".pdf")?;

    let parts: Vec<&str> = rest.split('-').collect();
    let (week, year, millis) = match parts.as_slice() {
        [week, year, millis] => (*week, Some(*year), *millis),
        [week, millis] => (*week, None, *millis),
        _ => return None,
    };

    let week = week.parse::<u32>().ok()?;
    let generated_millis = millis.parse::<i64>().ok()?;
    let iso_year = match year {
        Some(y) => y.parse::<i32>().ok()?,
        None => DateTime::<Utc>::from_timestamp_millis(generated_millis)?
            .date_naive()
            .iso_week()
            .year(),
    };

    Some(ReportName {
        week,
        iso_year,
        generated_millis,
    })
}

#[derive(Debug, Clone)]
pub struct ReportFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
    /// Timestamp from the name; 0 when the name does not parse.
    pub generated_millis: i64,
}

/// The user's report files, newest first. A missing directory means no files.
pub async fn list_user_reports(dir: &Path, user_id: i64) -> io::Result<Vec<ReportFile>> {
    let mut read_dir = match tokio::fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut files = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_user_report(&name, user_id) {
            continue;
        }
        let meta = match entry.metadata().await {
            Ok(m) if m.is_file() => m,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "Skipping unreadable report file");
                continue;
            }
        };
        let generated_millis = parse_report_name(&name, user_id)
            .map(|n| n.generated_millis)
            .unwrap_or(0);
        files.push(ReportFile {
            name,
            path: entry.path(),
            size: meta.len(),
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            generated_millis,
        });
    }

    sort_newest_first(&mut files);
    Ok(files)
}

fn sort_newest_first(files: &mut [ReportFile]) {
    files.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| b.generated_millis.cmp(&a.generated_millis))
            .then_with(|| b.name.cmp(&a.name))
    });
}

/// Files beyond the newest `keep`.
pub fn select_expired(mut files: Vec<ReportFile>, keep: usize) -> Vec<ReportFile> {
    sort_newest_first(&mut files);
    files.into_iter().skip(keep).collect()
}

/// Deletes all but the `keep` most recent reports of a user.
///
/// Never fails: listing and per-file deletion errors are logged and skipped.
/// Returns how many files were removed.
pub async fn enforce_retention(dir: &Path, user_id: i64, keep: usize) -> usize {
    let files = match list_user_reports(dir, user_id).await {
        Ok(files) => files,
        Err(e) => {
            tracing::warn!(user_id, dir = %dir.display(), error = %e, "Report retention listing failed");
            return 0;
        }
    };

    remove_reports(user_id, select_expired(files, keep)).await
}

/// Removes each file, logging and skipping failures. Returns how many went.
async fn remove_reports(user_id: i64, files: impl IntoIterator<Item = ReportFile>) -> usize {
    let mut removed = 0;
    for file in files {
        match tokio::fs::remove_file(&file.path).await {
            Ok(()) => {
                removed += 1;
                tracing::debug!(user_id, file = %file.name, "Report removed");
            }
            Err(e) => {
                tracing::warn!(user_id, file = %file.name, error = %e, "Failed to remove report");
            }
        }
    }
    removed
}

/// Report files of all users. A missing directory counts as zero.
pub async fn count_all_reports(dir: &Path) -> io::Result<usize> {
    let mut read_dir = match tokio::fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut count = 0;
    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(REPORT_PREFIX) && name.ends_with(".pdf") {
            count += 1;
        }
    }
    Ok(count)
}

/// Deletes every report of one user for ISO week `week` of `iso_year`.
///
/// Only a failed listing is an error; files that cannot be removed are
/// logged and skipped. Returns the number removed.
pub async fn delete_week_reports(
    dir: &Path,
    user_id: i64,
    iso_year: i32,
    week: u32,
) -> io::Result<usize> {
    let matching = list_user_reports(dir, user_id)
        .await?
        .into_iter()
        .filter(|file| {
            parse_report_name(&file.name, user_id)
                .is_some_and(|n| n.week == week && n.iso_year == iso_year)
        });
    Ok(remove_reports(user_id, matching).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;

    fn touch(dir: &Path, name: &str, age_secs: u64) {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .unwrap();
    }

    fn names(files: &[ReportFile]) -> Vec<&str> {
        files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_file_name_format() {
        let at = DateTime::<Utc>::from_timestamp_millis(1_770_000_000_123).unwrap();
        let name = report_file_name(12, 2026, 7, at);
        assert_eq!(name, "diario-semanal-12-semana-7-2026-1770000000123.pdf");
        assert_eq!(
            parse_report_name(&name, 12),
            Some(ReportName {
                week: 7,
                iso_year: 2026,
                generated_millis: 1_770_000_000_123,
            })
        );
    }

    #[test]
    fn test_parse_name_without_year_uses_timestamp_year() {
        // 2021-01-01 belongs to ISO week 53 of 2020
        let millis = 1_609_459_200_000;
        let name = format!("diario-semanal-3-semana-53-{}.pdf", millis);
        let parsed = parse_report_name(&name, 3).unwrap();
        assert_eq!(parsed.week, 53);
        assert_eq!(parsed.iso_year, 2020);
        assert_eq!(parsed.generated_millis, millis);

        assert_eq!(parse_report_name(&name, 4), None);
        assert_eq!(parse_report_name("diario-semanal-3-semana-x-1.pdf", 3), None);
        assert_eq!(parse_report_name("diario-semanal-3-semana-7.pdf", 3), None);
    }

    #[test]
    fn test_is_user_report() {
        assert!(is_user_report("diario-semanal-1-semana-7-1.pdf", 1));
        assert!(!is_user_report("diario-semanal-12-semana-7-1.pdf", 1));
        assert!(!is_user_report("diario-semanal-1-semana-7-1.html", 1));
        assert!(!is_user_report("../diario-semanal-1-semana-7-1.pdf", 1));
        assert!(!is_user_report("diario-semanal-1-semana-7/../../x.pdf", 1));
    }

    #[tokio::test]
    async fn test_list_ignores_other_users_and_sorts_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "diario-semanal-1-semana-6-100.pdf", 300);
        touch(dir.path(), "diario-semanal-1-semana-7-200.pdf", 10);
        touch(dir.path(), "diario-semanal-11-semana-7-300.pdf", 0);
        touch(dir.path(), "notes.txt", 0);

        let files = list_user_reports(dir.path(), 1).await.unwrap();
        assert_eq!(
            names(&files),
            vec![
                "diario-semanal-1-semana-7-200.pdf",
                "diario-semanal-1-semana-6-100.pdf"
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let files = list_user_reports(&dir.path().join("absent"), 1).await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_retention_keeps_five_most_recent() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..8u64 {
            // i = 0 is the newest
            touch(
                dir.path(),
                &format!("diario-semanal-3-semana-{}-2026-{}.pdf", i + 1, 100 - i),
                i * 60,
            );
        }
        touch(dir.path(), "diario-semanal-4-semana-1-1.pdf", 9999);

        let removed = enforce_retention(dir.path(), 3, DEFAULT_KEEP_PER_USER).await;
        assert_eq!(removed, 3);

        let left = list_user_reports(dir.path(), 3).await.unwrap();
        assert_eq!(left.len(), 5);
        assert!(left.iter().all(|f| {
            let week: u32 = f.name.split('-').nth(4).unwrap().parse().unwrap();
            week <= 5
        }));
        // other users are untouched
        assert_eq!(list_user_reports(dir.path(), 4).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_retention_under_cap_removes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "diario-semanal-3-semana-1-1.pdf", 0);
        assert_eq!(enforce_retention(dir.path(), 3, 5).await, 0);
        assert_eq!(enforce_retention(&dir.path().join("absent"), 3, 5).await, 0);
    }

    #[test]
    fn test_select_expired_orders_by_mtime() {
        let now = SystemTime::now();
        let file = |name: &str, age: u64| ReportFile {
            name: name.into(),
            path: PathBuf::from(name),
            size: 0,
            modified: now - Duration::from_secs(age),
            generated_millis: 0,
        };
        let expired = select_expired(vec![file("old", 100), file("new", 1), file("mid", 50)], 2);
        assert_eq!(names(&expired), vec!["old"]);
    }

    #[test]
    fn test_equal_mtimes_order_by_name_timestamp() {
        let modified = SystemTime::now();
        let file = |name: &str| ReportFile {
            name: name.into(),
            path: PathBuf::from(name),
            size: 0,
            modified,
            generated_millis: parse_report_name(name, 1).unwrap().generated_millis,
        };
        // name order alone would expire week 10
        let files = vec![
            file("diario-semanal-1-semana-8-2026-1000.pdf"),
            file("diario-semanal-1-semana-10-2026-3000.pdf"),
            file("diario-semanal-1-semana-9-2026-2000.pdf"),
        ];

        let expired = select_expired(files, 2);
        assert_eq!(names(&expired), vec!["diario-semanal-1-semana-8-2026-1000.pdf"]);
    }

    #[tokio::test]
    async fn test_delete_week_reports_only_touches_that_week() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "diario-semanal-2-semana-7-2026-1.pdf", 0);
        touch(dir.path(), "diario-semanal-2-semana-7-2026-2.pdf", 0);
        touch(dir.path(), "diario-semanal-2-semana-17-2026-3.pdf", 0);
        touch(dir.path(), "diario-semanal-5-semana-7-2026-4.pdf", 0);

        assert_eq!(delete_week_reports(dir.path(), 2, 2026, 7).await.unwrap(), 2);
        let left = list_user_reports(dir.path(), 2).await.unwrap();
        assert_eq!(names(&left), vec!["diario-semanal-2-semana-17-2026-3.pdf"]);
        assert_eq!(list_user_reports(dir.path(), 5).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_week_reports_keeps_other_years() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "diario-semanal-2-semana-7-2025-1.pdf", 0);
        touch(dir.path(), "diario-semanal-2-semana-7-2026-2.pdf", 0);
        // pre-year name written in 1970
        touch(dir.path(), "diario-semanal-2-semana-7-3.pdf", 0);

        assert_eq!(delete_week_reports(dir.path(), 2, 2026, 7).await.unwrap(), 1);
        let mut left: Vec<String> = list_user_reports(dir.path(), 2)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        left.sort();
        assert_eq!(
            left,
            vec![
                "diario-semanal-2-semana-7-2025-1.pdf",
                "diario-semanal-2-semana-7-3.pdf"
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_reports_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "diario-semanal-2-semana-7-2026-2.pdf", 0);
        let file = |name: &str| ReportFile {
            name: name.into(),
            path: dir.path().join(name),
            size: 0,
            modified: SystemTime::now(),
            generated_millis: 0,
        };

        let removed = remove_reports(
            2,
            vec![
                file("diario-semanal-2-semana-7-2026-1.pdf"),
                file("diario-semanal-2-semana-7-2026-2.pdf"),
            ],
        )
        .await;
        assert_eq!(removed, 1);
        assert!(list_user_reports(dir.path(), 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_count_all_reports_spans_users() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "diario-semanal-2-semana-7-1.pdf", 0);
        touch(dir.path(), "diario-semanal-5-semana-7-4.pdf", 0);
        touch(dir.path(), "readme.txt", 0);

        assert_eq!(count_all_reports(dir.path()).await.unwrap(), 2);
        assert_eq!(count_all_reports(&dir.path().join("absent")).await.unwrap(), 0);
    }
}
