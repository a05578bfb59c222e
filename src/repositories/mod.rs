pub mod books;
pub mod calendar;
pub mod diary;
pub mod moms_week;
pub mod stats;
pub mod support;
pub mod users;

/// `%term%` for a LIKE filter, with the LIKE wildcards in `term` escaped.
/// Blank terms yield `None` so the filter is skipped.
pub(crate) fn like_pattern(term: Option<&str>) -> Option<String> {
    let term = term.map(str::trim).filter(|t| !t.is_empty())?;
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{}%", escaped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern(Some("cuna")), Some("%cuna%".into()));
        assert_eq!(like_pattern(Some(" 100%_ ")), Some("%100\\%\\_%".into()));
        assert_eq!(like_pattern(Some("   ")), None);
        assert_eq!(like_pattern(None), None);
    }
}
