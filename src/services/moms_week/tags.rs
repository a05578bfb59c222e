//! Free-text tags arrive in two encodings: JSON-array text written by the
//! current API, and comma-separated text from older clients.
//!
//! Fallback order used by [`parse_tags`]:
//! 1. missing or blank input gives no tags;
//! 2. a JSON array yields its string items (numbers are stringified, other
//!    values skipped); a JSON string literal is split like plain text;
//! 3. anything else is split on commas;
//! 4. if nothing survives trimming, the result is empty.

use serde_json::Value;

pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Ok(Value::String(s)) => split_plain(&s),
        Ok(Value::Null) => Vec::new(),
        _ => split_plain(raw),
    }
}

fn split_plain(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Canonical storage form: JSON-array text, or NULL for no tags.
pub fn encode_tags(tags: &[String]) -> Option<String> {
    let cleaned: Vec<&str> = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        serde_json::to_string(&cleaned).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_separated() {
        assert_eq!(parse_tags(Some("a,b,c")), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_comma_separated_with_spaces_and_blanks() {
        assert_eq!(parse_tags(Some(" paseo , ,parque ,")), vec!["paseo", "parque"]);
    }

    #[test]
    fn test_json_array() {
        assert_eq!(parse_tags(Some(r#"["a","b"]"#)), vec!["a", "b"]);
    }

    #[test]
    fn test_json_array_with_mixed_items() {
        assert_eq!(
            parse_tags(Some(r#"["baño", 3, null, {"x": 1}, "  "]"#)),
            vec!["baño", "3"]
        );
    }

    #[test]
    fn test_json_string_literal_is_split() {
        assert_eq!(parse_tags(Some(r#""a, b""#)), vec!["a", "b"]);
    }

    #[test]
    fn test_missing_or_blank() {
        assert!(parse_tags(None).is_empty());
        assert!(parse_tags(Some("")).is_empty());
        assert!(parse_tags(Some("   ")).is_empty());
        assert!(parse_tags(Some("null")).is_empty());
    }

    #[test]
    fn test_single_plain_word() {
        assert_eq!(parse_tags(Some("familia")), vec!["familia"]);
    }

    #[test]
    fn test_malformed_json_falls_back_to_commas() {
        assert_eq!(parse_tags(Some(r#"["a","b""#)), vec![r#"["a""#, r#""b""#]);
    }

    #[test]
    fn test_encode_then_parse() {
        let stored = encode_tags(&["siesta".into(), " ".into(), "parque".into()]).unwrap();
        assert_eq!(stored, r#"["siesta","parque"]"#);
        assert_eq!(parse_tags(Some(&stored)), vec!["siesta", "parque"]);
        assert!(encode_tags(&[]).is_none());
    }
}
