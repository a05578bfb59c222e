use serde::Deserialize;

/// Table names used by the repositories. Built once at startup and handed to
/// every repository constructor; SQL never hardcodes a table name.
#[derive(Debug, Clone)]
pub struct Tables {
    pub users: String,
    pub calendar_events: String,
    pub diary_entries: String,
    pub weekly_entries: String,
    pub support_resources: String,
    pub educational_books: String,
    pub children_books: String,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            users: "users".into(),
            calendar_events: "calendar_events".into(),
            diary_entries: "diary_entries".into(),
            weekly_entries: "weekly_entries".into(),
            support_resources: "support_resources".into(),
            educational_books: "educational_books".into(),
            children_books: "children_books".into(),
        }
    }
}

impl Tables {
    pub fn books(&self, catalog: BookCatalog) -> &str {
        match catalog {
            BookCatalog::Educational => &self.educational_books,
            BookCatalog::Children => &self.children_books,
        }
    }
}

/// The two book directories share one shape but live in separate tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookCatalog {
    Educational,
    Children,
}

impl BookCatalog {
    pub const ALL: [BookCatalog; 2] = [BookCatalog::Educational, BookCatalog::Children];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookCatalog::Educational => "educational",
            BookCatalog::Children => "children",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_catalog_resolves_to_its_own_table() {
        let tables = Tables::default();
        assert_eq!(tables.books(BookCatalog::Educational), "educational_books");
        assert_eq!(tables.books(BookCatalog::Children), "children_books");
    }

    #[test]
    fn test_book_catalog_from_path_segment() {
        let c: BookCatalog = serde_json::from_str("\"children\"").unwrap();
        assert_eq!(c, BookCatalog::Children);
        assert!(serde_json::from_str::<BookCatalog>("\"comics\"").is_err());
    }
}
