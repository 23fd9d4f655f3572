use serde::{Deserialize, Serialize};

/// One book as delivered to the carousel
///
/// Records are immutable once published; a new search produces a new list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(default)]
    pub author: Vec<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub cover_id: Option<u64>,
    #[serde(default)]
    pub isbn: Vec<String>,
    #[serde(default)]
    pub link_key: Option<String>,
}

impl ItemRecord {
    /// Authors joined for display, empty when none are known
    pub fn author_list(&self) -> String {
        self.author.join(", ")
    }

    /// First ISBN, if any
    pub fn first_isbn(&self) -> Option<&str> {
        self.isbn
            .iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_list() {
        let item = ItemRecord {
            author: vec!["Terry Pratchett".into(), "Neil Gaiman".into()],
            title: "Good Omens".into(),
            ..Default::default()
        };
        assert_eq!(item.author_list(), "Terry Pratchett, Neil Gaiman");
        assert_eq!(ItemRecord::default().author_list(), "");
    }

    #[test]
    fn test_first_isbn_skips_blank_entries() {
        let item = ItemRecord {
            isbn: vec!["  ".into(), "9780552137034".into()],
            ..Default::default()
        };
        assert_eq!(item.first_isbn(), Some("9780552137034"));
        assert_eq!(ItemRecord::default().first_isbn(), None);
    }

    #[test]
    fn test_missing_fields_deserialize() {
        let item: ItemRecord = serde_json::from_str(r#"{"title":"Dune"}"#).unwrap();
        assert_eq!(item.title, "Dune");
        assert!(item.author.is_empty());
        assert!(item.cover_id.is_none());
    }
}
