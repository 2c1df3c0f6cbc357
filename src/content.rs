use serde::Deserialize;

use crate::error::Error;

/// One post as supplied by the site's content store. Only `title` is
/// required; every other field is display metadata that is simply omitted
/// from the document when absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub full_content: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl ContentItem {
    /// The text that gets rendered. `full_content` wins over `description`
    /// when both are present.
    pub fn body(&self) -> &str {
        self.full_content
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or("")
    }

    pub fn from_json(content: &str) -> Result<Self, Error> {
        serde_json::from_str(content).map_err(|e| Error::InvalidContent(e.to_string()))
    }

    pub fn from_toml(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| Error::InvalidContent(e.to_string()))
    }

    /// Parse without knowing the format: try TOML first, then JSON.
    pub fn from_str_any(content: &str) -> Result<Self, Error> {
        match Self::from_toml(content) {
            Ok(item) => Ok(item),
            Err(_) => Self::from_json(content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ContentItem;

    #[test]
    fn full_content_wins_over_description() {
        let item = ContentItem {
            title: "T".to_string(),
            description: Some("short".to_string()),
            full_content: Some("long".to_string()),
            ..ContentItem::default()
        };
        assert_eq!(item.body(), "long");
    }

    #[test]
    fn missing_body_is_empty() {
        let item = ContentItem {
            title: "T".to_string(),
            ..ContentItem::default()
        };
        assert_eq!(item.body(), "");
    }

    #[test]
    fn parses_json_with_unknown_fields() {
        let item =
            ContentItem::from_json(r#"{"title": "Talk", "date": "2025-03-01", "views": 9}"#)
                .expect("json item");
        assert_eq!(item.title, "Talk");
        assert_eq!(item.date.as_deref(), Some("2025-03-01"));
    }

    #[test]
    fn from_str_any_accepts_both_formats() {
        let toml_item = ContentItem::from_str_any("title = \"A\"").expect("toml item");
        assert_eq!(toml_item.title, "A");

        let json_item = ContentItem::from_str_any(r#"{"title": "B"}"#).expect("json item");
        assert_eq!(json_item.title, "B");
    }

    #[test]
    fn missing_title_is_rejected() {
        assert!(ContentItem::from_json(r#"{"date": "2025-01-01"}"#).is_err());
    }
}
