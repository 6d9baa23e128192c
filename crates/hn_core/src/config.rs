use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_ARTICLE_PREVIEW: usize = 3;
pub const DEFAULT_TITLE_LIMIT: usize = 50;
pub const HN_ITEM_URL: &str = "https://news.ycombinator.com/item?id={id}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub site_title: String,
    /// Index file, relative to the report source.
    pub index_file: String,
    pub page_size: usize,
    /// Articles shown per card before the "N more" line.
    pub article_preview: usize,
    pub title_limit: usize,
    /// Discussion thread URL, `{id}` is replaced with the HN item id.
    pub hn_item_url: String,
    pub rewrite_links: bool,
    pub highlight_theme: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            site_title: "HN AI Insights".to_string(),
            index_file: "reports.json".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            article_preview: DEFAULT_ARTICLE_PREVIEW,
            title_limit: DEFAULT_TITLE_LIMIT,
            hn_item_url: HN_ITEM_URL.to_string(),
            rewrite_links: true,
            highlight_theme: "InspiredGitHub".to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!("Loaded viewer config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::Config("page_size must be at least 1".to_string()));
        }
        if !self.hn_item_url.contains("{id}") {
            return Err(Error::Config(format!(
                "hn_item_url must contain an {{id}} placeholder: {}",
                self.hn_item_url
            )));
        }
        if self.index_file.trim().is_empty() {
            return Err(Error::Config("index_file must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn hn_item_url(&self, id: &str) -> String {
        self.hn_item_url.replace("{id}", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.article_preview, 3);
        assert_eq!(config.title_limit, 50);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.hn_item_url("12345"),
            "https://news.ycombinator.com/item?id=12345"
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"page_size": 5, "site_title": "Digest"}}"#).unwrap();

        let config = ViewerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(config.site_title, "Digest");
        assert_eq!(config.index_file, "reports.json");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ViewerConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = ViewerConfig {
            hn_item_url: "https://news.ycombinator.com/item".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
