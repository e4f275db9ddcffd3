use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub books_url: String,
    pub subject: String,
    pub limit: u32,
    pub covers_url: String,
    pub cover_placeholder_url: String,
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            books_url: "https://openlibrary.org/search.json".into(),
            subject: "education".into(),
            limit: 20,
            covers_url: "https://covers.openlibrary.org/b/id".into(),
            cover_placeholder_url: "https://via.placeholder.com/150x200".into(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = CatalogConfig::default();
        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let catalog = CatalogConfig {
            books_url: std::env::var("BOOKS_URL").unwrap_or(defaults.books_url),
            subject: std::env::var("BOOKS_SUBJECT").unwrap_or(defaults.subject),
            limit: std::env::var("BOOKS_LIMIT")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(defaults.limit),
            covers_url: std::env::var("COVERS_URL").unwrap_or(defaults.covers_url),
            cover_placeholder_url: std::env::var("COVER_PLACEHOLDER_URL")
                .unwrap_or(defaults.cover_placeholder_url),
            timeout_secs: std::env::var("CATALOG_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(defaults.timeout_secs),
        };
        Ok(Self { data_dir, catalog })
    }
}
