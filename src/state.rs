use std::sync::Arc;

use anyhow::Context;

use crate::auth::repo::CredentialStore;
use crate::books::client::{CatalogClient, OpenLibraryClient};
use crate::books::services::TapCounter;
use crate::config::AppConfig;
use crate::storage::{FileStore, KvStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub credentials: CredentialStore,
    pub catalog: Arc<dyn CatalogClient>,
    pub taps: Arc<TapCounter>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = FileStore::open(&config.data_dir)
            .await
            .context("open credential store")?;
        tracing::info!(path = %store.path().display(), "credential store ready");
        let store = Arc::new(store) as Arc<dyn KvStore>;

        let catalog = Arc::new(OpenLibraryClient::new(&config.catalog)?) as Arc<dyn CatalogClient>;

        Ok(Self::from_parts(config, store, catalog))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn KvStore>,
        catalog: Arc<dyn CatalogClient>,
    ) -> Self {
        Self {
            config,
            credentials: CredentialStore::new(store),
            catalog,
            taps: Arc::new(TapCounter::default()),
        }
    }

    /// In-memory store and a catalog that returns `books`, or fails when `None`.
    #[cfg(test)]
    pub fn fake(books: Option<Vec<crate::books::dto::Book>>) -> Self {
        use crate::books::dto::Book;
        use crate::config::CatalogConfig;
        use crate::storage::MemoryStore;
        use async_trait::async_trait;

        struct FakeCatalog(Option<Vec<Book>>);
        #[async_trait]
        impl CatalogClient for FakeCatalog {
            async fn search(&self, _subject: &str, _limit: u32) -> anyhow::Result<Vec<Book>> {
                self.0.clone().ok_or_else(|| anyhow::anyhow!("catalog unreachable"))
            }
        }

        let config = Arc::new(AppConfig {
            data_dir: std::env::temp_dir(),
            catalog: CatalogConfig::default(),
        });
        Self::from_parts(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(FakeCatalog(books)),
        )
    }
}
