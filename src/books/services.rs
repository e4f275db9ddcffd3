use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{error, info};

use super::{
    client::CatalogClient,
    dto::{Book, BookItem},
};
use crate::config::CatalogConfig;

const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Taps on list items for the lifetime of the process. Owned by `AppState`.
#[derive(Debug, Default)]
pub struct TapCounter(AtomicU64);

impl TapCounter {
    /// Returns the count after this tap.
    pub fn record(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

pub fn to_item(book: Book, cfg: &CatalogConfig) -> BookItem {
    let author = book
        .author_name
        .and_then(|names| names.into_iter().next())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
    let cover_url = match book.cover_i {
        Some(id) => format!("{}/{}-M.jpg", cfg.covers_url.trim_end_matches('/'), id),
        None => cfg.cover_placeholder_url.clone(),
    };
    BookItem {
        key: book.key,
        title: book.title,
        author,
        cover_url,
    }
}

/// Fetches the configured subject. Any failure is logged and yields an empty list.
pub async fn list_books(catalog: &dyn CatalogClient, cfg: &CatalogConfig) -> Vec<BookItem> {
    match catalog.search(&cfg.subject, cfg.limit).await {
        Ok(books) => {
            info!(count = books.len(), subject = %cfg.subject, "books fetched");
            books.into_iter().map(|b| to_item(b, cfg)).collect()
        }
        Err(e) => {
            error!(error = ?e, "Error fetching books");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;

    struct StaticCatalog(Option<Vec<Book>>);

    #[async_trait]
    impl CatalogClient for StaticCatalog {
        async fn search(&self, _subject: &str, _limit: u32) -> anyhow::Result<Vec<Book>> {
            self.0.clone().ok_or_else(|| anyhow::anyhow!("connection refused"))
        }
    }

    fn book(key: &str, authors: Option<&[&str]>, cover: Option<i64>) -> Book {
        Book {
            key: key.into(),
            title: format!("Title {key}"),
            author_name: authors.map(|a| a.iter().map(|s| s.to_string()).collect()),
            cover_i: cover,
        }
    }

    #[test]
    fn item_uses_first_author_and_cover() {
        let cfg = CatalogConfig::default();
        let item = to_item(book("/works/1", Some(&["First", "Second"]), Some(7)), &cfg);
        assert_eq!(item.author, "First");
        assert_eq!(item.cover_url, "https://covers.openlibrary.org/b/id/7-M.jpg");
    }

    #[test]
    fn item_falls_back_to_placeholders() {
        let cfg = CatalogConfig::default();
        let item = to_item(book("/works/2", None, None), &cfg);
        assert_eq!(item.author, "Unknown Author");
        assert_eq!(item.cover_url, cfg.cover_placeholder_url);

        let item = to_item(book("/works/3", Some(&[]), None), &cfg);
        assert_eq!(item.author, "Unknown Author");
    }

    #[tokio::test]
    async fn list_keeps_catalog_order() {
        let cfg = CatalogConfig::default();
        let catalog = StaticCatalog(Some(vec![
            book("/works/b", None, None),
            book("/works/a", None, None),
        ]));
        let items = list_books(&catalog, &cfg).await;
        let keys: Vec<_> = items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["/works/b", "/works/a"]);
    }

    #[tokio::test]
    async fn failed_fetch_yields_empty_list() {
        let cfg = CatalogConfig::default();
        assert!(list_books(&StaticCatalog(None), &cfg).await.is_empty());
    }

    #[test]
    fn counters_are_independent() {
        let a = Arc::new(TapCounter::default());
        let b = TapCounter::default();
        assert_eq!(a.record(), 1);
        assert_eq!(a.record(), 2);
        assert_eq!(a.count(), 2);
        assert_eq!(b.count(), 0);
    }

    #[tokio::test]
    async fn concurrent_taps_are_not_lost() {
        let counter = Arc::new(TapCounter::default());
        let mut tasks = Vec::new();
        for _ in 0..16 {
            let c = counter.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..100 {
                    c.record();
                }
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }
        assert_eq!(counter.count(), 1600);
    }
}
