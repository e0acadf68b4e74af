//! Flat-file article store: `<root>/<category>/<sanitized-id>.txt`.
//!
//! Presence of the file is the only deduplication mechanism. There is no
//! locking; two collectors must not share a root at the same time.

use crate::error::Result;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, instrument};

pub const ARTICLE_EXT: &str = "txt";

/// Flat-file corpus: one text file per article under its category.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    root: PathBuf,
}

impl ArticleStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn category_dir(&self, category: &str) -> PathBuf {
        self.root.join(category)
    }

    pub fn article_path(&self, category: &str, id: &str) -> PathBuf {
        self.category_dir(category)
            .join(format!("{}.{ARTICLE_EXT}", sanitize_id(id)))
    }

    /// Whether an article with this provider identifier is already stored.
    pub async fn exists(&self, category: &str, id: &str) -> Result<bool> {
        Ok(fs::try_exists(self.article_path(category, id)).await?)
    }

    /// Create or truncate the article file, creating the category directory
    /// when needed.
    #[instrument(level = "debug", skip(self, text), fields(bytes = text.len()))]
    pub async fn write(&self, category: &str, id: &str, text: &str) -> Result<()> {
        fs::create_dir_all(self.category_dir(category)).await?;
        let path = self.article_path(category, id);
        fs::write(&path, text).await?;
        debug!(path = %path.display(), "Stored article");
        Ok(())
    }
}

/// Provider identifiers contain `/`; flatten them into a single file name.
pub fn sanitize_id(id: &str) -> String {
    id.replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_id() {
        assert_eq!(
            sanitize_id("sport/2025/may/06/match-report"),
            "sport_2025_may_06_match-report"
        );
        assert_eq!(sanitize_id("plain"), "plain");
        assert_eq!(sanitize_id(r"a\b"), "a_b");
    }

    #[test]
    fn test_article_path_layout() {
        let store = ArticleStore::new("/corpus");
        assert_eq!(
            store.article_path("Opinion", "commentisfree/2025/x"),
            PathBuf::from("/corpus/Opinion/commentisfree_2025_x.txt")
        );
    }

    #[tokio::test]
    async fn test_write_then_exists() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path());

        assert!(!store.exists("news", "news/1").await.unwrap());
        store.write("news", "news/1", "first").await.unwrap();
        assert!(store.exists("news", "news/1").await.unwrap());
        assert!(!store.exists("sport", "news/1").await.unwrap());

        store.write("news", "news/1", "second").await.unwrap();
        let contents = std::fs::read_to_string(store.article_path("news", "news/1")).unwrap();
        assert_eq!(contents, "second");
    }
}
