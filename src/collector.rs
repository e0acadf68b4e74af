//! Collection driver: key rotation × category × page loop.
//!
//! For each API key in order, every category is filled up to
//! `articles_per_category` new articles, one page at a time. Page positions
//! live in a [`CollectionCursor`] shared by all keys of the run, so a key
//! picks up where the previous one stopped. Resumption across runs relies on
//! the [`ArticleStore`] skipping identifiers it already holds.
//!
//! Outcome handling per page:
//!
//! | Outcome | Effect |
//! |---------|--------|
//! | `QuotaExceeded` | abandon the key; cursor untouched |
//! | `Transient` | back off, move to the next category; page retried by the next key |
//! | `Empty` | retire the category for the rest of the run |
//! | `Page` | store new articles, advance the cursor, politeness pause |

use crate::api::{ContentFetcher, FetchOutcome, PageRequest, mask_key};
use crate::config::Config;
use crate::error::Result;
use crate::normalize::normalize;
use crate::store::ArticleStore;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

/// Per-category next page to fetch, plus categories whose history ran out.
///
/// Lives for one run only.
#[derive(Debug, Default, Clone)]
pub struct CollectionCursor {
    pages: BTreeMap<String, u32>,
    retired: BTreeSet<String>,
}

impl CollectionCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next page for `category`; starts at 1.
    pub fn page(&self, category: &str) -> u32 {
        self.pages.get(category).copied().unwrap_or(1)
    }

    /// Move `category` to its next page after a stored page.
    pub fn advance(&mut self, category: &str) {
        *self.pages.entry(category.to_string()).or_insert(1) += 1;
    }

    /// Stop visiting `category`; its history ran out.
    pub fn retire(&mut self, category: &str) {
        self.retired.insert(category.to_string());
    }

    pub fn is_retired(&self, category: &str) -> bool {
        self.retired.contains(category)
    }
}

/// Totals for one API key.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeyReport {
    /// Masked key, safe to log.
    pub key: String,
    pub collected: usize,
    /// Already stored, left untouched.
    pub skipped: usize,
    /// Rejected by the normalizer.
    pub filtered: usize,
    pub pages: usize,
    pub quota_exhausted: bool,
}

#[derive(Debug, Default, Clone)]
pub struct CollectionReport {
    pub keys: Vec<KeyReport>,
}

impl CollectionReport {
    pub fn total_collected(&self) -> usize {
        self.keys.iter().map(|k| k.collected).sum()
    }
}

/// Knobs the driver needs from [`Config`].
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub categories: Vec<String>,
    pub articles_per_category: usize,
    pub page_size: u32,
    pub politeness_delay: Duration,
    pub backoff_delay: Duration,
    pub force_refresh: bool,
    pub source_name: String,
    pub section_codes: BTreeMap<String, String>,
}

impl From<&Config> for CollectorSettings {
    fn from(config: &Config) -> Self {
        Self {
            categories: config.categories.clone(),
            articles_per_category: config.articles_per_category,
            page_size: config.page_size,
            politeness_delay: config.politeness_delay(),
            backoff_delay: config.backoff_delay(),
            force_refresh: config.force_refresh,
            source_name: config.source_name.clone(),
            section_codes: config
                .categories
                .iter()
                .map(|c| (c.clone(), config.section_code(c)))
                .collect(),
        }
    }
}

enum CategoryEnd {
    /// Target reached, history exhausted or transient failure.
    Done,
    /// The key is out of quota; stop using it.
    QuotaExceeded,
}

/// Drives a [`ContentFetcher`] over every key and category, writing into an [`ArticleStore`].
pub struct Collector<F> {
    fetcher: F,
    store: ArticleStore,
    settings: CollectorSettings,
    cursor: CollectionCursor,
}

impl<F: ContentFetcher> Collector<F> {
    pub fn new(fetcher: F, store: ArticleStore, settings: CollectorSettings) -> Self {
        Self {
            fetcher,
            store,
            settings,
            cursor: CollectionCursor::new(),
        }
    }

    #[cfg(test)]
    fn cursor(&self) -> &CollectionCursor {
        &self.cursor
    }

    /// Run the full key × category loop.
    ///
    /// Blank keys are skipped. Each key fills categories until its quota runs
    /// out; the cursor carries over to the next key.
    ///
    /// # Arguments
    ///
    /// * `api_keys` - Keys to use, in rotation order.
    ///
    /// # Returns
    ///
    /// Per-key totals. Only storage failures are returned as errors.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut collector = Collector::new(client, ArticleStore::new("data"), settings);
    /// let report = collector.run(&config.api_keys).await?;
    /// info!(total = report.total_collected(), "done");
    /// ```
    #[instrument(level = "info", skip_all, fields(keys = api_keys.len()))]
    pub async fn run(&mut self, api_keys: &[String]) -> Result<CollectionReport> {
        let mut report = CollectionReport::default();

        for api_key in api_keys.iter().filter(|k| !k.trim().is_empty()) {
            let key_report = self.run_key(api_key).await?;
            info!(
                key = %key_report.key,
                collected = key_report.collected,
                skipped = key_report.skipped,
                filtered = key_report.filtered,
                pages = key_report.pages,
                quota_exhausted = key_report.quota_exhausted,
                "Finished API key"
            );
            report.keys.push(key_report);
        }

        info!(total = report.total_collected(), "Collection complete");
        Ok(report)
    }

    async fn run_key(&mut self, api_key: &str) -> Result<KeyReport> {
        let mut key_report = KeyReport {
            key: mask_key(api_key),
            ..Default::default()
        };

        let categories = self.settings.categories.clone();
        for category in &categories {
            if self.cursor.is_retired(category) {
                continue;
            }
            match self.collect_category(category, api_key, &mut key_report).await? {
                CategoryEnd::Done => {}
                CategoryEnd::QuotaExceeded => {
                    warn!(key = %key_report.key, %category, "Quota exhausted; abandoning key");
                    key_report.quota_exhausted = true;
                    break;
                }
            }
        }
        Ok(key_report)
    }

    #[instrument(level = "info", skip(self, api_key, key_report))]
    async fn collect_category(
        &mut self,
        category: &str,
        api_key: &str,
        key_report: &mut KeyReport,
    ) -> Result<CategoryEnd> {
        let section = self
            .settings
            .section_codes
            .get(category)
            .cloned()
            .unwrap_or_else(|| category.to_lowercase());
        let mut collected = 0usize;

        while collected < self.settings.articles_per_category {
            let page = self.cursor.page(category);
            let outcome = self
                .fetcher
                .fetch_page(PageRequest {
                    section: &section,
                    page,
                    page_size: self.settings.page_size,
                    api_key,
                })
                .await;

            let results = match outcome {
                FetchOutcome::QuotaExceeded => return Ok(CategoryEnd::QuotaExceeded),
                FetchOutcome::Transient(cause) => {
                    warn!(%category, page, %cause, "Page fetch failed; backing off");
                    pause(self.settings.backoff_delay).await;
                    return Ok(CategoryEnd::Done);
                }
                FetchOutcome::Empty => {
                    info!(%category, page, "No more results; retiring category for this run");
                    self.cursor.retire(category);
                    return Ok(CategoryEnd::Done);
                }
                FetchOutcome::Page(results) => results,
            };

            let (mut new, mut skipped, mut filtered) = (0usize, 0usize, 0usize);
            for record in results {
                if !self.settings.force_refresh && self.store.exists(category, &record.id).await? {
                    skipped += 1;
                    continue;
                }
                let id = record.id.clone();
                match normalize(record, &self.settings.source_name) {
                    Some(text) => {
                        self.store.write(category, &id, &text).await?;
                        new += 1;
                    }
                    None => filtered += 1,
                }
            }

            collected += new;
            key_report.collected += new;
            key_report.skipped += skipped;
            key_report.filtered += filtered;
            key_report.pages += 1;
            info!(%category, page, new, skipped, filtered, collected, "Processed page");

            self.cursor.advance(category);
            pause(self.settings.politeness_delay).await;
        }

        Ok(CategoryEnd::Done)
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        sleep(delay).await;
    }
}
