//! Content API access.
//!
//! # Architecture
//!
//! - [`ContentFetcher`]: trait for "give me page N of section S with key K"
//! - [`GuardianClient`]: [`ContentFetcher`] backed by the content API search
//!   endpoint over `reqwest`
//! - [`FetchOutcome`]: what a fetch produced, including the expected
//!   provider conditions (quota exhausted, no more pages)
//!
//! A fetch never retries on its own; the collector decides what to do with
//! each outcome.

use crate::models::{ArticleRecord, SearchEnvelope};
use crate::utils::truncate_for_log;
use reqwest::{Client, StatusCode};
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Fields requested through `show-fields`.
pub const SHOW_FIELDS: &str = "headline,byline,bodyText,trailText";

/// Result of one page request.
#[derive(Debug)]
pub enum FetchOutcome {
    /// A non-empty page of results, in provider order.
    Page(Vec<ArticleRecord>),
    /// The provider has no results for this page; history is exhausted.
    Empty,
    /// HTTP 429: this key is out of quota.
    QuotaExceeded,
    /// Any other network, status or decoding failure.
    Transient(String),
}

/// Parameters of a single search request.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    /// Provider section code (see [`crate::config::Config::section_code`]).
    pub section: &'a str,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
    pub api_key: &'a str,
}

/// Something that can fetch one page of search results.
pub trait ContentFetcher {
    async fn fetch_page(&self, request: PageRequest<'_>) -> FetchOutcome;
}

/// [`ContentFetcher`] for the content API search endpoint.
#[derive(Debug, Clone)]
pub struct GuardianClient {
    http: Client,
    base_url: String,
}

impl GuardianClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn query<'a>(request: &PageRequest<'a>) -> Vec<(&'static str, String)> {
        vec![
            ("api-key", request.api_key.to_string()),
            ("page-size", request.page_size.to_string()),
            ("page", request.page.to_string()),
            ("section", request.section.to_string()),
            ("order-by", "newest".to_string()),
            ("show-fields", SHOW_FIELDS.to_string()),
            ("show-tags", "all".to_string()),
        ]
    }
}

impl ContentFetcher for GuardianClient {
    #[instrument(level = "info", skip_all, fields(section = request.section, page = request.page))]
    async fn fetch_page(&self, request: PageRequest<'_>) -> FetchOutcome {
        let t0 = Instant::now();
        let response = match self
            .http
            .get(&self.base_url)
            .query(&Self::query(&request))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Search request failed");
                return FetchOutcome::Transient(e.to_string());
            }
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return FetchOutcome::QuotaExceeded;
        }
        if !status.is_success() {
            return FetchOutcome::Transient(format!("unexpected status {status}"));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return FetchOutcome::Transient(e.to_string()),
        };
        let outcome = decode_page(&body);
        if let FetchOutcome::Transient(cause) = &outcome {
            warn!(%cause, preview = %truncate_for_log(&body, 300), "Search response not decodable");
        }
        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            bytes = body.len(),
            "Search request finished"
        );
        outcome
    }
}

/// Decode a search response body into an outcome.
pub fn decode_page(body: &str) -> FetchOutcome {
    match serde_json::from_str::<SearchEnvelope>(body) {
        Ok(envelope) if envelope.response.results.is_empty() => FetchOutcome::Empty,
        Ok(envelope) => FetchOutcome::Page(envelope.response.results),
        Err(e) => FetchOutcome::Transient(format!("undecodable response: {e}")),
    }
}

/// Last four characters of a key, for logs.
pub fn mask_key(key: &str) -> String {
    let tail: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("…{tail}")
}
