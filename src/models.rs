//! Data models for articles at each stage of the pipeline.
//!
//! - [`SearchEnvelope`] / [`ArticleRecord`]: raw search results as returned by
//!   the content API
//! - [`Article`]: a raw record with every default substituted
//! - [`ParsedRecord`]: a stored article file read back into columns
//! - [`ProcessedRecord`]: a parsed record after text cleaning
//!
//! The CSV column order of the two record types follows their field order.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SECTION: &str = "General";
pub const DEFAULT_BYLINE: &str = "Unknown Author";
pub const DEFAULT_TITLE: &str = "Untitled";

/// Top-level body of a search response: `{ "response": { "results": [...] } }`.
#[derive(Debug, Deserialize)]
pub struct SearchEnvelope {
    pub response: SearchResponse,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<ArticleRecord>,
}

/// A single search result as delivered by the content API.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    /// Provider identifier, e.g. `politics/2025/may/06/some-slug`.
    pub id: String,
    pub section_name: Option<String>,
    pub web_publication_date: Option<String>,
    pub web_url: Option<String>,
    pub web_title: Option<String>,
    #[serde(default)]
    pub fields: ArticleFields,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Projected fields requested through `show-fields`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleFields {
    pub headline: Option<String>,
    pub byline: Option<String>,
    pub body_text: Option<String>,
    pub trail_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub web_title: Option<String>,
}

/// An [`ArticleRecord`] with defaults applied and the body trimmed.
///
/// `trail_text` still carries whatever markup the provider sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: String,
    pub section: String,
    pub date: String,
    pub byline: String,
    pub url: String,
    pub title: String,
    pub tags: Vec<String>,
    pub trail_text: String,
    pub body: String,
}

impl From<ArticleRecord> for Article {
    fn from(record: ArticleRecord) -> Self {
        let ArticleRecord {
            id,
            section_name,
            web_publication_date,
            web_url,
            web_title,
            fields,
            tags,
        } = record;

        Article {
            id,
            section: section_name.unwrap_or_else(|| DEFAULT_SECTION.to_string()),
            date: web_publication_date
                .as_deref()
                .map(publication_day)
                .unwrap_or_default(),
            byline: fields.byline.unwrap_or_else(|| DEFAULT_BYLINE.to_string()),
            url: web_url.unwrap_or_default(),
            title: fields
                .headline
                .or(web_title)
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            tags: tags.into_iter().filter_map(|t| t.web_title).collect(),
            trail_text: fields.trail_text.unwrap_or_default(),
            body: fields.body_text.unwrap_or_default().trim().to_string(),
        }
    }
}

/// Truncate an ISO-8601 timestamp to its `YYYY-MM-DD` day.
///
/// Timestamps that do not parse as RFC 3339 are cut to their first ten
/// characters instead.
pub fn publication_day(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.date_naive().format("%Y-%m-%d").to_string(),
        Err(_) => raw.chars().take(10).collect(),
    }
}

/// One stored article file, split back into columns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParsedRecord {
    /// Category directory the file was found in.
    pub label: String,
    pub title: String,
    pub trail_text: String,
    pub tags: String,
    pub date: String,
    pub author: String,
    pub body: String,
    pub url: String,
}

/// A [`ParsedRecord`] after noise removal, ready for vectorisation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProcessedRecord {
    pub label: String,
    pub title: String,
    pub trail_text: String,
    pub tags: String,
    pub body: String,
    pub author: String,
    pub date: String,
    pub url: String,
}
