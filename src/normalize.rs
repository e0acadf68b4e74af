//! Conversion of raw search results into the stored text layout.
//!
//! A stored article looks like this:
//!
//! ```text
//! The Guardian | Sport | 2025-05-06
//! By Jane Doe
//! https://www.theguardian.com/sport/...
//! Tags: Football, Sport
//!
//! A late winner
//! --------------------
//! Drama at the end
//! ------------------------------------------------------------
//! The match ended 2-1. ...
//! ```
//!
//! Line positions are fixed; [`crate::sensing`] reads them back by index.

use crate::models::{Article, ArticleRecord};
use once_cell::sync::Lazy;
use regex::Regex;

pub const TITLE_RULE_WIDTH: usize = 20;
pub const TRAIL_RULE_WIDTH: usize = 60;

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").unwrap());

/// Normalize a raw search result, or `None` if it should not be stored.
///
/// # Arguments
///
/// * `record` - One result from a search page.
/// * `source_name` - Publisher name written into the header line.
///
/// # Returns
///
/// The ten-line stored layout, or `None` for empty bodies and correction notices.
///
/// # Examples
///
/// ```ignore
/// if let Some(text) = normalize(record, "The Guardian") {
///     store.write("sport", &id, &text).await?;
/// }
/// ```
pub fn normalize(record: ArticleRecord, source_name: &str) -> Option<String> {
    normalize_article(&Article::from(record), source_name)
}

/// Render an [`Article`] in the stored layout.
///
/// Returns `None` for articles without body text and for correction or
/// clarification notices.
pub fn normalize_article(article: &Article, source_name: &str) -> Option<String> {
    if article.body.is_empty() {
        return None;
    }
    if is_correction_notice(&article.title, &article.byline) {
        return None;
    }

    let trail_text = strip_markup(&article.trail_text);
    let tags = article.tags.join(", ");

    Some(format!(
        "{source} | {section} | {date}\n\
         By {byline}\n\
         {url}\n\
         Tags: {tags}\n\
         \n\
         {title}\n\
         {title_rule}\n\
         {trail}\n\
         {trail_rule}\n\
         {body}\n",
        source = single_line(source_name),
        section = single_line(&article.section),
        date = article.date,
        byline = single_line(&article.byline),
        url = single_line(&article.url),
        tags = single_line(&tags),
        title = single_line(&article.title),
        title_rule = "-".repeat(TITLE_RULE_WIDTH),
        trail = single_line(&trail_text),
        trail_rule = "-".repeat(TRAIL_RULE_WIDTH),
        body = article.body,
    ))
}

/// Corrections desks publish their notices as standalone articles; those
/// carry no category signal.
pub fn is_correction_notice(title: &str, byline: &str) -> bool {
    let title = title.to_lowercase();
    let byline = byline.to_lowercase();
    title.contains("correction") || title.contains("clarification") || byline.contains("corrections")
}

/// Remove `<...>` tags (shortest match) and trim. Not a markup parser.
pub fn strip_markup(raw: &str) -> String {
    MARKUP_TAG.replace_all(raw, "").trim().to_string()
}

/// Collapse line breaks so a field occupies exactly one line of the layout.
fn single_line(value: &str) -> String {
    if value.contains(['\n', '\r']) {
        value.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        value.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleFields, Tag};

    fn record(title: &str, byline: &str, body: &str) -> ArticleRecord {
        ArticleRecord {
            id: "business/2025/may/06/story".into(),
            section_name: Some("Business".into()),
            web_publication_date: Some("2025-05-06T07:00:00Z".into()),
            web_url: Some("https://example.com/business/story".into()),
            web_title: None,
            fields: ArticleFields {
                headline: Some(title.into()),
                byline: Some(byline.into()),
                body_text: Some(body.into()),
                trail_text: Some("<p>Short <em>summary</em></p>".into()),
            },
            tags: vec![
                Tag { web_title: Some("Economics".into()) },
                Tag { web_title: Some("UK news".into()) },
            ],
        }
    }

    #[test]
    fn test_correction_title_is_filtered() {
        let rejected = normalize(record("Market correction looms", "Jane Doe", "hello world"), "The Guardian");
        let accepted = normalize(record("Economy grows", "Jane Doe", "state of the economy"), "The Guardian");

        assert!(rejected.is_none());
        assert!(accepted.is_some());
    }

    #[test]
    fn test_filters_are_case_insensitive() {
        assert!(normalize(record("CLARIFICATION: figures", "A", "body"), "G").is_none());
        assert!(normalize(record("Weekly roundup", "Corrections and clarifications column editor", "body"), "G").is_none());
        assert!(normalize(record("Weekly roundup", "Ann Correction", "body"), "G").is_some());
    }

    #[test]
    fn test_empty_body_is_filtered() {
        assert!(normalize(record("Economy grows", "Jane Doe", "   \n "), "G").is_none());

        let mut no_body = record("Economy grows", "Jane Doe", "");
        no_body.fields.body_text = None;
        assert!(normalize(no_body, "G").is_none());
    }

    #[test]
    fn test_rendered_layout() {
        let text = normalize(record("Economy grows", "Jane Doe", "state of the economy"), "The Guardian").unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "The Guardian | Business | 2025-05-06");
        assert_eq!(lines[1], "By Jane Doe");
        assert_eq!(lines[2], "https://example.com/business/story");
        assert_eq!(lines[3], "Tags: Economics, UK news");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "Economy grows");
        assert_eq!(lines[6], "-".repeat(20));
        assert_eq!(lines[7], "Short summary");
        assert_eq!(lines[8], "-".repeat(60));
        assert_eq!(lines[9], "state of the economy");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_defaults_when_fields_missing() {
        let raw = ArticleRecord {
            id: "culture/1".into(),
            fields: ArticleFields {
                body_text: Some("Body".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let text = normalize(raw, "The Guardian").unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "The Guardian | General | ");
        assert_eq!(lines[1], "By Unknown Author");
        assert_eq!(lines[3], "Tags: ");
        assert_eq!(lines[5], "Untitled");
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<p>Hello <b>there</b></p>"), "Hello there");
        assert_eq!(strip_markup("  plain  "), "plain");
        assert_eq!(strip_markup("a < b and c > d"), "a  d");
        assert_eq!(strip_markup(""), "");
    }

    #[test]
    fn test_multiline_title_keeps_layout() {
        let text = normalize(record("Economy\ngrows", "Jane Doe", "body"), "G").unwrap();
        assert_eq!(text.lines().nth(5), Some("Economy grows"));
    }
}
