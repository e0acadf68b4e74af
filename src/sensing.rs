//! Reading the article store back into structured records.
//!
//! Each category directory under the data root is a label; every `.txt`
//! file inside is split positionally according to the layout written by
//! [`crate::normalize`]. Files too short to hold that layout are logged and
//! dropped.

use crate::error::{PipelineError, Result};
use crate::models::ParsedRecord;
use crate::store::ARTICLE_EXT;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument, warn};

/// Minimum number of lines a stored article must have.
pub const MIN_LINES: usize = 9;

const UNKNOWN_DATE: &str = "Unknown";

/// Split one stored article into columns. `label` is left empty.
///
/// # Arguments
///
/// * `text` - Full contents of a stored article file.
///
/// # Returns
///
/// `None` when the file is shorter than the stored layout.
///
/// # Examples
///
/// ```ignore
/// let record = parse_article_text(&std::fs::read_to_string(path)?);
/// ```
pub fn parse_article_text(text: &str) -> Option<ParsedRecord> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < MIN_LINES {
        return None;
    }

    let header: Vec<&str> = lines[0].split('|').collect();
    let date = if header.len() >= 3 {
        header[header.len() - 1].trim().to_string()
    } else {
        UNKNOWN_DATE.to_string()
    };

    let author = strip_label(lines[1], "By ");
    let tags = strip_label(lines[3], "Tags: ");
    let body = lines
        .get(9..)
        .unwrap_or_default()
        .join(" ")
        .trim()
        .to_string();

    Some(ParsedRecord {
        label: String::new(),
        title: lines[5].trim().to_string(),
        trail_text: lines[7].trim().to_string(),
        tags,
        date,
        author,
        body,
        url: lines[2].trim().to_string(),
    })
}

fn strip_label(line: &str, label: &str) -> String {
    let line = line.trim();
    line.strip_prefix(label)
        .or_else(|| (line == label.trim_end()).then_some(""))
        .unwrap_or(line)
        .trim()
        .to_string()
}

/// Parse every stored article under `data_dir`.
///
/// Labels and files are visited in name order.
///
/// # Arguments
///
/// * `data_dir` - Corpus root holding one directory per category.
///
/// # Returns
///
/// One record per parseable `.txt` file, labelled with its directory name.
/// A missing `data_dir` is a [`crate::error::PipelineError::MissingInput`].
#[instrument(level = "info", skip_all, fields(data_dir = %data_dir.display()))]
pub async fn sense_corpus(data_dir: &Path) -> Result<Vec<ParsedRecord>> {
    if !fs::try_exists(data_dir).await? {
        return Err(PipelineError::MissingInput(format!(
            "data directory {} not found",
            data_dir.display()
        )));
    }

    let mut records = Vec::new();
    for category_dir in sorted_entries(data_dir, |p| p.is_dir()).await? {
        let label = match category_dir.file_name().and_then(|n| n.to_str()) {
            Some(label) => label.to_string(),
            None => continue,
        };

        let files = sorted_entries(&category_dir, |p| {
            p.is_file() && p.extension().is_some_and(|e| e == ARTICLE_EXT)
        })
        .await?;

        let mut parsed = 0usize;
        for file in &files {
            let text = match fs::read_to_string(file).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(path = %file.display(), error = %e, "Unreadable article file; skipping");
                    continue;
                }
            };
            match parse_article_text(&text) {
                Some(mut record) => {
                    record.label = label.clone();
                    records.push(record);
                    parsed += 1;
                }
                None => warn!(path = %file.display(), "Malformed article file; skipping"),
            }
        }
        info!(%label, files = files.len(), parsed, "Sensed category");
    }

    info!(total = records.len(), "Sensing complete");
    Ok(records)
}

async fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if keep(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleFields, ArticleRecord, Tag};
    use crate::normalize::normalize;
    use crate::store::ArticleStore;

    fn sample_record() -> ArticleRecord {
        ArticleRecord {
            id: "world/2025/may/06/summit".into(),
            section_name: Some("World news".into()),
            web_publication_date: Some("2025-05-06T09:15:00Z".into()),
            web_url: Some("https://example.com/world/summit".into()),
            web_title: None,
            fields: ArticleFields {
                headline: Some("Leaders meet at summit".into()),
                byline: Some("Byron Smith".into()),
                body_text: Some("First paragraph.\nSecond   paragraph.\n\nThird.".into()),
                trail_text: Some("<p>Talks <strong>continue</strong></p>".into()),
            },
            tags: vec![
                Tag { web_title: Some("World news".into()) },
                Tag { web_title: Some("Diplomacy".into()) },
            ],
        }
    }

    #[test]
    fn test_round_trip_recovers_fields() {
        let text = normalize(sample_record(), "The Guardian").unwrap();
        let parsed = parse_article_text(&text).unwrap();

        assert_eq!(parsed.title, "Leaders meet at summit");
        assert_eq!(parsed.author, "Byron Smith");
        assert_eq!(parsed.url, "https://example.com/world/summit");
        assert_eq!(parsed.tags, "World news, Diplomacy");
        assert_eq!(parsed.trail_text, "Talks continue");
        assert_eq!(parsed.date, "2025-05-06");
        let collapsed: Vec<&str> = parsed.body.split_whitespace().collect();
        assert_eq!(collapsed, ["First", "paragraph.", "Second", "paragraph.", "Third."]);
    }

    #[test]
    fn test_short_file_is_rejected() {
        let text = "a\nb\nc\nd\ne\nf\ng\nh\n";
        assert!(parse_article_text(text).is_none());
        assert!(parse_article_text("").is_none());
    }

    #[test]
    fn test_header_without_three_parts_has_unknown_date() {
        let text = "Only header\nBy A\nurl\nTags: x\n\nTitle\n---\nTrail\n---\nBody";
        let parsed = parse_article_text(text).unwrap();
        assert_eq!(parsed.date, "Unknown");
        assert_eq!(parsed.body, "Body");
    }

    #[test]
    fn test_nine_lines_gives_empty_body() {
        let text = "S | Sec | 2025-01-01\nBy A\nurl\nTags: \n\nTitle\n---\nTrail\n---";
        let parsed = parse_article_text(text).unwrap();
        assert_eq!(parsed.body, "");
        assert_eq!(parsed.tags, "");
    }

    #[tokio::test]
    async fn test_sense_corpus_labels_by_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path());
        let text = normalize(sample_record(), "The Guardian").unwrap();
        store.write("news", "world/1", &text).await.unwrap();
        store.write("sport", "sport/1", &text).await.unwrap();
        store.write("sport", "sport/broken", "too\nshort").await.unwrap();
        std::fs::write(dir.path().join("stray.txt"), "ignored").unwrap();

        let records = sense_corpus(dir.path()).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label, "news");
        assert_eq!(records[1].label, "sport");
    }

    #[tokio::test]
    async fn test_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = sense_corpus(&dir.path().join("absent")).await;
        assert!(matches!(result, Err(PipelineError::MissingInput(_))));
    }
}
