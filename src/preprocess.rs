//! Noise removal for sensed records.
//!
//! Text columns are cleaned independently (title, trail text, tags, body) so
//! later stages can vectorise each on its own.

use crate::models::{ParsedRecord, ProcessedRecord};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{info, instrument};

pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Records whose cleaned trail text is this short or shorter are dropped.
const MIN_TRAIL_CHARS: usize = 2;

/// Words of this length or shorter are dropped during cleaning.
const MIN_WORD_CHARS: usize = 2;

static NON_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z\s]").unwrap());

/// English stop words (NLTK list).
pub static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
        "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he",
        "him", "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's",
        "its", "itself", "they", "them", "their", "theirs", "themselves", "what",
        "which", "who", "whom", "this", "that", "that'll", "these", "those", "am", "is",
        "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
        "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
        "because", "as", "until", "while", "of", "at", "by", "for", "with", "about",
        "against", "between", "into", "through", "during", "before", "after", "above",
        "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
        "again", "further", "then", "once", "here", "there", "when", "where", "why",
        "how", "all", "any", "both", "each", "few", "more", "most", "other", "some",
        "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very",
        "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
        "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn",
        "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn",
        "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't",
        "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
        "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
        "wouldn't",
    ]
    .into_iter()
    .collect()
});

/// Lowercase, keep only ASCII letters and whitespace, drop stop words and
/// words of two letters or fewer.
pub fn clean_text_noise(text: &str) -> String {
    let lowered = text.to_lowercase();
    let letters_only = NON_LETTER.replace_all(&lowered, "");
    letters_only
        .split_whitespace()
        .filter(|w| w.len() > MIN_WORD_CHARS && !STOP_WORDS.contains(*w))
        .join(" ")
}

/// Normalise an author name: lowercase, no leading "by ", `unknown` when empty.
pub fn clean_author(author: &str) -> String {
    let lowered = author.trim().to_lowercase();
    let name = lowered.strip_prefix("by ").unwrap_or(&lowered).trim();
    if name.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        name.to_string()
    }
}

/// Drop untitled and duplicate (by URL) records, then clean every text
/// column. Records left without a usable trail text are dropped.
///
/// # Arguments
///
/// * `records` - Sensed rows, in corpus order.
///
/// # Returns
///
/// Cleaned rows in the same relative order.
///
/// # Examples
///
/// ```ignore
/// let processed = preprocess(sense_corpus(&config.data_dir).await?);
/// ```
#[instrument(level = "info", skip_all, fields(input = records.len()))]
pub fn preprocess(records: Vec<ParsedRecord>) -> Vec<ProcessedRecord> {
    let processed: Vec<ProcessedRecord> = records
        .into_iter()
        .filter(|r| !r.title.trim().is_empty())
        .unique_by(|r| r.url.clone())
        .map(|r| ProcessedRecord {
            label: r.label,
            title: clean_text_noise(&r.title),
            trail_text: clean_text_noise(&r.trail_text),
            tags: clean_text_noise(&r.tags),
            body: clean_text_noise(&r.body),
            author: clean_author(&r.author),
            date: r.date,
            url: r.url,
        })
        .filter(|r| r.trail_text.len() > MIN_TRAIL_CHARS)
        .collect();

    info!(output = processed.len(), "Pre-processing complete");
    processed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(label: &str, title: &str, trail: &str, url: &str, author: &str) -> ParsedRecord {
        ParsedRecord {
            label: label.into(),
            title: title.into(),
            trail_text: trail.into(),
            tags: "World news, UK politics".into(),
            date: "2025-05-06".into(),
            author: author.into(),
            body: "The Prime Minister's statement, in full.".into(),
            url: url.into(),
        }
    }

    #[test]
    fn test_clean_text_noise() {
        assert_eq!(
            clean_text_noise("The Quick brown fox's 3 jumps over the lazy dog!"),
            "quick brown foxs jumps lazy dog"
        );
        assert_eq!(clean_text_noise("it is an ox"), "");
        assert_eq!(clean_text_noise(""), "");
        assert_eq!(clean_text_noise("Café society"), "caf society");
    }

    #[test]
    fn test_clean_author() {
        assert_eq!(clean_author("By Jane Doe"), "jane doe");
        assert_eq!(clean_author("Abby Smith"), "abby smith");
        assert_eq!(clean_author("  "), "unknown");
        assert_eq!(clean_author("Unknown Author"), "unknown author");
    }

    #[test]
    fn test_preprocess_drops_untitled_duplicates_and_thin_trails() {
        let records = vec![
            parsed("news", "Election results", "Votes counted overnight", "u1", "Jane Doe"),
            parsed("news", "Election results again", "Duplicate url", "u1", "Jane Doe"),
            parsed("sport", "", "No title here", "u2", "Sam Lee"),
            parsed("sport", "Final score", "It is", "u3", "Sam Lee"),
            parsed("culture", "Gallery opens", "New exhibition draws crowds", "u4", ""),
        ];

        let processed = preprocess(records);

        assert_eq!(processed.len(), 2);
        assert_eq!(processed[0].title, "election results");
        assert_eq!(processed[0].trail_text, "votes counted overnight");
        assert_eq!(processed[0].tags, "world news politics");
        assert_eq!(processed[0].body, "prime ministers statement full");
        assert_eq!(processed[0].author, "jane doe");
        assert_eq!(processed[1].label, "culture");
        assert_eq!(processed[1].author, "unknown");
    }
}
