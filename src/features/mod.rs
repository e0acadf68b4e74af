//! Feature extraction for the downstream classifier.
//!
//! # Submodules
//!
//! - [`tfidf`]: the TF-IDF vectoriser used for trail text and tags
//! - [`authors`]: specialist-author detection
//!
//! # Feature table
//!
//! One row per processed article. Columns, in order:
//!
//! | Prefix | Source | Width |
//! |--------|--------|-------|
//! | `trail_` | TF-IDF over trail text | up to `trail_max_features` |
//! | `tag_` | TF-IDF over tags | up to `tag_max_features` |
//! | `auth_` | one-hot specialist author | one per specialist |
//!
//! followed by the `label` column.

pub mod authors;
pub mod tfidf;

use crate::config::Config;
use crate::models::ProcessedRecord;
use authors::{Specialist, ranked_specialists, specialist_authors};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tfidf::{ANALYSIS_STOP_WORDS, TfidfMatrix, TfidfVectorizer, top_indices};
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct FeatureSettings {
    pub trail_max_features: usize,
    pub tag_max_features: usize,
    pub min_author_articles: usize,
    pub top_n: usize,
}

impl From<&Config> for FeatureSettings {
    fn from(config: &Config) -> Self {
        Self {
            trail_max_features: config.trail_max_features,
            tag_max_features: config.tag_max_features,
            min_author_articles: config.min_author_articles,
            top_n: config.top_n,
        }
    }
}

/// Highest-scoring terms of one label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTerms {
    pub label: String,
    /// `(term, mean tf-idf)`, best first.
    pub terms: Vec<(String, f64)>,
}

/// Fitted vocabularies and specialist list, written next to the feature table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureModels {
    pub trail: TfidfVectorizer,
    pub tags: TfidfVectorizer,
    pub authors: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    /// Feature column names; `label` is not included.
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    pub labels: Vec<String>,
}

impl FeatureTable {
    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

#[derive(Debug, Clone)]
pub struct FeatureExtraction {
    pub table: FeatureTable,
    pub models: FeatureModels,
    pub trail_top: Vec<LabelTerms>,
    pub tag_top: Vec<LabelTerms>,
}

/// Everything the analysis report prints.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Number of entries requested per section.
    pub top_n: usize,
    pub tag_top: Vec<LabelTerms>,
    pub trail_top: Vec<LabelTerms>,
    pub specialists: Vec<Specialist>,
}

/// Mean score of every feature per label, keeping the `n` best.
///
/// Labels appear in first-seen order.
pub fn top_features_per_label(
    labels: &[String],
    matrix: &TfidfMatrix,
    names: &[String],
    n: usize,
) -> Vec<LabelTerms> {
    labels
        .iter()
        .unique()
        .map(|label| {
            let rows: Vec<usize> = labels
                .iter()
                .enumerate()
                .filter(|(_, l)| *l == label)
                .map(|(i, _)| i)
                .collect();
            let means = matrix.mean_of_rows(&rows);
            let terms = top_indices(&means, n)
                .into_iter()
                .map(|i| (names[i].clone(), means[i]))
                .collect();
            LabelTerms {
                label: label.clone(),
                terms,
            }
        })
        .collect()
}

/// Column name of a specialist author's one-hot feature.
pub fn author_column(author: &str) -> String {
    format!("auth_{}", author.replace(' ', "_"))
}

/// Fit both vectorisers, pick specialist authors and assemble the table.
///
/// # Arguments
///
/// * `records` - Processed articles, one table row each, in order.
/// * `settings` - Vocabulary limits, the specialist threshold and `top_n`.
///
/// # Returns
///
/// The feature table, the fitted models and the top trail and tag terms per label.
///
/// # Examples
///
/// ```ignore
/// let extraction = extract_features(&records, &FeatureSettings::from(&config));
/// assert_eq!(extraction.table.rows.len(), records.len());
/// ```
#[instrument(level = "info", skip_all, fields(records = records.len()))]
pub fn extract_features(records: &[ProcessedRecord], settings: &FeatureSettings) -> FeatureExtraction {
    let labels: Vec<String> = records.iter().map(|r| r.label.clone()).collect();

    let mut trail = TfidfVectorizer::new(Some(settings.trail_max_features));
    let trail_docs: Vec<&str> = records.iter().map(|r| r.trail_text.as_str()).collect();
    let trail_matrix = trail.fit_transform(&trail_docs);
    let trail_top = top_features_per_label(&labels, &trail_matrix, trail.feature_names(), settings.top_n);
    info!(features = trail_matrix.n_features, "Extracted trail-text features");

    let mut tags = TfidfVectorizer::new(Some(settings.tag_max_features));
    let tag_docs: Vec<&str> = records.iter().map(|r| r.tags.as_str()).collect();
    let tag_matrix = tags.fit_transform(&tag_docs);
    let tag_top = top_features_per_label(&labels, &tag_matrix, tags.feature_names(), settings.top_n);
    info!(features = tag_matrix.n_features, "Extracted tag features");

    let authors = specialist_authors(records, settings.min_author_articles);
    info!(specialists = authors.len(), "Selected specialist authors");

    let columns: Vec<String> = trail
        .feature_names()
        .iter()
        .map(|t| format!("trail_{t}"))
        .chain(tags.feature_names().iter().map(|t| format!("tag_{t}")))
        .chain(authors.iter().map(|a| author_column(a)))
        .collect();

    let rows: Vec<Vec<f64>> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let mut row = Vec::with_capacity(columns.len());
            row.extend_from_slice(&trail_matrix.rows[i]);
            row.extend_from_slice(&tag_matrix.rows[i]);
            row.extend(
                authors
                    .iter()
                    .map(|a| if *a == record.author { 1.0 } else { 0.0 }),
            );
            row
        })
        .collect();

    FeatureExtraction {
        table: FeatureTable {
            columns,
            rows,
            labels,
        },
        models: FeatureModels {
            trail,
            tags,
            authors,
        },
        trail_top,
        tag_top,
    }
}

/// Top tag terms, top trail-text terms (stop words removed) and the most
/// prolific specialist authors.
#[instrument(level = "info", skip_all, fields(records = records.len()))]
pub fn analyze(records: &[ProcessedRecord], settings: &FeatureSettings) -> Analysis {
    let labels: Vec<String> = records.iter().map(|r| r.label.clone()).collect();

    let mut tags = TfidfVectorizer::new(Some(settings.tag_max_features));
    let tag_docs: Vec<&str> = records.iter().map(|r| r.tags.as_str()).collect();
    let tag_matrix = tags.fit_transform(&tag_docs);

    let mut trail = TfidfVectorizer::new(Some(settings.trail_max_features))
        .with_stop_words(ANALYSIS_STOP_WORDS.iter().copied());
    let trail_docs: Vec<&str> = records.iter().map(|r| r.trail_text.as_str()).collect();
    let trail_matrix = trail.fit_transform(&trail_docs);

    let positive_only = |top: Vec<LabelTerms>| -> Vec<LabelTerms> {
        top.into_iter()
            .map(|mut lt| {
                lt.terms.retain(|(_, score)| *score > 0.0);
                lt
            })
            .collect()
    };

    Analysis {
        top_n: settings.top_n,
        tag_top: positive_only(top_features_per_label(
            &labels,
            &tag_matrix,
            tags.feature_names(),
            settings.top_n,
        )),
        trail_top: positive_only(top_features_per_label(
            &labels,
            &trail_matrix,
            trail.feature_names(),
            settings.top_n,
        )),
        specialists: ranked_specialists(records, settings.min_author_articles, settings.top_n),
    }
}
