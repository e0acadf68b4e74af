//! Specialist-author detection.
//!
//! A specialist is an author with at least `min_articles` articles, all of
//! them under a single label. Placeholder bylines never qualify.

use crate::models::ProcessedRecord;
use std::collections::BTreeMap;

/// Cleaned author names that do not identify a person.
pub const EXCLUDED_AUTHORS: [&str; 3] = ["unknown", "unknown author", "guardian staff"];

/// Author × label article counts, both axes sorted.
pub type Crosstab = BTreeMap<String, BTreeMap<String, usize>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specialist {
    pub author: String,
    pub label: String,
    pub articles: usize,
}

/// Article counts per author and label.
pub fn crosstab(records: &[ProcessedRecord]) -> Crosstab {
    let mut table = Crosstab::new();
    for record in records {
        if EXCLUDED_AUTHORS.contains(&record.author.as_str()) {
            continue;
        }
        *table
            .entry(record.author.clone())
            .or_default()
            .entry(record.label.clone())
            .or_default() += 1;
    }
    table
}

/// Every specialist, in author-name order.
pub fn specialists(records: &[ProcessedRecord], min_articles: usize) -> Vec<Specialist> {
    crosstab(records)
        .into_iter()
        .filter_map(|(author, labels)| {
            let total: usize = labels.values().sum();
            if total < min_articles || labels.len() != 1 {
                return None;
            }
            let (label, articles) = labels.into_iter().next()?;
            Some(Specialist {
                author,
                label,
                articles,
            })
        })
        .collect()
}

/// Names of every specialist, in author-name order.
pub fn specialist_authors(records: &[ProcessedRecord], min_articles: usize) -> Vec<String> {
    specialists(records, min_articles)
        .into_iter()
        .map(|s| s.author)
        .collect()
}

/// The `n` most prolific specialists; ties in author-name order.
pub fn ranked_specialists(records: &[ProcessedRecord], min_articles: usize, n: usize) -> Vec<Specialist> {
    let mut ranked = specialists(records, min_articles);
    ranked.sort_by(|a, b| b.articles.cmp(&a.articles).then_with(|| a.author.cmp(&b.author)));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(author: &str, label: &str) -> ProcessedRecord {
        ProcessedRecord {
            label: label.into(),
            title: "title".into(),
            trail_text: "trail".into(),
            tags: String::new(),
            body: String::new(),
            author: author.into(),
            date: "2025-05-06".into(),
            url: String::new(),
        }
    }

    fn corpus() -> Vec<ProcessedRecord> {
        let mut records = Vec::new();
        records.extend((0..4).map(|_| rec("barney ronay", "sport")));
        records.extend((0..3).map(|_| rec("marina hyde", "Opinion")));
        records.extend((0..2).map(|_| rec("marina hyde", "sport")));
        records.extend((0..2).map(|_| rec("two pieces", "culture")));
        records.extend((0..5).map(|_| rec("guardian staff", "news")));
        records.extend((0..3).map(|_| rec("alex hern", "news")));
        records
    }

    #[test]
    fn test_crosstab_excludes_placeholders() {
        let table = crosstab(&corpus());
        assert!(!table.contains_key("guardian staff"));
        assert_eq!(table["marina hyde"]["Opinion"], 3);
        assert_eq!(table["marina hyde"]["sport"], 2);
    }

    #[test]
    fn test_specialists_need_volume_and_single_label() {
        assert_eq!(
            specialist_authors(&corpus(), 3),
            vec!["alex hern".to_string(), "barney ronay".to_string()]
        );
    }

    #[test]
    fn test_ranked_specialists() {
        let ranked = ranked_specialists(&corpus(), 3, 1);
        assert_eq!(
            ranked,
            vec![Specialist {
                author: "barney ronay".into(),
                label: "sport".into(),
                articles: 4,
            }]
        );
    }
}
