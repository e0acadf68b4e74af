//! TF-IDF vectoriser.
//!
//! Tokens are lowercase runs of two or more word characters. The vocabulary
//! keeps the `max_features` most frequent terms across the corpus and is
//! ordered alphabetically. Weights are raw counts times a smoothed idf,
//! `ln((1 + n) / (1 + df)) + 1`, with every row scaled to unit L2 norm.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

/// English stop words dropped from trail text in the analysis report.
///
/// Broader than the pre-processing list: it also covers filler such as
/// "also", "would" and "could" that cleaning keeps.
pub const ANALYSIS_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here", "hereafter",
    "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his", "how", "however",
    "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its",
    "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
    "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly", "move",
    "much", "must", "my", "myself", "name", "namely", "neither", "never", "nevertheless", "next",
    "nine", "no", "nobody", "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of",
    "off", "often", "on", "once", "one", "only", "onto", "or", "other", "others", "otherwise",
    "our", "ours", "ourselves", "out", "over", "own", "part", "per", "perhaps", "please", "put",
    "rather", "re", "same", "see", "seem", "seemed", "seeming", "seems", "serious", "several",
    "she", "should", "show", "side", "since", "sincere", "six", "sixty", "so", "some", "somehow",
    "someone", "something", "sometime", "sometimes", "somewhere", "still", "such", "system",
    "take", "ten", "than", "that", "the", "their", "them", "themselves", "then", "thence",
    "there", "thereafter", "thereby", "therefore", "therein", "thereupon", "these", "they",
    "thick", "thin", "third", "this", "those", "though", "three", "through", "throughout", "thru",
    "thus", "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
    "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were", "what",
    "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas", "whereby",
    "wherein", "whereupon", "wherever", "whether", "which", "while", "whither", "who", "whoever",
    "whole", "whom", "whose", "why", "will", "with", "within", "without", "would", "yet", "you",
    "your", "yours", "yourself", "yourselves",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    pub max_features: Option<usize>,
    #[serde(default)]
    pub stop_words: BTreeSet<String>,
    vocabulary: Vec<String>,
    idf: Vec<f64>,
}

/// Dense document-term matrix; one row per document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TfidfMatrix {
    pub rows: Vec<Vec<f64>>,
    pub n_features: usize,
}

impl TfidfVectorizer {
    pub fn new(max_features: Option<usize>) -> Self {
        Self {
            max_features,
            ..Default::default()
        }
    }

    pub fn with_stop_words<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> Self {
        self.stop_words = words.into_iter().map(str::to_string).collect();
        self
    }

    pub fn feature_names(&self) -> &[String] {
        &self.vocabulary
    }

    #[cfg(test)]
    fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        TOKEN
            .find_iter(&text.to_lowercase())
            .map(|m| m.as_str().to_string())
            .filter(|t| !self.stop_words.contains(t))
            .collect()
    }

    /// Learn vocabulary and idf from `docs`, then weight them.
    pub fn fit_transform<S: AsRef<str>>(&mut self, docs: &[S]) -> TfidfMatrix {
        let counts: Vec<HashMap<String, usize>> =
            docs.iter().map(|d| term_counts(self.tokenize(d.as_ref()))).collect();

        let mut corpus_freq: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for doc in &counts {
            for (term, n) in doc {
                *corpus_freq.entry(term.as_str()).or_default() += n;
                *doc_freq.entry(term.as_str()).or_default() += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = corpus_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        if let Some(limit) = self.max_features {
            ranked.truncate(limit);
        }
        let mut vocabulary: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
        vocabulary.sort();

        let n_docs = docs.len() as f64;
        self.idf = vocabulary
            .iter()
            .map(|t| {
                let df = doc_freq.get(t.as_str()).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        self.vocabulary = vocabulary;

        self.weigh(&counts)
    }

    fn weigh(&self, counts: &[HashMap<String, usize>]) -> TfidfMatrix {
        let index: HashMap<&str, usize> = self
            .vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let rows = counts
            .iter()
            .map(|doc| {
                let mut row = vec![0.0; self.vocabulary.len()];
                for (term, n) in doc {
                    if let Some(&i) = index.get(term.as_str()) {
                        row[i] = *n as f64 * self.idf[i];
                    }
                }
                let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    row.iter_mut().for_each(|v| *v /= norm);
                }
                row
            })
            .collect();

        TfidfMatrix {
            rows,
            n_features: self.vocabulary.len(),
        }
    }
}

fn term_counts(tokens: Vec<String>) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token).or_default() += 1;
    }
    counts
}

impl TfidfMatrix {
    /// Column means over the given rows.
    pub fn mean_of_rows(&self, rows: &[usize]) -> Vec<f64> {
        let mut means = vec![0.0; self.n_features];
        if rows.is_empty() {
            return means;
        }
        for &r in rows {
            for (m, v) in means.iter_mut().zip(&self.rows[r]) {
                *m += v;
            }
        }
        let n = rows.len() as f64;
        means.iter_mut().for_each(|m| *m /= n);
        means
    }
}

/// Indices of the `n` largest scores, largest first. Ties keep index order.
pub fn top_indices(scores: &[f64], n: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
    });
    order.truncate(n);
    order
}
