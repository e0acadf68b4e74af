//! Command-line interface definitions.
//!
//! Each pipeline stage is a subcommand. Options shared by several stages
//! are global and override the values loaded from the YAML config file.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the corpus pipeline.
///
/// # Examples
///
/// ```sh
/// # Collect with two keys, rotating when the first one runs out of quota
/// news_corpus collect --api-key KEY_ONE --api-key KEY_TWO
///
/// # Rebuild the feature table from the stored corpus
/// news_corpus --config corpus.yaml pipeline
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Optional path to a YAML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Root directory of the article store
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Content API key; repeat or comma-separate to rotate through several
    #[arg(
        long = "api-key",
        env = "GUARDIAN_API_KEYS",
        value_delimiter = ',',
        global = true,
        hide_env_values = true
    )]
    pub api_keys: Vec<String>,

    /// Overwrite already stored articles instead of skipping them
    #[arg(long, global = true)]
    pub force_refresh: bool,

    /// New articles to collect per category and key
    #[arg(long, global = true)]
    pub articles_per_category: Option<usize>,

    /// Results requested per API page
    #[arg(long, global = true)]
    pub page_size: Option<u32>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Fetch articles from the content API into the article store
    Collect,
    /// Parse stored article files into the sensed CSV
    Sense,
    /// Clean the sensed CSV into the processed CSV
    Preprocess,
    /// Build the TF-IDF / specialist-author feature table
    Features,
    /// Print the top terms per category and the top specialist authors
    Analyze,
    /// Run sense, preprocess and features in sequence
    Pipeline,
}
