//! # News Corpus
//!
//! Builds a labelled news corpus from a paginated content API and turns it
//! into a feature table for a category classifier.
//!
//! ## Usage
//!
//! ```sh
//! news_corpus collect --api-key KEY_ONE --api-key KEY_TWO
//! news_corpus pipeline
//! news_corpus analyze
//! ```
//!
//! ## Architecture
//!
//! The pipeline is a sequence of stages, each reading the previous stage's
//! output from disk:
//! 1. **Collect**: fetch search pages per category, rotating API keys, and
//!    store each accepted article as `<data_dir>/<category>/<id>.txt`
//! 2. **Sense**: parse the stored files back into columns (`sensed_data.csv`)
//! 3. **Preprocess**: strip noise and stop words (`processed_data_separated.csv`)
//! 4. **Features**: TF-IDF over trail text and tags plus specialist-author
//!    one-hots (`dataset_features_final.csv`, `models/`)
//!
//! `analyze` prints the strongest terms per category and the most prolific
//! specialist authors.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod collector;
mod config;
mod error;
mod features;
mod models;
mod normalize;
mod outputs;
mod preprocess;
mod sensing;
mod store;
mod utils;

use api::GuardianClient;
use cli::{Cli, Command};
use collector::{Collector, CollectorSettings};
use config::Config;
use error::Result;
use features::FeatureSettings;
use models::{ParsedRecord, ProcessedRecord};
use outputs::{json, report, tables};
use store::ArticleStore;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(?args.command, ?args.config, ?args.data_dir, "Parsed CLI arguments");

    let mut config = Config::load(args.config.as_deref())?;
    config.apply_cli(&args);

    if let Err(e) = run(args.command, &config).await {
        error!(command = ?args.command, error = %e, "Command failed");
        return Err(e.into());
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Collect => run_collect(config).await,
        Command::Sense => run_sense(config).await,
        Command::Preprocess => run_preprocess(config),
        Command::Features => run_features(config).await,
        Command::Analyze => run_analyze(config),
        Command::Pipeline => {
            run_sense(config).await?;
            run_preprocess(config)?;
            run_features(config).await
        }
    }
}

#[instrument(level = "info", skip_all, fields(data_dir = %config.data_dir.display()))]
async fn run_collect(config: &Config) -> Result<()> {
    config.validate_for_collection()?;
    ensure_writable_dir(&config.data_dir).await?;

    let mut collector = Collector::new(
        GuardianClient::new(&config.base_url),
        ArticleStore::new(&config.data_dir),
        CollectorSettings::from(config),
    );
    let report = collector.run(&config.api_keys).await?;

    for key in &report.keys {
        info!(
            key = %key.key,
            collected = key.collected,
            skipped = key.skipped,
            filtered = key.filtered,
            quota_exhausted = key.quota_exhausted,
            "Key summary"
        );
    }
    Ok(())
}

async fn run_sense(config: &Config) -> Result<()> {
    let records = sensing::sense_corpus(&config.data_dir).await?;
    tables::write_records(&config.sensed_csv, &records)
}

fn run_preprocess(config: &Config) -> Result<()> {
    let records: Vec<ParsedRecord> = tables::read_records(&config.sensed_csv)?;
    let processed = preprocess::preprocess(records);
    tables::write_records(&config.processed_csv, &processed)
}

async fn run_features(config: &Config) -> Result<()> {
    let records: Vec<ProcessedRecord> = tables::read_records(&config.processed_csv)?;
    let extraction = features::extract_features(&records, &FeatureSettings::from(config));

    for label_terms in extraction.trail_top.iter() {
        let terms: Vec<&str> = label_terms.terms.iter().map(|(t, _)| t.as_str()).collect();
        info!(label = %label_terms.label, terms = %terms.join(", "), "Top trail-text terms");
    }
    for label_terms in extraction.tag_top.iter() {
        let terms: Vec<&str> = label_terms.terms.iter().map(|(t, _)| t.as_str()).collect();
        info!(label = %label_terms.label, terms = %terms.join(", "), "Top tag terms");
    }

    tables::write_feature_table(&config.features_csv, &extraction.table)?;
    json::write_models(&extraction.models, &config.models_dir).await?;
    info!(
        rows = extraction.table.rows.len(),
        trail_features = extraction.models.trail.feature_names().len(),
        tag_features = extraction.models.tags.feature_names().len(),
        author_features = extraction.models.authors.len(),
        "Feature table written"
    );
    Ok(())
}

fn run_analyze(config: &Config) -> Result<()> {
    let records: Vec<ProcessedRecord> = tables::read_records(&config.processed_csv)?;
    let analysis = features::analyze(&records, &FeatureSettings::from(config));
    print!("{}", report::render_analysis(&analysis));
    Ok(())
}
