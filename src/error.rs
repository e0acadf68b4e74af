//! Error type shared by every pipeline stage.
//!
//! Expected fetch conditions (quota exhaustion, empty pages, transient
//! network trouble) are not represented here; see [`crate::api::FetchOutcome`].
//! Anything that reaches a [`PipelineError`] aborts the current command.

use std::io;

use thiserror::Error;

/// Failure that stops a pipeline command.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config file error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("missing input: {0}")]
    MissingInput(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
