//! JSON artifacts of the feature stage.
//!
//! ```text
//! models_dir/
//! ├── tfidf_trail.json
//! ├── tfidf_tags.json
//! └── authors_list.json
//! ```

use crate::error::Result;
use crate::features::FeatureModels;
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write the fitted vectorisers and the specialist author list.
#[instrument(level = "info", skip_all, fields(models_dir = %models_dir.display()))]
pub async fn write_models(models: &FeatureModels, models_dir: &Path) -> Result<()> {
    if let Err(e) = fs::create_dir_all(models_dir).await {
        error!(error = %e, "Failed to create models dir");
        return Err(e.into());
    }

    write_json(&models_dir.join("tfidf_trail.json"), &models.trail).await?;
    write_json(&models_dir.join("tfidf_tags.json"), &models.tags).await?;
    write_json(&models_dir.join("authors_list.json"), &models.authors).await?;
    Ok(())
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).await?;
    info!(path = %path.display(), "Wrote model artifact");
    Ok(())
}
