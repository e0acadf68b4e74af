//! CSV files exchanged between pipeline stages.
//!
//! Record CSVs (sensed, processed) carry a header derived from the record's
//! field names; the feature table is written column by column.

use crate::error::{PipelineError, Result};
use crate::features::FeatureTable;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{info, instrument};

/// Write records with a header row, replacing any existing file.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = records.len()))]
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!("Wrote CSV");
    Ok(())
}

/// Read every record of a CSV written by [`write_records`].
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(PipelineError::MissingInput(format!(
            "{} not found; run the previous stage first",
            path.display()
        )));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()?;
    info!(rows = records.len(), "Read CSV");
    Ok(records)
}

/// Write the feature table: feature columns, then `label`.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = table.rows.len(), columns = table.width()))]
pub fn write_feature_table(path: &Path, table: &FeatureTable) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;

    let mut header: Vec<&str> = table.columns.iter().map(String::as_str).collect();
    header.push("label");
    writer.write_record(&header)?;

    for (row, label) in table.rows.iter().zip(&table.labels) {
        let mut fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        fields.push(label.clone());
        writer.write_record(&fields)?;
    }
    writer.flush()?;
    info!("Wrote feature table");
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParsedRecord;

    fn record(label: &str, body: &str) -> ParsedRecord {
        ParsedRecord {
            label: label.into(),
            title: "A \"quoted\", title".into(),
            trail_text: "trail".into(),
            tags: "World news, Europe".into(),
            date: "2025-05-06".into(),
            author: "Jane Doe".into(),
            body: body.into(),
            url: "https://example.com/a".into(),
        }
    }

    #[test]
    fn test_records_round_trip_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/sensed.csv");
        let records = vec![record("news", "one, two"), record("sport", "")];

        write_records(&path, &records).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("label,title,trail_text,tags,date,author,body,url\n"));

        let back: Vec<ParsedRecord> = read_records(&path).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_missing_csv_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<Vec<ParsedRecord>> = read_records(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(PipelineError::MissingInput(_))));
    }

    #[test]
    fn test_feature_table_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.csv");
        let table = FeatureTable {
            columns: vec!["trail_goal".into(), "auth_sid_lowe".into()],
            rows: vec![vec![0.5, 1.0], vec![0.0, 0.0]],
            labels: vec!["sport".into(), "news".into()],
        };

        write_feature_table(&path, &table).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "trail_goal,auth_sid_lowe,label\n0.5,1,sport\n0,0,news\n");
    }
}
