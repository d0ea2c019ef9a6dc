//! Trend statistics ingestion
//!
//! The analytics API exports two record shapes: word-frequency rows
//! (`{"word": ..., "count": ...}`) and entity-mention rows
//! (`{"entity_text": ..., "count": ...}`, with extra detail fields we
//! ignore). Either shape, or a mix, normalizes to the `WordWeight` list
//! the layout pass consumes.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::layout::WordWeight;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read trend data from {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid trend data in {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One exported statistics record
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TrendRecord {
    /// Word-frequency statistics
    Word { word: String, count: f64 },
    /// Entity-mention statistics
    Entity { entity_text: String, count: f64 },
}

impl TrendRecord {
    pub fn text(&self) -> &str {
        match self {
            Self::Word { word, .. } => word,
            Self::Entity { entity_text, .. } => entity_text,
        }
    }

    pub fn count(&self) -> f64 {
        match self {
            Self::Word { count, .. } | Self::Entity { count, .. } => *count,
        }
    }
}

/// Load a JSON array of trend records
pub fn load_records(path: &Path) -> Result<Vec<TrendRecord>, DataError> {
    let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DataError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Map records to layout input, clamping negative counts to zero
pub fn normalize(records: &[TrendRecord]) -> Vec<WordWeight> {
    records
        .iter()
        .map(|record| WordWeight::new(record.text(), record.count().max(0.0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_word_records() {
        let json = r#"[{"word": "مباراة", "count": 42}]"#;
        let records: Vec<TrendRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text(), "مباراة");
        assert_eq!(records[0].count(), 42.0);
    }

    #[test]
    fn parses_entity_records_with_extra_fields() {
        let json = r#"[
            {"entity_text": "الهلال", "count": 17, "trend_details": {"rank": 1}},
            {"entity_text": "النصر", "count": 9}
        ]"#;
        let records: Vec<TrendRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text(), "الهلال");
        assert_eq!(records[1].count(), 9.0);
    }

    #[test]
    fn parses_mixed_shapes() {
        let json = r#"[
            {"word": "هدف", "count": 3},
            {"entity_text": "دوري", "count": 5}
        ]"#;
        let records: Vec<TrendRecord> = serde_json::from_str(json).unwrap();
        let words = normalize(&records);
        assert_eq!(words[0], WordWeight::new("هدف", 3.0));
        assert_eq!(words[1], WordWeight::new("دوري", 5.0));
    }

    #[test]
    fn normalize_clamps_negative_counts() {
        let records = vec![TrendRecord::Word {
            word: "x".to_string(),
            count: -4.0,
        }];
        assert_eq!(normalize(&records)[0].value, 0.0);
    }

    #[test]
    fn load_records_reports_missing_file() {
        let err = load_records(Path::new("/nonexistent/trends.json")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn load_records_reports_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trends.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }));
    }
}
