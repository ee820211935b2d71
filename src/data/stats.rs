//! Data cleaning statistics
//!
//! A JSON object mapping each upstream cleaning stage to the number of
//! proteins that survived it. Key order is the pipeline order, so the map is
//! parsed with `preserve_order` and kept as a list.

use crate::error::{DashboardError, Result};
use serde::Serialize;
use std::path::Path;

pub const CLEANING_STATS_NAME: &str = "Protein counts";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stage {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningStats {
    pub name: String,
    pub stages: Vec<Stage>,
}

impl CleaningStats {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DashboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    pub fn from_json(text: &str, path: &Path) -> Result<Self> {
        let malformed = |message: String| DashboardError::MalformedStats {
            path: path.to_path_buf(),
            message,
        };

        let value: serde_json::Value = serde_json::from_str(text).map_err(|source| DashboardError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let object = value
            .as_object()
            .ok_or_else(|| malformed("expected a JSON object of stage -> count".to_string()))?;

        let mut stages = Vec::with_capacity(object.len());
        for (name, count) in object {
            let count = as_count(count)
                .ok_or_else(|| malformed(format!("stage '{}' has non-count value {}", name, count)))?;
            stages.push(Stage { name: name.clone(), count });
        }

        Ok(Self {
            name: CLEANING_STATS_NAME.to_string(),
            stages,
        })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn get(&self, stage: &str) -> Option<u64> {
        self.stages.iter().find(|s| s.name == stage).map(|s| s.count)
    }
}

/// Non-negative integer, also accepting integral floats like `75000.0`.
fn as_count(value: &serde_json::Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Result<CleaningStats> {
        CleaningStats::from_json(text, Path::new("stats.json"))
    }

    #[test]
    fn test_file_order_preserved() {
        // Deliberately not alphabetical
        let stats = parse(r#"{"raw": 100000, "deduplicated": 80000, "final": 75000}"#).unwrap();
        let names: Vec<_> = stats.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["raw", "deduplicated", "final"]);
        assert_eq!(stats.name, "Protein counts");
        assert_eq!(stats.get("final"), Some(75000));
    }

    #[test]
    fn test_integral_float_accepted() {
        let stats = parse(r#"{"raw": 1200.0}"#).unwrap();
        assert_eq!(stats.get("raw"), Some(1200));
    }

    #[test]
    fn test_negative_count_rejected() {
        let err = parse(r#"{"raw": -5}"#).unwrap_err();
        assert!(matches!(err, DashboardError::MalformedStats { .. }));
    }

    #[test]
    fn test_fractional_count_rejected() {
        assert!(parse(r#"{"raw": 10.5}"#).is_err());
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(parse("[1, 2, 3]").is_err());
        assert!(matches!(parse("{not json").unwrap_err(), DashboardError::Json { .. }));
    }

    #[test]
    fn test_empty_object_is_empty_series() {
        let stats = parse("{}").unwrap();
        assert!(stats.is_empty());
    }
}
