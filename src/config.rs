//! Dashboard configuration
//!
//! Holds the fixed, ordered lists that parameterize the charts (locations,
//! amino-acid columns, metrics) together with file locations and server
//! settings. Built-in defaults can be overridden by a JSON file in which
//! every field is optional:
//!
//! ```json
//! {
//!     "data_dir": "data",
//!     "locations": ["Cytoplasm", "Nucleus"],
//!     "metrics": ["Mass", "Length"]
//! }
//! ```

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TABLE_FILE: &str = "model_scoring.tsv";
pub const DEFAULT_STATS_FILE: &str = "data_cleaning_stats.json";
pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Subcellular locations, one boolean membership column each
const DEFAULT_LOCATIONS: &[&str] = &[
    "Cytoplasm",
    "Nucleus",
    "Cell membrane",
    "Secreted",
    "Mitochondrion",
    "Endoplasmic reticulum",
    "Membrane",
    "Golgi apparatus",
    "Cytoskeleton",
    "Peroxisome",
];

/// Amino-acid composition columns; the first character is the one-letter code
const DEFAULT_AMINO_ACID_COLS: &[&str] = &[
    "A_pct", "R_pct", "N_pct", "D_pct", "C_pct", "Q_pct", "E_pct", "G_pct", "H_pct", "I_pct",
    "L_pct", "K_pct", "M_pct", "F_pct", "P_pct", "S_pct", "T_pct", "W_pct", "Y_pct", "V_pct",
];

const DEFAULT_METRICS: &[&str] = &[
    "Mass",
    "Length",
    "Isoelectric point",
    "Aromaticity",
    "Instability index",
    "GRAVY",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the table and the cleaning stats
    pub data_dir: PathBuf,
    pub table_file: String,
    pub stats_file: String,
    pub locations: Vec<String>,
    pub amino_acid_cols: Vec<String>,
    pub metrics: Vec<String>,
    pub port: u16,
    /// Request worker threads for `serve` (0 = number of CPUs)
    pub workers: usize,
    /// Rows shown in the example data table
    pub preview_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            table_file: DEFAULT_TABLE_FILE.to_string(),
            stats_file: DEFAULT_STATS_FILE.to_string(),
            locations: to_owned_list(DEFAULT_LOCATIONS),
            amino_acid_cols: to_owned_list(DEFAULT_AMINO_ACID_COLS),
            metrics: to_owned_list(DEFAULT_METRICS),
            port: DEFAULT_PORT,
            workers: 0,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Config {
    /// Read a JSON config file; absent fields keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DashboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&text).map_err(|source| DashboardError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no chart could be built from.
    pub fn validate(&self) -> Result<()> {
        let lists = [
            ("locations", &self.locations),
            ("amino_acid_cols", &self.amino_acid_cols),
            ("metrics", &self.metrics),
        ];
        for (name, list) in lists {
            if list.is_empty() {
                return Err(DashboardError::Config(format!("'{}' must not be empty", name)));
            }
            if let Some(blank) = list.iter().find(|s| s.trim().is_empty()) {
                return Err(DashboardError::Config(format!(
                    "'{}' contains a blank entry {:?}",
                    name, blank
                )));
            }
            for (i, item) in list.iter().enumerate() {
                if list[..i].contains(item) {
                    return Err(DashboardError::Config(format!(
                        "'{}' lists '{}' more than once",
                        name, item
                    )));
                }
            }
        }
        if self.table_file.is_empty() || self.stats_file.is_empty() {
            return Err(DashboardError::Config("data file names must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn table_path(&self) -> PathBuf {
        self.data_dir.join(&self.table_file)
    }

    pub fn stats_path(&self) -> PathBuf {
        self.data_dir.join(&self.stats_file)
    }

    /// Every column the protein table must provide.
    pub fn required_columns(&self) -> Vec<&str> {
        let mut cols = vec!["Mass", "locations"];
        for c in self
            .locations
            .iter()
            .chain(&self.amino_acid_cols)
            .chain(&self.metrics)
        {
            if !cols.contains(&c.as_str()) {
                cols.push(c);
            }
        }
        cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.locations.len(), 10);
        assert_eq!(config.amino_acid_cols.len(), 20);
        assert_eq!(config.table_path(), PathBuf::from("data/model_scoring.tsv"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"data_dir": "/srv/prot", "metrics": ["Mass"]}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/prot"));
        assert_eq!(config.metrics, vec!["Mass".to_string()]);
        assert_eq!(config.locations, Config::default().locations);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_empty_list_rejected() {
        let config = Config { locations: vec![], ..Config::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("locations"));
    }

    #[test]
    fn test_duplicate_entry_rejected() {
        let config = Config {
            metrics: vec!["Mass".to_string(), "Mass".to_string()],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_required_columns_deduplicated() {
        // "Mass" is both a fixed column and a default metric
        let config = Config::default();
        let cols = config.required_columns();
        assert_eq!(cols.iter().filter(|c| **c == "Mass").count(), 1);
        assert!(cols.contains(&"locations"));
        assert!(cols.contains(&"Nucleus"));
    }
}
