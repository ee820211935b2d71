//! Dataset loading
//!
//! [`DataLoader`] reads the two input files at most once per path through a
//! [`SingleFlight`] cache. [`Dataset`] bundles the loaded table, the cleaning
//! stats and the configuration into one immutable value that is built at
//! startup and handed by reference to the chart builders and the dashboard.

pub mod cache;
pub mod stats;
pub mod table;

pub use cache::SingleFlight;
pub use stats::{CleaningStats, Stage, CLEANING_STATS_NAME};
pub use table::{Preview, PreviewRow, ProteinTable, Value};

use crate::config::Config;
use crate::error::Result;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

pub struct DataLoader {
    table_path: PathBuf,
    stats_path: PathBuf,
    required_columns: Vec<String>,
    tables: SingleFlight<ProteinTable>,
    stats: SingleFlight<CleaningStats>,
}

impl DataLoader {
    pub fn new(config: &Config) -> Self {
        Self {
            table_path: config.table_path(),
            stats_path: config.stats_path(),
            required_columns: config.required_columns().into_iter().map(String::from).collect(),
            tables: SingleFlight::new(),
            stats: SingleFlight::new(),
        }
    }

    /// The protein scoring table, validated against the configured columns.
    pub fn get_full_data(&self) -> Result<Arc<ProteinTable>> {
        self.tables.get_or_load(&self.table_path, |path| {
            info!("Reading protein table {}", path.display());
            let table = ProteinTable::from_path(path)?;
            table.require_columns(self.required_columns.iter().map(String::as_str))?;
            info!(
                "Loaded {} proteins x {} columns",
                table.len(),
                table.column_names().len()
            );
            Ok(table)
        })
    }

    pub fn get_cleaning_stats(&self) -> Result<Arc<CleaningStats>> {
        self.stats.get_or_load(&self.stats_path, |path| {
            info!("Reading cleaning stats {}", path.display());
            let stats = CleaningStats::from_path(path)?;
            info!("Loaded {} cleaning stages", stats.len());
            Ok(stats)
        })
    }

    /// Disk reads performed so far across both files.
    pub fn load_count(&self) -> usize {
        self.tables.load_count() + self.stats.load_count()
    }
}

/// Everything the dashboard reads, loaded once
#[derive(Debug, Clone)]
pub struct Dataset {
    config: Arc<Config>,
    table: Arc<ProteinTable>,
    cleaning_stats: Arc<CleaningStats>,
}

impl Dataset {
    pub fn load(config: Config, loader: &DataLoader) -> Result<Self> {
        let table = loader.get_full_data()?;
        let cleaning_stats = loader.get_cleaning_stats()?;
        Self::from_parts(config, table, cleaning_stats)
    }

    /// Assemble from already-loaded parts, re-checking the table's columns.
    pub fn from_parts(
        config: Config,
        table: Arc<ProteinTable>,
        cleaning_stats: Arc<CleaningStats>,
    ) -> Result<Self> {
        config.validate()?;
        table.require_columns(config.required_columns())?;
        Ok(Self {
            config: Arc::new(config),
            table,
            cleaning_stats,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn table(&self) -> &ProteinTable {
        &self.table
    }

    pub fn cleaning_stats(&self) -> &CleaningStats {
        &self.cleaning_stats
    }
}
