//! Page output
//!
//! This module writes a rendered [`Page`] in two formats:
//!
//! - **HTML**: self-contained document with inline SVG charts and selectors
//! - **JSON**: every section's heading, selections and chart model
//!
//! plus a plain-text [`Summary`] of the dataset for the terminal.
//!
//! # Usage
//!
//! ```ignore
//! use protloc::report;
//!
//! // Automatically picks format based on extension
//! report::generate("dashboard.html", &page)?;  // HTML
//! report::generate("dashboard.json", &page)?;  // JSON
//! ```

pub mod html;
pub mod json;

use crate::charts::{self, LocationSplit};
use crate::dashboard::Page;
use crate::data::Dataset;
use crate::error::Result;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// Write `page` to `path`, choosing the format from the file extension.
pub fn generate<P: AsRef<Path>>(path: P, page: &Page) -> io::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = io::BufWriter::new(std::fs::File::create(path)?);

    match ext.as_str() {
        "json" => json::write(&mut file, page)?,
        _ => html::write(&mut file, page)?,
    }
    file.flush()
}

/// Headline numbers for a dataset
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub proteins: usize,
    pub stages: Vec<(String, u64)>,
    pub location_counts: Vec<(String, u64)>,
    pub split: LocationSplit,
}

impl Summary {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        let table = dataset.table();
        Ok(Self {
            proteins: table.len(),
            stages: dataset
                .cleaning_stats()
                .stages
                .iter()
                .map(|s| (s.name.clone(), s.count))
                .collect(),
            location_counts: charts::location_counts(table, &dataset.config().locations)?,
            split: charts::location_split(table)?,
        })
    }

    /// Tab-separated, one block per table, for piping into other tools.
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "# proteins\t{}", self.proteins)?;
        writeln!(writer)?;
        writeln!(writer, "stage\tproteins")?;
        for (stage, count) in &self.stages {
            writeln!(writer, "{}\t{}", stage, count)?;
        }
        writeln!(writer)?;
        writeln!(writer, "location\tproteins_with_mass")?;
        for (location, count) in &self.location_counts {
            writeln!(writer, "{}\t{}", location, count)?;
        }
        writeln!(writer)?;
        writeln!(writer, "locations\tproteins")?;
        writeln!(writer, "single\t{}", self.split.single)?;
        writeln!(writer, "multiple\t{}", self.split.multiple)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dashboard::{Dashboard, Selection};
    use crate::data::{CleaningStats, ProteinTable, Stage};
    use std::sync::Arc;

    // ==========================================================================
    // SUMMARY
    // ==========================================================================
    //
    // The summary is what `protloc summary` prints: the same numbers the
    // charts show, as plain tab-separated text.
    // ==========================================================================

    fn dataset() -> Dataset {
        let table = ProteinTable::from_reader(
            "id\tMass\tlocations\tNucleus\tA_pct\n\
             P1\t100\t1\tTrue\t0.1\n\
             P2\t\t2\tTrue\t0.2\n\
             P3\t300\t2\tFalse\t0.3\n"
                .as_bytes(),
            Path::new("t.tsv"),
        )
        .unwrap();
        let stats = CleaningStats {
            name: "Protein counts".to_string(),
            stages: vec![
                Stage { name: "raw".to_string(), count: 10 },
                Stage { name: "final".to_string(), count: 3 },
            ],
        };
        let config = Config {
            locations: vec!["Nucleus".to_string()],
            amino_acid_cols: vec!["A_pct".to_string()],
            metrics: vec!["Mass".to_string()],
            ..Config::default()
        };
        Dataset::from_parts(config, Arc::new(table), Arc::new(stats)).unwrap()
    }

    #[test]
    fn test_summary_counts() {
        let summary = Summary::from_dataset(&dataset()).unwrap();
        assert_eq!(summary.proteins, 3);
        assert_eq!(summary.location_counts, vec![("Nucleus".to_string(), 1)]);
        assert_eq!(summary.split.single, 1);
        assert_eq!(summary.split.multiple, 2);
    }

    #[test]
    fn test_summary_tsv() {
        let summary = Summary::from_dataset(&dataset()).unwrap();
        let mut out = Vec::new();
        summary.write_tsv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("raw\t10\n"));
        assert!(text.contains("Nucleus\t1\n"));
        assert!(text.contains("multiple\t2\n"));
    }

    // ==========================================================================
    // FORMAT SELECTION
    // ==========================================================================

    #[test]
    fn test_generate_picks_format_from_extension() {
        let dataset = dataset();
        let page = Dashboard::new(&dataset).render_page(&Selection::default());
        let dir = tempfile::tempdir().unwrap();

        let html_path = dir.path().join("page.html");
        generate(&html_path, &page).unwrap();
        let html = std::fs::read_to_string(&html_path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));

        let json_path = dir.path().join("page.JSON");
        generate(&json_path, &page).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json["title"], "Prot-loc-pred");
    }
}
