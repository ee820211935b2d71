//! Protloc - Dashboard for a protein subcellular location dataset
//!
//! Protloc renders the exploratory charts behind a protein location
//! predictor: how the dataset was cleaned, how proteins spread over
//! subcellular locations, and how sequence features such as mass or amino
//! acid composition differ between locations.
//!
//! # Overview
//!
//! Two input files are read once at startup:
//!
//! 1. **Scoring table** (`model_scoring.tsv`): one row per protein, indexed by
//!    protein id, with a `Mass` column, a `locations` count, one boolean
//!    column per location and numeric feature columns.
//!
//! 2. **Cleaning stats** (`data_cleaning_stats.json`): an ordered object of
//!    `stage -> protein count`.
//!
//! Both are bundled into an immutable [`Dataset`]. The [`Dashboard`] turns a
//! dataset plus a [`Selection`] into a page of sections, each holding a chart
//! model that renders to SVG.
//!
//! # Quick Start
//!
//! ```no_run
//! use protloc::{Config, DataLoader, Dataset, Dashboard, Selection};
//!
//! let config = Config::default();
//! let loader = DataLoader::new(&config);
//! let dataset = Dataset::load(config, &loader)?;
//!
//! let page = Dashboard::new(&dataset).render_page(&Selection::default());
//! protloc::report::generate("dashboard.html", &page)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! - [`data`]: table and stats parsing, load-once cache, [`Dataset`]
//! - [`charts`]: chart builders, statistics and the SVG renderer
//! - [`dashboard`]: page sections and typed selections
//! - [`report`]: HTML and JSON output
//! - [`serve`]: interactive HTTP mode

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod report;
pub mod serve;

pub use charts::{AxisScale, Chart};
pub use config::Config;
pub use dashboard::{Dashboard, Page, ParamChange, Section, SectionId, Selection};
pub use data::{CleaningStats, DataLoader, Dataset, ProteinTable};
pub use error::{DashboardError, Result};
