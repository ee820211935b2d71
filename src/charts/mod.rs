//! Chart models and builders
//!
//! Every chart is built in two steps:
//!
//! 1. A builder in [`builders`] turns the dataset (plus user options) into a
//!    plain chart model: bars, slices, boxes or histogram bins, with tick
//!    labels already formatted. Models are `Serialize` so they can be served
//!    as JSON.
//! 2. [`Chart::to_svg`] draws the model with plotters into a local string.
//!    The drawing area is dropped before the string is returned, so repeated
//!    renders never leave figures behind.
//!
//! # Charts
//!
//! | Builder | Model | Options |
//! |---------|-------|---------|
//! | [`cleaning_stats_chart`] | bar | - |
//! | [`location_counts_chart`] | bar | - |
//! | [`multi_location_pie`] | pie | - |
//! | [`amino_acid_boxplot`] | box | - |
//! | [`mass_histogram`] | histogram | axis scale |
//! | [`location_vs_all_histogram`] | histogram | location, metric, axis scale |

pub mod builders;
pub mod describe;
pub mod format;
pub mod svg;

pub use builders::{
    amino_acid_boxplot, cleaning_stats_chart, location_counts, location_counts_chart,
    location_samples, location_split, location_vs_all_histogram, mass_histogram,
    multi_location_pie, LocationSamples, LocationSplit,
};
pub use describe::{Bin, BoxStats};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// X axis transform for the histograms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AxisScale {
    #[default]
    Linear,
    Log,
}

impl AxisScale {
    pub const ALL: [AxisScale; 2] = [AxisScale::Linear, AxisScale::Log];

    pub fn label(&self) -> &'static str {
        match self {
            AxisScale::Linear => "Linear",
            AxisScale::Log => "Log",
        }
    }
}

impl fmt::Display for AxisScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AxisScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Linear" => Ok(AxisScale::Linear),
            "Log" => Ok(AxisScale::Log),
            other => Err(format!("unknown axis scale '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// Text drawn above the bar
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub bars: Vec<Bar>,
    /// Category labels drawn vertically
    pub rotate_labels: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: usize,
    pub percent: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<Slice>,
    /// Degrees counter-clockwise from 3 o'clock where the first wedge starts
    pub start_angle: f64,
}

impl PieChart {
    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.value).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSeries {
    pub column: String,
    pub tick: String,
    /// `None` when the column has no values
    pub stats: Option<BoxStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlot {
    pub title: String,
    pub y_label: String,
    pub boxes: Vec<BoxSeries>,
    pub flier_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSeries {
    pub label: String,
    pub bins: Vec<Bin>,
    pub sample_count: usize,
    pub dropped_nonpositive: usize,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub scale: AxisScale,
    pub series: Vec<HistogramSeries>,
    pub legend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Bar(BarChart),
    Pie(PieChart),
    Box(BoxPlot),
    Histogram(Histogram),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Bar(c) => &c.title,
            Chart::Pie(c) => &c.title,
            Chart::Box(c) => &c.title,
            Chart::Histogram(c) => &c.title,
        }
    }

    pub fn to_svg(&self) -> crate::error::Result<String> {
        svg::render(self)
    }
}
