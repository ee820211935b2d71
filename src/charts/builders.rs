//! Chart builders
//!
//! Pure functions from the dataset (and validated options) to chart models.
//! Rows with a missing value in a chart's column are left out of that chart
//! only.

use super::describe::{self, Binned};
use super::format;
use super::{
    AxisScale, Bar, BarChart, BoxPlot, BoxSeries, Chart, Histogram, HistogramSeries, PieChart,
    Slice,
};
use crate::data::{CleaningStats, Dataset, ProteinTable};
use crate::error::Result;
use log::debug;
use rayon::prelude::*;
use serde::Serialize;

pub const MASS_COLUMN: &str = "Mass";
pub const LOCATIONS_COLUMN: &str = "locations";
pub const ALL_PROTEINS_LABEL: &str = "all proteins";

const OVERLAY_ALPHA: f64 = 0.5;
const FLIER_RADIUS: f64 = 1.0;

/// Bar chart of counts shown in thousands, with "k" bar labels.
fn thousands_bar_chart(
    title: &str,
    x_label: Option<&str>,
    y_label: Option<&str>,
    counts: &[(String, u64)],
) -> BarChart {
    let bars: Vec<Bar> = counts
        .iter()
        .map(|(label, count)| {
            let value = *count as f64 / 1000.0;
            Bar {
                label: label.clone(),
                value,
                text: format::thousands(value),
            }
        })
        .collect();

    BarChart {
        title: title.to_string(),
        x_label: x_label.map(String::from),
        y_label: y_label.map(String::from),
        bars,
        rotate_labels: true,
    }
}

pub fn cleaning_stats_chart(stats: &CleaningStats) -> Chart {
    let counts: Vec<(String, u64)> = stats
        .stages
        .iter()
        .map(|s| (s.name.clone(), s.count))
        .collect();
    Chart::Bar(thousands_bar_chart(
        "Data cleaning",
        None,
        Some(stats.name.as_str()),
        &counts,
    ))
}

/// Per-location count of proteins that have a mass and carry that location.
///
/// Locations are independent, so they are counted in parallel; the result
/// keeps the order of `locations`.
pub fn location_counts(table: &ProteinTable, locations: &[String]) -> Result<Vec<(String, u64)>> {
    let has_mass: Vec<bool> = table.numeric(MASS_COLUMN)?.map(|m| m.is_some()).collect();

    locations
        .par_iter()
        .map(|location| -> Result<(String, u64)> {
            let flags = table.flags(location)?;
            let count = flags
                .iter()
                .zip(&has_mass)
                .filter(|(member, mass)| **member && **mass)
                .count() as u64;
            Ok((location.clone(), count))
        })
        .collect()
}

pub fn location_counts_chart(dataset: &Dataset) -> Result<Chart> {
    let counts = location_counts(dataset.table(), &dataset.config().locations)?;
    debug!("location counts: {:?}", counts);
    Ok(Chart::Bar(thousands_bar_chart(
        "Location counts",
        Some("Proteins with this location"),
        Some("Protein counts"),
        &counts,
    )))
}

/// Proteins with one location versus several
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocationSplit {
    pub multiple: usize,
    pub single: usize,
}

impl LocationSplit {
    pub fn total(&self) -> usize {
        self.multiple + self.single
    }
}

pub fn location_split(table: &ProteinTable) -> Result<LocationSplit> {
    let mut split = LocationSplit { multiple: 0, single: 0 };
    let mut skipped = 0usize;
    for n in table.numeric(LOCATIONS_COLUMN)? {
        match n {
            Some(n) if n > 1.0 => split.multiple += 1,
            Some(n) if n == 1.0 => split.single += 1,
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!("{} rows without a usable location count", skipped);
    }
    Ok(split)
}

pub fn multi_location_pie(dataset: &Dataset) -> Result<Chart> {
    let split = location_split(dataset.table())?;
    let total = split.total();
    let slices = [("Multiple Locations", split.multiple), ("Single Location", split.single)]
        .into_iter()
        .map(|(label, value)| {
            let percent = if total > 0 {
                100.0 * value as f64 / total as f64
            } else {
                0.0
            };
            Slice {
                label: label.to_string(),
                value,
                percent,
                text: format::pie_percent(percent),
            }
        })
        .collect();

    Ok(Chart::Pie(PieChart {
        title: "Multiple locations".to_string(),
        slices,
        start_angle: 90.0,
    }))
}

pub fn amino_acid_boxplot(dataset: &Dataset) -> Result<Chart> {
    let table = dataset.table();
    let mut boxes = Vec::with_capacity(dataset.config().amino_acid_cols.len());
    for column in &dataset.config().amino_acid_cols {
        let values = table.present_values(column)?;
        boxes.push(BoxSeries {
            column: column.clone(),
            tick: format::initial(column),
            stats: describe::box_stats(values),
        });
    }

    Ok(Chart::Box(BoxPlot {
        title: "Amino acid composition".to_string(),
        y_label: "Amino acid percent".to_string(),
        boxes,
        flier_radius: FLIER_RADIUS,
    }))
}

fn series(label: &str, binned: Binned, alpha: f64) -> HistogramSeries {
    HistogramSeries {
        label: label.to_string(),
        bins: binned.bins,
        sample_count: binned.sample_count,
        dropped_nonpositive: binned.dropped_nonpositive,
        alpha,
    }
}

/// Histogram of protein masses. The scale changes only the axis transform
/// and, under `Log`, which values can be shown at all.
pub fn mass_histogram(dataset: &Dataset, scale: AxisScale) -> Result<Chart> {
    let masses = dataset.table().present_values(MASS_COLUMN)?;
    let binned = describe::histogram(&masses, scale, false);
    if binned.dropped_nonpositive > 0 {
        debug!("{} non-positive masses left off the log axis", binned.dropped_nonpositive);
    }
    let series = vec![series(MASS_COLUMN, binned, 1.0)];

    Ok(Chart::Histogram(Histogram {
        title: "Protein mass distribution".to_string(),
        x_label: MASS_COLUMN.to_string(),
        y_label: "Mass".to_string(),
        scale,
        series,
        legend: false,
    }))
}

/// Metric values for one location and for every protein, missing dropped
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSamples {
    pub location: Vec<f64>,
    pub all: Vec<f64>,
}

pub fn location_samples(table: &ProteinTable, location: &str, metric: &str) -> Result<LocationSamples> {
    let flags = table.flags(location)?;
    let mut samples = LocationSamples {
        location: Vec::new(),
        all: Vec::new(),
    };
    for (value, member) in table.numeric(metric)?.zip(flags) {
        if let Some(v) = value {
            samples.all.push(v);
            if member {
                samples.location.push(v);
            }
        }
    }
    Ok(samples)
}

pub fn location_vs_all_histogram(
    dataset: &Dataset,
    location: &str,
    metric: &str,
    scale: AxisScale,
) -> Result<Chart> {
    let samples = location_samples(dataset.table(), location, metric)?;
    let series = vec![
        series(location, describe::histogram(&samples.location, scale, true), OVERLAY_ALPHA),
        series(ALL_PROTEINS_LABEL, describe::histogram(&samples.all, scale, true), OVERLAY_ALPHA),
    ];

    Ok(Chart::Histogram(Histogram {
        title: format!("{} vs all proteins distribution for {}", location, metric),
        x_label: metric.to_string(),
        y_label: "Density".to_string(),
        scale,
        series,
        legend: true,
    }))
}
