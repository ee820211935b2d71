//! Descriptive statistics behind the charts
//!
//! - Quantiles use linear interpolation between closest ranks.
//! - Box whiskers extend to the furthest point within 1.5 × IQR.
//! - Histogram bin counts follow the "auto" rule: whichever of Sturges and
//!   Freedman–Diaconis gives more bins.

use super::AxisScale;
use serde::Serialize;

/// Upper bound on automatic bin counts
pub const MAX_BINS: usize = 200;

const WHISKER_IQR: f64 = 1.5;

pub fn sort_values(mut values: Vec<f64>) -> Vec<f64> {
    values.retain(|v| v.is_finite());
    values.sort_by(f64::total_cmp);
    values
}

/// Quantile `q` in [0, 1] of already-sorted, non-empty data.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub n: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub fliers: Vec<f64>,
}

pub fn box_stats(values: Vec<f64>) -> Option<BoxStats> {
    let sorted = sort_values(values);
    if sorted.is_empty() {
        return None;
    }
    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let low_limit = q1 - WHISKER_IQR * iqr;
    let high_limit = q3 + WHISKER_IQR * iqr;

    let whisker_low = sorted.iter().copied().find(|&v| v >= low_limit).unwrap_or(q1);
    let whisker_high = sorted.iter().rev().copied().find(|&v| v <= high_limit).unwrap_or(q3);
    let fliers = sorted
        .iter()
        .copied()
        .filter(|&v| v < whisker_low || v > whisker_high)
        .collect();

    Some(BoxStats {
        n: sorted.len(),
        q1,
        median,
        q3,
        whisker_low,
        whisker_high,
        fliers,
    })
}

/// Number of equal-width bins for sorted data.
pub fn auto_bin_count(sorted: &[f64]) -> usize {
    let n = sorted.len();
    if n < 2 {
        return 1;
    }
    let range = sorted[n - 1] - sorted[0];
    if range <= 0.0 {
        return 1;
    }
    let sturges = ((n as f64).log2() + 1.0).ceil() as usize;
    let iqr = quantile(sorted, 0.75) - quantile(sorted, 0.25);
    let fd_width = 2.0 * iqr / (n as f64).cbrt();
    let fd = if fd_width > 0.0 {
        (range / fd_width).ceil() as usize
    } else {
        0
    };
    sturges.max(fd).clamp(1, MAX_BINS)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    /// Lower edge, in data units
    pub lo: f64,
    /// Upper edge, in data units
    pub hi: f64,
    pub count: usize,
    /// Bar height: `count`, or density when normalised
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binned {
    pub bins: Vec<Bin>,
    /// Values kept after dropping those the scale can't show
    pub sample_count: usize,
    /// Values ≤ 0 dropped because the axis is logarithmic
    pub dropped_nonpositive: usize,
}

/// Equal-width histogram of `values` in the scale's coordinate space.
///
/// Under [`AxisScale::Log`] the bins are equal-width in log10 space and
/// non-positive values are dropped and counted. With `density` the heights
/// are normalised so that Σ height × width = 1, the width being measured in
/// the same space the bins are equal in.
pub fn histogram(values: &[f64], scale: AxisScale, density: bool) -> Binned {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (transformed, dropped_nonpositive) = match scale {
        AxisScale::Linear => (finite.collect::<Vec<_>>(), 0),
        AxisScale::Log => {
            let all: Vec<f64> = finite.collect();
            let kept: Vec<f64> = all.iter().filter(|&&v| v > 0.0).map(|v| v.log10()).collect();
            let dropped = all.len() - kept.len();
            (kept, dropped)
        }
    };
    let sorted = sort_values(transformed);
    let n = sorted.len();
    if n == 0 {
        return Binned {
            bins: Vec::new(),
            sample_count: 0,
            dropped_nonpositive,
        };
    }

    let (mut start, mut end) = (sorted[0], sorted[n - 1]);
    if start == end {
        start -= 0.5;
        end += 0.5;
    }
    let bin_count = auto_bin_count(&sorted);
    let width = (end - start) / bin_count as f64;

    let mut counts = vec![0usize; bin_count];
    for v in &sorted {
        let idx = (((v - start) / width).floor() as usize).min(bin_count - 1);
        counts[idx] += 1;
    }

    let back = |x: f64| match scale {
        AxisScale::Linear => x,
        AxisScale::Log => 10f64.powf(x),
    };
    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let lo = start + i as f64 * width;
            let height = if density {
                count as f64 / (n as f64 * width)
            } else {
                count as f64
            };
            Bin {
                lo: back(lo),
                hi: back(lo + width),
                count,
                height,
            }
        })
        .collect();

    Binned {
        bins,
        sample_count: n,
        dropped_nonpositive,
    }
}
