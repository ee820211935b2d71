//! SVG rendering for chart models, drawn with plotters
//!
//! Each render owns its backend: the drawing area is built over a local
//! `String`, presented, and dropped before the SVG text is returned.

use super::{format, AxisScale, BarChart, BoxPlot, Chart, Histogram, PieChart};
use crate::error::{DashboardError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_svg::SVGBackend;

pub const WIDTH: u32 = 640;
pub const HEIGHT: u32 = 420;

const FONT: &str = "sans-serif";

/// Series colours (seaborn "deep")
const PALETTE: [RGBColor; 6] = [
    RGBColor(76, 114, 176),
    RGBColor(221, 132, 82),
    RGBColor(85, 168, 104),
    RGBColor(196, 78, 82),
    RGBColor(129, 114, 179),
    RGBColor(147, 120, 96),
];

/// Pie wedge colours (matplotlib default cycle)
const PIE_COLORS: [RGBColor; 4] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
];

type DrawResult<T, DB> = std::result::Result<T, DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

pub fn render(chart: &Chart) -> Result<String> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (WIDTH, HEIGHT)).into_drawing_area();
        draw(&root, chart).map_err(|e| DashboardError::Render(format!("{}: {}", chart.title(), e)))?;
    }
    Ok(buf)
}

fn draw<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, chart: &Chart) -> DrawResult<(), DB> {
    root.fill(&WHITE)?;
    match chart {
        Chart::Bar(c) => draw_bar(root, c)?,
        Chart::Pie(c) => draw_pie(root, c)?,
        Chart::Box(c) => draw_box(root, c)?,
        Chart::Histogram(c) => draw_histogram(root, c)?,
    }
    root.present()
}

/// Title plus a centred message, for charts with nothing to plot.
fn draw_empty<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, title: &str) -> DrawResult<(), DB> {
    let area = root.titled(title, (FONT, 18))?;
    let (w, h) = area.dim_in_pixel();
    area.draw(&Text::new(
        "No data",
        (w as i32 / 2 - 28, h as i32 / 2),
        (FONT, 16).into_font().color(&BLACK),
    ))?;
    Ok(())
}

// Rough half-width of a label, for centring text on a point
fn half_width(text: &str, size: i32) -> i32 {
    (text.chars().count() as i32 * size * 3) / 10
}

fn draw_bar<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, model: &BarChart) -> DrawResult<(), DB> {
    if model.bars.is_empty() {
        return draw_empty(root, &model.title);
    }
    let n = model.bars.len();
    let max = model.bars.iter().map(|b| b.value).fold(0.0, f64::max);
    let top = if max > 0.0 { max * 1.12 } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(&model.title, (FONT, 18))
        .margin(15)
        .x_label_area_size(if model.rotate_labels { 110 } else { 40 })
        .y_label_area_size(60)
        .build_cartesian_2d((0..n).into_segmented(), 0.0..top)?;

    let label_font = if model.rotate_labels {
        (FONT, 12).into_font().transform(FontTransform::Rotate270)
    } else {
        (FONT, 12).into_font()
    };
    let x_fmt = |x: &SegmentValue<usize>| match x {
        SegmentValue::CenterOf(i) if *i < n => model.bars[*i].label.clone(),
        _ => String::new(),
    };
    let y_fmt = |y: &f64| format::thousands(*y);

    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&x_fmt)
        .x_label_style(label_font)
        .y_label_formatter(&y_fmt);
    if let Some(desc) = &model.x_label {
        mesh.x_desc(desc.as_str());
    }
    if let Some(desc) = &model.y_label {
        mesh.y_desc(desc.as_str());
    }
    mesh.draw()?;

    let fill = PALETTE[0];
    chart.draw_series(model.bars.iter().enumerate().map(|(i, bar)| {
        let mut rect = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), bar.value)],
            fill.filled(),
        );
        rect.set_margin(0, 0, 6, 6);
        rect
    }))?;

    chart.draw_series(model.bars.iter().enumerate().map(|(i, bar)| {
        EmptyElement::at((SegmentValue::CenterOf(i), bar.value))
            + Text::new(
                bar.text.clone(),
                (-half_width(&bar.text, 12), -16),
                (FONT, 12).into_font().color(&BLACK),
            )
    }))?;
    Ok(())
}

fn pie_point(center: (i32, i32), radius: f64, degrees: f64) -> (i32, i32) {
    let a = degrees.to_radians();
    (
        center.0 + (radius * a.cos()).round() as i32,
        center.1 - (radius * a.sin()).round() as i32,
    )
}

/// Wedge outline sweeping counter-clockwise from `start` degrees.
fn wedge(center: (i32, i32), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = (sweep.ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for i in 0..=steps {
        points.push(pie_point(center, radius, start + sweep * i as f64 / steps as f64));
    }
    points
}

fn draw_pie<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, model: &PieChart) -> DrawResult<(), DB> {
    let area = root.titled(&model.title, (FONT, 18))?;
    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.36;

    let total = model.total();
    if total == 0 {
        area.draw(&Circle::new(center, radius as i32, BLACK.stroke_width(1)))?;
        return Ok(());
    }

    let mut start = model.start_angle;
    for (k, slice) in model.slices.iter().enumerate() {
        if slice.value == 0 {
            continue;
        }
        let color = PIE_COLORS[k % PIE_COLORS.len()];
        let sweep = 360.0 * slice.value as f64 / total as f64;
        if slice.value == total {
            area.draw(&Circle::new(center, radius as i32, color.filled()))?;
        } else {
            area.draw(&Polygon::new(wedge(center, radius, start, sweep), color.filled()))?;
        }

        let mid = start + sweep / 2.0;
        let (px, py) = pie_point(center, radius * 0.6, mid);
        area.draw(&Text::new(
            slice.text.clone(),
            (px - half_width(&slice.text, 13), py - 6),
            (FONT, 13).into_font().color(&WHITE),
        ))?;
        let (lx, ly) = pie_point(center, radius * 1.15, mid);
        area.draw(&Text::new(
            slice.label.clone(),
            (lx - half_width(&slice.label, 13), ly - 6),
            (FONT, 13).into_font().color(&BLACK),
        ))?;
        start += sweep;
    }
    Ok(())
}

fn draw_box<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, model: &BoxPlot) -> DrawResult<(), DB> {
    let (lo, hi) = model
        .boxes
        .iter()
        .filter_map(|b| b.stats.as_ref())
        .flat_map(|s| {
            let lo = s.fliers.iter().copied().fold(s.whisker_low, f64::min);
            let hi = s.fliers.iter().copied().fold(s.whisker_high, f64::max);
            [lo, hi]
        })
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return draw_empty(root, &model.title);
    }
    let lo = lo.min(0.0);
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 0.01 };
    let n = model.boxes.len();

    let mut chart = ChartBuilder::on(root)
        .caption(&model.title, (FONT, 18))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..(n as f64 - 0.5), lo..hi + pad)?;

    let x_fmt = |x: &f64| {
        let i = x.round();
        if (x - i).abs() < 1e-6 && i >= 0.0 && (i as usize) < n {
            model.boxes[i as usize].tick.clone()
        } else {
            String::new()
        }
    };
    let y_fmt = |y: &f64| format::percent(*y);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .y_desc(model.y_label.as_str())
        .draw()?;

    let fill = PALETTE[0];
    let stats: Vec<(f64, &super::BoxStats)> = model
        .boxes
        .iter()
        .enumerate()
        .filter_map(|(i, b)| b.stats.as_ref().map(|s| (i as f64, s)))
        .collect();
    let half = 0.3;

    chart.draw_series(stats.iter().map(|(x, s)| {
        Rectangle::new([(x - half, s.q1), (x + half, s.q3)], fill.mix(0.8).filled())
    }))?;
    chart.draw_series(stats.iter().map(|(x, s)| {
        Rectangle::new([(x - half, s.q1), (x + half, s.q3)], BLACK.stroke_width(1))
    }))?;
    chart.draw_series(stats.iter().map(|(x, s)| {
        PathElement::new(vec![(x - half, s.median), (x + half, s.median)], BLACK.stroke_width(2))
    }))?;
    chart.draw_series(stats.iter().flat_map(|(x, s)| {
        let x = *x;
        [
            PathElement::new(vec![(x, s.q3), (x, s.whisker_high)], BLACK.stroke_width(1)),
            PathElement::new(vec![(x, s.q1), (x, s.whisker_low)], BLACK.stroke_width(1)),
            PathElement::new(vec![(x - half / 2.0, s.whisker_high), (x + half / 2.0, s.whisker_high)], BLACK.stroke_width(1)),
            PathElement::new(vec![(x - half / 2.0, s.whisker_low), (x + half / 2.0, s.whisker_low)], BLACK.stroke_width(1)),
        ]
    }))?;

    let radius = model.flier_radius.round().max(1.0) as i32;
    chart.draw_series(stats.iter().flat_map(|(x, s)| {
        let x = *x;
        s.fliers.iter().map(move |&y| Circle::new((x, y), radius, BLACK.filled()))
    }))?;
    Ok(())
}

/// Draws the bars, legend and mesh on an already built histogram chart.
/// A macro because linear and log x coordinates are different types.
macro_rules! histogram_body {
    ($chart:expr, $model:expr, $x_fmt:expr) => {{
        let chart = $chart;
        let model: &Histogram = $model;
        let x_fmt = $x_fmt;
        let y_fmt = |y: &f64| format::plain(*y);
        chart
            .configure_mesh()
            .x_labels(8)
            .y_labels(6)
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .x_desc(model.x_label.as_str())
            .y_desc(model.y_label.as_str())
            .draw()?;

        for (k, series) in model.series.iter().enumerate() {
            let color = PALETTE[k % PALETTE.len()].mix(series.alpha);
            chart
                .draw_series(
                    series
                        .bins
                        .iter()
                        .map(move |b| Rectangle::new([(b.lo, 0.0), (b.hi, b.height)], color.filled())),
                )?
                .label(series.label.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
        }

        if model.legend {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
        }
    }};
}

fn draw_histogram<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, model: &Histogram) -> DrawResult<(), DB> {
    let (mut lo, mut hi, mut top) = (f64::INFINITY, f64::NEG_INFINITY, 0.0f64);
    for bin in model.series.iter().flat_map(|s| &s.bins) {
        lo = lo.min(bin.lo);
        hi = hi.max(bin.hi);
        top = top.max(bin.height);
    }
    if !lo.is_finite() {
        return draw_empty(root, &model.title);
    }
    let top = if top > 0.0 { top * 1.08 } else { 1.0 };

    let mut builder = ChartBuilder::on(root);
    builder
        .caption(&model.title, (FONT, 18))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70);

    match model.scale {
        AxisScale::Linear => {
            let mut chart = builder.build_cartesian_2d(lo..hi, 0.0..top)?;
            histogram_body!(&mut chart, model, |x: &f64| format::plain(*x));
        }
        AxisScale::Log => {
            let mut chart = builder.build_cartesian_2d((lo..hi).log_scale(), 0.0..top)?;
            histogram_body!(&mut chart, model, |x: &f64| format::log_tick(*x));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::describe::{box_stats, histogram};
    use crate::charts::{Bar, BoxSeries, HistogramSeries, Slice};

    fn bar_chart() -> Chart {
        Chart::Bar(BarChart {
            title: "Data cleaning".to_string(),
            x_label: None,
            y_label: Some("Protein counts".to_string()),
            bars: vec![
                Bar { label: "raw".to_string(), value: 100.0, text: "100.0k".to_string() },
                Bar { label: "final".to_string(), value: 75.0, text: "75.0k".to_string() },
            ],
            rotate_labels: true,
        })
    }

    #[test]
    fn test_render_is_one_svg_document() {
        let svg = render(&bar_chart()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<svg").count(), 1);
    }

    #[test]
    fn test_bar_render_contains_labels() {
        let svg = render(&bar_chart()).unwrap();
        assert!(svg.contains("100.0k"));
        assert!(svg.contains("75.0k"));
        assert!(svg.contains("raw"));
        assert!(svg.contains("Protein counts"));
    }

    #[test]
    fn test_repeated_renders_are_identical() {
        let chart = bar_chart();
        assert_eq!(render(&chart).unwrap(), render(&chart).unwrap());
    }

    #[test]
    fn test_pie_render_full_and_empty() {
        let full = Chart::Pie(PieChart {
            title: "Multiple locations".to_string(),
            slices: vec![
                Slice { label: "Multiple Locations".to_string(), value: 0, percent: 0.0, text: "0.0%".to_string() },
                Slice { label: "Single Location".to_string(), value: 4, percent: 100.0, text: "100.0%".to_string() },
            ],
            start_angle: 90.0,
        });
        let svg = render(&full).unwrap();
        assert!(svg.contains("<circle"));
        assert!(svg.contains("100.0%"));

        let empty = Chart::Pie(PieChart {
            title: "Multiple locations".to_string(),
            slices: vec![],
            start_angle: 90.0,
        });
        assert!(render(&empty).unwrap().contains("<circle"));
    }

    #[test]
    fn test_pie_wedge_runs_counter_clockwise() {
        let points = wedge((100, 100), 50.0, 90.0, 90.0);
        assert_eq!(points[0], (100, 100));
        // starts at 12 o'clock and ends at 9 o'clock
        assert_eq!(points[1], (100, 50));
        assert_eq!(*points.last().unwrap(), (50, 100));
    }

    #[test]
    fn test_box_render_draws_fliers() {
        let mut values: Vec<f64> = (1..=9).map(|v| v as f64 / 100.0).collect();
        values.push(0.9);
        let chart = Chart::Box(BoxPlot {
            title: "Amino acid composition".to_string(),
            y_label: "Amino acid percent".to_string(),
            boxes: vec![
                BoxSeries { column: "A_pct".to_string(), tick: "A".to_string(), stats: box_stats(values) },
                BoxSeries { column: "C_pct".to_string(), tick: "C".to_string(), stats: None },
            ],
            flier_radius: 1.0,
        });
        let svg = render(&chart).unwrap();
        assert!(svg.contains("<circle"));
        assert!(svg.contains("Amino acid percent"));
    }

    #[test]
    fn test_histogram_render_log_and_legend() {
        let binned = histogram(&[10.0, 100.0, 1000.0], AxisScale::Log, true);
        let chart = Chart::Histogram(Histogram {
            title: "h".to_string(),
            x_label: "Mass".to_string(),
            y_label: "Density".to_string(),
            scale: AxisScale::Log,
            series: vec![HistogramSeries {
                label: "Nucleus".to_string(),
                bins: binned.bins,
                sample_count: binned.sample_count,
                dropped_nonpositive: 0,
                alpha: 0.5,
            }],
            legend: true,
        });
        let svg = render(&chart).unwrap();
        assert!(svg.contains("Nucleus"));
        assert!(svg.contains("Density"));
        assert!(svg.contains("<rect"));
    }

    #[test]
    fn test_histogram_render_without_data() {
        let chart = Chart::Histogram(Histogram {
            title: "empty".to_string(),
            x_label: "Mass".to_string(),
            y_label: "Mass".to_string(),
            scale: AxisScale::Log,
            series: vec![],
            legend: false,
        });
        let svg = render(&chart).unwrap();
        assert!(svg.contains("No data"));
        assert!(!svg.contains("NaN"));
    }
}
