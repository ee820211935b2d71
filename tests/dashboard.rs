//! End-to-end tests: files on disk through the loader, dashboard and report.

use pretty_assertions::assert_eq;
use protloc::charts::Chart;
use protloc::dashboard::Content;
use protloc::{Config, DashboardError, DataLoader, Dashboard, Dataset, SectionId, Selection};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

// ==========================================================================
// FIXTURES
// ==========================================================================
//
// 500 Nucleus proteins with a mass, 20 Cytoplasm proteins, a handful of
// rows with gaps. Two of the Nucleus proteins are also in the Cytoplasm.
// ==========================================================================

fn write_table(dir: &Path) {
    let mut tsv = String::from("id\tMass\tlocations\tNucleus\tCytoplasm\tA_pct\tR_pct\tLength\n");
    for i in 0..500 {
        let multi = i < 2;
        writeln!(
            tsv,
            "N{}\t{}\t{}\tTrue\t{}\t0.0{}\t0.05\t{}",
            i,
            10_000 + i * 100,
            if multi { 2 } else { 1 },
            if multi { "True" } else { "False" },
            i % 9 + 1,
            100 + i,
        )
        .unwrap();
    }
    for i in 0..20 {
        writeln!(tsv, "C{}\t{}\t1\tFalse\tTrue\t0.07\t0.04\t{}", i, 30_000 + i * 10, 200 + i).unwrap();
    }
    // No mass: not counted for Nucleus, still in the pie
    tsv.push_str("X1\t\t1\tTrue\tFalse\t0.06\t0.05\t90\n");
    // No location count: not in the pie
    tsv.push_str("X2\t5000\tNaN\tFalse\tFalse\t0.06\t\t\n");
    fs::write(dir.join("model_scoring.tsv"), tsv).unwrap();
}

fn write_stats(dir: &Path) {
    fs::write(
        dir.join("data_cleaning_stats.json"),
        r#"{"raw": 100000, "deduplicated": 80000, "final": 75000}"#,
    )
    .unwrap();
}

fn config(dir: &Path) -> Config {
    Config {
        data_dir: dir.to_path_buf(),
        locations: vec!["Nucleus".to_string(), "Cytoplasm".to_string()],
        amino_acid_cols: vec!["A_pct".to_string(), "R_pct".to_string()],
        metrics: vec!["Mass".to_string(), "Length".to_string()],
        ..Config::default()
    }
}

fn load(dir: &Path) -> Dataset {
    let config = config(dir);
    let loader = DataLoader::new(&config);
    Dataset::load(config, &loader).unwrap()
}

fn fixture() -> (tempfile::TempDir, Dataset) {
    let dir = tempfile::tempdir().unwrap();
    write_table(dir.path());
    write_stats(dir.path());
    let dataset = load(dir.path());
    (dir, dataset)
}

fn bar_texts(chart: &Chart) -> Vec<(String, String)> {
    match chart {
        Chart::Bar(bar) => bar.bars.iter().map(|b| (b.label.clone(), b.text.clone())).collect(),
        other => panic!("expected a bar chart, got {}", other.title()),
    }
}

// ==========================================================================
// LOADING
// ==========================================================================

#[test]
fn test_loader_reads_each_file_once() {
    let dir = tempfile::tempdir().unwrap();
    write_table(dir.path());
    write_stats(dir.path());
    let config = config(dir.path());
    let loader = DataLoader::new(&config);

    let first = loader.get_full_data().unwrap();
    let second = loader.get_full_data().unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    loader.get_cleaning_stats().unwrap();
    loader.get_cleaning_stats().unwrap();
    assert_eq!(loader.load_count(), 2);

    // Files changing on disk are not re-read
    fs::write(dir.path().join("data_cleaning_stats.json"), "{}").unwrap();
    assert_eq!(loader.get_cleaning_stats().unwrap().len(), 3);
}

#[test]
fn test_missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_stats(dir.path());
    let config = config(dir.path());
    let loader = DataLoader::new(&config);

    let err = Dataset::load(config, &loader).unwrap_err();
    assert!(matches!(err, DashboardError::Io { .. }));
    assert!(err.to_string().contains("model_scoring.tsv"));
}

#[test]
fn test_missing_location_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_table(dir.path());
    write_stats(dir.path());
    let config = Config {
        locations: vec!["Nucleus".to_string(), "Vacuole".to_string()],
        ..config(dir.path())
    };
    let loader = DataLoader::new(&config);

    let err = Dataset::load(config, &loader).unwrap_err();
    assert!(matches!(err, DashboardError::MissingColumn { ref column, .. } if column == "Vacuole"));
}

// ==========================================================================
// CHARTS
// ==========================================================================

#[test]
fn test_cleaning_stats_bars_in_file_order() {
    let (_dir, dataset) = fixture();
    let section = Dashboard::new(&dataset).render_section(SectionId::DataCleaning, &Selection::default());
    let texts = bar_texts(section.chart().unwrap());
    assert_eq!(
        texts,
        vec![
            ("raw".to_string(), "100.0k".to_string()),
            ("deduplicated".to_string(), "80.0k".to_string()),
            ("final".to_string(), "75.0k".to_string()),
        ]
    );
}

#[test]
fn test_location_counts_need_a_mass() {
    let (_dir, dataset) = fixture();
    let section = Dashboard::new(&dataset).render_section(SectionId::LocationCounts, &Selection::default());
    let texts = bar_texts(section.chart().unwrap());
    assert_eq!(texts[0], ("Nucleus".to_string(), "0.5k".to_string()));
    assert_eq!(texts[1].0, "Cytoplasm");
}

#[test]
fn test_pie_partitions_counted_rows() {
    let (_dir, dataset) = fixture();
    let section = Dashboard::new(&dataset).render_section(SectionId::MultipleLocations, &Selection::default());
    match section.chart().unwrap() {
        Chart::Pie(pie) => {
            let total: usize = pie.slices.iter().map(|s| s.value).sum();
            // X2 has no location count
            assert_eq!(total, dataset.table().len() - 1);
            assert_eq!(pie.slices[0].value, 2);
            let percent: f64 = pie.slices.iter().map(|s| s.percent).sum();
            assert!((percent - 100.0).abs() < 1e-9);
        }
        other => panic!("expected a pie, got {}", other.title()),
    }
}

#[test]
fn test_location_density_integrates_to_one() {
    let (_dir, dataset) = fixture();
    let config = dataset.config().clone();
    let selection = Selection::from_query("location=Cytoplasm&metric=Length", &config);
    let section = Dashboard::new(&dataset).render_section(SectionId::LocationExplorer, &selection);

    match section.chart().unwrap() {
        Chart::Histogram(hist) => {
            assert_eq!(hist.series.len(), 2);
            assert!(hist.series[1].sample_count >= hist.series[0].sample_count);
            for series in &hist.series {
                let area: f64 = series.bins.iter().map(|b| b.height * (b.hi - b.lo)).sum();
                assert!((area - 1.0).abs() < 1e-6, "{} integrates to {}", series.label, area);
            }
        }
        other => panic!("expected a histogram, got {}", other.title()),
    }
}

// ==========================================================================
// PAGE OUTPUT
// ==========================================================================

#[test]
fn test_full_page_html() {
    let (dir, dataset) = fixture();
    let page = Dashboard::new(&dataset).render_page(&Selection::default());
    assert!(page.sections.iter().all(|s| !matches!(s.content, Content::Error(_))));

    let path = dir.path().join("out.html");
    protloc::report::generate(&path, &page).unwrap();
    let html = fs::read_to_string(&path).unwrap();

    let chart_sections = page.sections.iter().filter(|s| s.chart().is_some()).count();
    assert_eq!(chart_sections, 6);
    assert_eq!(html.matches("<svg").count(), chart_sections);
    assert!(html.contains("🔬 Protein Location Predictor"));
    assert!(html.contains("<table>"));
}

#[test]
fn test_selection_change_rerenders_one_section() {
    let (_dir, dataset) = fixture();
    let config = dataset.config().clone();
    let dashboard = Dashboard::new(&dataset);
    let mut selection = Selection::default();

    let change = protloc::ParamChange {
        param: protloc::dashboard::Param::MassScale,
        value: "Log".to_string(),
    };
    let affected = selection.apply(&change, &config);
    assert_eq!(affected, vec![SectionId::Mass]);

    let section = dashboard.render_section(affected[0], &selection);
    match section.chart().unwrap() {
        Chart::Histogram(hist) => assert_eq!(hist.scale, protloc::AxisScale::Log),
        other => panic!("expected a histogram, got {}", other.title()),
    }

    // The same selection gives the same section from a full render
    let page = dashboard.render_page(&selection);
    let from_page = page.sections.iter().find(|s| s.id == SectionId::Mass).unwrap();
    assert_eq!(from_page.chart(), section.chart());
}
