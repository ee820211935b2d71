//! Dashboard page assembly
//!
//! The page is a fixed sequence of sections. Each section has a heading,
//! optional explanatory text, zero or more selectors and one piece of
//! content (a chart or a table). A full render walks every section; a
//! selector change re-renders only the section that reads it (see
//! [`Selection::apply`]).
//!
//! A chart that fails to build becomes an inline error in its own section.
//! The rest of the page still renders.

pub mod selection;

pub use selection::{options, Notice, Param, ParamChange, Selection, SelectionParams};

use crate::charts::{self, Chart};
use crate::data::{Dataset, Preview};
use crate::error::{DashboardError, Result};
use log::warn;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const PAGE_TITLE: &str = "Prot-loc-pred";
pub const PAGE_ICON: &str = "🔬";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionId {
    Intro,
    ExampleData,
    DataCleaning,
    LocationCounts,
    MultipleLocations,
    AminoAcids,
    Mass,
    LocationExplorer,
    ModelPerformance,
}

impl SectionId {
    pub const ALL: [SectionId; 9] = [
        SectionId::Intro,
        SectionId::ExampleData,
        SectionId::DataCleaning,
        SectionId::LocationCounts,
        SectionId::MultipleLocations,
        SectionId::AminoAcids,
        SectionId::Mass,
        SectionId::LocationExplorer,
        SectionId::ModelPerformance,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            SectionId::Intro => "intro",
            SectionId::ExampleData => "example-data",
            SectionId::DataCleaning => "data-cleaning",
            SectionId::LocationCounts => "location-counts",
            SectionId::MultipleLocations => "multiple-locations",
            SectionId::AminoAcids => "amino-acids",
            SectionId::Mass => "mass",
            SectionId::LocationExplorer => "location-explorer",
            SectionId::ModelPerformance => "model-performance",
        }
    }

    /// Selectors shown in this section
    pub fn params(&self) -> &'static [Param] {
        match self {
            SectionId::Mass => &[Param::MassScale],
            SectionId::LocationExplorer => &[Param::Location, Param::Metric, Param::LocScale],
            _ => &[],
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for SectionId {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.slug() == s)
            .ok_or_else(|| DashboardError::UnknownSection(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingLevel {
    Title,
    Header,
    Subheader,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectorView {
    pub param: Param,
    pub key: &'static str,
    pub label: &'static str,
    pub options: Vec<String>,
    pub selected: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Content {
    None,
    Table(Preview),
    Chart(Chart),
    Error(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub id: SectionId,
    /// Page-level header opening a new group of sections
    pub group: Option<&'static str>,
    pub heading: String,
    pub level: HeadingLevel,
    pub text: Option<String>,
    pub selectors: Vec<SelectorView>,
    pub content: Content,
    pub caption: Option<String>,
    pub notices: Vec<String>,
}

impl Section {
    fn new(id: SectionId, heading: impl Into<String>, level: HeadingLevel) -> Self {
        Self {
            id,
            group: None,
            heading: heading.into(),
            level,
            text: None,
            selectors: Vec::new(),
            content: Content::None,
            caption: None,
            notices: Vec::new(),
        }
    }

    fn group(mut self, header: &'static str) -> Self {
        self.group = Some(header);
        self
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    fn content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    pub fn chart(&self) -> Option<&Chart> {
        match &self.content {
            Content::Chart(c) => Some(c),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub title: &'static str,
    pub icon: &'static str,
    /// Query string reproducing the current selections
    pub query: String,
    pub generated: String,
    pub sections: Vec<Section>,
}

pub struct Dashboard<'a> {
    dataset: &'a Dataset,
}

impl<'a> Dashboard<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        self.dataset
    }

    pub fn render_page(&self, selection: &Selection) -> Page {
        Page {
            title: PAGE_TITLE,
            icon: PAGE_ICON,
            query: selection.to_query(self.dataset.config()),
            generated: chrono::Local::now().to_rfc3339(),
            sections: SectionId::ALL
                .iter()
                .map(|&id| self.render_section(id, selection))
                .collect(),
        }
    }

    pub fn render_section(&self, id: SectionId, selection: &Selection) -> Section {
        let config = self.dataset.config();
        let mut section = match id {
            SectionId::Intro => Section::new(id, format!("{} Protein Location Predictor", PAGE_ICON), HeadingLevel::Title)
                .text("Here we plot charts related to the initial data gathering and statistics for the proteins in our dataset."),
            SectionId::ExampleData => Section::new(id, "Some example data", HeadingLevel::Subheader)
                .content(Content::Table(self.dataset.table().head(config.preview_rows))),
            SectionId::DataCleaning => Section::new(id, "Data cleaning", HeadingLevel::Subheader)
                .content(Content::Chart(charts::cleaning_stats_chart(self.dataset.cleaning_stats())))
                .caption("We created this dataset by joining Uniref cluster data with sequence and location data for the representative protein of each cluster from uniprot."),
            SectionId::LocationCounts => Section::new(id, "Location counts", HeadingLevel::Subheader)
                .content(self.chart(id, || charts::location_counts_chart(self.dataset))),
            SectionId::MultipleLocations => Section::new(id, "Multiple locations", HeadingLevel::Subheader)
                .content(self.chart(id, || charts::multi_location_pie(self.dataset)))
                .caption("Fig X: Pie chart showing the proportion of proteins with a single location vs multiple locations to predict."),
            SectionId::AminoAcids => Section::new(id, "Amino acid composition", HeadingLevel::Subheader)
                .group("Features")
                .content(self.chart(id, || charts::amino_acid_boxplot(self.dataset)))
                .caption("Fig X: The distribution of amino acid composition across proteins. We can see that some amino acids are more common than others."),
            SectionId::Mass => Section::new(id, "Protein mass distribution", HeadingLevel::Subheader)
                .content(self.chart(id, || charts::mass_histogram(self.dataset, selection.mass_scale)))
                .caption("Fig X: A histogram of the mass of each protein in the dataset. Use the selector to swap between log and linear x axis."),
            SectionId::LocationExplorer => {
                let location = selection.location(config);
                let metric = selection.metric(config);
                Section::new(id, format!("{} vs all proteins distribution for {}", location, metric), HeadingLevel::Subheader)
                    .group("Explore location specific data")
                    .content(self.chart(id, || {
                        charts::location_vs_all_histogram(self.dataset, location, metric, selection.loc_scale)
                    }))
                    .caption(format!(
                        "Fig X: The distribution of {} for proteins found in the {} compared with all proteins.",
                        metric, location
                    ))
            }
            SectionId::ModelPerformance => Section::new(id, "Model performance", HeadingLevel::Header)
                .text("Here we can see the performance of each model as well as a deep dive into the performance of the best model (the neural network approach), broken down by some factors."),
        };

        section.selectors = id
            .params()
            .iter()
            .map(|&param| SelectorView {
                param,
                key: param.key(),
                label: param.label(),
                options: options(param, config),
                selected: selection.value(param, config),
            })
            .collect();
        section.notices = selection.notices_for(id).map(|n| n.message.clone()).collect();
        section
    }

    /// Build one chart, turning a failure into inline error content.
    fn chart<F>(&self, id: SectionId, build: F) -> Content
    where
        F: FnOnce() -> Result<Chart>,
    {
        match build() {
            Ok(chart) => Content::Chart(chart),
            Err(e) => {
                warn!("section {} failed: {}", id, e);
                Content::Error(e.to_string())
            }
        }
    }
}
