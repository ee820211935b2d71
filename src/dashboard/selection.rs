//! User selections
//!
//! Raw query parameters are validated once, against the configuration, into a
//! [`Selection`]. A selection can only hold options that exist: unknown
//! values fall back to the first option and leave a [`Notice`] for the
//! section that owns the selector.

use super::SectionId;
use crate::charts::AxisScale;
use crate::config::Config;
use serde::{Deserialize, Serialize};

/// One selector on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Param {
    MassScale,
    Location,
    Metric,
    LocScale,
}

impl Param {
    pub const ALL: [Param; 4] = [Param::MassScale, Param::Location, Param::Metric, Param::LocScale];

    /// Query-string key
    pub fn key(&self) -> &'static str {
        match self {
            Param::MassScale => "mass_scale",
            Param::Location => "location",
            Param::Metric => "metric",
            Param::LocScale => "loc_scale",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Param::MassScale | Param::LocScale => "X axis scale",
            Param::Location => "Location",
            Param::Metric => "Metric",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    /// The section whose chart reads this parameter
    pub fn section(&self) -> SectionId {
        match self {
            Param::MassScale => SectionId::Mass,
            Param::Location | Param::Metric | Param::LocScale => SectionId::LocationExplorer,
        }
    }
}

/// Query parameters as sent by the page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass_scale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc_scale: Option<String>,
}

/// A rejected selector value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub param: Param,
    pub message: String,
}

/// "Parameter changed" event from a selector
#[derive(Debug, Clone, PartialEq)]
pub struct ParamChange {
    pub param: Param,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub mass_scale: AxisScale,
    location: usize,
    metric: usize,
    pub loc_scale: AxisScale,
    notices: Vec<Notice>,
}

impl Default for Selection {
    /// First option of every selector
    fn default() -> Self {
        Self {
            mass_scale: AxisScale::default(),
            location: 0,
            metric: 0,
            loc_scale: AxisScale::default(),
            notices: Vec::new(),
        }
    }
}

impl Selection {
    pub fn from_params(params: &SelectionParams, config: &Config) -> Self {
        let mut selection = Self::default();
        let raw = [
            (Param::MassScale, &params.mass_scale),
            (Param::Location, &params.location),
            (Param::Metric, &params.metric),
            (Param::LocScale, &params.loc_scale),
        ];
        for (param, value) in raw {
            if let Some(value) = value {
                selection.set(param, value, config);
            }
        }
        selection
    }

    /// Parse a URL query string. A repeated key keeps its last value and
    /// unknown keys are ignored; only an undecodable query yields the defaults.
    pub fn from_query(query: &str, config: &Config) -> Self {
        let pairs = match serde_urlencoded::from_str::<Vec<(String, String)>>(query) {
            Ok(pairs) => pairs,
            Err(e) => {
                log::debug!("ignoring malformed query {:?}: {}", query, e);
                return Self::default();
            }
        };
        let mut params = SelectionParams::default();
        for (key, value) in pairs {
            let slot = match Param::from_key(&key) {
                Some(Param::MassScale) => &mut params.mass_scale,
                Some(Param::Location) => &mut params.location,
                Some(Param::Metric) => &mut params.metric,
                Some(Param::LocScale) => &mut params.loc_scale,
                None => {
                    log::debug!("ignoring query key {:?}", key);
                    continue;
                }
            };
            *slot = Some(value);
        }
        Self::from_params(&params, config)
    }

    pub fn location<'c>(&self, config: &'c Config) -> &'c str {
        &config.locations[self.location]
    }

    pub fn metric<'c>(&self, config: &'c Config) -> &'c str {
        &config.metrics[self.metric]
    }

    /// Current value of `param`, as shown in its selector.
    pub fn value(&self, param: Param, config: &Config) -> String {
        match param {
            Param::MassScale => self.mass_scale.to_string(),
            Param::Location => self.location(config).to_string(),
            Param::Metric => self.metric(config).to_string(),
            Param::LocScale => self.loc_scale.to_string(),
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn notices_for(&self, section: SectionId) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(move |n| n.param.section() == section)
    }

    /// Apply a selector change and report which sections must re-render.
    pub fn apply(&mut self, change: &ParamChange, config: &Config) -> Vec<SectionId> {
        self.notices.retain(|n| n.param != change.param);
        self.set(change.param, &change.value, config);
        vec![change.param.section()]
    }

    pub fn to_params(&self, config: &Config) -> SelectionParams {
        SelectionParams {
            mass_scale: Some(self.mass_scale.to_string()),
            location: Some(self.location(config).to_string()),
            metric: Some(self.metric(config).to_string()),
            loc_scale: Some(self.loc_scale.to_string()),
        }
    }

    pub fn to_query(&self, config: &Config) -> String {
        serde_urlencoded::to_string(self.to_params(config)).unwrap_or_default()
    }

    fn set(&mut self, param: Param, value: &str, config: &Config) {
        let accepted = match param {
            Param::MassScale => value.parse().map(|s| self.mass_scale = s).is_ok(),
            Param::LocScale => value.parse().map(|s| self.loc_scale = s).is_ok(),
            Param::Location => position(&config.locations, value).map(|i| self.location = i).is_some(),
            Param::Metric => position(&config.metrics, value).map(|i| self.metric = i).is_some(),
        };
        if !accepted {
            let fallback = match param {
                Param::MassScale => {
                    self.mass_scale = AxisScale::default();
                    self.mass_scale.to_string()
                }
                Param::LocScale => {
                    self.loc_scale = AxisScale::default();
                    self.loc_scale.to_string()
                }
                Param::Location => {
                    self.location = 0;
                    config.locations[0].clone()
                }
                Param::Metric => {
                    self.metric = 0;
                    config.metrics[0].clone()
                }
            };
            log::warn!("unknown {} {:?}, using {:?}", param.key(), value, fallback);
            self.notices.push(Notice {
                param,
                message: format!(
                    "Unknown {} '{}'; showing '{}' instead.",
                    param.label().to_lowercase(),
                    value,
                    fallback
                ),
            });
        }
    }
}

/// Options offered by a selector, in display order.
pub fn options(param: Param, config: &Config) -> Vec<String> {
    match param {
        Param::MassScale | Param::LocScale => AxisScale::ALL.iter().map(|s| s.to_string()).collect(),
        Param::Location => config.locations.clone(),
        Param::Metric => config.metrics.clone(),
    }
}

fn position(list: &[String], value: &str) -> Option<usize> {
    list.iter().position(|v| v == value)
}
