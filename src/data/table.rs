//! Protein scoring table
//!
//! The table is stored column-major: the charts always scan one or two
//! columns at a time, never whole rows. The first column of the file is the
//! protein identifier and becomes the row index.

use crate::error::{DashboardError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Tokens read as a missing cell
const MISSING_TOKENS: &[&str] = &["", "nan", "na", "n/a", "null", "none", "<na>"];

/// One parsed cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        let lower = s.to_ascii_lowercase();
        if MISSING_TOKENS.contains(&lower.as_str()) {
            return Value::Missing;
        }
        match lower.as_str() {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }
        match s.parse::<f64>() {
            Ok(n) if n.is_nan() => Value::Missing,
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(s.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Membership test for location flag columns. 1/0 encodings count too.
    pub fn is_true(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            _ => false,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => write!(f, "NaN"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => {
                let s = format!("{:.4}", n);
                write!(f, "{}", s.trim_end_matches('0'))
            }
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// First rows of the table, for the example data section
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub index_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<PreviewRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewRow {
    pub id: String,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct ProteinTable {
    path: PathBuf,
    index_name: String,
    ids: Vec<String>,
    columns: Vec<String>,
    lookup: HashMap<String, usize>,
    data: Vec<Vec<Value>>,
}

impl ProteinTable {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| DashboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, path)
    }

    /// Parse tab-separated text. `path` is only used in error messages.
    pub fn from_reader<R: Read>(reader: R, path: &Path) -> Result<Self> {
        let csv_err = |source| DashboardError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let malformed = |message: String| DashboardError::MalformedTable {
            path: path.to_path_buf(),
            message,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_reader(reader);

        let headers = reader.headers().map_err(csv_err)?.clone();
        if headers.len() < 2 {
            return Err(malformed(format!(
                "expected an index column plus data columns, found {} column(s)",
                headers.len()
            )));
        }

        let index_name = headers[0].trim().to_string();
        let columns: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();
        let mut lookup = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if name.is_empty() {
                return Err(malformed(format!("column {} has an empty name", i + 2)));
            }
            if lookup.insert(name.clone(), i).is_some() {
                return Err(malformed(format!("duplicate column '{}'", name)));
            }
        }

        let mut ids = Vec::new();
        let mut seen = HashMap::new();
        let mut data: Vec<Vec<Value>> = vec![Vec::new(); columns.len()];
        for (row_idx, record) in reader.records().enumerate() {
            let record = record.map_err(csv_err)?;
            let id = record[0].trim().to_string();
            if id.is_empty() {
                return Err(malformed(format!("row {} has an empty identifier", row_idx + 1)));
            }
            if let Some(prev) = seen.insert(id.clone(), row_idx) {
                return Err(malformed(format!(
                    "identifier '{}' appears in rows {} and {}",
                    id,
                    prev + 1,
                    row_idx + 1
                )));
            }
            ids.push(id);
            for (col, raw) in data.iter_mut().zip(record.iter().skip(1)) {
                col.push(Value::parse(raw));
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            index_name,
            ids,
            columns,
            lookup,
            data,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    /// Fail with `MissingColumn` on the first absent name.
    pub fn require_columns<'a, I>(&self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in names {
            if !self.has_column(name) {
                return Err(DashboardError::MissingColumn {
                    path: self.path.clone(),
                    column: name.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn column(&self, name: &str) -> Result<&[Value]> {
        self.lookup
            .get(name)
            .map(|&i| self.data[i].as_slice())
            .ok_or_else(|| DashboardError::UnknownColumn(name.to_string()))
    }

    /// Numeric view of a column; non-numeric cells read as `None`.
    pub fn numeric(&self, name: &str) -> Result<impl Iterator<Item = Option<f64>> + '_> {
        Ok(self.column(name)?.iter().map(Value::as_f64))
    }

    /// Numeric values of a column with missing cells dropped.
    pub fn present_values(&self, name: &str) -> Result<Vec<f64>> {
        Ok(self.numeric(name)?.flatten().collect())
    }

    /// Location membership flags; a missing cell means "not a member".
    pub fn flags(&self, name: &str) -> Result<Vec<bool>> {
        Ok(self.column(name)?.iter().map(Value::is_true).collect())
    }

    pub fn head(&self, n: usize) -> Preview {
        let rows = self
            .ids
            .iter()
            .take(n)
            .enumerate()
            .map(|(row, id)| PreviewRow {
                id: id.clone(),
                values: self.data.iter().map(|col| col[row].clone()).collect(),
            })
            .collect();
        Preview {
            index_name: self.index_name.clone(),
            columns: self.columns.clone(),
            rows,
        }
    }
}
