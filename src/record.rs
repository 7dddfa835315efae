//! Row records as delivered by the spreadsheet loader.
//!
//! A [`Record`] is a loose column-name → value mapping. All tolerance for
//! absent keys, NaN markers and mixed cell types lives here, so the rest of
//! the crate only ever sees display strings.

use std::collections::HashMap;

static MISSING: CellValue = CellValue::Missing;

/// One raw cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Missing,
}

impl CellValue {
    /// True for missing cells, NaN, and strings that trim to "" or "nan".
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Float(f) => f.is_nan(),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
            }
            CellValue::Int(_) | CellValue::Bool(_) => false,
        }
    }

    /// Trimmed display form. Empty values become the empty string.
    pub fn to_display(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        match self {
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => format_float(*f),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Missing => String::new(),
        }
    }

    /// Numeric reading of the cell, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) if f.is_finite() => Some(*f),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }
}

/// Spreadsheets hand integers back as floats; print those without a
/// trailing ".0" so codes and prices look the way they were typed.
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{:.0}", f)
    } else {
        f.to_string()
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// One input row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, CellValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Value for `column`, or [`CellValue::Missing`] when the column is absent.
    pub fn get(&self, column: &str) -> &CellValue {
        self.fields.get(column).unwrap_or(&MISSING)
    }

    /// Trimmed display string for `column`.
    pub fn text(&self, column: &str) -> String {
        self.get(column).to_display()
    }

    pub fn is_blank(&self, column: &str) -> bool {
        self.get(column).is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}
