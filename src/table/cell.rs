use std::cmp::Ordering;

use chrono::NaiveDate;

/// Declared type of a column; the sort comparator is chosen from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Integer,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
    /// Computed for display from other fields; not matched by search.
    pub derived: bool,
}

impl Column {
    pub const fn new(key: &'static str, label: &'static str, kind: ColumnKind) -> Self {
        Self {
            key,
            label,
            kind,
            derived: false,
        }
    }

    pub const fn derived(key: &'static str, label: &'static str, kind: ColumnKind) -> Self {
        Self {
            derived: true,
            ..Self::new(key, label, kind)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Date(NaiveDate),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Text used for search and terminal output.
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(value) => value.clone(),
            CellValue::Number(value) => value.to_string(),
            CellValue::Integer(value) => value.to_string(),
            CellValue::Date(value) => value.format("%Y-%m-%d").to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Text written to exported files; dates use the US short form.
    pub fn export_text(&self) -> String {
        match self {
            CellValue::Date(value) => value.format("%-m/%-d/%Y").to_string(),
            other => other.display(),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            CellValue::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self {
        CellValue::Integer(value as i64)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Integer(i64::from(value))
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}

/// Ascending order of two non-empty cells under the column's declared kind.
/// Cells that do not match the declared kind fall back to text order.
pub fn compare_cells(kind: ColumnKind, a: &CellValue, b: &CellValue) -> Ordering {
    match (kind, a, b) {
        (ColumnKind::Number, _, _) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.display().cmp(&b.display()),
        },
        (ColumnKind::Integer, CellValue::Integer(x), CellValue::Integer(y)) => x.cmp(y),
        (ColumnKind::Date, CellValue::Date(x), CellValue::Date(y)) => x.cmp(y),
        (ColumnKind::Text, CellValue::Text(x), CellValue::Text(y)) => x.cmp(y),
        _ => a.display().cmp(&b.display()),
    }
}
