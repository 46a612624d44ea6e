// VecDocs — data.rs
// Rows, primary keys, typed result columns and operation results.
// Author: d65v <https://github.com/d65v>

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Result, VecDocsError};

/// One entity as a JSON object keyed by field name.
pub type Row = Map<String, Value>;

/// Field-major query output.
pub type ResultSet = Vec<Column>;

/// Serialize a typed row (any `#[derive(Serialize)]` struct) into a [`Row`].
pub fn to_row<T: Serialize>(value: &T) -> Result<Row> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(VecDocsError::Field(format!(
            "a row must serialize to a JSON object, got {}",
            other
        ))),
    }
}

// ── Primary Keys ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryKey {
    Int64(i64),
    VarChar(String),
}

impl PrimaryKey {
    pub fn to_value(&self) -> Value {
        match self {
            PrimaryKey::Int64(v) => Value::from(*v),
            PrimaryKey::VarChar(s) => Value::from(s.clone()),
        }
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimaryKey::Int64(v) => write!(f, "{}", v),
            PrimaryKey::VarChar(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for PrimaryKey {
    fn from(v: i64) -> Self {
        PrimaryKey::Int64(v)
    }
}

impl From<&str> for PrimaryKey {
    fn from(s: &str) -> Self {
        PrimaryKey::VarChar(s.to_string())
    }
}

impl From<String> for PrimaryKey {
    fn from(s: String) -> Self {
        PrimaryKey::VarChar(s)
    }
}

// ── Columns ───────────────────────────────────────────────────────────────────

/// Typed values of one result column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Bool(Vec<bool>),
    /// All integer widths are widened to 64 bits.
    Int64(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    VarChar(Vec<String>),
    Json(Vec<Value>),
    Array(Vec<Vec<Value>>),
    FloatVector { dim: usize, data: Vec<Vec<f32>> },
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Bool(v) => v.len(),
            ColumnData::Int64(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Double(v) => v.len(),
            ColumnData::VarChar(v) => v.len(),
            ColumnData::Json(v) => v.len(),
            ColumnData::Array(v) => v.len(),
            ColumnData::FloatVector { data, .. } => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the stored type, as reported in errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnData::Bool(_) => "Bool",
            ColumnData::Int64(_) => "Int64",
            ColumnData::Float(_) => "Float",
            ColumnData::Double(_) => "Double",
            ColumnData::VarChar(_) => "VarChar",
            ColumnData::Json(_) => "JSON",
            ColumnData::Array(_) => "Array",
            ColumnData::FloatVector { .. } => "FloatVector",
        }
    }
}

/// A named result column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
    /// Set for columns taken from the dynamic field.
    pub dynamic: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
            dynamic: false,
        }
    }

    pub fn dynamic(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Json(values),
            dynamic: true,
        }
    }

    pub fn int64(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self::new(name, ColumnData::Int64(values))
    }

    pub fn varchar(name: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(name, ColumnData::VarChar(values))
    }

    pub fn float_vector(name: impl Into<String>, dim: usize, data: Vec<Vec<f32>>) -> Self {
        Self::new(name, ColumnData::FloatVector { dim, data })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `i` as JSON. Float32 values go through their shortest
    /// decimal form so `0.1f32` stays `0.1`.
    pub fn get(&self, i: usize) -> Option<Value> {
        let v = match &self.data {
            ColumnData::Bool(v) => Value::from(*v.get(i)?),
            ColumnData::Int64(v) => Value::from(*v.get(i)?),
            ColumnData::Float(v) => f32_value(*v.get(i)?),
            ColumnData::Double(v) => Value::from(*v.get(i)?),
            ColumnData::VarChar(v) => Value::from(v.get(i)?.clone()),
            ColumnData::Json(v) => v.get(i)?.clone(),
            ColumnData::Array(v) => Value::Array(v.get(i)?.clone()),
            ColumnData::FloatVector { data, .. } => {
                Value::Array(data.get(i)?.iter().map(|x| f32_value(*x)).collect())
            }
        };
        Some(v)
    }
}

/// JSON number for an `f32` that keeps the float's shortest representation.
pub fn f32_value(x: f32) -> Value {
    x.to_string()
        .parse::<f64>()
        .map(Value::from)
        .unwrap_or(Value::Null)
}

/// Convert column-oriented input into rows. All columns must have the
/// same length.
pub fn columns_to_rows(columns: &[Column]) -> Result<Vec<Row>> {
    let n = columns.first().map_or(0, Column::len);
    if let Some(c) = columns.iter().find(|c| c.len() != n) {
        return Err(VecDocsError::Field(format!(
            "{} column '{}' has {} values, expected {}",
            c.data.type_name(),
            c.name,
            c.len(),
            n
        )));
    }

    let mut rows = vec![Row::new(); n];
    for column in columns {
        for (i, row) in rows.iter_mut().enumerate() {
            let value = column.get(i).unwrap_or(Value::Null);
            if column.dynamic {
                match value {
                    Value::Object(map) if column.name == crate::schema::DYNAMIC_FIELD => {
                        row.extend(map);
                    }
                    v => {
                        row.insert(column.name.clone(), v);
                    }
                }
            } else {
                row.insert(column.name.clone(), value);
            }
        }
    }
    Ok(rows)
}

// ── Operation Results ─────────────────────────────────────────────────────────

/// Hits for one query vector.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub result_count: usize,
    pub ids: Vec<PrimaryKey>,
    pub scores: Vec<f32>,
    pub fields: Vec<Column>,
}

/// Outcome of insert / upsert / delete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationResult {
    pub insert_count: usize,
    pub upsert_count: usize,
    pub delete_count: usize,
    pub ids: Vec<PrimaryKey>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
