// VecDocs — schema.rs
// Field and collection schemas, index parameters, descriptions.
// Author: d65v <https://github.com/d65v>

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::embedding::MetricType;
use crate::{Result, VecDocsError};

/// Partition count used for partition-key collections when the schema
/// does not set one.
pub const DEFAULT_NUM_PARTITIONS: usize = 16;

/// Upper bound on `num_partitions`.
pub const MAX_NUM_PARTITIONS: usize = 1024;

/// Name of the partition every collection starts with.
pub const DEFAULT_PARTITION: &str = "_default";

/// Column name under which dynamic fields are reported.
pub const DYNAMIC_FIELD: &str = "$meta";

// ── Data Types ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    VarChar,
    Json,
    Array,
    FloatVector,
}

impl DataType {
    pub fn is_vector(&self) -> bool {
        matches!(self, DataType::FloatVector)
    }

    /// Inclusive value range of an integer type.
    pub fn int_range(&self) -> Option<(i64, i64)> {
        match self {
            DataType::Int8 => Some((i8::MIN as i64, i8::MAX as i64)),
            DataType::Int16 => Some((i16::MIN as i64, i16::MAX as i64)),
            DataType::Int32 => Some((i32::MIN as i64, i32::MAX as i64)),
            DataType::Int64 => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ── Field Schema ──────────────────────────────────────────────────────────────

/// One field of a collection schema, built fluently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub data_type: DataType,
    pub description: String,
    pub is_primary_key: bool,
    pub auto_id: bool,
    pub is_partition_key: bool,
    /// Vector dimensionality
    pub dim: Option<usize>,
    /// VarChar length limit, in bytes
    pub max_length: Option<usize>,
    /// Element type of an Array field
    pub element_type: Option<DataType>,
    /// Element limit of an Array field
    pub max_capacity: Option<usize>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            description: String::new(),
            is_primary_key: false,
            auto_id: false,
            is_partition_key: false,
            dim: None,
            max_length: None,
            element_type: None,
            max_capacity: None,
        }
    }

    pub fn with_primary_key(mut self, primary: bool) -> Self {
        self.is_primary_key = primary;
        self
    }

    pub fn with_auto_id(mut self, auto_id: bool) -> Self {
        self.auto_id = auto_id;
        self
    }

    pub fn with_partition_key(mut self, partition_key: bool) -> Self {
        self.is_partition_key = partition_key;
        self
    }

    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = Some(dim);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_element_type(mut self, element_type: DataType) -> Self {
        self.element_type = Some(element_type);
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = Some(max_capacity);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn validate(&self) -> Result<()> {
        let bad = |msg: &str| Err(VecDocsError::InvalidSchema(format!("field '{}': {}", self.name, msg)));

        if self.name.is_empty() {
            return Err(VecDocsError::InvalidSchema("field name must not be empty".into()));
        }
        if self.name == DYNAMIC_FIELD {
            return bad("name is reserved for dynamic fields");
        }

        match self.data_type {
            DataType::FloatVector => {
                if self.dim.unwrap_or(0) == 0 {
                    return bad("vector fields need a positive dim");
                }
            }
            DataType::VarChar => {
                if self.max_length.unwrap_or(0) == 0 {
                    return bad("VarChar fields need a positive max_length");
                }
            }
            DataType::Array => match self.element_type {
                None => return bad("Array fields need an element type"),
                Some(DataType::Array) | Some(DataType::Json) | Some(DataType::FloatVector) => {
                    return bad("unsupported Array element type");
                }
                Some(DataType::VarChar) if self.max_length.unwrap_or(0) == 0 => {
                    return bad("VarChar arrays need a positive max_length");
                }
                Some(_) if self.max_capacity.unwrap_or(0) == 0 => {
                    return bad("Array fields need a positive max_capacity");
                }
                Some(_) => {}
            },
            _ => {}
        }

        if self.is_primary_key && !matches!(self.data_type, DataType::Int64 | DataType::VarChar) {
            return bad("primary key must be Int64 or VarChar");
        }
        if self.auto_id && !self.is_primary_key {
            return bad("auto_id only applies to the primary key");
        }
        if self.is_partition_key {
            if self.is_primary_key {
                return bad("the primary key cannot be the partition key");
            }
            if !matches!(self.data_type, DataType::Int64 | DataType::VarChar) {
                return bad("partition key must be Int64 or VarChar");
            }
        }
        Ok(())
    }
}

// ── Collection Schema ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub name: String,
    pub description: String,
    /// Collection-level auto id, applied to the primary key
    pub auto_id: bool,
    pub fields: Vec<FieldSchema>,
    pub enable_dynamic_field: bool,
    /// Partition count for partition-key collections
    pub num_partitions: Option<usize>,
}

impl CollectionSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            auto_id: false,
            fields: Vec::new(),
            enable_dynamic_field: false,
            num_partitions: None,
        }
    }

    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_auto_id(mut self, auto_id: bool) -> Self {
        self.auto_id = auto_id;
        self
    }

    pub fn with_dynamic_field(mut self, enabled: bool) -> Self {
        self.enable_dynamic_field = enabled;
        self
    }

    pub fn with_num_partitions(mut self, n: usize) -> Self {
        self.num_partitions = Some(n);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn primary_field(&self) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.is_primary_key)
    }

    pub fn vector_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|f| f.data_type.is_vector())
    }

    pub fn partition_key_field(&self) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.is_partition_key)
    }

    /// Whether the primary key is generated by the database.
    pub fn is_auto_id(&self) -> bool {
        self.auto_id || self.primary_field().map_or(false, |f| f.auto_id)
    }

    /// Check the schema's structural rules.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(VecDocsError::InvalidSchema("collection name must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            field.validate()?;
            if !seen.insert(field.name.as_str()) {
                return Err(VecDocsError::InvalidSchema(format!(
                    "duplicate field name '{}'",
                    field.name
                )));
            }
        }

        let primaries = self.fields.iter().filter(|f| f.is_primary_key).count();
        if primaries != 1 {
            return Err(VecDocsError::InvalidSchema(format!(
                "expected exactly one primary key, found {}",
                primaries
            )));
        }

        if self.vector_fields().next().is_none() {
            return Err(VecDocsError::InvalidSchema("schema has no vector field".into()));
        }

        if self.fields.iter().filter(|f| f.is_partition_key).count() > 1 {
            return Err(VecDocsError::InvalidSchema("at most one partition key is allowed".into()));
        }

        match self.num_partitions {
            Some(0) => {
                return Err(VecDocsError::InvalidSchema("num_partitions must be positive".into()))
            }
            Some(n) if n > MAX_NUM_PARTITIONS => {
                return Err(VecDocsError::InvalidSchema(format!(
                    "num_partitions {} exceeds the limit of {}",
                    n, MAX_NUM_PARTITIONS
                )))
            }
            _ => {}
        }

        Ok(())
    }
}

// ── Index Parameters ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexType {
    AutoIndex,
    Flat,
    IvfFlat,
    IvfSq8,
    IvfPq,
    Hnsw,
    /// Scalar index on any non-vector field
    Inverted,
    /// Scalar index on numeric and VarChar fields
    StlSort,
}

impl IndexType {
    /// Whether this index type can be built on a vector field.
    pub fn is_vector_index(&self) -> bool {
        !matches!(self, IndexType::Inverted | IndexType::StlSort)
    }

    /// Whether this index type can be built on a scalar field.
    pub fn is_scalar_index(&self) -> bool {
        matches!(self, IndexType::AutoIndex | IndexType::Inverted | IndexType::StlSort)
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IndexType::AutoIndex => "AUTOINDEX",
            IndexType::Flat => "FLAT",
            IndexType::IvfFlat => "IVF_FLAT",
            IndexType::IvfSq8 => "IVF_SQ8",
            IndexType::IvfPq => "IVF_PQ",
            IndexType::Hnsw => "HNSW",
            IndexType::Inverted => "INVERTED",
            IndexType::StlSort => "STL_SORT",
        };
        f.write_str(s)
    }
}

/// How to index one field. Vector indexes carry a metric, scalar
/// indexes do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexParams {
    /// Defaults to the field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    pub index_type: IndexType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_type: Option<MetricType>,
    /// Build parameters such as `nlist` or `M`
    pub params: BTreeMap<String, Value>,
}

impl IndexParams {
    pub fn new(index_type: IndexType, metric_type: MetricType) -> Self {
        Self {
            index_name: None,
            index_type,
            metric_type: Some(metric_type),
            params: BTreeMap::new(),
        }
    }

    pub fn auto_index(metric_type: MetricType) -> Self {
        Self::new(IndexType::AutoIndex, metric_type)
    }

    /// An index on a scalar field.
    pub fn scalar(index_type: IndexType) -> Self {
        Self {
            index_name: None,
            index_type,
            metric_type: None,
            params: BTreeMap::new(),
        }
    }

    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Index type as reported, e.g. `AUTOINDEX`.
    pub fn type_name(&self) -> String {
        self.index_type.to_string()
    }

    /// Check these parameters against the field they index.
    pub fn validate_for(&self, field: &FieldSchema) -> Result<()> {
        let vector = field.data_type.is_vector();
        if vector && !self.index_type.is_vector_index() {
            return Err(VecDocsError::InvalidParameter(format!(
                "{} cannot index vector field '{}'",
                self.index_type, field.name
            )));
        }
        if !vector && !self.index_type.is_scalar_index() {
            return Err(VecDocsError::InvalidParameter(format!(
                "{} cannot index scalar field '{}'",
                self.index_type, field.name
            )));
        }
        match (vector, self.metric_type) {
            (true, None) => Err(VecDocsError::InvalidParameter(format!(
                "an index on vector field '{}' needs a metric type",
                field.name
            ))),
            (false, Some(m)) => Err(VecDocsError::InvalidParameter(format!(
                "scalar field '{}' takes no metric type, got {}",
                field.name, m
            ))),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexDescription {
    pub field_name: String,
    pub index_name: String,
    pub index_type: IndexType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_type: Option<MetricType>,
    pub params: BTreeMap<String, Value>,
}

// ── Descriptions ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadState {
    NotExist,
    NotLoad,
    Loaded,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionDescription {
    pub name: String,
    pub schema: CollectionSchema,
    pub shards_num: i32,
    pub aliases: Vec<String>,
    pub partitions: Vec<String>,
    pub load_state: LoadState,
    pub row_count: usize,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
