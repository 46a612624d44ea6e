// VecDocs — client.rs
// The database client interface every example program is written against,
// plus the search / query request builders.
// Author: d65v <https://github.com/d65v>

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::data::{to_row, MutationResult, PrimaryKey, ResultSet, Row, SearchResult};
use crate::embedding::MetricType;
use crate::iterator::{QueryIterator, SearchIterator};
use crate::rbac::{Grant, ObjectType, UserInfo};
use crate::schema::{CollectionDescription, CollectionSchema, IndexDescription, IndexParams, LoadState};
use crate::Result;

/// Largest `top_k` / `limit` a request may ask for.
pub const MAX_TOP_K: usize = 16_384;

// ── Requests ──────────────────────────────────────────────────────────────────

/// A vector search against one vector field.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub vectors: Vec<Vec<f32>>,
    pub anns_field: String,
    /// Must match the index metric when set
    pub metric_type: Option<MetricType>,
    pub top_k: usize,
    pub offset: usize,
    pub filter: String,
    pub output_fields: Vec<String>,
    pub partition_names: Vec<String>,
    /// Search parameters such as `radius`, `range_filter` or `nprobe`
    pub params: BTreeMap<String, Value>,
}

impl SearchRequest {
    pub fn new(anns_field: impl Into<String>, vectors: Vec<Vec<f32>>) -> Self {
        Self {
            vectors,
            anns_field: anns_field.into(),
            metric_type: None,
            top_k: 10,
            offset: 0,
            filter: String::new(),
            output_fields: Vec::new(),
            partition_names: Vec::new(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, metric: MetricType) -> Self {
        self.metric_type = Some(metric);
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_output_fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.output_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_partitions<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.partition_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Restrict hits to a distance window, see [`MetricType::within_range`].
    pub fn with_range(self, radius: f32, range_filter: f32) -> Self {
        self.with_param("radius", radius as f64)
            .with_param("range_filter", range_filter as f64)
    }

    pub(crate) fn param_f32(&self, key: &str) -> Result<Option<f32>> {
        match self.params.get(key) {
            None => Ok(None),
            Some(v) => v.as_f64().map(|f| Some(f as f32)).ok_or_else(|| {
                crate::VecDocsError::InvalidParameter(format!("'{}' must be a number", key))
            }),
        }
    }
}

/// A scalar query.
#[derive(Debug, Clone, Default)]
pub struct QueryRequest {
    pub filter: String,
    pub output_fields: Vec<String>,
    pub partition_names: Vec<String>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl QueryRequest {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            ..Default::default()
        }
    }

    pub fn with_output_fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.output_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_partitions<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.partition_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

// ── Client Interface ──────────────────────────────────────────────────────────

/// Operations a vector database client offers.
///
/// Collection arguments accept aliases wherever a collection name is
/// expected. `partition` arguments of `None` target the default partition
/// (or, for partition-key collections, the partition derived from the key).
pub trait VectorClient {
    // Collections

    fn create_collection(&mut self, schema: CollectionSchema, shards_num: i32) -> Result<()>;
    fn has_collection(&self, name: &str) -> Result<bool>;
    fn list_collections(&self) -> Result<Vec<String>>;
    fn describe_collection(&self, name: &str) -> Result<CollectionDescription>;
    fn drop_collection(&mut self, name: &str) -> Result<()>;
    fn rename_collection(&mut self, old_name: &str, new_name: &str) -> Result<()>;
    fn load_collection(&mut self, name: &str) -> Result<()>;
    fn release_collection(&mut self, name: &str) -> Result<()>;
    fn get_load_state(&self, name: &str, partition: Option<&str>) -> Result<LoadState>;
    /// Percentage, 0 to 100.
    fn get_loading_progress(&self, name: &str) -> Result<i64>;
    fn flush(&mut self, name: &str) -> Result<()>;
    /// Number of stored entities.
    fn get_collection_stats(&self, name: &str) -> Result<usize>;

    // Aliases

    fn create_alias(&mut self, collection: &str, alias: &str) -> Result<()>;
    fn alter_alias(&mut self, collection: &str, alias: &str) -> Result<()>;
    fn drop_alias(&mut self, alias: &str) -> Result<()>;
    /// Collection the alias points to.
    fn describe_alias(&self, alias: &str) -> Result<String>;
    fn list_aliases(&self, collection: &str) -> Result<Vec<String>>;

    // Partitions

    fn create_partition(&mut self, collection: &str, partition: &str) -> Result<()>;
    fn drop_partition(&mut self, collection: &str, partition: &str) -> Result<()>;
    fn has_partition(&self, collection: &str, partition: &str) -> Result<bool>;
    fn list_partitions(&self, collection: &str) -> Result<Vec<String>>;
    fn load_partitions(&mut self, collection: &str, partitions: &[&str]) -> Result<()>;
    fn release_partitions(&mut self, collection: &str, partitions: &[&str]) -> Result<()>;

    // Indexes. An index is addressed by its name, which defaults to the
    // name of the field it covers.

    fn create_index(&mut self, collection: &str, field: &str, params: IndexParams) -> Result<()>;
    fn describe_index(&self, collection: &str, index_name: &str) -> Result<IndexDescription>;
    fn drop_index(&mut self, collection: &str, index_name: &str) -> Result<()>;
    fn list_indexes(&self, collection: &str) -> Result<Vec<String>>;

    // Data

    fn insert(&mut self, collection: &str, partition: Option<&str>, rows: Vec<Row>) -> Result<MutationResult>;
    fn upsert(&mut self, collection: &str, partition: Option<&str>, rows: Vec<Row>) -> Result<MutationResult>;
    fn delete_by_pks(&mut self, collection: &str, partition: Option<&str>, pks: &[PrimaryKey]) -> Result<MutationResult>;
    fn delete(&mut self, collection: &str, partition: Option<&str>, filter: &str) -> Result<MutationResult>;
    /// Entities by primary key. Empty `output_fields` returns every schema field.
    fn get(&self, collection: &str, pks: &[PrimaryKey], output_fields: &[&str]) -> Result<ResultSet>;
    fn query(&self, collection: &str, request: &QueryRequest) -> Result<ResultSet>;
    fn search(&self, collection: &str, request: &SearchRequest) -> Result<Vec<SearchResult>>;

    /// Insert typed rows.
    fn insert_rows<T: Serialize>(
        &mut self,
        collection: &str,
        partition: Option<&str>,
        rows: &[T],
    ) -> Result<MutationResult>
    where
        Self: Sized,
    {
        let rows = rows.iter().map(to_row).collect::<Result<Vec<_>>>()?;
        self.insert(collection, partition, rows)
    }

    /// Upsert typed rows.
    fn upsert_rows<T: Serialize>(
        &mut self,
        collection: &str,
        partition: Option<&str>,
        rows: &[T],
    ) -> Result<MutationResult>
    where
        Self: Sized,
    {
        let rows = rows.iter().map(to_row).collect::<Result<Vec<_>>>()?;
        self.upsert(collection, partition, rows)
    }

    /// Query in batches of `batch_size` rows. The request's `limit` caps
    /// the total.
    fn query_iterator(
        &self,
        collection: &str,
        request: &QueryRequest,
        batch_size: usize,
    ) -> Result<QueryIterator<'_, Self>>
    where
        Self: Sized,
    {
        QueryIterator::new(self, collection, request.clone(), batch_size)
    }

    /// Search one vector in batches of `batch_size` hits. The request's
    /// `top_k` caps the total.
    fn search_iterator(
        &self,
        collection: &str,
        request: &SearchRequest,
        batch_size: usize,
    ) -> Result<SearchIterator<'_, Self>>
    where
        Self: Sized,
    {
        SearchIterator::new(self, collection, request.clone(), batch_size)
    }

    // Users and roles

    fn create_user(&mut self, user: &str, password: &str) -> Result<()>;
    fn update_password(&mut self, user: &str, old_password: &str, new_password: &str) -> Result<()>;
    fn delete_user(&mut self, user: &str) -> Result<()>;
    fn list_users(&self) -> Result<Vec<String>>;
    fn describe_user(&self, user: &str) -> Result<UserInfo>;
    fn create_role(&mut self, role: &str) -> Result<()>;
    fn drop_role(&mut self, role: &str) -> Result<()>;
    fn list_roles(&self) -> Result<Vec<String>>;
    fn grant_role(&mut self, user: &str, role: &str) -> Result<()>;
    fn revoke_role(&mut self, user: &str, role: &str) -> Result<()>;
    fn grant_privilege(&mut self, role: &str, object_type: ObjectType, object_name: &str, privilege: &str) -> Result<()>;
    fn revoke_privilege(&mut self, role: &str, object_type: ObjectType, object_name: &str, privilege: &str) -> Result<()>;
    fn list_grants(&self, role: &str) -> Result<Vec<Grant>>;
}

// ── Tests ─────────────────────────────────────────────────────────────────────
