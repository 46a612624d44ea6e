// VecDocs — local.rs
// In-process implementation of `VectorClient`.
// Author: d65v <https://github.com/d65v>
//
// Rows live in memory per collection and every search is a brute-force
// scan. The observable behaviour (validation, load rules, aliases,
// partition keys, range search, RBAC) follows what the examples expect
// from a real service, so the examples run unchanged without one.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};

use ordered_float::OrderedFloat;
use serde_json::Value;

use crate::client::{QueryRequest, SearchRequest, VectorClient, MAX_TOP_K};
use crate::data::{Column, ColumnData, MutationResult, PrimaryKey, ResultSet, Row, SearchResult};
use crate::embedding::score;
use crate::filter::{FieldResolver, Filter};
use crate::rbac::{AccessControl, Grant, ObjectType, UserInfo};
use crate::schema::{
    CollectionDescription, CollectionSchema, DataType, FieldSchema, IndexDescription, IndexParams,
    LoadState, DEFAULT_NUM_PARTITIONS, DEFAULT_PARTITION, DYNAMIC_FIELD,
};
use crate::{ClientConfig, Result, VecDocsError};

const ADDRESS_SCHEMES: [&str; 4] = ["http://", "https://", "tcp://", "unix://"];

// ── Storage ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Entity {
    pk: PrimaryKey,
    partition: String,
    /// Schema fields, vectors included, as JSON
    fields: Row,
    /// Vector fields decoded once at insert time
    vectors: HashMap<String, Vec<f32>>,
    dynamic: Row,
}

impl FieldResolver for Entity {
    fn resolve(&self, name: &str) -> Option<Value> {
        if name == DYNAMIC_FIELD {
            return Some(Value::Object(self.dynamic.clone()));
        }
        self.fields
            .get(name)
            .or_else(|| self.dynamic.get(name))
            .cloned()
    }
}

#[derive(Debug, Clone)]
struct Partition {
    name: String,
    loaded: bool,
}

#[derive(Debug)]
struct Collection {
    schema: CollectionSchema,
    shards_num: i32,
    partitions: Vec<Partition>,
    indexes: BTreeMap<String, IndexParams>,
    entities: Vec<Entity>,
    next_auto_id: i64,
}

impl Collection {
    fn new(schema: CollectionSchema, shards_num: i32) -> Self {
        let partitions = match schema.partition_key_field() {
            Some(_) => {
                let n = schema.num_partitions.unwrap_or(DEFAULT_NUM_PARTITIONS);
                (0..n)
                    .map(|i| Partition {
                        name: format!("{}_{}", DEFAULT_PARTITION, i),
                        loaded: false,
                    })
                    .collect()
            }
            None => vec![Partition {
                name: DEFAULT_PARTITION.to_string(),
                loaded: false,
            }],
        };

        Self {
            schema,
            shards_num: shards_num.max(1),
            partitions,
            indexes: BTreeMap::new(),
            entities: Vec::new(),
            next_auto_id: 1,
        }
    }

    fn partition(&self, name: &str) -> Result<&Partition> {
        self.partitions
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| VecDocsError::PartitionNotFound(name.to_string()))
    }

    fn partition_mut(&mut self, name: &str) -> Result<&mut Partition> {
        self.partitions
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| VecDocsError::PartitionNotFound(name.to_string()))
    }

    fn load_state(&self) -> LoadState {
        if self.partitions.iter().any(|p| p.loaded) {
            LoadState::Loaded
        } else {
            LoadState::NotLoad
        }
    }

    fn is_loaded(&self) -> bool {
        self.load_state() == LoadState::Loaded
    }

    fn check_indexed(&self) -> Result<()> {
        for field in self.schema.vector_fields() {
            if !self.indexes.contains_key(&field.name) {
                return Err(VecDocsError::IndexNotFound(field.name.clone()));
            }
        }
        Ok(())
    }

    /// Field and parameters of the index called `name`.
    fn index(&self, name: &str) -> Result<(&String, &IndexParams)> {
        self.indexes
            .iter()
            .find(|(field, params)| index_name(field, params) == name)
            .ok_or_else(|| VecDocsError::IndexNotFound(name.to_string()))
    }

    /// Parse a filter and check the names it reads. Names outside the
    /// schema are dynamic keys, so they need the dynamic field.
    fn parse_filter(&self, source: &str) -> Result<Filter> {
        let filter = Filter::parse(source)?;
        if !self.schema.enable_dynamic_field {
            let unknown = filter
                .fields()
                .into_iter()
                .find(|name| self.schema.field(name).is_none());
            if let Some(name) = unknown {
                return Err(VecDocsError::Field(format!(
                    "filter reads '{}', which is not in the schema and the dynamic field is disabled",
                    name
                )));
            }
        }
        Ok(filter)
    }

    fn uses_partition_key(&self) -> bool {
        self.schema.partition_key_field().is_some()
    }

    /// Partition an entity with this partition-key value belongs to.
    fn hashed_partition(&self, key: &Value) -> String {
        let mut hasher = DefaultHasher::new();
        match key {
            Value::String(s) => s.hash(&mut hasher),
            other => other.to_string().hash(&mut hasher),
        }
        let idx = (hasher.finish() % self.partitions.len() as u64) as usize;
        self.partitions[idx].name.clone()
    }

    /// Entities a search or query may see: the named partitions, or all
    /// loaded ones. Everything in scope must be loaded.
    fn scope(&self, collection: &str, partition_names: &[String]) -> Result<Vec<&Entity>> {
        let names: Vec<&str> = if partition_names.is_empty() {
            if !self.is_loaded() {
                return Err(VecDocsError::CollectionNotLoaded(collection.to_string()));
            }
            self.partitions
                .iter()
                .filter(|p| p.loaded)
                .map(|p| p.name.as_str())
                .collect()
        } else {
            for name in partition_names {
                if !self.partition(name)?.loaded {
                    return Err(VecDocsError::CollectionNotLoaded(format!(
                        "{} (partition '{}')",
                        collection, name
                    )));
                }
            }
            partition_names.iter().map(String::as_str).collect()
        };

        Ok(self
            .entities
            .iter()
            .filter(|e| names.contains(&e.partition.as_str()))
            .collect())
    }

    /// Validate a row against the schema and turn it into an entity.
    fn prepare(&mut self, mut row: Row, partition: Option<&str>, upsert: bool) -> Result<Entity> {
        let schema = &self.schema;
        let auto_id = schema.is_auto_id();
        let mut fields = Row::new();
        let mut vectors = HashMap::new();
        let mut pk = None;

        for field in &schema.fields {
            let value = row.remove(&field.name);

            if field.is_primary_key && auto_id && !upsert {
                if value.is_some() {
                    return Err(VecDocsError::Field(format!(
                        "primary key '{}' is generated automatically and must not be supplied",
                        field.name
                    )));
                }
                let id = self.next_auto_id;
                self.next_auto_id += 1;
                fields.insert(field.name.clone(), Value::from(id));
                pk = Some(PrimaryKey::Int64(id));
                continue;
            }

            let value = value.ok_or_else(|| {
                VecDocsError::Field(format!("missing value for field '{}'", field.name))
            })?;
            check_value(field, &value)?;

            if field.data_type.is_vector() {
                vectors.insert(field.name.clone(), decode_vector(&value));
            }
            if field.is_primary_key {
                pk = Some(match &value {
                    Value::String(s) => PrimaryKey::VarChar(s.clone()),
                    v => PrimaryKey::Int64(v.as_i64().unwrap_or_default()),
                });
            }
            fields.insert(field.name.clone(), value);
        }

        let mut dynamic = Row::new();
        if let Some(meta) = row.remove(DYNAMIC_FIELD) {
            match meta {
                Value::Object(m) if schema.enable_dynamic_field => dynamic.extend(m),
                _ => {
                    return Err(VecDocsError::Field(format!(
                        "'{}' must be an object and needs the dynamic field enabled",
                        DYNAMIC_FIELD
                    )))
                }
            }
        }
        if !row.is_empty() {
            if !schema.enable_dynamic_field {
                let mut extra: Vec<_> = row.keys().cloned().collect();
                extra.sort();
                return Err(VecDocsError::Field(format!(
                    "fields not in schema and the dynamic field is disabled: {}",
                    extra.join(", ")
                )));
            }
            dynamic.extend(row);
        }

        let partition = match (schema.partition_key_field(), partition) {
            (Some(_), Some(_)) => {
                return Err(VecDocsError::InvalidParameter(
                    "partition names cannot be given when a partition key is set".into(),
                ))
            }
            (Some(key_field), None) => {
                let key = fields.get(&key_field.name).cloned().unwrap_or(Value::Null);
                self.hashed_partition(&key)
            }
            (None, Some(name)) => self.partition(name)?.name.clone(),
            (None, None) => DEFAULT_PARTITION.to_string(),
        };

        let pk = pk.ok_or_else(|| VecDocsError::Field("row has no primary key".into()))?;

        Ok(Entity {
            pk,
            partition,
            fields,
            vectors,
            dynamic,
        })
    }

    /// Build result columns for `entities`.
    fn columns(&self, entities: &[&Entity], output_fields: &[String], with_pk: bool) -> Result<Vec<Column>> {
        let schema = &self.schema;
        let mut names: Vec<String> = Vec::new();

        if with_pk {
            if let Some(pk) = schema.primary_field() {
                names.push(pk.name.clone());
            }
        }
        for name in output_fields {
            if name == "*" {
                names.extend(schema.fields.iter().map(|f| f.name.clone()));
                if schema.enable_dynamic_field {
                    names.push(DYNAMIC_FIELD.to_string());
                }
            } else {
                names.push(name.clone());
            }
        }
        let mut seen = std::collections::HashSet::new();
        names.retain(|n| seen.insert(n.clone()));

        names
            .iter()
            .map(|name| match schema.field(name) {
                Some(field) => Ok(typed_column(field, entities)),
                None if name == DYNAMIC_FIELD && schema.enable_dynamic_field => Ok(Column::dynamic(
                    DYNAMIC_FIELD,
                    entities
                        .iter()
                        .map(|e| Value::Object(e.dynamic.clone()))
                        .collect(),
                )),
                None if schema.enable_dynamic_field => Ok(Column::dynamic(
                    name.clone(),
                    entities
                        .iter()
                        .map(|e| e.dynamic.get(name).cloned().unwrap_or(Value::Null))
                        .collect(),
                )),
                None => Err(VecDocsError::Field(format!(
                    "output field '{}' does not exist",
                    name
                ))),
            })
            .collect()
    }
}

fn index_name<'a>(field: &'a str, params: &'a IndexParams) -> &'a str {
    params.index_name.as_deref().unwrap_or(field)
}

/// Check one value against its field definition.
fn check_value(field: &FieldSchema, value: &Value) -> Result<()> {
    let mismatch = || {
        VecDocsError::Field(format!(
            "field '{}' expects {}, got {}",
            field.name, field.data_type, value
        ))
    };

    match field.data_type {
        DataType::Bool => value.as_bool().map(|_| ()).ok_or_else(mismatch),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let (lo, hi) = field.data_type.int_range().unwrap_or((i64::MIN, i64::MAX));
            match value.as_i64() {
                Some(v) if v >= lo && v <= hi => Ok(()),
                _ => Err(mismatch()),
            }
        }
        DataType::Float | DataType::Double => value.as_f64().map(|_| ()).ok_or_else(mismatch),
        DataType::VarChar => {
            let s = value.as_str().ok_or_else(mismatch)?;
            let max = field.max_length.unwrap_or(usize::MAX);
            if s.len() > max {
                return Err(VecDocsError::Field(format!(
                    "value of '{}' is {} bytes, longer than max_length {}",
                    field.name,
                    s.len(),
                    max
                )));
            }
            Ok(())
        }
        DataType::Json => Ok(()),
        DataType::Array => {
            let items = value.as_array().ok_or_else(mismatch)?;
            let cap = field.max_capacity.unwrap_or(usize::MAX);
            if items.len() > cap {
                return Err(VecDocsError::Field(format!(
                    "array '{}' has {} elements, more than max_capacity {}",
                    field.name,
                    items.len(),
                    cap
                )));
            }
            let element = FieldSchema {
                data_type: field.element_type.unwrap_or(DataType::Json),
                ..field.clone()
            };
            items.iter().try_for_each(|item| check_value(&element, item))
        }
        DataType::FloatVector => {
            let items = value.as_array().ok_or_else(mismatch)?;
            let dim = field.dim.unwrap_or(0);
            if items.len() != dim {
                return Err(VecDocsError::DimensionMismatch {
                    field: field.name.clone(),
                    expected: dim,
                    got: items.len(),
                });
            }
            if items.iter().any(|x| !x.is_number()) {
                return Err(mismatch());
            }
            Ok(())
        }
    }
}

fn decode_vector(value: &Value) -> Vec<f32> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_f64).map(|x| x as f32).collect())
        .unwrap_or_default()
}

fn typed_column(field: &FieldSchema, entities: &[&Entity]) -> Column {
    let values = || entities.iter().map(|e| e.fields.get(&field.name).cloned().unwrap_or(Value::Null));

    let data = match field.data_type {
        DataType::Bool => ColumnData::Bool(values().map(|v| v.as_bool().unwrap_or_default()).collect()),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            ColumnData::Int64(values().map(|v| v.as_i64().unwrap_or_default()).collect())
        }
        DataType::Float => {
            ColumnData::Float(values().map(|v| v.as_f64().unwrap_or_default() as f32).collect())
        }
        DataType::Double => ColumnData::Double(values().map(|v| v.as_f64().unwrap_or_default()).collect()),
        DataType::VarChar => ColumnData::VarChar(
            values()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_default())
                .collect(),
        ),
        DataType::Json => ColumnData::Json(values().collect()),
        DataType::Array => ColumnData::Array(
            values()
                .map(|v| match v {
                    Value::Array(items) => items,
                    _ => Vec::new(),
                })
                .collect(),
        ),
        DataType::FloatVector => ColumnData::FloatVector {
            dim: field.dim.unwrap_or(0),
            data: entities
                .iter()
                .map(|e| e.vectors.get(&field.name).cloned().unwrap_or_default())
                .collect(),
        },
    };
    Column::new(field.name.clone(), data)
}

fn validate_collection_name(name: &str) -> Result<()> {
    let valid = name
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name.len() <= 255;
    if valid {
        Ok(())
    } else {
        Err(VecDocsError::InvalidParameter(format!("invalid name '{}'", name)))
    }
}

// ── Client ────────────────────────────────────────────────────────────────────

/// A `VectorClient` that keeps everything in this process.
#[derive(Debug)]
pub struct LocalClient {
    config: ClientConfig,
    collections: BTreeMap<String, Collection>,
    aliases: BTreeMap<String, String>,
    access: AccessControl,
}

impl LocalClient {
    /// Open a client. The address must be `local` or carry an `http`,
    /// `https`, `tcp` or `unix` scheme; `user:password` tokens are
    /// checked against the user table.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let address = config.address.trim();
        let has_scheme = ADDRESS_SCHEMES
            .iter()
            .any(|s| address.len() > s.len() && address.starts_with(s));
        if address != "local" && !has_scheme {
            return Err(VecDocsError::InvalidAddress(config.address.clone()));
        }

        let client = Self {
            config: config.clone(),
            collections: BTreeMap::new(),
            aliases: BTreeMap::new(),
            access: AccessControl::default(),
        };

        if let Some((user, password)) = config.credentials() {
            client.access.authenticate(user, password)?;
        }

        log::info!("connected to {} (db '{}')", address, config.db_name);
        Ok(client)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn resolve(&self, name: &str) -> Result<String> {
        if self.collections.contains_key(name) {
            return Ok(name.to_string());
        }
        self.aliases
            .get(name)
            .cloned()
            .ok_or_else(|| VecDocsError::CollectionNotFound(name.to_string()))
    }

    fn collection(&self, name: &str) -> Result<(String, &Collection)> {
        let real = self.resolve(name)?;
        let coll = self
            .collections
            .get(&real)
            .ok_or_else(|| VecDocsError::CollectionNotFound(name.to_string()))?;
        Ok((real, coll))
    }

    fn collection_mut(&mut self, name: &str) -> Result<&mut Collection> {
        let real = self.resolve(name)?;
        self.collections
            .get_mut(&real)
            .ok_or_else(|| VecDocsError::CollectionNotFound(name.to_string()))
    }

    fn write_rows(
        &mut self,
        collection: &str,
        partition: Option<&str>,
        rows: Vec<Row>,
        upsert: bool,
    ) -> Result<MutationResult> {
        let coll = self.collection_mut(collection)?;

        // Validate everything before touching storage.
        let saved_auto_id = coll.next_auto_id;
        let mut prepared = Vec::with_capacity(rows.len());
        for row in rows {
            match coll.prepare(row, partition, upsert) {
                Ok(e) => prepared.push(e),
                Err(e) => {
                    coll.next_auto_id = saved_auto_id;
                    return Err(e);
                }
            }
        }

        let ids: Vec<PrimaryKey> = prepared.iter().map(|e| e.pk.clone()).collect();
        if upsert {
            coll.entities.retain(|e| !ids.contains(&e.pk));
        }
        coll.entities.extend(prepared);

        let n = ids.len();
        log::debug!(
            "{} {} rows into '{}' (now {})",
            if upsert { "upserted" } else { "inserted" },
            n,
            collection,
            coll.entities.len()
        );

        Ok(MutationResult {
            insert_count: if upsert { 0 } else { n },
            upsert_count: if upsert { n } else { 0 },
            delete_count: 0,
            ids,
        })
    }

    fn delete_where<F>(&mut self, collection: &str, partition: Option<&str>, pred: F) -> Result<MutationResult>
    where
        F: Fn(&Entity) -> bool,
    {
        let coll = self.collection_mut(collection)?;
        if let Some(p) = partition {
            coll.partition(p)?;
        }
        let before = coll.entities.len();
        coll.entities
            .retain(|e| !(partition.map_or(true, |p| e.partition == p) && pred(e)));
        let removed = before - coll.entities.len();
        log::debug!("deleted {} rows from '{}'", removed, collection);
        Ok(MutationResult {
            delete_count: removed,
            ..Default::default()
        })
    }
}

impl VectorClient for LocalClient {
    // ── Collections ───────────────────────────────────────────────────────────

    fn create_collection(&mut self, schema: CollectionSchema, shards_num: i32) -> Result<()> {
        validate_collection_name(&schema.name)?;
        schema.validate()?;
        if self.collections.contains_key(&schema.name) || self.aliases.contains_key(&schema.name) {
            return Err(VecDocsError::CollectionExists(schema.name.clone()));
        }
        log::info!("creating collection '{}' ({} fields)", schema.name, schema.fields.len());
        let name = schema.name.clone();
        self.collections.insert(name, Collection::new(schema, shards_num));
        Ok(())
    }

    fn has_collection(&self, name: &str) -> Result<bool> {
        Ok(self.resolve(name).is_ok())
    }

    fn list_collections(&self) -> Result<Vec<String>> {
        Ok(self.collections.keys().cloned().collect())
    }

    fn describe_collection(&self, name: &str) -> Result<CollectionDescription> {
        let (real, coll) = self.collection(name)?;
        Ok(CollectionDescription {
            name: real.clone(),
            schema: coll.schema.clone(),
            shards_num: coll.shards_num,
            aliases: self.list_aliases(&real)?,
            partitions: coll.partitions.iter().map(|p| p.name.clone()).collect(),
            load_state: coll.load_state(),
            row_count: coll.entities.len(),
        })
    }

    fn drop_collection(&mut self, name: &str) -> Result<()> {
        if !self.collections.contains_key(name) {
            return Err(VecDocsError::CollectionNotFound(name.to_string()));
        }
        let aliases = self.list_aliases(name)?;
        if !aliases.is_empty() {
            return Err(VecDocsError::Alias(format!(
                "drop aliases {:?} before dropping collection '{}'",
                aliases, name
            )));
        }
        self.collections.remove(name);
        log::info!("dropped collection '{}'", name);
        Ok(())
    }

    fn rename_collection(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        validate_collection_name(new_name)?;
        if self.collections.contains_key(new_name) || self.aliases.contains_key(new_name) {
            return Err(VecDocsError::CollectionExists(new_name.to_string()));
        }
        let mut coll = self
            .collections
            .remove(old_name)
            .ok_or_else(|| VecDocsError::CollectionNotFound(old_name.to_string()))?;
        coll.schema.name = new_name.to_string();
        self.collections.insert(new_name.to_string(), coll);
        for target in self.aliases.values_mut() {
            if target == old_name {
                *target = new_name.to_string();
            }
        }
        log::info!("renamed collection '{}' to '{}'", old_name, new_name);
        Ok(())
    }

    fn load_collection(&mut self, name: &str) -> Result<()> {
        let coll = self.collection_mut(name)?;
        coll.check_indexed()?;
        coll.partitions.iter_mut().for_each(|p| p.loaded = true);
        log::info!("loaded collection '{}'", name);
        Ok(())
    }

    fn release_collection(&mut self, name: &str) -> Result<()> {
        let coll = self.collection_mut(name)?;
        coll.partitions.iter_mut().for_each(|p| p.loaded = false);
        log::info!("released collection '{}'", name);
        Ok(())
    }

    fn get_load_state(&self, name: &str, partition: Option<&str>) -> Result<LoadState> {
        let coll = match self.collection(name) {
            Ok((_, c)) => c,
            Err(VecDocsError::CollectionNotFound(_)) => return Ok(LoadState::NotExist),
            Err(e) => return Err(e),
        };
        Ok(match partition {
            None => coll.load_state(),
            Some(p) => match coll.partition(p) {
                Ok(part) if part.loaded => LoadState::Loaded,
                Ok(_) => LoadState::NotLoad,
                Err(_) => LoadState::NotExist,
            },
        })
    }

    fn get_loading_progress(&self, name: &str) -> Result<i64> {
        let (_, coll) = self.collection(name)?;
        let loaded = coll.partitions.iter().filter(|p| p.loaded).count();
        Ok((loaded * 100 / coll.partitions.len().max(1)) as i64)
    }

    fn flush(&mut self, name: &str) -> Result<()> {
        let (_, coll) = self.collection(name)?;
        log::debug!("flush '{}': {} rows already visible", name, coll.entities.len());
        Ok(())
    }

    fn get_collection_stats(&self, name: &str) -> Result<usize> {
        Ok(self.collection(name)?.1.entities.len())
    }

    // ── Aliases ───────────────────────────────────────────────────────────────

    fn create_alias(&mut self, collection: &str, alias: &str) -> Result<()> {
        validate_collection_name(alias)?;
        if !self.collections.contains_key(collection) {
            return Err(VecDocsError::CollectionNotFound(collection.to_string()));
        }
        if self.collections.contains_key(alias) || self.aliases.contains_key(alias) {
            return Err(VecDocsError::Alias(format!("'{}' is already in use", alias)));
        }
        self.aliases.insert(alias.to_string(), collection.to_string());
        Ok(())
    }

    fn alter_alias(&mut self, collection: &str, alias: &str) -> Result<()> {
        if !self.collections.contains_key(collection) {
            return Err(VecDocsError::CollectionNotFound(collection.to_string()));
        }
        match self.aliases.get_mut(alias) {
            Some(target) => {
                *target = collection.to_string();
                Ok(())
            }
            None => Err(VecDocsError::Alias(format!("alias '{}' does not exist", alias))),
        }
    }

    fn drop_alias(&mut self, alias: &str) -> Result<()> {
        self.aliases
            .remove(alias)
            .map(|_| ())
            .ok_or_else(|| VecDocsError::Alias(format!("alias '{}' does not exist", alias)))
    }

    fn describe_alias(&self, alias: &str) -> Result<String> {
        self.aliases
            .get(alias)
            .cloned()
            .ok_or_else(|| VecDocsError::Alias(format!("alias '{}' does not exist", alias)))
    }

    fn list_aliases(&self, collection: &str) -> Result<Vec<String>> {
        let real = self.resolve(collection)?;
        Ok(self
            .aliases
            .iter()
            .filter(|(_, target)| **target == real)
            .map(|(alias, _)| alias.clone())
            .collect())
    }

    // ── Partitions ────────────────────────────────────────────────────────────

    fn create_partition(&mut self, collection: &str, partition: &str) -> Result<()> {
        validate_collection_name(partition)?;
        let coll = self.collection_mut(collection)?;
        if coll.uses_partition_key() {
            return Err(VecDocsError::InvalidParameter(
                "partitions are managed automatically when a partition key is set".into(),
            ));
        }
        if coll.partition(partition).is_ok() {
            return Err(VecDocsError::PartitionExists(partition.to_string()));
        }
        coll.partitions.push(Partition {
            name: partition.to_string(),
            loaded: false,
        });
        Ok(())
    }

    fn drop_partition(&mut self, collection: &str, partition: &str) -> Result<()> {
        let coll = self.collection_mut(collection)?;
        if coll.uses_partition_key() {
            return Err(VecDocsError::InvalidParameter(
                "partitions are managed automatically when a partition key is set".into(),
            ));
        }
        if partition == DEFAULT_PARTITION {
            return Err(VecDocsError::InvalidParameter("the default partition cannot be dropped".into()));
        }
        if coll.partition(partition)?.loaded {
            return Err(VecDocsError::InvalidParameter(format!(
                "release partition '{}' before dropping it",
                partition
            )));
        }
        coll.partitions.retain(|p| p.name != partition);
        coll.entities.retain(|e| e.partition != partition);
        Ok(())
    }

    fn has_partition(&self, collection: &str, partition: &str) -> Result<bool> {
        Ok(self.collection(collection)?.1.partition(partition).is_ok())
    }

    fn list_partitions(&self, collection: &str) -> Result<Vec<String>> {
        Ok(self
            .collection(collection)?
            .1
            .partitions
            .iter()
            .map(|p| p.name.clone())
            .collect())
    }

    fn load_partitions(&mut self, collection: &str, partitions: &[&str]) -> Result<()> {
        let coll = self.collection_mut(collection)?;
        coll.check_indexed()?;
        for name in partitions {
            coll.partition(name)?;
        }
        for name in partitions {
            coll.partition_mut(name)?.loaded = true;
        }
        Ok(())
    }

    fn release_partitions(&mut self, collection: &str, partitions: &[&str]) -> Result<()> {
        let coll = self.collection_mut(collection)?;
        for name in partitions {
            coll.partition(name)?;
        }
        for name in partitions {
            coll.partition_mut(name)?.loaded = false;
        }
        Ok(())
    }

    // ── Indexes ───────────────────────────────────────────────────────────────

    fn create_index(&mut self, collection: &str, field: &str, params: IndexParams) -> Result<()> {
        let coll = self.collection_mut(collection)?;
        let target = coll
            .schema
            .field(field)
            .ok_or_else(|| VecDocsError::Field(format!("field '{}' does not exist", field)))?;
        params.validate_for(target)?;

        match coll.indexes.get(field) {
            Some(existing) if *existing == params => return Ok(()),
            Some(_) => return Err(VecDocsError::IndexExists(field.to_string())),
            None => {}
        }
        let name = index_name(field, &params).to_string();
        if coll.index(&name).is_ok() {
            return Err(VecDocsError::IndexExists(name));
        }

        log::info!("index '{}' ({}) on '{}.{}'", name, params.type_name(), collection, field);
        coll.indexes.insert(field.to_string(), params);
        Ok(())
    }

    fn describe_index(&self, collection: &str, index_name: &str) -> Result<IndexDescription> {
        let (_, coll) = self.collection(collection)?;
        let (field, params) = coll.index(index_name)?;
        Ok(IndexDescription {
            field_name: field.clone(),
            index_name: index_name.to_string(),
            index_type: params.index_type,
            metric_type: params.metric_type,
            params: params.params.clone(),
        })
    }

    fn drop_index(&mut self, collection: &str, index_name: &str) -> Result<()> {
        let coll = self.collection_mut(collection)?;
        if coll.is_loaded() {
            return Err(VecDocsError::InvalidParameter(format!(
                "release '{}' before dropping its index",
                collection
            )));
        }
        let field = coll.index(index_name)?.0.clone();
        coll.indexes.remove(&field);
        log::info!("dropped index '{}' on '{}.{}'", index_name, collection, field);
        Ok(())
    }

    fn list_indexes(&self, collection: &str) -> Result<Vec<String>> {
        let (_, coll) = self.collection(collection)?;
        Ok(coll
            .indexes
            .iter()
            .map(|(field, params)| index_name(field, params).to_string())
            .collect())
    }

    // ── Data ──────────────────────────────────────────────────────────────────

    fn insert(&mut self, collection: &str, partition: Option<&str>, rows: Vec<Row>) -> Result<MutationResult> {
        self.write_rows(collection, partition, rows, false)
    }

    fn upsert(&mut self, collection: &str, partition: Option<&str>, rows: Vec<Row>) -> Result<MutationResult> {
        self.write_rows(collection, partition, rows, true)
    }

    fn delete_by_pks(&mut self, collection: &str, partition: Option<&str>, pks: &[PrimaryKey]) -> Result<MutationResult> {
        self.delete_where(collection, partition, |e| pks.contains(&e.pk))
    }

    fn delete(&mut self, collection: &str, partition: Option<&str>, filter: &str) -> Result<MutationResult> {
        let filter = self.collection(collection)?.1.parse_filter(filter)?;
        if filter.is_empty() {
            return Err(VecDocsError::InvalidParameter("delete needs a filter expression".into()));
        }
        self.delete_where(collection, partition, |e| filter.matches(e))
    }

    fn get(&self, collection: &str, pks: &[PrimaryKey], output_fields: &[&str]) -> Result<ResultSet> {
        let (real, coll) = self.collection(collection)?;
        let scope = coll.scope(&real, &[])?;

        let mut found = Vec::new();
        for pk in pks {
            found.extend(scope.iter().copied().filter(|e| e.pk == *pk));
        }

        let fields: Vec<String> = if output_fields.is_empty() {
            coll.schema.fields.iter().map(|f| f.name.clone()).collect()
        } else {
            output_fields.iter().map(|f| f.to_string()).collect()
        };
        coll.columns(&found, &fields, true)
    }

    fn query(&self, collection: &str, request: &QueryRequest) -> Result<ResultSet> {
        let (real, coll) = self.collection(collection)?;
        let filter = coll.parse_filter(&request.filter)?;
        if filter.is_empty() && request.limit.is_none() {
            return Err(VecDocsError::InvalidParameter(
                "a query without a filter needs a limit".into(),
            ));
        }
        if request.limit.map_or(false, |l| l > MAX_TOP_K) {
            return Err(VecDocsError::InvalidParameter(format!("limit must be at most {}", MAX_TOP_K)));
        }

        let hits: Vec<&Entity> = coll
            .scope(&real, &request.partition_names)?
            .into_iter()
            .filter(|e| filter.matches(*e))
            .skip(request.offset)
            .take(request.limit.unwrap_or(usize::MAX))
            .collect();

        log::debug!("query '{}' [{}] -> {} rows", collection, filter.source(), hits.len());
        coll.columns(&hits, &request.output_fields, true)
    }

    fn search(&self, collection: &str, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        let (real, coll) = self.collection(collection)?;

        let field = coll
            .schema
            .field(&request.anns_field)
            .filter(|f| f.data_type.is_vector())
            .ok_or_else(|| {
                VecDocsError::Field(format!("'{}' is not a vector field", request.anns_field))
            })?;
        let index = coll
            .indexes
            .get(&field.name)
            .ok_or_else(|| VecDocsError::IndexNotFound(field.name.clone()))?;
        let metric = index
            .metric_type
            .ok_or_else(|| VecDocsError::IndexNotFound(field.name.clone()))?;
        if let Some(requested) = request.metric_type {
            if requested != metric {
                return Err(VecDocsError::InvalidParameter(format!(
                    "metric {} does not match the index metric {}",
                    requested, metric
                )));
            }
        }
        if request.top_k == 0 || request.top_k > MAX_TOP_K {
            return Err(VecDocsError::InvalidParameter(format!(
                "top_k must be between 1 and {}",
                MAX_TOP_K
            )));
        }
        let dim = field.dim.unwrap_or(0);
        for v in &request.vectors {
            if v.len() != dim {
                return Err(VecDocsError::DimensionMismatch {
                    field: field.name.clone(),
                    expected: dim,
                    got: v.len(),
                });
            }
        }

        let radius = request.param_f32("radius")?;
        let range_filter = request.param_f32("range_filter")?;
        let filter = coll.parse_filter(&request.filter)?;

        let candidates: Vec<&Entity> = coll
            .scope(&real, &request.partition_names)?
            .into_iter()
            .filter(|e| filter.matches(*e))
            .collect();

        let mut results = Vec::with_capacity(request.vectors.len());
        for query in &request.vectors {
            // Sort key: smaller is better, ties keep insertion order.
            let mut scored: Vec<(OrderedFloat<f32>, usize, f32)> = candidates
                .iter()
                .enumerate()
                .filter_map(|(i, e)| {
                    let s = score(metric, query, e.vectors.get(&field.name)?);
                    if !metric.within_range(s, radius, range_filter) {
                        return None;
                    }
                    let key = if metric.higher_is_better() { -s } else { s };
                    Some((OrderedFloat(key), i, s))
                })
                .collect();
            scored.sort_by_key(|(key, i, _)| (*key, *i));

            let hits: Vec<(&Entity, f32)> = scored
                .into_iter()
                .skip(request.offset)
                .take(request.top_k)
                .map(|(_, i, s)| (candidates[i], s))
                .collect();

            let entities: Vec<&Entity> = hits.iter().map(|(e, _)| *e).collect();
            results.push(SearchResult {
                result_count: hits.len(),
                ids: entities.iter().map(|e| e.pk.clone()).collect(),
                scores: hits.iter().map(|(_, s)| *s).collect(),
                fields: coll.columns(&entities, &request.output_fields, false)?,
            });
        }

        log::debug!(
            "search '{}' nq={} top_k={} [{}]",
            collection,
            request.vectors.len(),
            request.top_k,
            filter.source()
        );
        Ok(results)
    }

    // ── Users and roles ───────────────────────────────────────────────────────

    fn create_user(&mut self, user: &str, password: &str) -> Result<()> {
        self.access.create_user(user, password)
    }

    fn update_password(&mut self, user: &str, old_password: &str, new_password: &str) -> Result<()> {
        self.access.update_password(user, old_password, new_password)
    }

    fn delete_user(&mut self, user: &str) -> Result<()> {
        self.access.delete_user(user)
    }

    fn list_users(&self) -> Result<Vec<String>> {
        Ok(self.access.list_users())
    }

    fn describe_user(&self, user: &str) -> Result<UserInfo> {
        self.access.describe_user(user)
    }

    fn create_role(&mut self, role: &str) -> Result<()> {
        self.access.create_role(role)
    }

    fn drop_role(&mut self, role: &str) -> Result<()> {
        self.access.drop_role(role)
    }

    fn list_roles(&self) -> Result<Vec<String>> {
        Ok(self.access.list_roles())
    }

    fn grant_role(&mut self, user: &str, role: &str) -> Result<()> {
        self.access.grant_role(user, role)
    }

    fn revoke_role(&mut self, user: &str, role: &str) -> Result<()> {
        self.access.revoke_role(user, role)
    }

    fn grant_privilege(&mut self, role: &str, object_type: ObjectType, object_name: &str, privilege: &str) -> Result<()> {
        self.access.grant_privilege(role, object_type, object_name, privilege)
    }

    fn revoke_privilege(&mut self, role: &str, object_type: ObjectType, object_name: &str, privilege: &str) -> Result<()> {
        self.access.revoke_privilege(role, object_type, object_name, privilege)
    }

    fn list_grants(&self, role: &str) -> Result<Vec<Grant>> {
        self.access.list_grants(role)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MetricType;
    use crate::schema::IndexType;
    use serde_json::json;

    fn row(v: Value) -> Row {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    fn client() -> LocalClient {
        LocalClient::connect(&ClientConfig::new("local", "")).unwrap()
    }

    fn quick_setup(c: &mut LocalClient) {
        let schema = CollectionSchema::new("quick_setup")
            .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
            .with_field(FieldSchema::new("vector", DataType::FloatVector).with_dim(2))
            .with_dynamic_field(true);
        c.create_collection(schema, 1).unwrap();
        c.create_index("quick_setup", "vector", IndexParams::auto_index(MetricType::IP))
            .unwrap();
        c.load_collection("quick_setup").unwrap();
        let rows = vec![
            row(json!({"id": 0, "vector": [1.0, 0.0], "color": "red_1"})),
            row(json!({"id": 1, "vector": [0.0, 1.0], "color": "blue_2"})),
            row(json!({"id": 2, "vector": [0.7, 0.7], "color": "red_3"})),
        ];
        c.insert("quick_setup", None, rows).unwrap();
    }

    #[test]
    fn test_connect_validates_address() {
        assert!(LocalClient::connect(&ClientConfig::new("YOUR_CLUSTER_ENDPOINT", "")).is_err());
        assert!(LocalClient::connect(&ClientConfig::new("http://", "")).is_err());
        LocalClient::connect(&ClientConfig::new("http://localhost:19530", "")).unwrap();
        LocalClient::connect(&ClientConfig::new("https://in01.example.com", "root:Milvus")).unwrap();
        assert!(matches!(
            LocalClient::connect(&ClientConfig::new("local", "root:wrong")),
            Err(VecDocsError::AccessControl(_))
        ));
    }

    #[test]
    fn test_search_ranks_by_metric() {
        let mut c = client();
        quick_setup(&mut c);
        let req = SearchRequest::new("vector", vec![vec![1.0, 0.1]])
            .with_top_k(2)
            .with_output_fields(["color"]);
        let res = c.search("quick_setup", &req).unwrap();
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].ids, vec![PrimaryKey::Int64(0), PrimaryKey::Int64(2)]);
        assert!(res[0].scores[0] >= res[0].scores[1]);
        assert_eq!(res[0].fields[0].name, "color");
        assert!(res[0].fields[0].dynamic);
    }

    #[test]
    fn test_search_requires_load() {
        let mut c = client();
        quick_setup(&mut c);
        c.release_collection("quick_setup").unwrap();
        let req = SearchRequest::new("vector", vec![vec![1.0, 0.0]]);
        assert!(matches!(
            c.search("quick_setup", &req),
            Err(VecDocsError::CollectionNotLoaded(_))
        ));
    }

    #[test]
    fn test_load_requires_index() {
        let mut c = client();
        let schema = CollectionSchema::new("plain")
            .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
            .with_field(FieldSchema::new("vector", DataType::FloatVector).with_dim(2));
        c.create_collection(schema, 1).unwrap();
        assert!(matches!(
            c.load_collection("plain"),
            Err(VecDocsError::IndexNotFound(_))
        ));
        assert_eq!(c.get_load_state("plain", None).unwrap(), LoadState::NotLoad);
        assert_eq!(c.get_load_state("ghost", None).unwrap(), LoadState::NotExist);
    }

    #[test]
    fn test_insert_validation() {
        let mut c = client();
        quick_setup(&mut c);
        let bad_dim = row(json!({"id": 9, "vector": [1.0]}));
        assert!(matches!(
            c.insert("quick_setup", None, vec![bad_dim]),
            Err(VecDocsError::DimensionMismatch { expected: 2, got: 1, .. })
        ));
        let missing = row(json!({"vector": [1.0, 1.0]}));
        assert!(c.insert("quick_setup", None, vec![missing]).is_err());
        assert_eq!(c.get_collection_stats("quick_setup").unwrap(), 3);
    }

    #[test]
    fn test_metric_mismatch() {
        let mut c = client();
        quick_setup(&mut c);
        let req = SearchRequest::new("vector", vec![vec![1.0, 0.0]]).with_metric(MetricType::L2);
        assert!(matches!(
            c.search("quick_setup", &req),
            Err(VecDocsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_query_and_delete() {
        let mut c = client();
        quick_setup(&mut c);
        let req = QueryRequest::new("color like \"red%\"").with_output_fields(["color"]);
        let rs = c.query("quick_setup", &req).unwrap();
        assert_eq!(rs[0].name, "id");
        assert_eq!(rs[0].data, ColumnData::Int64(vec![0, 2]));
        assert_eq!(rs[1].get(1), Some(json!("red_3")));

        assert!(c.query("quick_setup", &QueryRequest::new("")).is_err());
        let limited = c
            .query("quick_setup", &QueryRequest::new("").with_limit(1))
            .unwrap();
        assert_eq!(limited[0].len(), 1);

        let deleted = c.delete("quick_setup", None, "id in [0, 1]").unwrap();
        assert_eq!(deleted.delete_count, 2);
        let deleted = c
            .delete_by_pks("quick_setup", None, &[PrimaryKey::Int64(2)])
            .unwrap();
        assert_eq!(deleted.delete_count, 1);
        assert_eq!(c.get_collection_stats("quick_setup").unwrap(), 0);
        assert!(c.delete("quick_setup", None, "").is_err());
    }

    #[test]
    fn test_upsert_replaces() {
        let mut c = client();
        quick_setup(&mut c);
        let res = c
            .upsert(
                "quick_setup",
                None,
                vec![row(json!({"id": 1, "vector": [0.5, 0.5], "color": "green_9"}))],
            )
            .unwrap();
        assert_eq!(res.upsert_count, 1);
        assert_eq!(c.get_collection_stats("quick_setup").unwrap(), 3);
        let rs = c.get("quick_setup", &[PrimaryKey::Int64(1)], &["color"]).unwrap();
        assert_eq!(rs[1].get(0), Some(json!("green_9")));
    }

    #[test]
    fn test_auto_id() {
        let mut c = client();
        let schema = CollectionSchema::new("auto")
            .with_auto_id(true)
            .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
            .with_field(FieldSchema::new("vector", DataType::FloatVector).with_dim(2));
        c.create_collection(schema, 1).unwrap();
        let res = c
            .insert("auto", None, vec![row(json!({"vector": [1.0, 0.0]}))])
            .unwrap();
        assert_eq!(res.ids, vec![PrimaryKey::Int64(1)]);
        assert!(c
            .insert("auto", None, vec![row(json!({"id": 5, "vector": [1.0, 0.0]}))])
            .is_err());
    }

    #[test]
    fn test_dynamic_disabled_rejects_extra_fields() {
        let mut c = client();
        let schema = CollectionSchema::new("strict")
            .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
            .with_field(FieldSchema::new("vector", DataType::FloatVector).with_dim(2));
        c.create_collection(schema, 1).unwrap();
        let err = c
            .insert("strict", None, vec![row(json!({"id": 1, "vector": [1.0, 0.0], "x": 1}))])
            .unwrap_err();
        assert!(matches!(err, VecDocsError::Field(_)));
    }

    #[test]
    fn test_aliases() {
        let mut c = client();
        quick_setup(&mut c);
        c.create_alias("quick_setup", "qs").unwrap();
        assert!(c.has_collection("qs").unwrap());
        assert_eq!(c.describe_alias("qs").unwrap(), "quick_setup");
        assert_eq!(c.get_collection_stats("qs").unwrap(), 3);
        assert!(c.drop_collection("quick_setup").is_err());
        c.drop_alias("qs").unwrap();
        c.drop_collection("quick_setup").unwrap();
        assert!(!c.has_collection("quick_setup").unwrap());
    }

    #[test]
    fn test_partition_key_routes_rows() {
        let mut c = client();
        let schema = CollectionSchema::new("pk")
            .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
            .with_field(FieldSchema::new("vector", DataType::FloatVector).with_dim(2))
            .with_field(
                FieldSchema::new("publication", DataType::VarChar)
                    .with_max_length(64)
                    .with_partition_key(true),
            )
            .with_num_partitions(4);
        c.create_collection(schema, 1).unwrap();
        assert_eq!(c.list_partitions("pk").unwrap().len(), 4);
        assert!(c.create_partition("pk", "manual").is_err());

        let r = row(json!({"id": 1, "vector": [1.0, 0.0], "publication": "A"}));
        assert!(c.insert("pk", Some("_default_0"), vec![r.clone()]).is_err());
        c.insert("pk", None, vec![r]).unwrap();
        assert_eq!(c.get_collection_stats("pk").unwrap(), 1);
    }

    #[test]
    fn test_drop_index_requires_release() {
        let mut c = client();
        quick_setup(&mut c);
        assert!(c.drop_index("quick_setup", "vector").is_err());
        c.release_collection("quick_setup").unwrap();
        c.drop_index("quick_setup", "vector").unwrap();
        assert!(c.list_indexes("quick_setup").unwrap().is_empty());
    }

    #[test]
    fn test_filter_fields_checked_without_dynamic_field() {
        let mut c = client();
        let schema = CollectionSchema::new("strict")
            .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
            .with_field(FieldSchema::new("vector", DataType::FloatVector).with_dim(2));
        c.create_collection(schema, 1).unwrap();
        c.create_index("strict", "vector", IndexParams::auto_index(MetricType::L2))
            .unwrap();
        c.load_collection("strict").unwrap();
        c.insert("strict", None, vec![row(json!({"id": 1, "vector": [1.0, 0.0]}))])
            .unwrap();

        assert!(matches!(
            c.query("strict", &QueryRequest::new("idd == 1")),
            Err(VecDocsError::Field(_))
        ));
        assert!(matches!(
            c.delete("strict", None, "idd in [1]"),
            Err(VecDocsError::Field(_))
        ));
        let req = SearchRequest::new("vector", vec![vec![1.0, 0.0]]).with_filter("$meta[\"x\"] == 1");
        assert!(matches!(c.search("strict", &req), Err(VecDocsError::Field(_))));
        assert_eq!(c.get_collection_stats("strict").unwrap(), 1);

        // Known fields still work
        assert_eq!(c.delete("strict", None, "id in [1]").unwrap().delete_count, 1);
    }

    #[test]
    fn test_filter_unknown_names_are_dynamic_keys() {
        let mut c = client();
        quick_setup(&mut c);
        let rs = c
            .query("quick_setup", &QueryRequest::new("size > 1"))
            .unwrap();
        assert!(rs.iter().all(Column::is_empty));
    }

    #[test]
    fn test_named_and_scalar_indexes() {
        let mut c = client();
        let schema = CollectionSchema::new("indexed")
            .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
            .with_field(FieldSchema::new("vector", DataType::FloatVector).with_dim(2));
        c.create_collection(schema, 1).unwrap();

        let vector_index = IndexParams::auto_index(MetricType::Cosine).with_index_name("vector_index");
        c.create_index("indexed", "vector", vector_index).unwrap();
        c.create_index(
            "indexed",
            "id",
            IndexParams::scalar(IndexType::StlSort).with_index_name("primary_field_index"),
        )
        .unwrap();

        assert_eq!(
            c.list_indexes("indexed").unwrap(),
            vec!["primary_field_index".to_string(), "vector_index".to_string()]
        );
        let desc = c.describe_index("indexed", "primary_field_index").unwrap();
        assert_eq!(desc.field_name, "id");
        assert_eq!(desc.metric_type, None);
        assert!(matches!(
            c.describe_index("indexed", "vector"),
            Err(VecDocsError::IndexNotFound(_))
        ));

        // Names are unique per collection and a metric needs a vector field
        let clash = IndexParams::scalar(IndexType::Inverted).with_index_name("vector_index");
        assert!(matches!(
            c.create_index("indexed", "id", clash),
            Err(VecDocsError::IndexExists(_))
        ));
        assert!(c
            .create_index("indexed", "id", IndexParams::auto_index(MetricType::L2))
            .is_err());

        c.load_collection("indexed").unwrap();
        let req = SearchRequest::new("vector", vec![vec![1.0, 0.0]]);
        c.search("indexed", &req).unwrap();

        c.release_collection("indexed").unwrap();
        c.drop_index("indexed", "vector_index").unwrap();
        c.drop_index("indexed", "primary_field_index").unwrap();
        assert!(c.list_indexes("indexed").unwrap().is_empty());
    }
}
