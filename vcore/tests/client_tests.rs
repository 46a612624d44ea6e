// VecDocs — tests/client_tests.rs
// End-to-end collection workflows driven through the VectorClient interface.
// Author: d65v <https://github.com/d65v>

use serde::Serialize;
use serde_json::{json, Value};

use vecdocs::client::{QueryRequest, SearchRequest};
use vecdocs::schema::LoadState;
use vecdocs::{
    result_set_to_json, results_to_json, ClientConfig, CollectionSchema, DataType, FieldSchema,
    IndexParams, LocalClient, MetricType, PrimaryKey, VecDocsError, VectorClient,
};

#[derive(Serialize)]
struct Item {
    id: i64,
    vector: Vec<f32>,
    color: String,
}

fn items() -> Vec<Item> {
    vec![
        Item { id: 0, vector: vec![1.0, 0.0, 0.0], color: "pink_8682".into() },
        Item { id: 1, vector: vec![0.0, 1.0, 0.0], color: "red_7025".into() },
        Item { id: 2, vector: vec![0.9, 0.1, 0.0], color: "orange_6781".into() },
        Item { id: 3, vector: vec![0.0, 0.0, 1.0], color: "pink_9298".into() },
    ]
}

/// Create, index, load and fill a dynamic collection on any client.
fn setup<C: VectorClient>(client: &mut C, name: &str, metric: MetricType) {
    let schema = CollectionSchema::new(name)
        .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
        .with_field(FieldSchema::new("vector", DataType::FloatVector).with_dim(3))
        .with_dynamic_field(true);
    client.create_collection(schema, 1).unwrap();
    client
        .create_index(name, "vector", IndexParams::auto_index(metric))
        .unwrap();
    client.load_collection(name).unwrap();
    let res = client.insert_rows(name, None, &items()).unwrap();
    assert_eq!(res.insert_count, 4);
}

fn connect() -> LocalClient {
    LocalClient::connect(&ClientConfig::new("http://localhost:19530", "root:Milvus")).unwrap()
}

#[test]
fn test_quick_start_workflow() {
    let mut client = connect();
    setup(&mut client, "quick_setup", MetricType::IP);

    assert_eq!(
        client.get_load_state("quick_setup", None).unwrap(),
        LoadState::Loaded
    );
    assert_eq!(client.get_collection_stats("quick_setup").unwrap(), 4);

    let request = SearchRequest::new("vector", vec![vec![1.0, 0.0, 0.0]])
        .with_top_k(2)
        .with_output_fields(["color"]);
    let results = client.search("quick_setup", &request).unwrap();
    let out: Value = serde_json::from_str(&results_to_json(&results)).unwrap();

    assert_eq!(out[0]["counts"], json!(2));
    assert_eq!(out[0]["rows"], json!([{"color": "pink_8682"}, {"color": "orange_6781"}]));
    assert_eq!(out[0]["distances"][0], json!(1.0));

    client.drop_collection("quick_setup").unwrap();
    assert!(!client.has_collection("quick_setup").unwrap());
}

#[test]
fn test_filtered_search_and_query() {
    let mut client = connect();
    setup(&mut client, "colors", MetricType::L2);

    let request = SearchRequest::new("vector", vec![vec![1.0, 0.0, 0.0]])
        .with_top_k(5)
        .with_filter(r#"color like "pink%""#)
        .with_output_fields(["id", "color"]);
    let results = client.search("colors", &request).unwrap();
    assert_eq!(results[0].ids, vec![PrimaryKey::Int64(0), PrimaryKey::Int64(3)]);
    assert!(results[0].scores[0] <= results[0].scores[1]);

    let query = QueryRequest::new("id in [1, 2]").with_output_fields(["color"]);
    let result_set = client.query("colors", &query).unwrap();
    assert_eq!(
        result_set_to_json(&result_set, false),
        r#"[{"color":"red_7025","id":1},{"color":"orange_6781","id":2}]"#
    );
}

#[test]
fn test_multiple_query_vectors_keep_their_own_rows() {
    let mut client = connect();
    setup(&mut client, "multi", MetricType::IP);

    let request = SearchRequest::new("vector", vec![vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]])
        .with_top_k(1)
        .with_output_fields(["color"]);
    let results = client.search("multi", &request).unwrap();
    let out: Value = serde_json::from_str(&results_to_json(&results)).unwrap();

    assert_eq!(out.as_array().unwrap().len(), 2);
    assert_eq!(out[0]["rows"], json!([{"color": "red_7025"}]));
    assert_eq!(out[1]["rows"], json!([{"color": "pink_9298"}]));
}

#[test]
fn test_upsert_then_delete() {
    let mut client = connect();
    setup(&mut client, "mutations", MetricType::L2);

    let replacement = vec![Item { id: 1, vector: vec![0.5, 0.5, 0.0], color: "black_1111".into() }];
    let res = client.upsert_rows("mutations", None, &replacement).unwrap();
    assert_eq!(res.upsert_count, 1);

    let got = client
        .get("mutations", &[PrimaryKey::Int64(1)], &["color"])
        .unwrap();
    assert_eq!(result_set_to_json(&got, false), r#"[{"color":"black_1111","id":1}]"#);

    let res = client.delete("mutations", None, r#"color like "pink%""#).unwrap();
    assert_eq!(res.delete_count, 2);
    assert_eq!(client.get_collection_stats("mutations").unwrap(), 2);
}

#[test]
fn test_released_collection_refuses_reads() {
    let mut client = connect();
    setup(&mut client, "released", MetricType::IP);
    client.release_collection("released").unwrap();

    assert_eq!(
        client.get_load_state("released", None).unwrap(),
        LoadState::NotLoad
    );
    let request = SearchRequest::new("vector", vec![vec![1.0, 0.0, 0.0]]);
    assert!(client.search("released", &request).is_err());
    assert!(client
        .query("released", &QueryRequest::new("id > 0"))
        .is_err());
}

#[test]
fn test_alias_resolves_for_reads() {
    let mut client = connect();
    setup(&mut client, "aliased", MetricType::IP);
    client.create_alias("aliased", "prod").unwrap();

    let query = QueryRequest::new("id == 3").with_output_fields(["color"]);
    let result_set = client.query("prod", &query).unwrap();
    assert_eq!(result_set_to_json(&result_set, false), r#"[{"color":"pink_9298","id":3}]"#);
    assert_eq!(client.describe_alias("prod").unwrap(), "aliased");
}

#[test]
fn test_offset_skips_leading_hits() {
    let mut client = connect();
    setup(&mut client, "paged", MetricType::L2);

    // Full ranking for [1, 0, 0] is 0, 2, then 1 and 3 tied in insertion order
    let request = SearchRequest::new("vector", vec![vec![1.0, 0.0, 0.0]])
        .with_top_k(2)
        .with_offset(1);
    let results = client.search("paged", &request).unwrap();
    assert_eq!(results[0].ids, vec![PrimaryKey::Int64(2), PrimaryKey::Int64(1)]);

    let query = QueryRequest::new("id >= 0").with_offset(2).with_limit(5);
    let result_set = client.query("paged", &query).unwrap();
    assert_eq!(result_set_to_json(&result_set, false), r#"[{"id":2},{"id":3}]"#);
}

#[test]
fn test_partition_restricted_reads() {
    let mut client = connect();
    setup(&mut client, "parted", MetricType::IP);
    client.create_partition("parted", "partitionA").unwrap();
    let extra = vec![Item { id: 10, vector: vec![1.0, 0.0, 0.0], color: "green_1".into() }];
    client.insert_rows("parted", Some("partitionA"), &extra).unwrap();

    // A partition created after load starts released
    let in_a = SearchRequest::new("vector", vec![vec![1.0, 0.0, 0.0]])
        .with_top_k(3)
        .with_partitions(["partitionA"]);
    assert!(matches!(
        client.search("parted", &in_a),
        Err(VecDocsError::CollectionNotLoaded(_))
    ));
    assert!(client
        .query("parted", &QueryRequest::new("id >= 0").with_partitions(["partitionA"]))
        .is_err());

    client.load_partitions("parted", &["partitionA"]).unwrap();
    let results = client.search("parted", &in_a).unwrap();
    assert_eq!(results[0].ids, vec![PrimaryKey::Int64(10)]);

    let in_default = QueryRequest::new("id >= 0").with_partitions(["_default"]);
    assert_eq!(client.query("parted", &in_default).unwrap()[0].len(), 4);

    client.release_partitions("parted", &["partitionA"]).unwrap();
    assert!(client.search("parted", &in_a).is_err());
}

#[test]
fn test_range_search_keeps_window() {
    let mut client = connect();
    setup(&mut client, "ranged", MetricType::IP);

    // IP scores against [1, 0, 0]: id 0 → 1.0, id 2 → 0.9, ids 1 and 3 → 0.0
    let request = SearchRequest::new("vector", vec![vec![1.0, 0.0, 0.0]])
        .with_top_k(4)
        .with_range(0.5, 0.95);
    let results = client.search("ranged", &request).unwrap();

    assert_eq!(results[0].ids, vec![PrimaryKey::Int64(2)]);
    assert!(results[0].scores.iter().all(|s| *s > 0.5 && *s <= 0.95));

    let wide = SearchRequest::new("vector", vec![vec![1.0, 0.0, 0.0]])
        .with_top_k(4)
        .with_range(-0.5, 1.0);
    let results = client.search("ranged", &wide).unwrap();
    assert_eq!(results[0].result_count, 4);
}

#[derive(Serialize)]
struct Tenant {
    id: i64,
    vector: Vec<f32>,
    tenant: String,
}

#[test]
fn test_upsert_on_partition_key_collection() {
    let mut client = connect();
    let schema = CollectionSchema::new("tenants")
        .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
        .with_field(FieldSchema::new("vector", DataType::FloatVector).with_dim(3))
        .with_field(
            FieldSchema::new("tenant", DataType::VarChar)
                .with_max_length(32)
                .with_partition_key(true),
        )
        .with_num_partitions(4);
    client.create_collection(schema, 1).unwrap();
    client
        .create_index("tenants", "vector", IndexParams::auto_index(MetricType::L2))
        .unwrap();
    client.load_collection("tenants").unwrap();

    let rows: Vec<Tenant> = (0..6)
        .map(|i| Tenant {
            id: i,
            vector: vec![i as f32, 0.0, 0.0],
            tenant: format!("tenant_{}", i % 3),
        })
        .collect();
    client.insert_rows("tenants", None, &rows).unwrap();

    // The row may move to another partition; it must not be duplicated
    let moved = vec![Tenant { id: 1, vector: vec![9.0, 0.0, 0.0], tenant: "tenant_2".into() }];
    let res = client.upsert_rows("tenants", None, &moved).unwrap();
    assert_eq!(res.upsert_count, 1);
    assert_eq!(client.get_collection_stats("tenants").unwrap(), 6);

    let got = client
        .get("tenants", &[PrimaryKey::Int64(1)], &["tenant"])
        .unwrap();
    assert_eq!(result_set_to_json(&got, false), r#"[{"id":1,"tenant":"tenant_2"}]"#);

    let query = QueryRequest::new(r#"tenant == "tenant_2""#);
    assert_eq!(client.query("tenants", &query).unwrap()[0].len(), 3);

    assert!(client
        .upsert_rows("tenants", Some("_default"), &moved)
        .is_err());
}
