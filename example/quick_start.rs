// VecDocs — example/quick_start.rs
// Create a collection with a dynamic field, insert, search, query, get,
// delete and drop.
// Run with:  vecdocs run example/quick_start.rs --env .env

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use vecdocs::client::{QueryRequest, SearchRequest};
use vecdocs::{
    result_set_to_json, results_to_json, ClientConfig, CollectionSchema, DataType, FieldSchema,
    IndexParams, LocalClient, MetricType, PrimaryKey, VectorClient,
};

const CLUSTER_ENDPOINT: &str = "YOUR_CLUSTER_ENDPOINT";
const TOKEN: &str = "YOUR_CLUSTER_TOKEN";

#[derive(Serialize)]
struct Row {
    id: i64,
    vector: Vec<f32>,
    color: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // 1. Connect to cluster
    let mut client = LocalClient::connect(&ClientConfig::new(CLUSTER_ENDPOINT, TOKEN))?;

    println!("Connected to the vector database");

    // 2. Create a collection; `color` lands in the dynamic field
    let collection_name = "quick_setup";

    let schema = CollectionSchema::new(collection_name)
        .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
        .with_field(FieldSchema::new("vector", DataType::FloatVector).with_dim(5))
        .with_dynamic_field(true);

    client.create_collection(schema, 1)?;

    println!("Collection created");

    // 3. Index and load
    client.create_index(collection_name, "vector", IndexParams::auto_index(MetricType::IP))?;

    println!("Index created");

    client.load_collection(collection_name)?;

    println!("Collection loaded");

    // 4. Insert a few known rows
    let rows = vec![
        Row { id: 0, vector: vec![0.35803765, -0.6023496, 0.18414013, -0.26286206, 0.90294385], color: "pink_8682".into() },
        Row { id: 1, vector: vec![0.19886813, 0.060235605, 0.6976963, 0.26144746, 0.8387295], color: "red_7025".into() },
        Row { id: 2, vector: vec![0.43742132, -0.55975026, 0.6457888, 0.7894059, 0.20785794], color: "orange_6781".into() },
        Row { id: 3, vector: vec![0.29233242, -0.14941247, 0.5195221, -0.80153656, 0.12919048], color: "blue_5452".into() },
        Row { id: 4, vector: vec![0.6222862, -0.7742882, 0.13988419, -0.15623474, 0.17225647], color: "green_4620".into() },
    ];

    let res = client.insert_rows(collection_name, None, &rows)?;

    println!("Insert counts: {}", res.insert_count);

    // 5. Insert more rows with random vectors
    let colors = ["green", "blue", "yellow", "red", "black", "white", "purple", "pink", "orange", "brown", "grey"];
    let mut rng = StdRng::seed_from_u64(19530);

    let rows: Vec<Row> = (5..1000)
        .map(|i| Row {
            id: i,
            vector: (0..5).map(|_| rng.gen::<f32>()).collect(),
            color: format!("{}_{}", colors[rng.gen_range(0..colors.len())], rng.gen_range(1000..10000)),
        })
        .collect();

    let res = client.insert_rows(collection_name, None, &rows)?;

    println!("Insert counts: {}", res.insert_count);

    // 6. Single-vector search
    let query_vector = vec![0.35803765, -0.6023496, 0.18414013, -0.26286206, 0.90294385];

    let request = SearchRequest::new("vector", vec![query_vector.clone()])
        .with_metric(MetricType::IP)
        .with_top_k(3)
        .with_output_fields(["id", "color"]);

    let results = client.search(collection_name, &request)?;

    println!("{}", results_to_json(&results));

    // 7. Bulk-vector search
    let query_vector2 = vec![0.19886813, 0.060235605, 0.6976963, 0.26144746, 0.8387295];

    let request = SearchRequest::new("vector", vec![query_vector.clone(), query_vector2])
        .with_metric(MetricType::IP)
        .with_top_k(3)
        .with_output_fields(["id", "color"]);

    let results = client.search(collection_name, &request)?;

    println!("{}", results_to_json(&results));

    // 8. Search with a filter on the primary key
    let request = SearchRequest::new("vector", vec![query_vector.clone()])
        .with_top_k(3)
        .with_filter("500 < id < 800")
        .with_output_fields(["id", "color"]);

    let results = client.search(collection_name, &request)?;

    println!("{}", results_to_json(&results));

    // 9. Search with a filter on a dynamic key
    let request = SearchRequest::new("vector", vec![query_vector])
        .with_top_k(3)
        .with_filter(r#"$meta["color"] like "red%""#)
        .with_output_fields(["id", "color"]);

    let results = client.search(collection_name, &request)?;

    println!("{}", results_to_json(&results));

    // 10. Query
    let query = QueryRequest::new("10 < id < 15").with_output_fields(["id", "color"]);

    let result_set = client.query(collection_name, &query)?;

    println!("{}", result_set_to_json(&result_set, true));

    let query = QueryRequest::new(r#"color like "brown_8%""#).with_output_fields(["id", "color"]);

    let result_set = client.query(collection_name, &query)?;

    println!("{}", result_set_to_json(&result_set, false));

    // 11. Get entities by primary key
    let ids: Vec<PrimaryKey> = (0..5).map(PrimaryKey::Int64).collect();

    let result_set = client.get(collection_name, &ids, &["id", "color"])?;

    println!("{}", result_set_to_json(&result_set, true));

    // 12. Delete by primary key, then by filter
    let res = client.delete_by_pks(collection_name, None, &ids)?;

    println!("Deleted by primary key: {}", res.delete_count);

    let res = client.delete(collection_name, None, "id in [5, 6, 7, 8, 9]")?;

    println!("Deleted by filter: {}", res.delete_count);

    println!("Entities left: {}", client.get_collection_stats(collection_name)?);

    // 13. Drop the collection
    client.drop_collection(collection_name)?;

    println!("Collection dropped");

    Ok(())
}
