// VecDocs — example/upsert_entities.rs
// Insert articles, then upsert a changed copy of some and read them back.
// Run with:  vecdocs run example/upsert_entities.rs --env .env

use serde::{Deserialize, Serialize};

use vecdocs::client::SearchRequest;
use vecdocs::{
    result_set_to_json, results_to_json, ClientConfig, CollectionSchema, DataType, FieldSchema,
    IndexParams, LocalClient, MetricType, PrimaryKey, VectorClient,
};

const CLUSTER_ENDPOINT: &str = "YOUR_CLUSTER_ENDPOINT";
const TOKEN: &str = "YOUR_CLUSTER_TOKEN";
const COLLECTION_NAME: &str = "medium_articles_2020";
const DATA_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/medium_articles_2020_sample.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Article {
    id: i64,
    title: String,
    title_vector: Vec<f32>,
    link: String,
    reading_time: i64,
    publication: String,
    claps: i64,
    responses: i64,
}

#[derive(Debug, Deserialize)]
struct Dataset {
    rows: Vec<Article>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut client = LocalClient::connect(&ClientConfig::new(CLUSTER_ENDPOINT, TOKEN))?;

    let schema = CollectionSchema::new(COLLECTION_NAME)
        .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
        .with_field(FieldSchema::new("title", DataType::VarChar).with_max_length(512))
        .with_field(FieldSchema::new("title_vector", DataType::FloatVector).with_dim(8))
        .with_field(FieldSchema::new("link", DataType::VarChar).with_max_length(512))
        .with_field(FieldSchema::new("reading_time", DataType::Int64))
        .with_field(FieldSchema::new("publication", DataType::VarChar).with_max_length(512))
        .with_field(FieldSchema::new("claps", DataType::Int64))
        .with_field(FieldSchema::new("responses", DataType::Int64));

    client.create_collection(schema, 1)?;

    let index = IndexParams::auto_index(MetricType::L2);

    println!("{}", index.type_name());

    client.create_index(COLLECTION_NAME, "title_vector", index)?;
    client.load_collection(COLLECTION_NAME)?;

    println!("Loading progress: {}", client.get_loading_progress(COLLECTION_NAME)?);

    let data: Dataset = serde_json::from_str(&std::fs::read_to_string(DATA_FILE)?)?;

    println!("Dataset loaded, row number: {}", data.rows.len());

    let res = client.insert_rows(COLLECTION_NAME, None, &data.rows)?;

    println!("Inserted entities: {}", res.insert_count);

    // 1. Upsert the first three articles with new clap counts
    println!("Start upserting ...");

    let changed: Vec<Article> = data.rows[..3]
        .iter()
        .cloned()
        .map(|mut a| {
            a.claps += 10_000;
            a
        })
        .collect();

    let res = client.upsert_rows(COLLECTION_NAME, None, &changed)?;

    println!("Upserted entities: {}", res.upsert_count);

    println!("Entity count: {}", client.get_collection_stats(COLLECTION_NAME)?);

    // 2. Upserted rows replace the originals
    let ids: Vec<PrimaryKey> = changed.iter().map(|a| PrimaryKey::Int64(a.id)).collect();

    let result_set = client.get(COLLECTION_NAME, &ids, &["id", "claps"])?;

    println!("{}", result_set_to_json(&result_set, false));

    // 3. Search sees the new values
    println!("Start searching ...");

    let request = SearchRequest::new("title_vector", vec![data.rows[0].title_vector.clone()])
        .with_metric(MetricType::L2)
        .with_top_k(5)
        .with_filter("claps > 30 and reading_time < 10")
        .with_output_fields(["title", "claps", "reading_time"]);

    let results = client.search(COLLECTION_NAME, &request)?;

    println!("{}", results_to_json(&results));

    client.drop_collection(COLLECTION_NAME)?;

    println!("Collection dropped");

    Ok(())
}
