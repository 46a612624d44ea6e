// VecDocs — example/conduct_range_search.rs
// Keep only hits whose distance falls inside a window.
// Run with:  vecdocs run example/conduct_range_search.rs --env .env --max-items 4

use serde::{Deserialize, Serialize};

use vecdocs::client::SearchRequest;
use vecdocs::{
    results_to_json, ClientConfig, CollectionSchema, DataType, FieldSchema, IndexParams,
    LocalClient, MetricType, VectorClient,
};

const CLUSTER_ENDPOINT: &str = "YOUR_CLUSTER_ENDPOINT";
const TOKEN: &str = "YOUR_CLUSTER_TOKEN";
const DATA_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/medium_articles_2020_sample.json");

#[derive(Debug, Serialize, Deserialize)]
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

fn create(client: &mut LocalClient, name: &str, metric: MetricType) -> anyhow::Result<()> {
    let schema = CollectionSchema::new(name)
        .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
        .with_field(FieldSchema::new("title_vector", DataType::FloatVector).with_dim(8))
        .with_dynamic_field(true);

    client.create_collection(schema, 1)?;
    client.create_index(name, "title_vector", IndexParams::auto_index(metric))?;
    client.load_collection(name)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut client = LocalClient::connect(&ClientConfig::new(CLUSTER_ENDPOINT, TOKEN))?;

    let data: Dataset = serde_json::from_str(&std::fs::read_to_string(DATA_FILE)?)?;

    println!("{}", serde_json::to_string(&data.rows[..2])?);

    let query_vector = data.rows[0].title_vector.clone();

    // 1. L2: keep 0.4 <= distance < 1.2
    create(&mut client, "articles_l2", MetricType::L2)?;

    let res = client.insert_rows("articles_l2", None, &data.rows)?;

    println!("Data inserted successfully! inserted rows: {}", res.insert_count);

    let request = SearchRequest::new("title_vector", vec![query_vector.clone()])
        .with_metric(MetricType::L2)
        .with_top_k(100)
        .with_param("nprobe", 10)
        .with_range(1.2, 0.4)
        .with_output_fields(["title"]);

    let results = client.search("articles_l2", &request)?;

    println!("{}", results_to_json(&results));

    // Every distance respects the window
    let within = results[0].scores.iter().all(|d| (0.4..1.2).contains(d));

    println!("All distances within [0.4, 1.2): {}", within);

    // 2. IP: keep 0.3 < similarity <= 0.9
    create(&mut client, "articles_ip", MetricType::IP)?;
    client.insert_rows("articles_ip", None, &data.rows)?;

    let request = SearchRequest::new("title_vector", vec![query_vector])
        .with_metric(MetricType::IP)
        .with_top_k(5)
        .with_range(0.3, 0.9)
        .with_output_fields(["title", "claps"]);

    let results = client.search("articles_ip", &request)?;

    println!("{}", results_to_json(&results));

    client.drop_collection("articles_l2")?;
    client.drop_collection("articles_ip")?;

    println!("Collections dropped");

    Ok(())
}
