// VecDocs — example/use_partition_key.rs
// Route articles to partitions by publication and search within one.
// Run with:  vecdocs run example/use_partition_key.rs --env .env

use serde::{Deserialize, Serialize};

use vecdocs::client::{QueryRequest, SearchRequest};
use vecdocs::{
    result_set_to_json, results_to_json, ClientConfig, CollectionSchema, DataType, FieldSchema,
    IndexParams, LocalClient, MetricType, VectorClient,
};

const CLUSTER_ENDPOINT: &str = "YOUR_CLUSTER_ENDPOINT";
const TOKEN: &str = "YOUR_CLUSTER_TOKEN";
const COLLECTION_NAME: &str = "medium_articles_with_partition_key";
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

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut client = LocalClient::connect(&ClientConfig::new(CLUSTER_ENDPOINT, TOKEN))?;

    // 1. `publication` is the partition key; partitions are created for us
    let schema = CollectionSchema::new(COLLECTION_NAME)
        .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
        .with_field(FieldSchema::new("title", DataType::VarChar).with_max_length(512))
        .with_field(FieldSchema::new("title_vector", DataType::FloatVector).with_dim(8))
        .with_field(FieldSchema::new("link", DataType::VarChar).with_max_length(512))
        .with_field(FieldSchema::new("reading_time", DataType::Int64))
        .with_field(
            FieldSchema::new("publication", DataType::VarChar)
                .with_max_length(512)
                .with_partition_key(true),
        )
        .with_field(FieldSchema::new("claps", DataType::Int64))
        .with_field(FieldSchema::new("responses", DataType::Int64))
        .with_num_partitions(16);

    client.create_collection(schema, 1)?;

    println!("Partitions: {}", client.list_partitions(COLLECTION_NAME)?.len());

    client.create_index(COLLECTION_NAME, "title_vector", IndexParams::auto_index(MetricType::L2))?;
    client.load_collection(COLLECTION_NAME)?;

    println!("Loading progress: {}", client.get_loading_progress(COLLECTION_NAME)?);

    // 2. Insert; each row lands in the partition its publication hashes to
    let data: Dataset = serde_json::from_str(&std::fs::read_to_string(DATA_FILE)?)?;

    let res = client.insert_rows(COLLECTION_NAME, None, &data.rows)?;

    println!("Inserted entities: {}", res.insert_count);

    // 3. Naming a partition explicitly is refused for partition-key collections
    let refused = client.insert_rows(COLLECTION_NAME, Some("_default_0"), &data.rows[..1]);

    println!("Insert into a named partition refused: {}", refused.is_err());

    // 4. Filtering on the partition key narrows the search to its partitions
    let request = SearchRequest::new("title_vector", vec![data.rows[0].title_vector.clone()])
        .with_metric(MetricType::L2)
        .with_top_k(5)
        .with_filter(r#"publication == "Towards Data Science" and claps > 100"#)
        .with_output_fields(["title", "publication", "claps"]);

    let results = client.search(COLLECTION_NAME, &request)?;

    println!("{}", results_to_json(&results));

    let query = QueryRequest::new(r#"publication in ["Dataseries", "The Innovation"] and reading_time > 10"#)
        .with_output_fields(["title", "publication"]);

    let result_set = client.query(COLLECTION_NAME, &query)?;

    println!("{}", result_set_to_json(&result_set, false));

    client.drop_collection(COLLECTION_NAME)?;

    println!("Collection dropped");

    Ok(())
}
