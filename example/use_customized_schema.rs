// VecDocs — example/use_customized_schema.rs
// Define every field of the article dataset explicitly, then search it
// with a series of scalar filters.
// Run with:  vecdocs run example/use_customized_schema.rs --env .env

use serde::{Deserialize, Serialize};

use vecdocs::client::{QueryRequest, SearchRequest};
use vecdocs::{
    result_set_to_json, results_to_json, ClientConfig, CollectionSchema, DataType, FieldSchema,
    IndexParams, LocalClient, MetricType, VectorClient,
};

const CLUSTER_ENDPOINT: &str = "YOUR_CLUSTER_ENDPOINT";
const TOKEN: &str = "YOUR_CLUSTER_TOKEN";
const COLLECTION_NAME: &str = "medium_articles_2020";
const DATA_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/medium_articles_2020_sample.json");

// The primary key is generated, so rows carry no id.
#[derive(Debug, Serialize, Deserialize)]
struct Article {
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

    // 1. Connect to cluster
    let mut client = LocalClient::connect(&ClientConfig::new(CLUSTER_ENDPOINT, TOKEN))?;

    // 2. Define the fields and create the collection
    let schema = CollectionSchema::new(COLLECTION_NAME)
        .with_auto_id(true)
        .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
        .with_field(FieldSchema::new("title", DataType::VarChar).with_max_length(512))
        .with_field(FieldSchema::new("title_vector", DataType::FloatVector).with_dim(8))
        .with_field(FieldSchema::new("link", DataType::VarChar).with_max_length(512))
        .with_field(FieldSchema::new("reading_time", DataType::Int64))
        .with_field(FieldSchema::new("publication", DataType::VarChar).with_max_length(512))
        .with_field(FieldSchema::new("claps", DataType::Int64))
        .with_field(FieldSchema::new("responses", DataType::Int64));

    client.create_collection(schema, 2)?;

    // 3. Index the vector field
    let index = IndexParams::auto_index(MetricType::L2);

    println!("{}", index.type_name());

    client.create_index(COLLECTION_NAME, "title_vector", index)?;

    // 4. Load and check progress
    client.load_collection(COLLECTION_NAME)?;

    let progress = client.get_loading_progress(COLLECTION_NAME)?;

    println!("Loading progress: {}", progress);

    // 5. Read the dataset
    let data: Dataset = serde_json::from_str(&std::fs::read_to_string(DATA_FILE)?)?;

    println!("Dataset loaded, row number: {}", data.rows.len());

    // 6. Insert
    println!("Start inserting ...");

    let res = client.insert_rows(COLLECTION_NAME, None, &data.rows)?;

    println!("Inserted entities: {}", res.insert_count);

    // 7. Search, with and without filters
    println!("Start searching ...");

    let query_vector = data.rows[0].title_vector.clone();

    let search = |filter: &str, output_fields: [&str; 3]| -> anyhow::Result<String> {
        let request = SearchRequest::new("title_vector", vec![query_vector.clone()])
            .with_metric(MetricType::L2)
            .with_top_k(5)
            .with_filter(filter)
            .with_output_fields(output_fields);
        Ok(results_to_json(&client.search(COLLECTION_NAME, &request)?))
    };

    println!("{}", search("", ["title", "claps", "reading_time"])?);

    println!("{}", search("claps > 400 and responses > 10", ["title", "claps", "responses"])?);

    println!("{}", search(r#"publication == "Towards Data Science""#, ["title", "publication", "claps"])?);

    let excluded = r#"publication not in ["Towards Data Science", "Better Humans"]"#;

    println!("{}", search(excluded, ["title", "publication", "claps"])?);

    println!("{}", search(r#"title like "Why%""#, ["title", "link", "claps"])?);

    // 8. Query with a range on reading time
    let query = QueryRequest::new("2 < reading_time < 5")
        .with_output_fields(["title", "reading_time"])
        .with_limit(5);

    let result_set = client.query(COLLECTION_NAME, &query)?;

    println!("{}", result_set_to_json(&result_set, false));

    // 9. Drop the collection
    client.drop_collection(COLLECTION_NAME)?;

    println!("Collection dropped");

    Ok(())
}
