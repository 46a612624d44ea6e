// VecDocs — example/enable_dynamic_schema.rs
// Declare only the id, title and vector; every other article attribute
// is stored in the dynamic field and still filterable.
// Run with:  vecdocs run example/enable_dynamic_schema.rs --env .env

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

    // 1. A schema with three fields and the dynamic field enabled
    let schema = CollectionSchema::new(COLLECTION_NAME)
        .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
        .with_field(FieldSchema::new("title", DataType::VarChar).with_max_length(512))
        .with_field(FieldSchema::new("title_vector", DataType::FloatVector).with_dim(8))
        .with_dynamic_field(true);

    client.create_collection(schema, 1)?;

    let index = IndexParams::auto_index(MetricType::L2);

    println!("{}", index.type_name());

    client.create_index(COLLECTION_NAME, "title_vector", index)?;
    client.load_collection(COLLECTION_NAME)?;

    println!("Loading progress: {}", client.get_loading_progress(COLLECTION_NAME)?);

    // 2. Insert the articles; undeclared keys go to the dynamic field
    let data: Dataset = serde_json::from_str(&std::fs::read_to_string(DATA_FILE)?)?;

    println!("Dataset loaded, row number: {}", data.rows.len());

    let res = client.insert_rows(COLLECTION_NAME, None, &data.rows)?;

    println!("Inserted entities: {}", res.insert_count);

    // 3. Filter on dynamic keys and return them as output fields
    let request = SearchRequest::new("title_vector", vec![data.rows[0].title_vector.clone()])
        .with_metric(MetricType::L2)
        .with_top_k(5)
        .with_filter(r#"claps > 30 and publication in ["Towards Data Science", "The Startup"]"#)
        .with_output_fields(["title", "claps", "publication"]);

    let results = client.search(COLLECTION_NAME, &request)?;

    println!("{}", results_to_json(&results));

    // 4. The whole dynamic object is available as `$meta`
    let query = QueryRequest::new("responses >= 18")
        .with_output_fields(["title", "$meta"])
        .with_limit(3);

    let result_set = client.query(COLLECTION_NAME, &query)?;

    println!("{}", result_set_to_json(&result_set, false));

    // 5. Dynamic keys are addressable through `$meta[...]` too
    let query = QueryRequest::new(r#"$meta["reading_time"] > 13"#).with_output_fields(["reading_time"]);

    let result_set = client.query(COLLECTION_NAME, &query)?;

    println!("{}", result_set_to_json(&result_set, true));

    client.drop_collection(COLLECTION_NAME)?;

    println!("Collection dropped");

    Ok(())
}
