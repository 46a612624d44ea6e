// VecDocs — example/search_query_iterators.rs
// Page through large query and search results in fixed-size batches.
// Run with:  vecdocs run example/search_query_iterators.rs --env .env

use serde::{Deserialize, Serialize};
use serde_json::json;

use vecdocs::client::{QueryRequest, SearchRequest};
use vecdocs::data::PrimaryKey;
use vecdocs::{
    ClientConfig, CollectionSchema, DataType, FieldSchema, IndexParams, LocalClient, MetricType,
    VectorClient,
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

    // 1. A fixed schema; filters may only read these fields
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
    client.create_index(COLLECTION_NAME, "title_vector", IndexParams::auto_index(MetricType::L2))?;
    client.load_collection(COLLECTION_NAME)?;

    // 2. Insert the sample
    let data: Dataset = serde_json::from_str(&std::fs::read_to_string(DATA_FILE)?)?;
    let res = client.insert_rows(COLLECTION_NAME, None, &data.rows)?;

    println!("Data inserted successfully! inserted rows: {}", res.insert_count);

    // 3. Query in batches of 10
    let query = QueryRequest::new("reading_time >= 5").with_output_fields(["reading_time"]);
    let batches = client
        .query_iterator(COLLECTION_NAME, &query, 10)?
        .collect::<Result<Vec<_>, _>>()?;
    let sizes: Vec<usize> = batches.iter().map(|b| b[0].len()).collect();

    println!("{}", json!({"batches": batches.len(), "sizes": sizes}));

    // 4. Search the 25 nearest articles in batches of 10
    let search = SearchRequest::new("title_vector", vec![data.rows[0].title_vector.clone()])
        .with_top_k(25)
        .with_output_fields(["title"]);
    let pages = client
        .search_iterator(COLLECTION_NAME, &search, 10)?
        .collect::<Result<Vec<_>, _>>()?;
    let paged: Vec<PrimaryKey> = pages.iter().flat_map(|p| p.ids.clone()).collect();

    println!("{}", json!({"pages": pages.iter().map(|p| p.result_count).collect::<Vec<_>>()}));

    // 5. The pages join up to the one-shot result
    let single = client.search(COLLECTION_NAME, &search)?;

    println!("Paged ids match a single search: {}", paged == single[0].ids);

    // 6. A filter on an unknown field fails: the dynamic field is disabled
    let typo = client.query(COLLECTION_NAME, &QueryRequest::new("reading_tim > 5"));

    println!("{}", json!({"rejected": typo.is_err()}));

    client.drop_collection(COLLECTION_NAME)?;

    Ok(())
}
