// VecDocs — example/use_json_field.rs
// Keep article attributes in one JSON field and filter on its keys.
// Run with:  vecdocs run example/use_json_field.rs --env .env

use serde::{Deserialize, Serialize};

use vecdocs::client::{QueryRequest, SearchRequest};
use vecdocs::{
    result_set_to_json, results_to_json, ClientConfig, CollectionSchema, DataType, FieldSchema,
    IndexParams, LocalClient, MetricType, VectorClient,
};

const CLUSTER_ENDPOINT: &str = "YOUR_CLUSTER_ENDPOINT";
const TOKEN: &str = "YOUR_CLUSTER_TOKEN";
const COLLECTION_NAME: &str = "medium_articles_with_json_field";
const DATA_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/medium_articles_2020_sample.json");

#[derive(Debug, Deserialize)]
struct DatasetRow {
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
    rows: Vec<DatasetRow>,
}

#[derive(Debug, Serialize)]
struct ArticleMeta {
    link: String,
    reading_time: i64,
    publication: String,
    claps: i64,
    responses: i64,
}

#[derive(Debug, Serialize)]
struct Row {
    id: i64,
    title: String,
    title_vector: Vec<f32>,
    article_meta: ArticleMeta,
}

impl From<DatasetRow> for Row {
    fn from(r: DatasetRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            title_vector: r.title_vector,
            article_meta: ArticleMeta {
                link: r.link,
                reading_time: r.reading_time,
                publication: r.publication,
                claps: r.claps,
                responses: r.responses,
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut client = LocalClient::connect(&ClientConfig::new(CLUSTER_ENDPOINT, TOKEN))?;

    // 1. Schema with a JSON field
    let schema = CollectionSchema::new(COLLECTION_NAME)
        .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
        .with_field(FieldSchema::new("title", DataType::VarChar).with_max_length(512))
        .with_field(FieldSchema::new("title_vector", DataType::FloatVector).with_dim(8))
        .with_field(FieldSchema::new("article_meta", DataType::Json));

    client.create_collection(schema, 1)?;

    let index = IndexParams::auto_index(MetricType::L2);

    println!("{}", index.type_name());

    client.create_index(COLLECTION_NAME, "title_vector", index)?;
    client.load_collection(COLLECTION_NAME)?;

    println!("Loading progress: {}", client.get_loading_progress(COLLECTION_NAME)?);

    // 2. Nest the scalar attributes under `article_meta`
    let data: Dataset = serde_json::from_str(&std::fs::read_to_string(DATA_FILE)?)?;
    let query_vector = data.rows[0].title_vector.clone();
    let rows: Vec<Row> = data.rows.into_iter().map(Row::from).collect();

    println!("Dataset loaded, row number: {}", rows.len());

    let res = client.insert_rows(COLLECTION_NAME, None, &rows)?;

    println!("Inserted entities: {}", res.insert_count);

    // 3. Filter on JSON keys
    let request = SearchRequest::new("title_vector", vec![query_vector])
        .with_metric(MetricType::L2)
        .with_top_k(5)
        .with_filter("article_meta['claps'] > 30 and article_meta['reading_time'] < 10")
        .with_output_fields(["id", "title", "article_meta"]);

    let results = client.search(COLLECTION_NAME, &request)?;

    println!("{}", results_to_json(&results));

    // 4. Query on a string key of the JSON field
    let query = QueryRequest::new(r#"article_meta["publication"] == "Better Humans""#)
        .with_output_fields(["title", "article_meta"])
        .with_limit(2);

    let result_set = client.query(COLLECTION_NAME, &query)?;

    println!("{}", result_set_to_json(&result_set, false));

    client.drop_collection(COLLECTION_NAME)?;

    println!("Collection dropped");

    Ok(())
}
