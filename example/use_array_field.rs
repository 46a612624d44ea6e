// VecDocs — example/use_array_field.rs
// Store integer arrays and filter with element access and the ARRAY_*
// functions.
// Run with:  vecdocs run example/use_array_field.rs --env .env

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::json;

use vecdocs::client::{QueryRequest, SearchRequest};
use vecdocs::{
    result_set_to_json, results_to_json, ClientConfig, CollectionSchema, DataType, FieldSchema,
    IndexParams, IndexType, LocalClient, MetricType, VectorClient,
};

const CLUSTER_ENDPOINT: &str = "YOUR_CLUSTER_ENDPOINT";
const TOKEN: &str = "YOUR_CLUSTER_TOKEN";
const COLLECTION_NAME: &str = "test_collection";

#[derive(Debug, Serialize)]
struct Row {
    id: i64,
    vector: Vec<f32>,
    color: String,
    color_tag: i64,
    color_coord: Vec<i64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut client = LocalClient::connect(&ClientConfig::new(CLUSTER_ENDPOINT, TOKEN))?;

    // 1. `color_coord` holds up to five integers
    let schema = CollectionSchema::new(COLLECTION_NAME)
        .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
        .with_field(FieldSchema::new("vector", DataType::FloatVector).with_dim(5))
        .with_field(FieldSchema::new("color", DataType::VarChar).with_max_length(512))
        .with_field(FieldSchema::new("color_tag", DataType::Int64))
        .with_field(
            FieldSchema::new("color_coord", DataType::Array)
                .with_element_type(DataType::Int64)
                .with_max_capacity(5),
        );

    client.create_collection(schema, 1)?;

    let index = IndexParams::new(IndexType::IvfFlat, MetricType::L2).with_param("nlist", 1024);
    client.create_index(COLLECTION_NAME, "vector", index)?;
    client.load_collection(COLLECTION_NAME)?;

    println!("{}", json!({"state": client.get_load_state(COLLECTION_NAME, None)?}));

    // 2. Random rows with three to five coordinates each
    let colors = ["green", "blue", "yellow", "red", "black", "white", "purple", "pink", "orange", "brown", "grey"];
    let mut rng = StdRng::seed_from_u64(42);

    let rows: Vec<Row> = (0..1000)
        .map(|i| {
            let n = rng.gen_range(3..=5);
            Row {
                id: i,
                vector: (0..5).map(|_| rng.gen_range(-1.0..1.0)).collect(),
                color: colors[rng.gen_range(0..colors.len())].to_string(),
                color_tag: rng.gen_range(1000..=9999),
                color_coord: (0..n).map(|_| rng.gen_range(0..=40)).collect(),
            }
        })
        .collect();

    println!("{}", serde_json::to_string(&rows[0])?);

    let res = client.insert_rows(COLLECTION_NAME, None, &rows)?;

    println!("Inserted entities: {}", res.insert_count);

    // 3. Arrays longer than max_capacity are rejected
    let too_long = Row {
        id: 1000,
        vector: vec![0.0; 5],
        color: "red".into(),
        color_tag: 1000,
        color_coord: vec![1, 2, 3, 4, 5, 6],
    };

    println!("Over-capacity insert refused: {}", client.insert_rows(COLLECTION_NAME, None, &[too_long]).is_err());

    // 4. Search with filters on the array
    let query_vector: Vec<f32> = (0..5).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let output_fields = ["id", "color", "color_tag", "color_coord"];

    let search = |filter: &str| -> anyhow::Result<String> {
        let request = SearchRequest::new("vector", vec![query_vector.clone()])
            .with_metric(MetricType::L2)
            .with_top_k(3)
            .with_param("nprobe", 16)
            .with_filter(filter)
            .with_output_fields(output_fields);
        Ok(results_to_json(&client.search(COLLECTION_NAME, &request)?))
    };

    println!("{}", search("color_coord[0] < 10")?);

    println!("{}", search("color_coord[0] in [7, 8, 9]")?);

    println!("{}", search("ARRAY_CONTAINS(color_coord, 10)")?);

    println!("{}", search("ARRAY_CONTAINS_ALL(color_coord, [7, 8])")?);

    println!("{}", search("ARRAY_CONTAINS_ANY(color_coord, [7, 8, 9])")?);

    println!("{}", search("ARRAY_LENGTH(color_coord) == 4")?);

    // 5. Query with an array filter
    let query = QueryRequest::new("ARRAY_LENGTH(color_coord) == 3 and color_coord[2] > 38")
        .with_output_fields(["color", "color_coord"]);

    let result_set = client.query(COLLECTION_NAME, &query)?;

    println!("{}", result_set_to_json(&result_set, false));

    client.drop_collection(COLLECTION_NAME)?;

    println!("Collection dropped");

    Ok(())
}
