// VecDocs — example/manage_partitions.rs
// Create, load, release and drop partitions.
// Run with:  vecdocs run example/manage_partitions.rs --env .env

use serde_json::json;

use vecdocs::client::QueryRequest;
use vecdocs::data::to_row;
use vecdocs::{
    result_set_to_json, ClientConfig, CollectionSchema, DataType, FieldSchema, IndexParams,
    LocalClient, MetricType, VectorClient,
};

const CLUSTER_ENDPOINT: &str = "YOUR_CLUSTER_ENDPOINT";
const TOKEN: &str = "YOUR_CLUSTER_TOKEN";
const COLLECTION_NAME: &str = "quick_setup";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut client = LocalClient::connect(&ClientConfig::new(CLUSTER_ENDPOINT, TOKEN))?;

    // 1. A loaded collection starts with one partition
    let schema = CollectionSchema::new(COLLECTION_NAME)
        .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
        .with_field(FieldSchema::new("vector", DataType::FloatVector).with_dim(5))
        .with_dynamic_field(true);

    client.create_collection(schema, 1)?;
    client.create_index(COLLECTION_NAME, "vector", IndexParams::auto_index(MetricType::IP))?;
    client.load_collection(COLLECTION_NAME)?;

    println!("{}", serde_json::to_string(&client.list_partitions(COLLECTION_NAME)?)?);

    // 2. Add partitions
    client.create_partition(COLLECTION_NAME, "partitionA")?;
    client.create_partition(COLLECTION_NAME, "partitionB")?;

    println!("{}", serde_json::to_string(&client.list_partitions(COLLECTION_NAME)?)?);

    println!("{}", client.has_partition(COLLECTION_NAME, "partitionA")?);

    println!("{}", client.has_partition(COLLECTION_NAME, "partitionC")?);

    // 3. Rows go to the partition they are inserted into
    let rows = (0..6)
        .map(|i| to_row(&json!({"id": i, "vector": [0.1 * i as f32, 0.2, 0.3, 0.4, 0.5], "tag": format!("t{}", i)})))
        .collect::<Result<Vec<_>, _>>()?;

    client.insert(COLLECTION_NAME, Some("partitionA"), rows[..3].to_vec())?;
    client.insert(COLLECTION_NAME, Some("partitionB"), rows[3..].to_vec())?;

    // 4. Partitions created after loading are not loaded yet
    let states = json!({
        "collection": client.get_load_state(COLLECTION_NAME, None)?,
        "partitionA": client.get_load_state(COLLECTION_NAME, Some("partitionA"))?,
    });

    println!("{}", states);

    // 5. Release everything, then load a single partition
    client.release_collection(COLLECTION_NAME)?;

    println!("{}", json!({"state": client.get_load_state(COLLECTION_NAME, None)?}));

    client.load_partitions(COLLECTION_NAME, &["partitionA"])?;

    let states = json!({
        "partitionA": client.get_load_state(COLLECTION_NAME, Some("partitionA"))?,
        "partitionB": client.get_load_state(COLLECTION_NAME, Some("partitionB"))?,
    });

    println!("{}", states);

    // 6. Queries only see loaded partitions
    let query = QueryRequest::new("id >= 0").with_output_fields(["tag"]);

    let result_set = client.query(COLLECTION_NAME, &query)?;

    println!("{}", result_set_to_json(&result_set, false));

    // 7. Release and drop a partition
    client.release_partitions(COLLECTION_NAME, &["partitionA"])?;
    client.drop_partition(COLLECTION_NAME, "partitionB")?;

    println!("{}", serde_json::to_string(&client.list_partitions(COLLECTION_NAME)?)?);

    client.drop_collection(COLLECTION_NAME)?;

    println!("Collection dropped");

    Ok(())
}
