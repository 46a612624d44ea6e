// VecDocs — example/manage_indexes.rs
// Name indexes, index a scalar field, describe and drop them.
// Run with:  vecdocs run example/manage_indexes.rs --env .env

use vecdocs::{
    ClientConfig, CollectionSchema, DataType, FieldSchema, IndexParams, IndexType, LocalClient,
    MetricType, VectorClient,
};

const CLUSTER_ENDPOINT: &str = "YOUR_CLUSTER_ENDPOINT";
const TOKEN: &str = "YOUR_CLUSTER_TOKEN";
const COLLECTION_NAME: &str = "customized_setup";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // 1. Set up a client
    let mut client = LocalClient::connect(&ClientConfig::new(CLUSTER_ENDPOINT, TOKEN))?;

    // 2. Create a collection without indexes
    let schema = CollectionSchema::new(COLLECTION_NAME)
        .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
        .with_field(FieldSchema::new("vector", DataType::FloatVector).with_dim(5))
        .with_dynamic_field(true);

    client.create_collection(schema, 1)?;

    // 3. Index the vector field and the primary key, each under its own name
    let vector_index = IndexParams::auto_index(MetricType::Cosine).with_index_name("vector_index");
    let scalar_index = IndexParams::scalar(IndexType::AutoIndex).with_index_name("primary_field_index");

    client.create_index(COLLECTION_NAME, "vector", vector_index)?;
    client.create_index(COLLECTION_NAME, "id", scalar_index)?;

    // 4. List and describe
    let names = client.list_indexes(COLLECTION_NAME)?;

    println!("{}", serde_json::to_string(&names)?);

    let desc = client.describe_index(COLLECTION_NAME, "primary_field_index")?;

    println!("{}", serde_json::to_string(&desc)?);

    let desc = client.describe_index(COLLECTION_NAME, "vector_index")?;

    println!("{}", serde_json::to_string(&desc)?);

    // 5. A metric on a scalar field is refused
    let bad = client.create_index(
        COLLECTION_NAME,
        "id",
        IndexParams::auto_index(MetricType::L2).with_index_name("bad_index"),
    );

    println!("Metric on a scalar field rejected: {}", bad.is_err());

    // 6. Drop the indexes by name
    client.drop_index(COLLECTION_NAME, "vector_index")?;
    client.drop_index(COLLECTION_NAME, "primary_field_index")?;

    println!("{}", serde_json::to_string(&client.list_indexes(COLLECTION_NAME)?)?);

    // 7. Drop the collection
    client.drop_collection(COLLECTION_NAME)?;

    Ok(())
}
