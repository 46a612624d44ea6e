// VecDocs — example/manage_collections.rs
// Describe, rename, load, release, alias and drop collections.
// Run with:  vecdocs run example/manage_collections.rs --env .env

use serde_json::json;

use vecdocs::schema::IndexType;
use vecdocs::{
    ClientConfig, CollectionSchema, DataType, FieldSchema, IndexParams, LocalClient, MetricType,
    VectorClient,
};

const CLUSTER_ENDPOINT: &str = "YOUR_CLUSTER_ENDPOINT";
const TOKEN: &str = "YOUR_CLUSTER_TOKEN";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut client = LocalClient::connect(&ClientConfig::new(CLUSTER_ENDPOINT, TOKEN))?;

    // 1. A quick-setup collection and a customized one
    let quick = CollectionSchema::new("quick_setup")
        .with_field(FieldSchema::new("id", DataType::Int64).with_primary_key(true))
        .with_field(FieldSchema::new("vector", DataType::FloatVector).with_dim(5))
        .with_dynamic_field(true);

    client.create_collection(quick, 1)?;
    client.create_index("quick_setup", "vector", IndexParams::auto_index(MetricType::Cosine))?;
    client.load_collection("quick_setup")?;

    println!("{}", json!({"state": client.get_load_state("quick_setup", None)?}));

    let customized = CollectionSchema::new("customized_setup")
        .with_auto_id(false)
        .with_field(FieldSchema::new("my_id", DataType::Int64).with_primary_key(true))
        .with_field(FieldSchema::new("my_vector", DataType::FloatVector).with_dim(5))
        .with_field(FieldSchema::new("my_tag", DataType::VarChar).with_max_length(64));

    client.create_collection(customized, 2)?;

    println!("{}", json!({"state": client.get_load_state("customized_setup", None)?}));

    // 2. Index with explicit parameters, then describe it
    let index = IndexParams::new(IndexType::IvfFlat, MetricType::L2).with_param("nlist", 1024);
    client.create_index("customized_setup", "my_vector", index)?;

    println!("{}", serde_json::to_string(&client.describe_index("customized_setup", "my_vector")?)?);

    // 3. Describe and list
    let description = client.describe_collection("customized_setup")?;

    println!("{}", serde_json::to_string(&description)?);

    println!("{}", serde_json::to_string(&client.list_collections()?)?);

    // 4. Rename
    client.rename_collection("customized_setup", "customized_setup_renamed")?;

    println!("{}", serde_json::to_string(&client.list_collections()?)?);

    // 5. Load and release
    client.load_collection("customized_setup_renamed")?;

    println!("{}", json!({"state": client.get_load_state("customized_setup_renamed", None)?}));

    client.release_collection("customized_setup_renamed")?;

    println!("{}", json!({"state": client.get_load_state("customized_setup_renamed", None)?}));

    // 6. Aliases
    client.create_alias("customized_setup_renamed", "bob")?;
    client.create_alias("customized_setup_renamed", "alice")?;

    println!("{}", json!({"bob": client.describe_alias("bob")?}));

    println!("{}", serde_json::to_string(&client.list_aliases("customized_setup_renamed")?)?);

    client.alter_alias("quick_setup", "alice")?;

    println!("{}", serde_json::to_string(&client.list_aliases("quick_setup")?)?);

    // 7. A collection with aliases cannot be dropped
    let refused = client.drop_collection("customized_setup_renamed");

    println!("Drop with aliases refused: {}", refused.is_err());

    client.drop_alias("bob")?;
    client.drop_alias("alice")?;
    client.drop_collection("customized_setup_renamed")?;
    client.drop_collection("quick_setup")?;

    println!("{}", serde_json::to_string(&client.list_collections()?)?);

    Ok(())
}
