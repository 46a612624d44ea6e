// VecDocs — example/use_built_in_roles.rs
// Manage users, roles and privileges.
// Run with:  vecdocs run example/use_built_in_roles.rs --env .env

use vecdocs::rbac::ObjectType;
use vecdocs::{ClientConfig, LocalClient, VectorClient};

const CLUSTER_ENDPOINT: &str = "YOUR_CLUSTER_ENDPOINT";
const TOKEN: &str = "YOUR_CLUSTER_TOKEN";
const USERNAME: &str = "user1";
const PASSWORD1: &str = "P@ssw0rd!";
const PASSWORD2: &str = "P@ssw0rd!!";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut client = LocalClient::connect(&ClientConfig::new(CLUSTER_ENDPOINT, TOKEN))?;

    // 1. Create a user and change its password
    client.create_user(USERNAME, PASSWORD1)?;
    client.update_password(USERNAME, PASSWORD1, PASSWORD2)?;

    // 2. List users and the roles that ship with the database
    println!("{}", serde_json::to_string(&client.list_users()?)?);

    println!("{}", serde_json::to_string(&client.list_roles()?)?);

    // 3. Assign a built-in role
    client.grant_role(USERNAME, "db_ro")?;

    println!("{}", serde_json::to_string(&client.describe_user(USERNAME)?)?);

    client.revoke_role(USERNAME, "db_ro")?;

    // 4. A custom role with collection privileges
    client.create_role("role1")?;
    client.grant_privilege("role1", ObjectType::Collection, "medium_articles_2020", "Search")?;
    client.grant_privilege("role1", ObjectType::Collection, "medium_articles_2020", "Query")?;
    client.grant_role(USERNAME, "role1")?;

    println!("{}", serde_json::to_string(&client.list_grants("role1")?)?);

    // 5. Unknown privileges and built-in roles are protected
    let bad_privilege = client.grant_privilege("role1", ObjectType::Collection, "*", "Teleport");

    println!("Unknown privilege refused: {}", bad_privilege.is_err());

    let drop_builtin = client.drop_role("admin");

    println!("Dropping a built-in role refused: {}", drop_builtin.is_err());

    // 6. Clean up
    client.revoke_role(USERNAME, "role1")?;
    client.revoke_privilege("role1", ObjectType::Collection, "medium_articles_2020", "Search")?;
    client.revoke_privilege("role1", ObjectType::Collection, "medium_articles_2020", "Query")?;
    client.drop_role("role1")?;
    client.delete_user(USERNAME)?;

    println!("{}", serde_json::to_string(&client.list_users()?)?);

    Ok(())
}
