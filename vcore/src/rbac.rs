// VecDocs — rbac.rs
// Users, roles and privilege grants for the in-process client.
// Author: d65v <https://github.com/d65v>

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{Result, VecDocsError};

pub const ROOT_USER: &str = "root";
pub const ROOT_PASSWORD: &str = "Milvus";

/// Roles that exist from the start and cannot be dropped.
pub const BUILT_IN_ROLES: [&str; 5] = ["admin", "db_admin", "db_ro", "db_rw", "public"];

const PASSWORD_MIN: usize = 6;
const PASSWORD_MAX: usize = 256;

const GLOBAL_PRIVILEGES: &[&str] = &[
    "All",
    "CreateCollection",
    "DropCollection",
    "DescribeCollection",
    "ShowCollections",
    "RenameCollection",
    "FlushAll",
    "CreateOwnership",
    "DropOwnership",
    "SelectOwnership",
    "ManageOwnership",
    "CreateDatabase",
    "DropDatabase",
    "ListDatabases",
];

const COLLECTION_PRIVILEGES: &[&str] = &[
    "All",
    "CreateIndex",
    "DropIndex",
    "IndexDetail",
    "Load",
    "GetLoadingProgress",
    "GetLoadState",
    "Release",
    "Insert",
    "Delete",
    "Upsert",
    "Search",
    "Query",
    "Flush",
    "GetFlushState",
    "GetStatistics",
    "Compaction",
    "Import",
    "LoadBalance",
    "CreateAlias",
    "DropAlias",
];

const USER_PRIVILEGES: &[&str] = &["UpdateUser", "SelectUser"];

/// What a privilege applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ObjectType {
    Global,
    Collection,
    User,
}

impl ObjectType {
    fn privileges(&self) -> &'static [&'static str] {
        match self {
            ObjectType::Global => GLOBAL_PRIVILEGES,
            ObjectType::Collection => COLLECTION_PRIVILEGES,
            ObjectType::User => USER_PRIVILEGES,
        }
    }
}

/// One privilege granted to a role.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Grant {
    pub role: String,
    pub object_type: ObjectType,
    pub object_name: String,
    pub privilege: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserInfo {
    pub name: String,
    pub roles: Vec<String>,
}

/// In-memory access-control tables.
#[derive(Debug)]
pub struct AccessControl {
    users: BTreeMap<String, String>,
    roles: BTreeSet<String>,
    user_roles: BTreeMap<String, BTreeSet<String>>,
    grants: BTreeSet<Grant>,
}

impl Default for AccessControl {
    fn default() -> Self {
        let mut users = BTreeMap::new();
        users.insert(ROOT_USER.to_string(), ROOT_PASSWORD.to_string());

        let mut user_roles = BTreeMap::new();
        user_roles.insert(
            ROOT_USER.to_string(),
            BTreeSet::from(["admin".to_string()]),
        );

        Self {
            users,
            roles: BUILT_IN_ROLES.iter().map(|r| r.to_string()).collect(),
            user_roles,
            grants: BTreeSet::new(),
        }
    }
}

impl AccessControl {
    pub fn authenticate(&self, user: &str, password: &str) -> Result<()> {
        match self.users.get(user) {
            Some(p) if p == password => Ok(()),
            _ => Err(VecDocsError::AccessControl(format!(
                "authentication failed for user '{}'",
                user
            ))),
        }
    }

    pub fn create_user(&mut self, user: &str, password: &str) -> Result<()> {
        validate_name("user", user)?;
        validate_password(password)?;
        if self.users.contains_key(user) {
            return Err(VecDocsError::AccessControl(format!("user '{}' already exists", user)));
        }
        self.users.insert(user.to_string(), password.to_string());
        Ok(())
    }

    pub fn update_password(&mut self, user: &str, old: &str, new: &str) -> Result<()> {
        self.authenticate(user, old)?;
        validate_password(new)?;
        self.users.insert(user.to_string(), new.to_string());
        Ok(())
    }

    pub fn delete_user(&mut self, user: &str) -> Result<()> {
        if user == ROOT_USER {
            return Err(VecDocsError::AccessControl("the root user cannot be deleted".into()));
        }
        if self.users.remove(user).is_none() {
            return Err(user_not_found(user));
        }
        self.user_roles.remove(user);
        Ok(())
    }

    pub fn list_users(&self) -> Vec<String> {
        self.users.keys().cloned().collect()
    }

    pub fn describe_user(&self, user: &str) -> Result<UserInfo> {
        if !self.users.contains_key(user) {
            return Err(user_not_found(user));
        }
        let roles = self
            .user_roles
            .get(user)
            .map(|r| r.iter().cloned().collect())
            .unwrap_or_default();
        Ok(UserInfo {
            name: user.to_string(),
            roles,
        })
    }

    pub fn create_role(&mut self, role: &str) -> Result<()> {
        validate_name("role", role)?;
        if !self.roles.insert(role.to_string()) {
            return Err(VecDocsError::AccessControl(format!("role '{}' already exists", role)));
        }
        Ok(())
    }

    pub fn drop_role(&mut self, role: &str) -> Result<()> {
        if BUILT_IN_ROLES.contains(&role) {
            return Err(VecDocsError::AccessControl(format!(
                "built-in role '{}' cannot be dropped",
                role
            )));
        }
        if !self.roles.remove(role) {
            return Err(role_not_found(role));
        }
        for roles in self.user_roles.values_mut() {
            roles.remove(role);
        }
        self.grants.retain(|g| g.role != role);
        Ok(())
    }

    pub fn list_roles(&self) -> Vec<String> {
        self.roles.iter().cloned().collect()
    }

    pub fn grant_role(&mut self, user: &str, role: &str) -> Result<()> {
        self.check_user_and_role(user, role)?;
        self.user_roles
            .entry(user.to_string())
            .or_default()
            .insert(role.to_string());
        Ok(())
    }

    pub fn revoke_role(&mut self, user: &str, role: &str) -> Result<()> {
        self.check_user_and_role(user, role)?;
        let removed = self
            .user_roles
            .get_mut(user)
            .map_or(false, |roles| roles.remove(role));
        if !removed {
            return Err(VecDocsError::AccessControl(format!(
                "user '{}' does not have role '{}'",
                user, role
            )));
        }
        Ok(())
    }

    pub fn grant_privilege(
        &mut self,
        role: &str,
        object_type: ObjectType,
        object_name: &str,
        privilege: &str,
    ) -> Result<()> {
        let grant = self.make_grant(role, object_type, object_name, privilege)?;
        self.grants.insert(grant);
        Ok(())
    }

    pub fn revoke_privilege(
        &mut self,
        role: &str,
        object_type: ObjectType,
        object_name: &str,
        privilege: &str,
    ) -> Result<()> {
        let grant = self.make_grant(role, object_type, object_name, privilege)?;
        if !self.grants.remove(&grant) {
            return Err(VecDocsError::AccessControl(format!(
                "role '{}' was not granted {} on {:?} '{}'",
                role, privilege, object_type, object_name
            )));
        }
        Ok(())
    }

    pub fn list_grants(&self, role: &str) -> Result<Vec<Grant>> {
        if !self.roles.contains(role) {
            return Err(role_not_found(role));
        }
        Ok(self.grants.iter().filter(|g| g.role == role).cloned().collect())
    }

    fn make_grant(
        &self,
        role: &str,
        object_type: ObjectType,
        object_name: &str,
        privilege: &str,
    ) -> Result<Grant> {
        if !self.roles.contains(role) {
            return Err(role_not_found(role));
        }
        if !object_type.privileges().contains(&privilege) {
            return Err(VecDocsError::AccessControl(format!(
                "'{}' is not a {:?} privilege",
                privilege, object_type
            )));
        }
        Ok(Grant {
            role: role.to_string(),
            object_type,
            object_name: object_name.to_string(),
            privilege: privilege.to_string(),
        })
    }

    fn check_user_and_role(&self, user: &str, role: &str) -> Result<()> {
        if !self.users.contains_key(user) {
            return Err(user_not_found(user));
        }
        if !self.roles.contains(role) {
            return Err(role_not_found(role));
        }
        Ok(())
    }
}

fn validate_name(kind: &str, name: &str) -> Result<()> {
    let valid = name
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name.len() <= 32;
    if valid {
        Ok(())
    } else {
        Err(VecDocsError::AccessControl(format!("invalid {} name '{}'", kind, name)))
    }
}

fn validate_password(password: &str) -> Result<()> {
    let n = password.chars().count();
    if (PASSWORD_MIN..=PASSWORD_MAX).contains(&n) {
        Ok(())
    } else {
        Err(VecDocsError::AccessControl(format!(
            "password length must be between {} and {}",
            PASSWORD_MIN, PASSWORD_MAX
        )))
    }
}

fn user_not_found(user: &str) -> VecDocsError {
    VecDocsError::AccessControl(format!("user '{}' not found", user))
}

fn role_not_found(role: &str) -> VecDocsError {
    VecDocsError::AccessControl(format!("role '{}' not found", role))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ac = AccessControl::default();
        assert_eq!(ac.list_users(), vec!["root"]);
        assert_eq!(ac.list_roles(), vec!["admin", "db_admin", "db_ro", "db_rw", "public"]);
        ac.authenticate("root", "Milvus").unwrap();
        assert_eq!(ac.describe_user("root").unwrap().roles, vec!["admin"]);
    }

    #[test]
    fn test_user_lifecycle() {
        let mut ac = AccessControl::default();
        ac.create_user("user1", "P@ssw0rd!").unwrap();
        assert!(ac.create_user("user1", "P@ssw0rd!").is_err());
        assert!(ac.update_password("user1", "wrong-pass", "P@ssw0rd!!").is_err());
        ac.update_password("user1", "P@ssw0rd!", "P@ssw0rd!!").unwrap();
        ac.authenticate("user1", "P@ssw0rd!!").unwrap();
        assert_eq!(ac.list_users(), vec!["root", "user1"]);
        ac.delete_user("user1").unwrap();
        assert!(ac.delete_user("user1").is_err());
        assert!(ac.delete_user("root").is_err());
    }

    #[test]
    fn test_password_length() {
        let mut ac = AccessControl::default();
        assert!(ac.create_user("short", "abc").is_err());
        assert!(ac.create_user("9bad", "P@ssw0rd!").is_err());
    }

    #[test]
    fn test_roles() {
        let mut ac = AccessControl::default();
        ac.create_user("user1", "P@ssw0rd!").unwrap();
        ac.grant_role("user1", "db_ro").unwrap();
        assert_eq!(ac.describe_user("user1").unwrap().roles, vec!["db_ro"]);
        ac.revoke_role("user1", "db_ro").unwrap();
        assert!(ac.revoke_role("user1", "db_ro").is_err());
        assert!(ac.grant_role("user1", "ghost").is_err());
        assert!(ac.drop_role("public").is_err());
    }

    #[test]
    fn test_privileges() {
        let mut ac = AccessControl::default();
        ac.create_role("roleA").unwrap();
        ac.grant_privilege("roleA", ObjectType::Collection, "*", "Search").unwrap();
        ac.grant_privilege("roleA", ObjectType::Global, "*", "CreateCollection").unwrap();
        assert!(ac
            .grant_privilege("roleA", ObjectType::User, "*", "Search")
            .is_err());
        assert_eq!(ac.list_grants("roleA").unwrap().len(), 2);

        ac.revoke_privilege("roleA", ObjectType::Collection, "*", "Search").unwrap();
        assert!(ac
            .revoke_privilege("roleA", ObjectType::Collection, "*", "Search")
            .is_err());

        ac.drop_role("roleA").unwrap();
        assert!(ac.list_grants("roleA").is_err());
    }
}
