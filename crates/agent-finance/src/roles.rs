//! User role store backed by a YAML file
//!
//! ```yaml
//! users:
//!   - username: user_b
//!     roles: [restricted_db, mask_data]
//! ```

use crate::error::{FinanceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// A label granting or restricting access to tools or detail
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleTag {
    /// Only the company/stock price projection of the finance table
    RestrictedDb,
    /// Only rows classified `restricted`
    RowRestricted,
    /// No stock quote API calls
    LimitedApiAccess,
    /// Revenue and profit masked in the summary
    MaskData,
}

impl RoleTag {
    pub const ALL: [RoleTag; 4] = [
        RoleTag::RestrictedDb,
        RoleTag::RowRestricted,
        RoleTag::LimitedApiAccess,
        RoleTag::MaskData,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RoleTag::RestrictedDb => "restricted_db",
            RoleTag::RowRestricted => "row_restricted",
            RoleTag::LimitedApiAccess => "limited_api_access",
            RoleTag::MaskData => "mask_data",
        }
    }
}

impl fmt::Display for RoleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleTag {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        RoleTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("unknown role tag '{s}'"))
    }
}

/// The role tags of one user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSet(BTreeSet<RoleTag>);

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, tag: RoleTag) -> bool {
        self.0.contains(&tag)
    }

    pub fn insert(&mut self, tag: RoleTag) -> bool {
        self.0.insert(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = RoleTag> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<RoleTag> for RoleSet {
    fn from_iter<I: IntoIterator<Item = RoleTag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(none)");
        }
        let tags: Vec<&str> = self.iter().map(RoleTag::as_str).collect();
        f.write_str(&tags.join(", "))
    }
}

/// A user and their roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRoles {
    pub username: String,
    pub roles: RoleSet,
}

#[derive(Debug, Deserialize)]
struct RoleFile {
    #[serde(default)]
    users: Vec<RoleEntry>,
}

#[derive(Debug, Deserialize)]
struct RoleEntry {
    username: String,
    /// Absent, `null` (a bare `roles:`) and `[]` all mean no roles
    #[serde(default)]
    roles: Option<Vec<String>>,
}

impl RoleEntry {
    fn tags(&self) -> RoleSet {
        parse_tags(&self.username, self.roles.as_deref().unwrap_or_default())
    }
}

/// Read-only view of the role file
///
/// The file is read on every lookup, so edits take effect without a restart.
#[derive(Debug, Clone)]
pub struct RoleStore {
    path: PathBuf,
}

impl RoleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Roles of `username`; an unknown user has no roles
    pub fn get_user_roles(&self, username: &str) -> Result<RoleSet> {
        let file = self.load()?;
        let roles = file
            .users
            .iter()
            .find(|entry| entry.username == username)
            .map(RoleEntry::tags)
            .unwrap_or_default();

        debug!(username, roles = %roles, path = %self.path.display(), "Resolved user roles");
        Ok(roles)
    }

    /// Every user in file order
    pub fn users(&self) -> Result<Vec<UserRoles>> {
        let file = self.load()?;
        Ok(file
            .users
            .iter()
            .map(|entry| UserRoles {
                username: entry.username.clone(),
                roles: entry.tags(),
            })
            .collect())
    }

    fn load(&self) -> Result<RoleFile> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| FinanceError::RoleFile {
            path: self.path.clone(),
            source,
        })?;

        serde_yaml::from_str(&content).map_err(|source| FinanceError::RoleFormat {
            path: self.path.clone(),
            source,
        })
    }
}

fn parse_tags(username: &str, raw: &[String]) -> RoleSet {
    raw.iter()
        .filter_map(|tag| match tag.parse::<RoleTag>() {
            Ok(tag) => Some(tag),
            Err(reason) => {
                warn!(username, %reason, "Ignoring role tag");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn role_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const ROLES: &str = r"
users:
  - username: user_a
    roles: []
  - username: user_b
    roles: [restricted_db, mask_data]
  - username: user_c
    roles:
      - row_restricted
      - superuser
";

    #[test]
    fn test_known_user_roles() {
        let file = role_file(ROLES);
        let store = RoleStore::new(file.path());

        let roles = store.get_user_roles("user_b").unwrap();
        assert_eq!(roles.len(), 2);
        assert!(roles.contains(RoleTag::RestrictedDb));
        assert!(roles.contains(RoleTag::MaskData));
    }

    #[test]
    fn test_unknown_user_has_no_roles() {
        let file = role_file(ROLES);
        let store = RoleStore::new(file.path());
        assert!(store.get_user_roles("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_tag_is_ignored() {
        let file = role_file(ROLES);
        let store = RoleStore::new(file.path());

        let roles = store.get_user_roles("user_c").unwrap();
        assert_eq!(roles.iter().collect::<Vec<_>>(), vec![RoleTag::RowRestricted]);
    }

    #[test]
    fn test_first_matching_entry_wins() {
        let file = role_file(
            "users:\n  - username: dup\n    roles: [mask_data]\n  - username: dup\n    roles: [restricted_db]\n",
        );
        let store = RoleStore::new(file.path());
        let roles = store.get_user_roles("dup").unwrap();
        assert!(roles.contains(RoleTag::MaskData));
        assert!(!roles.contains(RoleTag::RestrictedDb));
    }

    #[test]
    fn test_bare_roles_key_means_no_roles() {
        let file = role_file(
            "users:\n  - username: user_e\n    roles:\n  - username: user_f\n  - username: user_b\n    roles: [mask_data]\n",
        );
        let store = RoleStore::new(file.path());

        assert!(store.get_user_roles("user_e").unwrap().is_empty());
        assert!(store.get_user_roles("user_f").unwrap().is_empty());
        assert!(store.get_user_roles("user_b").unwrap().contains(RoleTag::MaskData));
        assert_eq!(store.users().unwrap().len(), 3);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = RoleStore::new(dir.path().join("absent.yaml"));
        let err = store.get_user_roles("user_a").unwrap_err();
        assert!(matches!(err, FinanceError::RoleFile { .. }));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let file = role_file("users: {username: [");
        let store = RoleStore::new(file.path());
        let err = store.users().unwrap_err();
        assert!(matches!(err, FinanceError::RoleFormat { .. }));
    }

    #[test]
    fn test_users_in_file_order() {
        let file = role_file(ROLES);
        let users = tokio_test::assert_ok!(RoleStore::new(file.path()).users());
        let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["user_a", "user_b", "user_c"]);
        assert_eq!(users[0].roles.to_string(), "(none)");
    }
}
