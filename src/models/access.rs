//! Permissions granted on a submitted run.
//!
//! Entries are told apart by shape alone: `user_name` means a user grant,
//! `group_name` a group grant.

use dbx_schema::{Describe, Schema};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionLevel {
    CanManage,
    CanManageRun,
    CanView,
    IsOwner,
}

impl Describe for PermissionLevel {
    fn schema() -> Schema {
        Schema::enumeration(
            "PermissionLevel",
            ["CAN_MANAGE", "CAN_MANAGE_RUN", "CAN_VIEW", "IS_OWNER"],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlRequestForUser {
    pub user_name: String,
    pub permission_level: PermissionLevel,
}

impl Describe for AccessControlRequestForUser {
    fn schema() -> Schema {
        Schema::record("AccessControlRequestForUser")
            .required("user_name", Schema::string())
            .required("permission_level", PermissionLevel::schema())
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlRequestForGroup {
    pub group_name: String,
    pub permission_level: PermissionLevel,
}

impl Describe for AccessControlRequestForGroup {
    fn schema() -> Schema {
        Schema::record("AccessControlRequestForGroup")
            .required("group_name", Schema::string())
            .required("permission_level", PermissionLevel::schema())
            .build()
    }
}

/// A user or group grant.
///
/// Deserializes from the decoder's tagged form and serializes untagged, as
/// the service expects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum AccessControlRequest {
    #[serde(rename = "AccessControlRequestForUser")]
    User(AccessControlRequestForUser),
    #[serde(rename = "AccessControlRequestForGroup")]
    Group(AccessControlRequestForGroup),
}

impl AccessControlRequest {
    pub fn user(user_name: impl Into<String>, permission_level: PermissionLevel) -> Self {
        AccessControlRequest::User(AccessControlRequestForUser {
            user_name: user_name.into(),
            permission_level,
        })
    }

    pub fn group(group_name: impl Into<String>, permission_level: PermissionLevel) -> Self {
        AccessControlRequest::Group(AccessControlRequestForGroup {
            group_name: group_name.into(),
            permission_level,
        })
    }

    pub fn permission_level(&self) -> PermissionLevel {
        match self {
            AccessControlRequest::User(u) => u.permission_level,
            AccessControlRequest::Group(g) => g.permission_level,
        }
    }
}

impl Serialize for AccessControlRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AccessControlRequest::User(user) => user.serialize(serializer),
            AccessControlRequest::Group(group) => group.serialize(serializer),
        }
    }
}

impl Describe for AccessControlRequest {
    fn schema() -> Schema {
        Schema::union(
            "AccessControlRequest",
            vec![
                AccessControlRequestForUser::schema(),
                AccessControlRequestForGroup::schema(),
            ],
        )
    }
}
