//! Friend domain models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::product::FieldResolver;

/// Backend identifier of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// What the UI may do with a given user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    /// Present in the authoritative friends list.
    Friend,
    /// A request was sent and is neither confirmed nor expired.
    Pending,
    /// A request can be sent.
    None,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequestStatus::Friend => "FRIEND",
            RequestStatus::Pending => "PENDING",
            RequestStatus::None => "NONE",
        };
        f.write_str(label)
    }
}

const USER_ID: FieldResolver = FieldResolver::new(&["id", "_id", "userId", "user_id"]);
const USER_NAME: FieldResolver = FieldResolver::new(&["name", "username", "fullName"]);
const USER_EMAIL: FieldResolver = FieldResolver::new(&["email"]);
const USER_AVATAR: FieldResolver = FieldResolver::new(&["avatar", "profilePicture", "avatarUrl"]);

/// A user as shown in friend lists, search results and request lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub avatar: String,
}

impl UserSummary {
    /// Builds a summary from a user payload; `None` when no id can be resolved.
    ///
    /// Incoming request entries often nest the user under `from`, `sender` or
    /// `user`; those are looked through first.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let object = ["from", "sender", "user"]
            .iter()
            .find_map(|key| payload.get(*key).and_then(Value::as_object))
            .or_else(|| payload.as_object())?;
        Self::from_object(object)
    }

    fn from_object(object: &Map<String, Value>) -> Option<Self> {
        Some(Self {
            id: UserId::from(USER_ID.string(object)?),
            name: USER_NAME.string(object).unwrap_or_default(),
            email: USER_EMAIL.string(object).unwrap_or_default(),
            avatar: USER_AVATAR.string(object).unwrap_or_default(),
        })
    }
}

/// Picks the user sequence out of a list response (`friends`, `users`,
/// `requests`, bare array, `data`) and keeps entries with a resolvable id.
pub fn users_from_response(response: &Value) -> Vec<UserSummary> {
    let list = ["friends", "users", "requests"]
        .iter()
        .find_map(|key| response.get(*key).and_then(Value::as_array))
        .or_else(|| response.as_array())
        .or_else(|| response.get("data").and_then(Value::as_array));

    list.map(|items| items.iter().filter_map(UserSummary::from_payload).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_from_payload() {
        let user = UserSummary::from_payload(&json!({"_id": "u1", "username": "ana"})).unwrap();
        assert_eq!(user.id, UserId::from("u1"));
        assert_eq!(user.name, "ana");
        assert_eq!(user.avatar, "");
    }

    #[test]
    fn test_nested_sender() {
        let entry = json!({"_id": "req-1", "from": {"id": "u9", "name": "Bo"}});
        let user = UserSummary::from_payload(&entry).unwrap();
        assert_eq!(user.id, UserId::from("u9"));
    }

    #[test]
    fn test_users_without_id_are_dropped() {
        let response = json!({"friends": [{"id": "u1"}, {"name": "ghost"}]});
        let users = users_from_response(&response);
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(RequestStatus::Pending.to_string(), "PENDING");
        assert_eq!(
            serde_json::to_value(RequestStatus::Friend).unwrap(),
            json!("FRIEND")
        );
    }
}
