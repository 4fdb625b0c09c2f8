//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for a generated mock interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MockId(Uuid);

impl MockId {
    /// Creates a new random MockId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a MockId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MockId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Unique identifier for a stored answer with its feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerId(Uuid);

impl AnswerId {
    /// Creates a new random AnswerId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an AnswerId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AnswerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnswerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User identifier issued by the identity provider (not a UUID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque key scoping rate limiting to one caller.
///
/// Derived from the resolved identity, optionally narrowed to a resource so
/// different endpoints keep independent windows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActorKey(String);

impl ActorKey {
    /// Creates an actor key for a resolved user.
    pub fn for_user(user_id: &UserId) -> Self {
        Self(format!("user:{}", user_id.as_str()))
    }

    /// Narrows this key to a single resource (e.g. "questions").
    pub fn scoped(&self, resource: &str) -> Self {
        Self(format!("{}:{}", self.0, resource))
    }

    /// Returns the key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActorKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ActorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_id_generates_unique_values() {
        assert_ne!(MockId::new(), MockId::new());
    }

    #[test]
    fn mock_id_parses_from_string() {
        let id = MockId::new();
        let parsed: MockId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn mock_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<MockId>().is_err());
    }

    #[test]
    fn user_id_rejects_blank() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("   ").is_err());
        assert_eq!(UserId::new("user-1").unwrap().as_str(), "user-1");
    }

    #[test]
    fn actor_key_scopes_by_resource() {
        let user = UserId::new("user-1").unwrap();
        let key = ActorKey::for_user(&user);
        assert_eq!(key.as_str(), "user:user-1");
        assert_eq!(key.scoped("questions").as_str(), "user:user-1:questions");
    }

    #[test]
    fn mock_id_serializes_transparently() {
        let uuid = Uuid::parse_str("6f1c2a7e-1b9a-4a55-9a53-0e0f9a6f2b11").unwrap();
        let json = serde_json::to_string(&MockId::from_uuid(uuid)).unwrap();
        assert_eq!(json, "\"6f1c2a7e-1b9a-4a55-9a53-0e0f9a6f2b11\"");
    }
}
