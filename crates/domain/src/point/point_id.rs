use crate::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Separator between device id and resource id in a point id
pub const POINT_ID_SEPARATOR: &str = "__";

/// Value object representing a point identifier: `"{did}__{res_id}"`
///
/// Rules:
/// - Device id and resource id must be non-empty
/// - Device id must not contain the separator
///
/// Example: `lumi1.54ef4426f6b9__14.1.111`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PointId(String);

impl PointId {
    /// Build the point id of resource `res_id` on device `did`
    pub fn new(did: &str, res_id: &str) -> Result<Self> {
        if did.is_empty() {
            return Err(DomainError::InvalidPointId(
                "Device id cannot be empty".to_string(),
            ));
        }

        if did.contains(POINT_ID_SEPARATOR) {
            return Err(DomainError::InvalidPointId(format!(
                "Device id {did} must not contain '{POINT_ID_SEPARATOR}'"
            )));
        }

        if res_id.is_empty() {
            return Err(DomainError::InvalidPointId(format!(
                "Resource id cannot be empty (device {did})"
            )));
        }

        Ok(Self(format!("{did}{POINT_ID_SEPARATOR}{res_id}")))
    }

    /// Parse a full point id
    pub fn parse(id: &str) -> Result<Self> {
        let (did, res_id) = id
            .split_once(POINT_ID_SEPARATOR)
            .ok_or_else(|| DomainError::InvalidPointId(format!("Malformed point id: {id}")))?;
        Self::new(did, res_id)
    }

    /// Device part of the id
    pub fn did(&self) -> &str {
        self.split().0
    }

    /// Resource part of the id
    pub fn res_id(&self) -> &str {
        self.split().1
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id with dots replaced by underscores, as used in signal names
    pub fn underscored(&self) -> String {
        dot_to_underscore(&self.0)
    }

    fn split(&self) -> (&str, &str) {
        // Invariant: constructed through `new`
        self.0
            .split_once(POINT_ID_SEPARATOR)
            .unwrap_or((self.0.as_str(), ""))
    }
}

impl TryFrom<String> for PointId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PointId> for String {
    fn from(id: PointId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `lumi1.54ef4426f6b9` -> `lumi1_54ef4426f6b9`
pub fn dot_to_underscore(s: &str) -> String {
    s.replace('.', "_")
}

/// `lumi1_54ef4426f6b9` -> `lumi1.54ef4426f6b9`
pub fn underscore_to_dot(s: &str) -> String {
    s.replace('_', ".")
}
