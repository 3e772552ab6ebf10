use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEnumRange {
    range: Vec<String>,
}

/// Ordered set of values an enum point accepts.
///
/// The position of a value is its wire encoding, so order is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawEnumRange")]
pub struct EnumRange {
    range: Vec<String>,
}

impl TryFrom<RawEnumRange> for EnumRange {
    type Error = DomainError;

    fn try_from(raw: RawEnumRange) -> Result<Self> {
        Self::new(raw.range)
    }
}

impl EnumRange {
    /// Create a validated enum range (non-empty, no duplicates)
    pub fn new<I, S>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let range: Vec<String> = values.into_iter().map(Into::into).collect();

        if range.is_empty() {
            return Err(DomainError::malformed("enum range is empty"));
        }

        let mut seen = HashSet::with_capacity(range.len());
        for value in &range {
            if !seen.insert(value.as_str()) {
                return Err(DomainError::malformed(format!(
                    "enum range contains duplicate value '{value}'"
                )));
            }
        }

        Ok(Self { range })
    }

    /// Parse a serialized descriptor such as `{"range":["open","closed"]}`.
    pub fn from_descriptor(serialized: &str) -> Result<Self> {
        let raw: RawEnumRange = serde_json::from_str(serialized)
            .map_err(|e| DomainError::malformed(e.to_string()))?;
        Self::try_from(raw)
    }

    pub fn values(&self) -> &[String] {
        &self.range
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// A parsed range is never empty
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.index_of(value).is_some()
    }

    /// Wire index of `value`
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.range.iter().position(|v| v == value)
    }

    /// Value at wire index `index`
    pub fn get(&self, index: usize) -> Option<&str> {
        self.range.get(index).map(String::as_str)
    }
}
