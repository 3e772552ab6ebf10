use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{EnumRange, IntegerRange};
use crate::error::{DomainError, Result};

/// Value type tag reported alongside a point's range descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeKind {
    Boolean,
    Integer,
    Enum,
    Json,
}

impl RangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::Enum => "Enum",
            Self::Json => "Json",
        }
    }
}

impl FromStr for RangeKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => Ok(Self::Boolean),
            "integer" | "int" => Ok(Self::Integer),
            "enum" => Ok(Self::Enum),
            "json" => Ok(Self::Json),
            _ => Err(DomainError::malformed(format!(
                "unknown value range type '{s}'"
            ))),
        }
    }
}

impl std::fmt::Display for RangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialized value range as the device manager reports it:
/// a type tag plus the descriptor string for that type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRangeDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub values: String,
}

impl ValueRangeDescriptor {
    pub fn new(kind: impl Into<String>, values: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            values: values.into(),
        }
    }

    pub fn parse(&self) -> Result<PointRange> {
        PointRange::from_descriptor(&self.kind, &self.values)
    }
}

/// Parsed legal value domain of a point
#[derive(Debug, Clone, PartialEq)]
pub enum PointRange {
    Boolean,
    Integer(IntegerRange),
    Enum(EnumRange),
    /// Free-form JSON payload; no range to enforce
    Json,
}

impl PointRange {
    /// Parse the descriptor belonging to the `kind` type tag.
    pub fn from_descriptor(kind: &str, values: &str) -> Result<Self> {
        match kind.parse::<RangeKind>()? {
            RangeKind::Boolean => Ok(Self::Boolean),
            RangeKind::Integer => IntegerRange::from_descriptor(values).map(Self::Integer),
            RangeKind::Enum => EnumRange::from_descriptor(values).map(Self::Enum),
            RangeKind::Json => Ok(Self::Json),
        }
    }

    pub fn kind(&self) -> RangeKind {
        match self {
            Self::Boolean => RangeKind::Boolean,
            Self::Integer(_) => RangeKind::Integer,
            Self::Enum(_) => RangeKind::Enum,
            Self::Json => RangeKind::Json,
        }
    }

    pub fn as_integer(&self) -> Option<&IntegerRange> {
        match self {
            Self::Integer(range) => Some(range),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumRange> {
        match self {
            Self::Enum(range) => Some(range),
            _ => None,
        }
    }
}
