use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PointId;
use crate::error::{DomainError, Result};
use crate::range::{PointRange, ValueRangeDescriptor};

/// A single sensor/control endpoint exposed by a device, as reported by
/// the device manager. The bridge reads it; it never owns its lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    #[serde(default)]
    pub name: String,
    /// Last raw value as reported on the wire
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default = "default_online")]
    pub online: bool,
    #[serde(default)]
    pub value_range: Option<ValueRangeDescriptor>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Point {
    pub fn new(id: PointId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            value: None,
            online: true,
            value_range: None,
            updated_at: Utc::now(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_value_range(mut self, value_range: ValueRangeDescriptor) -> Self {
        self.value_range = Some(value_range);
        self
    }

    pub fn offline(mut self) -> Self {
        self.online = false;
        self
    }

    pub fn did(&self) -> &str {
        self.id.did()
    }

    pub fn res_id(&self) -> &str {
        self.id.res_id()
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Record a new raw value
    pub fn update_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
        self.updated_at = Utc::now();
    }

    /// Last raw value parsed as a number (integers and decimals accepted)
    pub fn numeric_value(&self) -> Result<Option<f64>> {
        self.value
            .as_deref()
            .map(|raw| {
                raw.trim().parse::<f64>().map_err(|_| {
                    DomainError::InvalidPointValue(format!(
                        "Point {} value '{raw}' is not numeric",
                        self.id
                    ))
                })
            })
            .transpose()
    }

    /// Parsed value range, if the device manager reported one
    pub fn range(&self) -> Result<Option<PointRange>> {
        self.value_range
            .as_ref()
            .map(ValueRangeDescriptor::parse)
            .transpose()
    }
}

fn default_online() -> bool {
    true
}
