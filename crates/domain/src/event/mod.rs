use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod signal;
pub use signal::{
    REGISTER_POINT, SignalBus, SignalHandler, StateWriter, Subscription, UPDATE_ENTITY,
    UPDATE_POINT_VALUE, entity_update_signal, point_value_signal,
};

/// Payloads relayed over the host's signal bus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeEvent {
    /// A point was bound to an entity and should be listened to
    PointRegistered {
        point_id: String,
        timestamp: DateTime<Utc>,
    },

    /// The entity owning a point should write its state
    EntityUpdated {
        point_id: String,
        timestamp: DateTime<Utc>,
    },

    /// The device manager reported a new raw value for a point
    PointValueUpdated {
        point_id: String,
        value: String,
        timestamp: DateTime<Utc>,
    },
}

impl BridgeEvent {
    /// Create a PointRegistered event
    pub fn point_registered(point_id: impl Into<String>) -> Self {
        Self::PointRegistered {
            point_id: point_id.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an EntityUpdated event
    pub fn entity_updated(point_id: impl Into<String>) -> Self {
        Self::EntityUpdated {
            point_id: point_id.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a PointValueUpdated event
    pub fn point_value_updated(point_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::PointValueUpdated {
            point_id: point_id.into(),
            value: value.into(),
            timestamp: Utc::now(),
        }
    }

    /// Underscored id of the point this event is about
    pub fn point_id(&self) -> &str {
        match self {
            Self::PointRegistered { point_id, .. } => point_id,
            Self::EntityUpdated { point_id, .. } => point_id,
            Self::PointValueUpdated { point_id, .. } => point_id,
        }
    }

    /// Get the timestamp of this event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::PointRegistered { timestamp, .. } => *timestamp,
            Self::EntityUpdated { timestamp, .. } => *timestamp,
            Self::PointValueUpdated { timestamp, .. } => *timestamp,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &str {
        match self {
            Self::PointRegistered { .. } => "PointRegistered",
            Self::EntityUpdated { .. } => "EntityUpdated",
            Self::PointValueUpdated { .. } => "PointValueUpdated",
        }
    }
}
