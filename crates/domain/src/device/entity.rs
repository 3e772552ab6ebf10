use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::point::{Point, PointId, dot_to_underscore};

/// Manufacturer reported for every bridged device
pub const MANUFACTURER: &str = "Aqara";

/// A physical device as reported by the device manager, with its points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub did: String,
    pub device_name: String,
    pub model: String,
    #[serde(default)]
    pub position_name: String,
    /// Points keyed by their full point id
    #[serde(default)]
    pub point_map: BTreeMap<String, Point>,
}

impl Device {
    pub fn new(
        did: impl Into<String>,
        device_name: impl Into<String>,
        model: impl Into<String>,
        position_name: impl Into<String>,
    ) -> Self {
        Self {
            did: did.into(),
            device_name: device_name.into(),
            model: model.into(),
            position_name: position_name.into(),
            point_map: BTreeMap::new(),
        }
    }

    pub fn with_point(mut self, point: Point) -> Self {
        self.point_map.insert(point.id.to_string(), point);
        self
    }

    /// Point exposing resource `res_id`, if the device has one
    pub fn point(&self, res_id: &str) -> Option<&Point> {
        let id = PointId::new(&self.did, res_id).ok()?;
        self.point_map.get(id.as_str())
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.point_map.values()
    }
}

/// Registry entry describing a device to the host platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// `(integration domain, device id with dots as underscores)`
    pub identifiers: Vec<(String, String)>,
    pub manufacturer: String,
    pub name: String,
    pub model: String,
    pub suggested_area: String,
}

impl DeviceInfo {
    /// Describe `device` under `domain`; `model` overrides the device's own
    /// model string when the manager knows a better one.
    pub fn for_device(domain: &str, device: &Device, model: Option<String>) -> Self {
        Self {
            identifiers: vec![(domain.to_string(), dot_to_underscore(&device.did))],
            manufacturer: MANUFACTURER.to_string(),
            name: format!("{}({})", device.device_name, device.did),
            model: model.unwrap_or_else(|| device.model.clone()),
            suggested_area: device.position_name.clone(),
        }
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = manufacturer.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
