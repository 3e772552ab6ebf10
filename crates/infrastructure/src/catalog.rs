use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use domain::range::ValueRangeDescriptor;
use domain::{Device, DeviceManager, DomainError, Point, PointId};

/// A point as written in a catalog file
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CatalogPoint {
    pub res_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default = "default_online")]
    pub online: bool,
    #[serde(default)]
    pub value_range: Option<ValueRangeDescriptor>,
}

fn default_online() -> bool {
    true
}

/// A device as written in a catalog file
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CatalogDevice {
    pub did: String,
    pub device_name: String,
    pub model: String,
    #[serde(default)]
    pub position_name: String,
    #[serde(default)]
    pub points: Vec<CatalogPoint>,
}

impl CatalogDevice {
    pub fn into_device(self) -> Result<Device, DomainError> {
        let mut device = Device::new(self.did, self.device_name, self.model, self.position_name);

        for cfg in self.points {
            let mut point = Point::new(PointId::new(&device.did, &cfg.res_id)?, cfg.name);
            point.value = cfg.value;
            point.online = cfg.online;
            point.value_range = cfg.value_range;
            device = device.with_point(point);
        }

        Ok(device)
    }
}

/// A command batch accepted by the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct SentCommand {
    pub did: String,
    pub commands: BTreeMap<String, String>,
    pub sent_at: DateTime<Utc>,
}

/// Offline device manager backed by a static JSON catalog.
///
/// Commands are not transmitted anywhere: they are recorded and written
/// back into the catalog's point values.
#[derive(Debug)]
pub struct CatalogDeviceManager {
    devices: Mutex<BTreeMap<String, Device>>,
    sent: Mutex<Vec<SentCommand>>,
}

impl CatalogDeviceManager {
    pub fn new(entries: Vec<CatalogDevice>) -> Self {
        let devices = entries
            .into_iter()
            .filter_map(|entry| {
                let did = entry.did.clone();
                match entry.into_device() {
                    Ok(device) => Some((did, device)),
                    Err(e) => {
                        error!(device_id = %did, error = %e, "Invalid catalog device, skipping");
                        None
                    }
                }
            })
            .collect();

        Self {
            devices: Mutex::new(devices),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let entries: Vec<CatalogDevice> =
            serde_json::from_str(json).context("Failed to parse device catalog")?;
        Ok(Self::new(entries))
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read device catalog {}", path.display()))?;
        let manager = Self::from_json(&json)?;
        info!(path = %path.display(), devices = manager.len(), "Loaded device catalog");
        Ok(manager)
    }

    pub fn len(&self) -> usize {
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every device, ordered by id
    pub fn devices(&self) -> Vec<Device> {
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Commands accepted so far, oldest first
    pub fn sent_commands(&self) -> Vec<SentCommand> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl DeviceManager for CatalogDeviceManager {
    fn device(&self, did: &str) -> Option<Device> {
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(did)
            .cloned()
    }

    fn device_ids(&self) -> Vec<String> {
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    async fn send_commands(
        &self,
        did: &str,
        commands: &BTreeMap<String, String>,
    ) -> Result<(), DomainError> {
        {
            let mut devices = self.devices.lock().unwrap_or_else(PoisonError::into_inner);
            let device = devices
                .get_mut(did)
                .ok_or_else(|| DomainError::DeviceNotFound(did.to_string()))?;

            // Reject the whole batch before touching any point
            let mut ids = Vec::with_capacity(commands.len());
            for res_id in commands.keys() {
                let id = PointId::new(did, res_id)?;
                if !device.point_map.contains_key(id.as_str()) {
                    return Err(DomainError::PointNotFound(id.to_string()));
                }
                ids.push(id);
            }

            for (id, value) in ids.iter().zip(commands.values()) {
                if let Some(point) = device.point_map.get_mut(id.as_str()) {
                    point.update_value(value.clone());
                }
            }
        }

        debug!(device_id = %did, commands = ?commands, "Catalog accepted commands");
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentCommand {
                did: did.to_string(),
                commands: commands.clone(),
                sent_at: Utc::now(),
            });
        Ok(())
    }
}
