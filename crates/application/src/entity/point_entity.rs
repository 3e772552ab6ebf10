use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use domain::device::MANUFACTURER;
use domain::event::entity_update_signal;
use domain::point::underscore_to_dot;
use domain::{
    BridgeEvent, DeviceInfo, DeviceManager, DomainError, Point, Result, SignalBus, StateWriter,
    Subscription,
};

/// Integration domain used in device identifiers
pub const DEFAULT_DOMAIN: &str = "aqara";

/// Static description of an entity a device model exposes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescription {
    /// Resource id of the point backing the entity
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl EntityDescription {
    pub fn new(key: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            key: key.into(),
            name: name.map(str::to_string),
        }
    }
}

/// Host entity backed by a single device point.
///
/// Holds a snapshot of the point plus the signal subscriptions that live as
/// long as the entity does.
pub struct PointEntity {
    unique_id: String,
    domain: String,
    manufacturer: String,
    point: Point,
    description: Option<EntityDescription>,
    device_manager: Arc<dyn DeviceManager>,
    subscriptions: Vec<Subscription>,
}

impl PointEntity {
    pub fn new(point: Point, device_manager: Arc<dyn DeviceManager>) -> Self {
        Self {
            unique_id: format!("Aqara.{}", point.id),
            domain: DEFAULT_DOMAIN.to_string(),
            manufacturer: MANUFACTURER.to_string(),
            point,
            description: None,
            device_manager,
            subscriptions: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: EntityDescription) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = manufacturer.into();
        self
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn description(&self) -> Option<&EntityDescription> {
        self.description.as_ref()
    }

    /// Display name: point name, then description name, then the bare point id
    pub fn name(&self) -> String {
        let did = self.point.did();

        if !self.point.name.is_empty() {
            return format!("{}({did})", self.point.name);
        }

        match self.description.as_ref().and_then(|d| d.name.as_deref()) {
            Some(name) => format!("{name}({did})"),
            None => format!("({})", self.point.id),
        }
    }

    pub fn available(&self) -> bool {
        self.point.is_online()
    }

    /// Registry entry of the owning device
    pub fn device_info(&self) -> Result<DeviceInfo> {
        let did = self.point.did();
        let device = self
            .device_manager
            .device(did)
            .ok_or_else(|| DomainError::DeviceNotFound(did.to_string()))?;
        let model = self.device_manager.device_model(did);

        Ok(DeviceInfo::for_device(&self.domain, &device, model)
            .with_manufacturer(self.manufacturer.clone()))
    }

    /// Re-read the point from the device manager
    pub fn refresh(&mut self) -> Result<()> {
        let point = self
            .device_manager
            .device(self.point.did())
            .and_then(|device| device.point_map.get(self.point.id.as_str()).cloned())
            .ok_or_else(|| DomainError::PointNotFound(self.point.id.to_string()))?;

        self.point = point;
        Ok(())
    }

    /// Connect the entity's update signal to the host's state writer
    pub fn added_to_bus(&mut self, bus: &dyn SignalBus, writer: Arc<dyn StateWriter>) {
        let unique_id = self.unique_id.clone();
        let signal = entity_update_signal(self.point.id.as_str());

        debug!(unique_id = %self.unique_id, signal = %signal, "Connecting entity update signal");

        let subscription = bus.connect(
            &signal,
            Arc::new(move |_event: &BridgeEvent| writer.write_state(&unique_id)),
        );
        self.on_remove(subscription);
    }

    /// Keep `subscription` alive until the entity is removed
    pub fn on_remove(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Disconnect every signal the entity holds
    pub fn remove(&mut self) {
        debug!(unique_id = %self.unique_id, count = self.subscriptions.len(), "Removing entity");
        for subscription in self.subscriptions.drain(..) {
            subscription.release();
        }
    }

    /// Send raw `{res_id: value}` commands to the owning device
    pub async fn send_command(&self, commands: BTreeMap<String, String>) -> Result<()> {
        debug!(did = %self.point.did(), ?commands, "Sending commands");
        let did = underscore_to_dot(self.point.did());
        self.device_manager.send_commands(&did, &commands).await
    }
}

impl std::fmt::Debug for PointEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointEntity")
            .field("unique_id", &self.unique_id)
            .field("point", &self.point)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
