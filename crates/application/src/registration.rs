use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use domain::device::MANUFACTURER;
use domain::event::{
    REGISTER_POINT, SignalHandler, entity_update_signal, point_value_signal,
};
use domain::{
    BridgeEvent, DeviceInfo, DeviceManager, DeviceRegistry, Point, PointId, PointListener,
    Result, SignalBus, StateWriter,
};

use crate::entity::{DEFAULT_DOMAIN, EntityDescription, PointEntity};

/// Entity descriptions keyed by device model
pub type DescriptionMap = HashMap<String, Vec<EntityDescription>>;

/// Wires device points into host entities and keeps their signals connected
pub struct PointRegistrar {
    domain: String,
    manufacturer: String,
    device_manager: Arc<dyn DeviceManager>,
    registry: Arc<dyn DeviceRegistry>,
    bus: Arc<dyn SignalBus>,
    listener: Arc<dyn PointListener>,
}

impl PointRegistrar {
    pub fn new(
        device_manager: Arc<dyn DeviceManager>,
        registry: Arc<dyn DeviceRegistry>,
        bus: Arc<dyn SignalBus>,
        listener: Arc<dyn PointListener>,
    ) -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            manufacturer: MANUFACTURER.to_string(),
            device_manager,
            registry,
            bus,
            listener,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = manufacturer.into();
        self
    }

    pub fn device_manager(&self) -> &Arc<dyn DeviceManager> {
        &self.device_manager
    }

    /// Build an entity for `point` that shares this registrar's device manager
    pub fn entity_for(&self, point: Point, description: &EntityDescription) -> PointEntity {
        PointEntity::new(point, self.device_manager.clone())
            .with_domain(self.domain.clone())
            .with_manufacturer(self.manufacturer.clone())
            .with_description(description.clone())
    }

    /// Find every described point on `device_ids` and register it.
    ///
    /// For each point found: the owning device is created in the registry,
    /// `append_entity` receives the point and its description, and
    /// `REGISTER_POINT` is announced on the bus. Returns the number of points
    /// registered.
    pub fn register_device_points<F>(
        &self,
        config_entry_id: &str,
        device_ids: &[String],
        descriptions: &DescriptionMap,
        mut append_entity: F,
    ) -> usize
    where
        F: FnMut(Point, &EntityDescription),
    {
        let mut registered = 0;

        for device_id in device_ids {
            let Some(device) = self.device_manager.device(device_id) else {
                warn!(device_id = %device_id, "Device not known to the device manager, skipping");
                continue;
            };

            let Some(model_descriptions) = descriptions.get(&device.model) else {
                debug!(device_id = %device_id, model = %device.model, "No entity descriptions for model");
                continue;
            };

            for description in model_descriptions {
                let Some(point) = device.point(&description.key) else {
                    continue;
                };

                // Registry entries are named by did
                let info = DeviceInfo::for_device(&self.domain, &device, None)
                    .with_manufacturer(self.manufacturer.clone())
                    .with_name(device.did.clone());
                self.registry.get_or_create(config_entry_id, &info);

                let point_id = point.id.underscored();
                append_entity(point.clone(), description);
                self.bus
                    .send(REGISTER_POINT, BridgeEvent::point_registered(point_id.clone()));

                debug!(point_id = %point_id, "Registered point");
                registered += 1;
            }
        }

        info!(registered, devices = device_ids.len(), "Device points registered");
        registered
    }

    /// Connect the update signal of every `res_id` on `did` to the host's
    /// state writer, and start listening to those points.
    ///
    /// Empty resource ids are skipped. Returns the number of points bound.
    pub fn bind_entity_updates(
        &self,
        entity: &mut PointEntity,
        did: &str,
        res_ids: &[&str],
        writer: Arc<dyn StateWriter>,
    ) -> Result<usize> {
        let unique_id = entity.unique_id().to_string();
        let handler: SignalHandler =
            Arc::new(move |_event: &BridgeEvent| writer.write_state(&unique_id));

        self.bind(entity, did, res_ids, entity_update_signal, handler)
    }

    /// Connect the point-value signal of every `res_id` on `did` to
    /// `callback`, and start listening to those points.
    pub fn bind_point_value_updates(
        &self,
        entity: &mut PointEntity,
        did: &str,
        res_ids: &[&str],
        callback: SignalHandler,
    ) -> Result<usize> {
        self.bind(entity, did, res_ids, point_value_signal, callback)
    }

    fn bind(
        &self,
        entity: &mut PointEntity,
        did: &str,
        res_ids: &[&str],
        signal_for: fn(&str) -> String,
        handler: SignalHandler,
    ) -> Result<usize> {
        let mut bound = 0;

        for res_id in res_ids.iter().filter(|res_id| !res_id.is_empty()) {
            let point_id = PointId::new(did, res_id)?.underscored();
            let signal = signal_for(&point_id);

            entity.on_remove(self.bus.connect(&signal, handler.clone()));
            self.listener.register_point(&point_id);

            debug!(unique_id = %entity.unique_id(), signal = %signal, "Bound point signal");
            bound += 1;
        }

        Ok(bound)
    }
}
