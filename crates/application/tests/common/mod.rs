#![allow(dead_code)]

use async_trait::async_trait;
use domain::event::SignalHandler;
use domain::{
    BridgeEvent, Device, DeviceInfo, DeviceManager, DeviceRegistry, DomainError, Point, PointId,
    PointListener, SignalBus, StateWriter, Subscription,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

// --- Host Fakes (Ports) ---

pub struct FakeDeviceManager {
    devices: HashMap<String, Device>,
    pub sent: Mutex<Vec<(String, BTreeMap<String, String>)>>,
}

impl FakeDeviceManager {
    pub fn new(devices: Vec<Device>) -> Arc<Self> {
        Arc::new(Self {
            devices: devices.into_iter().map(|d| (d.did.clone(), d)).collect(),
            sent: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl DeviceManager for FakeDeviceManager {
    fn device(&self, did: &str) -> Option<Device> {
        self.devices.get(did).cloned()
    }

    fn device_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.devices.keys().cloned().collect();
        ids.sort();
        ids
    }

    async fn send_commands(
        &self,
        did: &str,
        commands: &BTreeMap<String, String>,
    ) -> Result<(), DomainError> {
        if !self.devices.contains_key(did) {
            return Err(DomainError::DeviceNotFound(did.to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((did.to_string(), commands.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingRegistry {
    pub entries: Mutex<Vec<(String, DeviceInfo)>>,
}

impl DeviceRegistry for RecordingRegistry {
    fn get_or_create(&self, config_entry_id: &str, info: &DeviceInfo) {
        let mut entries = self.entries.lock().unwrap();
        if !entries.iter().any(|(_, e)| e.identifiers == info.identifiers) {
            entries.push((config_entry_id.to_string(), info.clone()));
        }
    }
}

#[derive(Default)]
pub struct RecordingListener {
    pub points: Mutex<Vec<String>>,
}

impl PointListener for RecordingListener {
    fn register_point(&self, point_id: &str) {
        self.points.lock().unwrap().push(point_id.to_string());
    }
}

#[derive(Default)]
pub struct RecordingWriter {
    pub writes: Mutex<Vec<String>>,
}

impl StateWriter for RecordingWriter {
    fn write_state(&self, unique_id: &str) {
        self.writes.lock().unwrap().push(unique_id.to_string());
    }
}

type Handlers = HashMap<String, Vec<(u64, SignalHandler)>>;

/// Minimal in-memory dispatcher standing in for the host's signal bus
#[derive(Default)]
pub struct FakeBus {
    handlers: Arc<Mutex<Handlers>>,
    next_id: AtomicU64,
    pub sent: Mutex<Vec<(String, BridgeEvent)>>,
}

impl FakeBus {
    pub fn handler_count(&self, signal: &str) -> usize {
        self.handlers
            .lock()
            .unwrap()
            .get(signal)
            .map_or(0, Vec::len)
    }
}

impl SignalBus for FakeBus {
    fn connect(&self, signal: &str, handler: SignalHandler) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.handlers
            .lock()
            .unwrap()
            .entry(signal.to_string())
            .or_default()
            .push((id, handler));

        let handlers = Arc::downgrade(&self.handlers);
        let signal = signal.to_string();
        Subscription::new(move || {
            if let Some(handlers) = handlers.upgrade() {
                if let Some(list) = handlers.lock().unwrap().get_mut(&signal) {
                    list.retain(|(handler_id, _)| *handler_id != id);
                }
            }
        })
    }

    fn send(&self, signal: &str, event: BridgeEvent) {
        let targets: Vec<SignalHandler> = self
            .handlers
            .lock()
            .unwrap()
            .get(signal)
            .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();

        for handler in targets {
            handler(&event);
        }
        self.sent.lock().unwrap().push((signal.to_string(), event));
    }
}

// --- Fixtures ---

pub const GATEWAY_DID: &str = "lumi1.54ef4426f6b9";
pub const SENSOR_DID: &str = "lumi.158d0001";

pub fn gateway() -> Device {
    Device::new(GATEWAY_DID, "Hub M2", "lumi.gateway.agl001", "Hall")
        .with_point(point(GATEWAY_DID, "14.1.111", "Alarm", "0"))
        .with_point(point(GATEWAY_DID, "14.7.111", "", "1"))
}

pub fn sensor() -> Device {
    Device::new(SENSOR_DID, "TH Sensor", "lumi.weather.v1", "Bedroom")
        .with_point(point(SENSOR_DID, "0.1.85", "Temperature", "2150"))
        .with_point(point(SENSOR_DID, "0.2.85", "Humidity", "4820"))
}

fn point(did: &str, res_id: &str, name: &str, value: &str) -> Point {
    Point::new(PointId::new(did, res_id).unwrap(), name).with_value(value)
}
