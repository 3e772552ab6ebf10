mod common;

use application::{DescriptionMap, EntityDescription, PointEntity, PointRegistrar};
use common::*;
use domain::event::{REGISTER_POINT, SignalHandler, entity_update_signal, point_value_signal};
use domain::{BridgeEvent, DeviceManager, Point, SignalBus};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

struct Harness {
    manager: Arc<FakeDeviceManager>,
    registry: Arc<RecordingRegistry>,
    bus: Arc<FakeBus>,
    listener: Arc<RecordingListener>,
    registrar: PointRegistrar,
}

fn harness() -> Harness {
    let manager = FakeDeviceManager::new(vec![gateway(), sensor()]);
    let registry = Arc::new(RecordingRegistry::default());
    let bus = Arc::new(FakeBus::default());
    let listener = Arc::new(RecordingListener::default());
    let registrar = PointRegistrar::new(
        manager.clone(),
        registry.clone(),
        bus.clone(),
        listener.clone(),
    );

    Harness {
        manager,
        registry,
        bus,
        listener,
        registrar,
    }
}

fn descriptions() -> DescriptionMap {
    DescriptionMap::from([
        (
            "lumi.gateway.agl001".to_string(),
            vec![
                EntityDescription::new("14.1.111", Some("Alarm status")),
                EntityDescription::new("14.9.111", Some("Not on this device")),
            ],
        ),
        (
            "lumi.weather.v1".to_string(),
            vec![
                EntityDescription::new("0.1.85", Some("Temperature")),
                EntityDescription::new("0.2.85", Some("Humidity")),
            ],
        ),
    ])
}

// --- Use Case Tests ---

#[test]
fn registers_described_points_only() {
    let h = harness();
    let mut appended: Vec<(Point, EntityDescription)> = Vec::new();

    let count = h.registrar.register_device_points(
        "entry-1",
        &h.manager.device_ids(),
        &descriptions(),
        |point, description| appended.push((point, description.clone())),
    );

    assert_eq!(count, 3);
    let ids: Vec<String> = appended.iter().map(|(p, _)| p.id.to_string()).collect();
    assert!(ids.contains(&"lumi1.54ef4426f6b9__14.1.111".to_string()));
    assert!(ids.contains(&"lumi.158d0001__0.1.85".to_string()));
    assert!(ids.contains(&"lumi.158d0001__0.2.85".to_string()));
}

#[test]
fn creates_each_device_once_in_registry() {
    let h = harness();
    h.registrar
        .register_device_points("entry-1", &h.manager.device_ids(), &descriptions(), |_, _| {});

    let entries = h.registry.entries.lock().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|(entry, _)| entry == "entry-1"));

    let sensor = entries
        .iter()
        .find(|(_, info)| info.identifiers[0].1 == "lumi_158d0001")
        .map(|(_, info)| info.clone())
        .unwrap();
    assert_eq!(sensor.manufacturer, "Aqara");
    assert_eq!(sensor.name, "lumi.158d0001");
    assert_eq!(sensor.suggested_area, "Bedroom");
}

#[test]
fn configured_manufacturer_reaches_registry_and_entities() {
    let h = harness();
    let registrar = PointRegistrar::new(
        h.manager.clone(),
        h.registry.clone(),
        h.bus.clone(),
        h.listener.clone(),
    )
    .with_manufacturer("Aqara Home");

    let mut entities: Vec<PointEntity> = Vec::new();
    registrar.register_device_points(
        "entry-1",
        &[SENSOR_DID.to_string()],
        &descriptions(),
        |point, description| entities.push(registrar.entity_for(point, description)),
    );

    let entries = h.registry.entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].1.manufacturer, "Aqara Home");

    let info = entities[0].device_info().unwrap();
    assert_eq!(info.manufacturer, "Aqara Home");
    assert_eq!(info.name, "TH Sensor(lumi.158d0001)");
}

#[test]
fn announces_registered_points_with_underscored_ids() {
    let h = harness();
    h.registrar.register_device_points(
        "entry-1",
        &[GATEWAY_DID.to_string()],
        &descriptions(),
        |_, _| {},
    );

    let sent = h.bus.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, REGISTER_POINT);
    assert_eq!(sent[0].1.point_id(), "lumi1_54ef4426f6b9__14_1_111");
}

#[test]
fn skips_unknown_devices_and_models() {
    let h = harness();
    let count = h.registrar.register_device_points(
        "entry-1",
        &["lumi.unknown".to_string(), SENSOR_DID.to_string()],
        &DescriptionMap::new(),
        |_, _| panic!("nothing should be appended"),
    );

    assert_eq!(count, 0);
    assert!(h.registry.entries.lock().unwrap().is_empty());
    assert!(h.bus.sent.lock().unwrap().is_empty());
}

#[test]
fn entity_update_signal_writes_state() {
    let h = harness();
    let writer = Arc::new(RecordingWriter::default());
    let point = gateway().point("14.1.111").unwrap().clone();
    let mut entity = h
        .registrar
        .entity_for(point, &EntityDescription::new("14.1.111", None));

    entity.added_to_bus(h.bus.as_ref(), writer.clone());

    let signal = entity_update_signal("lumi1.54ef4426f6b9__14.1.111");
    h.bus
        .send(&signal, BridgeEvent::entity_updated("lumi1_54ef4426f6b9__14_1_111"));

    assert_eq!(
        *writer.writes.lock().unwrap(),
        vec!["Aqara.lumi1.54ef4426f6b9__14.1.111".to_string()]
    );
}

#[test]
fn bind_entity_updates_connects_and_listens() {
    let h = harness();
    let writer = Arc::new(RecordingWriter::default());
    let point = gateway().point("14.1.111").unwrap().clone();
    let mut entity = PointEntity::new(point, h.manager.clone());

    let bound = h
        .registrar
        .bind_entity_updates(
            &mut entity,
            GATEWAY_DID,
            &["14.1.111", "", "14.7.111"],
            writer.clone(),
        )
        .unwrap();

    assert_eq!(bound, 2);
    assert_eq!(entity.subscription_count(), 2);
    assert_eq!(
        *h.listener.points.lock().unwrap(),
        vec![
            "lumi1_54ef4426f6b9__14_1_111".to_string(),
            "lumi1_54ef4426f6b9__14_7_111".to_string()
        ]
    );

    h.bus.send(
        &entity_update_signal("lumi1_54ef4426f6b9__14_7_111"),
        BridgeEvent::entity_updated("lumi1_54ef4426f6b9__14_7_111"),
    );
    assert_eq!(writer.writes.lock().unwrap().len(), 1);
}

#[test]
fn bind_point_value_updates_relays_values() {
    let h = harness();
    let received: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let callback: SignalHandler = Arc::new(move |event: &BridgeEvent| {
        if let BridgeEvent::PointValueUpdated { value, .. } = event {
            sink.lock().unwrap().push(value.clone());
        }
    });

    let point = sensor().point("0.1.85").unwrap().clone();
    let mut entity = PointEntity::new(point, h.manager.clone());
    h.registrar
        .bind_point_value_updates(&mut entity, SENSOR_DID, &["0.1.85", "0.2.85"], callback)
        .unwrap();

    let signal = point_value_signal("lumi_158d0001__0_2_85");
    h.bus
        .send(&signal, BridgeEvent::point_value_updated("lumi_158d0001__0_2_85", "5012"));

    assert_eq!(*received.lock().unwrap(), vec!["5012".to_string()]);
}

#[test]
fn removing_entity_disconnects_handlers() {
    let h = harness();
    let writer = Arc::new(RecordingWriter::default());
    let point = gateway().point("14.1.111").unwrap().clone();
    let mut entity = PointEntity::new(point, h.manager.clone());

    h.registrar
        .bind_entity_updates(&mut entity, GATEWAY_DID, &["14.1.111"], writer.clone())
        .unwrap();
    let signal = entity_update_signal("lumi1_54ef4426f6b9__14_1_111");
    assert_eq!(h.bus.handler_count(&signal), 1);

    entity.remove();
    assert_eq!(h.bus.handler_count(&signal), 0);

    h.bus
        .send(&signal, BridgeEvent::entity_updated("lumi1_54ef4426f6b9__14_1_111"));
    assert!(writer.writes.lock().unwrap().is_empty());
}

#[test]
fn bind_rejects_malformed_device_id() {
    let h = harness();
    let point = gateway().point("14.1.111").unwrap().clone();
    let mut entity = PointEntity::new(point, h.manager.clone());

    let result = h.registrar.bind_entity_updates(
        &mut entity,
        "",
        &["14.1.111"],
        Arc::new(RecordingWriter::default()),
    );
    assert!(result.is_err());
}

#[tokio::test]
async fn registered_entity_sends_commands_to_its_device() {
    let h = harness();
    let mut entities: Vec<PointEntity> = Vec::new();
    h.registrar.register_device_points(
        "entry-1",
        &[GATEWAY_DID.to_string()],
        &descriptions(),
        |point, description| entities.push(h.registrar.entity_for(point, description)),
    );

    let siren = &entities[0];
    assert_eq!(siren.name(), "Alarm(lumi1.54ef4426f6b9)");
    assert_eq!(siren.device_info().unwrap().model, "lumi.gateway.agl001");

    siren
        .send_command(BTreeMap::from([("14.1.111".to_string(), "1".to_string())]))
        .await
        .unwrap();

    let sent = h.manager.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, GATEWAY_DID);
    assert_eq!(sent[0].1["14.1.111"], "1");
}
