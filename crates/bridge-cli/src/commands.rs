use std::fmt::Write;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, warn};

use application::{NumberControl, PointEntity};
use domain::{DeviceManager, IntegerRange, Point, PointId, PointRange};
use infrastructure::{BridgeConfig, CatalogDeviceManager};

pub fn parse_range(descriptor: &str) -> Result<IntegerRange> {
    IntegerRange::from_descriptor(descriptor).context("Invalid integer range descriptor")
}

pub fn scale(descriptor: &str, raw: f64) -> Result<String> {
    let range = parse_range(descriptor)?;
    Ok(with_unit(range.scale(raw), range.unit()))
}

pub fn unscale(descriptor: &str, value: f64) -> Result<String> {
    let range = parse_range(descriptor)?;
    let raw = range.unscale(value);
    if !range.contains(raw) {
        warn!(raw, min = range.min(), max = range.max(), "Unscaled value is outside the range");
    }
    Ok(raw.to_string())
}

pub fn remap_to(
    descriptor: &str,
    value: f64,
    to_min: f64,
    to_max: f64,
    reverse: bool,
) -> Result<String> {
    let range = parse_range(descriptor)?;
    Ok(range.remap_to(value, to_min, to_max, reverse)?.to_string())
}

pub fn remap_from(
    descriptor: &str,
    value: f64,
    from_min: f64,
    from_max: f64,
    reverse: bool,
) -> Result<String> {
    let range = parse_range(descriptor)?;
    Ok(range
        .remap_from(value, from_min, from_max, reverse)?
        .to_string())
}

/// Catalog named on the command line, else the configured one
pub fn open_catalog(
    catalog: Option<&str>,
    config: &BridgeConfig,
) -> Result<Arc<CatalogDeviceManager>> {
    let path = catalog
        .or(config.catalog_path.as_deref())
        .ok_or_else(|| anyhow!("No device catalog given (use --catalog or set catalog_path)"))?;
    Ok(Arc::new(CatalogDeviceManager::load(path)?))
}

/// Human readable listing of every device and point in the catalog
pub fn inspect(manager: Arc<CatalogDeviceManager>, config: &BridgeConfig) -> Result<String> {
    let mut out = String::new();

    for device in manager.devices() {
        let mut points = device.points().cloned().peekable();
        let Some(first) = points.peek() else {
            writeln!(out, "{}({}) has no points", device.device_name, device.did)?;
            continue;
        };

        let info = entity_for(first.clone(), &manager, config).device_info()?;
        let identifiers: Vec<String> = info
            .identifiers
            .iter()
            .map(|(domain, id)| format!("{domain}:{id}"))
            .collect();
        writeln!(
            out,
            "{} [{}] manufacturer={} area={} id={}",
            info.name,
            info.model,
            info.manufacturer,
            info.suggested_area,
            identifiers.join(",")
        )?;

        for point in points {
            let entity = entity_for(point, &manager, config);
            let unique_id = entity.unique_id().to_string();
            let name = entity.name();
            let state = if entity.available() { "online" } else { "offline" };
            let value = describe_value(entity, config);
            writeln!(out, "  {unique_id} {name} {state} {value}")?;
        }
    }

    Ok(out)
}

fn entity_for(
    point: Point,
    manager: &Arc<CatalogDeviceManager>,
    config: &BridgeConfig,
) -> PointEntity {
    let manager: Arc<dyn DeviceManager> = manager.clone();
    PointEntity::new(point, manager)
        .with_domain(config.domain.clone())
        .with_manufacturer(config.manufacturer.clone())
}

fn describe_value(entity: PointEntity, config: &BridgeConfig) -> String {
    let raw = entity.point().value.clone().unwrap_or_else(|| "-".to_string());

    let range = match entity.point().range() {
        Ok(Some(range)) => range,
        Ok(None) => return format!("raw={raw}"),
        Err(e) => return format!("raw={raw} invalid range: {e}"),
    };

    match range {
        PointRange::Integer(range) => {
            let bounds = format!(
                "Integer {}..{} scale={}",
                range.min(),
                range.max(),
                range.scale_exponent()
            );
            let control = NumberControl::new(entity, range)
                .with_level_bounds(config.level_min, config.level_max);
            match (control.native_value(), control.level(false)) {
                (Ok(Some(value)), Ok(Some(level))) => format!(
                    "raw={raw} {bounds} value={} level={level}",
                    with_unit(value, control.unit())
                ),
                (Ok(None), _) => format!("raw={raw} {bounds}"),
                (Err(e), _) | (_, Err(e)) => format!("raw={raw} {bounds} invalid value: {e}"),
                (Ok(Some(value)), Ok(None)) => {
                    format!("raw={raw} {bounds} value={}", with_unit(value, control.unit()))
                }
            }
        }
        PointRange::Enum(range) => {
            let label = raw
                .parse::<usize>()
                .ok()
                .and_then(|index| range.get(index))
                .unwrap_or("?");
            format!("raw={raw} Enum [{}] value={label}", range.values().join(","))
        }
        other => format!("raw={raw} {}", other.kind()),
    }
}

/// Write `value` to an integer point and report the raw command it produced
pub async fn set_point(
    manager: Arc<CatalogDeviceManager>,
    config: &BridgeConfig,
    point_id: &str,
    value: f64,
    level: bool,
    reverse: bool,
) -> Result<String> {
    let id = PointId::parse(point_id)?;
    let point = manager
        .device(id.did())
        .and_then(|device| device.point_map.get(id.as_str()).cloned())
        .ok_or_else(|| anyhow!("Point {id} is not in the catalog"))?;

    let control = NumberControl::from_point(entity_for(point, &manager, config))?
        .with_level_bounds(config.level_min, config.level_max);

    if level {
        control.set_level(value, reverse).await?;
    } else {
        control.set_native_value(value).await?;
    }

    let sent = manager
        .sent_commands()
        .pop()
        .ok_or_else(|| anyhow!("No command was recorded for {id}"))?;
    debug!(point_id = %id, commands = ?sent.commands, "Command recorded");

    let commands: Vec<String> = sent
        .commands
        .iter()
        .map(|(res_id, raw)| format!("{res_id}={raw}"))
        .collect();
    Ok(format!("{} {}", sent.did, commands.join(",")))
}

fn with_unit(value: f64, unit: Option<&str>) -> String {
    match unit {
        Some(unit) => format!("{value} {unit}"),
        None => value.to_string(),
    }
}
