use std::collections::BTreeMap;

use tracing::{debug, warn};

use domain::range::{DEFAULT_REMAP_MAX, DEFAULT_REMAP_MIN};
use domain::{DomainError, IntegerRange, PointRange, Result};

use super::PointEntity;

/// Numeric control over an integer point.
///
/// Reads are scaled into application units (or remapped onto a level
/// slider); writes go back through `unscale` / `remap_from` so the device
/// only ever receives raw integers.
#[derive(Debug)]
pub struct NumberControl {
    entity: PointEntity,
    range: IntegerRange,
    level_min: f64,
    level_max: f64,
}

impl NumberControl {
    pub fn new(entity: PointEntity, range: IntegerRange) -> Self {
        Self {
            entity,
            range,
            level_min: DEFAULT_REMAP_MIN,
            level_max: DEFAULT_REMAP_MAX,
        }
    }

    /// Build from the integer range the point itself reports
    pub fn from_point(entity: PointEntity) -> Result<Self> {
        match entity.point().range()? {
            Some(PointRange::Integer(range)) => Ok(Self::new(entity, range)),
            Some(other) => Err(DomainError::MalformedDescriptor(format!(
                "point {} has a {} range, expected Integer",
                entity.point().id,
                other.kind()
            ))),
            None => Err(DomainError::MalformedDescriptor(format!(
                "point {} reports no value range",
                entity.point().id
            ))),
        }
    }

    /// Bounds of the external level range (defaults to `0..=255`)
    pub fn with_level_bounds(mut self, level_min: f64, level_max: f64) -> Self {
        self.level_min = level_min;
        self.level_max = level_max;
        self
    }

    pub fn entity(&self) -> &PointEntity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut PointEntity {
        &mut self.entity
    }

    pub fn range(&self) -> &IntegerRange {
        &self.range
    }

    pub fn native_min(&self) -> f64 {
        self.range.min_scaled()
    }

    pub fn native_max(&self) -> f64 {
        self.range.max_scaled()
    }

    pub fn native_step(&self) -> f64 {
        self.range.step_scaled()
    }

    pub fn unit(&self) -> Option<&str> {
        self.range.unit()
    }

    /// Current value in application units
    pub fn native_value(&self) -> Result<Option<f64>> {
        Ok(self
            .entity
            .point()
            .numeric_value()?
            .map(|raw| self.range.scale(raw)))
    }

    /// Current value on the level slider.
    ///
    /// A degenerate range has no slider; the raw value is passed through.
    pub fn level(&self, reverse: bool) -> Result<Option<f64>> {
        let Some(raw) = self.entity.point().numeric_value()? else {
            return Ok(None);
        };

        match self
            .range
            .remap_to(raw, self.level_min, self.level_max, reverse)
        {
            Ok(level) => Ok(Some(level)),
            Err(DomainError::DegenerateRange { .. }) => {
                warn!(
                    point_id = %self.entity.point().id,
                    raw = %raw,
                    "Degenerate range, passing raw value through as level"
                );
                Ok(Some(raw))
            }
            Err(e) => Err(e),
        }
    }

    /// Write a value given in application units
    pub async fn set_native_value(&self, value: f64) -> Result<()> {
        let raw = self.range.unscale(value);
        debug!(
            point_id = %self.entity.point().id,
            input = %value,
            raw = %raw,
            "Unscaled native value"
        );
        self.send_raw(raw).await
    }

    /// Write a value given on the level slider
    pub async fn set_level(&self, level: f64, reverse: bool) -> Result<()> {
        let raw = self
            .range
            .remap_from_raw(level, self.level_min, self.level_max, reverse)?;
        debug!(
            point_id = %self.entity.point().id,
            level = %level,
            raw = %raw,
            "Remapped level"
        );
        self.send_raw(raw).await
    }

    async fn send_raw(&self, raw: i64) -> Result<()> {
        let commands = BTreeMap::from([(self.entity.point().res_id().to_string(), raw.to_string())]);
        self.entity.send_command(commands).await
    }
}
