use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

/// Lower bound of the normalized external range (UI sliders).
pub const DEFAULT_REMAP_MIN: f64 = 0.0;
/// Upper bound of the normalized external range (UI sliders).
pub const DEFAULT_REMAP_MAX: f64 = 255.0;
/// Largest decimal exponent for which `10^scale` is a finite `f64`.
pub const MAX_SCALE: u32 = 308;

/// Rounding error, in units of the last place, that snapping absorbs.
const SNAP_ULPS: f64 = 8.0;

/// Wire shape of an integer descriptor, before invariants are checked.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIntegerRange {
    min: i64,
    max: i64,
    scale: i64,
    step: i64,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default, alias = "type")]
    kind: Option<String>,
}

/// Raw numeric domain of one device attribute.
///
/// Device values travel as integers; `scale` is the decimal exponent that
/// turns them into application units (`raw / 10^scale`).
///
/// Rules:
/// - `min <= max`
/// - `0 <= scale <= MAX_SCALE`
/// - `step > 0`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawIntegerRange")]
pub struct IntegerRange {
    min: i64,
    max: i64,
    scale: u32,
    step: i64,
    unit: Option<String>,
    kind: Option<String>,
}

impl TryFrom<RawIntegerRange> for IntegerRange {
    type Error = DomainError;

    fn try_from(raw: RawIntegerRange) -> Result<Self> {
        if raw.min > raw.max {
            return Err(DomainError::malformed(format!(
                "min ({}) is greater than max ({})",
                raw.min, raw.max
            )));
        }

        if raw.scale < 0 {
            return Err(DomainError::malformed(format!(
                "scale ({}) must not be negative",
                raw.scale
            )));
        }

        let scale = u32::try_from(raw.scale)
            .ok()
            .filter(|scale| *scale <= MAX_SCALE)
            .ok_or_else(|| {
                DomainError::malformed(format!(
                    "scale ({}) exceeds the maximum of {MAX_SCALE}",
                    raw.scale
                ))
            })?;

        if raw.step <= 0 {
            return Err(DomainError::malformed(format!(
                "step ({}) must be positive",
                raw.step
            )));
        }

        Ok(Self {
            min: raw.min,
            max: raw.max,
            scale,
            step: raw.step,
            unit: raw.unit,
            kind: raw.kind,
        })
    }
}

impl IntegerRange {
    /// Create a validated range
    pub fn new(min: i64, max: i64, scale: i64, step: i64) -> Result<Self> {
        Self::try_from(RawIntegerRange {
            min,
            max,
            scale,
            step,
            unit: None,
            kind: None,
        })
    }

    /// Parse a serialized capability descriptor such as
    /// `{"min":0,"max":100,"scale":1,"step":1,"unit":"%"}`.
    pub fn from_descriptor(serialized: &str) -> Result<Self> {
        let raw: RawIntegerRange = serde_json::from_str(serialized)
            .map_err(|e| DomainError::malformed(e.to_string()))?;
        Self::try_from(raw)
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    // Getters
    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// Decimal exponent
    pub fn scale_exponent(&self) -> u32 {
        self.scale
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// True when `min == max`; such a range cannot be remapped.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Whether a raw device value lies inside `[min, max]`
    pub fn contains(&self, raw: i64) -> bool {
        (self.min..=self.max).contains(&raw)
    }

    fn factor(&self) -> f64 {
        // MAX_SCALE keeps this within i32 and finite
        10f64.powi(self.scale as i32)
    }

    /// Convert a raw device value into application units: `raw / 10^scale`.
    pub fn scale(&self, raw: f64) -> f64 {
        raw / self.factor()
    }

    /// Convert an application value back into raw device units.
    ///
    /// The product `value * 10^scale` is truncated toward zero. Products that
    /// sit within floating-point noise of an integer are snapped to it first,
    /// so `unscale(scale(v)) == v` for every integer `v`.
    pub fn unscale(&self, value: f64) -> i64 {
        let product = value * self.factor();
        snap_trunc(product, product.abs())
    }

    pub fn max_scaled(&self) -> f64 {
        self.scale(self.max as f64)
    }

    pub fn min_scaled(&self) -> f64 {
        self.scale(self.min as f64)
    }

    pub fn step_scaled(&self) -> f64 {
        self.scale(self.step as f64)
    }

    /// Linearly remap `value` from `[min, max]` into `[to_min, to_max]`.
    ///
    /// With `reverse`, the distance is measured from `max` instead of `min`,
    /// so `min` lands on `to_max` and `max` on `to_min`. The result is not
    /// clamped.
    pub fn remap_to(&self, value: f64, to_min: f64, to_max: f64, reverse: bool) -> Result<f64> {
        self.ensure_spread()?;
        Ok(remap(
            value,
            self.min as f64,
            self.max as f64,
            to_min,
            to_max,
            reverse,
        ))
    }

    /// Linearly remap `value` from `[from_min, from_max]` into `[min, max]`.
    ///
    /// Exact inverse of [`remap_to`](Self::remap_to) for the same bounds and
    /// `reverse` flag.
    pub fn remap_from(
        &self,
        value: f64,
        from_min: f64,
        from_max: f64,
        reverse: bool,
    ) -> Result<f64> {
        self.ensure_spread()?;
        if from_min == from_max {
            return Err(DomainError::DegenerateRange {
                min: from_min,
                max: from_max,
            });
        }
        Ok(remap(
            value,
            from_min,
            from_max,
            self.min as f64,
            self.max as f64,
            reverse,
        ))
    }

    /// [`remap_from`](Self::remap_from) as a raw device integer.
    ///
    /// Truncates toward zero like [`unscale`](Self::unscale), so a level
    /// read through `remap_to` writes back the raw value it came from.
    pub fn remap_from_raw(
        &self,
        value: f64,
        from_min: f64,
        from_max: f64,
        reverse: bool,
    ) -> Result<i64> {
        let remapped = self.remap_from(value, from_min, from_max, reverse)?;

        let ratio = (self.max as f64 - self.min as f64) / (from_max - from_min).abs();
        let operands = value.abs().max(from_min.abs()).max(from_max.abs());
        let magnitude = operands * ratio + (self.min as f64).abs() + remapped.abs();
        Ok(snap_trunc(remapped, magnitude))
    }

    /// [`remap_to`](Self::remap_to) into `0..=255`
    pub fn remap_to_default(&self, value: f64, reverse: bool) -> Result<f64> {
        self.remap_to(value, DEFAULT_REMAP_MIN, DEFAULT_REMAP_MAX, reverse)
    }

    /// [`remap_from`](Self::remap_from) out of `0..=255`
    pub fn remap_from_default(&self, value: f64, reverse: bool) -> Result<f64> {
        self.remap_from(value, DEFAULT_REMAP_MIN, DEFAULT_REMAP_MAX, reverse)
    }

    fn ensure_spread(&self) -> Result<()> {
        if self.is_degenerate() {
            return Err(DomainError::DegenerateRange {
                min: self.min as f64,
                max: self.max as f64,
            });
        }
        Ok(())
    }
}

/// Truncate `x` toward zero, first snapping it to the nearest integer when
/// it is within `SNAP_ULPS` units of the last place of `magnitude`.
fn snap_trunc(x: f64, magnitude: f64) -> i64 {
    let nearest = x.round();
    if (x - nearest).abs() <= SNAP_ULPS * f64::EPSILON * magnitude.max(1.0) {
        nearest as i64
    } else {
        x.trunc() as i64
    }
}

fn remap(value: f64, from_min: f64, from_max: f64, to_min: f64, to_max: f64, reverse: bool) -> f64 {
    let offset = if reverse {
        from_max - value
    } else {
        value - from_min
    };
    offset / (from_max - from_min) * (to_max - to_min) + to_min
}
