mod enumeration;
mod integer;
mod value_range;

pub use enumeration::EnumRange;
pub use integer::{DEFAULT_REMAP_MAX, DEFAULT_REMAP_MIN, IntegerRange, MAX_SCALE};
pub use value_range::{PointRange, RangeKind, ValueRangeDescriptor};
