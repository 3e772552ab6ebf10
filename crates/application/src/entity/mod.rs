mod number;
mod point_entity;

pub use number::NumberControl;
pub use point_entity::{DEFAULT_DOMAIN, EntityDescription, PointEntity};
