//! Application layer - Point entities and their wiring to the host platform

pub mod entity;
pub mod registration;

pub use entity::{EntityDescription, NumberControl, PointEntity};
pub use registration::{DescriptionMap, PointRegistrar};
