mod entity;
mod listener;
mod point_id;

pub use entity::Point;
pub use listener::PointListener;
pub use point_id::{POINT_ID_SEPARATOR, PointId, dot_to_underscore, underscore_to_dot};

#[cfg(test)]
pub use listener::MockPointListener;
