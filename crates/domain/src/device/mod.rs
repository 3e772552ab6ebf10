mod entity;
mod manager;
mod registry;

pub use entity::{Device, DeviceInfo, MANUFACTURER};
pub use manager::DeviceManager;
pub use registry::DeviceRegistry;

#[cfg(test)]
pub use manager::MockDeviceManager;
#[cfg(test)]
pub use registry::MockDeviceRegistry;
