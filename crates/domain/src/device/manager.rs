use std::collections::BTreeMap;

use super::Device;
use crate::DomainError;
use async_trait::async_trait;

/// Port to the vendor device manager (cloud device discovery and command
/// encoding live behind it).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceManager: Send + Sync {
    /// Snapshot of a device and its points
    fn device(&self, did: &str) -> Option<Device>;

    /// Ids of every known device
    fn device_ids(&self) -> Vec<String>;

    /// Model string for the device; defaults to the device's own model
    fn device_model(&self, did: &str) -> Option<String> {
        self.device(did).map(|device| device.model)
    }

    /// Send raw `{res_id: value}` commands to a device
    async fn send_commands(
        &self,
        did: &str,
        commands: &BTreeMap<String, String>,
    ) -> Result<(), DomainError>;
}
