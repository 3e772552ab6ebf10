use super::DeviceInfo;

/// Host platform device registry
#[cfg_attr(test, mockall::automock)]
pub trait DeviceRegistry: Send + Sync {
    /// Create the device entry for `config_entry_id`, or return silently if
    /// one with the same identifiers already exists.
    fn get_or_create(&self, config_entry_id: &str, info: &DeviceInfo);
}
