//! Infrastructure layer - Configuration and the offline device catalog

pub mod catalog;
pub mod config;

pub use catalog::{CatalogDevice, CatalogDeviceManager, CatalogPoint};
pub use config::BridgeConfig;
