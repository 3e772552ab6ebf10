//! Domain layer - Pure point/range logic with no external dependencies
//!
//! This crate contains:
//! - Value Objects (IntegerRange, EnumRange, PointRange, PointId)
//! - Entities (Point, Device)
//! - Bridge Events relayed over the host's signal bus
//! - Port interfaces (traits) for the device manager, device registry,
//!   point listener and signal bus
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Range invariants enforced at construction
//! - Pure, synchronous transcoding that is safe to share across threads
//! - Testable in isolation

pub mod device;
pub mod error;
pub mod event;
pub mod point;
pub mod range;

// Re-export commonly used types
pub use device::{Device, DeviceInfo, DeviceManager, DeviceRegistry};
pub use error::{DomainError, Result};
pub use event::{BridgeEvent, SignalBus, StateWriter, Subscription};
pub use point::{Point, PointId, PointListener};
pub use range::{EnumRange, IntegerRange, PointRange};
