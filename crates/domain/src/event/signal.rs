//! Ports onto the host framework's dispatcher.
//!
//! The bridge never implements the bus; it only names signals, connects
//! handlers and sends [`BridgeEvent`]s.

use std::sync::Arc;

use crate::BridgeEvent;
use crate::point::dot_to_underscore;

/// Global signal announcing newly registered points
pub const REGISTER_POINT: &str = "aqara_register_point";
/// Prefix of the per-point "write entity state" signal
pub const UPDATE_ENTITY: &str = "aqara_update_entity";
/// Prefix of the per-point "new raw value" signal
pub const UPDATE_POINT_VALUE: &str = "aqara_update_point_value";

/// `aqara_update_entity_{point id with dots as underscores}`
pub fn entity_update_signal(point_id: &str) -> String {
    format!("{UPDATE_ENTITY}_{}", dot_to_underscore(point_id))
}

/// `aqara_update_point_value_{point id with dots as underscores}`
pub fn point_value_signal(point_id: &str) -> String {
    format!("{UPDATE_POINT_VALUE}_{}", dot_to_underscore(point_id))
}

pub type SignalHandler = Arc<dyn Fn(&BridgeEvent) + Send + Sync>;

pub trait SignalBus: Send + Sync {
    /// Connect `handler` to `signal` until the returned subscription is
    /// released or dropped.
    fn connect(&self, signal: &str, handler: SignalHandler) -> Subscription;

    fn send(&self, signal: &str, event: BridgeEvent);
}

/// Host callback that writes an entity's current state
pub trait StateWriter: Send + Sync {
    fn write_state(&self, unique_id: &str);
}

/// Handle to a connected signal handler. Disconnects on release or drop.
#[must_use = "dropping a subscription disconnects its handler"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to disconnect
    pub fn noop() -> Self {
        Self { release: None }
    }

    pub fn release(mut self) {
        self.disconnect();
    }

    fn disconnect(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_signal_names() {
        assert_eq!(
            entity_update_signal("lumi1.54ef4426f6b9__14.1.111"),
            "aqara_update_entity_lumi1_54ef4426f6b9__14_1_111"
        );
        assert_eq!(
            point_value_signal("lumi_1__0_1_85"),
            "aqara_update_point_value_lumi_1__0_1_85"
        );
    }

    #[test]
    fn test_subscription_releases_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = released.clone();
        let subscription = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        subscription.release();
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscription_releases_on_drop() {
        let released = Arc::new(AtomicUsize::new(0));
        {
            let counter = released.clone();
            let _subscription = Subscription::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_noop_subscription() {
        let subscription = Subscription::noop();
        assert_eq!(format!("{subscription:?}"), "Subscription { active: false }");
        subscription.release();
    }
}
