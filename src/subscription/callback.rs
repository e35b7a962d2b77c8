// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for device update subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Per-device registry for storing and dispatching callbacks

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::devices::Device;

/// Unique identifier for a subscription.
///
/// This ID is returned when registering a callback and can be used to
/// unregister it later. IDs are unique within a device's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Result returned by a device callback.
pub type CallbackResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Callback invoked with the device after its state changed.
pub type DeviceCallback = Arc<dyn Fn(&dyn Device) -> CallbackResult + Send + Sync>;

/// Registry of device-updated callbacks.
///
/// Callbacks run synchronously in registration order. A failing callback is
/// logged and does not prevent the remaining callbacks from running.
///
/// # Thread Safety
///
/// The registry can be shared between tasks. Dispatch works on a snapshot of
/// the registered callbacks, so a callback may register or unregister others
/// without deadlocking.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// Registered callbacks in registration order.
    callbacks: RwLock<Vec<(SubscriptionId, DeviceCallback)>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            callbacks: RwLock::new(Vec::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback and returns its subscription ID.
    pub fn register(&self, callback: DeviceCallback) -> SubscriptionId {
        let id = self.next_id();
        self.callbacks.write().push((id, callback));
        id
    }

    /// Registers a closure as callback.
    pub fn on_device_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&dyn Device) -> CallbackResult + Send + Sync + 'static,
    {
        self.register(Arc::new(callback))
    }

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut callbacks = self.callbacks.write();
        let before = callbacks.len();
        callbacks.retain(|(registered, _)| *registered != id);
        callbacks.len() != before
    }

    /// Invokes every callback with `device`.
    ///
    /// Returns the number of callbacks that failed.
    pub fn dispatch(&self, device: &dyn Device) -> usize {
        let snapshot: Vec<_> = self
            .callbacks
            .read()
            .iter()
            .map(|(id, callback)| (*id, Arc::clone(callback)))
            .collect();

        let mut failures = 0;
        for (id, callback) in snapshot {
            if let Err(err) = callback(device) {
                failures += 1;
                tracing::warn!(
                    device = %device.name(),
                    subscription = %id,
                    error = %err,
                    "Device updated callback failed"
                );
            }
        }
        failures
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}
