// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast channel carrying [`DeviceEvent`]s.

use tokio::sync::broadcast::{self, error::RecvError};

use super::DeviceEvent;
use crate::config::ClientConfig;

/// Fan-out of registry events to any number of consumers.
///
/// Each consumer buffers up to the configured capacity. A consumer that
/// falls further behind loses the oldest events instead of stalling the
/// devices that publish them.
///
/// # Examples
///
/// ```
/// use knx_devices::event::{DeviceEvent, EventBus};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// assert_eq!(bus.publish(DeviceEvent::updated("kitchen.scene")), 1);
/// assert_eq!(rx.try_recv().unwrap().unique_id(), "kitchen.scene");
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DeviceEvent>,
}

impl EventBus {
    /// Creates an event bus with the default client event capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(ClientConfig::default().event_capacity())
    }

    /// Creates an event bus buffering `capacity` events per consumer.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.sender.subscribe()
    }

    /// Subscribes to the events of a single device.
    #[must_use]
    pub fn subscribe_device(&self, unique_id: impl Into<String>) -> DeviceEvents {
        DeviceEvents {
            unique_id: unique_id.into(),
            receiver: self.sender.subscribe(),
        }
    }

    /// Returns the number of live consumers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event and returns the number of consumers reached.
    ///
    /// Without consumers the event is dropped.
    pub fn publish(&self, event: DeviceEvent) -> usize {
        match self.sender.send(event) {
            Ok(reached) => reached,
            Err(err) => {
                tracing::trace!(device = %err.0.unique_id(), "No consumer for device event");
                0
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Events of one device, created by [`EventBus::subscribe_device`].
#[derive(Debug)]
pub struct DeviceEvents {
    unique_id: String,
    receiver: broadcast::Receiver<DeviceEvent>,
}

impl DeviceEvents {
    /// Returns the unique id the stream is filtered on.
    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Waits for the next event of the device.
    ///
    /// Lagging is logged and skipped. Returns `None` once every publisher is
    /// gone.
    pub async fn recv(&mut self) -> Option<DeviceEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.unique_id() == self.unique_id => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(device = %self.unique_id, skipped, "Device event consumer lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
