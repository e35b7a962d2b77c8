// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The registry of constructed devices.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;

use super::Device;
use crate::event::{DeviceEvent, DeviceEvents, EventBus};
use crate::types::GroupAddress;

/// Shared collection of every device constructed for a client.
///
/// Cloning the handle shares the underlying collection. Devices keep their
/// registration order and are never removed.
#[derive(Debug, Clone)]
pub struct Devices {
    devices: Arc<RwLock<Vec<Arc<dyn Device>>>>,
    events: EventBus,
}

impl Devices {
    /// Creates an empty registry whose event channel buffers `event_capacity`
    /// events per subscriber.
    #[must_use]
    pub fn new(event_capacity: usize) -> Self {
        Self {
            devices: Arc::new(RwLock::new(Vec::new())),
            events: EventBus::with_capacity(event_capacity),
        }
    }

    /// Registers a device.
    ///
    /// Every later update of the device is published as
    /// [`DeviceEvent::Updated`].
    pub fn add(&self, device: Arc<dyn Device>) {
        let events = self.events.clone();
        device.register_device_updated_cb(Arc::new(move |device: &dyn Device| {
            events.publish(DeviceEvent::updated(device.unique_id()));
            Ok(())
        }));

        tracing::debug!(
            device = %device.name(),
            kind = device.kind(),
            unique_id = %device.unique_id(),
            "Registered device"
        );
        let event = DeviceEvent::added(device.unique_id());
        self.devices.write().push(device);
        self.events.publish(event);
    }

    /// Returns the number of registered devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    /// Returns `true` if no device is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }

    /// Returns the registered devices in registration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<dyn Device>> {
        self.devices.read().clone()
    }

    /// Iterates over a snapshot of the registered devices.
    #[must_use]
    pub fn iter(&self) -> std::vec::IntoIter<Arc<dyn Device>> {
        self.snapshot().into_iter()
    }

    /// Returns the first device with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Device>> {
        self.devices
            .read()
            .iter()
            .find(|device| device.name() == name)
            .cloned()
    }

    /// Returns the device with the given unique id.
    #[must_use]
    pub fn get_by_unique_id(&self, unique_id: &str) -> Option<Arc<dyn Device>> {
        self.devices
            .read()
            .iter()
            .find(|device| device.unique_id() == unique_id)
            .cloned()
    }

    /// Returns `true` if a device with the given name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.devices.read().iter().any(|device| device.name() == name)
    }

    /// Returns the devices that use `group_address`, in registration order.
    #[must_use]
    pub fn devices_by_group_address(&self, group_address: GroupAddress) -> Vec<Arc<dyn Device>> {
        self.devices
            .read()
            .iter()
            .filter(|device| device.has_group_address(group_address))
            .cloned()
            .collect()
    }

    /// Returns every registered device of variant `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use knx_devices::{Client, ClientConfig, Scene, SceneConfig};
    ///
    /// # fn example() -> knx_devices::Result<()> {
    /// let (client, _outgoing) = Client::new(&ClientConfig::default());
    /// Scene::new(&client, Some("evening".to_string()), SceneConfig::new("1/0/1".parse()?, 3))?;
    ///
    /// let scenes = client.devices().of_kind::<Scene>();
    /// assert_eq!(scenes[0].scene_number(), 3);
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    #[must_use]
    pub fn of_kind<T: Device + 'static>(&self) -> Vec<Arc<T>> {
        self.iter()
            .filter_map(|device| device.into_any().downcast::<T>().ok())
            .collect()
    }

    /// Subscribes to registry events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.events.subscribe()
    }

    /// Subscribes to the events of the device with `unique_id`.
    #[must_use]
    pub fn subscribe_device(&self, unique_id: impl Into<String>) -> DeviceEvents {
        self.events.subscribe_device(unique_id)
    }
}
