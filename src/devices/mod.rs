// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Devices and the registry that holds them.
//!
//! Every device implements [`Device`], which provides telegram dispatch,
//! state sync and update notification on top of the value bindings the
//! variant exposes. Three variants are bundled:
//!
//! | Variant | Binding | Purpose |
//! |---------|---------|---------|
//! | [`Notification`] | string | Text shown on a display |
//! | [`Scene`] | scene number | Triggers a fixed scene |
//! | [`Sensor`] | measurement | Read-only value of a declared [`ValueType`](crate::dpt::ValueType) |
//!
//! Constructed devices register themselves in the client's [`Devices`].

mod device;
mod notification;
mod registry;
mod scene;
mod sensor;

use std::sync::Arc;

use serde::de::DeserializeOwned;

pub use device::{AsDevice, Device, DeviceCore, RemoteValues};
pub use notification::{Notification, NotificationCommand, NotificationConfig};
pub use registry::Devices;
pub use scene::{Scene, SceneCommand, SceneConfig};
pub use sensor::{Sensor, SensorConfig};

use crate::client::Client;
use crate::error::ConfigError;
use crate::subscription::DeviceCallback;

/// Deserializes the configuration mapping of a device variant.
pub(crate) fn parse_config<T: DeserializeOwned>(
    kind: &'static str,
    config: &serde_json::Value,
) -> Result<T, ConfigError> {
    T::deserialize(config).map_err(|err| ConfigError::Malformed {
        device: kind,
        message: err.to_string(),
    })
}

/// Returns the value of a required key or a `MissingKey` error.
pub(crate) fn require<T>(
    value: Option<T>,
    device: &DeviceCore,
    key: &'static str,
) -> Result<T, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingKey {
        device: device.name().to_string(),
        key,
    })
}

/// Registers the initial callback of a new device, then adds the device to
/// the client's registry.
pub(crate) fn register<T: Device + 'static>(
    client: &Client,
    device: Arc<T>,
    callback: Option<DeviceCallback>,
) -> Arc<T> {
    if let Some(callback) = callback {
        device.register_device_updated_cb(callback);
    }
    client.devices().add(device.clone());
    device
}
