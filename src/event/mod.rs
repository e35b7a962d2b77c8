// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry-level device events.
//!
//! Per-device callbacks are the primary notification path. The [`EventBus`]
//! offers a second one: the device registry publishes a [`DeviceEvent`] when
//! a device is added and whenever a registered device reports an update, so
//! a single consumer can follow every device without subscribing to each.
//!
//! # Examples
//!
//! ```
//! use knx_devices::event::{DeviceEvent, EventBus};
//!
//! let bus = EventBus::new();
//!
//! // Subscribe to events
//! let mut rx = bus.subscribe();
//!
//! // Publish an event
//! bus.publish(DeviceEvent::added("living_room.temperature"));
//! ```

mod device_event;
mod event_bus;

pub use device_event::DeviceEvent;
pub use event_bus::{DeviceEvents, EventBus};
