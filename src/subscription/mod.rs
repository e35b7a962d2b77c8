// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for device updates.
//!
//! Every device owns a [`CallbackRegistry`]. Whenever one of its values
//! changes, the device invokes each registered callback with a reference to
//! itself, in registration order.
//!
//! # Usage
//!
//! ```
//! use knx_devices::{Client, ClientConfig, Device, Notification, NotificationConfig};
//!
//! # fn example() -> knx_devices::Result<()> {
//! let (client, _outgoing) = Client::new(&ClientConfig::default());
//! let config = NotificationConfig::new("1/2/3".parse()?);
//! let display = Notification::new(&client, Some("display".to_string()), config)?;
//!
//! let sub_id = display.on_device_updated(|device| {
//!     println!("{device} changed");
//!     Ok(())
//! });
//!
//! // Later, unsubscribe
//! assert!(display.unregister_device_updated_cb(sub_id));
//! # Ok(())
//! # }
//! ```

mod callback;

pub use callback::{CallbackRegistry, CallbackResult, DeviceCallback, SubscriptionId};
