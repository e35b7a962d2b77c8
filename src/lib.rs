// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `knx_devices` - Device abstractions for KNX bus clients.
//!
//! This library maps logical device attributes onto KNX group addresses. A
//! transport (tunnel, router or test harness) hands received telegrams to a
//! [`Client`] and drains the telegrams devices want to send; the library does
//! the rest: decoding, state tracking, reads with timeout and update
//! notification.
//!
//! # Supported Devices
//!
//! - **Notification**: 14 character text messages for displays
//! - **Scene**: Runs a fixed scene number
//! - **Sensor**: Read-only measurements such as temperature, power or humidity
//!
//! # Quick Start
//!
//! ## Sending a Notification
//!
//! ```
//! use knx_devices::{Client, ClientConfig, Notification, NotificationConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> knx_devices::Result<()> {
//!     // The receiver is drained by the transport
//!     let (client, mut outgoing) = Client::new(&ClientConfig::default());
//!
//!     let display = Notification::new(
//!         &client,
//!         Some("hallway.display".to_string()),
//!         NotificationConfig::new("1/2/3".parse()?).with_name("Hallway"),
//!     )?;
//!     display.set("Door open").await?;
//!
//!     let telegram = outgoing.recv().await.expect("telegram queued");
//!     assert_eq!(telegram.group_address().to_string(), "1/2/3");
//!     Ok(())
//! }
//! ```
//!
//! ## Devices from Configuration
//!
//! ```
//! use knx_devices::{Client, ClientConfig, Device, Sensor};
//!
//! # fn main() -> knx_devices::Result<()> {
//! let (client, _outgoing) = Client::new(&ClientConfig::default());
//! let sensor = Sensor::from_config(
//!     &client,
//!     None,
//!     &serde_json::json!({
//!         "name": "Outside",
//!         "group_address_state": "6/2/1",
//!         "value_type": "temperature",
//!     }),
//! )?;
//!
//! assert_eq!(sensor.unit_of_measurement(), "°C");
//! assert_eq!(client.devices().len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Callbacks
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use knx_devices::{Client, ClientConfig, Device, Sensor, SensorConfig};
//! use knx_devices::dpt::ValueType;
//! use knx_devices::types::{Payload, Telegram};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> knx_devices::Result<()> {
//!     let (client, _outgoing) = Client::new(&ClientConfig::default());
//!     let address = "6/2/1".parse()?;
//!     let sensor = Sensor::new(
//!         &client,
//!         Some("outside".to_string()),
//!         SensorConfig::new(address, ValueType::Temperature),
//!     )?;
//!
//!     let updates = Arc::new(AtomicUsize::new(0));
//!     let counter = Arc::clone(&updates);
//!     sensor.on_device_updated(move |device| {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!         println!("{device}");
//!         Ok(())
//!     });
//!
//!     client
//!         .process_incoming(Telegram::write(address, Payload::Array(vec![0x0C, 0x1A])))
//!         .await;
//!     assert_eq!(updates.load(Ordering::SeqCst), 1);
//!     Ok(())
//! }
//! ```

pub mod bus;
mod client;
mod config;
pub mod devices;
pub mod dpt;
pub mod error;
pub mod event;
pub mod remote_value;
pub mod subscription;
pub mod types;

pub use bus::{BusHandle, OutgoingTelegrams};
pub use client::Client;
pub use config::ClientConfig;
pub use devices::{
    Device, Devices, Notification, NotificationCommand, NotificationConfig, Scene, SceneCommand,
    SceneConfig, Sensor, SensorConfig,
};
pub use error::{BusError, CommandError, ConfigError, ConversionError, Error, Result};
pub use event::{DeviceEvent, DeviceEvents, EventBus};
pub use subscription::{CallbackRegistry, SubscriptionId};
pub use types::{GroupAddress, Payload, Telegram, TelegramType};
