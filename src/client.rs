// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The client owning the device registry and the bus handle.
//!
//! # Architecture
//!
//! ```text
//! transport: GroupValueWrite 1/2/3
//!                     ↓
//!        Client::process_incoming()
//!                     ↓
//!      BusHandle incoming feed (waiting readers)
//!                     ↓
//!    Devices::devices_by_group_address(1/2/3)
//!                     ↓
//!          Device::process(telegram)
//!                     ↓
//!      after_update() → user callbacks
//! ```

use crate::bus::{BusHandle, OutgoingTelegrams};
use crate::config::ClientConfig;
use crate::devices::Devices;
use crate::types::Telegram;

/// Entry point tying devices to a bus transport.
///
/// Cloning the client shares the registry and the bus handle.
///
/// # Examples
///
/// ```
/// use knx_devices::{Client, ClientConfig, Sensor, SensorConfig};
/// use knx_devices::dpt::ValueType;
/// use knx_devices::types::{Payload, Telegram};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> knx_devices::Result<()> {
/// let (client, _outgoing) = Client::new(&ClientConfig::default());
/// let address = "6/2/1".parse()?;
/// let sensor = Sensor::new(
///     &client,
///     Some("outside".to_string()),
///     SensorConfig::new(address, ValueType::Temperature),
/// )?;
///
/// let reached = client
///     .process_incoming(Telegram::write(address, Payload::Array(vec![0x0C, 0x1A])))
///     .await;
/// assert_eq!(reached, 1);
/// assert_eq!(sensor.resolve_state(), Some(21.0));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    bus: BusHandle,
    devices: Devices,
}

impl Client {
    /// Creates a client and the receiver of its outgoing telegrams.
    ///
    /// The transport drains the receiver and feeds inbound telegrams to
    /// [`process_incoming`](Self::process_incoming).
    #[must_use]
    pub fn new(config: &ClientConfig) -> (Self, OutgoingTelegrams) {
        let (bus, outgoing) = BusHandle::new(config);
        let client = Self {
            bus,
            devices: Devices::new(config.event_capacity()),
        };
        (client, outgoing)
    }

    /// Returns the device registry.
    #[must_use]
    pub fn devices(&self) -> &Devices {
        &self.devices
    }

    /// Returns the bus handle.
    #[must_use]
    pub fn bus(&self) -> &BusHandle {
        &self.bus
    }

    /// Handles a telegram received from the bus.
    ///
    /// Wakes readers waiting for the address, then lets every device using
    /// the address process the telegram. Errors of one device are logged and
    /// do not keep the others from processing.
    ///
    /// Returns the number of devices the telegram was dispatched to.
    pub async fn process_incoming(&self, telegram: Telegram) -> usize {
        self.bus.publish_incoming(&telegram);

        let devices = self.devices.devices_by_group_address(telegram.group_address());
        if devices.is_empty() {
            tracing::trace!(telegram = %telegram, "No device for telegram");
            return 0;
        }

        for device in &devices {
            if let Err(err) = device.process(&telegram).await {
                tracing::warn!(
                    device = %device.name(),
                    telegram = %telegram,
                    error = %err,
                    "Failed to process telegram"
                );
            }
        }
        devices.len()
    }

    /// Syncs the state of every device in registration order.
    ///
    /// Errors of one device are logged and do not stop the sweep.
    pub async fn sync(&self, wait_for_result: bool) {
        for device in self.devices.iter() {
            if let Err(err) = device.sync(wait_for_result).await {
                tracing::warn!(device = %device.name(), error = %err, "Failed to sync device");
            }
        }
    }
}
