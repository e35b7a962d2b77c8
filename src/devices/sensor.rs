// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only sensors.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{Device, DeviceCore, RemoteValues, parse_config, register, require};
use crate::client::Client;
use crate::dpt::{Codec, SensorCodec, ValueType};
use crate::error::{ConfigError, ConversionError, Result};
use crate::remote_value::{RemoteValue, ValueBinding};
use crate::subscription::DeviceCallback;
use crate::types::{GroupAddress, Telegram};

/// Configuration of a [`Sensor`].
///
/// # Examples
///
/// ```
/// use knx_devices::SensorConfig;
///
/// let config: SensorConfig = serde_json::from_value(serde_json::json!({
///     "group_address_state": "6/2/1",
///     "value_type": "temperature",
/// }))
/// .unwrap();
/// assert!(config.sync_state);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Human readable label.
    pub name: Option<String>,
    /// Address the measurement is read from. Required.
    pub group_address_state: Option<GroupAddress>,
    /// Whether the sensor takes part in state sync.
    pub sync_state: bool,
    /// Name of the [`ValueType`]. Required.
    pub value_type: Option<String>,
}

impl SensorConfig {
    /// Creates a configuration reading `value_type` from `group_address_state`.
    #[must_use]
    pub fn new(group_address_state: GroupAddress, value_type: ValueType) -> Self {
        Self {
            group_address_state: Some(group_address_state),
            value_type: Some(value_type.name().to_string()),
            ..Self::default()
        }
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets whether the sensor takes part in state sync.
    #[must_use]
    pub fn with_sync_state(mut self, sync_state: bool) -> Self {
        self.sync_state = sync_state;
        self
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            name: None,
            group_address_state: None,
            sync_state: true,
            value_type: None,
        }
    }
}

/// A sensor reporting measurements of one [`ValueType`].
pub struct Sensor {
    core: DeviceCore,
    sensor_value: RemoteValue<SensorCodec>,
}

impl Sensor {
    const KIND: &'static str = "Sensor";

    /// Creates a sensor and registers it with `client`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the identity, `group_address_state` or
    /// `value_type` is missing, or the value type is unknown.
    pub fn new(client: &Client, unique_id: Option<String>, config: SensorConfig) -> Result<Arc<Self>> {
        Self::new_with_callback(client, unique_id, config, None)
    }

    /// Creates a sensor whose `callback` is registered before the device
    /// joins the registry.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn new_with_callback(
        client: &Client,
        unique_id: Option<String>,
        config: SensorConfig,
        callback: Option<DeviceCallback>,
    ) -> Result<Arc<Self>> {
        let core = DeviceCore::new(unique_id, config.name)?;
        let group_address_state =
            require(config.group_address_state, &core, "group_address_state")?;
        let value_type: ValueType = require(config.value_type, &core, "value_type")?
            .parse()
            .map_err(|err: ConversionError| ConfigError::InvalidValue {
                key: "value_type".to_string(),
                message: err.to_string(),
            })?;

        let sensor_value = RemoteValue::new(
            client.bus().clone(),
            SensorCodec::new(value_type),
            core.name(),
            "Value",
        )
        .with_group_address_state(Some(group_address_state))
        .with_sync_state(config.sync_state);

        Ok(register(client, Arc::new(Self { core, sensor_value }), callback))
    }

    /// Creates a sensor from a configuration mapping.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the mapping is malformed or incomplete.
    pub fn from_config(
        client: &Client,
        unique_id: Option<String>,
        config: &serde_json::Value,
    ) -> Result<Arc<Self>> {
        let config = parse_config(Self::KIND, config)?;
        Self::new(client, unique_id, config)
    }

    /// Returns the last known measurement.
    #[must_use]
    pub fn resolve_state(&self) -> Option<f64> {
        self.sensor_value.value()
    }

    /// Returns the declared value type.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.sensor_value.codec().value_type()
    }

    /// Returns the unit of the measurement.
    #[must_use]
    pub fn unit_of_measurement(&self) -> &'static str {
        self.value_type().unit()
    }

    /// Returns the Home Assistant device class, if the value type has one.
    #[must_use]
    pub fn ha_device_class(&self) -> Option<&'static str> {
        self.value_type().ha_device_class()
    }
}

#[async_trait]
impl Device for Sensor {
    fn core(&self) -> &DeviceCore {
        &self.core
    }

    fn remote_values(&self) -> RemoteValues<'_> {
        Box::new(std::iter::once(&self.sensor_value as &dyn ValueBinding))
    }

    fn kind(&self) -> &'static str {
        Self::KIND
    }

    async fn process_group_write(&self, telegram: &Telegram) -> Result<()> {
        if self.sensor_value.process(telegram).await?.is_changed() {
            self.after_update();
        }
        Ok(())
    }
}

impl PartialEq for Sensor {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core && self.sensor_value == other.sensor_value
    }
}

impl fmt::Debug for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sensor")
            .field("core", &self.core)
            .field("sensor_value", &self.sensor_value)
            .finish()
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codec = self.sensor_value.codec();
        let value = self
            .resolve_state()
            .map_or_else(|| "None".to_string(), |value| codec.render(&value));
        write!(
            f,
            "<Sensor name=\"{}\" sensor=\"{}\" value=\"{}\" unit=\"{}\"/>",
            self.name(),
            self.sensor_value.group_addr_str(),
            value,
            self.unit_of_measurement()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::Error;
    use crate::types::Payload;

    fn ga(address: &str) -> GroupAddress {
        address.parse().unwrap()
    }

    fn temperature(client: &Client) -> Arc<Sensor> {
        Sensor::new(
            client,
            Some("temperature".to_string()),
            SensorConfig::new(ga("6/2/1"), ValueType::Temperature),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn write_and_response_update_identically() {
        let (client, _outgoing) = Client::new(&ClientConfig::default());
        let by_write = temperature(&client);
        let by_response = temperature(&client);
        let payload = Payload::Array(vec![0x0C, 0x1A]);

        by_write
            .process(&Telegram::write(ga("6/2/1"), payload.clone()))
            .await
            .unwrap();
        by_response
            .process(&Telegram::response(ga("6/2/1"), payload))
            .await
            .unwrap();

        assert_eq!(by_write.resolve_state(), Some(21.0));
        assert_eq!(by_write.resolve_state(), by_response.resolve_state());
    }

    #[tokio::test]
    async fn malformed_payload_is_an_error() {
        let (client, _outgoing) = Client::new(&ClientConfig::default());
        let sensor = temperature(&client);

        let err = sensor
            .process(&Telegram::write(ga("6/2/1"), Payload::Binary(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conversion(_)));
        assert_eq!(sensor.resolve_state(), None);
    }

    #[test]
    fn accessors() {
        let (client, _outgoing) = Client::new(&ClientConfig::default());
        let sensor = temperature(&client);
        assert_eq!(sensor.value_type(), ValueType::Temperature);
        assert_eq!(sensor.unit_of_measurement(), "°C");
        assert_eq!(sensor.ha_device_class(), Some("temperature"));
        assert_eq!(sensor.resolve_state(), None);
    }

    #[test]
    fn unknown_value_type() {
        let (client, _outgoing) = Client::new(&ClientConfig::default());
        let err = Sensor::from_config(
            &client,
            Some("s".to_string()),
            &serde_json::json!({"group_address_state": "6/2/1", "value_type": "flux"}),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { ref key, .. }) if key == "value_type"
        ));
    }

    #[test]
    fn missing_state_address() {
        let (client, _outgoing) = Client::new(&ClientConfig::default());
        let err = Sensor::from_config(
            &client,
            Some("s".to_string()),
            &serde_json::json!({"value_type": "power"}),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingKey {
                key: "group_address_state",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn sync_skipped_when_disabled() {
        let (client, mut outgoing) = Client::new(&ClientConfig::default());
        let sensor = Sensor::new(
            &client,
            Some("s".to_string()),
            SensorConfig::new(ga("6/2/1"), ValueType::Power).with_sync_state(false),
        )
        .unwrap();

        sensor.sync(false).await.unwrap();
        assert!(outgoing.try_recv().is_err());
    }

    #[tokio::test]
    async fn display() {
        let (client, _outgoing) = Client::new(&ClientConfig::default());
        let sensor = temperature(&client);
        assert_eq!(
            sensor.to_string(),
            "<Sensor name=\"temperature\" sensor=\"<None, 6/2/1, None>\" value=\"None\" unit=\"°C\"/>"
        );

        sensor
            .process(&Telegram::write(ga("6/2/1"), Payload::Array(vec![0x0C, 0x1A])))
            .await
            .unwrap();
        assert_eq!(
            sensor.to_string(),
            "<Sensor name=\"temperature\" sensor=\"<None, 6/2/1, 21.0>\" value=\"21.0\" unit=\"°C\"/>"
        );
    }
}
