// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Text notifications shown on a display.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{Device, DeviceCore, RemoteValues, parse_config, register, require};
use crate::client::Client;
use crate::dpt::StringCodec;
use crate::error::{CommandError, Result};
use crate::remote_value::{RemoteValue, ValueBinding};
use crate::subscription::DeviceCallback;
use crate::types::{GroupAddress, Telegram};

/// Configuration of a [`Notification`].
///
/// # Examples
///
/// ```
/// use knx_devices::NotificationConfig;
///
/// let config: NotificationConfig = serde_json::from_value(serde_json::json!({
///     "name": "Hallway display",
///     "group_address": "1/2/3",
///     "group_address_state": 2564,
/// }))
/// .unwrap();
/// assert_eq!(config.group_address_state.unwrap().to_string(), "1/2/4");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Human readable label.
    pub name: Option<String>,
    /// Address the message is written to. Required.
    pub group_address: Option<GroupAddress>,
    /// Address the current message is read from.
    pub group_address_state: Option<GroupAddress>,
}

impl NotificationConfig {
    /// Creates a configuration writing to `group_address`.
    #[must_use]
    pub fn new(group_address: GroupAddress) -> Self {
        Self {
            group_address: Some(group_address),
            ..Self::default()
        }
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the state address.
    #[must_use]
    pub fn with_group_address_state(mut self, group_address: GroupAddress) -> Self {
        self.group_address_state = Some(group_address);
        self
    }
}

/// Commands understood by a [`Notification`].
///
/// # Examples
///
/// ```
/// use knx_devices::NotificationCommand;
///
/// let command: NotificationCommand = "message:Door open".parse().unwrap();
/// assert_eq!(command, NotificationCommand::SetMessage("Door open".to_string()));
/// assert!("beep".parse::<NotificationCommand>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationCommand {
    /// Shows a new message.
    SetMessage(String),
}

impl FromStr for NotificationCommand {
    type Err = CommandError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.strip_prefix("message:")
            .map(|message| Self::SetMessage(message.to_string()))
            .ok_or_else(|| CommandError::unrecognized(s))
    }
}

/// A display showing short text messages.
pub struct Notification {
    core: DeviceCore,
    message: RemoteValue<StringCodec>,
}

impl Notification {
    /// Number of characters a notification can show.
    pub const MAX_MESSAGE_LENGTH: usize = StringCodec::MAX_LENGTH;

    const KIND: &'static str = "Notification";

    /// Creates a notification and registers it with `client`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if neither `unique_id` nor a name is given or
    /// `group_address` is missing.
    pub fn new(
        client: &Client,
        unique_id: Option<String>,
        config: NotificationConfig,
    ) -> Result<Arc<Self>> {
        Self::new_with_callback(client, unique_id, config, None)
    }

    /// Creates a notification whose `callback` is registered before the
    /// device joins the registry.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn new_with_callback(
        client: &Client,
        unique_id: Option<String>,
        config: NotificationConfig,
        callback: Option<DeviceCallback>,
    ) -> Result<Arc<Self>> {
        let core = DeviceCore::new(unique_id, config.name)?;
        let group_address = require(config.group_address, &core, "group_address")?;
        let message = RemoteValue::new(client.bus().clone(), StringCodec, core.name(), "Message")
            .with_group_address(Some(group_address))
            .with_group_address_state(config.group_address_state);

        Ok(register(client, Arc::new(Self { core, message }), callback))
    }

    /// Creates a notification from a configuration mapping.
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

    /// Returns the message last written or received.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.message.value()
    }

    /// Shows `message`, cut to [`MAX_MESSAGE_LENGTH`](Self::MAX_MESSAGE_LENGTH)
    /// characters.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` for non-ASCII text, or `BusError` if the
    /// telegram cannot be queued.
    pub async fn set(&self, message: &str) -> Result<()> {
        let message: String = message.chars().take(Self::MAX_MESSAGE_LENGTH).collect();
        if self.message.set(message).await?.is_changed() {
            self.after_update();
        }
        Ok(())
    }

    /// Executes a command.
    ///
    /// # Errors
    ///
    /// Returns the error of the executed operation.
    pub async fn execute(&self, command: NotificationCommand) -> Result<()> {
        match command {
            NotificationCommand::SetMessage(message) => self.set(&message).await,
        }
    }
}

#[async_trait]
impl Device for Notification {
    fn core(&self) -> &DeviceCore {
        &self.core
    }

    fn remote_values(&self) -> RemoteValues<'_> {
        Box::new(std::iter::once(&self.message as &dyn ValueBinding))
    }

    fn kind(&self) -> &'static str {
        Self::KIND
    }

    async fn process_group_write(&self, telegram: &Telegram) -> Result<()> {
        if self.message.process(telegram).await?.is_changed() {
            self.after_update();
        }
        Ok(())
    }

    async fn do_action(&self, action: &str) -> Result<()> {
        match action.parse() {
            Ok(command) => self.execute(command).await,
            Err(err) => {
                tracing::warn!(device = %self.name(), error = %err, "Ignoring action");
                Ok(())
            }
        }
    }
}

impl PartialEq for Notification {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core && self.message == other.message
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("core", &self.core)
            .field("message", &self.message)
            .finish()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Notification name=\"{}\" message=\"{}\" />",
            self.name(),
            self.message.group_addr_str()
        )
    }
}
