// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scenes triggered by a scene number.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{Device, DeviceCore, RemoteValues, parse_config, register, require};
use crate::client::Client;
use crate::dpt::SceneNumberCodec;
use crate::error::{CommandError, ConfigError, Result};
use crate::remote_value::{RemoteValue, ValueBinding};
use crate::subscription::DeviceCallback;
use crate::types::GroupAddress;

/// Configuration of a [`Scene`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Human readable label.
    pub name: Option<String>,
    /// Address the scene number is written to. Required.
    pub group_address: Option<GroupAddress>,
    /// Scene number between 1 and 64. Required.
    pub scene_number: Option<u8>,
}

impl SceneConfig {
    /// Creates a configuration running `scene_number` on `group_address`.
    #[must_use]
    pub fn new(group_address: GroupAddress, scene_number: u8) -> Self {
        Self {
            name: None,
            group_address: Some(group_address),
            scene_number: Some(scene_number),
        }
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Commands understood by a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    /// Runs the scene.
    Run,
}

impl FromStr for SceneCommand {
    type Err = CommandError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "run" => Ok(Self::Run),
            _ => Err(CommandError::unrecognized(s)),
        }
    }
}

/// A scene that can be run but not observed.
pub struct Scene {
    core: DeviceCore,
    scene_value: RemoteValue<SceneNumberCodec>,
    scene_number: u8,
}

impl Scene {
    const KIND: &'static str = "Scene";

    /// Creates a scene and registers it with `client`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the identity, `group_address` or
    /// `scene_number` is missing, or the scene number is out of range.
    pub fn new(client: &Client, unique_id: Option<String>, config: SceneConfig) -> Result<Arc<Self>> {
        Self::new_with_callback(client, unique_id, config, None)
    }

    /// Creates a scene whose `callback` is registered before the device
    /// joins the registry.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn new_with_callback(
        client: &Client,
        unique_id: Option<String>,
        config: SceneConfig,
        callback: Option<DeviceCallback>,
    ) -> Result<Arc<Self>> {
        let core = DeviceCore::new(unique_id, config.name)?;
        let group_address = require(config.group_address, &core, "group_address")?;
        let scene_number = require(config.scene_number, &core, "scene_number")?;
        if !SceneNumberCodec::is_valid(scene_number) {
            return Err(ConfigError::InvalidValue {
                key: "scene_number".to_string(),
                message: format!(
                    "must be between {} and {}, got {scene_number}",
                    SceneNumberCodec::MIN,
                    SceneNumberCodec::MAX
                ),
            }
            .into());
        }

        let scene_value =
            RemoteValue::new(client.bus().clone(), SceneNumberCodec, core.name(), "Scene number")
                .with_group_address(Some(group_address));

        let device = Arc::new(Self {
            core,
            scene_value,
            scene_number,
        });
        Ok(register(client, device, callback))
    }

    /// Creates a scene from a configuration mapping.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the mapping is malformed, incomplete or out
    /// of range.
    pub fn from_config(
        client: &Client,
        unique_id: Option<String>,
        config: &serde_json::Value,
    ) -> Result<Arc<Self>> {
        let config = parse_config(Self::KIND, config)?;
        Self::new(client, unique_id, config)
    }

    /// Returns the scene number sent by [`run`](Self::run).
    #[must_use]
    pub fn scene_number(&self) -> u8 {
        self.scene_number
    }

    /// Runs the scene.
    ///
    /// # Errors
    ///
    /// Returns `BusError` if the telegram cannot be queued.
    pub async fn run(&self) -> Result<()> {
        if self.scene_value.set(self.scene_number).await?.is_changed() {
            self.after_update();
        }
        Ok(())
    }

    /// Executes a command.
    ///
    /// # Errors
    ///
    /// Returns the error of the executed operation.
    pub async fn execute(&self, command: SceneCommand) -> Result<()> {
        match command {
            SceneCommand::Run => self.run().await,
        }
    }
}

#[async_trait]
impl Device for Scene {
    fn core(&self) -> &DeviceCore {
        &self.core
    }

    fn remote_values(&self) -> RemoteValues<'_> {
        Box::new(std::iter::once(&self.scene_value as &dyn ValueBinding))
    }

    fn kind(&self) -> &'static str {
        Self::KIND
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

impl PartialEq for Scene {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core
            && self.scene_value == other.scene_value
            && self.scene_number == other.scene_number
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("core", &self.core)
            .field("scene_value", &self.scene_value)
            .field("scene_number", &self.scene_number)
            .finish()
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Scene name=\"{}\" scene_value=\"{}\" scene_number=\"{}\" />",
            self.name(),
            self.scene_value.group_addr_str(),
            self.scene_number
        )
    }
}
