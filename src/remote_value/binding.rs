// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed value binding.

use std::fmt;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{ValueBinding, ValueUpdate};
use crate::bus::{BusHandle, ValueReader};
use crate::dpt::Codec;
use crate::error::Result;
use crate::types::{GroupAddress, Telegram};

/// A value of datapoint type `C` bound to a command and a state address.
///
/// The cached value starts out unknown and is updated by writes through
/// [`set`](Self::set) and by telegrams fed through
/// [`process`](ValueBinding::process).
pub struct RemoteValue<C: Codec> {
    bus: BusHandle,
    codec: C,
    group_address: Option<GroupAddress>,
    group_address_state: Option<GroupAddress>,
    sync_state: bool,
    device_name: String,
    feature_name: &'static str,
    value: RwLock<Option<C::Value>>,
}

impl<C: Codec> RemoteValue<C> {
    /// Creates a binding without addresses.
    #[must_use]
    pub fn new(
        bus: BusHandle,
        codec: C,
        device_name: impl Into<String>,
        feature_name: &'static str,
    ) -> Self {
        Self {
            bus,
            codec,
            group_address: None,
            group_address_state: None,
            sync_state: true,
            device_name: device_name.into(),
            feature_name,
            value: RwLock::new(None),
        }
    }

    /// Sets the command address.
    #[must_use]
    pub fn with_group_address(mut self, group_address: Option<GroupAddress>) -> Self {
        self.group_address = group_address;
        self
    }

    /// Sets the state address.
    #[must_use]
    pub fn with_group_address_state(mut self, group_address: Option<GroupAddress>) -> Self {
        self.group_address_state = group_address;
        self
    }

    /// Sets whether the binding takes part in state sync.
    #[must_use]
    pub fn with_sync_state(mut self, sync_state: bool) -> Self {
        self.sync_state = sync_state;
        self
    }

    /// Returns the codec.
    #[must_use]
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Returns the cached value, `None` until one is known.
    #[must_use]
    pub fn value(&self) -> Option<C::Value> {
        self.value.read().clone()
    }

    /// Encodes `value`, sends it to the command address and caches it.
    ///
    /// Without a command address the value is discarded and
    /// [`ValueUpdate::Ignored`] is returned.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` if the value cannot be encoded, or
    /// `BusError` if the telegram cannot be queued.
    pub async fn set(&self, value: C::Value) -> Result<ValueUpdate> {
        let Some(group_address) = self.group_address else {
            tracing::warn!(
                device = %self.device_name,
                feature = self.feature_name,
                "Attempted to set value for non-writable binding"
            );
            return Ok(ValueUpdate::Ignored);
        };

        let payload = self.codec.encode(&value)?;
        let update = self.store(value);
        self.bus.send(Telegram::write(group_address, payload)).await?;
        Ok(update)
    }

    fn store(&self, value: C::Value) -> ValueUpdate {
        let mut current = self.value.write();
        if current.as_ref() == Some(&value) {
            ValueUpdate::Unchanged
        } else {
            *current = Some(value);
            ValueUpdate::Changed
        }
    }
}

#[async_trait]
impl<C: Codec> ValueBinding for RemoteValue<C> {
    fn group_address(&self) -> Option<GroupAddress> {
        self.group_address
    }

    fn group_address_state(&self) -> Option<GroupAddress> {
        self.group_address_state
    }

    fn sync_state(&self) -> bool {
        self.sync_state
    }

    fn feature_name(&self) -> &str {
        self.feature_name
    }

    fn group_addr_str(&self) -> String {
        fn render(address: Option<GroupAddress>) -> String {
            address.map_or_else(|| "None".to_string(), |address| address.to_string())
        }

        let value = self
            .value()
            .map_or_else(|| "None".to_string(), |value| self.codec.render(&value));
        format!(
            "<{}, {}, {value}>",
            render(self.group_address),
            render(self.group_address_state),
        )
    }

    async fn read_state(&self, wait_for_result: bool) -> Result<ValueUpdate> {
        let Some(group_address) = self.group_address_state else {
            return Ok(ValueUpdate::Ignored);
        };
        let reader = ValueReader::new(&self.bus, group_address);

        if !wait_for_result {
            reader.send_group_read().await?;
            return Ok(ValueUpdate::Ignored);
        }

        match reader.read().await? {
            Some(telegram) => self.process(&telegram).await,
            None => {
                tracing::warn!(
                    device = %self.device_name,
                    feature = self.feature_name,
                    address = %group_address,
                    "Could not sync group address"
                );
                Ok(ValueUpdate::Ignored)
            }
        }
    }

    async fn process(&self, telegram: &Telegram) -> Result<ValueUpdate> {
        if !self.has_group_address(telegram.group_address()) {
            return Ok(ValueUpdate::Ignored);
        }
        let Some(payload) = telegram.payload() else {
            return Ok(ValueUpdate::Ignored);
        };

        let value = self.codec.decode(payload)?;
        let update = self.store(value);
        tracing::debug!(
            device = %self.device_name,
            feature = self.feature_name,
            telegram = %telegram,
            changed = update.is_changed(),
            "Processed telegram"
        );
        Ok(update)
    }
}

impl<C: Codec> PartialEq for RemoteValue<C> {
    fn eq(&self, other: &Self) -> bool {
        self.codec == other.codec
            && self.group_address == other.group_address
            && self.group_address_state == other.group_address_state
            && self.sync_state == other.sync_state
            && self.device_name == other.device_name
            && self.feature_name == other.feature_name
            && self.value() == other.value()
    }
}

impl<C: Codec> fmt::Debug for RemoteValue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteValue")
            .field("codec", &self.codec)
            .field("group_address", &self.group_address)
            .field("group_address_state", &self.group_address_state)
            .field("sync_state", &self.sync_state)
            .field("device_name", &self.device_name)
            .field("feature_name", &self.feature_name)
            .field("value", &self.value())
            .finish_non_exhaustive()
    }
}
