// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value bindings between logical attributes and group addresses.
//!
//! A value binding ties one attribute of a device (a message, a scene number,
//! a measurement) to a command address and a state address. Devices only see
//! bindings through the object-safe [`ValueBinding`] trait, which is all the
//! shared synchronization and dispatch logic needs. Typed writes go through
//! [`RemoteValue::set`].

mod binding;

use std::fmt;

use async_trait::async_trait;

pub use binding::RemoteValue;

use crate::error::Result;
use crate::types::{GroupAddress, Telegram};

/// Outcome of feeding a telegram or a write into a value binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueUpdate {
    /// The binding did not handle the input.
    Ignored,
    /// The input was handled but the value stayed the same.
    Unchanged,
    /// The value changed.
    Changed,
}

impl ValueUpdate {
    /// Returns `true` if the value changed.
    #[must_use]
    pub const fn is_changed(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Object-safe view of a value binding.
#[async_trait]
pub trait ValueBinding: fmt::Debug + Send + Sync {
    /// Returns the address commands are written to.
    fn group_address(&self) -> Option<GroupAddress>;

    /// Returns the address the current state is read from.
    fn group_address_state(&self) -> Option<GroupAddress>;

    /// Returns `true` if the binding should take part in state sync.
    fn sync_state(&self) -> bool;

    /// Returns the attribute name, used in diagnostics.
    fn feature_name(&self) -> &str;

    /// Returns `true` if `group_address` is the command or state address.
    fn has_group_address(&self, group_address: GroupAddress) -> bool {
        self.group_address() == Some(group_address)
            || self.group_address_state() == Some(group_address)
    }

    /// Renders the addresses and current value for diagnostics.
    fn group_addr_str(&self) -> String;

    /// Requests the current state from the bus.
    ///
    /// With `wait_for_result`, waits for the response and processes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the read cannot be queued or the response cannot
    /// be decoded.
    async fn read_state(&self, wait_for_result: bool) -> Result<ValueUpdate>;

    /// Updates the value from a telegram addressed to this binding.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` if the payload cannot be decoded.
    async fn process(&self, telegram: &Telegram) -> Result<ValueUpdate>;
}
