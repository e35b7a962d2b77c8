// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reading the current value of a group address.

use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;

use super::BusHandle;
use crate::error::BusError;
use crate::types::{GroupAddress, Telegram};

/// Issues a `GroupValueRead` and optionally waits for the answer.
///
/// A write to the same address counts as an answer, since other participants
/// may update the value while the read is pending.
#[derive(Debug)]
pub struct ValueReader<'a> {
    bus: &'a BusHandle,
    group_address: GroupAddress,
    timeout: Duration,
}

impl<'a> ValueReader<'a> {
    /// Creates a reader using the bus handle's read timeout.
    #[must_use]
    pub fn new(bus: &'a BusHandle, group_address: GroupAddress) -> Self {
        Self {
            bus,
            group_address,
            timeout: bus.read_timeout(),
        }
    }

    /// Overrides the read timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends the read request without waiting for a response.
    ///
    /// # Errors
    ///
    /// Returns `BusError::ChannelClosed` if the outgoing queue is closed.
    pub async fn send_group_read(&self) -> Result<(), BusError> {
        self.bus.send(Telegram::read(self.group_address)).await
    }

    /// Sends the read request and waits for the response.
    ///
    /// Returns `None` if no response arrived before the timeout.
    ///
    /// # Errors
    ///
    /// Returns `BusError::ChannelClosed` if the outgoing queue is closed.
    pub async fn read(&self) -> Result<Option<Telegram>, BusError> {
        // Subscribe first so a fast response cannot slip past
        let mut incoming = self.bus.subscribe_incoming();
        self.send_group_read().await?;

        let address = self.group_address;
        let wait_for_answer = async {
            loop {
                match incoming.recv().await {
                    Ok(telegram) if telegram.group_address() == address && telegram.carries_value() => {
                        return Some(telegram);
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::trace!(address = %address, skipped, "Value reader lagged behind");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        };

        if let Ok(answer) = tokio::time::timeout(self.timeout, wait_for_answer).await {
            Ok(answer)
        } else {
            #[allow(clippy::cast_possible_truncation)]
            let timeout_ms = self.timeout.as_millis() as u64;
            tracing::debug!(address = %address, timeout_ms, "No answer to state read");
            Ok(None)
        }
    }
}
