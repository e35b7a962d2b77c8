// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The seam between devices and the bus transport.
//!
//! Devices never talk to a connection directly. Outgoing telegrams are put on
//! a bounded queue that the transport drains, and incoming telegrams are
//! broadcast to anybody waiting for a particular response.
//!
//! ```text
//!  RemoteValue::set / read_state
//!              ↓
//!      BusHandle::send  ──→  OutgoingTelegrams  ──→  transport
//!
//!  transport  ──→  Client::process_incoming
//!                         ↓
//!          BusHandle incoming feed  ──→  ValueReader::read
//! ```

mod value_reader;

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};

pub use value_reader::ValueReader;

use crate::config::ClientConfig;
use crate::error::BusError;
use crate::types::Telegram;

/// Receiver end of the outgoing telegram queue, drained by the transport.
pub type OutgoingTelegrams = mpsc::Receiver<Telegram>;

/// Cloneable handle to the outgoing queue and the incoming telegram feed.
#[derive(Debug, Clone)]
pub struct BusHandle {
    outgoing: mpsc::Sender<Telegram>,
    incoming: broadcast::Sender<Telegram>,
    read_timeout: Duration,
}

impl BusHandle {
    /// Creates a bus handle and the receiver for its outgoing telegrams.
    #[must_use]
    pub fn new(config: &ClientConfig) -> (Self, OutgoingTelegrams) {
        let (outgoing, outgoing_rx) = mpsc::channel(config.telegram_queue_capacity());
        let (incoming, _) = broadcast::channel(config.event_capacity());
        let handle = Self {
            outgoing,
            incoming,
            read_timeout: config.read_timeout(),
        };
        (handle, outgoing_rx)
    }

    /// Queues a telegram for transmission.
    ///
    /// Suspends while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns `BusError::ChannelClosed` if the transport dropped the receiver.
    pub async fn send(&self, telegram: Telegram) -> Result<(), BusError> {
        tracing::trace!(telegram = %telegram, "Queueing outgoing telegram");
        self.outgoing
            .send(telegram)
            .await
            .map_err(|_| BusError::ChannelClosed)
    }

    /// Subscribes to incoming telegrams.
    ///
    /// Only telegrams published after the call are received.
    #[must_use]
    pub fn subscribe_incoming(&self) -> broadcast::Receiver<Telegram> {
        self.incoming.subscribe()
    }

    /// Publishes an incoming telegram to all subscribers.
    ///
    /// Returns the number of subscribers that received it.
    pub(crate) fn publish_incoming(&self, telegram: &Telegram) -> usize {
        if self.incoming.receiver_count() == 0 {
            return 0;
        }
        self.incoming.send(telegram.clone()).unwrap_or(0)
    }

    /// Returns the time a state read waits for its response.
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }
}
