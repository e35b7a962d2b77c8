// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client configuration.

use std::time::Duration;

use serde::Deserialize;

/// Default time to wait for the answer to a state read.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Default capacity of the outgoing telegram queue.
pub const DEFAULT_TELEGRAM_QUEUE_CAPACITY: usize = 256;

/// Default capacity of the incoming telegram and device event channels.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Configuration for a [`Client`](crate::Client).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use knx_devices::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_read_timeout(Duration::from_millis(500))
///     .with_telegram_queue_capacity(64);
/// assert_eq!(config.read_timeout(), Duration::from_millis(500));
///
/// // Also loadable from structured configuration
/// let config: ClientConfig =
///     serde_json::from_str(r#"{"read_timeout_ms": 2000}"#).unwrap();
/// assert_eq!(config.read_timeout(), Duration::from_secs(2));
/// assert_eq!(config.telegram_queue_capacity(), 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Time to wait for a response when reading state, in milliseconds.
    read_timeout_ms: u64,
    /// Capacity of the outgoing telegram queue.
    telegram_queue_capacity: usize,
    /// Capacity of the incoming telegram and device event channels.
    event_capacity: usize,
}

impl ClientConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the state read timeout.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Sets the outgoing telegram queue capacity.
    ///
    /// Values below 1 are raised to 1.
    #[must_use]
    pub fn with_telegram_queue_capacity(mut self, capacity: usize) -> Self {
        self.telegram_queue_capacity = capacity.max(1);
        self
    }

    /// Sets the incoming telegram and device event channel capacity.
    ///
    /// Values below 1 are raised to 1.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// Returns the state read timeout.
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Returns the outgoing telegram queue capacity.
    #[must_use]
    pub fn telegram_queue_capacity(&self) -> usize {
        self.telegram_queue_capacity.max(1)
    }

    /// Returns the incoming telegram and device event channel capacity.
    #[must_use]
    pub fn event_capacity(&self) -> usize {
        self.event_capacity.max(1)
    }
}

impl Default for ClientConfig {
    #[allow(clippy::cast_possible_truncation)]
    fn default() -> Self {
        Self {
            read_timeout_ms: DEFAULT_READ_TIMEOUT.as_millis() as u64,
            telegram_queue_capacity: DEFAULT_TELEGRAM_QUEUE_CAPACITY,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}
