// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Events emitted by the device registry.
///
/// # Examples
///
/// ```
/// use knx_devices::event::DeviceEvent;
///
/// let added = DeviceEvent::added("living_room.temperature");
/// assert!(added.is_lifecycle());
///
/// let updated = DeviceEvent::updated("living_room.temperature");
/// assert_eq!(updated.unique_id(), "living_room.temperature");
/// assert!(updated.updated_at().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DeviceEvent {
    /// A device was added to the registry.
    Added {
        /// The unique id of the added device.
        unique_id: String,
    },

    /// A registered device reported a state change.
    Updated {
        /// The unique id of the device.
        unique_id: String,
        /// When the change was reported.
        at: DateTime<Utc>,
    },
}

impl DeviceEvent {
    /// Creates a device added event.
    #[must_use]
    pub fn added(unique_id: impl Into<String>) -> Self {
        Self::Added {
            unique_id: unique_id.into(),
        }
    }

    /// Creates a device updated event stamped with the current time.
    #[must_use]
    pub fn updated(unique_id: impl Into<String>) -> Self {
        Self::Updated {
            unique_id: unique_id.into(),
            at: Utc::now(),
        }
    }

    /// Returns the unique id of the device this event is about.
    #[must_use]
    pub fn unique_id(&self) -> &str {
        match self {
            Self::Added { unique_id } | Self::Updated { unique_id, .. } => unique_id,
        }
    }

    /// Returns the time of the update, `None` for lifecycle events.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Added { .. } => None,
            Self::Updated { at, .. } => Some(*at),
        }
    }

    /// Returns `true` if this is a device lifecycle event.
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::Added { .. })
    }
}
