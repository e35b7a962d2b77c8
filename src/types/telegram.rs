// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Telegrams exchanged over group addresses.

use std::fmt;

use super::GroupAddress;

/// The service a telegram carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelegramType {
    /// A value written to a group address.
    GroupWrite,
    /// A value sent in answer to a [`GroupRead`](Self::GroupRead).
    GroupResponse,
    /// A request to report the current value of a group address.
    GroupRead,
}

impl fmt::Display for TelegramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::GroupWrite => "GroupValueWrite",
            Self::GroupResponse => "GroupValueResponse",
            Self::GroupRead => "GroupValueRead",
        };
        f.write_str(s)
    }
}

/// Telegram payload.
///
/// Values of up to 6 bits travel inside the application control field and
/// are represented as [`Payload::Binary`]. Everything else is a byte array.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Payload {
    /// A value of at most 6 bits.
    Binary(u8),
    /// A sequence of data bytes.
    Array(Vec<u8>),
}

impl Payload {
    /// Returns the data bytes if this is an array payload.
    #[must_use]
    pub fn as_array(&self) -> Option<&[u8]> {
        match self {
            Self::Array(bytes) => Some(bytes),
            Self::Binary(_) => None,
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary(value) => write!(f, "<Binary {value:#04x}>"),
            Self::Array(bytes) => {
                f.write_str("<Array")?;
                for byte in bytes {
                    write!(f, " {byte:#04x}")?;
                }
                f.write_str(">")
            }
        }
    }
}

/// A single message on the bus.
///
/// Telegrams are immutable once constructed. Reads carry no payload.
///
/// # Examples
///
/// ```
/// use knx_devices::types::{GroupAddress, Payload, Telegram, TelegramType};
///
/// let ga: GroupAddress = "1/2/3".parse().unwrap();
/// let write = Telegram::write(ga, Payload::Array(vec![0x0C, 0x1A]));
/// assert_eq!(write.telegram_type(), TelegramType::GroupWrite);
///
/// let read = Telegram::read(ga);
/// assert!(read.payload().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Telegram {
    group_address: GroupAddress,
    telegram_type: TelegramType,
    payload: Option<Payload>,
}

impl Telegram {
    /// Creates a `GroupValueWrite` telegram.
    #[must_use]
    pub fn write(group_address: GroupAddress, payload: Payload) -> Self {
        Self {
            group_address,
            telegram_type: TelegramType::GroupWrite,
            payload: Some(payload),
        }
    }

    /// Creates a `GroupValueResponse` telegram.
    #[must_use]
    pub fn response(group_address: GroupAddress, payload: Payload) -> Self {
        Self {
            group_address,
            telegram_type: TelegramType::GroupResponse,
            payload: Some(payload),
        }
    }

    /// Creates a `GroupValueRead` telegram.
    #[must_use]
    pub fn read(group_address: GroupAddress) -> Self {
        Self {
            group_address,
            telegram_type: TelegramType::GroupRead,
            payload: None,
        }
    }

    /// Returns the destination group address.
    #[must_use]
    pub fn group_address(&self) -> GroupAddress {
        self.group_address
    }

    /// Returns the telegram type.
    #[must_use]
    pub fn telegram_type(&self) -> TelegramType {
        self.telegram_type
    }

    /// Returns the payload, absent for reads.
    #[must_use]
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Returns `true` if the telegram carries a value (write or response).
    #[must_use]
    pub fn carries_value(&self) -> bool {
        matches!(
            self.telegram_type,
            TelegramType::GroupWrite | TelegramType::GroupResponse
        )
    }
}

impl fmt::Display for Telegram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Telegram group_address=\"{}\" type=\"{}\"",
            self.group_address, self.telegram_type
        )?;
        if let Some(payload) = &self.payload {
            write!(f, " payload=\"{payload}\"")?;
        }
        f.write_str(" />")
    }
}
