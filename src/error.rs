// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the device layer.
//!
//! Configuration errors are fatal at construction time, conversion and bus
//! errors propagate from telegram processing and state synchronization, and
//! command errors are recovered locally by the device that received the
//! action.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A device could not be constructed from the given configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A value could not be encoded into, or decoded from, a payload.
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// The bus handle could not deliver a telegram.
    #[error("bus error: {0}")]
    Bus(#[from] BusError),
}

/// Errors raised while constructing devices.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Neither a unique id nor a name was supplied.
    #[error("either unique_id or name has to be provided")]
    MissingIdentity,

    /// A required configuration key is absent.
    #[error("{device}: missing required key `{key}`")]
    MissingKey {
        /// The device the key belongs to.
        device: String,
        /// The missing key.
        key: &'static str,
    },

    /// A configuration key holds a value that cannot be used.
    #[error("invalid value for `{key}`: {message}")]
    InvalidValue {
        /// The offending key.
        key: String,
        /// Description of the problem.
        message: String,
    },

    /// A group address string could not be parsed.
    #[error("invalid group address: {0}")]
    InvalidGroupAddress(String),

    /// The configuration mapping does not have the expected structure.
    #[error("malformed {device} configuration: {message}")]
    Malformed {
        /// The kind of device being configured.
        device: &'static str,
        /// Description of the problem.
        message: String,
    },
}

/// Errors raised by datapoint encoding and decoding.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    /// The value cannot be represented by the datapoint type.
    #[error("{dpt}: value {value} is out of range")]
    OutOfRange {
        /// Datapoint type name.
        dpt: &'static str,
        /// Rendering of the rejected value.
        value: String,
    },

    /// The payload has the wrong shape or length for the datapoint type.
    #[error("{dpt}: could not parse payload {payload}")]
    InvalidPayload {
        /// Datapoint type name.
        dpt: &'static str,
        /// Rendering of the rejected payload.
        payload: String,
    },

    /// The string contains characters outside the supported charset.
    #[error("{dpt}: unsupported characters in {value:?}")]
    UnsupportedCharacters {
        /// Datapoint type name.
        dpt: &'static str,
        /// The rejected string.
        value: String,
    },

    /// The sensor value type name is not known.
    #[error("unknown value type: {0}")]
    UnknownValueType(String),
}

/// Errors related to the bus handle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The outgoing telegram queue has no receiver anymore.
    #[error("outgoing telegram queue is closed")]
    ChannelClosed,
}

/// Errors produced when decoding a free-text device action.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The action does not belong to the device's command vocabulary.
    #[error("could not understand action {action}")]
    Unrecognized {
        /// The action string that was received.
        action: String,
    },
}

impl CommandError {
    pub(crate) fn unrecognized(action: &str) -> Self {
        Self::Unrecognized {
            action: action.to_string(),
        }
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
