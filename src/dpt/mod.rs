// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Datapoint type codecs.
//!
//! A [`Codec`] converts between a typed value and the [`Payload`] that
//! carries it on the bus. Only the datapoint types needed by the bundled
//! devices are provided:
//!
//! | Codec | DPT | Value |
//! |-------|-----|-------|
//! | [`StringCodec`] | 16.000 | 14 character ASCII string |
//! | [`SceneNumberCodec`] | 17.001 | Scene number 1-64 |
//! | [`SensorCodec`] | 5.xxx, 9.xxx, 14.xxx | Measurement per [`ValueType`] |

mod numeric;
mod scene_number;
mod string;
mod value_type;

use std::fmt;

pub use scene_number::SceneNumberCodec;
pub use string::StringCodec;
pub use value_type::{SensorCodec, ValueType};

use crate::error::ConversionError;
use crate::types::Payload;

/// Encoding and decoding of one datapoint type.
///
/// Implementations are plain data; two codecs compare equal when they encode
/// identically.
pub trait Codec: fmt::Debug + PartialEq + Send + Sync + 'static {
    /// The decoded value type.
    type Value: Clone + fmt::Debug + fmt::Display + PartialEq + Send + Sync + 'static;

    /// Returns the datapoint type name, used in diagnostics.
    fn dpt(&self) -> &'static str;

    /// Encodes a value into a payload.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` if the value cannot be represented.
    fn encode(&self, value: &Self::Value) -> Result<Payload, ConversionError>;

    /// Decodes a payload into a value.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` if the payload has the wrong shape.
    fn decode(&self, payload: &Payload) -> Result<Self::Value, ConversionError>;

    /// Renders a value for diagnostics.
    fn render(&self, value: &Self::Value) -> String {
        value.to_string()
    }
}

/// Extracts exactly `N` data bytes from an array payload.
pub(crate) fn expect_array<const N: usize>(
    dpt: &'static str,
    payload: &Payload,
) -> Result<[u8; N], ConversionError> {
    payload
        .as_array()
        .and_then(|bytes| <[u8; N]>::try_from(bytes).ok())
        .ok_or_else(|| ConversionError::InvalidPayload {
            dpt,
            payload: payload.to_string(),
        })
}
