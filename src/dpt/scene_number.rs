// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DPT 17.001 scene number.

use super::{Codec, expect_array};
use crate::error::ConversionError;
use crate::types::Payload;

/// Codec for scene numbers (DPT 17.001).
///
/// Scenes are numbered 1-64 and travel as `number - 1` in a single byte.
///
/// # Examples
///
/// ```
/// use knx_devices::dpt::{Codec, SceneNumberCodec};
/// use knx_devices::types::Payload;
///
/// assert_eq!(SceneNumberCodec.encode(&23).unwrap(), Payload::Array(vec![22]));
/// assert_eq!(SceneNumberCodec.decode(&Payload::Array(vec![0])).unwrap(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneNumberCodec;

impl SceneNumberCodec {
    /// Lowest scene number.
    pub const MIN: u8 = 1;

    /// Highest scene number.
    pub const MAX: u8 = 64;

    const DPT: &'static str = "DPT 17.001";

    /// Returns `true` if `number` is a valid scene number.
    #[must_use]
    pub const fn is_valid(number: u8) -> bool {
        number >= Self::MIN && number <= Self::MAX
    }
}

impl Codec for SceneNumberCodec {
    type Value = u8;

    fn dpt(&self) -> &'static str {
        Self::DPT
    }

    fn encode(&self, value: &u8) -> Result<Payload, ConversionError> {
        if !Self::is_valid(*value) {
            return Err(ConversionError::OutOfRange {
                dpt: Self::DPT,
                value: value.to_string(),
            });
        }
        Ok(Payload::Array(vec![*value - 1]))
    }

    fn decode(&self, payload: &Payload) -> Result<u8, ConversionError> {
        let [raw] = expect_array::<1>(Self::DPT, payload)?;
        if raw >= Self::MAX {
            return Err(ConversionError::InvalidPayload {
                dpt: Self::DPT,
                payload: payload.to_string(),
            });
        }
        Ok(raw + 1)
    }
}
