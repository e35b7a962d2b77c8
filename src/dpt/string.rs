// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DPT 16.000 character string.

use super::{Codec, expect_array};
use crate::error::ConversionError;
use crate::types::Payload;

/// Codec for 14 character ASCII strings (DPT 16.000).
///
/// Strings are zero padded to 14 bytes. Decoding drops the padding.
///
/// # Examples
///
/// ```
/// use knx_devices::dpt::{Codec, StringCodec};
/// use knx_devices::types::Payload;
///
/// let payload = StringCodec.encode(&"Hello".to_string()).unwrap();
/// assert_eq!(payload.as_array().unwrap().len(), 14);
/// assert_eq!(StringCodec.decode(&payload).unwrap(), "Hello");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringCodec;

impl StringCodec {
    /// Number of characters a string payload carries.
    pub const MAX_LENGTH: usize = 14;

    const DPT: &'static str = "DPT 16.000";
}

impl Codec for StringCodec {
    type Value = String;

    fn dpt(&self) -> &'static str {
        Self::DPT
    }

    fn encode(&self, value: &String) -> Result<Payload, ConversionError> {
        if !value.is_ascii() {
            return Err(ConversionError::UnsupportedCharacters {
                dpt: Self::DPT,
                value: value.clone(),
            });
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(ConversionError::OutOfRange {
                dpt: Self::DPT,
                value: value.clone(),
            });
        }

        let mut bytes = value.as_bytes().to_vec();
        bytes.resize(Self::MAX_LENGTH, 0);
        Ok(Payload::Array(bytes))
    }

    fn decode(&self, payload: &Payload) -> Result<String, ConversionError> {
        let raw = expect_array::<{ StringCodec::MAX_LENGTH }>(Self::DPT, payload)?;
        Ok(raw
            .iter()
            .filter(|byte| **byte != 0)
            .map(|byte| char::from(*byte))
            .collect())
    }
}
