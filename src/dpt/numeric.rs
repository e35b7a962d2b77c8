// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Numeric encodings shared by the sensor value types.

use crate::error::ConversionError;

/// Smallest value representable as a 2-byte float.
pub(crate) const FLOAT2_MIN: f64 = -671_088.64;

/// Largest value representable as a 2-byte float.
pub(crate) const FLOAT2_MAX: f64 = 670_760.96;

/// Encodes a DPT 9 2-byte float.
///
/// Layout: `MEEE EMMM MMMM MMMM` where the value is
/// `0.01 * mantissa * 2^exponent` and the mantissa is an 11-bit two's
/// complement number whose sign is repeated in the top bit.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn encode_float2(dpt: &'static str, value: f64) -> Result<[u8; 2], ConversionError> {
    if !value.is_finite() || !(FLOAT2_MIN..=FLOAT2_MAX).contains(&value) {
        return Err(ConversionError::OutOfRange {
            dpt,
            value: value.to_string(),
        });
    }

    let mut scaled = value * 100.0;
    let mut exponent: u8 = 0;
    while !(-2048.0..=2047.0).contains(&scaled.round()) {
        exponent += 1;
        scaled /= 2.0;
    }

    // Sign comes from the rounded mantissa, -0.001 rounds to +0
    let rounded = scaled.round();
    let mantissa = (rounded as i32) & 0x07FF;
    let mut msb = (exponent << 3) | ((mantissa >> 8) as u8);
    if rounded < 0.0 {
        msb |= 0x80;
    }
    Ok([msb, (mantissa & 0xFF) as u8])
}

/// Decodes a DPT 9 2-byte float.
pub(crate) fn decode_float2(raw: [u8; 2]) -> f64 {
    let data = u16::from_be_bytes(raw);
    let exponent = (data >> 11) & 0x0F;
    let mut significand = i32::from(data & 0x07FF);
    if data & 0x8000 != 0 {
        significand -= 2048;
    }
    f64::from(significand << exponent) / 100.0
}

/// Encodes a DPT 14 4-byte IEEE 754 float.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn encode_float4(dpt: &'static str, value: f64) -> Result<[u8; 4], ConversionError> {
    let single = value as f32;
    if !single.is_finite() {
        return Err(ConversionError::OutOfRange {
            dpt,
            value: value.to_string(),
        });
    }
    Ok(single.to_be_bytes())
}

/// Decodes a DPT 14 4-byte IEEE 754 float.
pub(crate) fn decode_float4(raw: [u8; 4]) -> f64 {
    f64::from(f32::from_be_bytes(raw))
}

/// Encodes a DPT 5 unsigned byte scaled to `0..=range`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn encode_scaled(
    dpt: &'static str,
    value: f64,
    range: f64,
) -> Result<u8, ConversionError> {
    if !value.is_finite() || !(0.0..=range).contains(&value) {
        return Err(ConversionError::OutOfRange {
            dpt,
            value: value.to_string(),
        });
    }
    Ok((value * 255.0 / range).round() as u8)
}

/// Decodes a DPT 5 unsigned byte scaled to `0..=range`.
pub(crate) fn decode_scaled(raw: u8, range: f64) -> f64 {
    (f64::from(raw) * range / 255.0).round()
}

/// Encodes a DPT 5.010 unsigned counter byte.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn encode_unsigned(dpt: &'static str, value: f64) -> Result<u8, ConversionError> {
    if value.fract() != 0.0 || !(0.0..=255.0).contains(&value) {
        return Err(ConversionError::OutOfRange {
            dpt,
            value: value.to_string(),
        });
    }
    Ok(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float2_known_values() {
        assert_eq!(encode_float2("9.001", 21.0).unwrap(), [0x0C, 0x1A]);
        assert_eq!(encode_float2("9.001", 0.0).unwrap(), [0x00, 0x00]);
        assert_eq!(encode_float2("9.001", -1.0).unwrap(), [0x87, 0x9C]);
        assert_eq!(encode_float2("9.001", FLOAT2_MAX).unwrap(), [0x7F, 0xFF]);
        assert_eq!(encode_float2("9.001", FLOAT2_MIN).unwrap(), [0xF8, 0x00]);
    }

    #[test]
    fn float2_tiny_negatives_round_to_zero() {
        for value in [-0.001, -0.004] {
            let raw = encode_float2("9.001", value).unwrap();
            assert_eq!(raw, [0x00, 0x00], "{value}");
            assert!(decode_float2(raw).abs() < f64::EPSILON);
        }
        assert_eq!(encode_float2("9.001", -0.006).unwrap(), [0x87, 0xFF]);
        assert!((decode_float2([0x87, 0xFF]) + 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn float2_decode_known_values() {
        assert!((decode_float2([0x0C, 0x1A]) - 21.0).abs() < f64::EPSILON);
        assert!((decode_float2([0x06, 0xA4]) - 17.0).abs() < f64::EPSILON);
        assert!((decode_float2([0x87, 0x9C]) + 1.0).abs() < f64::EPSILON);
        assert!((decode_float2([0x7F, 0xFF]) - FLOAT2_MAX).abs() < 1e-6);
        assert!((decode_float2([0xF8, 0x00]) - FLOAT2_MIN).abs() < 1e-6);
    }

    #[test]
    fn float2_out_of_range() {
        assert!(encode_float2("9.001", 700_000.0).is_err());
        assert!(encode_float2("9.001", f64::NAN).is_err());
    }

    #[test]
    fn float4_values() {
        assert_eq!(encode_float4("14.056", 230.5).unwrap(), 230.5f32.to_be_bytes());
        assert!((decode_float4(230.5f32.to_be_bytes()) - 230.5).abs() < f64::EPSILON);
        assert!(encode_float4("14.056", f64::INFINITY).is_err());
    }

    #[test]
    fn scaled_percent() {
        assert_eq!(encode_scaled("5.001", 100.0, 100.0).unwrap(), 0xFF);
        assert_eq!(encode_scaled("5.001", 50.0, 100.0).unwrap(), 0x80);
        assert!((decode_scaled(0xFF, 100.0) - 100.0).abs() < f64::EPSILON);
        assert!((decode_scaled(0x80, 100.0) - 50.0).abs() < f64::EPSILON);
        assert!(encode_scaled("5.001", 101.0, 100.0).is_err());
    }

    #[test]
    fn unsigned_counter() {
        assert_eq!(encode_unsigned("5.010", 42.0).unwrap(), 42);
        assert!(encode_unsigned("5.010", 1.5).is_err());
        assert!(encode_unsigned("5.010", 256.0).is_err());
    }
}
