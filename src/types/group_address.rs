// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Group address type.
//!
//! A group address identifies a shared communication object on the bus. It is
//! a 16-bit value that is usually written in one of three notations:
//!
//! - 3-level: `main/middle/sub` (5/3/8 bits), e.g. `1/2/3`
//! - 2-level: `main/sub` (5/11 bits), e.g. `1/515`
//! - free: the raw integer, e.g. `2563`

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// A bus group address.
///
/// # Examples
///
/// ```
/// use knx_devices::types::GroupAddress;
///
/// let ga: GroupAddress = "1/2/3".parse().unwrap();
/// assert_eq!(ga.main(), 1);
/// assert_eq!(ga.middle(), 2);
/// assert_eq!(ga.sub(), 3);
///
/// // All notations resolve to the same raw value
/// assert_eq!("1/515".parse::<GroupAddress>().unwrap(), ga);
/// assert_eq!("2563".parse::<GroupAddress>().unwrap(), ga);
/// assert_eq!(ga.to_string(), "1/2/3");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupAddress(u16);

impl GroupAddress {
    /// Highest main group.
    pub const MAX_MAIN: u16 = 31;

    /// Highest middle group in 3-level notation.
    pub const MAX_MIDDLE: u16 = 7;

    /// Highest sub group in 3-level notation.
    pub const MAX_SUB_LONG: u16 = 255;

    /// Highest sub group in 2-level notation.
    pub const MAX_SUB_SHORT: u16 = 2047;

    /// Creates a group address from its raw 16-bit value.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Creates a group address from its 3-level parts.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidGroupAddress` if `main` exceeds 31 or
    /// `middle` exceeds 7.
    pub fn new(main: u8, middle: u8, sub: u8) -> Result<Self, ConfigError> {
        if u16::from(main) > Self::MAX_MAIN || u16::from(middle) > Self::MAX_MIDDLE {
            return Err(ConfigError::InvalidGroupAddress(format!(
                "{main}/{middle}/{sub}"
            )));
        }
        Ok(Self(
            (u16::from(main) << 11) | (u16::from(middle) << 8) | u16::from(sub),
        ))
    }

    /// Returns the raw 16-bit value.
    #[must_use]
    pub const fn raw(&self) -> u16 {
        self.0
    }

    /// Returns the main group (0-31).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn main(&self) -> u8 {
        (self.0 >> 11) as u8
    }

    /// Returns the middle group (0-7).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn middle(&self) -> u8 {
        ((self.0 >> 8) & 0x07) as u8
    }

    /// Returns the sub group (0-255).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn sub(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

impl FromStr for GroupAddress {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidGroupAddress(s.to_string());

        let parts = s
            .trim()
            .split('/')
            .map(|part| part.trim().parse::<u16>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [raw] => Ok(Self(*raw)),
            [main, sub] if *main <= Self::MAX_MAIN && *sub <= Self::MAX_SUB_SHORT => {
                Ok(Self((main << 11) | sub))
            }
            [main, middle, sub]
                if *main <= Self::MAX_MAIN
                    && *middle <= Self::MAX_MIDDLE
                    && *sub <= Self::MAX_SUB_LONG =>
            {
                Ok(Self((main << 11) | (middle << 8) | sub))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for GroupAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.main(), self.middle(), self.sub())
    }
}

impl fmt::Debug for GroupAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupAddress(\"{self}\")")
    }
}

impl From<u16> for GroupAddress {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl Serialize for GroupAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GroupAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(GroupAddressVisitor)
    }
}

/// Accepts both the string notations and raw integers.
struct GroupAddressVisitor;

impl Visitor<'_> for GroupAddressVisitor {
    type Value = GroupAddress;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a group address string or a raw 16-bit integer")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        u16::try_from(value)
            .map(GroupAddress)
            .map_err(|_| E::custom(format!("group address {value} exceeds 16 bits")))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        u16::try_from(value)
            .map(GroupAddress)
            .map_err(|_| E::custom(format!("group address {value} is out of range")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_three_level() {
        let ga: GroupAddress = "31/7/255".parse().unwrap();
        assert_eq!(ga.raw(), 0xFFFF);
        assert_eq!(ga.to_string(), "31/7/255");
    }

    #[test]
    fn parse_two_level() {
        let ga: GroupAddress = "2/2047".parse().unwrap();
        assert_eq!(ga.main(), 2);
        assert_eq!(ga.middle(), 7);
        assert_eq!(ga.sub(), 255);
    }

    #[test]
    fn parse_free_notation() {
        let ga: GroupAddress = "0".parse().unwrap();
        assert_eq!(ga, GroupAddress::from_raw(0));
    }

    #[test]
    fn parse_rejects_out_of_range_parts() {
        assert!("32/0/0".parse::<GroupAddress>().is_err());
        assert!("1/8/0".parse::<GroupAddress>().is_err());
        assert!("1/0/256".parse::<GroupAddress>().is_err());
        assert!("1/2048".parse::<GroupAddress>().is_err());
        assert!("70000".parse::<GroupAddress>().is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "1/a/3".parse::<GroupAddress>().unwrap_err();
        assert_eq!(err, ConfigError::InvalidGroupAddress("1/a/3".to_string()));
        assert!("".parse::<GroupAddress>().is_err());
        assert!("1/2/3/4".parse::<GroupAddress>().is_err());
    }

    #[test]
    fn new_checks_parts() {
        assert_eq!(
            GroupAddress::new(1, 2, 3).unwrap(),
            "1/2/3".parse().unwrap()
        );
        assert!(GroupAddress::new(32, 0, 0).is_err());
        assert!(GroupAddress::new(0, 8, 0).is_err());
    }

    #[test]
    fn debug_format() {
        let ga = GroupAddress::from_raw(2563);
        assert_eq!(format!("{ga:?}"), "GroupAddress(\"1/2/3\")");
    }

    #[test]
    fn deserialize_string_and_integer() {
        let ga: GroupAddress = serde_json::from_str("\"1/2/3\"").unwrap();
        assert_eq!(ga.raw(), 2563);

        let ga: GroupAddress = serde_json::from_str("2563").unwrap();
        assert_eq!(ga.to_string(), "1/2/3");

        assert!(serde_json::from_str::<GroupAddress>("\"1/9/3\"").is_err());
        assert!(serde_json::from_str::<GroupAddress>("65536").is_err());
    }

    #[test]
    fn serialize_as_string() {
        let ga: GroupAddress = "4/0/12".parse().unwrap();
        assert_eq!(serde_json::to_string(&ga).unwrap(), "\"4/0/12\"");
    }
}
