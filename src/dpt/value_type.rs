// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor value types.

use std::fmt;
use std::str::FromStr;

use super::numeric::{
    decode_float2, decode_float4, decode_scaled, encode_float2, encode_float4, encode_scaled,
    encode_unsigned,
};
use super::{Codec, expect_array};
use crate::error::ConversionError;
use crate::types::Payload;

/// The measurement a sensor reports.
///
/// The value type decides the encoding on the bus, the unit of measurement
/// and the device class reported to platform integrations.
///
/// # Examples
///
/// ```
/// use knx_devices::dpt::ValueType;
///
/// let vt: ValueType = "temperature".parse().unwrap();
/// assert_eq!(vt.unit(), "°C");
/// assert_eq!(vt.ha_device_class(), Some("temperature"));
/// assert!("flux_capacitance".parse::<ValueType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Percentage 0-100 (DPT 5.001).
    Percent,
    /// Angle 0-360 degrees (DPT 5.003).
    Angle,
    /// Counter pulses 0-255 (DPT 5.010).
    Pulse,
    /// Temperature in °C (DPT 9.001).
    Temperature,
    /// Illuminance in lux (DPT 9.004).
    Illuminance,
    /// Wind speed in m/s (DPT 9.005).
    WindSpeedMs,
    /// Pressure in Pa (DPT 9.006).
    Pressure,
    /// Relative humidity in % (DPT 9.007).
    Humidity,
    /// Electric current in A (DPT 14.019).
    ElectricCurrent,
    /// Electric potential in V (DPT 14.027).
    ElectricPotential,
    /// Power in W (DPT 14.056).
    Power,
}

impl ValueType {
    /// All known value types.
    pub const ALL: [Self; 11] = [
        Self::Percent,
        Self::Angle,
        Self::Pulse,
        Self::Temperature,
        Self::Illuminance,
        Self::WindSpeedMs,
        Self::Pressure,
        Self::Humidity,
        Self::ElectricCurrent,
        Self::ElectricPotential,
        Self::Power,
    ];

    /// Returns the configuration name of the value type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Percent => "percent",
            Self::Angle => "angle",
            Self::Pulse => "pulse",
            Self::Temperature => "temperature",
            Self::Illuminance => "illuminance",
            Self::WindSpeedMs => "wind_speed_ms",
            Self::Pressure => "pressure",
            Self::Humidity => "humidity",
            Self::ElectricCurrent => "electric_current",
            Self::ElectricPotential => "electric_potential",
            Self::Power => "power",
        }
    }

    /// Returns the datapoint type used on the bus.
    #[must_use]
    pub const fn dpt(&self) -> &'static str {
        match self {
            Self::Percent => "DPT 5.001",
            Self::Angle => "DPT 5.003",
            Self::Pulse => "DPT 5.010",
            Self::Temperature => "DPT 9.001",
            Self::Illuminance => "DPT 9.004",
            Self::WindSpeedMs => "DPT 9.005",
            Self::Pressure => "DPT 9.006",
            Self::Humidity => "DPT 9.007",
            Self::ElectricCurrent => "DPT 14.019",
            Self::ElectricPotential => "DPT 14.027",
            Self::Power => "DPT 14.056",
        }
    }

    /// Returns the unit of measurement.
    #[must_use]
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::Percent | Self::Humidity => "%",
            Self::Angle => "°",
            Self::Pulse => "counter pulses",
            Self::Temperature => "°C",
            Self::Illuminance => "lx",
            Self::WindSpeedMs => "m/s",
            Self::Pressure => "Pa",
            Self::ElectricCurrent => "A",
            Self::ElectricPotential => "V",
            Self::Power => "W",
        }
    }

    /// Returns the home assistant device class, if the measurement has one.
    #[must_use]
    pub const fn ha_device_class(&self) -> Option<&'static str> {
        match self {
            Self::Temperature => Some("temperature"),
            Self::Illuminance => Some("illuminance"),
            Self::Pressure => Some("pressure"),
            Self::Humidity => Some("humidity"),
            Self::Power => Some("power"),
            _ => None,
        }
    }
}

impl FromStr for ValueType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|vt| vt.name() == s)
            .ok_or_else(|| ConversionError::UnknownValueType(s.to_string()))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Codec for sensor measurements, dispatching on the [`ValueType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorCodec {
    value_type: ValueType,
}

impl SensorCodec {
    /// Creates a codec for the given value type.
    #[must_use]
    pub const fn new(value_type: ValueType) -> Self {
        Self { value_type }
    }

    /// Returns the value type.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }
}

impl Codec for SensorCodec {
    type Value = f64;

    fn dpt(&self) -> &'static str {
        self.value_type.dpt()
    }

    fn encode(&self, value: &f64) -> Result<Payload, ConversionError> {
        let dpt = self.dpt();
        let bytes = match self.value_type {
            ValueType::Percent => vec![encode_scaled(dpt, *value, 100.0)?],
            ValueType::Angle => vec![encode_scaled(dpt, *value, 360.0)?],
            ValueType::Pulse => vec![encode_unsigned(dpt, *value)?],
            ValueType::Temperature
            | ValueType::Illuminance
            | ValueType::WindSpeedMs
            | ValueType::Pressure
            | ValueType::Humidity => encode_float2(dpt, *value)?.to_vec(),
            ValueType::ElectricCurrent | ValueType::ElectricPotential | ValueType::Power => {
                encode_float4(dpt, *value)?.to_vec()
            }
        };
        Ok(Payload::Array(bytes))
    }

    fn decode(&self, payload: &Payload) -> Result<f64, ConversionError> {
        let dpt = self.dpt();
        let value = match self.value_type {
            ValueType::Percent => decode_scaled(expect_array::<1>(dpt, payload)?[0], 100.0),
            ValueType::Angle => decode_scaled(expect_array::<1>(dpt, payload)?[0], 360.0),
            ValueType::Pulse => f64::from(expect_array::<1>(dpt, payload)?[0]),
            ValueType::Temperature
            | ValueType::Illuminance
            | ValueType::WindSpeedMs
            | ValueType::Pressure
            | ValueType::Humidity => decode_float2(expect_array::<2>(dpt, payload)?),
            ValueType::ElectricCurrent | ValueType::ElectricPotential | ValueType::Power => {
                decode_float4(expect_array::<4>(dpt, payload)?)
            }
        };
        Ok(value)
    }

    fn render(&self, value: &f64) -> String {
        // Keeps the decimal point on whole numbers
        format!("{value:?}")
    }
}
