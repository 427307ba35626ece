// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light CTL types: color temperature, delta UV and the composite state.

use std::fmt;

use crate::error::ValueError;

use super::{Level, Lightness};

/// Color temperature of white light in Kelvin (800-20000).
///
/// # Examples
///
/// ```
/// use mesh_lighting::types::Temperature;
///
/// let warm = Temperature::new(2700).unwrap();
/// assert_eq!(warm.value(), 2700);
///
/// assert!(Temperature::new(500).is_err());
/// assert_eq!(Temperature::clamped(500), Temperature::MIN);
/// assert_eq!(Temperature::clamped(25_000), Temperature::MAX);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u16", into = "u16")]
pub struct Temperature(u16);

impl Temperature {
    /// Lowest supported temperature (800 K).
    pub const MIN: Self = Self(0x0320);

    /// Highest supported temperature (20000 K).
    pub const MAX: Self = Self(0x4E20);

    /// Creates a temperature.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the value is outside 800-20000.
    pub fn new(value: u16) -> Result<Self, ValueError> {
        if value < Self::MIN.0 || value > Self::MAX.0 {
            return Err(ValueError::OutOfRange {
                min: i32::from(Self::MIN.0),
                max: i32::from(Self::MAX.0),
                actual: i32::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Creates a temperature, clamping to the supported range.
    #[must_use]
    pub const fn clamped(value: u16) -> Self {
        if value < Self::MIN.0 {
            Self::MIN
        } else if value > Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }

    /// Returns the temperature in Kelvin.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}K", self.0)
    }
}

impl TryFrom<u16> for Temperature {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Temperature> for u16 {
    fn from(value: Temperature) -> Self {
        value.0
    }
}

/// Distance from the black body curve, signed.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct DeltaUv(i16);

impl DeltaUv {
    /// Creates a delta UV value.
    #[must_use]
    pub const fn new(value: i16) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(&self) -> i16 {
        self.0
    }
}

/// Light CTL Temperature Range state.
///
/// Also drives the rescaling between temperature and Generic Level on the
/// temperature element.
///
/// # Examples
///
/// ```
/// use mesh_lighting::types::{Level, Temperature, TemperatureRange};
///
/// let range = TemperatureRange::FULL;
/// assert_eq!(range.to_level(Temperature::MIN), Level::MIN);
/// assert_eq!(range.to_level(Temperature::MAX), Level::MAX);
/// assert_eq!(range.from_level(Level::MIN), Temperature::MIN);
/// assert_eq!(range.from_level(Level::MAX), Temperature::MAX);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TemperatureRange {
    min: Temperature,
    max: Temperature,
}

impl TemperatureRange {
    /// The full supported range, 800-20000 K.
    pub const FULL: Self = Self {
        min: Temperature::MIN,
        max: Temperature::MAX,
    };

    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidRange` if `min > max`.
    pub fn new(min: Temperature, max: Temperature) -> Result<Self, ValueError> {
        if min > max {
            return Err(ValueError::InvalidRange {
                min: min.0,
                max: max.0,
            });
        }
        Ok(Self { min, max })
    }

    /// Returns the lower bound.
    #[must_use]
    pub const fn min(&self) -> Temperature {
        self.min
    }

    /// Returns the upper bound.
    #[must_use]
    pub const fn max(&self) -> Temperature {
        self.max
    }

    /// Clamps a raw temperature into the range.
    #[must_use]
    pub fn clamp(&self, value: u16) -> Temperature {
        Temperature(value.clamp(self.min.0, self.max.0))
    }

    /// Rescales a temperature onto the level scale:
    /// `(T - min) * 65535 / (max - min) - 32768`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_level(&self, temperature: Temperature) -> Level {
        let span = i64::from(self.max.0 - self.min.0);
        if span == 0 {
            return Level::MIN;
        }
        let offset = i64::from(self.clamp(temperature.0).0 - self.min.0);
        Level::saturating((offset * 65535 / span - 32768) as i32)
    }

    /// Rescales a level onto the temperature scale:
    /// `min + (level + 32768) * (max - min) / 65535`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_level(&self, level: Level) -> Temperature {
        let span = i64::from(self.max.0 - self.min.0);
        let offset = (i64::from(level.value()) + 32768) * span / 65535;
        Temperature(self.min.0 + offset as u16)
    }
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// The state owned by a Light CTL Temperature element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TemperatureState {
    /// Color temperature.
    pub temperature: Temperature,
    /// Delta UV.
    pub delta_uv: DeltaUv,
}

impl TemperatureState {
    /// Creates a temperature state.
    #[must_use]
    pub const fn new(temperature: Temperature, delta_uv: DeltaUv) -> Self {
        Self {
            temperature,
            delta_uv,
        }
    }
}

/// The composite Light CTL state.
///
/// # Examples
///
/// ```
/// use mesh_lighting::types::{CtlState, DeltaUv, Lightness, Temperature};
///
/// let state = CtlState::new(Lightness::MAX, Temperature::new(4000).unwrap(), DeltaUv::default());
/// assert_eq!(state.temperature_state().temperature.value(), 4000);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CtlState {
    /// Lightness component.
    pub lightness: Lightness,
    /// Color temperature component.
    pub temperature: Temperature,
    /// Delta UV component.
    pub delta_uv: DeltaUv,
}

impl CtlState {
    /// Creates a CTL state.
    #[must_use]
    pub const fn new(lightness: Lightness, temperature: Temperature, delta_uv: DeltaUv) -> Self {
        Self {
            lightness,
            temperature,
            delta_uv,
        }
    }

    /// Returns the temperature and delta UV pair.
    #[must_use]
    pub const fn temperature_state(&self) -> TemperatureState {
        TemperatureState::new(self.temperature, self.delta_uv)
    }

    /// Returns a copy with the temperature pair replaced.
    #[must_use]
    pub const fn with_temperature_state(mut self, state: TemperatureState) -> Self {
        self.temperature = state.temperature;
        self.delta_uv = state.delta_uv;
        self
    }
}
