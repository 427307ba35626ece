// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light HSL types: hue, saturation, their ranges and the composite state.

use std::fmt;

use crate::error::ValueError;

use super::{Level, Lightness};

/// Hue on the full 16-bit circle.
///
/// # Examples
///
/// ```
/// use mesh_lighting::types::{Hue, Level};
///
/// let hue = Hue::new(0x8000);
/// assert_eq!(hue.to_level(), Level::ZERO);
/// assert_eq!(Hue::from_level(Level::MIN), Hue::new(0));
/// ```
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
pub struct Hue(u16);

/// Saturation on a 16-bit scale.
///
/// # Examples
///
/// ```
/// use mesh_lighting::types::{Level, Saturation};
///
/// assert_eq!(Saturation::new(0xFFFF).to_level(), Level::MAX);
/// ```
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
pub struct Saturation(u16);

macro_rules! level_mapped_u16 {
    ($name:ident) => {
        impl $name {
            /// Creates a value.
            #[must_use]
            pub const fn new(value: u16) -> Self {
                Self(value)
            }

            /// Returns the raw value.
            #[must_use]
            pub const fn value(&self) -> u16 {
                self.0
            }

            /// Maps this value onto the level scale (`value - 32768`).
            #[must_use]
            pub const fn to_level(&self) -> Level {
                Level::from_lightness(Lightness::new(self.0))
            }

            /// Maps a level onto this scale (`level + 32768`).
            #[must_use]
            pub const fn from_level(level: Level) -> Self {
                Self(level.to_lightness().value())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:#06x}", self.0)
            }
        }

        impl From<u16> for $name {
            fn from(value: u16) -> Self {
                Self(value)
            }
        }
    };
}

level_mapped_u16!(Hue);
level_mapped_u16!(Saturation);

/// Light HSL Hue Range and Saturation Range states.
///
/// # Examples
///
/// ```
/// use mesh_lighting::types::{HslRange, Hue, Saturation};
///
/// let range = HslRange::new(100, 200, 0, 0xFFFF).unwrap();
/// assert_eq!(range.clamp_hue(Hue::new(50)), Hue::new(100));
/// assert_eq!(range.clamp_saturation(Saturation::new(50)), Saturation::new(50));
///
/// assert!(HslRange::new(200, 100, 0, 0xFFFF).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct HslRange {
    hue_min: u16,
    hue_max: u16,
    saturation_min: u16,
    saturation_max: u16,
}

impl HslRange {
    /// Both ranges span the full 16-bit scale.
    pub const FULL: Self = Self {
        hue_min: 0,
        hue_max: u16::MAX,
        saturation_min: 0,
        saturation_max: u16::MAX,
    };

    /// Creates hue and saturation ranges.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidRange` if either minimum exceeds its maximum.
    pub fn new(
        hue_min: u16,
        hue_max: u16,
        saturation_min: u16,
        saturation_max: u16,
    ) -> Result<Self, ValueError> {
        if hue_min > hue_max {
            return Err(ValueError::InvalidRange {
                min: hue_min,
                max: hue_max,
            });
        }
        if saturation_min > saturation_max {
            return Err(ValueError::InvalidRange {
                min: saturation_min,
                max: saturation_max,
            });
        }
        Ok(Self {
            hue_min,
            hue_max,
            saturation_min,
            saturation_max,
        })
    }

    /// Returns `(min, max)` of the hue range.
    #[must_use]
    pub const fn hue(&self) -> (Hue, Hue) {
        (Hue(self.hue_min), Hue(self.hue_max))
    }

    /// Returns `(min, max)` of the saturation range.
    #[must_use]
    pub const fn saturation(&self) -> (Saturation, Saturation) {
        (Saturation(self.saturation_min), Saturation(self.saturation_max))
    }

    /// Clamps a hue into the hue range.
    #[must_use]
    pub fn clamp_hue(&self, hue: Hue) -> Hue {
        Hue(hue.0.clamp(self.hue_min, self.hue_max))
    }

    /// Clamps a saturation into the saturation range.
    #[must_use]
    pub fn clamp_saturation(&self, saturation: Saturation) -> Saturation {
        Saturation(saturation.0.clamp(self.saturation_min, self.saturation_max))
    }
}

impl Default for HslRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// The composite Light HSL state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct HslState {
    /// Lightness component.
    pub lightness: Lightness,
    /// Hue component.
    pub hue: Hue,
    /// Saturation component.
    pub saturation: Saturation,
}

impl HslState {
    /// Creates an HSL state.
    #[must_use]
    pub const fn new(lightness: Lightness, hue: Hue, saturation: Saturation) -> Self {
        Self {
            lightness,
            hue,
            saturation,
        }
    }
}
