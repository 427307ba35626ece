// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light Lightness types.
//!
//! Lightness is perceptually uniform ("Actual"); the derived "Linear"
//! value is the square of the actual value rescaled to 16 bits.

use std::fmt;

use crate::error::ValueError;

/// Light Lightness Actual value (0 is off, 65535 is full).
///
/// # Examples
///
/// ```
/// use mesh_lighting::types::Lightness;
///
/// let half = Lightness::new(0x8000);
/// assert!(half.is_on());
/// assert!(!Lightness::MIN.is_on());
///
/// // Linear round-trips at the extremes
/// assert_eq!(Lightness::MAX.to_linear(), 65535);
/// assert_eq!(Lightness::from_linear(65535), Lightness::MAX);
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
pub struct Lightness(u16);

impl Lightness {
    /// Lightness zero (off).
    pub const MIN: Self = Self(0);

    /// Full lightness.
    pub const MAX: Self = Self(u16::MAX);

    /// Creates a lightness value.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Returns `true` when the light is emitting.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.0 != 0
    }

    /// Returns the Light Lightness Linear value, `ceil(65535 * (actual / 65535)^2)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn to_linear(&self) -> u16 {
        let actual = self.0 as u64;
        ((actual * actual + 65534) / 65535) as u16
    }

    /// Converts a Light Lightness Linear value back to actual, `65535 * sqrt(linear / 65535)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_linear(linear: u16) -> Self {
        Self((linear as u64 * 65535).isqrt() as u16)
    }
}

impl fmt::Display for Lightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

impl From<u16> for Lightness {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

/// Light Lightness Range state.
///
/// Both bounds are non-zero and `min <= max`. Zero lightness stays
/// reachable regardless of the range since it means "off".
///
/// # Examples
///
/// ```
/// use mesh_lighting::types::{Lightness, LightnessRange};
///
/// let range = LightnessRange::new(Lightness::new(100), Lightness::new(1000)).unwrap();
/// assert_eq!(range.clamp(Lightness::new(5)), Lightness::new(100));
/// assert_eq!(range.clamp(Lightness::new(5000)), Lightness::new(1000));
/// assert_eq!(range.clamp(Lightness::MIN), Lightness::MIN);
///
/// assert!(LightnessRange::new(Lightness::MIN, Lightness::MAX).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct LightnessRange {
    min: Lightness,
    max: Lightness,
}

impl LightnessRange {
    /// The full range, `1..=65535`.
    pub const FULL: Self = Self {
        min: Lightness(1),
        max: Lightness::MAX,
    };

    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidRange` if a bound is zero or `min > max`.
    pub fn new(min: Lightness, max: Lightness) -> Result<Self, ValueError> {
        if min.0 == 0 || max.0 == 0 || min > max {
            return Err(ValueError::InvalidRange {
                min: min.0,
                max: max.0,
            });
        }
        Ok(Self { min, max })
    }

    /// Returns the lower bound.
    #[must_use]
    pub const fn min(&self) -> Lightness {
        self.min
    }

    /// Returns the upper bound.
    #[must_use]
    pub const fn max(&self) -> Lightness {
        self.max
    }

    /// Clamps a non-zero lightness into the range; zero passes through.
    #[must_use]
    pub fn clamp(&self, value: Lightness) -> Lightness {
        if value.0 == 0 {
            value
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

impl Default for LightnessRange {
    fn default() -> Self {
        Self::FULL
    }
}
