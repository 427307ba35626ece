// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generic Level type.

use std::fmt;

use super::Lightness;

/// Generic Level state, a signed 16-bit value.
///
/// Every `i16` is a valid level. Arithmetic that may leave the range goes
/// through [`Level::saturating`], which clamps a wide value into
/// `MIN..=MAX` the way Delta and Move requests require.
///
/// # Examples
///
/// ```
/// use mesh_lighting::types::{Level, Lightness};
///
/// let level = Level::new(-100);
/// assert_eq!(level.value(), -100);
///
/// // Wide arithmetic saturates
/// assert_eq!(Level::saturating(40_000), Level::MAX);
///
/// // Level and Lightness are offset by 32768
/// assert_eq!(Level::MIN.to_lightness(), Lightness::MIN);
/// assert_eq!(Level::from_lightness(Lightness::MAX), Level::MAX);
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
pub struct Level(i16);

impl Level {
    /// Lowest representable level.
    pub const MIN: Self = Self(i16::MIN);

    /// Highest representable level.
    pub const MAX: Self = Self(i16::MAX);

    /// Level zero.
    pub const ZERO: Self = Self(0);

    /// Creates a level.
    #[must_use]
    pub const fn new(value: i16) -> Self {
        Self(value)
    }

    /// Creates a level from a wide value, clamping to `MIN..=MAX`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn saturating(value: i32) -> Self {
        if value > i16::MAX as i32 {
            Self::MAX
        } else if value < i16::MIN as i32 {
            Self::MIN
        } else {
            Self(value as i16)
        }
    }

    /// Returns the raw level.
    #[must_use]
    pub const fn value(&self) -> i16 {
        self.0
    }

    /// Maps a lightness onto the level scale (`level = lightness - 32768`).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_lightness(lightness: Lightness) -> Self {
        Self((lightness.value() as i32 - 32768) as i16)
    }

    /// Maps this level onto the lightness scale (`lightness = level + 32768`).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn to_lightness(&self) -> Lightness {
        Lightness::new((self.0 as i32 + 32768) as u16)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i16> for Level {
    fn from(value: i16) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturating_clamps_both_ends() {
        assert_eq!(Level::saturating(-40_000), Level::MIN);
        assert_eq!(Level::saturating(40_000), Level::MAX);
        assert_eq!(Level::saturating(1234).value(), 1234);
    }

    #[test]
    fn lightness_mapping() {
        assert_eq!(Level::ZERO.to_lightness().value(), 0x8000);
        assert_eq!(Level::from_lightness(Lightness::new(0x8000)), Level::ZERO);
        assert_eq!(Level::MAX.to_lightness(), Lightness::MAX);
    }

    #[test]
    fn level_display() {
        assert_eq!(Level::new(-5).to_string(), "-5");
    }
}
