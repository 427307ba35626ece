// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transition time and delay encodings.
//!
//! A transition time is packed into one byte: the top two bits select the
//! step resolution and the low six bits count steps. A step count of
//! `0x3F` means "unknown" and is prohibited in requests.
//!
//! # Examples
//!
//! ```
//! use mesh_lighting::types::{Delay, Resolution, TransitionTime};
//!
//! // 5 steps of 100 ms
//! let time = TransitionTime::new(0x05).unwrap();
//! assert_eq!(time.resolution(), Resolution::Millis100);
//! assert_eq!(time.as_millis(), Some(500));
//!
//! // 2 steps of 1 s
//! assert_eq!(TransitionTime::new(0x42).unwrap().as_millis(), Some(2000));
//!
//! // Remaining times are encoded with the finest resolution that fits
//! assert_eq!(TransitionTime::from_millis(300).raw(), 0x03);
//! assert_eq!(TransitionTime::from_millis(7000).raw(), 0x47);
//!
//! // Delays count 5 ms units
//! assert_eq!(Delay::new(20).as_millis(), 100);
//! ```

use std::fmt;

use crate::error::ValueError;

const STEPS_MASK: u8 = 0x3F;
const UNKNOWN_STEPS: u8 = 0x3F;
const MAX_STEPS: u32 = 0x3E;

/// Step resolution of a [`TransitionTime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Resolution {
    /// 100 milliseconds per step.
    Millis100,
    /// 1 second per step.
    Seconds1,
    /// 10 seconds per step.
    Seconds10,
    /// 10 minutes per step.
    Minutes10,
}

impl Resolution {
    /// Returns the duration of one step in milliseconds.
    #[must_use]
    pub const fn step_millis(&self) -> u32 {
        match self {
            Self::Millis100 => 100,
            Self::Seconds1 => 1_000,
            Self::Seconds10 => 10_000,
            Self::Minutes10 => 600_000,
        }
    }

    const fn bits(self) -> u8 {
        match self {
            Self::Millis100 => 0,
            Self::Seconds1 => 1,
            Self::Seconds10 => 2,
            Self::Minutes10 => 3,
        }
    }

    const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Millis100,
            1 => Self::Seconds1,
            2 => Self::Seconds10,
            _ => Self::Minutes10,
        }
    }
}

/// Encoded transition time.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct TransitionTime(u8);

impl TransitionTime {
    /// Immediate transition.
    pub const ZERO: Self = Self(0);

    /// Unknown or unrepresentable remaining time.
    pub const UNKNOWN: Self = Self(UNKNOWN_STEPS);

    /// Parses a transition time from a request.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::ProhibitedTransitionTime` if the step count is `0x3F`.
    pub const fn new(raw: u8) -> Result<Self, ValueError> {
        if raw & STEPS_MASK == UNKNOWN_STEPS {
            return Err(ValueError::ProhibitedTransitionTime(raw));
        }
        Ok(Self(raw))
    }

    /// Wraps a raw byte without validation.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Encodes a remaining time, picking the finest resolution that fits and
    /// truncating to whole steps.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_millis(millis: u32) -> Self {
        let resolution = if millis <= MAX_STEPS * 100 {
            Resolution::Millis100
        } else if millis <= MAX_STEPS * 1_000 {
            Resolution::Seconds1
        } else if millis <= MAX_STEPS * 10_000 {
            Resolution::Seconds10
        } else if millis <= MAX_STEPS * 600_000 {
            Resolution::Minutes10
        } else {
            return Self::UNKNOWN;
        };
        let steps = (millis / resolution.step_millis()) as u8;
        Self((resolution.bits() << 6) | steps)
    }

    /// Returns the raw byte.
    #[must_use]
    pub const fn raw(&self) -> u8 {
        self.0
    }

    /// Returns the number of steps.
    #[must_use]
    pub const fn steps(&self) -> u8 {
        self.0 & STEPS_MASK
    }

    /// Returns the step resolution.
    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        Resolution::from_bits(self.0 >> 6)
    }

    /// Returns `true` if the step count is the reserved unknown value.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.steps() == UNKNOWN_STEPS
    }

    /// Returns the duration in milliseconds, or `None` when unknown.
    #[must_use]
    pub const fn as_millis(&self) -> Option<u32> {
        if self.is_unknown() {
            return None;
        }
        Some(self.steps() as u32 * self.resolution().step_millis())
    }
}

impl fmt::Display for TransitionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_millis() {
            Some(ms) => write!(f, "{ms}ms"),
            None => write!(f, "unknown"),
        }
    }
}

/// Delay before a transition starts, in 5 millisecond units.
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
pub struct Delay(u8);

impl Delay {
    /// No delay.
    pub const NONE: Self = Self(0);

    /// Creates a delay of `units` × 5 ms.
    #[must_use]
    pub const fn new(units: u8) -> Self {
        Self(units)
    }

    /// Returns the raw 5 ms unit count.
    #[must_use]
    pub const fn units(&self) -> u8 {
        self.0
    }

    /// Returns the delay in milliseconds.
    #[must_use]
    pub const fn as_millis(&self) -> u32 {
        self.0 as u32 * 5
    }

    /// Returns `true` when no delay is requested.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }
}
