// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generic OnOff state.

use std::fmt;

use crate::error::ValueError;

/// Binary Generic OnOff state.
///
/// # Examples
///
/// ```
/// use mesh_lighting::types::OnOff;
///
/// assert_eq!(OnOff::from(true), OnOff::On);
/// assert!(OnOff::On.is_on());
/// assert_eq!(OnOff::try_from(0u8).unwrap(), OnOff::Off);
/// assert!(OnOff::try_from(2u8).is_err());
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
pub enum OnOff {
    /// Off (0x00).
    #[default]
    Off,
    /// On (0x01).
    On,
}

impl OnOff {
    /// Returns `true` for [`OnOff::On`].
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Returns the wire value.
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }
}

impl fmt::Display for OnOff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "OFF"),
            Self::On => write!(f, "ON"),
        }
    }
}

impl From<bool> for OnOff {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl TryFrom<u8> for OnOff {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::On),
            other => Err(ValueError::OutOfRange {
                min: 0,
                max: 1,
                actual: i32::from(other),
            }),
        }
    }
}
