// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene number type.

use std::fmt;

use crate::error::ValueError;

/// External 16-bit scene number. Zero is prohibited.
///
/// # Examples
///
/// ```
/// use mesh_lighting::types::SceneNumber;
///
/// let scene = SceneNumber::new(7).unwrap();
/// assert_eq!(scene.value(), 7);
/// assert!(SceneNumber::new(0).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u16", into = "u16")]
pub struct SceneNumber(u16);

impl SceneNumber {
    /// Creates a scene number.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::ProhibitedSceneNumber` for 0.
    pub const fn new(value: u16) -> Result<Self, ValueError> {
        if value == 0 {
            return Err(ValueError::ProhibitedSceneNumber);
        }
        Ok(Self(value))
    }

    /// Returns the raw scene number.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for SceneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene {}", self.0)
    }
}

impl TryFrom<u16> for SceneNumber {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SceneNumber> for u16 {
    fn from(value: SceneNumber) -> Self {
        value.0
    }
}
