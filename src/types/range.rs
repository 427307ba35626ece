// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status codes answered to range Set requests.

/// Outcome of a range Set, reported in the range Status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RangeStatus {
    /// The range was stored.
    Success,
    /// The requested minimum is not supported.
    CannotSetRangeMin,
    /// The requested maximum is not supported.
    CannotSetRangeMax,
}

impl RangeStatus {
    /// Returns the wire status code.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Success => 0x00,
            Self::CannotSetRangeMin => 0x01,
            Self::CannotSetRangeMax => 0x02,
        }
    }

    /// Returns `true` for [`RangeStatus::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}
