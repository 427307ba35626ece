// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element identifiers and mesh addresses.

use std::fmt;

/// Transaction identifier carried by Set requests.
pub type TransactionId = u8;

/// Index of an element within the node.
///
/// # Examples
///
/// ```
/// use mesh_lighting::types::ElementId;
///
/// let primary = ElementId::PRIMARY;
/// assert_eq!(primary.value(), 0);
/// assert_eq!(ElementId::new(2).to_string(), "2");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ElementId(u8);

impl ElementId {
    /// The primary element.
    pub const PRIMARY: Self = Self(0);

    /// Creates an element identifier.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Returns the raw element index.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for ElementId {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

/// A 16-bit mesh address.
///
/// The unassigned address never matches a real source, which is what the
/// transaction deduplicator relies on after its window expires.
///
/// # Examples
///
/// ```
/// use mesh_lighting::types::Address;
///
/// assert!(Address::new(0x0001).is_unicast());
/// assert!(!Address::UNASSIGNED.is_unicast());
/// assert!(!Address::new(0xC000).is_unicast());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Address(u16);

impl Address {
    /// The unassigned address.
    pub const UNASSIGNED: Self = Self(0x0000);

    /// Creates an address.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Returns the raw address.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Returns `true` for addresses in the unicast range.
    #[must_use]
    pub const fn is_unicast(&self) -> bool {
        self.0 != 0 && self.0 & 0x8000 == 0
    }

    /// Returns `true` for the unassigned address.
    #[must_use]
    pub const fn is_unassigned(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

impl From<u16> for Address {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_classification() {
        assert!(Address::new(0x7FFF).is_unicast());
        assert!(!Address::new(0x8000).is_unicast());
        assert!(Address::UNASSIGNED.is_unassigned());
    }

    #[test]
    fn address_display() {
        assert_eq!(Address::new(0x12).to_string(), "0x0012");
    }

    #[test]
    fn element_ordering() {
        assert!(ElementId::PRIMARY < ElementId::new(1));
    }
}
