// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene number to slot mapping.

use std::fmt;

use crate::types::SceneNumber;

/// Status code carried by scene status messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SceneStatusCode {
    /// The operation succeeded.
    Success,
    /// Every slot is taken by another scene.
    RegisterFull,
    /// The scene number is not stored.
    NotFound,
}

impl SceneStatusCode {
    /// Returns the on-air status code.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Success => 0x00,
            Self::RegisterFull => 0x01,
            Self::NotFound => 0x02,
        }
    }
}

impl fmt::Display for SceneStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::RegisterFull => write!(f, "register full"),
            Self::NotFound => write!(f, "not found"),
        }
    }
}

/// Fixed-capacity scene register of one scene server.
#[derive(Debug, Clone)]
pub struct SceneRegister {
    slots: Vec<Option<SceneNumber>>,
    current: Option<SceneNumber>,
    target: Option<SceneNumber>,
}

impl SceneRegister {
    /// Creates an empty register with `capacity` slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            current: None,
            target: None,
        }
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the slot holding `number`.
    #[must_use]
    pub fn find(&self, number: SceneNumber) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == Some(number))
    }

    /// Stores `number`, reusing its slot if present, and makes it current.
    ///
    /// # Errors
    ///
    /// Returns `SceneStatusCode::RegisterFull` when `number` is new and no
    /// slot is free.
    pub fn store(&mut self, number: SceneNumber) -> Result<usize, SceneStatusCode> {
        let slot = match self.find(number) {
            Some(slot) => slot,
            None => {
                let free = self
                    .slots
                    .iter()
                    .position(Option::is_none)
                    .ok_or(SceneStatusCode::RegisterFull)?;
                self.slots[free] = Some(number);
                free
            }
        };
        self.current = Some(number);
        Ok(slot)
    }

    /// Frees the slot of `number`.
    ///
    /// A deleted scene is no longer current, and an in-flight recall of it
    /// loses its target.
    ///
    /// # Errors
    ///
    /// Returns `SceneStatusCode::NotFound` when `number` is not stored.
    pub fn delete(&mut self, number: SceneNumber) -> Result<usize, SceneStatusCode> {
        let slot = self.find(number).ok_or(SceneStatusCode::NotFound)?;
        self.slots[slot] = None;
        if self.current == Some(number) {
            self.current = None;
        }
        if self.target == Some(number) {
            self.target = None;
        }
        Ok(slot)
    }

    /// Returns the stored scene numbers in slot order.
    #[must_use]
    pub fn scenes(&self) -> Vec<SceneNumber> {
        self.slots.iter().flatten().copied().collect()
    }

    /// Returns the scene the node state was last stored to or recalled from.
    #[must_use]
    pub fn current(&self) -> Option<SceneNumber> {
        self.current
    }

    /// Returns the scene being recalled.
    #[must_use]
    pub fn target(&self) -> Option<SceneNumber> {
        self.target
    }

    /// Marks `number` as being recalled.
    pub fn begin_recall(&mut self, number: SceneNumber) {
        self.current = None;
        self.target = Some(number);
    }

    /// Completes the recall in progress, if any.
    pub fn finish_recall(&mut self) -> Option<SceneNumber> {
        let number = self.target.take()?;
        self.current = Some(number);
        Some(number)
    }

    /// Records that node state was changed outside of a scene.
    pub fn invalidate_current(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(n: u16) -> SceneNumber {
        SceneNumber::new(n).unwrap()
    }

    #[test]
    fn store_reuses_slot() {
        let mut register = SceneRegister::new(2);
        assert_eq!(register.store(scene(5)), Ok(0));
        assert_eq!(register.store(scene(6)), Ok(1));
        assert_eq!(register.store(scene(5)), Ok(0));
        assert_eq!(register.scenes(), vec![scene(5), scene(6)]);
    }

    #[test]
    fn delete_frees_slot() {
        let mut register = SceneRegister::new(1);
        register.store(scene(5)).unwrap();
        assert_eq!(register.delete(scene(5)), Ok(0));
        assert_eq!(register.current(), None);
        assert_eq!(register.store(scene(9)), Ok(0));
    }

    #[test]
    fn delete_cancels_recall_target() {
        let mut register = SceneRegister::new(2);
        register.store(scene(1)).unwrap();
        register.begin_recall(scene(1));
        register.delete(scene(1)).unwrap();
        assert_eq!(register.target(), None);
        assert_eq!(register.finish_recall(), None);
    }

    #[test]
    fn recall_moves_target_to_current() {
        let mut register = SceneRegister::new(2);
        register.store(scene(3)).unwrap();
        register.begin_recall(scene(3));
        assert_eq!(register.current(), None);
        assert_eq!(register.finish_recall(), Some(scene(3)));
        assert_eq!(register.current(), Some(scene(3)));
    }

    #[test]
    fn status_codes() {
        assert_eq!(SceneStatusCode::Success.code(), 0);
        assert_eq!(SceneStatusCode::RegisterFull.code(), 1);
        assert_eq!(SceneStatusCode::NotFound.code(), 2);
    }
}
