// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-model scene values.

/// Scene values of one model instance, indexed by register slot.
#[derive(Debug, Clone)]
pub struct SceneSlots<V> {
    values: Vec<Option<V>>,
}

impl<V: Copy> SceneSlots<V> {
    /// Creates `capacity` empty slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            values: vec![None; capacity],
        }
    }

    /// Stores `value` in `slot`. Out-of-range slots are ignored.
    pub fn store(&mut self, slot: usize, value: V) {
        if let Some(entry) = self.values.get_mut(slot) {
            *entry = Some(value);
        }
    }

    /// Returns the value stored in `slot`.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<V> {
        self.values.get(slot).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_and_get() {
        let mut slots = SceneSlots::new(2);
        slots.store(1, 42_u16);
        assert_eq!(slots.get(0), None);
        assert_eq!(slots.get(1), Some(42));
        slots.store(7, 1);
        assert_eq!(slots.get(7), None);
    }
}
