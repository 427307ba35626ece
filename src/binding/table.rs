// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounded bind table.

use std::collections::HashSet;

use crate::error::BindError;
use crate::state::StateKind;
use crate::types::ElementId;

use super::Resolver;

/// One directed edge of the binding graph.
#[derive(Debug, Clone)]
pub struct BindEntry {
    /// State whose change is propagated.
    pub src_kind: StateKind,
    /// Element hosting the source state.
    pub src: ElementId,
    /// State that receives the propagated value.
    pub tgt_kind: StateKind,
    /// Element hosting the target state.
    pub tgt: ElementId,
    /// Computes the target value.
    pub resolver: Resolver,
}

impl BindEntry {
    fn source_node(&self) -> Node {
        (self.src, self.src_kind)
    }

    fn target_node(&self) -> Node {
        (self.tgt, self.tgt_kind)
    }
}

type Node = (ElementId, StateKind);

/// Declared bindings, in declaration order.
#[derive(Debug, Clone)]
pub struct BindTable {
    entries: Vec<BindEntry>,
    capacity: usize,
}

impl BindTable {
    /// Creates an empty table holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the maximum number of entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no binding is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declares an edge. Returns `Ok(false)` if the same edge already exists.
    ///
    /// A pair of opposite edges between two states is allowed; propagation
    /// stops after one hop. Longer loops are refused.
    ///
    /// # Errors
    ///
    /// Returns `BindError::TableFull` when the table is at capacity and
    /// `BindError::Cycle` when the edge would close a loop through three or
    /// more states, or bind a state to itself.
    pub fn add(&mut self, entry: BindEntry) -> Result<bool, BindError> {
        if self.contains(&entry) {
            return Ok(false);
        }
        if self.entries.len() >= self.capacity {
            return Err(BindError::TableFull {
                capacity: self.capacity,
            });
        }
        if self.closes_cycle(entry.source_node(), entry.target_node()) {
            return Err(BindError::Cycle {
                src_kind: entry.src_kind,
                src: entry.src,
                tgt_kind: entry.tgt_kind,
                tgt: entry.tgt,
            });
        }
        self.entries.push(entry);
        Ok(true)
    }

    /// Returns the edges leaving `kind` on `element`.
    pub fn matching(&self, element: ElementId, kind: StateKind) -> impl Iterator<Item = &BindEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.src == element && entry.src_kind == kind)
    }

    /// Returns every declared edge.
    pub fn iter(&self) -> impl Iterator<Item = &BindEntry> {
        self.entries.iter()
    }

    fn contains(&self, entry: &BindEntry) -> bool {
        self.entries.iter().any(|existing| {
            existing.source_node() == entry.source_node()
                && existing.target_node() == entry.target_node()
        })
    }

    fn successors(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        self.entries
            .iter()
            .filter(move |entry| entry.source_node() == node)
            .map(BindEntry::target_node)
    }

    /// A new edge `src -> tgt` closes a long cycle when `src` is reachable
    /// from `tgt` through at least one other state.
    fn closes_cycle(&self, src: Node, tgt: Node) -> bool {
        if src == tgt {
            return true;
        }
        let mut visited: HashSet<Node> = HashSet::from([src, tgt]);
        let mut stack: Vec<Node> = self
            .successors(tgt)
            .filter(|node| *node != src)
            .collect();
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            for next in self.successors(node) {
                if next == src {
                    return true;
                }
                if !visited.contains(&next) {
                    stack.push(next);
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Conversion;

    fn edge(src: u8, src_kind: StateKind, tgt: u8, tgt_kind: StateKind) -> BindEntry {
        BindEntry {
            src_kind,
            src: ElementId::new(src),
            tgt_kind,
            tgt: ElementId::new(tgt),
            resolver: Resolver::custom(|_, change| Some(*change)),
        }
    }

    use StateKind::{GenericLevel, GenericOnOff, LightLightnessActual};

    #[test]
    fn duplicate_is_ignored() {
        let mut table = BindTable::new(4);
        assert_eq!(table.add(edge(0, GenericLevel, 1, GenericLevel)), Ok(true));
        assert_eq!(table.add(edge(0, GenericLevel, 1, GenericLevel)), Ok(false));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn full_table_rejects() {
        let mut table = BindTable::new(1);
        table.add(edge(0, GenericLevel, 1, GenericLevel)).unwrap();
        assert_eq!(
            table.add(edge(0, GenericLevel, 2, GenericLevel)),
            Err(BindError::TableFull { capacity: 1 })
        );
    }

    #[test]
    fn mutual_pair_allowed() {
        let mut table = BindTable::new(4);
        table
            .add(edge(0, LightLightnessActual, 0, GenericLevel))
            .unwrap();
        assert_eq!(
            table.add(edge(0, GenericLevel, 0, LightLightnessActual)),
            Ok(true)
        );
    }

    #[test]
    fn three_state_loop_rejected() {
        let mut table = BindTable::new(4);
        table
            .add(edge(0, LightLightnessActual, 0, GenericLevel))
            .unwrap();
        table.add(edge(0, GenericLevel, 0, GenericOnOff)).unwrap();
        assert!(matches!(
            table.add(edge(0, GenericOnOff, 0, LightLightnessActual)),
            Err(BindError::Cycle { .. })
        ));
    }

    #[test]
    fn self_binding_rejected() {
        let mut table = BindTable::new(4);
        assert!(matches!(
            table.add(edge(0, GenericLevel, 0, GenericLevel)),
            Err(BindError::Cycle { .. })
        ));
    }

    #[test]
    fn standard_lightness_graph_is_accepted() {
        let mut table = BindTable::new(8);
        for conversion in [
            Conversion::LightnessToOnOff,
            Conversion::OnOffToLightness,
            Conversion::LightnessToLevel,
            Conversion::LevelToLightness,
            Conversion::LightnessToCtl,
            Conversion::OnOffToCtl,
            Conversion::LevelToCtl,
        ] {
            let (src_kind, tgt_kind) = conversion.kinds();
            let entry = BindEntry {
                src_kind,
                src: ElementId::PRIMARY,
                tgt_kind,
                tgt: ElementId::PRIMARY,
                resolver: conversion.into(),
            };
            assert_eq!(table.add(entry), Ok(true), "{conversion:?}");
        }
    }

    #[test]
    fn matching_filters_by_source() {
        let mut table = BindTable::new(4);
        table.add(edge(0, GenericLevel, 1, GenericLevel)).unwrap();
        table.add(edge(1, GenericLevel, 2, GenericLevel)).unwrap();
        assert_eq!(table.matching(ElementId::new(1), GenericLevel).count(), 1);
        assert_eq!(table.matching(ElementId::new(0), GenericOnOff).count(), 0);
    }
}
