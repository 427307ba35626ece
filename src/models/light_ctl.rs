// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light CTL Server and its Temperature sub-element.
//!
//! The main instance owns lightness, temperature and delta UV. The
//! temperature instance on the sub-element holds a copy of the temperature
//! half; the two are kept in step by silent writes in both directions.

use crate::message::StatusMessage;
use crate::state::StateChange;
use crate::types::{
    CtlState, ElementId, Level, OnOff, RangeStatus, TemperatureRange, TemperatureState,
};

use super::{
    instance_accessors, Link, ModelInstance, ModelKind, ModelSnapshot, Server, ServerCore,
};

/// Light CTL Server.
#[derive(Debug)]
pub struct CtlServer {
    pub(crate) core: ServerCore<CtlState>,
    pub(crate) default: CtlState,
    pub(crate) range: TemperatureRange,
    pub(crate) temperature_element: Option<ElementId>,
}

impl CtlServer {
    pub(crate) fn new(scene_capacity: usize) -> Self {
        Self {
            core: ServerCore::new(CtlState::default(), scene_capacity),
            default: CtlState::default(),
            range: TemperatureRange::FULL,
            temperature_element: None,
        }
    }

    /// Returns the present state.
    #[must_use]
    pub fn present(&self) -> CtlState {
        self.core.present()
    }

    /// Returns the target state.
    #[must_use]
    pub fn target(&self) -> CtlState {
        self.core.target()
    }

    /// Returns the default state.
    #[must_use]
    pub fn default_state(&self) -> CtlState {
        self.default
    }

    /// Returns the temperature range.
    #[must_use]
    pub fn range(&self) -> TemperatureRange {
        self.range
    }

    /// Returns the linked temperature element.
    #[must_use]
    pub fn temperature_element(&self) -> Option<ElementId> {
        self.temperature_element
    }

    pub(crate) fn mirror_temperature(
        &mut self,
        present: TemperatureState,
        target: TemperatureState,
    ) {
        let present = self.present().with_temperature_state(present);
        let target = self.core.resting_target().with_temperature_state(target);
        self.core.overwrite(present, target);
    }

    pub(crate) fn range_status(&self, status: RangeStatus) -> StatusMessage {
        StatusMessage::CtlTemperatureRange {
            status,
            range: self.range,
        }
    }
}

impl Server for CtlServer {
    type Value = CtlState;

    const KIND: ModelKind = ModelKind::LightCtl;

    instance_accessors!(Ctl);

    fn clamp(&self, value: CtlState) -> CtlState {
        CtlState {
            temperature: self.range.clamp(value.temperature.value()),
            ..value
        }
    }

    fn change(&self) -> StateChange {
        StateChange::Ctl(self.present())
    }

    fn status(&self, tick_ms: u32) -> StatusMessage {
        StatusMessage::Ctl {
            present: self.present(),
            target: self.core.target_status(tick_ms),
        }
    }

    fn links(&self) -> Vec<Link> {
        self.temperature_element
            .map(|element| Link::CtlToTemperature {
                element,
                present: self.present().temperature_state(),
                target: self.target().temperature_state(),
            })
            .into_iter()
            .collect()
    }

    fn extends(&self) -> Vec<StateChange> {
        let lightness = self.present().lightness;
        vec![
            StateChange::Lightness(lightness),
            StateChange::OnOff(OnOff::from(lightness.is_on())),
            StateChange::Level(Level::from_lightness(lightness)),
        ]
    }

    fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot::Ctl {
            present: self.present(),
            target: self.target(),
            default: self.default,
            range: self.range,
        }
    }
}

/// Light CTL Temperature Server.
#[derive(Debug)]
pub struct CtlTemperatureServer {
    pub(crate) core: ServerCore<TemperatureState>,
    pub(crate) range: TemperatureRange,
    pub(crate) main_element: Option<ElementId>,
}

impl CtlTemperatureServer {
    pub(crate) fn new(scene_capacity: usize) -> Self {
        Self {
            core: ServerCore::new(TemperatureState::default(), scene_capacity),
            range: TemperatureRange::FULL,
            main_element: None,
        }
    }

    /// Returns the present state.
    #[must_use]
    pub fn present(&self) -> TemperatureState {
        self.core.present()
    }

    /// Returns the target state.
    #[must_use]
    pub fn target(&self) -> TemperatureState {
        self.core.target()
    }

    /// Returns the temperature range shared with the main instance.
    #[must_use]
    pub fn range(&self) -> TemperatureRange {
        self.range
    }

    /// Returns the linked main element.
    #[must_use]
    pub fn main_element(&self) -> Option<ElementId> {
        self.main_element
    }

    pub(crate) fn mirror(&mut self, present: TemperatureState, target: TemperatureState) {
        self.core.overwrite(present, target);
    }
}

impl Server for CtlTemperatureServer {
    type Value = TemperatureState;

    const KIND: ModelKind = ModelKind::LightCtlTemperature;

    instance_accessors!(CtlTemperature);

    fn clamp(&self, value: TemperatureState) -> TemperatureState {
        TemperatureState {
            temperature: self.range.clamp(value.temperature.value()),
            ..value
        }
    }

    fn change(&self) -> StateChange {
        StateChange::CtlTemperature(self.present())
    }

    fn status(&self, tick_ms: u32) -> StatusMessage {
        StatusMessage::CtlTemperature {
            present: self.present(),
            target: self.core.target_status(tick_ms),
        }
    }

    fn links(&self) -> Vec<Link> {
        self.main_element
            .map(|element| Link::TemperatureToCtl {
                element,
                present: self.present(),
                target: self.target(),
            })
            .into_iter()
            .collect()
    }

    fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot::CtlTemperature {
            present: self.present(),
            target: self.target(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeltaUv, Lightness, Temperature};

    fn narrow() -> TemperatureRange {
        TemperatureRange::new(
            Temperature::new(2000).unwrap(),
            Temperature::new(6000).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn ctl_clamps_temperature_only() {
        let mut server = CtlServer::new(1);
        server.range = narrow();
        let requested = CtlState::new(
            Lightness::new(5),
            Temperature::new(10_000).unwrap(),
            DeltaUv::new(-3),
        );
        let clamped = server.clamp(requested);
        assert_eq!(clamped.temperature.value(), 6000);
        assert_eq!(clamped.lightness, Lightness::new(5));
        assert_eq!(clamped.delta_uv, DeltaUv::new(-3));
    }

    #[test]
    fn ctl_extends_same_element_states() {
        let mut server = CtlServer::new(1);
        server.core.transition.set_present(CtlState::new(
            Lightness::new(0x8000),
            Temperature::MIN,
            DeltaUv::new(0),
        ));
        assert_eq!(
            server.extends(),
            vec![
                StateChange::Lightness(Lightness::new(0x8000)),
                StateChange::OnOff(OnOff::On),
                StateChange::Level(Level::ZERO),
            ]
        );
    }

    #[test]
    fn ctl_links_only_when_paired() {
        let mut server = CtlServer::new(1);
        assert!(server.links().is_empty());
        server.temperature_element = Some(ElementId::new(1));
        assert_eq!(server.links().len(), 1);
    }

    #[test]
    fn temperature_links_back_to_main() {
        let mut server = CtlTemperatureServer::new(1);
        assert!(server.links().is_empty());
        server.main_element = Some(ElementId::PRIMARY);
        assert_eq!(server.links().len(), 1);
    }

    #[test]
    fn mirror_keeps_lightness() {
        let mut server = CtlServer::new(1);
        server
            .core
            .transition
            .set_present(CtlState::new(Lightness::new(7), Temperature::MIN, DeltaUv::new(0)));
        let warm = TemperatureState::new(Temperature::new(3000).unwrap(), DeltaUv::new(1));
        server.mirror_temperature(warm, warm);
        assert_eq!(server.present().lightness, Lightness::new(7));
        assert_eq!(server.present().temperature_state(), warm);
    }
}
