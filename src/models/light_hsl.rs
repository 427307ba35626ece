// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light HSL Server and its Hue and Saturation sub-elements.

use crate::message::StatusMessage;
use crate::state::StateChange;
use crate::types::{ElementId, HslRange, HslState, Hue, Level, OnOff, RangeStatus, Saturation};

use super::{
    instance_accessors, Link, ModelInstance, ModelKind, ModelSnapshot, Server, ServerCore,
};

/// Light HSL Server.
#[derive(Debug)]
pub struct HslServer {
    pub(crate) core: ServerCore<HslState>,
    pub(crate) default: HslState,
    pub(crate) range: HslRange,
    pub(crate) hue_element: Option<ElementId>,
    pub(crate) saturation_element: Option<ElementId>,
}

impl HslServer {
    pub(crate) fn new(scene_capacity: usize) -> Self {
        Self {
            core: ServerCore::new(HslState::default(), scene_capacity),
            default: HslState::default(),
            range: HslRange::FULL,
            hue_element: None,
            saturation_element: None,
        }
    }

    /// Returns the present state.
    #[must_use]
    pub fn present(&self) -> HslState {
        self.core.present()
    }

    /// Returns the target state.
    #[must_use]
    pub fn target(&self) -> HslState {
        self.core.target()
    }

    /// Returns the default state.
    #[must_use]
    pub fn default_state(&self) -> HslState {
        self.default
    }

    /// Returns the hue and saturation ranges.
    #[must_use]
    pub fn range(&self) -> HslRange {
        self.range
    }

    /// Returns the linked hue element.
    #[must_use]
    pub fn hue_element(&self) -> Option<ElementId> {
        self.hue_element
    }

    /// Returns the linked saturation element.
    #[must_use]
    pub fn saturation_element(&self) -> Option<ElementId> {
        self.saturation_element
    }

    pub(crate) fn mirror_hue(&mut self, present: Hue, target: Hue) {
        let resting = self.core.resting_target();
        self.core.overwrite(
            HslState {
                hue: present,
                ..self.present()
            },
            HslState {
                hue: target,
                ..resting
            },
        );
    }

    pub(crate) fn mirror_saturation(&mut self, present: Saturation, target: Saturation) {
        let resting = self.core.resting_target();
        self.core.overwrite(
            HslState {
                saturation: present,
                ..self.present()
            },
            HslState {
                saturation: target,
                ..resting
            },
        );
    }

    pub(crate) fn target_status(&self, tick_ms: u32) -> StatusMessage {
        StatusMessage::HslTarget {
            target: self.target(),
            remaining: self.core.remaining(tick_ms),
        }
    }

    pub(crate) fn range_status(&self, status: RangeStatus) -> StatusMessage {
        StatusMessage::HslRange {
            status,
            range: self.range,
        }
    }
}

impl Server for HslServer {
    type Value = HslState;

    const KIND: ModelKind = ModelKind::LightHsl;

    instance_accessors!(Hsl);

    fn clamp(&self, value: HslState) -> HslState {
        HslState {
            hue: self.range.clamp_hue(value.hue),
            saturation: self.range.clamp_saturation(value.saturation),
            ..value
        }
    }

    fn change(&self) -> StateChange {
        StateChange::Hsl(self.present())
    }

    fn status(&self, tick_ms: u32) -> StatusMessage {
        StatusMessage::Hsl {
            present: self.present(),
            remaining: self.core.remaining(tick_ms),
        }
    }

    fn links(&self) -> Vec<Link> {
        let (present, target) = (self.present(), self.target());
        let hue = self.hue_element.map(|element| Link::HslToHue {
            element,
            present: present.hue,
            target: target.hue,
        });
        let saturation = self
            .saturation_element
            .map(|element| Link::HslToSaturation {
                element,
                present: present.saturation,
                target: target.saturation,
            });
        hue.into_iter().chain(saturation).collect()
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
        ModelSnapshot::Hsl {
            present: self.present(),
            target: self.target(),
            default: self.default,
            range: self.range,
        }
    }
}

/// Light HSL Hue Server.
#[derive(Debug)]
pub struct HueServer {
    pub(crate) core: ServerCore<Hue>,
    pub(crate) range: HslRange,
    pub(crate) main_element: Option<ElementId>,
}

impl HueServer {
    pub(crate) fn new(scene_capacity: usize) -> Self {
        Self {
            core: ServerCore::new(Hue::new(0), scene_capacity),
            range: HslRange::FULL,
            main_element: None,
        }
    }

    /// Returns the present hue.
    #[must_use]
    pub fn present(&self) -> Hue {
        self.core.present()
    }

    /// Returns the target hue.
    #[must_use]
    pub fn target(&self) -> Hue {
        self.core.target()
    }

    /// Returns the linked main element.
    #[must_use]
    pub fn main_element(&self) -> Option<ElementId> {
        self.main_element
    }

    pub(crate) fn mirror(&mut self, present: Hue, target: Hue) {
        self.core.overwrite(present, target);
    }
}

impl Server for HueServer {
    type Value = Hue;

    const KIND: ModelKind = ModelKind::LightHslHue;

    instance_accessors!(Hue);

    fn clamp(&self, value: Hue) -> Hue {
        self.range.clamp_hue(value)
    }

    fn change(&self) -> StateChange {
        StateChange::Hue(self.present())
    }

    fn status(&self, tick_ms: u32) -> StatusMessage {
        StatusMessage::HslHue {
            present: self.present(),
            target: self.core.target_status(tick_ms),
        }
    }

    fn links(&self) -> Vec<Link> {
        self.main_element
            .map(|element| Link::HueToHsl {
                element,
                present: self.present(),
                target: self.target(),
            })
            .into_iter()
            .collect()
    }

    fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot::Hue {
            present: self.present(),
            target: self.target(),
        }
    }
}

/// Light HSL Saturation Server.
#[derive(Debug)]
pub struct SaturationServer {
    pub(crate) core: ServerCore<Saturation>,
    pub(crate) range: HslRange,
    pub(crate) main_element: Option<ElementId>,
}

impl SaturationServer {
    pub(crate) fn new(scene_capacity: usize) -> Self {
        Self {
            core: ServerCore::new(Saturation::new(0), scene_capacity),
            range: HslRange::FULL,
            main_element: None,
        }
    }

    /// Returns the present saturation.
    #[must_use]
    pub fn present(&self) -> Saturation {
        self.core.present()
    }

    /// Returns the target saturation.
    #[must_use]
    pub fn target(&self) -> Saturation {
        self.core.target()
    }

    /// Returns the linked main element.
    #[must_use]
    pub fn main_element(&self) -> Option<ElementId> {
        self.main_element
    }

    pub(crate) fn mirror(&mut self, present: Saturation, target: Saturation) {
        self.core.overwrite(present, target);
    }
}

impl Server for SaturationServer {
    type Value = Saturation;

    const KIND: ModelKind = ModelKind::LightHslSaturation;

    instance_accessors!(Saturation);

    fn clamp(&self, value: Saturation) -> Saturation {
        self.range.clamp_saturation(value)
    }

    fn change(&self) -> StateChange {
        StateChange::Saturation(self.present())
    }

    fn status(&self, tick_ms: u32) -> StatusMessage {
        StatusMessage::HslSaturation {
            present: self.present(),
            target: self.core.target_status(tick_ms),
        }
    }

    fn links(&self) -> Vec<Link> {
        self.main_element
            .map(|element| Link::SaturationToHsl {
                element,
                present: self.present(),
                target: self.target(),
            })
            .into_iter()
            .collect()
    }

    fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot::Saturation {
            present: self.present(),
            target: self.target(),
        }
    }
}
