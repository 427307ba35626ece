// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light Lightness Server.
//!
//! The server transitions the actual lightness. Linear lightness is derived
//! from it on demand, and the last non-zero actual value is remembered so
//! that switching on restores it when no default is configured.

use crate::message::StatusMessage;
use crate::state::StateChange;
use crate::types::{Lightness, LightnessRange, RangeStatus};

use super::{instance_accessors, ModelInstance, ModelKind, ModelSnapshot, Server, ServerCore};

/// Light Lightness Server.
#[derive(Debug)]
pub struct LightnessServer {
    pub(crate) core: ServerCore<Lightness>,
    pub(crate) last: Lightness,
    pub(crate) default: Lightness,
    pub(crate) range: LightnessRange,
}

impl LightnessServer {
    pub(crate) fn new(scene_capacity: usize) -> Self {
        Self {
            core: ServerCore::new(Lightness::MIN, scene_capacity),
            last: Lightness::MAX,
            default: Lightness::MIN,
            range: LightnessRange::FULL,
        }
    }

    /// Returns the present actual lightness.
    #[must_use]
    pub fn present(&self) -> Lightness {
        self.core.present()
    }

    /// Returns the target actual lightness.
    #[must_use]
    pub fn target(&self) -> Lightness {
        self.core.target()
    }

    /// Returns the present linear lightness.
    #[must_use]
    pub fn linear(&self) -> u16 {
        self.present().to_linear()
    }

    /// Returns the last non-zero lightness.
    #[must_use]
    pub fn last(&self) -> Lightness {
        self.last
    }

    /// Returns the default lightness. Zero means "use the last value".
    #[must_use]
    pub fn default_lightness(&self) -> Lightness {
        self.default
    }

    /// Returns the lightness range.
    #[must_use]
    pub fn range(&self) -> LightnessRange {
        self.range
    }

    /// Lightness to restore when switching on.
    #[must_use]
    pub fn on_level(&self) -> Lightness {
        if self.default.is_on() {
            self.default
        } else {
            self.last
        }
    }

    pub(crate) fn linear_status(&self, tick_ms: u32) -> StatusMessage {
        StatusMessage::LightnessLinear {
            present: self.linear(),
            target: self
                .core
                .target_status(tick_ms)
                .map(|target| target.map(|value| value.to_linear())),
        }
    }

    pub(crate) fn range_status(&self, status: RangeStatus) -> StatusMessage {
        StatusMessage::LightnessRange {
            status,
            range: self.range,
        }
    }
}

impl Server for LightnessServer {
    type Value = Lightness;

    const KIND: ModelKind = ModelKind::LightLightness;

    instance_accessors!(Lightness);

    fn clamp(&self, value: Lightness) -> Lightness {
        self.range.clamp(value)
    }

    fn present_written(&mut self) {
        let present = self.present();
        if present.is_on() {
            self.last = present;
        }
    }

    fn change(&self) -> StateChange {
        StateChange::Lightness(self.present())
    }

    fn status(&self, tick_ms: u32) -> StatusMessage {
        StatusMessage::Lightness {
            present: self.present(),
            target: self.core.target_status(tick_ms),
        }
    }

    fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot::Lightness {
            present: self.present(),
            target: self.target(),
            last: self.last,
            default: self.default,
            range: self.range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_tracks_non_zero_values() {
        let mut server = LightnessServer::new(1);
        server.core.transition.set_present(Lightness::new(1234));
        server.present_written();
        server.core.transition.set_present(Lightness::MIN);
        server.present_written();
        assert_eq!(server.last(), Lightness::new(1234));
    }

    #[test]
    fn on_level_prefers_default() {
        let mut server = LightnessServer::new(1);
        server.last = Lightness::new(10);
        assert_eq!(server.on_level(), Lightness::new(10));
        server.default = Lightness::new(20);
        assert_eq!(server.on_level(), Lightness::new(20));
    }

    #[test]
    fn clamp_uses_range() {
        let mut server = LightnessServer::new(1);
        server.range = LightnessRange::new(Lightness::new(100), Lightness::new(200)).unwrap();
        assert_eq!(server.clamp(Lightness::new(50)), Lightness::new(100));
        assert_eq!(server.clamp(Lightness::MIN), Lightness::MIN);
    }
}
