// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generic Level Server.

use crate::message::{StatusMessage, Target};
use crate::state::StateChange;
use crate::types::{Level, TransitionTime};

use super::{instance_accessors, ModelInstance, ModelKind, ModelSnapshot, Server, ServerCore};

/// Velocity of a running Move Set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ramp {
    pub(crate) velocity: i32,
    pub(crate) interval_ms: u32,
}

impl Ramp {
    /// Derives the per-interval step of a move of `delta` per
    /// `transition_ms`, evaluated every `interval_ms`.
    ///
    /// Slow moves whose step rounds to zero advance by one unit at a
    /// stretched interval instead.
    pub(crate) fn new(delta: i16, transition_ms: u32, interval_ms: u32) -> Self {
        let delta = i32::from(delta);
        let transition = i64::from(transition_ms.max(1));
        let velocity = i64::from(delta) * i64::from(interval_ms) / transition;
        if velocity == 0 {
            let stretched = transition / i64::from(delta.unsigned_abs().max(1));
            return Self {
                velocity: delta.signum(),
                interval_ms: u32::try_from(stretched).unwrap_or(u32::MAX),
            };
        }
        Self {
            velocity: i32::try_from(velocity).unwrap_or(delta.signum() * i32::MAX),
            interval_ms,
        }
    }

    /// Level the move heads for.
    pub(crate) fn bound(&self) -> Level {
        if self.velocity < 0 {
            Level::MIN
        } else {
            Level::MAX
        }
    }
}

/// Generic Level Server.
#[derive(Debug)]
pub struct LevelServer {
    pub(crate) core: ServerCore<Level>,
    pub(crate) ramp: Option<Ramp>,
    pub(crate) delta_base: Level,
}

impl LevelServer {
    pub(crate) fn new(scene_capacity: usize) -> Self {
        Self {
            core: ServerCore::new(Level::ZERO, scene_capacity),
            ramp: None,
            delta_base: Level::ZERO,
        }
    }

    /// Returns the present level.
    #[must_use]
    pub fn present(&self) -> Level {
        self.core.present()
    }

    /// Returns the target level.
    #[must_use]
    pub fn target(&self) -> Level {
        self.core.target()
    }

    /// Returns `true` while a Move Set is running.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.ramp.is_some()
    }
}

impl Server for LevelServer {
    type Value = Level;

    const KIND: ModelKind = ModelKind::GenericLevel;

    instance_accessors!(Level);

    fn on_start(&mut self) {
        self.ramp = None;
    }

    fn change(&self) -> StateChange {
        StateChange::Level(self.present())
    }

    fn status(&self, tick_ms: u32) -> StatusMessage {
        let target = if self.ramp.is_some() {
            Some(Target::new(self.target(), TransitionTime::UNKNOWN))
        } else {
            self.core.target_status(tick_ms)
        };
        StatusMessage::Level {
            present: self.present(),
            target,
        }
    }

    fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot::Level {
            present: self.present(),
            target: self.target(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_velocity_scales_to_interval() {
        let ramp = Ramp::new(1000, 1000, 100);
        assert_eq!(ramp.velocity, 100);
        assert_eq!(ramp.interval_ms, 100);
        assert_eq!(ramp.bound(), Level::MAX);
    }

    #[test]
    fn slow_ramp_stretches_interval() {
        let ramp = Ramp::new(-4, 2000, 100);
        assert_eq!(ramp.velocity, -1);
        assert_eq!(ramp.interval_ms, 500);
        assert_eq!(ramp.bound(), Level::MIN);
    }

    #[test]
    fn moving_status_reports_unknown_remaining() {
        let mut server = LevelServer::new(1);
        server.ramp = Some(Ramp::new(100, 100, 100));
        server.core.transition.set_target(Level::MAX);
        let StatusMessage::Level { target, .. } = server.status(100) else {
            panic!("expected a level status");
        };
        assert_eq!(target, Some(Target::new(Level::MAX, TransitionTime::UNKNOWN)));
    }
}
