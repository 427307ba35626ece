// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generic OnOff Server.

use crate::message::StatusMessage;
use crate::state::StateChange;
use crate::types::OnOff;

use super::{instance_accessors, ModelInstance, ModelKind, ModelSnapshot, Server, ServerCore};

/// Generic OnOff Server.
///
/// A transition toward On switches the present state when it starts; a
/// transition toward Off switches it when it ends.
#[derive(Debug)]
pub struct OnOffServer {
    pub(crate) core: ServerCore<OnOff>,
}

impl OnOffServer {
    pub(crate) fn new(scene_capacity: usize) -> Self {
        Self {
            core: ServerCore::new(OnOff::Off, scene_capacity),
        }
    }

    /// Returns the present state.
    #[must_use]
    pub fn present(&self) -> OnOff {
        self.core.present()
    }

    /// Returns the target state.
    #[must_use]
    pub fn target(&self) -> OnOff {
        self.core.target()
    }
}

impl Server for OnOffServer {
    type Value = OnOff;

    const KIND: ModelKind = ModelKind::GenericOnOff;

    instance_accessors!(OnOff);

    fn starts_early(&self) -> bool {
        self.core.target().is_on() && !self.core.present().is_on()
    }

    fn change(&self) -> StateChange {
        StateChange::OnOff(self.present())
    }

    fn status(&self, tick_ms: u32) -> StatusMessage {
        StatusMessage::OnOff {
            present: self.present(),
            target: self.core.target_status(tick_ms),
        }
    }

    fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot::OnOff {
            present: self.present(),
            target: self.target(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UpdateSource;
    use crate::types::Delay;

    #[test]
    fn turning_on_starts_early() {
        let mut server = OnOffServer::new(1);
        server
            .core
            .transition
            .start(OnOff::On, 500, Delay::NONE, UpdateSource::Client, 100);
        assert!(server.starts_early());
    }

    #[test]
    fn turning_off_switches_late() {
        let mut server = OnOffServer::new(1);
        server.core.transition.set_present(OnOff::On);
        server
            .core
            .transition
            .start(OnOff::Off, 500, Delay::NONE, UpdateSource::Client, 100);
        assert!(!server.starts_early());
    }
}
