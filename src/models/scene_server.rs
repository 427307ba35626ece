// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene Server.

use crate::message::{StatusMessage, Target};
use crate::scene::{SceneRegister, SceneStatusCode};
use crate::timer::TimerHandle;
use crate::types::{SceneNumber, TransitionTime};

use super::{ModelSnapshot, Transactions};

/// A recall waiting for its delay or its transition to finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingRecall {
    pub(crate) number: SceneNumber,
    pub(crate) slot: usize,
    pub(crate) transition_ms: u32,
    pub(crate) delayed: bool,
}

/// Scene Server.
#[derive(Debug)]
pub struct SceneServer {
    pub(crate) register: SceneRegister,
    pub(crate) txn: Transactions,
    pub(crate) pending: Option<PendingRecall>,
    pub(crate) timer: Option<TimerHandle>,
}

impl SceneServer {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            register: SceneRegister::new(capacity),
            txn: Transactions::default(),
            pending: None,
            timer: None,
        }
    }

    /// Returns the scene register.
    #[must_use]
    pub fn register(&self) -> &SceneRegister {
        &self.register
    }

    /// Returns the current scene.
    #[must_use]
    pub fn current(&self) -> Option<SceneNumber> {
        self.register.current()
    }

    /// Returns `true` while a recall is in progress.
    #[must_use]
    pub fn is_recalling(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops any recall in progress.
    pub(crate) fn cancel_recall(&mut self) {
        self.pending = None;
        self.timer = None;
    }

    fn remaining(&self) -> Option<TransitionTime> {
        let pending = self.pending?;
        let armed = self.timer.as_ref().map_or(0, TimerHandle::remaining_ms);
        let after = if pending.delayed {
            pending.transition_ms
        } else {
            0
        };
        Some(TransitionTime::from_millis(armed.saturating_add(after)))
    }

    pub(crate) fn status(&self, status: SceneStatusCode) -> StatusMessage {
        let target = self
            .register
            .target()
            .zip(self.remaining())
            .map(|(number, remaining)| Target::new(number, remaining));
        StatusMessage::Scene {
            status,
            current: self.register.current(),
            target,
        }
    }

    pub(crate) fn register_status(&self, status: SceneStatusCode) -> StatusMessage {
        StatusMessage::SceneRegister {
            status,
            current: self.register.current(),
            scenes: self.register.scenes(),
        }
    }

    /// Returns the persistent state.
    #[must_use]
    pub fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot::Scene {
            current: self.register.current(),
            scenes: self.register.scenes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_status_has_no_target() {
        let mut server = SceneServer::new(2);
        server.register.store(SceneNumber::new(4).unwrap()).unwrap();
        assert_eq!(
            server.status(SceneStatusCode::Success),
            StatusMessage::Scene {
                status: SceneStatusCode::Success,
                current: SceneNumber::new(4).ok(),
                target: None,
            }
        );
    }

    #[test]
    fn register_status_lists_scenes() {
        let mut server = SceneServer::new(2);
        server.register.store(SceneNumber::new(1).unwrap()).unwrap();
        server.register.store(SceneNumber::new(2).unwrap()).unwrap();
        let StatusMessage::SceneRegister { scenes, .. } =
            server.register_status(SceneStatusCode::Success)
        else {
            panic!("expected a register status");
        };
        assert_eq!(scenes.len(), 2);
    }

    #[test]
    fn delayed_recall_counts_transition() {
        let mut server = SceneServer::new(1);
        let number = SceneNumber::new(1).unwrap();
        server.register.store(number).unwrap();
        server.register.begin_recall(number);
        server.pending = Some(PendingRecall {
            number,
            slot: 0,
            transition_ms: 1_000,
            delayed: true,
        });
        let StatusMessage::Scene { target, .. } = server.status(SceneStatusCode::Success) else {
            panic!("expected a scene status");
        };
        assert_eq!(
            target,
            Some(Target::new(number, TransitionTime::from_millis(1_000)))
        );
    }
}
