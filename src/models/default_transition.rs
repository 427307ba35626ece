// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generic Default Transition Time Server.

use crate::message::StatusMessage;
use crate::types::TransitionTime;

use super::ModelSnapshot;

/// Transition time used by set requests that carry no transition fields.
#[derive(Debug, Default)]
pub struct DefaultTransitionServer {
    time: TransitionTime,
}

impl DefaultTransitionServer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the default transition time.
    #[must_use]
    pub fn time(&self) -> TransitionTime {
        self.time
    }

    /// Returns the default transition time in milliseconds.
    #[must_use]
    pub fn millis(&self) -> u32 {
        self.time.as_millis().unwrap_or(0)
    }

    pub(crate) fn set_time(&mut self, time: TransitionTime) {
        self.time = time;
    }

    pub(crate) fn status(&self) -> StatusMessage {
        StatusMessage::DefaultTransition(self.time)
    }

    /// Returns the persistent state.
    #[must_use]
    pub fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot::DefaultTransition(self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_immediate() {
        let server = DefaultTransitionServer::new();
        assert_eq!(server.millis(), 0);
    }

    #[test]
    fn set_time() {
        let mut server = DefaultTransitionServer::new();
        server.set_time(TransitionTime::from_raw(0x42));
        assert_eq!(server.millis(), 2000);
        assert_eq!(
            server.status(),
            StatusMessage::DefaultTransition(TransitionTime::from_raw(0x42))
        );
    }
}
