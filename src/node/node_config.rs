// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Node configuration.

use crate::error::Result;

/// Default transition tick, in milliseconds.
pub const DEFAULT_TICK_MS: u32 = 100;

/// Default Move Set interval, in milliseconds.
pub const DEFAULT_MOVE_INTERVAL_MS: u32 = 100;

/// Default de-duplication window, in milliseconds.
pub const DEFAULT_TRANSACTION_TIMEOUT_MS: u32 = 6_000;

/// Default number of scene slots per element.
pub const DEFAULT_SCENE_CAPACITY: usize = 16;

/// Default number of binding entries.
pub const DEFAULT_BIND_CAPACITY: usize = 30;

/// Configuration for a [`Node`](super::Node).
///
/// Every field has a default, so a partial JSON document is enough to
/// override a single setting.
///
/// # Examples
///
/// ```
/// use mesh_lighting::node::NodeConfig;
///
/// let config = NodeConfig::default()
///     .with_tick_ms(50)
///     .with_scene_capacity(4);
/// assert_eq!(config.tick_ms, 50);
/// assert_eq!(config.transaction_timeout_ms, 6000);
///
/// let config = NodeConfig::from_json(r#"{ "bind_capacity": 8 }"#).unwrap();
/// assert_eq!(config.bind_capacity, 8);
/// assert_eq!(config.tick_ms, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Interval between interpolation steps.
    pub tick_ms: u32,
    /// Interval between Move Set steps.
    pub move_interval_ms: u32,
    /// How long a transaction identifier is remembered.
    pub transaction_timeout_ms: u32,
    /// Scene slots per element.
    pub scene_capacity: usize,
    /// Maximum number of binding entries.
    pub bind_capacity: usize,
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            move_interval_ms: DEFAULT_MOVE_INTERVAL_MS,
            transaction_timeout_ms: DEFAULT_TRANSACTION_TIMEOUT_MS,
            scene_capacity: DEFAULT_SCENE_CAPACITY,
            bind_capacity: DEFAULT_BIND_CAPACITY,
            event_capacity: crate::event::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl NodeConfig {
    /// Parses a configuration from JSON. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the document is not valid JSON or a field
    /// has the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the transition tick. Zero is raised to one millisecond.
    #[must_use]
    pub fn with_tick_ms(mut self, tick_ms: u32) -> Self {
        self.tick_ms = tick_ms.max(1);
        self
    }

    /// Sets the Move Set interval. Zero is raised to one millisecond.
    #[must_use]
    pub fn with_move_interval_ms(mut self, interval_ms: u32) -> Self {
        self.move_interval_ms = interval_ms.max(1);
        self
    }

    /// Sets the de-duplication window.
    #[must_use]
    pub fn with_transaction_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.transaction_timeout_ms = timeout_ms;
        self
    }

    /// Sets the number of scene slots per element.
    #[must_use]
    pub fn with_scene_capacity(mut self, capacity: usize) -> Self {
        self.scene_capacity = capacity;
        self
    }

    /// Sets the maximum number of binding entries.
    #[must_use]
    pub fn with_bind_capacity(mut self, capacity: usize) -> Self {
        self.bind_capacity = capacity;
        self
    }

    /// Sets the capacity of the event channel.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}
