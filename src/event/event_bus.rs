// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast channel for node events.

use tokio::sync::broadcast;

use super::NodeEvent;

/// Events buffered per subscriber unless configured otherwise.
pub(crate) const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Fans node events out to any number of receivers.
///
/// Publishing never blocks the node. A receiver that falls more than the
/// capacity behind skips the oldest events and sees `RecvError::Lagged`.
///
/// # Examples
///
/// ```
/// use mesh_lighting::event::{EventBus, NodeEvent};
/// use mesh_lighting::models::ModelKind;
/// use mesh_lighting::types::ElementId;
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(NodeEvent::DefaultUpdated {
///     element: ElementId::PRIMARY,
///     model: ModelKind::LightLightness,
/// });
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<NodeEvent>,
}

impl EventBus {
    /// Creates a bus holding up to 256 events per receiver.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a bus holding up to `capacity` events per receiver.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns a receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<NodeEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of live receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Sends `event` to every receiver. Without receivers it is dropped.
    pub fn publish(&self, event: NodeEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
