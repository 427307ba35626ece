// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that expose node events.

use crate::event::NodeEvent;
use crate::state::StateChange;
use crate::subscription::{CallbackRegistry, SubscriptionId};
use crate::types::{CtlState, ElementId, HslState, Level, Lightness, OnOff, SceneNumber};

/// Trait for types that support event subscriptions.
///
/// Implementors only provide access to their [`CallbackRegistry`]; every
/// subscription method forwards to it.
///
/// # Examples
///
/// ```
/// use mesh_lighting::node::{Node, NodeConfig};
/// use mesh_lighting::subscription::Subscribable;
/// use mesh_lighting::transport::MemoryTransport;
///
/// let node = Node::new(NodeConfig::default(), MemoryTransport::new());
///
/// let sub_id = node.on_level_changed(|element, level| {
///     println!("Level on {element} is now {level}");
/// });
///
/// assert!(node.unsubscribe(sub_id));
/// ```
pub trait Subscribable {
    /// Returns the registry callbacks are stored in.
    fn callbacks(&self) -> &CallbackRegistry;

    /// Subscribes to every node event.
    fn on_event<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&NodeEvent) + Send + Sync + 'static,
    {
        self.callbacks().on_event(callback)
    }

    /// Subscribes to every present-state update.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ElementId, &StateChange) + Send + Sync + 'static,
    {
        self.callbacks().on_state_changed(callback)
    }

    /// Subscribes to Generic OnOff updates.
    fn on_on_off_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ElementId, OnOff) + Send + Sync + 'static,
    {
        self.callbacks().on_on_off_changed(callback)
    }

    /// Subscribes to Generic Level updates.
    fn on_level_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ElementId, Level) + Send + Sync + 'static,
    {
        self.callbacks().on_level_changed(callback)
    }

    /// Subscribes to Light Lightness updates.
    fn on_lightness_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ElementId, Lightness) + Send + Sync + 'static,
    {
        self.callbacks().on_lightness_changed(callback)
    }

    /// Subscribes to Light CTL updates.
    fn on_ctl_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ElementId, CtlState) + Send + Sync + 'static,
    {
        self.callbacks().on_ctl_changed(callback)
    }

    /// Subscribes to Light HSL updates.
    fn on_hsl_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ElementId, HslState) + Send + Sync + 'static,
    {
        self.callbacks().on_hsl_changed(callback)
    }

    /// Subscribes to completed scene recalls.
    fn on_scene_recalled<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ElementId, SceneNumber) + Send + Sync + 'static,
    {
        self.callbacks().on_scene_recalled(callback)
    }

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks().unsubscribe(id)
    }
}
