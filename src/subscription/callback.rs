// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for node event subscriptions.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::event::NodeEvent;
use crate::state::StateChange;
use crate::types::{CtlState, ElementId, HslState, Level, Lightness, OnOff, SceneNumber};

/// Unique identifier for a subscription.
///
/// This ID is returned when creating a subscription and can be used to
/// unsubscribe later. IDs are unique within a node's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for raw event callbacks.
type EventCallback = Arc<dyn Fn(&NodeEvent) + Send + Sync>;

/// Type alias for generic state change callbacks.
type StateChangedCallback = Arc<dyn Fn(ElementId, &StateChange) + Send + Sync>;

/// Type alias for OnOff callbacks.
type OnOffCallback = Arc<dyn Fn(ElementId, OnOff) + Send + Sync>;

/// Type alias for level callbacks.
type LevelCallback = Arc<dyn Fn(ElementId, Level) + Send + Sync>;

/// Type alias for lightness callbacks.
type LightnessCallback = Arc<dyn Fn(ElementId, Lightness) + Send + Sync>;

/// Type alias for CTL callbacks.
type CtlCallback = Arc<dyn Fn(ElementId, CtlState) + Send + Sync>;

/// Type alias for HSL callbacks.
type HslCallback = Arc<dyn Fn(ElementId, HslState) + Send + Sync>;

/// Type alias for scene recall callbacks.
type SceneCallback = Arc<dyn Fn(ElementId, SceneNumber) + Send + Sync>;

/// Registry for managing node subscription callbacks.
///
/// It uses thread-safe interior mutability via `parking_lot::RwLock`, so
/// callbacks can be registered through a shared reference while the node
/// is running.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// Raw event callbacks (receive every event).
    event_callbacks: RwLock<HashMap<SubscriptionId, EventCallback>>,
    /// Present-state callbacks (receive every state update).
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
    /// Generic OnOff callbacks.
    on_off_callbacks: RwLock<HashMap<SubscriptionId, OnOffCallback>>,
    /// Generic Level callbacks.
    level_callbacks: RwLock<HashMap<SubscriptionId, LevelCallback>>,
    /// Light Lightness callbacks.
    lightness_callbacks: RwLock<HashMap<SubscriptionId, LightnessCallback>>,
    /// Light CTL callbacks.
    ctl_callbacks: RwLock<HashMap<SubscriptionId, CtlCallback>>,
    /// Light HSL callbacks.
    hsl_callbacks: RwLock<HashMap<SubscriptionId, HslCallback>>,
    /// Scene recall callbacks.
    scene_callbacks: RwLock<HashMap<SubscriptionId, SceneCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            event_callbacks: RwLock::new(HashMap::new()),
            state_changed_callbacks: RwLock::new(HashMap::new()),
            on_off_callbacks: RwLock::new(HashMap::new()),
            level_callbacks: RwLock::new(HashMap::new()),
            lightness_callbacks: RwLock::new(HashMap::new()),
            ctl_callbacks: RwLock::new(HashMap::new()),
            hsl_callbacks: RwLock::new(HashMap::new()),
            scene_callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Generates a new unique subscription ID.
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for every node event.
    pub fn on_event<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&NodeEvent) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.event_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for every present-state update.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ElementId, &StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for Generic OnOff updates.
    pub fn on_on_off_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ElementId, OnOff) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.on_off_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for Generic Level updates.
    pub fn on_level_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ElementId, Level) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.level_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for Light Lightness updates.
    pub fn on_lightness_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ElementId, Lightness) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.lightness_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for Light CTL updates.
    pub fn on_ctl_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ElementId, CtlState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.ctl_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for Light HSL updates.
    pub fn on_hsl_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ElementId, HslState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.hsl_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for completed scene recalls.
    pub fn on_scene_recalled<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ElementId, SceneNumber) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.scene_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.event_callbacks.write().remove(&id).is_some()
            || self.state_changed_callbacks.write().remove(&id).is_some()
            || self.on_off_callbacks.write().remove(&id).is_some()
            || self.level_callbacks.write().remove(&id).is_some()
            || self.lightness_callbacks.write().remove(&id).is_some()
            || self.ctl_callbacks.write().remove(&id).is_some()
            || self.hsl_callbacks.write().remove(&id).is_some()
            || self.scene_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.event_callbacks.write().clear();
        self.state_changed_callbacks.write().clear();
        self.on_off_callbacks.write().clear();
        self.level_callbacks.write().clear();
        self.lightness_callbacks.write().clear();
        self.ctl_callbacks.write().clear();
        self.hsl_callbacks.write().clear();
        self.scene_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Dispatches an event to relevant callbacks.
    ///
    /// Raw event callbacks see every event. Typed callbacks only see
    /// present-state updates of their model and completed scene recalls.
    /// Callbacks are called synchronously in an arbitrary order.
    pub fn dispatch(&self, event: &NodeEvent) {
        {
            let callbacks = self.event_callbacks.read();
            for callback in callbacks.values() {
                callback(event);
            }
        }

        match event {
            NodeEvent::StateUpdated {
                element, change, ..
            } => self.dispatch_change(*element, change),
            NodeEvent::SceneRecalled { element, scene } => {
                let callbacks = self.scene_callbacks.read();
                for callback in callbacks.values() {
                    callback(*element, *scene);
                }
            }
            NodeEvent::CurrentState { .. }
            | NodeEvent::InvalidElement { .. }
            | NodeEvent::RangeUpdated { .. }
            | NodeEvent::DefaultUpdated { .. }
            | NodeEvent::SceneRegisterUpdated { .. } => {
                // Only raw event callbacks receive these
            }
        }
    }

    fn dispatch_change(&self, element: ElementId, change: &StateChange) {
        {
            let callbacks = self.state_changed_callbacks.read();
            for callback in callbacks.values() {
                callback(element, change);
            }
        }

        match change {
            StateChange::OnOff(state) => {
                let callbacks = self.on_off_callbacks.read();
                for callback in callbacks.values() {
                    callback(element, *state);
                }
            }
            StateChange::Level(level) => {
                let callbacks = self.level_callbacks.read();
                for callback in callbacks.values() {
                    callback(element, *level);
                }
            }
            StateChange::Lightness(lightness) => {
                let callbacks = self.lightness_callbacks.read();
                for callback in callbacks.values() {
                    callback(element, *lightness);
                }
            }
            StateChange::Ctl(state) => {
                let callbacks = self.ctl_callbacks.read();
                for callback in callbacks.values() {
                    callback(element, *state);
                }
            }
            StateChange::Hsl(state) => {
                let callbacks = self.hsl_callbacks.read();
                for callback in callbacks.values() {
                    callback(element, *state);
                }
            }
            StateChange::LightnessLinear(_)
            | StateChange::CtlTemperature(_)
            | StateChange::Hue(_)
            | StateChange::Saturation(_) => {
                // Captured by generic state_changed callbacks
            }
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.event_callbacks.read().len()
            + self.state_changed_callbacks.read().len()
            + self.on_off_callbacks.read().len()
            + self.level_callbacks.read().len()
            + self.lightness_callbacks.read().len()
            + self.ctl_callbacks.read().len()
            + self.hsl_callbacks.read().len()
            + self.scene_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelKind;
    use crate::state::UpdateSource;
    use std::sync::atomic::AtomicU32;

    fn updated(change: StateChange) -> NodeEvent {
        NodeEvent::StateUpdated {
            element: ElementId::PRIMARY,
            change,
            source: UpdateSource::Client,
        }
    }

    #[test]
    fn subscription_id_display() {
        let id = SubscriptionId::new(42);
        assert_eq!(id.to_string(), "Sub(42)");
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.callback_count(), 0);
    }

    #[test]
    fn registry_level_callback() {
        let registry = CallbackRegistry::new();
        let received = Arc::new(RwLock::new(None::<Level>));
        let received_clone = received.clone();

        let id = registry.on_level_changed(move |_element, level| {
            *received_clone.write() = Some(level);
        });

        registry.dispatch(&updated(StateChange::level(Level::new(-5))));
        assert_eq!(*received.read(), Some(Level::new(-5)));

        assert!(registry.unsubscribe(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_event_callback_sees_everything() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        registry.on_event(move |_event| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&updated(StateChange::on_off(OnOff::On)));
        registry.dispatch(&NodeEvent::InvalidElement {
            element: ElementId::new(9),
            model: ModelKind::GenericLevel,
        });

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn registry_typed_callbacks_ignore_other_models() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        registry.on_lightness_changed(move |_, _| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&updated(StateChange::level(Level::ZERO)));
        registry.dispatch(&NodeEvent::CurrentState {
            element: ElementId::PRIMARY,
            change: StateChange::lightness(Lightness::MAX),
        });
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        registry.dispatch(&updated(StateChange::lightness(Lightness::MAX)));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_scene_callback() {
        let registry = CallbackRegistry::new();
        let received = Arc::new(RwLock::new(None::<SceneNumber>));
        let received_clone = received.clone();

        registry.on_scene_recalled(move |_, scene| {
            *received_clone.write() = Some(scene);
        });

        let scene = SceneNumber::new(3).unwrap();
        registry.dispatch(&NodeEvent::SceneRecalled {
            element: ElementId::PRIMARY,
            scene,
        });
        assert_eq!(*received.read(), Some(scene));
    }

    #[test]
    fn registry_unsubscribe_nonexistent() {
        let registry = CallbackRegistry::new();
        assert!(!registry.unsubscribe(SubscriptionId::new(999)));
    }

    #[test]
    fn registry_clear_and_unique_ids() {
        let registry = CallbackRegistry::new();

        let id1 = registry.on_on_off_changed(|_, _| {});
        let id2 = registry.on_ctl_changed(|_, _| {});
        let id3 = registry.on_hsl_changed(|_, _| {});

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_eq!(registry.callback_count(), 3);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_debug() {
        let registry = CallbackRegistry::new();
        registry.on_state_changed(|_, _| {});

        let debug = format!("{registry:?}");
        assert!(debug.contains("callback_count"));
    }
}
