// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The mesh node: model instances, bindings, scenes and timers.
//!
//! A [`Node`] owns every model instance in an arena keyed by element and
//! model kind. It is driven from one logical thread: inbound requests go
//! through [`Node::handle`], local changes through
//! [`Node::set_local_state`], and time through [`Node::advance`] (or
//! [`Node::run_until_idle`] on a tokio runtime). Every call runs to
//! completion, including the propagation of bound states it caused.
//!
//! # Examples
//!
//! ```
//! use mesh_lighting::message::{ModelMessage, Request, Transaction};
//! use mesh_lighting::node::{Handled, Node, NodeConfig};
//! use mesh_lighting::transport::MemoryTransport;
//! use mesh_lighting::types::{Address, ElementId, Level};
//!
//! let transport = MemoryTransport::new();
//! let mut node = Node::new(NodeConfig::default(), transport.clone());
//! node.add_level_server(ElementId::PRIMARY).unwrap();
//!
//! let set = ModelMessage::new(
//!     ElementId::PRIMARY,
//!     Address::new(0x0001),
//!     Request::LevelSet {
//!         level: Level::new(1000),
//!         txn: Transaction::acked(1).with_timing(0x05, 0),
//!     },
//! );
//! assert_eq!(node.handle(&set), Handled::Accepted);
//!
//! node.advance(500);
//! let level = node.level_server(ElementId::PRIMARY).unwrap();
//! assert_eq!(level.present(), Level::new(1000));
//! ```

mod bindings;
mod engine;
mod handler;
mod node_config;
mod scenes;

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, trace};

pub use handler::Handled;
pub use node_config::{
    NodeConfig, DEFAULT_BIND_CAPACITY, DEFAULT_MOVE_INTERVAL_MS, DEFAULT_SCENE_CAPACITY,
    DEFAULT_TICK_MS, DEFAULT_TRANSACTION_TIMEOUT_MS,
};

use crate::binding::{BindTable, StateLookup};
use crate::error::{Error, Result};
use crate::event::{EventBus, NodeEvent};
use crate::models::{
    CtlServer, CtlTemperatureServer, DefaultTransitionServer, HslServer, HueServer,
    InstanceKey, LevelServer, LightnessServer, ModelInstance, ModelKind, OnOffServer,
    SaturationServer, SceneServer, Server,
};
use crate::state::{StateChange, UpdateSource};
use crate::subscription::{CallbackRegistry, Subscribable};
use crate::timer::TimerQueue;
use crate::transport::{MeshTransport, NullStore, StateStore};
use crate::types::{
    CtlState, Delay, ElementId, HslState, Lightness, TemperatureRange, TemperatureState,
};

/// Work queued by a state change and drained before the call returns.
#[derive(Debug, Clone, Copy)]
enum Propagation {
    /// A same-element state derived from a composite state.
    Direct {
        element: ElementId,
        change: StateChange,
    },
    /// Resolve the binding edges leaving this state.
    Resolve {
        element: ElementId,
        change: StateChange,
    },
}

/// A mesh node hosting lighting model servers.
pub struct Node {
    config: NodeConfig,
    instances: BTreeMap<InstanceKey, ModelInstance>,
    bindings: BindTable,
    timers: TimerQueue,
    queue: VecDeque<Propagation>,
    transport: Box<dyn MeshTransport>,
    store: Box<dyn StateStore>,
    events: EventBus,
    callbacks: CallbackRegistry,
}

impl Node {
    /// Creates a node without persistence.
    #[must_use]
    pub fn new(config: NodeConfig, transport: impl MeshTransport + 'static) -> Self {
        Self::with_store(config, transport, NullStore)
    }

    /// Creates a node that saves model state through `store`.
    #[must_use]
    pub fn with_store(
        config: NodeConfig,
        transport: impl MeshTransport + 'static,
        store: impl StateStore + 'static,
    ) -> Self {
        Self {
            bindings: BindTable::new(config.bind_capacity),
            events: EventBus::with_capacity(config.event_capacity),
            config,
            instances: BTreeMap::new(),
            timers: TimerQueue::new(),
            queue: VecDeque::new(),
            transport: Box::new(transport),
            store: Box::new(store),
            callbacks: CallbackRegistry::new(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Returns the node's virtual clock, in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    /// Returns the number of armed timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // ========================================================================
    // Composition
    // ========================================================================

    fn add_instance(&mut self, element: ElementId, instance: ModelInstance) -> Result<()> {
        let key = InstanceKey::new(element, instance.kind());
        if self.instances.contains_key(&key) {
            return Err(Error::DuplicateInstance(element));
        }
        debug!(element = %element, model = ?key.model, "Adding model instance");
        self.instances.insert(key, instance);
        Ok(())
    }

    /// Adds a Generic OnOff Server on `element`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateInstance` if the element already hosts one.
    pub fn add_on_off_server(&mut self, element: ElementId) -> Result<()> {
        let server = OnOffServer::new(self.config.scene_capacity);
        self.add_instance(element, ModelInstance::OnOff(server))
    }

    /// Adds a Generic Level Server on `element`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateInstance` if the element already hosts one.
    pub fn add_level_server(&mut self, element: ElementId) -> Result<()> {
        let server = LevelServer::new(self.config.scene_capacity);
        self.add_instance(element, ModelInstance::Level(server))
    }

    /// Adds a Generic Default Transition Time Server on `element`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateInstance` if the element already hosts one.
    pub fn add_default_transition_server(&mut self, element: ElementId) -> Result<()> {
        self.add_instance(
            element,
            ModelInstance::DefaultTransition(DefaultTransitionServer::new()),
        )
    }

    /// Adds a Light Lightness Server on `element`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateInstance` if the element already hosts one.
    pub fn add_lightness_server(&mut self, element: ElementId) -> Result<()> {
        let server = LightnessServer::new(self.config.scene_capacity);
        self.add_instance(element, ModelInstance::Lightness(server))
    }

    /// Adds a Light CTL Server on `element`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateInstance` if the element already hosts one.
    pub fn add_ctl_server(&mut self, element: ElementId) -> Result<()> {
        let server = CtlServer::new(self.config.scene_capacity);
        self.add_instance(element, ModelInstance::Ctl(server))
    }

    /// Adds a Light CTL Temperature Server on `element`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateInstance` if the element already hosts one.
    pub fn add_ctl_temperature_server(&mut self, element: ElementId) -> Result<()> {
        let server = CtlTemperatureServer::new(self.config.scene_capacity);
        self.add_instance(element, ModelInstance::CtlTemperature(server))
    }

    /// Adds a Light HSL Server on `element`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateInstance` if the element already hosts one.
    pub fn add_hsl_server(&mut self, element: ElementId) -> Result<()> {
        let server = HslServer::new(self.config.scene_capacity);
        self.add_instance(element, ModelInstance::Hsl(server))
    }

    /// Adds a Light HSL Hue Server on `element`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateInstance` if the element already hosts one.
    pub fn add_hue_server(&mut self, element: ElementId) -> Result<()> {
        let server = HueServer::new(self.config.scene_capacity);
        self.add_instance(element, ModelInstance::Hue(server))
    }

    /// Adds a Light HSL Saturation Server on `element`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateInstance` if the element already hosts one.
    pub fn add_saturation_server(&mut self, element: ElementId) -> Result<()> {
        let server = SaturationServer::new(self.config.scene_capacity);
        self.add_instance(element, ModelInstance::Saturation(server))
    }

    /// Adds a Scene Server on `element`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateInstance` if the element already hosts one.
    pub fn add_scene_server(&mut self, element: ElementId) -> Result<()> {
        let server = SceneServer::new(self.config.scene_capacity);
        self.add_instance(element, ModelInstance::Scene(server))
    }

    /// Links a Light CTL instance with the Temperature instance on its
    /// sub-element. The sub-element takes the main element's range and
    /// present temperature.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidElement` if either instance is missing.
    pub fn link_ctl(&mut self, main: ElementId, temperature: ElementId) -> Result<()> {
        let ctl = instance::<CtlServer>(&self.instances, main).ok_or(Error::InvalidElement(main))?;
        let (range, state) = (ctl.range, ctl.present().temperature_state());
        if instance::<CtlTemperatureServer>(&self.instances, temperature).is_none() {
            return Err(Error::InvalidElement(temperature));
        }

        if let Some(ctl) = instance_mut::<CtlServer>(&mut self.instances, main) {
            ctl.temperature_element = Some(temperature);
        }
        if let Some(sub) = instance_mut::<CtlTemperatureServer>(&mut self.instances, temperature) {
            sub.main_element = Some(main);
            sub.range = range;
            sub.mirror(state, state);
        }
        debug!(main = %main, sub = %temperature, "Linked CTL temperature element");
        Ok(())
    }

    /// Links a Light HSL instance with the Hue and Saturation instances on
    /// its sub-elements.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidElement` if any instance is missing.
    pub fn link_hsl(
        &mut self,
        main: ElementId,
        hue: ElementId,
        saturation: ElementId,
    ) -> Result<()> {
        let hsl = instance::<HslServer>(&self.instances, main).ok_or(Error::InvalidElement(main))?;
        let (range, state) = (hsl.range, hsl.present());
        if instance::<HueServer>(&self.instances, hue).is_none() {
            return Err(Error::InvalidElement(hue));
        }
        if instance::<SaturationServer>(&self.instances, saturation).is_none() {
            return Err(Error::InvalidElement(saturation));
        }

        if let Some(hsl) = instance_mut::<HslServer>(&mut self.instances, main) {
            hsl.hue_element = Some(hue);
            hsl.saturation_element = Some(saturation);
        }
        if let Some(hue_server) = instance_mut::<HueServer>(&mut self.instances, hue) {
            hue_server.main_element = Some(main);
            hue_server.range = range;
            hue_server.mirror(state.hue, state.hue);
        }
        if let Some(saturation_server) =
            instance_mut::<SaturationServer>(&mut self.instances, saturation)
        {
            saturation_server.main_element = Some(main);
            saturation_server.range = range;
            saturation_server.mirror(state.saturation, state.saturation);
        }
        debug!(main = %main, hue = %hue, saturation = %saturation, "Linked HSL elements");
        Ok(())
    }

    // ========================================================================
    // Instance access
    // ========================================================================

    /// Returns the instance of `model` on `element`.
    #[must_use]
    pub fn instance(&self, element: ElementId, model: ModelKind) -> Option<&ModelInstance> {
        self.instances.get(&InstanceKey::new(element, model))
    }

    /// Returns every instance with its key, ordered by element.
    pub fn instances(&self) -> impl Iterator<Item = (&InstanceKey, &ModelInstance)> {
        self.instances.iter()
    }

    /// Returns the Generic OnOff Server on `element`.
    #[must_use]
    pub fn on_off_server(&self, element: ElementId) -> Option<&OnOffServer> {
        instance::<OnOffServer>(&self.instances, element)
    }

    /// Returns the Generic Level Server on `element`.
    #[must_use]
    pub fn level_server(&self, element: ElementId) -> Option<&LevelServer> {
        instance::<LevelServer>(&self.instances, element)
    }

    /// Returns the Generic Default Transition Time Server on `element`.
    #[must_use]
    pub fn default_transition_server(
        &self,
        element: ElementId,
    ) -> Option<&DefaultTransitionServer> {
        match self.instance(element, ModelKind::GenericDefaultTransition) {
            Some(ModelInstance::DefaultTransition(server)) => Some(server),
            _ => None,
        }
    }

    /// Returns the Light Lightness Server on `element`.
    #[must_use]
    pub fn lightness_server(&self, element: ElementId) -> Option<&LightnessServer> {
        instance::<LightnessServer>(&self.instances, element)
    }

    /// Returns the Light CTL Server on `element`.
    #[must_use]
    pub fn ctl_server(&self, element: ElementId) -> Option<&CtlServer> {
        instance::<CtlServer>(&self.instances, element)
    }

    /// Returns the Light CTL Temperature Server on `element`.
    #[must_use]
    pub fn ctl_temperature_server(&self, element: ElementId) -> Option<&CtlTemperatureServer> {
        instance::<CtlTemperatureServer>(&self.instances, element)
    }

    /// Returns the Light HSL Server on `element`.
    #[must_use]
    pub fn hsl_server(&self, element: ElementId) -> Option<&HslServer> {
        instance::<HslServer>(&self.instances, element)
    }

    /// Returns the Light HSL Hue Server on `element`.
    #[must_use]
    pub fn hue_server(&self, element: ElementId) -> Option<&HueServer> {
        instance::<HueServer>(&self.instances, element)
    }

    /// Returns the Light HSL Saturation Server on `element`.
    #[must_use]
    pub fn saturation_server(&self, element: ElementId) -> Option<&SaturationServer> {
        instance::<SaturationServer>(&self.instances, element)
    }

    /// Returns the Scene Server on `element`.
    #[must_use]
    pub fn scene_server(&self, element: ElementId) -> Option<&SceneServer> {
        match self.instance(element, ModelKind::Scene) {
            Some(ModelInstance::Scene(server)) => Some(server),
            _ => None,
        }
    }

    // ========================================================================
    // Local API
    // ========================================================================

    /// Applies a state change from the local application.
    ///
    /// The change takes effect immediately, cancels any transition of the
    /// state, publishes its status and resolves its bindings.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidElement` if no instance holds the state on
    /// `element`.
    pub fn set_local_state(&mut self, element: ElementId, change: StateChange) -> Result<()> {
        let applied = self.set_change(element, change, 0, Delay::NONE, UpdateSource::App);
        self.drain();
        if applied {
            Ok(())
        } else {
            Err(Error::InvalidElement(element))
        }
    }

    /// Reports the present state of `model` on `element`.
    ///
    /// Emits a `CurrentState` event, or an `InvalidElement` event when the
    /// element does not host a stateful instance of `model`.
    pub fn get_state(&self, element: ElementId, model: ModelKind) -> Option<StateChange> {
        let present = self
            .instance(element, model)
            .and_then(ModelInstance::present);
        match present {
            Some(change) => self.emit(NodeEvent::CurrentState { element, change }),
            None => self.emit(NodeEvent::InvalidElement { element, model }),
        }
        present
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Subscribes to node events on the broadcast channel.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<NodeEvent> {
        self.events.subscribe()
    }

    /// Returns the event bus.
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }

    fn emit(&self, event: NodeEvent) {
        self.callbacks.dispatch(&event);
        self.events.publish(event);
    }

    fn persist(&mut self, key: InstanceKey) {
        if let Some(instance) = self.instances.get(&key) {
            self.store.save_state(key.element, &instance.snapshot());
        }
    }

    // ========================================================================
    // Time
    // ========================================================================

    /// Moves the clock forward by `ms`, firing every timer that falls due.
    ///
    /// Timers armed while handling an expiry are measured from that
    /// expiry's deadline, so a 500 ms transition with a 100 ms tick lands
    /// after exactly five steps.
    pub fn advance(&mut self, ms: u64) {
        let until = self.timers.now_ms().saturating_add(ms);
        while let Some(task) = self.timers.pop_due(until) {
            trace!(task = ?task, now_ms = self.timers.now_ms(), "Timer fired");
            self.fire(task);
            self.drain();
        }
        self.timers.advance_to(until);
    }

    /// Runs timers in real time until none is armed.
    ///
    /// Sleeps with `tokio::time` until each next deadline. De-duplication
    /// windows count as armed timers, so this returns once the last
    /// transaction window has closed too.
    pub async fn run_until_idle(&mut self) {
        while let Some(deadline) = self.timers.next_deadline() {
            let wait = deadline.saturating_sub(self.timers.now_ms());
            tokio::time::sleep(Duration::from_millis(wait)).await;
            self.advance(wait);
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("config", &self.config)
            .field("instances", &self.instances.len())
            .field("bindings", &self.bindings.len())
            .field("timers", &self.timers)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

impl Subscribable for Node {
    fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }
}

impl StateLookup for Node {
    fn on_lightness(&self, element: ElementId) -> Option<Lightness> {
        self.lightness_server(element)
            .map(LightnessServer::on_level)
    }

    fn ctl(&self, element: ElementId) -> Option<CtlState> {
        self.ctl_server(element).map(CtlServer::present)
    }

    fn hsl(&self, element: ElementId) -> Option<HslState> {
        self.hsl_server(element).map(HslServer::present)
    }

    fn temperature(&self, element: ElementId) -> Option<(TemperatureState, TemperatureRange)> {
        self.ctl_temperature_server(element)
            .map(|server| (server.present(), server.range()))
    }
}

fn instance<S: Server>(
    instances: &BTreeMap<InstanceKey, ModelInstance>,
    element: ElementId,
) -> Option<&S> {
    instances
        .get(&InstanceKey::new(element, S::KIND))
        .and_then(S::get)
}

fn instance_mut<S: Server>(
    instances: &mut BTreeMap<InstanceKey, ModelInstance>,
    element: ElementId,
) -> Option<&mut S> {
    instances
        .get_mut(&InstanceKey::new(element, S::KIND))
        .and_then(S::get_mut)
}
