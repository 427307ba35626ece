// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transition engine shared by every transitioned server.
//!
//! A set starts the instance's [`Transition`](crate::transition::Transition)
//! and arms the timer it asks for. Timer expiries step the present value and
//! re-arm until the target is applied. An applied present value publishes
//! the status, emits an event and, unless the update came from a binding or
//! a scene, queues the bound states. The queue is drained before the
//! public call that caused the change returns.

use tracing::{debug, trace};

use super::{instance, instance_mut, Node, Propagation};
use crate::error::MessageError;
use crate::event::NodeEvent;
use crate::models::{
    CtlServer, CtlTemperatureServer, HslServer, HueServer, InstanceKey, LevelServer, Link,
    LightnessServer, ModelInstance, ModelKind, OnOffServer, SaturationServer, Server,
};
use crate::state::{StateChange, UpdateSource};
use crate::timer::ScheduledTask;
use crate::transition::{AckContext, Schedule, Tick};
use crate::types::{Address, Delay, ElementId, Level, Lightness, TransactionId};

impl Node {
    // ========================================================================
    // Set
    // ========================================================================

    /// Starts a transition of `S` on `element` toward `target`.
    ///
    /// Returns `false` when the element does not host `S`.
    pub(super) fn set_state<S: Server>(
        &mut self,
        element: ElementId,
        target: S::Value,
        transition_ms: u32,
        delay: Delay,
        source: UpdateSource,
    ) -> bool {
        let tick_ms = self.config.tick_ms;
        let Some(server) = instance_mut::<S>(&mut self.instances, element) else {
            return false;
        };
        server.on_start();
        let target = server.clamp(target);
        let core = server.core_mut();
        let changed = core.target() != target;
        core.timer = None;
        let schedule = core
            .transition
            .start(target, transition_ms, delay, source, tick_ms);
        debug!(
            element = %element,
            model = ?S::KIND,
            target = ?target,
            transition_ms,
            delay_ms = delay.as_millis(),
            source = ?source,
            "Starting transition"
        );
        if changed {
            self.persist(InstanceKey::new(element, S::KIND));
        }
        self.follow::<S>(element, schedule);
        true
    }

    /// Applies a change of any transitioned state.
    pub(super) fn set_change(
        &mut self,
        element: ElementId,
        change: StateChange,
        transition_ms: u32,
        delay: Delay,
        source: UpdateSource,
    ) -> bool {
        match change {
            StateChange::OnOff(value) => {
                self.set_state::<OnOffServer>(element, value, transition_ms, delay, source)
            }
            StateChange::Level(value) => {
                self.set_state::<LevelServer>(element, value, transition_ms, delay, source)
            }
            StateChange::Lightness(value) => {
                self.set_state::<LightnessServer>(element, value, transition_ms, delay, source)
            }
            StateChange::LightnessLinear(linear) => self.set_state::<LightnessServer>(
                element,
                Lightness::from_linear(linear),
                transition_ms,
                delay,
                source,
            ),
            StateChange::Ctl(value) => {
                self.set_state::<CtlServer>(element, value, transition_ms, delay, source)
            }
            StateChange::CtlTemperature(value) => self.set_state::<CtlTemperatureServer>(
                element,
                value,
                transition_ms,
                delay,
                source,
            ),
            StateChange::Hsl(value) => {
                self.set_state::<HslServer>(element, value, transition_ms, delay, source)
            }
            StateChange::Hue(value) => {
                self.set_state::<HueServer>(element, value, transition_ms, delay, source)
            }
            StateChange::Saturation(value) => {
                self.set_state::<SaturationServer>(element, value, transition_ms, delay, source)
            }
        }
    }

    /// Arms the timer a schedule asks for, or applies the target.
    pub(super) fn follow<S: Server>(&mut self, element: ElementId, schedule: Schedule) {
        let key = InstanceKey::new(element, S::KIND);
        let Some(server) = instance_mut::<S>(&mut self.instances, element) else {
            return;
        };
        match schedule {
            Schedule::Delay(ms) => {
                trace!(instance = %key, delay_ms = ms, "Arming delay timer");
                server.core_mut().timer =
                    Some(self.timers.arm(ScheduledTask::Transition(key), ms));
            }
            Schedule::Wait(ms) => {
                trace!(instance = %key, wait_ms = ms, "Arming transition timer");
                server.core_mut().timer =
                    Some(self.timers.arm(ScheduledTask::Transition(key), ms));
                if server.starts_early() {
                    let transition = &mut server.core_mut().transition;
                    transition.set_present(transition.target());
                    server.present_written();
                    self.present_changed::<S>(element, true);
                }
            }
            Schedule::Apply => {
                let core = server.core_mut();
                core.timer = None;
                core.transition.complete();
                server.present_written();
                self.present_changed::<S>(element, true);
            }
        }
    }

    // ========================================================================
    // Timers
    // ========================================================================

    pub(super) fn fire(&mut self, task: ScheduledTask) {
        match task {
            ScheduledTask::Transition(key) => self.transition_timer_of(key),
            ScheduledTask::TransactionExpiry(key) => {
                if let Some(txn) = self
                    .instances
                    .get_mut(&key)
                    .and_then(ModelInstance::transactions_mut)
                {
                    trace!(instance = %key, "Transaction window closed");
                    txn.record.expire();
                    txn.timer = None;
                }
            }
            ScheduledTask::SceneRecall(element) => self.scene_timer(element),
        }
    }

    fn transition_timer_of(&mut self, key: InstanceKey) {
        let element = key.element;
        match key.model {
            ModelKind::GenericOnOff => self.transition_timer::<OnOffServer>(element),
            ModelKind::GenericLevel => self.level_timer(element),
            ModelKind::LightLightness => self.transition_timer::<LightnessServer>(element),
            ModelKind::LightCtl => self.transition_timer::<CtlServer>(element),
            ModelKind::LightCtlTemperature => {
                self.transition_timer::<CtlTemperatureServer>(element);
            }
            ModelKind::LightHsl => self.transition_timer::<HslServer>(element),
            ModelKind::LightHslHue => self.transition_timer::<HueServer>(element),
            ModelKind::LightHslSaturation => self.transition_timer::<SaturationServer>(element),
            ModelKind::GenericDefaultTransition | ModelKind::Scene => {}
        }
    }

    fn transition_timer<S: Server>(&mut self, element: ElementId) {
        let tick_ms = self.config.tick_ms;
        let Some(server) = instance_mut::<S>(&mut self.instances, element) else {
            return;
        };
        let core = server.core_mut();
        core.timer = None;
        match core.transition.on_timer(tick_ms) {
            Tick::Idle => {}
            Tick::DelayElapsed(schedule) => {
                let ack = core.txn.record.take_ack();
                debug!(element = %element, model = ?S::KIND, "Delay elapsed");
                self.follow::<S>(element, schedule);
                if let Some(ack) = ack {
                    self.acknowledge::<S>(element, ack);
                }
            }
            Tick::Step(schedule) => {
                server.present_written();
                trace!(
                    element = %element,
                    model = ?S::KIND,
                    present = ?server.core().present(),
                    "Transition step"
                );
                // Arm the next timer first so the published status counts it.
                let last = schedule == Schedule::Apply;
                self.follow::<S>(element, schedule);
                if !last {
                    self.present_changed::<S>(element, false);
                }
            }
            Tick::Complete => self.follow::<S>(element, Schedule::Apply),
        }
    }

    /// Steps a Move Set ramp, or defers to the regular timer when no ramp
    /// runs or its delay is still pending.
    fn level_timer(&mut self, element: ElementId) {
        let key = InstanceKey::new(element, ModelKind::GenericLevel);
        let Some(server) = instance_mut::<LevelServer>(&mut self.instances, element) else {
            return;
        };
        let Some(ramp) = server.ramp else {
            return self.transition_timer::<LevelServer>(element);
        };
        if !server.core.transition.delay().is_none() {
            return self.transition_timer::<LevelServer>(element);
        }

        let next = Level::saturating(i32::from(server.present().value()) + ramp.velocity);
        server.core.transition.set_present(next);
        if next == ramp.bound() {
            debug!(element = %element, level = %next, "Move reached its bound");
            server.ramp = None;
            server.core.transition.stop();
            server.core.timer = None;
        } else {
            server.core.timer = Some(
                self.timers
                    .arm(ScheduledTask::Transition(key), ramp.interval_ms),
            );
        }
        self.present_changed::<LevelServer>(element, true);
    }

    // ========================================================================
    // Propagation
    // ========================================================================

    /// Reports a new present value of `S` on `element`.
    ///
    /// `full` is `false` for intermediate steps, which only publish and emit.
    fn present_changed<S: Server>(&mut self, element: ElementId, full: bool) {
        let tick_ms = self.config.tick_ms;
        let Some(server) = instance::<S>(&self.instances, element) else {
            return;
        };
        let source = server.core().transition.source();
        let change = server.change();
        let status = server.status(tick_ms);
        let links = server.links();
        let resolve = full && !source.is_damped();
        let derived = if resolve { server.extends() } else { Vec::new() };

        for link in links {
            if let Some((linked, mirrored)) = self.apply_link(link) {
                if resolve {
                    self.queue.push_back(Propagation::Resolve {
                        element: linked,
                        change: mirrored,
                    });
                }
            }
        }
        if resolve {
            for change in derived {
                self.queue.push_back(Propagation::Direct { element, change });
            }
            self.queue.push_back(Propagation::Resolve { element, change });
        }
        if full && matches!(source, UpdateSource::Client | UpdateSource::App) {
            self.invalidate_scenes();
        }

        self.transport.publish(element, &status);
        self.emit(NodeEvent::StateUpdated {
            element,
            change,
            source,
        });
    }

    /// Writes a shared half of a composite state into its sibling instance.
    ///
    /// Returns the sibling's element and new present value.
    fn apply_link(&mut self, link: Link) -> Option<(ElementId, StateChange)> {
        match link {
            Link::CtlToTemperature {
                element,
                present,
                target,
            } => {
                let server = instance_mut::<CtlTemperatureServer>(&mut self.instances, element)?;
                server.mirror(present, target);
                Some((element, server.change()))
            }
            Link::TemperatureToCtl {
                element,
                present,
                target,
            } => {
                let server = instance_mut::<CtlServer>(&mut self.instances, element)?;
                server.mirror_temperature(present, target);
                Some((element, server.change()))
            }
            Link::HslToHue {
                element,
                present,
                target,
            } => {
                let server = instance_mut::<HueServer>(&mut self.instances, element)?;
                server.mirror(present, target);
                Some((element, server.change()))
            }
            Link::HueToHsl {
                element,
                present,
                target,
            } => {
                let server = instance_mut::<HslServer>(&mut self.instances, element)?;
                server.mirror_hue(present, target);
                Some((element, server.change()))
            }
            Link::HslToSaturation {
                element,
                present,
                target,
            } => {
                let server = instance_mut::<SaturationServer>(&mut self.instances, element)?;
                server.mirror(present, target);
                Some((element, server.change()))
            }
            Link::SaturationToHsl {
                element,
                present,
                target,
            } => {
                let server = instance_mut::<HslServer>(&mut self.instances, element)?;
                server.mirror_saturation(present, target);
                Some((element, server.change()))
            }
        }
    }

    /// Applies queued propagation until the queue is empty.
    pub(super) fn drain(&mut self) {
        while let Some(item) = self.queue.pop_front() {
            match item {
                Propagation::Direct { element, change } => self.set_bound(element, change),
                Propagation::Resolve { element, change } => {
                    let lookup: &Self = self;
                    let resolved: Vec<(ElementId, StateChange)> = lookup
                        .bindings
                        .matching(element, change.kind())
                        .filter_map(|entry| {
                            entry
                                .resolver
                                .resolve(lookup, entry.src, entry.tgt, &change)
                                .map(|value| (entry.tgt, value))
                        })
                        .collect();
                    for (target, value) in resolved {
                        debug!(
                            src = %element,
                            tgt = %target,
                            value = ?value,
                            "Resolving binding"
                        );
                        self.set_bound(target, value);
                    }
                }
            }
        }
    }

    /// Applies a bound value instantly, without resolving further bindings.
    fn set_bound(&mut self, element: ElementId, change: StateChange) {
        if !self.set_change(element, change, 0, Delay::NONE, UpdateSource::Bind) {
            debug!(element = %element, kind = ?change.kind(), "Bound state has no instance");
        }
    }

    fn invalidate_scenes(&mut self) {
        for instance in self.instances.values_mut() {
            if let ModelInstance::Scene(server) = instance {
                server.register.invalidate_current();
            }
        }
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Records a transaction and opens its de-duplication window.
    pub(super) fn accept(
        &mut self,
        key: InstanceKey,
        src: Address,
        tid: TransactionId,
        ack: Option<AckContext>,
    ) -> Result<(), MessageError> {
        let timeout_ms = self.config.transaction_timeout_ms;
        let txn = self
            .instances
            .get_mut(&key)
            .and_then(ModelInstance::transactions_mut)
            .ok_or(MessageError::NoInstance {
                element: key.element,
                model: key.model.name(),
            })?;
        txn.record.check(src, tid, ack)?;
        txn.timer = Some(
            self.timers
                .arm(ScheduledTask::TransactionExpiry(key), timeout_ms),
        );
        Ok(())
    }

    /// Sends the status owed for a delayed acknowledged request.
    fn acknowledge<S: Server>(&mut self, element: ElementId, ack: AckContext) {
        let tick_ms = self.config.tick_ms;
        let Some(server) = instance::<S>(&self.instances, element) else {
            return;
        };
        let status = server.status(tick_ms);
        debug!(element = %element, dst = %ack.dst, unicast = ack.unicast, "Sending deferred status");
        self.transport
            .send(element, ack.dst, ack.app_key_index, &status);
    }
}
