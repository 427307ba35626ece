// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene store, recall and delete.
//!
//! The register of the scene server picks the slot. Every stateful
//! instance of the node keeps its own value for that slot, and a recall
//! sets each of them back with the scene source so bindings stay quiet.

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::handler::no_instance;
use super::Node;
use crate::error::{Error, MessageError, Result};
use crate::event::NodeEvent;
use crate::message::{ModelMessage, Transaction};
use crate::models::{InstanceKey, ModelInstance, ModelKind, PendingRecall, SceneServer, Server};
use crate::scene::SceneStatusCode;
use crate::state::{StateChange, UpdateSource};
use crate::timer::ScheduledTask;
use crate::types::{Delay, ElementId, SceneNumber};

impl Node {
    // ========================================================================
    // Local API
    // ========================================================================

    /// Stores the present state of every model into scene `number` of the
    /// scene server on `element`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidElement` if `element` hosts no scene server.
    pub fn store_scene(
        &mut self,
        element: ElementId,
        number: SceneNumber,
    ) -> Result<SceneStatusCode> {
        self.scene_store(element, number)
            .ok_or(Error::InvalidElement(element))
    }

    /// Recalls scene `number` with the given transition and delay.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidElement` if `element` hosts no scene server.
    pub fn recall_scene(
        &mut self,
        element: ElementId,
        number: SceneNumber,
        transition_ms: u32,
        delay: Delay,
    ) -> Result<SceneStatusCode> {
        let status = self
            .scene_recall(element, number, transition_ms, delay)
            .ok_or(Error::InvalidElement(element))?;
        self.drain();
        Ok(status)
    }

    /// Deletes scene `number`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidElement` if `element` hosts no scene server.
    pub fn delete_scene(
        &mut self,
        element: ElementId,
        number: SceneNumber,
    ) -> Result<SceneStatusCode> {
        self.scene_delete(element, number)
            .ok_or(Error::InvalidElement(element))
    }

    // ========================================================================
    // Requests
    // ========================================================================

    pub(super) fn scene_get(&mut self, message: &ModelMessage) -> std::result::Result<(), MessageError> {
        let status = self.require_scene(message.element)?.status(SceneStatusCode::Success);
        self.reply(message, &status);
        Ok(())
    }

    pub(super) fn scene_register_get(
        &mut self,
        message: &ModelMessage,
    ) -> std::result::Result<(), MessageError> {
        let status = self
            .require_scene(message.element)?
            .register_status(SceneStatusCode::Success);
        self.reply(message, &status);
        Ok(())
    }

    pub(super) fn scene_store_request(
        &mut self,
        message: &ModelMessage,
        number: u16,
        acknowledged: bool,
    ) -> std::result::Result<(), MessageError> {
        let number = SceneNumber::new(number).map_err(|_| MessageError::ProhibitedSceneNumber)?;
        self.require_scene(message.element)?;
        let code = self
            .scene_store(message.element, number)
            .unwrap_or(SceneStatusCode::NotFound);
        if acknowledged {
            self.reply_register(message, code)?;
        }
        Ok(())
    }

    pub(super) fn scene_recall_request(
        &mut self,
        message: &ModelMessage,
        number: u16,
        txn: &Transaction,
    ) -> std::result::Result<(), MessageError> {
        let element = message.element;
        let number = SceneNumber::new(number).map_err(|_| MessageError::ProhibitedSceneNumber)?;
        self.require_scene(element)?;
        let (transition_ms, delay) = self.timing(element, txn)?;
        self.accept_request(InstanceKey::new(element, ModelKind::Scene), message, txn, delay)?;

        let code = self
            .scene_recall(element, number, transition_ms, delay)
            .unwrap_or(SceneStatusCode::NotFound);
        if txn.acknowledged && (delay.is_none() || code != SceneStatusCode::Success) {
            let status = self.require_scene(element)?.status(code);
            self.reply(message, &status);
        }
        Ok(())
    }

    pub(super) fn scene_delete_request(
        &mut self,
        message: &ModelMessage,
        number: u16,
        acknowledged: bool,
    ) -> std::result::Result<(), MessageError> {
        let number = SceneNumber::new(number).map_err(|_| MessageError::ProhibitedSceneNumber)?;
        self.require_scene(message.element)?;
        let code = self
            .scene_delete(message.element, number)
            .unwrap_or(SceneStatusCode::NotFound);
        if acknowledged {
            self.reply_register(message, code)?;
        }
        Ok(())
    }

    fn reply_register(
        &mut self,
        message: &ModelMessage,
        code: SceneStatusCode,
    ) -> std::result::Result<(), MessageError> {
        let status = self.require_scene(message.element)?.register_status(code);
        self.reply(message, &status);
        Ok(())
    }

    fn require_scene(&self, element: ElementId) -> std::result::Result<&SceneServer, MessageError> {
        self.scene_server(element)
            .ok_or(no_instance(element, ModelKind::Scene))
    }

    // ========================================================================
    // Operations
    // ========================================================================

    fn scene_store(&mut self, element: ElementId, number: SceneNumber) -> Option<SceneStatusCode> {
        let server = scene_mut(&mut self.instances, element)?;
        let code = match server.register.store(number) {
            Ok(slot) => {
                for instance in self.instances.values_mut() {
                    instance.store_scene(slot);
                }
                info!(element = %element, scene = %number, slot, "Stored scene");
                self.persist(InstanceKey::new(element, ModelKind::Scene));
                SceneStatusCode::Success
            }
            Err(code) => {
                debug!(element = %element, scene = %number, status = %code, "Scene not stored");
                code
            }
        };
        self.emit(NodeEvent::SceneRegisterUpdated {
            element,
            scene: number,
            status: code,
        });
        Some(code)
    }

    fn scene_delete(&mut self, element: ElementId, number: SceneNumber) -> Option<SceneStatusCode> {
        let server = scene_mut(&mut self.instances, element)?;
        if server.pending.is_some_and(|pending| pending.number == number) {
            server.cancel_recall();
        }
        let code = match server.register.delete(number) {
            Ok(_) => {
                info!(element = %element, scene = %number, "Deleted scene");
                self.persist(InstanceKey::new(element, ModelKind::Scene));
                SceneStatusCode::Success
            }
            Err(code) => code,
        };
        self.emit(NodeEvent::SceneRegisterUpdated {
            element,
            scene: number,
            status: code,
        });
        Some(code)
    }

    /// Starts a recall. The transition is skipped when the scene is
    /// already current.
    fn scene_recall(
        &mut self,
        element: ElementId,
        number: SceneNumber,
        transition_ms: u32,
        delay: Delay,
    ) -> Option<SceneStatusCode> {
        let server = scene_mut(&mut self.instances, element)?;
        let Some(slot) = server.register.find(number) else {
            debug!(element = %element, scene = %number, "Scene not found");
            return Some(SceneStatusCode::NotFound);
        };
        let transition_ms = if server.current() == Some(number) {
            0
        } else {
            transition_ms
        };
        server.cancel_recall();
        server.register.begin_recall(number);
        debug!(
            element = %element,
            scene = %number,
            transition_ms,
            delay_ms = delay.as_millis(),
            "Recalling scene"
        );

        let pending = PendingRecall {
            number,
            slot,
            transition_ms,
            delayed: !delay.is_none(),
        };
        if pending.delayed {
            server.pending = Some(pending);
            server.timer = Some(
                self.timers
                    .arm(ScheduledTask::SceneRecall(element), delay.as_millis()),
            );
        } else {
            self.apply_scene(element, pending);
        }
        Some(SceneStatusCode::Success)
    }

    /// Sets every model to its value in the recalled slot.
    fn apply_scene(&mut self, element: ElementId, pending: PendingRecall) {
        let slot = pending.slot;
        let values: Vec<(ElementId, StateChange)> = self
            .instances
            .iter()
            .filter_map(|(key, instance)| {
                let value = match instance {
                    ModelInstance::OnOff(server) => {
                        server.core().scenes.get(slot).map(StateChange::OnOff)
                    }
                    ModelInstance::Level(server) => {
                        server.core().scenes.get(slot).map(StateChange::Level)
                    }
                    ModelInstance::Lightness(server) => {
                        server.core().scenes.get(slot).map(StateChange::Lightness)
                    }
                    ModelInstance::Ctl(server) => server.core().scenes.get(slot).map(StateChange::Ctl),
                    ModelInstance::Hsl(server) => server.core().scenes.get(slot).map(StateChange::Hsl),
                    _ => None,
                };
                value.map(|value| (key.element, value))
            })
            .collect();

        for (target, value) in values {
            self.set_change(
                target,
                value,
                pending.transition_ms,
                Delay::NONE,
                UpdateSource::Scene,
            );
        }

        if pending.transition_ms > 0 {
            if let Some(server) = scene_mut(&mut self.instances, element) {
                server.pending = Some(PendingRecall {
                    delayed: false,
                    ..pending
                });
                server.timer = Some(self.timers.arm(
                    ScheduledTask::SceneRecall(element),
                    pending.transition_ms,
                ));
            }
        } else {
            self.finish_scene(element);
        }
    }

    fn finish_scene(&mut self, element: ElementId) {
        let Some(server) = scene_mut(&mut self.instances, element) else {
            return;
        };
        server.cancel_recall();
        let Some(number) = server.register.finish_recall() else {
            return;
        };
        let status = server.status(SceneStatusCode::Success);
        info!(element = %element, scene = %number, "Scene recalled");
        self.persist(InstanceKey::new(element, ModelKind::Scene));
        self.transport.publish(element, &status);
        self.emit(NodeEvent::SceneRecalled {
            element,
            scene: number,
        });
    }

    /// Expiry of a recall delay or of a recall transition.
    pub(super) fn scene_timer(&mut self, element: ElementId) {
        let Some(server) = scene_mut(&mut self.instances, element) else {
            return;
        };
        server.timer = None;
        let Some(pending) = server.pending.take() else {
            return;
        };
        if pending.delayed {
            let ack = server.txn.record.take_ack();
            self.apply_scene(element, pending);
            if let Some(ack) = ack {
                if let Some(server) = self.scene_server(element) {
                    let status = server.status(SceneStatusCode::Success);
                    self.transport
                        .send(element, ack.dst, ack.app_key_index, &status);
                }
            }
        } else {
            self.finish_scene(element);
        }
    }
}

fn scene_mut(
    instances: &mut BTreeMap<InstanceKey, ModelInstance>,
    element: ElementId,
) -> Option<&mut SceneServer> {
    match instances.get_mut(&InstanceKey::new(element, ModelKind::Scene)) {
        Some(ModelInstance::Scene(server)) => Some(server),
        _ => None,
    }
}
