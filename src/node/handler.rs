// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound request handling.

use tracing::debug;

use super::{instance, instance_mut, Node};
use crate::error::MessageError;
use crate::event::NodeEvent;
use crate::message::{ModelMessage, Request, StatusMessage, Transaction};
use crate::models::{
    CtlServer, CtlTemperatureServer, DefaultTransitionServer, HslServer, HueServer, InstanceKey,
    LevelServer, LightnessServer, ModelInstance, ModelKind, OnOffServer, Ramp, SaturationServer,
    Server,
};
use crate::state::UpdateSource;
use crate::transition::AckContext;
use crate::types::{
    CtlState, Delay, DeltaUv, ElementId, HslRange, HslState, Level, Lightness, LightnessRange,
    RangeStatus, Temperature, TemperatureRange, TemperatureState, TransitionTime,
};

/// Outcome of handling one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// The request was processed.
    Accepted,
    /// The request was dropped without a reply or a state change.
    Dropped(MessageError),
}

impl Handled {
    /// Returns `true` if the request was processed.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Builds a status from a server.
type StatusFn<S> = fn(&S, u32) -> StatusMessage;

impl Node {
    /// Handles one inbound model request.
    ///
    /// Replies go to the request's source through the transport. Bound
    /// states affected by the request are updated before this returns.
    pub fn handle(&mut self, message: &ModelMessage) -> Handled {
        let outcome = self.dispatch(message);
        self.drain();
        match outcome {
            Ok(()) => Handled::Accepted,
            Err(reason) => {
                debug!(
                    element = %message.element,
                    src = %message.src,
                    reason = %reason,
                    "Dropping request"
                );
                Handled::Dropped(reason)
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn dispatch(&mut self, message: &ModelMessage) -> Result<(), MessageError> {
        let element = message.element;
        match &message.request {
            // Generic OnOff
            Request::OnOffGet => self.reply_status::<OnOffServer>(message, OnOffServer::status),
            Request::OnOffSet { state, txn } => {
                self.transactional_set::<OnOffServer>(message, *state, txn, OnOffServer::status)
            }

            // Generic Level
            Request::LevelGet => self.reply_status::<LevelServer>(message, LevelServer::status),
            Request::LevelSet { level, txn } => {
                self.transactional_set::<LevelServer>(message, *level, txn, LevelServer::status)
            }
            Request::DeltaSet { delta, txn } => self.delta_set(message, *delta, txn),
            Request::MoveSet { delta, txn } => self.move_set(message, *delta, txn),

            // Generic Default Transition Time
            Request::DefaultTransitionGet => {
                let status = self.require_default_transition(element)?.status();
                self.reply(message, &status);
                Ok(())
            }
            Request::DefaultTransitionSet { time, acknowledged } => {
                self.default_transition_set(message, *time, *acknowledged)
            }

            // Light Lightness
            Request::LightnessGet => {
                self.reply_status::<LightnessServer>(message, LightnessServer::status)
            }
            Request::LightnessSet { lightness, txn } => self.transactional_set::<LightnessServer>(
                message,
                *lightness,
                txn,
                LightnessServer::status,
            ),
            Request::LightnessLinearGet => {
                self.reply_status::<LightnessServer>(message, LightnessServer::linear_status)
            }
            Request::LightnessLinearSet { linear, txn } => self
                .transactional_set::<LightnessServer>(
                    message,
                    Lightness::from_linear(*linear),
                    txn,
                    LightnessServer::linear_status,
                ),
            Request::LightnessLastGet => self.reply_status::<LightnessServer>(message, |server, _| {
                StatusMessage::LightnessLast(server.last())
            }),
            Request::LightnessDefaultGet => {
                self.reply_status::<LightnessServer>(message, |server, _| {
                    StatusMessage::LightnessDefault(server.default_lightness())
                })
            }
            Request::LightnessDefaultSet {
                lightness,
                acknowledged,
            } => {
                let server = require_mut::<LightnessServer>(self, element)?;
                server.default = *lightness;
                let status = StatusMessage::LightnessDefault(*lightness);
                self.setting_updated(message, ModelKind::LightLightness, &status, *acknowledged);
                Ok(())
            }
            Request::LightnessRangeGet => self.reply_status::<LightnessServer>(message, |server, _| {
                server.range_status(RangeStatus::Success)
            }),
            Request::LightnessRangeSet {
                min,
                max,
                acknowledged,
            } => self.lightness_range_set(message, *min, *max, *acknowledged),

            // Light CTL
            Request::CtlGet => self.reply_status::<CtlServer>(message, CtlServer::status),
            Request::CtlSet {
                lightness,
                temperature,
                delta_uv,
                txn,
            } => {
                let target = CtlState::new(*lightness, Temperature::clamped(*temperature), *delta_uv);
                self.transactional_set::<CtlServer>(message, target, txn, CtlServer::status)
            }
            Request::CtlTemperatureGet => {
                self.reply_status::<CtlTemperatureServer>(message, CtlTemperatureServer::status)
            }
            Request::CtlTemperatureSet {
                temperature,
                delta_uv,
                txn,
            } => {
                let target = TemperatureState::new(Temperature::clamped(*temperature), *delta_uv);
                self.transactional_set::<CtlTemperatureServer>(
                    message,
                    target,
                    txn,
                    CtlTemperatureServer::status,
                )
            }
            Request::CtlTemperatureRangeGet => self.reply_status::<CtlServer>(message, |server, _| {
                server.range_status(RangeStatus::Success)
            }),
            Request::CtlTemperatureRangeSet {
                min,
                max,
                acknowledged,
            } => self.ctl_temperature_range_set(message, *min, *max, *acknowledged),
            Request::CtlDefaultGet => self.reply_status::<CtlServer>(message, |server, _| {
                StatusMessage::CtlDefault(server.default_state())
            }),
            Request::CtlDefaultSet {
                lightness,
                temperature,
                delta_uv,
                acknowledged,
            } => self.ctl_default_set(message, *lightness, *temperature, *delta_uv, *acknowledged),

            // Light HSL
            Request::HslGet => self.reply_status::<HslServer>(message, HslServer::status),
            Request::HslTargetGet => {
                self.reply_status::<HslServer>(message, HslServer::target_status)
            }
            Request::HslSet { state, txn } => {
                self.transactional_set::<HslServer>(message, *state, txn, HslServer::status)
            }
            Request::HslHueGet => self.reply_status::<HueServer>(message, HueServer::status),
            Request::HslHueSet { hue, txn } => {
                self.transactional_set::<HueServer>(message, *hue, txn, HueServer::status)
            }
            Request::HslSaturationGet => {
                self.reply_status::<SaturationServer>(message, SaturationServer::status)
            }
            Request::HslSaturationSet { saturation, txn } => self
                .transactional_set::<SaturationServer>(
                    message,
                    *saturation,
                    txn,
                    SaturationServer::status,
                ),
            Request::HslDefaultGet => self.reply_status::<HslServer>(message, |server, _| {
                StatusMessage::HslDefault(server.default_state())
            }),
            Request::HslDefaultSet {
                state,
                acknowledged,
            } => self.hsl_default_set(message, *state, *acknowledged),
            Request::HslRangeGet => self.reply_status::<HslServer>(message, |server, _| {
                server.range_status(RangeStatus::Success)
            }),
            Request::HslRangeSet {
                hue_min,
                hue_max,
                saturation_min,
                saturation_max,
                acknowledged,
            } => {
                let range = HslRange::new(*hue_min, *hue_max, *saturation_min, *saturation_max)
                    .map_err(|_| MessageError::ProhibitedValue)?;
                self.hsl_range_set(message, range, *acknowledged)
            }

            // Scene
            Request::SceneGet => self.scene_get(message),
            Request::SceneRegisterGet => self.scene_register_get(message),
            Request::SceneStore {
                number,
                acknowledged,
            } => self.scene_store_request(message, *number, *acknowledged),
            Request::SceneRecall { number, txn } => {
                self.scene_recall_request(message, *number, txn)
            }
            Request::SceneDelete {
                number,
                acknowledged,
            } => self.scene_delete_request(message, *number, *acknowledged),
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    pub(super) fn reply(&mut self, message: &ModelMessage, status: &StatusMessage) {
        self.transport
            .send(message.element, message.src, message.app_key_index, status);
    }

    fn reply_status<S: Server>(
        &mut self,
        message: &ModelMessage,
        status: StatusFn<S>,
    ) -> Result<(), MessageError> {
        let status = status(require::<S>(self, message.element)?, self.config.tick_ms);
        self.reply(message, &status);
        Ok(())
    }

    /// Resolves the transition time and delay of a request. Requests
    /// without timing use the element's default transition time.
    pub(super) fn timing(
        &self,
        element: ElementId,
        txn: &Transaction,
    ) -> Result<(u32, Delay), MessageError> {
        match txn.timing {
            Some(timing) => {
                let transition_ms = timing.transition.as_millis().ok_or(
                    MessageError::ProhibitedTransitionTime(timing.transition.raw()),
                )?;
                Ok((transition_ms, timing.delay))
            }
            None => Ok((self.default_transition_ms(element), Delay::NONE)),
        }
    }

    /// Default transition time for `element`. Sub-elements use the one of
    /// their main element.
    fn default_transition_ms(&self, element: ElementId) -> u32 {
        if let Some(server) = self.default_transition_server(element) {
            return server.millis();
        }
        let main = self
            .ctl_temperature_server(element)
            .and_then(CtlTemperatureServer::main_element)
            .or_else(|| self.hue_server(element).and_then(HueServer::main_element))
            .or_else(|| {
                self.saturation_server(element)
                    .and_then(SaturationServer::main_element)
            });
        main.and_then(|main| self.default_transition_server(main))
            .map_or(0, DefaultTransitionServer::millis)
    }

    fn require_default_transition(
        &self,
        element: ElementId,
    ) -> Result<&DefaultTransitionServer, MessageError> {
        self.default_transition_server(element)
            .ok_or(no_instance(element, ModelKind::GenericDefaultTransition))
    }

    /// Accepts a transaction and, when its acknowledgement must wait for a
    /// delay, records where to send it.
    pub(super) fn accept_request(
        &mut self,
        key: InstanceKey,
        message: &ModelMessage,
        txn: &Transaction,
        delay: Delay,
    ) -> Result<(), MessageError> {
        let deferred = (txn.acknowledged && !delay.is_none()).then(|| ack_context(message));
        self.accept(key, message.src, txn.tid, deferred)
    }

    /// Set, Set Unacknowledged and their transition and delay handling.
    fn transactional_set<S: Server>(
        &mut self,
        message: &ModelMessage,
        target: S::Value,
        txn: &Transaction,
        status: StatusFn<S>,
    ) -> Result<(), MessageError> {
        let element = message.element;
        require::<S>(self, element)?;
        let (transition_ms, delay) = self.timing(element, txn)?;
        self.accept_request(InstanceKey::new(element, S::KIND), message, txn, delay)?;
        self.set_state::<S>(element, target, transition_ms, delay, UpdateSource::Client);
        if txn.acknowledged && delay.is_none() {
            self.reply_status::<S>(message, status)?;
        }
        Ok(())
    }

    /// Publishes a changed setting, saves it and acknowledges it.
    fn setting_updated(
        &mut self,
        message: &ModelMessage,
        model: ModelKind,
        status: &StatusMessage,
        acknowledged: bool,
    ) {
        let element = message.element;
        self.persist(InstanceKey::new(element, model));
        self.emit(NodeEvent::DefaultUpdated { element, model });
        self.transport.publish(element, status);
        if acknowledged {
            self.reply(message, status);
        }
    }

    fn range_updated(
        &mut self,
        message: &ModelMessage,
        model: ModelKind,
        range_status: RangeStatus,
        status: &StatusMessage,
        acknowledged: bool,
    ) {
        let element = message.element;
        if range_status.is_success() {
            self.persist(InstanceKey::new(element, model));
            self.transport.publish(element, status);
        }
        self.emit(NodeEvent::RangeUpdated {
            element,
            model,
            status: range_status,
        });
        if acknowledged {
            self.reply(message, status);
        }
    }

    // ========================================================================
    // Generic Level
    // ========================================================================

    /// Delta Set. A retransmission of the live transaction recomputes the
    /// target from the level the transaction started at.
    fn delta_set(
        &mut self,
        message: &ModelMessage,
        delta: i32,
        txn: &Transaction,
    ) -> Result<(), MessageError> {
        let element = message.element;
        let key = InstanceKey::new(element, ModelKind::GenericLevel);
        let (transition_ms, delay) = {
            require::<LevelServer>(self, element)?;
            self.timing(element, txn)?
        };

        let server = require_mut::<LevelServer>(self, element)?;
        let base = if server.core.txn.record.matches(message.src, txn.tid) {
            server.delta_base
        } else {
            let present = server.present();
            self.accept_request(key, message, txn, delay)?;
            require_mut::<LevelServer>(self, element)?.delta_base = present;
            present
        };

        let target = Level::saturating(i32::from(base.value()) + delta);
        debug!(element = %element, base = %base, delta, "Delta set");
        self.set_state::<LevelServer>(element, target, transition_ms, delay, UpdateSource::Client);
        if txn.acknowledged && delay.is_none() {
            self.reply_status::<LevelServer>(message, LevelServer::status)?;
        }
        Ok(())
    }

    /// Move Set: ramps the level toward the bound in the direction of
    /// `delta`, moving `delta` every transition time.
    fn move_set(
        &mut self,
        message: &ModelMessage,
        delta: i16,
        txn: &Transaction,
    ) -> Result<(), MessageError> {
        let element = message.element;
        let key = InstanceKey::new(element, ModelKind::GenericLevel);
        require::<LevelServer>(self, element)?;
        if let Some(timing) = txn.timing {
            if timing.transition.raw() == 0 {
                return Err(MessageError::ProhibitedTransitionTime(0));
            }
        }
        let (transition_ms, delay) = self.timing(element, txn)?;
        self.accept_request(key, message, txn, delay)?;

        let interval_ms = self.config.move_interval_ms;
        let server = require_mut::<LevelServer>(self, element)?;
        server.core.timer = None;
        if delta == 0 || transition_ms == 0 {
            debug!(element = %element, "Stopping move");
            server.ramp = None;
            server.core.transition.stop();
        } else {
            let ramp = Ramp::new(delta, transition_ms, interval_ms);
            debug!(
                element = %element,
                velocity = ramp.velocity,
                interval_ms = ramp.interval_ms,
                "Starting move"
            );
            let schedule = server.core.transition.start_ramp(
                ramp.bound(),
                ramp.interval_ms,
                delay,
                UpdateSource::Client,
            );
            server.ramp = Some(ramp);
            self.follow::<LevelServer>(element, schedule);
        }

        if txn.acknowledged && delay.is_none() {
            self.reply_status::<LevelServer>(message, LevelServer::status)?;
        }
        Ok(())
    }

    // ========================================================================
    // Settings
    // ========================================================================

    fn default_transition_set(
        &mut self,
        message: &ModelMessage,
        time: TransitionTime,
        acknowledged: bool,
    ) -> Result<(), MessageError> {
        let element = message.element;
        if time.is_unknown() {
            return Err(MessageError::ProhibitedTransitionTime(time.raw()));
        }
        let key = InstanceKey::new(element, ModelKind::GenericDefaultTransition);
        match self.instances.get_mut(&key) {
            Some(ModelInstance::DefaultTransition(server)) => server.set_time(time),
            _ => return Err(no_instance(element, ModelKind::GenericDefaultTransition)),
        }
        let status = StatusMessage::DefaultTransition(time);
        self.setting_updated(
            message,
            ModelKind::GenericDefaultTransition,
            &status,
            acknowledged,
        );
        Ok(())
    }

    fn lightness_range_set(
        &mut self,
        message: &ModelMessage,
        min: u16,
        max: u16,
        acknowledged: bool,
    ) -> Result<(), MessageError> {
        let element = message.element;
        require::<LightnessServer>(self, element)?;
        let range_status = if min == 0 {
            RangeStatus::CannotSetRangeMin
        } else if max == 0 {
            RangeStatus::CannotSetRangeMax
        } else {
            let range = LightnessRange::new(Lightness::new(min), Lightness::new(max))
                .map_err(|_| MessageError::ProhibitedValue)?;
            require_mut::<LightnessServer>(self, element)?.range = range;
            RangeStatus::Success
        };
        let status = require::<LightnessServer>(self, element)?.range_status(range_status);
        self.range_updated(
            message,
            ModelKind::LightLightness,
            range_status,
            &status,
            acknowledged,
        );
        Ok(())
    }

    fn ctl_temperature_range_set(
        &mut self,
        message: &ModelMessage,
        min: u16,
        max: u16,
        acknowledged: bool,
    ) -> Result<(), MessageError> {
        let element = message.element;
        require::<CtlServer>(self, element)?;
        let range_status = match (Temperature::new(min), Temperature::new(max)) {
            (Err(_), _) => RangeStatus::CannotSetRangeMin,
            (_, Err(_)) => RangeStatus::CannotSetRangeMax,
            (Ok(min), Ok(max)) => {
                let range =
                    TemperatureRange::new(min, max).map_err(|_| MessageError::ProhibitedValue)?;
                let server = require_mut::<CtlServer>(self, element)?;
                server.range = range;
                if let Some(sub) = server.temperature_element {
                    if let Some(temperature) =
                        instance_mut::<CtlTemperatureServer>(&mut self.instances, sub)
                    {
                        temperature.range = range;
                    }
                }
                RangeStatus::Success
            }
        };
        let status = require::<CtlServer>(self, element)?.range_status(range_status);
        self.range_updated(
            message,
            ModelKind::LightCtl,
            range_status,
            &status,
            acknowledged,
        );
        Ok(())
    }

    fn ctl_default_set(
        &mut self,
        message: &ModelMessage,
        lightness: Lightness,
        temperature: u16,
        delta_uv: DeltaUv,
        acknowledged: bool,
    ) -> Result<(), MessageError> {
        let server = require_mut::<CtlServer>(self, message.element)?;
        let default = CtlState::new(lightness, server.range.clamp(temperature), delta_uv);
        server.default = default;
        let status = StatusMessage::CtlDefault(default);
        self.setting_updated(message, ModelKind::LightCtl, &status, acknowledged);
        Ok(())
    }

    fn hsl_default_set(
        &mut self,
        message: &ModelMessage,
        state: HslState,
        acknowledged: bool,
    ) -> Result<(), MessageError> {
        let server = require_mut::<HslServer>(self, message.element)?;
        let default = server.clamp(state);
        server.default = default;
        let status = StatusMessage::HslDefault(default);
        self.setting_updated(message, ModelKind::LightHsl, &status, acknowledged);
        Ok(())
    }

    fn hsl_range_set(
        &mut self,
        message: &ModelMessage,
        range: HslRange,
        acknowledged: bool,
    ) -> Result<(), MessageError> {
        let element = message.element;
        let server = require_mut::<HslServer>(self, element)?;
        server.range = range;
        let (hue, saturation) = (server.hue_element, server.saturation_element);
        if let Some(hue) = hue.and_then(|sub| instance_mut::<HueServer>(&mut self.instances, sub))
        {
            hue.range = range;
        }
        if let Some(saturation) = saturation
            .and_then(|sub| instance_mut::<SaturationServer>(&mut self.instances, sub))
        {
            saturation.range = range;
        }
        let status = require::<HslServer>(self, element)?.range_status(RangeStatus::Success);
        self.range_updated(
            message,
            ModelKind::LightHsl,
            RangeStatus::Success,
            &status,
            acknowledged,
        );
        Ok(())
    }
}

fn ack_context(message: &ModelMessage) -> AckContext {
    AckContext {
        dst: message.src,
        app_key_index: message.app_key_index,
        unicast: message.unicast,
    }
}

pub(super) fn no_instance(element: ElementId, model: ModelKind) -> MessageError {
    MessageError::NoInstance {
        element,
        model: model.name(),
    }
}

fn require<S: Server>(node: &Node, element: ElementId) -> Result<&S, MessageError> {
    instance::<S>(&node.instances, element).ok_or(no_instance(element, S::KIND))
}

fn require_mut<S: Server>(node: &mut Node, element: ElementId) -> Result<&mut S, MessageError> {
    instance_mut::<S>(&mut node.instances, element).ok_or(no_instance(element, S::KIND))
}
