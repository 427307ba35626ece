// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model server instances.
//!
//! Each server struct owns the state of one model on one element. The node
//! keeps them in an arena keyed by [`InstanceKey`] and drives them through
//! a shared engine, so a server only describes what is specific to its
//! model: value clamping, status layout, side effects of a present value
//! change and links to sibling instances.
//!
//! # Model Kinds
//!
//! | Kind | Server | State |
//! |------|--------|-------|
//! | [`ModelKind::GenericOnOff`] | [`OnOffServer`] | [`OnOff`] |
//! | [`ModelKind::GenericLevel`] | [`LevelServer`] | [`Level`] |
//! | [`ModelKind::GenericDefaultTransition`] | [`DefaultTransitionServer`] | [`TransitionTime`] |
//! | [`ModelKind::LightLightness`] | [`LightnessServer`] | [`Lightness`] |
//! | [`ModelKind::LightCtl`] | [`CtlServer`] | [`CtlState`] |
//! | [`ModelKind::LightCtlTemperature`] | [`CtlTemperatureServer`] | [`TemperatureState`] |
//! | [`ModelKind::LightHsl`] | [`HslServer`] | [`HslState`] |
//! | [`ModelKind::LightHslHue`] | [`HueServer`] | [`Hue`] |
//! | [`ModelKind::LightHslSaturation`] | [`SaturationServer`] | [`Saturation`] |
//! | [`ModelKind::Scene`] | [`SceneServer`] | scene register |

mod default_transition;
mod generic_level;
mod generic_onoff;
mod light_ctl;
mod light_hsl;
mod light_lightness;
mod scene_server;

use std::fmt;

pub use default_transition::DefaultTransitionServer;
pub use generic_level::LevelServer;
pub use generic_onoff::OnOffServer;
pub use light_ctl::{CtlServer, CtlTemperatureServer};
pub use light_hsl::{HslServer, HueServer, SaturationServer};
pub use light_lightness::LightnessServer;
pub use scene_server::SceneServer;

pub(crate) use generic_level::Ramp;
pub(crate) use scene_server::PendingRecall;

use crate::message::{StatusMessage, Target};
use crate::scene::SceneSlots;
use crate::state::StateChange;
use crate::timer::TimerHandle;
use crate::transition::{Interpolate, TransactionRecord, Transition};
use crate::types::{
    CtlState, ElementId, HslRange, HslState, Hue, Level, Lightness, LightnessRange, OnOff,
    Saturation, SceneNumber, TemperatureRange, TemperatureState, TransitionTime,
};

/// Identifies a model type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum ModelKind {
    /// Generic OnOff Server.
    GenericOnOff,
    /// Generic Level Server.
    GenericLevel,
    /// Generic Default Transition Time Server.
    GenericDefaultTransition,
    /// Light Lightness Server.
    LightLightness,
    /// Light CTL Server.
    LightCtl,
    /// Light CTL Temperature Server.
    LightCtlTemperature,
    /// Light HSL Server.
    LightHsl,
    /// Light HSL Hue Server.
    LightHslHue,
    /// Light HSL Saturation Server.
    LightHslSaturation,
    /// Scene Server.
    Scene,
}

impl ModelKind {
    /// Returns the model name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GenericOnOff => "Generic OnOff",
            Self::GenericLevel => "Generic Level",
            Self::GenericDefaultTransition => "Generic Default Transition Time",
            Self::LightLightness => "Light Lightness",
            Self::LightCtl => "Light CTL",
            Self::LightCtlTemperature => "Light CTL Temperature",
            Self::LightHsl => "Light HSL",
            Self::LightHslHue => "Light HSL Hue",
            Self::LightHslSaturation => "Light HSL Saturation",
            Self::Scene => "Scene",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Arena key of a model instance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct InstanceKey {
    /// Hosting element.
    pub element: ElementId,
    /// Model type.
    pub model: ModelKind,
}

impl InstanceKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(element: ElementId, model: ModelKind) -> Self {
        Self { element, model }
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.model, self.element)
    }
}

/// Persistent state of one model instance.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ModelSnapshot {
    /// Generic OnOff.
    OnOff {
        /// Present state.
        present: OnOff,
        /// Target state.
        target: OnOff,
    },
    /// Generic Level.
    Level {
        /// Present level.
        present: Level,
        /// Target level.
        target: Level,
    },
    /// Generic Default Transition Time.
    DefaultTransition(TransitionTime),
    /// Light Lightness.
    Lightness {
        /// Present actual lightness.
        present: Lightness,
        /// Target actual lightness.
        target: Lightness,
        /// Last non-zero lightness.
        last: Lightness,
        /// Default lightness.
        default: Lightness,
        /// Lightness range.
        range: LightnessRange,
    },
    /// Light CTL.
    Ctl {
        /// Present state.
        present: CtlState,
        /// Target state.
        target: CtlState,
        /// Default state.
        default: CtlState,
        /// Temperature range.
        range: TemperatureRange,
    },
    /// Light CTL Temperature.
    CtlTemperature {
        /// Present state.
        present: TemperatureState,
        /// Target state.
        target: TemperatureState,
    },
    /// Light HSL.
    Hsl {
        /// Present state.
        present: HslState,
        /// Target state.
        target: HslState,
        /// Default state.
        default: HslState,
        /// Hue and saturation ranges.
        range: HslRange,
    },
    /// Light HSL Hue.
    Hue {
        /// Present hue.
        present: Hue,
        /// Target hue.
        target: Hue,
    },
    /// Light HSL Saturation.
    Saturation {
        /// Present saturation.
        present: Saturation,
        /// Target saturation.
        target: Saturation,
    },
    /// Scene register.
    Scene {
        /// Current scene.
        current: Option<SceneNumber>,
        /// Stored scene numbers.
        scenes: Vec<SceneNumber>,
    },
}

impl ModelSnapshot {
    /// Returns the model this snapshot belongs to.
    #[must_use]
    pub const fn kind(&self) -> ModelKind {
        match self {
            Self::OnOff { .. } => ModelKind::GenericOnOff,
            Self::Level { .. } => ModelKind::GenericLevel,
            Self::DefaultTransition(_) => ModelKind::GenericDefaultTransition,
            Self::Lightness { .. } => ModelKind::LightLightness,
            Self::Ctl { .. } => ModelKind::LightCtl,
            Self::CtlTemperature { .. } => ModelKind::LightCtlTemperature,
            Self::Hsl { .. } => ModelKind::LightHsl,
            Self::Hue { .. } => ModelKind::LightHslHue,
            Self::Saturation { .. } => ModelKind::LightHslSaturation,
            Self::Scene { .. } => ModelKind::Scene,
        }
    }
}

// ============================================================================
// Shared server state
// ============================================================================

/// De-duplication record and its expiry timer.
#[derive(Debug, Default)]
pub(crate) struct Transactions {
    pub(crate) record: TransactionRecord,
    pub(crate) timer: Option<TimerHandle>,
}

/// State shared by every transitioned server.
#[derive(Debug)]
pub(crate) struct ServerCore<V: Interpolate> {
    pub(crate) transition: Transition<V>,
    pub(crate) txn: Transactions,
    pub(crate) scenes: SceneSlots<V>,
    pub(crate) timer: Option<TimerHandle>,
}

impl<V: Interpolate> ServerCore<V> {
    pub(crate) fn new(initial: V, scene_capacity: usize) -> Self {
        Self {
            transition: Transition::new(initial),
            txn: Transactions::default(),
            scenes: SceneSlots::new(scene_capacity),
            timer: None,
        }
    }

    pub(crate) fn present(&self) -> V {
        self.transition.present()
    }

    pub(crate) fn target(&self) -> V {
        self.transition.target()
    }

    /// Time left before the target is reached, `None` when idle.
    pub(crate) fn remaining(&self, tick_ms: u32) -> Option<TransitionTime> {
        if !self.transition.is_active() {
            return None;
        }
        let armed = self.timer.as_ref().map_or(0, TimerHandle::remaining_ms);
        Some(TransitionTime::from_millis(
            armed.saturating_add(self.transition.remaining_after_timer(tick_ms)),
        ))
    }

    /// Takes values written by a linked instance. Any walk of this
    /// instance's own is dropped, so the latest writer owns the shared state.
    pub(crate) fn overwrite(&mut self, present: V, target: V) {
        self.timer = None;
        self.transition.stop();
        self.transition.set_present(present);
        self.transition.set_target(target);
    }

    /// Target that survives an overwrite: the present value while a walk
    /// of this instance's own is running.
    pub(crate) fn resting_target(&self) -> V {
        if self.transition.is_active() {
            self.present()
        } else {
            self.target()
        }
    }

    pub(crate) fn target_status(&self, tick_ms: u32) -> Option<Target<V>> {
        self.remaining(tick_ms)
            .map(|remaining| Target::new(self.target(), remaining))
    }
}

/// Silent write into a sibling instance that shares part of the state.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Link {
    CtlToTemperature {
        element: ElementId,
        present: TemperatureState,
        target: TemperatureState,
    },
    TemperatureToCtl {
        element: ElementId,
        present: TemperatureState,
        target: TemperatureState,
    },
    HslToHue {
        element: ElementId,
        present: Hue,
        target: Hue,
    },
    HueToHsl {
        element: ElementId,
        present: Hue,
        target: Hue,
    },
    HslToSaturation {
        element: ElementId,
        present: Saturation,
        target: Saturation,
    },
    SaturationToHsl {
        element: ElementId,
        present: Saturation,
        target: Saturation,
    },
}

/// Behaviour the transition engine needs from a server.
pub(crate) trait Server: Sized {
    type Value: Interpolate;

    const KIND: ModelKind;

    fn get(instance: &ModelInstance) -> Option<&Self>;

    fn get_mut(instance: &mut ModelInstance) -> Option<&mut Self>;

    fn core(&self) -> &ServerCore<Self::Value>;

    fn core_mut(&mut self) -> &mut ServerCore<Self::Value>;

    /// Constrains a requested target.
    fn clamp(&self, value: Self::Value) -> Self::Value {
        value
    }

    /// Called before a new transition replaces the current one.
    fn on_start(&mut self) {}

    /// Called after the present value was written.
    fn present_written(&mut self) {}

    /// Whether the present value jumps to the target when the transition
    /// starts rather than when it ends.
    fn starts_early(&self) -> bool {
        false
    }

    fn change(&self) -> StateChange;

    fn status(&self, tick_ms: u32) -> StatusMessage;

    fn links(&self) -> Vec<Link> {
        Vec::new()
    }

    /// Same-element states derived from this one.
    fn extends(&self) -> Vec<StateChange> {
        Vec::new()
    }

    fn snapshot(&self) -> ModelSnapshot;
}

macro_rules! instance_accessors {
    ($variant:ident) => {
        fn get(instance: &ModelInstance) -> Option<&Self> {
            match instance {
                ModelInstance::$variant(server) => Some(server),
                _ => None,
            }
        }

        fn get_mut(instance: &mut ModelInstance) -> Option<&mut Self> {
            match instance {
                ModelInstance::$variant(server) => Some(server),
                _ => None,
            }
        }

        fn core(&self) -> &ServerCore<Self::Value> {
            &self.core
        }

        fn core_mut(&mut self) -> &mut ServerCore<Self::Value> {
            &mut self.core
        }
    };
}

pub(crate) use instance_accessors;

// ============================================================================
// Arena entry
// ============================================================================

/// One model instance in the node arena.
#[derive(Debug)]
pub enum ModelInstance {
    /// Generic OnOff Server.
    OnOff(OnOffServer),
    /// Generic Level Server.
    Level(LevelServer),
    /// Generic Default Transition Time Server.
    DefaultTransition(DefaultTransitionServer),
    /// Light Lightness Server.
    Lightness(LightnessServer),
    /// Light CTL Server.
    Ctl(CtlServer),
    /// Light CTL Temperature Server.
    CtlTemperature(CtlTemperatureServer),
    /// Light HSL Server.
    Hsl(HslServer),
    /// Light HSL Hue Server.
    Hue(HueServer),
    /// Light HSL Saturation Server.
    Saturation(SaturationServer),
    /// Scene Server.
    Scene(SceneServer),
}

impl ModelInstance {
    /// Returns the model type.
    #[must_use]
    pub const fn kind(&self) -> ModelKind {
        match self {
            Self::OnOff(_) => ModelKind::GenericOnOff,
            Self::Level(_) => ModelKind::GenericLevel,
            Self::DefaultTransition(_) => ModelKind::GenericDefaultTransition,
            Self::Lightness(_) => ModelKind::LightLightness,
            Self::Ctl(_) => ModelKind::LightCtl,
            Self::CtlTemperature(_) => ModelKind::LightCtlTemperature,
            Self::Hsl(_) => ModelKind::LightHsl,
            Self::Hue(_) => ModelKind::LightHslHue,
            Self::Saturation(_) => ModelKind::LightHslSaturation,
            Self::Scene(_) => ModelKind::Scene,
        }
    }

    /// Returns the present state as a change, for stateful models.
    #[must_use]
    pub fn present(&self) -> Option<StateChange> {
        match self {
            Self::OnOff(server) => Some(server.change()),
            Self::Level(server) => Some(server.change()),
            Self::Lightness(server) => Some(server.change()),
            Self::Ctl(server) => Some(server.change()),
            Self::CtlTemperature(server) => Some(server.change()),
            Self::Hsl(server) => Some(server.change()),
            Self::Hue(server) => Some(server.change()),
            Self::Saturation(server) => Some(server.change()),
            Self::DefaultTransition(_) | Self::Scene(_) => None,
        }
    }

    /// Returns the persistent state.
    #[must_use]
    pub fn snapshot(&self) -> ModelSnapshot {
        match self {
            Self::OnOff(server) => server.snapshot(),
            Self::Level(server) => server.snapshot(),
            Self::DefaultTransition(server) => server.snapshot(),
            Self::Lightness(server) => server.snapshot(),
            Self::Ctl(server) => server.snapshot(),
            Self::CtlTemperature(server) => server.snapshot(),
            Self::Hsl(server) => server.snapshot(),
            Self::Hue(server) => server.snapshot(),
            Self::Saturation(server) => server.snapshot(),
            Self::Scene(server) => server.snapshot(),
        }
    }

    pub(crate) fn transactions_mut(&mut self) -> Option<&mut Transactions> {
        match self {
            Self::OnOff(server) => Some(&mut server.core.txn),
            Self::Level(server) => Some(&mut server.core.txn),
            Self::Lightness(server) => Some(&mut server.core.txn),
            Self::Ctl(server) => Some(&mut server.core.txn),
            Self::CtlTemperature(server) => Some(&mut server.core.txn),
            Self::Hsl(server) => Some(&mut server.core.txn),
            Self::Hue(server) => Some(&mut server.core.txn),
            Self::Saturation(server) => Some(&mut server.core.txn),
            Self::Scene(server) => Some(&mut server.txn),
            Self::DefaultTransition(_) => None,
        }
    }

    /// Copies the present value into scene `slot`.
    ///
    /// Only primary lighting states take part in scenes. Sub-element states
    /// follow their main instance.
    pub(crate) fn store_scene(&mut self, slot: usize) -> bool {
        fn store<S: Server>(server: &mut S, slot: usize) -> bool {
            let core = server.core_mut();
            let present = core.present();
            core.scenes.store(slot, present);
            true
        }
        match self {
            Self::OnOff(server) => store(server, slot),
            Self::Level(server) => store(server, slot),
            Self::Lightness(server) => store(server, slot),
            Self::Ctl(server) => store(server, slot),
            Self::Hsl(server) => store(server, slot),
            Self::CtlTemperature(_)
            | Self::Hue(_)
            | Self::Saturation(_)
            | Self::DefaultTransition(_)
            | Self::Scene(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UpdateSource;

    #[test]
    fn instance_key_display() {
        let key = InstanceKey::new(ElementId::new(2), ModelKind::LightCtl);
        assert_eq!(key.to_string(), "Light CTL@2");
    }

    #[test]
    fn snapshot_kind() {
        let snapshot = ModelSnapshot::Level {
            present: Level::ZERO,
            target: Level::ZERO,
        };
        assert_eq!(snapshot.kind(), ModelKind::GenericLevel);
        assert_eq!(
            ModelSnapshot::DefaultTransition(TransitionTime::ZERO).kind(),
            ModelKind::GenericDefaultTransition
        );
    }

    #[test]
    fn only_primary_states_store_scenes() {
        let mut level = ModelInstance::Level(LevelServer::new(2));
        assert!(level.store_scene(1));
        let mut hue = ModelInstance::Hue(HueServer::new(2));
        assert!(!hue.store_scene(1));
    }

    #[test]
    fn core_reports_remaining_only_while_active() {
        let mut core = ServerCore::new(Level::ZERO, 1);
        assert_eq!(core.remaining(100), None);
        core.transition.start(
            Level::new(100),
            1_000,
            crate::types::Delay::NONE,
            UpdateSource::Client,
            100,
        );
        assert_eq!(core.remaining(100), Some(TransitionTime::from_millis(900)));
    }

    #[test]
    fn overwrite_drops_own_walk() {
        let mut core = ServerCore::new(Level::ZERO, 1);
        core.transition.start(
            Level::new(1000),
            1_000,
            crate::types::Delay::NONE,
            UpdateSource::Client,
            100,
        );
        assert_eq!(core.resting_target(), Level::ZERO);

        core.overwrite(Level::new(40), Level::new(50));
        assert!(!core.transition.is_active());
        assert_eq!(core.present(), Level::new(40));
        assert_eq!(core.resting_target(), Level::new(50));
        assert_eq!(core.remaining(100), None);
    }
}
