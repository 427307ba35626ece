// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! A [`StateChange`] carries the new present value of one model state. The
//! same value travels in upper-layer events and through the binding graph,
//! where a resolver turns the change of a source state into the change of
//! a bound target state.
//!
//! # Change Types
//!
//! - [`StateChange::OnOff`] - Generic OnOff
//! - [`StateChange::Level`] - Generic Level
//! - [`StateChange::Lightness`] - Light Lightness Actual
//! - [`StateChange::LightnessLinear`] - Light Lightness Linear
//! - [`StateChange::Ctl`] / [`StateChange::CtlTemperature`] - Light CTL
//! - [`StateChange::Hsl`] / [`StateChange::Hue`] / [`StateChange::Saturation`] - Light HSL
//!
//! # Examples
//!
//! ```
//! use mesh_lighting::state::{StateChange, StateKind};
//! use mesh_lighting::types::{Level, Lightness};
//!
//! let change = StateChange::lightness(Lightness::new(0x8000));
//! assert_eq!(change.kind(), StateKind::LightLightnessActual);
//! assert!(change.is_light());
//!
//! let level = StateChange::level(Level::ZERO);
//! assert!(!level.is_light());
//! ```

use crate::types::{
    CtlState, HslState, Hue, Level, Lightness, OnOff, Saturation, TemperatureState,
};

/// Identifies a bindable state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum StateKind {
    /// Generic OnOff.
    GenericOnOff,
    /// Generic Level.
    GenericLevel,
    /// Light Lightness Actual.
    LightLightnessActual,
    /// Light Lightness Linear.
    LightLightnessLinear,
    /// Light CTL (lightness, temperature, delta UV).
    LightCtl,
    /// Light CTL Temperature (temperature, delta UV).
    LightCtlTemperature,
    /// Light HSL (lightness, hue, saturation).
    LightHsl,
    /// Light HSL Hue.
    LightHslHue,
    /// Light HSL Saturation.
    LightHslSaturation,
}

/// What triggered a state update.
///
/// Updates from [`UpdateSource::Bind`] and [`UpdateSource::Scene`] never
/// trigger further binding resolution.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum UpdateSource {
    /// A client message.
    #[default]
    Client,
    /// A binding with another state.
    Bind,
    /// A scene recall.
    Scene,
    /// The local application.
    App,
}

impl UpdateSource {
    /// Returns `true` when updates from this source do not resolve bindings.
    #[must_use]
    pub const fn is_damped(&self) -> bool {
        matches!(self, Self::Bind | Self::Scene)
    }
}

/// Represents a change of one model state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// Generic OnOff changed.
    OnOff(OnOff),

    /// Generic Level changed.
    Level(Level),

    /// Light Lightness Actual changed.
    Lightness(Lightness),

    /// Light Lightness Linear changed.
    LightnessLinear(u16),

    /// Light CTL changed.
    Ctl(CtlState),

    /// Light CTL Temperature changed.
    CtlTemperature(TemperatureState),

    /// Light HSL changed.
    Hsl(HslState),

    /// Light HSL Hue changed.
    Hue(Hue),

    /// Light HSL Saturation changed.
    Saturation(Saturation),
}

impl StateChange {
    /// Creates an OnOff change.
    #[must_use]
    pub fn on_off(value: OnOff) -> Self {
        Self::OnOff(value)
    }

    /// Creates a level change.
    #[must_use]
    pub fn level(value: Level) -> Self {
        Self::Level(value)
    }

    /// Creates a lightness change.
    #[must_use]
    pub fn lightness(value: Lightness) -> Self {
        Self::Lightness(value)
    }

    /// Creates a CTL change.
    #[must_use]
    pub fn ctl(value: CtlState) -> Self {
        Self::Ctl(value)
    }

    /// Creates an HSL change.
    #[must_use]
    pub fn hsl(value: HslState) -> Self {
        Self::Hsl(value)
    }

    /// Returns the kind of state this change belongs to.
    #[must_use]
    pub const fn kind(&self) -> StateKind {
        match self {
            Self::OnOff(_) => StateKind::GenericOnOff,
            Self::Level(_) => StateKind::GenericLevel,
            Self::Lightness(_) => StateKind::LightLightnessActual,
            Self::LightnessLinear(_) => StateKind::LightLightnessLinear,
            Self::Ctl(_) => StateKind::LightCtl,
            Self::CtlTemperature(_) => StateKind::LightCtlTemperature,
            Self::Hsl(_) => StateKind::LightHsl,
            Self::Hue(_) => StateKind::LightHslHue,
            Self::Saturation(_) => StateKind::LightHslSaturation,
        }
    }

    /// Returns `true` if this is a light-related change (lightness, CTL, HSL).
    #[must_use]
    pub fn is_light(&self) -> bool {
        !matches!(self, Self::OnOff(_) | Self::Level(_))
    }

    /// Returns the lightness carried by this change, if any.
    #[must_use]
    pub fn lightness_component(&self) -> Option<Lightness> {
        match self {
            Self::Lightness(value) => Some(*value),
            Self::Ctl(state) => Some(state.lightness),
            Self::Hsl(state) => Some(state.lightness),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damped_sources() {
        assert!(UpdateSource::Bind.is_damped());
        assert!(UpdateSource::Scene.is_damped());
        assert!(!UpdateSource::Client.is_damped());
        assert!(!UpdateSource::App.is_damped());
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(StateChange::on_off(OnOff::On).kind(), StateKind::GenericOnOff);
        assert_eq!(StateChange::Hue(Hue::new(1)).kind(), StateKind::LightHslHue);
        assert_eq!(
            StateChange::CtlTemperature(TemperatureState::default()).kind(),
            StateKind::LightCtlTemperature
        );
    }

    #[test]
    fn lightness_component() {
        let hsl = HslState::new(Lightness::new(5), Hue::new(1), Saturation::new(2));
        assert_eq!(
            StateChange::hsl(hsl).lightness_component(),
            Some(Lightness::new(5))
        );
        assert_eq!(StateChange::level(Level::ZERO).lightness_component(), None);
    }

    #[test]
    fn serde_roundtrip() {
        let change = StateChange::level(Level::new(-42));
        let json = serde_json::to_string(&change).unwrap();
        let back: StateChange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, change);
    }
}
