// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversions between bound states.

use std::fmt;
use std::sync::Arc;

use crate::state::{StateChange, StateKind};
use crate::types::{
    CtlState, ElementId, HslState, Hue, Level, Lightness, OnOff, Saturation, TemperatureRange,
    TemperatureState,
};

/// Read access to the node state a conversion may depend on.
pub trait StateLookup {
    /// Lightness to use when `element` switches on: its default when set,
    /// otherwise its last non-zero value.
    fn on_lightness(&self, element: ElementId) -> Option<Lightness>;

    /// Present Light CTL state on `element`.
    fn ctl(&self, element: ElementId) -> Option<CtlState>;

    /// Present Light HSL state on `element`.
    fn hsl(&self, element: ElementId) -> Option<HslState>;

    /// Present Light CTL Temperature state and range on `element`.
    fn temperature(&self, element: ElementId) -> Option<(TemperatureState, TemperatureRange)>;
}

/// Built-in state bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// Actual lightness drives OnOff: on iff non-zero.
    LightnessToOnOff,
    /// Actual lightness drives Level: `lightness - 32768`.
    LightnessToLevel,
    /// OnOff drives actual lightness: off is 0, on restores default or last.
    OnOffToLightness,
    /// Level drives actual lightness: `level + 32768`.
    LevelToLightness,
    /// Actual lightness drives the lightness of Light CTL.
    LightnessToCtl,
    /// OnOff drives the lightness of Light CTL.
    OnOffToCtl,
    /// Level drives the lightness of Light CTL.
    LevelToCtl,
    /// Actual lightness drives the lightness of Light HSL.
    LightnessToHsl,
    /// OnOff drives the lightness of Light HSL.
    OnOffToHsl,
    /// Level drives the lightness of Light HSL.
    LevelToHsl,
    /// CTL temperature drives Level, rescaled over the temperature range.
    CtlTemperatureToLevel,
    /// Level drives CTL temperature, rescaled over the temperature range.
    LevelToCtlTemperature,
    /// Hue drives Level: `hue - 32768`.
    HueToLevel,
    /// Level drives hue: `level + 32768`.
    LevelToHue,
    /// Saturation drives Level: `saturation - 32768`.
    SaturationToLevel,
    /// Level drives saturation: `level + 32768`.
    LevelToSaturation,
}

impl Conversion {
    /// Returns the `(source, target)` state kinds.
    #[must_use]
    pub const fn kinds(&self) -> (StateKind, StateKind) {
        use StateKind::{
            GenericLevel, GenericOnOff, LightCtl, LightCtlTemperature, LightHsl, LightHslHue,
            LightHslSaturation, LightLightnessActual,
        };
        match self {
            Self::LightnessToOnOff => (LightLightnessActual, GenericOnOff),
            Self::LightnessToLevel => (LightLightnessActual, GenericLevel),
            Self::OnOffToLightness => (GenericOnOff, LightLightnessActual),
            Self::LevelToLightness => (GenericLevel, LightLightnessActual),
            Self::LightnessToCtl => (LightLightnessActual, LightCtl),
            Self::OnOffToCtl => (GenericOnOff, LightCtl),
            Self::LevelToCtl => (GenericLevel, LightCtl),
            Self::LightnessToHsl => (LightLightnessActual, LightHsl),
            Self::OnOffToHsl => (GenericOnOff, LightHsl),
            Self::LevelToHsl => (GenericLevel, LightHsl),
            Self::CtlTemperatureToLevel => (LightCtlTemperature, GenericLevel),
            Self::LevelToCtlTemperature => (GenericLevel, LightCtlTemperature),
            Self::HueToLevel => (LightHslHue, GenericLevel),
            Self::LevelToHue => (GenericLevel, LightHslHue),
            Self::SaturationToLevel => (LightHslSaturation, GenericLevel),
            Self::LevelToSaturation => (GenericLevel, LightHslSaturation),
        }
    }

    /// Converts a change of the source state on `src` into the new value of
    /// the target state on `tgt`.
    #[must_use]
    pub fn convert(
        &self,
        lookup: &dyn StateLookup,
        src: ElementId,
        tgt: ElementId,
        value: &StateChange,
    ) -> Option<StateChange> {
        match (self, *value) {
            (Self::LightnessToOnOff, StateChange::Lightness(lightness)) => {
                Some(StateChange::OnOff(OnOff::from(lightness.is_on())))
            }
            (Self::LightnessToLevel, StateChange::Lightness(lightness)) => {
                Some(StateChange::Level(Level::from_lightness(lightness)))
            }
            (Self::OnOffToLightness, StateChange::OnOff(state)) => {
                let lightness = switched_lightness(lookup, tgt, state)?;
                Some(StateChange::Lightness(lightness))
            }
            (Self::LevelToLightness, StateChange::Level(level)) => {
                Some(StateChange::Lightness(level.to_lightness()))
            }
            (Self::LightnessToCtl, StateChange::Lightness(lightness)) => {
                ctl_with_lightness(lookup, tgt, lightness)
            }
            (Self::OnOffToCtl, StateChange::OnOff(state)) => {
                let lightness =
                    switched_lightness(lookup, tgt, state).unwrap_or(on_off_fallback(state));
                ctl_with_lightness(lookup, tgt, lightness)
            }
            (Self::LevelToCtl, StateChange::Level(level)) => {
                ctl_with_lightness(lookup, tgt, level.to_lightness())
            }
            (Self::LightnessToHsl, StateChange::Lightness(lightness)) => {
                hsl_with_lightness(lookup, tgt, lightness)
            }
            (Self::OnOffToHsl, StateChange::OnOff(state)) => {
                let lightness =
                    switched_lightness(lookup, tgt, state).unwrap_or(on_off_fallback(state));
                hsl_with_lightness(lookup, tgt, lightness)
            }
            (Self::LevelToHsl, StateChange::Level(level)) => {
                hsl_with_lightness(lookup, tgt, level.to_lightness())
            }
            (Self::CtlTemperatureToLevel, StateChange::CtlTemperature(state)) => {
                let range = lookup
                    .temperature(src)
                    .map_or(TemperatureRange::FULL, |(_, range)| range);
                Some(StateChange::Level(range.to_level(state.temperature)))
            }
            (Self::LevelToCtlTemperature, StateChange::Level(level)) => {
                let (present, range) = lookup.temperature(tgt)?;
                Some(StateChange::CtlTemperature(TemperatureState {
                    temperature: range.from_level(level),
                    ..present
                }))
            }
            (Self::HueToLevel, StateChange::Hue(hue)) => Some(StateChange::Level(hue.to_level())),
            (Self::LevelToHue, StateChange::Level(level)) => {
                Some(StateChange::Hue(Hue::from_level(level)))
            }
            (Self::SaturationToLevel, StateChange::Saturation(saturation)) => {
                Some(StateChange::Level(saturation.to_level()))
            }
            (Self::LevelToSaturation, StateChange::Level(level)) => {
                Some(StateChange::Saturation(Saturation::from_level(level)))
            }
            _ => None,
        }
    }
}

fn switched_lightness(lookup: &dyn StateLookup, element: ElementId, state: OnOff) -> Option<Lightness> {
    if state.is_on() {
        lookup.on_lightness(element)
    } else {
        Some(Lightness::MIN)
    }
}

fn on_off_fallback(state: OnOff) -> Lightness {
    if state.is_on() {
        Lightness::MAX
    } else {
        Lightness::MIN
    }
}

fn ctl_with_lightness(
    lookup: &dyn StateLookup,
    element: ElementId,
    lightness: Lightness,
) -> Option<StateChange> {
    let present = lookup.ctl(element)?;
    Some(StateChange::Ctl(CtlState {
        lightness,
        ..present
    }))
}

fn hsl_with_lightness(
    lookup: &dyn StateLookup,
    element: ElementId,
    lightness: Lightness,
) -> Option<StateChange> {
    let present = lookup.hsl(element)?;
    Some(StateChange::Hsl(HslState {
        lightness,
        ..present
    }))
}

/// Signature of an application supplied resolver.
///
/// It receives the target element and the source change and returns the
/// new target value, or `None` to leave the target untouched.
pub type ResolveFn = dyn Fn(ElementId, &StateChange) -> Option<StateChange> + Send + Sync;

/// Computes a target value from a source change.
#[derive(Clone)]
pub enum Resolver {
    /// One of the standard bindings.
    Builtin(Conversion),
    /// An application supplied function.
    Custom(Arc<ResolveFn>),
}

impl Resolver {
    /// Wraps an application supplied function.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(ElementId, &StateChange) -> Option<StateChange> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Resolves the target value for an edge from `src` to `tgt`.
    #[must_use]
    pub fn resolve(
        &self,
        lookup: &dyn StateLookup,
        src: ElementId,
        tgt: ElementId,
        value: &StateChange,
    ) -> Option<StateChange> {
        match self {
            Self::Builtin(conversion) => conversion.convert(lookup, src, tgt, value),
            Self::Custom(f) => f(tgt, value),
        }
    }
}

impl From<Conversion> for Resolver {
    fn from(conversion: Conversion) -> Self {
        Self::Builtin(conversion)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(conversion) => f.debug_tuple("Builtin").field(conversion).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
