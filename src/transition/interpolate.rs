// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Step arithmetic for transitioned values.

use std::fmt;

use crate::types::{
    CtlState, DeltaUv, HslState, Hue, Level, Lightness, OnOff, Saturation, Temperature,
    TemperatureState,
};

/// A value that can be moved toward a target in equal steps.
///
/// The step is computed once when a transition starts, with integer
/// division truncating toward zero. The last step of a transition applies
/// the target directly, which absorbs the rounding remainder.
pub trait Interpolate: Copy + PartialEq + fmt::Debug {
    /// Signed increment applied on every tick.
    type Step: Copy + Default + fmt::Debug;

    /// Whether transitions toward this value are split into ticks.
    ///
    /// Binary states only switch once, so they wait for the whole
    /// transition time instead.
    const STEPPED: bool = true;

    /// Returns the increment that moves `from` to `to` in `steps` ticks.
    fn step_towards(from: Self, to: Self, steps: u32) -> Self::Step;

    /// Applies one increment, saturating at the value's bounds.
    #[must_use]
    fn advance(self, step: Self::Step) -> Self;
}

#[allow(clippy::cast_possible_wrap)]
fn divide(from: i32, to: i32, steps: u32) -> i32 {
    (to - from) / steps as i32
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn saturate_u16(value: i32) -> u16 {
    value.clamp(0, i32::from(u16::MAX)) as u16
}

#[allow(clippy::cast_possible_truncation)]
fn saturate_i16(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

impl Interpolate for OnOff {
    type Step = ();

    const STEPPED: bool = false;

    fn step_towards(_from: Self, _to: Self, _steps: u32) -> Self::Step {}

    fn advance(self, (): Self::Step) -> Self {
        self
    }
}

impl Interpolate for Level {
    type Step = i32;

    fn step_towards(from: Self, to: Self, steps: u32) -> i32 {
        divide(i32::from(from.value()), i32::from(to.value()), steps)
    }

    fn advance(self, step: i32) -> Self {
        Level::saturating(i32::from(self.value()) + step)
    }
}

macro_rules! interpolate_u16 {
    ($name:ident) => {
        impl Interpolate for $name {
            type Step = i32;

            fn step_towards(from: Self, to: Self, steps: u32) -> i32 {
                divide(i32::from(from.value()), i32::from(to.value()), steps)
            }

            fn advance(self, step: i32) -> Self {
                $name::new(saturate_u16(i32::from(self.value()) + step))
            }
        }
    };
}

interpolate_u16!(Lightness);
interpolate_u16!(Hue);
interpolate_u16!(Saturation);

impl Interpolate for TemperatureState {
    type Step = (i32, i32);

    fn step_towards(from: Self, to: Self, steps: u32) -> Self::Step {
        (
            divide(
                i32::from(from.temperature.value()),
                i32::from(to.temperature.value()),
                steps,
            ),
            divide(
                i32::from(from.delta_uv.value()),
                i32::from(to.delta_uv.value()),
                steps,
            ),
        )
    }

    fn advance(self, (temperature, delta_uv): Self::Step) -> Self {
        Self {
            temperature: Temperature::clamped(saturate_u16(
                i32::from(self.temperature.value()) + temperature,
            )),
            delta_uv: DeltaUv::new(saturate_i16(i32::from(self.delta_uv.value()) + delta_uv)),
        }
    }
}

impl Interpolate for CtlState {
    type Step = (i32, (i32, i32));

    fn step_towards(from: Self, to: Self, steps: u32) -> Self::Step {
        (
            Lightness::step_towards(from.lightness, to.lightness, steps),
            TemperatureState::step_towards(from.temperature_state(), to.temperature_state(), steps),
        )
    }

    fn advance(self, (lightness, temperature): Self::Step) -> Self {
        Self {
            lightness: self.lightness.advance(lightness),
            ..self
        }
        .with_temperature_state(self.temperature_state().advance(temperature))
    }
}

impl Interpolate for HslState {
    type Step = (i32, i32, i32);

    fn step_towards(from: Self, to: Self, steps: u32) -> Self::Step {
        (
            Lightness::step_towards(from.lightness, to.lightness, steps),
            Hue::step_towards(from.hue, to.hue, steps),
            Saturation::step_towards(from.saturation, to.saturation, steps),
        )
    }

    fn advance(self, (lightness, hue, saturation): Self::Step) -> Self {
        Self {
            lightness: self.lightness.advance(lightness),
            hue: self.hue.advance(hue),
            saturation: self.saturation.advance(saturation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_step_truncates_toward_zero() {
        assert_eq!(Level::step_towards(Level::ZERO, Level::new(1000), 3), 333);
        assert_eq!(Level::step_towards(Level::ZERO, Level::new(-1000), 3), -333);
    }

    #[test]
    fn level_advance_saturates() {
        assert_eq!(Level::new(32_000).advance(1_000), Level::MAX);
        assert_eq!(Level::new(-32_000).advance(-1_000), Level::MIN);
    }

    #[test]
    fn lightness_advance_saturates() {
        assert_eq!(Lightness::new(10).advance(-20), Lightness::MIN);
        assert_eq!(Lightness::new(65_530).advance(20), Lightness::MAX);
    }

    #[test]
    fn ctl_advances_every_component() {
        let from = CtlState::new(
            Lightness::new(0),
            Temperature::new(1000).unwrap(),
            DeltaUv::new(0),
        );
        let to = CtlState::new(
            Lightness::new(1000),
            Temperature::new(2000).unwrap(),
            DeltaUv::new(-100),
        );
        let step = CtlState::step_towards(from, to, 4);
        let next = from.advance(step);
        assert_eq!(next.lightness.value(), 250);
        assert_eq!(next.temperature.value(), 1250);
        assert_eq!(next.delta_uv.value(), -25);
    }

    #[test]
    fn hsl_advances_every_component() {
        let from = HslState::new(Lightness::new(0), Hue::new(100), Saturation::new(200));
        let to = HslState::new(Lightness::new(100), Hue::new(0), Saturation::new(400));
        let next = from.advance(HslState::step_towards(from, to, 2));
        assert_eq!(next, HslState::new(Lightness::new(50), Hue::new(50), Saturation::new(300)));
    }

    #[test]
    fn onoff_is_not_stepped() {
        const { assert!(!OnOff::STEPPED) };
        assert_eq!(OnOff::On.advance(()), OnOff::On);
    }
}
