// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound status messages.

use crate::scene::SceneStatusCode;
use crate::types::{
    CtlState, HslRange, HslState, Hue, Level, Lightness, LightnessRange, OnOff, RangeStatus,
    Saturation, SceneNumber, TemperatureRange, TemperatureState, TransitionTime,
};

/// Target value and remaining time of a running transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Target<V> {
    /// Value the transition is heading to.
    pub value: V,
    /// Time left before the target is reached.
    pub remaining: TransitionTime,
}

impl<V> Target<V> {
    /// Pairs a value with its remaining time.
    pub const fn new(value: V, remaining: TransitionTime) -> Self {
        Self { value, remaining }
    }

    /// Converts the carried value.
    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> Target<U> {
        Target {
            value: f(self.value),
            remaining: self.remaining,
        }
    }
}

/// A status reply or publication.
///
/// Transitioned states carry `target: Some(..)` only while a delay or a
/// transition is pending.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StatusMessage {
    /// Generic OnOff Status.
    OnOff {
        /// Present state.
        present: OnOff,
        /// Pending transition.
        target: Option<Target<OnOff>>,
    },
    /// Generic Level Status.
    Level {
        /// Present level.
        present: Level,
        /// Pending transition.
        target: Option<Target<Level>>,
    },
    /// Generic Default Transition Time Status.
    DefaultTransition(TransitionTime),
    /// Light Lightness Status.
    Lightness {
        /// Present actual lightness.
        present: Lightness,
        /// Pending transition.
        target: Option<Target<Lightness>>,
    },
    /// Light Lightness Linear Status.
    LightnessLinear {
        /// Present linear lightness.
        present: u16,
        /// Pending transition.
        target: Option<Target<u16>>,
    },
    /// Light Lightness Last Status.
    LightnessLast(Lightness),
    /// Light Lightness Default Status.
    LightnessDefault(Lightness),
    /// Light Lightness Range Status.
    LightnessRange {
        /// Outcome of the request.
        status: RangeStatus,
        /// Range in force.
        range: LightnessRange,
    },
    /// Light CTL Status.
    Ctl {
        /// Present lightness, temperature and delta UV.
        present: CtlState,
        /// Pending transition.
        target: Option<Target<CtlState>>,
    },
    /// Light CTL Temperature Status.
    CtlTemperature {
        /// Present temperature and delta UV.
        present: TemperatureState,
        /// Pending transition.
        target: Option<Target<TemperatureState>>,
    },
    /// Light CTL Temperature Range Status.
    CtlTemperatureRange {
        /// Outcome of the request.
        status: RangeStatus,
        /// Range in force.
        range: TemperatureRange,
    },
    /// Light CTL Default Status.
    CtlDefault(CtlState),
    /// Light HSL Status.
    Hsl {
        /// Present state.
        present: HslState,
        /// Remaining time of a pending transition.
        remaining: Option<TransitionTime>,
    },
    /// Light HSL Target Status.
    HslTarget {
        /// Target state.
        target: HslState,
        /// Remaining time of a pending transition.
        remaining: Option<TransitionTime>,
    },
    /// Light HSL Hue Status.
    HslHue {
        /// Present hue.
        present: Hue,
        /// Pending transition.
        target: Option<Target<Hue>>,
    },
    /// Light HSL Saturation Status.
    HslSaturation {
        /// Present saturation.
        present: Saturation,
        /// Pending transition.
        target: Option<Target<Saturation>>,
    },
    /// Light HSL Default Status.
    HslDefault(HslState),
    /// Light HSL Range Status.
    HslRange {
        /// Outcome of the request.
        status: RangeStatus,
        /// Range in force.
        range: HslRange,
    },
    /// Scene Status.
    Scene {
        /// Outcome of the request.
        status: SceneStatusCode,
        /// Scene the node is in, if any.
        current: Option<SceneNumber>,
        /// Scene being recalled.
        target: Option<Target<SceneNumber>>,
    },
    /// Scene Register Status.
    SceneRegister {
        /// Outcome of the request.
        status: SceneStatusCode,
        /// Scene the node is in, if any.
        current: Option<SceneNumber>,
        /// Stored scene numbers.
        scenes: Vec<SceneNumber>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_map() {
        let target = Target::new(Lightness::new(4), TransitionTime::from_millis(200));
        let linear = target.map(|l| l.to_linear());
        assert_eq!(linear.remaining, target.remaining);
        assert_eq!(linear.value, Lightness::new(4).to_linear());
    }

    #[test]
    fn status_serializes() {
        let status = StatusMessage::OnOff {
            present: OnOff::On,
            target: None,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["OnOff"]["present"], "On");
    }
}
