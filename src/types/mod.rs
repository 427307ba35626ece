// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for the mesh lighting models.
//!
//! This module provides type-safe representations of the states owned by
//! the model servers. Constrained types validate at construction time and
//! offer a `clamped` constructor for the silent clamping the models apply
//! to out-of-range requests.
//!
//! # Types
//!
//! - [`ElementId`], [`Address`] - Addressing of elements and message sources
//! - [`OnOff`] - Generic OnOff state
//! - [`Level`] - Generic Level state (-32768..=32767)
//! - [`Lightness`], [`LightnessRange`] - Light Lightness states
//! - [`Temperature`], [`DeltaUv`], [`TemperatureRange`], [`CtlState`] - Light CTL states
//! - [`Hue`], [`Saturation`], [`HslRange`], [`HslState`] - Light HSL states
//! - [`TransitionTime`], [`Delay`] - Transition parameters carried by Set messages
//! - [`SceneNumber`] - External scene identifier

mod address;
mod ctl;
mod hsl;
mod level;
mod lightness;
mod onoff;
mod range;
mod scene;
mod transition_time;

pub use address::{Address, ElementId, TransactionId};
pub use ctl::{CtlState, DeltaUv, Temperature, TemperatureRange, TemperatureState};
pub use hsl::{HslRange, HslState, Hue, Saturation};
pub use level::Level;
pub use lightness::{Lightness, LightnessRange};
pub use onoff::OnOff;
pub use range::RangeStatus;
pub use scene::SceneNumber;
pub use transition_time::{Delay, Resolution, TransitionTime};
