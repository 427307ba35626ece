// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model state vocabulary.
//!
//! [`StateChange`] is the value exchanged between model instances, the
//! binding graph and the upper layer. [`StateKind`] names a bindable state
//! and [`UpdateSource`] records what triggered an update.
//!
//! # Examples
//!
//! ```
//! use mesh_lighting::state::{StateChange, UpdateSource};
//! use mesh_lighting::types::OnOff;
//!
//! let change = StateChange::on_off(OnOff::On);
//! assert!(!change.is_light());
//! assert!(UpdateSource::Bind.is_damped());
//! ```

mod state_change;

pub use state_change::{StateChange, StateKind, UpdateSource};
