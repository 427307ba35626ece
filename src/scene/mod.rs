// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene register and per-model scene storage.
//!
//! A [`SceneRegister`] maps external scene numbers to a fixed number of
//! internal slots. Every model that takes part in scenes keeps one
//! [`SceneSlots`] array indexed by the same slot number, so storing a scene
//! copies each present value into its slot and recalling it reads the slot
//! back.
//!
//! # Examples
//!
//! ```
//! use mesh_lighting::scene::{SceneRegister, SceneStatusCode};
//! use mesh_lighting::types::SceneNumber;
//!
//! let mut register = SceneRegister::new(1);
//! let one = SceneNumber::new(1).unwrap();
//! let two = SceneNumber::new(2).unwrap();
//!
//! assert_eq!(register.store(one), Ok(0));
//! assert_eq!(register.store(two), Err(SceneStatusCode::RegisterFull));
//! assert_eq!(register.current(), Some(one));
//! assert_eq!(register.delete(two), Err(SceneStatusCode::NotFound));
//! ```

mod register;
mod slots;

pub use register::{SceneRegister, SceneStatusCode};
pub use slots::SceneSlots;
