// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed model messages.
//!
//! The access layer decodes opcodes and parameters into a [`Request`] and
//! wraps it in a [`ModelMessage`] with its addressing context. Replies and
//! publications come back as [`StatusMessage`] values.
//!
//! # Examples
//!
//! ```
//! use mesh_lighting::message::{ModelMessage, Request, Transaction};
//! use mesh_lighting::types::{Address, ElementId, Level};
//!
//! let message = ModelMessage::new(
//!     ElementId::PRIMARY,
//!     Address::new(0x0001),
//!     Request::LevelSet {
//!         level: Level::new(1000),
//!         txn: Transaction::acked(7).with_timing(0x05, 0),
//!     },
//! );
//! assert!(message.unicast);
//! ```

mod request;
mod status;

pub use request::{ModelMessage, Request, Timing, Transaction};
pub use status::{StatusMessage, Target};
