// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transition scheduling and transaction tracking.
//!
//! Every model instance owns one [`Transition`] for its state and one
//! [`TransactionRecord`] for request de-duplication. Both are plain state
//! machines; the node arms the timers they ask for.

mod context;
mod interpolate;
mod transaction;

pub use context::{Schedule, Tick, Transition};
pub use interpolate::Interpolate;
pub use transaction::{AckContext, TransactionRecord};
