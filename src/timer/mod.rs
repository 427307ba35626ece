// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Virtual-time timer queue.
//!
//! Timers are owned by [`TimerHandle`]s: dropping a handle cancels its
//! timer, so replacing the handle stored on a model instance is all it
//! takes to re-arm. Expired timers come back as [`ScheduledTask`] values
//! which the node dispatches to the owning instance.
//!
//! Time only moves when the owner pumps the queue with
//! [`TimerQueue::pop_due`] and [`TimerQueue::advance_to`].
//!
//! # Examples
//!
//! ```
//! use mesh_lighting::models::{InstanceKey, ModelKind};
//! use mesh_lighting::timer::{ScheduledTask, TimerQueue};
//! use mesh_lighting::types::ElementId;
//!
//! let queue = TimerQueue::new();
//! let key = InstanceKey::new(ElementId::PRIMARY, ModelKind::GenericLevel);
//! let handle = queue.arm(ScheduledTask::Transition(key), 100);
//! assert_eq!(handle.remaining_ms(), 100);
//!
//! assert_eq!(queue.pop_due(99), None);
//! assert_eq!(queue.pop_due(100), Some(ScheduledTask::Transition(key)));
//! assert!(!handle.is_pending());
//! ```

mod queue;

pub use queue::{ScheduledTask, TimerHandle, TimerQueue};
