// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for model state changes.
//!
//! A node reports what happens to its models as [`NodeEvent`]s. Events are
//! dispatched synchronously to registered callbacks and broadcast on an
//! [`EventBus`], which uses tokio's broadcast channel so several async
//! subscribers can follow the node.
//!
//! # Examples
//!
//! ```
//! use mesh_lighting::event::{EventBus, NodeEvent};
//! use mesh_lighting::models::ModelKind;
//! use mesh_lighting::types::ElementId;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(NodeEvent::InvalidElement {
//!     element: ElementId::new(4),
//!     model: ModelKind::GenericLevel,
//! });
//! ```

mod event_bus;
mod node_event;

pub use event_bus::EventBus;
pub(crate) use event_bus::DEFAULT_CHANNEL_CAPACITY;
pub use node_event::NodeEvent;
