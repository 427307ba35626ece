// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for model state changes.
//!
//! This module provides a callback-based subscription system for receiving
//! notifications when model state changes. Callbacks run synchronously,
//! inside the node call that caused the event.
//!
//! # Overview
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`CallbackRegistry`] - Registry that manages callbacks and dispatches events
//! - [`Subscribable`] - Trait for types that support event subscriptions
//!
//! # Usage
//!
//! ```
//! use mesh_lighting::node::{Node, NodeConfig};
//! use mesh_lighting::state::StateChange;
//! use mesh_lighting::subscription::Subscribable;
//! use mesh_lighting::transport::MemoryTransport;
//! use mesh_lighting::types::{ElementId, OnOff};
//!
//! let mut node = Node::new(NodeConfig::default(), MemoryTransport::new());
//! node.add_on_off_server(ElementId::PRIMARY).unwrap();
//!
//! let sub_id = node.on_on_off_changed(|element, state| {
//!     println!("OnOff on {element} is now {state}");
//! });
//!
//! node.set_local_state(ElementId::PRIMARY, StateChange::on_off(OnOff::On))
//!     .unwrap();
//! node.unsubscribe(sub_id);
//! ```

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;
