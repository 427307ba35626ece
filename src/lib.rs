// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh Lighting - the model-state layer of a Bluetooth Mesh lighting node.
//!
//! This library keeps the state of the Generic and Light server models of a
//! Bluetooth Mesh node and evolves it over time. It covers transitions with
//! a delay and a tick, de-duplication of retransmitted transactions,
//! bindings between states, and scenes.
//!
//! # Supported Models
//!
//! - **Generic**: OnOff, Level (with Delta Set and Move Set), Default Transition Time
//! - **Light Lightness**: actual and linear lightness, last, default and range
//! - **Light CTL**: main element and the Temperature sub-element
//! - **Light HSL**: main element and the Hue and Saturation sub-elements
//! - **Scene**: store, recall with a transition, delete
//!
//! The node does not parse PDUs or talk to a radio. Decoded requests go in
//! through [`Node::handle`], replies and publications come out through a
//! [`transport::MeshTransport`], and time is driven with [`Node::advance`]
//! or [`Node::run_until_idle`].
//!
//! # Quick Start
//!
//! ```
//! use mesh_lighting::message::{ModelMessage, Request, Transaction};
//! use mesh_lighting::transport::MemoryTransport;
//! use mesh_lighting::types::{Address, ElementId, Lightness, OnOff};
//! use mesh_lighting::{Node, NodeConfig};
//!
//! # fn main() -> mesh_lighting::Result<()> {
//! let transport = MemoryTransport::new();
//! let mut node = Node::new(NodeConfig::default(), transport.clone());
//!
//! let light = ElementId::PRIMARY;
//! node.add_on_off_server(light)?;
//! node.add_level_server(light)?;
//! node.add_lightness_server(light)?;
//! node.bind_lightness(light)?;
//!
//! // A client switches the light on.
//! let set = ModelMessage::new(
//!     light,
//!     Address::new(0x0100),
//!     Request::OnOffSet {
//!         state: OnOff::On,
//!         txn: Transaction::acked(1),
//!     },
//! );
//! assert!(node.handle(&set).is_accepted());
//!
//! // The bound lightness followed.
//! assert_eq!(node.lightness_server(light).unwrap().present(), Lightness::MAX);
//! assert_eq!(transport.sent().len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Observing State Changes
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use mesh_lighting::state::StateChange;
//! use mesh_lighting::subscription::Subscribable;
//! use mesh_lighting::transport::MemoryTransport;
//! use mesh_lighting::types::{ElementId, Level};
//! use mesh_lighting::{Node, NodeConfig};
//!
//! let mut node = Node::new(NodeConfig::default(), MemoryTransport::new());
//! node.add_level_server(ElementId::PRIMARY).unwrap();
//!
//! let seen = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&seen);
//! node.on_level_changed(move |_element, _level| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! node.set_local_state(ElementId::PRIMARY, StateChange::Level(Level::new(-5)))
//!     .unwrap();
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! ```

pub mod binding;
pub mod error;
pub mod event;
pub mod message;
pub mod models;
pub mod node;
pub mod scene;
pub mod state;
pub mod subscription;
pub mod timer;
pub mod transition;
pub mod transport;
pub mod types;

pub use error::{BindError, Error, MessageError, Result, ValueError};
pub use node::{Handled, Node, NodeConfig};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
