// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound seams of the node.
//!
//! The node never talks to the mesh stack or to flash directly. Replies and
//! publications go through a [`MeshTransport`], persistent state through a
//! [`StateStore`]. In-memory implementations are provided for tests and for
//! hosts that inspect traffic themselves.
//!
//! # Examples
//!
//! ```
//! use mesh_lighting::message::StatusMessage;
//! use mesh_lighting::transport::{MemoryTransport, MeshTransport};
//! use mesh_lighting::types::{ElementId, OnOff};
//!
//! let mut transport = MemoryTransport::new();
//! let probe = transport.clone();
//!
//! transport.publish(
//!     ElementId::PRIMARY,
//!     &StatusMessage::OnOff { present: OnOff::On, target: None },
//! );
//! assert_eq!(probe.published().len(), 1);
//! ```

mod memory;

pub use memory::{MemoryStore, MemoryTransport, Outbound};

use crate::message::StatusMessage;
use crate::models::ModelSnapshot;
use crate::types::{Address, ElementId};

/// Sends status messages on behalf of model instances.
pub trait MeshTransport: Send {
    /// Replies to one client.
    fn send(
        &mut self,
        element: ElementId,
        dst: Address,
        app_key_index: u16,
        status: &StatusMessage,
    );

    /// Publishes a state change to the element's publish address.
    fn publish(&mut self, element: ElementId, status: &StatusMessage);
}

/// Persists model state that must survive a restart.
pub trait StateStore: Send {
    /// Saves the state of one model instance.
    fn save_state(&mut self, element: ElementId, snapshot: &ModelSnapshot);
}

/// A store that keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl StateStore for NullStore {
    fn save_state(&mut self, _element: ElementId, _snapshot: &ModelSnapshot) {}
}
