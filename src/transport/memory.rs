// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory transport and store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::message::StatusMessage;
use crate::models::{ModelKind, ModelSnapshot};
use crate::types::{Address, ElementId};

use super::{MeshTransport, StateStore};

/// One status message handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Reply to a client.
    Sent {
        /// Replying element.
        element: ElementId,
        /// Client address.
        dst: Address,
        /// Application key index.
        app_key_index: u16,
        /// The status.
        status: StatusMessage,
    },
    /// Publication.
    Published {
        /// Publishing element.
        element: ElementId,
        /// The status.
        status: StatusMessage,
    },
}

impl Outbound {
    /// Returns the carried status.
    #[must_use]
    pub fn status(&self) -> &StatusMessage {
        match self {
            Self::Sent { status, .. } | Self::Published { status, .. } => status,
        }
    }
}

/// Records every outbound message. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    log: Arc<Mutex<Vec<Outbound>>>,
}

impl MemoryTransport {
    /// Creates an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every message recorded so far.
    #[must_use]
    pub fn messages(&self) -> Vec<Outbound> {
        self.log.lock().clone()
    }

    /// Returns the replies recorded so far.
    #[must_use]
    pub fn sent(&self) -> Vec<StatusMessage> {
        self.log
            .lock()
            .iter()
            .filter_map(|message| match message {
                Outbound::Sent { status, .. } => Some(status.clone()),
                Outbound::Published { .. } => None,
            })
            .collect()
    }

    /// Returns the publications recorded so far.
    #[must_use]
    pub fn published(&self) -> Vec<StatusMessage> {
        self.log
            .lock()
            .iter()
            .filter_map(|message| match message {
                Outbound::Published { status, .. } => Some(status.clone()),
                Outbound::Sent { .. } => None,
            })
            .collect()
    }

    /// Removes and returns every recorded message.
    pub fn take(&self) -> Vec<Outbound> {
        std::mem::take(&mut *self.log.lock())
    }

    /// Forgets every recorded message.
    pub fn clear(&self) {
        self.log.lock().clear();
    }
}

impl MeshTransport for MemoryTransport {
    fn send(
        &mut self,
        element: ElementId,
        dst: Address,
        app_key_index: u16,
        status: &StatusMessage,
    ) {
        self.log.lock().push(Outbound::Sent {
            element,
            dst,
            app_key_index,
            status: status.clone(),
        });
    }

    fn publish(&mut self, element: ElementId, status: &StatusMessage) {
        self.log.lock().push(Outbound::Published {
            element,
            status: status.clone(),
        });
    }
}

/// Keeps the latest snapshot of every instance as JSON. Clones share the
/// same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<(ElementId, ModelKind), serde_json::Value>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored JSON of one instance.
    #[must_use]
    pub fn get(&self, element: ElementId, kind: ModelKind) -> Option<serde_json::Value> {
        self.records.lock().get(&(element, kind)).cloned()
    }

    /// Returns the stored snapshot of one instance.
    #[must_use]
    pub fn snapshot(&self, element: ElementId, kind: ModelKind) -> Option<ModelSnapshot> {
        self.get(element, kind)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// Returns the number of save calls.
    #[must_use]
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl StateStore for MemoryStore {
    fn save_state(&mut self, element: ElementId, snapshot: &ModelSnapshot) {
        *self.saves.lock() += 1;
        match serde_json::to_value(snapshot) {
            Ok(value) => {
                self.records
                    .lock()
                    .insert((element, snapshot.kind()), value);
            }
            Err(e) => {
                tracing::warn!(element = %element, error = %e, "Failed to encode snapshot");
            }
        }
    }
}
