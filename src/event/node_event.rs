// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Node event types.

use crate::models::ModelKind;
use crate::scene::SceneStatusCode;
use crate::state::{StateChange, UpdateSource};
use crate::types::{ElementId, RangeStatus, SceneNumber};

/// Events emitted by a node to the upper layer.
///
/// Every event names the element it concerns.
///
/// # Examples
///
/// ```
/// use mesh_lighting::event::NodeEvent;
/// use mesh_lighting::state::{StateChange, UpdateSource};
/// use mesh_lighting::types::{ElementId, OnOff};
///
/// let event = NodeEvent::StateUpdated {
///     element: ElementId::PRIMARY,
///     change: StateChange::on_off(OnOff::On),
///     source: UpdateSource::Client,
/// };
/// assert_eq!(event.element(), ElementId::PRIMARY);
/// assert_eq!(event.change(), Some(&StateChange::on_off(OnOff::On)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NodeEvent {
    /// The present state of a model changed.
    ///
    /// Emitted on every intermediate step of a transition and when the
    /// target is reached.
    StateUpdated {
        /// Hosting element.
        element: ElementId,
        /// New present state.
        change: StateChange,
        /// What triggered the update.
        source: UpdateSource,
    },

    /// Answer to a local state query.
    CurrentState {
        /// Hosting element.
        element: ElementId,
        /// Present state.
        change: StateChange,
    },

    /// A local query or update named an element without the requested model.
    InvalidElement {
        /// Requested element.
        element: ElementId,
        /// Requested model.
        model: ModelKind,
    },

    /// A range set request was processed.
    RangeUpdated {
        /// Hosting element.
        element: ElementId,
        /// Model owning the range.
        model: ModelKind,
        /// Outcome.
        status: RangeStatus,
    },

    /// A default state was changed.
    DefaultUpdated {
        /// Hosting element.
        element: ElementId,
        /// Model owning the default.
        model: ModelKind,
    },

    /// A scene was stored or deleted.
    SceneRegisterUpdated {
        /// Scene server element.
        element: ElementId,
        /// Affected scene.
        scene: SceneNumber,
        /// Outcome.
        status: SceneStatusCode,
    },

    /// A scene recall completed.
    SceneRecalled {
        /// Scene server element.
        element: ElementId,
        /// Recalled scene.
        scene: SceneNumber,
    },
}

impl NodeEvent {
    /// Returns the element associated with this event.
    #[must_use]
    pub fn element(&self) -> ElementId {
        match self {
            Self::StateUpdated { element, .. }
            | Self::CurrentState { element, .. }
            | Self::InvalidElement { element, .. }
            | Self::RangeUpdated { element, .. }
            | Self::DefaultUpdated { element, .. }
            | Self::SceneRegisterUpdated { element, .. }
            | Self::SceneRecalled { element, .. } => *element,
        }
    }

    /// Returns the state carried by the event, if any.
    #[must_use]
    pub fn change(&self) -> Option<&StateChange> {
        match self {
            Self::StateUpdated { change, .. } | Self::CurrentState { change, .. } => Some(change),
            _ => None,
        }
    }

    /// Returns `true` for present-state updates.
    #[must_use]
    pub fn is_state_update(&self) -> bool {
        matches!(self, Self::StateUpdated { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Level;

    #[test]
    fn element_of_every_variant() {
        let element = ElementId::new(3);
        let scene = SceneNumber::new(1).unwrap();
        let events = [
            NodeEvent::CurrentState {
                element,
                change: StateChange::level(Level::ZERO),
            },
            NodeEvent::InvalidElement {
                element,
                model: ModelKind::LightCtl,
            },
            NodeEvent::RangeUpdated {
                element,
                model: ModelKind::LightLightness,
                status: RangeStatus::Success,
            },
            NodeEvent::DefaultUpdated {
                element,
                model: ModelKind::LightHsl,
            },
            NodeEvent::SceneRegisterUpdated {
                element,
                scene,
                status: SceneStatusCode::Success,
            },
            NodeEvent::SceneRecalled { element, scene },
        ];
        for event in events {
            assert_eq!(event.element(), element);
            assert!(!event.is_state_update());
        }
    }

    #[test]
    fn change_only_on_state_events() {
        let event = NodeEvent::DefaultUpdated {
            element: ElementId::PRIMARY,
            model: ModelKind::LightCtl,
        };
        assert_eq!(event.change(), None);
    }
}
