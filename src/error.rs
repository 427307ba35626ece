// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the mesh lighting model layer.
//!
//! Nothing in this layer is fatal. Values are validated when constrained
//! types are built, requests that cannot be honoured are dropped with a
//! [`MessageError`] reason, and binding configuration problems surface as
//! [`BindError`] while the node is being composed.

use thiserror::Error;

use crate::state::StateKind;
use crate::types::ElementId;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// A request was dropped.
    #[error("message dropped: {0}")]
    Message(#[from] MessageError),

    /// The binding graph rejected a declaration.
    #[error("binding error: {0}")]
    Bind(#[from] BindError),

    /// No model instance of the requested kind lives on the element.
    #[error("no model instance on element {0}")]
    InvalidElement(ElementId),

    /// A model instance of the same kind already lives on the element.
    #[error("element {0} already hosts this model")]
    DuplicateInstance(ElementId),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Errors related to value validation and constraints.
///
/// These errors occur when attempting to create constrained types
/// with invalid values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i32,
        /// Maximum allowed value.
        max: i32,
        /// The actual value that was provided.
        actual: i32,
    },

    /// The transition time encodes the reserved step count 0x3F.
    #[error("transition time {0:#04x} uses the prohibited step count")]
    ProhibitedTransitionTime(u8),

    /// Scene number 0 is reserved.
    #[error("scene number 0 is prohibited")]
    ProhibitedSceneNumber,

    /// A range whose minimum exceeds its maximum, or that uses a prohibited bound.
    #[error("invalid range [{min}, {max}]")]
    InvalidRange {
        /// Requested minimum.
        min: u16,
        /// Requested maximum.
        max: u16,
    },
}

/// Reasons an inbound request is dropped without changing state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MessageError {
    /// The transition time byte is prohibited for this request.
    #[error("prohibited transition time {0:#04x}")]
    ProhibitedTransitionTime(u8),

    /// Same source and transaction identifier as the last accepted request.
    #[error("duplicate transaction {tid} from {src:#06x}")]
    DuplicateTransaction {
        /// Source address.
        src: u16,
        /// Transaction identifier.
        tid: u8,
    },

    /// Scene number 0 was requested.
    #[error("prohibited scene number")]
    ProhibitedSceneNumber,

    /// A value that the request may not carry (for instance an inverted range).
    #[error("prohibited parameter value")]
    ProhibitedValue,

    /// The request targets a model that is not hosted on the element.
    #[error("no {model} instance on element {element}")]
    NoInstance {
        /// Element the request was addressed to.
        element: ElementId,
        /// Model the request needs.
        model: &'static str,
    },
}

/// Errors raised while declaring bindings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The bind table already holds its maximum number of entries.
    #[error("bind table is full ({capacity} entries)")]
    TableFull {
        /// Configured capacity.
        capacity: usize,
    },

    /// The edge would close a cycle through three or more bound states.
    #[error("binding {src_kind:?}@{src} -> {tgt_kind:?}@{tgt} would close a cycle")]
    Cycle {
        /// Source state kind.
        src_kind: StateKind,
        /// Source element.
        src: ElementId,
        /// Target state kind.
        tgt_kind: StateKind,
        /// Target element.
        tgt: ElementId,
    },

    /// One end of the binding is not hosted by the node.
    #[error("no instance holds {kind:?} on element {element}")]
    MissingState {
        /// State kind of the missing end.
        kind: StateKind,
        /// Element of the missing end.
        element: ElementId,
    },
}

/// Result type alias for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 800,
            max: 20000,
            actual: 100,
        };
        assert_eq!(err.to_string(), "value 100 is out of range [800, 20000]");
    }

    #[test]
    fn message_error_display() {
        let err = MessageError::DuplicateTransaction { src: 0x0102, tid: 7 };
        assert_eq!(err.to_string(), "duplicate transaction 7 from 0x0102");

        let err = MessageError::ProhibitedTransitionTime(0x3F);
        assert_eq!(err.to_string(), "prohibited transition time 0x3f");
    }

    #[test]
    fn error_from_value_error() {
        let err: Error = ValueError::ProhibitedSceneNumber.into();
        assert!(matches!(err, Error::Value(_)));
    }

    #[test]
    fn error_from_bind_error() {
        let err: Error = BindError::TableFull { capacity: 30 }.into();
        assert_eq!(err.to_string(), "binding error: bind table is full (30 entries)");
    }
}
