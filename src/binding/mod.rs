// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binding graph between model states.
//!
//! A binding is a directed edge from a source state to a target state,
//! optionally across elements. When the source changes because of a client
//! or the application, the edge's [`Resolver`] computes the new target value
//! and the node applies it as a bound update. Bound updates never resolve
//! further edges, so propagation stops after one hop.
//!
//! # Examples
//!
//! ```
//! use mesh_lighting::binding::{BindEntry, BindTable, Conversion};
//! use mesh_lighting::types::ElementId;
//!
//! let mut table = BindTable::new(30);
//! let (src_kind, tgt_kind) = Conversion::LightnessToLevel.kinds();
//! let added = table
//!     .add(BindEntry {
//!         src_kind,
//!         src: ElementId::PRIMARY,
//!         tgt_kind,
//!         tgt: ElementId::PRIMARY,
//!         resolver: Conversion::LightnessToLevel.into(),
//!     })
//!     .unwrap();
//! assert!(added);
//! assert_eq!(table.len(), 1);
//! ```

mod resolver;
mod table;

pub use resolver::{Conversion, ResolveFn, Resolver, StateLookup};
pub use table::{BindEntry, BindTable};
