// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binding declarations.

use tracing::{debug, warn};

use super::Node;
use crate::binding::{BindEntry, BindTable, Conversion, Resolver};
use crate::error::{BindError, Result};
use crate::models::{InstanceKey, ModelKind};
use crate::state::StateKind;
use crate::types::ElementId;

impl Node {
    /// Declares that changes of `src_kind` on `src` drive `tgt_kind` on
    /// `tgt` through `resolver`.
    ///
    /// Returns `Ok(false)` if the same edge was already declared.
    ///
    /// # Errors
    ///
    /// Returns `Error::Bind` when either end is not hosted by the node, the
    /// table is full, or the edge would close a loop.
    pub fn bind(
        &mut self,
        src_kind: StateKind,
        src: ElementId,
        tgt_kind: StateKind,
        tgt: ElementId,
        resolver: impl Into<Resolver>,
    ) -> Result<bool> {
        for (kind, element) in [(src_kind, src), (tgt_kind, tgt)] {
            if !self.hosts(kind, element) {
                warn!(kind = ?kind, element = %element, "Binding to a missing state");
                return Err(BindError::MissingState { kind, element }.into());
            }
        }
        let entry = BindEntry {
            src_kind,
            src,
            tgt_kind,
            tgt,
            resolver: resolver.into(),
        };
        match self.bindings.add(entry) {
            Ok(added) => {
                debug!(
                    src_kind = ?src_kind,
                    src = %src,
                    tgt_kind = ?tgt_kind,
                    tgt = %tgt,
                    added,
                    "Declared binding"
                );
                Ok(added)
            }
            Err(err) => {
                warn!(error = %err, "Binding rejected");
                Err(err.into())
            }
        }
    }

    /// Declares one of the standard bindings.
    ///
    /// # Errors
    ///
    /// See [`Node::bind`].
    pub fn bind_conversion(
        &mut self,
        conversion: Conversion,
        src: ElementId,
        tgt: ElementId,
    ) -> Result<bool> {
        let (src_kind, tgt_kind) = conversion.kinds();
        self.bind(src_kind, src, tgt_kind, tgt, conversion)
    }

    /// Binds the actual lightness on `element` both ways with the OnOff and
    /// Level servers hosted on the same element.
    ///
    /// # Errors
    ///
    /// See [`Node::bind`].
    pub fn bind_lightness(&mut self, element: ElementId) -> Result<()> {
        self.bind_present(
            element,
            &[
                Conversion::LightnessToOnOff,
                Conversion::OnOffToLightness,
                Conversion::LightnessToLevel,
                Conversion::LevelToLightness,
            ],
        )
    }

    /// Lets the lightness, OnOff and Level states on `element` drive the
    /// lightness of the Light CTL server there.
    ///
    /// # Errors
    ///
    /// See [`Node::bind`].
    pub fn bind_ctl(&mut self, element: ElementId) -> Result<()> {
        self.bind_present(
            element,
            &[
                Conversion::LightnessToCtl,
                Conversion::OnOffToCtl,
                Conversion::LevelToCtl,
            ],
        )
    }

    /// Binds the CTL temperature on `element` both ways with the Level
    /// server hosted on the same element.
    ///
    /// # Errors
    ///
    /// See [`Node::bind`].
    pub fn bind_ctl_temperature(&mut self, element: ElementId) -> Result<()> {
        self.bind_present(
            element,
            &[
                Conversion::CtlTemperatureToLevel,
                Conversion::LevelToCtlTemperature,
            ],
        )
    }

    /// Lets the lightness, OnOff and Level states on `element` drive the
    /// lightness of the Light HSL server there.
    ///
    /// # Errors
    ///
    /// See [`Node::bind`].
    pub fn bind_hsl(&mut self, element: ElementId) -> Result<()> {
        self.bind_present(
            element,
            &[
                Conversion::LightnessToHsl,
                Conversion::OnOffToHsl,
                Conversion::LevelToHsl,
            ],
        )
    }

    /// Binds the hue on `element` both ways with its Level server.
    ///
    /// # Errors
    ///
    /// See [`Node::bind`].
    pub fn bind_hue(&mut self, element: ElementId) -> Result<()> {
        self.bind_present(element, &[Conversion::HueToLevel, Conversion::LevelToHue])
    }

    /// Binds the saturation on `element` both ways with its Level server.
    ///
    /// # Errors
    ///
    /// See [`Node::bind`].
    pub fn bind_saturation(&mut self, element: ElementId) -> Result<()> {
        self.bind_present(
            element,
            &[Conversion::SaturationToLevel, Conversion::LevelToSaturation],
        )
    }

    /// Returns the declared bindings.
    #[must_use]
    pub fn bindings(&self) -> &BindTable {
        &self.bindings
    }

    /// Declares the same-element conversions whose two ends are hosted.
    fn bind_present(&mut self, element: ElementId, conversions: &[Conversion]) -> Result<()> {
        for conversion in conversions {
            let (src_kind, tgt_kind) = conversion.kinds();
            if self.hosts(src_kind, element) && self.hosts(tgt_kind, element) {
                self.bind_conversion(*conversion, element, element)?;
            }
        }
        Ok(())
    }

    fn hosts(&self, kind: StateKind, element: ElementId) -> bool {
        self.instances
            .contains_key(&InstanceKey::new(element, model_of(kind)))
    }
}

/// Model that owns a state kind.
const fn model_of(kind: StateKind) -> ModelKind {
    match kind {
        StateKind::GenericOnOff => ModelKind::GenericOnOff,
        StateKind::GenericLevel => ModelKind::GenericLevel,
        StateKind::LightLightnessActual | StateKind::LightLightnessLinear => {
            ModelKind::LightLightness
        }
        StateKind::LightCtl => ModelKind::LightCtl,
        StateKind::LightCtlTemperature => ModelKind::LightCtlTemperature,
        StateKind::LightHsl => ModelKind::LightHsl,
        StateKind::LightHslHue => ModelKind::LightHslHue,
        StateKind::LightHslSaturation => ModelKind::LightHslSaturation,
    }
}

#[cfg(test)]
mod tests {
    use crate::binding::Conversion;
    use crate::error::{BindError, Error};
    use crate::node::{Node, NodeConfig};
    use crate::state::{StateChange, StateKind};
    use crate::transport::MemoryTransport;
    use crate::types::{ElementId, Level, Lightness, OnOff};

    const EL: ElementId = ElementId::PRIMARY;

    fn node() -> Node {
        let mut node = Node::new(NodeConfig::default(), MemoryTransport::new());
        node.add_on_off_server(EL).unwrap();
        node.add_level_server(EL).unwrap();
        node.add_lightness_server(EL).unwrap();
        node
    }

    #[test]
    fn missing_end_is_rejected() {
        let mut node = node();
        let err = node
            .bind_conversion(Conversion::LightnessToCtl, EL, EL)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Bind(BindError::MissingState {
                kind: StateKind::LightCtl,
                ..
            })
        ));
    }

    #[test]
    fn bind_lightness_declares_both_directions() {
        let mut node = node();
        node.bind_lightness(EL).unwrap();
        assert_eq!(node.bindings().len(), 4);
        node.bind_lightness(EL).unwrap();
        assert_eq!(node.bindings().len(), 4);
    }

    #[test]
    fn lightness_drives_on_off_and_level() {
        let mut node = node();
        node.bind_lightness(EL).unwrap();
        node.set_local_state(EL, StateChange::Lightness(Lightness::new(0xC000)))
            .unwrap();
        assert_eq!(node.on_off_server(EL).unwrap().present(), OnOff::On);
        assert_eq!(node.level_server(EL).unwrap().present(), Level::new(0x4000));

        node.set_local_state(EL, StateChange::OnOff(OnOff::Off)).unwrap();
        assert_eq!(node.lightness_server(EL).unwrap().present(), Lightness::MIN);
        // A bound update does not resolve further edges.
        assert_eq!(node.level_server(EL).unwrap().present(), Level::new(0x4000));
    }

    #[test]
    fn custom_resolver() {
        let mut node = node();
        node.bind(
            StateKind::GenericOnOff,
            EL,
            StateKind::GenericLevel,
            EL,
            crate::binding::Resolver::custom(|_, change| match change {
                StateChange::OnOff(OnOff::On) => Some(StateChange::Level(Level::new(77))),
                _ => None,
            }),
        )
        .unwrap();
        node.set_local_state(EL, StateChange::OnOff(OnOff::On)).unwrap();
        assert_eq!(node.level_server(EL).unwrap().present(), Level::new(77));
    }
}
