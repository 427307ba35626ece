// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for state bindings.

use mesh_lighting::binding::{Conversion, Resolver};
use mesh_lighting::event::NodeEvent;
use mesh_lighting::message::{ModelMessage, Request, Transaction};
use mesh_lighting::state::{StateChange, StateKind, UpdateSource};
use mesh_lighting::transport::MemoryTransport;
use mesh_lighting::types::{
    Address, DeltaUv, ElementId, HslState, Hue, Level, Lightness, OnOff, Saturation, Temperature,
};
use mesh_lighting::{BindError, Error, Node, NodeConfig};

const CLIENT: Address = Address::new(0x0042);
const MAIN: ElementId = ElementId::new(0);
const SUB: ElementId = ElementId::new(1);

fn node_with(config: NodeConfig) -> Node {
    Node::new(config, MemoryTransport::new())
}

fn light_node() -> Node {
    let mut node = node_with(NodeConfig::default());
    node.add_on_off_server(MAIN).unwrap();
    node.add_level_server(MAIN).unwrap();
    node.add_lightness_server(MAIN).unwrap();
    node.bind_lightness(MAIN).unwrap();
    node
}

fn send(
    node: &mut Node,
    element: ElementId,
    tid: u8,
    request_of: impl FnOnce(Transaction) -> Request,
) {
    let request = request_of(Transaction::unacked(tid));
    assert!(node.handle(&ModelMessage::new(element, CLIENT, request)).is_accepted());
}

fn on_off(state: OnOff) -> impl FnOnce(Transaction) -> Request {
    move |txn| Request::OnOffSet { state, txn }
}

fn lightness(value: u16) -> impl FnOnce(Transaction) -> Request {
    move |txn| Request::LightnessSet {
        lightness: Lightness::new(value),
        txn,
    }
}

// ============================================================================
// Generic OnOff and Light Lightness
// ============================================================================

mod lightness {
    use super::*;

    #[test]
    fn switching_on_restores_last_lightness() {
        let mut node = light_node();
        send(&mut node, MAIN, 1, lightness(0x3000));
        assert_eq!(node.on_off_server(MAIN).unwrap().present(), OnOff::On);

        send(&mut node, MAIN, 2, on_off(OnOff::Off));
        assert_eq!(node.lightness_server(MAIN).unwrap().present(), Lightness::MIN);

        send(&mut node, MAIN, 3, on_off(OnOff::On));
        assert_eq!(
            node.lightness_server(MAIN).unwrap().present(),
            Lightness::new(0x3000)
        );
    }

    #[test]
    fn switching_on_prefers_default_lightness() {
        let mut node = light_node();
        node.handle(&ModelMessage::new(
            MAIN,
            CLIENT,
            Request::LightnessDefaultSet {
                lightness: Lightness::new(0x8000),
                acknowledged: false,
            },
        ));
        send(&mut node, MAIN, 1, lightness(0x3000));
        send(&mut node, MAIN, 2, on_off(OnOff::Off));
        send(&mut node, MAIN, 3, on_off(OnOff::On));
        assert_eq!(
            node.lightness_server(MAIN).unwrap().present(),
            Lightness::new(0x8000)
        );
    }

    #[test]
    fn level_drives_lightness() {
        let mut node = light_node();
        send(&mut node, MAIN, 1, |txn| Request::LevelSet {
            level: Level::ZERO,
            txn,
        });
        assert_eq!(
            node.lightness_server(MAIN).unwrap().present(),
            Lightness::new(0x8000)
        );
    }

    #[test]
    fn bound_updates_are_reported_with_their_source() {
        let mut node = light_node();
        let mut events = node.subscribe();
        send(&mut node, MAIN, 1, on_off(OnOff::On));

        let mut bound = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let NodeEvent::StateUpdated {
                change,
                source: UpdateSource::Bind,
                ..
            } = event
            {
                bound.push(change);
            }
        }
        assert_eq!(bound, vec![StateChange::Lightness(Lightness::MAX)]);
    }

    #[test]
    fn bindings_cross_elements() {
        let mut node = light_node();
        node.add_on_off_server(SUB).unwrap();
        node.bind_conversion(Conversion::LightnessToOnOff, MAIN, SUB)
            .unwrap();

        send(&mut node, MAIN, 1, lightness(0x0100));
        assert_eq!(node.on_off_server(SUB).unwrap().present(), OnOff::On);
    }
}

// ============================================================================
// Light CTL and Light HSL
// ============================================================================

mod color {
    use super::*;

    fn ctl_node() -> Node {
        let mut node = light_node();
        node.add_ctl_server(MAIN).unwrap();
        node.add_ctl_temperature_server(SUB).unwrap();
        node.add_level_server(SUB).unwrap();
        node.link_ctl(MAIN, SUB).unwrap();
        node
    }

    #[test]
    fn ctl_set_drives_lightness_on_off_and_level() {
        let mut node = ctl_node();
        send(&mut node, MAIN, 1, |txn| Request::CtlSet {
            lightness: Lightness::new(0x4000),
            temperature: 5000,
            delta_uv: DeltaUv::new(0),
            txn,
        });
        assert_eq!(
            node.lightness_server(MAIN).unwrap().present(),
            Lightness::new(0x4000)
        );
        assert_eq!(node.on_off_server(MAIN).unwrap().present(), OnOff::On);
        assert_eq!(
            node.level_server(MAIN).unwrap().present(),
            Level::new(-16384)
        );
    }

    #[test]
    fn lightness_keeps_ctl_color() {
        let mut node = ctl_node();
        node.bind_ctl(MAIN).unwrap();
        send(&mut node, MAIN, 1, |txn| Request::CtlSet {
            lightness: Lightness::new(0x4000),
            temperature: 5000,
            delta_uv: DeltaUv::new(3),
            txn,
        });
        send(&mut node, MAIN, 2, lightness(0x1000));

        let ctl = node.ctl_server(MAIN).unwrap().present();
        assert_eq!(ctl.lightness, Lightness::new(0x1000));
        assert_eq!(ctl.temperature.value(), 5000);
        assert_eq!(ctl.delta_uv, DeltaUv::new(3));
    }

    #[test]
    fn temperature_and_level_follow_each_other() {
        let mut node = ctl_node();
        node.bind_ctl_temperature(SUB).unwrap();
        assert_eq!(node.bindings().len(), 6);

        send(&mut node, SUB, 1, |txn| Request::LevelSet {
            level: Level::MAX,
            txn,
        });
        let sub = node.ctl_temperature_server(SUB).unwrap().present();
        assert_eq!(sub.temperature, Temperature::MAX);
        // The main element stays in step with its sub-element.
        assert_eq!(
            node.ctl_server(MAIN).unwrap().present().temperature,
            Temperature::MAX
        );

        send(&mut node, SUB, 2, |txn| Request::CtlTemperatureSet {
            temperature: Temperature::MIN.value(),
            delta_uv: DeltaUv::new(0),
            txn,
        });
        assert_eq!(node.level_server(SUB).unwrap().present(), Level::MIN);
    }

    #[test]
    fn on_off_switches_hsl_without_lightness_server() {
        let mut node = node_with(NodeConfig::default());
        node.add_on_off_server(MAIN).unwrap();
        node.add_hsl_server(MAIN).unwrap();
        node.bind_hsl(MAIN).unwrap();
        assert_eq!(node.bindings().len(), 1);

        node.set_local_state(
            MAIN,
            StateChange::Hsl(HslState::new(
                Lightness::MIN,
                Hue::new(0x1234),
                Saturation::new(0x5678),
            )),
        )
        .unwrap();
        send(&mut node, MAIN, 1, on_off(OnOff::On));

        let hsl = node.hsl_server(MAIN).unwrap().present();
        assert_eq!(hsl.lightness, Lightness::MAX);
        assert_eq!(hsl.hue, Hue::new(0x1234));
        assert_eq!(hsl.saturation, Saturation::new(0x5678));
    }
}

// ============================================================================
// Declaration rules
// ============================================================================

mod declaration {
    use super::*;

    fn plain_node(config: NodeConfig) -> Node {
        let mut node = node_with(config);
        node.add_on_off_server(MAIN).unwrap();
        node.add_level_server(MAIN).unwrap();
        node.add_lightness_server(MAIN).unwrap();
        node
    }

    #[test]
    fn table_capacity_is_enforced() {
        let mut node = plain_node(NodeConfig::default().with_bind_capacity(3));
        let err = node.bind_lightness(MAIN).unwrap_err();
        assert!(matches!(
            err,
            Error::Bind(BindError::TableFull { capacity: 3 })
        ));
        assert_eq!(node.bindings().len(), 3);
    }

    #[test]
    fn longer_loops_are_refused() {
        let mut node = plain_node(NodeConfig::default());
        node.bind(
            StateKind::GenericOnOff,
            MAIN,
            StateKind::GenericLevel,
            MAIN,
            Resolver::custom(|_, _| None),
        )
        .unwrap();
        node.bind_conversion(Conversion::LevelToLightness, MAIN, MAIN)
            .unwrap();

        let err = node
            .bind_conversion(Conversion::LightnessToOnOff, MAIN, MAIN)
            .unwrap_err();
        assert!(matches!(err, Error::Bind(BindError::Cycle { .. })));
        assert_eq!(node.bindings().len(), 2);
    }

    #[test]
    fn opposite_pairs_are_allowed() {
        let mut node = plain_node(NodeConfig::default());
        assert!(node
            .bind_conversion(Conversion::LightnessToLevel, MAIN, MAIN)
            .unwrap());
        assert!(node
            .bind_conversion(Conversion::LevelToLightness, MAIN, MAIN)
            .unwrap());
        assert!(!node
            .bind_conversion(Conversion::LevelToLightness, MAIN, MAIN)
            .unwrap());
    }

    #[test]
    fn self_binding_is_refused() {
        let mut node = plain_node(NodeConfig::default());
        let err = node
            .bind(
                StateKind::GenericLevel,
                MAIN,
                StateKind::GenericLevel,
                MAIN,
                Resolver::custom(|_, change| Some(*change)),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Bind(BindError::Cycle { .. })));
    }

    #[test]
    fn missing_target_is_refused() {
        let mut node = plain_node(NodeConfig::default());
        let err = node
            .bind_conversion(Conversion::LevelToHue, MAIN, SUB)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Bind(BindError::MissingState {
                kind: StateKind::LightHslHue,
                element: SUB,
            })
        ));
        assert!(node.bindings().is_empty());
    }
}
