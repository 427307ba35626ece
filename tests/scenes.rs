// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the Scene server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use mesh_lighting::binding::Resolver;
use mesh_lighting::message::{ModelMessage, Request, StatusMessage, Target, Transaction};
use mesh_lighting::models::{ModelKind, ModelSnapshot};
use mesh_lighting::scene::SceneStatusCode;
use mesh_lighting::state::StateKind;
use mesh_lighting::transport::{MemoryStore, MemoryTransport};
use mesh_lighting::types::{
    Address, ElementId, Level, Lightness, OnOff, SceneNumber, TransitionTime,
};
use mesh_lighting::{Error, Node, NodeConfig};

const CLIENT: Address = Address::new(0x0042);
const EL: ElementId = ElementId::PRIMARY;

fn scene(number: u16) -> SceneNumber {
    SceneNumber::new(number).unwrap()
}

fn scene_node(config: NodeConfig) -> (Node, MemoryTransport) {
    let transport = MemoryTransport::new();
    let mut node = Node::new(config, transport.clone());
    node.add_on_off_server(EL).unwrap();
    node.add_level_server(EL).unwrap();
    node.add_lightness_server(EL).unwrap();
    node.add_scene_server(EL).unwrap();
    node.bind_lightness(EL).unwrap();
    (node, transport)
}

fn send(node: &mut Node, request: Request) {
    assert!(node.handle(&ModelMessage::new(EL, CLIENT, request)).is_accepted());
}

fn set_lightness(node: &mut Node, tid: u8, value: u16) {
    send(
        node,
        Request::LightnessSet {
            lightness: Lightness::new(value),
            txn: Transaction::unacked(tid),
        },
    );
}

fn lightness(node: &Node) -> Lightness {
    node.lightness_server(EL).unwrap().present()
}

fn last_reply(transport: &MemoryTransport) -> StatusMessage {
    transport
        .sent()
        .pop()
        .expect("a reply should have been sent")
}

// ============================================================================
// Store and recall
// ============================================================================

mod recall {
    use super::*;

    #[test]
    fn recall_restores_every_stored_state() {
        let (mut node, transport) = scene_node(NodeConfig::default());
        set_lightness(&mut node, 1, 0x2000);
        send(
            &mut node,
            Request::SceneStore {
                number: 1,
                acknowledged: true,
            },
        );
        assert_eq!(
            last_reply(&transport),
            StatusMessage::SceneRegister {
                status: SceneStatusCode::Success,
                current: Some(scene(1)),
                scenes: vec![scene(1)],
            }
        );

        set_lightness(&mut node, 2, 0xF000);
        send(
            &mut node,
            Request::SceneRecall {
                number: 1,
                txn: Transaction::acked(3),
            },
        );
        assert_eq!(
            last_reply(&transport),
            StatusMessage::Scene {
                status: SceneStatusCode::Success,
                current: Some(scene(1)),
                target: None,
            }
        );
        assert_eq!(lightness(&node), Lightness::new(0x2000));
        assert_eq!(node.on_off_server(EL).unwrap().present(), OnOff::On);
        assert_eq!(
            node.level_server(EL).unwrap().present(),
            Level::from_lightness(Lightness::new(0x2000))
        );
    }

    #[test]
    fn recall_with_transition_reports_target() {
        let (mut node, transport) = scene_node(NodeConfig::default());
        set_lightness(&mut node, 1, 0x1000);
        node.store_scene(EL, scene(1)).unwrap();
        set_lightness(&mut node, 2, 0x5000);

        send(
            &mut node,
            Request::SceneRecall {
                number: 1,
                txn: Transaction::acked(3).with_timing(0x05, 0),
            },
        );
        assert_eq!(
            last_reply(&transport),
            StatusMessage::Scene {
                status: SceneStatusCode::Success,
                current: None,
                target: Some(Target::new(scene(1), TransitionTime::from_millis(500))),
            }
        );
        assert!(node.scene_server(EL).unwrap().is_recalling());

        node.advance(200);
        let midway = lightness(&node);
        assert!(midway > Lightness::new(0x1000) && midway < Lightness::new(0x5000));

        node.advance(300);
        assert_eq!(lightness(&node), Lightness::new(0x1000));
        assert_eq!(node.scene_server(EL).unwrap().current(), Some(scene(1)));
        assert!(!node.scene_server(EL).unwrap().is_recalling());
    }

    #[test]
    fn delayed_recall_acknowledges_after_the_delay() {
        let (mut node, transport) = scene_node(NodeConfig::default());
        set_lightness(&mut node, 1, 0x2000);
        node.store_scene(EL, scene(4)).unwrap();
        set_lightness(&mut node, 2, 0xFFFF);
        transport.clear();

        send(
            &mut node,
            Request::SceneRecall {
                number: 4,
                txn: Transaction::acked(3).with_timing(0x00, 10),
            },
        );
        assert!(transport.sent().is_empty());
        assert_eq!(lightness(&node), Lightness::new(0xFFFF));

        node.advance(50);
        assert_eq!(lightness(&node), Lightness::new(0x2000));
        assert_eq!(
            transport.sent(),
            vec![StatusMessage::Scene {
                status: SceneStatusCode::Success,
                current: Some(scene(4)),
                target: None,
            }]
        );
    }

    #[test]
    fn recalling_the_current_scene_skips_the_transition() {
        let (mut node, _transport) = scene_node(NodeConfig::default());
        set_lightness(&mut node, 1, 0x2000);
        node.store_scene(EL, scene(1)).unwrap();

        let code = node
            .recall_scene(EL, scene(1), 1_000, mesh_lighting::types::Delay::NONE)
            .unwrap();
        assert_eq!(code, SceneStatusCode::Success);
        assert!(!node.scene_server(EL).unwrap().is_recalling());
        assert_eq!(node.scene_server(EL).unwrap().current(), Some(scene(1)));
        assert_eq!(lightness(&node), Lightness::new(0x2000));
    }
}

// ============================================================================
// Register
// ============================================================================

mod register {
    use super::*;

    #[test]
    fn full_register_and_unknown_scenes() {
        let (mut node, transport) = scene_node(NodeConfig::default().with_scene_capacity(2));
        for number in [1, 2, 3] {
            send(
                &mut node,
                Request::SceneStore {
                    number,
                    acknowledged: true,
                },
            );
        }
        assert_eq!(
            last_reply(&transport),
            StatusMessage::SceneRegister {
                status: SceneStatusCode::RegisterFull,
                current: Some(scene(2)),
                scenes: vec![scene(1), scene(2)],
            }
        );

        send(
            &mut node,
            Request::SceneRecall {
                number: 9,
                txn: Transaction::acked(1),
            },
        );
        let StatusMessage::Scene { status, .. } = last_reply(&transport) else {
            panic!("expected a scene status");
        };
        assert_eq!(status, SceneStatusCode::NotFound);

        send(
            &mut node,
            Request::SceneDelete {
                number: 9,
                acknowledged: true,
            },
        );
        let StatusMessage::SceneRegister { status, scenes, .. } = last_reply(&transport) else {
            panic!("expected a scene register status");
        };
        assert_eq!(status, SceneStatusCode::NotFound);
        assert_eq!(scenes.len(), 2);
    }

    #[test]
    fn delete_frees_a_slot() {
        let (mut node, _transport) = scene_node(NodeConfig::default().with_scene_capacity(1));
        node.store_scene(EL, scene(1)).unwrap();
        assert_eq!(
            node.store_scene(EL, scene(2)).unwrap(),
            SceneStatusCode::RegisterFull
        );
        assert_eq!(
            node.delete_scene(EL, scene(1)).unwrap(),
            SceneStatusCode::Success
        );
        assert_eq!(
            node.store_scene(EL, scene(2)).unwrap(),
            SceneStatusCode::Success
        );
        assert_eq!(node.scene_server(EL).unwrap().register().scenes(), vec![scene(2)]);
    }

    #[test]
    fn client_change_clears_current_scene() {
        let (mut node, transport) = scene_node(NodeConfig::default());
        node.store_scene(EL, scene(1)).unwrap();
        assert_eq!(node.scene_server(EL).unwrap().current(), Some(scene(1)));

        set_lightness(&mut node, 1, 0x1234);
        send(&mut node, Request::SceneGet);
        let StatusMessage::Scene { current, .. } = last_reply(&transport) else {
            panic!("expected a scene status");
        };
        assert_eq!(current, None);
    }

    #[test]
    fn missing_scene_server_is_an_error() {
        let (mut node, _transport) = scene_node(NodeConfig::default());
        let err = node
            .store_scene(ElementId::new(3), scene(1))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidElement(element) if element == ElementId::new(3)));
    }

    #[test]
    fn register_is_saved() {
        let transport = MemoryTransport::new();
        let store = MemoryStore::new();
        let mut node = Node::with_store(NodeConfig::default(), transport, store.clone());
        node.add_on_off_server(EL).unwrap();
        node.add_scene_server(EL).unwrap();

        node.store_scene(EL, scene(7)).unwrap();
        assert!(matches!(
            store.snapshot(EL, ModelKind::Scene),
            Some(ModelSnapshot::Scene { current, scenes })
                if current == Some(scene(7)) && scenes == vec![scene(7)]
        ));
    }
}

// ============================================================================
// Bindings
// ============================================================================

mod bindings {
    use super::*;

    #[test]
    fn recall_does_not_resolve_bindings() {
        let transport = MemoryTransport::new();
        let mut node = Node::new(NodeConfig::default(), transport);
        node.add_on_off_server(EL).unwrap();
        node.add_level_server(EL).unwrap();
        node.add_scene_server(EL).unwrap();

        let resolved = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&resolved);
        node.bind(
            StateKind::GenericOnOff,
            EL,
            StateKind::GenericLevel,
            EL,
            Resolver::custom(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                None
            }),
        )
        .unwrap();

        send(
            &mut node,
            Request::OnOffSet {
                state: OnOff::On,
                txn: Transaction::unacked(1),
            },
        );
        node.store_scene(EL, scene(1)).unwrap();
        send(
            &mut node,
            Request::OnOffSet {
                state: OnOff::Off,
                txn: Transaction::unacked(2),
            },
        );
        assert_eq!(resolved.load(Ordering::SeqCst), 2);

        node.recall_scene(EL, scene(1), 0, mesh_lighting::types::Delay::NONE)
            .unwrap();
        assert_eq!(node.on_off_server(EL).unwrap().present(), OnOff::On);
        assert_eq!(resolved.load(Ordering::SeqCst), 2);
    }
}
