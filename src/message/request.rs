// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound model requests.

use crate::types::{
    Address, Delay, DeltaUv, ElementId, HslState, Hue, Level, Lightness, OnOff, Saturation,
    TransactionId, TransitionTime,
};

/// Optional transition parameters of a set request.
///
/// The transition byte is carried raw so the handler can drop requests
/// that use the prohibited step count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Timing {
    /// Requested transition time.
    pub transition: TransitionTime,
    /// Delay before the transition starts.
    pub delay: Delay,
}

impl Timing {
    /// Creates timing parameters from raw fields.
    #[must_use]
    pub const fn new(transition: u8, delay: u8) -> Self {
        Self {
            transition: TransitionTime::from_raw(transition),
            delay: Delay::new(delay),
        }
    }
}

/// Transaction fields shared by transitioned set requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Transaction {
    /// Transaction identifier.
    pub tid: TransactionId,
    /// Transition parameters. `None` selects the default transition time.
    pub timing: Option<Timing>,
    /// Whether the client expects a status reply.
    pub acknowledged: bool,
}

impl Transaction {
    /// Creates an acknowledged transaction using the default transition.
    #[must_use]
    pub const fn acked(tid: TransactionId) -> Self {
        Self {
            tid,
            timing: None,
            acknowledged: true,
        }
    }

    /// Creates an unacknowledged transaction using the default transition.
    #[must_use]
    pub const fn unacked(tid: TransactionId) -> Self {
        Self {
            tid,
            timing: None,
            acknowledged: false,
        }
    }

    /// Adds explicit transition parameters.
    #[must_use]
    pub const fn with_timing(mut self, transition: u8, delay: u8) -> Self {
        self.timing = Some(Timing::new(transition, delay));
        self
    }
}

/// A decoded request addressed to one model.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Request {
    /// Generic OnOff Get.
    OnOffGet,
    /// Generic OnOff Set.
    OnOffSet {
        /// Requested state.
        state: OnOff,
        /// Transaction fields.
        txn: Transaction,
    },

    /// Generic Level Get.
    LevelGet,
    /// Generic Level Set.
    LevelSet {
        /// Requested level.
        level: Level,
        /// Transaction fields.
        txn: Transaction,
    },
    /// Generic Delta Set.
    DeltaSet {
        /// Offset from the level at the start of the transaction.
        delta: i32,
        /// Transaction fields.
        txn: Transaction,
    },
    /// Generic Move Set.
    MoveSet {
        /// Level change per transition time. Zero stops a running move.
        delta: i16,
        /// Transaction fields.
        txn: Transaction,
    },

    /// Generic Default Transition Time Get.
    DefaultTransitionGet,
    /// Generic Default Transition Time Set.
    DefaultTransitionSet {
        /// New default.
        time: TransitionTime,
        /// Whether a status reply is expected.
        acknowledged: bool,
    },

    /// Light Lightness Get.
    LightnessGet,
    /// Light Lightness Set.
    LightnessSet {
        /// Requested actual lightness.
        lightness: Lightness,
        /// Transaction fields.
        txn: Transaction,
    },
    /// Light Lightness Linear Get.
    LightnessLinearGet,
    /// Light Lightness Linear Set.
    LightnessLinearSet {
        /// Requested linear lightness.
        linear: u16,
        /// Transaction fields.
        txn: Transaction,
    },
    /// Light Lightness Last Get.
    LightnessLastGet,
    /// Light Lightness Default Get.
    LightnessDefaultGet,
    /// Light Lightness Default Set.
    LightnessDefaultSet {
        /// New default.
        lightness: Lightness,
        /// Whether a status reply is expected.
        acknowledged: bool,
    },
    /// Light Lightness Range Get.
    LightnessRangeGet,
    /// Light Lightness Range Set.
    LightnessRangeSet {
        /// Requested minimum.
        min: u16,
        /// Requested maximum.
        max: u16,
        /// Whether a status reply is expected.
        acknowledged: bool,
    },

    /// Light CTL Get.
    CtlGet,
    /// Light CTL Set.
    CtlSet {
        /// Requested lightness.
        lightness: Lightness,
        /// Requested temperature, clamped into the temperature range.
        temperature: u16,
        /// Requested delta UV.
        delta_uv: DeltaUv,
        /// Transaction fields.
        txn: Transaction,
    },
    /// Light CTL Temperature Get.
    CtlTemperatureGet,
    /// Light CTL Temperature Set.
    CtlTemperatureSet {
        /// Requested temperature, clamped into the temperature range.
        temperature: u16,
        /// Requested delta UV.
        delta_uv: DeltaUv,
        /// Transaction fields.
        txn: Transaction,
    },
    /// Light CTL Temperature Range Get.
    CtlTemperatureRangeGet,
    /// Light CTL Temperature Range Set.
    CtlTemperatureRangeSet {
        /// Requested minimum.
        min: u16,
        /// Requested maximum.
        max: u16,
        /// Whether a status reply is expected.
        acknowledged: bool,
    },
    /// Light CTL Default Get.
    CtlDefaultGet,
    /// Light CTL Default Set.
    CtlDefaultSet {
        /// Default lightness.
        lightness: Lightness,
        /// Default temperature.
        temperature: u16,
        /// Default delta UV.
        delta_uv: DeltaUv,
        /// Whether a status reply is expected.
        acknowledged: bool,
    },

    /// Light HSL Get.
    HslGet,
    /// Light HSL Target Get.
    HslTargetGet,
    /// Light HSL Set.
    HslSet {
        /// Requested state.
        state: HslState,
        /// Transaction fields.
        txn: Transaction,
    },
    /// Light HSL Hue Get.
    HslHueGet,
    /// Light HSL Hue Set.
    HslHueSet {
        /// Requested hue.
        hue: Hue,
        /// Transaction fields.
        txn: Transaction,
    },
    /// Light HSL Saturation Get.
    HslSaturationGet,
    /// Light HSL Saturation Set.
    HslSaturationSet {
        /// Requested saturation.
        saturation: Saturation,
        /// Transaction fields.
        txn: Transaction,
    },
    /// Light HSL Default Get.
    HslDefaultGet,
    /// Light HSL Default Set.
    HslDefaultSet {
        /// New default.
        state: HslState,
        /// Whether a status reply is expected.
        acknowledged: bool,
    },
    /// Light HSL Range Get.
    HslRangeGet,
    /// Light HSL Range Set.
    HslRangeSet {
        /// Requested hue minimum.
        hue_min: u16,
        /// Requested hue maximum.
        hue_max: u16,
        /// Requested saturation minimum.
        saturation_min: u16,
        /// Requested saturation maximum.
        saturation_max: u16,
        /// Whether a status reply is expected.
        acknowledged: bool,
    },

    /// Scene Get.
    SceneGet,
    /// Scene Register Get.
    SceneRegisterGet,
    /// Scene Store.
    SceneStore {
        /// Scene number to store.
        number: u16,
        /// Whether a status reply is expected.
        acknowledged: bool,
    },
    /// Scene Recall.
    SceneRecall {
        /// Scene number to recall.
        number: u16,
        /// Transaction fields.
        txn: Transaction,
    },
    /// Scene Delete.
    SceneDelete {
        /// Scene number to delete.
        number: u16,
        /// Whether a status reply is expected.
        acknowledged: bool,
    },
}

/// A request together with its addressing context.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ModelMessage {
    /// Element the request is addressed to.
    pub element: ElementId,
    /// Source address of the client.
    pub src: Address,
    /// Application key the request arrived with.
    pub app_key_index: u16,
    /// Whether the request was sent to a unicast address.
    pub unicast: bool,
    /// The request itself.
    pub request: Request,
}

impl ModelMessage {
    /// Creates a unicast message from `src` on application key 0.
    #[must_use]
    pub fn new(element: ElementId, src: Address, request: Request) -> Self {
        Self {
            element,
            src,
            app_key_index: 0,
            unicast: true,
            request,
        }
    }

    /// Sets the application key index.
    #[must_use]
    pub fn with_app_key_index(mut self, index: u16) -> Self {
        self.app_key_index = index;
        self
    }

    /// Marks the message as received on a group or virtual address.
    #[must_use]
    pub fn with_group_destination(mut self) -> Self {
        self.unicast = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_builders() {
        let txn = Transaction::acked(3).with_timing(0x05, 20);
        assert!(txn.acknowledged);
        assert_eq!(txn.timing.map(|t| t.transition.raw()), Some(0x05));
        assert_eq!(txn.timing.map(|t| t.delay.as_millis()), Some(100));
        assert!(!Transaction::unacked(1).acknowledged);
    }

    #[test]
    fn message_builders() {
        let message = ModelMessage::new(ElementId::new(1), Address::new(0x10), Request::OnOffGet)
            .with_app_key_index(4)
            .with_group_destination();
        assert_eq!(message.app_key_index, 4);
        assert!(!message.unicast);
    }
}
