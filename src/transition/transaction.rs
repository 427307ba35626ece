// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transaction de-duplication.

use crate::error::MessageError;
use crate::types::{Address, TransactionId};

/// Where a deferred acknowledgement goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AckContext {
    /// Requesting client.
    pub dst: Address,
    /// Application key the request arrived with.
    pub app_key_index: u16,
    /// Whether the request was addressed to a unicast address.
    pub unicast: bool,
}

/// The last accepted `(source, TID)` pair of a model instance.
///
/// The owner arms an expiry timer every time [`TransactionRecord::check`]
/// accepts a request and calls [`TransactionRecord::expire`] when it fires.
#[derive(Debug, Clone, Copy)]
pub struct TransactionRecord {
    src: Address,
    tid: TransactionId,
    ack: Option<AckContext>,
}

impl Default for TransactionRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionRecord {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            src: Address::UNASSIGNED,
            tid: 0,
            ack: None,
        }
    }

    /// Returns `true` when `(src, tid)` is the live recorded transaction.
    #[must_use]
    pub fn matches(&self, src: Address, tid: TransactionId) -> bool {
        !self.src.is_unassigned() && self.src == src && self.tid == tid
    }

    /// Records a new transaction.
    ///
    /// `ack` is `Some` when the request expects a status reply. It replaces
    /// any acknowledgement still owed for an earlier transaction.
    ///
    /// # Errors
    ///
    /// Returns `MessageError::DuplicateTransaction` if the pair is already
    /// recorded and has not expired.
    pub fn check(
        &mut self,
        src: Address,
        tid: TransactionId,
        ack: Option<AckContext>,
    ) -> Result<(), MessageError> {
        if self.matches(src, tid) {
            return Err(MessageError::DuplicateTransaction {
                src: src.value(),
                tid,
            });
        }
        self.src = src;
        self.tid = tid;
        self.ack = ack;
        Ok(())
    }

    /// Forgets the recorded source so the next request is accepted.
    pub fn expire(&mut self) {
        self.src = Address::UNASSIGNED;
    }

    /// Takes the acknowledgement owed for the recorded transaction.
    pub fn take_ack(&mut self) -> Option<AckContext> {
        self.ack.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIENT: Address = Address::new(0x0042);

    #[test]
    fn duplicate_rejected_until_expired() {
        let mut record = TransactionRecord::new();
        assert!(record.check(CLIENT, 5, None).is_ok());
        assert_eq!(
            record.check(CLIENT, 5, None),
            Err(MessageError::DuplicateTransaction { src: 0x42, tid: 5 })
        );
        record.expire();
        assert!(record.check(CLIENT, 5, None).is_ok());
    }

    #[test]
    fn different_source_or_tid_accepted() {
        let mut record = TransactionRecord::new();
        record.check(CLIENT, 5, None).unwrap();
        assert!(record.check(CLIENT, 6, None).is_ok());
        assert!(record.check(Address::new(0x0043), 6, None).is_ok());
    }

    #[test]
    fn ack_taken_once() {
        let mut record = TransactionRecord::new();
        let ack = AckContext {
            dst: CLIENT,
            app_key_index: 1,
            unicast: true,
        };
        record.check(CLIENT, 1, Some(ack)).unwrap();
        assert_eq!(record.take_ack(), Some(ack));
        assert_eq!(record.take_ack(), None);
    }

    #[test]
    fn unassigned_record_never_matches() {
        let record = TransactionRecord::new();
        assert!(!record.matches(Address::UNASSIGNED, 0));
    }
}
