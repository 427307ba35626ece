// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timer queue and cancellation handles.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::models::InstanceKey;
use crate::types::ElementId;

/// Work to run when a timer expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduledTask {
    /// Delay, step or end of a model transition.
    Transition(InstanceKey),
    /// End of the de-duplication window of a model instance.
    TransactionExpiry(InstanceKey),
    /// Delay or end of a scene recall on a scene server.
    SceneRecall(ElementId),
}

type Deadline = (u64, u64);

#[derive(Debug, Default)]
struct Inner {
    now_ms: u64,
    next_seq: u64,
    pending: BTreeMap<Deadline, ScheduledTask>,
}

/// Queue of pending timers ordered by deadline, then by arming order.
#[derive(Clone, Default)]
pub struct TimerQueue {
    inner: Arc<Mutex<Inner>>,
}

impl TimerQueue {
    /// Creates an empty queue at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current virtual time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.inner.lock().now_ms
    }

    /// Arms a timer that expires `delay_ms` from now.
    ///
    /// The timer lives as long as the returned handle.
    #[must_use = "dropping the handle cancels the timer"]
    pub fn arm(&self, task: ScheduledTask, delay_ms: u32) -> TimerHandle {
        let mut inner = self.inner.lock();
        let key = (inner.now_ms + u64::from(delay_ms), inner.next_seq);
        inner.next_seq += 1;
        inner.pending.insert(key, task);
        TimerHandle {
            key,
            queue: Arc::downgrade(&self.inner),
        }
    }

    /// Returns the earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.inner
            .lock()
            .pending
            .first_key_value()
            .map(|((deadline, _), _)| *deadline)
    }

    /// Removes the earliest timer expiring at or before `until_ms`.
    ///
    /// The clock moves to the deadline of the returned timer, so timers
    /// armed while handling it are measured from that instant.
    pub fn pop_due(&self, until_ms: u64) -> Option<ScheduledTask> {
        let mut inner = self.inner.lock();
        let entry = inner.pending.first_entry()?;
        let (deadline, _) = *entry.key();
        if deadline > until_ms {
            return None;
        }
        let task = entry.remove();
        inner.now_ms = inner.now_ms.max(deadline);
        Some(task)
    }

    /// Moves the clock forward to `now_ms`.
    pub fn advance_to(&self, now_ms: u64) {
        let mut inner = self.inner.lock();
        inner.now_ms = inner.now_ms.max(now_ms);
    }

    /// Returns the number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().pending.len()
    }

    /// Returns `true` when no timer is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().pending.is_empty()
    }
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("TimerQueue")
            .field("now_ms", &inner.now_ms)
            .field("pending", &inner.pending.len())
            .finish()
    }
}

/// Owner of one armed timer. Dropping it cancels the timer.
pub struct TimerHandle {
    key: Deadline,
    queue: Weak<Mutex<Inner>>,
}

impl TimerHandle {
    /// Returns the milliseconds left before expiry, or 0 once it fired.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn remaining_ms(&self) -> u32 {
        let Some(inner) = self.queue.upgrade() else {
            return 0;
        };
        let inner = inner.lock();
        if !inner.pending.contains_key(&self.key) {
            return 0;
        }
        self.key
            .0
            .saturating_sub(inner.now_ms)
            .min(u64::from(u32::MAX)) as u32
    }

    /// Returns `true` while the timer has neither fired nor been cancelled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.queue
            .upgrade()
            .is_some_and(|inner| inner.lock().pending.contains_key(&self.key))
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(inner) = self.queue.upgrade() {
            inner.lock().pending.remove(&self.key);
        }
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("deadline_ms", &self.key.0)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelKind;

    fn task(element: u8) -> ScheduledTask {
        ScheduledTask::Transition(InstanceKey::new(
            ElementId::new(element),
            ModelKind::GenericLevel,
        ))
    }

    #[test]
    fn dropping_handle_cancels() {
        let queue = TimerQueue::new();
        let handle = queue.arm(task(0), 10);
        assert_eq!(queue.len(), 1);
        drop(handle);
        assert!(queue.is_empty());
        assert_eq!(queue.pop_due(100), None);
    }

    #[test]
    fn same_deadline_fires_in_arming_order() {
        let queue = TimerQueue::new();
        let _a = queue.arm(task(1), 50);
        let _b = queue.arm(task(2), 50);
        assert_eq!(queue.pop_due(50), Some(task(1)));
        assert_eq!(queue.pop_due(50), Some(task(2)));
    }

    #[test]
    fn pop_moves_clock_to_deadline() {
        let queue = TimerQueue::new();
        let _a = queue.arm(task(0), 30);
        let _b = queue.arm(task(1), 80);
        assert_eq!(queue.pop_due(100), Some(task(0)));
        assert_eq!(queue.now_ms(), 30);
        let c = queue.arm(task(2), 10);
        assert_eq!(c.remaining_ms(), 10);
        assert_eq!(queue.next_deadline(), Some(40));
    }

    #[test]
    fn remaining_tracks_clock() {
        let queue = TimerQueue::new();
        let handle = queue.arm(task(0), 100);
        queue.advance_to(40);
        assert_eq!(handle.remaining_ms(), 60);
        assert!(handle.is_pending());
        assert_eq!(queue.pop_due(100), Some(task(0)));
        assert_eq!(handle.remaining_ms(), 0);
    }

    #[test]
    fn clock_never_moves_back() {
        let queue = TimerQueue::new();
        queue.advance_to(500);
        queue.advance_to(100);
        assert_eq!(queue.now_ms(), 500);
    }
}
