// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-instance transition state machine.
//!
//! A [`Transition`] owns the present and target value of one model
//! instance together with the bookkeeping needed to walk from one to the
//! other. It never touches a clock: every operation returns a [`Schedule`]
//! telling the caller which timer to arm, and timer expiry is reported back
//! through [`Transition::on_timer`].
//!
//! The walk has three phases. An optional delay runs first. A transition
//! longer than one tick is then split into `transition / tick` steps, the
//! last of which is merged into the final wait so the target is always
//! applied exactly. Shorter transitions wait once for their whole length.
//!
//! # Examples
//!
//! ```
//! use mesh_lighting::state::UpdateSource;
//! use mesh_lighting::transition::{Schedule, Tick, Transition};
//! use mesh_lighting::types::{Delay, Level};
//!
//! let mut transition = Transition::new(Level::ZERO);
//! let schedule = transition.start(Level::new(500), 500, Delay::NONE, UpdateSource::Client, 100);
//! assert_eq!(schedule, Schedule::Wait(100));
//!
//! let mut ticks = 1;
//! loop {
//!     match transition.on_timer(100) {
//!         Tick::Step(Schedule::Wait(_)) => ticks += 1,
//!         Tick::Complete => break,
//!         other => panic!("unexpected {other:?}"),
//!     }
//! }
//! transition.complete();
//! assert_eq!(ticks, 5);
//! assert_eq!(transition.present(), Level::new(500));
//! ```

use crate::state::UpdateSource;
use crate::types::Delay;

use super::Interpolate;

/// Timer the owner must arm next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Wait for the delay to elapse, in milliseconds.
    Delay(u32),
    /// Wait for the next step or the end of the transition, in milliseconds.
    Wait(u32),
    /// Apply the target now.
    Apply,
}

/// Outcome of a timer expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Nothing was pending.
    Idle,
    /// The delay elapsed. The transition proper starts with the schedule.
    DelayElapsed(Schedule),
    /// One step was applied to the present value.
    Step(Schedule),
    /// The transition time elapsed. The owner applies the target.
    Complete,
}

/// Present, target and progress of one transitioned state.
#[derive(Debug, Clone, Copy)]
pub struct Transition<V: Interpolate> {
    present: V,
    target: V,
    remaining_ms: u32,
    delay: Delay,
    steps: u32,
    step: V::Step,
    source: UpdateSource,
}

impl<V: Interpolate> Transition<V> {
    /// Creates an idle transition resting at `initial`.
    pub fn new(initial: V) -> Self {
        Self {
            present: initial,
            target: initial,
            remaining_ms: 0,
            delay: Delay::NONE,
            steps: 0,
            step: V::Step::default(),
            source: UpdateSource::default(),
        }
    }

    /// Returns the present value.
    pub fn present(&self) -> V {
        self.present
    }

    /// Returns the target value.
    pub fn target(&self) -> V {
        self.target
    }

    /// Returns what started the latest transition.
    pub fn source(&self) -> UpdateSource {
        self.source
    }

    /// Returns the pending delay.
    pub fn delay(&self) -> Delay {
        self.delay
    }

    /// Returns the transition time not yet consumed, in milliseconds.
    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    /// Returns the number of ticks left before the final wait.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Returns `true` while a delay or a transition is pending.
    pub fn is_active(&self) -> bool {
        !self.delay.is_none() || self.remaining_ms > 0
    }

    /// Starts a transition toward `target`.
    ///
    /// Reaching a target equal to the present value takes no time, although
    /// the delay still applies.
    pub fn start(
        &mut self,
        target: V,
        transition_ms: u32,
        delay: Delay,
        source: UpdateSource,
        tick_ms: u32,
    ) -> Schedule {
        let transition_ms = if target == self.present {
            0
        } else {
            transition_ms
        };
        self.steps = if V::STEPPED && tick_ms > 0 {
            transition_ms / tick_ms
        } else {
            0
        };
        self.step = if self.steps > 0 {
            V::step_towards(self.present, target, self.steps)
        } else {
            V::Step::default()
        };
        self.target = target;
        self.remaining_ms = transition_ms;
        self.delay = delay;
        self.source = source;
        self.schedule(tick_ms)
    }

    /// Starts an open-ended walk toward `bound`, re-armed by the owner every
    /// `interval_ms` until the bound is reached.
    pub fn start_ramp(
        &mut self,
        bound: V,
        interval_ms: u32,
        delay: Delay,
        source: UpdateSource,
    ) -> Schedule {
        self.steps = 0;
        self.step = V::Step::default();
        self.target = bound;
        self.remaining_ms = interval_ms.max(1);
        self.delay = delay;
        self.source = source;
        if delay.is_none() {
            Schedule::Wait(self.remaining_ms)
        } else {
            Schedule::Delay(delay.as_millis())
        }
    }

    /// Advances the state machine after the armed timer expired.
    pub fn on_timer(&mut self, tick_ms: u32) -> Tick {
        if !self.delay.is_none() {
            self.delay = Delay::NONE;
            return Tick::DelayElapsed(self.schedule(tick_ms));
        }
        if self.remaining_ms == 0 {
            return Tick::Idle;
        }
        if self.steps > 0 {
            self.steps -= 1;
            self.remaining_ms = self.remaining_ms.saturating_sub(tick_ms);
            self.present = self.present.advance(self.step);
            if self.steps == 1 {
                self.steps = 0;
            }
            return Tick::Step(self.schedule(tick_ms));
        }
        self.remaining_ms = 0;
        Tick::Complete
    }

    /// Lands on the target and clears all progress.
    pub fn complete(&mut self) -> V {
        self.present = self.target;
        self.halt();
        self.present
    }

    /// Stops where the present value is.
    pub fn stop(&mut self) {
        self.target = self.present;
        self.halt();
    }

    /// Overwrites the present value without touching progress.
    pub fn set_present(&mut self, value: V) {
        self.present = value;
    }

    /// Overwrites the target value without touching progress.
    pub fn set_target(&mut self, value: V) {
        self.target = value;
    }

    /// Milliseconds the transition still needs once the armed timer fires.
    pub fn remaining_after_timer(&self, tick_ms: u32) -> u32 {
        if !self.delay.is_none() {
            self.remaining_ms
        } else if self.steps > 0 {
            (self.steps - 1) * tick_ms
        } else {
            0
        }
    }

    fn halt(&mut self) {
        self.remaining_ms = 0;
        self.steps = 0;
        self.delay = Delay::NONE;
        self.step = V::Step::default();
    }

    fn schedule(&self, tick_ms: u32) -> Schedule {
        if !self.delay.is_none() {
            Schedule::Delay(self.delay.as_millis())
        } else if self.remaining_ms == 0 {
            Schedule::Apply
        } else if self.steps > 0 {
            Schedule::Wait(tick_ms)
        } else {
            Schedule::Wait(self.remaining_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Level, Lightness, OnOff};

    const TICK: u32 = 100;

    fn run_to_end<V: Interpolate>(transition: &mut Transition<V>) -> Vec<V> {
        let mut seen = Vec::new();
        loop {
            match transition.on_timer(TICK) {
                Tick::Step(schedule) => {
                    seen.push(transition.present());
                    if schedule == Schedule::Apply {
                        break;
                    }
                }
                Tick::DelayElapsed(Schedule::Apply) | Tick::Complete => break,
                Tick::DelayElapsed(_) => {}
                Tick::Idle => panic!("timer fired while idle"),
            }
        }
        seen.push(transition.complete());
        seen
    }

    #[test]
    fn immediate_set_applies() {
        let mut t = Transition::new(Level::ZERO);
        let schedule = t.start(Level::new(10), 0, Delay::NONE, UpdateSource::Client, TICK);
        assert_eq!(schedule, Schedule::Apply);
        assert_eq!(t.complete(), Level::new(10));
        assert!(!t.is_active());
    }

    #[test]
    fn same_target_takes_no_time() {
        let mut t = Transition::new(Level::new(7));
        let schedule = t.start(Level::new(7), 5_000, Delay::NONE, UpdateSource::Client, TICK);
        assert_eq!(schedule, Schedule::Apply);
    }

    #[test]
    fn five_hundred_ms_lands_in_five_ticks() {
        let mut t = Transition::new(Lightness::new(0));
        t.start(Lightness::new(1000), 500, Delay::NONE, UpdateSource::Client, TICK);
        let seen = run_to_end(&mut t);
        assert_eq!(seen.len(), 5);
        assert_eq!(seen.last().copied(), Some(Lightness::new(1000)));
        assert!(seen.windows(2).all(|w| w[0].value() <= w[1].value()));
    }

    #[test]
    fn short_transition_waits_once() {
        let mut t = Transition::new(Level::ZERO);
        let schedule = t.start(Level::new(100), 50, Delay::NONE, UpdateSource::Client, TICK);
        assert_eq!(schedule, Schedule::Wait(50));
        assert_eq!(t.on_timer(TICK), Tick::Complete);
    }

    #[test]
    fn delay_runs_first() {
        let mut t = Transition::new(Level::ZERO);
        let schedule = t.start(Level::new(100), 200, Delay::new(20), UpdateSource::Client, TICK);
        assert_eq!(schedule, Schedule::Delay(100));
        assert_eq!(t.remaining_after_timer(TICK), 200);
        assert_eq!(t.on_timer(TICK), Tick::DelayElapsed(Schedule::Wait(TICK)));
    }

    #[test]
    fn remaining_counts_whole_ticks() {
        let mut t = Transition::new(Level::ZERO);
        t.start(Level::new(1000), 1_000, Delay::NONE, UpdateSource::Client, TICK);
        assert_eq!(t.remaining_after_timer(TICK), 900);
        t.on_timer(TICK);
        assert_eq!(t.remaining_after_timer(TICK), 800);
    }

    #[test]
    fn onoff_waits_for_whole_transition() {
        let mut t = Transition::new(OnOff::Off);
        let schedule = t.start(OnOff::On, 300, Delay::NONE, UpdateSource::Client, TICK);
        assert_eq!(schedule, Schedule::Wait(300));
        assert_eq!(t.on_timer(TICK), Tick::Complete);
        assert_eq!(t.complete(), OnOff::On);
    }

    #[test]
    fn ramp_waits_one_interval() {
        let mut t = Transition::new(Level::ZERO);
        assert_eq!(
            t.start_ramp(Level::MAX, 100, Delay::NONE, UpdateSource::Client),
            Schedule::Wait(100)
        );
        assert_eq!(t.target(), Level::MAX);
        t.stop();
        assert_eq!(t.target(), Level::ZERO);
        assert!(!t.is_active());
    }
}
