// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Debounced autosave as an explicit state machine. The machine never
//! reads a clock: callers feed it discrete events and execute the actions
//! it hands back, so tests drive it without real delays. Timer epochs make
//! stale firings harmless after a restart or cancel.

use std::time::Duration;

/// Quiet period after the last edit before an automatic save.
pub const QUIET_PERIOD: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveState {
    /// Nothing dirty, nothing in flight.
    #[default]
    Idle,
    /// Dirty; a debounce timer is (or should be) running.
    Pending,
    /// A save is in flight. Edits are accepted but not re-scheduled.
    Saving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// Any editor mutation.
    Edited,
    /// A previously started timer expired.
    TimerFired { epoch: u64 },
    /// Operator pressed save. Cancels a pending timer, runs immediately.
    SaveNow,
    SaveSucceeded,
    SaveFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerAction {
    /// (Re)start the debounce timer. Supersedes any earlier epoch.
    StartTimer { epoch: u64, quiet: Duration },
    /// Perform the save and report back with SaveSucceeded/SaveFailed.
    BeginSave,
}

#[derive(Debug, Default)]
pub struct AutosaveScheduler {
    state: SaveState,
    epoch: u64,
    /// An edit (or manual save request) arrived while a save was in
    /// flight; coalesced into a fresh Pending once the flight lands.
    redirty: bool,
}

impl AutosaveScheduler {
    pub fn new() -> AutosaveScheduler {
        AutosaveScheduler::default()
    }

    pub fn state(&self) -> SaveState {
        self.state
    }

    pub fn handle(&mut self, event: SchedulerEvent) -> Option<SchedulerAction> {
        use SchedulerEvent::*;
        match (self.state, event) {
            (SaveState::Idle, Edited) | (SaveState::Pending, Edited) => {
                self.state = SaveState::Pending;
                Some(self.restart_timer())
            }
            (SaveState::Pending, TimerFired { epoch }) if epoch == self.epoch => {
                self.state = SaveState::Saving;
                Some(SchedulerAction::BeginSave)
            }
            // stale timer from a cancelled or restarted debounce
            (_, TimerFired { .. }) => None,
            (SaveState::Idle, SaveNow) | (SaveState::Pending, SaveNow) => {
                self.epoch += 1; // invalidate any running timer
                self.state = SaveState::Saving;
                Some(SchedulerAction::BeginSave)
            }
            (SaveState::Saving, Edited) | (SaveState::Saving, SaveNow) => {
                self.redirty = true;
                None
            }
            (SaveState::Saving, SaveSucceeded) => {
                if self.redirty {
                    self.redirty = false;
                    self.state = SaveState::Pending;
                    Some(self.restart_timer())
                } else {
                    self.state = SaveState::Idle;
                    None
                }
            }
            // the user remains warned their data is unsaved; retry after
            // another quiet period
            (SaveState::Saving, SaveFailed) => {
                self.redirty = false;
                self.state = SaveState::Pending;
                Some(self.restart_timer())
            }
            (_, SaveSucceeded) | (_, SaveFailed) => None,
        }
    }

    fn restart_timer(&mut self) -> SchedulerAction {
        self.epoch += 1;
        SchedulerAction::StartTimer {
            epoch: self.epoch,
            quiet: QUIET_PERIOD,
        }
    }
}
