// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-session reconciliation. A session owns its copy of the project
//! list, an editor over the current project, and the autosave scheduler.
//! The one rule that matters: a change notification never overwrites local
//! unsaved work. It either triggers a reload (clean session) or raises
//! `has_remote_update` (dirty session). Across sessions the store is
//! last-writer-wins at save granularity; that trade-off is deliberate.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::autosave::{AutosaveScheduler, SaveState, SchedulerAction, SchedulerEvent};
use crate::bus::{StreamEvent, Subscription};
use crate::editor::{DraftEntry, ProjectEditor};
use crate::errors::{SessionError, StoreError, ValidationError};
use crate::models::{Config, Filters, Project};
use crate::store::StoreGateway;

pub struct Session {
    gateway: Arc<StoreGateway>,
    projects: Vec<Project>,
    editor: ProjectEditor,
    scheduler: AutosaveScheduler,
    /// Latest timer request for the autosave driver to pick up.
    pending_action: Option<SchedulerAction>,
    has_remote_update: bool,
    last_saved_at: Option<DateTime<Utc>>,
    store_warning: Option<String>,
}

impl Session {
    /// First load. An empty (or unreadable) store bootstraps exactly one
    /// default project, persisted before anything renders.
    pub fn bootstrap(gateway: Arc<StoreGateway>) -> Session {
        let (mut projects, mut store_warning) = match gateway.load() {
            Ok(projects) => (projects, None),
            Err(e) => (Vec::new(), Some(format!("could not load projects: {e}"))),
        };
        let mut scheduler = AutosaveScheduler::new();
        let mut pending_action = None;
        let mut last_saved_at = None;
        if projects.is_empty() {
            projects.push(Project::default_project());
            match gateway.save(&projects) {
                Ok(at) => last_saved_at = Some(at),
                Err(e) => {
                    store_warning = Some(format!("could not save projects: {e}"));
                    // stays dirty so the bootstrap project is not lost
                    pending_action = scheduler.handle(SchedulerEvent::Edited);
                }
            }
        }
        let editor = ProjectEditor::new(projects[0].clone());
        Session {
            gateway,
            projects,
            editor,
            scheduler,
            pending_action,
            has_remote_update: false,
            last_saved_at,
            store_warning,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// The project as this session currently sees it, local edits included.
    pub fn current(&self) -> &Project {
        self.editor.project()
    }

    pub fn is_dirty(&self) -> bool {
        // a Pending scheduler without a dirty editor happens when the
        // bootstrap save failed; the unsaved default project still counts
        self.editor.is_dirty() || self.scheduler.state() == SaveState::Pending
    }

    pub fn is_saving(&self) -> bool {
        self.scheduler.state() == SaveState::Saving
    }

    pub fn has_remote_update(&self) -> bool {
        self.has_remote_update
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    pub fn store_warning(&self) -> Option<&str> {
        self.store_warning.as_deref()
    }

    /// The save-state line the operator always sees; there is no bare
    /// failure without a recovery path.
    pub fn status_line(&self) -> String {
        if self.is_saving() {
            "saving...".to_string()
        } else if self.is_dirty() && self.has_remote_update {
            "unsaved local changes (newer remote version exists)".to_string()
        } else if self.is_dirty() {
            "unsaved local changes".to_string()
        } else if self.has_remote_update {
            "newer remote version exists".to_string()
        } else {
            "saved".to_string()
        }
    }

    // ---- editor mutations (all mark dirty and poke the scheduler) ----

    pub fn add_entry(&mut self, draft: &DraftEntry) -> Result<String, ValidationError> {
        let id = self.editor.add_entry(draft)?;
        self.note_edit();
        Ok(id)
    }

    pub fn update_entry(&mut self, id: &str, draft: &DraftEntry) -> Result<(), ValidationError> {
        self.editor.update_entry(id, draft)?;
        self.note_edit();
        Ok(())
    }

    pub fn delete_entry(&mut self, id: &str) -> Result<(), ValidationError> {
        self.editor.delete_entry(id)?;
        self.note_edit();
        Ok(())
    }

    pub fn toggle_paid(&mut self, id: &str) -> Result<bool, ValidationError> {
        let paid = self.editor.toggle_paid(id)?;
        self.note_edit();
        Ok(paid)
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.editor.set_notes(notes);
        if self.editor.is_dirty() {
            self.note_edit();
        }
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.editor.set_filters(filters);
        if self.editor.is_dirty() {
            self.note_edit();
        }
    }

    pub fn update_config(&mut self, config: Config, draft: Option<&mut DraftEntry>) {
        self.editor.update_config(config, draft);
        self.note_edit();
    }

    fn note_edit(&mut self) {
        if let Some(action) = self.scheduler.handle(SchedulerEvent::Edited) {
            self.pending_action = Some(action);
        }
    }

    // ---- saving ----

    /// Manual save: cancels any pending debounce and runs immediately. A
    /// save already in flight absorbs the request instead of overlapping.
    pub fn save_now(&mut self) -> Result<(), StoreError> {
        match self.scheduler.handle(SchedulerEvent::SaveNow) {
            Some(SchedulerAction::BeginSave) => self.perform_save(),
            _ => Ok(()),
        }
    }

    /// Debounce expiry from the driver. Stale epochs are no-ops. Returns
    /// whether a save ran.
    pub fn fire_timer(&mut self, epoch: u64) -> Result<bool, StoreError> {
        match self.scheduler.handle(SchedulerEvent::TimerFired { epoch }) {
            Some(SchedulerAction::BeginSave) => self.perform_save().map(|_| true),
            _ => Ok(false),
        }
    }

    /// Latest timer request, if any, for an autosave driver.
    pub fn take_action(&mut self) -> Option<SchedulerAction> {
        self.pending_action.take()
    }

    fn perform_save(&mut self) -> Result<(), StoreError> {
        self.commit_current();
        match self.gateway.save(&self.projects) {
            Ok(at) => {
                self.last_saved_at = Some(at);
                self.editor.mark_clean();
                // our write is the newest version now
                self.has_remote_update = false;
                self.store_warning = None;
                if let Some(action) = self.scheduler.handle(SchedulerEvent::SaveSucceeded) {
                    self.pending_action = Some(action);
                }
                Ok(())
            }
            Err(e) => {
                // the session stays dirty; nothing is lost and a retry is
                // rescheduled after another quiet period
                self.store_warning = Some(format!("could not save projects: {e}"));
                if let Some(action) = self.scheduler.handle(SchedulerEvent::SaveFailed) {
                    self.pending_action = Some(action);
                }
                Err(e)
            }
        }
    }

    /// Fold the working copy back into the session's project list.
    fn commit_current(&mut self) {
        let current = self.editor.project().clone();
        match self.projects.iter_mut().find(|p| p.id == current.id) {
            Some(slot) => *slot = current,
            None => self.projects.insert(0, current),
        }
    }

    // ---- reconciliation ----

    /// A "data changed" signal arrived. Local unsaved work always wins:
    /// the session only reloads when it has nothing at stake.
    pub fn on_change_notification(&mut self) -> Result<bool, StoreError> {
        if self.is_dirty() || self.is_saving() {
            self.has_remote_update = true;
            return Ok(false);
        }
        self.reload()?;
        Ok(true)
    }

    /// Force-reload from the store, discarding local edits. Used both by
    /// the clean-session notification path and by the operator's explicit
    /// reload action (last-writer-wins at the user's request).
    pub fn reload(&mut self) -> Result<(), StoreError> {
        let projects = match self.gateway.load() {
            Ok(projects) => projects,
            Err(e) => {
                // degrade: keep local state, surface the warning
                self.store_warning = Some(format!("could not load projects: {e}"));
                return Err(e);
            }
        };
        let current_id = self.editor.project().id.clone();
        self.projects = projects;
        if self.projects.is_empty() {
            self.projects.push(Project::default_project());
            if let Ok(at) = self.gateway.save(&self.projects) {
                self.last_saved_at = Some(at);
            }
        }
        let project = self
            .projects
            .iter()
            .find(|p| p.id == current_id)
            .unwrap_or(&self.projects[0])
            .clone();
        self.editor = ProjectEditor::new(project);
        self.scheduler = AutosaveScheduler::new();
        self.pending_action = None;
        self.has_remote_update = false;
        self.store_warning = None;
        self.last_saved_at = Some(Utc::now());
        Ok(())
    }

    /// Switch to another project by id or name. Always a full reload;
    /// draft and editor state reset to the selected project's data.
    pub fn select_project(&mut self, key: &str) -> Result<(), SessionError> {
        let projects = self.gateway.load()?;
        let project = projects
            .iter()
            .find(|p| p.id == key || p.name == key)
            .cloned()
            .ok_or_else(|| SessionError::UnknownProject(key.to_string()))?;
        self.projects = projects;
        self.editor = ProjectEditor::new(project);
        self.scheduler = AutosaveScheduler::new();
        self.pending_action = None;
        self.has_remote_update = false;
        self.store_warning = None;
        Ok(())
    }

    /// Create a project, switch to it, persist immediately. The previous
    /// project's unsaved edits are folded into the list first, not dropped.
    pub fn create_project(&mut self, name: &str) -> Result<String, StoreError> {
        self.commit_current();
        let mut project = Project::default_project();
        project.name = if name.trim().is_empty() {
            format!("Projeto {}", self.projects.len() + 1)
        } else {
            name.trim().to_string()
        };
        project.config = self.editor.project().config.clone();
        let id = project.id.clone();
        self.projects.insert(0, project.clone());
        self.editor = ProjectEditor::new(project);
        self.scheduler = AutosaveScheduler::new();
        self.save_now()?;
        Ok(id)
    }

    /// Remove a project by writing the collection without it; the store has
    /// no delete-by-id primitive.
    pub fn delete_project(&mut self, key: &str) -> Result<(), SessionError> {
        let idx = self
            .projects
            .iter()
            .position(|p| p.id == key || p.name == key)
            .ok_or_else(|| SessionError::UnknownProject(key.to_string()))?;
        let removed = self.projects.remove(idx);
        if removed.id == self.editor.project().id {
            if self.projects.is_empty() {
                self.projects.push(Project::default_project());
            }
            self.editor = ProjectEditor::new(self.projects[0].clone());
        }
        self.save_now()?;
        Ok(())
    }

    /// Drain queued change signals without blocking (cooperative callers).
    /// A closed stream is not data loss: the session just stops hearing
    /// about remote changes.
    pub fn reconcile(&mut self, subscription: &mut Subscription) -> Result<bool, StoreError> {
        match subscription.try_next() {
            Ok(Some(_)) => self.on_change_notification(),
            Ok(None) | Err(_) => Ok(false),
        }
    }
}

/// One debounce cycle: wait out the pending quiet period (if any) and fire
/// the timer. An edit that restarted the timer in the meantime bumps the
/// epoch, so the stale expiry is ignored.
pub async fn drive_autosave(session: &tokio::sync::Mutex<Session>) -> Result<bool, StoreError> {
    let action = { session.lock().await.take_action() };
    let Some(SchedulerAction::StartTimer { epoch, quiet }) = action else {
        return Ok(false);
    };
    tokio::time::sleep(quiet).await;
    session.lock().await.fire_timer(epoch)
}

/// Long-lived reconciliation loop over a change subscription. Heartbeats
/// (and the initial connected event) are ignored; update signals reconcile
/// through the dirty gate. Returns when the stream closes.
pub async fn watch_changes(
    session: &tokio::sync::Mutex<Session>,
    subscription: &mut Subscription,
) {
    loop {
        match subscription.next().await {
            Ok(StreamEvent::Connected) | Ok(StreamEvent::Heartbeat) => {}
            Ok(StreamEvent::ProjectsUpdated(_)) => {
                // a failed reload already left its warning on the session
                let _ = session.lock().await.on_change_notification();
            }
            Err(_) => return,
        }
    }
}
