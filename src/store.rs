// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persistence seam. The store is an opaque keyed collection with exactly
//! two operations: read everything, replace everything. Deletion is
//! "write the collection without it". The gateway layers normalization on
//! reads and a change-bus signal on successful writes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use serde_json::Value;

use crate::bus::ChangeBus;
use crate::errors::StoreError;
use crate::models::Project;

pub trait ProjectStore: Send + Sync {
    /// Every stored record, in collection order. A store with nothing in it
    /// reads as an empty list, never as an error.
    fn read_all(&self) -> Result<Vec<Value>, StoreError>;

    /// Atomically replace the whole collection. No partial-write state is
    /// observable by readers.
    fn replace_all(&self, projects: &[Project]) -> Result<(), StoreError>;
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> SqliteStore {
        SqliteStore { conn: Mutex::new(conn) }
    }
}

impl ProjectStore for SqliteStore {
    fn read_all(&self) -> Result<Vec<Value>, StoreError> {
        let conn = self.conn.lock().map_err(poisoned)?;
        let mut stmt = conn.prepare("SELECT data FROM projects ORDER BY position ASC")?;
        let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            let raw = row?;
            // a row that is not JSON at all has nothing left to salvage;
            // everything else is normalized downstream
            if let Ok(value) = serde_json::from_str::<Value>(&raw) {
                out.push(value);
            }
        }
        Ok(out)
    }

    fn replace_all(&self, projects: &[Project]) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().map_err(poisoned)?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM projects", [])?;
        for (position, project) in projects.iter().enumerate() {
            tx.execute(
                "INSERT INTO projects(id, position, data) VALUES (?1, ?2, ?3)",
                params![
                    project.id,
                    position as i64,
                    serde_json::to_string(project)?
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Unavailable("store connection poisoned".to_string())
}

/// In-memory store with switchable failures; backs the multi-session tests
/// and any embedding that wants no disk at all.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Value>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl ProjectStore for MemoryStore {
    fn read_all(&self) -> Result<Vec<Value>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated read failure".to_string()));
        }
        Ok(self.records.lock().map_err(poisoned)?.clone())
    }

    fn replace_all(&self, projects: &[Project]) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated write failure".to_string()));
        }
        let mut records = self.records.lock().map_err(poisoned)?;
        records.clear();
        for project in projects {
            records.push(serde_json::to_value(project)?);
        }
        Ok(())
    }
}

/// Store plus change bus: the only path sessions use to touch persistence.
pub struct StoreGateway {
    store: Arc<dyn ProjectStore>,
    bus: ChangeBus,
}

impl StoreGateway {
    pub fn new(store: Arc<dyn ProjectStore>, bus: ChangeBus) -> StoreGateway {
        StoreGateway { store, bus }
    }

    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    /// Read and normalize the whole collection. Malformed records are
    /// repaired with defaults, never fatal; an unavailable store is the
    /// only error.
    pub fn load(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self
            .store
            .read_all()?
            .iter()
            .map(Project::from_value)
            .collect())
    }

    /// Raw stored records, pre-normalization. The doctor uses this to
    /// report records that a load would have to repair.
    pub fn load_raw(&self) -> Result<Vec<Value>, StoreError> {
        self.store.read_all()
    }

    /// Replace the stored collection and signal every subscriber. Returns
    /// the save timestamp carried by the notification.
    pub fn save(&self, projects: &[Project]) -> Result<DateTime<Utc>, StoreError> {
        self.store.replace_all(projects)?;
        let at = Utc::now();
        self.bus.notify(at);
        Ok(at)
    }
}
