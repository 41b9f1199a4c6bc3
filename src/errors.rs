// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Local, synchronous rejection of an editor mutation. No state changes
/// when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("'{0}' is required")]
    MissingField(&'static str),

    #[error("invalid number '{value}' for '{field}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("no entry with id '{0}'")]
    UnknownEntry(String),
}

/// The persistent store could not be read or written. Reads degrade to an
/// empty collection at the session level; writes leave the session dirty so
/// a retry remains possible.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The change stream closed underneath a subscriber. Not a data-loss event:
/// the session simply stops receiving live updates until reconnected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("change stream interrupted")]
pub struct StreamInterrupted;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no project with id or name '{0}'")]
    UnknownProject(String),
}
