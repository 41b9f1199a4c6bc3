// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod config;
pub mod doctor;
pub mod entries;
pub mod exporter;
pub mod notes;
pub mod project;

use std::sync::Arc;

use anyhow::Result;

use crate::session::Session;
use crate::store::StoreGateway;

/// Bootstrap a session and honor a --project selector if one was given.
/// Every CLI invocation is one short-lived editing session.
pub(crate) fn open_session(gateway: &Arc<StoreGateway>, m: &clap::ArgMatches) -> Result<Session> {
    let mut session = Session::bootstrap(gateway.clone());
    if let Some(warning) = session.store_warning() {
        eprintln!("warning: {}", warning);
    }
    if let Some(key) = m.get_one::<String>("project") {
        session.select_project(key)?;
    }
    Ok(session)
}
