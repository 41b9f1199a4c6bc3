// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use anyhow::Result;

use crate::store::StoreGateway;

use super::open_session;

pub fn handle(gateway: &Arc<StoreGateway>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let session = open_session(gateway, sub)?;
            let project = session.current();
            if project.notes.is_empty() {
                println!("No notes for '{}'", project.name);
            } else {
                println!("{}", project.notes);
            }
        }
        Some(("set", sub)) => {
            let text = sub.get_one::<String>("text").unwrap();
            let mut session = open_session(gateway, sub)?;
            session.set_notes(text);
            session.save_now()?;
            println!("Notes updated for '{}'", session.current().name);
        }
        _ => {}
    }
    Ok(())
}
