// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use anyhow::Result;

use importdesk::bus::ChangeBus;
use importdesk::store::{SqliteStore, StoreGateway};
use importdesk::{cli, commands, db};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;
    let gateway = Arc::new(StoreGateway::new(
        Arc::new(SqliteStore::new(conn)),
        ChangeBus::new(),
    ));

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("project", sub)) => commands::project::handle(&gateway, sub)?,
        Some(("entry", sub)) => commands::entries::handle(&gateway, sub)?,
        Some(("config", sub)) => commands::config::handle(&gateway, sub)?,
        Some(("notes", sub)) => commands::notes::handle(&gateway, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&gateway, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&gateway)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
