// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::derive;
use crate::session::Session;
use crate::store::StoreGateway;
use crate::utils::{confirm, fmt_money, maybe_print_json, pretty_table};

pub fn handle(gateway: &Arc<StoreGateway>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(gateway, sub)?,
        Some(("new", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let mut session = Session::bootstrap(gateway.clone());
            let id = session.create_project(name)?;
            println!("Created project '{}' ({})", session.current().name, id);
        }
        Some(("rm", sub)) => remove(gateway, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct ProjectRow {
    id: String,
    name: String,
    entries: usize,
    invested: String,
    revenue: String,
    profit: String,
}

fn list(gateway: &Arc<StoreGateway>, sub: &clap::ArgMatches) -> Result<()> {
    let session = Session::bootstrap(gateway.clone());
    let data: Vec<ProjectRow> = session
        .projects()
        .iter()
        .map(|p| {
            let totals = derive::totals(&p.entries);
            ProjectRow {
                id: p.id.clone(),
                name: p.name.clone(),
                entries: p.entries.len(),
                invested: fmt_money(totals.invested, &p.config),
                revenue: fmt_money(totals.revenue, &p.config),
                profit: fmt_money(totals.profit, &p.config),
            }
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.name.clone(),
                    r.entries.to_string(),
                    r.invested.clone(),
                    r.revenue.clone(),
                    r.profit.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Name", "Entries", "Invested", "Revenue", "Profit"], rows)
        );
    }
    Ok(())
}

fn remove(gateway: &Arc<StoreGateway>, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("key").unwrap();
    let mut session = Session::bootstrap(gateway.clone());
    if !sub.get_flag("yes") && !confirm(&format!("Delete project '{}'?", key))? {
        println!("Aborted.");
        return Ok(());
    }
    session.delete_project(key)?;
    println!("Deleted project '{}'", key);
    Ok(())
}
