// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use serde::Serialize;

use crate::derive;
use crate::editor::DraftEntry;
use crate::models::{Config, PaidFilter, Status, StatusFilter};
use crate::store::StoreGateway;
use crate::utils::{confirm, fmt_money, fmt_percent, maybe_print_json, pretty_table};

use super::open_session;

pub fn handle(gateway: &Arc<StoreGateway>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(gateway, sub)?,
        Some(("list", sub)) => list(gateway, sub)?,
        Some(("edit", sub)) => edit(gateway, sub)?,
        Some(("rm", sub)) => remove(gateway, sub)?,
        Some(("pay", sub)) => pay(gateway, sub)?,
        _ => {}
    }
    Ok(())
}

/// Overlay CLI arguments on a draft. Input amounts are in the project's
/// display currency, exactly like form input would be.
fn apply_entry_args(
    draft: &mut DraftEntry,
    sub: &clap::ArgMatches,
    config: &Config,
) -> Result<()> {
    if let Some(v) = sub.get_one::<String>("description") {
        draft.description = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("recipient") {
        draft.recipient = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("supplier") {
        draft.supplier = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("invoice") {
        draft.invoice = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("eta") {
        draft.eta = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("note") {
        draft.note = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("base") {
        draft.set_base_price(v, config);
    }
    if let Some(v) = sub.get_one::<String>("iof") {
        draft.set_iof_percent(v);
    }
    if let Some(v) = sub.get_one::<String>("tax") {
        draft.tax_percent = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("shipping") {
        draft.shipping = v.clone();
    }
    if let Some(tier) = sub.get_one::<usize>("tier") {
        let amount = config
            .shipping_tiers
            .get(tier.wrapping_sub(1))
            .copied()
            .ok_or_else(|| anyhow!("Shipping tier must be 1, 2 or 3"))?;
        draft.shipping = derive::to_display(amount, config).normalize().to_string();
    }
    if let Some(v) = sub.get_one::<String>("status") {
        draft.status =
            Status::parse_strict(v).ok_or_else(|| anyhow!("Unknown status '{}' (use ordered|in-transit|delivered)", v))?;
    }
    if sub.get_flag("tax-free") {
        draft.tax_free = true;
    }
    if sub.get_flag("paid") {
        draft.paid = true;
    }
    Ok(())
}

fn add(gateway: &Arc<StoreGateway>, sub: &clap::ArgMatches) -> Result<()> {
    let mut session = open_session(gateway, sub)?;
    let config = session.current().config.clone();
    let mut draft = DraftEntry::empty();
    // seed tax from the project default the way a fresh form would
    draft.tax_percent = config.default_tax_percent.normalize().to_string();
    apply_entry_args(&mut draft, sub, &config)?;
    let id = session.add_entry(&draft)?;
    session.save_now()?;
    if let Some(entry) = session.current().entries.iter().find(|e| e.id == id) {
        println!(
            "Added {} '{}' (sale {}, profit {})",
            entry.id,
            entry.description,
            fmt_money(entry.sale_price, &config),
            fmt_money(derive::profit(entry), &config),
        );
    }
    Ok(())
}

fn edit(gateway: &Arc<StoreGateway>, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let mut session = open_session(gateway, sub)?;
    let config = session.current().config.clone();
    let entry = session
        .current()
        .entries
        .iter()
        .find(|e| &e.id == id)
        .ok_or_else(|| anyhow!("No entry with id '{}'", id))?;
    let mut draft = DraftEntry::from_entry(entry, &config);
    apply_entry_args(&mut draft, sub, &config)?;
    session.update_entry(id, &draft)?;
    session.save_now()?;
    println!("Updated {}", id);
    Ok(())
}

fn remove(gateway: &Arc<StoreGateway>, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let mut session = open_session(gateway, sub)?;
    if !sub.get_flag("yes") && !confirm(&format!("Delete entry '{}'?", id))? {
        println!("Aborted.");
        return Ok(());
    }
    session.delete_entry(id)?;
    session.save_now()?;
    println!("Deleted {}", id);
    Ok(())
}

fn pay(gateway: &Arc<StoreGateway>, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let mut session = open_session(gateway, sub)?;
    let paid = session.toggle_paid(id)?;
    session.save_now()?;
    println!("{} is now {}", id, if paid { "paid" } else { "pending" });
    Ok(())
}

#[derive(Serialize)]
pub struct EntryRow {
    pub id: String,
    pub description: String,
    pub recipient: String,
    pub supplier: String,
    pub base: String,
    pub sale: String,
    pub cost: String,
    pub profit: String,
    pub margin: String,
    pub status: String,
    pub paid: bool,
}

fn list(gateway: &Arc<StoreGateway>, sub: &clap::ArgMatches) -> Result<()> {
    let mut session = open_session(gateway, sub)?;
    let mut filters = session.current().filters.clone();
    let mut touched = false;
    if let Some(v) = sub.get_one::<String>("search") {
        filters.search = v.clone();
        touched = true;
    }
    if let Some(v) = sub.get_one::<String>("status") {
        filters.status = StatusFilter::parse_lossy(v);
        touched = true;
    }
    if let Some(v) = sub.get_one::<String>("paid") {
        filters.paid = PaidFilter::parse_lossy(v);
        touched = true;
    }
    if touched {
        // last-used filters are part of the project, so a reload anywhere
        // restores the same view
        session.set_filters(filters.clone());
        session.save_now()?;
    }

    let project = session.current();
    let config = &project.config;
    let data: Vec<EntryRow> = project
        .entries
        .iter()
        .filter(|e| filters.matches(e))
        .map(|e| EntryRow {
            id: e.id.clone(),
            description: e.description.clone(),
            recipient: e.recipient.clone(),
            supplier: e.supplier.clone(),
            base: fmt_money(e.base_price, config),
            sale: fmt_money(e.sale_price, config),
            cost: fmt_money(derive::cost(e), config),
            profit: fmt_money(derive::profit(e), config),
            margin: fmt_percent(derive::margin(e)),
            status: e.status.as_str().to_string(),
            paid: e.paid,
        })
        .collect();

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.description.clone(),
                    r.recipient.clone(),
                    r.supplier.clone(),
                    r.base.clone(),
                    r.sale.clone(),
                    r.cost.clone(),
                    r.profit.clone(),
                    r.margin.clone(),
                    r.status.clone(),
                    if r.paid { "yes".into() } else { "no".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "Item", "Recipient", "Supplier", "Base", "Sale", "Cost", "Profit",
                    "Margin", "Status", "Paid",
                ],
                rows,
            )
        );
        let totals = derive::totals(&project.entries);
        println!(
            "Invested {} | Revenue {} | Profit {} | Taxes {} | Paid {}",
            fmt_money(totals.invested, config),
            fmt_money(totals.revenue, config),
            fmt_money(totals.profit, config),
            fmt_money(totals.taxes, config),
            fmt_money(totals.paid_amount, config),
        );
    }
    Ok(())
}
