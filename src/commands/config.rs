// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use anyhow::{Result, anyhow};

use crate::editor::DraftConfig;
use crate::models::CurrencyMode;
use crate::store::StoreGateway;
use crate::utils::pretty_table;

use super::open_session;

pub fn handle(gateway: &Arc<StoreGateway>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(gateway, sub)?,
        Some(("set", sub)) => set(gateway, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(gateway: &Arc<StoreGateway>, sub: &clap::ArgMatches) -> Result<()> {
    let session = open_session(gateway, sub)?;
    let project = session.current();
    let c = &project.config;
    let rows = vec![
        vec!["default IOF %".into(), c.default_iof_percent.normalize().to_string()],
        vec!["default tax %".into(), c.default_tax_percent.normalize().to_string()],
        vec![
            "shipping tiers (BRL)".into(),
            format!(
                "{} / {} / {}",
                c.shipping_tiers[0].normalize(),
                c.shipping_tiers[1].normalize(),
                c.shipping_tiers[2].normalize()
            ),
        ],
        vec!["conversion rate".into(), format!("1 USD = {} BRL", c.conversion_rate.normalize())],
        vec!["currency mode".into(), c.currency_mode.as_str().to_string()],
    ];
    println!("Config for '{}':", project.name);
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}

fn set(gateway: &Arc<StoreGateway>, sub: &clap::ArgMatches) -> Result<()> {
    let mut session = open_session(gateway, sub)?;
    let mut draft = DraftConfig::from_config(&session.current().config);

    // mode first so later tier/rate input is read in the new display unit
    if let Some(v) = sub.get_one::<String>("mode") {
        let mode = CurrencyMode::parse_strict(v)
            .ok_or_else(|| anyhow!("Unknown currency mode '{}' (use brl|usd)", v))?;
        draft.set_currency_mode(mode);
    }
    if let Some(v) = sub.get_one::<String>("rate") {
        draft.set_conversion_rate(v);
    }
    if let Some(v) = sub.get_one::<String>("default-iof") {
        draft.default_iof_percent = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("default-tax") {
        draft.default_tax_percent = v.clone();
    }
    for (i, key) in ["tier1", "tier2", "tier3"].iter().enumerate() {
        if let Some(v) = sub.get_one::<String>(*key) {
            draft.shipping_tiers[i] = v.clone();
        }
    }

    let config = draft.commit()?;
    session.update_config(config, None);
    session.save_now()?;
    println!("Config updated for '{}'", session.current().name);
    Ok(())
}
