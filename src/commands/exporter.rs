// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use serde_json::json;

use crate::derive;
use crate::models::Project;
use crate::store::StoreGateway;

use super::open_session;

pub fn handle(gateway: &Arc<StoreGateway>, m: &clap::ArgMatches) -> Result<()> {
    let fmt = m.get_one::<String>("format").unwrap().to_lowercase();
    let out = m.get_one::<String>("out").unwrap();
    let session = open_session(gateway, m)?;
    let project = session.current();

    match fmt.as_str() {
        "csv" => export_csv(project, out)?,
        "json" => export_json(project, out)?,
        _ => return Err(anyhow!("Unknown format: {} (use csv|json)", fmt)),
    }
    println!("Exported '{}' to {}", project.name, out);
    Ok(())
}

/// Canonical BRL amounts with the derived figures the spreadsheet view
/// shows, one row per entry.
fn export_csv(project: &Project, out: &str) -> Result<()> {
    let mut wtr = csv::Writer::from_path(out)?;
    wtr.write_record([
        "id",
        "description",
        "recipient",
        "supplier",
        "base_price",
        "iof_amount",
        "tax_amount",
        "shipping",
        "tax_free",
        "cost",
        "sale_price",
        "profit",
        "margin",
        "status",
        "paid",
        "eta",
        "invoice",
        "note",
    ])?;
    for e in &project.entries {
        wtr.write_record([
            e.id.clone(),
            e.description.clone(),
            e.recipient.clone(),
            e.supplier.clone(),
            e.base_price.round_dp(2).to_string(),
            derive::iof_amount(e).round_dp(2).to_string(),
            derive::tax_amount(e).round_dp(2).to_string(),
            e.shipping.round_dp(2).to_string(),
            if e.tax_free { "yes".into() } else { "no".into() },
            derive::cost(e).round_dp(2).to_string(),
            e.sale_price.round_dp(2).to_string(),
            derive::profit(e).round_dp(2).to_string(),
            crate::utils::fmt_percent(derive::margin(e)),
            e.status.as_str().to_string(),
            if e.paid { "yes".into() } else { "no".into() },
            e.eta.clone(),
            e.invoice.clone(),
            e.note.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn export_json(project: &Project, out: &str) -> Result<()> {
    let mut items = Vec::new();
    for e in &project.entries {
        items.push(json!({
            "id": e.id,
            "description": e.description,
            "recipient": e.recipient,
            "supplier": e.supplier,
            "basePrice": e.base_price.round_dp(2).to_string(),
            "iofAmount": derive::iof_amount(e).round_dp(2).to_string(),
            "taxAmount": derive::tax_amount(e).round_dp(2).to_string(),
            "shipping": e.shipping.round_dp(2).to_string(),
            "taxFree": e.tax_free,
            "cost": derive::cost(e).round_dp(2).to_string(),
            "salePrice": e.sale_price.round_dp(2).to_string(),
            "profit": derive::profit(e).round_dp(2).to_string(),
            "margin": crate::utils::fmt_percent(derive::margin(e)),
            "status": e.status.as_str(),
            "paid": e.paid,
            "eta": e.eta,
            "invoice": e.invoice,
            "note": e.note,
        }));
    }
    std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
    Ok(())
}
