// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use anyhow::Result;

use crate::derive;
use crate::models::Project;
use crate::store::StoreGateway;
use crate::utils::pretty_table;

pub fn handle(gateway: &Arc<StoreGateway>) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Records that load-time normalization would have to repair
    for raw in gateway.load_raw()? {
        let normalized = Project::from_value(&raw);
        if serde_json::to_value(&normalized)? != raw {
            rows.push(vec![
                "record_needs_normalization".into(),
                format!("{} ({})", normalized.name, normalized.id),
            ]);
        }
    }

    // 2) Stored sale prices that drifted from the derivation invariant
    for project in gateway.load()? {
        for entry in &project.entries {
            let expected = derive::sale_price(
                entry.base_price,
                entry.iof_percent,
                entry.tax_percent,
                entry.shipping,
            );
            if expected != entry.sale_price {
                rows.push(vec![
                    "sale_price_drift".into(),
                    format!(
                        "{}/{}: stored {} expected {}",
                        project.id, entry.id, entry.sale_price, expected
                    ),
                ]);
            }
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
