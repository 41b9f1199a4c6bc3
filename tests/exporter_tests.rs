// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use importdesk::bus::ChangeBus;
use importdesk::commands::exporter;
use importdesk::models::Project;
use importdesk::store::{MemoryStore, StoreGateway};
use importdesk::cli;
use rust_decimal::Decimal;
use serde_json::json;
use tempfile::tempdir;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn seeded_gateway() -> Arc<StoreGateway> {
    let gateway = Arc::new(StoreGateway::new(
        Arc::new(MemoryStore::new()),
        ChangeBus::new(),
    ));
    let project = Project::from_value(&json!({
        "id": "PRJ-1",
        "name": "Eletrônicos",
        "entries": [{
            "id": "IMP-00001",
            "description": "MacBook Pro 14",
            "recipient": "João",
            "supplier": "Apple",
            "basePrice": "1000",
            "iofPercent": "5",
            "taxPercent": "8",
            "shipping": "100",
            "salePrice": "1230",
            "status": "delivered",
            "paid": true,
            "invoice": "NF-123",
            "eta": "2026-09-01",
            "note": "lote 2",
        }],
    }));
    gateway.save(&[project]).unwrap();
    gateway
}

fn run_export(gateway: &Arc<StoreGateway>, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["importdesk", "export"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(gateway, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_json_carries_derived_figures() {
    let gateway = seeded_gateway();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.json");
    let out_str = out.to_string_lossy().to_string();

    run_export(&gateway, &["--format", "json", "--out", &out_str]).unwrap();

    let contents = std::fs::read_to_string(&out).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let row = &parsed.as_array().unwrap()[0];

    assert_eq!(row["id"], "IMP-00001");
    assert_eq!(row["status"], "delivered");
    assert_eq!(row["paid"], true);
    assert_eq!(row["taxFree"], false);
    let amount = |key: &str| row[key].as_str().unwrap().parse::<Decimal>().unwrap();
    assert_eq!(amount("basePrice"), dec("1000"));
    assert_eq!(amount("iofAmount"), dec("50"));
    assert_eq!(amount("taxAmount"), dec("80"));
    assert_eq!(amount("cost"), dec("1000"));
    assert_eq!(amount("salePrice"), dec("1230"));
    assert_eq!(amount("profit"), dec("230"));
    assert_eq!(row["margin"], "18.7%");
}

#[test]
fn export_csv_writes_one_row_per_entry() {
    let gateway = seeded_gateway();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.csv");
    let out_str = out.to_string_lossy().to_string();

    run_export(&gateway, &["--format", "csv", "--out", &out_str]).unwrap();

    let contents = std::fs::read_to_string(&out).unwrap();
    let mut lines = contents.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("id,description,recipient,supplier,base_price"));

    let fields: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(fields[0], "IMP-00001");
    assert_eq!(fields[8], "no"); // tax_free
    assert_eq!(fields[9].parse::<Decimal>().unwrap(), dec("1000")); // cost
    assert_eq!(fields[10].parse::<Decimal>().unwrap(), dec("1230")); // sale
    assert_eq!(fields[12], "18.7%");
    assert_eq!(fields[14], "yes"); // paid
    assert_eq!(lines.next(), None);
}

#[test]
fn export_selects_a_project_by_name() {
    let gateway = seeded_gateway();
    let mut projects = gateway.load().unwrap();
    let mut empty = Project::default_project();
    empty.id = "PRJ-2".into();
    empty.name = "Clientes".into();
    projects.push(empty);
    gateway.save(&projects).unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("clientes.json");
    let out_str = out.to_string_lossy().to_string();

    run_export(
        &gateway,
        &["--project", "Clientes", "--format", "json", "--out", &out_str],
    )
    .unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(parsed, json!([]));
}

#[test]
fn export_rejects_unknown_formats() {
    let gateway = seeded_gateway();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.xml");
    let out_str = out.to_string_lossy().to_string();

    assert!(run_export(&gateway, &["--format", "xml", "--out", &out_str]).is_err());
    assert!(!out.exists());
}
