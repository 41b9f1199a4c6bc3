// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use importdesk::models::{
    CurrencyMode, Filters, ImportEntry, PaidFilter, Project, Status, StatusFilter,
};
use rust_decimal::Decimal;
use serde_json::json;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn missing_fields_get_documented_defaults() {
    let p = Project::from_value(&json!({ "id": "PRJ-1" }));
    assert_eq!(p.id, "PRJ-1");
    assert_eq!(p.name, "Projeto sem nome");
    assert!(p.entries.is_empty());
    assert_eq!(p.notes, "");
    assert_eq!(p.filters, Filters::default());
    assert_eq!(p.config.default_iof_percent, dec("3.5"));
    assert_eq!(p.config.default_tax_percent, dec("60"));
    assert_eq!(p.config.shipping_tiers, [dec("150"), dec("250"), dec("400")]);
    assert_eq!(p.config.conversion_rate, dec("5"));
    assert_eq!(p.config.currency_mode, CurrencyMode::Brl);
}

#[test]
fn blank_ids_are_regenerated() {
    let p = Project::from_value(&json!({ "id": "  ", "name": "Legacy" }));
    assert!(p.id.starts_with("PRJ-"));

    let e = ImportEntry::from_value(&json!({ "description": "Mouse" }));
    assert!(e.id.starts_with("IMP-"));
}

#[test]
fn amounts_accept_numbers_and_strings() {
    let from_number = ImportEntry::from_value(&json!({ "id": "IMP-1", "basePrice": 1230.5 }));
    let from_string = ImportEntry::from_value(&json!({ "id": "IMP-1", "basePrice": "1230.5" }));
    assert_eq!(from_number.base_price, dec("1230.5"));
    assert_eq!(from_number.base_price, from_string.base_price);

    let mistyped = ImportEntry::from_value(&json!({ "id": "IMP-1", "basePrice": true }));
    assert_eq!(mistyped.base_price, Decimal::ZERO);
}

#[test]
fn legacy_portuguese_labels_still_map() {
    let p = Project::from_value(&json!({
        "id": "PRJ-1",
        "entries": [
            { "id": "IMP-1", "status": "Em trânsito" },
            { "id": "IMP-2", "status": "Entregue" },
            { "id": "IMP-3", "status": "definitely-not-a-status" },
        ],
        "config": { "currencyMode": "USD" },
        "filters": { "status": "Entregue", "paid": "pagos" },
    }));
    assert_eq!(p.entries[0].status, Status::InTransit);
    assert_eq!(p.entries[1].status, Status::Delivered);
    assert_eq!(p.entries[2].status, Status::Ordered);
    assert_eq!(p.config.currency_mode, CurrencyMode::Usd);
    assert_eq!(p.filters.status, StatusFilter::Only(Status::Delivered));
    assert_eq!(p.filters.paid, PaidFilter::Paid);
}

#[test]
fn zero_conversion_rate_falls_back_to_default() {
    let p = Project::from_value(&json!({ "id": "PRJ-1", "config": { "conversionRate": 0 } }));
    assert_eq!(p.config.conversion_rate, dec("5"));
}

#[test]
fn normalization_is_idempotent() {
    let raw = json!({
        "id": "PRJ-1",
        "name": "Eletrônicos",
        "entries": [{
            "id": "IMP-1",
            "description": "MacBook",
            "basePrice": 1000,
            "iofPercent": "5",
            "taxPercent": 8,
            "shipping": "100.50",
            "status": "Em trânsito",
            "paid": true,
        }],
        "config": { "defaultIOFPercent": 3.5, "currencyMode": "usd" },
        "filters": { "search": "mac", "paid": "pendentes" },
    });

    let once = Project::from_value(&raw);
    let serialized = serde_json::to_value(&once).unwrap();
    let twice = Project::from_value(&serialized);

    assert_eq!(once, twice);
    assert_eq!(serde_json::to_value(&twice).unwrap(), serialized);
}

#[test]
fn filters_combine_search_status_and_paid() {
    let p = Project::from_value(&json!({
        "id": "PRJ-1",
        "entries": [
            { "id": "IMP-1", "description": "MacBook Pro", "supplier": "Apple", "paid": true, "status": "delivered" },
            { "id": "IMP-2", "description": "Mouse", "recipient": "João", "status": "ordered" },
        ],
    }));
    let macbook = &p.entries[0];
    let mouse = &p.entries[1];

    let mut f = Filters::default();
    assert!(f.matches(macbook) && f.matches(mouse));

    // search is case-insensitive over description, supplier and recipient
    f.search = "APPLE".into();
    assert!(f.matches(macbook));
    assert!(!f.matches(mouse));
    f.search = "joão".into();
    assert!(f.matches(mouse));

    f = Filters {
        status: StatusFilter::Only(Status::Delivered),
        ..Filters::default()
    };
    assert!(f.matches(macbook));
    assert!(!f.matches(mouse));

    f = Filters {
        paid: PaidFilter::Pending,
        ..Filters::default()
    };
    assert!(!f.matches(macbook));
    assert!(f.matches(mouse));
}
