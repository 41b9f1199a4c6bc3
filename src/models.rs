// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Workflow stage of an entry. The progression is informational only: any
/// value may follow any other, the list mirrors logistics reality rather
/// than a guarded workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Ordered,
    InTransit,
    Delivered,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Ordered, Status::InTransit, Status::Delivered];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ordered => "ordered",
            Status::InTransit => "in-transit",
            Status::Delivered => "delivered",
        }
    }

    /// Wire-value mapping. Retired Portuguese labels from older stored data
    /// map onto the current values; anything unrecognized maps to the first
    /// stage.
    pub fn parse_lossy(s: &str) -> Status {
        match s.trim() {
            "in-transit" | "Em trânsito" => Status::InTransit,
            "delivered" | "Entregue" => Status::Delivered,
            _ => Status::Ordered,
        }
    }

    /// Strict parse for operator input, unlike the lossy stored-data path.
    pub fn parse_strict(s: &str) -> Option<Status> {
        match s.trim() {
            "ordered" => Some(Status::Ordered),
            "in-transit" => Some(Status::InTransit),
            "delivered" => Some(Status::Delivered),
            _ => None,
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Which currency the editor accepts input in and displays. Purely a
/// presentation toggle: stored amounts are always canonical BRL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurrencyMode {
    #[default]
    Brl,
    Usd,
}

impl CurrencyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyMode::Brl => "brl",
            CurrencyMode::Usd => "usd",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencyMode::Brl => "R$",
            CurrencyMode::Usd => "US$",
        }
    }

    pub fn parse_lossy(s: &str) -> CurrencyMode {
        match s.trim() {
            "usd" | "USD" => CurrencyMode::Usd,
            _ => CurrencyMode::Brl,
        }
    }

    pub fn parse_strict(s: &str) -> Option<CurrencyMode> {
        match s.trim() {
            "brl" => Some(CurrencyMode::Brl),
            "usd" => Some(CurrencyMode::Usd),
            _ => None,
        }
    }
}

impl Serialize for CurrencyMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    Any,
    Only(Status),
}

impl StatusFilter {
    pub fn parse_lossy(s: &str) -> StatusFilter {
        match s.trim() {
            "any" | "todas" | "" => StatusFilter::Any,
            other => StatusFilter::Only(Status::parse_lossy(other)),
        }
    }
}

impl Serialize for StatusFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StatusFilter::Any => serializer.serialize_str("any"),
            StatusFilter::Only(s) => serializer.serialize_str(s.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaidFilter {
    #[default]
    Any,
    Paid,
    Pending,
}

impl PaidFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaidFilter::Any => "any",
            PaidFilter::Paid => "paid",
            PaidFilter::Pending => "pending",
        }
    }

    pub fn parse_lossy(s: &str) -> PaidFilter {
        match s.trim() {
            "paid" | "pagos" => PaidFilter::Paid,
            "pending" | "pendentes" => PaidFilter::Pending,
            _ => PaidFilter::Any,
        }
    }
}

impl Serialize for PaidFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Last-used view filters, persisted with the project so a reload restores
/// the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Filters {
    pub search: String,
    pub status: StatusFilter,
    pub paid: PaidFilter,
}

impl Filters {
    pub fn matches(&self, entry: &ImportEntry) -> bool {
        let search = self.search.trim().to_lowercase();
        let matches_search = search.is_empty() || {
            let hay = format!(
                "{} {} {} {}",
                entry.description, entry.supplier, entry.recipient, entry.invoice
            )
            .to_lowercase();
            hay.contains(&search)
        };
        let matches_status = match self.status {
            StatusFilter::Any => true,
            StatusFilter::Only(s) => entry.status == s,
        };
        let matches_paid = match self.paid {
            PaidFilter::Any => true,
            PaidFilter::Paid => entry.paid,
            PaidFilter::Pending => !entry.paid,
        };
        matches_search && matches_status && matches_paid
    }

    pub fn from_value(v: &Value) -> Filters {
        Filters {
            search: str_or(v, "search", ""),
            status: StatusFilter::parse_lossy(&str_or(v, "status", "any")),
            paid: PaidFilter::parse_lossy(&str_or(v, "paid", "any")),
        }
    }
}

/// One priced line item. All monetary fields are canonical BRL regardless
/// of the project's display mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEntry {
    pub id: String,
    pub description: String,
    pub recipient: String,
    pub supplier: String,
    pub base_price: Decimal,
    pub tax_free: bool,
    pub iof_percent: Decimal,
    pub tax_percent: Decimal,
    pub shipping: Decimal,
    pub sale_price: Decimal,
    pub paid: bool,
    pub status: Status,
    pub eta: String,
    pub invoice: String,
    pub note: String,
}

impl ImportEntry {
    pub fn from_value(v: &Value) -> ImportEntry {
        ImportEntry {
            id: nonempty_or_else(str_or(v, "id", ""), new_entry_id),
            description: str_or(v, "description", ""),
            recipient: str_or(v, "recipient", ""),
            supplier: str_or(v, "supplier", ""),
            base_price: dec_or(v, "basePrice", Decimal::ZERO),
            tax_free: bool_or(v, "taxFree", false),
            iof_percent: dec_or(v, "iofPercent", Decimal::ZERO),
            tax_percent: dec_or(v, "taxPercent", Decimal::ZERO),
            shipping: dec_or(v, "shipping", Decimal::ZERO),
            sale_price: dec_or(v, "salePrice", Decimal::ZERO),
            paid: bool_or(v, "paid", false),
            status: Status::parse_lossy(&str_or(v, "status", "ordered")),
            eta: str_or(v, "eta", ""),
            invoice: str_or(v, "invoice", ""),
            note: str_or(v, "note", ""),
        }
    }
}

/// Per-project defaults and currency parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(rename = "defaultIOFPercent")]
    pub default_iof_percent: Decimal,
    pub default_tax_percent: Decimal,
    /// Exactly three quick-preset shipping amounts, canonical BRL. A fourth
    /// "custom" choice exists in editors but is free input, not config.
    pub shipping_tiers: [Decimal; 3],
    /// Canonical BRL per 1 unit of the display currency.
    pub conversion_rate: Decimal,
    pub currency_mode: CurrencyMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_iof_percent: Decimal::new(35, 1),
            default_tax_percent: Decimal::new(60, 0),
            shipping_tiers: [
                Decimal::new(150, 0),
                Decimal::new(250, 0),
                Decimal::new(400, 0),
            ],
            conversion_rate: Decimal::new(5, 0),
            currency_mode: CurrencyMode::Brl,
        }
    }
}

impl Config {
    pub fn from_value(v: &Value) -> Config {
        let d = Config::default();
        let tiers = v.get("shippingTiers").and_then(Value::as_array);
        let tier = |i: usize| -> Decimal {
            tiers
                .and_then(|t| t.get(i))
                .and_then(dec_value)
                .unwrap_or(d.shipping_tiers[i])
        };
        Config {
            default_iof_percent: dec_or(v, "defaultIOFPercent", d.default_iof_percent),
            default_tax_percent: dec_or(v, "defaultTaxPercent", d.default_tax_percent),
            shipping_tiers: [tier(0), tier(1), tier(2)],
            conversion_rate: {
                let r = dec_or(v, "conversionRate", d.conversion_rate);
                // a zero rate would make display conversion divide by zero
                if r.is_zero() { d.conversion_rate } else { r }
            },
            currency_mode: CurrencyMode::parse_lossy(&str_or(v, "currencyMode", "brl")),
        }
    }
}

/// Unit of persistence and sharing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub entries: Vec<ImportEntry>,
    pub config: Config,
    pub notes: String,
    pub filters: Filters,
}

impl Project {
    /// Lossy normalization of one stored record. Missing or mistyped fields
    /// get documented defaults so a malformed record never fails a whole
    /// load. Re-normalizing already-normalized data is a no-op.
    pub fn from_value(v: &Value) -> Project {
        Project {
            id: nonempty_or_else(str_or(v, "id", ""), new_project_id),
            name: str_or(v, "name", "Projeto sem nome"),
            entries: v
                .get("entries")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(ImportEntry::from_value).collect())
                .unwrap_or_default(),
            config: v.get("config").map(Config::from_value).unwrap_or_default(),
            notes: str_or(v, "notes", ""),
            filters: v.get("filters").map(Filters::from_value).unwrap_or_default(),
        }
    }

    /// The first-run bootstrap project.
    pub fn default_project() -> Project {
        Project {
            id: new_project_id(),
            name: "Projeto inicial".to_string(),
            entries: Vec::new(),
            config: Config::default(),
            notes: String::new(),
            filters: Filters::default(),
        }
    }
}

pub fn new_project_id() -> String {
    format!("PRJ-{}", next_id_millis())
}

pub fn new_entry_id() -> String {
    format!("IMP-{:05}", next_id_millis() % 100_000)
}

static ID_CLOCK: AtomicI64 = AtomicI64::new(0);

/// Millisecond wall-clock, clamped to strictly increasing so two ids minted
/// in the same millisecond stay distinct.
fn next_id_millis() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut prev = ID_CLOCK.load(Ordering::Relaxed);
    loop {
        let next = now.max(prev + 1);
        match ID_CLOCK.compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(observed) => prev = observed,
        }
    }
}

fn nonempty_or_else(s: String, fallback: fn() -> String) -> String {
    if s.trim().is_empty() { fallback() } else { s }
}

fn str_or(v: &Value, key: &str, fallback: &str) -> String {
    match v.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => fallback.to_string(),
    }
}

fn bool_or(v: &Value, key: &str, fallback: bool) -> bool {
    match v.get(key) {
        Some(Value::Bool(b)) => *b,
        _ => fallback,
    }
}

fn dec_or(v: &Value, key: &str, fallback: Decimal) -> Decimal {
    v.get(key).and_then(dec_value).unwrap_or(fallback)
}

/// Stored amounts may be JSON numbers (legacy records) or decimal strings
/// (what we write); both parse to the same Decimal.
fn dec_value(v: &Value) -> Option<Decimal> {
    match v {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
