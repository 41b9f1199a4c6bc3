// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure financial derivation over `(entry, config)`. No state, no I/O;
//! callers re-run these on every render. The only derived value an entry
//! stores is `sale_price`, fixed at commit time.

use rust_decimal::Decimal;

use crate::models::{Config, CurrencyMode, ImportEntry};

/// Client-facing price: base plus IOF and tax percentages of base, plus the
/// flat shipping amount. Computed from the undiscounted base price even for
/// tax-free entries.
pub fn sale_price(
    base_price: Decimal,
    iof_percent: Decimal,
    tax_percent: Decimal,
    shipping: Decimal,
) -> Decimal {
    base_price
        + base_price * iof_percent / Decimal::ONE_HUNDRED
        + base_price * tax_percent / Decimal::ONE_HUNDRED
        + shipping
}

/// What the operator actually pays. The tax-free flag is a flat 10%
/// reduction on the operator's outlay only; it never touches `sale_price`.
pub fn cost(entry: &ImportEntry) -> Decimal {
    if entry.tax_free {
        entry.base_price * Decimal::new(9, 1)
    } else {
        entry.base_price
    }
}

pub fn iof_amount(entry: &ImportEntry) -> Decimal {
    entry.base_price * entry.iof_percent / Decimal::ONE_HUNDRED
}

pub fn tax_amount(entry: &ImportEntry) -> Decimal {
    entry.base_price * entry.tax_percent / Decimal::ONE_HUNDRED
}

/// Sale price minus operator cost. Because `sale_price` folds in IOF, tax
/// and shipping while `cost` is only the (possibly discounted) base price,
/// those fees land here. Intentional business logic, not a bug.
pub fn profit(entry: &ImportEntry) -> Decimal {
    entry.sale_price - cost(entry)
}

/// Profit as a fraction of sale price. A zero sale price substitutes 1 as
/// the divisor; documented edge-case policy rather than a crash.
pub fn margin(entry: &ImportEntry) -> Decimal {
    let sale = if entry.sale_price.is_zero() {
        Decimal::ONE
    } else {
        entry.sale_price
    };
    profit(entry) / sale
}

/// Read-only projection of a canonical amount into the configured display
/// currency. Never persisted.
pub fn to_display(amount: Decimal, config: &Config) -> Decimal {
    match config.currency_mode {
        CurrencyMode::Brl => amount,
        CurrencyMode::Usd => amount / config.conversion_rate,
    }
}

/// Inverse of [`to_display`]: display-unit input back to canonical BRL.
pub fn from_display(amount: Decimal, config: &Config) -> Decimal {
    match config.currency_mode {
        CurrencyMode::Brl => amount,
        CurrencyMode::Usd => amount * config.conversion_rate,
    }
}

/// Collection-level rollup shown in listing headers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Totals {
    /// Sum of operator cost over all entries.
    pub invested: Decimal,
    /// Sum of sale prices.
    pub revenue: Decimal,
    pub profit: Decimal,
    /// Sum of IOF and tax amounts.
    pub taxes: Decimal,
    /// Operator cost already liquidated (paid entries only).
    pub paid_amount: Decimal,
}

pub fn totals(entries: &[ImportEntry]) -> Totals {
    let mut acc = Totals::default();
    for entry in entries {
        let c = cost(entry);
        acc.invested += c;
        acc.revenue += entry.sale_price;
        acc.profit += profit(entry);
        acc.taxes += iof_amount(entry) + tax_amount(entry);
        if entry.paid {
            acc.paid_amount += c;
        }
    }
    acc
}
