// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory mutation surface for the active project. Drafts hold raw
//! string input in the project's display currency; committing a draft is
//! the single string-to-number boundary. Every successful mutation marks
//! the project dirty and nothing here touches storage or the network.

use rust_decimal::Decimal;

use crate::derive;
use crate::errors::ValidationError;
use crate::models::{Config, CurrencyMode, Filters, ImportEntry, Project, Status, new_entry_id};

/// Parse one user-entered amount. Empty input reads as zero; anything else
/// must be a valid decimal.
pub fn parse_amount(field: &'static str, raw: &str) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    trimmed.parse().map_err(|_| ValidationError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

/// Not-yet-validated form state for a new or edited entry. Monetary fields
/// are strings in the display currency of the owning project's config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DraftEntry {
    pub description: String,
    pub recipient: String,
    pub supplier: String,
    pub invoice: String,
    pub eta: String,
    pub note: String,
    pub base_price: String,
    pub iof_percent: String,
    pub tax_percent: String,
    pub shipping: String,
    pub status: Status,
    pub paid: bool,
    pub tax_free: bool,
    /// Once the operator edits IOF directly, auto-suggestion from the
    /// config default stops for this draft.
    pub iof_touched: bool,
}

impl DraftEntry {
    pub fn empty() -> DraftEntry {
        DraftEntry::default()
    }

    /// Draft pre-filled from an existing entry for in-place editing.
    /// Monetary values are projected into the display currency; IOF counts
    /// as touched so the default stops chasing it.
    pub fn from_entry(entry: &ImportEntry, config: &Config) -> DraftEntry {
        DraftEntry {
            description: entry.description.clone(),
            recipient: entry.recipient.clone(),
            supplier: entry.supplier.clone(),
            invoice: entry.invoice.clone(),
            eta: entry.eta.clone(),
            note: entry.note.clone(),
            base_price: derive::to_display(entry.base_price, config).normalize().to_string(),
            iof_percent: entry.iof_percent.normalize().to_string(),
            tax_percent: entry.tax_percent.normalize().to_string(),
            shipping: derive::to_display(entry.shipping, config).normalize().to_string(),
            status: entry.status,
            paid: entry.paid,
            tax_free: entry.tax_free,
            iof_touched: true,
        }
    }

    /// Set the base price; while IOF is untouched this keeps the suggested
    /// IOF percent in step with the config default.
    pub fn set_base_price(&mut self, raw: &str, config: &Config) {
        self.base_price = raw.to_string();
        if !self.iof_touched {
            self.iof_percent = if raw.trim().is_empty() {
                String::new()
            } else {
                config.default_iof_percent.normalize().to_string()
            };
        }
    }

    pub fn set_iof_percent(&mut self, raw: &str) {
        self.iof_percent = raw.to_string();
        self.iof_touched = true;
    }

    /// Rescale monetary input so the visible numbers stay financially
    /// equivalent across a display-mode toggle. Percent fields are unitless
    /// and never move; unparseable input is left as typed.
    pub fn rescale_mode(&mut self, from: CurrencyMode, to: CurrencyMode, rate: Decimal) {
        if from == to || rate.is_zero() {
            return;
        }
        let factor = |value: Decimal| match to {
            CurrencyMode::Usd => value / rate,
            CurrencyMode::Brl => value * rate,
        };
        rescale_field(&mut self.base_price, factor);
        rescale_field(&mut self.shipping, factor);
    }

    /// Rescale after a conversion-rate change while the draft is viewed in
    /// USD. The canonical value the operator meant is preserved.
    pub fn rescale_rate(&mut self, old_rate: Decimal, new_rate: Decimal) {
        if old_rate == new_rate || new_rate.is_zero() {
            return;
        }
        let factor = |value: Decimal| value * old_rate / new_rate;
        rescale_field(&mut self.base_price, factor);
        rescale_field(&mut self.shipping, factor);
    }

    /// Validate and convert this draft into a committed entry. `sale_price`
    /// is derived here and nowhere else; the entry's monetary fields come
    /// out canonical.
    pub fn commit(&self, id: Option<&str>, config: &Config) -> Result<ImportEntry, ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingField("description"));
        }
        if self.base_price.trim().is_empty() {
            return Err(ValidationError::MissingField("basePrice"));
        }
        let base_price = derive::from_display(parse_amount("basePrice", &self.base_price)?, config);
        let shipping = derive::from_display(parse_amount("shipping", &self.shipping)?, config);
        let iof_percent = parse_amount("iofPercent", &self.iof_percent)?;
        let tax_percent = parse_amount("taxPercent", &self.tax_percent)?;
        Ok(ImportEntry {
            id: id.map(str::to_string).unwrap_or_else(new_entry_id),
            description: self.description.trim().to_string(),
            recipient: self.recipient.trim().to_string(),
            supplier: self.supplier.trim().to_string(),
            base_price,
            tax_free: self.tax_free,
            iof_percent,
            tax_percent,
            shipping,
            sale_price: derive::sale_price(base_price, iof_percent, tax_percent, shipping),
            paid: self.paid,
            status: self.status,
            eta: self.eta.trim().to_string(),
            invoice: self.invoice.trim().to_string(),
            note: self.note.trim().to_string(),
        })
    }
}

fn rescale_field(field: &mut String, factor: impl Fn(Decimal) -> Decimal) {
    if let Ok(value) = field.trim().parse::<Decimal>() {
        *field = factor(value).normalize().to_string();
    }
}

/// String-typed form state for config editing. Shipping tiers are shown in
/// the draft's current display mode; the conversion rate is always absolute
/// (canonical BRL per display unit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftConfig {
    pub default_iof_percent: String,
    pub default_tax_percent: String,
    pub shipping_tiers: [String; 3],
    pub conversion_rate: String,
    pub currency_mode: CurrencyMode,
}

impl DraftConfig {
    pub fn from_config(config: &Config) -> DraftConfig {
        let tier = |d: Decimal| derive::to_display(d, config).normalize().to_string();
        DraftConfig {
            default_iof_percent: config.default_iof_percent.normalize().to_string(),
            default_tax_percent: config.default_tax_percent.normalize().to_string(),
            shipping_tiers: [
                tier(config.shipping_tiers[0]),
                tier(config.shipping_tiers[1]),
                tier(config.shipping_tiers[2]),
            ],
            conversion_rate: config.conversion_rate.normalize().to_string(),
            currency_mode: config.currency_mode,
        }
    }

    /// Toggle the display mode, rescaling tier input so the numbers keep
    /// meaning the same money.
    pub fn set_currency_mode(&mut self, to: CurrencyMode) {
        let from = self.currency_mode;
        if from == to {
            return;
        }
        if let Ok(rate) = self.conversion_rate.trim().parse::<Decimal>() {
            if !rate.is_zero() {
                let factor = |value: Decimal| match to {
                    CurrencyMode::Usd => value / rate,
                    CurrencyMode::Brl => value * rate,
                };
                for tier in &mut self.shipping_tiers {
                    rescale_field(tier, factor);
                }
            }
        }
        self.currency_mode = to;
    }

    /// Change the conversion rate. Tier input viewed in USD is rescaled so
    /// its canonical value is preserved.
    pub fn set_conversion_rate(&mut self, raw: &str) {
        let old = self.conversion_rate.trim().parse::<Decimal>().ok();
        let new = raw.trim().parse::<Decimal>().ok();
        if self.currency_mode == CurrencyMode::Usd {
            if let (Some(old_rate), Some(new_rate)) = (old, new) {
                if !new_rate.is_zero() && old_rate != new_rate {
                    let factor = |value: Decimal| value * old_rate / new_rate;
                    for tier in &mut self.shipping_tiers {
                        rescale_field(tier, factor);
                    }
                }
            }
        }
        self.conversion_rate = raw.to_string();
    }

    pub fn commit(&self) -> Result<Config, ValidationError> {
        let conversion_rate = parse_amount("conversionRate", &self.conversion_rate)?;
        if conversion_rate <= Decimal::ZERO {
            return Err(ValidationError::InvalidNumber {
                field: "conversionRate",
                value: self.conversion_rate.clone(),
            });
        }
        let committed = Config {
            default_iof_percent: parse_amount("defaultIOFPercent", &self.default_iof_percent)?,
            default_tax_percent: parse_amount("defaultTaxPercent", &self.default_tax_percent)?,
            shipping_tiers: [Decimal::ZERO; 3],
            conversion_rate,
            currency_mode: self.currency_mode,
        };
        // tiers are entered in display units of the committed mode
        let mut tiers = [Decimal::ZERO; 3];
        for (i, raw) in self.shipping_tiers.iter().enumerate() {
            tiers[i] = derive::from_display(parse_amount("shippingTiers", raw)?, &committed);
        }
        Ok(Config {
            shipping_tiers: tiers,
            ..committed
        })
    }
}

/// Editing surface over one working copy of a project. The session owns
/// the project list; this owns the copy being edited plus the dirty flag.
#[derive(Debug, Clone)]
pub struct ProjectEditor {
    project: Project,
    dirty: bool,
}

impl ProjectEditor {
    pub fn new(project: Project) -> ProjectEditor {
        ProjectEditor { project, dirty: false }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Validate the draft and prepend the committed entry (newest first).
    pub fn add_entry(&mut self, draft: &DraftEntry) -> Result<String, ValidationError> {
        let entry = draft.commit(None, &self.project.config)?;
        let id = entry.id.clone();
        self.project.entries.insert(0, entry);
        self.dirty = true;
        Ok(id)
    }

    /// Same validation and recomputation as add; replaces in place, so the
    /// entry keeps its position.
    pub fn update_entry(&mut self, id: &str, draft: &DraftEntry) -> Result<(), ValidationError> {
        let entry = draft.commit(Some(id), &self.project.config)?;
        let slot = self
            .project
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ValidationError::UnknownEntry(id.to_string()))?;
        *slot = entry;
        self.dirty = true;
        Ok(())
    }

    /// Removal. Confirmation is the caller's concern; by the time this runs
    /// the operator has already said yes.
    pub fn delete_entry(&mut self, id: &str) -> Result<ImportEntry, ValidationError> {
        let idx = self
            .project
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ValidationError::UnknownEntry(id.to_string()))?;
        let removed = self.project.entries.remove(idx);
        self.dirty = true;
        Ok(removed)
    }

    /// Flip the paid flag; returns the new value.
    pub fn toggle_paid(&mut self, id: &str) -> Result<bool, ValidationError> {
        let entry = self
            .project
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ValidationError::UnknownEntry(id.to_string()))?;
        entry.paid = !entry.paid;
        self.dirty = true;
        Ok(entry.paid)
    }

    pub fn set_notes(&mut self, notes: &str) {
        if self.project.notes != notes {
            self.project.notes = notes.to_string();
            self.dirty = true;
        }
    }

    pub fn set_filters(&mut self, filters: Filters) {
        if self.project.filters != filters {
            self.project.filters = filters;
            self.dirty = true;
        }
    }

    /// Apply a committed config. An in-flight entry draft is reconciled so
    /// its visible numbers stay financially equivalent across a mode or
    /// rate change, and untouched seeded fields follow the new defaults.
    /// Already-committed entries keep their canonical values.
    pub fn update_config(&mut self, new: Config, mut draft: Option<&mut DraftEntry>) {
        let old = self.project.config.clone();
        if let Some(d) = draft.as_deref_mut() {
            if old.currency_mode == CurrencyMode::Usd && old.conversion_rate != new.conversion_rate
            {
                d.rescale_rate(old.conversion_rate, new.conversion_rate);
            }
            if old.currency_mode != new.currency_mode {
                d.rescale_mode(old.currency_mode, new.currency_mode, new.conversion_rate);
            }
            if !d.iof_touched
                && old.default_iof_percent != new.default_iof_percent
                && !d.base_price.trim().is_empty()
            {
                d.iof_percent = new.default_iof_percent.normalize().to_string();
            }
            let tax = d.tax_percent.trim();
            if old.default_tax_percent != new.default_tax_percent
                && (tax.is_empty() || tax == old.default_tax_percent.normalize().to_string())
            {
                d.tax_percent = new.default_tax_percent.normalize().to_string();
            }
        }
        self.project.config = new;
        self.dirty = true;
    }
}
