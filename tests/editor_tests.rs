// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use importdesk::editor::{DraftConfig, DraftEntry, ProjectEditor};
use importdesk::errors::ValidationError;
use importdesk::models::{Config, CurrencyMode, Project};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn usd_config(rate: &str) -> Config {
    Config {
        currency_mode: CurrencyMode::Usd,
        conversion_rate: dec(rate),
        ..Config::default()
    }
}

fn draft(description: &str, base: &str, config: &Config) -> DraftEntry {
    let mut d = DraftEntry::empty();
    d.description = description.to_string();
    d.set_base_price(base, config);
    d
}

#[test]
fn commit_requires_description_then_base_price() {
    let config = Config::default();
    let d = DraftEntry::empty();
    assert_eq!(
        d.commit(None, &config),
        Err(ValidationError::MissingField("description"))
    );

    let mut d = DraftEntry::empty();
    d.description = "Teclado".into();
    assert_eq!(
        d.commit(None, &config),
        Err(ValidationError::MissingField("basePrice"))
    );
}

#[test]
fn commit_rejects_malformed_amounts() {
    let config = Config::default();
    let mut d = draft("Teclado", "abc", &config);
    assert_eq!(
        d.commit(None, &config),
        Err(ValidationError::InvalidNumber {
            field: "basePrice",
            value: "abc".into()
        })
    );

    d.set_base_price("100", &config);
    d.shipping = "1,5".into();
    assert!(matches!(
        d.commit(None, &config),
        Err(ValidationError::InvalidNumber { field: "shipping", .. })
    ));
}

#[test]
fn add_derives_sale_price_and_prepends() {
    let config = Config::default();
    let mut editor = ProjectEditor::new(Project::default_project());
    assert!(!editor.is_dirty());

    let mut d = draft("MacBook", "1000", &config);
    d.set_iof_percent("5");
    d.tax_percent = "8".into();
    d.shipping = "100".into();
    let first = editor.add_entry(&d).unwrap();
    let second = editor.add_entry(&draft("Mouse", "150", &config)).unwrap();

    let entries = &editor.project().entries;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, second);
    assert_eq!(entries[1].id, first);
    assert_eq!(entries[1].sale_price, dec("1230"));
    assert!(editor.is_dirty());
}

#[test]
fn update_keeps_position_and_rederives() {
    let config = Config::default();
    let mut editor = ProjectEditor::new(Project::default_project());
    editor.add_entry(&draft("Mouse", "150", &config)).unwrap();
    let id = editor.add_entry(&draft("MacBook", "1000", &config)).unwrap();

    let mut d = draft("MacBook Pro", "1000", &config);
    d.set_iof_percent("5");
    d.tax_percent = "8".into();
    d.shipping = "100".into();
    editor.update_entry(&id, &d).unwrap();

    let entries = &editor.project().entries;
    assert_eq!(entries[0].id, id);
    assert_eq!(entries[0].description, "MacBook Pro");
    assert_eq!(entries[0].sale_price, dec("1230"));
}

#[test]
fn unknown_entry_ids_are_rejected() {
    let config = Config::default();
    let mut editor = ProjectEditor::new(Project::default_project());
    let d = draft("Mouse", "150", &config);
    assert_eq!(
        editor.update_entry("IMP-99999", &d),
        Err(ValidationError::UnknownEntry("IMP-99999".into()))
    );
    assert!(editor.delete_entry("IMP-99999").is_err());
    assert!(editor.toggle_paid("IMP-99999").is_err());
}

#[test]
fn toggle_paid_flips_and_reports() {
    let config = Config::default();
    let mut editor = ProjectEditor::new(Project::default_project());
    let id = editor.add_entry(&draft("Mouse", "150", &config)).unwrap();
    assert_eq!(editor.toggle_paid(&id).unwrap(), true);
    assert_eq!(editor.toggle_paid(&id).unwrap(), false);
}

#[test]
fn iof_follows_config_default_until_touched() {
    let config = Config::default(); // default IOF 3.5
    let mut d = DraftEntry::empty();

    d.set_base_price("100", &config);
    assert_eq!(d.iof_percent, "3.5");
    d.set_base_price("", &config);
    assert_eq!(d.iof_percent, "");

    d.set_iof_percent("2");
    d.set_base_price("500", &config);
    assert_eq!(d.iof_percent, "2");
}

#[test]
fn usd_input_commits_canonical_amounts() {
    let config = usd_config("5");
    let mut d = draft("MacBook", "200", &config);
    d.set_iof_percent("5");
    d.tax_percent = "8".into();
    d.shipping = "20".into();

    let e = d.commit(None, &config).unwrap();
    assert_eq!(e.base_price, dec("1000"));
    assert_eq!(e.shipping, dec("100"));
    // derived over canonical values, not display ones
    assert_eq!(e.sale_price, dec("1230"));
}

#[test]
fn from_entry_projects_into_display_currency() {
    let config = usd_config("5");
    let mut d = draft("MacBook", "200", &config);
    d.shipping = "20".into();
    let e = d.commit(None, &config).unwrap();

    let back = DraftEntry::from_entry(&e, &config);
    assert_eq!(back.base_price, "200");
    assert_eq!(back.shipping, "20");
    assert!(back.iof_touched);
}

#[test]
fn mode_toggle_keeps_draft_amounts_equivalent() {
    let mut d = DraftEntry::empty();
    d.base_price = "1000".into();
    d.shipping = "150".into();
    d.iof_percent = "3.5".into();

    d.rescale_mode(CurrencyMode::Brl, CurrencyMode::Usd, dec("5"));
    assert_eq!(d.base_price, "200");
    assert_eq!(d.shipping, "30");
    // percentages are unitless
    assert_eq!(d.iof_percent, "3.5");

    d.rescale_mode(CurrencyMode::Usd, CurrencyMode::Brl, dec("5"));
    assert_eq!(d.base_price, "1000");
    assert_eq!(d.shipping, "150");
}

#[test]
fn rate_change_preserves_canonical_meaning_of_usd_draft() {
    let mut d = DraftEntry::empty();
    d.base_price = "200".into(); // 1000 BRL at rate 5
    d.rescale_rate(dec("5"), dec("4"));
    assert_eq!(d.base_price, "250"); // still 1000 BRL at rate 4
}

#[test]
fn unparseable_draft_input_survives_rescale_as_typed() {
    let mut d = DraftEntry::empty();
    d.base_price = "1.2.3".into();
    d.rescale_mode(CurrencyMode::Brl, CurrencyMode::Usd, dec("5"));
    assert_eq!(d.base_price, "1.2.3");
}

#[test]
fn config_draft_mode_toggle_rescales_tiers() {
    let mut d = DraftConfig::from_config(&Config::default());
    assert_eq!(d.shipping_tiers, ["150".to_string(), "250".into(), "400".into()]);

    d.set_currency_mode(CurrencyMode::Usd);
    assert_eq!(d.shipping_tiers, ["30".to_string(), "50".into(), "80".into()]);

    // the committed config is canonical again
    let committed = d.commit().unwrap();
    assert_eq!(committed.currency_mode, CurrencyMode::Usd);
    assert_eq!(
        committed.shipping_tiers,
        [dec("150"), dec("250"), dec("400")]
    );
}

#[test]
fn config_commit_rejects_nonpositive_rate() {
    let mut d = DraftConfig::from_config(&Config::default());
    d.conversion_rate = "0".into();
    assert!(d.commit().is_err());
    d.conversion_rate = "-2".into();
    assert!(d.commit().is_err());
}

#[test]
fn update_config_reseeds_untouched_draft_defaults() {
    let mut editor = ProjectEditor::new(Project::default_project());
    let old = editor.project().config.clone();

    let mut d = DraftEntry::empty();
    d.description = "Mouse".into();
    d.set_base_price("100", &old);
    d.tax_percent = "60".into(); // matches the old default
    assert_eq!(d.iof_percent, "3.5");

    let new = Config {
        default_iof_percent: dec("2"),
        default_tax_percent: dec("70"),
        ..old
    };
    editor.update_config(new, Some(&mut d));

    assert_eq!(d.iof_percent, "2");
    assert_eq!(d.tax_percent, "70");
    assert!(editor.is_dirty());
}

#[test]
fn update_config_never_reseeds_touched_iof() {
    let mut editor = ProjectEditor::new(Project::default_project());
    let old = editor.project().config.clone();

    let mut d = draft("Mouse", "100", &old);
    d.set_iof_percent("1");

    let new = Config {
        default_iof_percent: dec("2"),
        ..old
    };
    editor.update_config(new, Some(&mut d));
    assert_eq!(d.iof_percent, "1");
}

#[test]
fn update_config_mode_change_rescales_in_flight_draft() {
    let mut editor = ProjectEditor::new(Project::default_project());
    let old = editor.project().config.clone();
    let committed_id = editor.add_entry(&draft("MacBook", "1000", &old)).unwrap();

    let mut d = DraftEntry::empty();
    d.base_price = "1000".into();

    let new = usd_config("5");
    editor.update_config(new, Some(&mut d));
    assert_eq!(d.base_price, "200");

    // committed entries keep their canonical values
    let committed = editor
        .project()
        .entries
        .iter()
        .find(|e| e.id == committed_id)
        .unwrap();
    assert_eq!(committed.base_price, dec("1000"));
}

#[test]
fn same_value_writes_do_not_dirty() {
    let mut editor = ProjectEditor::new(Project::default_project());
    editor.set_notes("");
    assert!(!editor.is_dirty());
    editor.set_filters(editor.project().filters.clone());
    assert!(!editor.is_dirty());

    editor.set_notes("lote de agosto");
    assert!(editor.is_dirty());
}
