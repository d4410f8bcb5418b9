// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use datadesk_core::{DomainKind, Environment, FieldValue, Record, samples};
use datadesk_db::{Store, fingerprint_records, validate_db_path};
use datadesk_testkit::{RecordFaker, temp_db_path};

#[test]
fn validate_db_path_rejects_uri_forms() {
    assert!(validate_db_path("file:test.db").is_err());
    assert!(validate_db_path("https://example.com/db.sqlite").is_err());
    assert!(validate_db_path("db.sqlite?mode=ro").is_err());
    assert!(validate_db_path("/tmp/datadesk.db").is_ok());
}

#[test]
fn bootstrap_creates_schema() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;

    let tables: Vec<String> = {
        let mut stmt = store.raw_connection().prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<rusqlite::Result<_>>()?
    };
    assert!(tables.contains(&"records".to_owned()));
    assert!(tables.contains(&"datasets".to_owned()));
    assert!(tables.contains(&"settings".to_owned()));
    Ok(())
}

#[test]
fn bootstrap_rejects_schema_missing_required_column() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;

    store.raw_connection().execute_batch(
        "
            ALTER TABLE records RENAME TO records_old;
            CREATE TABLE records (
              environment TEXT NOT NULL,
              domain TEXT NOT NULL,
              record_key TEXT NOT NULL,
              data TEXT NOT NULL
            );
            DROP TABLE records_old;
            ",
    )?;

    let err = store
        .bootstrap()
        .expect_err("schema validation should fail");
    let message = err.to_string();
    assert!(message.contains("table `records` is missing required columns"));
    assert!(message.contains("position"));
    Ok(())
}

#[test]
fn replace_records_round_trips_in_order() -> Result<()> {
    let mut store = Store::open_memory()?;
    store.bootstrap()?;

    let records = samples::sample_partnerships();
    store.replace_records(Environment::Staging, DomainKind::Partnerships, &records)?;

    let cached = store.list_records(Environment::Staging, DomainKind::Partnerships)?;
    assert_eq!(cached, records);
    assert_eq!(
        store.record_count(Environment::Staging, DomainKind::Partnerships)?,
        5
    );
    Ok(())
}

#[test]
fn replace_records_tolerates_duplicate_ids() -> Result<()> {
    let mut store = Store::open_memory()?;
    store.bootstrap()?;

    let duplicate = |name: &str| {
        Record::from_pairs([
            ("id", FieldValue::text("LL")),
            ("name", FieldValue::text(name)),
        ])
    };
    let records = vec![duplicate("Leaf Life"), duplicate("Leaf Life Again")];

    // A repeated id in the payload must not make the cache unrefreshable.
    store.replace_records(Environment::Staging, DomainKind::Partnerships, &records)?;

    let cached = store.list_records(Environment::Staging, DomainKind::Partnerships)?;
    assert_eq!(cached, records);
    Ok(())
}

#[test]
fn replace_records_swaps_the_previous_dataset() -> Result<()> {
    let mut store = Store::open_memory()?;
    store.bootstrap()?;

    let mut faker = RecordFaker::new(3);
    let first = faker.records(DomainKind::Customers, 10);
    let second = faker.records(DomainKind::Customers, 4);

    store.replace_records(Environment::Staging, DomainKind::Customers, &first)?;
    store.replace_records(Environment::Staging, DomainKind::Customers, &second)?;

    let cached = store.list_records(Environment::Staging, DomainKind::Customers)?;
    assert_eq!(cached.len(), 4);
    assert_eq!(cached, second);
    Ok(())
}

#[test]
fn environments_are_isolated() -> Result<()> {
    let mut store = Store::open_memory()?;
    store.bootstrap()?;

    let records = samples::sample_products();
    store.replace_records(Environment::Staging, DomainKind::Products, &records)?;

    assert_eq!(
        store.record_count(Environment::Production, DomainKind::Products)?,
        0
    );
    assert!(
        store
            .dataset_state(Environment::Production, DomainKind::Products)?
            .is_none()
    );
    Ok(())
}

#[test]
fn fingerprint_tracks_content_changes() -> Result<()> {
    let mut store = Store::open_memory()?;
    store.bootstrap()?;

    let records = samples::sample_suppliers();
    let first = store.replace_records(Environment::Staging, DomainKind::Suppliers, &records)?;
    assert_eq!(first, fingerprint_records(&records)?);

    let state = store
        .dataset_state(Environment::Staging, DomainKind::Suppliers)?
        .expect("dataset state after replace");
    assert_eq!(state.fingerprint, first);

    // Unchanged content keeps the fingerprint stable.
    let again = store.replace_records(Environment::Staging, DomainKind::Suppliers, &records)?;
    assert_eq!(again, first);

    let mut shorter = records.clone();
    shorter.pop();
    let changed = store.replace_records(Environment::Staging, DomainKind::Suppliers, &shorter)?;
    assert_ne!(changed, first);
    Ok(())
}

#[test]
fn settings_round_trip_and_overwrite() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;

    assert!(store.get_setting("last_environment")?.is_none());
    store.set_setting("last_environment", "staging")?;
    store.set_setting("last_environment", "production")?;
    assert_eq!(
        store.get_setting("last_environment")?.as_deref(),
        Some("production")
    );
    Ok(())
}

#[test]
fn seed_demo_data_fills_every_domain() -> Result<()> {
    let mut store = Store::open_memory()?;
    store.bootstrap()?;
    store.seed_demo_data(Environment::Staging)?;

    for domain in DomainKind::ALL {
        assert!(
            store.record_count(Environment::Staging, domain)? > 0,
            "domain {domain:?}"
        );
    }
    Ok(())
}

#[test]
fn open_persists_across_reopen() -> Result<()> {
    let (_dir, db_path) = temp_db_path()?;

    {
        let mut store = Store::open(&db_path)?;
        store.bootstrap()?;
        let records = samples::sample_partnerships();
        store.replace_records(Environment::Staging, DomainKind::Partnerships, &records)?;
    }

    let store = Store::open(&db_path)?;
    store.bootstrap()?;
    let cached = store.list_records(Environment::Staging, DomainKind::Partnerships)?;
    assert_eq!(cached.len(), 5);
    assert_eq!(cached[0].display("name"), "Leaf Life");
    Ok(())
}
