// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use datadesk_core::{DomainKind, Environment, Record, samples};
use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const APP_NAME: &str = "datadesk";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    (
        "records",
        &["environment", "domain", "record_key", "position", "data"],
    ),
    (
        "datasets",
        &["environment", "domain", "fingerprint", "refreshed_at"],
    ),
    ("settings", &["key", "value", "updated_at"]),
];

struct RequiredIndex {
    name: &'static str,
    create_sql: &'static str,
}

const REQUIRED_INDEXES: &[RequiredIndex] = &[RequiredIndex {
    name: "idx_records_position",
    create_sql: "CREATE INDEX IF NOT EXISTS idx_records_position ON records (environment, domain, position);",
}];

/// Cache state for one `(environment, domain)` dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetState {
    pub fingerprint: String,
    pub refreshed_at: OffsetDateTime,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn bootstrap(&self) -> Result<()> {
        if has_user_tables(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
        }

        ensure_required_indexes(&self.conn)?;
        Ok(())
    }

    /// Swaps the cached dataset for `(environment, domain)` with `records`,
    /// preserving their order, and records a content fingerprint. Returns the
    /// new fingerprint.
    pub fn replace_records(
        &mut self,
        environment: Environment,
        domain: DomainKind,
        records: &[Record],
    ) -> Result<String> {
        let fingerprint = fingerprint_records(records)?;
        let refreshed_at = now_rfc3339()?;

        let tx = self.conn.transaction().context("begin replace records")?;
        tx.execute(
            "DELETE FROM records WHERE environment = ? AND domain = ?",
            params![environment.as_str(), domain.label()],
        )
        .context("clear cached records")?;

        let mut seen_keys = BTreeSet::new();
        for (position, record) in records.iter().enumerate() {
            let mut key = record
                .key(domain.key_field())
                .unwrap_or_else(|| format!("#{position}"));
            // Backends occasionally repeat an id; suffix the repeat so the
            // key column stays distinct while the payload is cached as-is.
            if !seen_keys.insert(key.clone()) {
                key = format!("{key}#{position}");
                seen_keys.insert(key.clone());
            }
            let data = serde_json::to_string(record)
                .with_context(|| format!("serialize record {key}"))?;
            tx.execute(
                "
                INSERT INTO records (environment, domain, record_key, position, data)
                VALUES (?, ?, ?, ?, ?)
                ",
                params![
                    environment.as_str(),
                    domain.label(),
                    key,
                    position as i64,
                    data
                ],
            )
            .with_context(|| format!("insert record {key}"))?;
        }

        tx.execute(
            "
            INSERT INTO datasets (environment, domain, fingerprint, refreshed_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (environment, domain)
            DO UPDATE SET fingerprint = excluded.fingerprint,
                          refreshed_at = excluded.refreshed_at
            ",
            params![
                environment.as_str(),
                domain.label(),
                fingerprint,
                refreshed_at
            ],
        )
        .context("record dataset state")?;

        tx.commit().context("commit replace records")?;
        Ok(fingerprint)
    }

    /// Cached records for `(environment, domain)` in their stored order.
    pub fn list_records(
        &self,
        environment: Environment,
        domain: DomainKind,
    ) -> Result<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(
                "
                SELECT data
                FROM records
                WHERE environment = ? AND domain = ?
                ORDER BY position ASC
                ",
            )
            .context("prepare records query")?;
        let rows = stmt
            .query_map(params![environment.as_str(), domain.label()], |row| {
                row.get::<_, String>(0)
            })
            .context("query records")?;

        let mut records = Vec::new();
        for row in rows {
            let data = row.context("read record row")?;
            let record: Record = serde_json::from_str(&data)
                .with_context(|| format!("deserialize cached record for {}", domain.label()))?;
            records.push(record);
        }
        Ok(records)
    }

    pub fn record_count(&self, environment: Environment, domain: DomainKind) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM records WHERE environment = ? AND domain = ?",
                params![environment.as_str(), domain.label()],
                |row| row.get(0),
            )
            .context("count cached records")?;
        Ok(count as usize)
    }

    pub fn dataset_state(
        &self,
        environment: Environment,
        domain: DomainKind,
    ) -> Result<Option<DatasetState>> {
        let row = self
            .conn
            .query_row(
                "
                SELECT fingerprint, refreshed_at
                FROM datasets
                WHERE environment = ? AND domain = ?
                ",
                params![environment.as_str(), domain.label()],
                |row| {
                    let fingerprint: String = row.get(0)?;
                    let refreshed_at: String = row.get(1)?;
                    Ok((fingerprint, refreshed_at))
                },
            )
            .optional()
            .context("query dataset state")?;

        let Some((fingerprint, refreshed_at)) = row else {
            return Ok(None);
        };
        let refreshed_at = OffsetDateTime::parse(&refreshed_at, &Rfc3339)
            .with_context(|| format!("parse dataset refresh time {refreshed_at:?}"))?;
        Ok(Some(DatasetState {
            fingerprint,
            refreshed_at,
        }))
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("read setting {key}"))
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let updated_at = now_rfc3339()?;
        self.conn
            .execute(
                "
                INSERT INTO settings (key, value, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT (key)
                DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                ",
                params![key, value, updated_at],
            )
            .with_context(|| format!("write setting {key}"))?;
        Ok(())
    }

    /// Loads the built-in demo datasets into every domain of `environment`.
    pub fn seed_demo_data(&mut self, environment: Environment) -> Result<()> {
        for domain in DomainKind::ALL {
            let records = samples::sample_records(domain);
            self.replace_records(environment, domain, &records)
                .with_context(|| format!("seed demo data for {}", domain.label()))?;
        }
        Ok(())
    }
}

/// Hex SHA-256 over the serialized records, order included. Two fetches with
/// the same content produce the same fingerprint.
pub fn fingerprint_records(records: &[Record]) -> Result<String> {
    let mut hasher = Sha256::new();
    for record in records {
        let data = serde_json::to_string(record).context("serialize record for fingerprint")?;
        hasher.update(data.as_bytes());
        hasher.update(b"\n");
    }
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    Ok(out)
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("DATADESK_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set DATADESK_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("datadesk.db"))
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "
            SELECT COUNT(*)
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ",
            [],
            |row| row.get(0),
        )
        .context("count user tables")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for (table, required_columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            bail!(
                "database is missing required table `{table}`; use a datadesk-compatible database or migrate first"
            );
        }

        let columns = table_columns(conn, table)?;
        let missing: Vec<&str> = required_columns
            .iter()
            .copied()
            .filter(|column| !columns.contains(*column))
            .collect();

        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}; run migration before launching",
                missing.join(", ")
            );
        }
    }

    Ok(())
}

fn ensure_required_indexes(conn: &Connection) -> Result<()> {
    for index in REQUIRED_INDEXES {
        conn.execute_batch(index.create_sql)
            .with_context(|| format!("ensure required index `{}`", index.name))?;
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "
            SELECT EXISTS(
              SELECT 1
              FROM sqlite_master
              WHERE type = 'table' AND name = ?
            )
            ",
            params![table],
            |row| row.get::<_, i64>(0),
        )
        .with_context(|| format!("check table existence for {table}"))?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;

    rows.collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current time")
}
