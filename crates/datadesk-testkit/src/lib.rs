// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use datadesk_core::{DomainKind, FieldValue, Record, RecordStatus, SourceType, REGIONS};
use std::path::PathBuf;

const COMPANY_LEADS: [&str; 14] = [
    "Leaf", "North", "Plant", "Prairie", "Harbor", "Summit", "Cedar", "Aurora", "Maple", "Tundra",
    "Granite", "Pacific", "Lakeview", "Horizon",
];
const COMPANY_TAILS: [&str; 10] = [
    "Life", "Supply", "Collective", "Partners", "Trading", "Works", "Labs", "Goods", "Group",
    "Holdings",
];

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];
const EMAIL_DOMAINS: [&str; 5] = [
    "example.com",
    "mailbox.ca",
    "northmail.net",
    "deskmail.io",
    "corp.example.org",
];

const TIERS: [&str; 3] = ["Gold", "Silver", "Bronze"];

const PRODUCT_LEADS: [&str; 10] = [
    "Laptop", "Monitor", "Keyboard", "Mouse", "Headset", "Webcam", "Dock", "Tablet", "Charger",
    "Speaker",
];
const PRODUCT_TAILS: [&str; 6] = ["Pro", "Lite", "Max", "Mini", "Plus", "4K"];
const PRODUCT_CATEGORIES: [&str; 3] = ["Electronics", "Accessories", "Software"];

const SUPPLIER_LOCATIONS: [&str; 8] = [
    "New York",
    "California",
    "Texas",
    "Toronto",
    "Vancouver",
    "Montreal",
    "Chicago",
    "Seattle",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Deterministic record generator for table, cache, and export tests.
#[derive(Debug, Clone)]
pub struct RecordFaker {
    rng: DeterministicRng,
}

impl RecordFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn record(&mut self, domain: DomainKind, index: usize) -> Record {
        match domain {
            DomainKind::Partnerships => self.partnership(index),
            DomainKind::Customers => self.customer(index),
            DomainKind::Products => self.product(index),
            DomainKind::Suppliers => self.supplier(index),
        }
    }

    pub fn records(&mut self, domain: DomainKind, count: usize) -> Vec<Record> {
        (0..count).map(|index| self.record(domain, index)).collect()
    }

    pub fn partnership(&mut self, index: usize) -> Record {
        let name = self.company_name();
        let status = RecordStatus::ALL[self.rng.int_n(RecordStatus::ALL.len())];
        let mut record = Record::from_pairs([
            ("id", FieldValue::text(format!("P{index:03}"))),
            ("name", FieldValue::text(name.clone())),
            ("status", FieldValue::text(status.as_str())),
            ("region", FieldValue::text(self.region_list())),
            ("tier", FieldValue::Null),
            ("source_type", FieldValue::Null),
            ("point_contact", FieldValue::Null),
            ("internal_contact", FieldValue::Null),
        ]);

        if self.rng.bool() {
            record.set("tier", FieldValue::text(self.pick(&TIERS)));
        }
        if self.rng.bool() {
            let source = SourceType::ALL[self.rng.int_n(SourceType::ALL.len())];
            record.set("source_type", FieldValue::text(source.as_str()));
            record.set("point_contact", FieldValue::text(self.email(&name)));
        }
        if self.rng.bool() {
            record.set("internal_contact", FieldValue::text(self.contact_list()));
        }
        record
    }

    pub fn customer(&mut self, index: usize) -> Record {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let status = if self.rng.int_n(4) == 0 {
            RecordStatus::Inactive
        } else {
            RecordStatus::Active
        };
        Record::from_pairs([
            ("id", FieldValue::number((index + 1) as f64)),
            ("name", FieldValue::text(format!("{first} {last}"))),
            (
                "email",
                FieldValue::text(format!(
                    "{}.{}@{}",
                    first.to_ascii_lowercase(),
                    last.to_ascii_lowercase(),
                    self.pick(&EMAIL_DOMAINS),
                )),
            ),
            ("status", FieldValue::text(status.as_str())),
            (
                "created",
                FieldValue::text(format!(
                    "2024-{:02}-{:02}",
                    1 + self.rng.int_n(12),
                    1 + self.rng.int_n(28),
                )),
            ),
        ])
    }

    pub fn product(&mut self, index: usize) -> Record {
        let name = format!("{} {}", self.pick(&PRODUCT_LEADS), self.pick(&PRODUCT_TAILS));
        Record::from_pairs([
            ("id", FieldValue::number((index + 1) as f64)),
            ("name", FieldValue::text(name)),
            ("category", FieldValue::text(self.pick(&PRODUCT_CATEGORIES))),
            (
                "price",
                FieldValue::number((10 + self.rng.int_n(1990)) as f64),
            ),
            ("stock", FieldValue::number(self.rng.int_n(200) as f64)),
        ])
    }

    pub fn supplier(&mut self, index: usize) -> Record {
        let name = format!("{} {}", self.company_name(), "Inc");
        let contact = format!(
            "contact@{}.example.com",
            name.split_whitespace()
                .next()
                .unwrap_or("supplier")
                .to_ascii_lowercase(),
        );
        Record::from_pairs([
            ("id", FieldValue::number((index + 1) as f64)),
            ("name", FieldValue::text(name)),
            ("contact", FieldValue::text(contact)),
            ("location", FieldValue::text(self.pick(&SUPPLIER_LOCATIONS))),
            (
                "rating",
                FieldValue::number((30 + self.rng.int_n(21)) as f64 / 10.0),
            ),
        ])
    }

    fn company_name(&mut self) -> String {
        format!("{} {}", self.pick(&COMPANY_LEADS), self.pick(&COMPANY_TAILS))
    }

    fn region_list(&mut self) -> String {
        let count = 1 + self.rng.int_n(3);
        let mut start = self.rng.int_n(REGIONS.len());
        let mut parts = Vec::with_capacity(count);
        for _ in 0..count {
            let code = REGIONS[start % REGIONS.len()];
            if !parts.contains(&code) {
                parts.push(code);
            }
            start += 1 + self.rng.int_n(3);
        }
        parts.join(",")
    }

    fn email(&mut self, company: &str) -> String {
        let first = self.pick(&FIRST_NAMES).to_ascii_lowercase();
        let host = company
            .split_whitespace()
            .next()
            .unwrap_or("partner")
            .to_ascii_lowercase();
        format!("{first}@{host}.example.com")
    }

    fn contact_list(&mut self) -> String {
        if self.rng.bool() {
            self.pick(&FIRST_NAMES).to_owned()
        } else {
            format!("{}, {}", self.pick(&FIRST_NAMES), self.pick(&FIRST_NAMES))
        }
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("datadesk.db");
    Ok((dir, db_path))
}
