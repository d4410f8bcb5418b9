// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Built-in demo datasets, one per domain. Used by `--demo` mode and by
//! exact-value tests.

use crate::model::{DomainKind, FieldValue, Record};

pub fn sample_partnerships() -> Vec<Record> {
    vec![
        Record::from_pairs([
            ("id", FieldValue::text("LL")),
            ("name", FieldValue::text("Leaf Life")),
            ("status", FieldValue::text("Active")),
            ("region", FieldValue::text("AB")),
            ("tier", FieldValue::Null),
            ("source_type", FieldValue::Null),
            ("point_contact", FieldValue::Null),
            ("internal_contact", FieldValue::Null),
        ]),
        Record::from_pairs([
            ("id", FieldValue::text("PL")),
            ("name", FieldValue::text("Plantlife")),
            ("status", FieldValue::text("Active")),
            ("region", FieldValue::text("AB")),
            ("tier", FieldValue::Null),
            ("source_type", FieldValue::text("Email")),
            (
                "point_contact",
                FieldValue::text("dylan.bruck@plantlifecanada.com"),
            ),
            ("internal_contact", FieldValue::text("Marina, Rori")),
        ]),
        Record::from_pairs([
            ("id", FieldValue::text("LUX")),
            ("name", FieldValue::text("Lux")),
            ("status", FieldValue::text("Active")),
            ("region", FieldValue::text("AB,MB")),
            ("tier", FieldValue::Null),
            ("source_type", FieldValue::text("Email")),
            ("point_contact", FieldValue::text("jselleck@420corp.ca")),
            ("internal_contact", FieldValue::text("Marina, Rori")),
        ]),
        Record::from_pairs([
            ("id", FieldValue::text("F20")),
            ("name", FieldValue::text("Four20")),
            ("status", FieldValue::text("Active")),
            ("region", FieldValue::text("AB,ON")),
            ("tier", FieldValue::Null),
            ("source_type", FieldValue::text("Email")),
            ("point_contact", FieldValue::text("lauramurray@oneplant.ca")),
            ("internal_contact", FieldValue::text("Rori")),
        ]),
        Record::from_pairs([
            ("id", FieldValue::text("TRN")),
            ("name", FieldValue::text("True North")),
            ("status", FieldValue::text("Inactive")),
            ("region", FieldValue::text("ON")),
            ("tier", FieldValue::Null),
            ("source_type", FieldValue::Null),
            ("point_contact", FieldValue::Null),
            ("internal_contact", FieldValue::Null),
        ]),
    ]
}

pub fn sample_customers() -> Vec<Record> {
    vec![
        Record::from_pairs([
            ("id", FieldValue::number(1.0)),
            ("name", FieldValue::text("John Smith")),
            ("email", FieldValue::text("john@example.com")),
            ("status", FieldValue::text("Active")),
            ("created", FieldValue::text("2024-01-15")),
        ]),
        Record::from_pairs([
            ("id", FieldValue::number(2.0)),
            ("name", FieldValue::text("Sarah Johnson")),
            ("email", FieldValue::text("sarah@example.com")),
            ("status", FieldValue::text("Active")),
            ("created", FieldValue::text("2024-01-20")),
        ]),
        Record::from_pairs([
            ("id", FieldValue::number(3.0)),
            ("name", FieldValue::text("Mike Wilson")),
            ("email", FieldValue::text("mike@example.com")),
            ("status", FieldValue::text("Inactive")),
            ("created", FieldValue::text("2024-01-25")),
        ]),
        Record::from_pairs([
            ("id", FieldValue::number(4.0)),
            ("name", FieldValue::text("Emily Davis")),
            ("email", FieldValue::text("emily@example.com")),
            ("status", FieldValue::text("Active")),
            ("created", FieldValue::text("2024-02-01")),
        ]),
    ]
}

pub fn sample_products() -> Vec<Record> {
    vec![
        Record::from_pairs([
            ("id", FieldValue::number(1.0)),
            ("name", FieldValue::text("Laptop Pro")),
            ("category", FieldValue::text("Electronics")),
            ("price", FieldValue::number(1299.0)),
            ("stock", FieldValue::number(45.0)),
        ]),
        Record::from_pairs([
            ("id", FieldValue::number(2.0)),
            ("name", FieldValue::text("Wireless Mouse")),
            ("category", FieldValue::text("Accessories")),
            ("price", FieldValue::number(29.0)),
            ("stock", FieldValue::number(120.0)),
        ]),
        Record::from_pairs([
            ("id", FieldValue::number(3.0)),
            ("name", FieldValue::text("Monitor 4K")),
            ("category", FieldValue::text("Electronics")),
            ("price", FieldValue::number(399.0)),
            ("stock", FieldValue::number(23.0)),
        ]),
        Record::from_pairs([
            ("id", FieldValue::number(4.0)),
            ("name", FieldValue::text("Keyboard Mechanical")),
            ("category", FieldValue::text("Accessories")),
            ("price", FieldValue::number(89.0)),
            ("stock", FieldValue::number(67.0)),
        ]),
    ]
}

pub fn sample_suppliers() -> Vec<Record> {
    vec![
        Record::from_pairs([
            ("id", FieldValue::number(1.0)),
            ("name", FieldValue::text("Tech Solutions Inc")),
            ("contact", FieldValue::text("contact@techsol.com")),
            ("location", FieldValue::text("New York")),
            ("rating", FieldValue::number(4.8)),
        ]),
        Record::from_pairs([
            ("id", FieldValue::number(2.0)),
            ("name", FieldValue::text("Global Electronics")),
            ("contact", FieldValue::text("info@globalelec.com")),
            ("location", FieldValue::text("California")),
            ("rating", FieldValue::number(4.5)),
        ]),
        Record::from_pairs([
            ("id", FieldValue::number(3.0)),
            ("name", FieldValue::text("Component Masters")),
            ("contact", FieldValue::text("sales@compmasters.com")),
            ("location", FieldValue::text("Texas")),
            ("rating", FieldValue::number(4.7)),
        ]),
    ]
}

pub fn sample_records(domain: DomainKind) -> Vec<Record> {
    match domain {
        DomainKind::Partnerships => sample_partnerships(),
        DomainKind::Customers => sample_customers(),
        DomainKind::Products => sample_products(),
        DomainKind::Suppliers => sample_suppliers(),
    }
}
