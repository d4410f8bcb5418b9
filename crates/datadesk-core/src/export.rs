// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{DomainKind, Record};
use time::Date;

/// Serializes records to CSV with a header row. Fields containing commas,
/// quotes, or newlines are quoted, with embedded quotes doubled.
pub fn to_csv(columns: &[&str], records: &[Record]) -> String {
    let mut out = String::new();
    out.push_str(
        &columns
            .iter()
            .map(|column| escape_csv_field(column))
            .collect::<Vec<_>>()
            .join(","),
    );
    out.push('\n');

    for record in records {
        let row = columns
            .iter()
            .map(|column| escape_csv_field(&record.display(column)))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&row);
        out.push('\n');
    }
    out
}

fn escape_csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

/// Export filename for a domain, e.g. `partnerships_export_2026-08-29.csv`.
pub fn export_filename(domain: DomainKind, today: Date) -> String {
    format!(
        "{}_export_{:04}-{:02}-{:02}.csv",
        domain.label(),
        today.year(),
        u8::from(today.month()),
        today.day(),
    )
}
