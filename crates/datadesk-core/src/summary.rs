// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts shown on the stat cards. `by_status` is computed over the full
/// unfiltered record set so the cards stay steady while the user types a
/// search; only `visible` tracks the filtered view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub visible: usize,
    pub by_status: BTreeMap<String, usize>,
}

impl Summary {
    pub fn compute(records: &[Record], visible: &[Record], status_field: &str) -> Self {
        Self {
            total: records.len(),
            visible: visible.len(),
            by_status: count_by_field(records, status_field),
        }
    }
}

/// Groups records by the tokens of `field`. Multi-value fields (the
/// comma-separated `region` column) are split into trimmed tokens first, so
/// a partnership active in "AB,MB" counts once per region. Null, missing,
/// and empty values contribute nothing.
pub fn count_by_field(records: &[Record], field: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        let raw = record.display(field);
        for token in raw.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            *counts.entry(token.to_owned()).or_insert(0) += 1;
        }
    }
    counts
}
