// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{FieldValue, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel filter value meaning "no constraint on this field".
pub const FILTER_ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub search_text: String,
    pub field_filters: BTreeMap<String, String>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.search_text.is_empty() && self.active_filters().next().is_none()
    }

    /// Sets a field-equality constraint. The "all" sentinel clears it.
    pub fn set_field_filter(&mut self, field: &str, value: &str) {
        if value.trim().eq_ignore_ascii_case(FILTER_ALL) {
            self.field_filters.remove(field);
        } else {
            self.field_filters.insert(field.to_owned(), value.to_owned());
        }
    }

    pub fn field_filter(&self, field: &str) -> Option<&str> {
        self.field_filters.get(field).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.search_text.clear();
        self.field_filters.clear();
    }

    fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.field_filters
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
            .filter(|(_, value)| !value.trim().eq_ignore_ascii_case(FILTER_ALL))
    }

    /// The filter predicate. A record passes iff the search text (when
    /// non-empty) appears case-insensitively in some field's stringified
    /// value, and every active field filter matches exactly. Missing and
    /// null fields never satisfy a concrete field filter.
    pub fn matches(&self, record: &Record) -> bool {
        if !self.search_text.is_empty() {
            let needle = self.search_text.to_lowercase();
            let hit = record
                .values()
                .any(|value| value.display().to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        self.active_filters().all(|(field, wanted)| {
            record
                .get(field)
                .unwrap_or(&FieldValue::Null)
                .matches_filter(wanted)
        })
    }
}

/// Narrows `records` to those matching `filter`, preserving input order.
/// Recomputed from scratch on every call; never reorders.
pub fn apply_filter(records: &[Record], filter: &FilterState) -> Vec<Record> {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}
