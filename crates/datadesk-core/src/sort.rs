// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{FieldValue, Record};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

/// Tri-state column sort. `spec == None` means the filtered insertion order
/// is left untouched; the only mutator is [`SortState::cycle`], so a column
/// is never retained without a direction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    spec: Option<SortSpec>,
}

impl SortState {
    pub fn column(&self) -> Option<&str> {
        self.spec.as_ref().map(|spec| spec.column.as_str())
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.spec.as_ref().map(|spec| spec.direction)
    }

    pub fn is_unsorted(&self) -> bool {
        self.spec.is_none()
    }

    pub fn clear(&mut self) {
        self.spec = None;
    }

    /// Advances the sort for `column`: none -> asc -> desc -> none on the
    /// same column; selecting a different column starts over at asc.
    /// Returns the new direction, `None` meaning the sort was cleared.
    pub fn cycle(&mut self, column: &str) -> Option<SortDirection> {
        let next = match &self.spec {
            Some(spec) if spec.column == column => match spec.direction {
                SortDirection::Asc => Some(SortDirection::Desc),
                SortDirection::Desc => None,
            },
            _ => Some(SortDirection::Asc),
        };
        self.spec = next.map(|direction| SortSpec {
            column: column.to_owned(),
            direction,
        });
        next
    }
}

/// Orders `records` by the sort column. Unsorted state returns the input
/// unchanged. Null and missing values sort last regardless of direction;
/// the sort is stable, so equal keys keep their filtered order.
pub fn apply_sort(mut records: Vec<Record>, sort: &SortState) -> Vec<Record> {
    let Some(spec) = &sort.spec else {
        return records;
    };

    records.sort_by(|left, right| compare_records(left, right, spec));
    records
}

fn compare_records(left: &Record, right: &Record, spec: &SortSpec) -> Ordering {
    let left_value = left.get(&spec.column).unwrap_or(&FieldValue::Null);
    let right_value = right.get(&spec.column).unwrap_or(&FieldValue::Null);

    match (left_value.is_null(), right_value.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let order = left_value.cmp_value(right_value);
            match spec.direction {
                SortDirection::Asc => order,
                SortDirection::Desc => order.reverse(),
            }
        }
    }
}
