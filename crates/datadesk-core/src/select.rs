// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Record ids checked for bulk action. The set is independent of the
/// current filter and sort view: ids whose records drop out of the filtered
/// view stay selected, they just stop counting as visible.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    selected: BTreeSet<String>,
}

impl SelectionState {
    pub fn toggle(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_owned());
        }
    }

    /// Header checkbox semantics: if every visible id is already selected,
    /// deselect exactly those; otherwise select them all. Ids outside the
    /// visible view are never touched.
    pub fn toggle_all<I, S>(&mut self, visible_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let visible: Vec<String> = visible_ids
            .into_iter()
            .map(|id| id.as_ref().to_owned())
            .collect();
        let all_selected = !visible.is_empty()
            && visible.iter().all(|id| self.selected.contains(id));

        if all_selected {
            for id in &visible {
                self.selected.remove(id);
            }
        } else {
            self.selected.extend(visible);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// How many of the given visible ids are selected. Stale selections
    /// referencing records no longer in view are excluded.
    pub fn visible_selected_count<I, S>(&self, visible_ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        visible_ids
            .into_iter()
            .filter(|id| self.selected.contains(id.as_ref()))
            .count()
    }

    /// Bulk actions (export, propose-change, deactivate) are available iff
    /// anything is selected. Derived, never stored.
    pub fn bulk_actions_enabled(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }
}
