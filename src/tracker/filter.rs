//! Workout-type picker filtering.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{Dimension, WorkoutType};

/// Picker state: at most one active category per dimension, a search box and
/// the favorites-only switch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub selected: [Option<String>; Dimension::COUNT],
    pub search_text: String,
    pub favorites_only: bool,
}

impl FilterState {
    /// Pressing the active button clears its dimension; pressing another
    /// button in the same dimension replaces the selection.
    pub fn select_category(&mut self, dimension: Dimension, category_id: &str) {
        let slot = &mut self.selected[dimension.index()];
        if slot.as_deref() == Some(category_id) {
            *slot = None;
        } else {
            *slot = Some(category_id.to_string());
        }
    }

    pub fn selection(&self, dimension: Dimension) -> Option<&str> {
        self.selected[dimension.index()].as_deref()
    }

    pub fn set_search(&mut self, text: &str) {
        self.search_text = text.to_string();
    }

    pub fn toggle_favorites_only(&mut self) {
        self.favorites_only = !self.favorites_only;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, workout_type: &WorkoutType, favorites: &HashSet<String>) -> bool {
        let categories_match = Dimension::ALL.iter().all(|&dimension| {
            match self.selection(dimension) {
                Some(selected) => workout_type.category(dimension) == Some(selected),
                None => true,
            }
        });
        if !categories_match {
            return false;
        }

        if self.favorites_only && !favorites.contains(&workout_type.id) {
            return false;
        }

        let needle = self.search_text.trim().to_lowercase();
        needle.is_empty() || workout_type.name.to_lowercase().contains(&needle)
    }
}

/// Types passing every active filter, in catalog order.
pub fn filter_workout_types<'a>(
    workout_types: &'a [WorkoutType],
    state: &FilterState,
    favorites: &HashSet<String>,
) -> Vec<&'a WorkoutType> {
    workout_types
        .iter()
        .filter(|wt| state.matches(wt, favorites))
        .collect()
}
