//! Global filter map and per-element filter selections.
//!
//! The map is a flat `{property → value}` reducer. Every change bumps a
//! revision counter, which snapshots carry so pull-model consumers can skip
//! work when nothing moved.

use pagebuilder_document::ElementId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Selected value(s) for one property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    One(String),
    Many(Vec<String>),
}

impl FilterValue {
    pub fn values(&self) -> Vec<&str> {
        match self {
            FilterValue::One(value) => vec![value.as_str()],
            FilterValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// An empty string or list means "nothing selected"
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::One(value) => value.is_empty(),
            FilterValue::Many(values) => values.is_empty(),
        }
    }

    /// Whether `candidate` satisfies this selection
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            FilterValue::One(value) => value == candidate,
            FilterValue::Many(values) => values.iter().any(|v| v == candidate),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::One(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::One(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::Many(values)
    }
}

/// What a filter element currently has selected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementFilterState {
    pub property_name: String,
    pub value: FilterValue,
    #[serde(default)]
    pub category_ids: Vec<String>,
    /// Extra global keys the selection is copied under (edge `targetProperty`s)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mirrored: Vec<String>,
}

impl ElementFilterState {
    pub fn new(
        property_name: impl Into<String>,
        value: impl Into<FilterValue>,
        category_ids: Vec<String>,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            value: value.into(),
            category_ids,
            mirrored: Vec::new(),
        }
    }

    pub fn with_mirrored(mut self, keys: impl IntoIterator<Item = String>) -> Self {
        for key in keys {
            if key != self.property_name && !self.mirrored.contains(&key) {
                self.mirrored.push(key);
            }
        }
        self
    }

    /// Every global key this selection writes
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.property_name.as_str()).chain(self.mirrored.iter().map(String::as_str))
    }

    pub fn holds(&self, key: &str) -> bool {
        self.keys().any(|k| k == key)
    }
}

/// Immutable view of the filter map at one revision
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSnapshot {
    revision: u64,
    values: Arc<BTreeMap<String, FilterValue>>,
}

impl FilterSnapshot {
    pub fn from_map(revision: u64, values: BTreeMap<String, FilterValue>) -> Self {
        Self {
            revision,
            values: Arc::new(values),
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, property: &str) -> Option<&FilterValue> {
        self.values.get(property)
    }

    pub fn as_map(&self) -> &BTreeMap<String, FilterValue> {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Serializable form of the filter reducer's actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum FilterAction {
    SetFilter { name: String, value: FilterValue },
    ClearFilter { name: String },
    ResetFilters,
}

/// Session-wide filter state
#[derive(Debug, Clone, Default)]
pub struct GlobalFilters {
    values: Arc<BTreeMap<String, FilterValue>>,
    element_states: BTreeMap<ElementId, ElementFilterState>,
    revision: u64,
}

impl GlobalFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert `name`
    pub fn set_filter(&mut self, name: impl Into<String>, value: impl Into<FilterValue>) {
        let name = name.into();
        let value = value.into();
        if self.values.get(&name) == Some(&value) {
            return;
        }
        Arc::make_mut(&mut self.values).insert(name, value);
        self.revision += 1;
    }

    /// Delete `name`; absent keys are ignored
    pub fn clear_filter(&mut self, name: &str) {
        if !self.values.contains_key(name) {
            return;
        }
        Arc::make_mut(&mut self.values).remove(name);
        self.revision += 1;
    }

    /// Empty the map and forget every element selection
    pub fn reset_filters(&mut self) {
        if self.values.is_empty() && self.element_states.is_empty() {
            return;
        }
        self.values = Arc::default();
        self.element_states.clear();
        self.revision += 1;
    }

    pub fn apply(&mut self, action: FilterAction) {
        match action {
            FilterAction::SetFilter { name, value } => self.set_filter(name, value),
            FilterAction::ClearFilter { name } => self.clear_filter(&name),
            FilterAction::ResetFilters => self.reset_filters(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self) -> FilterSnapshot {
        FilterSnapshot {
            revision: self.revision,
            values: Arc::clone(&self.values),
        }
    }

    /// Record what `element_id` selected and publish it under `property`
    pub fn set_element_filter(
        &mut self,
        element_id: impl Into<ElementId>,
        property: impl Into<String>,
        value: impl Into<FilterValue>,
        category_ids: Vec<String>,
    ) {
        self.select(element_id, ElementFilterState::new(property, value, category_ids));
    }

    /// Record `state` for `element_id` and publish its value under every key it holds
    ///
    /// Keys the element held before but no longer does are released.
    pub fn select(&mut self, element_id: impl Into<ElementId>, state: ElementFilterState) {
        let previous = self.element_states.insert(element_id.into(), state.clone());
        if let Some(previous) = previous {
            for key in previous.keys().filter(|key| !state.holds(key)) {
                self.release(key);
            }
        }
        for key in state.keys() {
            self.set_filter(key, state.value.clone());
        }
    }

    /// Forget `element_id`'s selection
    ///
    /// Each global key it held is cleared, unless another element still
    /// selects that key; the key then takes that element's value.
    pub fn clear_element_filter(&mut self, element_id: &str) -> Option<ElementFilterState> {
        let state = self.element_states.remove(element_id)?;
        for key in state.keys() {
            self.release(key);
        }
        Some(state)
    }

    fn release(&mut self, key: &str) {
        let holder = self
            .element_states
            .values()
            .find(|other| other.holds(key))
            .map(|other| other.value.clone());
        match holder {
            Some(value) => self.set_filter(key, value),
            None => self.clear_filter(key),
        }
    }

    pub fn element_filter(&self, element_id: &str) -> Option<&ElementFilterState> {
        self.element_states.get(element_id)
    }
}
