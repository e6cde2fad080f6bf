//! # Filter Panel
//!
//! The panel ties the registry, the codec and pagination together for a UI.
//! It answers two questions:
//!
//! - **What is selected?** [`FilterPanel::selected`], [`FilterPanel::view`]
//!   and [`FilterPanel::submit`] decode a query snapshot.
//! - **What should the URL become?** [`FilterPanel::apply`] and friends return
//!   a replacement snapshot for the navigation layer to push.
//!
//! ## Child fields
//!
//! A filter may declare child parameters that only mean something while one of
//! its trigger values is selected (`timeRange=date` activates `date`). Every
//! write recomputes which child params are active and drops the rest in the
//! same replacement, so a stale child never reaches the URL, not even for one
//! navigation.
//!
//! ## Ownership
//!
//! The panel owns the registry's filter params, their child params, `page`
//! and `pageSize`. Anything else in the query (auth tokens, other widgets'
//! state) passes through untouched.

use crate::codec::{decode_selected_keys, update_params, DecodedQuery, FieldValue, Selection};
use crate::pagination::{PageState, PAGE_PARAM};
use crate::query::QueryState;
use crate::registry::{ChildFieldKind, FilterDefinition, Registry};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

/// A child field whose trigger is currently selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveChildField {
    /// Key of the parent filter.
    pub parent: String,
    /// Trigger value that activated this field.
    pub trigger: String,
    pub param: String,
    pub kind: ChildFieldKind,
    /// Value from the query, else the field's default.
    pub value: Option<String>,
    /// True when `value` came from the default.
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub label: String,
    pub value: String,
    pub selected: bool,
}

/// Render model for one filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub key: String,
    pub param: String,
    pub label: String,
    pub multiselect: bool,
    pub options: Vec<OptionView>,
    /// Effective selection: explicit values, else the default.
    pub values: Vec<String>,
    pub is_default: bool,
}

/// Everything a UI needs to draw the panel for one query snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    pub fields: Vec<FieldView>,
    pub children: Vec<ActiveChildField>,
    pub page: PageState,
}

/// The canonical request handed to the data-fetch side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSubmission {
    /// Explicitly selected values keyed by query param.
    pub filters: DecodedQuery,
    /// Active child params with their resolved values.
    pub children: BTreeMap<String, String>,
    pub page: PageState,
}

pub struct FilterPanel<'r> {
    registry: &'r Registry,
}

impl<'r> FilterPanel<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Explicit selections keyed by filter key. Filters without a value are
    /// omitted.
    pub fn selected(&self, query: &QueryState) -> DecodedQuery {
        let by_param = decode_selected_keys(query, self.registry.filter_params());
        let mut selected = DecodedQuery::default();
        for def in self.registry.definitions() {
            if let Some(values) = by_param.get(def.param()) {
                selected.insert(def.key.as_str(), values.to_vec());
            }
        }
        trace!(count = selected.len(), "decoded panel selection");
        selected
    }

    /// Explicit selection for `key`, else its default, else absent.
    pub fn effective(&self, query: &QueryState, key: &str) -> Selection {
        let Some(def) = self.registry.get_definition(key) else {
            return Selection::Absent;
        };
        effective_for(def, query).0
    }

    /// Child fields activated by the current explicit selections, in
    /// registration order.
    pub fn active_child_fields(&self, query: &QueryState) -> Vec<ActiveChildField> {
        let mut active: Vec<ActiveChildField> = Vec::new();
        for def in self.registry.definitions() {
            if def.child_fields.is_empty() {
                continue;
            }
            let selected = decode_selected_keys(query, [def.param()]).selection(def.param());
            for trigger in selected.values() {
                for child in def.children_for(trigger) {
                    if active.iter().any(|a| a.param == child.param) {
                        continue;
                    }
                    let explicit = query.first(&child.param).map(str::to_string);
                    let is_default = explicit.is_none() && child.default_value.is_some();
                    active.push(ActiveChildField {
                        parent: def.key.clone(),
                        trigger: trigger.clone(),
                        param: child.param.clone(),
                        kind: child.kind,
                        value: explicit.or_else(|| child.default_value.clone()),
                        is_default,
                    });
                }
            }
        }
        active
    }

    /// Set filter `key` to `value` and return the replacement query.
    ///
    /// Single-select filters keep only the first non-empty value. Child params
    /// that are no longer active and the `page` param are removed in the same
    /// replacement. Unknown keys leave the query as it was.
    pub fn apply(&self, query: &QueryState, key: &str, value: FieldValue) -> QueryState {
        let Some(def) = self.registry.get_definition(key) else {
            warn!(key, "ignoring write to unknown filter");
            return query.clone();
        };
        let value = if def.multiselect {
            value
        } else {
            value.into_single()
        };
        debug!(key, param = def.param(), ?value, "applying filter");
        self.replace(query, vec![(def.param(), value)])
    }

    /// Set several filters at once. Unknown keys are skipped.
    pub fn apply_many<'k, I>(&self, query: &QueryState, updates: I) -> QueryState
    where
        I: IntoIterator<Item = (&'k str, FieldValue)>,
    {
        let mut writes = Vec::new();
        for (key, value) in updates {
            match self.registry.get_definition(key) {
                Some(def) if def.multiselect => writes.push((def.param(), value)),
                Some(def) => writes.push((def.param(), value.into_single())),
                None => warn!(key, "ignoring write to unknown filter"),
            }
        }
        if writes.is_empty() {
            return query.clone();
        }
        self.replace(query, writes)
    }

    /// Set an active child param. Writes to inactive or unknown child params
    /// are ignored so they can't leave a stale value in the URL.
    pub fn apply_child(&self, query: &QueryState, param: &str, value: Option<String>) -> QueryState {
        let active = self.active_child_fields(query);
        if !active.iter().any(|child| child.param == param) {
            warn!(param, "ignoring write to inactive child field");
            return query.clone();
        }
        let value = FieldValue::from(value).into_single();
        debug!(param, ?value, "applying child field");
        update_params(query, [(param, &value)])
    }

    /// Remove every param the panel owns, keeping foreign ones.
    pub fn clear(&self, query: &QueryState) -> QueryState {
        let mut next = query.clone();
        next.retain_keys(|k| !self.registry.owns_param(k));
        debug!(removed = query.len() - next.len(), "cleared panel state");
        next
    }

    /// Render model for every registered filter.
    pub fn view(&self, query: &QueryState) -> PanelView {
        let fields = self
            .registry
            .definitions()
            .iter()
            .map(|def| {
                let (selection, is_default) = effective_for(def, query);
                FieldView {
                    key: def.key.clone(),
                    param: def.param().to_string(),
                    label: def.label.clone(),
                    multiselect: def.multiselect,
                    options: def
                        .options
                        .iter()
                        .map(|opt| OptionView {
                            label: opt.label.clone(),
                            value: opt.value.clone(),
                            selected: selection.contains(&opt.value),
                        })
                        .collect(),
                    values: selection.into_option().unwrap_or_default(),
                    is_default,
                }
            })
            .collect();

        PanelView {
            fields,
            children: self.active_child_fields(query),
            page: PageState::from_query(query),
        }
    }

    /// The finalized request for the data-fetch side.
    pub fn submit(&self, query: &QueryState) -> FilterSubmission {
        let filters = decode_selected_keys(query, self.registry.filter_params());
        let children = self
            .active_child_fields(query)
            .into_iter()
            .filter_map(|child| child.value.map(|value| (child.param, value)))
            .collect();
        let page = PageState::from_query(query);
        debug!(filters = filters.len(), page = page.page, "submitting filters");
        FilterSubmission {
            filters,
            children,
            page,
        }
    }

    /// Apply `writes`, drop inactive child params and reset the page, all in
    /// one replacement.
    fn replace(&self, query: &QueryState, writes: Vec<(&str, FieldValue)>) -> QueryState {
        let reset = FieldValue::Absent;
        let mut next = update_params(
            query,
            writes
                .iter()
                .map(|(param, value)| (*param, value))
                .chain([(PAGE_PARAM, &reset)]),
        );

        let active: Vec<String> = self
            .active_child_fields(&next)
            .into_iter()
            .map(|child| child.param)
            .collect();
        let stale: Vec<&str> = self
            .registry
            .child_params()
            .filter(|param| !active.iter().any(|a| a.as_str() == *param))
            .collect();
        if next.keys().iter().any(|k| stale.iter().any(|s| s == k)) {
            debug!(?stale, "dropping inactive child params");
            next.retain_keys(|k| !stale.iter().any(|s| *s == k));
        }
        next
    }
}

/// Explicit selection, else the definition's default. The flag is true when
/// the default was used.
fn effective_for(def: &FilterDefinition, query: &QueryState) -> (Selection, bool) {
    match decode_selected_keys(query, [def.param()]).selection(def.param()) {
        Selection::Absent => match def.defaults() {
            Some(defaults) => (Selection::Present(defaults.to_vec()), true),
            None => (Selection::Absent, false),
        },
        explicit => (explicit, false),
    }
}
