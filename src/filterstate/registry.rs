//! Filter definitions and the registry that holds them.
//!
//! This module defines the schema for filters: which query parameter a filter
//! owns, which values it accepts, whether it takes one value or many, and which
//! child parameters a particular selection unlocks.
//!
//! A [`Registry`] is built once at startup (from configuration or the built-in
//! ticket catalog) and then only read. Everything downstream borrows it.

use crate::error::{FilterError, Result};
use crate::pagination::{PAGE_PARAM, PAGE_SIZE_PARAM};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// The kind of value a child field holds.
///
/// Values are opaque strings on the wire; the kind only tells the rendering
/// side which widget to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildFieldKind {
    #[default]
    Text,
    Date,
    Number,
}

/// One selectable value of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    /// Canonical string persisted in the query.
    pub value: String,
}

/// A parameter that is only meaningful while its parent filter holds a
/// specific trigger value (e.g. `date` while `timeRange=date`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildFieldDefinition {
    pub param: String,
    #[serde(rename = "type", default)]
    pub kind: ChildFieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl ChildFieldDefinition {
    pub fn new(param: impl Into<String>, kind: ChildFieldKind) -> Self {
        Self {
            param: param.into(),
            kind,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Specification for a single filterable dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDefinition {
    /// Unique identifier, also the query parameter name unless `param` is set.
    pub key: String,

    /// Overrides the query parameter name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,

    pub label: String,

    /// Multiselect filters encode as repeated keys; single-select filters
    /// hold at most one value.
    #[serde(default)]
    pub multiselect: bool,

    /// Applied when the dimension has no explicit selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Vec<String>>,

    #[serde(default)]
    pub options: Vec<FilterOption>,

    /// Trigger value → child parameters active while that value is selected.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub child_fields: BTreeMap<String, Vec<ChildFieldDefinition>>,
}

impl FilterDefinition {
    /// Create a single-select definition with no options.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            param: None,
            label: label.into(),
            multiselect: false,
            default_value: None,
            options: Vec::new(),
            child_fields: BTreeMap::new(),
        }
    }

    /// Set the multiselect flag.
    pub fn multiselect(mut self) -> Self {
        self.multiselect = true;
        self
    }

    /// Override the query parameter name.
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    pub fn with_default<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.default_value = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn option(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(FilterOption {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    /// Register a child field activated by `trigger`.
    pub fn child(mut self, trigger: impl Into<String>, field: ChildFieldDefinition) -> Self {
        self.child_fields
            .entry(trigger.into())
            .or_default()
            .push(field);
        self
    }

    /// The query parameter this filter owns.
    pub fn param(&self) -> &str {
        self.param.as_deref().unwrap_or(&self.key)
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|opt| opt.value == value)
    }

    /// Child fields activated by `value`, empty if `value` is not a trigger.
    pub fn children_for(&self, value: &str) -> &[ChildFieldDefinition] {
        self.child_fields
            .get(value)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Non-empty default values, if any.
    pub fn defaults(&self) -> Option<&[String]> {
        self.default_value
            .as_deref()
            .filter(|values| values.iter().any(|v| !v.is_empty()))
    }
}

/// Immutable catalog of filter definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Registry {
    definitions: Vec<FilterDefinition>,
}

static TICKET_FILTERS: Lazy<Registry> = Lazy::new(|| Registry {
    definitions: ticket_definitions(),
});

impl Registry {
    /// Build a registry, checking that keys, params and option values are
    /// unique and that child fields are wired to real options.
    pub fn new(definitions: Vec<FilterDefinition>) -> Result<Self> {
        validate(&definitions)?;
        Ok(Self { definitions })
    }

    /// The built-in catalog for the ticket list.
    pub fn tickets() -> &'static Registry {
        &TICKET_FILTERS
    }

    /// Look up a definition by key.
    pub fn get_definition(&self, key: &str) -> Option<&FilterDefinition> {
        self.definitions.iter().find(|def| def.key == key)
    }

    /// Look up a definition by the query parameter it owns.
    pub fn definition_for_param(&self, param: &str) -> Option<&FilterDefinition> {
        self.definitions.iter().find(|def| def.param() == param)
    }

    /// All registered keys, in registration order.
    pub fn all_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.definitions.iter().map(|def| def.key.as_str())
    }

    pub fn definitions(&self) -> &[FilterDefinition] {
        &self.definitions
    }

    /// Top-level filter params, in registration order.
    pub fn filter_params(&self) -> impl Iterator<Item = &str> + '_ {
        self.definitions.iter().map(FilterDefinition::param)
    }

    /// Every child param declared by any definition. A param shared by two
    /// triggers is yielded once per declaration.
    pub fn child_params(&self) -> impl Iterator<Item = &str> + '_ {
        self.definitions
            .iter()
            .flat_map(|def| def.child_fields.values())
            .flatten()
            .map(|child| child.param.as_str())
    }

    /// Whether the panel manages `param`. Anything else belongs to another
    /// feature and must be left alone.
    pub fn owns_param(&self, param: &str) -> bool {
        param == PAGE_PARAM
            || param == PAGE_SIZE_PARAM
            || self.filter_params().any(|p| p == param)
            || self.child_params().any(|p| p == param)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn validate(definitions: &[FilterDefinition]) -> Result<()> {
    let mut keys = HashSet::new();
    let mut params = HashSet::new();
    for def in definitions {
        if !keys.insert(def.key.as_str()) {
            return Err(FilterError::DuplicateKey(def.key.clone()));
        }
        if !params.insert(def.param()) {
            return Err(FilterError::DuplicateParam(def.param().to_string()));
        }
    }

    for def in definitions {
        let mut values = HashSet::new();
        for opt in &def.options {
            if !values.insert(opt.value.as_str()) {
                return Err(FilterError::DuplicateOption {
                    key: def.key.clone(),
                    value: opt.value.clone(),
                });
            }
        }

        for (trigger, children) in &def.child_fields {
            if !def.has_option(trigger) {
                return Err(FilterError::UnknownTrigger {
                    key: def.key.clone(),
                    trigger: trigger.clone(),
                });
            }
            for child in children {
                let param = child.param.as_str();
                if keys.contains(param) || params.contains(param) || is_page_param(param) {
                    return Err(FilterError::ChildParamCollision {
                        key: def.key.clone(),
                        param: child.param.clone(),
                    });
                }
            }
        }
    }

    for def in definitions {
        if is_page_param(def.param()) {
            return Err(FilterError::DuplicateParam(def.param().to_string()));
        }
    }

    Ok(())
}

fn is_page_param(param: &str) -> bool {
    param == PAGE_PARAM || param == PAGE_SIZE_PARAM
}

fn ticket_definitions() -> Vec<FilterDefinition> {
    vec![
        FilterDefinition::new("status", "Status")
            .multiselect()
            .option("Pending", "Pending")
            .option("In progress", "InProgress")
            .option("Resolved", "Resolved")
            .option("Rejected", "Rejected"),
        FilterDefinition::new("department", "Department")
            .multiselect()
            .option("Academic Affairs", "academic")
            .option("Student Services", "services")
            .option("Finance", "finance")
            .option("IT Support", "it"),
        FilterDefinition::new("category", "Category")
            .multiselect()
            .option("Transcript", "transcript")
            .option("Enrollment", "enrollment")
            .option("Tuition", "tuition")
            .option("Account access", "account")
            .option("Other", "other"),
        FilterDefinition::new("priority", "Priority")
            .option("Low", "low")
            .option("Normal", "normal")
            .option("High", "high"),
        FilterDefinition::new("timeRange", "Submitted")
            .with_default(["all"])
            .option("Any time", "all")
            .option("Today", "today")
            .option("This week", "week")
            .option("This month", "month")
            .option("On date", "date")
            .option("Between dates", "range")
            .child("date", ChildFieldDefinition::new("date", ChildFieldKind::Date))
            .child("range", ChildFieldDefinition::new("from", ChildFieldKind::Date))
            .child("range", ChildFieldDefinition::new("to", ChildFieldKind::Date)),
    ]
}
