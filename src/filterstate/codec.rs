//! # Query Codec
//!
//! Pure functions translating between a [`QueryState`] and structured filter
//! selections. Nothing here knows about the registry: keys are plain query
//! parameter names, and the panel decides which of them it owns.
//!
//! ## Writing
//!
//! [`encode_field`] replaces every entry under one key; [`update_params`] does
//! the same for several keys in one step. Writes always replace, never merge,
//! so re-selecting a value can't leave a stale duplicate behind.
//!
//! ## Reading
//!
//! Both decode variants omit keys without values instead of mapping them to an
//! empty list. [`DecodedQuery::selection`] makes that explicit by returning
//! [`Selection::Absent`] for a missing key. Empty-string entries (`status=`)
//! are not counted as values.
//!
//! Duplicates are preserved: `status=A&status=A` decodes to `["A", "A"]`.

use crate::query::QueryState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A value to write under one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Each non-empty element becomes one `key=element` entry.
    Many(Vec<String>),
    /// A non-empty string becomes exactly one entry.
    One(String),
    /// Clears the key.
    Absent,
}

impl FieldValue {
    pub fn many<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        FieldValue::Many(values.into_iter().map(Into::into).collect())
    }

    pub fn one(value: impl Into<String>) -> Self {
        FieldValue::One(value.into())
    }

    /// The entries this value encodes to, in order.
    pub fn encoded_values(&self) -> Vec<&str> {
        match self {
            FieldValue::Many(values) => values
                .iter()
                .map(String::as_str)
                .filter(|v| !v.is_empty())
                .collect(),
            FieldValue::One(value) if !value.is_empty() => vec![value.as_str()],
            FieldValue::One(_) | FieldValue::Absent => Vec::new(),
        }
    }

    /// True when encoding would leave the key absent.
    pub fn is_clear(&self) -> bool {
        self.encoded_values().is_empty()
    }

    /// Collapse to at most one value, keeping the first non-empty element.
    pub fn into_single(self) -> FieldValue {
        match self {
            FieldValue::Many(values) => values
                .into_iter()
                .find(|v| !v.is_empty())
                .map(FieldValue::One)
                .unwrap_or(FieldValue::Absent),
            other => other,
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map(FieldValue::One).unwrap_or(FieldValue::Absent)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Many(values)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::One(value.to_string())
    }
}

/// Whether a key has a selection, as seen by a decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Present(Vec<String>),
    Absent,
}

impl Selection {
    pub fn is_present(&self) -> bool {
        matches!(self, Selection::Present(_))
    }

    /// Values, or an empty slice when absent.
    pub fn values(&self) -> &[String] {
        match self {
            Selection::Present(values) => values,
            Selection::Absent => &[],
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values().iter().any(|v| v == value)
    }

    pub fn into_option(self) -> Option<Vec<String>> {
        match self {
            Selection::Present(values) => Some(values),
            Selection::Absent => None,
        }
    }
}

/// Result of a decode: key → every non-empty value, never an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecodedQuery {
    values: BTreeMap<String, Vec<String>>,
}

impl DecodedQuery {
    pub fn selection(&self, key: &str) -> Selection {
        match self.values.get(key) {
            Some(values) => Selection::Present(values.clone()),
            None => Selection::Absent,
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Insert unless `values` is empty.
    pub(crate) fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        if !values.is_empty() {
            self.values.insert(key.into(), values);
        }
    }
}

impl<'a> IntoIterator for &'a DecodedQuery {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Replace every entry under `key` with the encoding of `value`.
pub fn encode_field(prev: &QueryState, key: &str, value: &FieldValue) -> QueryState {
    update_params(prev, [(key, value)])
}

/// Replace several keys in one step. Each listed key loses all of its previous
/// entries before the new ones are appended; unlisted keys are untouched.
///
/// If the same key is listed twice, the last update wins.
pub fn update_params<'a, I>(prev: &QueryState, updates: I) -> QueryState
where
    I: IntoIterator<Item = (&'a str, &'a FieldValue)>,
{
    let mut merged: Vec<(&str, &FieldValue)> = Vec::new();
    for (key, value) in updates {
        merged.retain(|(k, _)| *k != key);
        merged.push((key, value));
    }

    let mut next = prev.clone();
    next.retain_keys(|k| !merged.iter().any(|(key, _)| *key == k));
    for (key, value) in merged {
        for v in value.encoded_values() {
            next.append(key, v);
        }
    }
    next
}

/// Every key in `query` with all of its non-empty values.
pub fn decode_multi_value(query: &QueryState) -> DecodedQuery {
    let mut decoded = DecodedQuery::default();
    for key in query.keys() {
        decoded.insert(key, non_empty_values(query, key));
    }
    decoded
}

/// Only the listed `keys`, each with all of its non-empty values. Keys with no
/// values are omitted.
pub fn decode_selected_keys<'a, I>(query: &QueryState, keys: I) -> DecodedQuery
where
    I: IntoIterator<Item = &'a str>,
{
    let mut decoded = DecodedQuery::default();
    for key in keys {
        decoded.insert(key, non_empty_values(query, key));
    }
    decoded
}

fn non_empty_values(query: &QueryState, key: &str) -> Vec<String> {
    query
        .get_all(key)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn encode_sequence_preserves_order() {
        let q = encode_field(
            &QueryState::new(),
            "status",
            &FieldValue::many(["Resolved", "Pending"]),
        );
        assert_eq!(q.to_query_string(), "status=Resolved&status=Pending");
    }

    #[test]
    fn encode_replaces_existing_entries() {
        let prev = QueryState::parse("status=Pending&token=abc&status=Rejected");
        let q = encode_field(&prev, "status", &FieldValue::many(["Resolved"]));
        assert_eq!(q.to_query_string(), "token=abc&status=Resolved");
    }

    #[test]
    fn encode_single_string() {
        let q = encode_field(&QueryState::new(), "priority", &FieldValue::one("high"));
        assert_eq!(q.to_query_string(), "priority=high");
    }

    #[test]
    fn encode_skips_empty_elements() {
        let q = encode_field(
            &QueryState::new(),
            "status",
            &FieldValue::many(["", "Pending", ""]),
        );
        assert_eq!(q.to_query_string(), "status=Pending");
    }

    #[test]
    fn round_trip_every_ticket_definition() {
        for def in Registry::tickets().definitions() {
            let values: Vec<String> = def.options.iter().map(|o| o.value.clone()).collect();
            for n in 1..=values.len() {
                let v = values[..n].to_vec();
                let q = encode_field(&QueryState::new(), &def.key, &FieldValue::Many(v.clone()));
                let decoded = decode_selected_keys(&q, [def.key.as_str()]);
                assert_eq!(decoded.selection(&def.key), Selection::Present(v));
            }
        }
    }

    #[test]
    fn encode_is_idempotent() {
        let states = [
            QueryState::new(),
            QueryState::parse("status=Pending&page=3"),
            QueryState::parse("status=&status=Rejected&x=1"),
        ];
        let values = [
            FieldValue::many(["Pending", "Resolved"]),
            FieldValue::one("Pending"),
            FieldValue::one(""),
            FieldValue::Many(Vec::new()),
            FieldValue::Absent,
        ];
        for s in &states {
            for v in &values {
                let once = encode_field(s, "status", v);
                let twice = encode_field(&once, "status", v);
                assert_eq!(once, twice, "state {s} value {v:?}");
            }
        }
    }

    #[test]
    fn clearing_removes_key() {
        let prev = QueryState::parse("status=Pending&page=2");
        for value in [FieldValue::Many(Vec::new()), FieldValue::one(""), FieldValue::Absent] {
            let q = encode_field(&prev, "status", &value);
            assert!(!q.contains_key("status"));
            let decoded = decode_selected_keys(&q, ["status"]);
            assert_eq!(decoded.selection("status"), Selection::Absent);
            assert_eq!(q.first("page"), Some("2"));
        }
    }

    #[test]
    fn duplicates_survive_round_trip() {
        let q = encode_field(
            &QueryState::new(),
            "status",
            &FieldValue::many(["Pending", "Pending", "Resolved"]),
        );
        let decoded = decode_multi_value(&q);
        assert_eq!(
            decoded.get("status"),
            Some(&strings(&["Pending", "Pending", "Resolved"])[..])
        );
    }

    #[test]
    fn decode_multi_value_wraps_single_values() {
        let q = QueryState::parse("status=Pending&page=1&status=Resolved&token=abc");
        let decoded = decode_multi_value(&q);
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded.get("page"), Some(&strings(&["1"])[..]));
        assert_eq!(decoded.get("token"), Some(&strings(&["abc"])[..]));
    }

    #[test]
    fn decode_omits_keys_with_only_empty_values() {
        let q = QueryState::parse("status=&page=2");
        let decoded = decode_multi_value(&q);
        assert!(!decoded.contains_key("status"));
        assert_eq!(decoded.selection("status"), Selection::Absent);
    }

    #[test]
    fn decode_selected_keys_ignores_other_keys() {
        let q = QueryState::parse("status=Pending&token=abc");
        let decoded = decode_selected_keys(&q, ["status", "category"]);
        assert_eq!(decoded.len(), 1);
        assert!(decoded.contains_key("status"));
        assert!(!decoded.contains_key("category"));
        assert!(!decoded.contains_key("token"));
    }

    #[test]
    fn update_params_replaces_all_listed_keys_at_once() {
        let prev = QueryState::parse("timeRange=date&date=2024-01-01&page=4&token=t");
        let range = FieldValue::one("today");
        let clear = FieldValue::Absent;
        let q = update_params(&prev, [("timeRange", &range), ("date", &clear), ("page", &clear)]);
        assert_eq!(q.to_query_string(), "token=t&timeRange=today");
    }

    #[test]
    fn update_params_last_update_for_key_wins() {
        let a = FieldValue::one("a");
        let b = FieldValue::one("b");
        let q = update_params(&QueryState::new(), [("k", &a), ("k", &b)]);
        assert_eq!(q.to_query_string(), "k=b");
    }

    #[test]
    fn into_single_keeps_first_non_empty() {
        assert_eq!(
            FieldValue::many(["", "high", "low"]).into_single(),
            FieldValue::one("high")
        );
        assert_eq!(FieldValue::Many(Vec::new()).into_single(), FieldValue::Absent);
        assert_eq!(FieldValue::one("x").into_single(), FieldValue::one("x"));
    }

    #[test]
    fn field_value_deserializes_untagged() {
        let many: FieldValue = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(many, FieldValue::many(["a", "b"]));
        let one: FieldValue = serde_json::from_str(r#""a""#).unwrap();
        assert_eq!(one, FieldValue::one("a"));
        let absent: FieldValue = serde_json::from_str("null").unwrap();
        assert_eq!(absent, FieldValue::Absent);
    }
}
