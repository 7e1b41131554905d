//! # diff: Four-way comparison of execution-config documents
//!
//! Both documents are flattened to dot-separated key paths, then every key in
//! the union of both documents is classified exactly once:
//!   - present in both with equal value → unchanged
//!   - present in both with differing value → overridden (both values kept)
//!   - present only in the customer document → customer-only
//!   - present only in the default document → default-only
//!
//! Arrays are opaque leaf values compared by exact equality, never
//! element-wise. Empty documents are valid inputs and classify everything to
//! one side.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

/// A key present in both documents with differing values.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OverriddenEntry {
    pub key: String,
    pub default: Value,
    pub customer: Value,
}

/// A key carrying a single value: one-sided, or unchanged on both sides.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DiffEntry {
    pub key: String,
    pub value: Value,
}

/// Result of comparing the default document against the customer document.
///
/// The four lists are disjoint, each sorted by key, and together cover every
/// flattened key path appearing in either document exactly once.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ConfigDiff {
    pub overridden: Vec<OverriddenEntry>,
    pub customer_only: Vec<DiffEntry>,
    pub default_only: Vec<DiffEntry>,
    pub unchanged: Vec<DiffEntry>,
}

impl ConfigDiff {
    /// Returns true when the documents agree on every key.
    pub fn is_clean(&self) -> bool {
        self.overridden.is_empty() && self.customer_only.is_empty() && self.default_only.is_empty()
    }
}

/// Returns true when the customer document carries any override data.
///
/// An absent (`null`) or empty-object document is the valid "no overrides"
/// state, not an error.
pub fn has_overrides(customer_doc: &Value) -> bool {
    match customer_doc {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// Flattens a JSON document to dot-separated key paths.
///
/// Objects recurse; scalars and arrays are leaves. A non-object document
/// flattens to nothing.
pub fn flatten(doc: &Value) -> BTreeMap<String, Value> {
    let mut flat = BTreeMap::new();
    if let Value::Object(map) = doc {
        for (key, value) in map {
            flatten_into(key.clone(), value, &mut flat);
        }
    }
    flat
}

fn flatten_into(path: String, value: &Value, out: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(format!("{path}.{key}"), child, out);
            }
        }
        _ => {
            out.insert(path, value.clone());
        }
    }
}

/// Compares the default document A against the customer document B.
pub fn diff_configs(default_doc: &Value, customer_doc: &Value) -> ConfigDiff {
    let flat_default = flatten(default_doc);
    let flat_customer = flatten(customer_doc);

    let mut keys: BTreeSet<&String> = flat_default.keys().collect();
    keys.extend(flat_customer.keys());

    let mut diff = ConfigDiff::default();
    for key in keys {
        match (flat_default.get(key), flat_customer.get(key)) {
            (Some(default), Some(customer)) if default == customer => {
                diff.unchanged.push(DiffEntry {
                    key: key.clone(),
                    value: default.clone(),
                });
            }
            (Some(default), Some(customer)) => {
                diff.overridden.push(OverriddenEntry {
                    key: key.clone(),
                    default: default.clone(),
                    customer: customer.clone(),
                });
            }
            (Some(default), None) => {
                diff.default_only.push(DiffEntry {
                    key: key.clone(),
                    value: default.clone(),
                });
            }
            (None, Some(customer)) => {
                diff.customer_only.push(DiffEntry {
                    key: key.clone(),
                    value: customer.clone(),
                });
            }
            (None, None) => {}
        }
    }
    diff
}
