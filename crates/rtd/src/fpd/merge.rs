//! Add-only deep merge of provider fragments into a base payload.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Fragment, Payload, ProviderName};

/// A provider leaf that was dropped because the path was already taken.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConflict {
    /// Provider whose value was dropped
    pub provider: ProviderName,

    /// JSON Pointer to the contested path (e.g., "/site/cat")
    pub path: String,
}

/// Merged payload plus the leaves that lost.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergeOutcome {
    pub payload: Payload,
    pub conflicts: Vec<MergeConflict>,
}

/// Merge fragments into a copy of `base`.
///
/// Fragments are applied in the order given, which callers must make the
/// registry's registration order. Only fragments with an `ok` status
/// contribute.
///
/// Precedence at every leaf path: base first, then earlier fragments.
/// Objects merge recursively; any other value (arrays included) is a leaf
/// and is never replaced. `null` in a fragment means "no value", and an
/// object holding no leaves once nulls are removed adds nothing.
pub fn merge(base: &Payload, fragments: &[Fragment]) -> MergeOutcome {
    let mut payload = base.clone();
    let mut conflicts = Vec::new();

    for fragment in fragments.iter().filter(|f| f.status.is_ok()) {
        conflicts.extend(merge_fragment(&mut payload, &fragment.provider, &fragment.data));
    }

    MergeOutcome { payload, conflicts }
}

/// Merge one provider's data into `target`, add-only.
///
/// Returns the leaves that could not be added.
pub fn merge_fragment(target: &mut Payload, provider: &str, data: &Payload) -> Vec<MergeConflict> {
    let mut conflicts = Vec::new();
    merge_object(target, data, provider, "", &mut conflicts);

    for conflict in &conflicts {
        debug!(
            "Dropped '{}' from provider '{}': path already set",
            conflict.path, provider
        );
    }
    conflicts
}

fn merge_object(
    target: &mut Payload,
    source: &Payload,
    provider: &str,
    prefix: &str,
    conflicts: &mut Vec<MergeConflict>,
) {
    for (key, value) in source {
        // Nulls and objects with no leaves carry nothing to add.
        let value = match without_nulls(value) {
            Some(value) => value,
            None => continue,
        };
        let path = pointer_push(prefix, key);

        match target.get_mut(key) {
            None => {
                target.insert(key.clone(), value);
            }
            Some(Value::Object(existing)) => match &value {
                Value::Object(incoming) => {
                    merge_object(existing, incoming, provider, &path, conflicts)
                }
                _ => conflicts.push(MergeConflict {
                    provider: provider.to_string(),
                    path,
                }),
            },
            Some(existing) => {
                // Writing the value that is already there is not a conflict.
                if *existing != value {
                    conflicts.push(MergeConflict {
                        provider: provider.to_string(),
                        path,
                    });
                }
            }
        }
    }
}

/// Copy a value without its `null` members, at any depth.
///
/// Returns `None` for `null` and for objects left without a single leaf.
fn without_nulls(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) => {
            let pruned: Payload = map
                .iter()
                .filter_map(|(k, v)| without_nulls(v).map(|v| (k.clone(), v)))
                .collect();
            if pruned.is_empty() {
                None
            } else {
                Some(Value::Object(pruned))
            }
        }
        other => Some(other.clone()),
    }
}

/// Every leaf in a payload as (JSON Pointer, value), in key order.
///
/// Empty objects are namespaces with nothing in them, not leaves.
pub fn leaf_paths(payload: &Payload) -> Vec<(String, &Value)> {
    let mut leaves = Vec::new();
    collect_leaves(payload, "", &mut leaves);
    leaves
}

fn collect_leaves<'a>(map: &'a Payload, prefix: &str, leaves: &mut Vec<(String, &'a Value)>) {
    for (key, value) in map {
        let path = pointer_push(prefix, key);
        match value {
            Value::Object(inner) => collect_leaves(inner, &path, leaves),
            _ => leaves.push((path, value)),
        }
    }
}

/// Append one reference token, escaped per RFC 6901.
fn pointer_push(prefix: &str, key: &str) -> String {
    format!("{}/{}", prefix, key.replace('~', "~0").replace('/', "~1"))
}
