//! Finding the judgment inside a raw verdict payload.
//!
//! The producer is inconsistent about where it puts the judgment, so the
//! search is an ordered rule list with a fixed depth bound:
//!
//! ```text
//! rule 1  candidate has non-empty `scores` and a `rationale`  -> accept
//! rule 2  candidate has an object under `winner` / `verdict`  -> rules 1 + 3 on it
//! rule 3  some direct child object satisfies rule 1            -> accept first
//!         (children visited in lexicographic key order)
//! ```

use serde_json::{Map, Value};

/// Keys under which the producer may wrap the judgment one level deep.
pub const WINNER_KEYS: [&str; 2] = ["winner", "verdict"];

/// Rule 2 may be applied this many times along one search path.
const MAX_WRAPPER_DEPTH: usize = 1;

/// Locate the judgment object, or `None` if no rule matches.
pub fn locate(payload: &Value) -> Option<&Map<String, Value>> {
    locate_at(payload, 0)
}

fn locate_at(candidate: &Value, depth: usize) -> Option<&Map<String, Value>> {
    let object = candidate.as_object()?;

    if is_judgment(object) {
        return Some(object);
    }

    if depth < MAX_WRAPPER_DEPTH {
        let wrapped = WINNER_KEYS
            .iter()
            .filter_map(|key| object.get(*key))
            .filter(|nested| nested.is_object())
            .find_map(|nested| locate_at(nested, depth + 1));
        if wrapped.is_some() {
            return wrapped;
        }
    }

    // serde_json::Map iterates in key order without `preserve_order`.
    object
        .values()
        .filter_map(Value::as_object)
        .find(|child| is_judgment(child))
}

/// Rule 1: a per-side score mapping with at least one entry plus a rationale.
pub fn is_judgment(object: &Map<String, Value>) -> bool {
    let has_scores = object
        .get("scores")
        .and_then(Value::as_object)
        .is_some_and(|scores| !scores.is_empty());
    let has_rationale = object
        .get("rationale")
        .and_then(Value::as_str)
        .is_some_and(|text| !text.is_empty());
    has_scores && has_rationale
}
