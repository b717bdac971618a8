//! Condition attribute scan.
//!
//! An island declares its readiness conditions as attributes named
//! `<prefix><condition>` (default prefix `client:`), each with an
//! optional string argument. The scan derives the ephemeral
//! ConditionMap consumed once at hydration time.

use rustc_hash::FxHashMap;

use crate::dom::Element;

/// condition-name → argument-string, unique keys, order irrelevant.
pub type ConditionMap = FxHashMap<String, String>;

/// Scan an element's attributes for declared conditions.
///
/// The first occurrence of a name wins; a bare attribute maps to the
/// empty argument.
pub fn scan_conditions(element: &Element, prefix: &str) -> ConditionMap {
    let mut map = ConditionMap::default();
    for (name, value) in &element.attrs {
        let Some(condition) = name.strip_prefix(prefix) else {
            continue;
        };
        if condition.is_empty() {
            continue;
        }
        map.entry(condition.to_string())
            .or_insert_with(|| value.clone());
    }
    map
}

// ============================================================================
// Tests
// ============================================================================
