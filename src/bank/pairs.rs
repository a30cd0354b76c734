//! Key/value template name pairing.
//!
//! A name is usable only when both a key template and a value template carry
//! it. Pairing intersects the two name sets, so directory listing order does
//! not matter. Missing counterparts are reported and pairing continues.

use crate::trace::trace_warn;
use std::collections::BTreeSet;

/// Outcome of pairing key and value template names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplatePairing {
    /// Names present in both sets, in key listing order.
    pub matched: Vec<String>,
    /// Key names without a value template.
    pub missing_values: Vec<String>,
    /// Value names without a key template.
    pub missing_keys: Vec<String>,
}

impl TemplatePairing {
    /// Returns true when every name has both counterparts.
    pub fn is_complete(&self) -> bool {
        self.missing_values.is_empty() && self.missing_keys.is_empty()
    }
}

/// Pairs key and value template names by identity.
///
/// Duplicate names within one list are collapsed to their first occurrence.
pub fn pair_templates<K, V>(key_names: &[K], value_names: &[V]) -> TemplatePairing
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let keys: BTreeSet<&str> = key_names.iter().map(AsRef::as_ref).collect();
    let values: BTreeSet<&str> = value_names.iter().map(AsRef::as_ref).collect();

    let mut pairing = TemplatePairing::default();
    let mut seen = BTreeSet::new();
    for name in key_names.iter().map(AsRef::as_ref) {
        if !seen.insert(name) {
            continue;
        }
        if values.contains(name) {
            pairing.matched.push(name.to_string());
        } else {
            trace_warn!("incomplete_template_pairing", missing = "value", template = name);
            pairing.missing_values.push(name.to_string());
        }
    }

    seen.clear();
    for name in value_names.iter().map(AsRef::as_ref) {
        if !seen.insert(name) {
            continue;
        }
        if !keys.contains(name) {
            trace_warn!("incomplete_template_pairing", missing = "key", template = name);
            pairing.missing_keys.push(name.to_string());
        }
    }

    pairing
}
