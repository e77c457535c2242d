//! Per-resource cost amounts with deterministic iteration order.

use crate::amount::{Amount, accumulate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A mapping from resource name to amount. Backed by a `BTreeMap` so
/// iteration is always sorted by name, which keeps serialized forms and
/// aggregated outputs deterministic.
///
/// A resource that is absent reads as zero; adding bundles takes the union
/// of their key sets. Heterogeneous master rows therefore sum cleanly --
/// a step that never mentions `bp` simply contributes 0 of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBundle(BTreeMap<String, Amount>);

impl CostBundle {
    /// The zero bundle (no resources).
    pub fn zero() -> Self {
        Self(BTreeMap::new())
    }

    /// Amount for `resource`, or 0 if absent.
    pub fn get(&self, resource: &str) -> Amount {
        self.0.get(resource).copied().unwrap_or(0)
    }

    /// Set the amount for `resource`.
    pub fn set(&mut self, resource: impl Into<String>, amount: Amount) {
        self.0.insert(resource.into(), amount);
    }

    /// Add `amount` of `resource` to this bundle.
    pub fn add(&mut self, resource: &str, amount: Amount) {
        let slot = self.0.entry(resource.to_string()).or_insert(0);
        *slot = accumulate(*slot, amount);
    }

    /// Field-wise add another bundle into this one (union of key sets).
    pub fn add_bundle(&mut self, other: &CostBundle) {
        for (resource, amount) in &other.0 {
            self.add(resource, *amount);
        }
    }

    /// Consuming merge, for fold/reduce-style accumulation.
    pub fn merged(mut self, other: CostBundle) -> CostBundle {
        self.add_bundle(&other);
        self
    }

    /// Whether every amount is zero (an empty bundle counts).
    pub fn is_zero(&self) -> bool {
        self.0.values().all(|&a| a == 0)
    }

    /// Resource names present in this bundle, sorted.
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate `(resource, amount)` pairs, sorted by resource.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Amount)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Amount)> for CostBundle {
    fn from_iter<I: IntoIterator<Item = (String, Amount)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, Amount)> for CostBundle {
    fn from_iter<I: IntoIterator<Item = (&'a str, Amount)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_resource_reads_zero() {
        let bundle = CostBundle::zero();
        assert_eq!(bundle.get("silk"), 0);
    }

    #[test]
    fn add_accumulates() {
        let mut bundle = CostBundle::zero();
        bundle.add("silk", 100);
        bundle.add("silk", 50);
        assert_eq!(bundle.get("silk"), 150);
    }

    #[test]
    fn add_bundle_unions_keys() {
        let a: CostBundle = [("silk", 10u64), ("thread", 5)].into_iter().collect();
        let b: CostBundle = [("silk", 1u64), ("bp", 2)].into_iter().collect();
        let merged = a.merged(b);
        assert_eq!(merged.get("silk"), 11);
        assert_eq!(merged.get("thread"), 5);
        assert_eq!(merged.get("bp"), 2);
    }

    #[test]
    fn merge_is_order_independent() {
        let a: CostBundle = [("silk", 10u64), ("thread", 5)].into_iter().collect();
        let b: CostBundle = [("silk", 1u64), ("bp", 2)].into_iter().collect();
        assert_eq!(a.clone().merged(b.clone()), b.merged(a));
    }

    #[test]
    fn is_zero_on_empty_and_explicit_zeros() {
        assert!(CostBundle::zero().is_zero());
        let explicit: CostBundle = [("silk", 0u64)].into_iter().collect();
        assert!(explicit.is_zero());
        let nonzero: CostBundle = [("silk", 1u64)].into_iter().collect();
        assert!(!nonzero.is_zero());
    }

    #[test]
    fn iteration_is_sorted() {
        let bundle: CostBundle = [("thread", 1u64), ("bp", 2), ("silk", 3)]
            .into_iter()
            .collect();
        let names: Vec<&str> = bundle.resources().collect();
        assert_eq!(names, vec!["bp", "silk", "thread"]);
    }

    #[test]
    fn serde_round_trip() {
        let bundle: CostBundle = [("silk", 1500u64), ("thread", 15)].into_iter().collect();
        let json = serde_json::to_string(&bundle).unwrap();
        let restored: CostBundle = serde_json::from_str(&json).unwrap();
        assert_eq!(bundle, restored);
    }
}
