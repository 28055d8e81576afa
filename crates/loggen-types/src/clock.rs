//! Vector clocks.
//!
//! A [`VectorClock`] maps process names to event counters. Clocks are
//! sparse: an entry exists only once the named process has ticked or its
//! history has been merged in, and an absent entry reads as zero.
//!
//! Entries are kept in a [`BTreeMap`] so that iteration and rendering are
//! ordered by process name (lexicographically, so `Proc10` sorts before
//! `Proc2`). The rendered form is a compact JSON object such as
//! `{"Proc0":2, "Proc1":1}`, which is what log visualizers expect to find
//! after the host name on each event line.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::CausalOrder;

/// Errors that can occur when parsing a rendered clock.
#[derive(Debug, thiserror::Error)]
pub enum ClockParseError {
    /// The text is not a JSON object of non-negative integers.
    #[error("malformed vector clock `{text}`: {source}")]
    Malformed {
        /// The rejected text.
        text: String,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

/// A vector clock keyed by process name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorClock {
    entries: BTreeMap<String, u64>,
}

impl VectorClock {
    /// Create an empty clock. Every process reads as zero.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Return the counter for `process`, or zero if it has no entry.
    pub fn get(&self, process: &str) -> u64 {
        self.entries.get(process).copied().unwrap_or(0)
    }

    /// Increment the counter for `process` and return its new value.
    ///
    /// Counters saturate at `u64::MAX`.
    pub fn tick(&mut self, process: &str) -> u64 {
        let counter = self.entries.entry(process.to_owned()).or_insert(0);
        *counter = counter.saturating_add(1);
        *counter
    }

    /// Absorb `other` by taking the element-wise maximum.
    ///
    /// Every name present in either clock is present afterwards.
    pub fn merge(&mut self, other: &Self) {
        for (process, &theirs) in &other.entries {
            let ours = self.entries.entry(process.clone()).or_insert(0);
            *ours = (*ours).max(theirs);
        }
    }

    /// Compare two clocks under the happened-before relation.
    pub fn compare(&self, other: &Self) -> CausalOrder {
        let mut less = false;
        let mut greater = false;
        for process in self.entries.keys().chain(other.entries.keys()) {
            match self.get(process).cmp(&other.get(process)) {
                Ordering::Less => less = true,
                Ordering::Greater => greater = true,
                Ordering::Equal => {}
            }
            if less && greater {
                return CausalOrder::Concurrent;
            }
        }
        match (less, greater) {
            (false, false) => CausalOrder::Equal,
            (true, false) => CausalOrder::Before,
            (false, true) => CausalOrder::After,
            (true, true) => CausalOrder::Concurrent,
        }
    }

    /// Whether every entry of `other` is `<=` the matching entry here.
    pub fn dominates(&self, other: &Self) -> bool {
        matches!(
            self.compare(other),
            CausalOrder::After | CausalOrder::Equal
        )
    }

    /// Iterate over `(process name, counter)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(name, &count)| (name.as_str(), count))
    }

    /// Number of processes with an explicit entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no process has an explicit entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a clock from its compact textual form.
    ///
    /// # Errors
    ///
    /// Returns [`ClockParseError::Malformed`] if `text` is not a JSON object
    /// mapping names to non-negative integers.
    pub fn parse(text: &str) -> Result<Self, ClockParseError> {
        serde_json::from_str(text).map_err(|source| ClockParseError::Malformed {
            text: text.to_owned(),
            source,
        })
    }
}

impl core::fmt::Display for VectorClock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("{")?;
        for (position, (process, count)) in self.entries.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            write!(f, "\"{process}\":{count}")?;
        }
        f.write_str("}")
    }
}

impl FromIterator<(String, u64)> for VectorClock {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn clock(entries: &[(&str, u64)]) -> VectorClock {
        entries
            .iter()
            .map(|&(name, count)| (name.to_owned(), count))
            .collect()
    }

    #[test]
    fn absent_entries_read_as_zero() {
        let vc = VectorClock::new();
        assert_eq!(vc.get("Proc0"), 0);
        assert!(vc.is_empty());
    }

    #[test]
    fn tick_increments_own_entry() {
        let mut vc = VectorClock::new();
        assert_eq!(vc.tick("Proc0"), 1);
        assert_eq!(vc.tick("Proc0"), 2);
        assert_eq!(vc.get("Proc0"), 2);
        assert_eq!(vc.get("Proc1"), 0);
    }

    #[test]
    fn merge_takes_elementwise_max() {
        let mut ours = clock(&[("Proc0", 3), ("Proc1", 1)]);
        let theirs = clock(&[("Proc1", 4), ("Proc2", 2)]);
        ours.merge(&theirs);
        assert_eq!(ours, clock(&[("Proc0", 3), ("Proc1", 4), ("Proc2", 2)]));
    }

    #[test]
    fn compare_detects_all_orders() {
        let a = clock(&[("Proc0", 1)]);
        let b = clock(&[("Proc0", 1), ("Proc1", 1)]);
        let c = clock(&[("Proc1", 2)]);
        assert_eq!(a.compare(&b), CausalOrder::Before);
        assert_eq!(b.compare(&a), CausalOrder::After);
        assert_eq!(a.compare(&a.clone()), CausalOrder::Equal);
        assert_eq!(a.compare(&c), CausalOrder::Concurrent);
        assert!(b.dominates(&a));
        assert!(!a.dominates(&c));
    }

    #[test]
    fn explicit_zero_equals_absent_entry() {
        let a = clock(&[("Proc0", 1), ("Proc1", 0)]);
        let b = clock(&[("Proc0", 1)]);
        assert_eq!(a.compare(&b), CausalOrder::Equal);
    }

    #[test]
    fn renders_sorted_compact_map() {
        let vc = clock(&[("Proc2", 1), ("Proc10", 4), ("Proc0", 7)]);
        assert_eq!(vc.to_string(), r#"{"Proc0":7, "Proc10":4, "Proc2":1}"#);
        assert_eq!(VectorClock::new().to_string(), "{}");
    }

    #[test]
    fn parses_rendered_form() {
        let vc = VectorClock::parse(r#"{"Proc0":7, "Proc1":4}"#).unwrap();
        assert_eq!(vc.get("Proc0"), 7);
        assert_eq!(vc.get("Proc1"), 4);
    }

    #[test]
    fn rejects_negative_counters() {
        assert!(VectorClock::parse(r#"{"Proc0":-1}"#).is_err());
        assert!(VectorClock::parse("Proc0:1").is_err());
    }

    fn arb_clock() -> impl Strategy<Value = VectorClock> {
        prop::collection::btree_map("Proc[0-5]", 0_u64..50, 0..4)
            .prop_map(|entries| entries.into_iter().collect())
    }

    proptest! {
        #[test]
        fn merge_result_dominates_both_inputs(a in arb_clock(), b in arb_clock()) {
            let mut merged = a.clone();
            merged.merge(&b);
            prop_assert!(merged.dominates(&a));
            prop_assert!(merged.dominates(&b));
            for (name, count) in merged.iter() {
                prop_assert_eq!(count, a.get(name).max(b.get(name)));
            }
        }

        #[test]
        fn tick_strictly_advances_only_own_entry(a in arb_clock(), owner in "Proc[0-5]") {
            let mut ticked = a.clone();
            let before = a.get(&owner);
            let after = ticked.tick(&owner);
            prop_assert_eq!(after, before + 1);
            prop_assert_eq!(ticked.compare(&a), CausalOrder::After);
            for (name, count) in a.iter() {
                if name != owner {
                    prop_assert_eq!(ticked.get(name), count);
                }
            }
        }

        #[test]
        fn compare_is_antisymmetric(a in arb_clock(), b in arb_clock()) {
            let forward = a.compare(&b);
            let backward = b.compare(&a);
            let expected = match forward {
                CausalOrder::Before => CausalOrder::After,
                CausalOrder::After => CausalOrder::Before,
                other => other,
            };
            prop_assert_eq!(backward, expected);
        }
    }
}
