//! Process identifiers.
//!
//! Simulated processes are numbered densely from `0` to `N - 1` for a run
//! with `N` processes. The numeric id doubles as an index into the
//! per-process tables owned by the generator, and maps deterministically
//! to the host name that appears in the emitted log (`Proc{id}`).

use serde::{Deserialize, Serialize};

/// Prefix used when rendering a [`ProcessId`] as a host name.
pub const PROCESS_NAME_PREFIX: &str = "Proc";

/// Identifier for one simulated process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub usize);

impl ProcessId {
    /// Create an identifier from its numeric index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the numeric index of this process.
    pub const fn index(self) -> usize {
        self.0
    }

    /// Return the display name of this process, e.g. `Proc3`.
    ///
    /// The name is also the key under which the process appears in every
    /// vector clock.
    pub fn name(self) -> String {
        format!("{PROCESS_NAME_PREFIX}{}", self.0)
    }

    /// Iterate over the ids of a run with `count` processes, in order.
    pub fn range(count: usize) -> impl Iterator<Item = Self> {
        (0..count).map(ProcessId)
    }
}

impl core::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{PROCESS_NAME_PREFIX}{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_uses_proc_prefix() {
        assert_eq!(ProcessId::new(0).name(), "Proc0");
        assert_eq!(ProcessId::new(17).name(), "Proc17");
        assert_eq!(ProcessId::new(4).to_string(), "Proc4");
    }

    #[test]
    fn range_is_dense_and_ordered() {
        let ids: Vec<ProcessId> = ProcessId::range(3).collect();
        assert_eq!(ids, vec![ProcessId(0), ProcessId(1), ProcessId(2)]);
        assert_eq!(ProcessId::range(0).count(), 0);
    }
}
