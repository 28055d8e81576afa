//! Per-process vector clock storage.
//!
//! The store is the single owner of every simulated process's clock for
//! the duration of one generation run. Clocks change only through
//! [`VectorClockStore::tick`] and [`VectorClockStore::merge`]; callers get
//! cloned snapshots back, which is what ends up inside emitted events.
//!
//! # Design Principles
//!
//! - A process's own entry only ever grows, by exactly one per tick.
//! - A receive is a local event that also observes the sender: tick the
//!   destination first, then merge the sender's post-tick clock.
//! - Operations are total. Addressing a process outside the run is a
//!   programming error and is ignored with a warning rather than panicking.

use loggen_types::{ProcessId, VectorClock};
use tracing::warn;

/// One vector clock per simulated process, indexed by [`ProcessId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorClockStore {
    clocks: Vec<VectorClock>,
    names: Vec<String>,
}

impl VectorClockStore {
    /// Create empty clocks for `process_count` processes.
    pub fn new(process_count: usize) -> Self {
        Self {
            clocks: vec![VectorClock::new(); process_count],
            names: ProcessId::range(process_count).map(ProcessId::name).collect(),
        }
    }

    /// Number of processes tracked by this store.
    pub fn process_count(&self) -> usize {
        self.clocks.len()
    }

    /// Return the current clock of `pid`, if it belongs to this run.
    pub fn clock(&self, pid: ProcessId) -> Option<&VectorClock> {
        self.clocks.get(pid.index())
    }

    /// Record a local event at `pid` and return a snapshot of its clock.
    pub fn tick(&mut self, pid: ProcessId) -> VectorClock {
        let (Some(clock), Some(name)) = (
            self.clocks.get_mut(pid.index()),
            self.names.get(pid.index()),
        ) else {
            warn!(process = %pid, "tick addressed to unknown process");
            return VectorClock::new();
        };
        clock.tick(name);
        clock.clone()
    }

    /// Fold `src_clock` into the clock of `dst` and return a snapshot of
    /// the result.
    ///
    /// The destination clock becomes the element-wise maximum of itself
    /// and `src_clock`. It is not ticked here; see
    /// [`VectorClockStore::receive`] for the full receive step.
    pub fn merge(&mut self, dst: ProcessId, src_clock: &VectorClock) -> VectorClock {
        let Some(clock) = self.clocks.get_mut(dst.index()) else {
            warn!(process = %dst, "merge addressed to unknown process");
            return VectorClock::new();
        };
        clock.merge(src_clock);
        clock.clone()
    }

    /// Receive a message at `dst` carrying `send_clock`.
    ///
    /// Ticks `dst` and then merges `send_clock` into it.
    pub fn receive(&mut self, dst: ProcessId, send_clock: &VectorClock) -> VectorClock {
        self.tick(dst);
        self.merge(dst, send_clock)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_store_has_empty_clocks() {
        let store = VectorClockStore::new(3);
        assert_eq!(store.process_count(), 3);
        for pid in ProcessId::range(3) {
            assert!(store.clock(pid).unwrap().is_empty());
        }
        assert!(store.clock(ProcessId(3)).is_none());
    }

    #[test]
    fn tick_only_touches_own_clock() {
        let mut store = VectorClockStore::new(2);
        let snapshot = store.tick(ProcessId(0));
        assert_eq!(snapshot.get("Proc0"), 1);
        assert!(store.clock(ProcessId(1)).unwrap().is_empty());

        let snapshot = store.tick(ProcessId(0));
        assert_eq!(snapshot.get("Proc0"), 2);
    }

    #[test]
    fn snapshot_is_detached_from_store() {
        let mut store = VectorClockStore::new(1);
        let first = store.tick(ProcessId(0));
        store.tick(ProcessId(0));
        assert_eq!(first.get("Proc0"), 1);
        assert_eq!(store.clock(ProcessId(0)).unwrap().get("Proc0"), 2);
    }

    #[test]
    fn receive_ticks_then_merges() {
        let mut store = VectorClockStore::new(3);
        store.tick(ProcessId(0));
        store.tick(ProcessId(0));
        store.tick(ProcessId(1));
        store.tick(ProcessId(2));

        let send = store.tick(ProcessId(0));
        let before = store.clock(ProcessId(1)).unwrap().clone();
        let recv = store.receive(ProcessId(1), &send);

        // Own entry advanced by exactly one tick.
        assert_eq!(recv.get("Proc1"), before.get("Proc1") + 1);
        // Sender history absorbed.
        assert_eq!(recv.get("Proc0"), 3);
        // Untouched by the sender.
        assert_eq!(recv.get("Proc2"), 0);
        assert!(recv.dominates(&send));
        assert!(recv.dominates(&before));
    }

    #[test]
    fn merge_does_not_tick() {
        let mut store = VectorClockStore::new(2);
        let src = store.tick(ProcessId(0));
        let merged = store.merge(ProcessId(1), &src);
        assert_eq!(merged.get("Proc1"), 0);
        assert_eq!(merged.get("Proc0"), 1);
    }

    #[test]
    fn unknown_process_is_ignored() {
        let mut store = VectorClockStore::new(1);
        assert!(store.tick(ProcessId(5)).is_empty());
        assert!(store.merge(ProcessId(5), &VectorClock::new()).is_empty());
        assert!(store.clock(ProcessId(0)).unwrap().is_empty());
    }
}
