//! Per-process event counts and the fairness cap.
//!
//! The tracker keeps any single process from dominating the output. A
//! process is eligible to act while its count is at most the cap,
//! `floor(total_events / process_count)`. The cap is advisory: the
//! chooser falls back to the least-loaded processes when nobody is
//! eligible, so a run may overshoot it slightly but never stalls.
//!
//! Initialization events are not counted.

use loggen_types::ProcessId;

/// Event tallies for every process in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCountTracker {
    counts: Vec<usize>,
    cap: usize,
}

impl EventCountTracker {
    /// Create a tracker for `process_count` processes sharing a target of
    /// `total_events`.
    pub fn new(process_count: usize, total_events: usize) -> Self {
        Self {
            counts: vec![0; process_count],
            cap: total_events.checked_div(process_count).unwrap_or(0),
        }
    }

    /// The per-process cap.
    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// Number of processes tracked.
    pub fn process_count(&self) -> usize {
        self.counts.len()
    }

    /// Events attributed to `pid` so far.
    pub fn count(&self, pid: ProcessId) -> usize {
        self.counts.get(pid.index()).copied().unwrap_or(0)
    }

    /// Attribute one more event to `pid`.
    pub fn increment(&mut self, pid: ProcessId) {
        if let Some(count) = self.counts.get_mut(pid.index()) {
            *count = count.saturating_add(1);
        }
    }

    /// Whether `pid` is still under the cap.
    pub fn is_eligible(&self, pid: ProcessId) -> bool {
        pid.index() < self.counts.len() && self.count(pid) <= self.cap
    }

    /// Processes under the cap, in id order.
    pub fn eligible(&self) -> Vec<ProcessId> {
        ProcessId::range(self.counts.len())
            .filter(|&pid| self.is_eligible(pid))
            .collect()
    }

    /// Processes whose count equals the minimum count, in id order.
    pub fn least_loaded(&self) -> Vec<ProcessId> {
        let Some(&min) = self.counts.iter().min() else {
            return Vec::new();
        };
        ProcessId::range(self.counts.len())
            .filter(|&pid| self.count(pid) == min)
            .collect()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.iter().fold(0_usize, |acc, &c| acc.saturating_add(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_is_floor_of_share() {
        assert_eq!(EventCountTracker::new(3, 10).cap(), 3);
        assert_eq!(EventCountTracker::new(4, 4).cap(), 1);
        assert_eq!(EventCountTracker::new(8, 3).cap(), 0);
    }

    #[test]
    fn zero_processes_has_zero_cap() {
        let tracker = EventCountTracker::new(0, 10);
        assert_eq!(tracker.cap(), 0);
        assert!(tracker.eligible().is_empty());
        assert!(tracker.least_loaded().is_empty());
    }

    #[test]
    fn eligibility_includes_the_cap_itself() {
        let mut tracker = EventCountTracker::new(2, 4);
        assert_eq!(tracker.cap(), 2);
        tracker.increment(ProcessId(0));
        tracker.increment(ProcessId(0));
        assert!(tracker.is_eligible(ProcessId(0)));
        tracker.increment(ProcessId(0));
        assert!(!tracker.is_eligible(ProcessId(0)));
        assert_eq!(tracker.eligible(), vec![ProcessId(1)]);
    }

    #[test]
    fn least_loaded_reports_minimum_ties() {
        let mut tracker = EventCountTracker::new(3, 30);
        tracker.increment(ProcessId(1));
        assert_eq!(tracker.least_loaded(), vec![ProcessId(0), ProcessId(2)]);
        assert_eq!(tracker.total(), 1);
    }

    #[test]
    fn unknown_process_is_never_eligible() {
        let mut tracker = EventCountTracker::new(2, 10);
        tracker.increment(ProcessId(7));
        assert_eq!(tracker.count(ProcessId(7)), 0);
        assert!(!tracker.is_eligible(ProcessId(7)));
        assert_eq!(tracker.total(), 0);
    }
}
