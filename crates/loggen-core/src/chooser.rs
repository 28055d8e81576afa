//! Selection of the process(es) that act next.
//!
//! Selection samples uniformly from the set of processes that are under
//! the fairness cap. When that set is empty the chooser falls back to the
//! least-loaded processes, so every call terminates after a single draw.
//!
//! The chooser never mutates the tracker; the sequencer applies count
//! updates once an event has actually been emitted.

use loggen_types::ProcessId;
use rand::Rng;
use tracing::debug;

use crate::tracker::EventCountTracker;

/// Errors that can occur when choosing participants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChooserError {
    /// A network exchange needs two distinct processes.
    #[error("a network exchange needs at least 2 processes, the run has {process_count}")]
    NotEnoughProcesses {
        /// Number of processes in the run.
        process_count: usize,
    },

    /// The run has no processes to act.
    #[error("the run has no processes")]
    NoProcesses,
}

/// Picks participants for local events and network exchanges.
#[derive(Debug, Clone, Copy)]
pub struct EventChooser<'t> {
    tracker: &'t EventCountTracker,
}

impl<'t> EventChooser<'t> {
    /// Create a chooser that reads eligibility from `tracker`.
    pub const fn new(tracker: &'t EventCountTracker) -> Self {
        Self { tracker }
    }

    /// Choose the process for a local event.
    ///
    /// # Errors
    ///
    /// Returns [`ChooserError::NoProcesses`] if the run has no processes
    /// at all.
    pub fn choose_local<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ProcessId, ChooserError> {
        pick(rng, &self.candidates()).ok_or(ChooserError::NoProcesses)
    }

    /// Choose an ordered `(source, destination)` pair for a network
    /// exchange. The two are always distinct.
    ///
    /// # Errors
    ///
    /// Returns [`ChooserError::NotEnoughProcesses`] if the run has fewer
    /// than two processes.
    pub fn choose_network<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(ProcessId, ProcessId), ChooserError> {
        let process_count = self.tracker.process_count();
        let not_enough = ChooserError::NotEnoughProcesses { process_count };
        if process_count < 2 {
            return Err(not_enough);
        }

        let src = pick(rng, &self.candidates()).ok_or_else(|| not_enough.clone())?;

        let mut destinations: Vec<ProcessId> = self
            .tracker
            .eligible()
            .into_iter()
            .filter(|&pid| pid != src)
            .collect();
        if destinations.is_empty() {
            destinations = self.least_loaded_except(src);
            debug!(
                source = %src,
                cap = self.tracker.cap(),
                fallback = destinations.len(),
                "no eligible destination under cap, using least-loaded"
            );
        }
        let dst = pick(rng, &destinations).ok_or(not_enough)?;
        Ok((src, dst))
    }

    /// Eligible processes, or the least-loaded ones if none are eligible.
    fn candidates(&self) -> Vec<ProcessId> {
        let eligible = self.tracker.eligible();
        if !eligible.is_empty() {
            return eligible;
        }
        let fallback = self.tracker.least_loaded();
        debug!(
            cap = self.tracker.cap(),
            fallback = fallback.len(),
            "every process is over the cap, using least-loaded"
        );
        fallback
    }

    fn least_loaded_except(&self, excluded: ProcessId) -> Vec<ProcessId> {
        let others = || {
            ProcessId::range(self.tracker.process_count()).filter(move |&pid| pid != excluded)
        };
        let Some(min) = others().map(|pid| self.tracker.count(pid)).min() else {
            return Vec::new();
        };
        others()
            .filter(|&pid| self.tracker.count(pid) == min)
            .collect()
    }
}

/// Draw one element uniformly from `candidates`.
fn pick<R: Rng + ?Sized>(rng: &mut R, candidates: &[ProcessId]) -> Option<ProcessId> {
    if candidates.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..candidates.len());
    candidates.get(idx).copied()
}
