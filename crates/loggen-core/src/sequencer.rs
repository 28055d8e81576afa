//! The event sequencing state machine.
//!
//! A run emits one initialization event per process, then keeps emitting
//! local events and network exchanges until the total reaches the target.
//! Which kind comes next depends on two quotas derived from the ratio:
//!
//! ```text
//! target_log = floor((1 - ratio) * total_events)
//! target_net = total_events - target_log
//! ```
//!
//! | State       | Log quota | Net quota | Next step                    |
//! |-------------|-----------|-----------|------------------------------|
//! | `Init`      | -         | -         | one init event per process   |
//! | `Balancing` | unmet     | unmet     | fair coin: exchange or local |
//! | `LogOnly`   | unmet     | met       | local event                  |
//! | `NetOnly`   | met       | unmet     | network exchange             |
//! | `Done`      | -         | -         | stop                         |
//!
//! The run stops once the total emitted is at least the target. An
//! exchange always emits two events, so the final total may exceed the
//! target by one.

use loggen_types::{Event, EventKind, ProcessId};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::chooser::{ChooserError, EventChooser};
use crate::clock::VectorClockStore;
use crate::config::RunParams;
use crate::tracker::EventCountTracker;

/// Errors that can occur while sequencing events.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequencerError {
    /// Both quotas are met but the total is still below target.
    #[error(
        "sequencer invariant violated: log {log_events}/{target_log} and \
         net {net_events}/{target_net} met with only {total_events}/{target_total} events"
    )]
    InvariantViolation {
        /// Local events emitted so far (excluding initialization).
        log_events: usize,
        /// Network events emitted so far.
        net_events: usize,
        /// All events emitted so far.
        total_events: usize,
        /// Local event quota.
        target_log: usize,
        /// Network event quota.
        target_net: usize,
        /// Target total.
        target_total: usize,
    },

    /// No valid participants could be chosen.
    #[error("chooser error: {source}")]
    Chooser {
        /// The underlying chooser error.
        #[from]
        source: ChooserError,
    },
}

/// The phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequencerState {
    /// No events emitted yet.
    Init,
    /// Both quotas unmet.
    Balancing,
    /// Only the local quota is unmet.
    LogOnly,
    /// Only the network quota is unmet.
    NetOnly,
    /// The target total has been reached.
    Done,
}

/// Counters describing a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Number of simulated processes.
    pub process_count: usize,
    /// Configured target total.
    pub target_total: usize,
    /// Local event quota.
    pub target_log: usize,
    /// Network event quota.
    pub target_net: usize,
    /// Initialization events emitted (one per process).
    pub init_events: usize,
    /// Local events emitted after initialization.
    pub log_events: usize,
    /// Network events emitted (two per exchange).
    pub net_events: usize,
    /// All events emitted.
    pub total_events: usize,
}

impl GenerationSummary {
    /// Local events including initialization.
    ///
    /// `local_events() + net_events == total_events` always holds.
    pub const fn local_events(&self) -> usize {
        self.init_events.saturating_add(self.log_events)
    }
}

/// The output of one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Parameters the run used.
    pub params: RunParams,
    /// Emitted events, in order.
    pub events: Vec<Event>,
    /// Final counters.
    pub summary: GenerationSummary,
}

/// Drives one generation run.
///
/// The sequencer exclusively owns the clock store and the event tracker
/// for the length of the run, and borrows the randomness source from the
/// caller so runs are reproducible under a fixed seed.
#[derive(Debug)]
pub struct EventSequencer<'r, R: Rng + ?Sized> {
    params: RunParams,
    target_log: usize,
    target_net: usize,
    clocks: VectorClockStore,
    tracker: EventCountTracker,
    rng: &'r mut R,
    events: Vec<Event>,
    initialized: bool,
    init_events: usize,
    log_events: usize,
    net_events: usize,
}

impl<'r, R: Rng + ?Sized> EventSequencer<'r, R> {
    /// Prepare a run with fresh clocks and counters.
    pub fn new(params: RunParams, rng: &'r mut R) -> Self {
        let (target_log, target_net) = targets(&params);
        Self {
            params,
            target_log,
            target_net,
            clocks: VectorClockStore::new(params.process_count()),
            tracker: EventCountTracker::new(params.process_count(), params.total_events()),
            rng,
            events: Vec::new(),
            initialized: false,
            init_events: 0,
            log_events: 0,
            net_events: 0,
        }
    }

    /// Events emitted so far.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Total number of events emitted so far.
    pub const fn total(&self) -> usize {
        self.init_events
            .saturating_add(self.log_events)
            .saturating_add(self.net_events)
    }

    /// Compute the current state from the running counters.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::InvariantViolation`] if both quotas are
    /// met while the total is still below target.
    pub fn state(&self) -> Result<SequencerState, SequencerError> {
        if !self.initialized {
            return Ok(SequencerState::Init);
        }
        if self.total() >= self.params.total_events() {
            return Ok(SequencerState::Done);
        }
        let log_met = self.log_events >= self.target_log;
        let net_met = self.net_events >= self.target_net;
        match (log_met, net_met) {
            (false, false) => Ok(SequencerState::Balancing),
            (false, true) => Ok(SequencerState::LogOnly),
            (true, false) => Ok(SequencerState::NetOnly),
            (true, true) => Err(SequencerError::InvariantViolation {
                log_events: self.log_events,
                net_events: self.net_events,
                total_events: self.total(),
                target_log: self.target_log,
                target_net: self.target_net,
                target_total: self.params.total_events(),
            }),
        }
    }

    /// Perform one step and return the state it was taken in.
    ///
    /// # Errors
    ///
    /// Propagates invariant violations and chooser failures.
    pub fn step(&mut self) -> Result<SequencerState, SequencerError> {
        let state = self.state()?;
        match state {
            SequencerState::Init => self.initialize(),
            SequencerState::Balancing => {
                if self.rng.random_bool(0.5) {
                    self.exchange()?;
                } else {
                    self.local()?;
                }
            }
            SequencerState::LogOnly => self.local()?,
            SequencerState::NetOnly => self.exchange()?,
            SequencerState::Done => {}
        }
        Ok(state)
    }

    /// Run to completion and return the emitted events.
    ///
    /// # Errors
    ///
    /// Returns the first [`SequencerError`] raised. No events are returned
    /// on failure.
    pub fn run(mut self) -> Result<Generation, SequencerError> {
        info!(
            process_count = self.params.process_count(),
            target_total = self.params.total_events(),
            ratio = self.params.ratio(),
            target_log = self.target_log,
            target_net = self.target_net,
            cap = self.tracker.cap(),
            "Generation starting"
        );

        let mut previous = None;
        loop {
            let state = self.step()?;
            if previous != Some(state) {
                debug!(?state, total = self.total(), "Sequencer state");
                previous = Some(state);
            }
            if state == SequencerState::Done {
                break;
            }
        }

        let summary = self.summary();
        info!(
            total_events = summary.total_events,
            init_events = summary.init_events,
            log_events = summary.log_events,
            net_events = summary.net_events,
            "Generation complete"
        );
        Ok(Generation {
            params: self.params,
            events: self.events,
            summary,
        })
    }

    /// Snapshot the running counters.
    pub fn summary(&self) -> GenerationSummary {
        GenerationSummary {
            process_count: self.params.process_count(),
            target_total: self.params.total_events(),
            target_log: self.target_log,
            target_net: self.target_net,
            init_events: self.init_events,
            log_events: self.log_events,
            net_events: self.net_events,
            total_events: self.total(),
        }
    }

    /// Emit one initialization event per process, in id order.
    fn initialize(&mut self) {
        for pid in ProcessId::range(self.params.process_count()) {
            let clock = self.clocks.tick(pid);
            self.events.push(Event::new(pid, clock, EventKind::Initialization));
            self.init_events = self.init_events.saturating_add(1);
        }
        self.initialized = true;
    }

    /// Emit one local event.
    fn local(&mut self) -> Result<(), SequencerError> {
        let pid = EventChooser::new(&self.tracker).choose_local(&mut *self.rng)?;
        self.tracker.increment(pid);
        let clock = self.clocks.tick(pid);
        self.events.push(Event::new(pid, clock, EventKind::Local));
        self.log_events = self.log_events.saturating_add(1);
        Ok(())
    }

    /// Emit a send event followed by its matching receive event.
    fn exchange(&mut self) -> Result<(), SequencerError> {
        let (src, dst) = EventChooser::new(&self.tracker).choose_network(&mut *self.rng)?;
        self.tracker.increment(src);
        self.tracker.increment(dst);

        let send_clock = self.clocks.tick(src);
        let recv_clock = self.clocks.receive(dst, &send_clock);
        self.events.push(Event::new(src, send_clock, EventKind::Send { to: dst }));
        self.events.push(Event::new(dst, recv_clock, EventKind::Receive { from: src }));
        self.net_events = self.net_events.saturating_add(2);
        Ok(())
    }
}

/// Split the target total into `(log, net)` quotas.
///
/// A single process has nobody to exchange with, so its whole quota goes to
/// local events.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn targets(params: &RunParams) -> (usize, usize) {
    let total = params.total_events();
    let raw = ((1.0 - params.ratio()) * total as f64).floor();
    // `as` saturates on out-of-range floats; ratio is validated to [0, 1].
    let target_log = (raw as usize).min(total);
    let target_net = total.saturating_sub(target_log);
    if params.process_count() < 2 && target_net > 0 {
        warn!(
            process_count = params.process_count(),
            target_net,
            "single process cannot exchange messages, using local events only"
        );
        return (total, 0);
    }
    (target_log, target_net)
}
