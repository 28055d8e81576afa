//! Consistency checks over a generated event sequence.
//!
//! Generated logs are test fixtures for causality-inference tools, so they
//! must be causally consistent themselves. [`check_causality`] verifies a
//! sequence against the properties every run guarantees:
//!
//! 1. It opens with one initialization event per process, each showing a
//!    single tick of its own process.
//! 2. Each process's own clock entry advances by exactly one per event,
//!    and its clock never moves backwards.
//! 3. Every send is immediately followed by the matching receive, whose
//!    clock dominates the send clock.

use loggen_types::{CausalOrder, Event, EventKind, ProcessId, VectorClock};

/// The first property a sequence violates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CausalityError {
    /// The opening events are not one initialization per process.
    #[error("event {index}: expected initialization of {expected}")]
    BadInitialization {
        /// Position in the sequence.
        index: usize,
        /// The process whose initialization was expected.
        expected: ProcessId,
    },

    /// An event names a process outside the run.
    #[error("event {index}: {process} is not part of a {process_count}-process run")]
    UnknownProcess {
        /// Position in the sequence.
        index: usize,
        /// The offending process.
        process: ProcessId,
        /// Number of processes in the run.
        process_count: usize,
    },

    /// A process's own entry did not advance by exactly one.
    #[error("event {index}: {process} own entry is {found}, expected {expected}")]
    OwnEntrySkipped {
        /// Position in the sequence.
        index: usize,
        /// The process that acted.
        process: ProcessId,
        /// Expected own entry.
        expected: u64,
        /// Actual own entry.
        found: u64,
    },

    /// A process's clock lost history it had already observed.
    #[error("event {index}: {process} clock moved backwards")]
    ClockRegressed {
        /// Position in the sequence.
        index: usize,
        /// The process that acted.
        process: ProcessId,
    },

    /// A send is not immediately followed by its receive.
    #[error("event {index}: send has no matching receive")]
    UnmatchedSend {
        /// Position of the send.
        index: usize,
    },

    /// A receive does not immediately follow its send.
    #[error("event {index}: receive has no matching send")]
    UnmatchedReceive {
        /// Position of the receive.
        index: usize,
    },

    /// A receive clock does not include the sender's history.
    #[error("event {index}: receive clock does not dominate the send clock")]
    ReceiveMissesHistory {
        /// Position of the receive.
        index: usize,
    },
}

/// Verify that `events` is a causally consistent run of `process_count`
/// processes.
///
/// # Errors
///
/// Returns the first [`CausalityError`] found, scanning in order.
pub fn check_causality(events: &[Event], process_count: usize) -> Result<(), CausalityError> {
    check_initialization(events, process_count)?;

    let mut latest: Vec<VectorClock> = vec![VectorClock::new(); process_count];
    let mut pending_send: Option<(usize, &Event)> = None;

    for (index, event) in events.iter().enumerate() {
        let process = event.process();
        let Some(previous) = latest.get_mut(process.index()) else {
            return Err(CausalityError::UnknownProcess {
                index,
                process,
                process_count,
            });
        };

        let own = process.name();
        let expected = previous.get(&own).saturating_add(1);
        let found = event.clock().get(&own);
        if found != expected {
            return Err(CausalityError::OwnEntrySkipped {
                index,
                process,
                expected,
                found,
            });
        }
        if event.clock().compare(previous) != CausalOrder::After {
            return Err(CausalityError::ClockRegressed { index, process });
        }
        *previous = event.clock().clone();

        match (event.kind(), pending_send.take()) {
            (EventKind::Receive { from }, Some((_, send))) => {
                if send.process() != from || send.kind() != (EventKind::Send { to: process }) {
                    return Err(CausalityError::UnmatchedReceive { index });
                }
                if !event.clock().dominates(send.clock()) {
                    return Err(CausalityError::ReceiveMissesHistory { index });
                }
            }
            (EventKind::Receive { .. }, None) => {
                return Err(CausalityError::UnmatchedReceive { index });
            }
            (_, Some((send_index, _))) => {
                return Err(CausalityError::UnmatchedSend { index: send_index });
            }
            (EventKind::Send { .. }, None) => pending_send = Some((index, event)),
            (EventKind::Initialization | EventKind::Local, None) => {}
        }
    }

    match pending_send {
        Some((index, _)) => Err(CausalityError::UnmatchedSend { index }),
        None => Ok(()),
    }
}

fn check_initialization(events: &[Event], process_count: usize) -> Result<(), CausalityError> {
    for (index, expected) in ProcessId::range(process_count).enumerate() {
        let bad = CausalityError::BadInitialization { index, expected };
        let event = events.get(index).ok_or_else(|| bad.clone())?;
        let mut only_own = VectorClock::new();
        only_own.tick(&expected.name());
        if event.process() != expected
            || event.kind() != EventKind::Initialization
            || event.clock().compare(&only_own) != CausalOrder::Equal
        {
            return Err(bad);
        }
    }
    if let Some(index) = events
        .iter()
        .skip(process_count)
        .position(|e| e.kind() == EventKind::Initialization)
    {
        let extra = index.saturating_add(process_count);
        let process = events.get(extra).map_or(ProcessId(0), Event::process);
        return Err(CausalityError::BadInitialization {
            index: extra,
            expected: process,
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::RunParams;
    use crate::strategy::generate_with_params;

    fn generated(process_count: usize, total: usize, ratio: f64, seed: u64) -> Vec<Event> {
        let params = RunParams::new(process_count, total, ratio).unwrap();
        let mut rng = SmallRng::seed_from_u64(seed);
        generate_with_params(params, &mut rng).unwrap().events
    }

    fn clock(entries: &[(&str, u64)]) -> VectorClock {
        entries
            .iter()
            .map(|&(name, count)| (name.to_owned(), count))
            .collect()
    }

    fn init(n: usize) -> Event {
        let pid = ProcessId(n);
        Event::new(pid, clock(&[(pid.name().as_str(), 1)]), EventKind::Initialization)
    }

    #[test]
    fn generated_runs_are_consistent() {
        for seed in 0..10 {
            let events = generated(6, 400, 0.6, seed);
            assert_eq!(check_causality(&events, 6), Ok(()));
        }
    }

    #[test]
    fn detects_missing_initialization() {
        let events = vec![init(0)];
        assert_eq!(
            check_causality(&events, 2),
            Err(CausalityError::BadInitialization {
                index: 1,
                expected: ProcessId(1)
            })
        );
    }

    #[test]
    fn detects_skipped_tick() {
        let mut events = vec![init(0), init(1)];
        events.push(Event::new(ProcessId(0), clock(&[("Proc0", 3)]), EventKind::Local));
        assert!(matches!(
            check_causality(&events, 2),
            Err(CausalityError::OwnEntrySkipped {
                index: 2,
                expected: 2,
                found: 3,
                ..
            })
        ));
    }

    #[test]
    fn detects_receive_without_sender_history() {
        let mut events = vec![init(0), init(1)];
        events.push(Event::new(
            ProcessId(0),
            clock(&[("Proc0", 2)]),
            EventKind::Send { to: ProcessId(1) },
        ));
        events.push(Event::new(
            ProcessId(1),
            clock(&[("Proc1", 2)]),
            EventKind::Receive { from: ProcessId(0) },
        ));
        assert_eq!(
            check_causality(&events, 2),
            Err(CausalityError::ReceiveMissesHistory { index: 3 })
        );
    }

    #[test]
    fn detects_dangling_send() {
        let mut events = vec![init(0), init(1)];
        events.push(Event::new(
            ProcessId(0),
            clock(&[("Proc0", 2)]),
            EventKind::Send { to: ProcessId(1) },
        ));
        assert_eq!(
            check_causality(&events, 2),
            Err(CausalityError::UnmatchedSend { index: 2 })
        );
    }

    #[test]
    fn detects_unknown_process() {
        let mut events = vec![init(0)];
        events.push(Event::new(ProcessId(4), clock(&[("Proc4", 1)]), EventKind::Local));
        assert!(matches!(
            check_causality(&events, 1),
            Err(CausalityError::UnknownProcess { index: 1, .. })
        ));
    }
}
