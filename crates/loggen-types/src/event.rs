//! The immutable event record emitted by the generator.

use serde::Serialize;

use crate::clock::VectorClock;
use crate::enums::EventKind;
use crate::ids::ProcessId;

/// One entry of a generated log.
///
/// An event is created at the moment a process acts and captures a
/// snapshot of that process's vector clock. It is never mutated
/// afterwards; all fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    process: ProcessId,
    host: String,
    clock: VectorClock,
    kind: EventKind,
    message: String,
}

impl Event {
    /// Record an event of `kind` at `process` with the given clock snapshot.
    ///
    /// The host name and message text are derived from the process id and
    /// the event kind.
    pub fn new(process: ProcessId, clock: VectorClock, kind: EventKind) -> Self {
        Self {
            process,
            host: process.name(),
            clock,
            kind,
            message: kind.message(),
        }
    }

    /// The process that produced this event.
    pub const fn process(&self) -> ProcessId {
        self.process
    }

    /// The display name of the producing process.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The vector clock snapshot taken when the event was emitted.
    pub const fn clock(&self) -> &VectorClock {
        &self.clock
    }

    /// What the process did.
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// The human-readable log message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Renders the two-line log form: host, space, clock, newline, message,
/// newline.
impl core::fmt::Display for Event {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{} {}", self.host, self.clock)?;
        writeln!(f, "{}", self.message)
    }
}
