//! Enumeration types for the log generator.

use serde::{Deserialize, Serialize};

use crate::ids::ProcessId;

// ---------------------------------------------------------------------------
// Strategy tags
// ---------------------------------------------------------------------------

/// The randomization strategy that selects the parameters of a run.
///
/// Each strategy draws exactly one run parameter at random and takes the
/// other two from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Ratio drawn uniformly from `{0.1, 0.2, ..., 1.0}`.
    #[serde(rename = "var_ratio")]
    VarRatio,
    /// Process count drawn uniformly from `1..=24`.
    #[serde(rename = "var_procs")]
    VarProcs,
    /// Event count drawn uniformly from `{6000, 7000, ..., 12000}`.
    #[serde(rename = "var_events")]
    VarEvents,
}

impl StrategyKind {
    /// All recognized strategies, in tag order.
    pub const ALL: [Self; 3] = [Self::VarRatio, Self::VarProcs, Self::VarEvents];

    /// Return the configuration tag for this strategy.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VarRatio => "var_ratio",
            Self::VarProcs => "var_procs",
            Self::VarEvents => "var_events",
        }
    }
}

impl core::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy tag that does not name any known strategy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log type `{tag}` (expected one of var_ratio, var_procs, var_events)")]
pub struct UnknownStrategy {
    /// The tag exactly as it appeared in configuration.
    pub tag: String,
}

impl core::str::FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == tag)
            .ok_or_else(|| UnknownStrategy {
                tag: tag.to_owned(),
            })
    }
}

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

/// What a process did to produce an [`Event`](crate::Event).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// The first event of every process.
    Initialization,
    /// A local event with no dependency on another process.
    Local,
    /// The sending half of a network exchange.
    Send {
        /// The receiving process.
        to: ProcessId,
    },
    /// The receiving half of a network exchange.
    Receive {
        /// The sending process.
        from: ProcessId,
    },
}

impl EventKind {
    /// Return the human-readable log message for this kind of event.
    pub fn message(self) -> String {
        match self {
            Self::Initialization => "Initialization complete".to_owned(),
            Self::Local => "Local log message".to_owned(),
            Self::Send { to } => format!("Sending message to {to}"),
            Self::Receive { from } => format!("Received message from {from}"),
        }
    }

    /// Whether this event is one half of a network exchange.
    pub const fn is_network(self) -> bool {
        matches!(self, Self::Send { .. } | Self::Receive { .. })
    }
}

// ---------------------------------------------------------------------------
// Causal order
// ---------------------------------------------------------------------------

/// The happened-before relation between two vector clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CausalOrder {
    /// Every entry of the left clock is `<=` the right one, and at least
    /// one is strictly smaller.
    Before,
    /// Both clocks hold the same value for every process.
    Equal,
    /// Every entry of the left clock is `>=` the right one, and at least
    /// one is strictly larger.
    After,
    /// Neither clock dominates the other.
    Concurrent,
}
