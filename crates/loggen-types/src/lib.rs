//! Shared type definitions for the vector-clock log generator.
//!
//! This crate is the single source of truth for the values that flow
//! between the generator core and anything that consumes its output.
//!
//! # Modules
//!
//! - [`ids`] -- Process identifiers and their display names
//! - [`clock`] -- The [`VectorClock`] value type and causal comparison
//! - [`enums`] -- Strategy tags and event kinds
//! - [`event`] -- The immutable [`Event`] record emitted by the generator

pub mod clock;
pub mod enums;
pub mod event;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use clock::{ClockParseError, VectorClock};
pub use enums::{CausalOrder, EventKind, StrategyKind, UnknownStrategy};
pub use event::Event;
pub use ids::ProcessId;
