//! Vector clock bookkeeping and event sequencing for the log generator.
//!
//! This crate owns the generation run: it resolves run parameters from a
//! strategy, then drives a single sequential loop that picks which
//! process acts next, advances the vector clocks, and appends the
//! resulting events to the output sequence.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading (JSON or YAML) into typed structs.
//! - [`clock`] -- [`VectorClockStore`], one clock per simulated process.
//! - [`tracker`] -- [`EventCountTracker`], the per-process fairness cap.
//! - [`chooser`] -- [`EventChooser`], uniform selection over eligible
//!   processes.
//! - [`sequencer`] -- [`EventSequencer`], the state machine that balances
//!   local and network events.
//! - [`strategy`] -- The three randomization strategies and the
//!   [`generate`] entry point.
//! - [`format`] -- Textual log rendering and parsing.
//! - [`causality`] -- Consistency checks over a generated sequence.
//!
//! [`VectorClockStore`]: clock::VectorClockStore
//! [`EventCountTracker`]: tracker::EventCountTracker
//! [`EventChooser`]: chooser::EventChooser
//! [`EventSequencer`]: sequencer::EventSequencer
//! [`generate`]: strategy::generate

pub mod causality;
pub mod chooser;
pub mod clock;
pub mod config;
pub mod format;
pub mod sequencer;
pub mod strategy;
pub mod tracker;
