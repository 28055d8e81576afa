//! Randomization strategies and the generation entry points.
//!
//! A strategy draws one of the three run parameters at random and takes
//! the other two from configuration:
//!
//! - [`StrategyKind::VarRatio`]: ratio from `{0.1, 0.2, ..., 1.0}`
//! - [`StrategyKind::VarProcs`]: process count from `1..=24`
//! - [`StrategyKind::VarEvents`]: event count from `{6000, 7000, ..., 12000}`

use loggen_types::StrategyKind;
use rand::Rng;
use tracing::info;

use crate::config::{ConfigError, GeneratorConfig, RunParams};
use crate::sequencer::{EventSequencer, Generation, SequencerError};

/// Largest process count drawn by [`StrategyKind::VarProcs`].
pub const MAX_VARIABLE_PROCESSES: usize = 24;

/// Number of ratio steps drawn by [`StrategyKind::VarRatio`] (`0.1` apart).
pub const RATIO_STEPS: u32 = 10;

/// Smallest and largest event count drawn by [`StrategyKind::VarEvents`],
/// in thousands.
pub const VARIABLE_EVENT_THOUSANDS: (usize, usize) = (6, 12);

/// Errors that can occur during a full generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The configuration is invalid; no events were generated.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// Sequencing failed part way through; the partial output is dropped.
    #[error("sequencer error: {source}")]
    Sequencer {
        /// The underlying sequencer error.
        #[from]
        source: SequencerError,
    },
}

/// Resolve the parameters of one run under `kind`.
///
/// Draws the strategy's random parameter from `rng` and takes the rest
/// from `config`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidParams`] if the resulting parameters are
/// out of range.
pub fn resolve_params<R: Rng + ?Sized>(
    kind: StrategyKind,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<RunParams, ConfigError> {
    match kind {
        StrategyKind::VarRatio => {
            let step = rng.random_range(1..=RATIO_STEPS);
            let ratio = f64::from(step) / f64::from(RATIO_STEPS);
            RunParams::new(config.num_procs, config.num_events, ratio)
        }
        StrategyKind::VarProcs => {
            let process_count = rng.random_range(1..=MAX_VARIABLE_PROCESSES);
            RunParams::new(process_count, config.num_events, config.ratio)
        }
        StrategyKind::VarEvents => {
            let (low, high) = VARIABLE_EVENT_THOUSANDS;
            let total_events = rng.random_range(low..=high).saturating_mul(1000);
            RunParams::new(config.num_procs, total_events, config.ratio)
        }
    }
}

/// Generate a log as described by `config`.
///
/// The strategy tag is validated before anything is drawn from `rng`, so
/// an unknown tag aborts the run with no events produced.
///
/// # Errors
///
/// Returns [`GenerateError::Config`] for an unknown strategy or invalid
/// parameters, and [`GenerateError::Sequencer`] if sequencing fails.
pub fn generate<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Generation, GenerateError> {
    let kind = config.strategy()?;
    let params = resolve_params(kind, config, rng)?;
    info!(
        strategy = %kind,
        process_count = params.process_count(),
        total_events = params.total_events(),
        ratio = params.ratio(),
        "Run parameters resolved"
    );
    Ok(generate_with_params(params, rng)?)
}

/// Generate a log with explicit parameters, bypassing the strategy draw.
///
/// # Errors
///
/// Returns the [`SequencerError`] raised by the run, if any.
pub fn generate_with_params<R: Rng + ?Sized>(
    params: RunParams,
    rng: &mut R,
) -> Result<Generation, SequencerError> {
    EventSequencer::new(params, rng).run()
}
