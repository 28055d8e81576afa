//! Command-line entry point for the vector-clock log generator.
//!
//! Reads a generator configuration, produces one causally consistent event
//! sequence, and writes it as a textual log that vector-clock visualizers
//! can ingest.
//!
//! # Run Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration (JSON, or YAML by extension)
//! 3. Resolve the seed: `--seed`, then `LOGGEN_SEED`, then config, then entropy
//! 4. Generate the full event sequence in memory
//! 5. Optionally verify causal consistency
//! 6. Write the log file
//!
//! ```text
//! loggen <CONFIG> <OUTPUT> [--seed N] [--no-header] [--verify]
//! ```

mod error;
mod writer;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use loggen_core::causality::check_causality;
use loggen_core::config::GeneratorConfig;
use loggen_core::strategy::generate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Generate synthetic distributed-system logs annotated with vector clocks.
#[derive(Debug, Parser)]
#[command(name = "loggen", version, about)]
struct Cli {
    /// Generator configuration file (`.json`, `.yaml` or `.yml`).
    config: PathBuf,

    /// Path of the log file to write.
    output: PathBuf,

    /// Random seed; overrides the config file and `LOGGEN_SEED`.
    #[arg(long)]
    seed: Option<u64>,

    /// Omit the format header line.
    #[arg(long)]
    no_header: bool,

    /// Check the generated sequence for causal consistency before writing.
    #[arg(long)]
    verify: bool,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, generation, verification, or
/// writing fails. No output file is left behind in any of those cases.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    info!("loggen starting");

    run(&cli).with_context(|| {
        format!(
            "failed to generate {} from {}",
            cli.output.display(),
            cli.config.display()
        )
    })
}

/// Run one generation from the parsed arguments.
fn run(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(&cli.config, cli.seed)?;
    let seed = config.seed.unwrap_or_else(rand::random);
    info!(
        strategy = %config.log_type,
        ratio = config.ratio,
        num_events = config.num_events,
        num_procs = config.num_procs,
        seed,
        "Configuration loaded"
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let generation = generate(&config, &mut rng)?;

    if cli.verify {
        check_causality(&generation.events, generation.params.process_count())?;
        info!("Causality check passed");
    }

    writer::write_log_file(&cli.output, &generation.events, !cli.no_header)?;

    let summary = generation.summary;
    info!(
        seed,
        total_events = summary.total_events,
        local_events = summary.local_events(),
        net_events = summary.net_events,
        process_count = summary.process_count,
        "loggen finished"
    );
    Ok(())
}

/// Load configuration and apply the command-line seed override.
fn load_config(path: &Path, seed: Option<u64>) -> Result<GeneratorConfig, CliError> {
    let mut config = GeneratorConfig::from_file(path)?;
    if seed.is_some() {
        config.seed = seed;
    }
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_positional_and_flags() {
        let cli = Cli::try_parse_from(["loggen", "cfg.json", "out.log", "--seed", "9", "--verify"])
            .unwrap();
        assert_eq!(cli.config, PathBuf::from("cfg.json"));
        assert_eq!(cli.output, PathBuf::from("out.log"));
        assert_eq!(cli.seed, Some(9));
        assert!(cli.verify);
        assert!(!cli.no_header);
    }

    #[test]
    fn requires_both_paths() {
        assert!(Cli::try_parse_from(["loggen", "cfg.json"]).is_err());
    }

    #[test]
    fn end_to_end_run_writes_log() {
        let dir = std::env::temp_dir().join(format!("loggen-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = dir.join("config.json");
        std::fs::write(
            &config,
            r#"{"type": "var_ratio", "num_events": 200, "num_procs": 4}"#,
        )
        .unwrap();

        let output = dir.join("out.log");
        let cli = Cli {
            config: config.clone(),
            output: output.clone(),
            seed: Some(3),
            no_header: false,
            verify: true,
        };
        run(&cli).unwrap();
        let first = std::fs::read_to_string(&output).unwrap();
        assert!(first.starts_with(loggen_core::format::LOG_FORMAT_HEADER));

        run(&cli).unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), first);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unknown_strategy_leaves_no_file() {
        let dir = std::env::temp_dir().join(format!("loggen-cli-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = dir.join("config.json");
        std::fs::write(&config, r#"{"type": "var_weather"}"#).unwrap();

        let output = dir.join("out.log");
        let cli = Cli {
            config,
            output: output.clone(),
            seed: Some(1),
            no_header: false,
            verify: false,
        };
        assert!(matches!(run(&cli), Err(CliError::Generate { .. })));
        assert!(!output.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
