//! Log file output.
//!
//! The whole event sequence is built before this module is reached, so a
//! failed run never leaves a file behind. If writing fails after the file
//! was created, the partial file is removed before the error is returned.
//! A path that cannot be created is left untouched.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use loggen_core::format::{write_event, write_header};
use loggen_types::Event;
use tracing::{info, warn};

use crate::error::CliError;

/// Log a progress line every this many events.
const PROGRESS_INTERVAL: usize = 1000;

/// Write `events` to `path`, optionally preceded by the format header.
///
/// # Errors
///
/// Returns [`CliError::Write`] if the file cannot be created or written.
pub fn write_log_file(path: &Path, events: &[Event], with_header: bool) -> Result<(), CliError> {
    info!(path = %path.display(), events = events.len(), "Writing log file");
    let file = File::create(path).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    let mut out = BufWriter::new(file);
    let result = write_log(&mut out, events, with_header).and_then(|()| out.flush());
    drop(out);

    if let Err(source) = result {
        if let Err(cleanup) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %cleanup, "could not remove partial log file");
        }
        return Err(CliError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    info!(path = %path.display(), "Finished writing log file");
    Ok(())
}

/// Write `events` to `out`, logging progress as it goes.
fn write_log<W: Write>(out: &mut W, events: &[Event], with_header: bool) -> std::io::Result<()> {
    if with_header {
        write_header(out)?;
    }
    for (written, event) in events.iter().enumerate() {
        write_event(out, event)?;
        if written % PROGRESS_INTERVAL == 0 {
            info!(written, "Wrote events");
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use loggen_core::config::RunParams;
    use loggen_core::format::{parse_log, render_log};
    use loggen_core::strategy::generate_with_params;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn events() -> Vec<Event> {
        let params = RunParams::new(3, 50, 0.5).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        generate_with_params(params, &mut rng).unwrap().events
    }

    #[test]
    fn writes_rendered_log() {
        let events = events();
        let path = std::env::temp_dir().join(format!("loggen-writer-{}.log", std::process::id()));
        write_log_file(&path, &events, true).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_log(&events, true));
        assert_eq!(parse_log(&written).unwrap().len(), events.len());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn header_is_optional() {
        let events = events();
        let mut buf: Vec<u8> = Vec::new();
        write_log(&mut buf, &events, false).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), render_log(&events, false));
    }

    #[test]
    fn unwritable_path_is_reported() {
        let path = std::env::temp_dir()
            .join(format!("loggen-missing-{}", std::process::id()))
            .join("out.log");
        let err = write_log_file(&path, &events(), true).unwrap_err();
        assert!(matches!(err, CliError::Write { .. }));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn failed_create_keeps_existing_entry() {
        let dir = std::env::temp_dir().join(format!("loggen-dangling-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.log");
        let _ = std::fs::remove_file(&path);
        std::os::unix::fs::symlink(dir.join("missing").join("target.log"), &path).unwrap();

        let err = write_log_file(&path, &[], true).unwrap_err();
        assert!(matches!(err, CliError::Write { .. }));
        assert!(std::fs::symlink_metadata(&path).is_ok());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
