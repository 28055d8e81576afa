//! Textual log format.
//!
//! Each event occupies two lines:
//!
//! ```text
//! Proc1 {"Proc0":2, "Proc1":3}
//! Received message from Proc0
//! ```
//!
//! A log may open with [`LOG_FORMAT_HEADER`] followed by a blank line. The
//! header is the regular expression a visualizer uses to split the log
//! back into host, clock, and event fields.

use std::io::{self, Write};

use loggen_types::{ClockParseError, Event, VectorClock};

/// Header line describing the shape of every entry.
pub const LOG_FORMAT_HEADER: &str = r"(?<host>\S*) (?<clock>{.*})\n(?<event>.*)";

/// Errors that can occur when parsing a log.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// A host line is not `host {clock}`.
    #[error("line {line}: expected `host {{clock}}`, found {text:?}")]
    MalformedHostLine {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        text: String,
    },

    /// The clock on a host line does not parse.
    #[error("line {line}: {source}")]
    Clock {
        /// 1-based line number.
        line: usize,
        /// The underlying clock error.
        source: ClockParseError,
    },

    /// The log ends after a host line with no message line.
    #[error("line {line}: entry has no message line")]
    MissingMessage {
        /// 1-based line number of the dangling host line.
        line: usize,
    },
}

/// One parsed entry of a textual log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Host name of the producing process.
    pub host: String,
    /// Vector clock attached to the entry.
    pub clock: VectorClock,
    /// Message text.
    pub message: String,
}

impl From<&Event> for LogEntry {
    fn from(event: &Event) -> Self {
        Self {
            host: event.host().to_owned(),
            clock: event.clock().clone(),
            message: event.message().to_owned(),
        }
    }
}

/// Write the format header followed by a blank line.
///
/// # Errors
///
/// Propagates I/O errors from `writer`.
pub fn write_header<W: Write + ?Sized>(writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{LOG_FORMAT_HEADER}")?;
    writeln!(writer)
}

/// Write one event in its two-line form.
///
/// # Errors
///
/// Propagates I/O errors from `writer`.
pub fn write_event<W: Write + ?Sized>(writer: &mut W, event: &Event) -> io::Result<()> {
    write!(writer, "{event}")
}

/// Render a whole log into a string.
pub fn render_log(events: &[Event], with_header: bool) -> String {
    let mut out = String::new();
    if with_header {
        out.push_str(LOG_FORMAT_HEADER);
        out.push_str("\n\n");
    }
    for event in events {
        out.push_str(&event.to_string());
    }
    out
}

/// Parse a textual log into its entries.
///
/// A leading [`LOG_FORMAT_HEADER`] line is skipped, as are blank lines
/// between entries.
///
/// # Errors
///
/// Returns a [`FormatError`] naming the first malformed line.
pub fn parse_log(text: &str) -> Result<Vec<LogEntry>, FormatError> {
    let mut entries = Vec::new();
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx.saturating_add(1), line))
        .peekable();

    if lines.peek().is_some_and(|&(_, line)| line == LOG_FORMAT_HEADER) {
        lines.next();
    }

    while let Some((line_no, line)) = lines.next() {
        if line.trim().is_empty() {
            continue;
        }
        let (host, clock_text) = line.split_once(' ').ok_or_else(|| FormatError::MalformedHostLine {
            line: line_no,
            text: line.to_owned(),
        })?;
        if host.is_empty() || !clock_text.starts_with('{') {
            return Err(FormatError::MalformedHostLine {
                line: line_no,
                text: line.to_owned(),
            });
        }
        let clock = VectorClock::parse(clock_text).map_err(|source| FormatError::Clock {
            line: line_no,
            source,
        })?;
        let (_, message) = lines
            .next()
            .ok_or(FormatError::MissingMessage { line: line_no })?;
        entries.push(LogEntry {
            host: host.to_owned(),
            clock,
            message: message.to_owned(),
        });
    }
    Ok(entries)
}
