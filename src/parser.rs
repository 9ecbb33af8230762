//! Fixed-format decomposition of GStreamer debug log lines.
//!
//! One pattern is applied to every input line, capturing the schema
//! fields in column order: timestamp, process id, thread address, level,
//! category, `source:line:function` triplet, object, message. Lines that
//! fail to match are skipped with a diagnostic; ingestion never stops on
//! a bad line.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::record::LogRecord;
use crate::timestamp::Timestamp;

static LOG_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([\d\.:]+)\s+(\d+)\s+(0x[0-9a-f]+)\s+([A-Z]+)\s+([^\s]*)\s+([a-z0-9_\-\.]*):(\d+):([^:]*):(\s*[^\s]*)\s+(.+)$",
    )
    .expect("valid regex")
});

/// Parse one input line into a record.
///
/// `line_number` is the 1-based position of the line in the source file
/// and becomes the record's immutable id. Returns `None` for lines that
/// do not match the log format, after reporting them.
pub fn parse_line(line_number: u32, line: &str) -> Option<LogRecord> {
    let Some(captures) = LOG_LINE.captures(line) else {
        warn!(line = line_number, text = line, "skipping unrecognized line");
        return None;
    };

    Some(LogRecord {
        id: line_number,
        gap: false,
        timestamp: Timestamp::parse(&captures[1]),
        pid: parse_integer(&captures[2]),
        tid: captures[3].to_string(),
        level: captures[4].to_string(),
        category: captures[5].to_string(),
        source: captures[6].to_string(),
        line: parse_integer(&captures[7]),
        function: captures[8].to_string(),
        object: captures[9].to_string(),
        message: captures[10].to_string(),
    })
}

/// Integer field coercion: defaults to 0 rather than failing the line.
fn parse_integer(text: &str) -> i64 {
    text.parse().unwrap_or(0)
}
