//! Sub-second timestamp type for GStreamer debug logs.
//!
//! A `Timestamp` is a time-of-day plus a nanosecond offset, keeping the
//! original source text so that formatting a parsed value reproduces the
//! input byte for byte.

use std::cmp::Ordering;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

const NSECS_PER_SEC: i64 = 1_000_000_000;

/// Time-of-day pattern: unpadded hour, two-digit minute and second.
static TIME_OF_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2})$").expect("valid regex"));

/// A sub-second time-of-day value with lossless text round-trip.
///
/// Ordering and equality compare the time-of-day first and the nanosecond
/// offset second; the retained text never participates.
#[derive(Clone, Debug)]
pub struct Timestamp {
    /// Seconds since midnight, 0 when the time-of-day was malformed.
    secs: i64,
    /// Nanosecond offset within the second, as written in the source.
    nsecs: i64,
    /// Original text, or a synthesized canonical form for mixed values.
    text: String,
}

impl Timestamp {
    /// Parse `H:MM:SS.NNNNNNNNN` text.
    ///
    /// The text is split on the first `.`: the left part must match the
    /// time-of-day pattern, the right part is taken as an integer
    /// nanosecond count. Parsing never fails; a malformed time-of-day
    /// degrades to the zero value and a malformed or absent fraction
    /// degrades to 0, with the text retained verbatim either way.
    pub fn parse(text: &str) -> Self {
        let (time_part, frac_part) = match text.split_once('.') {
            Some((t, f)) => (t, Some(f)),
            None => (text, None),
        };

        let secs = parse_time_of_day(time_part).unwrap_or(0);
        let nsecs = frac_part
            .map(|f| f.split('.').next().unwrap_or(f))
            .and_then(|f| f.parse::<i64>().ok())
            .unwrap_or(0);

        Self {
            secs,
            nsecs,
            text: text.to_string(),
        }
    }

    /// Construct from components, synthesizing canonical text.
    fn from_parts(secs: i64, nsecs: i64) -> Self {
        let text = format!(
            "{}:{:02}:{:02}.{:09}",
            secs / 3600,
            secs / 60 % 60,
            secs % 60,
            nsecs
        );
        Self { secs, nsecs, text }
    }

    /// Seconds since midnight of the time-of-day component.
    pub fn seconds_of_day(&self) -> i64 {
        self.secs
    }

    /// Nanosecond offset within the second.
    pub fn subsec_nanos(&self) -> i64 {
        self.nsecs
    }

    /// Signed delta to `other` in whole seconds, truncated toward zero.
    ///
    /// Truncation at this resolution is what makes a 1.5s step not a gap
    /// while a 2.5s step is one.
    pub fn secs_to(&self, other: &Timestamp) -> i64 {
        self.nsecs_to(other) / NSECS_PER_SEC
    }

    /// Signed delta to `other` in milliseconds, rounded half away from zero.
    pub fn msecs_to(&self, other: &Timestamp) -> i64 {
        round_div(self.nsecs_to(other), 1_000_000)
    }

    /// Signed delta to `other` in microseconds, rounded half away from zero.
    pub fn usecs_to(&self, other: &Timestamp) -> i64 {
        round_div(self.nsecs_to(other), 1_000)
    }

    /// Exact signed delta to `other` in nanoseconds.
    pub fn nsecs_to(&self, other: &Timestamp) -> i64 {
        (other.secs - self.secs) * NSECS_PER_SEC + (other.nsecs - self.nsecs)
    }

    /// Linear interpolation of the elapsed time between `a` and `b` at
    /// fraction `t` in `[0, 1]`.
    ///
    /// The resulting nanosecond offset is normalized into `[0, 1e9)` by
    /// carrying whole seconds into the time-of-day component. The result
    /// carries a freshly formatted canonical `H:MM:SS.NNNNNNNNN` text
    /// rather than any source text.
    pub fn mix(a: &Timestamp, b: &Timestamp, t: f64) -> Timestamp {
        let elapsed = a.nsecs_to(b);
        let offset = (elapsed as f64 * t).round() as i64;
        let total = a.nsecs + offset;
        let secs = a.secs + total.div_euclid(NSECS_PER_SEC);
        let nsecs = total.rem_euclid(NSECS_PER_SEC);
        Timestamp::from_parts(secs, nsecs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.secs == other.secs && self.nsecs == other.nsecs
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.secs, self.nsecs).cmp(&(other.secs, other.nsecs))
    }
}

/// Parse `H:MM:SS` into seconds since midnight, rejecting out-of-range
/// components.
fn parse_time_of_day(text: &str) -> Option<i64> {
    let captures = TIME_OF_DAY.captures(text)?;
    let hour: i64 = captures[1].parse().ok()?;
    let minute: i64 = captures[2].parse().ok()?;
    let second: i64 = captures[3].parse().ok()?;
    if hour > 23 || minute > 59 || second > 59 {
        return None;
    }
    Some(hour * 3600 + minute * 60 + second)
}

/// Integer division rounding half away from zero.
fn round_div(n: i64, d: i64) -> i64 {
    if n >= 0 { (n + d / 2) / d } else { (n - d / 2) / d }
}
