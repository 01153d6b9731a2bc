use chrono::{DateTime, FixedOffset};

use super::CodecError;

/// An absolute point in time with the offset it was logged in.
pub type Instant = DateTime<FixedOffset>;

/// `-XX:+PrintGCDateStamps` layout, e.g. `2010-02-26T08:31:51.990-0600`.
/// `%z` also accepts `+05:30` style offsets.
pub const DATESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

pub fn parse_datestamp(literal: &str) -> Result<Instant, CodecError> {
    DateTime::parse_from_str(literal, DATESTAMP_FORMAT)
        .map_err(|e| CodecError::MalformedDate(format!("{literal}: {e}")))
}

/// Milliseconds from `start` to `at`. Saturates at 0 when `at` is earlier.
pub fn elapsed_since(start: &Instant, at: &Instant) -> u64 {
    let delta = at.signed_duration_since(*start).num_milliseconds();
    u64::try_from(delta).unwrap_or(0)
}
