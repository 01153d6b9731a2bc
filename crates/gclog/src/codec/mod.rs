//! Size, duration and datestamp conversions.
//!
//! Pure functions shared by the preprocessor and every grammar extractor.
//! Sizes are normalised to kilobytes, durations to milliseconds, and absolute
//! datestamps to milliseconds since JVM start.

mod date;
mod duration;
mod size;

use thiserror::Error;

pub use date::{elapsed_since, parse_datestamp, Instant, DATESTAMP_FORMAT};
pub use duration::{format_timestamp, millis_to_seconds, seconds_to_millis};
pub use size::parse_size;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Malformed number: {0}")]
    MalformedNumber(String),

    #[error("Malformed duration: {0}")]
    MalformedDuration(String),

    #[error("Malformed date: {0}")]
    MalformedDate(String),
}
