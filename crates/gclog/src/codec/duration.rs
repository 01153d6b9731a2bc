use super::CodecError;

/// Parse a fixed-point seconds literal (e.g. `0.0328800`) into milliseconds,
/// rounding half-up on the first sub-millisecond digit.
pub fn seconds_to_millis(literal: &str) -> Result<u64, CodecError> {
    let malformed = || CodecError::MalformedDuration(literal.to_string());

    let (whole, fraction) = literal.split_once('.').unwrap_or((literal, ""));
    if whole.is_empty()
        || !whole.bytes().all(|b| b.is_ascii_digit())
        || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(malformed());
    }

    let whole: u64 = whole.parse().map_err(|_| malformed())?;
    let digits = fraction.as_bytes();

    // Missing fractional digits count as zero: "0.5" is 500ms.
    let millis_part = digits
        .iter()
        .chain(std::iter::repeat(&b'0'))
        .take(3)
        .fold(0u64, |acc, d| acc * 10 + u64::from(d - b'0'));
    let round_up = digits.get(3).is_some_and(|d| *d >= b'5');

    whole
        .checked_mul(1000)
        .and_then(|ms| ms.checked_add(millis_part))
        .and_then(|ms| ms.checked_add(u64::from(round_up)))
        .ok_or_else(malformed)
}

/// Format milliseconds as seconds with seven fractional digits, the shape the
/// JVM uses for pause durations (`0.0328800`).
pub fn millis_to_seconds(ms: u64) -> String {
    format!("{}.{:03}0000", ms / 1000, ms % 1000)
}

/// Format milliseconds as a JVM uptime stamp with three fractional digits
/// (`142.973`), the shape that prefixes every relative-timestamped line.
pub fn format_timestamp(ms: u64) -> String {
    format!("{}.{:03}", ms / 1000, ms % 1000)
}
