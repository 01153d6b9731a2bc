use super::CodecError;

/// Convert a size literal plus its unit character into kilobytes.
///
/// Units are `B`, `K`, `M` and `G` (case-insensitive). Byte quantities are
/// truncated toward zero.
pub fn parse_size(number: &str, unit: char) -> Result<u32, CodecError> {
    let malformed = || CodecError::MalformedNumber(format!("{number}{unit}"));

    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let value: u64 = number.parse().map_err(|_| malformed())?;

    let kilobytes = match unit.to_ascii_uppercase() {
        'B' => Some(value / 1024),
        'K' => Some(value),
        'M' => value.checked_mul(1024),
        'G' => value.checked_mul(1024 * 1024),
        _ => None,
    };

    kilobytes
        .and_then(|kb| u32::try_from(kb).ok())
        .ok_or_else(malformed)
}
