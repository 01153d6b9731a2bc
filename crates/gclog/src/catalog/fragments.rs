//! Regex fragments shared by the built-in grammars.
//!
//! Builders return pattern text with named captures; a region called
//! `young` yields `young_before`, `young_after`, `young_capacity`, each with
//! a `_unit` companion.

/// JVM uptime stamp, `142.973`.
pub(crate) const TIMESTAMP: &str = r"[0-9]{1,10}\.[0-9]{3}";

/// `-XX:+PrintGCDateStamps`, `2010-02-26T08:31:51.990-0600`.
pub(crate) const DATESTAMP: &str =
    r"[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]{3}(?:[-+][0-9]{4}|[-+][0-9]{2}:[0-9]{2})";

/// Fixed-point seconds, `0.0328800`.
pub(crate) const SECONDS: &str = r"[0-9]{1,7}\.[0-9]{1,7}";

/// Cause in parentheses, `(System.gc())`, `(Allocation Failure)`.
pub(crate) const TRIGGER: &str = r"\((?P<trigger>[A-Za-z0-9 ._\-]+(?:\(\))?)\)";

/// Start of an event: optional datestamp, then the uptime stamp.
pub(crate) fn prefix() -> String {
    format!(r"^(?:{DATESTAMP}: )?(?P<timestamp>{TIMESTAMP}): ")
}

/// Uptime stamp of a nested phase; not captured.
pub(crate) fn inner_timestamp() -> String {
    format!(r"(?:{TIMESTAMP}: )?")
}

/// End of an event: optional `[Times: ...]` block and trailing whitespace.
pub(crate) fn tail() -> &'static str {
    r"(?:\s*\[Times: user=[^\]]+ secs\])?\s*$"
}

/// `, 0.0329790 secs]` closing a pause.
pub(crate) fn duration() -> String {
    format!(r"(?P<duration>{SECONDS}) secs")
}

/// `0.0968457 seconds` in the safepoint accounting lines.
pub(crate) fn duration_seconds() -> String {
    format!(r"(?P<duration>{SECONDS}) seconds")
}

pub(crate) fn size(name: &str) -> String {
    format!(r"(?P<{name}>[0-9]+)(?P<{name}_unit>[BKMG])")
}

/// `before->after(capacity)`.
pub(crate) fn transition(region: &str) -> String {
    format!(
        r"{}->{}\({}\)",
        size(&format!("{region}_before")),
        size(&format!("{region}_after")),
        size(&format!("{region}_capacity")),
    )
}

/// `occupancy(capacity)`, a single reading.
pub(crate) fn occupancy(region: &str) -> String {
    format!(
        r"{}\({}\)",
        size(&format!("{region}_before")),
        size(&format!("{region}_capacity")),
    )
}
