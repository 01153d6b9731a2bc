//! Safepoint accounting from `-XX:+PrintGCApplicationStoppedTime` and
//! `-XX:+PrintGCApplicationConcurrentTime`. The JVM prints these without an
//! uptime stamp; one appears only when datestamps were rewritten.

use crate::catalog::fragments::{duration_seconds, DATESTAMP, TIMESTAMP};
use crate::catalog::grammar::RegexGrammar;
use crate::catalog::traits::Extracted;
use crate::event::{EventBody, EventKind, Timed};

fn optional_prefix() -> String {
    format!(r"^(?:(?:{DATESTAMP}: )?(?P<timestamp>{TIMESTAMP}): )?")
}

/// `Total time for which application threads were stopped: N seconds`
pub(crate) fn application_stopped_time() -> Result<RegexGrammar, regex::Error> {
    let pattern = format!(
        r"{}Total time for which application threads were stopped: {}(?:, Stopping threads took: [0-9]+\.[0-9]+ seconds)?\s*$",
        optional_prefix(),
        duration_seconds(),
    );
    RegexGrammar::new(
        "application_stopped_time",
        EventKind::ApplicationStoppedTime,
        &pattern,
        |fields| {
            Ok(Extracted {
                timestamp_ms: fields.timestamp_or_zero()?,
                body: EventBody::ApplicationStoppedTime(Timed {
                    duration_ms: fields.duration()?,
                }),
            })
        },
    )
}

/// `Application time: N seconds`
pub(crate) fn application_concurrent_time() -> Result<RegexGrammar, regex::Error> {
    let pattern = format!(r"{}Application time: {}\s*$", optional_prefix(), duration_seconds());
    RegexGrammar::new(
        "application_concurrent_time",
        EventKind::ApplicationConcurrentTime,
        &pattern,
        |fields| {
            Ok(Extracted {
                timestamp_ms: fields.timestamp_or_zero()?,
                body: EventBody::ApplicationConcurrentTime(Timed {
                    duration_ms: fields.duration()?,
                }),
            })
        },
    )
}
