//! Garbage-first collector (`-XX:+UseG1GC`), JDK 6/7 summary output.

use crate::catalog::fragments::{duration, prefix, tail, transition, TRIGGER};
use crate::catalog::grammar::{Fields, RegexGrammar};
use crate::catalog::traits::{ExtractError, Extracted};
use crate::event::{CombinedPause, EventBody, EventKind, Timed};

fn combined_pause(fields: &Fields<'_>) -> Result<CombinedPause, ExtractError> {
    Ok(CombinedPause {
        duration_ms: fields.duration()?,
        trigger: fields.trigger(),
        combined: fields.region("combined")?,
    })
}

/// `[GC pause (young) (initial-mark) before->after(capacity), N secs]`
pub(crate) fn g1_young_initial_mark() -> Result<RegexGrammar, regex::Error> {
    let pattern = format!(
        r"{}\[GC pause (?:{TRIGGER} )?\(young\) \(initial-mark\) {}, {}\]{}",
        prefix(),
        transition("combined"),
        duration(),
        tail(),
    );
    RegexGrammar::new(
        "g1_young_initial_mark",
        EventKind::G1YoungInitialMark,
        &pattern,
        |fields| {
            Ok(Extracted {
                timestamp_ms: fields.timestamp()?,
                body: EventBody::G1YoungInitialMark(combined_pause(fields)?),
            })
        },
    )
}

/// `[GC pause (young) before->after(capacity), N secs]`
pub(crate) fn g1_young_pause() -> Result<RegexGrammar, regex::Error> {
    let pattern = format!(
        r"{}\[GC pause (?:{TRIGGER} )?\(young\) {}, {}\]{}",
        prefix(),
        transition("combined"),
        duration(),
        tail(),
    );
    RegexGrammar::new("g1_young_pause", EventKind::G1YoungPause, &pattern, |fields| {
        Ok(Extracted {
            timestamp_ms: fields.timestamp()?,
            body: EventBody::G1YoungPause(combined_pause(fields)?),
        })
    })
}

/// `[GC remark, N secs]`, optionally with nested sub-phase timings.
pub(crate) fn g1_remark() -> Result<RegexGrammar, regex::Error> {
    let pattern = format!(r"{}\[GC remark.*?, {}\]{}", prefix(), duration(), tail());
    RegexGrammar::new("g1_remark", EventKind::G1Remark, &pattern, |fields| {
        Ok(Extracted {
            timestamp_ms: fields.timestamp()?,
            body: EventBody::G1Remark(Timed {
                duration_ms: fields.duration()?,
            }),
        })
    })
}

/// `[Full GC (cause) before->after(capacity), N secs]`. G1 always prints a
/// cause; the bare form belongs to the serial verbose grammar.
pub(crate) fn g1_full_gc() -> Result<RegexGrammar, regex::Error> {
    let pattern = format!(
        r"{}\[Full GC {TRIGGER} {}, {}\]{}",
        prefix(),
        transition("combined"),
        duration(),
        tail(),
    );
    RegexGrammar::new("g1_full_gc", EventKind::G1FullGc, &pattern, |fields| {
        Ok(Extracted {
            timestamp_ms: fields.timestamp()?,
            body: EventBody::G1FullGc(combined_pause(fields)?),
        })
    })
}
