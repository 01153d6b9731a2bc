//! Concurrent mark-sweep old generation (`-XX:+UseConcMarkSweepGC`).

use crate::catalog::fragments::{duration, inner_timestamp, occupancy, prefix, tail, DATESTAMP, SECONDS, TIMESTAMP, TRIGGER};
use crate::catalog::grammar::{Fields, RegexGrammar};
use crate::catalog::traits::{ExtractError, Extracted};
use crate::event::{EventBody, EventKind, OldMark, PhaseEnd, PhaseStart};

const PHASE: &str = r"(?P<phase>mark|preclean|abortable-preclean|sweep|reset)";

/// Concurrent phase lines may be prefixed by the abortable-preclean abort
/// notice, and carry no `[GC` wrapper.
fn concurrent_prefix() -> String {
    format!(r"^(?: ?CMS: abort preclean due to time )?(?:{DATESTAMP}: )?(?P<timestamp>{TIMESTAMP}): ")
}

fn old_mark(fields: &Fields<'_>) -> Result<OldMark, ExtractError> {
    Ok(OldMark {
        duration_ms: fields.duration()?,
        trigger: fields.trigger(),
        old: fields.occupancy("old")?,
        combined: fields.occupancy("combined")?,
    })
}

/// `[GC [1 CMS-initial-mark: old(cap)] combined(cap), N secs]`
pub(crate) fn cms_initial_mark() -> Result<RegexGrammar, regex::Error> {
    let pattern = format!(
        r"{}\[GC(?: {TRIGGER})? {}\[1 CMS-initial-mark: {}\] {}, {}\]{}",
        prefix(),
        inner_timestamp(),
        occupancy("old"),
        occupancy("combined"),
        duration(),
        tail(),
    );
    RegexGrammar::new("cms_initial_mark", EventKind::CmsInitialMark, &pattern, |fields| {
        Ok(Extracted {
            timestamp_ms: fields.timestamp()?,
            body: EventBody::CmsInitialMark(old_mark(fields)?),
        })
    })
}

/// `[GC[YG occupancy: ...] ...[1 CMS-remark: old(cap)] combined(cap), N secs]`
pub(crate) fn cms_remark() -> Result<RegexGrammar, regex::Error> {
    let pattern = format!(
        r"{}\[GC(?: {TRIGGER})? ?\[YG occupancy: .*\[1 CMS-remark: {}\] {}, {}\]{}",
        prefix(),
        occupancy("old"),
        occupancy("combined"),
        duration(),
        tail(),
    );
    RegexGrammar::new("cms_remark", EventKind::CmsRemark, &pattern, |fields| {
        Ok(Extracted {
            timestamp_ms: fields.timestamp()?,
            body: EventBody::CmsRemark(old_mark(fields)?),
        })
    })
}

/// `[CMS-concurrent-<phase>-start]`
pub(crate) fn cms_concurrent_start() -> Result<RegexGrammar, regex::Error> {
    let pattern = format!(r"{}\[CMS-concurrent-{PHASE}-start\]{}", concurrent_prefix(), tail());
    RegexGrammar::new(
        "cms_concurrent_start",
        EventKind::CmsConcurrentStart,
        &pattern,
        |fields| {
            Ok(Extracted {
                timestamp_ms: fields.timestamp()?,
                body: EventBody::CmsConcurrentStart(PhaseStart {
                    phase: fields.phase()?,
                }),
            })
        },
    )
}

/// `[CMS-concurrent-<phase>: cpu/wall secs]`, reporting wall time.
pub(crate) fn cms_concurrent() -> Result<RegexGrammar, regex::Error> {
    let pattern = format!(
        r"{}\[CMS-concurrent-{PHASE}: {SECONDS}/{}\]{}",
        concurrent_prefix(),
        duration(),
        tail(),
    );
    RegexGrammar::new("cms_concurrent", EventKind::CmsConcurrent, &pattern, |fields| {
        Ok(Extracted {
            timestamp_ms: fields.timestamp()?,
            body: EventBody::CmsConcurrent(PhaseEnd {
                phase: fields.phase()?,
                duration_ms: fields.duration()?,
            }),
        })
    })
}
