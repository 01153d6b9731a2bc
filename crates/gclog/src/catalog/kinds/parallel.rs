//! Throughput collector (`-XX:+UseParallelGC`, `-XX:+UseParallelOldGC`).

use crate::catalog::fragments::{duration, prefix, tail, transition, TRIGGER};
use crate::catalog::grammar::{Fields, RegexGrammar};
use crate::catalog::traits::{ExtractError, Extracted};
use crate::event::{EventBody, EventKind, FullPause, YoungPause};

/// Full collection where the old generation is reported as `old_gen`.
fn full_pattern(old_gen: &str) -> String {
    format!(
        r"{}\[Full GC(?: {TRIGGER})? \[PSYoungGen: {}\] \[{old_gen}: {}\] {} \[(?:PSPermGen|Metaspace): {}\], {}\]{}",
        prefix(),
        transition("young"),
        transition("old"),
        transition("combined"),
        transition("perm"),
        duration(),
        tail(),
    )
}

fn full_pause(fields: &Fields<'_>) -> Result<FullPause, ExtractError> {
    Ok(FullPause {
        duration_ms: fields.duration()?,
        trigger: fields.trigger(),
        young: fields.region("young")?,
        old: fields.region("old")?,
        perm: fields.region("perm")?,
        combined: fields.region("combined")?,
    })
}

/// `[Full GC [PSYoungGen: ...] [ParOldGen: ...] ... [PSPermGen: ...], N secs]`
pub(crate) fn parallel_old_compacting() -> Result<RegexGrammar, regex::Error> {
    RegexGrammar::new(
        "parallel_old_compacting",
        EventKind::ParallelOldCompacting,
        &full_pattern("ParOldGen"),
        |fields| {
            Ok(Extracted {
                timestamp_ms: fields.timestamp()?,
                body: EventBody::ParallelOldCompacting(full_pause(fields)?),
            })
        },
    )
}

/// Same shape with the serial old collector, `[PSOldGen: ...]`.
pub(crate) fn parallel_serial_old() -> Result<RegexGrammar, regex::Error> {
    RegexGrammar::new(
        "parallel_serial_old",
        EventKind::ParallelSerialOld,
        &full_pattern("PSOldGen"),
        |fields| {
            Ok(Extracted {
                timestamp_ms: fields.timestamp()?,
                body: EventBody::ParallelSerialOld(full_pause(fields)?),
            })
        },
    )
}

/// `[GC [PSYoungGen: ...] before->after(capacity), N secs]`
pub(crate) fn parallel_scavenge() -> Result<RegexGrammar, regex::Error> {
    let pattern = format!(
        r"{}\[GC(?: {TRIGGER})? \[PSYoungGen: {}\] {}, {}\]{}",
        prefix(),
        transition("young"),
        transition("combined"),
        duration(),
        tail(),
    );
    RegexGrammar::new("parallel_scavenge", EventKind::ParallelScavenge, &pattern, |fields| {
        Ok(Extracted {
            timestamp_ms: fields.timestamp()?,
            body: EventBody::ParallelScavenge(YoungPause {
                duration_ms: fields.duration()?,
                trigger: fields.trigger(),
                young: fields.region("young")?,
                combined: fields.region("combined")?,
            }),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EventGrammar;
    use crate::event::Region;

    const OLD_COMPACTING: &str = "2182.541: [Full GC [PSYoungGen: 1940K->0K(98560K)] [ParOldGen: 813929K->422305K(815616K)] 815869K->422305K(914176K) [PSPermGen: 81960K->81783K(164352K)], 2.4749181 secs]";

    #[test]
    fn test_old_compacting() {
        let grammar = parallel_old_compacting().unwrap();
        let extracted = grammar.extract(OLD_COMPACTING).unwrap();
        assert_eq!(extracted.timestamp_ms, 2182541);
        let EventBody::ParallelOldCompacting(pause) = extracted.body else {
            panic!("wrong body: {:?}", extracted.body);
        };
        assert_eq!(pause.duration_ms, 2475);
        assert_eq!(pause.trigger, None);
        assert_eq!(pause.young, Region::new(1940, 0, 98560));
        assert_eq!(pause.old, Region::new(813929, 422305, 815616));
        assert_eq!(pause.combined, Region::new(815869, 422305, 914176));
        assert_eq!(pause.perm, Region::new(81960, 81783, 164352));
    }

    #[test]
    fn test_old_compacting_system_trigger_and_times() {
        let grammar = parallel_old_compacting().unwrap();
        let line = "2.417: [Full GC (System) [PSYoungGen: 1788K->0K(12736K)] [ParOldGen: 1084K->2843K(116544K)] 2872K->2843K(129280K) [PSPermGen: 8602K->8593K(131072K)], 0.0805780 secs] [Times: user=0.15 sys=0.00, real=0.08 secs]";
        let extracted = grammar.extract(line).unwrap();
        let EventBody::ParallelOldCompacting(pause) = extracted.body else {
            panic!("wrong body");
        };
        assert_eq!(pause.trigger.as_deref(), Some("System"));
        assert_eq!(pause.duration_ms, 81);
    }

    #[test]
    fn test_serial_old_is_distinct() {
        let serial = parallel_serial_old().unwrap();
        assert!(!serial.recognize(OLD_COMPACTING));
        let line = OLD_COMPACTING.replace("ParOldGen", "PSOldGen");
        assert!(serial.recognize(&line));
        assert!(!parallel_old_compacting().unwrap().recognize(&line));
    }

    #[test]
    fn test_metaspace_accepted_as_perm() {
        let line = "1.234: [Full GC (Ergonomics) [PSYoungGen: 100K->0K(200K)] [ParOldGen: 300K->250K(400K)] 400K->250K(600K) [Metaspace: 50K->50K(1056768K)], 0.0100000 secs]";
        assert!(parallel_old_compacting().unwrap().recognize(line));
    }

    #[test]
    fn test_scavenge() {
        let grammar = parallel_scavenge().unwrap();
        let line = "19810.091: [GC [PSYoungGen: 27808K->632K(28032K)] 160183K->133159K(585088K), 0.0225213 secs]";
        let extracted = grammar.extract(line).unwrap();
        assert_eq!(extracted.timestamp_ms, 19810091);
        let EventBody::ParallelScavenge(pause) = extracted.body else {
            panic!("wrong body");
        };
        assert_eq!(pause.duration_ms, 23);
        assert_eq!(pause.young, Region::new(27808, 632, 28032));
        assert_eq!(pause.combined, Region::new(160183, 133159, 585088));
    }
}
