//! `-verbose:gc` summaries without `-XX:+PrintGCDetails`.

use crate::catalog::fragments::{duration, prefix, tail, transition, TRIGGER};
use crate::catalog::grammar::RegexGrammar;
use crate::catalog::traits::Extracted;
use crate::event::{CombinedPause, EventBody, EventKind};

/// `[Full GC before->after(capacity), N secs]`
pub(crate) fn verbose_gc_old() -> Result<RegexGrammar, regex::Error> {
    let pattern = format!(
        r"{}\[Full GC(?: {TRIGGER})? {}, {}\]{}",
        prefix(),
        transition("combined"),
        duration(),
        tail(),
    );
    RegexGrammar::new("verbose_gc_old", EventKind::VerboseGcOld, &pattern, |fields| {
        Ok(Extracted {
            timestamp_ms: fields.timestamp()?,
            body: EventBody::VerboseGcOld(CombinedPause {
                duration_ms: fields.duration()?,
                trigger: fields.trigger(),
                combined: fields.region("combined")?,
            }),
        })
    })
}

/// `[GC before->after(capacity), N secs]`. Some JVMs drop the closing bracket.
pub(crate) fn verbose_gc_young() -> Result<RegexGrammar, regex::Error> {
    let pattern = format!(
        r"{}\[GC(?: {TRIGGER})? {}, {}\]?{}",
        prefix(),
        transition("combined"),
        duration(),
        tail(),
    );
    RegexGrammar::new("verbose_gc_young", EventKind::VerboseGcYoung, &pattern, |fields| {
        Ok(Extracted {
            timestamp_ms: fields.timestamp()?,
            body: EventBody::VerboseGcYoung(CombinedPause {
                duration_ms: fields.duration()?,
                trigger: fields.trigger(),
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

    #[test]
    fn test_old() {
        let extracted = verbose_gc_old()
            .unwrap()
            .extract("2.847: [Full GC 48235K->43523K(80064K), 0.2145290 secs]")
            .unwrap();
        assert_eq!(extracted.timestamp_ms, 2847);
        let EventBody::VerboseGcOld(pause) = extracted.body else {
            panic!("wrong body");
        };
        assert_eq!(pause.duration_ms, 215);
        assert_eq!(pause.combined, Region::new(48235, 43523, 80064));
        assert_eq!(pause.trigger, None);
    }

    #[test]
    fn test_young() {
        let extracted = verbose_gc_young()
            .unwrap()
            .extract("2205570.508: [GC 1726387K->773247K(3097984K), 0.2318035 secs]")
            .unwrap();
        assert_eq!(extracted.timestamp_ms, 2205570508);
        let EventBody::VerboseGcYoung(pause) = extracted.body else {
            panic!("wrong body");
        };
        assert_eq!(pause.duration_ms, 232);
        assert_eq!(pause.combined, Region::new(1726387, 773247, 3097984));
    }

    #[test]
    fn test_young_missing_bracket() {
        assert!(verbose_gc_young()
            .unwrap()
            .recognize("2205570.508: [GC 1726387K->773247K(3097984K), 0.2318035 secs"));
    }

    #[test]
    fn test_young_does_not_take_detailed_lines() {
        let young = verbose_gc_young().unwrap();
        assert!(!young.recognize("19810.091: [GC [PSYoungGen: 27808K->632K(28032K)] 160183K->133159K(585088K), 0.0225213 secs]"));
        assert!(!young.recognize("1113.145: [GC pause (young) 849M->583M(968M), 0.0392710 secs]"));
    }
}
