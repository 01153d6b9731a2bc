use crate::catalog::fragments::{duration, inner_timestamp, prefix, tail, transition, SECONDS, TRIGGER};
use crate::catalog::grammar::RegexGrammar;
use crate::catalog::traits::Extracted;
use crate::event::{EventBody, EventKind, YoungPause};

/// Young collection by the parallel copying collector paired with CMS:
/// `[GC [ParNew: young, N secs] combined, N secs]`. The reported duration is
/// the outer one.
pub(crate) fn par_new() -> Result<RegexGrammar, regex::Error> {
    let pattern = format!(
        r"{}\[GC(?: {TRIGGER})? {}\[ParNew: {}, {SECONDS} secs\] {}, {}\]{}",
        prefix(),
        inner_timestamp(),
        transition("young"),
        transition("combined"),
        duration(),
        tail(),
    );
    RegexGrammar::new("par_new", EventKind::ParNew, &pattern, |fields| {
        Ok(Extracted {
            timestamp_ms: fields.timestamp()?,
            body: EventBody::ParNew(YoungPause {
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

    #[test]
    fn test_par_new() {
        let line = "142.973: [GC 142.973: [ParNew: 150784K->3817K(169600K), 0.0328800 secs] 150784K->3817K(1029760K), 0.0329790 secs]";
        let extracted = par_new().unwrap().extract(line).unwrap();
        assert_eq!(extracted.timestamp_ms, 142973);
        let EventBody::ParNew(pause) = extracted.body else {
            panic!("wrong body");
        };
        assert_eq!(pause.duration_ms, 33);
        assert_eq!(pause.young, Region::new(150784, 3817, 169600));
        assert_eq!(pause.combined, Region::new(150784, 3817, 1029760));
        assert_eq!(pause.trigger, None);
    }

    #[test]
    fn test_par_new_without_inner_timestamp() {
        let line = "142.973: [GC [ParNew: 150784K->3817K(169600K), 0.0328800 secs] 150784K->3817K(1029760K), 0.0329790 secs]";
        assert!(par_new().unwrap().recognize(line));
    }

    #[test]
    fn test_par_new_with_trigger_and_times() {
        let line = "4.321: [GC (Allocation Failure) 4.321: [ParNew: 78656K->8704K(78656K), 0.0213810 secs] 82106K->16190K(253440K), 0.0215080 secs] [Times: user=0.05 sys=0.01, real=0.02 secs]";
        let extracted = par_new().unwrap().extract(line).unwrap();
        assert_eq!(extracted.body.kind(), EventKind::ParNew);
        let EventBody::ParNew(pause) = extracted.body else {
            panic!("wrong body");
        };
        assert_eq!(pause.trigger.as_deref(), Some("Allocation Failure"));
        assert_eq!(pause.duration_ms, 22);
    }

    #[test]
    fn test_split_header_alone_is_not_par_new() {
        assert!(!par_new().unwrap().recognize("1.219: [GC 1.219: [ParNew"));
    }
}
