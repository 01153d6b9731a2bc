use std::sync::OnceLock;

use regex::RegexSet;

fn application_logging_set() -> &'static RegexSet {
    static APPLICATION_LOGGING: OnceLock<RegexSet> = OnceLock::new();
    APPLICATION_LOGGING.get_or_init(|| {
        RegexSet::new([
            // log4j style: `2010-03-25 17:00:20,769 WARN ...`, date optional
            r"^([0-9]{4}-[0-9]{2}-[0-9]{2} )?[0-9]{2}:[0-9]{2}:[0-9]{2},[0-9]{3} (DEBUG|ERROR|FATAL|INFO|TRACE|WARN) .*$",
            r"^(java|com|org).*(Exception|Error).*$",
            r"^ORA-[0-9]{1,6}.*$",
            r"^\tat (java|com|org|oracle).*$",
            r"^Caused by: (java|com|org|oracle).*$",
            r"^\t\.\.\. [0-9]{1,3} more$",
        ])
        .expect("valid application logging regex set")
    })
}

/// Stage 2: application output interleaved into the GC log by a shared
/// stdout. Matching lines are dropped before merging.
pub fn is_application_logging(line: &str) -> bool {
    application_logging_set().is_match(line)
}
