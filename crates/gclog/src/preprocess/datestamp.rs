use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::codec::{elapsed_since, format_timestamp, parse_datestamp, seconds_to_millis, Instant};
use crate::metrics::PipelineMetrics;

fn datestamp_re() -> &'static Regex {
    static DATESTAMP_RE: OnceLock<Regex> = OnceLock::new();
    DATESTAMP_RE.get_or_init(|| {
        Regex::new(
            r"(?P<datestamp>[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]{3}(?:[-+][0-9]{4}|[-+][0-9]{2}:[0-9]{2})): (?:(?P<timestamp>[0-9]{1,10}\.[0-9]{3}): )?",
        )
        .expect("valid datestamp regex")
    })
}

/// Stage 1: replaces absolute `-XX:+PrintGCDateStamps` prefixes with
/// relative JVM uptime stamps.
///
/// A datestamp followed by its own uptime stamp is simply removed. A bare
/// datestamp becomes the milliseconds elapsed since the JVM start instant,
/// formatted the way the JVM prints uptime.
pub struct DateStampRewriter {
    start: Option<Instant>,
    metrics: Arc<PipelineMetrics>,
}

impl DateStampRewriter {
    pub fn new(start: Option<Instant>, metrics: Arc<PipelineMetrics>) -> Self {
        Self { start, metrics }
    }

    pub fn rewrite<'a>(&mut self, line: &'a str) -> Cow<'a, str> {
        let re = datestamp_re();
        if !re.is_match(line) {
            return Cow::Borrowed(line);
        }
        re.replace_all(line, |caps: &Captures<'_>| self.replacement(caps))
    }

    fn replacement(&mut self, caps: &Captures<'_>) -> String {
        let literal = &caps["datestamp"];
        let at = match parse_datestamp(literal) {
            Ok(at) => at,
            Err(e) => {
                debug!(error = %e, "Leaving unparseable datestamp in place");
                return caps[0].to_string();
            }
        };

        if let Some(uptime) = caps.name("timestamp") {
            if self.start.is_none() {
                self.start = anchor(&at, uptime.as_str());
            }
            self.metrics.record_datestamp(false);
            return format!("{}: ", uptime.as_str());
        }

        let start = *self.start.get_or_insert_with(|| {
            debug!(jvm_start = %at, "Anchoring JVM start on first datestamp");
            at
        });
        let saturated = at < start;
        if saturated {
            warn!(datestamp = literal, jvm_start = %start, "Datestamp precedes JVM start, clamping to 0");
        }
        self.metrics.record_datestamp(saturated);
        format!("{}: ", format_timestamp(elapsed_since(&start, &at)))
    }
}

/// JVM start implied by a datestamp and the uptime printed next to it.
fn anchor(at: &Instant, uptime: &str) -> Option<Instant> {
    let uptime_ms = i64::try_from(seconds_to_millis(uptime).ok()?).ok()?;
    let start = at.checked_sub_signed(chrono::Duration::try_milliseconds(uptime_ms)?)?;
    debug!(jvm_start = %start, "Anchoring JVM start on first datestamp and uptime");
    Some(start)
}
