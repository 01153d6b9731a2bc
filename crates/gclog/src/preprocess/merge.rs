//! Multi-line merge.
//!
//! Some collectors split one logical event across several physical lines:
//! - `[GC ... [ParNew` headers interrupted by `-XX:+PrintTenuringDistribution`
//!   output or by a concurrent CMS phase message
//! - `[Times: ...]` blocks written on the line after the event they time
//!
//! Each [`MergeRule`] recognizes an opening shape and decides, line by line,
//! whether the buffered head continues. At most one head is pending.

use std::collections::VecDeque;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, trace};

use super::{CanonicalRecord, LineRange, LogLine};
use crate::conf::MergeConfig;
use crate::metrics::PipelineMetrics;

/// What a rule makes of the line after a buffered head.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Continuation {
    /// Interstitial line; swallowed while the head stays pending.
    Absorb,
    /// Merged text of head and this line.
    Complete(String),
    /// Not a continuation; the head is released unmerged.
    Mismatch,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Opening {
    pub head: String,
    /// Text glued onto the header that belongs to another event.
    pub detached: Option<String>,
}

pub(crate) trait MergeRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn open(&self, line: &str) -> Option<Opening>;
    fn continues(&self, head: &str, line: &str) -> Continuation;
}

// ─── par_new_split ───────────────────────────────────────────────

fn par_new_header_re() -> &'static Regex {
    static PAR_NEW_HEADER_RE: OnceLock<Regex> = OnceLock::new();
    PAR_NEW_HEADER_RE.get_or_init(|| {
        Regex::new(
            r"^(?P<head>[0-9]{1,10}\.[0-9]{3}: \[GC(?: \([^)]+\))? (?:[0-9]{1,10}\.[0-9]{3}: )?\[ParNew)(?P<embedded>[0-9]{1,10}\.[0-9]{3}: \[CMS-concurrent-.+?)?\s*$",
        )
        .expect("valid ParNew header regex")
    })
}

fn tenuring_re() -> &'static Regex {
    static TENURING_RE: OnceLock<Regex> = OnceLock::new();
    TENURING_RE.get_or_init(|| {
        Regex::new(
            r"^(?:Desired survivor size [0-9]+ bytes, new threshold [0-9]+ \(max [0-9]+\)|- age +[0-9]+: +[0-9]+ bytes, +[0-9]+ total)\s*$",
        )
        .expect("valid tenuring distribution regex")
    })
}

fn par_new_closer_re() -> &'static Regex {
    static PAR_NEW_CLOSER_RE: OnceLock<Regex> = OnceLock::new();
    PAR_NEW_CLOSER_RE.get_or_init(|| {
        Regex::new(r"^: [0-9]+[BKMG]->[0-9]+[BKMG]\([0-9]+[BKMG]\), [0-9]+\.[0-9]+ secs\] .+$")
            .expect("valid ParNew closer regex")
    })
}

/// `[GC [ParNew` cut off at end of line, completed by a `: young->...` line.
pub(crate) struct ParNewSplitRule;

impl MergeRule for ParNewSplitRule {
    fn name(&self) -> &'static str {
        "par_new_split"
    }

    fn open(&self, line: &str) -> Option<Opening> {
        let caps = par_new_header_re().captures(line)?;
        Some(Opening {
            head: caps.name("head")?.as_str().to_string(),
            detached: caps.name("embedded").map(|m| m.as_str().to_string()),
        })
    }

    fn continues(&self, head: &str, line: &str) -> Continuation {
        if par_new_closer_re().is_match(line) {
            Continuation::Complete(format!("{head}{}", line.trim_end()))
        } else if tenuring_re().is_match(line) {
            Continuation::Absorb
        } else {
            Continuation::Mismatch
        }
    }
}

// ─── times_block ─────────────────────────────────────────────────

fn untimed_event_re() -> &'static Regex {
    static UNTIMED_EVENT_RE: OnceLock<Regex> = OnceLock::new();
    UNTIMED_EVENT_RE.get_or_init(|| {
        Regex::new(r"^[0-9]{1,10}\.[0-9]{3}: \[.*secs\]\s*$").expect("valid untimed event regex")
    })
}

fn times_block_re() -> &'static Regex {
    static TIMES_BLOCK_RE: OnceLock<Regex> = OnceLock::new();
    TIMES_BLOCK_RE.get_or_init(|| {
        Regex::new(r"^\s*\[Times: user=[0-9]+\.[0-9]+ sys=[0-9]+\.[0-9]+, real=[0-9]+\.[0-9]+ secs\]\s*$")
            .expect("valid times block regex")
    })
}

/// A GC line whose `[Times: ...]` block landed on the next line.
pub(crate) struct TimesBlockRule;

impl MergeRule for TimesBlockRule {
    fn name(&self) -> &'static str {
        "times_block"
    }

    fn open(&self, line: &str) -> Option<Opening> {
        if line.contains("[Times:") || !untimed_event_re().is_match(line) {
            return None;
        }
        Some(Opening {
            head: line.to_string(),
            detached: None,
        })
    }

    fn continues(&self, head: &str, line: &str) -> Continuation {
        if times_block_re().is_match(line) {
            Continuation::Complete(format!("{} {}", head.trim_end(), line.trim()))
        } else {
            Continuation::Mismatch
        }
    }
}

// ─── Merger ──────────────────────────────────────────────────────

struct Pending {
    rule: usize,
    head: LogLine,
    absorbed: Vec<LogLine>,
}

/// Stage 3: joins split records using the registered rules.
pub struct Merger {
    // Order matters: the first rule whose opener matches owns the line.
    rules: Vec<Box<dyn MergeRule>>,
    pending: Option<Pending>,
    enabled: bool,
    max_interstitial_lines: usize,
    metrics: Arc<PipelineMetrics>,
}

impl Merger {
    pub fn new(config: &MergeConfig, metrics: Arc<PipelineMetrics>) -> Self {
        Self {
            rules: vec![Box::new(ParNewSplitRule), Box::new(TimesBlockRule)],
            pending: None,
            enabled: config.enabled,
            max_interstitial_lines: config.max_interstitial_lines,
            metrics,
        }
    }

    /// Feed one line. Finished records are appended to `out`. A returned
    /// line did not continue the pending head and must be fed again.
    pub fn push(&mut self, line: LogLine, out: &mut VecDeque<CanonicalRecord>) -> Option<LogLine> {
        if !self.enabled {
            out.push_back(line.into());
            return None;
        }

        let Some(mut pending) = self.pending.take() else {
            self.open_or_emit(line, out);
            return None;
        };

        let rule = &self.rules[pending.rule];
        match rule.continues(&pending.head.text, &line.text) {
            Continuation::Complete(text) => {
                trace!(rule = rule.name(), first = pending.head.number, last = line.number, "Merged split record");
                self.metrics.record_merged(pending.absorbed.len());
                out.push_back(CanonicalRecord {
                    text,
                    lines: LineRange::new(pending.head.number, line.number),
                });
                None
            }
            Continuation::Absorb if pending.absorbed.len() < self.max_interstitial_lines => {
                pending.absorbed.push(line);
                self.pending = Some(pending);
                None
            }
            Continuation::Absorb | Continuation::Mismatch => {
                trace!(
                    rule = rule.name(),
                    line = pending.head.number,
                    absorbed = pending.absorbed.len(),
                    "No continuation, releasing head unmerged"
                );
                self.release(pending, out);
                Some(line)
            }
        }
    }

    /// End of input: a pending head is released unmerged.
    pub fn finish(&mut self, out: &mut VecDeque<CanonicalRecord>) {
        if let Some(pending) = self.pending.take() {
            debug!(line = pending.head.number, "Input ended mid-merge, releasing head unmerged");
            self.release(pending, out);
        }
    }

    fn open_or_emit(&mut self, line: LogLine, out: &mut VecDeque<CanonicalRecord>) {
        for (index, rule) in self.rules.iter().enumerate() {
            if let Some(opening) = rule.open(&line.text) {
                if let Some(detached) = opening.detached {
                    trace!(rule = rule.name(), line = line.number, "Split glued concurrent message off header");
                    out.push_back(CanonicalRecord::single(line.number, detached));
                }
                self.pending = Some(Pending {
                    rule: index,
                    head: LogLine {
                        number: line.number,
                        text: opening.head,
                    },
                    absorbed: Vec::new(),
                });
                return;
            }
        }
        out.push_back(line.into());
    }

    fn release(&self, pending: Pending, out: &mut VecDeque<CanonicalRecord>) {
        self.metrics.record_unmerged();
        out.push_back(pending.head.into());
        out.extend(pending.absorbed.into_iter().map(CanonicalRecord::from));
    }
}
