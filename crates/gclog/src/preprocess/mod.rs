//! Preprocessing pipeline: raw log lines in, canonical single-line records out.
//!
//! Stages run in a fixed order for every line:
//! 1. datestamp rewriting ([`DateStampRewriter`])
//! 2. interleaved application-log removal ([`is_application_logging`])
//! 3. multi-line merge ([`Merger`])
//!
//! A line rejected by a pending merge is fed through all three stages again.

mod applog;
mod datestamp;
mod merge;

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use crate::conf::{ConfigError, EngineConfig};
use crate::metrics::PipelineMetrics;

pub use applog::is_application_logging;
pub use datestamp::DateStampRewriter;
pub use merge::Merger;

/// One raw input line. `number` is 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub number: usize,
    pub text: String,
}

/// Inclusive range of raw line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineRange {
    pub first: usize,
    pub last: usize,
}

impl LineRange {
    pub fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    pub fn single(number: usize) -> Self {
        Self::new(number, number)
    }
}

/// A logically complete GC occurrence on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRecord {
    pub text: String,
    pub lines: LineRange,
}

impl CanonicalRecord {
    pub fn single(number: usize, text: String) -> Self {
        Self {
            text,
            lines: LineRange::single(number),
        }
    }
}

impl From<LogLine> for CanonicalRecord {
    fn from(line: LogLine) -> Self {
        Self::single(line.number, line.text)
    }
}

/// Pull-based preprocessing over any line source.
pub struct Preprocessor<I> {
    lines: I,
    line_count: usize,
    rewriter: Option<DateStampRewriter>,
    drop_application_logging: bool,
    merger: Merger,
    ready: VecDeque<CanonicalRecord>,
    requeued: Option<LogLine>,
    finished: bool,
    metrics: Arc<PipelineMetrics>,
}

impl<I> Preprocessor<I>
where
    I: Iterator<Item = String>,
{
    pub fn new(lines: I, config: &EngineConfig, metrics: Arc<PipelineMetrics>) -> Result<Self, ConfigError> {
        let rewriter = if config.rewrite_datestamps {
            Some(DateStampRewriter::new(config.jvm_start_instant()?, Arc::clone(&metrics)))
        } else {
            None
        };

        Ok(Self {
            lines,
            line_count: 0,
            rewriter,
            drop_application_logging: config.drop_application_logging,
            merger: Merger::new(&config.merge, Arc::clone(&metrics)),
            ready: VecDeque::new(),
            requeued: None,
            finished: false,
            metrics,
        })
    }

    fn next_line(&mut self) -> Option<LogLine> {
        if let Some(line) = self.requeued.take() {
            return Some(line);
        }
        let text = self.lines.next()?;
        self.line_count += 1;
        self.metrics.record_line_read();
        Some(LogLine {
            number: self.line_count,
            text,
        })
    }

    fn process(&mut self, mut line: LogLine) {
        if let Some(rewriter) = self.rewriter.as_mut() {
            let rewritten = rewriter.rewrite(&line.text).into_owned();
            line.text = rewritten;
        }

        if self.drop_application_logging && is_application_logging(&line.text) {
            trace!(line = line.number, "Dropping application logging");
            self.metrics.record_app_logging_dropped();
            return;
        }

        self.requeued = self.merger.push(line, &mut self.ready);
    }
}

impl<I> Iterator for Preprocessor<I>
where
    I: Iterator<Item = String>,
{
    type Item = CanonicalRecord;

    fn next(&mut self) -> Option<CanonicalRecord> {
        loop {
            if let Some(record) = self.ready.pop_front() {
                self.metrics.record_emitted();
                return Some(record);
            }
            if self.finished {
                return None;
            }
            match self.next_line() {
                Some(line) => self.process(line),
                None => {
                    self.merger.finish(&mut self.ready);
                    self.finished = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn preprocess(config: &EngineConfig, lines: &[&str]) -> (Vec<CanonicalRecord>, Arc<PipelineMetrics>) {
        let metrics = Arc::new(PipelineMetrics::new());
        let source = lines.iter().map(|l| l.to_string()).collect::<Vec<_>>().into_iter();
        let records = Preprocessor::new(source, config, Arc::clone(&metrics))
            .unwrap()
            .collect();
        (records, metrics)
    }

    fn texts(records: &[CanonicalRecord]) -> Vec<&str> {
        records.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn test_application_logging_is_suppressed() {
        let (records, metrics) = preprocess(
            &EngineConfig::default(),
            &[
                "251.763: [GC [1 CMS-initial-mark: 4133273K(8218240K)] 4150346K(8367360K), 0.0174433 secs]",
                "2010-03-25 17:00:20,769 WARN something",
                "251.781: [CMS-concurrent-mark-start]",
            ],
        );
        assert_eq!(
            texts(&records),
            [
                "251.763: [GC [1 CMS-initial-mark: 4133273K(8218240K)] 4150346K(8367360K), 0.0174433 secs]",
                "251.781: [CMS-concurrent-mark-start]",
            ]
        );
        assert_eq!(records[1].lines, LineRange::single(3));
        assert_eq!(metrics.snapshot().app_logging_dropped, 1);
    }

    #[test]
    fn test_application_logging_kept_when_disabled() {
        let config = EngineConfig {
            drop_application_logging: false,
            ..EngineConfig::default()
        };
        let (records, _) = preprocess(&config, &["2010-03-25 17:00:20,769 WARN something"]);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_datestamps_rewritten_before_merge() {
        let (records, _) = preprocess(
            &EngineConfig::default(),
            &[
                "2010-04-16T12:11:18.979+0200: 84.335: [GC 2010-04-16T12:11:18.979+0200: 84.335: [ParNew",
                "Desired survivor size 2228224 bytes, new threshold 1 (max 15)",
                ": 273152K->858K(341376K), 0.0030008 secs] 273152K->858K(980352K), 0.0031183 secs]",
            ],
        );
        assert_eq!(
            texts(&records),
            ["84.335: [GC 84.335: [ParNew: 273152K->858K(341376K), 0.0030008 secs] 273152K->858K(980352K), 0.0031183 secs]"]
        );
        assert_eq!(records[0].lines, LineRange::new(1, 3));
    }

    #[test]
    fn test_datestamps_kept_when_rewriting_disabled() {
        let config = EngineConfig {
            rewrite_datestamps: false,
            ..EngineConfig::default()
        };
        let line = "2010-02-26T08:31:51.990-0600: [Full GC (System.gc()) 2270M->2038M(3398M), 5.8360430 secs]";
        let (records, _) = preprocess(&config, &[line]);
        assert_eq!(texts(&records), [line]);
    }

    #[test]
    fn test_invalid_jvm_start_is_config_error() {
        let config = EngineConfig {
            jvm_start: Some("not a date".to_string()),
            ..EngineConfig::default()
        };
        let result = Preprocessor::new(std::iter::empty(), &config, Arc::new(PipelineMetrics::new()));
        assert!(matches!(result, Err(ConfigError::JvmStart(_))));
    }

    #[test]
    fn test_empty_input() {
        let (records, metrics) = preprocess(&EngineConfig::default(), &[]);
        assert!(records.is_empty());
        assert_eq!(metrics.snapshot().lines_read, 0);
    }

    #[test]
    fn test_counts_lines_and_records() {
        let (records, metrics) = preprocess(
            &EngineConfig::default(),
            &["a", "b", "\tat java.lang.Thread.run(Thread.java:619)", "c"],
        );
        assert_eq!(records.len(), 3);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.lines_read, 4);
        assert_eq!(snapshot.records_emitted, 3);
    }

    fn gc_line() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("251.781: [CMS-concurrent-mark-start]".to_string()),
            Just("106.129: [GC remark, 0.0450170 secs]".to_string()),
            Just(" [Times: user=0.01 sys=0.00, real=0.01 secs]".to_string()),
            Just("1.219: [GC 1.219: [ParNew".to_string()),
            Just("- age   1:    2054880 bytes,    2054880 total".to_string()),
            Just(": 17024K->2112K(19136K), 0.0222560 secs] 17024K->3046K(83008K), 0.0223810 secs]".to_string()),
            Just("2010-03-25 17:00:20,769 WARN something".to_string()),
            "[ -~]{0,40}",
        ]
    }

    proptest! {
        #[test]
        fn records_come_out_in_line_order(lines in prop::collection::vec(gc_line(), 0..40)) {
            let metrics = Arc::new(PipelineMetrics::new());
            let records: Vec<_> = Preprocessor::new(lines.into_iter(), &EngineConfig::default(), metrics)
                .unwrap()
                .collect();
            for pair in records.windows(2) {
                prop_assert!(pair[0].lines.first <= pair[1].lines.first);
            }
            for record in &records {
                prop_assert!(record.lines.first <= record.lines.last);
            }
        }

        #[test]
        fn every_kept_line_is_accounted_for(lines in prop::collection::vec(gc_line(), 0..40)) {
            let config = EngineConfig {
                merge: crate::conf::MergeConfig { enabled: false, max_interstitial_lines: 32 },
                ..EngineConfig::default()
            };
            let expected = lines.iter().filter(|l| !is_application_logging(l)).count();
            let metrics = Arc::new(PipelineMetrics::new());
            let records = Preprocessor::new(lines.into_iter(), &config, metrics).unwrap().count();
            prop_assert_eq!(records, expected);
        }
    }
}
