//! Canonical records to typed events.
//!
//! Classification is total: every record yields exactly one [`Event`], with
//! [`EventBody::Unknown`](crate::event::EventBody::Unknown) as the fallback.

use std::sync::Arc;

use tracing::{error, trace};

use crate::catalog::{EventCatalog, ExtractError};
use crate::event::Event;
use crate::metrics::PipelineMetrics;
use crate::preprocess::CanonicalRecord;

/// How a record was classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Matched { grammar: &'static str },
    Unrecognized,
    /// A grammar recognized the text but could not extract from it.
    ContractViolation { grammar: &'static str, error: ExtractError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub event: Event,
    pub outcome: Outcome,
}

impl EventCatalog {
    pub fn classify(&self, record: &CanonicalRecord) -> Event {
        self.classify_with_outcome(record).event
    }

    pub fn classify_with_outcome(&self, record: &CanonicalRecord) -> Classification {
        let Some(grammar) = self.recognize(&record.text) else {
            trace!(line = record.lines.first, "Unrecognized record");
            return Classification {
                event: Event::unknown(record),
                outcome: Outcome::Unrecognized,
            };
        };

        match grammar.extract(&record.text) {
            Ok(extracted) => Classification {
                event: Event::new(record, extracted.timestamp_ms, extracted.body),
                outcome: Outcome::Matched {
                    grammar: grammar.name(),
                },
            },
            Err(e) => {
                error!(
                    grammar = grammar.name(),
                    first_line = record.lines.first,
                    last_line = record.lines.last,
                    error = %e,
                    text = %record.text,
                    "Grammar recognized a record it cannot extract"
                );
                Classification {
                    event: Event::unknown(record),
                    outcome: Outcome::ContractViolation {
                        grammar: grammar.name(),
                        error: e,
                    },
                }
            }
        }
    }
}

/// Classify against the built-in catalog.
pub fn classify(record: &CanonicalRecord) -> Event {
    EventCatalog::global().classify(record)
}

/// Lazily classifies a record stream.
pub struct Events<I> {
    records: I,
    catalog: &'static EventCatalog,
    metrics: Arc<PipelineMetrics>,
}

impl<I> Events<I>
where
    I: Iterator<Item = CanonicalRecord>,
{
    pub fn new(records: I, metrics: Arc<PipelineMetrics>) -> Self {
        Self::with_catalog(records, EventCatalog::global(), metrics)
    }

    pub fn with_catalog(records: I, catalog: &'static EventCatalog, metrics: Arc<PipelineMetrics>) -> Self {
        Self {
            records,
            catalog,
            metrics,
        }
    }
}

impl<I> Iterator for Events<I>
where
    I: Iterator<Item = CanonicalRecord>,
{
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        let record = self.records.next()?;
        let Classification { event, outcome } = self.catalog.classify_with_outcome(&record);
        if let Outcome::ContractViolation { .. } = outcome {
            self.metrics.record_contract_violation();
        }
        self.metrics.record_event(event.kind());
        Some(event)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EventGrammar, Extracted};
    use crate::event::{CmsPhase, EventBody, EventKind, Region};
    use proptest::prelude::*;

    fn record(text: &str) -> CanonicalRecord {
        CanonicalRecord::single(1, text.to_string())
    }

    /// Recognizes everything and never extracts.
    struct Greedy;

    impl EventGrammar for Greedy {
        fn name(&self) -> &'static str {
            "greedy"
        }
        fn kind(&self) -> EventKind {
            EventKind::G1Remark
        }
        fn recognize(&self, _text: &str) -> bool {
            true
        }
        fn extract(&self, _text: &str) -> Result<Extracted, ExtractError> {
            Err(ExtractError::ShapeMismatch { grammar: "greedy" })
        }
    }

    #[test]
    fn test_scenario_concurrent_mark_start() {
        let event = classify(&record("251.781: [CMS-concurrent-mark-start]"));
        assert_eq!(event.kind(), EventKind::CmsConcurrentStart);
        assert_eq!(event.phase(), Some(CmsPhase::Mark));
        assert_eq!(event.timestamp_ms, 251781);
        assert_eq!(event.duration_ms(), None);
    }

    #[test]
    fn test_g1_full_gc_fields() {
        let event = classify(&record(
            "5060.152: [Full GC (System.gc()) 2270M->2038M(3398M), 5.8360430 secs]",
        ));
        assert_eq!(event.kind(), EventKind::G1FullGc);
        assert_eq!(event.trigger(), Some("System.gc()"));
        assert_eq!(event.combined(), Some(Region::new(2270 * 1024, 2038 * 1024, 3398 * 1024)));
        assert_eq!(event.duration_ms(), Some(5836));
        assert!(event.is_blocking());
    }

    #[test]
    fn test_outcome_names_grammar() {
        let classification = EventCatalog::global()
            .classify_with_outcome(&record("106.129: [GC remark, 0.0450170 secs]"));
        assert_eq!(classification.outcome, Outcome::Matched { grammar: "g1_remark" });
    }

    #[test]
    fn test_unknown_preserves_text_exactly() {
        let text = "  weird \t line with [brackets] and 1.0 secs]  ";
        let classification = EventCatalog::global().classify_with_outcome(&record(text));
        assert_eq!(classification.outcome, Outcome::Unrecognized);
        assert_eq!(classification.event.raw_text, text);
        assert_eq!(classification.event.body, EventBody::Unknown);
        assert_eq!(classification.event.timestamp_ms, 0);
    }

    #[test]
    fn test_non_ascii_digits_are_unrecognized() {
        for text in [
            "١٠٦.١٢٩: [GC remark, 0.0450170 secs]",
            "106.129: [GC remark, ٠.٠٤٥٠١٧٠ secs]",
            "٢٥١.٧٨١: [CMS-concurrent-mark-start]",
            "5060.152: [Full GC (System.gc()) ٢٢٧٠M->2038M(3398M), 5.8360430 secs]",
        ] {
            let classification = EventCatalog::global().classify_with_outcome(&record(text));
            assert_eq!(classification.outcome, Outcome::Unrecognized, "{text}");
            assert_eq!(classification.event.raw_text, text);
        }
    }

    #[test]
    fn test_contract_violation_degrades_to_unknown() {
        let catalog = EventCatalog::with_grammars(vec![Box::new(Greedy)]);
        let classification = catalog.classify_with_outcome(&record("anything"));
        assert_eq!(classification.event.kind(), EventKind::Unknown);
        assert_eq!(
            classification.outcome,
            Outcome::ContractViolation {
                grammar: "greedy",
                error: ExtractError::ShapeMismatch { grammar: "greedy" },
            }
        );
    }

    #[test]
    fn test_events_counts_contract_violations() {
        let catalog: &'static EventCatalog =
            Box::leak(Box::new(EventCatalog::with_grammars(vec![Box::new(Greedy)])));
        let metrics = Arc::new(PipelineMetrics::new());
        let events: Vec<_> = Events::with_catalog(
            vec![record("a"), record("b")].into_iter(),
            catalog,
            Arc::clone(&metrics),
        )
        .collect();

        assert_eq!(events.len(), 2);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.contract_violations, 2);
        assert_eq!(snapshot.unknown_events, 2);
    }

    #[test]
    fn test_scenario_abortable_preclean_pair() {
        let metrics = Arc::new(PipelineMetrics::new());
        let events: Vec<_> = Events::new(
            vec![
                CanonicalRecord::single(1, "32627.513: [CMS-concurrent-abortable-preclean-start]".to_string()),
                CanonicalRecord::single(
                    2,
                    "CMS: abort preclean due to time 32633.935: [CMS-concurrent-abortable-preclean: 0.622/5.054 secs] [Times: user=2.42 sys=0.01, real=5.05 secs]".to_string(),
                ),
            ]
            .into_iter(),
            metrics,
        )
        .collect();

        let kinds: Vec<_> = events.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, [EventKind::CmsConcurrentStart, EventKind::CmsConcurrent]);
        assert_eq!(events[0].phase(), Some(CmsPhase::AbortablePreclean));
        assert_eq!(events[1].duration_ms(), Some(5054));
        assert!(events[0].timestamp_ms < events[1].timestamp_ms);
    }

    proptest! {
        #[test]
        fn classification_is_total(text in "\\PC{0,120}") {
            let event = classify(&record(&text));
            prop_assert_eq!(event.raw_text, text);
        }

        #[test]
        fn unknown_carries_no_data(text in "[a-z ]{0,60}") {
            let event = classify(&record(&text));
            prop_assert_eq!(event.kind(), EventKind::Unknown);
            prop_assert_eq!(event.duration_ms(), None);
            prop_assert_eq!(event.timestamp_ms, 0);
        }
    }
}
