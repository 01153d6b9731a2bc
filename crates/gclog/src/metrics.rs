use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::event::EventKind;

/// Forces the wrapped counter group onto its own cache line, so pipelines
/// running on different threads do not contend on one line.
///
/// Each group below is written by a different stage. Grouping them per
/// stage keeps counters updated together on the same line and counters
/// updated by other stages off it.
#[repr(align(64))]
#[derive(Debug, Default)]
pub struct CacheAligned<T>(pub T);

/// Raw line intake, stage 1 and stage 2 (hot path, updated per raw line)
#[derive(Debug, Default)]
pub struct LineMetrics {
    /// Lines pulled from the source, before any stage.
    pub read: AtomicU64,
    /// Interleaved application logging removed by stage 2.
    pub app_logging_dropped: AtomicU64,
    /// Absolute datestamps replaced by uptime stamps.
    pub datestamps_rewritten: AtomicU64,
    /// Rewritten datestamps that preceded the JVM start and became `0.000`.
    /// Always counted in `datestamps_rewritten` too.
    pub datestamps_saturated: AtomicU64,
}

/// Stage 3 outcomes and canonical record output (updated per record)
#[derive(Debug, Default)]
pub struct MergeMetrics {
    /// Canonical records handed to the classifier.
    pub records_emitted: AtomicU64,
    /// Split records joined into one.
    pub merged: AtomicU64,
    /// Interstitial lines consumed by successful merges.
    pub absorbed: AtomicU64,
    /// Openers released on their own, by mismatch or end of input.
    pub unmerged: AtomicU64,
}

/// Classifier outcomes (updated per event)
#[derive(Debug)]
pub struct ClassifyMetrics {
    /// Events produced, `Unknown` included.
    pub events: AtomicU64,
    /// Records a grammar recognized but could not extract. Each also counts
    /// as an `Unknown` event.
    pub contract_violations: AtomicU64,
    /// Per-kind totals, indexed by [`EventKind::index`].
    pub by_kind: [AtomicU64; EventKind::ALL.len()],
}

impl Default for ClassifyMetrics {
    fn default() -> Self {
        Self {
            events: AtomicU64::new(0),
            contract_violations: AtomicU64::new(0),
            by_kind: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }
}

/// Diagnostic counters for one or more pipelines.
///
/// Shared as `Arc<PipelineMetrics>` when several inputs are scanned in
/// parallel. Every update is `Relaxed`; a snapshot may tear across groups.
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    pub lines: CacheAligned<LineMetrics>,
    pub merge: CacheAligned<MergeMetrics>,
    pub classify: CacheAligned<ClassifyMetrics>,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_line_read(&self) {
        self.lines.0.read.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_app_logging_dropped(&self) {
        self.lines.0.app_logging_dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_datestamp(&self, saturated: bool) {
        self.lines.0.datestamps_rewritten.fetch_add(1, Ordering::Relaxed);
        if saturated {
            self.lines.0.datestamps_saturated.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn record_emitted(&self) {
        self.merge.0.records_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// A completed merge that consumed `absorbed` interstitial lines.
    #[inline]
    pub fn record_merged(&self, absorbed: usize) {
        self.merge.0.merged.fetch_add(1, Ordering::Relaxed);
        self.merge.0.absorbed.fetch_add(absorbed as u64, Ordering::Relaxed);
    }

    /// A buffered opener released without its continuation.
    #[inline]
    pub fn record_unmerged(&self) {
        self.merge.0.unmerged.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_event(&self, kind: EventKind) {
        self.classify.0.events.fetch_add(1, Ordering::Relaxed);
        self.classify.0.by_kind[kind.index()].fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_contract_violation(&self) {
        self.classify.0.contract_violations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let by_kind = EventKind::ALL
            .iter()
            .map(|kind| {
                let count = self.classify.0.by_kind[kind.index()].load(Ordering::Relaxed);
                (kind.as_str(), count)
            })
            .filter(|(_, count)| *count > 0)
            .collect();

        MetricsSnapshot {
            lines_read: self.lines.0.read.load(Ordering::Relaxed),
            app_logging_dropped: self.lines.0.app_logging_dropped.load(Ordering::Relaxed),
            datestamps_rewritten: self.lines.0.datestamps_rewritten.load(Ordering::Relaxed),
            datestamps_saturated: self.lines.0.datestamps_saturated.load(Ordering::Relaxed),

            records_emitted: self.merge.0.records_emitted.load(Ordering::Relaxed),
            records_merged: self.merge.0.merged.load(Ordering::Relaxed),
            lines_absorbed: self.merge.0.absorbed.load(Ordering::Relaxed),
            records_unmerged: self.merge.0.unmerged.load(Ordering::Relaxed),

            events: self.classify.0.events.load(Ordering::Relaxed),
            unknown_events: self.classify.0.by_kind[EventKind::Unknown.index()]
                .load(Ordering::Relaxed),
            contract_violations: self.classify.0.contract_violations.load(Ordering::Relaxed),
            by_kind,
        }
    }
}

/// Point-in-time copy of [`PipelineMetrics`]. Kinds never seen are omitted
/// from `by_kind`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    // Lines
    pub lines_read: u64,
    pub app_logging_dropped: u64,
    pub datestamps_rewritten: u64,
    pub datestamps_saturated: u64,

    // Merge
    pub records_emitted: u64,
    pub records_merged: u64,
    pub lines_absorbed: u64,
    pub records_unmerged: u64,

    // Classification
    pub events: u64,
    pub unknown_events: u64,
    pub contract_violations: u64,
    pub by_kind: BTreeMap<&'static str, u64>,
}
