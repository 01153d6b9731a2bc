use serde::{Deserialize, Serialize};

use crate::preprocess::{CanonicalRecord, LineRange};

/// Every event kind the catalog can produce, plus the `Unknown` fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ParallelOldCompacting,
    ParallelSerialOld,
    ParallelScavenge,
    ParNew,
    CmsInitialMark,
    CmsRemark,
    CmsConcurrentStart,
    CmsConcurrent,
    G1YoungInitialMark,
    G1YoungPause,
    G1Remark,
    G1FullGc,
    VerboseGcOld,
    VerboseGcYoung,
    ApplicationStoppedTime,
    ApplicationConcurrentTime,
    Unknown,
}

impl EventKind {
    pub const ALL: [EventKind; 17] = [
        EventKind::ParallelOldCompacting,
        EventKind::ParallelSerialOld,
        EventKind::ParallelScavenge,
        EventKind::ParNew,
        EventKind::CmsInitialMark,
        EventKind::CmsRemark,
        EventKind::CmsConcurrentStart,
        EventKind::CmsConcurrent,
        EventKind::G1YoungInitialMark,
        EventKind::G1YoungPause,
        EventKind::G1Remark,
        EventKind::G1FullGc,
        EventKind::VerboseGcOld,
        EventKind::VerboseGcYoung,
        EventKind::ApplicationStoppedTime,
        EventKind::ApplicationConcurrentTime,
        EventKind::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ParallelOldCompacting => "parallel_old_compacting",
            EventKind::ParallelSerialOld => "parallel_serial_old",
            EventKind::ParallelScavenge => "parallel_scavenge",
            EventKind::ParNew => "par_new",
            EventKind::CmsInitialMark => "cms_initial_mark",
            EventKind::CmsRemark => "cms_remark",
            EventKind::CmsConcurrentStart => "cms_concurrent_start",
            EventKind::CmsConcurrent => "cms_concurrent",
            EventKind::G1YoungInitialMark => "g1_young_initial_mark",
            EventKind::G1YoungPause => "g1_young_pause",
            EventKind::G1Remark => "g1_remark",
            EventKind::G1FullGc => "g1_full_gc",
            EventKind::VerboseGcOld => "verbose_gc_old",
            EventKind::VerboseGcYoung => "verbose_gc_young",
            EventKind::ApplicationStoppedTime => "application_stopped_time",
            EventKind::ApplicationConcurrentTime => "application_concurrent_time",
            EventKind::Unknown => "unknown",
        }
    }

    /// Position in [`EventKind::ALL`], used to index per-kind counters.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Occupancy before and after a collection, and the region's capacity, in KB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub before_kb: u32,
    pub after_kb: u32,
    pub capacity_kb: u32,
}

impl Region {
    pub fn new(before_kb: u32, after_kb: u32, capacity_kb: u32) -> Self {
        Self { before_kb, after_kb, capacity_kb }
    }

    /// A single occupancy reading (marking phases report no before/after).
    pub fn occupancy(kb: u32, capacity_kb: u32) -> Self {
        Self::new(kb, kb, capacity_kb)
    }
}

/// CMS concurrent phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CmsPhase {
    Mark,
    Preclean,
    AbortablePreclean,
    Sweep,
    Reset,
}

impl CmsPhase {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "mark" => Some(CmsPhase::Mark),
            "preclean" => Some(CmsPhase::Preclean),
            "abortable-preclean" => Some(CmsPhase::AbortablePreclean),
            "sweep" => Some(CmsPhase::Sweep),
            "reset" => Some(CmsPhase::Reset),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CmsPhase::Mark => "mark",
            CmsPhase::Preclean => "preclean",
            CmsPhase::AbortablePreclean => "abortable-preclean",
            CmsPhase::Sweep => "sweep",
            CmsPhase::Reset => "reset",
        }
    }
}

/// Young collection from a generational collector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YoungPause {
    pub duration_ms: u32,
    pub trigger: Option<String>,
    pub young: Region,
    pub combined: Region,
}

/// Full collection reporting every generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullPause {
    pub duration_ms: u32,
    pub trigger: Option<String>,
    pub young: Region,
    pub old: Region,
    /// Permanent generation, or metaspace on JDK 8+.
    pub perm: Region,
    pub combined: Region,
}

/// Collection that only reports whole-heap figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedPause {
    pub duration_ms: u32,
    pub trigger: Option<String>,
    pub combined: Region,
}

/// CMS stop-the-world marking pause (initial mark, remark).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OldMark {
    pub duration_ms: u32,
    pub trigger: Option<String>,
    pub old: Region,
    pub combined: Region,
}

/// Anything that carries only a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timed {
    pub duration_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseStart {
    pub phase: CmsPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseEnd {
    pub phase: CmsPhase,
    /// Wall-clock time of the phase.
    pub duration_ms: u32,
}

/// Kind-specific payload. One variant per grammar plus `Unknown`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventBody {
    ParallelOldCompacting(FullPause),
    ParallelSerialOld(FullPause),
    ParallelScavenge(YoungPause),
    ParNew(YoungPause),
    CmsInitialMark(OldMark),
    CmsRemark(OldMark),
    CmsConcurrentStart(PhaseStart),
    CmsConcurrent(PhaseEnd),
    G1YoungInitialMark(CombinedPause),
    G1YoungPause(CombinedPause),
    G1Remark(Timed),
    G1FullGc(CombinedPause),
    VerboseGcOld(CombinedPause),
    VerboseGcYoung(CombinedPause),
    ApplicationStoppedTime(Timed),
    ApplicationConcurrentTime(Timed),
    Unknown,
}

impl EventBody {
    pub fn kind(&self) -> EventKind {
        match self {
            EventBody::ParallelOldCompacting(_) => EventKind::ParallelOldCompacting,
            EventBody::ParallelSerialOld(_) => EventKind::ParallelSerialOld,
            EventBody::ParallelScavenge(_) => EventKind::ParallelScavenge,
            EventBody::ParNew(_) => EventKind::ParNew,
            EventBody::CmsInitialMark(_) => EventKind::CmsInitialMark,
            EventBody::CmsRemark(_) => EventKind::CmsRemark,
            EventBody::CmsConcurrentStart(_) => EventKind::CmsConcurrentStart,
            EventBody::CmsConcurrent(_) => EventKind::CmsConcurrent,
            EventBody::G1YoungInitialMark(_) => EventKind::G1YoungInitialMark,
            EventBody::G1YoungPause(_) => EventKind::G1YoungPause,
            EventBody::G1Remark(_) => EventKind::G1Remark,
            EventBody::G1FullGc(_) => EventKind::G1FullGc,
            EventBody::VerboseGcOld(_) => EventKind::VerboseGcOld,
            EventBody::VerboseGcYoung(_) => EventKind::VerboseGcYoung,
            EventBody::ApplicationStoppedTime(_) => EventKind::ApplicationStoppedTime,
            EventBody::ApplicationConcurrentTime(_) => EventKind::ApplicationConcurrentTime,
            EventBody::Unknown => EventKind::Unknown,
        }
    }
}

/// One classified garbage-collection event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Milliseconds since JVM start; 0 when the line carries no timestamp.
    pub timestamp_ms: u64,
    /// The canonical text the event was classified from.
    pub raw_text: String,
    /// Raw source lines that produced the canonical text.
    pub lines: LineRange,
    pub body: EventBody,
}

impl Event {
    pub fn new(record: &CanonicalRecord, timestamp_ms: u64, body: EventBody) -> Self {
        Self {
            timestamp_ms,
            raw_text: record.text.clone(),
            lines: record.lines,
            body,
        }
    }

    /// The total fallback: keeps the text, carries no data.
    pub fn unknown(record: &CanonicalRecord) -> Self {
        Self::new(record, 0, EventBody::Unknown)
    }

    pub fn kind(&self) -> EventKind {
        self.body.kind()
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.body, EventBody::Unknown)
    }

    /// Stop-the-world kinds, during which application threads are paused.
    pub fn is_blocking(&self) -> bool {
        match &self.body {
            EventBody::ParallelOldCompacting(_)
            | EventBody::ParallelSerialOld(_)
            | EventBody::ParallelScavenge(_)
            | EventBody::ParNew(_)
            | EventBody::CmsInitialMark(_)
            | EventBody::CmsRemark(_)
            | EventBody::G1YoungInitialMark(_)
            | EventBody::G1YoungPause(_)
            | EventBody::G1Remark(_)
            | EventBody::G1FullGc(_)
            | EventBody::VerboseGcOld(_)
            | EventBody::VerboseGcYoung(_)
            | EventBody::ApplicationStoppedTime(_) => true,
            EventBody::CmsConcurrentStart(_)
            | EventBody::CmsConcurrent(_)
            | EventBody::ApplicationConcurrentTime(_)
            | EventBody::Unknown => false,
        }
    }

    pub fn duration_ms(&self) -> Option<u32> {
        match &self.body {
            EventBody::ParallelOldCompacting(p) | EventBody::ParallelSerialOld(p) => Some(p.duration_ms),
            EventBody::ParallelScavenge(p) | EventBody::ParNew(p) => Some(p.duration_ms),
            EventBody::CmsInitialMark(p) | EventBody::CmsRemark(p) => Some(p.duration_ms),
            EventBody::CmsConcurrent(p) => Some(p.duration_ms),
            EventBody::G1YoungInitialMark(p)
            | EventBody::G1YoungPause(p)
            | EventBody::G1FullGc(p)
            | EventBody::VerboseGcOld(p)
            | EventBody::VerboseGcYoung(p) => Some(p.duration_ms),
            EventBody::G1Remark(t)
            | EventBody::ApplicationStoppedTime(t)
            | EventBody::ApplicationConcurrentTime(t) => Some(t.duration_ms),
            EventBody::CmsConcurrentStart(_) | EventBody::Unknown => None,
        }
    }

    pub fn trigger(&self) -> Option<&str> {
        let trigger = match &self.body {
            EventBody::ParallelOldCompacting(p) | EventBody::ParallelSerialOld(p) => &p.trigger,
            EventBody::ParallelScavenge(p) | EventBody::ParNew(p) => &p.trigger,
            EventBody::CmsInitialMark(p) | EventBody::CmsRemark(p) => &p.trigger,
            EventBody::G1YoungInitialMark(p)
            | EventBody::G1YoungPause(p)
            | EventBody::G1FullGc(p)
            | EventBody::VerboseGcOld(p)
            | EventBody::VerboseGcYoung(p) => &p.trigger,
            EventBody::CmsConcurrentStart(_)
            | EventBody::CmsConcurrent(_)
            | EventBody::G1Remark(_)
            | EventBody::ApplicationStoppedTime(_)
            | EventBody::ApplicationConcurrentTime(_)
            | EventBody::Unknown => return None,
        };
        trigger.as_deref()
    }

    pub fn young(&self) -> Option<Region> {
        match &self.body {
            EventBody::ParallelOldCompacting(p) | EventBody::ParallelSerialOld(p) => Some(p.young),
            EventBody::ParallelScavenge(p) | EventBody::ParNew(p) => Some(p.young),
            EventBody::CmsInitialMark(_)
            | EventBody::CmsRemark(_)
            | EventBody::CmsConcurrentStart(_)
            | EventBody::CmsConcurrent(_)
            | EventBody::G1YoungInitialMark(_)
            | EventBody::G1YoungPause(_)
            | EventBody::G1Remark(_)
            | EventBody::G1FullGc(_)
            | EventBody::VerboseGcOld(_)
            | EventBody::VerboseGcYoung(_)
            | EventBody::ApplicationStoppedTime(_)
            | EventBody::ApplicationConcurrentTime(_)
            | EventBody::Unknown => None,
        }
    }

    pub fn old(&self) -> Option<Region> {
        match &self.body {
            EventBody::ParallelOldCompacting(p) | EventBody::ParallelSerialOld(p) => Some(p.old),
            EventBody::CmsInitialMark(p) | EventBody::CmsRemark(p) => Some(p.old),
            EventBody::ParallelScavenge(_)
            | EventBody::ParNew(_)
            | EventBody::CmsConcurrentStart(_)
            | EventBody::CmsConcurrent(_)
            | EventBody::G1YoungInitialMark(_)
            | EventBody::G1YoungPause(_)
            | EventBody::G1Remark(_)
            | EventBody::G1FullGc(_)
            | EventBody::VerboseGcOld(_)
            | EventBody::VerboseGcYoung(_)
            | EventBody::ApplicationStoppedTime(_)
            | EventBody::ApplicationConcurrentTime(_)
            | EventBody::Unknown => None,
        }
    }

    pub fn perm(&self) -> Option<Region> {
        match &self.body {
            EventBody::ParallelOldCompacting(p) | EventBody::ParallelSerialOld(p) => Some(p.perm),
            EventBody::ParallelScavenge(_)
            | EventBody::ParNew(_)
            | EventBody::CmsInitialMark(_)
            | EventBody::CmsRemark(_)
            | EventBody::CmsConcurrentStart(_)
            | EventBody::CmsConcurrent(_)
            | EventBody::G1YoungInitialMark(_)
            | EventBody::G1YoungPause(_)
            | EventBody::G1Remark(_)
            | EventBody::G1FullGc(_)
            | EventBody::VerboseGcOld(_)
            | EventBody::VerboseGcYoung(_)
            | EventBody::ApplicationStoppedTime(_)
            | EventBody::ApplicationConcurrentTime(_)
            | EventBody::Unknown => None,
        }
    }

    pub fn combined(&self) -> Option<Region> {
        match &self.body {
            EventBody::ParallelOldCompacting(p) | EventBody::ParallelSerialOld(p) => Some(p.combined),
            EventBody::ParallelScavenge(p) | EventBody::ParNew(p) => Some(p.combined),
            EventBody::CmsInitialMark(p) | EventBody::CmsRemark(p) => Some(p.combined),
            EventBody::G1YoungInitialMark(p)
            | EventBody::G1YoungPause(p)
            | EventBody::G1FullGc(p)
            | EventBody::VerboseGcOld(p)
            | EventBody::VerboseGcYoung(p) => Some(p.combined),
            EventBody::CmsConcurrentStart(_)
            | EventBody::CmsConcurrent(_)
            | EventBody::G1Remark(_)
            | EventBody::ApplicationStoppedTime(_)
            | EventBody::ApplicationConcurrentTime(_)
            | EventBody::Unknown => None,
        }
    }

    pub fn phase(&self) -> Option<CmsPhase> {
        match &self.body {
            EventBody::CmsConcurrentStart(p) => Some(p.phase),
            EventBody::CmsConcurrent(p) => Some(p.phase),
            EventBody::ParallelOldCompacting(_)
            | EventBody::ParallelSerialOld(_)
            | EventBody::ParallelScavenge(_)
            | EventBody::ParNew(_)
            | EventBody::CmsInitialMark(_)
            | EventBody::CmsRemark(_)
            | EventBody::G1YoungInitialMark(_)
            | EventBody::G1YoungPause(_)
            | EventBody::G1Remark(_)
            | EventBody::G1FullGc(_)
            | EventBody::VerboseGcOld(_)
            | EventBody::VerboseGcYoung(_)
            | EventBody::ApplicationStoppedTime(_)
            | EventBody::ApplicationConcurrentTime(_)
            | EventBody::Unknown => None,
        }
    }
}
