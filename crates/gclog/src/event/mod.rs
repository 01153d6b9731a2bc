//! Classified event model.

mod model;

pub use model::{
    CmsPhase, CombinedPause, Event, EventBody, EventKind, FullPause, OldMark, PhaseEnd, PhaseStart,
    Region, Timed, YoungPause,
};
