//! Garbage-collector log preprocessing and classification.
//!
//! Raw JVM GC log lines go through three stages:
//!
//! - `preprocess`: datestamp rewriting, interleaved application-log removal
//!   and multi-line merging produce one canonical record per GC occurrence
//! - `classify`: each record is matched against the ordered grammar catalog
//!   and becomes exactly one typed [`Event`], or `Unknown`
//! - `timeline`: events are handed out lazily in input order
//!
//! [`Engine`] wires the stages for one input. Nothing here performs I/O or
//! installs a tracing subscriber.

pub mod catalog;
pub mod classify;
pub mod codec;
pub mod conf;
pub mod engine;
pub mod event;
pub mod metrics;
pub mod preprocess;
pub mod timeline;

pub use catalog::{EventCatalog, EventGrammar};
pub use classify::{classify, Classification, Events, Outcome};
pub use conf::{ConfigError, EngineConfig, MergeConfig};
pub use engine::{Engine, EventTimeline};
pub use event::{Event, EventBody, EventKind, Region};
pub use metrics::{MetricsSnapshot, PipelineMetrics};
pub use preprocess::{CanonicalRecord, LineRange, LogLine, Preprocessor};
pub use timeline::{assemble, Timeline};
