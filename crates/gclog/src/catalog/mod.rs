//! Ordered registry of event grammars.
//!
//! The built-in catalog is compiled once per process and shared read-only
//! by every pipeline. Order is priority: the first grammar whose recognizer
//! accepts a record classifies it, so more specific shapes come first.

mod fragments;
mod grammar;
mod kinds;
mod traits;

use std::sync::OnceLock;

pub use grammar::{Extractor, Fields, RegexGrammar};
pub use traits::{EventGrammar, ExtractError, Extracted};

/// Ordered, immutable list of grammars.
///
/// Classification walks the list front to back and stops at the first
/// recognizer that accepts the text. A catalog is `Send + Sync` because
/// every [`EventGrammar`] is, so one instance serves any number of
/// pipelines. Built-in grammars only match ASCII digits, which keeps every
/// recognized number within reach of the codec.
pub struct EventCatalog {
    grammars: Vec<Box<dyn EventGrammar>>,
}

impl EventCatalog {
    /// The process-wide built-in catalog.
    pub fn global() -> &'static EventCatalog {
        static CATALOG: OnceLock<EventCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| EventCatalog::builtin().expect("valid built-in grammar regexes"))
    }

    /// Compile a fresh copy of the built-in grammars.
    ///
    /// Fails only if a built-in pattern does not compile. [`global`] treats
    /// that as a bug.
    ///
    /// [`global`]: EventCatalog::global
    pub fn builtin() -> Result<Self, regex::Error> {
        let grammars: Vec<Box<dyn EventGrammar>> = vec![
            // Order matters! More specific grammars first
            Box::new(kinds::parallel_old_compacting()?),
            Box::new(kinds::parallel_serial_old()?),
            Box::new(kinds::parallel_scavenge()?),
            Box::new(kinds::par_new()?),
            Box::new(kinds::cms_initial_mark()?),
            Box::new(kinds::cms_remark()?),
            Box::new(kinds::cms_concurrent_start()?),
            Box::new(kinds::cms_concurrent()?),
            Box::new(kinds::g1_young_initial_mark()?),
            Box::new(kinds::g1_young_pause()?),
            Box::new(kinds::g1_remark()?),
            Box::new(kinds::g1_full_gc()?),
            // Bare summaries overlap the detailed shapes above
            Box::new(kinds::verbose_gc_old()?),
            Box::new(kinds::verbose_gc_young()?),
            Box::new(kinds::application_stopped_time()?),
            Box::new(kinds::application_concurrent_time()?),
        ];
        Ok(Self { grammars })
    }

    /// A catalog with caller-supplied grammars, tried in the given order.
    pub fn with_grammars(grammars: Vec<Box<dyn EventGrammar>>) -> Self {
        Self { grammars }
    }

    /// First grammar that recognizes `text`.
    pub fn recognize(&self, text: &str) -> Option<&dyn EventGrammar> {
        self.grammars
            .iter()
            .find(|grammar| grammar.recognize(text))
            .map(|grammar| grammar.as_ref())
    }

    /// Grammars in priority order.
    pub fn grammars(&self) -> impl Iterator<Item = &dyn EventGrammar> {
        self.grammars.iter().map(|grammar| grammar.as_ref())
    }

    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }
}

impl std::fmt::Debug for EventCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.grammars.iter().map(|grammar| grammar.name()))
            .finish()
    }
}
