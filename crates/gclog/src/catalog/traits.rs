use thiserror::Error;

use crate::codec::CodecError;
use crate::event::{EventBody, EventKind};

/// What an extractor pulls out of a recognized line.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub timestamp_ms: u64,
    pub body: EventBody,
}

/// An extractor failed on text its own recognizer accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("{grammar}: text does not have the recognized shape")]
    ShapeMismatch { grammar: &'static str },

    #[error("{grammar}: capture `{capture}` is missing")]
    MissingCapture { grammar: &'static str, capture: String },

    #[error("{grammar}: {source}")]
    Codec {
        grammar: &'static str,
        #[source]
        source: CodecError,
    },
}

/// One entry of the catalog.
///
/// `extract` must succeed whenever `recognize` returns true; the classifier
/// treats any failure as a broken grammar, not as bad input.
pub trait EventGrammar: Send + Sync {
    fn name(&self) -> &'static str;
    fn kind(&self) -> EventKind;
    fn recognize(&self, text: &str) -> bool;
    fn extract(&self, text: &str) -> Result<Extracted, ExtractError>;
}
