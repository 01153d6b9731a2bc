use regex::{Captures, Regex};

use super::traits::{EventGrammar, ExtractError, Extracted};
use crate::codec::{parse_size, seconds_to_millis, CodecError};
use crate::event::{CmsPhase, EventKind, Region};

/// Reads named captures into an event payload.
pub type Extractor = fn(&Fields<'_>) -> Result<Extracted, ExtractError>;

/// A grammar backed by one anchored regex with named captures.
pub struct RegexGrammar {
    name: &'static str,
    kind: EventKind,
    pattern: Regex,
    extractor: Extractor,
}

impl RegexGrammar {
    pub fn new(
        name: &'static str,
        kind: EventKind,
        pattern: &str,
        extractor: Extractor,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            kind,
            pattern: Regex::new(pattern)?,
            extractor,
        })
    }
}

impl std::fmt::Debug for RegexGrammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegexGrammar")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

impl EventGrammar for RegexGrammar {
    fn name(&self) -> &'static str {
        self.name
    }

    fn kind(&self) -> EventKind {
        self.kind
    }

    fn recognize(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    fn extract(&self, text: &str) -> Result<Extracted, ExtractError> {
        let caps = self
            .pattern
            .captures(text)
            .ok_or(ExtractError::ShapeMismatch { grammar: self.name })?;
        (self.extractor)(&Fields {
            grammar: self.name,
            caps,
        })
    }
}

/// Typed access to a match's named captures.
pub struct Fields<'t> {
    grammar: &'static str,
    caps: Captures<'t>,
}

impl<'t> Fields<'t> {
    fn get(&self, name: &str) -> Result<&'t str, ExtractError> {
        self.caps
            .name(name)
            .map(|m| m.as_str())
            .ok_or_else(|| ExtractError::MissingCapture {
                grammar: self.grammar,
                capture: name.to_string(),
            })
    }

    fn codec(&self, source: CodecError) -> ExtractError {
        ExtractError::Codec {
            grammar: self.grammar,
            source,
        }
    }

    /// `timestamp` in milliseconds.
    pub fn timestamp(&self) -> Result<u64, ExtractError> {
        seconds_to_millis(self.get("timestamp")?).map_err(|e| self.codec(e))
    }

    /// `timestamp` in milliseconds, or 0 when the grammar made it optional
    /// and the line has none.
    pub fn timestamp_or_zero(&self) -> Result<u64, ExtractError> {
        match self.caps.name("timestamp") {
            Some(_) => self.timestamp(),
            None => Ok(0),
        }
    }

    /// `duration` in milliseconds.
    pub fn duration(&self) -> Result<u32, ExtractError> {
        let literal = self.get("duration")?;
        let ms = seconds_to_millis(literal).map_err(|e| self.codec(e))?;
        u32::try_from(ms).map_err(|_| self.codec(CodecError::MalformedDuration(literal.to_string())))
    }

    /// Size capture `name` (with `name_unit`) in kilobytes.
    pub fn size(&self, name: &str) -> Result<u32, ExtractError> {
        let number = self.get(name)?;
        let unit_name = format!("{name}_unit");
        let unit = self
            .get(&unit_name)?
            .chars()
            .next()
            .ok_or(ExtractError::MissingCapture {
                grammar: self.grammar,
                capture: unit_name,
            })?;
        parse_size(number, unit).map_err(|e| self.codec(e))
    }

    /// A `before->after(capacity)` region.
    pub fn region(&self, region: &str) -> Result<Region, ExtractError> {
        Ok(Region::new(
            self.size(&format!("{region}_before"))?,
            self.size(&format!("{region}_after"))?,
            self.size(&format!("{region}_capacity"))?,
        ))
    }

    /// An `occupancy(capacity)` region.
    pub fn occupancy(&self, region: &str) -> Result<Region, ExtractError> {
        Ok(Region::occupancy(
            self.size(&format!("{region}_before"))?,
            self.size(&format!("{region}_capacity"))?,
        ))
    }

    pub fn trigger(&self) -> Option<String> {
        self.caps.name("trigger").map(|m| m.as_str().to_string())
    }

    pub fn phase(&self) -> Result<CmsPhase, ExtractError> {
        CmsPhase::parse(self.get("phase")?).ok_or(ExtractError::ShapeMismatch {
            grammar: self.grammar,
        })
    }
}
