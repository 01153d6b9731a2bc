use crate::event::Event;

/// Events in input order, handed out once.
///
/// Not `Clone`: a timeline is a single forward pass over its source and
/// cannot be restarted.
pub struct Timeline<I> {
    events: I,
    yielded: usize,
}

impl<I> Timeline<I>
where
    I: Iterator<Item = Event>,
{
    /// Number of events handed out so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }
}

impl<I> Iterator for Timeline<I>
where
    I: Iterator<Item = Event>,
{
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        let event = self.events.next()?;
        self.yielded += 1;
        Some(event)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.events.size_hint()
    }
}

/// Wrap a classified event stream. No reordering, no deduplication.
pub fn assemble<I>(events: I) -> Timeline<I::IntoIter>
where
    I: IntoIterator<Item = Event>,
{
    Timeline {
        events: events.into_iter(),
        yielded: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::CanonicalRecord;

    fn unknown(line: usize, text: &str) -> Event {
        Event::unknown(&CanonicalRecord::single(line, text.to_string()))
    }

    #[test]
    fn test_preserves_order_and_duplicates() {
        let events = vec![unknown(1, "b"), unknown(2, "a"), unknown(3, "a")];
        let texts: Vec<_> = assemble(events).map(|e| e.raw_text).collect();
        assert_eq!(texts, ["b", "a", "a"]);
    }

    #[test]
    fn test_counts_yielded_events() {
        let mut timeline = assemble(vec![unknown(1, "x"), unknown(2, "y")]);
        assert_eq!(timeline.yielded(), 0);
        timeline.next();
        assert_eq!(timeline.yielded(), 1);
        timeline.next();
        assert!(timeline.next().is_none());
        assert_eq!(timeline.yielded(), 2);
    }

    #[test]
    fn test_empty() {
        assert!(assemble(Vec::<Event>::new()).next().is_none());
    }
}
