//! Append-only, in-memory event journal.

use uuid::Uuid;

use crate::envelope::EventEnvelope;
use crate::event::Event;

/// Ordered record of every event applied during a session.
///
/// Entries can only be appended; there is no API to edit or remove them.
#[derive(Debug, Clone)]
pub struct EventJournal<E> {
    entries: Vec<EventEnvelope<E>>,
}

impl<E> Default for EventJournal<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E: Event> EventJournal<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event, assigning the next sequence number.
    pub fn append(&mut self, event: E) -> &EventEnvelope<E> {
        let sequence_number = self.entries.len() as u64 + 1;
        self.entries
            .push(EventEnvelope::new(Uuid::now_v7(), sequence_number, event));
        &self.entries[self.entries.len() - 1]
    }

    /// Append events in order.
    pub fn extend(&mut self, events: impl IntoIterator<Item = E>) {
        for event in events {
            self.append(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventEnvelope<E>> {
        self.entries.iter()
    }

    /// Entries with a sequence number strictly greater than `sequence_number`.
    pub fn since(&self, sequence_number: u64) -> &[EventEnvelope<E>] {
        let start = (sequence_number as usize).min(self.entries.len());
        &self.entries[start..]
    }

    /// The last `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> &[EventEnvelope<E>] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    #[derive(Debug, Clone, PartialEq)]
    struct Tick(u32);

    impl Event for Tick {
        fn event_type(&self) -> &'static str {
            "test.tick"
        }

        fn version(&self) -> u32 {
            1
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            DateTime::<Utc>::UNIX_EPOCH
        }
    }

    #[test]
    fn sequence_numbers_start_at_one_and_increase() {
        let mut journal = EventJournal::new();
        journal.extend([Tick(1), Tick(2), Tick(3)]);

        let seqs: Vec<u64> = journal.iter().map(|e| e.sequence_number()).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
        assert_eq!(journal.len(), 3);
    }

    #[test]
    fn since_and_tail_slice_the_journal() {
        let mut journal = EventJournal::new();
        journal.extend([Tick(1), Tick(2), Tick(3)]);

        let since: Vec<&Tick> = journal.since(1).iter().map(|e| e.payload()).collect();
        assert_eq!(since, vec![&Tick(2), &Tick(3)]);
        assert!(journal.since(10).is_empty());

        let tail: Vec<&Tick> = journal.tail(1).iter().map(|e| e.payload()).collect();
        assert_eq!(tail, vec![&Tick(3)]);
        assert_eq!(journal.tail(99).len(), 3);
    }
}
