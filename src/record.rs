//! The recording log: an append-only sequence of played chords.
//!
//! Each key gesture becomes one [`RecordedEvent`], created open on
//! key-down and closed with a duration on key-up. Events carry a stable
//! [`EventId`] handed back from [`RecordingLog::append`]; the router
//! holds that id for the lifetime of the key press, so the duration
//! patch lands on the right event even if the user deletes other events
//! (or the event itself) mid-press.

use crate::theory::Pitch;

/// Stable identity of a recorded event, independent of its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(u64);

/// One recorded chord gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub id: EventId,
    /// Onset in transport seconds
    pub start: f64,
    /// Chord tones sounded by this gesture, root first
    pub notes: Vec<Pitch>,
    /// Held length in seconds; `None` while the key is still down
    pub duration: Option<f64>,
}

impl RecordedEvent {
    pub fn is_open(&self) -> bool {
        self.duration.is_none()
    }
}

/// Ordered sequence of recorded events, insertion order = chronological.
///
/// Mutation is append-only except the in-place duration patch on an open
/// event and explicit removal by index.
#[derive(Debug, Default)]
pub struct RecordingLog {
    events: Vec<RecordedEvent>,
    next_id: u64,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an open event and return its id.
    pub fn append(&mut self, start: f64, notes: Vec<Pitch>) -> EventId {
        let id = EventId(self.next_id);
        self.next_id += 1;
        self.events.push(RecordedEvent {
            id,
            start,
            notes,
            duration: None,
        });
        id
    }

    /// Close the open event with the given id, setting its duration to
    /// `end - start` (floored at zero). Returns false when no open event
    /// with that id exists; the caller treats that as a recoverable
    /// no-op.
    pub fn close(&mut self, id: EventId, end: f64) -> bool {
        // Most recent first: the matching open event is almost always last
        match self
            .events
            .iter_mut()
            .rev()
            .find(|e| e.id == id && e.is_open())
        {
            Some(event) => {
                event.duration = Some((end - event.start).max(0.0));
                true
            }
            None => false,
        }
    }

    /// Remove the event at `index`, preserving the order of the rest.
    pub fn remove(&mut self, index: usize) -> Option<RecordedEvent> {
        if index < self.events.len() {
            Some(self.events.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn get(&self, id: EventId) -> Option<&RecordedEvent> {
        self.events.iter().rev().find(|e| e.id == id)
    }

    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::{Pitch, PitchClass};

    fn c4() -> Vec<Pitch> {
        vec![Pitch::new(PitchClass::C, 4)]
    }

    fn e4() -> Vec<Pitch> {
        vec![Pitch::new(PitchClass::E, 4)]
    }

    #[test]
    fn append_creates_open_event() {
        let mut log = RecordingLog::new();
        let id = log.append(1.0, c4());
        assert_eq!(log.len(), 1);
        let event = log.get(id).unwrap();
        assert!(event.is_open());
        assert_eq!(event.start, 1.0);
    }

    #[test]
    fn close_patches_duration() {
        let mut log = RecordingLog::new();
        let id = log.append(1.0, c4());
        assert!(log.close(id, 1.5));
        let event = log.get(id).unwrap();
        assert_eq!(event.duration, Some(0.5));
    }

    #[test]
    fn close_is_a_noop_for_unknown_or_closed_ids() {
        let mut log = RecordingLog::new();
        let id = log.append(0.0, c4());
        assert!(log.close(id, 0.25));
        // Second close must not overwrite
        assert!(!log.close(id, 9.0));
        assert_eq!(log.get(id).unwrap().duration, Some(0.25));
    }

    #[test]
    fn close_survives_removal_of_other_events() {
        let mut log = RecordingLog::new();
        let _a = log.append(0.0, c4());
        let b = log.append(1.0, e4());
        log.remove(0);
        assert!(log.close(b, 1.5));
        assert_eq!(log.events()[0].duration, Some(0.5));
    }

    #[test]
    fn close_after_own_removal_is_skipped() {
        let mut log = RecordingLog::new();
        let id = log.append(0.0, c4());
        log.remove(0);
        assert!(!log.close(id, 1.0));
    }

    #[test]
    fn duration_floors_at_zero() {
        let mut log = RecordingLog::new();
        let id = log.append(2.0, c4());
        assert!(log.close(id, 1.0));
        assert_eq!(log.get(id).unwrap().duration, Some(0.0));
    }

    #[test]
    fn remove_preserves_order_of_the_rest() {
        let mut log = RecordingLog::new();
        log.append(0.0, c4());
        log.append(1.0, e4());
        log.append(2.0, c4());

        let removed = log.remove(1).unwrap();
        assert_eq!(removed.start, 1.0);
        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[0].start, 0.0);
        assert_eq!(log.events()[1].start, 2.0);
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut log = RecordingLog::new();
        log.append(0.0, c4());
        assert!(log.remove(5).is_none());
        assert_eq!(log.len(), 1);
    }
}
