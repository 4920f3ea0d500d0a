// Event timing - Notes to ordered, delta-encoded pitch on/off events
// The same stream feeds MIDI file export and live playback.

use crate::pitch::PitchError;
use crate::sequencer::note::Note;

/// Ticks per grid time unit
pub const DEFAULT_TICK_SCALE: i64 = 6;

/// Velocity given to every emitted event
pub const DEFAULT_VELOCITY: u8 = 90;

/// Pitch on or pitch off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    On,
    Off,
}

/// Event at an absolute tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    pub time: i64,
    pub kind: EventKind,
    pub pitch: u8,
    pub velocity: u8,
}

/// Event relative to the previous one in the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaEvent {
    pub delta: u64,
    pub kind: EventKind,
    pub pitch: u8,
    pub velocity: u8,
}

/// Errors raised while converting notes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error(transparent)]
    Pitch(#[from] PitchError),

    #[error("Note {name} has an invalid span [{start}, {end})")]
    InvalidSpan { name: String, start: i64, end: i64 },

    #[error("Note {name} at time {time} is too late to convert to ticks")]
    TimeOverflow { name: String, time: i64 },
}

/// Converts notes into an event stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventConverter {
    pub tick_scale: i64,
    pub velocity: u8,
}

impl Default for EventConverter {
    fn default() -> Self {
        Self {
            tick_scale: DEFAULT_TICK_SCALE,
            velocity: DEFAULT_VELOCITY,
        }
    }
}

impl EventConverter {
    pub fn new(tick_scale: i64, velocity: u8) -> Self {
        Self {
            tick_scale,
            velocity,
        }
    }

    /// Absolute on/off events, sorted by time
    ///
    /// The sort is stable: events at equal times keep the order in which the
    /// notes were given, an on event before its own off event.
    pub fn timed_events(&self, notes: &[Note]) -> Result<Vec<TimedEvent>, EventError> {
        let mut events = Vec::with_capacity(notes.len() * 2);

        for note in notes {
            if note.start_time < 0 || note.end_time <= note.start_time {
                return Err(EventError::InvalidSpan {
                    name: note.name.clone(),
                    start: note.start_time,
                    end: note.end_time,
                });
            }

            let pitch = note.value()?;
            let on = self.ticks(note, note.start_time)?;
            let off = self.ticks(note, note.end_time)?;

            events.push(TimedEvent {
                time: on,
                kind: EventKind::On,
                pitch,
                velocity: self.velocity,
            });
            events.push(TimedEvent {
                time: off,
                kind: EventKind::Off,
                pitch,
                velocity: self.velocity,
            });
        }

        events.sort_by_key(|event| event.time);
        Ok(events)
    }

    fn ticks(&self, note: &Note, time: i64) -> Result<i64, EventError> {
        time.checked_mul(self.tick_scale).ok_or_else(|| EventError::TimeOverflow {
            name: note.name.clone(),
            time,
        })
    }

    /// Full conversion: sort then delta-encode
    pub fn convert(&self, notes: &[Note]) -> Result<EventStream, EventError> {
        let events = self.timed_events(notes)?;
        Ok(EventStream {
            events: delta_encode(&events),
        })
    }
}

/// Delta-encode events already sorted by time
///
/// The first delta is the first event's absolute time.
pub fn delta_encode(events: &[TimedEvent]) -> Vec<DeltaEvent> {
    let mut previous = 0i64;

    events
        .iter()
        .map(|event| {
            let delta = event.time - previous;
            debug_assert!(delta >= 0, "events must be sorted by time");
            previous = event.time;

            DeltaEvent {
                delta: delta.max(0) as u64,
                kind: event.kind,
                pitch: event.pitch,
                velocity: event.velocity,
            }
        })
        .collect()
}

/// Ordered, delta-encoded events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventStream {
    events: Vec<DeltaEvent>,
}

impl EventStream {
    pub fn events(&self) -> &[DeltaEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeltaEvent> {
        self.events.iter()
    }

    /// Absolute time of the last event
    pub fn total_ticks(&self) -> u64 {
        self.events.iter().map(|e| e.delta).sum()
    }
}

impl<'a> IntoIterator for &'a EventStream {
    type Item = &'a DeltaEvent;
    type IntoIter = std::slice::Iter<'a, DeltaEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_converter() -> EventConverter {
        EventConverter::new(1, DEFAULT_VELOCITY)
    }

    #[test]
    fn test_overlapping_notes_order_and_deltas() {
        let notes = vec![Note::new("C4", 0, 10), Note::new("E4", 5, 15)];
        let events = unit_converter().timed_events(&notes).unwrap();

        let summary: Vec<(EventKind, u8, i64)> =
            events.iter().map(|e| (e.kind, e.pitch, e.time)).collect();
        assert_eq!(
            summary,
            vec![
                (EventKind::On, 48, 0),
                (EventKind::On, 52, 5),
                (EventKind::Off, 48, 10),
                (EventKind::Off, 52, 15),
            ]
        );

        let deltas: Vec<u64> = delta_encode(&events).iter().map(|e| e.delta).collect();
        assert_eq!(deltas, vec![0, 5, 5, 5]);
    }

    #[test]
    fn test_first_delta_is_absolute() {
        let notes = vec![Note::new("C4", 40, 80)];
        let stream = EventConverter::default().convert(&notes).unwrap();

        let deltas: Vec<u64> = stream.iter().map(|e| e.delta).collect();
        assert_eq!(deltas, vec![240, 240]);
        assert_eq!(stream.total_ticks(), 480);
    }

    #[test]
    fn test_equal_times_keep_insertion_order() {
        // A note ending exactly where another starts: on/off at the same tick
        // stay in the order their notes were given.
        let notes = vec![Note::new("D4", 10, 20), Note::new("C4", 0, 10)];
        let events = unit_converter().timed_events(&notes).unwrap();

        let at_ten: Vec<(EventKind, u8)> = events
            .iter()
            .filter(|e| e.time == 10)
            .map(|e| (e.kind, e.pitch))
            .collect();
        assert_eq!(at_ten, vec![(EventKind::On, 50), (EventKind::Off, 48)]);
    }

    #[test]
    fn test_velocity_applies_to_both_events() {
        let stream = EventConverter::new(1, 64)
            .convert(&[Note::new("A4", 0, 1)])
            .unwrap();
        assert!(stream.iter().all(|e| e.velocity == 64));
    }

    #[test]
    fn test_empty_input() {
        let stream = EventConverter::default().convert(&[]).unwrap();
        assert!(stream.is_empty());
        assert_eq!(stream.total_ticks(), 0);
    }

    #[test]
    fn test_invalid_span_rejected() {
        let result = unit_converter().convert(&[Note::new("C4", 10, 10)]);
        assert!(matches!(result, Err(EventError::InvalidSpan { .. })));

        let result = unit_converter().convert(&[Note::new("C4", -5, 10)]);
        assert!(matches!(result, Err(EventError::InvalidSpan { .. })));
    }

    #[test]
    fn test_tick_overflow_rejected() {
        let late = Note::new("C4", 2_000_000_000_000_000_000, 2_000_000_000_000_000_040);
        let result = EventConverter::default().convert(&[late]);
        assert!(matches!(result, Err(EventError::TimeOverflow { .. })));
    }

    #[test]
    fn test_invalid_pitch_rejected() {
        let result = unit_converter().convert(&[Note::new("Z4", 0, 10)]);
        assert!(matches!(result, Err(EventError::Pitch(_))));
    }

    #[test]
    fn test_deltas_never_negative() {
        let notes = vec![
            Note::new("C4", 60, 100),
            Note::new("G4", 0, 200),
            Note::new("E4", 20, 40),
        ];
        let events = unit_converter().timed_events(&notes).unwrap();

        assert!(events.windows(2).all(|w| w[0].time <= w[1].time));
        let total: u64 = delta_encode(&events).iter().map(|e| e.delta).sum();
        assert_eq!(total, 200);
    }
}
