// MIDI export - event streams to single-track Standard MIDI Files

use crate::playback::PLAYBACK_CHANNEL;
use crate::sequencer::{EventConverter, EventError, EventKind, EventStream, Note, Tempo};
use midly::num::u28;
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use std::path::Path;

/// Resolution written to the file header
pub const TICKS_PER_BEAT: u16 = 480;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Cannot convert notes: {0}")]
    Events(#[from] EventError),

    #[error("Delta of {0} ticks does not fit a MIDI file")]
    DeltaTooLarge(u64),

    #[error("Failed to write MIDI: {0}")]
    Midi(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encode a stream as SMF bytes with a leading tempo event
pub fn write_smf(stream: &EventStream, tempo: Tempo) -> Result<Vec<u8>, ExportError> {
    let mut track = Vec::with_capacity(stream.len() + 2);

    track.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(tempo.microseconds_per_beat().into())),
    });

    for event in stream {
        if event.delta > u64::from(u28::max_value().as_int()) {
            return Err(ExportError::DeltaTooLarge(event.delta));
        }

        let message = match event.kind {
            EventKind::On => MidiMessage::NoteOn {
                key: event.pitch.into(),
                vel: event.velocity.into(),
            },
            EventKind::Off => MidiMessage::NoteOff {
                key: event.pitch.into(),
                vel: event.velocity.into(),
            },
        };

        track.push(TrackEvent {
            delta: (event.delta as u32).into(),
            kind: TrackEventKind::Midi {
                channel: PLAYBACK_CHANNEL.into(),
                message,
            },
        });
    }

    track.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let smf = Smf {
        header: Header {
            format: Format::SingleTrack,
            timing: Timing::Metrical(TICKS_PER_BEAT.into()),
        },
        tracks: vec![track],
    };

    let mut out = Vec::new();
    smf.write(&mut out)
        .map_err(|e| ExportError::Midi(format!("Failed to write MIDI: {}", e)))?;
    Ok(out)
}

/// Convert notes and write them as a MIDI file
pub fn export_notes(
    path: &Path,
    notes: &[Note],
    tempo: Tempo,
    converter: &EventConverter,
) -> Result<(), ExportError> {
    let stream = converter.convert(notes)?;
    let bytes = write_smf(&stream, tempo)?;
    std::fs::write(path, &bytes)?;

    tracing::info!(
        path = %path.display(),
        events = stream.len(),
        bytes = bytes.len(),
        "MIDI exported"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_track(bytes: &[u8]) -> (Header, Vec<TrackEventKind<'_>>, Vec<u32>) {
        let smf = Smf::parse(bytes).unwrap();
        assert_eq!(smf.tracks.len(), 1);
        let kinds = smf.tracks[0].iter().map(|e| e.kind).collect();
        let deltas = smf.tracks[0].iter().map(|e| e.delta.as_int()).collect();
        (smf.header, kinds, deltas)
    }

    #[test]
    fn test_header_and_tempo() {
        let stream = EventConverter::default()
            .convert(&[Note::new("C4", 0, 40)])
            .unwrap();
        let bytes = write_smf(&stream, Tempo::new(100.0)).unwrap();
        assert_eq!(&bytes[0..4], b"MThd");

        let (header, kinds, _) = parse_track(&bytes);
        assert_eq!(header.format, Format::SingleTrack);
        assert_eq!(header.timing, Timing::Metrical(480.into()));
        assert_eq!(kinds[0], TrackEventKind::Meta(MetaMessage::Tempo(600_000.into())));
        assert_eq!(
            kinds.last(),
            Some(&TrackEventKind::Meta(MetaMessage::EndOfTrack))
        );
    }

    #[test]
    fn test_note_events_and_deltas() {
        let stream = EventConverter::new(1, 90)
            .convert(&[Note::new("C4", 0, 10), Note::new("E4", 5, 15)])
            .unwrap();
        let bytes = write_smf(&stream, Tempo::default()).unwrap();
        let (_, kinds, deltas) = parse_track(&bytes);

        // Tempo, four note events, end of track
        assert_eq!(kinds.len(), 6);
        assert_eq!(deltas, vec![0, 0, 5, 5, 5, 0]);
        assert_eq!(
            kinds[1],
            TrackEventKind::Midi {
                channel: 0.into(),
                message: MidiMessage::NoteOn {
                    key: 48.into(),
                    vel: 90.into()
                }
            }
        );
        assert!(matches!(
            kinds[3],
            TrackEventKind::Midi {
                message: MidiMessage::NoteOff { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_empty_stream_still_valid() {
        let bytes = write_smf(&EventStream::default(), Tempo::default()).unwrap();
        let (_, kinds, _) = parse_track(&bytes);
        assert_eq!(kinds.len(), 2);
    }

    #[test]
    fn test_export_notes_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mid");

        export_notes(
            &path,
            &[Note::new("G4", 20, 60)],
            Tempo::default(),
            &EventConverter::default(),
        )
        .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(Smf::parse(&bytes).is_ok());
    }

    #[test]
    fn test_invalid_notes_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.mid");

        let result = export_notes(
            &path,
            &[Note::new("C4", 40, 20)],
            Tempo::default(),
            &EventConverter::default(),
        );
        assert!(matches!(result, Err(ExportError::Events(_))));
        assert!(!path.exists());
    }
}
