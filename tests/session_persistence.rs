// Integration test for session files and MIDI export
// Tests the complete save/load cycle through the editor

use pianoroll::editor::{GridLayout, TimelineEditor};
use pianoroll::midi::export_notes;
use pianoroll::project::{SessionError, load_session, save_session, with_session_extension};
use pianoroll::render::RetainedCanvas;
use pianoroll::sequencer::{EventConverter, Note, Tempo};
use std::path::PathBuf;
use tempfile::tempdir;

fn editor_with_melody() -> TimelineEditor<RetainedCanvas> {
    let mut editor = TimelineEditor::new(RetainedCanvas::new(), GridLayout::default(), 40);
    editor
        .replace_notes(vec![
            Note::new("C4", 0, 40),
            Note::new("D#4", 40, 100),
            Note::new("G4", 100, 120),
        ])
        .unwrap();
    editor
}

#[test]
fn test_complete_session_persistence() {
    let temp_dir = tempdir().unwrap();
    let path = with_session_extension(temp_dir.path().join("melody"));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("notes"));

    let editor = editor_with_melody();
    save_session(&path, editor.notes().notes(), Tempo::new(96.0)).unwrap();

    let session = load_session(&path).unwrap();
    assert_eq!(session.tempo().bpm(), 96.0);
    assert_eq!(session.notes, editor.notes().notes());
    for (saved, loaded) in editor.notes().iter().zip(&session.notes) {
        assert_eq!(saved.id(), loaded.id());
    }

    let mut restored = TimelineEditor::new(RetainedCanvas::new(), GridLayout::default(), 40);
    restored.replace_notes(session.notes).unwrap();
    assert_eq!(restored.notes().len(), 3);
}

#[test]
fn test_corrupt_file_leaves_editor_unchanged() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("broken.notes");
    std::fs::write(&path, "(version: 1, tempo_bpm: 120.0, notes: [(").unwrap();

    let mut editor = editor_with_melody();
    let before = editor.notes().snapshot();

    match load_session(&path) {
        Ok(session) => editor.replace_notes(session.notes).unwrap(),
        Err(e) => assert!(matches!(e, SessionError::Ron(_))),
    }
    assert_eq!(editor.notes().notes(), before.as_slice());
}

#[test]
fn test_missing_file() {
    let result = load_session(&PathBuf::from("/nonexistent/session.notes"));
    assert!(matches!(result, Err(SessionError::Io(_))));
}

#[test]
fn test_session_to_midi_file() {
    let temp_dir = tempdir().unwrap();
    let session_path = temp_dir.path().join("song.notes");
    let midi_path = temp_dir.path().join("song.mid");

    let editor = editor_with_melody();
    save_session(&session_path, editor.notes().notes(), Tempo::default()).unwrap();

    let session = load_session(&session_path).unwrap();
    export_notes(
        &midi_path,
        &session.notes,
        session.tempo(),
        &EventConverter::default(),
    )
    .unwrap();

    let bytes = std::fs::read(&midi_path).unwrap();
    let smf = midly::Smf::parse(&bytes).unwrap();
    // Tempo, three on/off pairs, end of track
    assert_eq!(smf.tracks[0].len(), 8);
}
