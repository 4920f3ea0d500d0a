// Gesture state - what the pointer is doing between press and release

use crate::sequencer::NoteId;

/// How a press on a note is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// Pressed on the body: drag moves the note
    Move,
    /// Pressed near the end edge: drag changes the end time
    Resize,
}

/// Result of hit-testing a pointer position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub note: NoteId,
    pub kind: HitKind,
}

/// The single active pointer gesture
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Moving a note (freshly created or existing)
    Moving {
        note: NoteId,
        /// Snapped pointer time minus the note start at press time
        grab_offset: i64,
        /// Pitch most recently auditioned during this gesture
        last_auditioned: String,
    },
    Resizing {
        note: NoteId,
    },
}

impl Gesture {
    /// Note the gesture acts on
    pub fn note(&self) -> Option<NoteId> {
        match self {
            Gesture::Idle => None,
            Gesture::Moving { note, .. } | Gesture::Resizing { note } => Some(*note),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

/// Cursor feedback while no button is pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverFeedback {
    ResizeEdge,
    NoteBody,
    Empty,
}

impl From<Option<Hit>> for HoverFeedback {
    fn from(hit: Option<Hit>) -> Self {
        match hit.map(|h| h.kind) {
            Some(HitKind::Resize) => HoverFeedback::ResizeEdge,
            Some(HitKind::Move) => HoverFeedback::NoteBody,
            None => HoverFeedback::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_note() {
        let id = NoteId::new();
        assert_eq!(Gesture::Idle.note(), None);
        assert_eq!(Gesture::Resizing { note: id }.note(), Some(id));
        assert!(Gesture::default().is_idle());
    }

    #[test]
    fn test_hover_from_hit() {
        let note = NoteId::new();
        assert_eq!(
            HoverFeedback::from(Some(Hit {
                note,
                kind: HitKind::Resize
            })),
            HoverFeedback::ResizeEdge
        );
        assert_eq!(
            HoverFeedback::from(Some(Hit {
                note,
                kind: HitKind::Move
            })),
            HoverFeedback::NoteBody
        );
        assert_eq!(HoverFeedback::from(None), HoverFeedback::Empty);
    }
}
