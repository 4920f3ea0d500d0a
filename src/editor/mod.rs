// Timeline editor - pointer gestures to note edits, redrawn through the render pool
//
// Pointer events arrive as typed commands (press / drag / release / hover /
// delete_at). Each command hit-tests against the note collection, advances the
// gesture state machine and redraws the whole surface.

pub mod draw;
pub mod gesture;
pub mod layout;

pub use draw::{Palette, visible_span};
pub use gesture::{Gesture, Hit, HitKind, HoverFeedback};
pub use layout::GridLayout;

use crate::error::EditorError;
use crate::pitch::PitchTable;
use crate::render::{DrawingBackend, RenderPool};
use crate::sequencer::{Note, NoteCollection};

/// Horizontal scroll request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollStep {
    /// One cell width per unit
    Units(i64),
    /// Four units per page
    Pages(i64),
}

/// Side effects requested by an editing command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorOutcome {
    /// Note to audition, as it is after the command
    pub audition: Option<Note>,
}

/// Editor state for one session
pub struct TimelineEditor<B: DrawingBackend> {
    notes: NoteCollection,
    pool: RenderPool<B>,
    layout: GridLayout,
    palette: Palette,
    table: &'static PitchTable,
    /// Time at the left edge of the viewport
    offset: i64,
    /// Width given to the next created note
    new_note_width: i64,
    gesture: Gesture,
}

impl<B: DrawingBackend> TimelineEditor<B> {
    pub fn new(backend: B, layout: GridLayout, default_note_width: i64) -> Self {
        Self {
            notes: NoteCollection::new(),
            pool: RenderPool::new(backend),
            layout,
            palette: Palette::default(),
            table: PitchTable::shared(),
            offset: 0,
            new_note_width: default_note_width,
            gesture: Gesture::Idle,
        }
    }

    /// Start a gesture: grab a note, or create one on empty space
    pub fn press(&mut self, x: f32, y: f32) -> Result<EditorOutcome, EditorError> {
        let time = self.pointer_time(x);
        let grid_time = self.layout.snap_time(time);

        let (gesture, audition) = match self.hit_test(time, y) {
            Some(hit) => {
                let Some(note) = self.notes.get(hit.note) else {
                    return Ok(EditorOutcome::default());
                };
                self.new_note_width = note.duration();

                let gesture = match hit.kind {
                    HitKind::Resize => Gesture::Resizing { note: hit.note },
                    HitKind::Move => Gesture::Moving {
                        note: hit.note,
                        grab_offset: grid_time - note.start_time,
                        last_auditioned: note.name.clone(),
                    },
                };
                (gesture, note.clone())
            }
            None => {
                let name = self.name_at(y);
                let start = grid_time.max(0);
                let note = Note::new(name.clone(), start, start + self.new_note_width);
                let id = self.notes.add(note.clone());
                tracing::debug!(%note, "created note");

                let gesture = Gesture::Moving {
                    note: id,
                    grab_offset: grid_time - start,
                    last_auditioned: name,
                };
                (gesture, note)
            }
        };

        tracing::trace!(?gesture, "gesture started");
        self.gesture = gesture;
        self.redraw()?;

        Ok(EditorOutcome {
            audition: Some(audition),
        })
    }

    /// Continue the active gesture at a new pointer position
    pub fn drag(&mut self, x: f32, y: f32) -> Result<EditorOutcome, EditorError> {
        let grid_time = self.layout.snap_time(self.pointer_time(x));
        let row = self
            .layout
            .clamped_row_at(y.floor() as i64, self.table.len());
        let mut outcome = EditorOutcome::default();

        match &mut self.gesture {
            Gesture::Idle => return Ok(outcome),
            Gesture::Moving {
                note,
                grab_offset,
                last_auditioned,
            } => {
                let Some(note) = self.notes.get_mut(*note) else {
                    self.gesture = Gesture::Idle;
                    return Ok(outcome);
                };

                let duration = note.duration();
                note.start_time = (grid_time - *grab_offset).max(0);
                note.end_time = note.start_time + duration;
                if let Some(name) = self.table.name_for_row(row) {
                    note.name = name.to_string();
                }

                if note.name != *last_auditioned {
                    *last_auditioned = note.name.clone();
                    outcome.audition = Some(note.clone());
                }
            }
            Gesture::Resizing { note } => {
                let Some(note) = self.notes.get_mut(*note) else {
                    self.gesture = Gesture::Idle;
                    return Ok(outcome);
                };

                note.end_time = grid_time;
                if note.duration() <= 0 {
                    note.end_time = note.start_time + self.layout.min_note_width;
                }
                self.new_note_width = note.duration();
            }
        }

        self.redraw()?;
        Ok(outcome)
    }

    /// End the active gesture
    pub fn release(&mut self) {
        if !self.gesture.is_idle() {
            tracing::trace!(gesture = ?self.gesture, "gesture released");
        }
        self.gesture = Gesture::Idle;
    }

    /// Remove the note under the pointer, if any
    pub fn delete_at(&mut self, x: f32, y: f32) -> Result<Option<Note>, EditorError> {
        let Some(hit) = self.hit_test(self.pointer_time(x), y) else {
            return Ok(None);
        };

        let removed = self.notes.remove(hit.note);
        if self.gesture.note() == Some(hit.note) {
            self.gesture = Gesture::Idle;
        }
        if let Some(note) = &removed {
            tracing::debug!(%note, "deleted note");
        }

        self.redraw()?;
        Ok(removed)
    }

    /// Cursor feedback for a pointer with no button pressed
    pub fn hover(&self, x: f32, y: f32) -> HoverFeedback {
        HoverFeedback::from(self.hit_test(self.pointer_time(x), y))
    }

    /// Find the note under a pointer time (scroll offset applied) and y coordinate
    ///
    /// The time is snapped to the grid for the body test; the resize edge is
    /// measured from the unsnapped time.
    pub fn hit_test(&self, time: i64, y: f32) -> Option<Hit> {
        let row = self.layout.row_at(y.floor() as i64);
        if row < 0 {
            return None;
        }

        let grid_time = self.layout.snap_time(time);
        let note = self.notes.find_at(grid_time, row as usize, self.table)?;

        let kind = if note.end_time - time < self.layout.resize_gap {
            HitKind::Resize
        } else {
            HitKind::Move
        };

        Some(Hit {
            note: note.id(),
            kind,
        })
    }

    /// Scroll horizontally; the offset never goes below zero
    pub fn scroll(&mut self, step: ScrollStep) -> Result<(), EditorError> {
        let units = match step {
            ScrollStep::Units(n) => n,
            ScrollStep::Pages(n) => n * 4,
        };
        self.set_offset(self.offset + units * self.layout.scroll_unit())
    }

    pub fn set_offset(&mut self, offset: i64) -> Result<(), EditorError> {
        self.offset = offset.max(0);
        self.redraw()
    }

    /// Resize the visible area
    pub fn set_viewport(&mut self, width: i64, height: i64) -> Result<(), EditorError> {
        self.layout.visible_width = width.max(0);
        self.layout.visible_height = height.max(0);
        self.redraw()
    }

    /// Remove every note
    pub fn reset(&mut self) -> Result<(), EditorError> {
        self.notes.clear();
        self.gesture = Gesture::Idle;
        self.redraw()
    }

    /// Swap in a loaded note list
    pub fn replace_notes(&mut self, notes: Vec<Note>) -> Result<(), EditorError> {
        self.notes.replace(notes);
        self.gesture = Gesture::Idle;
        self.redraw()
    }

    pub fn notes(&self) -> &NoteCollection {
        &self.notes
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn new_note_width(&self) -> i64 {
        self.new_note_width
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn table(&self) -> &'static PitchTable {
        self.table
    }

    pub fn pool(&self) -> &RenderPool<B> {
        &self.pool
    }

    /// Drawing surface, for hosts that paint it
    pub fn backend(&self) -> &B {
        self.pool.backend()
    }

    fn pointer_time(&self, x: f32) -> i64 {
        x.floor() as i64 + self.offset
    }

    fn name_at(&self, y: f32) -> String {
        let row = self
            .layout
            .clamped_row_at(y.floor() as i64, self.table.len());
        self.table
            .name_for_row(row)
            .map(str::to_string)
            .unwrap_or_default()
    }
}
