// Editor drawing - one full frame of rows, grid and notes through the render pool

use super::TimelineEditor;
use crate::error::EditorError;
use crate::render::{Anchor, DrawingBackend, Rect, Rgb, Segment, Shape, Style};
use crate::sequencer::Note;

/// Cells between minor grid lines
const MINOR_EVERY: i64 = 4;
/// Cells between major grid lines
const MAJOR_EVERY: i64 = 16;
/// Rows per octave line
const OCTAVE_ROWS: usize = 12;
/// Horizontal inset of a note's label
const LABEL_INSET: f32 = 6.0;

/// Fixed colours of the editor surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub white_row: Rgb,
    pub black_row: Rgb,
    pub grid_line: Rgb,
    pub minor_line: Rgb,
    pub major_line: Rgb,
    pub row_line: Rgb,
    pub octave_line: Rgb,
    pub note_fill: Rgb,
    pub note_outline: Rgb,
    pub note_text: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            white_row: Rgb(58, 58, 64),
            black_row: Rgb(46, 46, 52),
            grid_line: Rgb(70, 70, 78),
            minor_line: Rgb(95, 95, 105),
            major_line: Rgb(140, 140, 150),
            row_line: Rgb(62, 62, 70),
            octave_line: Rgb(120, 120, 130),
            note_fill: Rgb(100, 150, 255),
            note_outline: Rgb(150, 150, 150),
            note_text: Rgb(0, 0, 0),
        }
    }
}

/// Screen span `(x0, x1)` of a note inside the window `[offset, offset + width)`
///
/// A note straddling the left edge is cut at x = 0; a note starting inside the
/// window keeps its full duration even if it runs past the right edge.
pub fn visible_span(note: &Note, offset: i64, width: i64) -> Option<(i64, i64)> {
    if note.start_time < offset {
        if note.end_time > offset {
            return Some((0, note.end_time - offset));
        }
        return None;
    }

    if note.start_time < offset + width {
        let x0 = note.start_time - offset;
        return Some((x0, x0 + note.duration()));
    }

    None
}

impl<B: DrawingBackend> TimelineEditor<B> {
    /// Redraw the whole surface
    pub fn redraw(&mut self) -> Result<(), EditorError> {
        self.pool.begin_frame()?;

        self.draw_rows()?;
        self.draw_vertical_lines()?;
        self.draw_horizontal_lines()?;
        self.draw_notes()?;

        Ok(())
    }

    fn draw_rows(&mut self) -> Result<(), EditorError> {
        let width = self.layout.visible_width as f32;
        let height = self.layout.row_height as f32;

        for (row, name) in self.table.rows().enumerate() {
            let fill = if crate::pitch::is_sharp(name) {
                self.palette.black_row
            } else {
                self.palette.white_row
            };
            let y = self.layout.row_top(row) as f32;

            self.pool.create(
                Shape::Rectangle(Rect::new(0.0, y, width, y + height)),
                Style::filled(fill).with_width(0.0),
            )?;
        }
        Ok(())
    }

    fn draw_vertical_lines(&mut self) -> Result<(), EditorError> {
        let cell = self.layout.cell_width;
        let bottom = self.layout.row_top(self.table.len()) as f32;

        // First screen x whose scrolled time lands on a cell boundary
        let mut x = (cell - self.offset.rem_euclid(cell)) % cell;
        while x < self.layout.visible_width {
            let index = self.layout.cell_index(x + self.offset);
            let (colour, width) = if index % MAJOR_EVERY == 0 {
                (self.palette.major_line, 2.0)
            } else if index % MINOR_EVERY == 0 {
                (self.palette.minor_line, 1.0)
            } else {
                (self.palette.grid_line, 1.0)
            };

            self.pool.create(
                Shape::Line(Segment::new(x as f32, 0.0, x as f32, bottom)),
                Style::filled(colour).with_width(width),
            )?;
            x += cell;
        }
        Ok(())
    }

    fn draw_horizontal_lines(&mut self) -> Result<(), EditorError> {
        let width = self.layout.visible_width as f32;

        for row in 0..=self.table.len() {
            let y = self.layout.row_top(row) as f32;
            let colour = if row % OCTAVE_ROWS == 0 {
                self.palette.octave_line
            } else {
                self.palette.row_line
            };

            self.pool.create(
                Shape::Line(Segment::new(0.0, y, width, y)),
                Style::filled(colour).with_width(1.0),
            )?;
        }
        Ok(())
    }

    fn draw_notes(&mut self) -> Result<(), EditorError> {
        let height = self.layout.row_height as f32;

        for note in self.notes.iter() {
            let Some((x0, x1)) = visible_span(note, self.offset, self.layout.visible_width) else {
                continue;
            };
            let row = self.table.row_of(&note.name)?;
            let y = self.layout.row_top(row) as f32;

            self.pool.create(
                Shape::Rectangle(Rect::new(x0 as f32, y, x1 as f32, y + height)),
                Style::filled(self.palette.note_fill).with_outline(self.palette.note_outline),
            )?;
            self.pool.create(
                Shape::label(x0 as f32 + LABEL_INSET, y + height / 2.0, note.name.clone()),
                Style::filled(self.palette.note_text).with_anchor(Anchor::West),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::GridLayout;
    use crate::render::{ItemKind, RetainedCanvas};

    fn editor() -> TimelineEditor<RetainedCanvas> {
        TimelineEditor::new(RetainedCanvas::new(), GridLayout::default(), 40)
    }

    #[test]
    fn test_visible_span_straddling_left_edge() {
        let note = Note::new("C4", 5, 15);
        assert_eq!(visible_span(&note, 10, 100), Some((0, 5)));
    }

    #[test]
    fn test_visible_span_inside_and_outside() {
        let note = Note::new("C4", 40, 80);
        assert_eq!(visible_span(&note, 0, 100), Some((40, 80)));
        // Runs past the right edge with its full duration
        assert_eq!(visible_span(&note, 0, 60), Some((40, 80)));
        // Fully left of the window
        assert_eq!(visible_span(&note, 80, 100), None);
        // Starting exactly at the window's end
        assert_eq!(visible_span(&note, 0, 40), None);
    }

    #[test]
    fn test_redraw_item_counts() {
        let mut editor = editor();
        editor
            .replace_notes(vec![Note::new("C4", 0, 40), Note::new("G5", 2000, 2040)])
            .unwrap();

        let pool = editor.pool();
        // 96 row backgrounds plus one visible note
        assert_eq!(pool.active_count(ItemKind::Rectangle), 97);
        assert_eq!(pool.active_count(ItemKind::Label), 1);
        // 800 / 20 vertical lines plus 97 row boundaries
        assert_eq!(pool.active_count(ItemKind::Line), 40 + 97);
    }

    #[test]
    fn test_redraw_reuses_items() {
        let mut editor = editor();
        editor.redraw().unwrap();
        let rectangles = editor.pool().allocated(ItemKind::Rectangle);

        editor.redraw().unwrap();
        editor.redraw().unwrap();
        assert_eq!(editor.pool().allocated(ItemKind::Rectangle), rectangles);
        let allocated: usize = ItemKind::ALL
            .iter()
            .map(|kind| editor.pool().allocated(*kind))
            .sum();
        assert_eq!(editor.backend().len(), allocated);
    }

    #[test]
    fn test_notes_draw_above_grid() {
        let mut editor = editor();
        editor.replace_notes(vec![Note::new("C4", 0, 40)]).unwrap();

        let visible = editor.backend().visible_items();
        let last = visible.last().unwrap();
        assert!(matches!(&last.shape, Shape::Label { text, .. } if text == "C4"));
    }

    #[test]
    fn test_grid_lines_follow_scroll() {
        let mut editor = editor();
        editor.set_offset(30).unwrap();

        let backend = editor.backend();
        let xs: Vec<f32> = editor
            .pool()
            .active_handles(ItemKind::Line)
            .filter_map(|h| match &backend.item(h)?.shape {
                Shape::Line(s) if s.x0 == s.x1 => Some(s.x0),
                _ => None,
            })
            .take(2)
            .collect();
        assert_eq!(xs, vec![10.0, 30.0]);
    }
}
