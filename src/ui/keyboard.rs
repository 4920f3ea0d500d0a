// Piano keyboard column drawn beside the editor rows

use crate::pitch::{PitchTable, is_sharp};
use eframe::egui;
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke};

pub const KEYBOARD_WIDTH: f32 = 40.0;

const WHITE_KEY: Color32 = Color32::from_gray(235);
const BLACK_KEY: Color32 = Color32::from_gray(40);
const C_KEY: Color32 = Color32::from_rgb(210, 225, 245);
const KEY_BORDER: Color32 = Color32::from_gray(100);

/// Fill of the key for a pitch name
pub fn key_color(name: &str) -> Color32 {
    if is_sharp(name) {
        BLACK_KEY
    } else if name.starts_with('C') {
        C_KEY
    } else {
        WHITE_KEY
    }
}

/// Draw one key per row, top row first, labelling every C
pub fn draw_keyboard(painter: &Painter, origin: Pos2, table: &PitchTable, row_height: f32) {
    for (row, name) in table.rows().enumerate() {
        let top = origin.y + row as f32 * row_height;
        let key_rect = Rect::from_min_max(
            Pos2::new(origin.x, top),
            Pos2::new(origin.x + KEYBOARD_WIDTH, top + row_height),
        );

        painter.rect_filled(key_rect, 0.0, key_color(name));
        painter.rect_stroke(key_rect, 0.0, Stroke::new(1.0, KEY_BORDER));

        if name.starts_with('C') && !is_sharp(name) {
            painter.text(
                Pos2::new(key_rect.right() - 4.0, key_rect.center().y),
                Align2::RIGHT_CENTER,
                name,
                FontId::proportional(10.0),
                Color32::BLACK,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_colors() {
        assert_eq!(key_color("C#4"), BLACK_KEY);
        assert_eq!(key_color("C4"), C_KEY);
        assert_eq!(key_color("E2"), WHITE_KEY);
    }
}
