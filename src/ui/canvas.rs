// Canvas painting - draws the retained canvas with the egui painter

use crate::render::{Anchor, CanvasItem, RetainedCanvas, Rgb, Shape};
use eframe::egui;
use egui::{Align2, Color32, FontId, Painter, Pos2, Stroke, Vec2};

const LABEL_FONT_SIZE: f32 = 11.0;

pub fn to_color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

fn to_align(anchor: Option<Anchor>) -> Align2 {
    match anchor.unwrap_or_default() {
        Anchor::Center => Align2::CENTER_CENTER,
        Anchor::West => Align2::LEFT_CENTER,
        Anchor::East => Align2::RIGHT_CENTER,
    }
}

/// Paint every visible item, bottom to top, with canvas (0, 0) at `origin`
pub fn paint(painter: &Painter, origin: Pos2, canvas: &RetainedCanvas) {
    let offset = origin.to_vec2();

    for item in canvas.visible_items() {
        paint_item(painter, offset, item);
    }
}

fn paint_item(painter: &Painter, offset: Vec2, item: &CanvasItem) {
    let style = &item.style;

    match &item.shape {
        Shape::Rectangle(r) => {
            let rect = egui::Rect::from_min_max(
                Pos2::new(r.x0, r.y0) + offset,
                Pos2::new(r.x1, r.y1) + offset,
            );
            if let Some(fill) = style.fill {
                painter.rect_filled(rect, 0.0, to_color(fill));
            }
            if let Some(outline) = style.outline {
                let width = style.width.unwrap_or(1.0);
                if width > 0.0 {
                    painter.rect_stroke(rect, 0.0, Stroke::new(width, to_color(outline)));
                }
            }
        }
        Shape::Line(s) => {
            let colour = style.fill.map(to_color).unwrap_or(Color32::GRAY);
            painter.line_segment(
                [Pos2::new(s.x0, s.y0) + offset, Pos2::new(s.x1, s.y1) + offset],
                Stroke::new(style.width.unwrap_or(1.0), colour),
            );
        }
        Shape::Label { x, y, text } => {
            painter.text(
                Pos2::new(*x, *y) + offset,
                to_align(style.anchor),
                text,
                FontId::proportional(LABEL_FONT_SIZE),
                style.fill.map(to_color).unwrap_or(Color32::BLACK),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colour_and_anchor_mapping() {
        assert_eq!(to_color(Rgb(1, 2, 3)), Color32::from_rgb(1, 2, 3));
        assert_eq!(to_align(None), Align2::CENTER_CENTER);
        assert_eq!(to_align(Some(Anchor::West)), Align2::LEFT_CENTER);
        assert_eq!(to_align(Some(Anchor::East)), Align2::RIGHT_CENTER);
    }
}
