//! Wall rendering: frames, borders, assigned artworks and size labels.

use super::state::PreviewApp;
use crate::constants::*;
use eframe::egui;
use eframe::egui::{Color32, StrokeKind};

/// Moulding colour for a frame finish. Unknown or missing finishes draw black.
pub fn finish_color(finish: Option<&str>) -> Color32 {
    match finish.map(str::to_ascii_lowercase).as_deref() {
        Some("white") => Color32::from_gray(240),
        Some("oak") => Color32::from_rgb(196, 154, 108),
        Some("walnut") => Color32::from_rgb(92, 64, 51),
        _ => Color32::from_gray(25),
    }
}

/// Placeholder fill for an artwork, stable for a given id.
fn artwork_tint(id: &str) -> Color32 {
    let hash = id
        .bytes()
        .fold(17u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b)));
    let channel = |shift: u32| 70 + ((hash >> shift) & 0x7f) as u8;
    Color32::from_rgb(channel(0), channel(8), channel(16))
}

impl PreviewApp {
    /// Draws the wall and every frame on it, last frame on top.
    ///
    /// # Arguments
    ///
    /// * `painter` - The egui painter for drawing operations
    /// * `wall` - Screen-space rectangle of the wall
    pub fn render_wall(&self, painter: &egui::Painter, wall: egui::Rect) {
        let (wall_fill, mat_fill, text_color) = if self.dark_mode {
            (Color32::from_gray(58), Color32::from_gray(90), Color32::from_gray(220))
        } else {
            (
                Color32::from_rgb(236, 232, 224),
                Color32::from_gray(250),
                Color32::from_gray(40),
            )
        };
        painter.rect_filled(wall, 0.0, wall_fill);

        let moulding = finish_color(self.session.finish());
        let active = self.session.active_frame();
        let font = egui::FontId::proportional(11.0);

        for (index, placed) in self.session.placed_frames().iter().enumerate() {
            let rect = placed.frame.rect(wall, placed.offset);
            let border = placed.frame.border / 100.0 * wall.width();

            // Frames without a resolvable size are outlined only
            if placed.frame.fallback {
                painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.0, text_color), StrokeKind::Inside);
            } else {
                painter.rect_filled(rect, 0.0, moulding);
            }

            let inner = rect.shrink(border);
            match self.session.artwork(index) {
                Some(artwork) => {
                    painter.rect_filled(inner, 0.0, artwork_tint(&artwork.id));
                    painter.text(
                        inner.center(),
                        egui::Align2::CENTER_CENTER,
                        &artwork.title,
                        font.clone(),
                        Color32::WHITE,
                    );
                }
                None => {
                    painter.rect_filled(inner, 0.0, mat_fill);
                    painter.text(
                        inner.center(),
                        egui::Align2::CENTER_CENTER,
                        "+",
                        egui::FontId::proportional(18.0),
                        Color32::from_gray(150),
                    );
                }
            }

            painter.text(
                egui::pos2(rect.center().x, rect.max.y + 4.0),
                egui::Align2::CENTER_TOP,
                &placed.frame.label,
                font.clone(),
                text_color,
            );

            if active == Some(index) {
                painter.rect_stroke(
                    rect.expand(2.0),
                    0.0,
                    egui::Stroke::new(ACTIVE_STROKE_WIDTH, Color32::from_rgb(100, 150, 255)),
                    StrokeKind::Outside,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_colors() {
        assert_eq!(finish_color(Some("Oak")), finish_color(Some("oak")));
        assert_ne!(finish_color(Some("White")), finish_color(None));
        assert_eq!(finish_color(Some("Gold")), finish_color(None));
        let mut colors: Vec<Color32> = FRAME_FINISHES.iter().map(|f| finish_color(Some(*f))).collect();
        colors.dedup();
        assert_eq!(colors.len(), FRAME_FINISHES.len());
    }

    #[test]
    fn test_artwork_tint_is_stable() {
        assert_eq!(artwork_tint("fern"), artwork_tint("fern"));
        assert_ne!(artwork_tint("fern"), artwork_tint("city-lights"));
    }
}
