//! Wall canvas layout and pointer forwarding.
//!
//! The canvas fits a fixed-aspect wall into the available space and forwards
//! primary-button gestures to the session's drag controller. Moves and
//! releases are forwarded only while a gesture is active, so stray pointer
//! motion never reaches the controller.

use super::state::PreviewApp;
use crate::constants::*;
use eframe::egui;

/// Largest wall rectangle of the preview's aspect ratio that fits `canvas`, centered.
///
/// # Arguments
///
/// * `canvas` - Screen-space rectangle available to the wall
pub fn fit_wall(canvas: egui::Rect) -> egui::Rect {
    let available = canvas.shrink(WALL_MARGIN);
    let width = available.width().max(1.0);
    let height = available.height().max(1.0);
    let size = if width / height > WALL_ASPECT_RATIO {
        egui::vec2(height * WALL_ASPECT_RATIO, height)
    } else {
        egui::vec2(width, width / WALL_ASPECT_RATIO)
    };
    egui::Rect::from_center_size(canvas.center(), size)
}

impl PreviewApp {
    /// Draws the wall and handles pointer gestures on it.
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

        let wall = fit_wall(response.rect);
        self.last_wall_rect = Some(wall);

        self.handle_wall_pointer(ui, &response, wall);

        self.render_wall(&painter, wall);
    }

    /// Forwards press, move, release and loss of the primary button.
    fn handle_wall_pointer(&mut self, ui: &egui::Ui, response: &egui::Response, wall: egui::Rect) {
        let (pressed, released, down, pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
                i.pointer.latest_pos(),
            )
        });

        let Some(pos) = pos else {
            // Pointer left the window mid-gesture
            if self.session.is_dragging() {
                self.session.pointer_cancel();
            }
            return;
        };

        // Windows and popups above the wall take the press
        if pressed && response.hovered() && response.rect.contains(pos) {
            self.session.pointer_down(pos, wall);
        }

        if !self.session.is_dragging() {
            return;
        }
        if released {
            self.session.pointer_up(pos);
            // A click picks a frame, whose candidates start on the first page
            if !self.session.take_was_dragging() {
                self.restart_reveal();
            }
        } else if down {
            self.session.pointer_move(pos);
        } else {
            self.session.pointer_cancel();
        }
    }
}
