//! Desktop preview of the gallery wall engine.
//!
//! Stands in for the storefront's orchestration layer: it owns a
//! [`crate::session::LayoutSession`], forwards pointer gestures to it and
//! draws what it resolves.
//!
//! # Module Organization
//!
//! - `state` - The `PreviewApp` struct and its persisted settings
//! - `canvas` - Wall fitting and pointer forwarding
//! - `rendering` - Drawing frames, borders and labels

mod canvas;
mod rendering;
mod state;

pub use state::{PreviewApp, PreviewSettings, SETTINGS_KEY};

use crate::constants::*;
use crate::matching::{self, FilterDimension};
use crate::pricing::{self, PriceSource};
use crate::samples::all_samples;
use crate::types::*;
use eframe::egui;
use std::time::Duration;

/// Print sizes offered in the size pickers.
const SIZE_CHOICES: [&str; 7] = ["30x30", "30x40", "40x50", "50x70", "A4", "A3", "A2"];

impl eframe::App for PreviewApp {
    /// Persist presentation settings between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.settings().to_json() {
            Ok(json) => {
                storage.set_string(SETTINGS_KEY, json);
            }
            Err(err) => {
                log::warn!("Failed to serialize preview settings: {err}");
            }
        }
    }

    /// Main update function called by egui for each frame.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context
    /// * `_frame` - The eframe frame
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_undo_redo_keys(ctx);
        self.tick_reveal(ctx);

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
            ui.add_space(2.0);
            self.draw_layout_controls(ui);
        });

        egui::SidePanel::right("picker_panel")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                self.draw_picker_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });

        self.draw_template_confirmation(ctx);
    }
}

impl PreviewApp {
    /// Handles Ctrl/Cmd+Z (undo) and Ctrl/Cmd+Shift+Z or Ctrl/Cmd+Y (redo).
    ///
    /// Ignored while a text field has keyboard focus.
    fn handle_undo_redo_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Z) && i.modifiers.command && !i.modifiers.shift) {
            self.perform_undo();
        } else if ctx.input(|i| {
            (i.key_pressed(egui::Key::Z) && i.modifiers.command && i.modifiers.shift)
                || (i.key_pressed(egui::Key::Y) && i.modifiers.command)
        }) {
            self.perform_redo();
        }
    }

    /// Completes a pending reveal once its delay has elapsed.
    fn tick_reveal(&mut self, ctx: &egui::Context) {
        let Some(due) = self.reveal_due else {
            return;
        };
        let now = ctx.input(|i| i.time);
        if now >= due {
            self.pager.complete();
            self.reveal_due = None;
        } else {
            ctx.request_repaint_after(Duration::from_secs_f64(due - now));
        }
    }

    /// Starts a staged reveal of the next page of results.
    fn request_reveal(&mut self, total: usize, now: f64) {
        if self.pager.request_more(total) {
            let delay = self.session.config().reveal_delay_ms as f64 / 1000.0;
            self.reveal_due = Some(now + delay);
        }
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            let mut chosen = None;
            egui::ComboBox::from_id_salt("template_combo")
                .selected_text(self.session.template().name.clone())
                .show_ui(ui, |ui| {
                    for info in all_samples() {
                        let current = self.session.template().name == info.name;
                        if ui.selectable_label(current, info.name).clicked() {
                            chosen = Some(info.kind);
                        }
                    }
                });
            if let Some(kind) = chosen {
                self.select_template(kind);
            }

            let unit = self.session.unit();
            if ui.button(format!("Units: {}", unit.suffix())).clicked() {
                self.session.set_unit(unit.toggled());
            }

            let orientation = self.session.snapshot().orientation;
            let mut selected = orientation;
            egui::ComboBox::from_id_salt("orientation_combo")
                .selected_text(orientation_name(orientation))
                .show_ui(ui, |ui| {
                    for hint in [
                        OrientationHint::Auto,
                        OrientationHint::Portrait,
                        OrientationHint::Landscape,
                    ] {
                        ui.selectable_value(&mut selected, hint, orientation_name(hint));
                    }
                });
            if selected != orientation {
                self.session.set_orientation(selected);
            }

            let mut locked = self.session.is_locked();
            if ui.checkbox(&mut locked, "Lock composition").changed() {
                self.session.set_locked(locked);
            }

            ui.separator();

            ui.add_enabled_ui(self.session.can_undo(), |ui| {
                if ui.button("⟲ Undo").clicked() {
                    self.perform_undo();
                }
            });
            ui.add_enabled_ui(self.session.can_redo(), |ui| {
                if ui.button("⟳ Redo").clicked() {
                    self.perform_redo();
                }
            });
            if ui.button("Reset positions").clicked() {
                self.session.reset_positions();
            }
            if ui.button("Start over").clicked() {
                self.session.reset();
                self.filter = Default::default();
                self.search.clear();
                self.checkout_status = None;
                self.restart_reveal();
            }

            ui.separator();
            ui.checkbox(&mut self.dark_mode, "Dark mode");
        });
    }

    fn draw_layout_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            let (mut wall_scale, mut spacing) = {
                let snapshot = self.session.snapshot();
                (snapshot.wall_scale, snapshot.spacing)
            };
            let scale_response = ui.add(
                egui::Slider::new(&mut wall_scale, WALL_SCALE_MIN..=WALL_SCALE_MAX)
                    .text("Wall scale")
                    .suffix("%"),
            );
            let spacing_response = ui.add(
                egui::Slider::new(&mut spacing, SPACING_MIN..=SPACING_MAX)
                    .text("Spacing")
                    .suffix("%"),
            );
            if scale_response.changed() || spacing_response.changed() {
                self.session.preview_scale(wall_scale, spacing);
            }
            // One history entry per slider gesture
            if !scale_response.dragged() && !spacing_response.dragged() {
                self.session.commit_draft();
            }

            ui.separator();

            let global = self.session.snapshot().sizes.global.clone();
            let mut selected = global.clone();
            egui::ComboBox::from_id_salt("global_size_combo")
                .selected_text(global.as_deref().unwrap_or("Template sizes"))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut selected, None, "Template sizes");
                    for size in SIZE_CHOICES {
                        ui.selectable_value(&mut selected, Some(size.to_string()), size);
                    }
                });
            if selected != global {
                self.session.set_global_size(selected);
                self.restart_reveal();
            }

            let finish = self.session.finish().map(str::to_string);
            let mut selected = finish.clone();
            egui::ComboBox::from_id_salt("finish_combo")
                .selected_text(finish.as_deref().unwrap_or("No finish"))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut selected, None, "No finish");
                    for choice in FRAME_FINISHES {
                        ui.selectable_value(&mut selected, Some(choice.to_string()), choice);
                    }
                });
            if selected != finish {
                self.session.set_finish(selected);
            }
        });
    }

    fn draw_picker_panel(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.heading("Frame");
                match self.session.active_frame() {
                    Some(index) => self.draw_frame_controls(ui, index),
                    None => {
                        ui.label("Click a frame on the wall to choose its artwork.");
                    }
                }

                ui.separator();
                ui.heading("Artworks");
                self.draw_filters(ui);
                ui.add_space(4.0);
                self.draw_results(ui);

                ui.separator();
                self.draw_summary(ui);
            });
    }

    fn draw_frame_controls(&mut self, ui: &mut egui::Ui, index: FrameIndex) {
        let requested = self.session.requested_size(index).unwrap_or_default();
        ui.label(format!("Frame {} · {}", index + 1, requested));

        let current = self
            .session
            .snapshot()
            .sizes
            .overrides
            .get(index)
            .cloned()
            .flatten();
        let mut selected = current.clone();
        egui::ComboBox::from_id_salt("frame_size_combo")
            .selected_text(current.as_deref().unwrap_or("Default size"))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut selected, None, "Default size");
                for size in SIZE_CHOICES {
                    ui.selectable_value(&mut selected, Some(size.to_string()), size);
                }
            });
        if selected != current {
            self.session.set_frame_size(index, selected);
            self.restart_reveal();
        }

        let current = self
            .session
            .snapshot()
            .sizes
            .orientation_overrides
            .get(index)
            .copied()
            .flatten();
        let mut selected = current;
        egui::ComboBox::from_id_salt("frame_orientation_combo")
            .selected_text(current.map_or("Default orientation", orientation_name))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut selected, None, "Default orientation");
                for hint in [OrientationHint::Portrait, OrientationHint::Landscape] {
                    ui.selectable_value(&mut selected, Some(hint), orientation_name(hint));
                }
            });
        if selected != current {
            self.session.set_frame_orientation(index, selected);
        }

        let hung = self.session.artwork(index).map(|a| a.title.clone());
        if let Some(title) = hung {
            ui.horizontal(|ui| {
                ui.label(title);
                if ui.button("Remove").clicked() {
                    self.session.remove_artwork(index);
                }
            });
        }
    }

    fn draw_filters(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Search");
            if ui.text_edit_singleline(&mut self.search).changed() {
                self.filter.set_search(&self.search);
                self.restart_reveal();
            }
        });

        for dimension in FilterDimension::ALL {
            if dimension == FilterDimension::Text {
                continue;
            }
            let values = matching::facet_values(&self.catalog, dimension);
            if values.is_empty() {
                continue;
            }
            let mut toggled = None;
            let mut cleared = false;
            let title = if self.filter.is_active(dimension) {
                format!("{} ({})", dimension.label(), self.filter.values(dimension).len())
            } else {
                dimension.label().to_string()
            };
            egui::CollapsingHeader::new(title)
                .id_salt(dimension.label())
                .show(ui, |ui| {
                    if self.filter.is_active(dimension) && ui.small_button("Clear").clicked() {
                        cleared = true;
                    }
                    ui.horizontal_wrapped(|ui| {
                        for value in &values {
                            let selected = self.filter.is_selected(dimension, value);
                            if ui.selectable_label(selected, value.as_str()).clicked() {
                                toggled = Some(value.clone());
                            }
                        }
                    });
                });
            if let Some(value) = toggled {
                self.filter.toggle(dimension, &value);
                self.restart_reveal();
            }
            if cleared {
                self.filter.clear_dimension(dimension);
                self.restart_reveal();
            }
        }
    }

    fn draw_results(&mut self, ui: &mut egui::Ui) {
        let active = self.session.active_frame();
        let frame_size = active.and_then(|index| self.session.required_size(index));
        let candidates: Vec<&Artwork> = match active {
            Some(index) => self.session.candidates_for_frame(&self.catalog, &self.filter, index),
            None => matching::filter_catalog(&self.catalog, &self.filter),
        };
        let total = candidates.len();
        if total == 0 {
            ui.label("No artworks match these filters.");
        }

        let mut assign = None;
        for artwork in candidates.iter().take(self.pager.visible_count(total)) {
            ui.horizontal(|ui| {
                ui.label(artwork.title.as_str());
                if let (Some(index), Some(size)) = (active, frame_size.as_deref()) {
                    let resolved = pricing::resolve_variant(artwork, size);
                    ui.weak(format!("{:.2} {}", resolved.price, artwork.currency));
                    if ui.button("Hang here").clicked() {
                        assign = Some((index, (*artwork).clone()));
                    }
                }
            });
        }

        if self.pager.is_pending() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading more…");
            });
        } else if self.pager.has_more(total) && ui.button("Show more").clicked() {
            let now = ui.input(|i| i.time);
            self.request_reveal(total, now);
        }

        if let Some((index, artwork)) = assign {
            self.session.assign_artwork(index, artwork);
            self.checkout_status = None;
        }
    }

    fn draw_summary(&mut self, ui: &mut egui::Ui) {
        ui.heading("Your wall");
        let items = self.session.line_items();
        if items.is_empty() {
            ui.label("No artworks placed yet.");
        }
        for item in &items {
            let note = if item.source == PriceSource::Exact {
                ""
            } else {
                " (approximate)"
            };
            ui.label(format!(
                "Frame {} · {} · {}: {:.2} {}{note}",
                item.frame_index + 1,
                item.title,
                item.size,
                item.price,
                item.currency
            ));
        }
        let currency = items.first().map_or("EUR", |item| item.currency.as_str());
        ui.strong(format!("Total: {:.2} {currency}", pricing::total(&items)));

        if ui.button("Checkout").clicked() {
            self.checkout_status = Some(match self.session.checkout_lines() {
                Ok(lines) => format!("{} prints ready for checkout", lines.len()),
                Err(err) => err.to_string(),
            });
        }
        if let Some(status) = &self.checkout_status {
            ui.label(status.as_str());
        }
    }

    fn draw_template_confirmation(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.session.pending_template() else {
            return;
        };
        let name = pending.name.clone();
        let mut confirm = false;
        let mut cancel = false;
        egui::Window::new("Replace layout?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(format!(
                    "Switching to {name} removes the artworks you placed. Continue?"
                ));
                ui.horizontal(|ui| {
                    if ui.button("Replace").clicked() {
                        confirm = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });
        if confirm {
            self.confirm_template_change();
        } else if cancel {
            self.session.cancel_template_change();
        }
    }
}

fn orientation_name(hint: OrientationHint) -> &'static str {
    match hint {
        OrientationHint::Auto => "As designed",
        OrientationHint::Portrait => "Portrait",
        OrientationHint::Landscape => "Landscape",
    }
}

#[cfg(test)]
mod tests;
