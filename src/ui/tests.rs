use super::*;
use crate::samples::{build_sample, SampleKind};
use eframe::egui;

fn raw_input(events: Vec<egui::Event>) -> egui::RawInput {
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(egui::Rect::from_min_size(
        egui::Pos2::ZERO,
        egui::vec2(1200.0, 800.0),
    ));
    raw.events = events;
    raw
}

/// Run one headless frame that draws only the wall canvas.
fn run_canvas(ctx: &egui::Context, app: &mut PreviewApp, events: Vec<egui::Event>) {
    let _ = ctx.run(raw_input(events), |ctx| {
        ctx.set_visuals(egui::Visuals::dark());
        egui::CentralPanel::default().show(ctx, |ui| {
            app.draw_canvas(ui);
        });
    });
}

fn press(pos: egui::Pos2) -> Vec<egui::Event> {
    vec![
        egui::Event::PointerMoved(pos),
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed: true,
            modifiers: egui::Modifiers::NONE,
        },
    ]
}

fn release(pos: egui::Pos2) -> Vec<egui::Event> {
    vec![
        egui::Event::PointerMoved(pos),
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed: false,
            modifiers: egui::Modifiers::NONE,
        },
    ]
}

/// Draws once so the wall rectangle is known, then returns frame centers.
fn frame_centers(ctx: &egui::Context, app: &mut PreviewApp) -> (egui::Rect, Vec<egui::Pos2>) {
    run_canvas(ctx, app, vec![]);
    let wall = app.last_wall_rect.expect("canvas should record the wall");
    let centers = app
        .session
        .frame_rects(wall)
        .iter()
        .map(|rect| rect.center())
        .collect();
    (wall, centers)
}

fn drag_on_canvas(ctx: &egui::Context, app: &mut PreviewApp, from: egui::Pos2, to: egui::Pos2) {
    run_canvas(ctx, app, press(from));
    run_canvas(ctx, app, vec![egui::Event::PointerMoved(from.lerp(to, 0.5))]);
    run_canvas(ctx, app, vec![egui::Event::PointerMoved(to)]);
    run_canvas(ctx, app, release(to));
}

fn near(a: egui::Vec2, b: egui::Vec2) -> bool {
    (a - b).length() < 1e-3
}

#[test]
fn clicking_a_frame_selects_it() {
    let mut app = PreviewApp::default();
    let ctx = egui::Context::default();
    let (_, centers) = frame_centers(&ctx, &mut app);

    run_canvas(&ctx, &mut app, press(centers[2]));
    assert!(app.session.is_dragging());
    run_canvas(&ctx, &mut app, release(centers[2]));

    assert!(!app.session.is_dragging());
    assert_eq!(app.session.active_frame(), Some(2));
    assert!(!app.session.can_undo(), "a click must not record history");
}

#[test]
fn locked_drag_moves_the_whole_wall_and_can_be_undone() {
    let mut app = PreviewApp::default();
    let ctx = egui::Context::default();
    let (wall, centers) = frame_centers(&ctx, &mut app);
    let before = app.session.frame_rects(wall);

    let to = centers[0] + egui::vec2(60.0, 30.0);
    drag_on_canvas(&ctx, &mut app, centers[0], to);

    let after = app.session.frame_rects(wall);
    for (a, b) in before.iter().zip(&after) {
        assert!(near(b.center() - a.center(), egui::vec2(60.0, 30.0)));
    }
    assert_eq!(app.session.active_frame(), None);
    assert!(app.session.can_undo());

    let mut raw = raw_input(vec![egui::Event::Key {
        key: egui::Key::Z,
        physical_key: Some(egui::Key::Z),
        pressed: true,
        repeat: false,
        modifiers: egui::Modifiers::COMMAND,
    }]);
    raw.modifiers = egui::Modifiers::COMMAND;
    let _ = ctx.run(raw, |ctx| {
        app.handle_undo_redo_keys(ctx);
    });

    assert_eq!(app.session.frame_rects(wall), before);
    assert!(app.session.can_redo());
}

#[test]
fn unlocked_drag_moves_only_the_pressed_frame() {
    let mut app = PreviewApp::default();
    app.session.set_locked(false);
    let ctx = egui::Context::default();
    let (wall, centers) = frame_centers(&ctx, &mut app);
    let before = app.session.frame_rects(wall);

    drag_on_canvas(&ctx, &mut app, centers[1], centers[1] + egui::vec2(0.0, 40.0));

    let after = app.session.frame_rects(wall);
    assert!(near(after[1].center() - before[1].center(), egui::vec2(0.0, 40.0)));
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
}

#[test]
fn unlocked_press_on_empty_wall_does_nothing() {
    let mut app = PreviewApp::default();
    app.session.set_locked(false);
    let ctx = egui::Context::default();
    let (wall, _) = frame_centers(&ctx, &mut app);

    let corner = wall.min + egui::vec2(2.0, 2.0);
    run_canvas(&ctx, &mut app, press(corner));
    assert!(!app.session.is_dragging());
    run_canvas(&ctx, &mut app, release(corner + egui::vec2(80.0, 0.0)));
    assert!(!app.session.can_undo());
}

#[test]
fn pointer_moves_without_a_press_are_ignored() {
    let mut app = PreviewApp::default();
    let ctx = egui::Context::default();
    let (wall, centers) = frame_centers(&ctx, &mut app);
    let before = app.session.frame_rects(wall);

    run_canvas(&ctx, &mut app, vec![egui::Event::PointerMoved(centers[0])]);
    run_canvas(
        &ctx,
        &mut app,
        vec![egui::Event::PointerMoved(centers[0] + egui::vec2(100.0, 0.0))],
    );

    assert_eq!(app.session.frame_rects(wall), before);
    assert!(!app.session.can_undo());
}

/// Like `run_canvas`, with an interactive overlay above the wall at `overlay`.
fn run_canvas_under_overlay(
    ctx: &egui::Context,
    app: &mut PreviewApp,
    overlay: egui::Rect,
    events: Vec<egui::Event>,
) {
    let _ = ctx.run(raw_input(events), |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            app.draw_canvas(ui);
        });
        egui::Area::new(egui::Id::new("overlay"))
            .order(egui::Order::Foreground)
            .fixed_pos(overlay.min)
            .show(ctx, |ui| {
                ui.allocate_exact_size(overlay.size(), egui::Sense::click());
            });
    });
}

#[test]
fn press_on_an_overlay_above_the_wall_is_not_a_gesture() {
    let mut app = PreviewApp::default();
    let ctx = egui::Context::default();
    let (_, centers) = frame_centers(&ctx, &mut app);
    let overlay = egui::Rect::from_center_size(centers[1], egui::vec2(80.0, 80.0));

    for _ in 0..2 {
        run_canvas_under_overlay(&ctx, &mut app, overlay, vec![]);
    }
    run_canvas_under_overlay(&ctx, &mut app, overlay, press(centers[1]));
    assert!(!app.session.is_dragging());
    run_canvas_under_overlay(&ctx, &mut app, overlay, release(centers[1]));

    assert_eq!(app.session.active_frame(), None);
    assert!(!app.session.can_undo());
}

#[test]
fn template_change_with_artwork_waits_for_confirmation() {
    let mut app = PreviewApp::default();
    let artwork = app.catalog[0].clone();
    app.session.assign_artwork(0, artwork);

    app.select_template(SampleKind::Grid);
    assert_eq!(app.session.template().id, "trio");
    assert_eq!(
        app.session.pending_template().map(|t| t.id.as_str()),
        Some("grid")
    );

    app.confirm_template_change();
    assert_eq!(app.session.template().id, "grid");
    assert!(app.session.artworks().is_empty());
    assert!(app.session.pending_template().is_none());
}

#[test]
fn template_change_without_artwork_applies_at_once() {
    let mut app = PreviewApp::default();
    app.select_template(SampleKind::Salon);
    assert_eq!(app.session.template(), &build_sample(SampleKind::Salon));
    assert!(app.session.pending_template().is_none());
}

#[test]
fn show_more_completes_after_the_delay() {
    let mut app = PreviewApp::default();
    app.pager = crate::matching::RevealPager::new(2);
    let total = app.catalog.len();
    let ctx = egui::Context::default();

    app.request_reveal(total, 0.0);
    assert!(app.pager.is_pending());
    app.request_reveal(total, 0.1);
    assert_eq!(app.reveal_due, Some(0.5));

    let mut raw = raw_input(vec![]);
    raw.time = Some(0.2);
    let _ = ctx.run(raw, |ctx| app.tick_reveal(ctx));
    assert!(app.pager.is_pending());
    assert_eq!(app.pager.visible_count(total), 2);

    let mut raw = raw_input(vec![]);
    raw.time = Some(0.6);
    let _ = ctx.run(raw, |ctx| app.tick_reveal(ctx));
    assert!(!app.pager.is_pending());
    assert_eq!(app.pager.visible_count(total), 4);
    assert!(app.reveal_due.is_none());
}

#[test]
fn settings_survive_a_restart() {
    let mut app = PreviewApp::default();
    app.select_template(SampleKind::Grid);
    app.session.set_unit(SizeUnit::Inches);
    app.dark_mode = false;

    let json = app.settings().to_json().unwrap();
    let restored = PreviewApp::new(PreviewSettings::from_json(&json).unwrap());
    assert_eq!(restored.session.template().id, "grid");
    assert_eq!(restored.session.unit(), SizeUnit::Inches);
    assert!(!restored.dark_mode);
    assert!(!restored.session.can_undo());
}

#[test]
fn unknown_stored_template_falls_back() {
    let settings = PreviewSettings {
        template_id: "gone".into(),
        ..Default::default()
    };
    let app = PreviewApp::new(settings);
    assert_eq!(app.session.template().id, "solo");
    assert_eq!(PreviewApp::restore(None).session.template().id, "trio");
}

#[test]
fn full_update_renders_without_panicking() {
    let mut app = PreviewApp::default();
    app.session.assign_artwork(1, app.catalog[1].clone());
    app.session.set_active_frame(Some(1));
    let ctx = egui::Context::default();
    for _ in 0..2 {
        let _ = ctx.run(raw_input(vec![]), |ctx| {
            egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
                app.draw_toolbar(ui);
                app.draw_layout_controls(ui);
            });
            egui::SidePanel::right("picker_panel").show(ctx, |ui| {
                app.draw_picker_panel(ui);
            });
            egui::CentralPanel::default().show(ctx, |ui| {
                app.draw_canvas(ui);
            });
        });
    }
    assert!(app.last_wall_rect.is_some());
    assert!(!app.session.can_undo());
}
