//! One shopper's configurator session.
//!
//! The session is the engine's single entry point. The orchestration layer
//! hands it a template and the catalog's artworks and gets back geometry,
//! offsets, candidate artworks and priced line items. Nothing here is shared
//! between sessions.
//!
//! Layout-affecting state lives in [`LayoutSnapshot`]s inside a [`History`],
//! so every committed change can be undone as a whole.

use crate::config::EngineConfig;
use crate::constants::*;
use crate::drag::{DragController, DragRelease};
use crate::error::CheckoutError;
use crate::geometry::{self, LayoutOptions};
use crate::history::History;
use crate::matching::{self, ArtworkFilter};
use crate::pricing::{self, CheckoutLine, LineItem};
use crate::types::*;
use egui::{Pos2, Rect, Vec2};

/// Layout-affecting state recorded in history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSnapshot {
    /// Drag offsets
    pub offsets: PersistedOffsets,
    /// Size and per-frame orientation choices
    pub sizes: PrintSizeSelection,
    /// Global orientation
    pub orientation: OrientationHint,
    /// Wall scale percentage
    pub wall_scale: f32,
    /// Spacing percentage
    pub spacing: f32,
}

/// A resolved frame together with the offset it renders at.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedFrame {
    /// Geometry in wall percent
    pub frame: RenderFrame,
    /// Effective drag offset, in pointer units
    pub offset: Vec2,
}

/// Outcome of asking to replace the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateChange {
    /// The template was replaced
    Applied,
    /// Artworks are assigned; call [`LayoutSession::confirm_template_change`] to proceed
    NeedsConfirmation,
}

/// State of a single configurator session.
#[derive(Debug, Clone)]
pub struct LayoutSession {
    config: EngineConfig,
    template: LayoutTemplate,
    pending_template: Option<LayoutTemplate>,
    unit: SizeUnit,
    finish: Option<String>,
    artworks: SelectedArtworks,
    active_frame: Option<FrameIndex>,
    drag: DragController,
    history: History<LayoutSnapshot>,
    /// Uncommitted edit shown while a slider is being dragged
    draft: Option<LayoutSnapshot>,
}

impl LayoutSession {
    /// Starts a session on `template`, locked, with nothing assigned.
    pub fn new(template: LayoutTemplate, config: EngineConfig) -> Self {
        let drag = DragController::new(true, config.click_threshold);
        let history = History::new(LayoutSnapshot::default(), config.history_depth);
        Self {
            config,
            template,
            pending_template: None,
            unit: SizeUnit::default(),
            finish: None,
            artworks: SelectedArtworks::new(),
            active_frame: None,
            drag,
            history,
            draft: None,
        }
    }

    /// Engine configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The current template.
    pub fn template(&self) -> &LayoutTemplate {
        &self.template
    }

    /// Number of frames in the current template.
    pub fn frame_count(&self) -> usize {
        self.template.frames.len()
    }

    /// Snapshot currently shown, including an uncommitted draft.
    pub fn snapshot(&self) -> &LayoutSnapshot {
        self.draft.as_ref().unwrap_or_else(|| self.history.current())
    }

    /// Geometry options derived from the current snapshot.
    pub fn options(&self) -> LayoutOptions {
        let snapshot = self.snapshot();
        LayoutOptions {
            unit: self.unit,
            orientation: snapshot.orientation,
            wall_scale: snapshot.wall_scale,
            spacing: snapshot.spacing,
            border_ratio: self.config.border_ratio,
            min_border: self.config.min_border,
        }
    }

    /// Resolved geometry, one frame per template slot.
    pub fn frames(&self) -> Vec<RenderFrame> {
        geometry::resolve(&self.template.frames, &self.snapshot().sizes, &self.options())
    }

    /// Offset a frame renders at, including a drag in progress.
    pub fn frame_offset(&self, index: FrameIndex) -> Vec2 {
        self.drag.offset_for(index, &self.snapshot().offsets)
    }

    /// Resolved frames with their effective offsets, in frame order.
    pub fn placed_frames(&self) -> Vec<PlacedFrame> {
        self.frames()
            .into_iter()
            .enumerate()
            .map(|(index, frame)| PlacedFrame {
                frame,
                offset: self.frame_offset(index),
            })
            .collect()
    }

    /// Screen rectangles of every frame on a wall drawn into `wall`.
    pub fn frame_rects(&self, wall: Rect) -> Vec<Rect> {
        self.placed_frames()
            .iter()
            .map(|placed| placed.frame.rect(wall, placed.offset))
            .collect()
    }

    /// Topmost frame under `pos`, if any.
    pub fn frame_at(&self, pos: Pos2, wall: Rect) -> Option<FrameIndex> {
        self.frame_rects(wall)
            .iter()
            .rposition(|rect| rect.contains(pos))
    }

    /// Size string a frame requires: its override, the global size or the slot's own.
    pub fn requested_size(&self, index: FrameIndex) -> Option<String> {
        let slot = self.template.frames.get(index)?;
        Some(self.snapshot().sizes.size_for(index, slot).to_string())
    }

    /// Size an artwork must be sold in to fill a frame.
    ///
    /// This is the requested size, rewritten in centimetres when the frame's
    /// orientation turns it ("30x40" on a landscape frame becomes "40x30").
    pub fn required_size(&self, index: FrameIndex) -> Option<String> {
        let requested = self.requested_size(index)?;
        let frames = self.frames();
        let turned = match (frames.get(index)?.size.as_ref(), geometry::parse_print_size(&requested)) {
            (Some(resolved), Some(parsed)) if resolved.orientation() != parsed.orientation() => {
                Some(format!(
                    "{}x{}",
                    geometry::format_length(resolved.width_cm, SizeUnit::Centimeters),
                    geometry::format_length(resolved.height_cm, SizeUnit::Centimeters)
                ))
            }
            _ => None,
        };
        Some(turned.unwrap_or(requested))
    }

    // Display settings, not recorded in history

    /// Unit used for size labels.
    pub fn unit(&self) -> SizeUnit {
        self.unit
    }

    /// Changes the label unit. Geometry and assignments are unaffected.
    pub fn set_unit(&mut self, unit: SizeUnit) {
        self.unit = unit;
    }

    /// Frame finish for the whole composition.
    pub fn finish(&self) -> Option<&str> {
        self.finish.as_deref()
    }

    /// Chooses the frame finish.
    pub fn set_finish(&mut self, finish: Option<String>) {
        self.finish = finish;
    }

    // Layout edits, each one undoable

    fn commit_with(&mut self, edit: impl FnOnce(&mut LayoutSnapshot)) -> bool {
        let mut next = self.snapshot().clone();
        self.draft = None;
        edit(&mut next);
        self.history.commit(next)
    }

    /// Sets the size every frame without an override uses.
    pub fn set_global_size(&mut self, size: Option<String>) {
        self.commit_with(|s| s.sizes.global = size);
    }

    /// Sets or clears one frame's size override. Out-of-range frames are ignored.
    pub fn set_frame_size(&mut self, index: FrameIndex, size: Option<String>) {
        if index >= self.frame_count() {
            log::warn!("size override for frame {index} ignored, template has {} frames", self.frame_count());
            return;
        }
        self.commit_with(|s| s.sizes.set_override(index, size));
    }

    /// Sets the global orientation.
    pub fn set_orientation(&mut self, orientation: OrientationHint) {
        self.commit_with(|s| s.orientation = orientation);
    }

    /// Sets or clears one frame's orientation override. Out-of-range frames are ignored.
    pub fn set_frame_orientation(&mut self, index: FrameIndex, orientation: Option<OrientationHint>) {
        if index >= self.frame_count() {
            log::warn!("orientation override for frame {index} ignored, template has {} frames", self.frame_count());
            return;
        }
        self.commit_with(|s| s.sizes.set_orientation_override(index, orientation));
    }

    /// Sets the wall scale, clamped to its range.
    pub fn set_wall_scale(&mut self, wall_scale: f32) {
        let wall_scale = wall_scale.clamp(WALL_SCALE_MIN, WALL_SCALE_MAX);
        self.commit_with(|s| s.wall_scale = wall_scale);
    }

    /// Sets the spacing, clamped to its range.
    pub fn set_spacing(&mut self, spacing: f32) {
        let spacing = spacing.clamp(SPACING_MIN, SPACING_MAX);
        self.commit_with(|s| s.spacing = spacing);
    }

    /// Shows a wall scale and spacing without recording them, for live slider feedback.
    ///
    /// The draft is committed by [`Self::commit_draft`] and dropped by any other edit.
    pub fn preview_scale(&mut self, wall_scale: f32, spacing: f32) {
        let mut draft = self.snapshot().clone();
        draft.wall_scale = wall_scale.clamp(WALL_SCALE_MIN, WALL_SCALE_MAX);
        draft.spacing = spacing.clamp(SPACING_MIN, SPACING_MAX);
        self.draft = Some(draft);
    }

    /// Records the previewed draft, if any, as one history entry.
    pub fn commit_draft(&mut self) -> bool {
        match self.draft.take() {
            Some(draft) => self.history.commit(draft),
            None => false,
        }
    }

    // Dragging

    /// Whether drags move the whole composition.
    pub fn is_locked(&self) -> bool {
        self.drag.is_locked()
    }

    /// Locks or unlocks the composition, committing any drag in progress.
    pub fn set_locked(&mut self, locked: bool) {
        let offsets = self.snapshot().offsets.clone();
        if let Some(next) = self.drag.set_locked(locked, &offsets) {
            self.commit_with(|s| s.offsets = next);
        }
    }

    /// Whether a gesture is in progress; pointer moves and releases only matter then.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// Pointer pressed on the wall drawn into `wall`.
    pub fn pointer_down(&mut self, pos: Pos2, wall: Rect) -> bool {
        let hit = self.frame_at(pos, wall);
        self.drag.pointer_down(pos, hit)
    }

    /// Pointer moved during a gesture.
    pub fn pointer_move(&mut self, pos: Pos2) {
        self.drag.pointer_move(pos);
    }

    /// Pointer released. A drag is committed to history; a click selects the pressed frame.
    pub fn pointer_up(&mut self, pos: Pos2) -> DragRelease {
        let offsets = self.snapshot().offsets.clone();
        let release = self.drag.pointer_up(pos, &offsets);
        self.apply_release(&release);
        release
    }

    /// Gesture cancelled by the platform.
    pub fn pointer_cancel(&mut self) -> DragRelease {
        let offsets = self.snapshot().offsets.clone();
        let release = self.drag.cancel(&offsets);
        self.apply_release(&release);
        release
    }

    fn apply_release(&mut self, release: &DragRelease) {
        match release {
            DragRelease::Commit(next) => {
                let next = next.clone();
                if self.commit_with(|s| s.offsets = next) {
                    log::debug!("drag committed, {} undo steps", self.history.undo_depth());
                }
            }
            DragRelease::Click(index) => self.active_frame = *index,
            DragRelease::Ignored => {}
        }
    }

    /// Reports whether the last gesture was a real drag, clearing the flag.
    pub fn take_was_dragging(&mut self) -> bool {
        self.drag.take_was_dragging()
    }

    /// Moves every frame back onto the template, as one undoable step.
    pub fn reset_positions(&mut self) {
        self.drag.abort();
        if self.commit_with(|s| s.offsets = PersistedOffsets::default()) {
            log::debug!("positions reset");
        }
    }

    // History

    /// Whether undo is possible.
    pub fn can_undo(&self) -> bool {
        self.draft.is_some() || self.history.can_undo()
    }

    /// Whether redo is possible.
    pub fn can_redo(&self) -> bool {
        self.draft.is_none() && self.history.can_redo()
    }

    /// Steps back one layout change. A pending draft is dropped first and counts as the step.
    pub fn undo(&mut self) -> bool {
        self.drag.abort();
        if self.draft.take().is_some() {
            return true;
        }
        let undone = self.history.undo();
        if undone {
            log::debug!("undo, {} steps left", self.history.undo_depth());
        }
        undone
    }

    /// Re-applies the last undone layout change.
    pub fn redo(&mut self) -> bool {
        self.drag.abort();
        if self.draft.is_some() {
            return false;
        }
        let redone = self.history.redo();
        if redone {
            log::debug!("redo");
        }
        redone
    }

    // Artwork assignment

    /// Frame selected for artwork assignment.
    pub fn active_frame(&self) -> Option<FrameIndex> {
        self.active_frame
    }

    /// Selects a frame for artwork assignment. Out-of-range frames clear the selection.
    pub fn set_active_frame(&mut self, index: Option<FrameIndex>) {
        self.active_frame = index.filter(|i| *i < self.frame_count());
    }

    /// Artworks assigned so far.
    pub fn artworks(&self) -> &SelectedArtworks {
        &self.artworks
    }

    /// Artwork in a frame, if any.
    pub fn artwork(&self, index: FrameIndex) -> Option<&Artwork> {
        self.artworks.get(&index)
    }

    /// Hangs an artwork in a frame.
    ///
    /// # Returns
    ///
    /// `false` if the frame does not exist; nothing changes then.
    pub fn assign_artwork(&mut self, index: FrameIndex, artwork: Artwork) -> bool {
        if index >= self.frame_count() {
            log::warn!("artwork {} not assigned, frame {index} does not exist", artwork.id);
            return false;
        }
        self.artworks.insert(index, artwork);
        true
    }

    /// Empties a frame.
    pub fn remove_artwork(&mut self, index: FrameIndex) -> Option<Artwork> {
        self.artworks.remove(&index)
    }

    /// Artworks that pass `filter` and can be ordered in a frame's size and orientation.
    pub fn candidates_for_frame<'a>(
        &self,
        catalog: &'a [Artwork],
        filter: &ArtworkFilter,
        index: FrameIndex,
    ) -> Vec<&'a Artwork> {
        let Some(size) = self.required_size(index) else {
            return Vec::new();
        };
        let Some(frame) = self.frames().into_iter().nth(index) else {
            return Vec::new();
        };
        matching::artworks_for_frame(catalog, filter, &size, frame.orientation)
    }

    // Pricing

    /// One priced line per filled frame, in frame order.
    pub fn line_items(&self) -> Vec<LineItem> {
        self.artworks
            .iter()
            .filter_map(|(index, artwork)| {
                let size = self.required_size(*index)?;
                Some(LineItem::new(*index, artwork, &size))
            })
            .collect()
    }

    /// Running total of all filled frames.
    pub fn total_price(&self) -> f64 {
        pricing::total(&self.line_items())
    }

    /// Payload for the checkout collaborator.
    pub fn checkout_lines(&self) -> Result<Vec<CheckoutLine>, CheckoutError> {
        pricing::checkout_lines(&self.line_items(), self.finish())
    }

    // Template lifecycle

    /// Template waiting for confirmation, if any.
    pub fn pending_template(&self) -> Option<&LayoutTemplate> {
        self.pending_template.as_ref()
    }

    /// Asks to replace the template.
    ///
    /// With artworks assigned the change waits for confirmation; otherwise it
    /// applies at once.
    pub fn request_template(&mut self, template: LayoutTemplate) -> TemplateChange {
        if self.artworks.is_empty() {
            self.apply_template(template);
            TemplateChange::Applied
        } else {
            self.pending_template = Some(template);
            TemplateChange::NeedsConfirmation
        }
    }

    /// Applies the pending template, clearing artworks, offsets and history.
    pub fn confirm_template_change(&mut self) -> bool {
        match self.pending_template.take() {
            Some(template) => {
                self.apply_template(template);
                true
            }
            None => false,
        }
    }

    /// Keeps the current template.
    pub fn cancel_template_change(&mut self) {
        self.pending_template = None;
    }

    fn apply_template(&mut self, template: LayoutTemplate) {
        log::debug!("template {} replaced by {}", self.template.id, template.id);
        let current = self.snapshot();
        let initial = LayoutSnapshot {
            offsets: PersistedOffsets::default(),
            sizes: PrintSizeSelection {
                global: current.sizes.global.clone(),
                ..Default::default()
            },
            ..current.clone()
        };
        self.template = template;
        self.pending_template = None;
        self.artworks.clear();
        self.active_frame = None;
        self.draft = None;
        self.drag.abort();
        self.history.reset(initial);
    }

    /// Returns the configurator to its starting state on the current template.
    pub fn reset(&mut self) {
        log::debug!("configurator reset");
        self.pending_template = None;
        self.unit = SizeUnit::default();
        self.finish = None;
        self.artworks.clear();
        self.active_frame = None;
        self.draft = None;
        self.drag = DragController::new(true, self.config.click_threshold);
        self.history.reset(LayoutSnapshot::default());
    }
}
