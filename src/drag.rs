//! Drag and pan gesture handling.
//!
//! The controller turns pointer events into frame offsets. While a gesture is
//! in progress only a transient delta changes; the persisted offsets are
//! untouched until release, when the controller hands back the new offsets for
//! the caller to record in history.
//!
//! Two drag semantics exist and never mix. With the composition locked every
//! drag moves the whole arrangement ([`DragMode::Group`]); unlocked, a drag
//! moves only the frame under the pointer ([`DragMode::Individual`]).

use crate::types::{FrameIndex, PersistedOffsets};
use egui::{Pos2, Vec2};

/// What a drag moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Every frame moves by the same delta
    Group,
    /// Only this frame moves
    Individual(FrameIndex),
}

/// Gesture state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    /// No gesture in progress
    Idle,
    /// A pointer is down
    Dragging {
        /// What the gesture moves
        mode: DragMode,
        /// Frame under the pointer when the gesture began
        pressed: Option<FrameIndex>,
        /// Pointer position at press
        origin: Pos2,
        /// Current pointer position minus origin
        delta: Vec2,
        /// Whether the pointer ever travelled past the click threshold
        moved: bool,
    },
}

/// Result of ending a gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum DragRelease {
    /// No gesture was in progress
    Ignored,
    /// The pointer barely moved: select the pressed frame instead of moving it
    Click(Option<FrameIndex>),
    /// The gesture moved frames; these are the new persisted offsets
    Commit(PersistedOffsets),
}

/// Stateful pointer gesture handler. One instance per configurator session.
#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
    locked: bool,
    click_threshold: f32,
    was_dragging: bool,
}

impl DragController {
    /// Creates an idle controller.
    ///
    /// # Arguments
    ///
    /// * `locked` - Start with the composition locked (group drags)
    /// * `click_threshold` - Pointer travel at or below which a gesture is a click
    pub fn new(locked: bool, click_threshold: f32) -> Self {
        Self {
            state: DragState::Idle,
            locked,
            click_threshold,
            was_dragging: false,
        }
    }

    /// Current gesture state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// True while a gesture is in progress; move/up events only matter then.
    pub fn is_active(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Whether drags move the whole composition.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Delta of the gesture in progress, once it has become a real drag.
    pub fn transient(&self) -> Vec2 {
        match self.state {
            DragState::Dragging {
                delta, moved: true, ..
            } => delta,
            _ => Vec2::ZERO,
        }
    }

    /// Begins a gesture.
    ///
    /// Locked, any press starts a group drag. Unlocked, only a press on a frame
    /// starts a drag, and it moves that frame alone.
    ///
    /// # Arguments
    ///
    /// * `pos` - Pointer position
    /// * `hit` - Frame under the pointer, if any
    ///
    /// # Returns
    ///
    /// `true` if a gesture started.
    pub fn pointer_down(&mut self, pos: Pos2, hit: Option<FrameIndex>) -> bool {
        if self.is_active() {
            return false;
        }
        let mode = match (self.locked, hit) {
            (true, _) => DragMode::Group,
            (false, Some(index)) => DragMode::Individual(index),
            (false, None) => return false,
        };
        self.state = DragState::Dragging {
            mode,
            pressed: hit,
            origin: pos,
            delta: Vec2::ZERO,
            moved: false,
        };
        self.was_dragging = false;
        true
    }

    /// Tracks pointer movement. Persisted offsets are not touched.
    pub fn pointer_move(&mut self, pos: Pos2) {
        let threshold = self.click_threshold;
        if let DragState::Dragging {
            origin,
            delta,
            moved,
            ..
        } = &mut self.state
        {
            *delta = pos - *origin;
            if delta.length() > threshold {
                *moved = true;
            }
        }
    }

    /// Ends a gesture with the pointer at `pos`.
    ///
    /// A gesture that never travelled past the click threshold is a click and
    /// leaves the offsets alone.
    pub fn pointer_up(&mut self, pos: Pos2, offsets: &PersistedOffsets) -> DragRelease {
        self.pointer_move(pos);
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => DragRelease::Ignored,
            DragState::Dragging {
                mode, delta, moved, ..
            } if moved => {
                self.was_dragging = true;
                DragRelease::Commit(apply_delta(offsets, mode, delta))
            }
            DragState::Dragging { pressed, .. } => DragRelease::Click(pressed),
        }
    }

    /// Ends a gesture that the platform cancelled. Movement is kept; it is never a click.
    pub fn cancel(&mut self, offsets: &PersistedOffsets) -> DragRelease {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging {
                mode,
                delta,
                moved: true,
                ..
            } => {
                self.was_dragging = true;
                DragRelease::Commit(apply_delta(offsets, mode, delta))
            }
            _ => DragRelease::Ignored,
        }
    }

    /// Drops the gesture in progress without committing anything.
    pub fn abort(&mut self) {
        self.state = DragState::Idle;
    }

    /// Switches between group and individual mode.
    ///
    /// A gesture in progress is committed first so its delta cannot leak into
    /// the other mode.
    ///
    /// # Returns
    ///
    /// New offsets to record if a gesture was committed.
    pub fn set_locked(&mut self, locked: bool, offsets: &PersistedOffsets) -> Option<PersistedOffsets> {
        if locked == self.locked {
            return None;
        }
        let committed = match self.cancel(offsets) {
            DragRelease::Commit(next) => Some(next),
            _ => None,
        };
        self.locked = locked;
        committed
    }

    /// Reports whether the last gesture was a real drag, clearing the flag.
    ///
    /// Click handlers that fire after release use this to ignore the click
    /// that ends a drag.
    pub fn take_was_dragging(&mut self) -> bool {
        std::mem::take(&mut self.was_dragging)
    }

    /// Offset at which a frame renders: its persisted offset for the current
    /// mode plus the transient delta if the gesture in progress moves it.
    pub fn offset_for(&self, index: FrameIndex, offsets: &PersistedOffsets) -> Vec2 {
        let persisted = offsets.effective(index, self.locked);
        let moving = match self.state {
            DragState::Dragging {
                mode: DragMode::Group,
                ..
            } => self.locked,
            DragState::Dragging {
                mode: DragMode::Individual(target),
                ..
            } => !self.locked && target == index,
            DragState::Idle => false,
        };
        if moving {
            persisted + self.transient()
        } else {
            persisted
        }
    }
}

fn apply_delta(offsets: &PersistedOffsets, mode: DragMode, delta: Vec2) -> PersistedOffsets {
    let mut next = offsets.clone();
    match mode {
        DragMode::Group => next.group += delta,
        DragMode::Individual(index) => *next.individual.entry(index).or_insert(Vec2::ZERO) += delta,
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn test_locked_press_starts_group_drag_anywhere() {
        let mut drag = DragController::new(true, 5.0);
        assert!(drag.pointer_down(pos2(10.0, 10.0), None));
        assert!(matches!(
            drag.state(),
            DragState::Dragging {
                mode: DragMode::Group,
                ..
            }
        ));
    }

    #[test]
    fn test_unlocked_press_needs_a_frame() {
        let mut drag = DragController::new(false, 5.0);
        assert!(!drag.pointer_down(pos2(10.0, 10.0), None));
        assert!(!drag.is_active());
        assert!(drag.pointer_down(pos2(10.0, 10.0), Some(2)));
        assert!(matches!(
            drag.state(),
            DragState::Dragging {
                mode: DragMode::Individual(2),
                ..
            }
        ));
    }

    #[test]
    fn test_only_one_gesture_at_a_time() {
        let mut drag = DragController::new(false, 5.0);
        assert!(drag.pointer_down(pos2(0.0, 0.0), Some(0)));
        assert!(!drag.pointer_down(pos2(50.0, 50.0), Some(1)));
    }

    #[test]
    fn test_move_does_not_touch_persisted_offsets() {
        let offsets = PersistedOffsets::default();
        let mut drag = DragController::new(true, 5.0);
        drag.pointer_down(pos2(100.0, 100.0), None);
        drag.pointer_move(pos2(130.0, 90.0));

        assert_eq!(drag.transient(), vec2(30.0, -10.0));
        assert_eq!(drag.offset_for(0, &offsets), vec2(30.0, -10.0));
        assert!(offsets.is_zero());
    }

    #[test]
    fn test_group_release_commits_one_delta_for_every_frame() {
        let mut offsets = PersistedOffsets::default();
        offsets.group = vec2(5.0, 5.0);
        let mut drag = DragController::new(true, 5.0);
        drag.pointer_down(pos2(0.0, 0.0), Some(1));
        let release = drag.pointer_up(pos2(20.0, 0.0), &offsets);

        let DragRelease::Commit(next) = release else {
            panic!("expected a commit");
        };
        assert_eq!(next.group, vec2(25.0, 5.0));
        assert!(next.individual.is_empty());
        for index in 0..4 {
            assert_eq!(drag.offset_for(index, &next), vec2(25.0, 5.0));
        }
        assert!(!drag.is_active());
        assert_eq!(drag.transient(), Vec2::ZERO);
    }

    #[test]
    fn test_individual_release_moves_exactly_one_frame() {
        let offsets = PersistedOffsets::default();
        let mut drag = DragController::new(false, 5.0);
        drag.pointer_down(pos2(0.0, 0.0), Some(1));
        drag.pointer_move(pos2(0.0, 40.0));
        assert_eq!(drag.offset_for(1, &offsets), vec2(0.0, 40.0));
        assert_eq!(drag.offset_for(0, &offsets), Vec2::ZERO);

        let DragRelease::Commit(next) = drag.pointer_up(pos2(0.0, 40.0), &offsets) else {
            panic!("expected a commit");
        };
        assert_eq!(next.individual.len(), 1);
        assert_eq!(next.individual(1), vec2(0.0, 40.0));
        assert_eq!(next.individual(0), Vec2::ZERO);
        assert_eq!(next.group, Vec2::ZERO);
    }

    #[test]
    fn test_small_movement_is_a_click() {
        let offsets = PersistedOffsets::default();
        let mut drag = DragController::new(false, 5.0);
        drag.pointer_down(pos2(10.0, 10.0), Some(3));
        drag.pointer_move(pos2(12.0, 11.0));
        assert_eq!(drag.offset_for(3, &offsets), Vec2::ZERO);

        assert_eq!(drag.pointer_up(pos2(12.0, 11.0), &offsets), DragRelease::Click(Some(3)));
        assert!(!drag.take_was_dragging());
    }

    #[test]
    fn test_returning_to_origin_is_still_a_drag() {
        let offsets = PersistedOffsets::default();
        let mut drag = DragController::new(true, 5.0);
        drag.pointer_down(pos2(0.0, 0.0), None);
        drag.pointer_move(pos2(50.0, 0.0));
        let release = drag.pointer_up(pos2(1.0, 0.0), &offsets);
        assert!(matches!(release, DragRelease::Commit(_)));
        assert!(drag.take_was_dragging());
        assert!(!drag.take_was_dragging());
    }

    #[test]
    fn test_release_without_gesture_is_ignored() {
        let mut drag = DragController::new(true, 5.0);
        assert_eq!(
            drag.pointer_up(pos2(0.0, 0.0), &PersistedOffsets::default()),
            DragRelease::Ignored
        );
    }

    #[test]
    fn test_cancel_commits_movement_but_never_clicks() {
        let offsets = PersistedOffsets::default();
        let mut drag = DragController::new(true, 5.0);
        drag.pointer_down(pos2(0.0, 0.0), Some(0));
        assert_eq!(drag.cancel(&offsets), DragRelease::Ignored);

        drag.pointer_down(pos2(0.0, 0.0), Some(0));
        drag.pointer_move(pos2(0.0, 30.0));
        let DragRelease::Commit(next) = drag.cancel(&offsets) else {
            panic!("expected a commit");
        };
        assert_eq!(next.group, vec2(0.0, 30.0));
    }

    #[test]
    fn test_lock_gates_which_offsets_render() {
        let mut offsets = PersistedOffsets::default();
        offsets.group = vec2(10.0, 0.0);
        offsets.individual.insert(0, vec2(0.0, 10.0));

        let mut drag = DragController::new(true, 5.0);
        assert_eq!(drag.offset_for(0, &offsets), vec2(10.0, 0.0));
        drag.set_locked(false, &offsets);
        assert_eq!(drag.offset_for(0, &offsets), vec2(0.0, 10.0));
        assert_eq!(drag.offset_for(1, &offsets), Vec2::ZERO);
    }

    #[test]
    fn test_toggling_lock_mid_drag_commits_first() {
        let offsets = PersistedOffsets::default();
        let mut drag = DragController::new(false, 5.0);
        drag.pointer_down(pos2(0.0, 0.0), Some(2));
        drag.pointer_move(pos2(20.0, 0.0));

        let committed = drag.set_locked(true, &offsets).expect("drag should commit");
        assert_eq!(committed.individual(2), vec2(20.0, 0.0));
        assert!(!drag.is_active());
        assert!(drag.is_locked());
        // The individual offset no longer renders while locked
        assert_eq!(drag.offset_for(2, &committed), Vec2::ZERO);
    }

    #[test]
    fn test_abort_discards_gesture() {
        let offsets = PersistedOffsets::default();
        let mut drag = DragController::new(true, 5.0);
        drag.pointer_down(pos2(0.0, 0.0), None);
        drag.pointer_move(pos2(40.0, 0.0));
        drag.abort();
        assert!(!drag.is_active());
        assert_eq!(drag.offset_for(0, &offsets), Vec2::ZERO);
    }
}
