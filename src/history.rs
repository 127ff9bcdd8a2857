//! Undo/redo history for layout-affecting state.
//!
//! Rather than recording reversible actions, the history keeps immutable
//! snapshots: the current state plus a stack of earlier ones and a stack of
//! undone ones. Undoing and redoing swap whole snapshots, so N undos followed
//! by N redos always land on exactly the state that was current before.

use std::collections::VecDeque;

/// Snapshot ledger with bounded depth.
#[derive(Debug, Clone)]
pub struct History<T> {
    /// Snapshot currently in effect
    current: T,
    /// Earlier snapshots, oldest first
    past: VecDeque<T>,
    /// Undone snapshots, most recently undone last
    future: Vec<T>,
    /// Maximum number of entries kept in `past`
    capacity: usize,
}

impl<T: Clone + PartialEq> History<T> {
    /// Creates a history whose current state is `initial`.
    ///
    /// # Arguments
    ///
    /// * `initial` - The starting snapshot
    /// * `capacity` - Maximum number of undo steps retained (at least one)
    pub fn new(initial: T, capacity: usize) -> Self {
        Self {
            current: initial,
            past: VecDeque::new(),
            future: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// The snapshot currently in effect.
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Records a new snapshot.
    ///
    /// The previous snapshot becomes undoable and any redo entries are discarded.
    /// Committing a snapshot equal to the current one changes nothing.
    ///
    /// # Returns
    ///
    /// `true` if the snapshot was recorded.
    pub fn commit(&mut self, next: T) -> bool {
        if next == self.current {
            return false;
        }
        let previous = std::mem::replace(&mut self.current, next);
        self.past.push_back(previous);
        self.future.clear();

        // Limit undo history size
        while self.past.len() > self.capacity {
            self.past.pop_front();
        }
        true
    }

    /// Steps back one snapshot. Does nothing when there is nothing to undo.
    ///
    /// # Returns
    ///
    /// `true` if the current snapshot changed.
    pub fn undo(&mut self) -> bool {
        match self.past.pop_back() {
            Some(previous) => {
                let undone = std::mem::replace(&mut self.current, previous);
                self.future.push(undone);
                true
            }
            None => false,
        }
    }

    /// Re-applies the most recently undone snapshot. Does nothing when there is nothing to redo.
    ///
    /// # Returns
    ///
    /// `true` if the current snapshot changed.
    pub fn redo(&mut self) -> bool {
        match self.future.pop() {
            Some(next) => {
                let previous = std::mem::replace(&mut self.current, next);
                self.past.push_back(previous);
                true
            }
            None => false,
        }
    }

    /// Returns true if there are snapshots that can be undone.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Returns true if there are snapshots that can be redone.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo steps available.
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Drops all history and starts over from `initial`.
    pub fn reset(&mut self, initial: T) {
        self.current = initial;
        self.past.clear();
        self.future.clear();
    }
}
