//! Snapshot undo/redo stacks.

use crate::element::Element;

/// Full element-list snapshot.
pub type Snapshot = Vec<Element>;

/// Linear undo/redo history over whole-scene snapshots.
///
/// The top of `future` (its last entry) is the next state `redo` restores.
#[derive(Debug, Clone, Default)]
pub struct History {
    past: Vec<Snapshot>,
    future: Vec<Snapshot>,
    /// Maximum number of undo states to keep, unlimited when `None`.
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Push the pre-mutation state and drop any redo states.
    pub fn record(&mut self, current: &[Element]) {
        self.past.push(current.to_vec());
        self.future.clear();

        if let Some(limit) = self.limit {
            let excess = self.past.len().saturating_sub(limit);
            self.past.drain(..excess);
        }
    }

    /// Swap `current` with the most recent past state. Returns false when there is nothing to undo.
    pub fn undo(&mut self, current: &mut Snapshot) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        self.future.push(std::mem::replace(current, previous));
        true
    }

    /// Swap `current` with the next future state. Returns false when there is nothing to redo.
    pub fn redo(&mut self, current: &mut Snapshot) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        self.past.push(std::mem::replace(current, next));
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}
