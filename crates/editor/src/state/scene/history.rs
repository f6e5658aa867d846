//! Undo/redo functionality

use std::collections::VecDeque;

use shared::{ObjectId, ObjectTable};

/// Undo stack capacity
pub const HISTORY_LIMIT: usize = 50;

/// Independent copy of the undoable state.
///
/// The table shares unchanged objects with the live state; live edits
/// copy an object before writing it, so a snapshot never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub objects: ObjectTable,
    pub selection: Vec<ObjectId>,
}

/// Linear undo/redo stacks
#[derive(Debug, Default)]
pub struct History {
    /// Previous states, oldest first
    past: VecDeque<Snapshot>,
    /// Undone states, most recently undone last
    future: Vec<Snapshot>,
}

impl History {
    /// Push a pre-mutation state and discard the redo branch
    pub fn record(&mut self, snapshot: Snapshot) {
        self.push_past(snapshot);
        self.future.clear();
    }

    /// Trade `current` for the most recent past state
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let prev = self.past.pop_back()?;
        self.future.push(current);
        Some(prev)
    }

    /// Trade `current` for the most recently undone state
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.future.pop()?;
        self.push_past(current);
        Some(next)
    }

    fn push_past(&mut self, snapshot: Snapshot) {
        self.past.push_back(snapshot);
        while self.past.len() > HISTORY_LIMIT {
            self.past.pop_front();
        }
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(tag: &str) -> Snapshot {
        Snapshot {
            objects: ObjectTable::new(),
            selection: vec![tag.to_string()],
        }
    }

    #[test]
    fn test_empty_history_is_noop() {
        let mut h = History::default();
        assert!(h.undo(snap("now")).is_none());
        assert!(h.redo(snap("now")).is_none());
        assert_eq!(h.redo_depth(), 0);
    }

    #[test]
    fn test_undo_then_redo() {
        let mut h = History::default();
        h.record(snap("a"));
        let prev = h.undo(snap("b")).unwrap();
        assert_eq!(prev.selection, vec!["a"]);
        assert!(h.can_redo());
        let next = h.redo(snap("a")).unwrap();
        assert_eq!(next.selection, vec!["b"]);
        assert_eq!(h.undo_depth(), 1);
    }

    #[test]
    fn test_record_clears_future() {
        let mut h = History::default();
        h.record(snap("a"));
        h.undo(snap("b"));
        h.record(snap("c"));
        assert!(!h.can_redo());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut h = History::default();
        for i in 0..HISTORY_LIMIT + 5 {
            h.record(snap(&i.to_string()));
        }
        assert_eq!(h.undo_depth(), HISTORY_LIMIT);
        let mut oldest = None;
        while let Some(s) = h.undo(snap("x")) {
            oldest = Some(s);
        }
        assert_eq!(oldest.unwrap().selection, vec!["5"]);
    }
}
