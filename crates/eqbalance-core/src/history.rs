//! History stack of equation snapshots.

use crate::snapshot::Snapshot;

/// Maximum depth: the committed equation plus one in-progress gesture.
pub const MAX_HISTORY_DEPTH: usize = 2;

/// Stack of snapshots. The bottom entry is the last committed equation; the
/// top entry is the live one, which differs from the bottom only while a
/// drag has separated from the equation.
#[derive(Debug, Clone, Default)]
pub struct History {
    stack: Vec<Snapshot>,
}

impl History {
    /// Create a history whose committed state is `initial`.
    pub fn new(initial: Snapshot) -> Self {
        Self {
            stack: vec![initial],
        }
    }

    /// The live snapshot (top of the stack).
    pub fn live(&self) -> &Snapshot {
        static EMPTY: Snapshot = Snapshot::EMPTY;
        self.stack.last().unwrap_or(&EMPTY)
    }

    pub fn live_mut(&mut self) -> Option<&mut Snapshot> {
        self.stack.last_mut()
    }

    /// The last committed snapshot (bottom of the stack).
    pub fn committed(&self) -> Option<&Snapshot> {
        self.stack.first()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Whether a working snapshot sits above the committed one.
    pub fn is_mid_gesture(&self) -> bool {
        self.stack.len() > 1
    }

    /// Push a working snapshot for a gesture that left the equation body.
    pub fn push_working(&mut self, snapshot: Snapshot) {
        debug_assert!(
            self.stack.len() < MAX_HISTORY_DEPTH,
            "history already holds a working snapshot"
        );
        self.stack.push(snapshot);
    }

    /// Discard the working snapshot, returning it. The committed snapshot is
    /// never popped.
    pub fn pop_working(&mut self) -> Option<Snapshot> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    /// Replace the whole stack with a newly committed snapshot.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.stack.clear();
        self.stack.push(snapshot);
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::TermState;
    use kurbo::Point;
    use uuid::Uuid;

    fn snap(n: usize) -> Snapshot {
        let states = (0..n)
            .map(|i| TermState::new(Uuid::new_v4(), Uuid::new_v4(), Point::new(i as f64 - 0.5, 0.0)))
            .collect();
        Snapshot::new(states)
    }

    #[test]
    fn test_push_and_pop_working() {
        let mut history = History::new(snap(2));
        assert!(!history.is_mid_gesture());

        history.push_working(snap(1));
        assert_eq!(history.depth(), 2);
        assert_eq!(history.live().len(), 1);
        assert_eq!(history.committed().map(|s| s.len()), Some(2));

        let popped = history.pop_working().unwrap();
        assert_eq!(popped.len(), 1);
        assert_eq!(history.live().len(), 2);
    }

    #[test]
    fn test_committed_is_never_popped() {
        let mut history = History::new(snap(2));
        assert!(history.pop_working().is_none());
        assert_eq!(history.depth(), 1);
    }

    #[test]
    fn test_commit_replaces_stack() {
        let mut history = History::new(snap(2));
        history.push_working(snap(1));
        history.commit(snap(3));
        assert_eq!(history.depth(), 1);
        assert_eq!(history.live().len(), 3);
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::default();
        assert!(history.live().is_empty());
        history.push_working(snap(2));
        history.clear();
        assert!(history.is_empty());
    }
}
