//! Linear undo/redo log of slide content during an edit session.

/// Content snapshots with a cursor.
///
/// The cursor always points at a valid snapshot. Pushing after an undo
/// discards every snapshot past the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancementHistory {
    snapshots: Vec<String>,
    index: usize,
}

impl EnhancementHistory {
    /// Start a history at the given content.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            snapshots: vec![initial.into()],
            index: 0,
        }
    }

    /// Discard everything and start again at `initial`.
    pub fn reset(&mut self, initial: impl Into<String>) {
        self.snapshots.clear();
        self.snapshots.push(initial.into());
        self.index = 0;
    }

    /// Content at the cursor.
    pub fn current(&self) -> &str {
        &self.snapshots[self.index]
    }

    /// Record a new snapshot and move the cursor to it.
    pub fn push(&mut self, content: impl Into<String>) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(content.into());
        self.index = self.snapshots.len() - 1;
    }

    /// Step back one snapshot, returning the new current content.
    pub fn undo(&mut self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    /// Step forward one snapshot, returning the new current content.
    pub fn redo(&mut self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// Cursor position, 0 being the initial content.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: a history holds at least its initial snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[String] {
        &self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_history() {
        let history = EnhancementHistory::new("original");
        assert_eq!(history.current(), "original");
        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo() {
        let mut history = EnhancementHistory::new("v0");
        history.push("v1");
        history.push("v2");

        assert_eq!(history.undo(), Some("v1"));
        assert_eq!(history.undo(), Some("v0"));
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), Some("v1"));
        assert_eq!(history.redo(), Some("v2"));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_push_after_undo_truncates() {
        let mut history = EnhancementHistory::new("v0");
        history.push("v1");
        history.push("v2");
        history.undo();
        history.push("v3");

        assert_eq!(history.snapshots(), &["v0", "v1", "v3"]);
        assert_eq!(history.index(), 2);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_reset() {
        let mut history = EnhancementHistory::new("v0");
        history.push("v1");
        history.reset("fresh");

        assert_eq!(history.current(), "fresh");
        assert_eq!(history.len(), 1);
        assert!(!history.is_empty());
    }

    #[test]
    fn test_position_after_undos_and_redos() {
        for n in 0..5usize {
            for u in 0..=n {
                for r in 0..=u {
                    let mut history = EnhancementHistory::new("c0");
                    for i in 1..=n {
                        history.push(format!("c{}", i));
                    }
                    for _ in 0..u {
                        history.undo();
                    }
                    for _ in 0..r {
                        history.redo();
                    }

                    assert_eq!(history.current(), format!("c{}", n - u + r));
                    assert_eq!(history.index(), n - u + r);
                }
            }
        }
    }
}
