//! Transactional undo/redo.
//!
//! Every user-visible command records one [`UndoRecord`]: an ordered list of
//! text deltas (built in reverse-cursor order, so replay never invalidates a
//! later delta's coordinates) plus full cursor-set snapshots from before and
//! after the command. The history is a flat, truncatable list - recording a
//! new command discards any redo entries, so redo is only valid immediately
//! after undo.

use crate::coords::Coordinate;
use crate::cursor::CursorSet;
use crate::editor::Editor;

/// Default number of records kept before the oldest is dropped.
pub const DEFAULT_UNDO_CAPACITY: usize = 1024;

/// Direction of one recorded text delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOperationKind {
    /// Text was inserted; undone by deleting its range.
    Add,
    /// Text was deleted; undone by re-inserting it at its start.
    Delete,
}

/// One atomic text delta inside a record.
#[derive(Debug, Clone)]
pub struct UndoOperation {
    /// Whether the command added or deleted this text.
    pub kind: UndoOperationKind,
    /// The literal text added or deleted.
    pub text: String,
    /// Range start (inclusive). Always `start <= end`.
    pub start: Coordinate,
    /// Range end (exclusive).
    pub end: Coordinate,
}

impl UndoOperation {
    pub(crate) fn new(
        kind: UndoOperationKind,
        text: String,
        start: Coordinate,
        end: Coordinate,
    ) -> Self {
        debug_assert!(start <= end);
        Self {
            kind,
            text,
            start,
            end,
        }
    }
}

/// One reversible transaction: the command's deltas plus cursor snapshots.
#[derive(Debug, Clone)]
pub struct UndoRecord {
    pub(crate) operations: Vec<UndoOperation>,
    pub(crate) before: CursorSet,
    pub(crate) after: CursorSet,
}

impl UndoRecord {
    pub(crate) fn with_before(before: CursorSet) -> Self {
        Self {
            operations: Vec::new(),
            before: before.clone(),
            after: before,
        }
    }

    pub(crate) fn push(&mut self, operation: UndoOperation) {
        self.operations.push(operation);
    }

    /// Replay in reverse order with inverted semantics, then restore the
    /// *before* cursor snapshot.
    pub(crate) fn undo(&self, editor: &mut Editor) {
        for operation in self.operations.iter().rev() {
            if operation.text.is_empty() {
                continue;
            }
            let span = operation.end.line - operation.start.line;
            match operation.kind {
                UndoOperationKind::Delete => {
                    editor.apply_insert(operation.start, &operation.text);
                }
                UndoOperationKind::Add => {
                    editor.apply_delete(operation.start, operation.end, None);
                }
            }
            editor.colorize_lines(operation.start.line.saturating_sub(1), span + 2);
        }
        editor.cursors = self.before.clone();
        editor.request_scroll(false);
    }

    /// Replay in forward order with original semantics, then restore the
    /// *after* cursor snapshot.
    pub(crate) fn redo(&self, editor: &mut Editor) {
        for operation in &self.operations {
            if operation.text.is_empty() {
                continue;
            }
            let span = operation.end.line - operation.start.line;
            match operation.kind {
                UndoOperationKind::Delete => {
                    editor.apply_delete(operation.start, operation.end, None);
                }
                UndoOperationKind::Add => {
                    editor.apply_insert(operation.start, &operation.text);
                }
            }
            editor.colorize_lines(operation.start.line.saturating_sub(1), span + 1);
        }
        editor.cursors = self.after.clone();
        editor.request_scroll(false);
    }
}

/// Flat history list plus a cursor into it. Records left of the cursor are
/// undoable, records right of it redoable.
#[derive(Debug)]
pub(crate) struct UndoHistory {
    records: Vec<UndoRecord>,
    index: usize,
    capacity: usize,
}

impl UndoHistory {
    pub(crate) fn new() -> Self {
        Self {
            records: Vec::new(),
            index: 0,
            capacity: DEFAULT_UNDO_CAPACITY,
        }
    }

    pub(crate) fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub(crate) fn can_redo(&self) -> bool {
        self.index < self.records.len()
    }

    pub(crate) fn undo_depth(&self) -> usize {
        self.index
    }

    pub(crate) fn redo_depth(&self) -> usize {
        self.records.len() - self.index
    }

    /// Version stamp for caches that must invalidate on any history motion:
    /// changes whenever a record is added, undone, or redone.
    pub(crate) fn version(&self) -> (usize, usize) {
        (self.index, self.records.len())
    }

    /// Append a record, discarding redo history and the oldest record when
    /// over capacity.
    pub(crate) fn push(&mut self, record: UndoRecord) {
        self.records.truncate(self.index);
        if self.records.len() >= self.capacity {
            self.records.remove(0);
            self.index = self.index.saturating_sub(1);
        }
        self.records.push(record);
        self.index = self.records.len();
    }

    pub(crate) fn step_back(&mut self) -> Option<UndoRecord> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.records[self.index].clone())
    }

    pub(crate) fn step_forward(&mut self) -> Option<UndoRecord> {
        if self.index >= self.records.len() {
            return None;
        }
        let record = self.records[self.index].clone();
        self.index += 1;
        Some(record)
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
        self.index = 0;
    }
}
