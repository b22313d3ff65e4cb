//! High-level edit commands.
//!
//! Each command here is one undo/redo transaction: it snapshots the cursor
//! set, applies its text deltas in reverse-cursor order (bottom-to-top, so a
//! delta never invalidates the coordinates of one still to come), snapshots
//! again, and records the whole thing. Commands are rejected up front on a
//! read-only buffer and leave it untouched.

use std::collections::BTreeSet;

use crate::coords::Coordinate;
use crate::cursor::CursorSet;
use crate::editor::Editor;
use crate::undo::{UndoOperation, UndoOperationKind, UndoRecord};

impl Editor {
    // ---- Character entry --------------------------------------------------

    /// Type one character at every cursor. `\n` starts a new line (with
    /// auto-indent when enabled); `\t` with any multi-line selection indents
    /// the block instead (outdents with `shift`). Selections are deleted
    /// first.
    pub fn enter_character(&mut self, ch: char, shift: bool) {
        if self.is_read_only() {
            return;
        }

        let has_selection = self.cursors.any_has_selection();
        let any_multiline = self
            .cursors
            .iter()
            .any(|c| c.selection_start().line != c.selection_end().line);
        if has_selection && any_multiline && ch == '\t' {
            self.change_line_indentation(!shift);
            return;
        }

        let mut record = UndoRecord::with_before(self.cursors.clone());

        if has_selection {
            for index in (0..self.cursors.len()).rev() {
                let cursor = *self.cursors.get(index);
                if !cursor.has_selection() {
                    continue;
                }
                record.push(UndoOperation::new(
                    UndoOperationKind::Delete,
                    self.selected_text(index),
                    cursor.selection_start(),
                    cursor.selection_end(),
                ));
                self.delete_selection(index);
            }
        }

        let mut touched = Vec::new();
        for index in (0..self.cursors.len()).rev() {
            let position = self.sanitized_cursor(index, false);
            touched.push(position);

            let text = if ch == '\n' {
                let mut text = String::from('\n');
                if self.auto_indent() {
                    for glyph in self.buffer.line(position.line) {
                        if glyph.ch == ' ' || glyph.ch == '\t' {
                            text.push(glyph.ch);
                        } else {
                            break;
                        }
                    }
                }
                text
            } else {
                ch.to_string()
            };

            let end = self.apply_insert(position, &text);
            self.set_cursor_coordinate(index, end, true);
            record.push(UndoOperation::new(
                UndoOperationKind::Add,
                text,
                position,
                end,
            ));
        }

        record.after = self.cursors.clone();
        self.history.push(record);

        for position in touched {
            self.colorize_lines(position.line.saturating_sub(1), 3);
        }
        self.request_scroll(false);
    }

    // ---- Backspace / Delete -----------------------------------------------

    /// Delete backward: selections if any exist, otherwise one glyph (or one
    /// word in `word_mode`) before each caret. A no-op when any caret sits at
    /// the buffer start and cannot extend.
    pub fn backspace(&mut self, word_mode: bool) {
        if self.is_read_only() {
            return;
        }
        if self.cursors.any_has_selection() {
            self.delete_with_state(word_mode, None);
        } else {
            let before = self.cursors.clone();
            self.move_left(true, word_mode);
            if !self.cursors.all_have_selection() {
                // Some caret was at the buffer start: restore and bail.
                self.cursors = before;
                return;
            }
            self.normalize_cursors();
            self.delete_with_state(word_mode, Some(before));
        }
    }

    /// Delete forward: selections if any exist, otherwise one glyph (or one
    /// word in `word_mode`) after each caret. A no-op when any caret sits at
    /// the buffer end and cannot extend.
    pub fn delete_forward(&mut self, word_mode: bool) {
        if self.is_read_only() {
            return;
        }
        self.delete_with_state(word_mode, None);
    }

    fn delete_with_state(&mut self, word_mode: bool, before: Option<CursorSet>) {
        if self.cursors.any_has_selection() {
            let mut record =
                UndoRecord::with_before(before.unwrap_or_else(|| self.cursors.clone()));
            for index in (0..self.cursors.len()).rev() {
                let cursor = *self.cursors.get(index);
                if !cursor.has_selection() {
                    continue;
                }
                record.push(UndoOperation::new(
                    UndoOperationKind::Delete,
                    self.selected_text(index),
                    cursor.selection_start(),
                    cursor.selection_end(),
                ));
                self.delete_selection(index);
            }
            record.after = self.cursors.clone();
            self.history.push(record);
        } else {
            let before = self.cursors.clone();
            self.move_right(true, word_mode);
            if !self.cursors.all_have_selection() {
                // Some caret was at the buffer end: restore and bail.
                self.cursors = before;
                return;
            }
            self.normalize_cursors();
            self.delete_with_state(word_mode, Some(before));
        }
    }

    /// Delete one cursor's selection and collapse it onto the range start.
    pub(crate) fn delete_selection(&mut self, index: usize) {
        let cursor = *self.cursors.get(index);
        if !cursor.has_selection() {
            return;
        }
        let start = cursor.selection_start();
        let end = cursor.selection_end();
        self.apply_delete(start, end, Some((start, end)));
        self.set_cursor_coordinate(index, start, true);
        self.colorize_lines(start.line, 1);
    }

    // ---- Block indentation ------------------------------------------------

    /// Indent (`increase`) or outdent every line touched by any selection by
    /// one tab stop. A line a non-empty selection touches only at column 0 is
    /// skipped; outdent only strips a line whose first tab stop holds nothing
    /// but whitespace.
    pub fn change_line_indentation(&mut self, increase: bool) {
        if self.is_read_only() {
            return;
        }

        let mut record = UndoRecord::with_before(self.cursors.clone());

        for index in (0..self.cursors.len()).rev() {
            let cursor = *self.cursors.get(index);
            let sel_start = cursor.selection_start();
            let sel_end = cursor.selection_end();
            for line in (sel_start.line..=sel_end.line).rev() {
                if Coordinate::new(line, 0) == sel_end && sel_end != sel_start {
                    continue;
                }

                if increase {
                    if !self.buffer.line(line).is_empty() {
                        let start = Coordinate::new(line, 0);
                        let end = self.apply_insert(start, "\t");
                        record.push(UndoOperation::new(
                            UndoOperationKind::Add,
                            "\t".to_string(),
                            start,
                            end,
                        ));
                        self.colorize_lines(line, 1);
                    }
                } else {
                    let start = Coordinate::new(line, 0);
                    let end = Coordinate::new(line, self.tab_size());
                    let first_stop = self.buffer.char_index_left(end);
                    let only_whitespace = self.buffer.line(line)[..first_stop]
                        .iter()
                        .all(|g| g.ch == ' ' || g.ch == '\t');
                    if only_whitespace {
                        record.push(UndoOperation::new(
                            UndoOperationKind::Delete,
                            self.buffer.text_range(start, end),
                            start,
                            end,
                        ));
                        self.apply_delete(start, end, None);
                        self.colorize_lines(line, 1);
                    }
                }
            }
        }

        if !record.operations.is_empty() {
            record.after = self.cursors.clone();
            self.history.push(record);
        }
    }

    // ---- Line comments ----------------------------------------------------

    /// Toggle the language's single-line comment on every line touched by
    /// any selection: if any affected line lacks the marker after its
    /// leading whitespace, markers are added everywhere, otherwise removed
    /// everywhere.
    pub fn toggle_line_comment(&mut self) {
        if self.is_read_only() {
            return;
        }
        let Some(language) = self.language else {
            return;
        };
        let comment: Vec<char> = language.single_line_comment.chars().collect();
        if comment.is_empty() {
            return;
        }

        let mut record = UndoRecord::with_before(self.cursors.clone());
        let mut affected = BTreeSet::new();
        let mut should_add = false;

        for index in (0..self.cursors.len()).rev() {
            let cursor = *self.cursors.get(index);
            let sel_start = cursor.selection_start();
            let sel_end = cursor.selection_end();
            for line in (sel_start.line..=sel_end.line).rev() {
                if Coordinate::new(line, 0) == sel_end && sel_end != sel_start {
                    continue;
                }
                affected.insert(line);
                let glyphs = self.buffer.line(line);
                let first = glyphs
                    .iter()
                    .position(|g| g.ch != ' ' && g.ch != '\t')
                    .unwrap_or(glyphs.len());
                if first == glyphs.len() {
                    continue;
                }
                let matched = glyphs.len() >= first + comment.len()
                    && comment
                        .iter()
                        .zip(&glyphs[first..])
                        .all(|(&c, g)| c == g.ch);
                should_add |= !matched;
            }
        }

        if should_add {
            let text = format!("{} ", language.single_line_comment);
            for &line in &affected {
                let start = Coordinate::new(line, 0);
                let end = self.apply_insert(start, &text);
                record.push(UndoOperation::new(
                    UndoOperationKind::Add,
                    text.clone(),
                    start,
                    end,
                ));
                self.colorize_lines(line, 1);
            }
        } else {
            for &line in &affected {
                let glyphs = self.buffer.line(line);
                let first = glyphs
                    .iter()
                    .position(|g| g.ch != ' ' && g.ch != '\t')
                    .unwrap_or(glyphs.len());
                if first == glyphs.len() {
                    continue;
                }
                let mut len = comment.len();
                if glyphs.len() > first + len && glyphs[first + len].ch == ' ' {
                    len += 1;
                }
                let start = Coordinate::new(line, self.buffer.column_at(line, first));
                let end = Coordinate::new(line, self.buffer.column_at(line, first + len));
                record.push(UndoOperation::new(
                    UndoOperationKind::Delete,
                    self.buffer.text_range(start, end),
                    start,
                    end,
                ));
                self.apply_delete(start, end, None);
                self.colorize_lines(line, 1);
            }
        }

        if !record.operations.is_empty() {
            record.after = self.cursors.clone();
            self.history.push(record);
        }
    }

    // ---- Line reordering --------------------------------------------------

    fn lines_touched_by_selections(&self) -> BTreeSet<usize> {
        let mut affected = BTreeSet::new();
        for index in 0..self.cursors.len() {
            let cursor = *self.cursors.get(index);
            let sel_start = cursor.selection_start();
            let sel_end = cursor.selection_end();
            for line in sel_start.line..=sel_end.line {
                if Coordinate::new(line, 0) == sel_end && sel_end != sel_start {
                    continue;
                }
                affected.insert(line);
            }
        }
        affected
    }

    /// Swap every line touched by a cursor with the line above it. Refused
    /// when the block already touches the top of the buffer.
    pub fn move_lines_up(&mut self) {
        if self.is_read_only() {
            return;
        }
        let affected = self.lines_touched_by_selections();
        let Some(&min) = affected.first() else {
            return;
        };
        let max = *affected.last().expect("non-empty");
        if min == 0 {
            return;
        }

        let mut record = UndoRecord::with_before(self.cursors.clone());
        let start = Coordinate::new(min - 1, 0);
        let end = Coordinate::new(max, self.buffer.line_max_column(max));
        record.push(UndoOperation::new(
            UndoOperationKind::Delete,
            self.buffer.text_range(start, end),
            start,
            end,
        ));

        self.find.on_buffer_edited();
        for &line in &affected {
            self.buffer.swap_lines(line - 1, line);
        }
        for index in 0..self.cursors.len() {
            let cursor = self.cursors.get_mut(index);
            cursor.start.line = cursor.start.line.saturating_sub(1);
            cursor.end.line = cursor.end.line.saturating_sub(1);
        }

        // The swapped-down line changes the block's trailing column.
        let end = Coordinate::new(max, self.buffer.line_max_column(max));
        record.push(UndoOperation::new(
            UndoOperationKind::Add,
            self.buffer.text_range(start, end),
            start,
            end,
        ));
        record.after = self.cursors.clone();
        self.history.push(record);
    }

    /// Swap every line touched by a cursor with the line below it. Refused
    /// when the block already touches the bottom of the buffer.
    pub fn move_lines_down(&mut self) {
        if self.is_read_only() {
            return;
        }
        let affected = self.lines_touched_by_selections();
        let Some(&min) = affected.first() else {
            return;
        };
        let max = *affected.last().expect("non-empty");
        if max == self.buffer.line_count() - 1 {
            return;
        }

        let mut record = UndoRecord::with_before(self.cursors.clone());
        let start = Coordinate::new(min, 0);
        let end = Coordinate::new(max + 1, self.buffer.line_max_column(max + 1));
        record.push(UndoOperation::new(
            UndoOperationKind::Delete,
            self.buffer.text_range(start, end),
            start,
            end,
        ));

        self.find.on_buffer_edited();
        for &line in affected.iter().rev() {
            self.buffer.swap_lines(line + 1, line);
        }
        for index in 0..self.cursors.len() {
            let cursor = self.cursors.get_mut(index);
            cursor.start.line += 1;
            cursor.end.line += 1;
        }

        let end = Coordinate::new(max + 1, self.buffer.line_max_column(max + 1));
        record.push(UndoOperation::new(
            UndoOperationKind::Add,
            self.buffer.text_range(start, end),
            start,
            end,
        ));
        record.after = self.cursors.clone();
        self.history.push(record);
    }

    /// Delete every line a cursor touches, in one transaction.
    pub fn remove_current_lines(&mut self) {
        if self.is_read_only() {
            return;
        }

        let mut record = UndoRecord::with_before(self.cursors.clone());
        if self.cursors.any_has_selection() {
            for index in (0..self.cursors.len()).rev() {
                let cursor = *self.cursors.get(index);
                if !cursor.has_selection() {
                    continue;
                }
                record.push(UndoOperation::new(
                    UndoOperationKind::Delete,
                    self.selected_text(index),
                    cursor.selection_start(),
                    cursor.selection_end(),
                ));
                self.delete_selection(index);
            }
        }
        self.move_home(false);
        self.normalize_cursors();

        for index in (0..self.cursors.len()).rev() {
            let current = self.cursors.get(index).end.line;

            let (delete_start, delete_end, cursor_position) = if current + 1 < self.line_count() {
                (
                    Coordinate::new(current, 0),
                    Coordinate::new(current + 1, 0),
                    Coordinate::new(current, 0),
                )
            } else if current > 0 {
                (
                    Coordinate::new(current - 1, self.buffer.line_max_column(current - 1)),
                    Coordinate::new(current, self.buffer.line_max_column(current)),
                    Coordinate::new(current - 1, 0),
                )
            } else {
                (
                    Coordinate::new(current, 0),
                    Coordinate::new(current, self.buffer.line_max_column(current)),
                    Coordinate::new(current, 0),
                )
            };
            self.set_cursor_coordinate(index, cursor_position, true);

            record.push(UndoOperation::new(
                UndoOperationKind::Delete,
                self.buffer.text_range(delete_start, delete_end),
                delete_start,
                delete_end,
            ));
            if delete_start.line != delete_end.line {
                self.find.on_buffer_edited();
                self.buffer
                    .remove_line_single(&mut self.cursors, current, Some(index));
            } else {
                self.apply_delete(delete_start, delete_end, None);
            }
        }

        record.after = self.cursors.clone();
        self.history.push(record);
    }

    // ---- Clipboard boundary -----------------------------------------------

    /// Text Copy puts on the clipboard: all selections joined with `\n`, or
    /// the current line when nothing is selected.
    pub fn copy(&self) -> String {
        if self.cursors.any_has_selection() {
            self.all_selected_text()
        } else {
            self.buffer.line_text(self.cursor_position().line)
        }
    }

    /// Cut: copy, then delete all selections in one transaction. On a
    /// read-only buffer this degrades to a plain copy. Returns `None` when
    /// nothing is selected.
    pub fn cut(&mut self) -> Option<String> {
        if self.is_read_only() {
            return Some(self.copy());
        }
        if !self.cursors.any_has_selection() {
            return None;
        }

        let text = self.copy();
        let mut record = UndoRecord::with_before(self.cursors.clone());
        for index in (0..self.cursors.len()).rev() {
            let cursor = *self.cursors.get(index);
            if !cursor.has_selection() {
                continue;
            }
            record.push(UndoOperation::new(
                UndoOperationKind::Delete,
                self.selected_text(index),
                cursor.selection_start(),
                cursor.selection_end(),
            ));
            self.delete_selection(index);
        }
        record.after = self.cursors.clone();
        self.history.push(record);
        Some(text)
    }

    /// Paste `text` at every cursor, deleting selections first. When the
    /// clipboard's line count equals the cursor count, each cursor receives
    /// its corresponding line; otherwise every cursor receives the full
    /// text.
    pub fn paste(&mut self, text: &str) {
        if self.is_read_only() || text.is_empty() {
            return;
        }

        let lines: Vec<&str> = text.split('\n').collect();
        let per_cursor = self.cursors.len() > 1 && lines.len() == self.cursors.len();

        let mut record = UndoRecord::with_before(self.cursors.clone());

        if self.cursors.any_has_selection() {
            for index in (0..self.cursors.len()).rev() {
                let cursor = *self.cursors.get(index);
                if !cursor.has_selection() {
                    continue;
                }
                record.push(UndoOperation::new(
                    UndoOperationKind::Delete,
                    self.selected_text(index),
                    cursor.selection_start(),
                    cursor.selection_end(),
                ));
                self.delete_selection(index);
            }
        }

        for index in (0..self.cursors.len()).rev() {
            let start = self.sanitized_cursor(index, false);
            let chunk = if per_cursor { lines[index] } else { text };
            self.insert_text_at_cursor(index, chunk);
            record.push(UndoOperation::new(
                UndoOperationKind::Add,
                chunk.to_string(),
                start,
                self.sanitized_cursor(index, false),
            ));
        }

        record.after = self.cursors.clone();
        self.history.push(record);
    }

    /// Insert `text` at one cursor and advance it past the insertion.
    pub(crate) fn insert_text_at_cursor(&mut self, index: usize, text: &str) {
        let position = self.sanitized_cursor(index, false);
        let start = position.min(self.cursors.get(index).selection_start());
        let end = self.apply_insert(position, text);
        self.set_cursor_coordinate(index, end, true);
        self.colorize_lines(
            start.line.saturating_sub(1),
            end.line - start.line + 2,
        );
    }

    // ---- Undo / redo ------------------------------------------------------

    /// Undo up to `steps` commands.
    pub fn undo(&mut self, steps: usize) {
        if self.is_read_only() {
            return;
        }
        for _ in 0..steps {
            let Some(record) = self.history.step_back() else {
                break;
            };
            record.undo(self);
        }
    }

    /// Redo up to `steps` undone commands.
    pub fn redo(&mut self, steps: usize) {
        if self.is_read_only() {
            return;
        }
        for _ in 0..steps {
            let Some(record) = self.history.step_forward() else {
                break;
            };
            record.redo(self);
        }
    }

    /// Returns `true` when there is something to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns `true` when there is something to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of undoable records.
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Number of redoable records.
    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }
}
