//! The editor state: buffer, cursors, history, colorizer, and find state in
//! one exclusively-owned value.
//!
//! This module holds construction, configuration, queries, and the cursor,
//! selection, and movement API. The mutating edit commands live in
//! [`crate::commands`], find/replace in [`crate::search`].

use glyphed_lang::{LanguageDefinition, LanguageId};

use crate::buffer::{Buffer, Glyph};
use crate::colorize::Colorizer;
use crate::coords::{Coordinate, MoveDirection};
use crate::cursor::{Cursor, CursorSet};
use crate::search::FindState;
use crate::undo::UndoHistory;

/// A deferred "scroll the view to a cursor" request for the host's viewport
/// layer. The core only records the request; clamping the view is rendering
/// business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    /// Index of the cursor to bring into view.
    pub cursor: usize,
    /// Whether the selection anchor should be visible too.
    pub include_anchor: bool,
}

/// The editing core of a source-code editor.
///
/// Owns the text buffer, the multi-cursor set, the undo history, the
/// incremental colorizer, and the find/replace state. All mutation happens
/// through this type's commands; there is no shared-state access from
/// outside.
#[derive(Debug)]
pub struct Editor {
    pub(crate) buffer: Buffer,
    pub(crate) cursors: CursorSet,
    pub(crate) history: UndoHistory,
    pub(crate) colorizer: Colorizer,
    pub(crate) find: FindState,
    pub(crate) language: Option<&'static LanguageDefinition>,
    language_id: Option<LanguageId>,
    read_only: bool,
    auto_indent: bool,
    scroll_request: Option<ScrollRequest>,
}

impl Editor {
    /// An empty editor: one empty line, one caret at the origin.
    pub fn new() -> Self {
        Self {
            buffer: Buffer::new(),
            cursors: CursorSet::new(),
            history: UndoHistory::new(),
            colorizer: Colorizer::new(),
            find: FindState::new(),
            language: None,
            language_id: None,
            read_only: false,
            auto_indent: true,
            scroll_request: None,
        }
    }

    /// An editor initialized with `text`.
    pub fn with_text(text: &str) -> Self {
        let mut editor = Self::new();
        editor.set_text(text);
        editor
    }

    // ---- Text access ------------------------------------------------------

    /// The whole content joined with `\n`.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Replace the whole content, clearing undo history and caches.
    pub fn set_text(&mut self, text: &str) {
        self.buffer.reset_text(text);
        self.cursors = CursorSet::new();
        self.history.clear();
        self.colorize_all();
        self.find.reset();
    }

    /// All lines as text.
    pub fn text_lines(&self) -> Vec<String> {
        self.buffer.text_lines()
    }

    /// Replace the whole content from a line list, clearing undo history and
    /// caches.
    pub fn set_text_lines(&mut self, lines: &[String]) {
        self.buffer.reset_lines(lines);
        self.cursors = CursorSet::new();
        self.history.clear();
        self.colorize_all();
        self.find.reset();
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    /// Text of one line.
    pub fn line_text(&self, line: usize) -> String {
        self.buffer.line_text(line)
    }

    /// Annotated glyphs of one line, for a renderer.
    pub fn line_glyphs(&self, line: usize) -> &[Glyph] {
        self.buffer.line(line)
    }

    /// Read-only access to the buffer and its coordinate model.
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    // ---- Configuration ----------------------------------------------------

    /// Tab size in cells.
    pub fn tab_size(&self) -> usize {
        self.buffer.tab_size()
    }

    /// Set the tab size (clamped to `1..=8`).
    pub fn set_tab_size(&mut self, tab_size: usize) {
        self.buffer.set_tab_size(tab_size);
    }

    /// Whether mutating commands are rejected.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Enable or disable read-only mode.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Whether a new line copies the previous line's leading whitespace.
    pub fn auto_indent(&self) -> bool {
        self.auto_indent
    }

    /// Enable or disable auto-indent.
    pub fn set_auto_indent(&mut self, auto_indent: bool) {
        self.auto_indent = auto_indent;
    }

    /// The active language, if any.
    pub fn language(&self) -> Option<LanguageId> {
        self.language_id
    }

    /// Display name of the active language.
    pub fn language_name(&self) -> &'static str {
        self.language.map_or("None", |definition| definition.name)
    }

    /// Switch the active grammar. Recompiles the fallback pattern table once
    /// and schedules a full re-colorization.
    pub fn set_language(&mut self, language: Option<LanguageId>) {
        self.language_id = language;
        self.language = language.map(LanguageDefinition::get);
        self.colorizer.set_language(self.language);
        self.colorize_all();
    }

    // ---- Colorization control ---------------------------------------------

    /// Mark the whole buffer for re-colorization.
    pub fn colorize_all(&mut self) {
        self.colorizer.invalidate(0, None, self.buffer.line_count());
    }

    /// Mark `count` lines starting at `from_line` for re-colorization.
    pub fn colorize_lines(&mut self, from_line: usize, count: usize) {
        self.colorizer
            .invalidate(from_line, Some(count), self.buffer.line_count());
    }

    /// Run one bounded colorization chunk. Returns `true` while work remains;
    /// the host calls this once per frame until it returns `false`.
    pub fn colorize_step(&mut self) -> bool {
        match self.language {
            Some(language) => self.colorizer.step(&mut self.buffer, language),
            None => false,
        }
    }

    /// Run colorization to completion.
    pub fn colorize_now(&mut self) {
        while self.colorize_step() {}
    }

    // ---- Cursor & selection queries ---------------------------------------

    /// Number of cursors.
    pub fn cursor_count(&self) -> usize {
        self.cursors.len()
    }

    /// The cursor set.
    pub fn cursors(&self) -> &CursorSet {
        &self.cursors
    }

    /// Sanitized position of the current cursor's moving end.
    pub fn cursor_position(&self) -> Coordinate {
        self.sanitized_cursor(self.cursors.current_index(), false)
    }

    /// Returns `true` when at least one cursor selects text.
    pub fn any_cursor_has_selection(&self) -> bool {
        self.cursors.any_has_selection()
    }

    /// Returns `true` when every cursor selects text.
    pub fn all_cursors_have_selection(&self) -> bool {
        self.cursors.all_have_selection()
    }

    /// Selected text of cursor `index`, empty without a selection.
    pub fn selected_text(&self, index: usize) -> String {
        let cursor = self.cursors.get(index);
        if !cursor.has_selection() {
            return String::new();
        }
        self.buffer
            .text_range(cursor.selection_start(), cursor.selection_end())
    }

    /// All cursors' selected text, joined with `\n` - what Copy places on the
    /// clipboard.
    pub fn all_selected_text(&self) -> String {
        let mut result = String::new();
        for index in 0..self.cursors.len() {
            let cursor = self.cursors.get(index);
            if cursor.selection_start() < cursor.selection_end() {
                if !result.is_empty() {
                    result.push('\n');
                }
                result.push_str(&self.selected_text(index));
            }
        }
        result
    }

    /// The word-character run around the current cursor.
    pub fn current_word(&self) -> String {
        self.buffer.word_at(self.cursor_position())
    }

    /// The word-character run around a coordinate.
    pub fn word_at(&self, coords: Coordinate) -> String {
        self.buffer.word_at(coords)
    }

    /// Take the pending scroll request, if a command produced one.
    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.scroll_request.take()
    }

    pub(crate) fn request_scroll(&mut self, include_anchor: bool) {
        self.scroll_request = Some(ScrollRequest {
            cursor: self.cursors.last_added_index(),
            include_anchor,
        });
    }

    pub(crate) fn sanitized_cursor(&self, index: usize, start: bool) -> Coordinate {
        let cursor = self.cursors.get(index);
        self.buffer
            .sanitize(if start { cursor.start } else { cursor.end })
    }

    /// Sort cursors top-to-bottom and merge overlaps; every public mutation
    /// finishes the cursor set in this normal form.
    pub(crate) fn normalize_cursors(&mut self) {
        self.cursors.sort_top_to_bottom();
        self.cursors.merge_overlapping();
    }

    // ---- Cursor & selection mutation --------------------------------------

    /// Place the current cursor at (line, glyph index), clearing its
    /// selection.
    pub fn set_cursor_position(&mut self, line: usize, char_index: usize) {
        let column = self.buffer.column_at(line, char_index);
        let index = self.cursors.current_index();
        self.set_cursor_coordinate(index, Coordinate::new(line, column), true);
        self.normalize_cursors();
    }

    pub(crate) fn set_cursor_coordinate(
        &mut self,
        index: usize,
        position: Coordinate,
        clear_selection: bool,
    ) {
        let moved = self.cursors.get(index).end != position;
        self.cursors.set_position(index, position, clear_selection);
        if moved {
            self.request_scroll(false);
        }
    }

    /// Drop every cursor but the first.
    pub fn clear_extra_cursors(&mut self) {
        self.cursors.clear_extras();
    }

    /// Collapse every selection to its end.
    pub fn clear_selections(&mut self) {
        self.cursors.clear_selections();
    }

    /// Select the whole buffer with a single cursor.
    pub fn select_all(&mut self) {
        self.cursors.clear_selections();
        self.cursors.clear_extras();
        let last = self.buffer.line_count() - 1;
        let end = Coordinate::new(last, self.buffer.line_max_column(last));
        self.set_selection(Coordinate::new(0, 0), end, 0);
    }

    /// Select one whole line with a single cursor.
    pub fn select_line(&mut self, line: usize) {
        self.cursors.clear_selections();
        self.cursors.clear_extras();
        let line = line.min(self.buffer.line_count() - 1);
        let end = Coordinate::new(line, self.buffer.line_max_column(line));
        self.set_selection(Coordinate::new(line, 0), end, 0);
    }

    /// Select a (line, glyph index) range with a single cursor.
    pub fn select_region(
        &mut self,
        start_line: usize,
        start_char: usize,
        end_line: usize,
        end_char: usize,
    ) {
        self.cursors.clear_selections();
        self.cursors.clear_extras();
        let start = Coordinate::new(start_line, self.buffer.column_at(start_line, start_char));
        let end = Coordinate::new(end_line, self.buffer.column_at(end_line, end_char));
        self.set_selection(start, end, 0);
    }

    /// Select the word segment under the current cursor.
    pub fn select_word_under_cursor(&mut self) {
        let position = self.cursor_position();
        let start = self.buffer.word_start_of(position);
        let end = self.buffer.word_end_of(position);
        let index = self.cursors.current_index();
        self.set_selection(start, end, index);
    }

    /// Set one cursor's selection, clamping both ends into the buffer.
    pub(crate) fn set_selection(&mut self, start: Coordinate, end: Coordinate, index: usize) {
        let last = self.buffer.line_count() - 1;
        let max = Coordinate::new(last, self.buffer.line_max_column(last));
        let start = start.min(max);
        let end = end.min(max);
        self.cursors.get_mut(index).start = start;
        self.set_cursor_coordinate(index, end, false);
    }

    /// Add a caret at a (line, glyph index) position; it becomes the current
    /// cursor.
    pub fn add_cursor(&mut self, line: usize, char_index: usize) {
        let column = self.buffer.column_at(line, char_index);
        let position = self.buffer.sanitize(Coordinate::new(line, column));
        self.cursors.add(Cursor::at(position));
        self.normalize_cursors();
    }

    // ---- Occurrence selection ---------------------------------------------

    /// Select the next occurrence of `text` after the current cursor,
    /// wrapping at the buffer end, with a single cursor.
    pub fn select_next_occurrence_of(&mut self, text: &str, case_sensitive: bool) {
        self.cursors.clear_selections();
        self.cursors.clear_extras();
        self.select_next_occurrence_for(text, case_sensitive, 0);
    }

    fn select_next_occurrence_for(&mut self, text: &str, case_sensitive: bool, index: usize) {
        let from = self.cursors.get(index).end;
        if let Some((start, end)) = self.find_next_occurrence(text, from, case_sensitive, true) {
            self.set_selection(start, end, index);
            self.request_scroll(true);
        }
    }

    /// Add a cursor selecting the next occurrence of the last-added cursor's
    /// selection. No-op when that cursor has no selection or there is no
    /// other occurrence.
    pub fn add_cursor_for_next_occurrence(&mut self, case_sensitive: bool) {
        let current = *self.cursors.get(self.cursors.last_added_index());
        if !current.has_selection() {
            return;
        }
        let text = self
            .buffer
            .text_range(current.selection_start(), current.selection_end());
        let Some((start, end)) =
            self.find_next_occurrence(&text, current.selection_end(), case_sensitive, true)
        else {
            return;
        };

        self.cursors.add(Cursor::at(start));
        self.set_selection(start, end, self.cursors.current_index());
        self.normalize_cursors();
        self.request_scroll(true);
    }

    /// Select every occurrence of `text`, one cursor per occurrence.
    pub fn select_all_occurrences_of(&mut self, text: &str, case_sensitive: bool) {
        self.select_next_occurrence_of(text, case_sensitive);
        let start_position = self.cursors.get(self.cursors.last_added_index()).end;
        loop {
            self.add_cursor_for_next_occurrence(case_sensitive);
            let last_added = self.cursors.get(self.cursors.last_added_index()).end;
            if last_added == start_position {
                break;
            }
        }
    }

    /// Walk the buffer for the next occurrence of `text` starting at `from`.
    ///
    /// Matching is glyph-by-glyph and may cross line boundaries (`\n` in the
    /// needle matches a line break). Case-insensitive comparison folds ASCII
    /// letters only. With `wrap` the scan continues from the buffer start and
    /// terminates after coming full circle; without it the scan stops at the
    /// buffer end.
    pub fn find_next_occurrence(
        &self,
        text: &str,
        from: Coordinate,
        case_sensitive: bool,
        wrap: bool,
    ) -> Option<(Coordinate, Coordinate)> {
        let needle: Vec<char> = text.chars().collect();
        if needle.is_empty() {
            return None;
        }
        let fold = |ch: char| {
            if case_sensitive {
                ch
            } else {
                ch.to_ascii_lowercase()
            }
        };

        let from = self.buffer.sanitize(from);
        let origin_line = from.line;
        let origin_index = self.buffer.char_index_right(from);
        let mut line = origin_line;
        let mut index = origin_index;

        loop {
            // Try to match the needle at (line, index).
            let mut match_line = line;
            let mut match_index = index;
            let mut matched = 0;
            for &expected in &needle {
                if match_index == self.buffer.line(match_line).len() {
                    if expected == '\n' && match_line + 1 < self.buffer.line_count() {
                        match_line += 1;
                        match_index = 0;
                        matched += 1;
                        continue;
                    }
                    break;
                }
                if fold(self.buffer.line(match_line)[match_index].ch) != fold(expected) {
                    break;
                }
                match_index += 1;
                matched += 1;
            }
            if matched == needle.len() {
                let start = Coordinate::new(line, self.buffer.column_at(line, index));
                let end = Coordinate::new(
                    match_line,
                    self.buffer.column_at(match_line, match_index),
                );
                return Some((start, end));
            }

            // Step one position forward, wrapping if allowed.
            if index == self.buffer.line(line).len() {
                if line == self.buffer.line_count() - 1 {
                    if !wrap {
                        return None;
                    }
                    line = 0;
                    index = 0;
                } else {
                    line += 1;
                    index = 0;
                }
            } else {
                index += 1;
            }

            if line == origin_line && index == origin_index {
                return None;
            }
        }
    }

    // ---- Bracket matching -------------------------------------------------

    /// Position of the bracket matching the one at (line, glyph index), if
    /// the glyph is one of `()[]{}` and a balanced partner exists.
    pub fn matching_bracket(&self, line: usize, char_index: usize) -> Option<Coordinate> {
        if line >= self.buffer.line_count() {
            return None;
        }
        let glyphs = self.buffer.line(line);
        if char_index >= glyphs.len() {
            return None;
        }

        let ch = glyphs[char_index].ch;
        let (partner, backwards) = match ch {
            '{' => ('}', false),
            '(' => (')', false),
            '[' => (']', false),
            '}' => ('{', true),
            ')' => ('(', true),
            ']' => ('[', true),
            _ => return None,
        };

        let mut current_line = line;
        let mut current_index = char_index;
        let mut depth = 1usize;
        while self
            .buffer
            .move_index(&mut current_line, &mut current_index, backwards, false)
        {
            let glyphs = self.buffer.line(current_line);
            if current_index >= glyphs.len() {
                continue;
            }
            let current = glyphs[current_index].ch;
            if current == partner {
                depth -= 1;
                if depth == 0 {
                    return Some(Coordinate::new(
                        current_line,
                        self.buffer.column_at(current_line, current_index),
                    ));
                }
            } else if current == ch {
                depth += 1;
            }
        }
        None
    }

    // ---- Movement ---------------------------------------------------------

    fn move_coords(&self, coords: Coordinate, direction: MoveDirection, word_mode: bool, amount: usize) -> Coordinate {
        let mut out = coords;
        let char_index = self.buffer.char_index_right(coords);
        match direction {
            MoveDirection::Right => {
                if char_index >= self.buffer.line(coords.line).len() {
                    if coords.line < self.buffer.line_count() - 1 {
                        out.line = coords.line + 1;
                        out.column = 0;
                    }
                } else {
                    let mut line = coords.line;
                    let mut index = char_index;
                    self.buffer.move_index(&mut line, &mut index, false, false);
                    let one_step = self.buffer.column_at(line, index);
                    if word_mode {
                        out = self.buffer.word_end_of(coords);
                        out.column = out.column.max(one_step);
                    } else {
                        out.column = one_step;
                    }
                }
            }
            MoveDirection::Left => {
                if char_index == 0 {
                    if coords.line > 0 {
                        out.line = coords.line - 1;
                        out.column = self.buffer.line_max_column(out.line);
                    }
                } else {
                    let mut line = coords.line;
                    let mut index = char_index;
                    self.buffer.move_index(&mut line, &mut index, true, false);
                    out.column = self.buffer.column_at(line, index);
                    if word_mode {
                        out = self.buffer.word_start_of(out);
                    }
                }
            }
            MoveDirection::Up => {
                out.line = coords.line.saturating_sub(amount);
            }
            MoveDirection::Down => {
                out.line = (coords.line + amount).min(self.buffer.line_count() - 1);
            }
        }
        out
    }

    /// Move every cursor up `amount` lines, extending selections if `select`.
    pub fn move_up(&mut self, amount: usize, select: bool) {
        for index in 0..self.cursors.len() {
            let coords = self.move_coords(self.cursors.get(index).end, MoveDirection::Up, false, amount);
            self.set_cursor_coordinate(index, coords, !select);
        }
        self.normalize_cursors();
        self.request_scroll(false);
    }

    /// Move every cursor down `amount` lines, extending selections if
    /// `select`.
    pub fn move_down(&mut self, amount: usize, select: bool) {
        for index in 0..self.cursors.len() {
            let coords = self.move_coords(self.cursors.get(index).end, MoveDirection::Down, false, amount);
            self.set_cursor_coordinate(index, coords, !select);
        }
        self.normalize_cursors();
        self.request_scroll(false);
    }

    /// Move every cursor one glyph (or word) left. Without `select` or
    /// `word_mode`, an existing selection collapses to its start instead.
    pub fn move_left(&mut self, select: bool, word_mode: bool) {
        if self.cursors.any_has_selection() && !select && !word_mode {
            for index in 0..self.cursors.len() {
                let start = self.cursors.get(index).selection_start();
                self.set_cursor_coordinate(index, start, true);
            }
        } else {
            for index in 0..self.cursors.len() {
                let end = self.buffer.sanitize(self.cursors.get(index).end);
                let coords = self.move_coords(end, MoveDirection::Left, word_mode, 1);
                self.set_cursor_coordinate(index, coords, !select);
            }
        }
        self.normalize_cursors();
        self.request_scroll(false);
    }

    /// Move every cursor one glyph (or word) right. Without `select` or
    /// `word_mode`, an existing selection collapses to its end instead.
    pub fn move_right(&mut self, select: bool, word_mode: bool) {
        if self.cursors.any_has_selection() && !select && !word_mode {
            for index in 0..self.cursors.len() {
                let end = self.cursors.get(index).selection_end();
                self.set_cursor_coordinate(index, end, true);
            }
        } else {
            for index in 0..self.cursors.len() {
                let end = self.buffer.sanitize(self.cursors.get(index).end);
                let coords = self.move_coords(end, MoveDirection::Right, word_mode, 1);
                self.set_cursor_coordinate(index, coords, !select);
            }
        }
        self.normalize_cursors();
        self.request_scroll(false);
    }

    /// Move the current cursor to the buffer start.
    pub fn move_top(&mut self, select: bool) {
        let index = self.cursors.current_index();
        self.set_cursor_coordinate(index, Coordinate::new(0, 0), !select);
        self.normalize_cursors();
    }

    /// Move the current cursor to the buffer end.
    pub fn move_bottom(&mut self, select: bool) {
        let last = self.buffer.line_count() - 1;
        let position = Coordinate::new(last, self.buffer.line_max_column(last));
        let index = self.cursors.current_index();
        self.set_cursor_coordinate(index, position, !select);
        self.normalize_cursors();
    }

    /// Move every cursor to its line start.
    pub fn move_home(&mut self, select: bool) {
        for index in 0..self.cursors.len() {
            let line = self.cursors.get(index).end.line;
            self.set_cursor_coordinate(index, Coordinate::new(line, 0), !select);
        }
        self.normalize_cursors();
    }

    /// Move every cursor to its line end.
    pub fn move_end(&mut self, select: bool) {
        for index in 0..self.cursors.len() {
            let line = self.cursors.get(index).end.line;
            let column = self.buffer.line_max_column(line);
            self.set_cursor_coordinate(index, Coordinate::new(line, column), !select);
        }
        self.normalize_cursors();
    }

    // ---- Undo plumbing shared with the replay code ------------------------

    /// Insert text, marking search results stale. Used by commands and by
    /// undo/redo replay.
    pub(crate) fn apply_insert(&mut self, position: Coordinate, text: &str) -> Coordinate {
        debug_assert!(!self.read_only);
        self.find.on_buffer_edited();
        self.buffer.insert_text_at(&mut self.cursors, position, text)
    }

    /// Delete a range, marking search results stale. Used by commands and by
    /// undo/redo replay.
    pub(crate) fn apply_delete(
        &mut self,
        start: Coordinate,
        end: Coordinate,
        exempt: Option<(Coordinate, Coordinate)>,
    ) {
        debug_assert!(!self.read_only);
        self.find.on_buffer_edited();
        self.buffer.delete_range(&mut self.cursors, start, end, exempt);
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
