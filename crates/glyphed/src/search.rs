//! Find/replace engine.
//!
//! The buffer is flattened into one searchable text (lines joined with `\n`)
//! plus a per-line starting-offset index, all in character offsets. The
//! flattened form is rebuilt only when the undo-sequence version or the
//! pattern/options change; edits mark it stale and the host coalesces rapid
//! keystrokes by deferring [`Editor::ensure_find_results_up_to_date`].
//!
//! Plain search folds case by lowering haystack and needle; regex search
//! compiles once per refresh. Matches map back to coordinates and multi-line
//! matches decompose into one highlight segment per covered line for the
//! renderer.

use std::collections::HashMap;
use std::fmt;

use regex::RegexBuilder;

use crate::coords::{is_word_char, Coordinate};
use crate::editor::Editor;
use crate::undo::{UndoOperation, UndoOperationKind, UndoRecord};

/// One match, as a half-open coordinate range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Match start (inclusive).
    pub start: Coordinate,
    /// Match end (exclusive).
    pub end: Coordinate,
}

/// One per-line highlight segment of a match, for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineHighlight {
    /// First highlighted column.
    pub start_column: usize,
    /// Last highlighted column (exclusive).
    pub end_column: usize,
    /// The segment visually extends to the end of its line (the match
    /// continues on the next line).
    pub extends_to_line_end: bool,
    /// Index into the result list of the match this segment belongs to.
    pub result_index: usize,
}

/// Transient find/replace outcome for the host's status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindStatus {
    /// The search produced no matches.
    NoMatches,
    /// Backward navigation hit the first match with wrapping disabled.
    ReachedStart,
    /// Forward navigation hit the last match with wrapping disabled.
    ReachedEnd,
    /// The pattern is not a valid regular expression; the previous result
    /// set is untouched.
    InvalidRegex,
    /// This many occurrences were replaced.
    Replaced(usize),
    /// Replace was requested without a pattern.
    NothingToReplace,
}

impl fmt::Display for FindStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatches => write!(f, "No matches"),
            Self::ReachedStart => write!(f, "Reached start"),
            Self::ReachedEnd => write!(f, "Reached end"),
            Self::InvalidRegex => write!(f, "Invalid regex"),
            Self::Replaced(1) => write!(f, "Replaced 1 match"),
            Self::Replaced(count) => write!(f, "Replaced {count} matches"),
            Self::NothingToReplace => write!(f, "Nothing to replace"),
        }
    }
}

/// Maps between character offsets and byte offsets of one flattened text.
#[derive(Debug)]
struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    fn char_count(&self) -> usize {
        self.char_to_byte.len() - 1
    }

    fn char_to_byte(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.char_count());
        self.char_to_byte[clamped]
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        self.char_to_byte.partition_point(|&b| b < clamped)
    }
}

#[derive(Debug)]
pub(crate) struct FindState {
    pub(crate) pattern: String,
    pub(crate) replacement: String,
    pub(crate) case_sensitive: bool,
    pub(crate) whole_word: bool,
    pub(crate) use_regex: bool,
    pub(crate) wrap_around: bool,
    pub(crate) selection_only: bool,
    results: Vec<SearchResult>,
    highlights: HashMap<usize, Vec<LineHighlight>>,
    result_index: Option<usize>,
    dirty: bool,
    refresh_pending: bool,
    last_version: Option<(usize, usize)>,
    selection_range: Option<(Coordinate, Coordinate)>,
    status: Option<FindStatus>,
}

impl FindState {
    pub(crate) fn new() -> Self {
        Self {
            pattern: String::new(),
            replacement: String::new(),
            case_sensitive: false,
            whole_word: false,
            use_regex: false,
            wrap_around: true,
            selection_only: false,
            results: Vec::new(),
            highlights: HashMap::new(),
            result_index: None,
            dirty: false,
            refresh_pending: false,
            last_version: None,
            selection_range: None,
            status: None,
        }
    }

    /// Buffer edits leave cached results stale; deferred so a run of
    /// keystrokes costs one re-scan.
    pub(crate) fn on_buffer_edited(&mut self) {
        self.dirty = true;
        self.refresh_pending = true;
        self.highlights.clear();
    }

    pub(crate) fn mark_dirty(&mut self, defer: bool) {
        self.dirty = true;
        self.refresh_pending = defer;
    }

    pub(crate) fn reset(&mut self) {
        self.results.clear();
        self.highlights.clear();
        self.result_index = None;
        self.dirty = true;
        self.refresh_pending = false;
        self.last_version = None;
        self.selection_range = None;
        self.status = None;
    }
}

impl Editor {
    // ---- Configuration ----------------------------------------------------

    /// The current search pattern.
    pub fn find_pattern(&self) -> &str {
        &self.find.pattern
    }

    /// Set the search pattern, invalidating cached results.
    pub fn set_find_pattern(&mut self, pattern: &str) {
        if self.find.pattern != pattern {
            self.find.pattern = pattern.to_string();
            self.find.mark_dirty(false);
        }
    }

    /// Returns `true` when a non-empty pattern is set.
    pub fn has_find_pattern(&self) -> bool {
        !self.find.pattern.is_empty()
    }

    /// The current replacement text.
    pub fn find_replacement(&self) -> &str {
        &self.find.replacement
    }

    /// Set the replacement text.
    pub fn set_find_replacement(&mut self, replacement: &str) {
        self.find.replacement = replacement.to_string();
    }

    /// Set case sensitivity, invalidating cached results.
    pub fn set_find_case_sensitive(&mut self, case_sensitive: bool) {
        if self.find.case_sensitive != case_sensitive {
            self.find.case_sensitive = case_sensitive;
            self.find.mark_dirty(false);
        }
    }

    /// Set whole-word matching (plain search only), invalidating results.
    pub fn set_find_whole_word(&mut self, whole_word: bool) {
        if self.find.whole_word != whole_word {
            self.find.whole_word = whole_word;
            self.find.mark_dirty(false);
        }
    }

    /// Treat the pattern as a regular expression, invalidating results.
    pub fn set_find_use_regex(&mut self, use_regex: bool) {
        if self.find.use_regex != use_regex {
            self.find.use_regex = use_regex;
            self.find.mark_dirty(false);
        }
    }

    /// Whether next/previous navigation wraps around the result list.
    pub fn set_find_wrap_around(&mut self, wrap_around: bool) {
        self.find.wrap_around = wrap_around;
    }

    /// Restrict the search to the current (or last saved) selection.
    pub fn set_find_selection_only(&mut self, selection_only: bool) {
        if self.find.selection_only != selection_only {
            self.find.selection_only = selection_only;
            if !selection_only {
                self.find.selection_range = None;
            }
            self.find.mark_dirty(false);
        }
    }

    /// Mark search results stale. With `defer`, the re-scan is postponed
    /// until the next [`Editor::ensure_find_results_up_to_date`] so the
    /// host's scheduling loop can coalesce rapid keystrokes.
    pub fn mark_find_results_dirty(&mut self, defer: bool) {
        self.find.mark_dirty(defer);
    }

    /// Take the pending transient status, if the last operation produced one.
    pub fn take_find_status(&mut self) -> Option<FindStatus> {
        self.find.status.take()
    }

    // ---- Result access ----------------------------------------------------

    /// Cached matches. Call [`Editor::ensure_find_results_up_to_date`] first.
    pub fn find_results(&self) -> &[SearchResult] {
        &self.find.results
    }

    /// Number of cached matches.
    pub fn find_result_count(&self) -> usize {
        self.find.results.len()
    }

    /// Index of the active match, if any.
    pub fn find_result_index(&self) -> Option<usize> {
        self.find.result_index
    }

    /// Highlight segments covering `line`, if any. `None` without a pattern.
    pub fn find_highlights_for_line(&self, line: usize) -> Option<&[LineHighlight]> {
        if !self.has_find_pattern() {
            return None;
        }
        self.find.highlights.get(&line).map(Vec::as_slice)
    }

    // ---- Refresh ----------------------------------------------------------

    /// Re-scan if the cached results are stale (buffer version moved, or the
    /// pattern/options changed). The one call every read path goes through.
    pub fn ensure_find_results_up_to_date(&mut self) {
        if !self.has_find_pattern() {
            if !self.find.results.is_empty() {
                self.find.results.clear();
                self.find.highlights.clear();
                self.find.result_index = None;
            }
            self.find.dirty = false;
            return;
        }

        let version = Some(self.history.version());
        if self.find.dirty || self.find.last_version != version {
            self.refresh_find_results(true);
        }
    }

    /// Overall bounds of the cursor selections, or the saved
    /// selection-search range when no cursor selects text.
    fn selection_bounds_for_find(&self) -> Option<(Coordinate, Coordinate)> {
        if let Some((start, end)) = self.cursors.selection_bounds() {
            let start = self.buffer.sanitize(start);
            let end = self.buffer.sanitize(end);
            if start < end {
                return Some((start, end));
            }
        }
        if let Some((start, end)) = self.find.selection_range {
            let start = self.buffer.sanitize(start);
            let end = self.buffer.sanitize(end);
            if start < end {
                return Some((start, end));
            }
        }
        None
    }

    fn flat_offset_of(&self, line_offsets: &[usize], coords: Coordinate) -> usize {
        let sanitized = self.buffer.sanitize(coords);
        let line = sanitized.line.min(self.buffer.line_count() - 1);
        let index = self
            .buffer
            .char_index_right(sanitized)
            .min(self.buffer.line(line).len());
        line_offsets[line] + index
    }

    fn coords_of_flat_offset(&self, line_offsets: &[usize], offset: usize) -> Coordinate {
        let line = line_offsets
            .partition_point(|&base| base <= offset)
            .saturating_sub(1);
        let index = (offset - line_offsets[line]).min(self.buffer.line(line).len());
        Coordinate::new(line, self.buffer.column_at(line, index))
    }

    /// Rebuild the flattened text and result cache.
    pub fn refresh_find_results(&mut self, preserve_selection: bool) {
        self.find.dirty = false;
        self.find.refresh_pending = false;
        self.find.last_version = Some(self.history.version());

        if self.find.pattern.is_empty() {
            self.find.results.clear();
            self.find.highlights.clear();
            self.find.result_index = None;
            return;
        }

        let case_sensitive = self.find.case_sensitive;
        let whole_word = self.find.whole_word && !self.find.use_regex;

        // Compile before clearing anything: an invalid regex must leave the
        // previous result set untouched.
        let compiled = if self.find.use_regex {
            match RegexBuilder::new(&self.find.pattern)
                .case_insensitive(!case_sensitive)
                .multi_line(true)
                .build()
            {
                Ok(regex) => Some(regex),
                Err(_) => {
                    self.find.status = Some(FindStatus::InvalidRegex);
                    return;
                }
            }
        } else {
            None
        };

        // Flatten the buffer with a per-line char-offset index.
        let line_texts = self.buffer.text_lines();
        let mut line_offsets = Vec::with_capacity(line_texts.len());
        let mut total_chars = 0;
        for (i, text) in line_texts.iter().enumerate() {
            line_offsets.push(total_chars);
            total_chars += text.chars().count();
            if i + 1 < line_texts.len() {
                total_chars += 1;
            }
        }
        let joined = line_texts.join("\n");
        let joined_chars: Vec<char> = joined.chars().collect();

        // Selection restriction.
        let mut restricted = None;
        if self.find.selection_only {
            if let Some(bounds) = self.selection_bounds_for_find() {
                restricted = Some(bounds);
            }
        }
        self.find.selection_range = restricted;
        let (range_start_coords, range_end_coords) = restricted.unwrap_or_else(|| {
            let last = self.buffer.line_count() - 1;
            (
                Coordinate::new(0, 0),
                self.buffer
                    .sanitize(Coordinate::new(last, self.buffer.line_max_column(last))),
            )
        });
        let mut range_start = self.flat_offset_of(&line_offsets, range_start_coords);
        let mut range_end = self
            .flat_offset_of(&line_offsets, range_end_coords)
            .min(total_chars);
        if range_start > range_end {
            std::mem::swap(&mut range_start, &mut range_end);
        }

        // Selection to re-select after the refresh, if requested.
        let preserved = if preserve_selection && self.cursors.any_has_selection() {
            let cursor = self.cursors.get(self.cursors.last_added_index());
            Some((cursor.selection_start(), cursor.selection_end()))
        } else {
            None
        };

        let fold = |ch: char| {
            if case_sensitive {
                ch
            } else {
                ch.to_lowercase().next().unwrap_or(ch)
            }
        };
        let boundary_ok = |start: usize, end: usize| {
            let before = start == range_start
                || start == 0
                || !is_word_char(joined_chars[start - 1]);
            let after = end >= range_end
                || end >= joined_chars.len()
                || !is_word_char(joined_chars[end]);
            before && after
        };

        // Collect matches in char offsets.
        let mut matches: Vec<(usize, usize)> = Vec::new();
        if let Some(regex) = compiled {
            let index = CharIndex::new(&joined);
            let start_byte = index.char_to_byte(range_start);
            let end_byte = index.char_to_byte(range_end);
            for found in regex.find_iter(&joined[start_byte..end_byte]) {
                if found.start() == found.end() {
                    continue;
                }
                let start = index.byte_to_char(start_byte + found.start());
                let end = index.byte_to_char(start_byte + found.end());
                matches.push((start, end));
            }
        } else {
            let needle: Vec<char> = self.find.pattern.chars().map(fold).collect();
            let mut position = range_start;
            while position + needle.len() <= range_end {
                let matched = joined_chars[position..position + needle.len()]
                    .iter()
                    .zip(&needle)
                    .all(|(&h, &n)| fold(h) == n);
                if !matched {
                    position += 1;
                    continue;
                }
                let (start, end) = (position, position + needle.len());
                if whole_word && !boundary_ok(start, end) {
                    position = start + 1;
                    continue;
                }
                matches.push((start, end));
                position = end;
            }
        }

        self.find.results.clear();
        self.find.highlights.clear();
        self.find.result_index = None;

        for (start_offset, end_offset) in matches {
            let start = self.coords_of_flat_offset(&line_offsets, start_offset);
            let end = self.coords_of_flat_offset(&line_offsets, end_offset);
            let result_index = self.find.results.len();
            self.find.results.push(SearchResult { start, end });

            if start.line == end.line {
                self.find.highlights.entry(start.line).or_default().push(
                    LineHighlight {
                        start_column: start.column,
                        end_column: end.column,
                        extends_to_line_end: false,
                        result_index,
                    },
                );
            } else {
                self.find.highlights.entry(start.line).or_default().push(
                    LineHighlight {
                        start_column: start.column,
                        end_column: self.buffer.line_max_column(start.line),
                        extends_to_line_end: true,
                        result_index,
                    },
                );
                for line in start.line + 1..end.line {
                    self.find.highlights.entry(line).or_default().push(
                        LineHighlight {
                            start_column: 0,
                            end_column: self.buffer.line_max_column(line),
                            extends_to_line_end: true,
                            result_index,
                        },
                    );
                }
                self.find.highlights.entry(end.line).or_default().push(
                    LineHighlight {
                        start_column: 0,
                        end_column: end.column,
                        extends_to_line_end: false,
                        result_index,
                    },
                );
            }
        }

        if self.find.results.is_empty() {
            return;
        }

        // Pick the active match: the preserved selection if it still is one,
        // else the first match containing or following the cursor.
        let mut chosen = None;
        if let Some((start, end)) = preserved {
            chosen = self
                .find
                .results
                .iter()
                .position(|r| r.start == start && r.end == end);
        }
        if chosen.is_none() {
            let cursor = self.cursor_position();
            chosen = self
                .find
                .results
                .iter()
                .position(|r| (r.start <= cursor && cursor < r.end) || cursor < r.start);
        }
        self.find.result_index = Some(chosen.unwrap_or(0));
    }

    // ---- Navigation -------------------------------------------------------

    /// Select result `index` (wrapped modulo the result count) with a single
    /// cursor. Returns `false` when there are no results.
    pub fn focus_find_result(&mut self, index: isize, center: bool) -> bool {
        self.ensure_find_results_up_to_date();
        if self.find.results.is_empty() {
            return false;
        }
        let count = self.find.results.len() as isize;
        let wrapped = index.rem_euclid(count) as usize;
        self.find.result_index = Some(wrapped);

        let result = self.find.results[wrapped];
        self.cursors.clear_selections();
        self.cursors.clear_extras();
        self.set_selection(result.start, result.end, 0);
        if center {
            self.request_scroll(true);
        }
        true
    }

    /// Step to the next (or previous) match. Without wrapping, stepping past
    /// either end reports [`FindStatus::ReachedEnd`]/[`FindStatus::ReachedStart`]
    /// and stays put; an empty result list reports [`FindStatus::NoMatches`].
    pub fn find_next(&mut self, backwards: bool) {
        self.ensure_find_results_up_to_date();
        if self.find.results.is_empty() {
            self.find.status = Some(FindStatus::NoMatches);
            return;
        }
        let count = self.find.results.len() as isize;
        let target = match self.find.result_index {
            None => {
                if backwards {
                    count - 1
                } else {
                    0
                }
            }
            Some(current) => {
                let next = current as isize + if backwards { -1 } else { 1 };
                if !self.find.wrap_around && (next < 0 || next >= count) {
                    self.find.status = Some(if backwards {
                        FindStatus::ReachedStart
                    } else {
                        FindStatus::ReachedEnd
                    });
                    return;
                }
                next.rem_euclid(count)
            }
        };
        self.focus_find_result(target, true);
        self.find.status = None;
    }

    // ---- Replace ----------------------------------------------------------

    /// Delete every selection and insert `text` at each cursor, as one
    /// transaction.
    fn replace_selection_with(&mut self, text: &str) {
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
        if !text.is_empty() {
            for index in (0..self.cursors.len()).rev() {
                let start = self.sanitized_cursor(index, false);
                self.insert_text_at_cursor(index, text);
                record.push(UndoOperation::new(
                    UndoOperationKind::Add,
                    text.to_string(),
                    start,
                    self.sanitized_cursor(index, false),
                ));
            }
        }
        record.after = self.cursors.clone();
        self.history.push(record);
    }

    /// Replace the active match with the replacement text, then re-select
    /// the first match at or after the cursor.
    pub fn replace_current(&mut self) {
        if !self.has_find_pattern() {
            self.find.status = Some(FindStatus::NothingToReplace);
            return;
        }
        if self.is_read_only() {
            return;
        }
        self.ensure_find_results_up_to_date();
        if self.find.results.is_empty() {
            self.find.status = Some(FindStatus::NoMatches);
            return;
        }

        let index = self
            .find
            .result_index
            .filter(|&i| i < self.find.results.len())
            .unwrap_or(0);
        let current = self.find.results[index];
        self.cursors.clear_selections();
        self.cursors.clear_extras();
        self.set_selection(current.start, current.end, 0);
        let replacement = self.find.replacement.clone();
        self.replace_selection_with(&replacement);
        if self.find.selection_only {
            self.find.selection_range = None;
        }

        self.find.mark_dirty(false);
        self.refresh_find_results(false);
        if self.find.results.is_empty() {
            self.find.result_index = None;
            self.cursors.clear_selections();
            self.request_scroll(false);
        } else {
            let cursor = self.cursor_position();
            let next = self
                .find
                .results
                .iter()
                .position(|r| (r.start <= cursor && cursor < r.end) || cursor <= r.start)
                .unwrap_or(0);
            self.focus_find_result(next as isize, true);
        }
        self.find.status = Some(FindStatus::Replaced(1));
    }

    /// Replace every match (inside the selection restriction, when active),
    /// looping earliest-first and stopping when no match remains or the same
    /// start position is chosen twice in a row - the guard against a
    /// replacement that re-matches itself. Returns the replacement count.
    pub fn replace_all(&mut self) -> usize {
        if !self.has_find_pattern() {
            self.find.status = Some(FindStatus::NothingToReplace);
            return 0;
        }
        if self.is_read_only() {
            return 0;
        }
        self.ensure_find_results_up_to_date();
        if self.find.results.is_empty() {
            self.find.status = Some(FindStatus::NoMatches);
            return 0;
        }

        let mut restriction = None;
        if self.find.selection_only {
            if let Some(bounds) = self.selection_bounds_for_find() {
                self.find.selection_range = Some(bounds);
            }
            restriction = self.find.selection_range;
        }

        let replacement = self.find.replacement.clone();
        let mut replacements = 0;
        let mut last_start: Option<Coordinate> = None;

        loop {
            self.ensure_find_results_up_to_date();
            if self.find.results.is_empty() {
                break;
            }
            let target = self.find.results.iter().find(|result| match restriction {
                None => true,
                Some((start, end)) => start <= result.start && result.end <= end,
            });
            let Some(&current) = target else {
                break;
            };
            if last_start == Some(current.start) {
                break;
            }
            last_start = Some(current.start);

            self.cursors.clear_selections();
            self.cursors.clear_extras();
            self.set_selection(current.start, current.end, 0);
            self.replace_selection_with(&replacement);
            replacements += 1;
            if restriction.is_some() {
                self.find.selection_range = None;
            }
        }

        self.refresh_find_results(false);
        if self.find.results.is_empty() {
            self.find.result_index = None;
            self.cursors.clear_selections();
            self.request_scroll(false);
        } else {
            self.focus_find_result(0, false);
        }

        if replacements == 0 {
            self.find.status = Some(FindStatus::NoMatches);
        } else {
            self.find.status = Some(FindStatus::Replaced(replacements));
        }
        replacements
    }
}
