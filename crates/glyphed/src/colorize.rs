//! Incremental syntax colorization.
//!
//! Two phases per pass:
//!
//! 1. A comment/string scan over the whole buffer, run only when an edit may
//!    have moved comment or string boundaries. A single explicit state
//!    (inside-string, inside-single-line-comment, open multi-line comment
//!    position, inside-preprocessor-line, backslash continuation) is threaded
//!    through one linear walk, stamping each glyph with the flags implied by
//!    the state at that glyph's position.
//! 2. Token classification over the dirty line range, a bounded chunk per
//!    pass so a huge buffer never stalls the caller. The language's native
//!    tokenizer runs first; the compiled fallback patterns are tried in
//!    order, anchored at the scan position, and the first match wins.
//!
//! Dirty requests merge into one `[min, max)` watermark, so repeated small
//! edits never cause quadratic re-scanning.

use regex::Regex;

use glyphed_lang::{LanguageDefinition, PaletteIndex};

use crate::buffer::Buffer;

/// Lines re-tokenized per pass when the language has a native tokenizer.
const CHUNK_WITH_TOKENIZER: usize = 10_000;
/// Lines re-tokenized per pass when only regex fallback patterns exist.
const CHUNK_REGEX_ONLY: usize = 10;

#[derive(Debug)]
pub(crate) struct Colorizer {
    range_min: usize,
    range_max: usize,
    check_comments: bool,
    patterns: Vec<(Regex, PaletteIndex)>,
}

impl Colorizer {
    pub(crate) fn new() -> Self {
        Self {
            range_min: usize::MAX,
            range_max: 0,
            check_comments: false,
            patterns: Vec::new(),
        }
    }

    /// Compile the fallback pattern table for a new active language. Each
    /// pattern is anchored so a match can only start at the scan position.
    pub(crate) fn set_language(&mut self, language: Option<&'static LanguageDefinition>) {
        self.patterns.clear();
        if let Some(language) = language {
            for (source, color) in language.token_patterns {
                if let Ok(regex) = Regex::new(&format!("^(?:{source})")) {
                    self.patterns.push((regex, *color));
                }
            }
        }
    }

    /// Merge `[from_line, from_line + count)` (or to the buffer end) into the
    /// dirty watermark and schedule a comment/string re-scan.
    pub(crate) fn invalidate(&mut self, from_line: usize, count: Option<usize>, line_count: usize) {
        let to_line = match count {
            Some(count) => line_count.min(from_line + count),
            None => line_count,
        };
        self.range_min = self.range_min.min(from_line);
        self.range_max = self.range_max.max(to_line).max(self.range_min);
        self.check_comments = true;
    }

    /// Run one bounded pass. Returns `true` while dirty lines remain.
    pub(crate) fn step(&mut self, buffer: &mut Buffer, language: &LanguageDefinition) -> bool {
        if self.check_comments {
            self.scan_comments(buffer, language);
            self.check_comments = false;
        }

        if self.range_min < self.range_max {
            let increment = if language.tokenize.is_some() {
                CHUNK_WITH_TOKENIZER
            } else {
                CHUNK_REGEX_ONLY
            };
            let to = self.range_max.min(self.range_min + increment);
            self.classify_range(buffer, language, self.range_min, to);
            self.range_min = to;

            if self.range_min >= self.range_max {
                self.range_min = usize::MAX;
                self.range_max = 0;
                return false;
            }
            return true;
        }
        false
    }

    /// Phase 1: the cross-line comment/string/preprocessor state machine.
    fn scan_comments(&mut self, buffer: &mut Buffer, language: &LanguageDefinition) {
        let line_count = buffer.line_count();
        let comment_start: Vec<char> = language.comment_start.chars().collect();
        let comment_end: Vec<char> = language.comment_end.chars().collect();
        let single_line: Vec<char> = language.single_line_comment.chars().collect();

        // Position of the open multi-line comment's start; `None` outside.
        let mut open_comment: Option<(usize, usize)> = None;
        let mut within_string = false;
        let mut within_single_line = false;
        let mut within_preproc = false;
        let mut first_char = true;
        let mut concatenate = false;

        let mut line = 0;
        let mut index = 0;
        while line < line_count {
            if index == 0 && !concatenate {
                within_single_line = false;
                within_preproc = false;
                first_char = true;
            }
            concatenate = false;

            if buffer.line(line).is_empty() {
                index = 0;
                line += 1;
                continue;
            }

            let glyphs = buffer.line(line);
            let ch = glyphs[index].ch;

            if language.preproc_char != Some(ch) && !ch.is_whitespace() {
                first_char = false;
            }
            if index == glyphs.len() - 1 && ch == '\\' {
                concatenate = true;
            }

            let in_comment =
                open_comment.is_some_and(|open| open <= (line, index));

            if within_string {
                let glyphs = buffer.line_mut(line);
                glyphs[index].multiline_comment = in_comment;
                if ch == '"' {
                    if index + 1 < glyphs.len() && glyphs[index + 1].ch == '"' {
                        // Doubled quote stays inside the string.
                        index += 1;
                        glyphs[index].multiline_comment = in_comment;
                    } else {
                        within_string = false;
                    }
                } else if ch == '\\' {
                    // Escape consumes the next glyph.
                    index += 1;
                    if index < glyphs.len() {
                        glyphs[index].multiline_comment = in_comment;
                    }
                }
            } else {
                if first_char && language.preproc_char == Some(ch) {
                    within_preproc = true;
                }

                if ch == '"' {
                    within_string = true;
                    buffer.line_mut(line)[index].multiline_comment = in_comment;
                } else {
                    let matches_at = |tokens: &[char], at: usize| {
                        !tokens.is_empty()
                            && at + tokens.len() <= glyphs.len()
                            && tokens
                                .iter()
                                .zip(&glyphs[at..])
                                .all(|(&t, g)| t == g.ch)
                    };

                    if !within_single_line && matches_at(&comment_start, index) {
                        open_comment = Some((line, index));
                    } else if matches_at(&single_line, index) {
                        within_single_line = true;
                    }

                    let in_comment =
                        open_comment.is_some_and(|open| open <= (line, index));
                    let closes_comment = !comment_end.is_empty()
                        && index + 1 >= comment_end.len()
                        && comment_end
                            .iter()
                            .zip(&glyphs[index + 1 - comment_end.len()..=index])
                            .all(|(&t, g)| t == g.ch);

                    let glyphs = buffer.line_mut(line);
                    glyphs[index].multiline_comment = in_comment;
                    glyphs[index].comment = within_single_line;

                    if closes_comment {
                        open_comment = None;
                    }
                }
            }

            let glyphs = buffer.line_mut(line);
            if index < glyphs.len() {
                glyphs[index].preprocessor = within_preproc;
            }
            index += 1;
            if index >= glyphs.len() {
                index = 0;
                line += 1;
            }
        }
    }

    /// Phase 2: token classification for `[from, to)`.
    fn classify_range(
        &self,
        buffer: &mut Buffer,
        language: &LanguageDefinition,
        from: usize,
        to: usize,
    ) {
        let to = to.min(buffer.line_count());
        for line in from..to {
            if buffer.line(line).is_empty() {
                continue;
            }
            let text = buffer.line_text(line);
            for glyph in buffer.line_mut(line).iter_mut() {
                glyph.color = PaletteIndex::Default;
            }

            let mut byte = 0;
            let mut char_pos = 0;
            while byte < text.len() {
                let rest = &text[byte..];

                let mut token = language.tokenize.and_then(|tokenize| tokenize(rest));
                if token.is_none() {
                    for (regex, color) in &self.patterns {
                        if let Some(found) = regex.find(rest) {
                            token = Some((found.end(), *color));
                            break;
                        }
                    }
                }

                let Some((len, color)) = token.filter(|&(len, _)| len > 0) else {
                    let ch = rest.chars().next().expect("byte < text.len()");
                    byte += ch.len_utf8();
                    char_pos += 1;
                    continue;
                };

                let token_text = &rest[..len];
                let token_chars = token_text.chars().count();
                let mut color = color;

                if color == PaletteIndex::Identifier {
                    let id = if language.case_sensitive {
                        token_text.to_string()
                    } else {
                        token_text.to_uppercase()
                    };
                    let id = id.as_str();
                    if !buffer.line(line)[char_pos].preprocessor {
                        if language.keywords.contains(id) {
                            color = PaletteIndex::Keyword;
                        } else if language.identifiers.contains(id) {
                            color = PaletteIndex::KnownIdentifier;
                        } else if language.preproc_identifiers.contains(id) {
                            color = PaletteIndex::PreprocIdentifier;
                        }
                    } else if language.preproc_identifiers.contains(id) {
                        color = PaletteIndex::PreprocIdentifier;
                    }
                }

                for glyph in &mut buffer.line_mut(line)[char_pos..char_pos + token_chars] {
                    glyph.color = color;
                }
                byte += len;
                char_pos += token_chars;
            }
        }
    }
}
