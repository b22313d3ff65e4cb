#![warn(missing_docs)]
//! Glyphed - Headless Multi-Cursor Source-Code Editing Kernel
//!
//! # Overview
//!
//! `glyphed` is the editing core of a source-code editor: a mutable text
//! buffer of annotated glyphs, N independent cursors/selections kept
//! consistent across every mutation, transactional undo/redo, incremental
//! syntax colorization driven by a pluggable [`glyphed_lang`] grammar, and a
//! find/replace engine with plain and regex search. It contains no rendering,
//! no device input, and no clipboard OS integration - hosts drive it through
//! commands and read coordinates, glyph annotations, and highlight spans
//! back out.
//!
//! # Core Features
//!
//! - **Coordinate model**: (line, visual column) ↔ glyph-index conversion
//!   with tab expansion and Unicode-aware glyph widths
//! - **Multi-cursor editing**: every command applies at all cursors; cursor
//!   coordinates are repaired atomically with each buffer mutation
//! - **Transactional undo/redo**: per-command delta lists plus cursor-set
//!   snapshots, replayed in the correct order in both directions
//! - **Incremental colorization**: cross-line comment/string state machine
//!   plus chunked token classification over a dirty-range watermark
//! - **Find/replace**: flattened-buffer search with per-line highlight
//!   caching, wrap-aware navigation, and self-match-guarded bulk replace
//!
//! # Quick Start
//!
//! ```rust
//! use glyphed::Editor;
//!
//! let mut editor = Editor::with_text("hello\nworld");
//! editor.set_cursor_position(0, 5);
//! editor.enter_character('!', false);
//! assert_eq!(editor.text(), "hello!\nworld");
//!
//! editor.undo(1);
//! assert_eq!(editor.text(), "hello\nworld");
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - annotated glyph buffer and the coordinate model
//! - [`cursor`] - cursors and the sorted/merged multi-cursor set
//! - [`editor`] - the editor state, queries, movement, and selection API
//! - [`commands`] - high-level edit commands, one undo transaction each
//! - [`undo`] - the reversible transaction log
//! - `colorize` - the incremental colorizer (private; driven through
//!   [`Editor`](editor::Editor) methods)
//! - [`search`] - the find/replace engine
//!
//! # Concurrency Model
//!
//! Single-threaded and synchronous: every command runs to completion in its
//! call. The only cooperative piece is the colorizer's token phase, which
//! processes a bounded chunk per [`Editor::colorize_step`](editor::Editor::colorize_step)
//! so hosts with very large buffers never stall a frame.

pub mod buffer;
mod colorize;
pub mod commands;
pub mod coords;
pub mod cursor;
pub mod editor;
pub mod search;
pub mod undo;

pub use buffer::{Buffer, Glyph, Line};
pub use coords::{Coordinate, MoveDirection};
pub use cursor::{Cursor, CursorSet};
pub use editor::{Editor, ScrollRequest};
pub use glyphed_lang::{LanguageDefinition, LanguageId, PaletteIndex};
pub use search::{FindStatus, LineHighlight, SearchResult};
pub use undo::{UndoOperation, UndoOperationKind, UndoRecord};
