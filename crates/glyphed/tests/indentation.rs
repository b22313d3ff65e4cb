use glyphed::{Coordinate, Editor};

#[test]
fn test_indent_selected_block() {
    let mut editor = Editor::with_text("one\ntwo\nthree");
    editor.select_region(0, 0, 2, 5);
    editor.change_line_indentation(true);
    assert_eq!(editor.text(), "\tone\n\ttwo\n\tthree");
}

#[test]
fn test_indent_skips_line_touched_only_at_column_zero() {
    let mut editor = Editor::with_text("one\ntwo");
    // The selection ends exactly at the start of line 1.
    editor.select_region(0, 0, 1, 0);
    editor.change_line_indentation(true);
    assert_eq!(editor.text(), "\tone\ntwo");
}

#[test]
fn test_indent_skips_empty_lines() {
    let mut editor = Editor::with_text("one\n\ntwo");
    editor.select_region(0, 0, 2, 3);
    editor.change_line_indentation(true);
    assert_eq!(editor.text(), "\tone\n\n\ttwo");
}

#[test]
fn test_outdent_strips_one_tab_stop() {
    let mut editor = Editor::with_text("\tone\n    two\n  three");
    editor.select_region(0, 0, 2, 7);
    editor.change_line_indentation(false);
    // A line whose first tab stop is not pure whitespace keeps its prefix.
    assert_eq!(editor.text(), "one\ntwo\n  three");
}

#[test]
fn test_outdent_leaves_unindented_line_alone() {
    let mut editor = Editor::with_text("one\n\ttwo");
    editor.select_region(0, 0, 1, 4);
    editor.change_line_indentation(false);
    assert_eq!(editor.text(), "one\ntwo");
}

#[test]
fn test_tab_with_multiline_selection_indents() {
    let mut editor = Editor::with_text("aa\nbb");
    editor.select_region(0, 0, 1, 2);
    editor.enter_character('\t', false);
    assert_eq!(editor.text(), "\taa\n\tbb");
    // Shift+Tab outdents the same block.
    editor.select_region(0, 0, 1, 3);
    editor.enter_character('\t', true);
    assert_eq!(editor.text(), "aa\nbb");
}

#[test]
fn test_tab_without_selection_inserts_tab_character() {
    let mut editor = Editor::with_text("ab");
    editor.set_cursor_position(0, 1);
    editor.enter_character('\t', false);
    assert_eq!(editor.text(), "a\tb");
    assert_eq!(editor.cursor_position(), Coordinate::new(0, 4));
}

#[test]
fn test_indent_undo_round_trip() {
    let mut editor = Editor::with_text("one\ntwo");
    editor.select_region(0, 0, 1, 3);
    editor.change_line_indentation(true);
    assert_eq!(editor.text(), "\tone\n\ttwo");
    editor.undo(1);
    assert_eq!(editor.text(), "one\ntwo");
    editor.redo(1);
    assert_eq!(editor.text(), "\tone\n\ttwo");
}

#[test]
fn test_indent_multi_cursor_lines() {
    let mut editor = Editor::with_text("a\nb\nc");
    editor.set_cursor_position(0, 0);
    editor.add_cursor(2, 0);
    editor.change_line_indentation(true);
    // Only the lines with a cursor are indented.
    assert_eq!(editor.text(), "\ta\nb\n\tc");
}
