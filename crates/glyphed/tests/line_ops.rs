use glyphed::{Coordinate, Editor};

#[test]
fn test_move_line_up() {
    let mut editor = Editor::with_text("a\nb\nc");
    editor.set_cursor_position(1, 0);
    editor.move_lines_up();
    assert_eq!(editor.text(), "b\na\nc");
    assert_eq!(editor.cursor_position(), Coordinate::new(0, 0));
}

#[test]
fn test_move_line_up_refused_at_top() {
    let mut editor = Editor::with_text("a\nb");
    editor.set_cursor_position(0, 0);
    editor.move_lines_up();
    assert_eq!(editor.text(), "a\nb");
    assert!(!editor.can_undo());
}

#[test]
fn test_move_line_down() {
    let mut editor = Editor::with_text("a\nb\nc");
    editor.set_cursor_position(1, 1);
    editor.move_lines_down();
    assert_eq!(editor.text(), "a\nc\nb");
    assert_eq!(editor.cursor_position(), Coordinate::new(2, 1));
}

#[test]
fn test_move_line_down_refused_at_bottom() {
    let mut editor = Editor::with_text("a\nb");
    editor.set_cursor_position(1, 0);
    editor.move_lines_down();
    assert_eq!(editor.text(), "a\nb");
    assert!(!editor.can_undo());
}

#[test]
fn test_move_selected_block_down() {
    let mut editor = Editor::with_text("a\nb\nc\nd");
    editor.select_region(0, 0, 1, 1);
    editor.move_lines_down();
    assert_eq!(editor.text(), "c\na\nb\nd");
}

#[test]
fn test_move_lines_undo_round_trip() {
    let mut editor = Editor::with_text("a\nb\nc");
    editor.set_cursor_position(1, 0);
    editor.move_lines_up();
    assert_eq!(editor.text(), "b\na\nc");
    editor.undo(1);
    assert_eq!(editor.text(), "a\nb\nc");
    editor.redo(1);
    assert_eq!(editor.text(), "b\na\nc");
}

#[test]
fn test_move_multi_cursor_lines_up() {
    let mut editor = Editor::with_text("a\nb\nc\nd");
    editor.set_cursor_position(1, 0);
    editor.add_cursor(3, 0);
    editor.move_lines_up();
    // Each touched line swaps with its own neighbor above.
    assert_eq!(editor.text(), "b\na\nd\nc");
}

#[test]
fn test_remove_current_line_middle() {
    let mut editor = Editor::with_text("a\nb\nc");
    editor.set_cursor_position(1, 1);
    editor.remove_current_lines();
    assert_eq!(editor.text(), "a\nc");
    assert_eq!(editor.cursor_position(), Coordinate::new(1, 0));
}

#[test]
fn test_remove_last_line() {
    let mut editor = Editor::with_text("a\nb");
    editor.set_cursor_position(1, 0);
    editor.remove_current_lines();
    assert_eq!(editor.text(), "a");
    assert_eq!(editor.cursor_position(), Coordinate::new(0, 0));
}

#[test]
fn test_remove_only_line_leaves_empty_buffer() {
    let mut editor = Editor::with_text("solo");
    editor.remove_current_lines();
    assert_eq!(editor.text(), "");
    assert_eq!(editor.line_count(), 1);
}

#[test]
fn test_remove_current_lines_undo_round_trip() {
    let mut editor = Editor::with_text("a\nb\nc");
    editor.set_cursor_position(1, 0);
    editor.remove_current_lines();
    assert_eq!(editor.text(), "a\nc");
    editor.undo(1);
    assert_eq!(editor.text(), "a\nb\nc");
}
