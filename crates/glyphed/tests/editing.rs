use glyphed::{Coordinate, Editor};

#[test]
fn test_type_at_end_of_line() {
    let mut editor = Editor::with_text("abc");
    editor.set_cursor_position(0, 3);
    editor.enter_character('x', false);
    assert_eq!(editor.text(), "abcx");
    assert_eq!(editor.cursor_position(), Coordinate::new(0, 4));
}

#[test]
fn test_typing_replaces_selection() {
    let mut editor = Editor::with_text("hello world");
    editor.select_region(0, 0, 0, 5);
    editor.enter_character('H', false);
    assert_eq!(editor.text(), "H world");
    assert_eq!(editor.cursor_position(), Coordinate::new(0, 1));
}

#[test]
fn test_newline_auto_indent_copies_leading_whitespace() {
    let mut editor = Editor::with_text("    foo");
    editor.set_cursor_position(0, 7);
    editor.enter_character('\n', false);
    assert_eq!(editor.text(), "    foo\n    ");
    assert_eq!(editor.cursor_position(), Coordinate::new(1, 4));
}

#[test]
fn test_newline_without_auto_indent() {
    let mut editor = Editor::with_text("    foo");
    editor.set_auto_indent(false);
    editor.set_cursor_position(0, 7);
    editor.enter_character('\n', false);
    assert_eq!(editor.text(), "    foo\n");
    assert_eq!(editor.cursor_position(), Coordinate::new(1, 0));
}

#[test]
fn test_backspace_single_character() {
    let mut editor = Editor::with_text("abc");
    editor.set_cursor_position(0, 3);
    editor.backspace(false);
    assert_eq!(editor.text(), "ab");
    assert_eq!(editor.cursor_position(), Coordinate::new(0, 2));
}

#[test]
fn test_backspace_at_buffer_start_is_a_no_op() {
    let mut editor = Editor::with_text("abc");
    editor.set_cursor_position(0, 0);
    editor.backspace(false);
    assert_eq!(editor.text(), "abc");
    assert!(!editor.can_undo());
}

#[test]
fn test_backspace_bails_when_any_cursor_cannot_extend() {
    let mut editor = Editor::with_text("abc\ndef");
    editor.set_cursor_position(0, 0);
    editor.add_cursor(1, 2);
    editor.backspace(false);
    // One caret sits at the buffer start, so nothing changes anywhere.
    assert_eq!(editor.text(), "abc\ndef");
    assert_eq!(editor.cursor_count(), 2);
    assert!(!editor.can_undo());
}

#[test]
fn test_backspace_joins_lines() {
    let mut editor = Editor::with_text("ab\ncd");
    editor.set_cursor_position(1, 0);
    editor.backspace(false);
    assert_eq!(editor.text(), "abcd");
    assert_eq!(editor.cursor_position(), Coordinate::new(0, 2));
}

#[test]
fn test_backspace_word_mode() {
    let mut editor = Editor::with_text("hello world");
    editor.set_cursor_position(0, 11);
    editor.backspace(true);
    assert_eq!(editor.text(), "hello ");
}

#[test]
fn test_delete_forward() {
    let mut editor = Editor::with_text("abc");
    editor.set_cursor_position(0, 0);
    editor.delete_forward(false);
    assert_eq!(editor.text(), "bc");
}

#[test]
fn test_delete_at_buffer_end_is_a_no_op() {
    let mut editor = Editor::with_text("abc");
    editor.set_cursor_position(0, 3);
    editor.delete_forward(false);
    assert_eq!(editor.text(), "abc");
    assert!(!editor.can_undo());
}

#[test]
fn test_delete_joins_lines() {
    let mut editor = Editor::with_text("ab\ncd");
    editor.set_cursor_position(0, 2);
    editor.delete_forward(false);
    assert_eq!(editor.text(), "abcd");
}

#[test]
fn test_paste_plain() {
    let mut editor = Editor::with_text("ad");
    editor.set_cursor_position(0, 1);
    editor.paste("bc");
    assert_eq!(editor.text(), "abcd");
    assert_eq!(editor.cursor_position(), Coordinate::new(0, 3));
}

#[test]
fn test_paste_multi_line() {
    let mut editor = Editor::with_text("xy");
    editor.set_cursor_position(0, 1);
    editor.paste("1\n2");
    assert_eq!(editor.text(), "x1\n2y");
}

#[test]
fn test_paste_one_line_per_cursor() {
    let mut editor = Editor::with_text("a\nb");
    editor.set_cursor_position(0, 1);
    editor.add_cursor(1, 1);
    editor.paste("1\n2");
    assert_eq!(editor.text(), "a1\nb2");
}

#[test]
fn test_paste_full_text_when_counts_differ() {
    let mut editor = Editor::with_text("a\nb");
    editor.set_cursor_position(0, 1);
    editor.add_cursor(1, 1);
    editor.paste("xyz");
    assert_eq!(editor.text(), "axyz\nbxyz");
}

#[test]
fn test_copy_selection_and_current_line() {
    let mut editor = Editor::with_text("alpha\nbeta");
    editor.select_region(0, 0, 0, 5);
    assert_eq!(editor.copy(), "alpha");

    editor.clear_selections();
    editor.set_cursor_position(1, 0);
    assert_eq!(editor.copy(), "beta");
}

#[test]
fn test_copy_joins_multiple_selections() {
    let mut editor = Editor::with_text("one two");
    editor.select_region(0, 0, 0, 3);
    editor.add_cursor(0, 4);
    editor.select_word_under_cursor();
    assert_eq!(editor.copy(), "one\ntwo");
}

#[test]
fn test_cut_removes_selection() {
    let mut editor = Editor::with_text("hello world");
    editor.select_region(0, 5, 0, 11);
    let cut = editor.cut();
    assert_eq!(cut.as_deref(), Some(" world"));
    assert_eq!(editor.text(), "hello");
    assert!(editor.can_undo());
}

#[test]
fn test_cut_without_selection_is_a_no_op() {
    let mut editor = Editor::with_text("hello");
    assert_eq!(editor.cut(), None);
    assert_eq!(editor.text(), "hello");
}

#[test]
fn test_read_only_rejects_mutation() {
    let mut editor = Editor::with_text("abc");
    editor.set_read_only(true);

    editor.enter_character('x', false);
    editor.backspace(false);
    editor.delete_forward(false);
    editor.paste("zzz");
    editor.change_line_indentation(true);
    editor.move_lines_down();
    editor.remove_current_lines();
    assert_eq!(editor.text(), "abc");
    assert!(!editor.can_undo());

    // Cut on a read-only buffer degrades to a copy.
    editor.select_region(0, 0, 0, 3);
    assert_eq!(editor.cut().as_deref(), Some("abc"));
    assert_eq!(editor.text(), "abc");
}

#[test]
fn test_word_movement() {
    let mut editor = Editor::with_text("foo bar baz");
    editor.set_cursor_position(0, 0);
    editor.move_right(false, true);
    assert_eq!(editor.cursor_position(), Coordinate::new(0, 3));
    editor.move_right(false, true);
    assert_eq!(editor.cursor_position(), Coordinate::new(0, 4));
    editor.move_right(false, true);
    assert_eq!(editor.cursor_position(), Coordinate::new(0, 7));

    editor.move_left(false, true);
    assert_eq!(editor.cursor_position(), Coordinate::new(0, 4));
}

#[test]
fn test_vertical_movement_remembers_column() {
    let mut editor = Editor::with_text("abcdef\nxy\nlonger");
    editor.set_cursor_position(0, 5);
    editor.move_down(1, false);
    // The short line clamps the visible position...
    assert_eq!(editor.cursor_position(), Coordinate::new(1, 2));
    editor.move_down(1, false);
    // ...but the raw column survives onto the next long line.
    assert_eq!(editor.cursor_position(), Coordinate::new(2, 5));
}

#[test]
fn test_move_collapses_selection_to_edge() {
    let mut editor = Editor::with_text("abcdef");
    editor.select_region(0, 1, 0, 4);
    editor.move_right(false, false);
    assert_eq!(editor.cursor_position(), Coordinate::new(0, 4));
    assert!(!editor.any_cursor_has_selection());

    editor.select_region(0, 1, 0, 4);
    editor.move_left(false, false);
    assert_eq!(editor.cursor_position(), Coordinate::new(0, 1));
}

#[test]
fn test_select_all() {
    let mut editor = Editor::with_text("ab\ncd");
    editor.select_all();
    let cursor = *editor.cursors().get(0);
    assert_eq!(cursor.selection_start(), Coordinate::new(0, 0));
    assert_eq!(cursor.selection_end(), Coordinate::new(1, 2));
}

#[test]
fn test_deleting_everything_leaves_one_empty_line() {
    let mut editor = Editor::with_text("ab\ncd");
    editor.select_all();
    editor.backspace(false);
    assert_eq!(editor.text(), "");
    assert_eq!(editor.line_count(), 1);
    assert_eq!(editor.cursor_position(), Coordinate::new(0, 0));
}
