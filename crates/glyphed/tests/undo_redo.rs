use glyphed::{Coordinate, Editor};

#[test]
fn test_undo_restores_text_and_cursor() {
    let mut editor = Editor::with_text("abc");
    editor.set_cursor_position(0, 3);
    editor.enter_character('x', false);
    assert_eq!(editor.text(), "abcx");
    assert_eq!(editor.cursor_position(), Coordinate::new(0, 4));

    editor.undo(1);
    assert_eq!(editor.text(), "abc");
    assert_eq!(editor.cursor_position(), Coordinate::new(0, 3));
}

#[test]
fn test_undo_many_steps_restores_byte_identical_content_and_cursors() {
    let mut editor = Editor::with_text("fn main() {\n    let x = 1;\n}");
    editor.set_cursor_position(1, 4);
    let text_before = editor.text();
    let cursors_before = editor.cursors().clone();

    for ch in "let y".chars() {
        editor.enter_character(ch, false);
    }
    editor.enter_character('\n', false);
    editor.backspace(true);
    editor.select_region(0, 0, 0, 2);
    editor.delete_forward(false);
    editor.paste("fn");

    let steps = editor.undo_depth();
    editor.undo(steps);
    assert_eq!(editor.text(), text_before);
    assert_eq!(editor.cursors(), &cursors_before);
}

#[test]
fn test_undo_then_redo_is_identity_on_content() {
    let mut editor = Editor::with_text("one\ntwo");
    editor.set_cursor_position(0, 3);
    editor.enter_character('\n', false);
    editor.paste("three\nfour");
    editor.set_cursor_position(1, 0);
    editor.backspace(false);
    let final_text = editor.text();

    editor.undo(3);
    editor.redo(3);
    assert_eq!(editor.text(), final_text);
    assert!(!editor.can_redo());
}

#[test]
fn test_new_edit_truncates_redo_history() {
    let mut editor = Editor::with_text("");
    editor.enter_character('a', false);
    editor.enter_character('b', false);
    editor.undo(1);
    assert!(editor.can_redo());

    editor.enter_character('c', false);
    assert!(!editor.can_redo());
    assert_eq!(editor.text(), "ac");

    editor.redo(1);
    assert_eq!(editor.text(), "ac");
}

#[test]
fn test_undo_with_step_count() {
    let mut editor = Editor::with_text("");
    for ch in "abcde".chars() {
        editor.enter_character(ch, false);
    }
    assert_eq!(editor.undo_depth(), 5);

    editor.undo(3);
    assert_eq!(editor.text(), "ab");
    assert_eq!(editor.redo_depth(), 3);

    editor.redo(2);
    assert_eq!(editor.text(), "abcd");
}

#[test]
fn test_undo_restores_multi_cursor_edit() {
    let mut editor = Editor::with_text("one\ntwo\nthree");
    editor.set_cursor_position(0, 0);
    editor.add_cursor(1, 0);
    editor.add_cursor(2, 0);
    let cursors_before = editor.cursors().clone();

    editor.enter_character('X', false);
    assert_eq!(editor.text(), "Xone\nXtwo\nXthree");

    editor.undo(1);
    assert_eq!(editor.text(), "one\ntwo\nthree");
    assert_eq!(editor.cursors(), &cursors_before);

    editor.redo(1);
    assert_eq!(editor.text(), "Xone\nXtwo\nXthree");
    assert_eq!(editor.cursor_count(), 3);
}

#[test]
fn test_undo_restores_deleted_selection_across_lines() {
    let mut editor = Editor::with_text("alpha\nbeta\ngamma");
    editor.select_region(0, 2, 2, 3);
    editor.delete_forward(false);
    assert_eq!(editor.text(), "alma");

    editor.undo(1);
    assert_eq!(editor.text(), "alpha\nbeta\ngamma");

    editor.redo(1);
    assert_eq!(editor.text(), "alma");
}

#[test]
fn test_undo_steps_past_history_start_is_safe() {
    let mut editor = Editor::with_text("x");
    editor.enter_character('y', false);
    editor.undo(10);
    assert_eq!(editor.text(), "x");
    assert!(!editor.can_undo());
    editor.redo(10);
    assert_eq!(editor.text(), "xy");
}

#[test]
fn test_set_text_clears_history() {
    let mut editor = Editor::with_text("a");
    editor.enter_character('b', false);
    assert!(editor.can_undo());
    editor.set_text("fresh");
    assert!(!editor.can_undo());
    assert!(!editor.can_redo());
    assert_eq!(editor.text(), "fresh");
}

#[test]
fn test_undo_read_only_is_rejected() {
    let mut editor = Editor::with_text("");
    editor.enter_character('a', false);
    editor.set_read_only(true);
    editor.undo(1);
    assert_eq!(editor.text(), "a");
}
