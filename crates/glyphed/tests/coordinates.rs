use glyphed::{Buffer, Coordinate, Editor};

#[test]
fn test_column_char_index_round_trip() {
    let buffer = Buffer::from_text("a\tb汉c\n\tx y");
    for line in 0..buffer.line_count() {
        for index in 0..=buffer.line(line).len() {
            let column = buffer.column_at(line, index);
            let coords = buffer.sanitize(Coordinate::new(line, column));
            assert_eq!(
                buffer.char_index_right(coords),
                index,
                "line {line}, index {index}"
            );
            assert_eq!(coords.column, column);
        }
    }
}

#[test]
fn test_sanitize_round_trips_to_itself() {
    let buffer = Buffer::from_text("ab\tcd\nef");
    for line in 0..buffer.line_count() {
        for column in 0..=buffer.line_max_column(line) + 2 {
            let sanitized = buffer.sanitize(Coordinate::new(line, column));
            assert_eq!(buffer.sanitize(sanitized), sanitized);
        }
    }
}

#[test]
fn test_sanitize_inside_tab_yields_tab_edge() {
    let buffer = Buffer::from_text("x\tend");
    // 'x' at column 0, tab spans 1..4.
    for column in 2..4 {
        let snapped = buffer.sanitize(Coordinate::new(0, column)).column;
        assert!(
            snapped == 1 || snapped == 4,
            "column {column} snapped to {snapped}"
        );
    }
}

#[test]
fn test_sanitize_clamps_out_of_bounds() {
    let buffer = Buffer::from_text("ab\ncd");
    assert_eq!(
        buffer.sanitize(Coordinate::new(9, 9)),
        Coordinate::new(1, 2)
    );
    assert_eq!(
        buffer.sanitize(Coordinate::new(0, 99)),
        Coordinate::new(0, 2)
    );
}

#[test]
fn test_advance_never_lands_inside_a_glyph() {
    let buffer = Buffer::from_text("a\t汉b");
    let mut coords = Coordinate::new(0, 0);
    let mut visited = vec![coords];
    loop {
        coords = buffer.advance(coords);
        if coords.line >= buffer.line_count() {
            break;
        }
        assert_eq!(buffer.sanitize(coords), coords);
        visited.push(coords);
    }
    // One stop per glyph boundary: 4 glyphs -> 5 boundaries minus the final
    // sentinel the loop breaks on.
    assert_eq!(visited.len(), 5);
}

#[test]
fn test_tab_size_change_shifts_columns() {
    let mut buffer = Buffer::from_text("\ta");
    assert_eq!(buffer.line_max_column(0), 5);
    buffer.set_tab_size(2);
    assert_eq!(buffer.line_max_column(0), 3);
    // Clamped into 1..=8.
    buffer.set_tab_size(99);
    assert_eq!(buffer.tab_size(), 8);
    buffer.set_tab_size(0);
    assert_eq!(buffer.tab_size(), 1);
}

#[test]
fn test_word_queries() {
    let editor = Editor::with_text("let alpha_2 = beta;");
    assert_eq!(editor.word_at(Coordinate::new(0, 5)), "alpha_2");
    assert_eq!(editor.word_at(Coordinate::new(0, 12)), "");
    assert_eq!(editor.word_at(Coordinate::new(0, 14)), "beta");
}

#[test]
fn test_matching_bracket() {
    let editor = Editor::with_text("fn f(a: (u8, i8)) {\n    (a)\n}");
    // Opening paren at (0, 4) matches the closing one at (0, 16).
    assert_eq!(
        editor.matching_bracket(0, 4),
        Some(Coordinate::new(0, 16))
    );
    // Brace spans lines.
    assert_eq!(
        editor.matching_bracket(0, 18),
        Some(Coordinate::new(2, 0))
    );
    // Non-bracket glyph.
    assert_eq!(editor.matching_bracket(0, 0), None);
}
