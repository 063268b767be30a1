use super::*;

fn doc_with(text: &str) -> Document {
    let mut doc = Document::new();
    doc.buffer.load(&mut text.as_bytes()).unwrap();
    doc.sync_rows();
    doc
}

fn text(doc: &Document) -> String {
    String::from_utf8(doc.buffer.text()).unwrap()
}

/// The invariants that must hold after every edit, undo, redo, and resync
fn check_invariants(doc: &Document) {
    // Buffer length accounts for rows plus inter-row newlines
    let row_bytes: usize = doc.rows.iter().map(|r| r.size()).sum();
    assert_eq!(
        doc.buffer.len(),
        row_bytes + doc.rows.len() - 1,
        "buffer length vs rows"
    );

    // Row indices and highlight lengths
    for (i, row) in doc.rows.iter().enumerate() {
        assert_eq!(row.idx, i, "row idx");
        assert_eq!(row.hl.len(), row.render_size(), "hl length");
    }

    // Rows joined with newlines reproduce the buffer text
    assert_eq!(doc.contents(), doc.buffer.text(), "rows vs buffer");

    // Open-comment flags equal a scan from row zero
    let mut open = false;
    for row in &doc.rows {
        let (_, next) = crate::syntax::highlight_line(&row.render, doc.syntax, open);
        assert_eq!(row.hl_open_comment, next, "open comment row {}", row.idx);
        open = next;
    }

    // The cursor sits on a character boundary
    let row = &doc.rows[doc.cy];
    assert!(doc.cx <= row.size());
    if doc.cx < row.size() {
        assert_ne!(row.chars[doc.cx] & 0xC0, 0x80, "cx on boundary");
    }
}

#[test]
fn test_new_document_has_one_empty_row() {
    let doc = Document::new();
    assert_eq!(doc.num_rows(), 1);
    assert_eq!(doc.rows[0].size(), 0);
    assert!(!doc.modified);
    check_invariants(&doc);
}

#[test]
fn test_sync_rows_trailing_newline_yields_empty_row() {
    let doc = doc_with("A\nB\nC\n");
    assert_eq!(doc.num_rows(), 4);
    assert_eq!(doc.rows[2].chars, b"C");
    assert_eq!(doc.rows[3].size(), 0);
    check_invariants(&doc);
}

#[test]
fn test_insert_char_advances_cursor() {
    let mut doc = Document::new();
    for c in "hello".chars() {
        doc.insert_char(c).unwrap();
    }
    assert_eq!(text(&doc), "hello");
    assert_eq!((doc.cy, doc.cx), (0, 5));
    assert!(doc.modified);
    check_invariants(&doc);
}

#[test]
fn test_insert_multibyte_char_is_one_record() {
    let mut doc = Document::new();
    doc.insert_char('é').unwrap();
    assert_eq!(doc.cx, 2);
    assert!(doc.undo().unwrap());
    assert_eq!(text(&doc), "");
    check_invariants(&doc);
}

#[test]
fn test_utf8_cursor_steps_through_hello_with_accent() {
    // "héllo" = h, 0xC3 0xA9, l, l, o: five steps left reach column 0,
    // crossing the é as one logical character
    let mut doc = Document::new();
    for c in "héllo".chars() {
        doc.insert_char(c).unwrap();
    }
    assert_eq!(doc.cx, 6);
    let mut seen = Vec::new();
    while doc.cx > 0 {
        doc.cx = utf8::prev_boundary(&doc.rows[0].chars, doc.cx);
        seen.push(doc.cx);
    }
    assert_eq!(seen, vec![5, 4, 3, 1, 0]);
}

#[test]
fn test_insert_raw_byte_keeps_malformed_input() {
    // A byte that is not valid UTF-8 goes in verbatim
    let mut doc = Document::new();
    doc.insert_byte(0xFF).unwrap();
    assert_eq!(doc.buffer.text(), vec![0xFF]);
    assert_eq!(doc.cx, 1);
    check_invariants(&doc);

    assert!(doc.undo().unwrap());
    assert!(doc.buffer.is_empty());
}

#[test]
fn test_insert_newline_splits_row() {
    let mut doc = doc_with("hello");
    doc.cx = 2;
    doc.insert_newline().unwrap();
    assert_eq!(text(&doc), "he\nllo");
    assert_eq!((doc.cy, doc.cx), (1, 0));
    check_invariants(&doc);
}

#[test]
fn test_backspace_within_row() {
    let mut doc = doc_with("hello");
    doc.cx = 5;
    doc.delete_char().unwrap();
    assert_eq!(text(&doc), "hell");
    assert_eq!(doc.cx, 4);
    check_invariants(&doc);
}

#[test]
fn test_backspace_joins_rows() {
    // Scenario: "A\nB\nC\n", cursor (row 1, col 0), backspace
    let mut doc = doc_with("A\nB\nC\n");
    doc.cy = 1;
    doc.cx = 0;
    doc.delete_char().unwrap();
    assert_eq!(text(&doc), "AB\nC\n");
    assert_eq!((doc.cy, doc.cx), (0, 1));
    check_invariants(&doc);
}

#[test]
fn test_backspace_at_origin_is_noop() {
    let mut doc = doc_with("abc");
    doc.delete_char().unwrap();
    assert_eq!(text(&doc), "abc");
    assert!(!doc.modified);
}

#[test]
fn test_backspace_removes_whole_multibyte_char() {
    let mut doc = doc_with("a中b");
    doc.cx = 4; // after the 3-byte scalar
    doc.delete_char().unwrap();
    assert_eq!(text(&doc), "ab");
    assert_eq!(doc.cx, 1);
    check_invariants(&doc);
}

#[test]
fn test_delete_forward() {
    let mut doc = doc_with("abc");
    doc.cx = 1;
    doc.delete_forward().unwrap();
    assert_eq!(text(&doc), "ac");
    assert_eq!(doc.cx, 1);

    // At end of row, pulls the next line up
    let mut doc = doc_with("ab\ncd");
    doc.cx = 2;
    doc.delete_forward().unwrap();
    assert_eq!(text(&doc), "abcd");
    check_invariants(&doc);
}

#[test]
fn test_cut_line_removes_trailing_newline() {
    let mut doc = doc_with("one\ntwo\nthree");
    doc.cy = 1;
    let cut = doc.cut_line().unwrap();
    assert_eq!(cut, b"two");
    assert_eq!(text(&doc), "one\nthree");
    check_invariants(&doc);
}

#[test]
fn test_cut_last_line_keeps_row_count() {
    let mut doc = doc_with("one\ntwo");
    doc.cy = 1;
    let cut = doc.cut_line().unwrap();
    assert_eq!(cut, b"two");
    assert_eq!(text(&doc), "one\n");
    assert_eq!(doc.num_rows(), 2);
    check_invariants(&doc);
}

#[test]
fn test_paste_single_line() {
    let mut doc = doc_with("ad");
    doc.cx = 1;
    doc.paste(b"bc").unwrap();
    assert_eq!(text(&doc), "abcd");
    assert_eq!(doc.cx, 3);
    check_invariants(&doc);
}

#[test]
fn test_paste_multiline_creates_rows() {
    let mut doc = doc_with("ab");
    doc.cx = 1;
    doc.paste(b"1\n2").unwrap();
    assert_eq!(text(&doc), "a1\n2b");
    assert_eq!((doc.cy, doc.cx), (1, 1));
    assert_eq!(doc.num_rows(), 2);
    check_invariants(&doc);
}

#[test]
fn test_kill_to_eol_cuts_tail() {
    let mut doc = doc_with("hello world");
    doc.cx = 5;
    let cut = doc.kill_to_eol().unwrap();
    assert_eq!(cut.as_deref(), Some(b" world".as_slice()));
    assert_eq!(text(&doc), "hello");
    check_invariants(&doc);
}

#[test]
fn test_kill_to_eol_at_line_end_joins() {
    let mut doc = doc_with("ab\ncd");
    doc.cx = 2;
    let cut = doc.kill_to_eol().unwrap();
    assert_eq!(cut, None);
    assert_eq!(text(&doc), "abcd");
    check_invariants(&doc);
}

#[test]
fn test_duplicate_line() {
    let mut doc = doc_with("one\ntwo");
    let before = doc.cx;
    doc.duplicate_line().unwrap();
    assert_eq!(text(&doc), "one\none\ntwo");
    assert_eq!((doc.cy, doc.cx), (1, before));
    check_invariants(&doc);

    assert!(doc.undo().unwrap());
    assert_eq!(text(&doc), "one\ntwo");
}

#[test]
fn test_delete_range_spanning_rows() {
    let mut doc = doc_with("one\ntwo\nthree");
    let start = doc.offset_of(0, 2);
    let end = doc.offset_of(2, 1);
    let removed = doc.delete_range(start, end).unwrap();
    assert_eq!(removed, b"e\ntwo\nt");
    assert_eq!(text(&doc), "onhree");
    check_invariants(&doc);

    assert!(doc.undo().unwrap());
    assert_eq!(text(&doc), "one\ntwo\nthree");
    check_invariants(&doc);
}

#[test]
fn test_dedent_line_with_spaces_and_tabs() {
    let mut doc = doc_with("        x");
    doc.cx = 8;
    doc.dedent_line().unwrap();
    assert_eq!(text(&doc), "    x");
    assert_eq!(doc.cx, 4);

    let mut doc = doc_with("\t\tx");
    doc.cx = 2;
    doc.dedent_line().unwrap();
    assert_eq!(text(&doc), "\tx");
    assert_eq!(doc.cx, 1);

    // No dedent when non-whitespace precedes the cursor
    let mut doc = doc_with("a   ");
    doc.cx = 4;
    doc.dedent_line().unwrap();
    assert_eq!(text(&doc), "a   ");
}

#[test]
fn test_undo_redo_round_trip() {
    let mut doc = doc_with("base");
    doc.cx = 4;
    for c in "line".chars() {
        doc.insert_char(c).unwrap();
    }
    let after = text(&doc);

    assert!(doc.undo().unwrap());
    assert!(doc.redo().unwrap());
    assert_eq!(text(&doc), after);
    check_invariants(&doc);
}

#[test]
fn test_undo_clears_modified_at_history_floor() {
    let mut doc = Document::new();
    doc.insert_char('x').unwrap();
    assert!(doc.modified);
    assert!(doc.undo().unwrap());
    assert!(!doc.modified);
    assert!(!doc.undo().unwrap(), "boundary reports false");
}

#[test]
fn test_multiline_comment_propagates_across_rows() {
    let mut doc = doc_with("int a;\nint b;\nint c;");
    doc.file_name = Some("t.c".to_string());
    doc.syntax = crate::syntax::detect("t.c");
    doc.rehighlight_all();

    // Type "/*" at the start of row 0
    doc.cy = 0;
    doc.cx = 0;
    doc.insert_char('/').unwrap();
    doc.insert_char('*').unwrap();

    for i in 0..3 {
        assert!(
            doc.rows[i]
                .hl
                .iter()
                .all(|&h| h == crate::syntax::Highlight::MlComment),
            "row {i} commented"
        );
    }
    check_invariants(&doc);

    // Close it on row 2; rows below the close revert
    doc.cy = 2;
    doc.cx = 0;
    doc.insert_char('*').unwrap();
    doc.insert_char('/').unwrap();
    assert!(!doc.rows[2].hl_open_comment);
    assert_eq!(
        doc.rows[2].hl[2],
        crate::syntax::Highlight::Keyword2,
        "int after close"
    );

    // Deleting the '*' of the opener restores rows 1 and 2
    doc.cy = 0;
    doc.cx = 2;
    doc.delete_char().unwrap();
    assert!(!doc.rows[0].hl_open_comment);
    assert_eq!(doc.rows[1].hl[0], crate::syntax::Highlight::Keyword2);
    check_invariants(&doc);
}

#[test]
fn test_offset_round_trip() {
    let doc = doc_with("ab\ncde\n\nf");
    for cy in 0..doc.num_rows() {
        for cx in 0..=doc.rows[cy].size() {
            let off = doc.offset_of(cy, cx);
            assert_eq!(doc.offset_to_position(off), (cy, cx), "({cy},{cx})");
        }
    }
}

#[test]
fn test_save_and_reload_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let path_str = path.to_str().unwrap().to_string();

    let mut doc = doc_with("alpha\nbeta\n");
    doc.file_name = Some(path_str.clone());
    doc.modified = true;
    let written = doc.save().unwrap();
    assert_eq!(written, 11);
    assert!(!doc.modified);

    let mut reloaded = Document::new();
    reloaded.open(&path_str).unwrap();
    assert_eq!(text(&reloaded), "alpha\nbeta\n");
    check_invariants(&reloaded);
}

#[test]
fn test_open_trims_crlf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dos.txt");
    std::fs::write(&path, b"one\r\ntwo\r\n").unwrap();

    let mut doc = Document::new();
    doc.open(path.to_str().unwrap()).unwrap();
    assert_eq!(text(&doc), "one\ntwo\n");
}

#[test]
fn test_open_detects_syntax_and_clears_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prog.c");
    std::fs::write(&path, "int main() {}\n").unwrap();

    let mut doc = Document::new();
    doc.insert_char('x').unwrap();
    doc.open(path.to_str().unwrap()).unwrap();
    assert_eq!(doc.syntax.unwrap().name, "c");
    assert!(!doc.history.can_undo());
    assert!(!doc.modified);
}

#[test]
fn test_goto_line_clamps() {
    let mut doc = doc_with("a\nb\nc");
    doc.goto_line(2);
    assert_eq!(doc.cy, 1);
    doc.goto_line(999);
    assert_eq!(doc.cy, 2);
    doc.goto_line(0);
    assert_eq!(doc.cy, 0);
}

#[test]
fn test_select_cut_paste_scenario() {
    // Cut lines 2-4 of a 6-line file, paste at end of the final line
    let mut doc = doc_with("l1\nl2\nl3\nl4\nl5\nl6");
    let start = doc.offset_of(1, 0);
    let end = doc.offset_of(4, 0);
    let cut = doc.delete_range(start, end).unwrap();
    assert_eq!(cut, b"l2\nl3\nl4\n");
    assert_eq!(text(&doc), "l1\nl5\nl6");

    doc.cy = doc.num_rows() - 1;
    doc.cx = doc.rows[doc.cy].size();
    doc.paste(&cut).unwrap();
    assert_eq!(text(&doc), "l1\nl5\nl6l2\nl3\nl4\n");
    assert_eq!(doc.num_rows(), 6);
    check_invariants(&doc);
}
