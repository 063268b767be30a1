//! Rendering pipeline
//!
//! Each tick composes the whole frame into one byte buffer and the editor
//! writes it with a single backend call. Composition is a pure function of
//! the passed-in state: rendering reads editor state and buffer contents
//! only, never mutates them, so two renders of the same state produce
//! identical byte streams.

use crate::constants::text::TAB_STOP;
use crate::document::Document;
use crate::explorer::Browser;
use crate::mode::Mode;
use crate::selection::Selection;
use crate::syntax::Highlight;
use crate::utf8;

/// Everything the renderer needs for one frame
pub struct RenderState<'a> {
    pub doc: &'a Document,
    pub mode: Mode,
    pub selection: &'a Selection,
    pub browser: Option<&'a Browser>,
    /// Line shown in the message bar (status message or active prompt)
    pub message: &'a str,
    /// Extra right-hand status field (e.g. the search match counter)
    pub status_extra: &'a str,
    pub screen_rows: usize,
    pub screen_cols: usize,
    pub show_line_numbers: bool,
    /// Emit a clear-screen before composing (after layout changes)
    pub full_clear: bool,
}

/// Text styling for one cell run
#[derive(Clone, Copy, PartialEq, Eq)]
enum Style {
    Color(u8),
    Inverse,
}

impl Style {
    fn emit(self, frame: &mut Vec<u8>) {
        match self {
            Style::Color(n) => frame.extend_from_slice(format!("\x1b[m\x1b[{n}m").as_bytes()),
            Style::Inverse => frame.extend_from_slice(b"\x1b[m\x1b[7m"),
        }
    }
}

/// Width of the line number gutter, including its trailing padding
pub fn gutter_width(state: &RenderState) -> usize {
    if !state.show_line_numbers || matches!(state.mode, Mode::Browser | Mode::Help) {
        return 0;
    }
    let mut digits = 1;
    let mut n = state.doc.num_rows();
    while n >= 10 {
        digits += 1;
        n /= 10;
    }
    digits + 2
}

/// Rows available for text content (status and message bars take two)
pub fn text_rows(state: &RenderState) -> usize {
    state.screen_rows.saturating_sub(2)
}

/// Compose one frame
pub fn render_frame(state: &RenderState) -> Vec<u8> {
    let mut frame = Vec::with_capacity(state.screen_rows * state.screen_cols);
    frame.extend_from_slice(b"\x1b[?25l");
    if state.full_clear {
        frame.extend_from_slice(b"\x1b[2J");
    }
    frame.extend_from_slice(b"\x1b[H");

    match state.mode {
        Mode::Browser => draw_browser(state, &mut frame),
        Mode::Help => draw_help(state, &mut frame),
        _ => draw_text_rows(state, &mut frame),
    }

    draw_status_bar(state, &mut frame);
    draw_message_bar(state, &mut frame);

    let (row, col) = cursor_position(state);
    frame.extend_from_slice(format!("\x1b[{};{}H", row + 1, col + 1).as_bytes());
    frame.extend_from_slice(b"\x1b[?25h");
    frame
}

/// Screen position (0-based) for the terminal cursor
pub fn cursor_position(state: &RenderState) -> (usize, usize) {
    match state.mode {
        Mode::Browser => {
            let row = state
                .browser
                .map(|b| b.selected.saturating_sub(b.scroll))
                .unwrap_or(0);
            (row.min(text_rows(state).saturating_sub(1)), 0)
        }
        Mode::Help => (0, 0),
        Mode::Prompt | Mode::Confirm => {
            // Cursor sits at the end of the prompt text in the message bar
            let col = state.message.len().min(state.screen_cols.saturating_sub(1));
            (state.screen_rows.saturating_sub(1), col)
        }
        _ => {
            let doc = state.doc;
            let row = doc.cy.saturating_sub(doc.row_offset);
            let rx = doc.rows[doc.cy].cx_to_rx(doc.cx);
            let col = rx.saturating_sub(doc.col_offset) + gutter_width(state);
            (
                row.min(text_rows(state).saturating_sub(1)),
                col.min(state.screen_cols.saturating_sub(1)),
            )
        }
    }
}

fn draw_text_rows(state: &RenderState, frame: &mut Vec<u8>) {
    let gutter = gutter_width(state);
    let width = state.screen_cols.saturating_sub(gutter);
    for i in 0..text_rows(state) {
        let file_row = state.doc.row_offset + i;
        if file_row < state.doc.num_rows() {
            if gutter > 0 {
                frame.extend_from_slice(
                    format!("\x1b[90m{:>w$} \x1b[m", file_row + 1, w = gutter - 2).as_bytes(),
                );
            }
            draw_row(state, file_row, width, frame);
        } else {
            frame.push(b'~');
        }
        frame.extend_from_slice(b"\x1b[K\r\n");
    }
}

/// Draw one row's visible slice with highlight runs, the selection and
/// match overlays, and control-byte display.
fn draw_row(state: &RenderState, file_row: usize, width: usize, frame: &mut Vec<u8>) {
    let doc = state.doc;
    let row = &doc.rows[file_row];
    let left = doc.col_offset;
    let right = left + width;

    let mut style: Option<Style> = None;
    let mut ci = 0; // byte offset in chars
    let mut ri = 0; // byte offset in render
    let mut col = 0; // display column

    while ci < row.chars.len() && col < right {
        let b = row.chars[ci];
        let next_ci = utf8::next_boundary(&row.chars, ci);

        // Render-byte span and display width of this character
        let (r_len, w) = if b == b'\t' {
            let span = TAB_STOP - ri % TAB_STOP;
            (span, span)
        } else if b == 0x7F {
            (1, 1) // shown as ?
        } else if b < 0x20 {
            (1, 2) // shown as ^X
        } else {
            (next_ci - ci, utf8::char_width(&row.chars[ci..next_ci]))
        };

        if col + w <= left {
            ci = next_ci;
            ri += r_len;
            col += w;
            continue;
        }

        let selected = state.mode == Mode::Select && state.selection.contains(ci, file_row);
        let hl = row.hl.get(ri).copied().unwrap_or(Highlight::Normal);

        if (b < 0x20 && b != b'\t') || b == 0x7F {
            // Control bytes render in inverse video regardless of class
            frame.extend_from_slice(b"\x1b[m\x1b[7m");
            if b == 0x7F {
                frame.push(b'?');
            } else {
                frame.push(b'^');
                frame.push(b'@' + b);
            }
            frame.extend_from_slice(b"\x1b[m");
            style = None;
        } else {
            let wanted = if selected || hl == Highlight::Match {
                Style::Inverse
            } else {
                Style::Color(hl.color())
            };
            // Match keeps its background colour as well as the inversion
            if style != Some(wanted) {
                wanted.emit(frame);
                if hl == Highlight::Match {
                    frame.extend_from_slice(format!("\x1b[{}m", hl.color()).as_bytes());
                }
                style = Some(wanted);
            }
            if col < left {
                // A wide character straddles the left edge; pad its
                // visible remainder with spaces
                for _ in left..col + w {
                    frame.push(b' ');
                }
            } else if col + w > right {
                for _ in col..right {
                    frame.push(b' ');
                }
            } else {
                frame.extend_from_slice(&row.render[ri..ri + r_len]);
            }
        }

        ci = next_ci;
        ri += r_len;
        col += w;
    }
    frame.extend_from_slice(b"\x1b[m");
}

fn draw_browser(state: &RenderState, frame: &mut Vec<u8>) {
    let rows = text_rows(state);
    let Some(browser) = state.browser else {
        for _ in 0..rows {
            frame.extend_from_slice(b"\x1b[K\r\n");
        }
        return;
    };
    for i in 0..rows {
        if i == 0 {
            let header = truncated(&format!(" {}", browser.dir.display()), state.screen_cols);
            frame.extend_from_slice(b"\x1b[90m");
            frame.extend_from_slice(header.as_bytes());
            frame.extend_from_slice(b"\x1b[m");
        } else {
            let idx = browser.scroll + i - 1;
            if let Some(entry) = browser.entries.get(idx) {
                let marker = if entry.is_dir { "/" } else { "" };
                let line = format!(" {}{}", entry.name, marker);
                if idx == browser.selected {
                    frame.extend_from_slice(b"\x1b[7m");
                    frame.extend_from_slice(truncated(&line, state.screen_cols).as_bytes());
                    frame.extend_from_slice(b"\x1b[m");
                } else {
                    frame.extend_from_slice(truncated(&line, state.screen_cols).as_bytes());
                }
            }
        }
        frame.extend_from_slice(b"\x1b[K\r\n");
    }
}

const HELP_LINES: &[&str] = &[
    "",
    "  Ctrl-Q  quit            Ctrl-S  save",
    "  Ctrl-F  find            Ctrl-O  file browser",
    "  Ctrl-X  mark            Ctrl-C  copy",
    "  Ctrl-K  cut to EOL      Ctrl-V  paste",
    "  Ctrl-Z  undo            Ctrl-R  redo",
    "  Ctrl-N  line numbers    Ctrl-G  goto line",
    "  Ctrl-D  duplicate line  Ctrl-?  this help",
    "",
    "  press any key to continue",
];

fn draw_help(state: &RenderState, frame: &mut Vec<u8>) {
    for i in 0..text_rows(state) {
        if let Some(line) = HELP_LINES.get(i) {
            frame.extend_from_slice(truncated(line, state.screen_cols).as_bytes());
        }
        frame.extend_from_slice(b"\x1b[K\r\n");
    }
}

fn draw_status_bar(state: &RenderState, frame: &mut Vec<u8>) {
    let doc = state.doc;
    let modified = if doc.modified { " [+]" } else { "" };
    let left = format!(" {} | {}{}", state.mode.tag(), doc.display_name(), modified);
    let right = if state.status_extra.is_empty() {
        format!("{}/{}:{} ", doc.cy + 1, doc.num_rows(), doc.cx + 1)
    } else {
        format!(
            "{} | {}/{}:{} ",
            state.status_extra,
            doc.cy + 1,
            doc.num_rows(),
            doc.cx + 1
        )
    };

    let mut bar = truncated(&left, state.screen_cols);
    let used = bar.chars().count();
    let avail = state.screen_cols - used;
    let right = truncated(&right, avail);
    for _ in 0..avail - right.chars().count() {
        bar.push(' ');
    }
    bar.push_str(&right);

    frame.extend_from_slice(b"\x1b[7m");
    frame.extend_from_slice(bar.as_bytes());
    frame.extend_from_slice(b"\x1b[m\r\n");
}

fn draw_message_bar(state: &RenderState, frame: &mut Vec<u8>) {
    frame.extend_from_slice(truncated(state.message, state.screen_cols).as_bytes());
    frame.extend_from_slice(b"\x1b[K");
}

fn truncated(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
