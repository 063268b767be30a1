//! Per-line display row
//!
//! A `Row` is the derived view of one logical line: the raw bytes, the
//! rendered bytes (tabs expanded), and one highlight class per rendered
//! byte. Rows are rebuilt from the gap buffer deterministically, so the
//! row cache can always be thrown away and resynced.

use crate::constants::text::TAB_STOP;
use crate::syntax::{self, Highlight, Syntax};
use crate::utf8;

pub struct Row {
    /// Position of this row in the row cache; must equal its index
    pub idx: usize,
    /// Raw line bytes, no trailing newline
    pub chars: Vec<u8>,
    /// Display bytes: tabs expanded to the next multiple of `TAB_STOP`,
    /// UTF-8 passed through unchanged
    pub render: Vec<u8>,
    /// One highlight class per rendered byte
    pub hl: Vec<Highlight>,
    /// True iff a multi-line comment is still open at the end of this row
    pub hl_open_comment: bool,
}

impl Row {
    pub fn new(idx: usize, chars: Vec<u8>) -> Self {
        Self {
            idx,
            chars,
            render: Vec::new(),
            hl: Vec::new(),
            hl_open_comment: false,
        }
    }

    /// Length of the raw line in bytes
    pub fn size(&self) -> usize {
        self.chars.len()
    }

    pub fn render_size(&self) -> usize {
        self.render.len()
    }

    /// Rebuild `render` and `hl` from `chars`.
    ///
    /// `in_comment` is the open-comment state of the previous row. Returns
    /// true when this row's own open-comment flag changed, which tells the
    /// caller to keep propagating to the next row.
    pub fn update(&mut self, syntax: Option<&Syntax>, in_comment: bool) -> bool {
        let tabs = self.chars.iter().filter(|&&b| b == b'\t').count();
        let mut render = Vec::with_capacity(self.chars.len() + tabs * (TAB_STOP - 1));
        for &b in &self.chars {
            if b == b'\t' {
                render.push(b' ');
                while render.len() % TAB_STOP != 0 {
                    render.push(b' ');
                }
            } else {
                render.push(b);
            }
        }
        self.render = render;

        let (hl, open) = syntax::highlight_line(&self.render, syntax, in_comment);
        self.hl = hl;
        let changed = open != self.hl_open_comment;
        self.hl_open_comment = open;
        changed
    }

    /// Convert a byte offset in `chars` to a display column.
    ///
    /// Tabs jump to the next tab stop; wide characters count two cells,
    /// combining marks and control bytes count zero.
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        let mut rx = 0;
        let mut i = 0;
        while i < cx && i < self.chars.len() {
            if self.chars[i] == b'\t' {
                rx = (rx / TAB_STOP + 1) * TAB_STOP;
                i += 1;
            } else {
                let next = utf8::next_boundary(&self.chars, i);
                rx += utf8::char_width(&self.chars[i..next]);
                i = next;
            }
        }
        rx
    }

    /// Convert a display column back to a byte offset in `chars`
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur = 0;
        let mut i = 0;
        while i < self.chars.len() {
            let w = if self.chars[i] == b'\t' {
                (cur / TAB_STOP + 1) * TAB_STOP - cur
            } else {
                utf8::char_width(&self.chars[i..utf8::next_boundary(&self.chars, i)])
            };
            if cur + w > rx {
                return i;
            }
            cur += w;
            i = utf8::next_boundary(&self.chars, i);
        }
        self.chars.len()
    }

    /// Map a byte offset in `render` (as produced by a substring search)
    /// back to the byte offset in `chars` of the character covering it.
    pub fn render_offset_to_cx(&self, r_off: usize) -> usize {
        let mut ri = 0;
        let mut ci = 0;
        while ci < self.chars.len() {
            let step = if self.chars[ci] == b'\t' {
                ri / TAB_STOP * TAB_STOP + TAB_STOP - ri
            } else {
                utf8::next_boundary(&self.chars, ci) - ci
            };
            if ri + step > r_off {
                return ci;
            }
            ri += step;
            ci = utf8::next_boundary(&self.chars, ci);
        }
        self.chars.len()
    }

    /// Byte offsets in `chars` of the leading whitespace run
    pub fn indent_len(&self) -> usize {
        self.chars
            .iter()
            .take_while(|&&b| b == b' ' || b == b'\t')
            .count()
    }
}
