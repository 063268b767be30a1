//! Incremental search
//!
//! Search runs over the rendered bytes of each row so matches line up with
//! what is on screen. The current hit gets a transient `MATCH` overlay; the
//! overwritten highlight bytes are saved and restored before every step,
//! so the overlay never leaks into the row cache.

use crate::document::Document;
use crate::key::Key;
use crate::syntax::Highlight;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Forward,
    Backward,
}

/// How the caller should proceed after feeding a key to the search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Still searching
    Pending,
    /// Enter: keep the cursor on the hit
    Accepted,
    /// Esc: cursor and scroll restored to the pre-search state
    Cancelled,
}

pub struct Search {
    pub query: String,
    /// Row index of the current hit
    pub last_match: Option<usize>,
    pub direction: SearchDirection,
    /// Total hits across all rows, for the status counter
    pub total_matches: usize,
    /// Highlight bytes overwritten by the MATCH overlay
    saved_hl: Option<(usize, Vec<Highlight>)>,
    /// (cx, cy, col_offset, row_offset) at search entry
    saved_cursor: (usize, usize, usize, usize),
}

impl Search {
    /// Begin a search, remembering where the cursor was
    pub fn new(doc: &Document) -> Self {
        Self {
            query: String::new(),
            last_match: None,
            direction: SearchDirection::Forward,
            total_matches: 0,
            saved_hl: None,
            saved_cursor: (doc.cx, doc.cy, doc.col_offset, doc.row_offset),
        }
    }

    /// Feed one key to the incremental search
    pub fn incremental(&mut self, doc: &mut Document, key: Key) -> SearchOutcome {
        match key {
            Key::Enter => {
                self.restore_highlight(doc);
                SearchOutcome::Accepted
            }
            Key::Escape => {
                self.restore_highlight(doc);
                let (cx, cy, col_offset, row_offset) = self.saved_cursor;
                doc.cx = cx;
                doc.cy = cy;
                doc.col_offset = col_offset;
                doc.row_offset = row_offset;
                SearchOutcome::Cancelled
            }
            Key::ArrowRight | Key::ArrowDown => {
                if self.last_match.is_some() {
                    self.direction = SearchDirection::Forward;
                }
                self.step(doc);
                SearchOutcome::Pending
            }
            Key::ArrowLeft | Key::ArrowUp => {
                if self.last_match.is_some() {
                    self.direction = SearchDirection::Backward;
                }
                self.step(doc);
                SearchOutcome::Pending
            }
            Key::Backspace => {
                self.query.pop();
                self.reset_for_new_query(doc);
                self.step(doc);
                SearchOutcome::Pending
            }
            Key::Char(c) => {
                self.query.push(c);
                self.reset_for_new_query(doc);
                self.step(doc);
                SearchOutcome::Pending
            }
            _ => SearchOutcome::Pending,
        }
    }

    /// A query edit resets the direction to forward and recounts hits
    fn reset_for_new_query(&mut self, doc: &mut Document) {
        self.direction = SearchDirection::Forward;
        self.last_match = None;
        self.total_matches = count_matches(doc, self.query.as_bytes());
    }

    /// Undo the MATCH overlay on the previously hit row
    pub fn restore_highlight(&mut self, doc: &mut Document) {
        if let Some((row, hl)) = self.saved_hl.take() {
            if row < doc.rows.len() && doc.rows[row].hl.len() == hl.len() {
                doc.rows[row].hl = hl;
            }
        }
    }

    /// Advance to the next hit with wrap-around and overlay it.
    ///
    /// The scan starts one row past the last hit in the current direction,
    /// so repeated steps cycle through all matching rows.
    pub fn step(&mut self, doc: &mut Document) {
        self.restore_highlight(doc);
        if self.query.is_empty() {
            return;
        }
        let query = self.query.as_bytes();
        let num_rows = doc.num_rows() as isize;
        let delta: isize = match self.direction {
            SearchDirection::Forward => 1,
            SearchDirection::Backward => -1,
        };
        let mut current = self.last_match.map_or(-1, |m| m as isize);

        for _ in 0..doc.num_rows() {
            current += delta;
            if current == -1 {
                current = num_rows - 1;
            } else if current == num_rows {
                current = 0;
            }

            let idx = current as usize;
            let Some(pos) = find(&doc.rows[idx].render, query) else {
                continue;
            };

            self.last_match = Some(idx);
            doc.cy = idx;
            doc.cx = doc.rows[idx].render_offset_to_cx(pos);
            // Force the next scroll pass to bring the hit into view
            doc.row_offset = doc.num_rows();

            self.saved_hl = Some((idx, doc.rows[idx].hl.clone()));
            for h in &mut doc.rows[idx].hl[pos..pos + query.len()] {
                *h = Highlight::Match;
            }
            return;
        }
    }
}

/// First occurrence of `needle` in `haystack`
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Non-overlapping occurrences of `needle` across all rendered rows
fn count_matches(doc: &Document, needle: &[u8]) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let mut total = 0;
    for row in &doc.rows {
        let mut at = 0;
        while let Some(pos) = find(&row.render[at..], needle) {
            total += 1;
            at += pos + needle.len();
        }
    }
    total
}
