//! Document core
//!
//! Owns the dual text model: the gap buffer is the authoritative text and
//! the row cache is a derived view whose invariant is "equals a full
//! resync from the buffer". Every edit goes through the gap buffer, pushes
//! exactly one undo record, and then patches or resyncs the rows.

use crate::buffer::GapBuffer;
use crate::constants::text::{GROW_CHUNK, TAB_STOP};
use crate::constants::ui::NO_NAME;
use crate::error::{Error, ErrorKind, Result};
use crate::history::{EditKind, History};
use crate::row::Row;
use crate::syntax::{self, Syntax};
use crate::utf8;
use std::io::Write;

pub struct Document {
    pub buffer: GapBuffer,
    pub rows: Vec<Row>,
    /// Cursor position: byte offset within `rows[cy].chars`, row index
    pub cx: usize,
    pub cy: usize,
    /// Viewport offsets: first visible row, first visible display column
    pub row_offset: usize,
    pub col_offset: usize,
    pub modified: bool,
    pub file_name: Option<String>,
    pub syntax: Option<&'static Syntax>,
    pub history: History,
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            buffer: GapBuffer::new(GROW_CHUNK),
            rows: Vec::new(),
            cx: 0,
            cy: 0,
            row_offset: 0,
            col_offset: 0,
            modified: false,
            file_name: None,
            syntax: None,
            history: History::new(),
        };
        doc.sync_rows();
        doc
    }

    /// Replace the document contents with a file.
    ///
    /// Clears rows, buffer, and history before repopulating. `\r\n` line
    /// endings are accepted on load; the `\r` is trimmed.
    pub fn open(&mut self, path: &str) -> Result<()> {
        let raw = std::fs::read(path)?;
        let mut data = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'\r' && raw.get(i + 1) == Some(&b'\n') {
                i += 1;
                continue;
            }
            data.push(raw[i]);
            i += 1;
        }

        self.buffer.load(&mut data.as_slice())?;
        self.history.clear();
        self.file_name = Some(path.to_string());
        self.syntax = syntax::detect(path);
        self.cx = 0;
        self.cy = 0;
        self.row_offset = 0;
        self.col_offset = 0;
        self.sync_rows();
        self.modified = false;
        Ok(())
    }

    /// Serialize rows joined by `\n`. This equals the buffer's logical
    /// text, so files that end in a newline round-trip byte-for-byte.
    pub fn contents(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.buffer.len());
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                out.push(b'\n');
            }
            out.extend_from_slice(&row.chars);
        }
        out
    }

    /// Write the document to its file, truncating first.
    ///
    /// Returns the number of bytes written. The modified flag is cleared
    /// only on success.
    pub fn save(&mut self) -> Result<usize> {
        let name = self
            .file_name
            .clone()
            .ok_or_else(|| Error::new(ErrorKind::Io, "no file name"))?;
        let contents = self.contents();
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&name)?;
        file.write_all(&contents)?;
        self.modified = false;
        Ok(contents.len())
    }

    /// Rename the document and re-detect its syntax
    pub fn set_file_name(&mut self, name: String) {
        self.syntax = syntax::detect(&name);
        self.file_name = Some(name);
        self.rehighlight_all();
    }

    pub fn display_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(NO_NAME)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Byte offset in the buffer of position `(cy, cx)`
    pub fn offset_of(&self, cy: usize, cx: usize) -> usize {
        self.rows[..cy].iter().map(|r| r.size() + 1).sum::<usize>() + cx
    }

    /// Position `(cy, cx)` of a byte offset, clamped to the document end
    pub fn offset_to_position(&self, offset: usize) -> (usize, usize) {
        let mut acc = 0;
        for (i, row) in self.rows.iter().enumerate() {
            if offset <= acc + row.size() {
                return (i, offset - acc);
            }
            acc += row.size() + 1;
        }
        let last = self.rows.len() - 1;
        (last, self.rows[last].size())
    }

    /// Rebuild the whole row cache from the buffer.
    ///
    /// The decomposition is exactly `text.split('\n')`: a trailing newline
    /// yields a trailing empty row and the empty buffer yields one empty
    /// row. The cursor is preserved by clamping.
    pub fn sync_rows(&mut self) {
        let text = self.buffer.text();
        self.rows = text
            .split(|&b| b == b'\n')
            .enumerate()
            .map(|(i, line)| Row::new(i, line.to_vec()))
            .collect();
        self.rehighlight_all();
        self.clamp_cursor();
    }

    /// Re-run highlighting over every row, threading the open-comment flag
    pub fn rehighlight_all(&mut self) {
        for i in 0..self.rows.len() {
            let prev_open = i > 0 && self.rows[i - 1].hl_open_comment;
            self.rows[i].update(self.syntax, prev_open);
        }
    }

    /// Re-render and re-highlight one row, then propagate the open-comment
    /// flag forward, stopping at the first row whose flag is unchanged.
    pub fn refresh_row(&mut self, idx: usize) {
        let mut i = idx;
        loop {
            let prev_open = i > 0 && self.rows[i - 1].hl_open_comment;
            let changed = self.rows[i].update(self.syntax, prev_open);
            i += 1;
            if !changed || i >= self.rows.len() {
                break;
            }
        }
    }

    fn renumber_rows(&mut self, from: usize) {
        for i in from..self.rows.len() {
            self.rows[i].idx = i;
        }
    }

    /// Clamp the cursor into the row cache and snap `cx` onto a UTF-8
    /// character boundary.
    pub fn clamp_cursor(&mut self) {
        self.cy = self.cy.min(self.rows.len() - 1);
        let row = &self.rows[self.cy];
        self.cx = self.cx.min(row.size());
        while self.cx > 0 && self.cx < row.size() && row.chars[self.cx] & 0xC0 == 0x80 {
            self.cx -= 1;
        }
    }

    // ------------------------------------------------------------------
    // Edit operations. Each one mutates the gap buffer, pushes exactly one
    // undo record, and patches the row cache to match.
    // ------------------------------------------------------------------

    /// Insert one character at the cursor
    pub fn insert_char(&mut self, c: char) -> Result<()> {
        let mut encoded = [0u8; 4];
        let bytes = c.encode_utf8(&mut encoded).as_bytes();

        let offset = self.offset_of(self.cy, self.cx);
        self.buffer.insert(offset, bytes)?;
        self.history.push(EditKind::Insert, offset, bytes.to_vec());

        let tail = self.rows[self.cy].chars.split_off(self.cx);
        self.rows[self.cy].chars.extend_from_slice(bytes);
        self.rows[self.cy].chars.extend_from_slice(&tail);
        self.refresh_row(self.cy);
        self.cx += bytes.len();
        self.modified = true;
        Ok(())
    }

    /// Insert a raw byte at the cursor (malformed input is kept verbatim)
    pub fn insert_byte(&mut self, b: u8) -> Result<()> {
        let offset = self.offset_of(self.cy, self.cx);
        self.buffer.insert(offset, &[b])?;
        self.history.push(EditKind::Insert, offset, vec![b]);

        let cx = self.cx;
        self.rows[self.cy].chars.insert(cx, b);
        self.refresh_row(self.cy);
        self.cx += 1;
        self.modified = true;
        Ok(())
    }

    /// Split the current row at the cursor
    pub fn insert_newline(&mut self) -> Result<()> {
        let offset = self.offset_of(self.cy, self.cx);
        self.buffer.insert(offset, b"\n")?;
        self.history.push(EditKind::Insert, offset, vec![b'\n']);

        let tail = self.rows[self.cy].chars.split_off(self.cx);
        self.rows.insert(self.cy + 1, Row::new(self.cy + 1, tail));
        self.renumber_rows(self.cy + 1);
        self.refresh_row(self.cy);
        self.refresh_row(self.cy + 1);

        self.cy += 1;
        self.cx = 0;
        self.modified = true;
        Ok(())
    }

    /// Backspace: delete the character before the cursor, joining rows
    /// when the cursor sits at the start of a line.
    pub fn delete_char(&mut self) -> Result<()> {
        if self.cx == 0 && self.cy == 0 {
            return Ok(());
        }

        if self.cx > 0 {
            let row = &self.rows[self.cy];
            let prev = utf8::prev_boundary(&row.chars, self.cx);
            let removed: Vec<u8> = row.chars[prev..self.cx].to_vec();
            let offset = self.offset_of(self.cy, prev);

            self.buffer.delete(offset, removed.len());
            self.history.push(EditKind::Delete, offset, removed);

            let cx = self.cx;
            self.rows[self.cy].chars.drain(prev..cx);
            self.refresh_row(self.cy);
            self.cx = prev;
        } else {
            // Join this row into the previous one by deleting the newline
            let join_at = self.rows[self.cy - 1].size();
            let offset = self.offset_of(self.cy - 1, join_at);

            self.buffer.delete(offset, 1);
            self.history.push(EditKind::Delete, offset, vec![b'\n']);

            let tail = self.rows.remove(self.cy).chars;
            self.rows[self.cy - 1].chars.extend_from_slice(&tail);
            self.renumber_rows(self.cy - 1);
            self.refresh_row(self.cy - 1);
            self.cy -= 1;
            self.cx = join_at;
        }
        self.modified = true;
        Ok(())
    }

    /// DEL: step right one character, then backspace
    pub fn delete_forward(&mut self) -> Result<()> {
        let row = &self.rows[self.cy];
        if self.cx < row.size() {
            self.cx = utf8::next_boundary(&row.chars, self.cx);
            self.delete_char()
        } else if self.cy + 1 < self.rows.len() {
            self.cy += 1;
            self.cx = 0;
            self.delete_char()
        } else {
            Ok(())
        }
    }

    /// Copy of the current line's raw bytes
    pub fn copy_line(&self) -> Vec<u8> {
        self.rows[self.cy].chars.clone()
    }

    /// Delete the current line (including its trailing newline when it is
    /// not the last line) as one record. Returns the line's bytes.
    pub fn cut_line(&mut self) -> Result<Vec<u8>> {
        let line = self.rows[self.cy].chars.clone();
        let offset = self.offset_of(self.cy, 0);
        let last = self.cy + 1 == self.rows.len();

        let mut removed = line.clone();
        if !last {
            removed.push(b'\n');
        }
        if removed.is_empty() {
            return Ok(line);
        }
        self.buffer.delete(offset, removed.len());
        self.history.push(EditKind::Delete, offset, removed);

        if !last {
            self.rows.remove(self.cy);
            self.renumber_rows(self.cy);
        } else {
            self.rows[self.cy].chars.clear();
        }
        self.cx = 0;
        self.clamp_cursor();
        self.refresh_row(self.cy);
        self.modified = true;
        Ok(line)
    }

    /// Insert the clipboard at the cursor as one record.
    ///
    /// Newlines in the clipboard always create new rows; the cursor ends
    /// up just past the pasted text.
    pub fn paste(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let offset = self.offset_of(self.cy, self.cx);
        self.buffer.insert(offset, data)?;
        self.history.push(EditKind::Insert, offset, data.to_vec());

        if data.contains(&b'\n') {
            let end = offset + data.len();
            self.sync_rows();
            let (cy, cx) = self.offset_to_position(end);
            self.cy = cy;
            self.cx = cx;
        } else {
            let tail = self.rows[self.cy].chars.split_off(self.cx);
            self.rows[self.cy].chars.extend_from_slice(data);
            self.rows[self.cy].chars.extend_from_slice(&tail);
            self.refresh_row(self.cy);
            self.cx += data.len();
        }
        self.modified = true;
        Ok(())
    }

    /// Cut from the cursor to the end of the line.
    ///
    /// At the end of a non-final line this deletes the newline instead
    /// (joining lines, clipboard untouched); otherwise an empty tail cuts
    /// the whole line. Returns the new clipboard contents, if any.
    pub fn kill_to_eol(&mut self) -> Result<Option<Vec<u8>>> {
        let size = self.rows[self.cy].size();
        if self.cx < size {
            let removed: Vec<u8> = self.rows[self.cy].chars[self.cx..].to_vec();
            let offset = self.offset_of(self.cy, self.cx);
            self.buffer.delete(offset, removed.len());
            self.history.push(EditKind::Delete, offset, removed.clone());

            let cx = self.cx;
            self.rows[self.cy].chars.truncate(cx);
            self.refresh_row(self.cy);
            self.modified = true;
            Ok(Some(removed))
        } else if self.cy + 1 < self.rows.len() {
            let offset = self.offset_of(self.cy, size);
            self.buffer.delete(offset, 1);
            self.history.push(EditKind::Delete, offset, vec![b'\n']);

            let tail = self.rows.remove(self.cy + 1).chars;
            self.rows[self.cy].chars.extend_from_slice(&tail);
            self.renumber_rows(self.cy);
            self.refresh_row(self.cy);
            self.modified = true;
            Ok(None)
        } else {
            self.cut_line().map(Some)
        }
    }

    /// Insert a copy of the current line below and move onto it
    pub fn duplicate_line(&mut self) -> Result<()> {
        let line = self.rows[self.cy].chars.clone();
        let offset = self.offset_of(self.cy, self.rows[self.cy].size());
        let mut text = vec![b'\n'];
        text.extend_from_slice(&line);

        self.buffer.insert(offset, &text)?;
        self.history.push(EditKind::Insert, offset, text);

        self.rows.insert(self.cy + 1, Row::new(self.cy + 1, line));
        self.renumber_rows(self.cy + 1);
        self.refresh_row(self.cy + 1);
        self.cy += 1;
        self.clamp_cursor();
        self.modified = true;
        Ok(())
    }

    /// Delete the byte range `[start, end)` as one record and resync.
    /// Returns the removed bytes.
    pub fn delete_range(&mut self, start: usize, end: usize) -> Result<Vec<u8>> {
        let end = end.min(self.buffer.len());
        if start >= end {
            return Ok(Vec::new());
        }
        let removed: Vec<u8> = (start..end).map(|i| self.buffer.byte_at(i)).collect();
        self.buffer.delete(start, end - start);
        self.history.push(EditKind::Delete, start, removed.clone());
        self.sync_rows();
        self.modified = true;
        Ok(removed)
    }

    /// Remove one indent level from the start of the current line when
    /// everything before the cursor is whitespace. Used by `}` auto-indent.
    pub fn dedent_line(&mut self) -> Result<()> {
        let row = &self.rows[self.cy];
        if self.cx == 0 || !row.chars[..self.cx].iter().all(|&b| b == b' ' || b == b'\t') {
            return Ok(());
        }
        let remove = if row.chars[self.cx - 1] == b'\t' {
            1
        } else {
            let spaces = row.chars[..self.cx]
                .iter()
                .rev()
                .take_while(|&&b| b == b' ')
                .count();
            spaces.min(TAB_STOP)
        };
        let start = self.cx - remove;
        let removed: Vec<u8> = self.rows[self.cy].chars[start..self.cx].to_vec();
        let offset = self.offset_of(self.cy, start);

        self.buffer.delete(offset, remove);
        self.history.push(EditKind::Delete, offset, removed);

        let cx = self.cx;
        self.rows[self.cy].chars.drain(start..cx);
        self.refresh_row(self.cy);
        self.cx = start;
        self.modified = true;
        Ok(())
    }

    /// Undo the newest applied edit. Returns false at the stack boundary.
    pub fn undo(&mut self) -> Result<bool> {
        match self.history.undo(&mut self.buffer)? {
            Some(caret) => {
                self.sync_rows();
                let (cy, cx) = self.offset_to_position(caret);
                self.cy = cy;
                self.cx = cx;
                self.modified = self.history.can_undo();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Re-apply the next record forward. Returns false at the boundary.
    pub fn redo(&mut self) -> Result<bool> {
        match self.history.redo(&mut self.buffer)? {
            Some(caret) => {
                self.sync_rows();
                let (cy, cx) = self.offset_to_position(caret);
                self.cy = cy;
                self.cx = cx;
                self.modified = self.history.can_undo();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Move to a 1-based line number, clamped to the document
    pub fn goto_line(&mut self, line: usize) {
        self.cy = line.saturating_sub(1).min(self.rows.len() - 1);
        self.cx = 0;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
