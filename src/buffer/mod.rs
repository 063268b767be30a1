//! Gap buffer implementation for efficient text editing
//!
//! Layout: `[before_gap][gap][after_gap]` over one `Vec<u8>` whose length
//! is the capacity. The logical text is `[0, gap_start) ++ [gap_end, cap)`.
//! Local edits move the gap to the edit point, so a run of insertions or
//! deletions at the caret costs O(1) amortised per byte.

use crate::constants::text::GROW_CHUNK;
use crate::error::{Error, Result};

/// Gap buffer for efficient insertion and deletion
pub struct GapBuffer {
    /// Backing storage; `buf.len()` is the capacity
    buf: Vec<u8>,
    /// Start of gap (end of before_gap)
    gap_start: usize,
    /// End of gap (start of after_gap)
    gap_end: usize,
}

impl GapBuffer {
    /// Create a new gap buffer with initial capacity
    pub fn new(initial_capacity: usize) -> Self {
        let cap = initial_capacity.max(1);
        GapBuffer {
            buf: vec![0; cap],
            gap_start: 0,
            gap_end: cap,
        }
    }

    /// Total length of text (excluding the gap)
    pub fn len(&self) -> usize {
        self.gap_start + (self.buf.len() - self.gap_end)
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte at logical offset `pos`
    pub fn byte_at(&self, pos: usize) -> u8 {
        debug_assert!(pos < self.len());
        if pos < self.gap_start {
            self.buf[pos]
        } else {
            self.buf[self.gap_end + (pos - self.gap_start)]
        }
    }

    /// Text before the gap
    pub fn get_before_gap(&self) -> &[u8] {
        &self.buf[..self.gap_start]
    }

    /// Text after the gap
    pub fn get_after_gap(&self) -> &[u8] {
        &self.buf[self.gap_end..]
    }

    /// The logical text as one contiguous vector
    pub fn text(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(self.get_before_gap());
        out.extend_from_slice(self.get_after_gap());
        out
    }

    /// Move the gap so that it starts at logical offset `pos`.
    ///
    /// Copies only the bytes between the old and new position, so small
    /// cursor movements cost proportionally small copies.
    fn move_gap(&mut self, pos: usize) {
        debug_assert!(pos <= self.len());
        if pos < self.gap_start {
            let n = self.gap_start - pos;
            self.buf.copy_within(pos..self.gap_start, self.gap_end - n);
            self.gap_start = pos;
            self.gap_end -= n;
        } else if pos > self.gap_start {
            let n = pos - self.gap_start;
            self.buf.copy_within(self.gap_end..self.gap_end + n, self.gap_start);
            self.gap_start += n;
            self.gap_end += n;
        }
    }

    /// Grow the backing storage so at least `needed` bytes fit in the gap.
    ///
    /// On allocation failure the buffer is left unchanged.
    fn grow(&mut self, needed: usize) -> Result<()> {
        let new_cap = self.len() + needed + GROW_CHUNK;
        let mut new_buf = Vec::new();
        new_buf
            .try_reserve_exact(new_cap)
            .map_err(|e| Error::out_of_memory(format!("buffer growth failed: {e}")))?;
        new_buf.resize(new_cap, 0);

        let after_len = self.buf.len() - self.gap_end;
        new_buf[..self.gap_start].copy_from_slice(&self.buf[..self.gap_start]);
        new_buf[new_cap - after_len..].copy_from_slice(&self.buf[self.gap_end..]);

        self.gap_end = new_cap - after_len;
        self.buf = new_buf;
        Ok(())
    }

    /// Insert `bytes` at logical offset `pos`
    pub fn insert(&mut self, pos: usize, bytes: &[u8]) -> Result<()> {
        self.move_gap(pos);
        if self.gap_end - self.gap_start < bytes.len() {
            self.grow(bytes.len())?;
        }
        self.buf[self.gap_start..self.gap_start + bytes.len()].copy_from_slice(bytes);
        self.gap_start += bytes.len();
        Ok(())
    }

    /// Delete up to `len` bytes starting at logical offset `pos`
    pub fn delete(&mut self, pos: usize, len: usize) {
        self.move_gap(pos);
        self.gap_end = (self.gap_end + len).min(self.buf.len());
    }

    /// Discard all text
    pub fn clear(&mut self) {
        self.gap_start = 0;
        self.gap_end = self.buf.len();
    }

    /// Clear the buffer, then append the stream in fixed-size chunks
    pub fn load(&mut self, reader: &mut impl std::io::Read) -> Result<()> {
        self.clear();
        let mut chunk = [0u8; crate::constants::text::LOAD_CHUNK];
        loop {
            let n = reader.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            let end = self.len();
            self.insert(end, &chunk[..n])?;
        }
        Ok(())
    }
}
