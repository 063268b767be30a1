//! Undo/Redo history management
//!
//! A bounded linear history of reversible edits. Every record owns the
//! exact bytes it inserted or removed, so undo and redo are pure gap-buffer
//! replays and never consult the row cache. Records past the `applied`
//! cursor form the redo queue and are discarded by any new push.

use crate::buffer::GapBuffer;
use crate::constants::history::MAX_UNDO_LEVELS;
use crate::error::Result;
use std::collections::VecDeque;

/// What a record did to the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    Delete,
    /// Delete-then-insert at the same position. Understood by the apply
    /// path but never emitted by the edit operations.
    Replace,
}

/// A single reversible edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRecord {
    pub kind: EditKind,
    /// Byte offset in the buffer where the edit happened
    pub pos: usize,
    /// The exact bytes inserted or removed
    pub text: Vec<u8>,
}

/// Bounded undo/redo stack
pub struct History {
    records: VecDeque<EditRecord>,
    /// Number of records currently applied to the buffer; everything at
    /// or past this index is the redo queue
    applied: usize,
}

impl History {
    pub fn new() -> Self {
        Self {
            records: VecDeque::new(),
            applied: 0,
        }
    }

    /// Record a new edit. Discards the redo queue and evicts the oldest
    /// record once the cap is exceeded.
    pub fn push(&mut self, kind: EditKind, pos: usize, text: Vec<u8>) {
        self.records.truncate(self.applied);
        self.records.push_back(EditRecord { kind, pos, text });
        self.applied += 1;
        if self.records.len() > MAX_UNDO_LEVELS {
            self.records.pop_front();
            self.applied -= 1;
        }
    }

    /// Apply the inverse of the newest applied record.
    ///
    /// Returns the caret offset after the replay, or `None` when there is
    /// nothing to undo.
    pub fn undo(&mut self, buffer: &mut GapBuffer) -> Result<Option<usize>> {
        if self.applied == 0 {
            return Ok(None);
        }
        let rec = &self.records[self.applied - 1];
        let caret = match rec.kind {
            EditKind::Insert => {
                buffer.delete(rec.pos, rec.text.len());
                rec.pos
            }
            EditKind::Delete => {
                buffer.insert(rec.pos, &rec.text)?;
                rec.pos + rec.text.len()
            }
            EditKind::Replace => {
                buffer.delete(rec.pos, rec.text.len());
                buffer.insert(rec.pos, &rec.text)?;
                rec.pos + rec.text.len()
            }
        };
        self.applied -= 1;
        Ok(Some(caret))
    }

    /// Re-apply the next record forward.
    ///
    /// Returns the caret offset after the replay, or `None` when there is
    /// nothing to redo.
    pub fn redo(&mut self, buffer: &mut GapBuffer) -> Result<Option<usize>> {
        if self.applied == self.records.len() {
            return Ok(None);
        }
        let rec = &self.records[self.applied];
        let caret = match rec.kind {
            EditKind::Insert => {
                buffer.insert(rec.pos, &rec.text)?;
                rec.pos + rec.text.len()
            }
            EditKind::Delete => {
                buffer.delete(rec.pos, rec.text.len());
                rec.pos
            }
            EditKind::Replace => {
                buffer.delete(rec.pos, rec.text.len());
                buffer.insert(rec.pos, &rec.text)?;
                rec.pos + rec.text.len()
            }
        };
        self.applied += 1;
        Ok(Some(caret))
    }

    /// Check if we can undo
    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    /// Check if we can redo
    pub fn can_redo(&self) -> bool {
        self.applied < self.records.len()
    }

    /// Number of records currently applied
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Total number of records (applied + redo queue)
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop all history
    pub fn clear(&mut self) {
        self.records.clear();
        self.applied = 0;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
