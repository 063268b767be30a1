//! File browser
//!
//! A directory listing mode: entries are read in one pass, hidden names
//! are filtered unless toggled on, directories sort before files and each
//! group is case-insensitively alphabetical. A synthetic `..` entry is
//! prepended whenever the directory has a parent.

use crate::error::Result;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

pub struct Browser {
    pub dir: PathBuf,
    pub entries: Vec<Entry>,
    pub selected: usize,
    pub scroll: usize,
    pub show_hidden: bool,
}

/// What pressing Enter on the selection means
pub enum BrowseAction {
    /// Moved into another directory; the listing was reloaded
    Descended,
    /// A file was chosen
    OpenFile(PathBuf),
    /// Nothing was selected
    None,
}

impl Browser {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        // Canonical paths make `..` walk real parents and stop at `/`
        let dir = dir.into();
        let dir = std::fs::canonicalize(&dir).unwrap_or(dir);
        let mut browser = Self {
            dir,
            entries: Vec::new(),
            selected: 0,
            scroll: 0,
            show_hidden: false,
        };
        browser.reload()?;
        Ok(browser)
    }

    /// Re-read the current directory
    pub fn reload(&mut self) -> Result<()> {
        let mut entries = Vec::new();
        for dent in std::fs::read_dir(&self.dir)? {
            let dent = dent?;
            let name = dent.file_name().to_string_lossy().into_owned();
            if name == "." || name == ".." {
                continue;
            }
            if !self.show_hidden && name.starts_with('.') {
                continue;
            }
            let is_dir = dent.file_type().map(|t| t.is_dir()).unwrap_or(false);
            entries.push(Entry { name, is_dir });
        }
        entries.sort_by(|a, b| {
            b.is_dir
                .cmp(&a.is_dir)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });

        if self.dir.parent().is_some() {
            entries.insert(
                0,
                Entry {
                    name: "..".to_string(),
                    is_dir: true,
                },
            );
        }

        self.entries = entries;
        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
        self.scroll = 0;
        Ok(())
    }

    pub fn toggle_hidden(&mut self) -> Result<()> {
        self.show_hidden = !self.show_hidden;
        self.selected = 0;
        self.reload()
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.entries.get(self.selected)
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    pub fn page_up(&mut self, page: usize) {
        self.selected = self.selected.saturating_sub(page.max(1));
    }

    pub fn page_down(&mut self, page: usize) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + page.max(1)).min(self.entries.len() - 1);
        }
    }

    /// Keep the selection inside a window of `visible` rows
    pub fn clamp_scroll(&mut self, visible: usize) {
        if visible == 0 {
            return;
        }
        if self.selected < self.scroll {
            self.scroll = self.selected;
        }
        if self.selected >= self.scroll + visible {
            self.scroll = self.selected + 1 - visible;
        }
    }

    /// Act on the selected entry
    pub fn enter(&mut self) -> Result<BrowseAction> {
        let Some(entry) = self.selected_entry().cloned() else {
            return Ok(BrowseAction::None);
        };
        if entry.name == ".." {
            if let Some(parent) = self.dir.parent() {
                self.dir = parent.to_path_buf();
                self.selected = 0;
                self.reload()?;
            }
            return Ok(BrowseAction::Descended);
        }
        let path = self.dir.join(&entry.name);
        if entry.is_dir {
            self.dir = path;
            self.selected = 0;
            self.reload()?;
            Ok(BrowseAction::Descended)
        } else {
            Ok(BrowseAction::OpenFile(path))
        }
    }
}
