//! Editor core
//! Mode machine, key dispatch, and the event loop
//!
//! Every keystroke is processed to completion (mode dispatch, edit, row
//! sync, highlight, render) before the next one is read. The editor owns
//! all state; the terminal backend only moves bytes.

use crate::constants::history::{NOTHING_TO_REDO, NOTHING_TO_UNDO};
use crate::constants::ui::{FALLBACK_COLS, FALLBACK_ROWS, POLL_INTERVAL_MS};
use crate::document::Document;
use crate::error::Result;
use crate::explorer::{BrowseAction, Browser};
use crate::key::Key;
use crate::mode::Mode;
use crate::render::{self, RenderState};
use crate::search::{Search, SearchOutcome};
use crate::selection::Selection;
use crate::status::MessageBar;
use crate::term::TerminalBackend;
use crate::utf8;
use std::path::PathBuf;
use std::time::Duration;

/// What a text prompt is for
#[derive(Debug, Clone, PartialEq, Eq)]
enum PromptPurpose {
    SaveAs,
    GotoLine,
}

struct Prompt {
    label: &'static str,
    buffer: String,
    purpose: PromptPurpose,
}

/// What a yes/no dialog decides
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfirmPurpose {
    QuitUnsaved,
    OpenUnsaved(PathBuf),
}

struct Confirm {
    question: &'static str,
    purpose: ConfirmPurpose,
}

/// Main editor struct
pub struct Editor<T: TerminalBackend> {
    term: T,
    pub doc: Document,
    pub mode: Mode,
    prev_mode: Mode,
    pub selection: Selection,
    search: Option<Search>,
    prompt: Option<Prompt>,
    confirm: Option<Confirm>,
    pub browser: Option<Browser>,
    pub clipboard: Vec<u8>,
    pub message: MessageBar,
    screen_rows: usize,
    screen_cols: usize,
    pub show_line_numbers: bool,
    needs_full_clear: bool,
    should_quit: bool,
}

impl<T: TerminalBackend> Editor<T> {
    /// Create a new editor instance
    pub fn new(term: T) -> Result<Self> {
        Self::with_file(term, None)
    }

    /// Create a new editor instance with an optional file to load.
    ///
    /// The file is loaded before the terminal is initialized, so a missing
    /// file fails without disturbing the screen.
    pub fn with_file(mut term: T, file_path: Option<String>) -> Result<Self> {
        let mut doc = Document::new();
        if let Some(path) = file_path {
            doc.open(&path)?;
        }

        term.init()?;
        let (screen_rows, screen_cols) = match term.get_size() {
            Ok(size) => (size.rows as usize, size.cols as usize),
            Err(_) => (FALLBACK_ROWS as usize, FALLBACK_COLS as usize),
        };

        Ok(Self {
            term,
            doc,
            mode: Mode::Normal,
            prev_mode: Mode::Normal,
            selection: Selection::new(),
            search: None,
            prompt: None,
            confirm: None,
            browser: None,
            clipboard: Vec::new(),
            message: MessageBar::new(),
            screen_rows,
            screen_cols,
            show_line_numbers: false,
            needs_full_clear: true,
            should_quit: false,
        })
    }

    /// Run the event loop until quit.
    ///
    /// Polls input with a timeout so transient messages can expire; the
    /// loop never blocks indefinitely.
    pub fn run(&mut self) -> Result<()> {
        self.refresh()?;
        while !self.should_quit {
            if self.term.poll(Duration::from_millis(POLL_INTERVAL_MS))? {
                if let Some(key) = self.term.read_key()? {
                    self.process_key(key)?;
                    self.refresh()?;
                }
            } else if self.message.prune_expired() {
                self.refresh()?;
            }
        }
        self.term.deinit();
        Ok(())
    }

    /// Dispatch one key through the mode machine
    pub fn process_key(&mut self, key: Key) -> Result<()> {
        if let Key::Resize(cols, rows) = key {
            self.screen_rows = rows as usize;
            self.screen_cols = cols as usize;
            self.needs_full_clear = true;
            return Ok(());
        }
        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Select => self.handle_select_key(key),
            Mode::Search => self.handle_search_key(key),
            Mode::Prompt => self.handle_prompt_key(key),
            Mode::Confirm => self.handle_confirm_key(key),
            Mode::Browser => self.handle_browser_key(key),
            Mode::Help => {
                self.leave_overlay_mode();
                Ok(())
            }
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    // ------------------------------------------------------------------
    // Mode handlers
    // ------------------------------------------------------------------

    fn handle_normal_key(&mut self, key: Key) -> Result<()> {
        match key {
            Key::Ctrl(b'q') => {
                if self.doc.modified {
                    self.enter_confirm(
                        "Unsaved changes! Quit without saving? (y/n)",
                        ConfirmPurpose::QuitUnsaved,
                    );
                } else {
                    self.should_quit = true;
                }
            }
            Key::Ctrl(b's') => self.save(),
            Key::Ctrl(b'f') => {
                self.search = Some(Search::new(&self.doc));
                self.set_mode(Mode::Search);
            }
            Key::Ctrl(b'o') => match Browser::new(".") {
                Ok(browser) => {
                    self.browser = Some(browser);
                    self.set_mode(Mode::Browser);
                }
                Err(e) => self.message.set(format!("Cannot open directory: {e}")),
            },
            Key::Ctrl(b'x') => {
                self.selection.begin(self.doc.cx, self.doc.cy);
                self.set_mode(Mode::Select);
            }
            Key::Ctrl(b'c') => {
                self.clipboard = self.doc.copy_line();
                self.message.set("Copied line");
            }
            Key::Ctrl(b'k') => {
                if let Some(cut) = self.doc.kill_to_eol()? {
                    self.clipboard = cut;
                }
            }
            Key::Ctrl(b'v') => {
                let clip = self.clipboard.clone();
                self.doc.paste(&clip)?;
            }
            Key::Ctrl(b'z') => {
                if !self.doc.undo()? {
                    self.message.set(NOTHING_TO_UNDO);
                }
            }
            Key::Ctrl(b'r') => {
                if !self.doc.redo()? {
                    self.message.set(NOTHING_TO_REDO);
                }
            }
            Key::Ctrl(b'n') => {
                self.show_line_numbers = !self.show_line_numbers;
                self.needs_full_clear = true;
            }
            Key::Ctrl(b'g') => self.enter_prompt("Goto line: ", PromptPurpose::GotoLine),
            Key::Ctrl(b'd') => self.doc.duplicate_line()?,
            Key::Ctrl(b'?') | Key::Ctrl(b'_') | Key::Ctrl(b'/') => {
                self.set_mode(Mode::Help);
            }
            Key::Ctrl(b'h') | Key::Backspace => self.doc.delete_char()?,
            Key::Delete => self.doc.delete_forward()?,
            Key::Enter => self.doc.insert_newline()?,
            Key::Tab => self.doc.insert_char('\t')?,
            Key::Char('}') => {
                self.doc.dedent_line()?;
                self.doc.insert_char('}')?;
            }
            Key::Char(c) if c != '\0' => self.doc.insert_char(c)?,
            key if key.is_motion() => self.move_cursor(key),
            _ => {}
        }
        Ok(())
    }

    fn handle_select_key(&mut self, key: Key) -> Result<()> {
        match key {
            key if key.is_motion() => {
                self.move_cursor(key);
                self.selection.update(self.doc.cx, self.doc.cy);
            }
            Key::Ctrl(b'c') => {
                self.clipboard = self.selection.text(&self.doc);
                self.selection.clear();
                self.set_mode(Mode::Normal);
                self.message.set("Copied selection");
            }
            Key::Ctrl(b'k') => {
                let cut = self.selection.delete(&mut self.doc)?;
                if !cut.is_empty() {
                    self.clipboard = cut;
                }
                self.set_mode(Mode::Normal);
            }
            Key::Backspace | Key::Delete => {
                self.selection.delete(&mut self.doc)?;
                self.set_mode(Mode::Normal);
            }
            Key::Ctrl(b'x') | Key::Escape => {
                self.selection.clear();
                self.set_mode(Mode::Normal);
            }
            _ => {
                // Anything else drops back to normal mode; the region is
                // kept so the mark can be picked up again
                self.set_mode(Mode::Normal);
            }
        }
        Ok(())
    }

    fn handle_search_key(&mut self, key: Key) -> Result<()> {
        let Some(mut search) = self.search.take() else {
            self.set_mode(Mode::Normal);
            return Ok(());
        };
        match search.incremental(&mut self.doc, key) {
            SearchOutcome::Pending => {
                self.search = Some(search);
            }
            SearchOutcome::Accepted => {
                if search.last_match.is_some() {
                    self.message
                        .set(format!("{} match(es)", search.total_matches));
                }
                self.set_mode(Mode::Normal);
            }
            SearchOutcome::Cancelled => {
                self.set_mode(Mode::Normal);
            }
        }
        Ok(())
    }

    fn handle_prompt_key(&mut self, key: Key) -> Result<()> {
        let Some(mut prompt) = self.prompt.take() else {
            self.set_mode(self.prev_mode);
            return Ok(());
        };
        match key {
            Key::Enter => {
                self.set_mode(self.prev_mode);
                self.finish_prompt(prompt)?;
            }
            Key::Escape => {
                self.set_mode(self.prev_mode);
            }
            Key::Backspace => {
                prompt.buffer.pop();
                self.prompt = Some(prompt);
            }
            Key::Char(c) if c != '\0' => {
                prompt.buffer.push(c);
                self.prompt = Some(prompt);
            }
            _ => self.prompt = Some(prompt),
        }
        Ok(())
    }

    fn finish_prompt(&mut self, prompt: Prompt) -> Result<()> {
        match prompt.purpose {
            PromptPurpose::SaveAs => {
                if prompt.buffer.is_empty() {
                    self.message.set("Save aborted");
                } else {
                    self.doc.set_file_name(prompt.buffer);
                    self.save();
                }
            }
            PromptPurpose::GotoLine => match prompt.buffer.trim().parse::<usize>() {
                Ok(line) => self.doc.goto_line(line),
                Err(_) => self.message.set("Not a line number"),
            },
        }
        Ok(())
    }

    fn handle_confirm_key(&mut self, key: Key) -> Result<()> {
        let Some(confirm) = self.confirm.take() else {
            self.set_mode(self.prev_mode);
            return Ok(());
        };
        match key {
            Key::Char('y') | Key::Char('Y') => {
                self.set_mode(Mode::Normal);
                match confirm.purpose {
                    ConfirmPurpose::QuitUnsaved => self.should_quit = true,
                    ConfirmPurpose::OpenUnsaved(path) => self.open_path(&path),
                }
            }
            Key::Char('n') | Key::Char('N') | Key::Escape => {
                self.set_mode(self.prev_mode);
            }
            _ => self.confirm = Some(confirm),
        }
        Ok(())
    }

    fn handle_browser_key(&mut self, key: Key) -> Result<()> {
        let Some(mut browser) = self.browser.take() else {
            self.set_mode(Mode::Normal);
            return Ok(());
        };
        let page = self.screen_rows.saturating_sub(3).max(1);
        let mut keep = true;
        match key {
            Key::ArrowUp => browser.move_up(),
            Key::ArrowDown => browser.move_down(),
            Key::PageUp => browser.page_up(page),
            Key::PageDown => browser.page_down(page),
            Key::Home => browser.selected = 0,
            Key::End => browser.selected = browser.entries.len().saturating_sub(1),
            Key::Char('H') => {
                if let Err(e) = browser.toggle_hidden() {
                    self.message.set(format!("Cannot read directory: {e}"));
                }
            }
            Key::Enter => match browser.enter() {
                Ok(BrowseAction::OpenFile(path)) => {
                    if self.doc.modified {
                        self.enter_confirm(
                            "Unsaved changes! Open another file? (y/n)",
                            ConfirmPurpose::OpenUnsaved(path),
                        );
                    } else {
                        keep = false;
                        self.open_path(&path);
                    }
                }
                Ok(_) => {}
                Err(e) => self.message.set(format!("Cannot read directory: {e}")),
            },
            Key::Escape | Key::Ctrl(b'q') => keep = false,
            _ => {}
        }
        if keep {
            self.browser = Some(browser);
        } else {
            self.leave_overlay_mode();
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    fn save(&mut self) {
        if self.doc.file_name.is_none() {
            self.enter_prompt("Save as: ", PromptPurpose::SaveAs);
            return;
        }
        match self.doc.save() {
            Ok(bytes) => self.message.set(format!("{bytes} bytes written to disk")),
            Err(e) => self.message.set(format!("Save failed: {}", e.message)),
        }
    }

    fn open_path(&mut self, path: &std::path::Path) {
        let path_str = path.to_string_lossy().into_owned();
        match self.doc.open(&path_str) {
            Ok(()) => {
                self.selection.clear();
                self.message.set(format!("Opened {path_str}"));
            }
            Err(e) => self.message.set(format!("Cannot open {path_str}: {}", e.message)),
        }
        self.browser = None;
        self.set_mode(Mode::Normal);
    }

    fn enter_prompt(&mut self, label: &'static str, purpose: PromptPurpose) {
        self.prompt = Some(Prompt {
            label,
            buffer: String::new(),
            purpose,
        });
        self.set_mode(Mode::Prompt);
    }

    fn enter_confirm(&mut self, question: &'static str, purpose: ConfirmPurpose) {
        self.confirm = Some(Confirm { question, purpose });
        self.set_mode(Mode::Confirm);
    }

    /// Leave browser or help and return to normal editing
    fn leave_overlay_mode(&mut self) {
        self.browser = None;
        self.set_mode(Mode::Normal);
    }

    /// Switch modes, remembering the caller for prompt/confirm dialogs and
    /// forcing a clear when the screen layout changes.
    fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        self.prev_mode = match self.mode {
            // Dialogs restore the mode that opened them, not themselves
            Mode::Prompt | Mode::Confirm => self.prev_mode,
            other => other,
        };
        if matches!(mode, Mode::Browser | Mode::Help)
            || matches!(self.mode, Mode::Browser | Mode::Help)
        {
            self.needs_full_clear = true;
        }
        self.mode = mode;
    }

    /// Cursor motion with UTF-8 boundary stepping and row clamping
    fn move_cursor(&mut self, key: Key) {
        let doc = &mut self.doc;
        match key {
            Key::ArrowLeft => {
                if doc.cx > 0 {
                    doc.cx = utf8::prev_boundary(&doc.rows[doc.cy].chars, doc.cx);
                } else if doc.cy > 0 {
                    doc.cy -= 1;
                    doc.cx = doc.rows[doc.cy].size();
                }
            }
            Key::ArrowRight => {
                let size = doc.rows[doc.cy].size();
                if doc.cx < size {
                    doc.cx = utf8::next_boundary(&doc.rows[doc.cy].chars, doc.cx);
                } else if doc.cy + 1 < doc.num_rows() {
                    doc.cy += 1;
                    doc.cx = 0;
                }
            }
            Key::ArrowUp => {
                if doc.cy > 0 {
                    doc.cy -= 1;
                    doc.clamp_cursor();
                }
            }
            Key::ArrowDown => {
                if doc.cy + 1 < doc.num_rows() {
                    doc.cy += 1;
                    doc.clamp_cursor();
                }
            }
            Key::Home => doc.cx = 0,
            Key::End => doc.cx = doc.rows[doc.cy].size(),
            Key::PageUp => {
                let page = self.screen_rows.saturating_sub(2).max(1);
                doc.cy = doc.cy.saturating_sub(page);
                doc.clamp_cursor();
            }
            Key::PageDown => {
                let page = self.screen_rows.saturating_sub(2).max(1);
                doc.cy = (doc.cy + page).min(doc.num_rows() - 1);
                doc.clamp_cursor();
            }
            _ => {}
        }
    }

    /// Keep the cursor inside the viewport
    fn scroll(&mut self) {
        let text_rows = self.screen_rows.saturating_sub(2).max(1);
        let gutter = if self.show_line_numbers {
            let mut digits = 1;
            let mut n = self.doc.num_rows();
            while n >= 10 {
                digits += 1;
                n /= 10;
            }
            digits + 2
        } else {
            0
        };
        let width = self.screen_cols.saturating_sub(gutter).max(1);

        let doc = &mut self.doc;
        if doc.cy < doc.row_offset {
            doc.row_offset = doc.cy;
        }
        if doc.cy >= doc.row_offset + text_rows {
            doc.row_offset = doc.cy + 1 - text_rows;
        }

        let rx = doc.rows[doc.cy].cx_to_rx(doc.cx);
        if rx < doc.col_offset {
            doc.col_offset = rx;
        }
        if rx >= doc.col_offset + width {
            doc.col_offset = rx + 1 - width;
        }
    }

    /// Compose and write one frame
    fn refresh(&mut self) -> Result<()> {
        self.scroll();
        if let Some(browser) = self.browser.as_mut() {
            let visible = self.screen_rows.saturating_sub(3).max(1);
            browser.clamp_scroll(visible);
        }

        let message_line = match self.mode {
            Mode::Search => {
                let query = self.search.as_ref().map(|s| s.query.as_str()).unwrap_or("");
                format!("Search (Esc to cancel, arrows to cycle): {query}")
            }
            Mode::Prompt => self
                .prompt
                .as_ref()
                .map(|p| format!("{}{}", p.label, p.buffer))
                .unwrap_or_default(),
            Mode::Confirm => self
                .confirm
                .as_ref()
                .map(|c| c.question.to_string())
                .unwrap_or_default(),
            _ => self.message.current().unwrap_or("").to_string(),
        };
        let status_extra = match self.mode {
            Mode::Search => {
                let total = self.search.as_ref().map_or(0, |s| s.total_matches);
                format!("{total} match(es)")
            }
            _ => String::new(),
        };

        let state = RenderState {
            doc: &self.doc,
            mode: self.mode,
            selection: &self.selection,
            browser: self.browser.as_ref(),
            message: &message_line,
            status_extra: &status_extra,
            screen_rows: self.screen_rows,
            screen_cols: self.screen_cols,
            show_line_numbers: self.show_line_numbers,
            full_clear: self.needs_full_clear,
        };
        let frame = render::render_frame(&state);
        self.term.write(&frame)?;
        self.term.flush()?;
        self.needs_full_clear = false;
        Ok(())
    }
}
