//! Global constants for the editor

pub mod text {
    /// Tab stop width; tabs expand to the next multiple of this
    pub const TAB_STOP: usize = 4;

    /// Extra capacity added whenever the gap buffer grows
    pub const GROW_CHUNK: usize = 4096;

    /// Chunk size for streaming file loads
    pub const LOAD_CHUNK: usize = 8192;
}

pub mod history {
    /// Maximum number of undo records kept; oldest are evicted first
    pub const MAX_UNDO_LEVELS: usize = 100;

    pub const NOTHING_TO_UNDO: &str = "Nothing to undo";
    pub const NOTHING_TO_REDO: &str = "Nothing to redo";
}

pub mod ui {
    /// Display text for buffers with no file path
    pub const NO_NAME: &str = "[No Name]";

    /// How long a status message stays visible
    pub const MESSAGE_TIMEOUT_MS: u64 = 5000;

    /// Input poll timeout for the event loop
    pub const POLL_INTERVAL_MS: u64 = 100;

    /// Fallback terminal size when the query fails
    pub const FALLBACK_ROWS: u16 = 24;
    pub const FALLBACK_COLS: u16 = 80;
}

pub mod modes {
    pub const NORMAL: &str = "NORMAL";
    pub const SELECT: &str = "SELECT";
    pub const SEARCH: &str = "SEARCH";
    pub const PROMPT: &str = "PROMPT";
    pub const CONFIRM: &str = "CONFIRM";
    pub const HELP: &str = "HELP";
    pub const BROWSER: &str = "BROWSER";
}
